use efi_types::VariableAttributes;
use efi_vars::{Efivarfs, StoreError, Variable, VariableList, VariableName, VariableStore};
use std::fs;

const GLOBAL: &str = "8be4df61-93ca-11d2-aa0d-00e098032b8c";

fn put(dir: &tempfile::TempDir, name: &str, blob: &[u8]) {
    fs::write(dir.path().join(format!("{name}-{GLOBAL}")), blob).unwrap();
}

#[test]
fn empty_root_yields_empty_list() {
    let dir = tempfile::tempdir().unwrap();
    let store = Efivarfs::new(dir.path());

    assert!(store.enumerate().unwrap().is_empty());
    assert!(VariableList::load(&store).unwrap().is_empty());
}

#[test]
fn missing_root_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let store = Efivarfs::new(dir.path().join("absent"));

    assert!(matches!(store.enumerate(), Err(StoreError::NotFound { .. })));
    assert!(matches!(
        VariableList::load(&store),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn reads_attributes_and_payload() {
    let dir = tempfile::tempdir().unwrap();
    put(&dir, "Timeout", &[0x07, 0, 0, 0, 0x05, 0x00]);

    let store = Efivarfs::new(dir.path());
    let var = store.read(&VariableName::global("Timeout")).unwrap();

    assert_eq!(var.attributes, VariableAttributes::NV_BS_RT);
    assert_eq!(var.data, [0x05, 0x00]);
    assert_eq!(var.len(), 2);
}

#[test]
fn header_only_blob_has_empty_payload() {
    let dir = tempfile::tempdir().unwrap();
    put(&dir, "Empty", &[0x07, 0, 0, 0]);

    let var = Efivarfs::new(dir.path())
        .read(&VariableName::global("Empty"))
        .unwrap();
    assert!(var.is_empty());
}

#[test]
fn short_blob_is_invalid_format() {
    let dir = tempfile::tempdir().unwrap();
    put(&dir, "Short", &[0x07, 0]);
    put(&dir, "Zero", &[]);

    let store = Efivarfs::new(dir.path());
    for name in ["Short", "Zero"] {
        assert!(matches!(
            store.read(&VariableName::global(name)),
            Err(StoreError::InvalidFormat { .. })
        ));
    }
}

#[test]
fn absent_variable_is_not_found_and_not_listed() {
    let dir = tempfile::tempdir().unwrap();
    put(&dir, "BootOrder", &[0x07, 0, 0, 0, 1, 0]);

    let store = Efivarfs::new(dir.path());
    let missing = VariableName::global("Boot0001");
    assert!(matches!(
        store.read(&missing),
        Err(StoreError::NotFound { .. })
    ));

    let list = VariableList::load(&store).unwrap();
    assert_eq!(list.len(), 1);
    assert!(list.iter().all(|v| v.name != missing));
}

#[test]
fn enumeration_is_sorted_and_skips_foreign_entries() {
    let dir = tempfile::tempdir().unwrap();
    put(&dir, "Timeout", &[0x07, 0, 0, 0, 5, 0]);
    put(&dir, "Boot0001", &[0x07, 0, 0, 0]);
    put(&dir, "BootOrder", &[0x07, 0, 0, 0, 1, 0]);
    fs::write(dir.path().join("README"), b"not a variable").unwrap();
    fs::create_dir(dir.path().join(format!("Dir-{GLOBAL}"))).unwrap();

    let names: Vec<String> = Efivarfs::new(dir.path())
        .enumerate()
        .unwrap()
        .iter()
        .map(|n| n.name().to_owned())
        .collect();
    assert_eq!(names, ["Boot0001", "BootOrder", "Timeout"]);
}

#[test]
fn unreadable_entries_are_dropped_from_list() {
    let dir = tempfile::tempdir().unwrap();
    put(&dir, "Good", &[0x07, 0, 0, 0, 1]);
    put(&dir, "Bad", &[0x07]);

    let list = VariableList::load(&Efivarfs::new(dir.path())).unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list.get(0).unwrap().name.name(), "Good");
}

#[test]
fn create_edit_delete() {
    let dir = tempfile::tempdir().unwrap();
    let store = Efivarfs::new(dir.path());
    let name = VariableName::global("BootNext");

    let mut var = Variable::new(name.clone(), VariableAttributes::NV_BS_RT, vec![0x02, 0x00]);
    store.create(&var).unwrap();

    let path = dir.path().join(format!("BootNext-{GLOBAL}"));
    assert_eq!(fs::read(&path).unwrap(), [0x07, 0, 0, 0, 0x02, 0x00]);

    var.data = vec![0x03, 0x00];
    store.edit(&name, &var).unwrap();
    assert_eq!(store.read(&name).unwrap().data, [0x03, 0x00]);

    store.delete(&var).unwrap();
    assert!(!path.exists());
    assert!(matches!(
        store.delete(&var),
        Err(StoreError::NotFound { .. })
    ));
}

#[test]
fn failed_write_is_out_of_resources() {
    let full = std::path::Path::new("/dev/full");
    if !full.exists() {
        return;
    }

    let dir = tempfile::tempdir().unwrap();
    std::os::unix::fs::symlink(full, dir.path().join(format!("BootNext-{GLOBAL}"))).unwrap();

    let store = Efivarfs::new(dir.path());
    let var = Variable::new(
        VariableName::global("BootNext"),
        VariableAttributes::NV_BS_RT,
        vec![0x02, 0x00],
    );
    assert!(matches!(
        store.create(&var),
        Err(StoreError::OutOfResources { .. })
    ));
}

#[test]
fn deleting_a_directory_is_out_of_resources() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("BootNext-{GLOBAL}"));
    fs::create_dir(&path).unwrap();

    let var = Variable::new(
        VariableName::global("BootNext"),
        VariableAttributes::NV_BS_RT,
        vec![],
    );
    match Efivarfs::new(dir.path()).delete(&var) {
        Err(StoreError::OutOfResources { path: failed, .. }) => assert_eq!(failed, path),
        other => panic!("expected OutOfResources, got {other:?}"),
    }
    assert!(path.is_dir());
}
