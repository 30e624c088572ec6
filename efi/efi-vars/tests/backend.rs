use efi_vars::{Backend, BackendPreference, StoreError, VariableStore};

#[test]
fn explicit_root_selects_efivarfs() {
    let dir = tempfile::tempdir().unwrap();

    let backend = Backend::detect(BackendPreference::Efivarfs, Some(dir.path())).unwrap();
    assert_eq!(backend.kind(), "efivarfs");
    assert_eq!(backend.root(), dir.path());

    let backend = Backend::detect(BackendPreference::Auto, Some(dir.path())).unwrap();
    assert_eq!(backend.kind(), "efivarfs");
}

#[test]
fn explicit_sysfs_choice_uses_its_root() {
    let dir = tempfile::tempdir().unwrap();

    let backend = Backend::detect(BackendPreference::Sysfs, Some(dir.path())).unwrap();
    assert_eq!(backend.kind(), "sysfs");
    assert!(backend.enumerate().unwrap().is_empty());
}

#[test]
fn explicit_choice_never_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent");

    for preference in [BackendPreference::Efivarfs, BackendPreference::Sysfs] {
        match Backend::detect(preference, Some(&absent)) {
            Err(StoreError::NotFound { path }) => assert_eq!(path, absent),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }
}

#[test]
fn auto_with_explicit_root_stays_on_that_root() {
    let dir = tempfile::tempdir().unwrap();
    let absent = dir.path().join("absent");

    match Backend::detect(BackendPreference::Auto, Some(&absent)) {
        Err(StoreError::NotFound { path }) => assert_eq!(path, absent),
        other => panic!("expected NotFound, got {other:?}"),
    }
}
