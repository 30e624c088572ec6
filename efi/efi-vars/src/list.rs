use crate::store::{StoreError, VariableStore};
use crate::variable::Variable;

/// All readable variables of one store, in enumeration order.
///
/// The order follows the store's sorted listing and carries no meaning;
/// boot priority lives in `BootOrder`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct VariableList {
    entries: Vec<Variable>,
}

impl VariableList {
    /// Reads every variable `store` enumerates.
    ///
    /// Entries that fail to read are logged and left out.
    ///
    /// # Errors
    /// Fails only if the store cannot be enumerated at all.
    pub fn load<S>(store: &S) -> Result<Self, StoreError>
    where
        S: VariableStore + ?Sized,
    {
        let names = store.enumerate()?;
        log::debug!(
            "{} entries under {}",
            names.len(),
            store.root().display()
        );

        let mut entries = Vec::with_capacity(names.len());
        for name in names {
            match store.read(&name) {
                Ok(var) => entries.push(var),
                Err(e) => log::warn!("Skipping {name}: {e}"),
            }
        }

        Ok(Self { entries })
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Variable> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn iter(&self) -> core::slice::Iter<'_, Variable> {
        self.entries.iter()
    }
}

impl FromIterator<Variable> for VariableList {
    fn from_iter<I: IntoIterator<Item = Variable>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for VariableList {
    type Item = Variable;
    type IntoIter = std::vec::IntoIter<Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a VariableList {
    type Item = &'a Variable;
    type IntoIter = core::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
