//! Lookup tables used to turn references into display names.

use std::collections::HashMap;

use api_types::{Id, Identified, Reference};

/// Index of fetched records by id.
///
/// A reference resolves to the directory entry first, then to the name
/// embedded in the reference, then to the raw id.
#[derive(Clone, Debug)]
pub struct Directory<T> {
    entries: HashMap<Id, T>,
}

impl<T> Default for Directory<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Identified> Directory<T> {
    pub fn new(records: impl IntoIterator<Item = T>) -> Self {
        let entries = records
            .into_iter()
            .map(|record| (record.id().clone(), record))
            .collect();
        Self { entries }
    }

    pub fn get(&self, id: &Id) -> Option<&T> {
        self.entries.get(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display name for a reference.
    pub fn name_of<R: Identified>(&self, reference: &Reference<R>) -> String {
        self.get(reference.id())
            .and_then(Identified::label)
            .or_else(|| reference.label())
            .map(ToString::to_string)
            .unwrap_or_else(|| reference.id().to_string())
    }

    /// Display name for an optional reference, empty when absent.
    pub fn name_of_opt<R: Identified>(&self, reference: Option<&Reference<R>>) -> String {
        reference.map(|r| self.name_of(r)).unwrap_or_default()
    }
}

pub type AccountDirectory = Directory<api_types::account::Account>;
pub type CategoryDirectory = Directory<api_types::category::Category>;
