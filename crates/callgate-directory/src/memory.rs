use crate::error::DirectoryError;
use crate::{ContactDirectory, ContactSet};
use callgate_types::ContactRecord;
use std::sync::{Arc, RwLock};

/// Directory held entirely in memory.
///
/// `reload` is a no-op; contents change only through [`MemoryDirectory::replace`].
#[derive(Debug, Default)]
pub struct MemoryDirectory {
    contacts: RwLock<Arc<ContactSet>>,
}

impl MemoryDirectory {
    pub fn new(records: impl IntoIterator<Item = ContactRecord>) -> Self {
        Self {
            contacts: RwLock::new(Arc::new(ContactSet::from_records(records))),
        }
    }

    /// Swaps in a new set of records.
    pub fn replace(&self, records: impl IntoIterator<Item = ContactRecord>) {
        let set = Arc::new(ContactSet::from_records(records));
        match self.contacts.write() {
            Ok(mut guard) => *guard = set,
            Err(poisoned) => *poisoned.into_inner() = set,
        }
    }

    fn snapshot(&self) -> Arc<ContactSet> {
        match self.contacts.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}

impl ContactDirectory for MemoryDirectory {
    fn lookup(&self, phone_number: &str) -> Option<ContactRecord> {
        self.snapshot().get(phone_number.trim()).cloned()
    }

    fn phone_numbers(&self) -> Vec<String> {
        self.snapshot().phone_numbers().to_vec()
    }

    fn reload(&self) -> Result<usize, DirectoryError> {
        Ok(self.snapshot().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replace_swaps_whole_set() {
        let directory = MemoryDirectory::new([
            ContactRecord::builder("+1555000001").build(),
            ContactRecord::builder("+1555000002").build(),
        ]);
        directory.replace([ContactRecord::builder("+1555000003").build()]);

        assert_eq!(directory.phone_numbers(), vec!["+1555000003"]);
        assert!(directory.lookup("+1555000001").is_none());
        assert_eq!(directory.len(), 1);
    }
}
