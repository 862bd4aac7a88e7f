//! Contact directory for the callgate gateway.
//!
//! The directory maps phone numbers to [`ContactRecord`]s. Production
//! deployments load it from the first sheet of an `.xlsx` roster at startup
//! ([`SpreadsheetDirectory`]); tests and embedders can use the in-memory
//! [`MemoryDirectory`]. Both sit behind the [`ContactDirectory`] trait so the
//! dispatcher and the webhook handlers never touch the filesystem directly.
//!
//! Contents are always replaced wholesale: a reader sees either the old
//! roster or the new one, never a mix.

pub mod columns;
pub mod error;
pub mod memory;
pub mod spreadsheet;
pub mod xlsx;

pub use callgate_types::ContactRecord;
pub use error::DirectoryError;
pub use memory::MemoryDirectory;
pub use spreadsheet::SpreadsheetDirectory;

use std::collections::HashMap;

/// Lookup interface over the loaded roster.
pub trait ContactDirectory: Send + Sync {
    /// Returns the record for `phone_number`, if one is loaded.
    fn lookup(&self, phone_number: &str) -> Option<ContactRecord>;

    /// Returns every known phone number in roster order.
    fn phone_numbers(&self) -> Vec<String>;

    /// Re-reads the backing source and swaps the contents in one step.
    ///
    /// Returns the number of records now loaded.
    fn reload(&self) -> Result<usize, DirectoryError>;

    fn len(&self) -> usize {
        self.phone_numbers().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// An immutable set of contacts keyed by phone number, in roster order.
#[derive(Debug, Clone, Default)]
pub struct ContactSet {
    order: Vec<String>,
    records: HashMap<String, ContactRecord>,
}

impl ContactSet {
    /// Builds a set from records in roster order.
    ///
    /// A phone number that appears twice keeps its first position, but the
    /// later record replaces the earlier one. Records with a blank phone
    /// number are skipped.
    pub fn from_records(records: impl IntoIterator<Item = ContactRecord>) -> Self {
        let mut set = Self::default();
        for record in records {
            if record.phone_number.is_empty() {
                continue;
            }
            if !set.records.contains_key(&record.phone_number) {
                set.order.push(record.phone_number.clone());
            }
            set.records.insert(record.phone_number.clone(), record);
        }
        set
    }

    pub fn get(&self, phone_number: &str) -> Option<&ContactRecord> {
        self.records.get(phone_number)
    }

    pub fn phone_numbers(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
