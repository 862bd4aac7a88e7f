//! Roster loaded from an `.xlsx` workbook.

use crate::columns::records_from_rows;
use crate::error::DirectoryError;
use crate::{xlsx, ContactDirectory, ContactSet};
use callgate_types::ContactRecord;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Contact directory backed by one sheet of a spreadsheet file.
///
/// The loaded set sits behind `RwLock<Arc<ContactSet>>`: readers clone the
/// `Arc` and release the lock immediately, and a reload swaps the whole set
/// in one write. Lock hold times are a pointer copy, so a synchronous lock is
/// used rather than `tokio::sync::RwLock`.
#[derive(Debug)]
pub struct SpreadsheetDirectory {
    source: PathBuf,
    sheet_index: usize,
    contacts: RwLock<Arc<ContactSet>>,
}

impl SpreadsheetDirectory {
    /// Creates an empty directory for `source` without reading it.
    pub fn new(source: impl AsRef<Path>, sheet_index: usize) -> Self {
        Self {
            source: source.as_ref().to_path_buf(),
            sheet_index,
            contacts: RwLock::new(Arc::new(ContactSet::default())),
        }
    }

    /// Creates the directory and loads it once.
    ///
    /// Load failures are logged and leave the directory empty; the gateway
    /// still serves inbound calls without a roster.
    pub fn load(source: impl AsRef<Path>, sheet_index: usize) -> Self {
        let directory = Self::new(source, sheet_index);
        match directory.reload() {
            Ok(count) => tracing::info!(
                path = %directory.source.display(),
                sheet_index,
                count,
                "loaded contact directory"
            ),
            Err(e) => tracing::error!(
                path = %directory.source.display(),
                sheet_index,
                error = %e,
                "failed to load contact directory, continuing with an empty roster"
            ),
        }
        directory
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    fn snapshot(&self) -> Arc<ContactSet> {
        match self.contacts.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn replace(&self, set: ContactSet) {
        let set = Arc::new(set);
        match self.contacts.write() {
            Ok(mut guard) => *guard = set,
            Err(poisoned) => *poisoned.into_inner() = set,
        }
    }

    fn read_source(&self) -> Result<Option<ContactSet>, DirectoryError> {
        let file = match File::open(&self.source) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let rows = xlsx::read_sheet(BufReader::new(file), self.sheet_index)?;
        let records = records_from_rows(&rows)?;
        Ok(Some(ContactSet::from_records(records)))
    }
}

impl ContactDirectory for SpreadsheetDirectory {
    fn lookup(&self, phone_number: &str) -> Option<ContactRecord> {
        self.snapshot().get(phone_number.trim()).cloned()
    }

    fn phone_numbers(&self) -> Vec<String> {
        self.snapshot().phone_numbers().to_vec()
    }

    fn len(&self) -> usize {
        self.snapshot().len()
    }

    /// Re-reads the workbook.
    ///
    /// A missing file empties the directory. Any other failure leaves the
    /// current contents untouched and is returned.
    fn reload(&self) -> Result<usize, DirectoryError> {
        match self.read_source()? {
            Some(set) => {
                let count = set.len();
                self.replace(set);
                Ok(count)
            }
            None => {
                tracing::warn!(
                    path = %self.source.display(),
                    "contact directory source not found, roster is empty"
                );
                self.replace(ContactSet::default());
                Ok(0)
            }
        }
    }
}
