use thiserror::Error;

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),

    #[error("roster is not a valid xlsx archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("malformed workbook xml in {part}: {message}")]
    Xml { part: String, message: String },

    #[error("workbook has {count} sheet(s), no sheet at position {index}")]
    SheetOutOfRange { index: usize, count: usize },

    #[error("roster header row has no phone number column")]
    MissingPhoneColumn,
}

impl DirectoryError {
    pub(crate) fn xml(part: &str, err: impl std::fmt::Display) -> Self {
        Self::Xml {
            part: part.to_string(),
            message: err.to_string(),
        }
    }
}
