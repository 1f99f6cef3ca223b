// ⚠️ Receipt errors - fatal failures while reading a hand receipt
//
// Field-level problems (bad dates, quantity mismatches) are NOT errors; they
// become ConsistencyWarnings and the parse keeps going. Anything here aborts
// the parse of one document.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiptError {
    /// A required cell or label is missing or cannot be interpreted
    #[error("Format error in {document}: {field} - {message}")]
    Format {
        document: String,
        field: String,
        message: String,
    },

    /// An entity was constructed with a blank identity field
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Unsupported document: {0}")]
    UnsupportedDocument(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReceiptError {
    pub fn format(
        document: impl Into<String>,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Format {
            document: document.into(),
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Name of the field a format error refers to, if any
    pub fn field(&self) -> Option<&str> {
        match self {
            ReceiptError::Format { field, .. } => Some(field),
            _ => None,
        }
    }

    pub fn is_format_error(&self) -> bool {
        matches!(self, ReceiptError::Format { .. })
    }
}

pub type Result<T> = std::result::Result<T, ReceiptError>;
