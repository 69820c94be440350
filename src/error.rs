use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AfsError {
    #[error("Not logged in. Run 'afs login --password <password>' first.")]
    NotAuthenticated,

    #[error("Access denied: incorrect password.")]
    IncorrectPassword,

    #[error("Missing required field '{0}'. Fill it in before exporting the receipt.")]
    MissingField(&'static str),

    #[error("No items specified. Use --item <description>:<rate>:<qty> to add line items.")]
    NoItems,

    #[error("Invalid item format '{0}'. Expected 'description:rate:qty' (e.g., 'Transport:13500:1')")]
    InvalidItemFormat(String),

    #[error("Invalid rate '{rate}' for item '{item}': must be a non-negative number")]
    InvalidRate { item: String, rate: String },

    #[error("Invalid quantity '{qty}' for item '{item}': {reason}")]
    InvalidQuantity {
        item: String,
        qty: String,
        reason: String,
    },

    #[error("Invalid item index {index}. The draft has {count} item(s); use 'show' to list them.")]
    InvalidItemIndex { index: usize, count: usize },

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("Unknown payment method '{0}'. Use cash, bank-transfer, card, or cheque.")]
    InvalidPaymentMethod(String),

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("Could not open '{path}' with the system viewer: {reason}")]
    ViewerUnavailable { path: PathBuf, reason: String },

    #[error("Failed to save draft: {0}")]
    DraftSave(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AfsError>;
