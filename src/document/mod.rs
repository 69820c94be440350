pub mod calc;
mod model;

pub use calc::ItemField;
pub use model::{Billing, Detail, DocKind, Document, LineItem, PaymentMethod, ReceiptDetail};
