pub mod driver;
pub mod pdf;

pub use driver::{export, open_path, Delivery};
pub use pdf::render_pdf;
