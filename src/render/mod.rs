pub mod html;
pub mod ops;

pub use html::render_html;
pub use ops::{layout, Align, DrawOp, FontStyle, Rgb};
