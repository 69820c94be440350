pub mod company;
pub mod document;
pub mod error;
pub mod export;
pub mod render;
pub mod session;
pub mod store;

pub use error::{AfsError, Result};
