pub mod content;
pub mod fields;
pub mod lease;
pub mod sanitize;

mod error;

pub use error::{Error, Result};
