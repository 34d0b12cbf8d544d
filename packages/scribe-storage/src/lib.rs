pub mod clock;
pub mod db;
pub mod locks;
pub mod models;
pub mod notes;
pub mod schema;
pub mod versions;

mod error;

pub use error::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;
