pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Bad request: {message}")]
	BadRequest { message: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}

impl From<scribe_storage::Error> for Error {
	fn from(err: scribe_storage::Error) -> Self {
		match err {
			scribe_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			scribe_storage::Error::InvalidArgument(message) => Self::BadRequest { message },
			scribe_storage::Error::NotFound(message) => Self::NotFound { message },
			scribe_storage::Error::Conflict(message) => Self::Conflict { message },
		}
	}
}

impl From<scribe_domain::Error> for Error {
	fn from(err: scribe_domain::Error) -> Self {
		match err {
			scribe_domain::Error::TornLock => Self::Storage { message: err.to_string() },
			other => Self::BadRequest { message: other.to_string() },
		}
	}
}
