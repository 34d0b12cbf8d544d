pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("{0} is not a valid Postgres DSN: {1}")]
	InvalidDsn(&'static str, sqlx::Error),
	#[error("No admin database reachable: {0}")]
	AdminUnreachable(sqlx::Error),
	#[error("Failed to {action} test database {name}: {source}")]
	Database { action: &'static str, name: String, source: sqlx::Error },
}
