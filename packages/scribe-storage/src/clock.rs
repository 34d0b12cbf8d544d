//! Database clock. Every caller shares it, so lease ages and write timestamps do not depend on the
//! clock of whichever process issued the request.

use sqlx::PgExecutor;
use time::OffsetDateTime;

use crate::Result;

/// Wall-clock time on the database server. Unlike `now()` it advances within a transaction, so a
/// writer that waited on a row lock sees the time after the wait.
pub async fn now<'e, E>(executor: E) -> Result<OffsetDateTime>
where
	E: PgExecutor<'e>,
{
	let now = sqlx::query_scalar("SELECT clock_timestamp()").fetch_one(executor).await?;

	Ok(now)
}
