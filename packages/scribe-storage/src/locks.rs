//! Edit lock statements.
//!
//! Each operation is one statement: the conditional `UPDATE` runs in a data-modifying CTE and the
//! outer `SELECT` reports whether the note exists and whether the update took effect. Concurrent
//! callers therefore race on the row lock inside Postgres, and the loser re-evaluates the
//! predicate against the winner's committed row. Lease times are read from the database clock.

use sqlx::PgExecutor;
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use crate::{Error, Result};

pub const LOCK_CONFLICT_MESSAGE: &str = "Note is currently being edited by another user.";
pub const LOCK_NOT_HELD_MESSAGE: &str = "Lock not held by this user.";

/// A successful acquire: the new lease start plus the lock columns as they were just before.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockClaim {
	pub acquired_at: OffsetDateTime,
	pub previous_holder: Option<String>,
	pub previous_acquired_at: Option<OffsetDateTime>,
}

/// Takes the lock for `requester` if the note is unlocked, already held by `requester`, or held
/// under a lease older than `stale_after`.
pub async fn acquire_lock<'e, E>(
	executor: E,
	note_id: Uuid,
	requester: &str,
	stale_after: Duration,
) -> Result<LockClaim>
where
	E: PgExecutor<'e>,
{
	let (found, acquired_at, previous_holder, previous_acquired_at): (
		bool,
		Option<OffsetDateTime>,
		Option<String>,
		Option<OffsetDateTime>,
	) = sqlx::query_as(
		"\
WITH prior AS (
	SELECT lock_holder, lock_acquired_at
	FROM notes
	WHERE note_id = $1
),
claimed AS (
	UPDATE notes
	SET
		lock_holder = $2,
		lock_acquired_at = now()
	WHERE note_id = $1
		AND (
			lock_holder IS NULL
			OR lock_holder = $2
			OR lock_acquired_at < now() - make_interval(secs => $3)
		)
	RETURNING lock_acquired_at
)
SELECT
	EXISTS (SELECT 1 FROM prior) AS found,
	(SELECT lock_acquired_at FROM claimed) AS acquired_at,
	(SELECT lock_holder FROM prior) AS previous_holder,
	(SELECT lock_acquired_at FROM prior) AS previous_acquired_at",
	)
	.bind(note_id)
	.bind(requester)
	.bind(stale_after.as_seconds_f64())
	.fetch_one(executor)
	.await?;

	if !found {
		return Err(Error::NotFound(format!("note {note_id}")));
	}

	let Some(acquired_at) = acquired_at else {
		return Err(Error::Conflict(LOCK_CONFLICT_MESSAGE.to_string()));
	};

	Ok(LockClaim { acquired_at, previous_holder, previous_acquired_at })
}

/// Clears the lock only when `requester` holds it. Returns whether anything was cleared.
pub async fn release_lock<'e, E>(executor: E, note_id: Uuid, requester: &str) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let (found, released): (bool, bool) = sqlx::query_as(
		"\
WITH released AS (
	UPDATE notes
	SET
		lock_holder = NULL,
		lock_acquired_at = NULL
	WHERE note_id = $1 AND lock_holder = $2
	RETURNING note_id
)
SELECT
	EXISTS (SELECT 1 FROM notes WHERE note_id = $1) AS found,
	EXISTS (SELECT 1 FROM released) AS released",
	)
	.bind(note_id)
	.bind(requester)
	.fetch_one(executor)
	.await?;

	if !found {
		return Err(Error::NotFound(format!("note {note_id}")));
	}

	Ok(released)
}

/// Clears the lock whoever holds it. Returns the evicted holder, if any.
pub async fn force_release_lock<'e, E>(executor: E, note_id: Uuid) -> Result<Option<String>>
where
	E: PgExecutor<'e>,
{
	let (found, previous_holder): (bool, Option<String>) = sqlx::query_as(
		"\
WITH prior AS (
	SELECT lock_holder
	FROM notes
	WHERE note_id = $1
),
cleared AS (
	UPDATE notes
	SET
		lock_holder = NULL,
		lock_acquired_at = NULL
	WHERE note_id = $1
	RETURNING note_id
)
SELECT
	EXISTS (SELECT 1 FROM cleared) AS found,
	(SELECT lock_holder FROM prior) AS previous_holder",
	)
	.bind(note_id)
	.fetch_one(executor)
	.await?;

	if !found {
		return Err(Error::NotFound(format!("note {note_id}")));
	}

	Ok(previous_holder)
}

/// Renews the lease of the current holder and returns the new lease start. Anyone else gets a
/// conflict.
pub async fn heartbeat_lock<'e, E>(
	executor: E,
	note_id: Uuid,
	requester: &str,
) -> Result<OffsetDateTime>
where
	E: PgExecutor<'e>,
{
	let (found, renewed_at): (bool, Option<OffsetDateTime>) = sqlx::query_as(
		"\
WITH renewed AS (
	UPDATE notes
	SET lock_acquired_at = now()
	WHERE note_id = $1 AND lock_holder = $2
	RETURNING lock_acquired_at
)
SELECT
	EXISTS (SELECT 1 FROM notes WHERE note_id = $1) AS found,
	(SELECT lock_acquired_at FROM renewed) AS renewed_at",
	)
	.bind(note_id)
	.bind(requester)
	.fetch_one(executor)
	.await?;

	if !found {
		return Err(Error::NotFound(format!("note {note_id}")));
	}

	renewed_at.ok_or_else(|| Error::Conflict(LOCK_NOT_HELD_MESSAGE.to_string()))
}
