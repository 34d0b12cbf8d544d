use serde_json::Value;
use sqlx::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, models::NoteVersion};

const VERSION_COLUMNS: &str = "\
version_id,
	version_seq,
	note_id,
	editor_id,
	title,
	content,
	content_html,
	created_at";

pub struct InsertVersionArgs<'a> {
	pub version_id: Uuid,
	pub note_id: Uuid,
	pub editor_id: &'a str,
	pub title: &'a str,
	pub content: &'a Value,
	pub content_html: Option<&'a str>,
	pub created_at: OffsetDateTime,
}

pub async fn insert_version<'e, E>(executor: E, args: InsertVersionArgs<'_>) -> Result<()>
where
	E: PgExecutor<'e>,
{
	let InsertVersionArgs { version_id, note_id, editor_id, title, content, content_html, created_at } =
		args;

	sqlx::query(
		"\
INSERT INTO note_versions (
	version_id,
	note_id,
	editor_id,
	title,
	content,
	content_html,
	created_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7)",
	)
	.bind(version_id)
	.bind(note_id)
	.bind(editor_id)
	.bind(title)
	.bind(content)
	.bind(content_html)
	.bind(created_at)
	.execute(executor)
	.await?;

	Ok(())
}

/// Deletes every version of a note beyond the newest `keep`. Returns the number deleted.
pub async fn prune_versions<'e, E>(executor: E, note_id: Uuid, keep: u32) -> Result<u64>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
DELETE FROM note_versions
WHERE version_id IN (
	SELECT version_id
	FROM note_versions
	WHERE note_id = $1
	ORDER BY created_at DESC, version_seq DESC
	OFFSET $2
)",
	)
	.bind(note_id)
	.bind(i64::from(keep))
	.execute(executor)
	.await?;

	Ok(result.rows_affected())
}

/// Newest first.
pub async fn list_versions<'e, E>(executor: E, note_id: Uuid, limit: u32) -> Result<Vec<NoteVersion>>
where
	E: PgExecutor<'e>,
{
	let sql = format!(
		"SELECT {VERSION_COLUMNS}\nFROM note_versions\nWHERE note_id = $1\nORDER BY created_at DESC, version_seq DESC\nLIMIT $2"
	);

	Ok(sqlx::query_as::<_, NoteVersion>(&sql)
		.bind(note_id)
		.bind(i64::from(limit))
		.fetch_all(executor)
		.await?)
}

pub async fn fetch_version<'e, E>(executor: E, version_id: Uuid) -> Result<NoteVersion>
where
	E: PgExecutor<'e>,
{
	let sql = format!("SELECT {VERSION_COLUMNS}\nFROM note_versions\nWHERE version_id = $1");

	sqlx::query_as::<_, NoteVersion>(&sql)
		.bind(version_id)
		.fetch_optional(executor)
		.await?
		.ok_or_else(|| Error::NotFound(format!("version {version_id}")))
}

pub async fn count_versions<'e, E>(executor: E, note_id: Uuid) -> Result<i64>
where
	E: PgExecutor<'e>,
{
	Ok(sqlx::query_scalar("SELECT count(*) FROM note_versions WHERE note_id = $1")
		.bind(note_id)
		.fetch_one(executor)
		.await?)
}
