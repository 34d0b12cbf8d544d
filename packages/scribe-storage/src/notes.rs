use sqlx::{PgConnection, PgExecutor, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{Error, Result, models::Note};

const NOTE_COLUMNS: &str = "\
note_id,
	campaign_id,
	owner_id,
	entity_id,
	title,
	content,
	content_html,
	color,
	pinned,
	shared,
	last_editor_id,
	lock_holder,
	lock_acquired_at,
	created_at,
	updated_at";

/// Which subject-entity slice of a campaign a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityFilter<'a> {
	/// Every note in the campaign.
	Any,
	/// Campaign-wide notes that are not attached to a subject entity.
	Unattached,
	/// Notes attached to one subject entity.
	Only(&'a str),
}

#[derive(Debug, Clone, Copy)]
pub struct VisibilityFilter<'a> {
	pub campaign_id: &'a str,
	pub requester_id: &'a str,
	pub entity: EntityFilter<'a>,
}

pub async fn insert_note<'e, E>(executor: E, note: &Note) -> Result<()>
where
	E: PgExecutor<'e>,
{
	sqlx::query(
		"\
INSERT INTO notes (
	note_id,
	campaign_id,
	owner_id,
	entity_id,
	title,
	content,
	content_html,
	color,
	pinned,
	shared,
	last_editor_id,
	lock_holder,
	lock_acquired_at,
	created_at,
	updated_at
)
VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, NULL, NULL, $12, $13)",
	)
	.bind(note.note_id)
	.bind(note.campaign_id.as_str())
	.bind(note.owner_id.as_str())
	.bind(note.entity_id.as_deref())
	.bind(note.title.as_str())
	.bind(&note.content)
	.bind(note.content_html.as_deref())
	.bind(note.color.as_str())
	.bind(note.pinned)
	.bind(note.shared)
	.bind(note.last_editor_id.as_deref())
	.bind(note.created_at)
	.bind(note.updated_at)
	.execute(executor)
	.await?;

	Ok(())
}

pub async fn fetch_note<'e, E>(executor: E, note_id: Uuid) -> Result<Note>
where
	E: PgExecutor<'e>,
{
	let sql = format!("SELECT {NOTE_COLUMNS}\nFROM notes\nWHERE note_id = $1");

	sqlx::query_as::<_, Note>(&sql)
		.bind(note_id)
		.fetch_optional(executor)
		.await?
		.ok_or_else(|| Error::NotFound(format!("note {note_id}")))
}

/// Loads a note and holds its row lock until the surrounding transaction ends.
///
/// `FOR NO KEY UPDATE` serializes writers and lock statements on the row while still allowing
/// version rows that reference the note to be inserted from the same transaction.
pub async fn fetch_note_for_write(conn: &mut PgConnection, note_id: Uuid) -> Result<Note> {
	let sql = format!("SELECT {NOTE_COLUMNS}\nFROM notes\nWHERE note_id = $1\nFOR NO KEY UPDATE");

	sqlx::query_as::<_, Note>(&sql)
		.bind(note_id)
		.fetch_optional(conn)
		.await?
		.ok_or_else(|| Error::NotFound(format!("note {note_id}")))
}

/// Replaces every mutable column of a note. Lock columns are owned by [`crate::locks`].
pub async fn update_note<'e, E>(executor: E, note: &Note) -> Result<()>
where
	E: PgExecutor<'e>,
{
	let result = sqlx::query(
		"\
UPDATE notes
SET
	entity_id = $1,
	title = $2,
	content = $3,
	content_html = $4,
	color = $5,
	pinned = $6,
	shared = $7,
	last_editor_id = $8,
	updated_at = $9
WHERE note_id = $10",
	)
	.bind(note.entity_id.as_deref())
	.bind(note.title.as_str())
	.bind(&note.content)
	.bind(note.content_html.as_deref())
	.bind(note.color.as_str())
	.bind(note.pinned)
	.bind(note.shared)
	.bind(note.last_editor_id.as_deref())
	.bind(note.updated_at)
	.bind(note.note_id)
	.execute(executor)
	.await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound(format!("note {}", note.note_id)));
	}

	Ok(())
}

pub async fn delete_note<'e, E>(executor: E, note_id: Uuid) -> Result<()>
where
	E: PgExecutor<'e>,
{
	let result =
		sqlx::query("DELETE FROM notes WHERE note_id = $1").bind(note_id).execute(executor).await?;

	if result.rows_affected() == 0 {
		return Err(Error::NotFound(format!("note {note_id}")));
	}

	Ok(())
}

/// Notes the requester may see: their own plus every shared note of the campaign.
pub async fn list_visible_notes<'e, E>(executor: E, filter: VisibilityFilter<'_>) -> Result<Vec<Note>>
where
	E: PgExecutor<'e>,
{
	if filter.campaign_id.trim().is_empty() {
		return Err(Error::InvalidArgument("campaign_id must be non-empty.".to_string()));
	}

	let mut builder: QueryBuilder<'_, Postgres> =
		QueryBuilder::new(format!("SELECT {NOTE_COLUMNS}\nFROM notes\nWHERE campaign_id = "));

	builder.push_bind(filter.campaign_id);
	builder.push(" AND (owner_id = ");
	builder.push_bind(filter.requester_id);
	builder.push(" OR shared)");

	match filter.entity {
		EntityFilter::Any => {},
		EntityFilter::Unattached => {
			builder.push(" AND entity_id IS NULL");
		},
		EntityFilter::Only(entity_id) => {
			builder.push(" AND entity_id = ");
			builder.push_bind(entity_id);
		},
	}

	builder.push(" ORDER BY pinned DESC, updated_at DESC, note_id");

	Ok(builder.build_query_as::<Note>().fetch_all(executor).await?)
}
