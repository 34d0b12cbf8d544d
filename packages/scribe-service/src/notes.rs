use serde::{Deserialize, Serialize};
use sqlx::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, Result, ScribeService};
use scribe_domain::content::NoteContent;
use scribe_storage::{models::Note, notes};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetNoteRequest {
	pub note_id: Uuid,
	pub requester_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NoteResponse {
	pub note_id: Uuid,
	pub campaign_id: String,
	pub owner_id: String,
	pub entity_id: Option<String>,
	pub title: String,
	pub content: NoteContent,
	pub content_html: Option<String>,
	pub color: String,
	pub pinned: bool,
	pub shared: bool,
	pub last_editor_id: Option<String>,
	pub lock_holder: Option<String>,
	#[serde(with = "time::serde::rfc3339::option")]
	pub lock_acquired_at: Option<OffsetDateTime>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
	#[serde(with = "time::serde::rfc3339")]
	pub updated_at: OffsetDateTime,
}
impl TryFrom<Note> for NoteResponse {
	type Error = Error;

	fn try_from(note: Note) -> Result<Self> {
		let content = NoteContent::from_value(note.content).map_err(|err| Error::Storage {
			message: format!("Stored content of note {} is invalid: {err}", note.note_id),
		})?;

		Ok(Self {
			note_id: note.note_id,
			campaign_id: note.campaign_id,
			owner_id: note.owner_id,
			entity_id: note.entity_id,
			title: note.title,
			content,
			content_html: note.content_html,
			color: note.color,
			pinned: note.pinned,
			shared: note.shared,
			last_editor_id: note.last_editor_id,
			lock_holder: note.lock_holder,
			lock_acquired_at: note.lock_acquired_at,
			created_at: note.created_at,
			updated_at: note.updated_at,
		})
	}
}

impl ScribeService {
	pub async fn get_note(&self, req: GetNoteRequest) -> Result<NoteResponse> {
		let requester_id = crate::required_id(&req.requester_id, "requester_id")?;
		let note = load_visible_note(&self.db.pool, req.note_id, requester_id).await?;

		NoteResponse::try_from(note)
	}
}

/// Loads a note without a row lock and applies the visibility rule.
pub(crate) async fn load_visible_note<'e, E>(
	executor: E,
	note_id: Uuid,
	requester_id: &str,
) -> Result<Note>
where
	E: PgExecutor<'e>,
{
	let note = notes::fetch_note(executor, note_id).await?;

	crate::ensure_visible(&note, requester_id)?;

	Ok(note)
}

/// Re-reads a note after its transaction committed.
pub(crate) async fn reload_note(service: &ScribeService, note_id: Uuid) -> Result<NoteResponse> {
	let note = notes::fetch_note(&service.db.pool, note_id).await?;

	NoteResponse::try_from(note)
}
