use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Note {
	pub note_id: Uuid,
	pub campaign_id: String,
	pub owner_id: String,
	pub entity_id: Option<String>,
	pub title: String,
	pub content: Value,
	pub content_html: Option<String>,
	pub color: String,
	pub pinned: bool,
	pub shared: bool,
	pub last_editor_id: Option<String>,
	pub lock_holder: Option<String>,
	pub lock_acquired_at: Option<OffsetDateTime>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NoteVersion {
	pub version_id: Uuid,
	pub version_seq: i64,
	pub note_id: Uuid,
	pub editor_id: String,
	pub title: String,
	pub content: Value,
	pub content_html: Option<String>,
	pub created_at: OffsetDateTime,
}
