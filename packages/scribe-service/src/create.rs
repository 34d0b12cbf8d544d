use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{NoteResponse, Result, ScribeService, notes::reload_note};
use scribe_domain::{content::NoteContent, fields};
use scribe_storage::{clock, models::Note, notes};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateNoteRequest {
	pub campaign_id: String,
	pub owner_id: String,
	pub entity_id: Option<String>,
	pub title: Option<String>,
	/// Block array. Missing or `null` creates an empty note.
	pub content: Option<Value>,
	pub content_html: Option<String>,
	pub color: Option<String>,
	#[serde(default)]
	pub pinned: bool,
	#[serde(default)]
	pub shared: bool,
}

impl ScribeService {
	pub async fn create_note(&self, req: CreateNoteRequest) -> Result<NoteResponse> {
		let campaign_id = crate::required_id(&req.campaign_id, "campaign_id")?;
		let owner_id = crate::required_id(&req.owner_id, "owner_id")?;
		let cfg = &self.cfg.notes;
		let title =
			fields::normalize_title(req.title.as_deref(), &cfg.default_title, cfg.max_title_chars)?;
		let color = fields::normalize_color(req.color.as_deref(), &cfg.default_color)?;
		let content = NoteContent::from_value(req.content.unwrap_or(Value::Null))?;
		let now = clock::now(&self.db.pool).await?;
		let note = Note {
			note_id: Uuid::new_v4(),
			campaign_id: campaign_id.to_string(),
			owner_id: owner_id.to_string(),
			entity_id: fields::optional_id(req.entity_id.as_deref()),
			title,
			content: content.to_value(),
			content_html: self.clean_html(req.content_html.as_deref()),
			color,
			pinned: req.pinned,
			shared: req.shared,
			last_editor_id: Some(owner_id.to_string()),
			lock_holder: None,
			lock_acquired_at: None,
			created_at: now,
			updated_at: now,
		};

		notes::insert_note(&self.db.pool, &note).await?;

		reload_note(self, note.note_id).await
	}
}
