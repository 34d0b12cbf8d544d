use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{Error, NoteResponse, Result, ScribeService, notes::reload_note};
use scribe_domain::{content::NoteContent, fields};
use scribe_storage::{clock, notes};

/// Partial update. Absent fields keep their stored value.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateNoteRequest {
	pub note_id: Uuid,
	pub editor_id: String,
	pub title: Option<String>,
	pub content: Option<Value>,
	/// A blank mirror clears the stored one.
	pub content_html: Option<String>,
	pub color: Option<String>,
	pub pinned: Option<bool>,
	pub shared: Option<bool>,
	/// A blank id detaches the note from its subject entity.
	pub entity_id: Option<String>,
}
impl UpdateNoteRequest {
	fn has_changes(&self) -> bool {
		self.title.is_some()
			|| self.content.is_some()
			|| self.content_html.is_some()
			|| self.color.is_some()
			|| self.pinned.is_some()
			|| self.shared.is_some()
			|| self.entity_id.is_some()
	}
}

impl ScribeService {
	pub async fn update_note(&self, req: UpdateNoteRequest) -> Result<NoteResponse> {
		let editor_id = crate::required_id(&req.editor_id, "editor_id")?;

		if !req.has_changes() {
			return Err(Error::BadRequest { message: "No updates provided.".to_string() });
		}

		let cfg = &self.cfg.notes;
		let next_title = req
			.title
			.as_deref()
			.map(|title| {
				fields::normalize_title(Some(title), &cfg.default_title, cfg.max_title_chars)
			})
			.transpose()?;
		let next_color = req
			.color
			.as_deref()
			.map(|color| fields::normalize_color(Some(color), &cfg.default_color))
			.transpose()?;
		let next_content =
			req.content.map(|value| NoteContent::from_value(value).map(|content| content.to_value()));
		let next_content = next_content.transpose()?;
		let policy = self.lease_policy();
		let mut tx = self.db.pool.begin().await?;
		let mut note = notes::fetch_note_for_write(&mut *tx, req.note_id).await?;
		let now = clock::now(&mut *tx).await?;

		crate::ensure_visible(&note, editor_id)?;
		crate::ensure_writable(&note, editor_id, &policy, now)?;

		self.snapshot_best_effort(&mut tx, &note, editor_id, now).await;

		if let Some(title) = next_title {
			note.title = title;
		}
		if let Some(content) = next_content {
			note.content = content;
		}
		if let Some(html) = req.content_html.as_deref() {
			note.content_html = self.clean_html(Some(html));
		}
		if let Some(color) = next_color {
			note.color = color;
		}
		if let Some(pinned) = req.pinned {
			note.pinned = pinned;
		}
		if let Some(shared) = req.shared {
			note.shared = shared;
		}
		if let Some(entity_id) = req.entity_id.as_deref() {
			note.entity_id = fields::optional_id(Some(entity_id));
		}

		note.last_editor_id = Some(editor_id.to_string());
		note.updated_at = crate::next_updated_at(note.updated_at, now);

		notes::update_note(&mut *tx, &note).await?;

		tx.commit().await?;

		reload_note(self, note.note_id).await
	}
}
