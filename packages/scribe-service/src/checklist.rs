use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{NoteResponse, Result, ScribeService, notes::reload_note};
use scribe_domain::content::NoteContent;
use scribe_storage::{clock, notes};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToggleCheckRequest {
	pub note_id: Uuid,
	pub editor_id: String,
	pub block_index: usize,
	pub item_index: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToggleCheckResponse {
	pub checked: bool,
	pub note: NoteResponse,
}

impl ScribeService {
	/// Flips one checklist item. Toggles are frequent and are not archived as versions.
	pub async fn toggle_check(&self, req: ToggleCheckRequest) -> Result<ToggleCheckResponse> {
		let editor_id = crate::required_id(&req.editor_id, "editor_id")?;
		let policy = self.lease_policy();
		let mut tx = self.db.pool.begin().await?;
		let mut note = notes::fetch_note_for_write(&mut *tx, req.note_id).await?;
		let now = clock::now(&mut *tx).await?;

		crate::ensure_visible(&note, editor_id)?;
		crate::ensure_writable(&note, editor_id, &policy, now)?;

		let mut content = NoteContent::from_value(note.content.clone())?;
		let checked = content.toggle_check(req.block_index, req.item_index)?;

		note.content = content.to_value();
		note.last_editor_id = Some(editor_id.to_string());
		note.updated_at = crate::next_updated_at(note.updated_at, now);

		notes::update_note(&mut *tx, &note).await?;

		tx.commit().await?;

		let note = reload_note(self, note.note_id).await?;

		Ok(ToggleCheckResponse { checked, note })
	}
}
