use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Result, ScribeService};
use scribe_storage::{clock, notes};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteNoteRequest {
	pub note_id: Uuid,
	pub requester_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteNoteResponse {
	pub note_id: Uuid,
	pub deleted: bool,
}

impl ScribeService {
	/// Hard delete. Archived versions go with the note.
	pub async fn delete_note(&self, req: DeleteNoteRequest) -> Result<DeleteNoteResponse> {
		let requester_id = crate::required_id(&req.requester_id, "requester_id")?;
		let policy = self.lease_policy();
		let mut tx = self.db.pool.begin().await?;
		let note = notes::fetch_note_for_write(&mut *tx, req.note_id).await?;
		let now = clock::now(&mut *tx).await?;

		crate::ensure_visible(&note, requester_id)?;
		crate::ensure_writable(&note, requester_id, &policy, now)?;

		notes::delete_note(&mut *tx, note.note_id).await?;

		tx.commit().await?;

		tracing::info!(note_id = %note.note_id, requester_id, "Deleted note.");

		Ok(DeleteNoteResponse { note_id: note.note_id, deleted: true })
	}
}
