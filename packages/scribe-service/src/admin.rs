//! Operator entry points. They skip the visibility rule, so only trusted callers may reach them.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ListVersionsResponse, LockResponse, Result, ScribeService};
use scribe_storage::{clock, notes, versions};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PruneVersionsResponse {
	pub note_id: Uuid,
	pub pruned: u64,
	pub remaining: i64,
}

impl ScribeService {
	pub async fn admin_lock_status(&self, note_id: Uuid) -> Result<LockResponse> {
		let note = notes::fetch_note(&self.db.pool, note_id).await?;
		let now = clock::now(&self.db.pool).await?;
		let state = crate::lock_state(&note)?;

		Ok(LockResponse::from_state(note_id, &state, None, &self.lease_policy(), now))
	}

	pub async fn admin_list_versions(
		&self,
		note_id: Uuid,
		limit: Option<u32>,
	) -> Result<ListVersionsResponse> {
		let limit = self.version_list_limit(limit)?;

		notes::fetch_note(&self.db.pool, note_id).await?;

		self.collect_versions(note_id, limit).await
	}

	/// Trims a note's archive to the configured retention, e.g. after lowering it.
	pub async fn admin_prune_versions(&self, note_id: Uuid) -> Result<PruneVersionsResponse> {
		notes::fetch_note(&self.db.pool, note_id).await?;

		let pruned =
			versions::prune_versions(&self.db.pool, note_id, self.cfg.notes.version_retention)
				.await?;
		let remaining = versions::count_versions(&self.db.pool, note_id).await?;

		if pruned > 0 {
			tracing::info!(%note_id, pruned, remaining, "Pruned archived note versions.");
		}

		Ok(PruneVersionsResponse { note_id, pruned, remaining })
	}
}
