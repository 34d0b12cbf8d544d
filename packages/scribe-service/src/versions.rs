//! Version archive: best-effort snapshots, listing, and restore.

use serde::{Deserialize, Serialize};
use sqlx::{Postgres, Transaction};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Error, NoteResponse, Result, ScribeService, notes::reload_note};
use scribe_domain::content::NoteContent;
use scribe_storage::{
	clock,
	models::{Note, NoteVersion},
	notes, versions,
};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListVersionsRequest {
	pub note_id: Uuid,
	pub requester_id: String,
	pub limit: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListVersionsResponse {
	pub note_id: Uuid,
	pub items: Vec<VersionResponse>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GetVersionRequest {
	pub version_id: Uuid,
	pub requester_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RestoreVersionRequest {
	pub note_id: Uuid,
	pub version_id: Uuid,
	pub editor_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VersionResponse {
	pub version_id: Uuid,
	pub note_id: Uuid,
	pub editor_id: String,
	pub title: String,
	pub content: NoteContent,
	pub content_html: Option<String>,
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl TryFrom<NoteVersion> for VersionResponse {
	type Error = Error;

	fn try_from(version: NoteVersion) -> Result<Self> {
		let content = NoteContent::from_value(version.content).map_err(|err| Error::Storage {
			message: format!("Stored content of version {} is invalid: {err}", version.version_id),
		})?;

		Ok(Self {
			version_id: version.version_id,
			note_id: version.note_id,
			editor_id: version.editor_id,
			title: version.title,
			content,
			content_html: version.content_html,
			created_at: version.created_at,
		})
	}
}

impl ScribeService {
	pub async fn list_versions(&self, req: ListVersionsRequest) -> Result<ListVersionsResponse> {
		let requester_id = crate::required_id(&req.requester_id, "requester_id")?;
		let limit = self.version_list_limit(req.limit)?;
		let note =
			crate::notes::load_visible_note(&self.db.pool, req.note_id, requester_id).await?;

		self.collect_versions(note.note_id, limit).await
	}

	pub async fn get_version(&self, req: GetVersionRequest) -> Result<VersionResponse> {
		let requester_id = crate::required_id(&req.requester_id, "requester_id")?;
		let version = versions::fetch_version(&self.db.pool, req.version_id).await?;

		crate::notes::load_visible_note(&self.db.pool, version.note_id, requester_id).await?;

		VersionResponse::try_from(version)
	}

	/// Overwrites a note's title and content with one of its own snapshots.
	///
	/// The current state is archived first, so restoring is itself undoable.
	pub async fn restore_version(&self, req: RestoreVersionRequest) -> Result<NoteResponse> {
		let editor_id = crate::required_id(&req.editor_id, "editor_id")?;
		let policy = self.lease_policy();
		let mut tx = self.db.pool.begin().await?;
		let mut note = notes::fetch_note_for_write(&mut *tx, req.note_id).await?;
		let now = clock::now(&mut *tx).await?;

		crate::ensure_visible(&note, editor_id)?;
		crate::ensure_writable(&note, editor_id, &policy, now)?;

		let version = versions::fetch_version(&mut *tx, req.version_id).await?;

		if version.note_id != note.note_id {
			return Err(Error::BadRequest {
				message: "Version does not belong to this note.".to_string(),
			});
		}

		self.snapshot_best_effort(&mut tx, &note, editor_id, now).await;

		note.title = version.title;
		note.content = version.content;
		note.content_html = self.clean_html(version.content_html.as_deref());
		note.last_editor_id = Some(editor_id.to_string());
		note.updated_at = crate::next_updated_at(note.updated_at, now);

		notes::update_note(&mut *tx, &note).await?;

		tx.commit().await?;

		tracing::debug!(note_id = %note.note_id, version_id = %req.version_id, "Restored note version.");

		reload_note(self, note.note_id).await
	}

	/// Archives the note's current state inside a savepoint of `tx`.
	///
	/// Failures roll back to the savepoint and are logged. The caller's write continues either way.
	pub(crate) async fn snapshot_best_effort(
		&self,
		tx: &mut Transaction<'_, Postgres>,
		note: &Note,
		editor_id: &str,
		now: OffsetDateTime,
	) {
		if let Err(err) = self.snapshot(tx, note, editor_id, now).await {
			tracing::warn!(
				error = %err,
				note_id = %note.note_id,
				"Failed to archive note version. Continuing without a snapshot."
			);
		}
	}

	async fn snapshot(
		&self,
		tx: &mut Transaction<'_, Postgres>,
		note: &Note,
		editor_id: &str,
		now: OffsetDateTime,
	) -> Result<()> {
		let mut savepoint = sqlx::Connection::begin(&mut **tx).await?;

		versions::insert_version(
			&mut *savepoint,
			versions::InsertVersionArgs {
				version_id: Uuid::new_v4(),
				note_id: note.note_id,
				editor_id,
				title: &note.title,
				content: &note.content,
				content_html: note.content_html.as_deref(),
				created_at: now,
			},
		)
		.await?;

		let pruned =
			versions::prune_versions(&mut *savepoint, note.note_id, self.cfg.notes.version_retention)
				.await?;

		savepoint.commit().await?;

		if pruned > 0 {
			tracing::debug!(note_id = %note.note_id, pruned, "Pruned archived note versions.");
		}

		Ok(())
	}

	/// Resolves a caller-supplied page size against the configured default and retention cap.
	pub(crate) fn version_list_limit(&self, requested: Option<u32>) -> Result<u32> {
		let cfg = &self.cfg.notes;
		let limit = requested.unwrap_or(cfg.default_version_list_limit);

		if limit == 0 {
			return Err(Error::BadRequest { message: "limit must be greater than zero.".to_string() });
		}

		Ok(limit.min(cfg.version_retention))
	}

	pub(crate) async fn collect_versions(
		&self,
		note_id: Uuid,
		limit: u32,
	) -> Result<ListVersionsResponse> {
		let items = versions::list_versions(&self.db.pool, note_id, limit)
			.await?
			.into_iter()
			.map(VersionResponse::try_from)
			.collect::<Result<Vec<_>>>()?;

		Ok(ListVersionsResponse { note_id, items })
	}
}
