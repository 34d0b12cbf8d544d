pub mod admin;
pub mod checklist;
pub mod create;
pub mod delete;
pub mod list;
pub mod locks;
pub mod notes;
pub mod update;
pub mod versions;

mod error;

pub use admin::PruneVersionsResponse;
pub use checklist::{ToggleCheckRequest, ToggleCheckResponse};
pub use create::CreateNoteRequest;
pub use delete::{DeleteNoteRequest, DeleteNoteResponse};
pub use error::{Error, Result};
pub use list::{ListNotesRequest, ListNotesResponse, ListScope};
pub use locks::{
	AcquireLockRequest, ForceReleaseLockRequest, ForceReleaseLockResponse, HeartbeatRequest,
	LockResponse, LockStatusRequest, ReleaseLockRequest, ReleaseLockResponse,
};
pub use notes::{GetNoteRequest, NoteResponse};
pub use update::UpdateNoteRequest;
pub use versions::{
	GetVersionRequest, ListVersionsRequest, ListVersionsResponse, RestoreVersionRequest,
	VersionResponse,
};

use std::sync::Arc;

use time::{Duration, OffsetDateTime};

use scribe_config::Config;
use scribe_domain::{
	lease::{LeasePolicy, LockState},
	sanitize,
};
use scribe_storage::{db::Db, models::Note};

/// Pre-storage hook for externally supplied rich text.
pub trait RichTextSanitizer
where
	Self: Send + Sync,
{
	fn sanitize(&self, html: &str) -> String;
}

/// Strips executable markup with [`scribe_domain::sanitize::scrub_rich_text`].
pub struct ScrubSanitizer;
impl RichTextSanitizer for ScrubSanitizer {
	fn sanitize(&self, html: &str) -> String {
		sanitize::scrub_rich_text(html)
	}
}

pub struct ScribeService {
	pub cfg: Config,
	pub db: Db,
	pub sanitizer: Arc<dyn RichTextSanitizer>,
}
impl ScribeService {
	pub fn new(cfg: Config, db: Db) -> Self {
		Self { cfg, db, sanitizer: Arc::new(ScrubSanitizer) }
	}

	pub fn with_sanitizer(cfg: Config, db: Db, sanitizer: Arc<dyn RichTextSanitizer>) -> Self {
		Self { cfg, db, sanitizer }
	}

	pub fn lease_policy(&self) -> LeasePolicy {
		LeasePolicy::from_secs(self.cfg.notes.lock_stale_after_secs)
	}

	/// Sanitizes a rich-text mirror. Blank results are stored as absent.
	pub(crate) fn clean_html(&self, raw: Option<&str>) -> Option<String> {
		raw.map(|html| self.sanitizer.sanitize(html))
			.filter(|html| !html.trim().is_empty())
	}
}

/// Every accepted write moves `updated_at` strictly forward, even within one clock tick.
pub(crate) fn next_updated_at(previous: OffsetDateTime, now: OffsetDateTime) -> OffsetDateTime {
	if now > previous { now } else { previous + Duration::microseconds(1) }
}

pub(crate) fn required_id<'a>(value: &'a str, field: &str) -> Result<&'a str> {
	let trimmed = value.trim();

	if trimmed.is_empty() {
		return Err(Error::BadRequest { message: format!("{field} is required.") });
	}

	Ok(trimmed)
}

/// A note is visible to its owner and, once shared, to everyone in its campaign.
pub(crate) fn note_visible(note: &Note, requester_id: &str) -> bool {
	note.owner_id == requester_id || note.shared
}

/// Invisible notes are reported exactly like missing ones.
pub(crate) fn ensure_visible(note: &Note, requester_id: &str) -> Result<()> {
	if !note_visible(note, requester_id) {
		return Err(Error::NotFound { message: format!("note {}", note.note_id) });
	}

	Ok(())
}

pub(crate) fn lock_state(note: &Note) -> Result<LockState> {
	Ok(LockState::from_columns(note.lock_holder.as_deref(), note.lock_acquired_at)?)
}

/// Refuses a write while someone other than `editor_id` holds a live lease on the note.
///
/// Callers must hold the note's row lock so the check and the write commit together.
pub(crate) fn ensure_writable(
	note: &Note,
	editor_id: &str,
	policy: &LeasePolicy,
	now: OffsetDateTime,
) -> Result<()> {
	if !lock_state(note)?.permits_write(editor_id, policy, now) {
		return Err(Error::Conflict {
			message: scribe_storage::locks::LOCK_CONFLICT_MESSAGE.to_string(),
		});
	}

	Ok(())
}
