//! Edit lock operations.
//!
//! The lease itself is claimed by a single conditional statement in `scribe_storage::locks`; this
//! layer adds request validation, the visibility rule, and reporting.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, ScribeService, notes::load_visible_note};
use scribe_domain::lease::{LeasePolicy, LockState};
use scribe_storage::{clock, locks};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AcquireLockRequest {
	pub note_id: Uuid,
	pub requester_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReleaseLockRequest {
	pub note_id: Uuid,
	pub requester_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReleaseLockResponse {
	pub note_id: Uuid,
	/// False when the requester did not hold the lock. Nothing changed in that case.
	pub released: bool,
}

/// Privileged. Authorization is the caller's responsibility.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForceReleaseLockRequest {
	pub note_id: Uuid,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForceReleaseLockResponse {
	pub note_id: Uuid,
	pub previous_holder: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HeartbeatRequest {
	pub note_id: Uuid,
	pub requester_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LockStatusRequest {
	pub note_id: Uuid,
	pub requester_id: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LockResponse {
	pub note_id: Uuid,
	pub holder: Option<String>,
	#[serde(with = "time::serde::rfc3339::option")]
	pub acquired_at: Option<OffsetDateTime>,
	/// Whether the lease has outlived the staleness window and may be reclaimed.
	pub stale: bool,
	pub held_by_requester: bool,
}
impl LockResponse {
	pub(crate) fn from_state(
		note_id: Uuid,
		state: &LockState,
		requester_id: Option<&str>,
		policy: &LeasePolicy,
		now: OffsetDateTime,
	) -> Self {
		let acquired_at = match state {
			LockState::Unlocked => None,
			LockState::Locked { acquired_at, .. } => Some(*acquired_at),
		};

		Self {
			note_id,
			holder: state.holder().map(str::to_string),
			acquired_at,
			stale: state.is_stale(policy, now),
			held_by_requester: requester_id.is_some_and(|id| state.is_held_by(id)),
		}
	}

	fn held(note_id: Uuid, holder: &str, acquired_at: OffsetDateTime) -> Self {
		Self {
			note_id,
			holder: Some(holder.to_string()),
			acquired_at: Some(acquired_at),
			stale: false,
			held_by_requester: true,
		}
	}
}

impl ScribeService {
	/// Claims the edit lock, refreshing it when the requester already holds it.
	///
	/// Never waits: a live lease held by someone else is a conflict.
	pub async fn acquire_lock(&self, req: AcquireLockRequest) -> Result<LockResponse> {
		let requester_id = crate::required_id(&req.requester_id, "requester_id")?;
		let stale_after = self.lease_policy().stale_after();

		load_visible_note(&self.db.pool, req.note_id, requester_id).await?;

		let claim =
			locks::acquire_lock(&self.db.pool, req.note_id, requester_id, stale_after).await?;

		if let Some(previous_holder) = claim.previous_holder.as_deref()
			&& previous_holder != requester_id
		{
			tracing::info!(
				note_id = %req.note_id,
				previous_holder,
				requester_id,
				previous_acquired_at = ?claim.previous_acquired_at,
				"Reclaimed stale edit lock."
			);
		}

		Ok(LockResponse::held(req.note_id, requester_id, claim.acquired_at))
	}

	pub async fn release_lock(&self, req: ReleaseLockRequest) -> Result<ReleaseLockResponse> {
		let requester_id = crate::required_id(&req.requester_id, "requester_id")?;

		load_visible_note(&self.db.pool, req.note_id, requester_id).await?;

		let released = locks::release_lock(&self.db.pool, req.note_id, requester_id).await?;

		Ok(ReleaseLockResponse { note_id: req.note_id, released })
	}

	pub async fn force_release_lock(
		&self,
		req: ForceReleaseLockRequest,
	) -> Result<ForceReleaseLockResponse> {
		let previous_holder = locks::force_release_lock(&self.db.pool, req.note_id).await?;

		if let Some(holder) = previous_holder.as_deref() {
			tracing::info!(note_id = %req.note_id, previous_holder = holder, "Force released edit lock.");
		}

		Ok(ForceReleaseLockResponse { note_id: req.note_id, previous_holder })
	}

	pub async fn heartbeat_lock(&self, req: HeartbeatRequest) -> Result<LockResponse> {
		let requester_id = crate::required_id(&req.requester_id, "requester_id")?;

		load_visible_note(&self.db.pool, req.note_id, requester_id).await?;

		let renewed_at = locks::heartbeat_lock(&self.db.pool, req.note_id, requester_id).await?;

		Ok(LockResponse::held(req.note_id, requester_id, renewed_at))
	}

	pub async fn lock_status(&self, req: LockStatusRequest) -> Result<LockResponse> {
		let requester_id = crate::required_id(&req.requester_id, "requester_id")?;
		let note = load_visible_note(&self.db.pool, req.note_id, requester_id).await?;
		let now = clock::now(&self.db.pool).await?;
		let state = crate::lock_state(&note)?;

		Ok(LockResponse::from_state(note.note_id, &state, Some(requester_id), &self.lease_policy(), now))
	}
}
