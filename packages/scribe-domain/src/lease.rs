//! Edit lock lease rules.
//!
//! A note is either unlocked or locked by one holder since an acquisition instant. The holder keeps
//! the lease alive by heartbeating; once the last heartbeat is older than the staleness window the
//! lease may be reclaimed by anyone. The storage layer applies these rules as a single conditional
//! update, so the functions here describe the same predicate for gating writes and for reporting.

use time::{Duration, OffsetDateTime};

use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeasePolicy {
	stale_after: Duration,
}
impl LeasePolicy {
	pub fn new(stale_after: Duration) -> Self {
		Self { stale_after }
	}

	pub fn from_secs(secs: u64) -> Self {
		Self::new(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)))
	}

	pub fn stale_after(&self) -> Duration {
		self.stale_after
	}

	/// Leases acquired strictly before this instant are stale at `now`.
	pub fn stale_before(&self, now: OffsetDateTime) -> OffsetDateTime {
		now.checked_sub(self.stale_after).unwrap_or(OffsetDateTime::UNIX_EPOCH)
	}

	pub fn is_stale(&self, acquired_at: OffsetDateTime, now: OffsetDateTime) -> bool {
		acquired_at < self.stale_before(now)
	}
}
impl Default for LeasePolicy {
	fn default() -> Self {
		Self::new(Duration::minutes(5))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockState {
	Unlocked,
	Locked { holder: String, acquired_at: OffsetDateTime },
}
impl LockState {
	/// Builds the state from the two nullable lock columns, which must agree.
	pub fn from_columns(holder: Option<&str>, acquired_at: Option<OffsetDateTime>) -> Result<Self> {
		match (holder, acquired_at) {
			(None, None) => Ok(Self::Unlocked),
			(Some(holder), Some(acquired_at)) =>
				Ok(Self::Locked { holder: holder.to_string(), acquired_at }),
			_ => Err(Error::TornLock),
		}
	}

	pub fn holder(&self) -> Option<&str> {
		match self {
			Self::Unlocked => None,
			Self::Locked { holder, .. } => Some(holder.as_str()),
		}
	}

	pub fn is_held_by(&self, requester: &str) -> bool {
		self.holder() == Some(requester)
	}

	pub fn is_stale(&self, policy: &LeasePolicy, now: OffsetDateTime) -> bool {
		match self {
			Self::Unlocked => false,
			Self::Locked { acquired_at, .. } => policy.is_stale(*acquired_at, now),
		}
	}

	pub fn decide_acquire(
		&self,
		requester: &str,
		policy: &LeasePolicy,
		now: OffsetDateTime,
	) -> AcquireDecision {
		match self {
			Self::Unlocked => AcquireDecision::Grant,
			Self::Locked { holder, .. } if holder == requester => AcquireDecision::Refresh,
			Self::Locked { holder, acquired_at } if policy.is_stale(*acquired_at, now) =>
				AcquireDecision::Reclaim { previous_holder: holder.clone() },
			Self::Locked { .. } => AcquireDecision::Deny,
		}
	}

	/// Whether `editor` may write the note right now.
	///
	/// Writes are refused only while a live lease is held by someone else.
	pub fn permits_write(&self, editor: &str, policy: &LeasePolicy, now: OffsetDateTime) -> bool {
		!matches!(self.decide_acquire(editor, policy, now), AcquireDecision::Deny)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireDecision {
	Grant,
	Refresh,
	Reclaim { previous_holder: String },
	Deny,
}
