//! Managed lock code records.
//!
//! A managed lock code is a PIN whose add/enable/remove/complete lifecycle
//! is driven by this system. The record is written by the polling layer as
//! it observes controller acknowledgments; this crate only reads it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{EntityId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_SCHEDULED: &str = "Scheduled";
pub const STATUS_ADDING: &str = "Adding";
pub const STATUS_ENABLED: &str = "Enabled";
pub const STATUS_REMOVING: &str = "Removing";
pub const STATUS_COMPLETE: &str = "Complete";

/// All recognized status strings, in pipeline order.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_SCHEDULED,
    STATUS_ADDING,
    STATUS_ENABLED,
    STATUS_REMOVING,
    STATUS_COMPLETE,
];

/// Where a managed code sits in `Scheduled -> Adding -> Enabled -> Removing -> Complete`.
///
/// Anything the backend sends that is not one of the five names is kept
/// verbatim in `Unknown` instead of failing the whole snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LockCodeStatus {
    Scheduled,
    Adding,
    Enabled,
    Removing,
    Complete,
    Unknown(String),
}

impl LockCodeStatus {
    /// Parse a wire value. Never fails; unrecognized input becomes `Unknown`.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            STATUS_SCHEDULED => Self::Scheduled,
            STATUS_ADDING => Self::Adding,
            STATUS_ENABLED => Self::Enabled,
            STATUS_REMOVING => Self::Removing,
            STATUS_COMPLETE => Self::Complete,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => STATUS_SCHEDULED,
            Self::Adding => STATUS_ADDING,
            Self::Enabled => STATUS_ENABLED,
            Self::Removing => STATUS_REMOVING,
            Self::Complete => STATUS_COMPLETE,
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown(_))
    }
}

impl From<String> for LockCodeStatus {
    fn from(value: String) -> Self {
        match Self::from_str_value(&value) {
            Self::Unknown(_) => Self::Unknown(value),
            known => known,
        }
    }
}

impl From<LockCodeStatus> for String {
    fn from(status: LockCodeStatus) -> Self {
        match status {
            LockCodeStatus::Unknown(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LockCodeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// Reservation link. An empty `id` means the code was added by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    #[serde(default)]
    pub id: String,
    /// When set, the active window follows the reservation, not manual dates.
    #[serde(default)]
    pub sync: bool,
}

impl Reservation {
    pub fn is_linked(&self) -> bool {
        !self.id.is_empty()
    }
}

/// One managed code and its timestamp trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedLockCode {
    pub id: EntityId,
    #[serde(default)]
    pub device_id: EntityId,
    pub code: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub reservation: Reservation,
    pub status: LockCodeStatus,
    pub start_at: Timestamp,
    pub end_at: Timestamp,
    /// Set when the provisioning attempt began; `None` while still scheduled.
    #[serde(default)]
    pub started_adding_at: Option<Timestamp>,
    /// Set when the controller confirmed the code is live on the lock.
    #[serde(default)]
    pub was_enabled_at: Option<Timestamp>,
    #[serde(default)]
    pub started_removing_at: Option<Timestamp>,
    #[serde(default)]
    pub was_completed_at: Option<Timestamp>,
}

impl ManagedLockCode {
    /// True once `now` is strictly past `start_at`.
    pub fn has_started(&self, now: Timestamp) -> bool {
        now > self.start_at
    }

    /// True once `now` is strictly past `end_at`.
    pub fn has_ended(&self, now: Timestamp) -> bool {
        now > self.end_at
    }

    /// Whether the code belongs on the lock at `now`.
    pub fn should_be_present(&self, now: Timestamp) -> bool {
        self.has_started(now) && !self.has_ended(now)
    }

    /// Whether the code reached `Complete` without ever being confirmed on the lock.
    pub fn was_never_added(&self) -> bool {
        self.status == LockCodeStatus::Complete && self.was_enabled_at.is_none()
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check a record's timestamp trail for internal consistency.
///
/// Meant for the ingestion boundary. The warning engine does not call this
/// and tolerates records that fail it.
///
/// Rules:
/// - The status must be one of [`VALID_STATUSES`].
/// - `end_at` must not precede `start_at`.
/// - Every status past `Scheduled` needs `started_adding_at`.
/// - `was_enabled_at` needs `started_adding_at` and must not precede it.
/// - `was_completed_at` must not precede `started_removing_at`.
pub fn validate_lock_code(code: &ManagedLockCode) -> Result<(), CoreError> {
    if let LockCodeStatus::Unknown(raw) = &code.status {
        return Err(CoreError::Validation(format!(
            "Lock code {} has unrecognized status '{raw}'. Must be one of: {}",
            code.id,
            VALID_STATUSES.join(", ")
        )));
    }

    if code.end_at < code.start_at {
        return Err(CoreError::Validation(format!(
            "Lock code {} ends ({}) before it starts ({})",
            code.id,
            code.end_at.to_rfc3339(),
            code.start_at.to_rfc3339()
        )));
    }

    if code.status != LockCodeStatus::Scheduled && code.started_adding_at.is_none() {
        return Err(CoreError::Validation(format!(
            "Lock code {} is {} but has no startedAddingAt",
            code.id, code.status
        )));
    }

    if let Some(enabled) = code.was_enabled_at {
        match code.started_adding_at {
            None => {
                return Err(CoreError::Validation(format!(
                    "Lock code {} has wasEnabledAt without startedAddingAt",
                    code.id
                )));
            }
            Some(started) if enabled < started => {
                return Err(CoreError::Validation(format!(
                    "Lock code {} was enabled before its add attempt started",
                    code.id
                )));
            }
            Some(_) => {}
        }
    }

    if let (Some(removing), Some(completed)) = (code.started_removing_at, code.was_completed_at) {
        if completed < removing {
            return Err(CoreError::Validation(format!(
                "Lock code {} completed before removal was requested",
                code.id
            )));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
