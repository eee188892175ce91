//! Lock code lifecycle: display ordering and forward-only transitions.
//!
//! Operators read the managed code list top to bottom looking for what needs
//! attention, so live and in-flight codes come first, then upcoming ones,
//! then history with the most recently deactivated on top.

use std::cmp::Ordering;

use crate::error::CoreError;
use crate::lock_code::{LockCodeStatus, ManagedLockCode};

// ---------------------------------------------------------------------------
// Display ordering
// ---------------------------------------------------------------------------

/// Rank given to statuses this crate does not recognize. Sorts them first.
pub const UNKNOWN_STATUS_RANK: i8 = -1;

/// Display rank of a status. Lower ranks are listed first.
pub fn status_rank(status: &LockCodeStatus) -> i8 {
    match status {
        LockCodeStatus::Enabled => 0,
        LockCodeStatus::Adding => 1,
        LockCodeStatus::Removing => 2,
        LockCodeStatus::Scheduled => 3,
        LockCodeStatus::Complete => 4,
        LockCodeStatus::Unknown(_) => UNKNOWN_STATUS_RANK,
    }
}

/// Display order between two codes.
///
/// Status rank first. Within a status: scheduled codes soonest-to-start
/// first, completed codes most-recently-ended first, everything else
/// most-recently-started first.
pub fn compare_for_display(a: &ManagedLockCode, b: &ManagedLockCode) -> Ordering {
    status_rank(&a.status)
        .cmp(&status_rank(&b.status))
        .then_with(|| match a.status {
            LockCodeStatus::Scheduled => a.start_at.cmp(&b.start_at),
            LockCodeStatus::Complete => b.end_at.cmp(&a.end_at),
            _ => b.start_at.cmp(&a.start_at),
        })
}

/// Return the codes in display order. The input slice is left untouched.
///
/// Codes with an unrecognized status are logged and listed first rather than
/// dropped. The sort is stable, so codes with equal keys keep their input order.
pub fn sort_lock_codes(codes: &[ManagedLockCode]) -> Vec<ManagedLockCode> {
    for code in codes.iter().filter(|c| c.status.is_unknown()) {
        tracing::warn!(
            lock_code_id = %code.id,
            device_id = %code.device_id,
            status = %code.status,
            "Unrecognized lock code status",
        );
    }

    let mut sorted = codes.to_vec();
    sorted.sort_by(compare_for_display);
    sorted
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// Position in `Scheduled -> Adding -> Enabled -> Removing -> Complete`
/// (1-based). `None` for an unrecognized status.
pub fn pipeline_position(status: &LockCodeStatus) -> Option<u8> {
    match status {
        LockCodeStatus::Scheduled => Some(1),
        LockCodeStatus::Adding => Some(2),
        LockCodeStatus::Enabled => Some(3),
        LockCodeStatus::Removing => Some(4),
        LockCodeStatus::Complete => Some(5),
        LockCodeStatus::Unknown(_) => None,
    }
}

/// Whether a code may move from `from` to `to`.
///
/// Status only moves forward, though stages may be skipped (a code cancelled
/// while `Adding` goes straight to `Complete`). `Complete` is terminal.
pub fn can_advance_to(from: &LockCodeStatus, to: &LockCodeStatus) -> bool {
    match (pipeline_position(from), pipeline_position(to)) {
        (Some(from), Some(to)) => to > from,
        _ => false,
    }
}

/// Validate a status change, returning an error message for invalid ones.
pub fn validate_transition(from: &LockCodeStatus, to: &LockCodeStatus) -> Result<(), CoreError> {
    if can_advance_to(from, to) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid lock code transition: {from} -> {to}"
        )))
    }
}

/// Whether nothing further can happen to a code in this status.
pub fn is_terminal(status: &LockCodeStatus) -> bool {
    matches!(status, LockCodeStatus::Complete)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
