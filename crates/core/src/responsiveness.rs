//! Lock responsiveness warnings.
//!
//! The controller never acknowledges an add directly; the polling layer only
//! records when an add started and when the code was first seen on the lock.
//! This module reads that trail and decides whether the lock is keeping up.
//!
//! The scan walks codes newest-first and stops elaborating history once it
//! has an explanation: either a warning or a code that was added in time.
//! Codes still `Adding` are always judged, since they are the current risk.

use std::fmt;

use serde::Serialize;

use crate::clock::{window_start, Clock};
use crate::config::MonitorConfig;
use crate::device::Device;
use crate::humanize::format_distance;
use crate::lock_code::{LockCodeStatus, ManagedLockCode};
use crate::types::Timestamp;

/// A derived signal that the lock or its controller is not carrying out adds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ResponsivenessWarning {
    /// The code reached `Complete` without ever being confirmed on the lock.
    NeverAdded { code: String },
    /// An add started over the timeout ago and is still unconfirmed.
    NotResponding { code: String },
    /// The add was confirmed, but only after the timeout.
    SlowToRespond { code: String, duration: String },
}

impl ResponsivenessWarning {
    /// The PIN the warning is about.
    pub fn code(&self) -> &str {
        match self {
            Self::NeverAdded { code }
            | Self::NotResponding { code }
            | Self::SlowToRespond { code, .. } => code,
        }
    }
}

impl fmt::Display for ResponsivenessWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NeverAdded { code } => write!(f, "The code {code} was never added"),
            Self::NotResponding { code } => write!(f, "Not Responding (for code {code})"),
            Self::SlowToRespond { code, duration } => {
                write!(f, "Slow to Respond (took {duration} to add code {code})")
            }
        }
    }
}

/// Outcome of judging a single code.
enum Verdict {
    /// Not attempted yet, or attempted too recently to tell.
    NotJudged,
    /// Added within the timeout.
    Good,
    Warn(ResponsivenessWarning),
}

/// Accumulator for the newest-first scan.
#[derive(Default)]
struct Scan {
    emitted_any: bool,
    saw_good: bool,
    warnings: Vec<ResponsivenessWarning>,
}

impl Scan {
    fn visit(
        mut self,
        code: &ManagedLockCode,
        too_soon: Timestamp,
        config: &MonitorConfig,
    ) -> Self {
        let in_flight = code.status == LockCodeStatus::Adding;
        if !in_flight && (self.emitted_any || self.saw_good) {
            return self;
        }

        match judge(code, too_soon, config) {
            Verdict::NotJudged => {}
            Verdict::Good => self.saw_good = true,
            Verdict::Warn(warning) => {
                tracing::debug!(
                    lock_code_id = %code.id,
                    device_id = %code.device_id,
                    warning = %warning,
                    "Lock responsiveness warning",
                );
                self.emitted_any = true;
                self.warnings.push(warning);
            }
        }
        self
    }
}

fn judge(code: &ManagedLockCode, too_soon: Timestamp, config: &MonitorConfig) -> Verdict {
    let Some(started) = code.started_adding_at else {
        // Still scheduled.
        return Verdict::NotJudged;
    };
    if started >= too_soon {
        return Verdict::NotJudged;
    }

    if code.was_never_added() {
        return Verdict::Warn(ResponsivenessWarning::NeverAdded {
            code: code.code.clone(),
        });
    }

    match code.was_enabled_at {
        Some(enabled) if enabled - started > config.add_timeout => {
            Verdict::Warn(ResponsivenessWarning::SlowToRespond {
                code: code.code.clone(),
                duration: format_distance(started, enabled),
            })
        }
        Some(_) => Verdict::Good,
        None => Verdict::Warn(ResponsivenessWarning::NotResponding {
            code: code.code.clone(),
        }),
    }
}

/// Responsiveness warnings for a device, using the default thresholds.
pub fn get_lock_responsiveness_warnings<C: Clock>(
    device: &Device,
    clock: &C,
) -> Vec<ResponsivenessWarning> {
    get_lock_responsiveness_warnings_with(device, clock, &MonitorConfig::default())
}

/// Responsiveness warnings for a device.
///
/// Offline devices yield nothing: their timing cannot be judged. Otherwise at
/// most one warning explains the history, plus one per code still `Adding`
/// that needs attention. Warnings come back in scan order, newest code first.
pub fn get_lock_responsiveness_warnings_with<C: Clock>(
    device: &Device,
    clock: &C,
    config: &MonitorConfig,
) -> Vec<ResponsivenessWarning> {
    if !device.is_online() {
        tracing::trace!(device_id = %device.id, status = %device.status, "Skipping offline device");
        return Vec::new();
    }

    let Some(too_soon) = window_start(clock.now(), config.recent_guard) else {
        // Every add is younger than the guard.
        return Vec::new();
    };

    let mut newest_first: Vec<&ManagedLockCode> = device.managed_lock_codes.iter().collect();
    newest_first.sort_by(|a, b| b.start_at.cmp(&a.start_at));

    newest_first
        .into_iter()
        .fold(Scan::default(), |scan, code| scan.visit(code, too_soon, config))
        .warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
