//! Device-level health signals for the device list.
//!
//! Pure logic -- no I/O. The caller fetches the device snapshot and passes it
//! in along with a clock and thresholds.

use std::fmt;

use serde::Serialize;

use crate::clock::{window_start, Clock};
use crate::config::MonitorConfig;
use crate::device::Device;
use crate::humanize::format_distance_from_now;
use crate::responsiveness::{get_lock_responsiveness_warnings_with, ResponsivenessWarning};
use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Warnings
// ---------------------------------------------------------------------------

/// A single line in a device's status column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum DeviceWarning {
    /// The controller does not report the device as online.
    Offline,
    /// The device has not been refreshed from the controller recently.
    LastDataSync { ago: String },
    /// The device is offline; when it went offline.
    WentOffline { ago: String },
    /// The device came back online recently.
    WentOnline { ago: String },
    /// A lock responsiveness warning for one of the device's codes.
    LockResponsiveness(ResponsivenessWarning),
}

impl fmt::Display for DeviceWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => f.write_str("Offline"),
            Self::LastDataSync { ago } => write!(f, "Last Data Sync: {ago}"),
            Self::WentOffline { ago } => write!(f, "Went Offline: {ago}"),
            Self::WentOnline { ago } => write!(f, "Went Online: {ago}"),
            Self::LockResponsiveness(warning) => fmt::Display::fmt(warning, f),
        }
    }
}

/// `Offline` when the device is not online.
pub fn offline_warnings(device: &Device) -> Vec<DeviceWarning> {
    if device.is_online() {
        Vec::new()
    } else {
        vec![DeviceWarning::Offline]
    }
}

/// `LastDataSync` when the last refresh is older than the stale-sync window.
pub fn last_refreshed_warnings(
    device: &Device,
    now: Timestamp,
    config: &MonitorConfig,
) -> Vec<DeviceWarning> {
    let stale = window_start(now, config.stale_sync_after)
        .is_some_and(|cutoff| device.last_refreshed_at < cutoff);
    if stale {
        vec![DeviceWarning::LastDataSync {
            ago: format_distance_from_now(device.last_refreshed_at, now),
        }]
    } else {
        Vec::new()
    }
}

/// Connectivity changes. Only devices that have gone offline at least once
/// get one: `WentOffline` while still offline, `WentOnline` if it came back
/// within the went-online window.
pub fn connectivity_warnings(
    device: &Device,
    now: Timestamp,
    config: &MonitorConfig,
) -> Vec<DeviceWarning> {
    let Some(went_offline_at) = device.last_went_offline_at else {
        return Vec::new();
    };

    if !device.is_online() {
        return vec![DeviceWarning::WentOffline {
            ago: format_distance_from_now(went_offline_at, now),
        }];
    }

    match device.last_went_online_at {
        Some(went_online_at)
            if window_start(now, config.went_online_window)
                .is_none_or(|cutoff| went_online_at > cutoff) =>
        {
            vec![DeviceWarning::WentOnline {
                ago: format_distance_from_now(went_online_at, now),
            }]
        }
        _ => Vec::new(),
    }
}

/// Every status line for a device, in display order: offline, stale sync,
/// connectivity, then lock responsiveness.
pub fn device_status_warnings<C: Clock>(
    device: &Device,
    clock: &C,
    config: &MonitorConfig,
) -> Vec<DeviceWarning> {
    let now = clock.now();

    let mut warnings = offline_warnings(device);
    warnings.extend(last_refreshed_warnings(device, now, config));
    warnings.extend(connectivity_warnings(device, now, config));
    warnings.extend(
        get_lock_responsiveness_warnings_with(device, clock, config)
            .into_iter()
            .map(DeviceWarning::LockResponsiveness),
    );
    warnings
}

// ---------------------------------------------------------------------------
// Battery
// ---------------------------------------------------------------------------

/// Battery state as shown in the device list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "percent")]
pub enum BatteryLevel {
    /// Mains-powered, or no battery information at all.
    NotBatteryPowered,
    /// The reading is missing or too old to trust.
    Unknown,
    Low(i32),
    Normal(i32),
}

impl BatteryLevel {
    /// Whether the level should be highlighted to the operator.
    pub fn needs_attention(&self) -> bool {
        matches!(self, Self::Unknown | Self::Low(_))
    }
}

impl fmt::Display for BatteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotBatteryPowered => Ok(()),
            Self::Unknown => f.write_str("Unknown"),
            Self::Low(level) | Self::Normal(level) => write!(f, "{level}%"),
        }
    }
}

/// Classify a device's battery reading.
pub fn battery_level<C: Clock>(device: &Device, clock: &C, config: &MonitorConfig) -> BatteryLevel {
    let Some(battery) = device.battery.as_ref().filter(|b| b.battery_powered) else {
        return BatteryLevel::NotBatteryPowered;
    };

    let stale = window_start(clock.now(), config.battery_stale_after)
        .is_some_and(|cutoff| device.last_refreshed_at < cutoff);
    match battery.level {
        Some(_) if stale => BatteryLevel::Unknown,
        None => BatteryLevel::Unknown,
        Some(level) if level < config.low_battery_percent => BatteryLevel::Low(level),
        Some(level) => BatteryLevel::Normal(level),
    }
}

// ---------------------------------------------------------------------------
// Delete guard
// ---------------------------------------------------------------------------

/// A device still being refreshed by the controller would just reappear
/// after deletion, so deletion is only offered once refreshes have stopped
/// for the lockout window.
pub fn can_delete_device<C: Clock>(device: &Device, clock: &C, config: &MonitorConfig) -> bool {
    window_start(clock.now(), config.delete_lockout)
        .is_some_and(|cutoff| device.last_refreshed_at <= cutoff)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
