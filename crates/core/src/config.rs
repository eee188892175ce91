//! Monitor thresholds.
//!
//! Every time window the warning engines compare against lives here so a
//! deployment can tune them without a rebuild.

use chrono::Duration;

use crate::error::CoreError;

/// How long the controller may take to confirm an added code before the
/// add is considered slow (or, if still unconfirmed, unresponsive).
pub const ADD_TIMEOUT_MINS: i64 = 60;

/// Add attempts younger than this are never judged.
pub const RECENT_GUARD_MINS: i64 = 10;

/// A device not refreshed for this long gets a "Last Data Sync" warning.
/// Polling has hour-long gaps, so this must stay above 60.
pub const STALE_SYNC_MINS: i64 = 70;

/// How long after coming back online a device keeps a "Went Online" note.
pub const WENT_ONLINE_WINDOW_MINS: i64 = 24 * 60;

/// Battery readings older than this are reported as unknown.
pub const BATTERY_STALE_MINS: i64 = 36 * 60;

/// Battery percentage below which the level is flagged as low.
pub const LOW_BATTERY_PERCENT: i32 = 25;

/// Devices refreshed more recently than this cannot be deleted.
pub const DELETE_LOCKOUT_MINS: i64 = 130;

/// Upper bound for any configured window (ten years).
pub const MAX_WINDOW_MINS: i64 = 10 * 366 * 24 * 60;

/// Thresholds used by the responsiveness and device health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub add_timeout: Duration,
    pub recent_guard: Duration,
    pub stale_sync_after: Duration,
    pub went_online_window: Duration,
    pub battery_stale_after: Duration,
    pub low_battery_percent: i32,
    pub delete_lockout: Duration,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            add_timeout: Duration::minutes(ADD_TIMEOUT_MINS),
            recent_guard: Duration::minutes(RECENT_GUARD_MINS),
            stale_sync_after: Duration::minutes(STALE_SYNC_MINS),
            went_online_window: Duration::minutes(WENT_ONLINE_WINDOW_MINS),
            battery_stale_after: Duration::minutes(BATTERY_STALE_MINS),
            low_battery_percent: LOW_BATTERY_PERCENT,
            delete_lockout: Duration::minutes(DELETE_LOCKOUT_MINS),
        }
    }
}

impl MonitorConfig {
    /// Load thresholds from environment variables, falling back to defaults.
    ///
    /// | Env Var                          | Default |
    /// |----------------------------------|---------|
    /// | `MLOCK_ADD_TIMEOUT_MINS`         | `60`    |
    /// | `MLOCK_RECENT_GUARD_MINS`        | `10`    |
    /// | `MLOCK_STALE_SYNC_MINS`          | `70`    |
    /// | `MLOCK_WENT_ONLINE_WINDOW_MINS`  | `1440`  |
    /// | `MLOCK_BATTERY_STALE_MINS`       | `2160`  |
    /// | `MLOCK_LOW_BATTERY_PERCENT`      | `25`    |
    /// | `MLOCK_DELETE_LOCKOUT_MINS`      | `130`   |
    pub fn from_env() -> Result<Self, CoreError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`MonitorConfig::from_env`] with an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CoreError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let config = Self {
            add_timeout: read_minutes(&lookup, "MLOCK_ADD_TIMEOUT_MINS", defaults.add_timeout)?,
            recent_guard: read_minutes(&lookup, "MLOCK_RECENT_GUARD_MINS", defaults.recent_guard)?,
            stale_sync_after: read_minutes(
                &lookup,
                "MLOCK_STALE_SYNC_MINS",
                defaults.stale_sync_after,
            )?,
            went_online_window: read_minutes(
                &lookup,
                "MLOCK_WENT_ONLINE_WINDOW_MINS",
                defaults.went_online_window,
            )?,
            battery_stale_after: read_minutes(
                &lookup,
                "MLOCK_BATTERY_STALE_MINS",
                defaults.battery_stale_after,
            )?,
            low_battery_percent: match lookup("MLOCK_LOW_BATTERY_PERCENT") {
                Some(raw) => parse_percent("MLOCK_LOW_BATTERY_PERCENT", &raw)?,
                None => defaults.low_battery_percent,
            },
            delete_lockout: read_minutes(
                &lookup,
                "MLOCK_DELETE_LOCKOUT_MINS",
                defaults.delete_lockout,
            )?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject threshold combinations the engines cannot use.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.add_timeout <= Duration::zero() {
            return Err(CoreError::Config(
                "add timeout must be greater than zero".to_string(),
            ));
        }
        if self.recent_guard < Duration::zero() {
            return Err(CoreError::Config(
                "recent guard must not be negative".to_string(),
            ));
        }
        let windows = [
            ("add timeout", self.add_timeout),
            ("recent guard", self.recent_guard),
            ("stale sync window", self.stale_sync_after),
            ("went-online window", self.went_online_window),
            ("battery staleness window", self.battery_stale_after),
            ("delete lockout", self.delete_lockout),
        ];
        for (name, window) in windows {
            if window > Duration::minutes(MAX_WINDOW_MINS) {
                return Err(CoreError::Config(format!(
                    "{name} ({} min) exceeds the {MAX_WINDOW_MINS} min maximum",
                    window.num_minutes()
                )));
            }
        }
        if self.recent_guard >= self.add_timeout {
            return Err(CoreError::Config(format!(
                "recent guard ({} min) must be shorter than the add timeout ({} min)",
                self.recent_guard.num_minutes(),
                self.add_timeout.num_minutes()
            )));
        }
        Ok(())
    }
}

fn read_minutes<F>(lookup: &F, key: &str, default: Duration) -> Result<Duration, CoreError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(default);
    };
    let minutes: i64 = raw.trim().parse().map_err(|_| {
        CoreError::Config(format!(
            "{key} must be a whole number of minutes, got '{raw}'"
        ))
    })?;
    if minutes < 0 {
        return Err(CoreError::Config(format!("{key} must not be negative")));
    }
    Duration::try_minutes(minutes)
        .ok_or_else(|| CoreError::Config(format!("{key} is out of range, got '{raw}'")))
}

fn parse_percent(key: &str, raw: &str) -> Result<i32, CoreError> {
    let value: i32 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Config(format!("{key} must be an integer, got '{raw}'")))?;
    if !(0..=100).contains(&value) {
        return Err(CoreError::Config(format!("{key} must be within 0..=100")));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
