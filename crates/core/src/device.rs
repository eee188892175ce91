//! Device snapshot as delivered by the devices API.
//!
//! The snapshot is read-only here. Ingestion parses every timestamp up front,
//! so a malformed instant fails the whole snapshot instead of surfacing later
//! as a misleading warning.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lock_code::ManagedLockCode;
use crate::types::{EntityId, Timestamp};

/// Controller-reported status of a reachable device.
pub const DEVICE_STATUS_ONLINE: &str = "ONLINE";

/// Battery state reported by the controller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatteryReading {
    #[serde(default)]
    pub battery_powered: bool,
    /// Percentage, when the controller reported one.
    #[serde(default)]
    pub level: Option<i32>,
}

/// A lock device with its managed codes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: EntityId,
    #[serde(default)]
    pub unit_id: Option<EntityId>,
    #[serde(default)]
    pub name: String,
    /// `"ONLINE"` or any other controller status.
    pub status: String,
    pub last_refreshed_at: Timestamp,
    #[serde(default)]
    pub last_went_offline_at: Option<Timestamp>,
    #[serde(default)]
    pub last_went_online_at: Option<Timestamp>,
    #[serde(default)]
    pub battery: Option<BatteryReading>,
    /// Insertion order carries no meaning.
    #[serde(default)]
    pub managed_lock_codes: Vec<ManagedLockCode>,
}

impl Device {
    pub fn is_online(&self) -> bool {
        self.status == DEVICE_STATUS_ONLINE
    }

    /// Parse a device snapshot from the API's JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        serde_json::from_str(json)
            .map_err(|e| CoreError::Validation(format!("Invalid device snapshot: {e}")))
    }

    /// Parse a device snapshot from an already-decoded JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, CoreError> {
        serde_json::from_value(value)
            .map_err(|e| CoreError::Validation(format!("Invalid device snapshot: {e}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;
    use crate::lock_code::LockCodeStatus;

    fn snapshot() -> serde_json::Value {
        json!({
            "id": "1f0e5c4a-7a3b-4a0e-9d7e-2a1c2b3d4e5f",
            "unitId": null,
            "name": "Front Door",
            "status": "ONLINE",
            "lastRefreshedAt": "2022-10-12T02:00:00Z",
            "lastWentOfflineAt": null,
            "lastWentOnlineAt": null,
            "battery": { "batteryPowered": true, "level": 80 },
            "managedLockCodes": [
                {
                    "id": "81e8be93-6795-41ea-94d9-df76df002750",
                    "deviceId": "1f0e5c4a-7a3b-4a0e-9d7e-2a1c2b3d4e5f",
                    "code": "9999",
                    "note": "Code was removed.",
                    "reservation": { "id": "8833936@LiveRez.com", "sync": true },
                    "status": "Complete",
                    "startAt": "2021-09-13T15:00:00-06:00",
                    "endAt": "2021-09-15T11:30:00-06:00",
                    "startedAddingAt": "2021-09-13T00:00:00Z",
                    "wasEnabledAt": "2021-09-14T00:00:00Z",
                    "startedRemovingAt": "2021-09-15T00:00:00Z",
                    "wasCompletedAt": "2021-09-15T00:00:00Z"
                }
            ]
        })
    }

    #[test]
    fn parses_full_snapshot() {
        let device = Device::from_value(snapshot()).unwrap();
        assert!(device.is_online());
        assert_eq!(device.name, "Front Door");
        assert_eq!(device.managed_lock_codes.len(), 1);

        let code = &device.managed_lock_codes[0];
        assert_eq!(code.status, LockCodeStatus::Complete);
        assert!(code.reservation.is_linked());
        assert_eq!(
            device.battery,
            Some(BatteryReading {
                battery_powered: true,
                level: Some(80)
            })
        );
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let device = Device::from_value(snapshot()).unwrap();
        let code = &device.managed_lock_codes[0];
        assert_eq!(
            code.start_at,
            Utc.with_ymd_and_hms(2021, 9, 13, 21, 0, 0).unwrap()
        );
    }

    #[test]
    fn unknown_status_survives_ingestion() {
        let mut value = snapshot();
        value["managedLockCodes"][0]["status"] = json!("Paused");
        let device = Device::from_value(value).unwrap();
        assert_eq!(
            device.managed_lock_codes[0].status,
            LockCodeStatus::Unknown("Paused".to_string())
        );
    }

    #[test]
    fn optional_fields_default() {
        let device = Device::from_json(
            r#"{
                "id": "1f0e5c4a-7a3b-4a0e-9d7e-2a1c2b3d4e5f",
                "status": "OFFLINE",
                "lastRefreshedAt": "2022-10-12T02:00:00Z"
            }"#,
        )
        .unwrap();
        assert!(!device.is_online());
        assert!(device.managed_lock_codes.is_empty());
        assert!(device.battery.is_none());
        assert!(device.unit_id.is_none());
    }

    #[test]
    fn malformed_timestamp_rejects_snapshot() {
        let mut value = snapshot();
        value["managedLockCodes"][0]["startedAddingAt"] = json!("yesterday");
        assert_matches!(
            Device::from_value(value),
            Err(CoreError::Validation(msg)) if msg.contains("Invalid device snapshot")
        );
    }

    #[test]
    fn status_comparison_is_exact() {
        let mut value = snapshot();
        value["status"] = json!("online");
        let device = Device::from_value(value).unwrap();
        assert!(!device.is_online());
    }
}
