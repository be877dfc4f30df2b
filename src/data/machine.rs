//! Domain model for machines and sensor readings.
//!
//! These types match the JSON wire format served by the fleet registry API.
//! They serve as the common data format between the registry service and
//! this watcher/consumer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable machine identifier assigned by the registry.
pub type MachineId = i64;

/// Authoritative health status of a machine, ordered by increasing severity.
///
/// The registry is the single source of this classification; the client never
/// recomputes it from sensor thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MachineStatus {
    Healthy,
    Alert,
    Danger,
    Critical,
}

impl MachineStatus {
    /// True for the statuses that raise fleet alarms (Danger and Critical).
    pub fn is_alarming(&self) -> bool {
        matches!(self, MachineStatus::Danger | MachineStatus::Critical)
    }

    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            MachineStatus::Healthy => "OK",
            MachineStatus::Alert => "ALRT",
            MachineStatus::Danger => "DNGR",
            MachineStatus::Critical => "CRIT",
        }
    }
}

/// The kind of industrial machine.
///
/// Unknown kinds deserialize to [`MachineKind::Other`] so that registry-side
/// additions don't break older clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MachineKind {
    Motor,
    Fan,
    Compressor,
    Pump,
    #[serde(other)]
    Other,
}

/// A machine as known to the fleet registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    pub id: MachineId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MachineKind,
    pub location: String,
    pub status: MachineStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

/// A single sensor reading belonging to exactly one machine.
///
/// Readings are append-only on the server; the client only ever observes the
/// most recent one (or a bounded recent history window) per machine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: i64,
    pub machine_id: MachineId,
    pub timestamp: DateTime<Utc>,
    /// Temperature in degrees Celsius.
    pub temperature: f64,
    /// Rotational speed in RPM.
    pub speed: f64,
    /// Vibration (RMS).
    pub vibration: f64,
    /// Health score in [0, 100].
    pub health_score: f64,
}

/// Payload for registering a new machine.
///
/// Status is assigned by the registry (new machines start Healthy).
#[derive(Debug, Clone, Serialize)]
pub struct MachinePayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: MachineKind,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Partial update for an existing machine. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MachineUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<MachineStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_ordering_by_severity() {
        assert!(MachineStatus::Healthy < MachineStatus::Alert);
        assert!(MachineStatus::Alert < MachineStatus::Danger);
        assert!(MachineStatus::Danger < MachineStatus::Critical);
    }

    #[test]
    fn test_alarming_statuses() {
        assert!(!MachineStatus::Healthy.is_alarming());
        assert!(!MachineStatus::Alert.is_alarming());
        assert!(MachineStatus::Danger.is_alarming());
        assert!(MachineStatus::Critical.is_alarming());
    }

    #[test]
    fn test_deserialize_machine() {
        let json = r#"{
            "id": 3,
            "name": "Conveyor Motor A",
            "type": "Motor",
            "location": "Hall 1",
            "status": "Healthy",
            "last_updated": "2024-05-01T12:00:00Z"
        }"#;

        let machine: Machine = serde_json::from_str(json).unwrap();
        assert_eq!(machine.id, 3);
        assert_eq!(machine.kind, MachineKind::Motor);
        assert_eq!(machine.status, MachineStatus::Healthy);
        assert!(machine.image_url.is_none());
        assert!(machine.last_updated.is_some());
    }

    #[test]
    fn test_unknown_machine_kind_falls_back_to_other() {
        let json = r#"{
            "id": 9,
            "name": "Chiller",
            "type": "Chiller",
            "location": "Roof",
            "status": "Alert"
        }"#;

        let machine: Machine = serde_json::from_str(json).unwrap();
        assert_eq!(machine.kind, MachineKind::Other);
    }

    #[test]
    fn test_deserialize_reading() {
        let json = r#"{
            "id": 100,
            "machine_id": 3,
            "timestamp": "2024-05-01T12:00:05Z",
            "temperature": 41.5,
            "speed": 1480.0,
            "vibration": 0.12,
            "health_score": 97.3
        }"#;

        let reading: Reading = serde_json::from_str(json).unwrap();
        assert_eq!(reading.machine_id, 3);
        assert_eq!(reading.temperature, 41.5);
        assert_eq!(reading.health_score, 97.3);
    }

    #[test]
    fn test_machine_update_skips_unset_fields() {
        let update = MachineUpdate {
            status: Some(MachineStatus::Danger),
            ..Default::default()
        };
        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"status":"Danger"}"#);
    }
}
