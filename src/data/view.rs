//! Snapshot reconciliation.
//!
//! Merges a machine-registry snapshot and a latest-readings snapshot from the
//! same fetch cycle into a coherent per-machine view.

use std::collections::HashMap;
use std::time::Instant;

use super::machine::{Machine, MachineId, Reading};

/// One machine together with its most recent reading, if any.
///
/// An absent reading is a normal condition (e.g. a newly registered machine)
/// and renders as "no data", never as zeroed sensor values.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineEntry {
    pub machine: Machine,
    pub reading: Option<Reading>,
}

/// The reconciled per-machine view of one snapshot pair.
///
/// Entries preserve registry order. The view is entirely replaced on every
/// successful fetch cycle, never incrementally patched, so both collections
/// are always from the same cycle's snapshot pair.
#[derive(Debug, Clone)]
pub struct FleetView {
    entries: Vec<MachineEntry>,
    by_id: HashMap<MachineId, usize>,
    pub last_updated: Instant,
}

impl FleetView {
    /// Create an empty view.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            by_id: HashMap::new(),
            last_updated: Instant::now(),
        }
    }

    /// Merge a machine snapshot and a reading snapshot into a view.
    ///
    /// Every machine in the registry snapshot appears exactly once, with its
    /// matching reading attached or absent if none exists in this cycle's
    /// reading snapshot. If the reading snapshot ever contains duplicates for
    /// one machine id, the later entry in iteration order wins.
    pub fn reconcile(machines: Vec<Machine>, readings: Vec<Reading>) -> Self {
        let mut latest: HashMap<MachineId, Reading> = HashMap::with_capacity(readings.len());
        for reading in readings {
            latest.insert(reading.machine_id, reading);
        }

        let mut by_id = HashMap::with_capacity(machines.len());
        let entries: Vec<MachineEntry> = machines
            .into_iter()
            .enumerate()
            .map(|(index, machine)| {
                by_id.insert(machine.id, index);
                let reading = latest.remove(&machine.id);
                MachineEntry { machine, reading }
            })
            .collect();

        Self {
            entries,
            by_id,
            last_updated: Instant::now(),
        }
    }

    /// Entries in registry order.
    pub fn entries(&self) -> &[MachineEntry] {
        &self.entries
    }

    /// Look up a machine's entry by id.
    pub fn get(&self, id: MachineId) -> Option<&MachineEntry> {
        self.by_id.get(&id).map(|&index| &self.entries[index])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::machine::{MachineKind, MachineStatus};
    use chrono::{TimeZone, Utc};

    fn machine(id: MachineId, status: MachineStatus) -> Machine {
        Machine {
            id,
            name: format!("Machine {}", id),
            kind: MachineKind::Pump,
            location: "Hall 1".to_string(),
            status,
            image_url: None,
            last_updated: None,
        }
    }

    fn reading(id: i64, machine_id: MachineId, temperature: f64) -> Reading {
        Reading {
            id,
            machine_id,
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            temperature,
            speed: 1500.0,
            vibration: 0.1,
            health_score: 95.0,
        }
    }

    #[test]
    fn test_reconcile_one_entry_per_machine() {
        let machines = vec![
            machine(1, MachineStatus::Healthy),
            machine(2, MachineStatus::Critical),
            machine(3, MachineStatus::Alert),
        ];
        let readings = vec![reading(10, 1, 40.0), reading(11, 3, 55.0)];

        let view = FleetView::reconcile(machines, readings);
        assert_eq!(view.len(), 3);

        // Readings matched by machine id, absent when none exists
        assert!(view.get(1).unwrap().reading.is_some());
        assert!(view.get(2).unwrap().reading.is_none());
        assert!(view.get(3).unwrap().reading.is_some());
    }

    #[test]
    fn test_reconcile_preserves_registry_order() {
        let machines = vec![
            machine(7, MachineStatus::Healthy),
            machine(2, MachineStatus::Healthy),
            machine(5, MachineStatus::Healthy),
        ];
        let view = FleetView::reconcile(machines, Vec::new());

        let ids: Vec<MachineId> = view.entries().iter().map(|e| e.machine.id).collect();
        assert_eq!(ids, vec![7, 2, 5]);
    }

    #[test]
    fn test_reconcile_duplicate_readings_later_wins() {
        let machines = vec![machine(1, MachineStatus::Healthy)];
        let readings = vec![reading(10, 1, 40.0), reading(11, 1, 44.0)];

        let view = FleetView::reconcile(machines, readings);
        let attached = view.get(1).unwrap().reading.as_ref().unwrap();
        assert_eq!(attached.id, 11);
        assert_eq!(attached.temperature, 44.0);
    }

    #[test]
    fn test_reconcile_ignores_readings_for_unknown_machines() {
        let machines = vec![machine(1, MachineStatus::Healthy)];
        let readings = vec![reading(10, 99, 40.0)];

        let view = FleetView::reconcile(machines, readings);
        assert_eq!(view.len(), 1);
        assert!(view.get(1).unwrap().reading.is_none());
        assert!(view.get(99).is_none());
    }

    #[test]
    fn test_empty_snapshots_reconcile_to_empty_view() {
        let view = FleetView::reconcile(Vec::new(), Vec::new());
        assert!(view.is_empty());
        assert_eq!(view.len(), 0);
    }
}
