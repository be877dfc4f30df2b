//! Fleet-wide aggregate statistics.

use super::machine::MachineStatus;
use super::view::FleetView;

/// Fleet-wide counts derived from a reconciled view.
///
/// A pure projection, recomputed every cycle and never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetStats {
    /// Total number of machines in the registry snapshot.
    pub total: usize,
    /// Machines in Critical or Danger state.
    pub critical: usize,
    /// Machines in Healthy state.
    pub healthy: usize,
}

impl FleetStats {
    /// Project stats from a view. Empty views yield all-zero counts.
    pub fn project(view: &FleetView) -> Self {
        let mut stats = Self {
            total: view.len(),
            ..Self::default()
        };
        for entry in view.entries() {
            match entry.machine.status {
                MachineStatus::Healthy => stats.healthy += 1,
                MachineStatus::Danger | MachineStatus::Critical => stats.critical += 1,
                MachineStatus::Alert => {}
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::machine::{Machine, MachineKind, MachineStatus};

    fn machine(id: i64, status: MachineStatus) -> Machine {
        Machine {
            id,
            name: format!("Machine {}", id),
            kind: MachineKind::Fan,
            location: "Hall 2".to_string(),
            status,
            image_url: None,
            last_updated: None,
        }
    }

    #[test]
    fn test_empty_view_yields_zero_counts() {
        let view = FleetView::empty();
        assert_eq!(FleetStats::project(&view), FleetStats::default());
    }

    #[test]
    fn test_counts_by_status() {
        let machines = vec![
            machine(1, MachineStatus::Healthy),
            machine(2, MachineStatus::Healthy),
            machine(3, MachineStatus::Alert),
            machine(4, MachineStatus::Danger),
            machine(5, MachineStatus::Critical),
        ];
        let view = FleetView::reconcile(machines, Vec::new());
        let stats = FleetStats::project(&view);

        assert_eq!(stats.total, 5);
        assert_eq!(stats.critical, 2); // Danger + Critical
        assert_eq!(stats.healthy, 2);
    }

    #[test]
    fn test_alert_counts_toward_neither_bucket() {
        let view = FleetView::reconcile(vec![machine(1, MachineStatus::Alert)], Vec::new());
        let stats = FleetStats::project(&view);
        assert_eq!(stats.total, 1);
        assert_eq!(stats.critical, 0);
        assert_eq!(stats.healthy, 0);
    }
}
