//! Alert state tracking and de-duplicated event emission.
//!
//! Each poll cycle the tracker compares the reconciled view against the
//! per-machine alert state it carries and emits events with stable
//! notification identifiers (`"critical-2"`, `"danger-7"`). Re-emitting under
//! the same identifier lets the presentation boundary coalesce in place
//! instead of stacking duplicates under a fast polling cadence. Transitions
//! are explicit: a machine is newly alarming, still alarming, or recovered.

use std::collections::HashMap;

use crate::data::{FleetView, MachineId, MachineStatus};

/// Alarm severity. Only Danger and Critical raise alerts; Healthy and Alert
/// statuses never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AlertSeverity {
    Danger,
    Critical,
}

impl AlertSeverity {
    /// The alarm severity for a status, if it is alarming at all.
    pub fn from_status(status: MachineStatus) -> Option<Self> {
        match status {
            MachineStatus::Critical => Some(AlertSeverity::Critical),
            MachineStatus::Danger => Some(AlertSeverity::Danger),
            MachineStatus::Healthy | MachineStatus::Alert => None,
        }
    }

    /// Lowercase label used in notification identifiers.
    pub fn label(&self) -> &'static str {
        match self {
            AlertSeverity::Danger => "danger",
            AlertSeverity::Critical => "critical",
        }
    }

    fn status_label(&self) -> &'static str {
        match self {
            AlertSeverity::Danger => "Danger",
            AlertSeverity::Critical => "Critical",
        }
    }

    /// Stable notification identifier for a (severity, machine) pair.
    ///
    /// The same pair always yields the same id, so the consumer replaces the
    /// existing notification rather than showing a new one.
    pub fn notification_id(&self, machine_id: MachineId) -> String {
        format!("{}-{}", self.label(), machine_id)
    }
}

/// How an alert relates to the previous cycle's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertTransition {
    /// The machine newly entered this severity.
    Raised,
    /// The machine is still in this severity; same notification id re-emitted.
    Active,
    /// The machine left this severity (recovered, changed severity, or
    /// disappeared from the registry).
    Resolved,
}

/// A single alert notification for the presentation boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertEvent {
    pub machine_id: MachineId,
    pub machine_name: String,
    pub severity: AlertSeverity,
    pub transition: AlertTransition,
    pub notification_id: String,
    pub message: String,
}

#[derive(Debug, Clone)]
struct ActiveAlert {
    severity: AlertSeverity,
    machine_name: String,
}

/// Tracks previously-notified alert state per machine.
///
/// In-memory only; cleared by session restart. State grows with the number
/// of alarming machines, not with the number of cycles.
#[derive(Debug, Default)]
pub struct AlertTracker {
    active: HashMap<MachineId, ActiveAlert>,
}

impl AlertTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one cycle's view against the tracked state.
    ///
    /// Emission order: Critical alerts first, then Danger, each in registry
    /// order; Resolved events last (registry order, then vanished machines
    /// by id). Evaluating the same view twice yields events with identical
    /// notification ids both times.
    pub fn evaluate(&mut self, view: &FleetView) -> Vec<AlertEvent> {
        let mut critical = Vec::new();
        let mut danger = Vec::new();
        let mut resolved = Vec::new();

        for entry in view.entries() {
            let machine = &entry.machine;
            match AlertSeverity::from_status(machine.status) {
                Some(severity) => {
                    let transition = match self.active.get(&machine.id) {
                        Some(prev) if prev.severity == severity => AlertTransition::Active,
                        Some(prev) => {
                            // Severity changed: close out the old id first
                            resolved.push(resolved_event(machine.id, prev));
                            AlertTransition::Raised
                        }
                        None => AlertTransition::Raised,
                    };
                    self.active.insert(
                        machine.id,
                        ActiveAlert {
                            severity,
                            machine_name: machine.name.clone(),
                        },
                    );
                    let event = alarm_event(machine.id, &machine.name, severity, transition);
                    match severity {
                        AlertSeverity::Critical => critical.push(event),
                        AlertSeverity::Danger => danger.push(event),
                    }
                }
                None => {
                    if let Some(prev) = self.active.remove(&machine.id) {
                        resolved.push(resolved_event(machine.id, &prev));
                    }
                }
            }
        }

        // Machines that disappeared from the registry resolve too
        let mut vanished: Vec<MachineId> = self
            .active
            .keys()
            .copied()
            .filter(|id| view.get(*id).is_none())
            .collect();
        vanished.sort_unstable();
        for id in vanished {
            if let Some(prev) = self.active.remove(&id) {
                resolved.push(resolved_event(id, &prev));
            }
        }

        let mut events = critical;
        events.append(&mut danger);
        events.append(&mut resolved);
        events
    }

    /// Number of machines with an active alert.
    pub fn active_count(&self) -> usize {
        self.active.len()
    }
}

fn alarm_event(
    machine_id: MachineId,
    machine_name: &str,
    severity: AlertSeverity,
    transition: AlertTransition,
) -> AlertEvent {
    let message = match severity {
        AlertSeverity::Critical => {
            format!("CRITICAL ALARM: {} is in Critical state!", machine_name)
        }
        AlertSeverity::Danger => format!("WARNING: {} is showing instability.", machine_name),
    };
    AlertEvent {
        machine_id,
        machine_name: machine_name.to_string(),
        severity,
        transition,
        notification_id: severity.notification_id(machine_id),
        message,
    }
}

fn resolved_event(machine_id: MachineId, prev: &ActiveAlert) -> AlertEvent {
    AlertEvent {
        machine_id,
        machine_name: prev.machine_name.clone(),
        severity: prev.severity,
        transition: AlertTransition::Resolved,
        notification_id: prev.severity.notification_id(machine_id),
        message: format!(
            "RESOLVED: {} has left {} state.",
            prev.machine_name,
            prev.severity.status_label()
        ),
    }
}
