//! Alert feed derived from successive store snapshots.

use std::collections::HashMap;

use serde::Serialize;

use crate::core::triage::Thresholds;
use crate::models::patient::{PatientRecord, TtrLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertEvent {
    pub patient_id: String,
    pub severity: AlertSeverity,
    /// `None` when the patient was not in the previous snapshot.
    pub from: Option<TtrLevel>,
    pub to: TtrLevel,
    pub message: String,
}

/// Compare two snapshots and report every patient whose time-to-risk level moved.
///
/// New patients raise an event only when they arrive outside the safe band.
/// Discharged patients raise nothing. Events come back most severe first,
/// then by patient id.
pub fn detect_transitions(
    previous: &[PatientRecord],
    current: &[PatientRecord],
    thresholds: &Thresholds,
) -> Vec<AlertEvent> {
    let before: HashMap<&str, TtrLevel> = previous
        .iter()
        .map(|record| (record.id(), record.ttr_level(thresholds)))
        .collect();

    let mut events: Vec<AlertEvent> = current
        .iter()
        .filter_map(|record| {
            let from = before.get(record.id()).copied();
            let to = record.ttr_level(thresholds);
            transition(record, from, to, thresholds)
        })
        .collect();

    events.sort_by(|a, b| b.severity.cmp(&a.severity).then_with(|| a.patient_id.cmp(&b.patient_id)));
    events
}

fn transition(
    record: &PatientRecord,
    from: Option<TtrLevel>,
    to: TtrLevel,
    thresholds: &Thresholds,
) -> Option<AlertEvent> {
    let id = record.id();
    let (severity, message) = match (from, to) {
        (Some(a), b) if a == b => return None,
        (None, TtrLevel::Safe) => return None,
        (_, TtrLevel::Critical) => (
            AlertSeverity::Critical,
            format!(
                "Patient {} Time-to-Risk has fallen below critical threshold ({} min)",
                id,
                thresholds.critical_minutes()
            ),
        ),
        (Some(TtrLevel::Critical), TtrLevel::Watch) => (
            AlertSeverity::Info,
            format!("Patient {} has moved out of the critical band, monitor closely", id),
        ),
        (_, TtrLevel::Watch) => (
            AlertSeverity::Warning,
            format!(
                "Patient {} Time-to-Risk reduced to {} min",
                id,
                record.time_to_risk_minutes()
            ),
        ),
        (Some(_), TtrLevel::Safe) => (
            AlertSeverity::Info,
            format!("Patient {} recovery progressing normally, low risk", id),
        ),
    };

    Some(AlertEvent {
        patient_id: id.to_string(),
        severity,
        from,
        to,
        message,
    })
}
