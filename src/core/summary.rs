use serde::Serialize;

use crate::core::triage::Thresholds;
use crate::models::patient::{PatientRecord, TtrLevel};

/// Headline figures for the monitoring dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSummary {
    pub total_patients: usize,
    pub average_risk_probability: Option<f64>,
    pub critical_count: usize,
    pub watch_count: usize,
    pub median_time_to_risk_minutes: Option<f64>,
}

impl QueueSummary {
    pub fn from_records(records: &[PatientRecord], thresholds: &Thresholds) -> Self {
        let total_patients = records.len();

        let average_risk_probability = if records.is_empty() {
            None
        } else {
            let sum: f64 = records.iter().map(|r| r.risk_probability()).sum();
            Some(sum / total_patients as f64)
        };

        let levels: Vec<TtrLevel> = records.iter().map(|r| r.ttr_level(thresholds)).collect();
        let critical_count = levels.iter().filter(|l| **l == TtrLevel::Critical).count();
        let watch_count = levels.iter().filter(|l| **l == TtrLevel::Watch).count();

        let mut minutes: Vec<f64> = records.iter().map(|r| r.time_to_risk_minutes()).collect();
        minutes.sort_by(f64::total_cmp);

        Self {
            total_patients,
            average_risk_probability,
            critical_count,
            watch_count,
            median_time_to_risk_minutes: median(&minutes),
        }
    }
}

fn median(sorted: &[f64]) -> Option<f64> {
    let n = sorted.len();
    match n {
        0 => None,
        _ if n % 2 == 1 => Some(sorted[n / 2]),
        _ => Some((sorted[n / 2 - 1] + sorted[n / 2]) / 2.0),
    }
}
