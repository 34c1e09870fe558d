use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::core::triage::{self, Thresholds};
use crate::error::{Error, Result};

/// Fresh risk signals for one patient, as delivered by the ingestion feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PatientObservation {
    #[validate(length(min = 1))]
    pub id: String,
    #[serde(alias = "riskProbability", alias = "risk")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub risk_probability: f64,
    #[serde(alias = "timeToRiskMinutes", alias = "timeMinutes")]
    #[validate(range(min = 0.0))]
    pub time_to_risk_minutes: f64,
}

impl PatientObservation {
    pub fn new(id: impl Into<String>, risk_probability: f64, time_to_risk_minutes: f64) -> Self {
        Self {
            id: id.into(),
            risk_probability,
            time_to_risk_minutes,
        }
    }

    /// Rejects NaN, infinities and out-of-range values.
    pub fn check(&self) -> Result<()> {
        // range validators let NaN through
        if !self.risk_probability.is_finite() || !self.time_to_risk_minutes.is_finite() {
            return Err(Error::Validation {
                patient_id: self.id.clone(),
                reason: "risk signals must be finite numbers".to_string(),
            });
        }

        self.validate().map_err(|errors| Error::Validation {
            patient_id: self.id.clone(),
            reason: describe(&errors),
        })
    }
}

fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let codes: Vec<String> = errs.iter().map(|e| e.code.to_string()).collect();
            format!("{} failed {} check", field, codes.join(", "))
        })
        .collect();
    fields.sort();
    fields.join("; ")
}

/// A monitored patient as held by the store.
///
/// Only the two risk signals change after intake. Urgency and time-to-risk
/// levels are not stored; they are computed against the thresholds in force
/// at read time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatientRecord {
    id: String,
    risk_probability: f64,
    time_to_risk_minutes: f64,
    arrival_sequence: u64,
}

impl PatientRecord {
    pub(crate) fn new(
        id: impl Into<String>,
        risk_probability: f64,
        time_to_risk_minutes: f64,
        arrival_sequence: u64,
    ) -> Self {
        Self {
            id: id.into(),
            risk_probability: unsigned_zero(risk_probability),
            time_to_risk_minutes: unsigned_zero(time_to_risk_minutes),
            arrival_sequence,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn risk_probability(&self) -> f64 {
        self.risk_probability
    }

    pub fn time_to_risk_minutes(&self) -> f64 {
        self.time_to_risk_minutes
    }

    pub fn arrival_sequence(&self) -> u64 {
        self.arrival_sequence
    }

    pub(crate) fn apply(&mut self, risk_probability: f64, time_to_risk_minutes: f64) {
        self.risk_probability = unsigned_zero(risk_probability);
        self.time_to_risk_minutes = unsigned_zero(time_to_risk_minutes);
    }

    pub fn ttr_level(&self, thresholds: &Thresholds) -> TtrLevel {
        triage::classify_ttr(self.time_to_risk_minutes, thresholds)
    }

    pub fn urgency_level(&self, thresholds: &Thresholds) -> UrgencyLevel {
        triage::classify_urgency(self.time_to_risk_minutes, thresholds)
    }
}

// -0.0 passes range validation but sorts before 0.0 under total_cmp.
fn unsigned_zero(value: f64) -> f64 {
    value + 0.0
}

/// Time-to-risk badge category. Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TtrLevel {
    Safe,
    Watch,
    Critical,
}

impl TtrLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            TtrLevel::Safe => "safe",
            TtrLevel::Watch => "watch",
            TtrLevel::Critical => "critical",
        }
    }
}

/// Queue urgency category. Ordered from least to most urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
        }
    }
}
