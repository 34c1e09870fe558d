//! Patient record store
//!
//! Authoritative collection of monitored patients, keyed by id. Arrival
//! sequences are handed out in intake order and never reused, even after a
//! patient is discharged.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::error::{Error, Result};
use crate::models::patient::{PatientObservation, PatientRecord};

/// What an accepted `upsert` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "lowercase")]
pub enum UpsertOutcome {
    Admitted { arrival_sequence: u64 },
    Updated { arrival_sequence: u64 },
}

impl UpsertOutcome {
    pub fn arrival_sequence(&self) -> u64 {
        match self {
            UpsertOutcome::Admitted { arrival_sequence }
            | UpsertOutcome::Updated { arrival_sequence } => *arrival_sequence,
        }
    }
}

#[derive(Debug, Default)]
pub struct PatientStore {
    records: HashMap<String, PatientRecord>,
    last_sequence: u64,
}

impl PatientStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit a new patient or refresh the risk signals of a known one.
    ///
    /// The observation is validated before anything is touched, so a
    /// rejected write leaves the store exactly as it was.
    #[instrument(level = "debug", skip(self, observation), fields(patient_id = %observation.id))]
    pub fn upsert(&mut self, observation: PatientObservation) -> Result<UpsertOutcome> {
        if let Err(err) = observation.check() {
            warn!("Rejected observation: {}", err);
            return Err(err);
        }

        let PatientObservation {
            id,
            risk_probability,
            time_to_risk_minutes,
        } = observation;

        match self.records.entry(id) {
            Entry::Occupied(mut slot) => {
                let record = slot.get_mut();
                record.apply(risk_probability, time_to_risk_minutes);
                debug!(
                    "Patient updated: {} (risk {}%, ttr {} min)",
                    record.id(),
                    risk_probability,
                    time_to_risk_minutes
                );
                Ok(UpsertOutcome::Updated {
                    arrival_sequence: record.arrival_sequence(),
                })
            }
            Entry::Vacant(slot) => {
                self.last_sequence += 1;
                let arrival_sequence = self.last_sequence;
                let record = PatientRecord::new(
                    slot.key().clone(),
                    risk_probability,
                    time_to_risk_minutes,
                    arrival_sequence,
                );
                debug!("Patient admitted: {} (arrival #{})", record.id(), arrival_sequence);
                slot.insert(record);
                Ok(UpsertOutcome::Admitted { arrival_sequence })
            }
        }
    }

    /// Discharge a patient. Unknown ids are an error rather than a no-op.
    #[instrument(level = "debug", skip(self), fields(patient_id = %id))]
    pub fn remove(&mut self, id: &str) -> Result<PatientRecord> {
        match self.records.remove(id) {
            Some(record) => {
                debug!("Patient discharged: {}", id);
                Ok(record)
            }
            None => {
                warn!("Discharge requested for unknown patient: {}", id);
                Err(Error::NotFound(id.to_string()))
            }
        }
    }

    /// Owned copy of every record, in no particular order.
    pub fn list(&self) -> Vec<PatientRecord> {
        self.records.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Option<&PatientRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
