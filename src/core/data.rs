use serde::Deserialize;

use crate::core::store::{PatientStore, UpsertOutcome};
use crate::error::Result;
use crate::models::patient::PatientObservation;

#[derive(Deserialize)]
struct FeedEnvelope {
    patients: Vec<PatientObservation>,
}

/// Decode an ingestion feed payload: either a bare JSON array of
/// observations or an object with a `patients` array.
pub fn parse_feed(raw: &str) -> Result<Vec<PatientObservation>> {
    if raw.trim_start().starts_with('{') {
        let FeedEnvelope { patients } = serde_json::from_str(raw)?;
        Ok(patients)
    } else {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Apply a batch of observations in feed order, stopping at the first rejected entry.
///
/// Entries before the rejected one stay applied.
pub fn ingest(store: &mut PatientStore, observations: Vec<PatientObservation>) -> Result<Vec<UpsertOutcome>> {
    observations
        .into_iter()
        .map(|observation| store.upsert(observation))
        .collect()
}
