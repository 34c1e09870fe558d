//! Thread-safe host around the patient store.
//!
//! Every store access goes through one mutex so a snapshot never sees a
//! half-applied write. Ranking happens on the owned snapshot after the lock
//! is released.

use std::sync::{Mutex, MutexGuard, PoisonError, RwLock};

use tracing::{info, instrument};

use crate::config::Settings;
use crate::core::alerts::{self, AlertEvent};
use crate::core::queue::{self, QueueMode, TieBreak};
use crate::core::store::{PatientStore, UpsertOutcome};
use crate::core::summary::QueueSummary;
use crate::core::triage::Thresholds;
use crate::error::Result;
use crate::models::patient::{PatientObservation, PatientRecord};

#[derive(Debug, Clone, Copy)]
struct Policy {
    thresholds: Thresholds,
    tie_break: TieBreak,
}

#[derive(Debug)]
pub struct Monitor {
    store: Mutex<PatientStore>,
    policy: RwLock<Policy>,
}

impl Monitor {
    pub fn new(settings: &Settings) -> Result<Self> {
        Ok(Self {
            store: Mutex::new(PatientStore::new()),
            policy: RwLock::new(Policy {
                thresholds: settings.thresholds()?,
                tie_break: settings.tie_break,
            }),
        })
    }

    // upsert validates before it mutates, so a poisoned store is still consistent.
    fn store(&self) -> MutexGuard<'_, PatientStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn policy(&self) -> Policy {
        *self.policy.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn upsert(&self, observation: PatientObservation) -> Result<UpsertOutcome> {
        self.store().upsert(observation)
    }

    pub fn remove(&self, id: &str) -> Result<PatientRecord> {
        self.store().remove(id)
    }

    pub fn snapshot(&self) -> Vec<PatientRecord> {
        self.store().list()
    }

    pub fn thresholds(&self) -> Thresholds {
        self.policy().thresholds
    }

    /// Current queue in `mode`. The policy is read once, before the
    /// snapshot, so one call never mixes two tie-break settings.
    pub fn ranked(&self, mode: QueueMode) -> Vec<PatientRecord> {
        let policy = self.policy();
        queue::rank_with(&self.snapshot(), mode, policy.tie_break)
    }

    /// Headline figures. The policy is read once, before the snapshot.
    pub fn summary(&self) -> QueueSummary {
        let policy = self.policy();
        QueueSummary::from_records(&self.snapshot(), &policy.thresholds)
    }

    /// Level transitions between `previous` and the store's current contents,
    /// classified against one policy read taken before the snapshot.
    pub fn transitions_since(&self, previous: &[PatientRecord]) -> Vec<AlertEvent> {
        let policy = self.policy();
        alerts::detect_transitions(previous, &self.snapshot(), &policy.thresholds)
    }

    /// Swap in new thresholds and tie-break policy. Invalid settings leave
    /// the current policy in force.
    #[instrument(skip(self, settings))]
    pub fn apply_settings(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        let next = Policy {
            thresholds: settings.thresholds()?,
            tie_break: settings.tie_break,
        };
        *self.policy.write().unwrap_or_else(PoisonError::into_inner) = next;
        info!(
            "Thresholds applied: critical {} min, warning {} min",
            next.thresholds.critical_minutes(),
            next.thresholds.warning_minutes()
        );
        Ok(())
    }
}
