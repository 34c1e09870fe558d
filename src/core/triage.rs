//! Threshold classification for time-to-risk and urgency badges.
//!
//! Comparisons are inclusive at the more urgent boundary: a patient exactly
//! at the critical threshold is critical, not watch.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::patient::{TtrLevel, UrgencyLevel};

pub const DEFAULT_CRITICAL_THRESHOLD_MINUTES: u32 = 30;
pub const DEFAULT_WARNING_THRESHOLD_MINUTES: u32 = 120;

/// Validated pair of time-to-risk boundaries, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Thresholds {
    critical_minutes: u32,
    warning_minutes: u32,
}

impl Thresholds {
    pub fn new(critical_minutes: u32, warning_minutes: u32) -> Result<Self> {
        if critical_minutes > warning_minutes {
            return Err(Error::Configuration(format!(
                "critical threshold ({} min) must not exceed warning threshold ({} min)",
                critical_minutes, warning_minutes
            )));
        }
        Ok(Self {
            critical_minutes,
            warning_minutes,
        })
    }

    pub fn critical_minutes(&self) -> u32 {
        self.critical_minutes
    }

    pub fn warning_minutes(&self) -> u32 {
        self.warning_minutes
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            critical_minutes: DEFAULT_CRITICAL_THRESHOLD_MINUTES,
            warning_minutes: DEFAULT_WARNING_THRESHOLD_MINUTES,
        }
    }
}

pub fn classify_ttr(time_to_risk_minutes: f64, thresholds: &Thresholds) -> TtrLevel {
    if time_to_risk_minutes <= f64::from(thresholds.critical_minutes) {
        TtrLevel::Critical
    } else if time_to_risk_minutes <= f64::from(thresholds.warning_minutes) {
        TtrLevel::Watch
    } else {
        TtrLevel::Safe
    }
}

/// Urgency follows the same boundaries as the time-to-risk level.
pub fn classify_urgency(time_to_risk_minutes: f64, thresholds: &Thresholds) -> UrgencyLevel {
    match classify_ttr(time_to_risk_minutes, thresholds) {
        TtrLevel::Critical => UrgencyLevel::High,
        TtrLevel::Watch => UrgencyLevel::Medium,
        TtrLevel::Safe => UrgencyLevel::Low,
    }
}
