//! Waitless prioritization core
//!
//! Holds the set of monitored patients and orders them for the OPD queue,
//! either by predicted time-to-risk or by arrival.

pub mod core;
pub mod error;
pub mod models;

pub use crate::core::queue::{rank, rank_with, QueueMode, TieBreak};
pub use crate::core::store::{PatientStore, UpsertOutcome};
pub use crate::core::triage::Thresholds;
pub use crate::error::{Error, Result};
pub use crate::models::patient::{PatientObservation, PatientRecord, TtrLevel, UrgencyLevel};

/// Application configuration
pub mod config {
    use std::path::Path;

    use serde::{Deserialize, Serialize};
    use tracing::warn;

    use crate::core::queue::{QueueMode, TieBreak};
    use crate::core::triage::{Thresholds, DEFAULT_CRITICAL_THRESHOLD_MINUTES, DEFAULT_WARNING_THRESHOLD_MINUTES};
    use crate::error::{Error, Result};

    pub const DEFAULT_REFRESH_INTERVAL_SECONDS: u64 = 30;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    pub struct Settings {
        #[serde(default = "default_critical_threshold")]
        pub critical_threshold_minutes: u32,
        #[serde(default = "default_warning_threshold")]
        pub warning_threshold_minutes: u32,
        /// Advisory polling cadence for whatever feeds the store. Not enforced here.
        #[serde(default = "default_refresh_interval")]
        pub refresh_interval_seconds: u64,
        #[serde(default)]
        pub tie_break: TieBreak,
        #[serde(default)]
        pub default_mode: QueueMode,
    }

    fn default_critical_threshold() -> u32 {
        DEFAULT_CRITICAL_THRESHOLD_MINUTES
    }

    fn default_warning_threshold() -> u32 {
        DEFAULT_WARNING_THRESHOLD_MINUTES
    }

    fn default_refresh_interval() -> u64 {
        DEFAULT_REFRESH_INTERVAL_SECONDS
    }

    impl Default for Settings {
        fn default() -> Self {
            Self {
                critical_threshold_minutes: DEFAULT_CRITICAL_THRESHOLD_MINUTES,
                warning_threshold_minutes: DEFAULT_WARNING_THRESHOLD_MINUTES,
                refresh_interval_seconds: DEFAULT_REFRESH_INTERVAL_SECONDS,
                tie_break: TieBreak::default(),
                default_mode: QueueMode::default(),
            }
        }
    }

    impl Settings {
        pub fn thresholds(&self) -> Result<Thresholds> {
            Thresholds::new(self.critical_threshold_minutes, self.warning_threshold_minutes)
        }

        pub fn validate(&self) -> Result<()> {
            self.thresholds()?;
            if self.refresh_interval_seconds == 0 {
                return Err(Error::Configuration(
                    "refresh_interval_seconds must be greater than zero".to_string(),
                ));
            }
            Ok(())
        }

        /// Parse and validate settings from TOML text.
        pub fn from_toml(raw: &str) -> Result<Self> {
            let settings: Settings = config::Config::builder()
                .add_source(config::File::from_str(raw, config::FileFormat::Toml))
                .build()?
                .try_deserialize()?;
            settings.validate()?;
            Ok(settings)
        }
    }

    /// Load configuration from file
    pub fn load_config(overlay: Option<&Path>) -> Result<Settings> {
        // Start with default settings
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false));

        // Override with environment-specific settings
        let env = std::env::var("WAITLESS_ENV").unwrap_or_else(|_| "development".into());
        builder = builder.add_source(config::File::with_name(&format!("config/{}", env)).required(false));

        if let Some(path) = overlay {
            builder = builder.add_source(config::File::from(path));
        }

        // Override with environment variables
        let settings: Settings = builder
            .add_source(config::Environment::with_prefix("WAITLESS").try_parsing(true))
            .build()?
            .try_deserialize()?;

        if let Err(err) = settings.validate() {
            warn!("Rejected configuration: {}", err);
            return Err(err);
        }
        Ok(settings)
    }

}
