pub mod alerts;
pub mod data;
pub mod monitor;
pub mod queue;
pub mod store;
pub mod summary;
pub mod triage;
