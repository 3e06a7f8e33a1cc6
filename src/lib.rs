//! Claims triage: fraud-risk scoring and multi-party approval workflows
//! for submitted insurance claims.

pub mod config;
pub mod error;
pub mod server;
pub mod telemetry;
pub mod workflows;
