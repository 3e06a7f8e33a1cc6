use super::domain::{
    Claim, ClaimCategory, ClaimId, ClaimantHistory, DocumentExtraction, DocumentRef, WorkflowState,
};
use super::gamification::GamificationProfile;
use super::scoring::FeatureVector;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Storage abstraction for claim aggregates. `update` performs an
/// optimistic check-and-set against `expected_version` so concurrent
/// transitions on the same claim cannot interleave.
pub trait ClaimRepository: Send + Sync {
    fn insert(&self, claim: Claim) -> Result<Claim, RepositoryError>;
    fn fetch(&self, id: &ClaimId) -> Result<Option<Claim>, RepositoryError>;
    fn update(&self, claim: Claim, expected_version: u64) -> Result<Claim, RepositoryError>;
    fn by_state(&self, state: WorkflowState) -> Result<Vec<Claim>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Duplicate,
    #[error("record not found")]
    NotFound,
    #[error("concurrent update lost the version check; retry")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Storage abstraction for gamification profiles.
pub trait ProfileRepository: Send + Sync {
    fn fetch_or_create(&self, claimant_id: &str) -> Result<GamificationProfile, RepositoryError>;
    fn update(&self, profile: GamificationProfile) -> Result<(), RepositoryError>;
}

/// Read-only projection of a claimant's prior claims inside a trailing
/// window. The service absorbs failures into an empty history, so an
/// outage here can never fail a scoring pass.
pub trait ClaimantHistoryProvider: Send + Sync {
    fn history(
        &self,
        claimant_id: &str,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> Result<ClaimantHistory, RepositoryError>;
}

/// External document-analysis collaborator. Absence or failure is a valid
/// state; the scoring pass then carries zero document-risk contribution.
pub trait DocumentAnalyzer: Send + Sync {
    fn extract(&self, document: &DocumentRef) -> Result<DocumentExtraction, AnalyzerError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("document analysis unavailable: {0}")]
    Unavailable(String),
    #[error("document analysis timed out")]
    Timeout,
}

/// Message kinds pushed to actors on workflow transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    ClaimForwarded,
    ClaimApproved,
    ClaimRejected,
    InfoRequested,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub recipient: String,
    pub claim_id: ClaimId,
    pub kind: NotificationKind,
    pub message: String,
}

/// Fire-and-forget notification hook. Failures are logged by the caller
/// and never fail the transition that triggered them.
pub trait NotificationPublisher: Send + Sync {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// Snapshot of an agent-rejected claim retained for model retraining.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FraudPattern {
    pub claim_id: ClaimId,
    pub fraud_score: u8,
    pub amount: u64,
    pub category: ClaimCategory,
    pub rejected_by: String,
    pub reason: String,
    pub features: FeatureVector,
}

pub trait FraudPatternSink: Send + Sync {
    fn record(&self, pattern: FraudPattern) -> Result<(), RepositoryError>;
}
