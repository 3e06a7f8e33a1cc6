//! Claim intake, fraud scoring, explanation, and the approval workflow.
//!
//! The scoring engine and the workflow state machine are deliberately
//! coupled through [`scoring::ScoringOutcome`]: the score decides routing,
//! and the explanation is reproducible from the same inputs that produced
//! the score.

pub mod domain;
pub mod explanation;
pub mod gamification;
pub mod intake;
pub mod memory;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;
pub mod workflow;

#[cfg(test)]
mod tests;

pub use domain::{
    Claim, ClaimCategory, ClaimId, ClaimStatusView, ClaimSubmission, ClaimantHistory,
    DocumentExtraction, DocumentQuality, DocumentRef, NarrativeVerdict, TenancyMode,
    WorkflowEntry, WorkflowState,
};
pub use explanation::{Decision, Explanation, ExplanationBuilder};
pub use gamification::{Badge, GamificationLedger, GamificationProfile};
pub use intake::IntakeError;
pub use repository::{
    AnalyzerError, ClaimRepository, ClaimantHistoryProvider, DocumentAnalyzer, FraudPattern,
    FraudPatternSink, Notification, NotificationError, NotificationKind, NotificationPublisher,
    ProfileRepository, RepositoryError,
};
pub use router::claims_router;
pub use scoring::{
    fallback_probability, BlendedScore, FactorCategory, FactorPolarity, FeatureVector,
    FraudModel, ModelError, RiskAssessment, RiskFactor, RiskTier, RuleModel, ScoringConfig,
    ScoringEngine, ScoringOutcome,
};
pub use service::{ClaimService, ClaimServiceError, Collaborators};
pub use workflow::{ClaimWorkflow, TerminalEvent, Transition, TransitionOutcome, WorkflowError};
