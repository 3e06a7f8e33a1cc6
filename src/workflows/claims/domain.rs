use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::scoring::ScoringOutcome;

/// Identifier wrapper for submitted claims.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClaimId(pub String);

impl fmt::Display for ClaimId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Insurance line determining which scoring profile applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClaimCategory {
    Health,
    Motor,
    Property,
    Travel,
    Life,
}

impl ClaimCategory {
    pub const fn label(self) -> &'static str {
        match self {
            ClaimCategory::Health => "health",
            ClaimCategory::Motor => "motor",
            ClaimCategory::Property => "property",
            ClaimCategory::Travel => "travel",
            ClaimCategory::Life => "life",
        }
    }
}

/// Reference to an uploaded supporting document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub storage_key: String,
}

/// Immutable claimant-provided snapshot captured once at submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimSubmission {
    pub claimant_id: String,
    pub policy_number: String,
    pub category: ClaimCategory,
    pub amount: u64,
    pub description: String,
    pub claimant_age: u8,
    pub policy_duration_months: u32,
    pub submitted_at: DateTime<Utc>,
    pub documents: Vec<DocumentRef>,
}

/// Legibility tier reported by the document-analysis collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentQuality {
    Clear,
    Blurry,
    Damaged,
    Unclear,
}

impl DocumentQuality {
    pub const fn label(self) -> &'static str {
        match self {
            DocumentQuality::Clear => "clear",
            DocumentQuality::Blurry => "blurry",
            DocumentQuality::Damaged => "damaged",
            DocumentQuality::Unclear => "unclear",
        }
    }
}

/// Verdict on whether the claimant's narrative matches the documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NarrativeVerdict {
    Consistent,
    Inconsistent,
    NeedsReview,
}

/// Structured result produced by the external document analyzer.
///
/// Absence of this value is a valid state (collaborator unavailable) and
/// degrades scoring gracefully rather than failing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentExtraction {
    pub claim_amount: Option<u64>,
    pub provider_name: Option<String>,
    pub quality: DocumentQuality,
    pub red_flags: Vec<String>,
    pub missing_fields: Vec<String>,
    pub confidence_score: u8,
    pub narrative: NarrativeVerdict,
    pub consistency_score: u8,
}

/// Windowed projection over a claimant's prior claims. Computed fresh per
/// scoring pass; never persisted on its own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimantHistory {
    pub active_claims: u32,
    pub rejected_claims: u32,
}

/// Whether the claim is routed automatically or through agent and admin
/// review steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenancyMode {
    Automated,
    MultiParty,
}

/// Lifecycle states tracked by the claim workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Submitted,
    AgentReview,
    AdminReview,
    UnderReview,
    InfoRequested,
    Approved,
    Rejected,
}

impl WorkflowState {
    pub const fn label(self) -> &'static str {
        match self {
            WorkflowState::Submitted => "submitted",
            WorkflowState::AgentReview => "agent_review",
            WorkflowState::AdminReview => "admin_review",
            WorkflowState::UnderReview => "under_review",
            WorkflowState::InfoRequested => "info_requested",
            WorkflowState::Approved => "approved",
            WorkflowState::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "submitted" => Some(WorkflowState::Submitted),
            "agent_review" => Some(WorkflowState::AgentReview),
            "admin_review" => Some(WorkflowState::AdminReview),
            "under_review" => Some(WorkflowState::UnderReview),
            "info_requested" => Some(WorkflowState::InfoRequested),
            "approved" => Some(WorkflowState::Approved),
            "rejected" => Some(WorkflowState::Rejected),
            _ => None,
        }
    }

    /// Approved and rejected are final; nothing transitions out of them.
    pub const fn is_terminal(self) -> bool {
        matches!(self, WorkflowState::Approved | WorkflowState::Rejected)
    }

    /// States in which a human reviewer currently holds the claim.
    pub const fn is_review(self) -> bool {
        matches!(
            self,
            WorkflowState::AgentReview | WorkflowState::AdminReview | WorkflowState::UnderReview
        )
    }
}

/// Single append-only entry in a claim's workflow history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowEntry {
    pub state: WorkflowState,
    pub timestamp: DateTime<Utc>,
    pub actor: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assessment: Option<super::scoring::RiskAssessment>,
}

/// The workflow-bearing claim aggregate.
///
/// Mutated only through [`super::workflow::ClaimWorkflow`] transitions; the
/// history is append-only and the current state always equals the state of
/// the last history entry. `version` backs the optimistic check-and-set at
/// the repository boundary, and `rewards_settled` is flipped atomically with
/// the first terminal transition so gamification applies exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub id: ClaimId,
    pub submission: ClaimSubmission,
    pub mode: TenancyMode,
    pub state: WorkflowState,
    pub history: Vec<WorkflowEntry>,
    pub scoring_passes: Vec<ScoringOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction: Option<DocumentExtraction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejected_by: Option<String>,
    pub rewards_settled: bool,
    pub version: u64,
}

impl Claim {
    /// Open a fresh claim with its submission entry already on the history.
    pub fn new(id: ClaimId, submission: ClaimSubmission, mode: TenancyMode) -> Self {
        let opening = WorkflowEntry {
            state: WorkflowState::Submitted,
            timestamp: submission.submitted_at,
            actor: submission.claimant_id.clone(),
            notes: None,
            assessment: None,
        };

        Self {
            id,
            submission,
            mode,
            state: WorkflowState::Submitted,
            history: vec![opening],
            scoring_passes: Vec::new(),
            extraction: None,
            assigned_agent: None,
            approved_amount: None,
            approved_by: None,
            rejection_reason: None,
            rejected_by: None,
            rewards_settled: false,
            version: 0,
        }
    }

    pub fn latest_pass(&self) -> Option<&ScoringOutcome> {
        self.scoring_passes.last()
    }

    pub fn decision_rationale(&self) -> String {
        match self.latest_pass() {
            Some(pass) => pass.explanation.recommendation.clone(),
            None => "pending fraud scoring".to_string(),
        }
    }

    pub fn status_view(&self) -> ClaimStatusView {
        let pass = self.latest_pass();
        ClaimStatusView {
            claim_id: self.id.clone(),
            state: self.state.label(),
            fraud_score: pass.map(|p| p.assessment.score),
            risk_tier: pass.map(|p| p.assessment.tier.label()),
            decision_rationale: self.decision_rationale(),
            approved_amount: self.approved_amount,
        }
    }
}

/// Sanitized representation of a claim's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct ClaimStatusView {
    pub claim_id: ClaimId,
    pub state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fraud_score: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_tier: Option<&'static str>,
    pub decision_rationale: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_amount: Option<u64>,
}
