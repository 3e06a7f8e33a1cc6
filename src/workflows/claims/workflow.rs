use super::domain::{Claim, TenancyMode, WorkflowEntry, WorkflowState};
use super::explanation::Decision;
use super::scoring::{ScoringConfig, ScoringOutcome};
use chrono::{DateTime, Utc};

/// Errors raised by the state machine. Every one of them is reported
/// before any mutation of the claim takes place.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("claim is already in terminal state '{0}'")]
    TerminalState(&'static str),
    #[error("cannot {action} a claim in state '{from}'")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
    #[error("{field} must be at least {min} characters")]
    NotesTooShort { field: &'static str, min: usize },
    #[error("sanction amount must be greater than zero")]
    InvalidSanction,
}

/// Transitions accepted by the state machine.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Automated routing after a scoring pass completed.
    Score { outcome: ScoringOutcome },
    /// Hand the claim to a named agent (multi-party tenants).
    AssignAgent { agent: String },
    /// Agent forwards to the company admin with mandatory notes.
    AgentForward { notes: String },
    /// Agent rejects outright; the reason feeds model retraining.
    AgentReject { reason: String },
    /// Company admin grants a sanction amount.
    AdminApprove {
        sanction_amount: u64,
        notes: Option<String>,
    },
    /// Company admin rejects with a mandatory reason.
    AdminReject { reason: String },
    /// Reviewer asks the claimant for more material.
    RequestInfo { message: String },
    /// Claimant supplied the requested material; return to review.
    ResumeReview,
}

/// Terminal outcome reached for the first time by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminalEvent {
    Approved,
    Rejected,
}

/// Result of a successful transition.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub state: WorkflowState,
    pub reason: Option<String>,
    /// Set exactly once per claim, on the transition that first reaches a
    /// terminal state. Drives the gamification ledger.
    pub settled: Option<TerminalEvent>,
}

const MIN_NOTES: usize = 10;

/// The single transition function for the claim lifecycle. All state
/// changes, history appends, and terminal settlement flow through here so
/// the business rules cannot diverge between entry points.
pub struct ClaimWorkflow {
    config: ScoringConfig,
}

impl ClaimWorkflow {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn apply(
        &self,
        claim: &mut Claim,
        transition: Transition,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<TransitionOutcome, WorkflowError> {
        if claim.state.is_terminal() {
            return Err(WorkflowError::TerminalState(claim.state.label()));
        }

        // Validate fully before touching the claim.
        let planned = self.plan(claim, &transition)?;

        let mut entry = WorkflowEntry {
            state: planned.state,
            timestamp: now,
            actor: actor.to_string(),
            notes: planned.reason.clone(),
            assessment: None,
        };

        match transition {
            Transition::Score { outcome } => {
                entry.assessment = Some(outcome.assessment.clone());
                if planned.state == WorkflowState::Approved {
                    claim.approved_amount = Some(claim.submission.amount);
                    claim.approved_by = Some(actor.to_string());
                }
                claim.scoring_passes.push(outcome);
            }
            Transition::AssignAgent { agent } => {
                claim.assigned_agent = Some(agent);
            }
            Transition::AgentForward { notes } => {
                entry.notes = Some(notes);
            }
            Transition::AgentReject { reason } | Transition::AdminReject { reason } => {
                entry.notes = Some(reason.clone());
                claim.rejection_reason = Some(reason);
                claim.rejected_by = Some(actor.to_string());
            }
            Transition::AdminApprove {
                sanction_amount,
                notes,
            } => {
                entry.notes = notes;
                claim.approved_amount = Some(sanction_amount);
                claim.approved_by = Some(actor.to_string());
            }
            Transition::RequestInfo { message } => {
                entry.notes = Some(message);
            }
            Transition::ResumeReview => {}
        }

        let settled = if planned.state.is_terminal() && !claim.rewards_settled {
            claim.rewards_settled = true;
            Some(match planned.state {
                WorkflowState::Approved => TerminalEvent::Approved,
                _ => TerminalEvent::Rejected,
            })
        } else {
            None
        };

        claim.state = planned.state;
        claim.history.push(entry);

        Ok(TransitionOutcome {
            state: planned.state,
            reason: planned.reason,
            settled,
        })
    }

    fn plan(&self, claim: &Claim, transition: &Transition) -> Result<Planned, WorkflowError> {
        let from = claim.state;
        match transition {
            Transition::Score { outcome } => self.plan_scored(claim, from, outcome),
            Transition::AssignAgent { .. } => {
                if claim.mode != TenancyMode::MultiParty || from != WorkflowState::Submitted {
                    return Err(invalid(from, "assign an agent to"));
                }
                Ok(Planned::to(WorkflowState::AgentReview))
            }
            Transition::AgentForward { notes } => {
                if from != WorkflowState::AgentReview {
                    return Err(invalid(from, "forward"));
                }
                require_text(notes, "agent notes")?;
                Ok(Planned::to(WorkflowState::AdminReview))
            }
            Transition::AgentReject { reason } => {
                if from != WorkflowState::AgentReview {
                    return Err(invalid(from, "reject"));
                }
                require_text(reason, "rejection reason")?;
                Ok(Planned::to(WorkflowState::Rejected))
            }
            Transition::AdminApprove {
                sanction_amount, ..
            } => {
                if !matches!(
                    from,
                    WorkflowState::AdminReview | WorkflowState::UnderReview
                ) {
                    return Err(invalid(from, "approve"));
                }
                if *sanction_amount == 0 {
                    return Err(WorkflowError::InvalidSanction);
                }
                Ok(Planned::to(WorkflowState::Approved))
            }
            Transition::AdminReject { reason } => {
                if !matches!(
                    from,
                    WorkflowState::AdminReview | WorkflowState::UnderReview
                ) {
                    return Err(invalid(from, "reject"));
                }
                require_text(reason, "rejection reason")?;
                Ok(Planned::to(WorkflowState::Rejected))
            }
            Transition::RequestInfo { message } => {
                if !from.is_review() {
                    return Err(invalid(from, "request information on"));
                }
                if message.trim().is_empty() {
                    return Err(WorkflowError::NotesTooShort {
                        field: "information request",
                        min: 1,
                    });
                }
                Ok(Planned::to(WorkflowState::InfoRequested))
            }
            Transition::ResumeReview => {
                if from != WorkflowState::InfoRequested {
                    return Err(invalid(from, "resume review of"));
                }
                let target = claim
                    .history
                    .iter()
                    .rev()
                    .map(|entry| entry.state)
                    .find(|state| state.is_review())
                    .unwrap_or(WorkflowState::UnderReview);
                Ok(Planned::to(target))
            }
        }
    }

    /// Automated routing after scoring. In multi-party mode the scoring
    /// pass is recorded without moving the claim; routing there is a human
    /// decision.
    fn plan_scored(
        &self,
        claim: &Claim,
        from: WorkflowState,
        outcome: &ScoringOutcome,
    ) -> Result<Planned, WorkflowError> {
        match claim.mode {
            TenancyMode::MultiParty => {
                if !matches!(from, WorkflowState::Submitted | WorkflowState::AgentReview) {
                    return Err(invalid(from, "score"));
                }
                Ok(Planned {
                    state: from,
                    reason: Some("fraud analysis recorded".to_string()),
                })
            }
            TenancyMode::Automated => {
                // Re-scoring while a reviewer holds the claim only appends
                // to the audit trail; routing happened on the first pass.
                if from == WorkflowState::UnderReview {
                    return Ok(Planned {
                        state: from,
                        reason: Some("fraud analysis recorded".to_string()),
                    });
                }
                if from != WorkflowState::Submitted {
                    return Err(invalid(from, "score"));
                }

                let score = outcome.assessment.score;
                let decision = outcome.explanation.decision;
                let amount = claim.submission.amount;

                let (state, reason) = if decision == Decision::Flag || score >= 70 {
                    (WorkflowState::UnderReview, "high fraud risk detected")
                } else if decision == Decision::Review || score >= 40 {
                    (
                        WorkflowState::UnderReview,
                        "medium fraud risk, manual review required",
                    )
                } else if amount < self.config.auto_approve_limit {
                    (
                        WorkflowState::Approved,
                        "low risk and amount below auto-approval threshold",
                    )
                } else {
                    (
                        WorkflowState::UnderReview,
                        "amount exceeds auto-approval threshold",
                    )
                };

                Ok(Planned {
                    state,
                    reason: Some(reason.to_string()),
                })
            }
        }
    }
}

struct Planned {
    state: WorkflowState,
    reason: Option<String>,
}

impl Planned {
    fn to(state: WorkflowState) -> Self {
        Self {
            state,
            reason: None,
        }
    }
}

fn invalid(from: WorkflowState, action: &'static str) -> WorkflowError {
    WorkflowError::InvalidTransition {
        from: from.label(),
        action,
    }
}

fn require_text(value: &str, field: &'static str) -> Result<(), WorkflowError> {
    if value.trim().len() < MIN_NOTES {
        return Err(WorkflowError::NotesTooShort {
            field,
            min: MIN_NOTES,
        });
    }
    Ok(())
}
