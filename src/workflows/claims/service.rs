use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{Claim, ClaimId, ClaimSubmission, ClaimantHistory, TenancyMode, WorkflowState};
use super::explanation::{Explanation, ExplanationBuilder};
use super::gamification::{GamificationLedger, GamificationProfile};
use super::intake::{self, IntakeError};
use super::repository::{
    ClaimRepository, ClaimantHistoryProvider, DocumentAnalyzer, FraudPattern, FraudPatternSink,
    Notification, NotificationKind, NotificationPublisher, ProfileRepository, RepositoryError,
};
use super::scoring::{features, FraudModel, ScoringConfig, ScoringEngine, ScoringOutcome};
use super::workflow::{ClaimWorkflow, TerminalEvent, Transition, TransitionOutcome, WorkflowError};

/// External collaborators injected into the service. All of them are
/// substitutable with deterministic fakes in tests.
pub struct Collaborators {
    pub model: Arc<dyn FraudModel>,
    pub analyzer: Arc<dyn DocumentAnalyzer>,
    pub history: Arc<dyn ClaimantHistoryProvider>,
    pub patterns: Arc<dyn FraudPatternSink>,
}

/// Service composing intake validation, the scoring engine, the workflow
/// state machine, and the gamification ledger.
pub struct ClaimService<R, P, N> {
    claims: Arc<R>,
    profiles: Arc<P>,
    notifier: Arc<N>,
    collaborators: Collaborators,
    engine: ScoringEngine,
    explainer: ExplanationBuilder,
    workflow: ClaimWorkflow,
    config: ScoringConfig,
}

static CLAIM_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_claim_id() -> ClaimId {
    let id = CLAIM_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ClaimId(format!("CLM-{id:06}"))
}

/// Routing key the notification transport resolves to the tenant's admin
/// group; the company directory itself lives outside the core.
const ADMIN_RECIPIENT: &str = "company-admins";

impl<R, P, N> ClaimService<R, P, N>
where
    R: ClaimRepository + 'static,
    P: ProfileRepository + 'static,
    N: NotificationPublisher + 'static,
{
    pub fn new(
        claims: Arc<R>,
        profiles: Arc<P>,
        notifier: Arc<N>,
        collaborators: Collaborators,
        config: ScoringConfig,
    ) -> Self {
        let engine = ScoringEngine::new(config.clone(), collaborators.model.clone());
        let explainer = ExplanationBuilder::new(config.clone());
        let workflow = ClaimWorkflow::new(config.clone());

        Self {
            claims,
            profiles,
            notifier,
            collaborators,
            engine,
            explainer,
            workflow,
            config,
        }
    }

    /// Register a new claim. Validation happens before any record exists;
    /// nothing is stored for an invalid submission.
    pub fn submit(
        &self,
        submission: ClaimSubmission,
        mode: TenancyMode,
    ) -> Result<Claim, ClaimServiceError> {
        intake::validate(&submission)?;

        let claim = Claim::new(next_claim_id(), submission, mode);
        let stored = self.claims.insert(claim)?;
        info!(claim = %stored.id, mode = ?stored.mode, "claim submitted");
        Ok(stored)
    }

    /// Run a scoring pass and route the claim. Collaborator calls happen
    /// against a snapshot, without holding the claim record; the final
    /// transition re-validates the version so a raced update surfaces as a
    /// retryable conflict instead of interleaving.
    pub fn score(&self, id: &ClaimId, actor: &str) -> Result<ScoringOutcome, ClaimServiceError> {
        let snapshot = self.require(id)?;
        if snapshot.state.is_terminal() {
            return Err(WorkflowError::TerminalState(snapshot.state.label()).into());
        }
        let snapshot_version = snapshot.version;
        let now = Utc::now();

        let history = self
            .collaborators
            .history
            .history(
                &snapshot.submission.claimant_id,
                self.config.history_window_days,
                now,
            )
            .unwrap_or_else(|err| {
                warn!(claim = %id, %err, "claimant history unavailable, scoring without it");
                ClaimantHistory::default()
            });

        let extraction = snapshot
            .submission
            .documents
            .first()
            .and_then(|document| match self.collaborators.analyzer.extract(document) {
                Ok(extraction) => Some(extraction),
                Err(err) => {
                    warn!(claim = %id, %err, "document analysis unavailable, scoring without it");
                    None
                }
            });

        let assessment = self
            .engine
            .assess(&snapshot.submission, &history, extraction.as_ref(), now);
        let explanation = self
            .explainer
            .build(&assessment, snapshot.submission.amount);
        let outcome = ScoringOutcome {
            assessment,
            explanation,
        };

        // Reacquire and finalize; abort if someone moved the claim while the
        // collaborators were in flight.
        let mut claim = self.require(id)?;
        if claim.version != snapshot_version {
            return Err(RepositoryError::Conflict.into());
        }
        claim.extraction = extraction;
        let transition = self.workflow.apply(
            &mut claim,
            Transition::Score {
                outcome: outcome.clone(),
            },
            actor,
            now,
        )?;
        let stored = self.claims.update(claim, snapshot_version)?;

        info!(
            claim = %stored.id,
            score = outcome.assessment.score,
            tier = outcome.assessment.tier.label(),
            state = stored.state.label(),
            "scoring pass recorded"
        );

        self.settle(&stored, &transition);

        Ok(outcome)
    }

    /// Hand a submitted multi-party claim to a named agent.
    pub fn assign_agent(&self, id: &ClaimId, agent: &str) -> Result<Claim, ClaimServiceError> {
        self.transition(
            id,
            Transition::AssignAgent {
                agent: agent.to_string(),
            },
            agent,
        )
    }

    /// Agent forwards the claim to the company admin with mandatory notes.
    pub fn agent_forward(
        &self,
        id: &ClaimId,
        actor: &str,
        notes: &str,
    ) -> Result<Claim, ClaimServiceError> {
        let stored = self.transition(
            id,
            Transition::AgentForward {
                notes: notes.to_string(),
            },
            actor,
        )?;

        self.notify(Notification {
            recipient: ADMIN_RECIPIENT.to_string(),
            claim_id: stored.id.clone(),
            kind: NotificationKind::ClaimForwarded,
            message: format!("Agent {actor} forwarded claim {} for your approval", stored.id),
        });

        Ok(stored)
    }

    /// Agent rejects outright; the claim's features are retained as a fraud
    /// pattern for later model retraining.
    pub fn agent_reject(
        &self,
        id: &ClaimId,
        actor: &str,
        reason: &str,
    ) -> Result<Claim, ClaimServiceError> {
        let stored = self.transition(
            id,
            Transition::AgentReject {
                reason: reason.to_string(),
            },
            actor,
        )?;

        let (features, _) = features::extract(&stored.submission, stored.extraction.as_ref());
        let pattern = FraudPattern {
            claim_id: stored.id.clone(),
            fraud_score: stored.latest_pass().map(|p| p.assessment.score).unwrap_or(0),
            amount: stored.submission.amount,
            category: stored.submission.category,
            rejected_by: actor.to_string(),
            reason: reason.to_string(),
            features,
        };
        if let Err(err) = self.collaborators.patterns.record(pattern) {
            warn!(claim = %stored.id, %err, "failed to record fraud pattern");
        }

        self.finish_rejection(&stored, reason);
        Ok(stored)
    }

    /// Company admin grants a sanction amount; terminal.
    pub fn admin_approve(
        &self,
        id: &ClaimId,
        actor: &str,
        sanction_amount: u64,
        notes: Option<&str>,
    ) -> Result<Claim, ClaimServiceError> {
        let stored = self.transition(
            id,
            Transition::AdminApprove {
                sanction_amount,
                notes: notes.map(str::to_string),
            },
            actor,
        )?;

        Ok(stored)
    }

    /// Company admin rejects with a mandatory reason; terminal.
    pub fn admin_reject(
        &self,
        id: &ClaimId,
        actor: &str,
        reason: &str,
    ) -> Result<Claim, ClaimServiceError> {
        let stored = self.transition(
            id,
            Transition::AdminReject {
                reason: reason.to_string(),
            },
            actor,
        )?;

        self.finish_rejection(&stored, reason);
        Ok(stored)
    }

    /// Reviewer asks the claimant for more material.
    pub fn request_info(
        &self,
        id: &ClaimId,
        actor: &str,
        message: &str,
    ) -> Result<Claim, ClaimServiceError> {
        let stored = self.transition(
            id,
            Transition::RequestInfo {
                message: message.to_string(),
            },
            actor,
        )?;

        self.notify(Notification {
            recipient: stored.submission.claimant_id.clone(),
            claim_id: stored.id.clone(),
            kind: NotificationKind::InfoRequested,
            message: message.to_string(),
        });

        Ok(stored)
    }

    /// Claimant supplied the requested material; return to review.
    pub fn resume_review(&self, id: &ClaimId, actor: &str) -> Result<Claim, ClaimServiceError> {
        self.transition(id, Transition::ResumeReview, actor)
    }

    /// Latest explanation for a claim.
    pub fn explanation(&self, id: &ClaimId) -> Result<Explanation, ClaimServiceError> {
        let claim = self.require(id)?;
        claim
            .latest_pass()
            .map(|pass| pass.explanation.clone())
            .ok_or_else(|| ClaimServiceError::NotScored(id.clone()))
    }

    pub fn claim(&self, id: &ClaimId) -> Result<Claim, ClaimServiceError> {
        self.require(id)
    }

    /// Review queue for a state, sorted by the latest fraud score so the
    /// riskiest claims drain first.
    pub fn claims_in_state(
        &self,
        state: WorkflowState,
    ) -> Result<Vec<Claim>, ClaimServiceError> {
        let mut claims = self.claims.by_state(state)?;
        claims.sort_by(|a, b| {
            let score = |claim: &Claim| claim.latest_pass().map(|p| p.assessment.score).unwrap_or(0);
            score(b).cmp(&score(a))
        });
        Ok(claims)
    }

    pub fn gamification_profile(
        &self,
        claimant_id: &str,
    ) -> Result<GamificationProfile, ClaimServiceError> {
        Ok(self.profiles.fetch_or_create(claimant_id)?)
    }

    fn require(&self, id: &ClaimId) -> Result<Claim, ClaimServiceError> {
        Ok(self.claims.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    /// Fetch, apply one workflow transition, and persist under the version
    /// check. Either the whole transition lands or nothing does.
    fn transition(
        &self,
        id: &ClaimId,
        transition: Transition,
        actor: &str,
    ) -> Result<Claim, ClaimServiceError> {
        let mut claim = self.require(id)?;
        let expected_version = claim.version;

        let outcome = self
            .workflow
            .apply(&mut claim, transition, actor, Utc::now())?;
        let stored = self.claims.update(claim, expected_version)?;

        info!(claim = %stored.id, state = stored.state.label(), "workflow transition applied");
        self.settle(&stored, &outcome);
        Ok(stored)
    }

    /// Apply gamification exactly once per claim, on its first terminal
    /// transition. The settlement flag was flipped atomically with the
    /// state change, so a concurrent duplicate can never get here.
    fn settle(&self, claim: &Claim, outcome: &TransitionOutcome) {
        let Some(event) = outcome.settled else {
            return;
        };

        let claimant = &claim.submission.claimant_id;
        let result = self
            .profiles
            .fetch_or_create(claimant)
            .map(|mut profile| {
                GamificationLedger::settle(&mut profile, event);
                self.profiles.update(profile)
            });

        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) | Err(err) => {
                warn!(claim = %claim.id, %claimant, %err, "failed to settle gamification profile");
            }
        }

        if event == TerminalEvent::Approved {
            self.notify(Notification {
                recipient: claimant.clone(),
                claim_id: claim.id.clone(),
                kind: NotificationKind::ClaimApproved,
                message: format!(
                    "Your claim of {} has been approved",
                    claim.approved_amount.unwrap_or(claim.submission.amount)
                ),
            });
        }
    }

    fn finish_rejection(&self, claim: &Claim, reason: &str) {
        self.notify(Notification {
            recipient: claim.submission.claimant_id.clone(),
            claim_id: claim.id.clone(),
            kind: NotificationKind::ClaimRejected,
            message: format!("Your claim has been rejected. Reason: {reason}"),
        });
    }

    fn notify(&self, notification: Notification) {
        if let Err(err) = self.notifier.publish(notification) {
            warn!(%err, "notification delivery failed");
        }
    }
}

/// Error raised by the claim service.
#[derive(Debug, thiserror::Error)]
pub enum ClaimServiceError {
    #[error(transparent)]
    Intake(#[from] IntakeError),
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("claim {0} has not been scored yet")]
    NotScored(ClaimId),
}
