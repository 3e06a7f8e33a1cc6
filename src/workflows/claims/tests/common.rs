use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::claims::domain::{
    Claim, ClaimCategory, ClaimId, ClaimSubmission, ClaimantHistory, DocumentExtraction,
    DocumentQuality, DocumentRef, NarrativeVerdict, TenancyMode, WorkflowState,
};
use crate::workflows::claims::memory::{
    MemoryClaimStore, MemoryNotificationHub, MemoryPatternSink, MemoryProfileStore,
};
use crate::workflows::claims::repository::{
    AnalyzerError, ClaimRepository, ClaimantHistoryProvider, DocumentAnalyzer, Notification,
    NotificationError, NotificationPublisher, RepositoryError,
};
use crate::workflows::claims::scoring::{
    FraudModel, ModelError, ScoringConfig, ScoringEngine,
};
use crate::workflows::claims::service::{ClaimService, Collaborators};

/// Tuesday, 10:30 UTC. Weekday business hours so the base submission has
/// zero timing risk.
pub(super) fn weekday_morning() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 3, 10, 30, 0).single().expect("valid timestamp")
}

/// Saturday, 23:10 UTC. Weekend and late-night risk together.
pub(super) fn weekend_midnight() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 7, 23, 10, 0).single().expect("valid timestamp")
}

pub(super) fn submission() -> ClaimSubmission {
    ClaimSubmission {
        claimant_id: "claimant-7".to_string(),
        policy_number: "POL-204617".to_string(),
        category: ClaimCategory::Health,
        amount: 45_000,
        description: "Hospitalization after a road accident, invoices attached".to_string(),
        claimant_age: 34,
        policy_duration_months: 24,
        submitted_at: weekday_morning(),
        documents: vec![DocumentRef {
            name: "hospital-invoice.pdf".to_string(),
            storage_key: "claims/docs/hospital-invoice.pdf".to_string(),
        }],
    }
}

pub(super) fn submission_with_amount(amount: u64) -> ClaimSubmission {
    ClaimSubmission {
        amount,
        ..submission()
    }
}

pub(super) fn clean_extraction() -> DocumentExtraction {
    DocumentExtraction {
        claim_amount: Some(45_000),
        provider_name: Some("City Hospital".to_string()),
        quality: DocumentQuality::Clear,
        red_flags: Vec::new(),
        missing_fields: Vec::new(),
        confidence_score: 92,
        narrative: NarrativeVerdict::Consistent,
        consistency_score: 88,
    }
}

pub(super) fn suspicious_extraction() -> DocumentExtraction {
    DocumentExtraction {
        claim_amount: Some(600_000),
        provider_name: Some("Unregistered Clinic".to_string()),
        quality: DocumentQuality::Blurry,
        red_flags: vec![
            "amounts appear altered".to_string(),
            "provider not registered".to_string(),
        ],
        missing_fields: vec!["date_of_service".to_string()],
        confidence_score: 35,
        narrative: NarrativeVerdict::Inconsistent,
        consistency_score: 20,
    }
}

pub(super) fn scoring_config() -> ScoringConfig {
    ScoringConfig::default()
}

/// Model double returning a fixed probability.
pub(super) struct FixedModel(pub f64);

impl FraudModel for FixedModel {
    fn score(
        &self,
        _features: &crate::workflows::claims::scoring::FeatureVector,
        _category: ClaimCategory,
    ) -> Result<f64, ModelError> {
        Ok(self.0)
    }
}

/// Model double that always fails, forcing the fallback estimator.
pub(super) struct FailingModel;

impl FraudModel for FailingModel {
    fn score(
        &self,
        _features: &crate::workflows::claims::scoring::FeatureVector,
        _category: ClaimCategory,
    ) -> Result<f64, ModelError> {
        Err(ModelError::Unavailable("scorer offline".to_string()))
    }
}

/// History double returning a fixed projection.
pub(super) struct StaticHistory(pub ClaimantHistory);

impl ClaimantHistoryProvider for StaticHistory {
    fn history(
        &self,
        _claimant_id: &str,
        _window_days: u32,
        _now: DateTime<Utc>,
    ) -> Result<ClaimantHistory, RepositoryError> {
        Ok(self.0)
    }
}

pub(super) struct FailingHistory;

impl ClaimantHistoryProvider for FailingHistory {
    fn history(
        &self,
        _claimant_id: &str,
        _window_days: u32,
        _now: DateTime<Utc>,
    ) -> Result<ClaimantHistory, RepositoryError> {
        Err(RepositoryError::Unavailable("history store offline".to_string()))
    }
}

/// Analyzer double returning a canned extraction.
pub(super) struct StaticAnalyzer(pub DocumentExtraction);

impl DocumentAnalyzer for StaticAnalyzer {
    fn extract(&self, _document: &DocumentRef) -> Result<DocumentExtraction, AnalyzerError> {
        Ok(self.0.clone())
    }
}

pub(super) struct FailingAnalyzer;

impl DocumentAnalyzer for FailingAnalyzer {
    fn extract(&self, _document: &DocumentRef) -> Result<DocumentExtraction, AnalyzerError> {
        Err(AnalyzerError::Timeout)
    }
}

pub(super) struct FailingNotifier;

impl NotificationPublisher for FailingNotifier {
    fn publish(&self, _notification: Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("smtp offline".to_string()))
    }
}

/// Claim store that simulates a concurrent writer: after the first fetch of
/// a claim it bumps the stored version out from under the caller, so the
/// finalizing check-and-set loses.
#[derive(Clone)]
pub(super) struct RacingClaimStore {
    pub inner: MemoryClaimStore,
    fetches: Arc<AtomicUsize>,
}

impl RacingClaimStore {
    pub(super) fn new(inner: MemoryClaimStore) -> Self {
        Self {
            inner,
            fetches: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl ClaimRepository for RacingClaimStore {
    fn insert(&self, claim: Claim) -> Result<Claim, RepositoryError> {
        self.inner.insert(claim)
    }

    fn fetch(&self, id: &ClaimId) -> Result<Option<Claim>, RepositoryError> {
        let fetched = self.inner.fetch(id)?;
        if self.fetches.fetch_add(1, Ordering::SeqCst) == 0 {
            if let Some(claim) = &fetched {
                // Interleave a no-op write to advance the version.
                self.inner.update(claim.clone(), claim.version)?;
            }
        }
        Ok(fetched)
    }

    fn update(&self, claim: Claim, expected_version: u64) -> Result<Claim, RepositoryError> {
        self.inner.update(claim, expected_version)
    }

    fn by_state(&self, state: WorkflowState) -> Result<Vec<Claim>, RepositoryError> {
        self.inner.by_state(state)
    }
}

pub(super) type MemoryService =
    ClaimService<MemoryClaimStore, MemoryProfileStore, MemoryNotificationHub>;

pub(super) struct ServiceHarness {
    pub service: MemoryService,
    pub claims: Arc<MemoryClaimStore>,
    pub profiles: Arc<MemoryProfileStore>,
    pub notifications: Arc<MemoryNotificationHub>,
    pub patterns: Arc<MemoryPatternSink>,
}

/// Service over in-memory stores with a fixed-probability model and a
/// canned clean extraction.
pub(super) fn build_service(probability: f64) -> ServiceHarness {
    build_service_with(
        Arc::new(FixedModel(probability)),
        Arc::new(StaticAnalyzer(clean_extraction())),
    )
}

pub(super) fn build_service_with(
    model: Arc<dyn FraudModel>,
    analyzer: Arc<dyn DocumentAnalyzer>,
) -> ServiceHarness {
    let claims = Arc::new(MemoryClaimStore::default());
    let profiles = Arc::new(MemoryProfileStore::default());
    let notifications = Arc::new(MemoryNotificationHub::default());
    let patterns = Arc::new(MemoryPatternSink::default());

    let service = ClaimService::new(
        claims.clone(),
        profiles.clone(),
        notifications.clone(),
        Collaborators {
            model,
            analyzer,
            history: claims.clone(),
            patterns: patterns.clone(),
        },
        scoring_config(),
    );

    ServiceHarness {
        service,
        claims,
        profiles,
        notifications,
        patterns,
    }
}

pub(super) fn engine(probability: f64) -> ScoringEngine {
    ScoringEngine::new(scoring_config(), Arc::new(FixedModel(probability)))
}

pub(super) fn submit_automated(harness: &ServiceHarness) -> Claim {
    harness
        .service
        .submit(submission(), TenancyMode::Automated)
        .expect("submission is valid")
}

pub(super) fn submit_multi_party(harness: &ServiceHarness) -> Claim {
    harness
        .service
        .submit(submission(), TenancyMode::MultiParty)
        .expect("submission is valid")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn assert_status(response: &Response, expected: StatusCode) {
    assert_eq!(response.status(), expected);
}
