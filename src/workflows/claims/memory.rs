//! Mutex-backed in-memory adapters. The served binary runs on these when no
//! real backends are configured, and tests use them as deterministic fakes.

use super::domain::{Claim, ClaimId, ClaimantHistory, WorkflowState};
use super::gamification::GamificationProfile;
use super::repository::{
    ClaimRepository, ClaimantHistoryProvider, FraudPattern, FraudPatternSink, Notification,
    NotificationError, NotificationPublisher, ProfileRepository, RepositoryError,
};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default, Clone)]
pub struct MemoryClaimStore {
    claims: Arc<Mutex<HashMap<ClaimId, Claim>>>,
}

impl ClaimRepository for MemoryClaimStore {
    fn insert(&self, mut claim: Claim) -> Result<Claim, RepositoryError> {
        let mut guard = self.claims.lock().expect("claim store mutex poisoned");
        if guard.contains_key(&claim.id) {
            return Err(RepositoryError::Duplicate);
        }
        claim.version = 1;
        guard.insert(claim.id.clone(), claim.clone());
        Ok(claim)
    }

    fn fetch(&self, id: &ClaimId) -> Result<Option<Claim>, RepositoryError> {
        let guard = self.claims.lock().expect("claim store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, mut claim: Claim, expected_version: u64) -> Result<Claim, RepositoryError> {
        let mut guard = self.claims.lock().expect("claim store mutex poisoned");
        let stored = guard.get(&claim.id).ok_or(RepositoryError::NotFound)?;
        if stored.version != expected_version {
            return Err(RepositoryError::Conflict);
        }
        claim.version = expected_version + 1;
        guard.insert(claim.id.clone(), claim.clone());
        Ok(claim)
    }

    fn by_state(&self, state: WorkflowState) -> Result<Vec<Claim>, RepositoryError> {
        let guard = self.claims.lock().expect("claim store mutex poisoned");
        let mut claims: Vec<Claim> = guard
            .values()
            .filter(|claim| claim.state == state)
            .cloned()
            .collect();
        claims.sort_by(|a, b| a.submission.submitted_at.cmp(&b.submission.submitted_at));
        Ok(claims)
    }
}

impl ClaimantHistoryProvider for MemoryClaimStore {
    fn history(
        &self,
        claimant_id: &str,
        window_days: u32,
        now: DateTime<Utc>,
    ) -> Result<ClaimantHistory, RepositoryError> {
        let cutoff = now - Duration::days(i64::from(window_days));
        let guard = self.claims.lock().expect("claim store mutex poisoned");

        let mut history = ClaimantHistory::default();
        for claim in guard.values() {
            if claim.submission.claimant_id != claimant_id
                || claim.submission.submitted_at < cutoff
            {
                continue;
            }
            match claim.state {
                WorkflowState::Rejected => history.rejected_claims += 1,
                _ => history.active_claims += 1,
            }
        }
        Ok(history)
    }
}

#[derive(Default, Clone)]
pub struct MemoryProfileStore {
    profiles: Arc<Mutex<HashMap<String, GamificationProfile>>>,
}

impl ProfileRepository for MemoryProfileStore {
    fn fetch_or_create(&self, claimant_id: &str) -> Result<GamificationProfile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile store mutex poisoned");
        Ok(guard
            .entry(claimant_id.to_string())
            .or_insert_with(|| GamificationProfile::new(claimant_id))
            .clone())
    }

    fn update(&self, profile: GamificationProfile) -> Result<(), RepositoryError> {
        let mut guard = self.profiles.lock().expect("profile store mutex poisoned");
        guard.insert(profile.claimant_id.clone(), profile);
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryNotificationHub {
    sent: Arc<Mutex<Vec<Notification>>>,
}

impl MemoryNotificationHub {
    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationPublisher for MemoryNotificationHub {
    fn publish(&self, notification: Notification) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("notification mutex poisoned")
            .push(notification);
        Ok(())
    }
}

/// Analyzer stand-in for deployments without a document-analysis backend.
/// Always unavailable; scoring degrades to zero document-risk contribution.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineAnalyzer;

impl super::repository::DocumentAnalyzer for OfflineAnalyzer {
    fn extract(
        &self,
        _document: &super::domain::DocumentRef,
    ) -> Result<super::domain::DocumentExtraction, super::repository::AnalyzerError> {
        Err(super::repository::AnalyzerError::Unavailable(
            "no document analyzer configured".to_string(),
        ))
    }
}

#[derive(Default, Clone)]
pub struct MemoryPatternSink {
    patterns: Arc<Mutex<Vec<FraudPattern>>>,
}

impl MemoryPatternSink {
    pub fn recorded(&self) -> Vec<FraudPattern> {
        self.patterns.lock().expect("pattern mutex poisoned").clone()
    }
}

impl FraudPatternSink for MemoryPatternSink {
    fn record(&self, pattern: FraudPattern) -> Result<(), RepositoryError> {
        self.patterns
            .lock()
            .expect("pattern mutex poisoned")
            .push(pattern);
        Ok(())
    }
}
