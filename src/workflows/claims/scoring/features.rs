use super::super::domain::{
    ClaimSubmission, DocumentExtraction, DocumentQuality, NarrativeVerdict,
};
use serde::{Deserialize, Serialize};

/// Fixed-order numeric tuple consumed by the statistical fraud model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub age: f64,
    pub amount: f64,
    pub policy_duration_months: f64,
}

/// Qualitative document signals that bypass the numeric model and feed the
/// rule assessor directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSignals {
    pub quality: DocumentQuality,
    pub red_flags: Vec<String>,
    pub missing_fields: Vec<String>,
    pub confidence_score: u8,
    pub narrative: NarrativeVerdict,
}

/// Normalize a submission (and optional extraction) into model features and
/// the qualitative side-channel. Total: missing inputs default rather than
/// fail, so scoring always has something to work with.
pub fn extract(
    submission: &ClaimSubmission,
    extraction: Option<&DocumentExtraction>,
) -> (FeatureVector, Option<DocumentSignals>) {
    // The declared amount wins; a document-extracted amount only fills in
    // when the claimant left the field empty.
    let amount = if submission.amount > 0 {
        submission.amount
    } else {
        extraction
            .and_then(|data| data.claim_amount)
            .unwrap_or_default()
    };

    let features = FeatureVector {
        age: f64::from(submission.claimant_age),
        amount: amount as f64,
        policy_duration_months: f64::from(submission.policy_duration_months),
    };

    let signals = extraction.map(|data| DocumentSignals {
        quality: data.quality,
        red_flags: data.red_flags.clone(),
        missing_fields: data.missing_fields.clone(),
        confidence_score: data.confidence_score,
        narrative: data.narrative,
    });

    (features, signals)
}
