//! Fraud scoring: feature extraction, the statistical-model contract with
//! its deterministic fallback, the rule assessor, and the blend into one
//! canonical 0-100 score.

pub mod blend;
pub mod features;
pub mod model;
mod rules;

pub use blend::{BlendedScore, RiskTier};
pub use features::{DocumentSignals, FeatureVector};
pub use model::{fallback_probability, FraudModel, ModelError, RuleModel};

use super::domain::{ClaimSubmission, ClaimantHistory, DocumentExtraction};
use super::explanation::Explanation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Threshold dials for scoring and routing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub high_amount: u64,
    pub elevated_amount: u64,
    pub round_step: u64,
    pub auto_approve_limit: u64,
    pub history_window_days: u32,
    pub manual_review_floor: u8,
    pub borderline_margin: u8,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            high_amount: 500_000,
            elevated_amount: 200_000,
            round_step: 100_000,
            auto_approve_limit: 50_000,
            history_window_days: 180,
            manual_review_floor: 60,
            borderline_margin: 5,
        }
    }
}

/// Factor provenance, in detection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorCategory {
    Amount,
    History,
    Document,
    Timing,
    Model,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorPolarity {
    Red,
    Green,
}

/// Discrete signal contributing to (or vouching for) an assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub category: FactorCategory,
    pub polarity: FactorPolarity,
    pub weight: u32,
    pub detail: String,
}

/// Audit record produced by one scoring pass. Appended to the claim,
/// never overwritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: u8,
    pub tier: RiskTier,
    pub rule_score: u8,
    pub model_probability: f64,
    pub model_available: bool,
    pub factors: Vec<RiskFactor>,
    pub requires_manual_review: bool,
    pub assessed_at: DateTime<Utc>,
}

/// Assessment plus its explanation, stored together per scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringOutcome {
    pub assessment: RiskAssessment,
    pub explanation: Explanation,
}

/// Stateless engine combining the model signal with the rule assessor.
pub struct ScoringEngine {
    config: ScoringConfig,
    model: Arc<dyn FraudModel>,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig, model: Arc<dyn FraudModel>) -> Self {
        Self { config, model }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a submission. Missing history or extraction degrades the
    /// respective contribution to zero; a failing model degrades to the
    /// fallback estimator. This never fails.
    pub fn assess(
        &self,
        submission: &ClaimSubmission,
        history: &ClaimantHistory,
        extraction: Option<&DocumentExtraction>,
        now: DateTime<Utc>,
    ) -> RiskAssessment {
        let (features, signals) = features::extract(submission, extraction);
        let breakdown = rules::assess(submission, history, signals.as_ref(), &self.config);

        let (probability, model_available) =
            match self.model.score(&features, submission.category) {
                Ok(probability) => (probability.clamp(0.0, 1.0), true),
                Err(err) => {
                    warn!(claimant = %submission.claimant_id, %err, "fraud model unavailable, using fallback estimate");
                    (fallback_probability(&features), false)
                }
            };

        let blended = blend::blend(probability, model_available, breakdown.total);

        let mut factors = breakdown.factors;
        if extraction.is_none() {
            factors.push(RiskFactor {
                category: FactorCategory::Document,
                polarity: FactorPolarity::Red,
                weight: 0,
                detail: "AI validation unavailable, documents pending manual verification"
                    .to_string(),
            });
        }
        factors.push(RiskFactor {
            category: FactorCategory::Model,
            polarity: if blended.tier == RiskTier::Low {
                FactorPolarity::Green
            } else {
                FactorPolarity::Red
            },
            weight: 0,
            detail: format!("model fraud probability {}%", blended.score),
        });
        if !model_available {
            factors.push(RiskFactor {
                category: FactorCategory::Model,
                polarity: FactorPolarity::Red,
                weight: 0,
                detail: "statistical model unavailable, rule-based estimate applied".to_string(),
            });
        }

        RiskAssessment {
            score: blended.score,
            tier: blended.tier,
            rule_score: blended.rule_score,
            model_probability: blended.model_probability,
            model_available,
            factors,
            requires_manual_review: blended.score > self.config.manual_review_floor,
            assessed_at: now,
        }
    }
}
