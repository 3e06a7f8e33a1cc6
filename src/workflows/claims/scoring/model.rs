use super::super::domain::ClaimCategory;
use super::features::FeatureVector;
use std::time::Duration;

/// Collaborator contract for the statistical fraud scorer.
///
/// Implementations return a probability in [0, 1]. Categories an
/// implementation does not recognize must be mapped to its default bucket
/// rather than rejected; the engine clamps whatever comes back.
pub trait FraudModel: Send + Sync {
    fn score(&self, features: &FeatureVector, category: ClaimCategory) -> Result<f64, ModelError>;
}

/// Failure modes of the statistical scorer. All of them degrade to the
/// deterministic fallback estimate; none of them fail the scoring pass.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model backend unavailable: {0}")]
    Unavailable(String),
    #[error("model response exceeded {0:?}")]
    Timeout(Duration),
    #[error("model returned malformed output: {0}")]
    Malformed(String),
}

/// Deterministic probability estimate used whenever the statistical model
/// cannot answer. Fixed bucketed additive weights, clamped to [0, 1].
pub fn fallback_probability(features: &FeatureVector) -> f64 {
    let mut probability: f64 = 0.0;

    if features.age < 25.0 {
        probability += 0.15;
    } else if features.age > 65.0 {
        probability += 0.10;
    }

    if features.amount > 500_000.0 {
        probability += 0.30;
    } else if features.amount > 200_000.0 {
        probability += 0.15;
    }

    if features.policy_duration_months < 6.0 {
        probability += 0.20;
    } else if features.policy_duration_months < 12.0 {
        probability += 0.10;
    }

    if features.amount > 100_000.0 && features.amount % 100_000.0 == 0.0 {
        probability += 0.10;
    }

    probability.clamp(0.0, 1.0)
}

/// Rule-backed scorer with the same contract shape as the remote model.
/// Used by the binary when no external model endpoint is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleModel;

impl FraudModel for RuleModel {
    fn score(&self, features: &FeatureVector, _category: ClaimCategory) -> Result<f64, ModelError> {
        Ok(fallback_probability(features))
    }
}
