use serde::{Deserialize, Serialize};

/// Tri-level bucketing of the canonical fraud score. The boundary values
/// are load-bearing for workflow routing and must not drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub fn for_score(score: u8) -> Self {
        if score >= 70 {
            RiskTier::High
        } else if score >= 40 {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
        }
    }
}

/// Canonical fraud score with its corroborating rule signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlendedScore {
    pub score: u8,
    pub tier: RiskTier,
    pub rule_score: u8,
    pub model_probability: f64,
    pub model_available: bool,
}

/// Combine the model probability (external or fallback) with the rule
/// total. The model signal is primary: the canonical score is its 0-100
/// rendering. The rule score rides along as a secondary signal surfaced in
/// explanations and consulted for borderline routing.
pub fn blend(probability: f64, model_available: bool, rule_total: u32) -> BlendedScore {
    let probability = probability.clamp(0.0, 1.0);
    let score = (probability * 100.0).round() as u8;

    BlendedScore {
        score,
        tier: RiskTier::for_score(score),
        rule_score: rule_total.min(100) as u8,
        model_probability: probability,
        model_available,
    }
}
