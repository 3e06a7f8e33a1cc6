use super::scoring::{FactorPolarity, RiskAssessment, RiskTier, ScoringConfig};
use serde::{Deserialize, Serialize};

/// Adjudication recommendation derived from an assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Approve,
    Review,
    Flag,
}

impl Decision {
    pub const fn label(self) -> &'static str {
        match self {
            Decision::Approve => "APPROVE",
            Decision::Review => "REVIEW",
            Decision::Flag => "FLAG",
        }
    }
}

/// Structured, human-auditable record of why an assessment landed where it
/// did. Immutable once produced; one per scoring pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explanation {
    pub decision: Decision,
    pub confidence: u8,
    pub primary_reasons: Vec<String>,
    pub contributing_factors: Vec<String>,
    pub red_flags: Vec<String>,
    pub green_flags: Vec<String>,
    pub summary: String,
    pub recommendation: String,
}

/// Deterministic explanation generator. Given the same assessment and
/// amount it renders byte-identical output; it never fails, falling back
/// to a limited-data rendering when signals are absent.
pub struct ExplanationBuilder {
    config: ScoringConfig,
}

const PRIMARY_WEIGHT_FLOOR: u32 = 20;

impl ExplanationBuilder {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn build(&self, assessment: &RiskAssessment, amount: u64) -> Explanation {
        let decision = self.decide(assessment);

        let confidence = match decision {
            Decision::Approve => 100 - assessment.score,
            Decision::Review | Decision::Flag => assessment.score,
        };

        // Heaviest signals first for primary reasons; the stable sort keeps
        // detection order among equal weights.
        let mut primary: Vec<&_> = assessment
            .factors
            .iter()
            .filter(|factor| {
                factor.polarity == FactorPolarity::Red && factor.weight >= PRIMARY_WEIGHT_FLOOR
            })
            .collect();
        primary.sort_by(|a, b| b.weight.cmp(&a.weight));
        let primary_reasons: Vec<String> =
            primary.iter().map(|factor| factor.detail.clone()).collect();

        let contributing_factors: Vec<String> = assessment
            .factors
            .iter()
            .filter(|factor| {
                factor.polarity == FactorPolarity::Red
                    && factor.weight > 0
                    && factor.weight < PRIMARY_WEIGHT_FLOOR
            })
            .map(|factor| factor.detail.clone())
            .collect();

        let red_flags: Vec<String> = assessment
            .factors
            .iter()
            .filter(|factor| factor.polarity == FactorPolarity::Red)
            .map(|factor| factor.detail.clone())
            .collect();

        let green_flags: Vec<String> = assessment
            .factors
            .iter()
            .filter(|factor| factor.polarity == FactorPolarity::Green)
            .map(|factor| factor.detail.clone())
            .collect();

        let recommendation = recommendation_for(decision).to_string();
        let summary = render(
            decision,
            assessment.score,
            confidence,
            amount,
            &primary_reasons,
            &contributing_factors,
            &red_flags,
            &green_flags,
            &recommendation,
        );

        Explanation {
            decision,
            confidence,
            primary_reasons,
            contributing_factors,
            red_flags,
            green_flags,
            summary,
            recommendation,
        }
    }

    /// Model signal is primary; the rule score only weighs in when the
    /// canonical score sits just below a boundary and the rules already
    /// saturate the tier above it.
    fn decide(&self, assessment: &RiskAssessment) -> Decision {
        let score = u32::from(assessment.score);
        let rule = u32::from(assessment.rule_score);
        let margin = u32::from(self.config.borderline_margin);

        if score >= 70 || assessment.tier == RiskTier::High {
            Decision::Flag
        } else if rule >= 70 && score + margin >= 70 {
            Decision::Flag
        } else if score >= 40 || assessment.tier == RiskTier::Medium {
            Decision::Review
        } else if rule >= 40 && score + margin >= 40 {
            Decision::Review
        } else {
            Decision::Approve
        }
    }
}

fn recommendation_for(decision: Decision) -> &'static str {
    match decision {
        Decision::Flag => "High risk: detailed investigation required. Contact claimant for verification.",
        Decision::Review => "Medium risk: manual review recommended. Verify documentation.",
        Decision::Approve => "Low risk: safe to approve. Standard processing.",
    }
}

#[allow(clippy::too_many_arguments)]
fn render(
    decision: Decision,
    score: u8,
    confidence: u8,
    amount: u64,
    primary_reasons: &[String],
    contributing_factors: &[String],
    red_flags: &[String],
    green_flags: &[String],
    recommendation: &str,
) -> String {
    let mut text = String::new();

    match decision {
        Decision::Flag => {
            text.push_str(&format!(
                "High fraud risk ({score}%). This claim of {amount} has been flagged for investigation.\n"
            ));
            if primary_reasons.is_empty() {
                text.push_str("Limited data available; manual review required.\n");
            } else {
                text.push_str("Primary concerns:\n");
                for reason in primary_reasons.iter().take(3) {
                    text.push_str(&format!("- {reason}\n"));
                }
            }
            if !red_flags.is_empty() {
                text.push_str("Red flags detected:\n");
                for flag in red_flags.iter().take(5) {
                    text.push_str(&format!("- {flag}\n"));
                }
            }
        }
        Decision::Review => {
            text.push_str(&format!(
                "Medium fraud risk ({score}%). This claim of {amount} requires manual review.\n"
            ));
            if primary_reasons.is_empty() && contributing_factors.is_empty() {
                text.push_str("Limited data available; manual review required.\n");
            }
            if !primary_reasons.is_empty() {
                text.push_str("Key factors:\n");
                for reason in primary_reasons.iter().take(2) {
                    text.push_str(&format!("- {reason}\n"));
                }
            }
            if !contributing_factors.is_empty() {
                text.push_str("Additional considerations:\n");
                for factor in contributing_factors.iter().take(3) {
                    text.push_str(&format!("- {factor}\n"));
                }
            }
            if !green_flags.is_empty() {
                text.push_str("Positive indicators:\n");
                for flag in green_flags.iter().take(2) {
                    text.push_str(&format!("- {flag}\n"));
                }
            }
        }
        Decision::Approve => {
            text.push_str(&format!(
                "Low fraud risk ({confidence}% confidence). This claim of {amount} appears legitimate.\n"
            ));
            if !green_flags.is_empty() {
                text.push_str("Positive indicators:\n");
                for flag in green_flags.iter().take(4) {
                    text.push_str(&format!("- {flag}\n"));
                }
            }
            if !contributing_factors.is_empty() {
                text.push_str("Minor notes:\n");
                for factor in contributing_factors.iter().take(2) {
                    text.push_str(&format!("- {factor}\n"));
                }
            }
        }
    }

    text.push_str(&format!("Recommended action: {recommendation}"));
    text
}
