use super::super::domain::{
    ClaimSubmission, ClaimantHistory, DocumentQuality, NarrativeVerdict,
};
use super::features::DocumentSignals;
use super::{FactorCategory, FactorPolarity, RiskFactor, ScoringConfig};
use chrono::{Datelike, Timelike};

pub(crate) struct RuleBreakdown {
    pub factors: Vec<RiskFactor>,
    pub total: u32,
}

/// Run the four rule sub-analyses in detection order (amount, history,
/// document, timing). Contributions are additive; the caller clamps the
/// total to the 0-100 scale. Any missing input contributes zero.
pub(crate) fn assess(
    submission: &ClaimSubmission,
    history: &ClaimantHistory,
    signals: Option<&DocumentSignals>,
    config: &ScoringConfig,
) -> RuleBreakdown {
    let mut factors = Vec::new();
    let mut total = 0u32;

    total += amount_risk(submission.amount, config, &mut factors);
    total += history_risk(history, &mut factors);
    if let Some(signals) = signals {
        total += document_risk(signals, &mut factors);
    }
    total += timing_risk(submission, &mut factors);

    RuleBreakdown { factors, total }
}

fn push(
    factors: &mut Vec<RiskFactor>,
    category: FactorCategory,
    polarity: FactorPolarity,
    weight: u32,
    detail: String,
) {
    factors.push(RiskFactor {
        category,
        polarity,
        weight,
        detail,
    });
}

fn amount_risk(amount: u64, config: &ScoringConfig, factors: &mut Vec<RiskFactor>) -> u32 {
    let mut contribution = 0;

    if amount > config.high_amount {
        contribution += 35;
        push(
            factors,
            FactorCategory::Amount,
            FactorPolarity::Red,
            35,
            format!("very high claim amount: {amount}"),
        );
    } else if amount > config.elevated_amount {
        contribution += 20;
        push(
            factors,
            FactorCategory::Amount,
            FactorPolarity::Red,
            20,
            format!("high claim amount: {amount}"),
        );
    } else {
        push(
            factors,
            FactorCategory::Amount,
            FactorPolarity::Green,
            0,
            format!("reasonable claim amount: {amount}"),
        );
    }

    // Round figures above the step are disproportionately common in
    // fabricated claims; the bonus stacks with the tier contribution.
    if amount > config.round_step && amount % config.round_step == 0 {
        contribution += 10;
        push(
            factors,
            FactorCategory::Amount,
            FactorPolarity::Red,
            10,
            format!("suspiciously round amount: {amount}"),
        );
    }

    contribution
}

fn history_risk(history: &ClaimantHistory, factors: &mut Vec<RiskFactor>) -> u32 {
    let mut contribution = 0;

    if history.active_claims >= 3 {
        contribution += 25;
        push(
            factors,
            FactorCategory::History,
            FactorPolarity::Red,
            25,
            format!("{} claims filed within the history window", history.active_claims),
        );
    } else if history.active_claims == 2 {
        contribution += 15;
        push(
            factors,
            FactorCategory::History,
            FactorPolarity::Red,
            15,
            "two recent claims, slightly elevated frequency".to_string(),
        );
    } else {
        push(
            factors,
            FactorCategory::History,
            FactorPolarity::Green,
            0,
            "no excessive claim history".to_string(),
        );
    }

    // Rejections weigh in once as a boolean signal, not per occurrence.
    if history.rejected_claims > 0 {
        contribution += 20;
        push(
            factors,
            FactorCategory::History,
            FactorPolarity::Red,
            20,
            format!("{} previously rejected claim(s)", history.rejected_claims),
        );
    }

    contribution
}

fn document_risk(signals: &DocumentSignals, factors: &mut Vec<RiskFactor>) -> u32 {
    let mut contribution = 0;

    for flag in &signals.red_flags {
        contribution += 10;
        push(
            factors,
            FactorCategory::Document,
            FactorPolarity::Red,
            10,
            format!("document issue: {flag}"),
        );
    }

    match signals.quality {
        DocumentQuality::Blurry | DocumentQuality::Damaged => {
            contribution += 15;
            push(
                factors,
                FactorCategory::Document,
                FactorPolarity::Red,
                15,
                format!("poor document quality ({})", signals.quality.label()),
            );
        }
        DocumentQuality::Clear => {
            push(
                factors,
                FactorCategory::Document,
                FactorPolarity::Green,
                0,
                "clear, readable documents".to_string(),
            );
        }
        DocumentQuality::Unclear => {}
    }

    if signals.confidence_score < 50 {
        contribution += 20;
        push(
            factors,
            FactorCategory::Document,
            FactorPolarity::Red,
            20,
            format!(
                "low extraction confidence: {}%",
                signals.confidence_score
            ),
        );
    }

    for field in &signals.missing_fields {
        contribution += 5;
        push(
            factors,
            FactorCategory::Document,
            FactorPolarity::Red,
            5,
            format!("missing information: {field}"),
        );
    }

    match signals.narrative {
        NarrativeVerdict::Inconsistent => {
            contribution += 25;
            push(
                factors,
                FactorCategory::Document,
                FactorPolarity::Red,
                25,
                "narrative inconsistent with extracted documents".to_string(),
            );
        }
        NarrativeVerdict::Consistent => {
            push(
                factors,
                FactorCategory::Document,
                FactorPolarity::Green,
                0,
                "narrative matches extracted documents".to_string(),
            );
        }
        NarrativeVerdict::NeedsReview => {}
    }

    contribution
}

fn timing_risk(submission: &ClaimSubmission, factors: &mut Vec<RiskFactor>) -> u32 {
    let mut contribution = 0;
    let submitted = submission.submitted_at;

    if submitted.weekday().number_from_monday() >= 6 {
        contribution += 5;
        push(
            factors,
            FactorCategory::Timing,
            FactorPolarity::Red,
            5,
            "claim filed on a weekend".to_string(),
        );
    }

    let hour = submitted.hour();
    if hour >= 22 || hour <= 5 {
        contribution += 10;
        push(
            factors,
            FactorCategory::Timing,
            FactorPolarity::Red,
            10,
            format!("claim filed at unusual hour: {hour:02}:00"),
        );
    } else {
        push(
            factors,
            FactorCategory::Timing,
            FactorPolarity::Green,
            0,
            "filed during normal business hours".to_string(),
        );
    }

    contribution
}
