use super::common::*;
use crate::workflows::claims::domain::ClaimantHistory;
use crate::workflows::claims::scoring::{
    fallback_probability, FactorCategory, FactorPolarity, FeatureVector, RiskTier, ScoringEngine,
};
use std::sync::Arc;

#[test]
fn tier_boundaries_are_exact() {
    assert_eq!(RiskTier::for_score(0), RiskTier::Low);
    assert_eq!(RiskTier::for_score(39), RiskTier::Low);
    assert_eq!(RiskTier::for_score(40), RiskTier::Medium);
    assert_eq!(RiskTier::for_score(69), RiskTier::Medium);
    assert_eq!(RiskTier::for_score(70), RiskTier::High);
    assert_eq!(RiskTier::for_score(100), RiskTier::High);
}

#[test]
fn round_high_amount_earns_both_amount_factors() {
    let engine = engine(0.1);
    let submission = submission_with_amount(600_000);

    let assessment = engine.assess(
        &submission,
        &ClaimantHistory::default(),
        None,
        weekday_morning(),
    );

    let amount_weights: Vec<u32> = assessment
        .factors
        .iter()
        .filter(|factor| {
            factor.category == FactorCategory::Amount && factor.polarity == FactorPolarity::Red
        })
        .map(|factor| factor.weight)
        .collect();
    assert_eq!(amount_weights, vec![35, 10]);
    assert_eq!(amount_weights.iter().sum::<u32>(), 45);
}

#[test]
fn non_round_elevated_amount_earns_only_the_tier_factor() {
    let engine = engine(0.1);
    let submission = submission_with_amount(450_000);

    let assessment = engine.assess(
        &submission,
        &ClaimantHistory::default(),
        None,
        weekday_morning(),
    );

    let amount_weights: Vec<u32> = assessment
        .factors
        .iter()
        .filter(|factor| {
            factor.category == FactorCategory::Amount && factor.polarity == FactorPolarity::Red
        })
        .map(|factor| factor.weight)
        .collect();
    assert_eq!(amount_weights, vec![20]);
}

#[test]
fn history_contributions_follow_the_buckets() {
    let engine = engine(0.1);

    let three_active = engine.assess(
        &submission(),
        &ClaimantHistory {
            active_claims: 3,
            rejected_claims: 0,
        },
        None,
        weekday_morning(),
    );
    assert_eq!(three_active.rule_score, 25);

    let two_active_one_rejected = engine.assess(
        &submission(),
        &ClaimantHistory {
            active_claims: 2,
            rejected_claims: 1,
        },
        None,
        weekday_morning(),
    );
    // 15 for frequency plus a flat 20 for the rejection signal.
    assert_eq!(two_active_one_rejected.rule_score, 35);

    let many_rejections = engine.assess(
        &submission(),
        &ClaimantHistory {
            active_claims: 0,
            rejected_claims: 4,
        },
        None,
        weekday_morning(),
    );
    // Rejections count once, not per occurrence.
    assert_eq!(many_rejections.rule_score, 20);
}

#[test]
fn missing_extraction_contributes_zero_document_risk() {
    let engine = engine(0.1);

    let without = engine.assess(
        &submission(),
        &ClaimantHistory::default(),
        None,
        weekday_morning(),
    );
    assert_eq!(without.rule_score, 0);
    assert!(without
        .factors
        .iter()
        .all(|factor| factor.category != FactorCategory::Document || factor.weight == 0));
    assert!(without
        .factors
        .iter()
        .any(|factor| factor.detail.contains("AI validation unavailable")));
}

#[test]
fn suspicious_documents_stack_their_contributions() {
    let engine = engine(0.1);
    let extraction = suspicious_extraction();

    let assessment = engine.assess(
        &submission(),
        &ClaimantHistory::default(),
        Some(&extraction),
        weekday_morning(),
    );

    // 2 red flags (20) + blurry (15) + low confidence (20) + 1 missing
    // field (5) + inconsistent narrative (25) = 85.
    assert_eq!(assessment.rule_score, 85);
}

#[test]
fn timing_risk_detects_weekend_and_late_hours() {
    let engine = engine(0.1);
    let mut submission = submission();
    submission.submitted_at = weekend_midnight();

    let assessment = engine.assess(
        &submission,
        &ClaimantHistory::default(),
        None,
        weekday_morning(),
    );

    assert_eq!(assessment.rule_score, 15);
    assert!(assessment
        .factors
        .iter()
        .any(|factor| factor.detail.contains("weekend")));
    assert!(assessment
        .factors
        .iter()
        .any(|factor| factor.detail.contains("unusual hour")));
}

#[test]
fn rule_score_saturates_at_one_hundred() {
    let engine = engine(0.1);
    let mut submission = submission_with_amount(600_000);
    submission.submitted_at = weekend_midnight();

    let assessment = engine.assess(
        &submission,
        &ClaimantHistory {
            active_claims: 4,
            rejected_claims: 2,
        },
        Some(&suspicious_extraction()),
        weekday_morning(),
    );

    assert_eq!(assessment.rule_score, 100);
}

#[test]
fn fallback_probability_sums_its_buckets() {
    // age <25 (+0.15), amount >500k (+0.30), duration <6 (+0.20),
    // round multiple of 100k (+0.10).
    let features = FeatureVector {
        age: 23.0,
        amount: 600_000.0,
        policy_duration_months: 3.0,
    };
    assert!((fallback_probability(&features) - 0.75).abs() < 1e-9);

    // age >65 (+0.10), amount in (200k, 500k] (+0.15), duration in
    // [6, 12) (+0.10), not round.
    let features = FeatureVector {
        age: 70.0,
        amount: 350_000.0,
        policy_duration_months: 8.0,
    };
    assert!((fallback_probability(&features) - 0.35).abs() < 1e-9);

    let benign = FeatureVector {
        age: 40.0,
        amount: 20_000.0,
        policy_duration_months: 36.0,
    };
    assert_eq!(fallback_probability(&benign), 0.0);
}

#[test]
fn fallback_probability_clamps_to_one() {
    let features = FeatureVector {
        age: 20.0,
        amount: 900_000.0,
        policy_duration_months: 1.0,
    };
    // 0.15 + 0.30 + 0.20 = 0.65; add more pressure via round amount.
    let round = FeatureVector {
        amount: 800_000.0,
        ..features
    };
    assert!(fallback_probability(&features) <= 1.0);
    assert!(fallback_probability(&round) <= 1.0);
}

#[test]
fn model_failure_degrades_to_the_fallback_estimate() {
    let failing = ScoringEngine::new(scoring_config(), Arc::new(FailingModel));
    let submission = submission_with_amount(600_000);

    let assessment = failing.assess(
        &submission,
        &ClaimantHistory::default(),
        None,
        weekday_morning(),
    );

    let expected = fallback_probability(&FeatureVector {
        age: 34.0,
        amount: 600_000.0,
        policy_duration_months: 24.0,
    });
    assert_eq!(assessment.score, (expected * 100.0).round() as u8);
    assert!(!assessment.model_available);
    assert!(assessment
        .factors
        .iter()
        .any(|factor| factor.detail.contains("statistical model unavailable")));
}

#[test]
fn out_of_range_model_probability_is_clamped() {
    let engine = engine(1.7);
    let assessment = engine.assess(
        &submission(),
        &ClaimantHistory::default(),
        None,
        weekday_morning(),
    );
    assert_eq!(assessment.score, 100);
}

#[test]
fn manual_review_flag_tracks_the_sixty_threshold() {
    let engine = engine(0.61);
    let assessment = engine.assess(
        &submission(),
        &ClaimantHistory::default(),
        None,
        weekday_morning(),
    );
    assert!(assessment.requires_manual_review);

    let engine = super::common::engine(0.60);
    let assessment = engine.assess(
        &submission(),
        &ClaimantHistory::default(),
        None,
        weekday_morning(),
    );
    assert!(!assessment.requires_manual_review);
}

#[test]
fn identical_inputs_score_identically() {
    let engine = engine(0.42);
    let submission = submission_with_amount(300_000);
    let history = ClaimantHistory {
        active_claims: 2,
        rejected_claims: 1,
    };
    let extraction = suspicious_extraction();
    let now = weekday_morning();

    let first = engine.assess(&submission, &history, Some(&extraction), now);
    let second = engine.assess(&submission, &history, Some(&extraction), now);

    assert_eq!(first, second);
    assert_eq!(first.factors, second.factors);
}
