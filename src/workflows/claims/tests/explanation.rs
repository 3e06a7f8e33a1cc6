use super::common::*;
use crate::workflows::claims::domain::ClaimantHistory;
use crate::workflows::claims::explanation::{Decision, ExplanationBuilder};
use crate::workflows::claims::scoring::{
    FactorCategory, FactorPolarity, RiskAssessment, RiskFactor, RiskTier,
};

fn builder() -> ExplanationBuilder {
    ExplanationBuilder::new(scoring_config())
}

fn assessment(score: u8, rule_score: u8, factors: Vec<RiskFactor>) -> RiskAssessment {
    RiskAssessment {
        score,
        tier: RiskTier::for_score(score),
        rule_score,
        model_probability: f64::from(score) / 100.0,
        model_available: true,
        factors,
        requires_manual_review: score > 60,
        assessed_at: weekday_morning(),
    }
}

fn red(category: FactorCategory, weight: u32, detail: &str) -> RiskFactor {
    RiskFactor {
        category,
        polarity: FactorPolarity::Red,
        weight,
        detail: detail.to_string(),
    }
}

#[test]
fn decision_follows_the_score_bands() {
    let builder = builder();

    for (score, expected) in [
        (0u8, Decision::Approve),
        (25, Decision::Approve),
        (40, Decision::Review),
        (69, Decision::Review),
        (70, Decision::Flag),
        (95, Decision::Flag),
    ] {
        let explanation = builder.build(&assessment(score, score, Vec::new()), 10_000);
        assert_eq!(explanation.decision, expected, "score {score}");
    }
}

#[test]
fn confidence_expresses_confidence_in_the_decision() {
    let builder = builder();

    let approve = builder.build(&assessment(20, 10, Vec::new()), 10_000);
    assert_eq!(approve.decision, Decision::Approve);
    assert_eq!(approve.confidence, 80);

    let flag = builder.build(&assessment(85, 85, Vec::new()), 10_000);
    assert_eq!(flag.decision, Decision::Flag);
    assert_eq!(flag.confidence, 85);
}

#[test]
fn borderline_scores_escalate_on_strong_rule_corroboration() {
    let builder = builder();

    // Just under the review boundary with rules in the medium band.
    let escalated = builder.build(&assessment(37, 45, Vec::new()), 10_000);
    assert_eq!(escalated.decision, Decision::Review);

    // Just under the flag boundary with rules saturating high.
    let flagged = builder.build(&assessment(67, 78, Vec::new()), 10_000);
    assert_eq!(flagged.decision, Decision::Flag);

    // Outside the margin the rule signal does not override the model.
    let held = builder.build(&assessment(30, 80, Vec::new()), 10_000);
    assert_eq!(held.decision, Decision::Approve);
}

#[test]
fn primary_reasons_are_ordered_heaviest_first() {
    let builder = builder();
    let factors = vec![
        red(FactorCategory::Amount, 20, "high claim amount: 300000"),
        red(FactorCategory::History, 25, "3 claims filed within the history window"),
        red(FactorCategory::Document, 35, "very suspicious documents"),
        red(FactorCategory::Timing, 10, "claim filed at unusual hour: 23:00"),
    ];

    let explanation = builder.build(&assessment(75, 90, factors), 300_000);

    assert_eq!(
        explanation.primary_reasons,
        vec![
            "very suspicious documents".to_string(),
            "3 claims filed within the history window".to_string(),
            "high claim amount: 300000".to_string(),
        ]
    );
    assert_eq!(
        explanation.contributing_factors,
        vec!["claim filed at unusual hour: 23:00".to_string()]
    );
}

#[test]
fn flags_keep_detection_order() {
    let engine = engine(0.8);
    let mut submission = submission_with_amount(600_000);
    submission.submitted_at = weekend_midnight();

    let assessment = engine.assess(
        &submission,
        &ClaimantHistory {
            active_claims: 3,
            rejected_claims: 1,
        },
        Some(&suspicious_extraction()),
        weekday_morning(),
    );
    let explanation = builder().build(&assessment, submission.amount);

    let categories: Vec<FactorCategory> = assessment
        .factors
        .iter()
        .filter(|factor| factor.polarity == FactorPolarity::Red)
        .map(|factor| factor.category)
        .collect();
    let mut sorted = categories.clone();
    sorted.sort_by_key(|category| match category {
        FactorCategory::Amount => 0,
        FactorCategory::History => 1,
        FactorCategory::Document => 2,
        FactorCategory::Timing => 3,
        FactorCategory::Model => 4,
    });
    assert_eq!(categories, sorted, "red flags follow detection order");
    assert_eq!(explanation.red_flags.len(), categories.len());
}

#[test]
fn templates_differ_per_decision_and_carry_a_recommendation() {
    let builder = builder();

    let approve = builder.build(&assessment(10, 0, Vec::new()), 20_000);
    let review = builder.build(&assessment(50, 30, Vec::new()), 20_000);
    let flag = builder.build(&assessment(80, 60, Vec::new()), 20_000);

    assert!(approve.summary.contains("appears legitimate"));
    assert!(review.summary.contains("requires manual review"));
    assert!(flag.summary.contains("flagged for investigation"));

    assert!(approve.summary.contains(&approve.recommendation));
    assert!(review.summary.contains(&review.recommendation));
    assert!(flag.summary.contains(&flag.recommendation));

    assert_ne!(approve.summary, review.summary);
    assert_ne!(review.summary, flag.summary);
}

#[test]
fn minimal_inputs_still_render_a_valid_explanation() {
    let builder = builder();
    let explanation = builder.build(&assessment(55, 0, Vec::new()), 0);

    assert_eq!(explanation.decision, Decision::Review);
    assert!(explanation.summary.contains("manual review required"));
    assert!(!explanation.recommendation.is_empty());
}

#[test]
fn identical_assessments_render_byte_identical_text() {
    let engine = engine(0.42);
    let submission = submission_with_amount(300_000);
    let history = ClaimantHistory {
        active_claims: 2,
        rejected_claims: 1,
    };
    let extraction = suspicious_extraction();
    let now = weekday_morning();
    let builder = builder();

    let first = builder.build(
        &engine.assess(&submission, &history, Some(&extraction), now),
        submission.amount,
    );
    let second = builder.build(
        &engine.assess(&submission, &history, Some(&extraction), now),
        submission.amount,
    );

    assert_eq!(first.summary, second.summary);
    assert_eq!(first, second);
}
