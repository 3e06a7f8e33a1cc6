use crate::workflows::claims::gamification::{Badge, GamificationLedger, GamificationProfile};
use crate::workflows::claims::workflow::TerminalEvent;

#[test]
fn first_approval_updates_counters_and_awards_the_first_badge() {
    let mut profile = GamificationProfile::new("claimant-7");

    GamificationLedger::settle(&mut profile, TerminalEvent::Approved);

    assert_eq!(profile.total_claims, 1);
    assert_eq!(profile.approved_claims, 1);
    assert_eq!(profile.claim_streak, 1);
    assert_eq!(profile.honesty_score, 100, "honesty is capped at 100");
    assert!(profile.has_badge(Badge::FirstApproved));
    assert!(!profile.has_badge(Badge::FiveClean));
}

#[test]
fn honesty_recovers_after_a_rejection_but_never_exceeds_the_cap() {
    let mut profile = GamificationProfile::new("claimant-7");
    GamificationLedger::settle(&mut profile, TerminalEvent::Rejected);
    assert_eq!(profile.honesty_score, 90);

    GamificationLedger::settle(&mut profile, TerminalEvent::Approved);
    assert_eq!(profile.honesty_score, 95);

    GamificationLedger::settle(&mut profile, TerminalEvent::Approved);
    GamificationLedger::settle(&mut profile, TerminalEvent::Approved);
    assert_eq!(profile.honesty_score, 100, "bonus saturates at the cap");
}

#[test]
fn rejection_resets_the_streak_and_floors_honesty_at_zero() {
    let mut profile = GamificationProfile::new("claimant-7");
    profile.claim_streak = 4;
    profile.honesty_score = 5;

    GamificationLedger::settle(&mut profile, TerminalEvent::Rejected);

    assert_eq!(profile.claim_streak, 0);
    assert_eq!(profile.honesty_score, 0, "honesty never goes negative");
}

#[test]
fn five_approval_streak_awards_the_streak_badge_and_discount() {
    let mut profile = GamificationProfile::new("claimant-7");

    for _ in 0..5 {
        GamificationLedger::settle(&mut profile, TerminalEvent::Approved);
    }

    assert_eq!(profile.claim_streak, 5);
    assert!(profile.has_badge(Badge::FiveClaimStreak));
    assert!(profile.has_badge(Badge::FiveClean));
    assert_eq!(profile.discount_eligibility, 10);
}

#[test]
fn milestones_use_threshold_crossing_not_equality() {
    // A profile whose count jumped past a milestone (e.g. bulk import)
    // still earns every badge at or below the count.
    let mut profile = GamificationProfile::new("claimant-7");
    profile.approved_claims = 11;
    profile.total_claims = 11;

    GamificationLedger::settle(&mut profile, TerminalEvent::Approved);

    assert_eq!(profile.approved_claims, 12);
    assert!(profile.has_badge(Badge::FirstApproved));
    assert!(profile.has_badge(Badge::FiveClean));
    assert!(profile.has_badge(Badge::TrustedCustomer));
    assert!(!profile.has_badge(Badge::GoldMember));
}

#[test]
fn badges_are_never_duplicated_when_milestones_recompute() {
    let mut profile = GamificationProfile::new("claimant-7");

    for _ in 0..7 {
        GamificationLedger::settle(&mut profile, TerminalEvent::Approved);
    }

    let first_approved = profile
        .badges
        .iter()
        .filter(|badge| **badge == Badge::FirstApproved)
        .count();
    let five_clean = profile
        .badges
        .iter()
        .filter(|badge| **badge == Badge::FiveClean)
        .count();
    assert_eq!(first_approved, 1);
    assert_eq!(five_clean, 1);
}

#[test]
fn streak_restarts_cleanly_after_a_rejection() {
    let mut profile = GamificationProfile::new("claimant-7");
    for _ in 0..3 {
        GamificationLedger::settle(&mut profile, TerminalEvent::Approved);
    }
    GamificationLedger::settle(&mut profile, TerminalEvent::Rejected);
    GamificationLedger::settle(&mut profile, TerminalEvent::Approved);

    assert_eq!(profile.claim_streak, 1);
    assert_eq!(profile.total_claims, 5);
    assert_eq!(profile.approved_claims, 4);
}
