use super::workflow::TerminalEvent;
use serde::{Deserialize, Serialize};

/// Badges a claimant can earn. The set on a profile is append-only and
/// duplicate-free.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    FirstApproved,
    FiveClean,
    TrustedCustomer,
    GoldMember,
    FiveClaimStreak,
}

impl Badge {
    pub const fn label(self) -> &'static str {
        match self {
            Badge::FirstApproved => "First Approved Claim",
            Badge::FiveClean => "5 Clean Claims",
            Badge::TrustedCustomer => "Trusted Customer",
            Badge::GoldMember => "Gold Member",
            Badge::FiveClaimStreak => "5-Claim Streak",
        }
    }
}

/// Per-claimant reputation ledger, mutated only on terminal transitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GamificationProfile {
    pub claimant_id: String,
    pub honesty_score: u8,
    pub claim_streak: u32,
    pub total_claims: u32,
    pub approved_claims: u32,
    pub badges: Vec<Badge>,
    pub discount_eligibility: u8,
}

impl GamificationProfile {
    pub fn new(claimant_id: impl Into<String>) -> Self {
        Self {
            claimant_id: claimant_id.into(),
            honesty_score: 100,
            claim_streak: 0,
            total_claims: 0,
            approved_claims: 0,
            badges: Vec::new(),
            discount_eligibility: 0,
        }
    }

    pub fn has_badge(&self, badge: Badge) -> bool {
        self.badges.contains(&badge)
    }
}

const HONESTY_CEILING: u8 = 100;
const HONESTY_APPROVAL_BONUS: u8 = 5;
const HONESTY_REJECTION_PENALTY: u8 = 10;
const STREAK_BADGE_THRESHOLD: u32 = 5;
const STREAK_DISCOUNT_PERCENT: u8 = 10;

// Threshold-crossing (not equality) so counts that jump past a milestone
// still earn it.
const APPROVAL_MILESTONES: [(u32, Badge); 4] = [
    (1, Badge::FirstApproved),
    (5, Badge::FiveClean),
    (10, Badge::TrustedCustomer),
    (20, Badge::GoldMember),
];

/// Applies terminal-transition side effects to a profile. Callers invoke it
/// at most once per claim; the workflow's settlement flag guards reentry.
pub struct GamificationLedger;

impl GamificationLedger {
    pub fn settle(profile: &mut GamificationProfile, event: TerminalEvent) {
        match event {
            TerminalEvent::Approved => {
                profile.total_claims += 1;
                profile.approved_claims += 1;
                profile.claim_streak += 1;
                profile.honesty_score = profile
                    .honesty_score
                    .saturating_add(HONESTY_APPROVAL_BONUS)
                    .min(HONESTY_CEILING);

                for (threshold, badge) in APPROVAL_MILESTONES {
                    if profile.approved_claims >= threshold {
                        award(profile, badge);
                    }
                }

                if profile.claim_streak >= STREAK_BADGE_THRESHOLD {
                    award(profile, Badge::FiveClaimStreak);
                    profile.discount_eligibility = STREAK_DISCOUNT_PERCENT;
                }
            }
            TerminalEvent::Rejected => {
                profile.total_claims += 1;
                profile.claim_streak = 0;
                profile.honesty_score =
                    profile.honesty_score.saturating_sub(HONESTY_REJECTION_PENALTY);
            }
        }
    }
}

fn award(profile: &mut GamificationProfile, badge: Badge) {
    if !profile.has_badge(badge) {
        profile.badges.push(badge);
    }
}
