use serde::{Deserialize, Serialize};

/// Loyalty tier derived from a user's cumulative transaction count
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LoyaltyTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
}

const THRESHOLDS: [(u64, LoyaltyTier); 5] = [
    (100, LoyaltyTier::Diamond),
    (50, LoyaltyTier::Platinum),
    (20, LoyaltyTier::Gold),
    (10, LoyaltyTier::Silver),
    (0, LoyaltyTier::Bronze),
];

impl LoyaltyTier {
    pub fn from_transaction_count(count: u64) -> Self {
        THRESHOLDS
            .iter()
            .find(|(threshold, _)| count >= *threshold)
            .map(|(_, tier)| *tier)
            .unwrap_or(LoyaltyTier::Bronze)
    }

    /// Transactions needed to reach this tier
    pub fn threshold(self) -> u64 {
        match self {
            LoyaltyTier::Bronze => 0,
            LoyaltyTier::Silver => 10,
            LoyaltyTier::Gold => 20,
            LoyaltyTier::Platinum => 50,
            LoyaltyTier::Diamond => 100,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            LoyaltyTier::Bronze => Some(LoyaltyTier::Silver),
            LoyaltyTier::Silver => Some(LoyaltyTier::Gold),
            LoyaltyTier::Gold => Some(LoyaltyTier::Platinum),
            LoyaltyTier::Platinum => Some(LoyaltyTier::Diamond),
            LoyaltyTier::Diamond => None,
        }
    }

    /// On-chain numeric level, matches the `min_tier` byte of coupon templates
    pub fn level(self) -> u8 {
        match self {
            LoyaltyTier::Bronze => 0,
            LoyaltyTier::Silver => 1,
            LoyaltyTier::Gold => 2,
            LoyaltyTier::Platinum => 3,
            LoyaltyTier::Diamond => 4,
        }
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(LoyaltyTier::Bronze),
            1 => Some(LoyaltyTier::Silver),
            2 => Some(LoyaltyTier::Gold),
            3 => Some(LoyaltyTier::Platinum),
            4 => Some(LoyaltyTier::Diamond),
            _ => None,
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            LoyaltyTier::Bronze => "🥉",
            LoyaltyTier::Silver => "🥈",
            LoyaltyTier::Gold => "🥇",
            LoyaltyTier::Platinum => "💠",
            LoyaltyTier::Diamond => "💎",
        }
    }
}

impl std::fmt::Display for LoyaltyTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoyaltyTier::Bronze => write!(f, "Bronze"),
            LoyaltyTier::Silver => write!(f, "Silver"),
            LoyaltyTier::Gold => write!(f, "Gold"),
            LoyaltyTier::Platinum => write!(f, "Platinum"),
            LoyaltyTier::Diamond => write!(f, "Diamond"),
        }
    }
}

/// Tier standing for display
#[derive(Debug, Clone, PartialEq)]
pub struct LoyaltyStatus {
    pub transaction_count: u64,
    pub total_volume: u64,
    pub tier: LoyaltyTier,
    pub next_tier: Option<LoyaltyTier>,
    pub transactions_to_next: u64,
}

impl LoyaltyStatus {
    pub fn new(transaction_count: u64, total_volume: u64) -> Self {
        let tier = LoyaltyTier::from_transaction_count(transaction_count);
        let next_tier = tier.next();
        let transactions_to_next = next_tier
            .map(|next| next.threshold().saturating_sub(transaction_count))
            .unwrap_or(0);

        Self {
            transaction_count,
            total_volume,
            tier,
            next_tier,
            transactions_to_next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_map_to_tiers() {
        assert_eq!(LoyaltyTier::from_transaction_count(0), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::from_transaction_count(9), LoyaltyTier::Bronze);
        assert_eq!(LoyaltyTier::from_transaction_count(10), LoyaltyTier::Silver);
        assert_eq!(LoyaltyTier::from_transaction_count(20), LoyaltyTier::Gold);
        assert_eq!(LoyaltyTier::from_transaction_count(50), LoyaltyTier::Platinum);
        assert_eq!(LoyaltyTier::from_transaction_count(100), LoyaltyTier::Diamond);
        assert_eq!(LoyaltyTier::from_transaction_count(10_000), LoyaltyTier::Diamond);
    }

    #[test]
    fn tier_never_decreases_with_more_transactions() {
        let mut previous = LoyaltyTier::from_transaction_count(0);
        for count in 1..=250 {
            let tier = LoyaltyTier::from_transaction_count(count);
            assert!(tier >= previous, "tier dropped at count {}", count);
            previous = tier;
        }
    }

    #[test]
    fn threshold_is_the_lower_bound_of_each_tier() {
        for tier in [
            LoyaltyTier::Bronze,
            LoyaltyTier::Silver,
            LoyaltyTier::Gold,
            LoyaltyTier::Platinum,
            LoyaltyTier::Diamond,
        ] {
            assert_eq!(LoyaltyTier::from_transaction_count(tier.threshold()), tier);
            assert_eq!(LoyaltyTier::from_level(tier.level()), Some(tier));
        }
    }

    #[test]
    fn status_reports_distance_to_next_tier() {
        let status = LoyaltyStatus::new(14, 0);
        assert_eq!(status.tier, LoyaltyTier::Silver);
        assert_eq!(status.next_tier, Some(LoyaltyTier::Gold));
        assert_eq!(status.transactions_to_next, 6);

        let top = LoyaltyStatus::new(120, 0);
        assert_eq!(top.next_tier, None);
        assert_eq!(top.transactions_to_next, 0);
    }
}
