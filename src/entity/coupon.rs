use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::LoyaltyTier;

/// Reusable discount definition a company mints to users as an NFT
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CouponTemplate {
    pub id: u64,
    pub creator: String,
    pub name: String,
    pub description: String,
    pub discount_percent: u64,
    pub validity_days: u64,
    pub min_tier: LoyaltyTier,
    pub active: bool,
}

impl CouponTemplate {
    pub fn is_eligible(&self, tier: LoyaltyTier) -> bool {
        self.active && tier >= self.min_tier
    }
}

/// A coupon a user has received, cached under `offer_nfts_<address>`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OfferNft {
    pub template_id: u64,
    pub name: String,
    pub discount_percent: u64,
    pub issued_by: String,
    pub received_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl OfferNft {
    pub fn from_template(template: &CouponTemplate, received_at: DateTime<Utc>) -> Self {
        Self {
            template_id: template.id,
            name: template.name.clone(),
            discount_percent: template.discount_percent,
            issued_by: template.creator.clone(),
            received_at,
            expires_at: received_at + chrono::Duration::days(template.validity_days as i64),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(min_tier: LoyaltyTier) -> CouponTemplate {
        CouponTemplate {
            id: 7,
            creator: "0xc".to_string(),
            name: "Spring sale".to_string(),
            description: "10% off".to_string(),
            discount_percent: 10,
            validity_days: 30,
            min_tier,
            active: true,
        }
    }

    #[test]
    fn eligibility_requires_min_tier() {
        let coupon = template(LoyaltyTier::Gold);
        assert!(!coupon.is_eligible(LoyaltyTier::Silver));
        assert!(coupon.is_eligible(LoyaltyTier::Gold));
        assert!(coupon.is_eligible(LoyaltyTier::Diamond));
    }

    #[test]
    fn offer_expires_after_validity_window() {
        let received = Utc::now();
        let offer = OfferNft::from_template(&template(LoyaltyTier::Bronze), received);
        assert!(!offer.is_expired(received + chrono::Duration::days(29)));
        assert!(offer.is_expired(received + chrono::Duration::days(30)));
    }
}
