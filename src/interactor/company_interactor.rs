use crate::aptos::{apt_to_octas, SuperWalletContract};
use crate::entity::{BotError, CouponTemplate, EmiAgreement, LoyaltyTier, OfferNft, Resolution};
use crate::interactor::resolver::RecipientResolver;
use crate::interactor::session::SessionManager;
use crate::storage::keys::{
    company_coupons_key, company_emi_key, emi_agreements_key, offer_nfts_key,
};
use crate::storage::{load_ids, load_json, push_unique_id, save_json, KeyValueStore};
use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use futures::future::join_all;
use log::{info, warn};
use rust_decimal::Decimal;
use std::sync::Arc;

/// Input of `/new_coupon`
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoupon {
    pub name: String,
    pub description: String,
    pub discount_percent: u64,
    pub validity_days: u64,
    pub min_tier: LoyaltyTier,
}

impl NewCoupon {
    /// `name | description | discount% | validity days | min tier`
    pub fn parse(text: &str) -> Result<Self, BotError> {
        let parts: Vec<&str> = text.split('|').map(str::trim).collect();
        let [name, description, discount, validity, tier] = parts.as_slice() else {
            return Err(BotError::InvalidInput(
                "expected: name | description | discount% | validity days | min tier".to_string(),
            ));
        };

        if name.is_empty() {
            return Err(BotError::InvalidInput("coupon name is empty".to_string()));
        }

        let discount_percent = discount
            .trim_end_matches('%')
            .parse::<u64>()
            .ok()
            .filter(|d| (1..=100).contains(d))
            .ok_or_else(|| BotError::InvalidInput("discount must be 1-100%".to_string()))?;

        let validity_days = validity
            .parse::<u64>()
            .ok()
            .filter(|d| *d > 0)
            .ok_or_else(|| BotError::InvalidInput("validity must be a positive number of days".to_string()))?;

        let min_tier = parse_tier(tier)?;

        Ok(Self {
            name: name.to_string(),
            description: description.to_string(),
            discount_percent,
            validity_days,
            min_tier,
        })
    }
}

fn parse_tier(text: &str) -> Result<LoyaltyTier, BotError> {
    let tier = match text.to_lowercase().as_str() {
        "bronze" | "0" => LoyaltyTier::Bronze,
        "silver" | "1" => LoyaltyTier::Silver,
        "gold" | "2" => LoyaltyTier::Gold,
        "platinum" | "3" => LoyaltyTier::Platinum,
        "diamond" | "4" => LoyaltyTier::Diamond,
        _ => return Err(BotError::InvalidInput(format!("unknown tier {}", text))),
    };
    Ok(tier)
}

/// Input of `/new_emi`
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmi {
    pub user: String,
    pub monthly_amount: Decimal,
    pub total_months: u64,
    pub description: String,
}

impl NewEmi {
    /// `user | monthly APT | months | description`
    pub fn parse(text: &str) -> Result<Self, BotError> {
        let parts: Vec<&str> = text.splitn(4, '|').map(str::trim).collect();
        let [user, monthly, months, description] = parts.as_slice() else {
            return Err(BotError::InvalidInput(
                "expected: user | monthly APT | months | description".to_string(),
            ));
        };

        let monthly_amount = crate::aptos::utils::parse_apt_amount(monthly)?;
        let total_months = months
            .parse::<u64>()
            .ok()
            .filter(|m| *m > 0)
            .ok_or_else(|| BotError::InvalidInput("months must be a positive number".to_string()))?;

        Ok(Self {
            user: user.to_string(),
            monthly_amount,
            total_months,
            description: description.to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyDashboard {
    pub coupons: Vec<CouponTemplate>,
    pub agreements: Vec<EmiAgreement>,
}

#[async_trait]
pub trait CompanyInteractor: Send + Sync {
    async fn create_coupon(&self, owner: i64, coupon: NewCoupon) -> Result<u64>;
    async fn mint_coupon(&self, owner: i64, template_id: u64, recipient: &str) -> Result<(String, OfferNft)>;
    async fn deactivate_coupon(&self, owner: i64, template_id: u64) -> Result<String>;
    async fn create_emi(&self, owner: i64, emi: NewEmi) -> Result<(u64, String)>;
    async fn collect_emi(&self, owner: i64, agreement_id: u64) -> Result<(String, EmiAgreement)>;
    async fn dashboard(&self, owner: i64) -> Result<CompanyDashboard>;
}

pub struct CompanyInteractorImpl {
    store: Arc<dyn KeyValueStore>,
    sessions: Arc<SessionManager>,
    resolver: Arc<RecipientResolver>,
    contract: Arc<SuperWalletContract>,
}

impl CompanyInteractorImpl {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        sessions: Arc<SessionManager>,
        resolver: Arc<RecipientResolver>,
        contract: Arc<SuperWalletContract>,
    ) -> Self {
        Self {
            store,
            sessions,
            resolver,
            contract,
        }
    }

    async fn resolve_address(&self, input: &str) -> Result<String> {
        match self.resolver.resolve(input).await? {
            Resolution::Found { address, .. } => Ok(address),
            Resolution::NotFound { kind } => {
                Err(BotError::InvalidRecipient(format!("{} {} is not registered", kind, input)).into())
            }
            Resolution::LookupError { reason, .. } => Err(BotError::Contract(reason).into()),
        }
    }
}

#[async_trait]
impl CompanyInteractor for CompanyInteractorImpl {
    async fn create_coupon(&self, owner: i64, coupon: NewCoupon) -> Result<u64> {
        let account = self.sessions.active_account(owner).await?;
        let template_id = self
            .contract
            .create_coupon_template(
                &account,
                &coupon.name,
                &coupon.description,
                coupon.discount_percent,
                coupon.validity_days,
                coupon.min_tier,
            )
            .await?;

        push_unique_id(
            self.store.as_ref(),
            &company_coupons_key(&account.address),
            template_id,
        )
        .await?;
        info!("Company {} created coupon template {}", account.address, template_id);

        Ok(template_id)
    }

    async fn mint_coupon(&self, owner: i64, template_id: u64, recipient: &str) -> Result<(String, OfferNft)> {
        let account = self.sessions.active_account(owner).await?;
        let recipient = self.resolve_address(recipient).await?;

        let hash = self
            .contract
            .mint_coupon(&account, template_id, &recipient)
            .await?;

        let template = self.contract.get_coupon_template(template_id).await?;
        let offer = OfferNft::from_template(&template, Utc::now());

        let key = offer_nfts_key(&recipient);
        let mut offers: Vec<OfferNft> = load_json(self.store.as_ref(), &key)
            .await?
            .unwrap_or_default();
        offers.push(offer.clone());
        save_json(self.store.as_ref(), &key, &offers).await?;
        info!("Minted coupon {} to {} ({})", template_id, recipient, hash);

        Ok((hash, offer))
    }

    async fn deactivate_coupon(&self, owner: i64, template_id: u64) -> Result<String> {
        let account = self.sessions.active_account(owner).await?;
        self.contract
            .deactivate_coupon_template(&account, template_id)
            .await
    }

    async fn create_emi(&self, owner: i64, emi: NewEmi) -> Result<(u64, String)> {
        let account = self.sessions.active_account(owner).await?;
        let user = self.resolve_address(&emi.user).await?;
        let monthly_octas = apt_to_octas(emi.monthly_amount)?;

        let agreement_id = self
            .contract
            .create_emi_agreement(
                &account,
                &user,
                monthly_octas,
                emi.total_months,
                &emi.description,
            )
            .await?;

        push_unique_id(self.store.as_ref(), &company_emi_key(&account.address), agreement_id).await?;
        push_unique_id(self.store.as_ref(), &emi_agreements_key(&user), agreement_id).await?;
        info!(
            "Company {} created EMI agreement {} for {}",
            account.address, agreement_id, user
        );

        Ok((agreement_id, user))
    }

    async fn collect_emi(&self, owner: i64, agreement_id: u64) -> Result<(String, EmiAgreement)> {
        let account = self.sessions.active_account(owner).await?;

        let agreement = self.contract.get_emi_agreement(agreement_id).await?;
        if !agreement.is_collectable(Utc::now()) {
            return Err(BotError::Contract(format!(
                "EMI agreement {} has no installment due",
                agreement_id
            ))
            .into());
        }

        let hash = self
            .contract
            .collect_emi_payment(&account, agreement_id)
            .await?;
        let updated = self.contract.get_emi_agreement(agreement_id).await?;

        Ok((hash, updated))
    }

    async fn dashboard(&self, owner: i64) -> Result<CompanyDashboard> {
        let session = self.sessions.session(owner).await?;
        let account = session.account.ok_or(BotError::WalletNotFound)?;

        let coupon_ids = load_ids(self.store.as_ref(), &company_coupons_key(&account.address)).await?;
        let emi_ids = load_ids(self.store.as_ref(), &company_emi_key(&account.address)).await?;

        let coupons = join_all(
            coupon_ids
                .iter()
                .map(|id| self.contract.get_coupon_template(*id)),
        )
        .await;
        let agreements = join_all(emi_ids.iter().map(|id| self.contract.get_emi_agreement(*id))).await;

        Ok(CompanyDashboard {
            coupons: coupons
                .into_iter()
                .filter_map(|result| result.map_err(|e| warn!("Skipping coupon template: {}", e)).ok())
                .collect(),
            agreements: agreements
                .into_iter()
                .filter_map(|result| result.map_err(|e| warn!("Skipping EMI agreement: {}", e)).ok())
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn parses_coupon_definition() {
        let coupon = NewCoupon::parse("Spring sale | 10% off shoes | 10% | 30 | silver").unwrap();
        assert_eq!(coupon.name, "Spring sale");
        assert_eq!(coupon.discount_percent, 10);
        assert_eq!(coupon.validity_days, 30);
        assert_eq!(coupon.min_tier, LoyaltyTier::Silver);
    }

    #[test]
    fn rejects_bad_coupon_fields() {
        assert!(NewCoupon::parse("a | b | 0 | 30 | gold").is_err());
        assert!(NewCoupon::parse("a | b | 150 | 30 | gold").is_err());
        assert!(NewCoupon::parse("a | b | 10 | 0 | gold").is_err());
        assert!(NewCoupon::parse("a | b | 10 | 30 | copper").is_err());
        assert!(NewCoupon::parse("a | b | 10").is_err());
    }

    #[test]
    fn parses_emi_definition_with_pipes_in_description() {
        let emi = NewEmi::parse("alice | 0.5 | 12 | Laptop | 16GB").unwrap();
        assert_eq!(emi.user, "alice");
        assert_eq!(emi.monthly_amount, Decimal::from_str("0.5").unwrap());
        assert_eq!(emi.total_months, 12);
        assert_eq!(emi.description, "Laptop | 16GB");
        assert!(NewEmi::parse("alice | 0.5 | 0 | Laptop").is_err());
    }
}
