use crate::entity::BotError;
use crate::interactor::company_interactor::{CompanyInteractor, NewCoupon, NewEmi};
use crate::presenter::user_error_message;
use crate::view::company_view::CompanyView;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

const NEW_COUPON_USAGE: &str =
    "Usage: /new_coupon name | description | discount% | validity days | min tier\nExample: /new_coupon Spring sale | 10% off shoes | 10 | 30 | silver";
const MINT_COUPON_USAGE: &str = "Usage: /mint_coupon <template id> <recipient>";
const DEACTIVATE_COUPON_USAGE: &str = "Usage: /deactivate_coupon <template id>";
const NEW_EMI_USAGE: &str =
    "Usage: /new_emi user | monthly APT | months | description\nExample: /new_emi alice | 0.5 | 12 | Laptop";
const COLLECT_EMI_USAGE: &str = "Usage: /collect_emi <agreement id>";

#[async_trait]
pub trait CompanyPresenter: Send + Sync {
    async fn show_dashboard(&self, owner: i64) -> Result<()>;
    async fn create_coupon(&self, owner: i64, args: &str) -> Result<()>;
    async fn mint_coupon(&self, owner: i64, args: &str) -> Result<()>;
    async fn deactivate_coupon(&self, owner: i64, args: &str) -> Result<()>;
    async fn create_emi(&self, owner: i64, args: &str) -> Result<()>;
    async fn collect_emi(&self, owner: i64, args: &str) -> Result<()>;
}

pub struct CompanyPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> CompanyPresenterImpl<I, V>
where
    I: CompanyInteractor,
    V: CompanyView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }
}

/// `<id> <rest>`
fn parse_id_and_rest(args: &str) -> Option<(u64, &str)> {
    let args = args.trim();
    let (id, rest) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
    id.trim_start_matches('#')
        .parse()
        .ok()
        .map(|id| (id, rest.trim()))
}

#[async_trait]
impl<I, V> CompanyPresenter for CompanyPresenterImpl<I, V>
where
    I: CompanyInteractor + Send + Sync,
    V: CompanyView + Send + Sync,
{
    async fn show_dashboard(&self, owner: i64) -> Result<()> {
        match self.interactor.dashboard(owner).await {
            Ok(dashboard) => self.view.display_dashboard(&dashboard).await,
            Err(e) => self.view.display_error(user_error_message(&e), None).await,
        }
    }

    async fn create_coupon(&self, owner: i64, args: &str) -> Result<()> {
        let coupon = match NewCoupon::parse(args) {
            Ok(coupon) => coupon,
            Err(BotError::InvalidInput(reason)) if !args.trim().is_empty() => {
                return self
                    .view
                    .display_usage(&format!("{}\n\n{}", reason, NEW_COUPON_USAGE))
                    .await;
            }
            Err(_) => return self.view.display_usage(NEW_COUPON_USAGE).await,
        };

        let message = self.view.display_processing().await?;
        match self.interactor.create_coupon(owner, coupon).await {
            Ok(template_id) => self.view.display_coupon_created(template_id, message).await,
            Err(e) => self.view.display_error(user_error_message(&e), message).await,
        }
    }

    async fn mint_coupon(&self, owner: i64, args: &str) -> Result<()> {
        let (template_id, recipient) = match parse_id_and_rest(args) {
            Some((id, recipient)) if !recipient.is_empty() => (id, recipient),
            _ => return self.view.display_usage(MINT_COUPON_USAGE).await,
        };

        let message = self.view.display_processing().await?;
        match self.interactor.mint_coupon(owner, template_id, recipient).await {
            Ok((hash, offer)) => self.view.display_coupon_minted(&offer, &hash, message).await,
            Err(e) => self.view.display_error(user_error_message(&e), message).await,
        }
    }

    async fn deactivate_coupon(&self, owner: i64, args: &str) -> Result<()> {
        let template_id = match parse_id_and_rest(args) {
            Some((id, _)) => id,
            None => return self.view.display_usage(DEACTIVATE_COUPON_USAGE).await,
        };

        let message = self.view.display_processing().await?;
        match self.interactor.deactivate_coupon(owner, template_id).await {
            Ok(hash) => {
                self.view
                    .display_coupon_deactivated(template_id, &hash, message)
                    .await
            }
            Err(e) => self.view.display_error(user_error_message(&e), message).await,
        }
    }

    async fn create_emi(&self, owner: i64, args: &str) -> Result<()> {
        let emi = match NewEmi::parse(args) {
            Ok(emi) => emi,
            Err(e) if !args.trim().is_empty() => {
                return self
                    .view
                    .display_usage(&format!("{}\n\n{}", e, NEW_EMI_USAGE))
                    .await;
            }
            Err(_) => return self.view.display_usage(NEW_EMI_USAGE).await,
        };

        let message = self.view.display_processing().await?;
        match self.interactor.create_emi(owner, emi).await {
            Ok((agreement_id, user)) => {
                self.view
                    .display_emi_created(agreement_id, &user, message)
                    .await
            }
            Err(e) => self.view.display_error(user_error_message(&e), message).await,
        }
    }

    async fn collect_emi(&self, owner: i64, args: &str) -> Result<()> {
        let agreement_id = match parse_id_and_rest(args) {
            Some((id, _)) => id,
            None => return self.view.display_usage(COLLECT_EMI_USAGE).await,
        };

        let message = self.view.display_processing().await?;
        match self.interactor.collect_emi(owner, agreement_id).await {
            Ok((hash, agreement)) => {
                self.view
                    .display_emi_collected(&agreement, &hash, message)
                    .await
            }
            Err(e) => self.view.display_error(user_error_message(&e), message).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_and_rest_split_on_first_whitespace() {
        assert_eq!(parse_id_and_rest("7 alice"), Some((7, "alice")));
        assert_eq!(parse_id_and_rest("#12"), Some((12, "")));
        assert_eq!(parse_id_and_rest(" 3   0xabc "), Some((3, "0xabc")));
        assert_eq!(parse_id_and_rest("abc"), None);
        assert_eq!(parse_id_and_rest(""), None);
    }
}
