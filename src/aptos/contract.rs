use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use log::info;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

use crate::aptos::client::{parse_u64, AptosClient};
use crate::aptos::models::{EntryFunctionPayload, TransactionInfo};
use crate::aptos::utils::normalize_address;
use crate::config::AppConfig;
use crate::entity::{BotError, CouponTemplate, EmiAgreement, LoyaltyTier, WalletAccount};
use crate::interactor::resolver::RegistryLookup;

const REGISTRY_MODULE: &str = "wallet_registry";
const COUPON_MODULE: &str = "coupon_nft";
const EMI_MODULE: &str = "emi";
const LOYALTY_MODULE: &str = "loyalty";

const CONFIRMATION_TIMEOUT: Duration = Duration::from_secs(30);

/// View and entry functions of the super wallet Move package
pub struct SuperWalletContract {
    client: Arc<AptosClient>,
    config: AppConfig,
}

impl SuperWalletContract {
    pub fn new(client: Arc<AptosClient>, config: AppConfig) -> Self {
        Self { client, config }
    }

    async fn view(&self, module: &str, function: &str, arguments: Vec<Value>) -> Result<Vec<Value>> {
        self.client
            .view(
                &self.config.contract_function(module, function),
                vec![],
                arguments,
            )
            .await
    }

    /// Submits an entry function and waits for it to commit successfully
    async fn execute(
        &self,
        account: &WalletAccount,
        module: &str,
        function: &str,
        arguments: Vec<Value>,
    ) -> Result<TransactionInfo> {
        let payload = EntryFunctionPayload::new(
            self.config.contract_function(module, function),
            vec![],
            arguments,
        );
        let hash = self.client.submit_entry_function(account, payload).await?;

        let info = self
            .client
            .wait_for_transaction(&hash, CONFIRMATION_TIMEOUT)
            .await?
            .filter(|info| !info.is_pending())
            .ok_or_else(|| {
                BotError::Contract(format!(
                    "{}::{} not confirmed in time ({})",
                    module, function, hash
                ))
            })?;

        if info.success != Some(true) {
            return Err(BotError::Contract(format!(
                "{}::{} failed: {}",
                module,
                function,
                info.vm_status.clone().unwrap_or_else(|| "unknown status".to_string())
            ))
            .into());
        }

        Ok(info)
    }

    pub async fn get_wallet_id_by_address(&self, address: &str) -> Result<Option<String>> {
        let values = self
            .view(REGISTRY_MODULE, "get_wallet_id_by_address", vec![json!(address)])
            .await?;
        let inner = first_option(&values)?;
        Ok(inner.and_then(|value| value.as_str().map(str::to_string)))
    }

    pub async fn register_wallet_id(&self, account: &WalletAccount, wallet_id: &str) -> Result<String> {
        let info = self
            .execute(account, REGISTRY_MODULE, "register_wallet_id", vec![json!(wallet_id)])
            .await?;
        info!("Registered wallet id {} for {}", wallet_id, account.address);
        Ok(info.hash)
    }

    /// Creates a template and returns its id from the `CouponTemplateCreated` event
    pub async fn create_coupon_template(
        &self,
        account: &WalletAccount,
        name: &str,
        description: &str,
        discount_percent: u64,
        validity_days: u64,
        min_tier: LoyaltyTier,
    ) -> Result<u64> {
        let info = self
            .execute(
                account,
                COUPON_MODULE,
                "create_coupon_template",
                vec![
                    json!(name),
                    json!(description),
                    json!(discount_percent.to_string()),
                    json!(validity_days.to_string()),
                    json!(min_tier.level()),
                ],
            )
            .await?;

        event_u64(&info, "::coupon_nft::CouponTemplateCreated", "template_id")
    }

    pub async fn get_coupon_template(&self, template_id: u64) -> Result<CouponTemplate> {
        let values = self
            .view(
                COUPON_MODULE,
                "get_coupon_template",
                vec![json!(template_id.to_string())],
            )
            .await?;
        let value = values
            .first()
            .ok_or_else(|| anyhow!("Empty coupon template response"))?;
        parse_coupon_template(value)
    }

    pub async fn mint_coupon(
        &self,
        account: &WalletAccount,
        template_id: u64,
        recipient: &str,
    ) -> Result<String> {
        let info = self
            .execute(
                account,
                COUPON_MODULE,
                "mint_coupon",
                vec![json!(template_id.to_string()), json!(recipient)],
            )
            .await?;
        Ok(info.hash)
    }

    pub async fn deactivate_coupon_template(
        &self,
        account: &WalletAccount,
        template_id: u64,
    ) -> Result<String> {
        let info = self
            .execute(
                account,
                COUPON_MODULE,
                "deactivate_coupon_template",
                vec![json!(template_id.to_string())],
            )
            .await?;
        Ok(info.hash)
    }

    /// Creates an agreement and returns its id from the `EmiAgreementCreated` event
    pub async fn create_emi_agreement(
        &self,
        account: &WalletAccount,
        user: &str,
        monthly_amount: u64,
        total_months: u64,
        description: &str,
    ) -> Result<u64> {
        let info = self
            .execute(
                account,
                EMI_MODULE,
                "create_emi_agreement",
                vec![
                    json!(user),
                    json!(monthly_amount.to_string()),
                    json!(total_months.to_string()),
                    json!(description),
                ],
            )
            .await?;

        event_u64(&info, "::emi::EmiAgreementCreated", "agreement_id")
    }

    pub async fn get_emi_agreement(&self, agreement_id: u64) -> Result<EmiAgreement> {
        let values = self
            .view(
                EMI_MODULE,
                "get_emi_agreement",
                vec![json!(agreement_id.to_string())],
            )
            .await?;
        let value = values
            .first()
            .ok_or_else(|| anyhow!("Empty EMI agreement response"))?;
        parse_emi_agreement(value)
    }

    pub async fn collect_emi_payment(
        &self,
        account: &WalletAccount,
        agreement_id: u64,
    ) -> Result<String> {
        let info = self
            .execute(
                account,
                EMI_MODULE,
                "collect_emi_payment",
                vec![json!(agreement_id.to_string())],
            )
            .await?;
        Ok(info.hash)
    }

    /// `(transaction_count, total_volume_octas)`
    pub async fn get_user_stats(&self, address: &str) -> Result<(u64, u64)> {
        let values = self
            .view(LOYALTY_MODULE, "get_user_stats", vec![json!(address)])
            .await?;
        match values.as_slice() {
            [count, volume, ..] => Ok((parse_u64(count)?, parse_u64(volume)?)),
            _ => Err(anyhow!("Unexpected user stats response: {:?}", values)),
        }
    }
}

#[async_trait]
impl RegistryLookup for SuperWalletContract {
    async fn address_by_wallet_id(&self, wallet_id: &str) -> Result<Option<String>> {
        let values = self
            .view(REGISTRY_MODULE, "get_address_by_wallet_id", vec![json!(wallet_id)])
            .await?;
        option_address(&values)
    }

    async fn address_by_upi_id(&self, upi_id: &str) -> Result<Option<String>> {
        let values = self
            .view(REGISTRY_MODULE, "get_address_by_upi_id", vec![json!(upi_id)])
            .await?;
        option_address(&values)
    }
}

/// Move `Option<T>` is encoded as `{"vec": []}` or `{"vec": [value]}`
fn first_option(values: &[Value]) -> Result<Option<&Value>> {
    let option = values
        .first()
        .ok_or_else(|| anyhow!("Empty view response"))?;
    let vec = option
        .get("vec")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Expected Move option, got {}", option))?;
    Ok(vec.first())
}

fn option_address(values: &[Value]) -> Result<Option<String>> {
    match first_option(values)? {
        Some(Value::String(address)) => Ok(Some(normalize_address(address)?)),
        Some(other) => Err(anyhow!("Expected address, got {}", other)),
        None => Ok(None),
    }
}

fn field<'a>(value: &'a Value, name: &str) -> Result<&'a Value> {
    value
        .get(name)
        .ok_or_else(|| anyhow!("Missing field '{}'", name))
}

fn field_str(value: &Value, name: &str) -> Result<String> {
    field(value, name)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow!("Field '{}' is not a string", name))
}

fn field_bool(value: &Value, name: &str) -> Result<bool> {
    field(value, name)?
        .as_bool()
        .ok_or_else(|| anyhow!("Field '{}' is not a bool", name))
}

fn event_u64(info: &TransactionInfo, event_suffix: &str, name: &str) -> Result<u64> {
    let event = info
        .find_event(event_suffix)
        .ok_or_else(|| anyhow!("Transaction {} emitted no {} event", info.hash, event_suffix))?;
    parse_u64(field(&event.data, name)?)
}

pub fn parse_coupon_template(value: &Value) -> Result<CouponTemplate> {
    let min_tier = parse_u64(field(value, "min_tier")?)?;
    Ok(CouponTemplate {
        id: parse_u64(field(value, "id")?)?,
        creator: normalize_address(&field_str(value, "creator")?)?,
        name: field_str(value, "name")?,
        description: field_str(value, "description")?,
        discount_percent: parse_u64(field(value, "discount_percent")?)?,
        validity_days: parse_u64(field(value, "validity_days")?)?,
        min_tier: u8::try_from(min_tier)
            .ok()
            .and_then(LoyaltyTier::from_level)
            .ok_or_else(|| anyhow!("Unknown tier level {}", min_tier))?,
        active: field_bool(value, "active")?,
    })
}

pub fn parse_emi_agreement(value: &Value) -> Result<EmiAgreement> {
    let next_due_secs = parse_u64(field(value, "next_due_secs")?)?;
    let next_due = if next_due_secs == 0 {
        None
    } else {
        Utc.timestamp_opt(next_due_secs as i64, 0).single()
    };

    Ok(EmiAgreement {
        id: parse_u64(field(value, "id")?)?,
        company: normalize_address(&field_str(value, "company")?)?,
        user: normalize_address(&field_str(value, "user")?)?,
        monthly_amount: parse_u64(field(value, "monthly_amount")?)?,
        total_months: parse_u64(field(value, "total_months")?)?,
        months_paid: parse_u64(field(value, "months_paid")?)?,
        next_due,
        description: field_str(value, "description")?,
        active: field_bool(value, "active")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_option_decodes_to_address() {
        let some = vec![json!({"vec": ["0xABC"]})];
        assert_eq!(
            option_address(&some).unwrap(),
            Some(format!("0x{:0>64}", "abc"))
        );

        let none = vec![json!({"vec": []})];
        assert_eq!(option_address(&none).unwrap(), None);

        assert!(option_address(&[json!("0x1")]).is_err());
        assert!(option_address(&[]).is_err());
    }

    #[test]
    fn coupon_template_decodes_from_view_json() {
        let template = parse_coupon_template(&json!({
            "id": "3",
            "creator": "0xc0",
            "name": "Festive",
            "description": "15% off",
            "discount_percent": "15",
            "validity_days": "30",
            "min_tier": 2,
            "active": true
        }))
        .unwrap();
        assert_eq!(template.id, 3);
        assert_eq!(template.min_tier, LoyaltyTier::Gold);
        assert_eq!(template.creator, format!("0x{:0>64}", "c0"));
    }

    #[test]
    fn emi_agreement_decodes_and_treats_zero_due_as_none() {
        let agreement = parse_emi_agreement(&json!({
            "id": "9",
            "company": "0xc0",
            "user": "0xa1",
            "monthly_amount": "25000000",
            "total_months": "6",
            "months_paid": "2",
            "next_due_secs": "0",
            "description": "Phone",
            "active": true
        }))
        .unwrap();
        assert_eq!(agreement.total_months, 6);
        assert_eq!(agreement.months_paid, 2);
        assert!(agreement.next_due.is_none());
        assert!((agreement.progress_percent() - 33.333).abs() < 0.01);
    }

    #[test]
    fn unknown_tier_level_is_rejected() {
        let result = parse_coupon_template(&json!({
            "id": "1",
            "creator": "0x1",
            "name": "x",
            "description": "y",
            "discount_percent": "5",
            "validity_days": "1",
            "min_tier": 9,
            "active": true
        }));
        assert!(result.is_err());
    }
}
