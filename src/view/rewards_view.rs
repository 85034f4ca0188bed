use crate::aptos::{octas_to_apt, shorten_address};
use crate::entity::{progress_bar, EmiAgreement, LoyaltyStatus, OfferNft};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use teloxide::{prelude::*, types::ParseMode, utils::html, Bot};

#[async_trait]
pub trait RewardsView: Send + Sync {
    async fn display_emi_agreements(&self, agreements: &[EmiAgreement]) -> Result<()>;
    async fn display_offer_nfts(&self, offers: &[OfferNft], now: DateTime<Utc>) -> Result<()>;
    async fn display_loyalty_status(&self, status: &LoyaltyStatus) -> Result<()>;
    async fn display_no_wallet(&self) -> Result<()>;
    async fn display_error(&self, error_message: String) -> Result<()>;
}

pub struct TelegramRewardsView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramRewardsView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    async fn send_html(&self, text: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }
}

pub fn format_emi(agreement: &EmiAgreement) -> String {
    let percent = agreement.progress_percent();
    let state = if agreement.is_completed() {
        "completed".to_string()
    } else if !agreement.active {
        "inactive".to_string()
    } else {
        match agreement.next_due {
            Some(due) => format!("next due {}", due.format("%Y-%m-%d")),
            None => "due now".to_string(),
        }
    };

    format!(
        "<b>#{} {}</b>\n{} {:.0}%\n{}/{} months · {} APT/month · {} APT left\nFrom <code>{}</code> · {}",
        agreement.id,
        html::escape(&agreement.description),
        progress_bar(percent, 10),
        percent,
        agreement.months_paid,
        agreement.total_months,
        octas_to_apt(agreement.monthly_amount),
        octas_to_apt(agreement.remaining_amount()),
        shorten_address(&agreement.company),
        state
    )
}

#[async_trait]
impl RewardsView for TelegramRewardsView {
    async fn display_emi_agreements(&self, agreements: &[EmiAgreement]) -> Result<()> {
        if agreements.is_empty() {
            return self
                .send_html("You have no EMI agreements.".to_string())
                .await;
        }

        let body = agreements
            .iter()
            .map(format_emi)
            .collect::<Vec<_>>()
            .join("\n\n");
        self.send_html(format!("<b>Your EMI agreements</b>\n\n{}", body))
            .await
    }

    async fn display_offer_nfts(&self, offers: &[OfferNft], now: DateTime<Utc>) -> Result<()> {
        if offers.is_empty() {
            return self
                .send_html("You have no coupons yet. Companies send them to loyal customers.".to_string())
                .await;
        }

        let mut text = "<b>Your coupons</b>\n\n".to_string();
        for offer in offers {
            let validity = if offer.is_expired(now) {
                "expired".to_string()
            } else {
                format!("valid until {}", offer.expires_at.format("%Y-%m-%d"))
            };
            text.push_str(&format!(
                "🎟 <b>{}</b> · {}% off\nfrom <code>{}</code> · {}\n\n",
                html::escape(&offer.name),
                offer.discount_percent,
                shorten_address(&offer.issued_by),
                validity
            ));
        }

        self.send_html(text).await
    }

    async fn display_loyalty_status(&self, status: &LoyaltyStatus) -> Result<()> {
        let next = match status.next_tier {
            Some(next) => format!(
                "{} more transactions to reach {} {}",
                status.transactions_to_next,
                next.emoji(),
                next
            ),
            None => "You are at the highest tier.".to_string(),
        };

        self.send_html(format!(
            "<b>Loyalty tier:</b> {} {}\n\nTransactions: {}\nVolume: {} APT\n\n{}",
            status.tier.emoji(),
            status.tier,
            status.transaction_count,
            octas_to_apt(status.total_volume),
            next
        ))
        .await
    }

    async fn display_no_wallet(&self) -> Result<()> {
        self.bot
            .send_message(
                self.chat_id,
                "You don't have a wallet yet. Use /create_wallet to create a new wallet.",
            )
            .await?;
        Ok(())
    }

    async fn display_error(&self, error_message: String) -> Result<()> {
        self.bot
            .send_message(self.chat_id, format!("Error: {}", error_message))
            .await?;
        Ok(())
    }
}
