use crate::aptos::{octas_to_apt, shorten_address};
use crate::entity::{CouponTemplate, EmiAgreement, OfferNft};
use crate::interactor::company_interactor::CompanyDashboard;
use crate::view::rewards_view::format_emi;
use anyhow::Result;
use async_trait::async_trait;
use teloxide::{prelude::*, types::ParseMode, utils::html, Bot};

#[async_trait]
pub trait CompanyView: Send + Sync {
    async fn display_dashboard(&self, dashboard: &CompanyDashboard) -> Result<()>;
    async fn display_usage(&self, usage: &str) -> Result<()>;
    async fn display_processing(&self) -> Result<Option<Message>>;
    async fn display_coupon_created(&self, template_id: u64, message: Option<Message>) -> Result<()>;
    async fn display_coupon_minted(&self, offer: &OfferNft, hash: &str, message: Option<Message>) -> Result<()>;
    async fn display_coupon_deactivated(&self, template_id: u64, hash: &str, message: Option<Message>) -> Result<()>;
    async fn display_emi_created(&self, agreement_id: u64, user: &str, message: Option<Message>) -> Result<()>;
    async fn display_emi_collected(&self, agreement: &EmiAgreement, hash: &str, message: Option<Message>) -> Result<()>;
    async fn display_error(&self, error_message: String, message: Option<Message>) -> Result<()>;
}

pub struct TelegramCompanyView {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramCompanyView {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    async fn send_or_edit(&self, text: String, message: Option<Message>) -> Result<()> {
        if let Some(msg) = message {
            self.bot
                .edit_message_text(self.chat_id, msg.id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        } else {
            self.bot
                .send_message(self.chat_id, text)
                .parse_mode(ParseMode::Html)
                .await?;
        }
        Ok(())
    }
}

fn format_coupon(template: &CouponTemplate) -> String {
    format!(
        "🎟 <b>#{} {}</b> · {}% off · {} days · min tier {}{}",
        template.id,
        html::escape(&template.name),
        template.discount_percent,
        template.validity_days,
        template.min_tier,
        if template.active { "" } else { " · inactive" }
    )
}

#[async_trait]
impl CompanyView for TelegramCompanyView {
    async fn display_dashboard(&self, dashboard: &CompanyDashboard) -> Result<()> {
        let mut text = "<b>Company dashboard</b>\n\n<b>Coupon templates</b>\n".to_string();
        if dashboard.coupons.is_empty() {
            text.push_str("None yet. Create one with /new_coupon\n");
        }
        for coupon in &dashboard.coupons {
            text.push_str(&format_coupon(coupon));
            text.push('\n');
        }

        text.push_str("\n<b>EMI agreements</b>\n");
        if dashboard.agreements.is_empty() {
            text.push_str("None yet. Create one with /new_emi\n");
        }
        for agreement in &dashboard.agreements {
            text.push_str(&format_emi(agreement));
            text.push_str(&format!(
                "\nCustomer <code>{}</code>\n\n",
                shorten_address(&agreement.user)
            ));
        }

        let expected: u64 = dashboard
            .agreements
            .iter()
            .filter(|agreement| agreement.active)
            .map(EmiAgreement::remaining_amount)
            .sum();
        text.push_str(&format!(
            "\nOutstanding EMI: <b>{} APT</b>",
            octas_to_apt(expected)
        ));

        self.send_or_edit(text, None).await
    }

    async fn display_usage(&self, usage: &str) -> Result<()> {
        self.bot.send_message(self.chat_id, usage).await?;
        Ok(())
    }

    async fn display_processing(&self) -> Result<Option<Message>> {
        let message = self
            .bot
            .send_message(self.chat_id, "Submitting transaction... Please wait.")
            .await?;
        Ok(Some(message))
    }

    async fn display_coupon_created(&self, template_id: u64, message: Option<Message>) -> Result<()> {
        self.send_or_edit(
            format!(
                "✅ Coupon template <b>#{}</b> created.\nSend it to a customer with /mint_coupon {} <i>recipient</i>",
                template_id, template_id
            ),
            message,
        )
        .await
    }

    async fn display_coupon_minted(&self, offer: &OfferNft, hash: &str, message: Option<Message>) -> Result<()> {
        self.send_or_edit(
            format!(
                "✅ Coupon <b>{}</b> ({}% off) sent. Valid until {}.\nTx: <code>{}</code>",
                html::escape(&offer.name),
                offer.discount_percent,
                offer.expires_at.format("%Y-%m-%d"),
                hash
            ),
            message,
        )
        .await
    }

    async fn display_coupon_deactivated(&self, template_id: u64, hash: &str, message: Option<Message>) -> Result<()> {
        self.send_or_edit(
            format!(
                "Coupon template <b>#{}</b> deactivated.\nTx: <code>{}</code>",
                template_id, hash
            ),
            message,
        )
        .await
    }

    async fn display_emi_created(&self, agreement_id: u64, user: &str, message: Option<Message>) -> Result<()> {
        self.send_or_edit(
            format!(
                "✅ EMI agreement <b>#{}</b> created for <code>{}</code>.\nCollect installments with /collect_emi {}",
                agreement_id, user, agreement_id
            ),
            message,
        )
        .await
    }

    async fn display_emi_collected(&self, agreement: &EmiAgreement, hash: &str, message: Option<Message>) -> Result<()> {
        self.send_or_edit(
            format!(
                "✅ Installment collected.\n\n{}\n\nTx: <code>{}</code>",
                format_emi(agreement),
                hash
            ),
            message,
        )
        .await
    }

    async fn display_error(&self, error_message: String, message: Option<Message>) -> Result<()> {
        self.send_or_edit(
            format!("❌ {}", html::escape(&error_message)),
            message,
        )
        .await
    }
}
