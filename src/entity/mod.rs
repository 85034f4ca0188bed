mod account;
mod bot_error;
mod coupon;
mod emi;
mod loyalty;
mod recipient;
mod state;
mod transaction;

pub use account::{AccountSummary, StoredWallet, WalletAccount};
pub use bot_error::BotError;
pub use coupon::{CouponTemplate, OfferNft};
pub use emi::{emi_progress_percent, progress_bar, EmiAgreement};
pub use loyalty::{LoyaltyStatus, LoyaltyTier};
pub use recipient::{RecipientKind, RecipientQuery, Resolution};
pub use state::State;
pub use transaction::{TransactionRecord, TransactionStatus, TransactionType};
