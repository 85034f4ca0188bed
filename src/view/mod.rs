pub mod balance_view;
pub mod company_view;
pub mod history_view;
pub mod rewards_view;
pub mod send_view;
pub mod split_view;
pub mod wallet_view;
