use crate::aptos::shorten_address;
use crate::entity::AccountSummary;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

pub fn main_menu_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("💸 Send", "send"),
            InlineKeyboardButton::callback("🧾 Split", "split"),
            InlineKeyboardButton::callback("📜 History", "history"),
        ],
        vec![
            InlineKeyboardButton::callback("View Address", "address"),
            InlineKeyboardButton::callback("Accounts", "accounts"),
            InlineKeyboardButton::callback("⬇️ Export", "export"),
        ],
        vec![
            InlineKeyboardButton::callback("EMI", "emi"),
            InlineKeyboardButton::callback("Coupons", "coupons"),
            InlineKeyboardButton::callback("Tier", "tier"),
        ],
        vec![
            InlineKeyboardButton::callback("Help", "help"),
            InlineKeyboardButton::callback("Company", "company"),
            InlineKeyboardButton::callback("🔄 Refresh", "refresh"),
        ],
    ])
}

pub fn no_wallet_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("Create wallet", "create_wallet"),
        InlineKeyboardButton::callback("Import wallet", "import_wallet"),
    ]])
}

pub fn connect_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        "🟢 Connect",
        "connect",
    )]])
}

pub fn confirmation_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        InlineKeyboardButton::callback("✅ Yes", "confirm_yes"),
        InlineKeyboardButton::callback("✖️ No", "confirm_no"),
    ]])
}

pub fn history_filter_keyboard() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![
        vec![
            InlineKeyboardButton::callback("All", "history_all"),
            InlineKeyboardButton::callback("Sent", "history_sent"),
            InlineKeyboardButton::callback("Received", "history_received"),
        ],
        vec![
            InlineKeyboardButton::callback("Pending", "history_pending"),
            InlineKeyboardButton::callback("Failed", "history_failed"),
            InlineKeyboardButton::callback("⬇️ CSV", "export"),
        ],
    ])
}

pub fn accounts_keyboard(accounts: &[AccountSummary], current: usize) -> InlineKeyboardMarkup {
    let mut rows: Vec<Vec<InlineKeyboardButton>> = accounts
        .iter()
        .enumerate()
        .map(|(i, account)| {
            let label = if i == current {
                format!("👉 #{} {}", account.derivation_index, shorten_address(&account.address))
            } else {
                format!("#{} {}", account.derivation_index, shorten_address(&account.address))
            };
            vec![InlineKeyboardButton::callback(label, format!("switch_{}", i))]
        })
        .collect();

    rows.push(vec![
        InlineKeyboardButton::callback("➕ Add account", "add_account"),
        InlineKeyboardButton::callback("🔴 Disconnect", "disconnect"),
    ]);

    InlineKeyboardMarkup::new(rows)
}
