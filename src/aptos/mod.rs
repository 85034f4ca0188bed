// Re-export everything from submodules
pub mod client;
pub mod contract;
pub mod models;
pub mod utils;
pub mod wallet;

// Re-export commonly used items
pub use client::{create_aptos_client, AptosClient, BalanceSource};
pub use contract::SuperWalletContract;
pub use utils::{apt_to_octas, normalize_address, octas_to_apt, shorten_address};
pub use wallet::{derive_account, generate_mnemonic, parse_mnemonic};
