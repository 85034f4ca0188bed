use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_NODE_URL: &str = "https://fullnode.testnet.aptoslabs.com/v1";
pub const DEFAULT_EXPLORER_URL: &str = "https://explorer.aptoslabs.com";

/// Where session balances come from
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BalanceMode {
    /// Always query the chain
    #[default]
    Live,
    /// Report `demo_balance_octas` for every account, no chain queries
    Demo,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Postgres connection string; an in-memory store is used when absent
    #[serde(default)]
    pub database_url: Option<String>,

    /// Aptos fullnode REST endpoint (including the `/v1` suffix)
    pub aptos_node_url: String,

    /// Explorer base URL used for transaction links
    pub aptos_explorer_url: String,

    /// Network name passed to the explorer
    pub aptos_network: String,

    /// Account the super wallet Move modules are published under
    pub contract_address: String,

    pub balance_mode: BalanceMode,

    pub demo_balance_octas: u64,

    /// Upper bound for a single registry lookup
    pub resolve_timeout_ms: u64,

    pub pending_poll_interval_secs: u64,

    pub max_gas_amount: u64,

    pub gas_unit_price: u64,

    pub tx_expiration_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            aptos_node_url: DEFAULT_NODE_URL.to_string(),
            aptos_explorer_url: DEFAULT_EXPLORER_URL.to_string(),
            aptos_network: "testnet".to_string(),
            contract_address: "0x1".to_string(),
            balance_mode: BalanceMode::Live,
            demo_balance_octas: 100_000_000,
            resolve_timeout_ms: 5_000,
            pending_poll_interval_secs: 15,
            max_gas_amount: 200_000,
            gas_unit_price: 100,
            tx_expiration_secs: 600,
        }
    }
}

impl AppConfig {
    /// Builds the configuration from defaults, an optional `cryptal.toml` and
    /// environment variables (`APTOS_NODE_URL`, `BALANCE_MODE`, ...)
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let settings = config::Config::builder()
            .set_default("aptos_node_url", defaults.aptos_node_url)?
            .set_default("aptos_explorer_url", defaults.aptos_explorer_url)?
            .set_default("aptos_network", defaults.aptos_network)?
            .set_default("contract_address", defaults.contract_address)?
            .set_default("balance_mode", "live")?
            .set_default("demo_balance_octas", defaults.demo_balance_octas as i64)?
            .set_default("resolve_timeout_ms", defaults.resolve_timeout_ms as i64)?
            .set_default(
                "pending_poll_interval_secs",
                defaults.pending_poll_interval_secs as i64,
            )?
            .set_default("max_gas_amount", defaults.max_gas_amount as i64)?
            .set_default("gas_unit_price", defaults.gas_unit_price as i64)?
            .set_default("tx_expiration_secs", defaults.tx_expiration_secs as i64)?
            .add_source(config::File::with_name("cryptal").required(false))
            .add_source(config::Environment::default())
            .build()
            .context("Failed to load configuration")?;

        settings
            .try_deserialize::<AppConfig>()
            .context("Invalid configuration")
    }

    /// Explorer link for a transaction hash
    pub fn explorer_tx_url(&self, hash: &str) -> String {
        format!(
            "{}/txn/{}?network={}",
            self.aptos_explorer_url.trim_end_matches('/'),
            hash,
            self.aptos_network
        )
    }

    /// Fully qualified function id for a module published at `contract_address`
    pub fn contract_function(&self, module: &str, function: &str) -> String {
        format!("{}::{}::{}", self.contract_address, module, function)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explorer_link_includes_network() {
        let config = AppConfig::default();
        assert_eq!(
            config.explorer_tx_url("0xabc"),
            "https://explorer.aptoslabs.com/txn/0xabc?network=testnet"
        );
    }

    #[test]
    fn contract_function_is_fully_qualified() {
        let config = AppConfig {
            contract_address: "0xcafe".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(
            config.contract_function("emi", "get_emi_agreement"),
            "0xcafe::emi::get_emi_agreement"
        );
    }
}
