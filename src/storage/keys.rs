// Storage key layout

pub fn wallet_key(owner: i64) -> String {
    format!("cryptal_wallet_{}", owner)
}

pub const TRANSACTIONS_PREFIX: &str = "transactions_";

pub fn transactions_key(public_key: &str) -> String {
    format!("{}{}", TRANSACTIONS_PREFIX, public_key)
}

pub fn offer_nfts_key(address: &str) -> String {
    format!("offer_nfts_{}", address)
}

pub fn company_emi_key(address: &str) -> String {
    format!("company_emi_{}", address)
}

pub fn company_coupons_key(address: &str) -> String {
    format!("company_coupons_{}", address)
}

pub fn emi_agreements_key(address: &str) -> String {
    format!("emi_agreements_{}", address)
}

/// Maps an address to the public key of a wallet managed by this bot
pub fn account_index_key(address: &str) -> String {
    format!("account_index_{}", address)
}
