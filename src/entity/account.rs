use serde::{Deserialize, Serialize};

/// A derived account. The private key is kept as hex next to the rest of the
/// wallet data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WalletAccount {
    pub address: String,
    pub public_key: String,
    pub private_key: String,
    pub derivation_index: u32,
}

impl WalletAccount {
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            address: self.address.clone(),
            public_key: self.public_key.clone(),
            derivation_index: self.derivation_index,
        }
    }
}

/// The public part of an account, safe to hand to views and sessions
#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub address: String,
    pub public_key: String,
    pub derivation_index: u32,
}

/// Everything stored under `cryptal_wallet_<owner>`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredWallet {
    pub mnemonic: String,
    pub accounts: Vec<WalletAccount>,
    pub current_index: usize,
}

impl StoredWallet {
    pub fn current_account(&self) -> Option<&WalletAccount> {
        self.accounts.get(self.current_index)
    }

    pub fn next_derivation_index(&self) -> u32 {
        self.accounts
            .iter()
            .map(|account| account.derivation_index + 1)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(index: u32) -> WalletAccount {
        WalletAccount {
            address: format!("0x{:064x}", index + 1),
            public_key: format!("0x{:064x}", index + 100),
            private_key: format!("0x{:064x}", index + 200),
            derivation_index: index,
        }
    }

    #[test]
    fn current_account_follows_index() {
        let wallet = StoredWallet {
            mnemonic: "test".to_string(),
            accounts: vec![account(0), account(1)],
            current_index: 1,
        };
        assert_eq!(wallet.current_account().unwrap().derivation_index, 1);
        assert_eq!(wallet.next_derivation_index(), 2);
    }

    #[test]
    fn out_of_range_index_has_no_account() {
        let wallet = StoredWallet {
            mnemonic: "test".to_string(),
            accounts: vec![],
            current_index: 3,
        };
        assert!(wallet.current_account().is_none());
        assert_eq!(wallet.next_derivation_index(), 0);
    }
}
