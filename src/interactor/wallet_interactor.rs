use crate::aptos::{self, SuperWalletContract};
use crate::entity::{AccountSummary, BotError, RecipientQuery, StoredWallet, WalletAccount};
use crate::interactor::session::{SessionManager, WalletSession};
use crate::storage::keys::account_index_key;
use crate::storage::KeyValueStore;
use anyhow::Result;
use async_trait::async_trait;
use bip39::Mnemonic;
use log::info;
use std::sync::Arc;

#[async_trait]
pub trait WalletInteractor: Send + Sync {
    /// Returns the mnemonic and the first account
    async fn create_wallet(&self, owner: i64) -> Result<(String, AccountSummary)>;
    async fn import_wallet(&self, owner: i64, phrase: &str) -> Result<AccountSummary>;
    async fn add_account(&self, owner: i64) -> Result<AccountSummary>;
    async fn list_accounts(&self, owner: i64) -> Result<Option<(Vec<AccountSummary>, usize)>>;
    async fn get_wallet_info(&self, owner: i64) -> Result<Option<AccountSummary>>;
    async fn register_wallet_id(&self, owner: i64, wallet_id: &str) -> Result<String>;
    async fn get_wallet_id(&self, owner: i64) -> Result<Option<String>>;
    async fn connect(&self, owner: i64) -> Result<WalletSession>;
    async fn disconnect(&self, owner: i64) -> Result<WalletSession>;
    async fn switch_account(&self, owner: i64, index: usize) -> Result<WalletSession>;
}

pub struct WalletInteractorImpl {
    store: Arc<dyn KeyValueStore>,
    sessions: Arc<SessionManager>,
    contract: Arc<SuperWalletContract>,
}

impl WalletInteractorImpl {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        sessions: Arc<SessionManager>,
        contract: Arc<SuperWalletContract>,
    ) -> Self {
        Self {
            store,
            sessions,
            contract,
        }
    }

    /// Remembers which public key owns `account.address`, so transfers between
    /// bot users can be recorded on the receiving side too
    async fn index_account(&self, account: &WalletAccount) -> Result<()> {
        self.store
            .set(&account_index_key(&account.address), &account.public_key)
            .await?;
        Ok(())
    }

    async fn store_new_wallet(&self, owner: i64, mnemonic: &Mnemonic) -> Result<WalletAccount> {
        let account = aptos::derive_account(mnemonic, 0)?;
        let wallet = StoredWallet {
            mnemonic: mnemonic.to_string(),
            accounts: vec![account.clone()],
            current_index: 0,
        };

        self.sessions.save_wallet(owner, &wallet).await?;
        self.index_account(&account).await?;
        self.sessions.init(owner).await?;
        Ok(account)
    }
}

#[async_trait]
impl WalletInteractor for WalletInteractorImpl {
    async fn create_wallet(&self, owner: i64) -> Result<(String, AccountSummary)> {
        if self.sessions.load_wallet(owner).await?.is_some() {
            return Err(BotError::WalletAlreadyExists.into());
        }

        let mnemonic = aptos::generate_mnemonic()?;
        let account = self.store_new_wallet(owner, &mnemonic).await?;
        info!("Created wallet {} for owner {}", account.address, owner);

        Ok((mnemonic.to_string(), account.summary()))
    }

    async fn import_wallet(&self, owner: i64, phrase: &str) -> Result<AccountSummary> {
        if self.sessions.load_wallet(owner).await?.is_some() {
            return Err(BotError::WalletAlreadyExists.into());
        }

        let mnemonic = aptos::parse_mnemonic(phrase)?;
        let account = self.store_new_wallet(owner, &mnemonic).await?;
        info!("Imported wallet {} for owner {}", account.address, owner);

        Ok(account.summary())
    }

    async fn add_account(&self, owner: i64) -> Result<AccountSummary> {
        let mut wallet = self
            .sessions
            .load_wallet(owner)
            .await?
            .ok_or(BotError::WalletNotFound)?;

        let mnemonic = aptos::parse_mnemonic(&wallet.mnemonic)?;
        let account = aptos::derive_account(&mnemonic, wallet.next_derivation_index())?;

        wallet.accounts.push(account.clone());
        self.sessions.save_wallet(owner, &wallet).await?;
        self.index_account(&account).await?;
        info!(
            "Derived account {} ({}) for owner {}",
            account.derivation_index, account.address, owner
        );

        Ok(account.summary())
    }

    async fn list_accounts(&self, owner: i64) -> Result<Option<(Vec<AccountSummary>, usize)>> {
        Ok(self.sessions.load_wallet(owner).await?.map(|wallet| {
            (
                wallet.accounts.iter().map(WalletAccount::summary).collect(),
                wallet.current_index,
            )
        }))
    }

    async fn get_wallet_info(&self, owner: i64) -> Result<Option<AccountSummary>> {
        Ok(self
            .sessions
            .load_wallet(owner)
            .await?
            .and_then(|wallet| wallet.current_account().map(WalletAccount::summary)))
    }

    async fn register_wallet_id(&self, owner: i64, wallet_id: &str) -> Result<String> {
        let wallet_id = match RecipientQuery::parse(wallet_id)? {
            RecipientQuery::WalletId(id) => id,
            _ => return Err(BotError::InvalidWalletId(wallet_id.to_string()).into()),
        };

        let account = self.sessions.active_account(owner).await?;
        self.contract.register_wallet_id(&account, &wallet_id).await
    }

    async fn get_wallet_id(&self, owner: i64) -> Result<Option<String>> {
        let account = self.sessions.active_account(owner).await?;
        self.contract.get_wallet_id_by_address(&account.address).await
    }

    async fn connect(&self, owner: i64) -> Result<WalletSession> {
        self.sessions.connect(owner).await
    }

    async fn disconnect(&self, owner: i64) -> Result<WalletSession> {
        Ok(self.sessions.disconnect(owner).await)
    }

    async fn switch_account(&self, owner: i64, index: usize) -> Result<WalletSession> {
        self.sessions.switch_account(owner, index).await
    }
}
