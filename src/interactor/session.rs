use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{info, warn};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::aptos::{octas_to_apt, BalanceSource};
use crate::config::BalanceMode;
use crate::entity::{AccountSummary, BotError, StoredWallet, WalletAccount};
use crate::storage::keys::wallet_key;
use crate::storage::{load_json, save_json, KeyValueStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

/// What a chat currently sees of its wallet
#[derive(Debug, Clone, PartialEq)]
pub struct WalletSession {
    pub owner: i64,
    pub status: ConnectionStatus,
    pub account: Option<AccountSummary>,
    pub balance: Option<Decimal>,
    pub refreshed_at: Option<DateTime<Utc>>,
}

impl WalletSession {
    fn disconnected(owner: i64, account: Option<AccountSummary>) -> Self {
        Self {
            owner,
            status: ConnectionStatus::Disconnected,
            account,
            balance: None,
            refreshed_at: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.status == ConnectionStatus::Connected
    }
}

/// Owner of every chat's wallet session.
///
/// Sessions are created by `init` from the stored wallet, changed only through
/// the methods below and dropped by `teardown` at shutdown. `connect` and
/// `disconnect` never touch storage; `switch_account` persists the new index.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    balances: Arc<dyn BalanceSource>,
    mode: BalanceMode,
    demo_balance_octas: u64,
    sessions: RwLock<HashMap<i64, WalletSession>>,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        balances: Arc<dyn BalanceSource>,
        mode: BalanceMode,
        demo_balance_octas: u64,
    ) -> Self {
        Self {
            store,
            balances,
            mode,
            demo_balance_octas,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub async fn load_wallet(&self, owner: i64) -> Result<Option<StoredWallet>> {
        Ok(load_json(self.store.as_ref(), &wallet_key(owner)).await?)
    }

    pub async fn save_wallet(&self, owner: i64, wallet: &StoredWallet) -> Result<()> {
        save_json(self.store.as_ref(), &wallet_key(owner), wallet).await?;
        Ok(())
    }

    /// (Re)initialises the session of `owner` from storage. A stored wallet
    /// starts connected to its current account.
    pub async fn init(&self, owner: i64) -> Result<WalletSession> {
        let wallet = self.load_wallet(owner).await?;

        let session = match wallet.as_ref().and_then(StoredWallet::current_account) {
            Some(account) => WalletSession {
                owner,
                status: ConnectionStatus::Connected,
                account: Some(account.summary()),
                balance: None,
                refreshed_at: None,
            },
            None => WalletSession::disconnected(owner, None),
        };

        self.sessions.write().await.insert(owner, session.clone());
        Ok(session)
    }

    pub async fn current(&self, owner: i64) -> Option<WalletSession> {
        self.sessions.read().await.get(&owner).cloned()
    }

    /// The existing session, or a freshly initialised one
    pub async fn session(&self, owner: i64) -> Result<WalletSession> {
        match self.current(owner).await {
            Some(session) => Ok(session),
            None => self.init(owner).await,
        }
    }

    pub async fn connect(&self, owner: i64) -> Result<WalletSession> {
        let wallet = self.load_wallet(owner).await?.ok_or(BotError::WalletNotFound)?;
        let account = wallet
            .current_account()
            .ok_or(BotError::AccountIndexOutOfRange(wallet.current_index))?;

        let session = WalletSession {
            owner,
            status: ConnectionStatus::Connected,
            account: Some(account.summary()),
            balance: None,
            refreshed_at: None,
        };
        self.sessions.write().await.insert(owner, session.clone());
        info!("Wallet session connected for {}", owner);

        match self.refresh_balance(owner).await {
            Ok(session) => Ok(session),
            Err(e) => {
                warn!("Connected {} without a balance: {}", owner, e);
                Ok(session)
            }
        }
    }

    pub async fn disconnect(&self, owner: i64) -> WalletSession {
        let mut sessions = self.sessions.write().await;
        let account = sessions.get(&owner).and_then(|session| session.account.clone());
        let session = WalletSession::disconnected(owner, account);
        sessions.insert(owner, session.clone());
        info!("Wallet session disconnected for {}", owner);
        session
    }

    /// Makes account `index` current, persists the choice and reconnects
    pub async fn switch_account(&self, owner: i64, index: usize) -> Result<WalletSession> {
        let mut wallet = self.load_wallet(owner).await?.ok_or(BotError::WalletNotFound)?;
        if index >= wallet.accounts.len() {
            return Err(BotError::AccountIndexOutOfRange(index).into());
        }

        wallet.current_index = index;
        self.save_wallet(owner, &wallet).await?;
        info!("Owner {} switched to account {}", owner, index);

        self.connect(owner).await
    }

    pub async fn refresh_balance(&self, owner: i64) -> Result<WalletSession> {
        let session = self.session(owner).await?;
        if !session.is_connected() {
            return Err(BotError::SessionNotConnected.into());
        }
        let account = session.account.clone().ok_or(BotError::WalletNotFound)?;

        let octas = match self.mode {
            BalanceMode::Live => self.balances.get_apt_balance(&account.address).await?,
            BalanceMode::Demo => self.demo_balance_octas,
        };

        let mut sessions = self.sessions.write().await;
        let entry = sessions.entry(owner).or_insert(session);
        entry.balance = Some(octas_to_apt(octas));
        entry.refreshed_at = Some(Utc::now());
        Ok(entry.clone())
    }

    /// The full current account (with its key) of a connected session
    pub async fn active_account(&self, owner: i64) -> Result<WalletAccount> {
        let session = self.session(owner).await?;
        if !session.is_connected() {
            return Err(BotError::SessionNotConnected.into());
        }

        let wallet = self.load_wallet(owner).await?.ok_or(BotError::WalletNotFound)?;
        wallet
            .current_account()
            .cloned()
            .ok_or_else(|| BotError::AccountIndexOutOfRange(wallet.current_index).into())
    }

    /// Drops every session
    pub async fn teardown(&self) {
        let mut sessions = self.sessions.write().await;
        info!("Dropping {} wallet sessions", sessions.len());
        sessions.clear();
    }
}
