use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cryptal_wallet_bot::aptos::{create_aptos_client, BalanceSource, SuperWalletContract};
use cryptal_wallet_bot::config::{AppConfig, BalanceMode};
use cryptal_wallet_bot::entity::BotError;
use cryptal_wallet_bot::interactor::wallet_interactor::{WalletInteractor, WalletInteractorImpl};
use cryptal_wallet_bot::interactor::{ConnectionStatus, SessionManager};
use cryptal_wallet_bot::storage::keys::account_index_key;
use cryptal_wallet_bot::storage::{KeyValueStore, MemoryStore};
use rust_decimal::Decimal;
use std::sync::Arc;

const OWNER: i64 = 4242;
const PHRASE: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

/// Reports the same balance for every address, or fails
struct FixedBalance(Option<u64>);

#[async_trait]
impl BalanceSource for FixedBalance {
    async fn get_apt_balance(&self, _address: &str) -> Result<u64> {
        self.0.ok_or_else(|| anyhow!("node unreachable"))
    }
}

struct Fixture {
    store: Arc<MemoryStore>,
    sessions: Arc<SessionManager>,
    wallets: WalletInteractorImpl,
}

fn fixture(mode: BalanceMode, balance: Option<u64>) -> Fixture {
    let config = AppConfig {
        // nothing listens here; wallet handling never reaches the node
        aptos_node_url: "http://127.0.0.1:9/v1".to_string(),
        balance_mode: mode,
        demo_balance_octas: 250_000_000,
        ..AppConfig::default()
    };
    let store = Arc::new(MemoryStore::new());
    let sessions = Arc::new(SessionManager::new(
        store.clone(),
        Arc::new(FixedBalance(balance)),
        config.balance_mode,
        config.demo_balance_octas,
    ));
    let client = create_aptos_client(&config).unwrap();
    let contract = Arc::new(SuperWalletContract::new(client, config));
    let wallets = WalletInteractorImpl::new(store.clone(), sessions.clone(), contract);

    Fixture {
        store,
        sessions,
        wallets,
    }
}

#[tokio::test]
async fn created_wallet_starts_a_connected_session() {
    let f = fixture(BalanceMode::Live, Some(150_000_000));

    let (mnemonic, account) = f.wallets.create_wallet(OWNER).await.unwrap();

    assert_eq!(mnemonic.split_whitespace().count(), 12);
    assert_eq!(account.derivation_index, 0);
    let session = f.sessions.session(OWNER).await.unwrap();
    assert_eq!(session.status, ConnectionStatus::Connected);
    assert_eq!(session.account, Some(account.clone()));

    let indexed = f.store.get(&account_index_key(&account.address)).await.unwrap();
    assert_eq!(indexed, Some(account.public_key));
}

#[tokio::test]
async fn second_wallet_for_the_same_chat_is_refused() {
    let f = fixture(BalanceMode::Live, Some(0));
    f.wallets.create_wallet(OWNER).await.unwrap();

    let err = f.wallets.import_wallet(OWNER, PHRASE).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<BotError>(),
        Some(BotError::WalletAlreadyExists)
    ));
}

#[tokio::test]
async fn import_is_deterministic_and_rejects_bad_phrases() {
    let first = fixture(BalanceMode::Live, Some(0));
    let second = fixture(BalanceMode::Live, Some(0));

    let a = first.wallets.import_wallet(OWNER, PHRASE).await.unwrap();
    let b = second
        .wallets
        .import_wallet(OWNER, &PHRASE.to_uppercase())
        .await
        .unwrap();
    assert_eq!(a, b);

    let third = fixture(BalanceMode::Live, Some(0));
    let err = third
        .wallets
        .import_wallet(OWNER, "not a real recovery phrase")
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BotError>(),
        Some(BotError::InvalidMnemonic)
    ));
}

#[tokio::test]
async fn accounts_can_be_added_and_switched() {
    let f = fixture(BalanceMode::Live, Some(0));
    let (_, first) = f.wallets.create_wallet(OWNER).await.unwrap();

    let second = f.wallets.add_account(OWNER).await.unwrap();
    assert_eq!(second.derivation_index, 1);
    assert_ne!(second.address, first.address);

    let session = f.wallets.switch_account(OWNER, 1).await.unwrap();
    assert_eq!(session.account, Some(second.clone()));

    let (accounts, current) = f.wallets.list_accounts(OWNER).await.unwrap().unwrap();
    assert_eq!(accounts.len(), 2);
    assert_eq!(current, 1);

    let err = f.wallets.switch_account(OWNER, 7).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BotError>(),
        Some(BotError::AccountIndexOutOfRange(7))
    ));
}

#[tokio::test]
async fn balance_follows_the_configured_mode() {
    let live = fixture(BalanceMode::Live, Some(150_000_000));
    live.wallets.create_wallet(OWNER).await.unwrap();
    let session = live.sessions.refresh_balance(OWNER).await.unwrap();
    assert_eq!(session.balance, Some(Decimal::new(15, 1)));

    let demo = fixture(BalanceMode::Demo, None);
    demo.wallets.create_wallet(OWNER).await.unwrap();
    let session = demo.sessions.refresh_balance(OWNER).await.unwrap();
    assert_eq!(session.balance, Some(Decimal::new(25, 1)));
}

#[tokio::test]
async fn disconnected_sessions_have_no_balance() {
    let f = fixture(BalanceMode::Live, Some(100));
    f.wallets.create_wallet(OWNER).await.unwrap();

    let session = f.wallets.disconnect(OWNER).await.unwrap();
    assert!(!session.is_connected());

    let err = f.sessions.refresh_balance(OWNER).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BotError>(),
        Some(BotError::SessionNotConnected)
    ));

    // a failing node does not block reconnecting
    let offline = fixture(BalanceMode::Live, None);
    offline.wallets.create_wallet(OWNER).await.unwrap();
    offline.wallets.disconnect(OWNER).await.unwrap();
    let session = offline.wallets.connect(OWNER).await.unwrap();
    assert!(session.is_connected());
    assert_eq!(session.balance, None);
}

#[tokio::test]
async fn missing_wallet_is_reported() {
    let f = fixture(BalanceMode::Live, Some(0));

    assert!(f.wallets.get_wallet_info(OWNER).await.unwrap().is_none());
    let err = f.wallets.add_account(OWNER).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<BotError>(),
        Some(BotError::WalletNotFound)
    ));

    f.sessions.teardown().await;
    assert!(f.sessions.current(OWNER).await.is_none());
}
