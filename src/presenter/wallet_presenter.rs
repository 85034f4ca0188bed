use crate::entity::BotError;
use crate::interactor::wallet_interactor::WalletInteractor;
use crate::presenter::user_error_message;
use crate::view::wallet_view::WalletView;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait WalletPresenter: Send + Sync {
    async fn create_wallet(&self, owner: i64) -> Result<()>;
    async fn start_import(&self) -> Result<()>;
    /// Returns whether the import dialogue is finished
    async fn import_wallet(&self, owner: i64, phrase: &str) -> Result<bool>;
    async fn show_wallet_address(&self, owner: i64) -> Result<()>;
    async fn show_accounts(&self, owner: i64) -> Result<()>;
    async fn add_account(&self, owner: i64) -> Result<()>;
    async fn switch_account(&self, owner: i64, index: usize) -> Result<()>;
    async fn connect(&self, owner: i64) -> Result<()>;
    async fn disconnect(&self, owner: i64) -> Result<()>;
    async fn register_wallet_id(&self, owner: i64, wallet_id: &str) -> Result<()>;
}

pub struct WalletPresenterImpl<I, V> {
    interactor: Arc<I>,
    view: Arc<V>,
}

impl<I, V> WalletPresenterImpl<I, V>
where
    I: WalletInteractor,
    V: WalletView,
{
    pub fn new(interactor: Arc<I>, view: Arc<V>) -> Self {
        Self { interactor, view }
    }

    async fn display_failure(&self, e: anyhow::Error) -> Result<()> {
        match e.downcast_ref::<BotError>() {
            Some(BotError::WalletNotFound) => self.view.display_no_wallet().await,
            Some(BotError::WalletAlreadyExists) => self.view.display_wallet_already_exists().await,
            Some(BotError::SessionNotConnected) => self.view.display_not_connected().await,
            Some(BotError::InvalidMnemonic) => self.view.display_invalid_mnemonic().await,
            _ => self.view.display_error(user_error_message(&e)).await,
        }
    }
}

#[async_trait]
impl<I, V> WalletPresenter for WalletPresenterImpl<I, V>
where
    I: WalletInteractor + Send + Sync,
    V: WalletView + Send + Sync,
{
    async fn create_wallet(&self, owner: i64) -> Result<()> {
        match self.interactor.create_wallet(owner).await {
            Ok((mnemonic, account)) => self.view.display_wallet_created(&account, &mnemonic).await,
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn start_import(&self) -> Result<()> {
        self.view.prompt_for_mnemonic().await
    }

    async fn import_wallet(&self, owner: i64, phrase: &str) -> Result<bool> {
        match self.interactor.import_wallet(owner, phrase).await {
            Ok(account) => {
                self.view.display_wallet_imported(&account).await?;
                Ok(true)
            }
            Err(e) => {
                let retry = matches!(e.downcast_ref::<BotError>(), Some(BotError::InvalidMnemonic));
                self.display_failure(e).await?;
                Ok(!retry)
            }
        }
    }

    async fn show_wallet_address(&self, owner: i64) -> Result<()> {
        match self.interactor.get_wallet_info(owner).await {
            Ok(Some(account)) => {
                // the registry is optional here; a lookup failure just hides the id
                let wallet_id = self.interactor.get_wallet_id(owner).await.unwrap_or(None);
                self.view.display_wallet_address(&account, wallet_id).await
            }
            Ok(None) => self.view.display_no_wallet().await,
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn show_accounts(&self, owner: i64) -> Result<()> {
        match self.interactor.list_accounts(owner).await {
            Ok(Some((accounts, current))) => self.view.display_accounts(&accounts, current).await,
            Ok(None) => self.view.display_no_wallet().await,
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn add_account(&self, owner: i64) -> Result<()> {
        match self.interactor.add_account(owner).await {
            Ok(account) => self.view.display_account_added(&account).await,
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn switch_account(&self, owner: i64, index: usize) -> Result<()> {
        match self.interactor.switch_account(owner, index).await {
            Ok(session) => self.view.display_session(&session).await,
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn connect(&self, owner: i64) -> Result<()> {
        match self.interactor.connect(owner).await {
            Ok(session) => self.view.display_session(&session).await,
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn disconnect(&self, owner: i64) -> Result<()> {
        match self.interactor.disconnect(owner).await {
            Ok(session) => self.view.display_session(&session).await,
            Err(e) => self.display_failure(e).await,
        }
    }

    async fn register_wallet_id(&self, owner: i64, wallet_id: &str) -> Result<()> {
        match self.interactor.register_wallet_id(owner, wallet_id).await {
            Ok(hash) => {
                self.view
                    .display_wallet_id_registered(&wallet_id.trim().to_lowercase(), &hash)
                    .await
            }
            Err(e) => self.display_failure(e).await,
        }
    }
}
