use std::sync::Arc;
use std::time::Duration;

use crate::aptos::{AptosClient, BalanceSource, SuperWalletContract};
use crate::config::AppConfig;
use crate::interactor::resolver::{RecipientResolver, RegistryLookup};
use crate::interactor::session::SessionManager;
use crate::storage::{KeyValueStore, TransactionStore};

/// ServiceContainer provides access to core application dependencies
pub struct ServiceContainer {
    // Core services
    store: Arc<dyn KeyValueStore>,
    aptos_client: Arc<AptosClient>,
    contract: Arc<SuperWalletContract>,

    // Shared state
    transactions: Arc<TransactionStore>,
    sessions: Arc<SessionManager>,
    resolver: Arc<RecipientResolver>,

    // Configuration
    config: AppConfig,
}

impl ServiceContainer {
    /// Create a new service container with essential dependencies
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        aptos_client: Arc<AptosClient>,
        config: AppConfig,
    ) -> Self {
        let contract = Arc::new(SuperWalletContract::new(
            aptos_client.clone(),
            config.clone(),
        ));

        let transactions = Arc::new(TransactionStore::new(store.clone()));

        let sessions = Arc::new(SessionManager::new(
            store.clone(),
            aptos_client.clone() as Arc<dyn BalanceSource>,
            config.balance_mode,
            config.demo_balance_octas,
        ));

        let resolver = Arc::new(RecipientResolver::new(
            contract.clone() as Arc<dyn RegistryLookup>,
            Duration::from_millis(config.resolve_timeout_ms),
        ));

        Self {
            store,
            aptos_client,
            contract,
            transactions,
            sessions,
            resolver,
            config,
        }
    }

    // Accessor methods

    pub fn store(&self) -> Arc<dyn KeyValueStore> {
        self.store.clone()
    }

    pub fn aptos_client(&self) -> Arc<AptosClient> {
        self.aptos_client.clone()
    }

    pub fn contract(&self) -> Arc<SuperWalletContract> {
        self.contract.clone()
    }

    pub fn transactions(&self) -> Arc<TransactionStore> {
        self.transactions.clone()
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        self.sessions.clone()
    }

    pub fn resolver(&self) -> Arc<RecipientResolver> {
        self.resolver.clone()
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
