pub mod aptos;
pub mod commands;
pub mod config;
pub mod di;
pub mod entity;
pub mod export;
pub mod interactor;
pub mod invoice;
pub mod presenter;
pub mod qrcodeutils;
pub mod router;
pub mod services;
pub mod storage;
pub mod view;

use std::sync::Arc;
use teloxide::{dispatching::dialogue::InMemStorage, Bot};

// Re-export commonly used items
pub use aptos::{create_aptos_client, AptosClient};
pub use commands::{BotCommands, MyDialogue};
pub use config::{AppConfig, BalanceMode};
pub use di::ServiceContainer;
pub use entity::{BotError, State};
pub use router::{Router, TelegramRouter};
pub use services::PendingTransactionMonitor;
pub use storage::{KeyValueStore, MemoryStore, PgKeyValueStore};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wires the bot together: services, dialogue storage, router and the
/// pending transaction monitor (not yet started).
pub fn create_application(
    bot: Bot,
    store: Arc<dyn KeyValueStore>,
    aptos_client: Arc<AptosClient>,
    config: AppConfig,
) -> (
    TelegramRouter,
    Bot,
    Arc<ServiceContainer>,
    Arc<InMemStorage<State>>,
    PendingTransactionMonitor,
) {
    let services = Arc::new(ServiceContainer::new(store, aptos_client, config));
    let storage = InMemStorage::<State>::new();
    let router = TelegramRouter::new(services.clone());
    let monitor = PendingTransactionMonitor::new(services.clone());

    (router, bot, services, storage, monitor)
}
