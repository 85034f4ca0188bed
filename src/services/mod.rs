pub mod pending_tx_service;

pub use pending_tx_service::PendingTransactionMonitor;
