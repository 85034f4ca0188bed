use crate::entity::TransactionStatus;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Aptos client error: {0}")]
    AptosClient(String),

    #[error("Contract call failed: {0}")]
    Contract(String),

    #[error("Telegram API error: {0}")]
    TelegramApi(#[from] teloxide::RequestError),

    #[error("Wallet not found")]
    WalletNotFound,

    #[error("Wallet already exists")]
    WalletAlreadyExists,

    #[error("Wallet is not connected")]
    SessionNotConnected,

    #[error("Account index {0} does not exist")]
    AccountIndexOutOfRange(usize),

    #[error("Invalid mnemonic phrase")]
    InvalidMnemonic,

    #[error("Invalid address")]
    InvalidAddress,

    #[error("Invalid wallet id: {0}")]
    InvalidWalletId(String),

    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Invalid amount")]
    InvalidAmount,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Insufficient funds")]
    InsufficientFunds,

    #[error("Transaction {0} not found")]
    TransactionNotFound(String),

    #[error("Cannot move transaction {hash} from {from} to {to}")]
    InvalidStatusTransition {
        hash: String,
        from: TransactionStatus,
        to: TransactionStatus,
    },

    #[error("Failed to create wallet: {0}")]
    WalletCreationError(String),
}
