pub mod balance_interactor;
pub mod company_interactor;
pub mod history_interactor;
pub mod resolver;
pub mod rewards_interactor;
pub mod send_interactor;
pub mod session;
pub mod split_interactor;
pub mod wallet_interactor;

pub use resolver::{RecipientResolver, RegistryLookup};
pub use session::{ConnectionStatus, SessionManager, WalletSession};
