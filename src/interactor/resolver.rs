use anyhow::Result;
use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, error};
use std::sync::Arc;
use std::time::Duration;

use crate::entity::{BotError, RecipientQuery, Resolution};

/// On-chain registry of human-readable ids
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn address_by_wallet_id(&self, wallet_id: &str) -> Result<Option<String>>;
    async fn address_by_upi_id(&self, upi_id: &str) -> Result<Option<String>>;
}

/// Turns whatever the user typed into a canonical address
pub struct RecipientResolver {
    registry: Arc<dyn RegistryLookup>,
    lookup_timeout: Duration,
}

impl RecipientResolver {
    pub fn new(registry: Arc<dyn RegistryLookup>, lookup_timeout: Duration) -> Self {
        Self {
            registry,
            lookup_timeout,
        }
    }

    /// Classifies and resolves `input`. Only a malformed input is an error;
    /// unknown ids and failed lookups come back as `Resolution` variants.
    pub async fn resolve(&self, input: &str) -> Result<Resolution, BotError> {
        let query = RecipientQuery::parse(input)?;
        Ok(self.resolve_query(&query).await)
    }

    pub async fn resolve_query(&self, query: &RecipientQuery) -> Resolution {
        let kind = query.kind();

        let lookup = match query {
            RecipientQuery::Address(address) => {
                return Resolution::Found {
                    address: address.clone(),
                    kind,
                }
            }
            RecipientQuery::WalletId(wallet_id) => self.registry.address_by_wallet_id(wallet_id),
            RecipientQuery::UpiId(upi_id) => self.registry.address_by_upi_id(upi_id),
        };

        match tokio::time::timeout(self.lookup_timeout, lookup).await {
            Ok(Ok(Some(address))) => {
                debug!("Resolved {} {} to {}", kind, query.value(), address);
                Resolution::Found { address, kind }
            }
            Ok(Ok(None)) => Resolution::NotFound { kind },
            Ok(Err(e)) => {
                error!("Failed to resolve {} {}: {}", kind, query.value(), e);
                Resolution::LookupError {
                    kind,
                    reason: e.to_string(),
                }
            }
            Err(_) => {
                error!("Resolving {} {} timed out", kind, query.value());
                Resolution::LookupError {
                    kind,
                    reason: format!("lookup timed out after {:?}", self.lookup_timeout),
                }
            }
        }
    }

    /// Resolves every input concurrently, keeping input order
    pub async fn resolve_many(&self, inputs: &[String]) -> Vec<Result<Resolution, BotError>> {
        join_all(inputs.iter().map(|input| self.resolve(input))).await
    }
}
