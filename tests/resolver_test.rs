use anyhow::{anyhow, Result};
use async_trait::async_trait;
use cryptal_wallet_bot::entity::{BotError, RecipientKind, Resolution};
use cryptal_wallet_bot::interactor::{RecipientResolver, RegistryLookup};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const ALICE: &str = "0x00000000000000000000000000000000000000000000000000000000000a11ce";

#[derive(Default)]
struct FakeRegistry {
    wallet_ids: HashMap<String, String>,
    upi_ids: HashMap<String, String>,
    failing: bool,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

#[async_trait]
impl RegistryLookup for FakeRegistry {
    async fn address_by_wallet_id(&self, wallet_id: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing {
            return Err(anyhow!("node unreachable"));
        }
        Ok(self.wallet_ids.get(wallet_id).cloned())
    }

    async fn address_by_upi_id(&self, upi_id: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(anyhow!("node unreachable"));
        }
        Ok(self.upi_ids.get(upi_id).cloned())
    }
}

fn resolver(registry: Arc<FakeRegistry>) -> RecipientResolver {
    RecipientResolver::new(registry, Duration::from_millis(200))
}

#[tokio::test]
async fn addresses_resolve_without_a_lookup() {
    let registry = Arc::new(FakeRegistry::default());
    let resolver = resolver(registry.clone());

    let resolution = resolver.resolve("0xA11CE").await.unwrap();

    assert_eq!(
        resolution,
        Resolution::Found {
            address: ALICE.to_string(),
            kind: RecipientKind::Address,
        }
    );
    assert_eq!(registry.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn wallet_and_upi_ids_resolve_through_the_registry() {
    let mut registry = FakeRegistry::default();
    registry
        .wallet_ids
        .insert("alice".to_string(), ALICE.to_string());
    registry
        .upi_ids
        .insert("alice@upi".to_string(), ALICE.to_string());
    let resolver = resolver(Arc::new(registry));

    let by_id = resolver.resolve("Alice").await.unwrap();
    let by_upi = resolver.resolve("alice@upi").await.unwrap();

    assert_eq!(by_id.address(), Some(ALICE));
    assert_eq!(by_id.kind(), RecipientKind::WalletId);
    assert_eq!(by_upi.address(), Some(ALICE));
    assert_eq!(by_upi.kind(), RecipientKind::UpiId);
}

#[tokio::test]
async fn unknown_ids_and_failed_lookups_are_distinct() {
    let resolver_ok = resolver(Arc::new(FakeRegistry::default()));
    assert_eq!(
        resolver_ok.resolve("nobody").await.unwrap(),
        Resolution::NotFound {
            kind: RecipientKind::WalletId
        }
    );

    let resolver_failing = resolver(Arc::new(FakeRegistry {
        failing: true,
        ..Default::default()
    }));
    assert!(matches!(
        resolver_failing.resolve("nobody").await.unwrap(),
        Resolution::LookupError {
            kind: RecipientKind::WalletId,
            ..
        }
    ));
}

#[tokio::test]
async fn slow_lookups_time_out() {
    let resolver = resolver(Arc::new(FakeRegistry {
        delay: Some(Duration::from_secs(5)),
        ..Default::default()
    }));

    let resolution = resolver.resolve("sleepy").await.unwrap();

    assert!(matches!(resolution, Resolution::LookupError { .. }));
}

#[tokio::test]
async fn malformed_input_is_an_error() {
    let resolver = resolver(Arc::new(FakeRegistry::default()));

    assert!(matches!(
        resolver.resolve(&format!("0x{}", "f".repeat(65))).await,
        Err(BotError::InvalidWalletId(_))
    ));
    assert!(matches!(
        resolver.resolve("shop@").await,
        Err(BotError::InvalidRecipient(_))
    ));
    assert!(resolver.resolve("   ").await.is_err());
    assert!(resolver.resolve("a").await.is_err());
}

#[tokio::test]
async fn hex_prefixed_ids_go_to_the_registry() {
    let mut registry = FakeRegistry::default();
    registry
        .upi_ids
        .insert("0xshop@bank".to_string(), ALICE.to_string());
    let registry = Arc::new(registry);
    let resolver = resolver(registry.clone());

    assert_eq!(
        resolver.resolve("0xShop@bank").await.unwrap(),
        Resolution::Found {
            address: ALICE.to_string(),
            kind: RecipientKind::UpiId,
        }
    );
    assert_eq!(
        resolver.resolve("0xmerchant").await.unwrap(),
        Resolution::NotFound {
            kind: RecipientKind::WalletId,
        }
    );
    assert_eq!(registry.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn many_inputs_keep_their_order() {
    let mut registry = FakeRegistry::default();
    registry
        .wallet_ids
        .insert("alice".to_string(), ALICE.to_string());
    let resolver = resolver(Arc::new(registry));

    let inputs = vec!["alice".to_string(), "0x1".to_string(), "ghost".to_string()];
    let results = resolver.resolve_many(&inputs).await;

    assert_eq!(results.len(), 3);
    assert_eq!(results[0].as_ref().unwrap().address(), Some(ALICE));
    assert_eq!(results[1].as_ref().unwrap().kind(), RecipientKind::Address);
    assert!(matches!(
        results[2].as_ref().unwrap(),
        Resolution::NotFound { .. }
    ));
}
