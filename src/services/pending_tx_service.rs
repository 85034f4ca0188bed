use crate::aptos::models::TransactionInfo;
use crate::di::ServiceContainer;
use crate::entity::{TransactionRecord, TransactionStatus};
use anyhow::Result;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use log::{debug, error, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::select;
use tokio::sync::mpsc;
use tokio::time::{interval, Instant};

/// Settles `pending` ledger entries the send flow gave up waiting for
pub struct PendingTransactionMonitor {
    services: Arc<ServiceContainer>,
    stop_tx: Option<mpsc::Sender<()>>,
}

/// What the node told us about one hash during a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainState {
    Unknown,
    Pending,
    Committed { success: bool },
}

impl From<Option<&TransactionInfo>> for ChainState {
    fn from(info: Option<&TransactionInfo>) -> Self {
        match info {
            None => ChainState::Unknown,
            Some(info) if info.is_pending() => ChainState::Pending,
            Some(info) => ChainState::Committed {
                success: info.success.unwrap_or(false),
            },
        }
    }
}

/// The status a pending record should move to, if any. A hash the node has
/// never seen is failed once it is older than `expiration`.
fn settle(
    record: &TransactionRecord,
    chain: ChainState,
    now: DateTime<Utc>,
    expiration: ChronoDuration,
) -> Option<TransactionStatus> {
    if record.status != TransactionStatus::Pending {
        return None;
    }

    match chain {
        ChainState::Committed { success: true } => Some(TransactionStatus::Confirmed),
        ChainState::Committed { success: false } => Some(TransactionStatus::Failed),
        ChainState::Unknown if now - record.timestamp > expiration => {
            Some(TransactionStatus::Failed)
        }
        ChainState::Unknown | ChainState::Pending => None,
    }
}

impl PendingTransactionMonitor {
    pub fn new(services: Arc<ServiceContainer>) -> Self {
        Self {
            services,
            stop_tx: None,
        }
    }

    // Start the background sweep over every ledger
    pub async fn start(&mut self) -> Result<()> {
        if self.stop_tx.is_some() {
            warn!("Pending transaction monitor is already running");
            return Ok(());
        }

        let (stop_tx, mut stop_rx) = mpsc::channel::<()>(1);
        self.stop_tx = Some(stop_tx);

        let services = self.services.clone();
        let period = Duration::from_secs(services.config().pending_poll_interval_secs.max(1));

        tokio::spawn(async move {
            let mut interval = interval(period);
            let mut last_run = Instant::now();

            loop {
                select! {
                    _ = interval.tick() => {
                        debug!("Sweeping pending transactions (last run: {:.2?} ago)", last_run.elapsed());

                        if let Err(e) = Self::sweep(&services).await {
                            error!("Error sweeping pending transactions: {}", e);
                        }

                        last_run = Instant::now();
                    }
                    _ = stop_rx.recv() => {
                        info!("Stopping pending transaction monitor");
                        break;
                    }
                }
            }
        });

        info!("Pending transaction monitor started");
        Ok(())
    }

    pub async fn stop(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(()).await;
            info!("Pending transaction monitor stop signal sent");
        }
    }

    async fn sweep(services: &Arc<ServiceContainer>) -> Result<()> {
        let transactions = services.transactions();
        let client = services.aptos_client();
        let expiration = ChronoDuration::seconds(services.config().tx_expiration_secs as i64);

        // A transfer between two local wallets is pending in both ledgers
        let mut seen: HashMap<String, ChainState> = HashMap::new();
        let mut settled = 0usize;

        for public_key in transactions.ledger_owners().await? {
            let records = match transactions.get_stored_transactions(&public_key).await {
                Ok(records) => records,
                Err(e) => {
                    warn!("Skipping ledger {}: {}", public_key, e);
                    continue;
                }
            };

            for record in records
                .iter()
                .filter(|record| record.status == TransactionStatus::Pending)
            {
                let chain = match seen.get(&record.hash) {
                    Some(chain) => *chain,
                    None => match client.get_transaction_by_hash(&record.hash).await {
                        Ok(info) => {
                            let chain = ChainState::from(info.as_ref());
                            seen.insert(record.hash.clone(), chain);
                            chain
                        }
                        Err(e) => {
                            // Leave it for the next sweep
                            warn!("Could not look up {}: {}", record.hash, e);
                            continue;
                        }
                    },
                };

                if let Some(status) = settle(record, chain, Utc::now(), expiration) {
                    match transactions
                        .update_status(&public_key, &record.hash, status)
                        .await
                    {
                        Ok(()) => {
                            info!("Transaction {} is now {}", record.hash, status);
                            settled += 1;
                        }
                        Err(e) => warn!("Could not settle {}: {}", record.hash, e),
                    }
                }
            }
        }

        if settled > 0 {
            info!("Settled {} pending transactions", settled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::TransactionType;
    use rust_decimal::Decimal;

    fn pending(age_secs: i64) -> TransactionRecord {
        let mut record = TransactionRecord::new(
            "0x1",
            "0x2",
            Decimal::ONE,
            TransactionType::Sent,
            "0xabc",
            TransactionStatus::Pending,
        );
        record.timestamp = Utc::now() - ChronoDuration::seconds(age_secs);
        record
    }

    #[test]
    fn committed_transactions_settle_by_outcome() {
        let expiration = ChronoDuration::seconds(600);
        let record = pending(5);

        assert_eq!(
            settle(&record, ChainState::Committed { success: true }, Utc::now(), expiration),
            Some(TransactionStatus::Confirmed)
        );
        assert_eq!(
            settle(&record, ChainState::Committed { success: false }, Utc::now(), expiration),
            Some(TransactionStatus::Failed)
        );
        assert_eq!(settle(&record, ChainState::Pending, Utc::now(), expiration), None);
    }

    #[test]
    fn unknown_hashes_fail_only_after_expiration() {
        let expiration = ChronoDuration::seconds(600);

        assert_eq!(settle(&pending(30), ChainState::Unknown, Utc::now(), expiration), None);
        assert_eq!(
            settle(&pending(601), ChainState::Unknown, Utc::now(), expiration),
            Some(TransactionStatus::Failed)
        );
    }

    #[test]
    fn settled_records_are_left_alone() {
        let mut record = pending(5);
        record.status = TransactionStatus::Confirmed;

        assert_eq!(
            settle(
                &record,
                ChainState::Committed { success: false },
                Utc::now(),
                ChronoDuration::seconds(600)
            ),
            None
        );
    }
}
