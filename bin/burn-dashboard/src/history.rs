//! `BurnExecuted` events: the records seen so far and the scanner that
//! follows them on chain.

use std::time::Duration;

use alloy::primitives::{Address, U256};
use serde::Serialize;
use tokio::{sync::mpsc, time::MissedTickBehavior};
use tracing::{debug, error, info, instrument};

use crate::{contract::BurnerClient, telemetry::error_field};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BurnRecord {
    pub caller: Address,
    pub burn_amount: U256,
    pub caller_reward: U256,
    pub block_number: u64,
    pub log_index: u64,
}

impl BurnRecord {
    /// Position in chain order.
    pub fn position(&self) -> (u64, u64) {
        (self.block_number, self.log_index)
    }
}

/// Burn events seen so far, kept in chain order.
#[derive(Debug, Default)]
pub struct BurnHistory {
    records: Vec<BurnRecord>,
}

impl BurnHistory {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Inserts records at their chain position. A record already present is skipped.
    pub fn extend(&mut self, records: impl IntoIterator<Item = BurnRecord>) {
        for record in records {
            let position = record.position();
            if self
                .records
                .last()
                .is_none_or(|last| last.position() < position)
            {
                self.records.push(record);
                continue;
            }
            let at = self.records.partition_point(|r| r.position() < position);
            if self.records[at].position() != position {
                self.records.insert(at, record);
            }
        }
    }

    /// The `limit` most recent burns, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&BurnRecord> {
        self.records.iter().rev().take(limit).collect()
    }
}

/// Events fetched for one block range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BurnBatch {
    pub records: Vec<BurnRecord>,
    pub through_block: u64,
}

/// Walks the chain from a start block to the head, at most `batch_blocks`
/// blocks per log query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventScanner {
    from_block: u64,
    batch_blocks: u64,
    last_processed_block: Option<u64>,
}

impl EventScanner {
    pub fn new(from_block: u64, batch_blocks: u64) -> Self {
        Self {
            from_block,
            batch_blocks: batch_blocks.max(1),
            last_processed_block: None,
        }
    }

    pub fn last_processed_block(&self) -> Option<u64> {
        self.last_processed_block
    }

    /// Inclusive range still to query below `head`, `None` once caught up.
    pub fn next_range(&self, head: u64) -> Option<(u64, u64)> {
        let start = match self.last_processed_block {
            Some(last) => last.checked_add(1)?,
            None => self.from_block,
        };
        if start > head {
            return None;
        }
        let end = head.min(start.saturating_add(self.batch_blocks - 1));
        Some((start, end))
    }

    /// Fetches the next range. The cursor only moves past ranges that were fetched.
    pub async fn next_batch(
        &mut self,
        client: &dyn BurnerClient,
        head: u64,
    ) -> eyre::Result<Option<BurnBatch>> {
        let Some((from, to)) = self.next_range(head) else {
            return Ok(None);
        };
        let records = client.burn_events(from, to).await?;
        debug!(from, to, events = records.len(), "scanned burn events");
        self.last_processed_block = Some(to);
        Ok(Some(BurnBatch {
            records,
            through_block: to,
        }))
    }

    /// Catches `history` up with the current head. Returns the number of new
    /// events. Ranges fetched before a failure stay applied.
    #[instrument(name = "history::sync", skip_all)]
    pub async fn sync(
        &mut self,
        client: &dyn BurnerClient,
        history: &mut BurnHistory,
    ) -> eyre::Result<usize> {
        let head = client.block_number().await?;
        let first_sync = self.last_processed_block.is_none();

        let mut new = 0;
        while let Some(batch) = self.next_batch(client, head).await? {
            new += batch.records.len();
            history.extend(batch.records);
        }

        if first_sync {
            info!(events = new, last_block = head, "historical burn discovery complete");
        } else if new > 0 {
            info!(new, "discovered new burns");
        }
        Ok(new)
    }

    /// Polls the head every `period` and sends each non-empty batch. Returns
    /// once the receiver is gone.
    #[instrument(name = "history::follow", skip_all)]
    pub async fn follow(
        mut self,
        client: &dyn BurnerClient,
        period: Duration,
        batches: mpsc::Sender<BurnBatch>,
    ) {
        let mut poll = tokio::time::interval(period);
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            poll.tick().await;
            if batches.is_closed() {
                return;
            }
            let head = match client.block_number().await {
                Ok(head) => head,
                Err(e) => {
                    record_error(&e);
                    continue;
                }
            };
            loop {
                match self.next_batch(client, head).await {
                    Ok(Some(batch)) if batch.records.is_empty() => {}
                    Ok(Some(batch)) => {
                        if batches.send(batch).await.is_err() {
                            return;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        record_error(&e);
                        break;
                    }
                }
            }
        }
    }
}

fn record_error(e: &eyre::Report) {
    metrics::counter!("burn_dashboard_errors", "request" => "burn_events").increment(1);
    error!(error = error_field(e), "failed to sync burn events");
}
