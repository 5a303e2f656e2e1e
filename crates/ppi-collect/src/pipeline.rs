//! Ingestion: NDJSON tweets -> profanity filter -> batched bulk writes.
use ppi_core::{PpiError, Result, TweetDocument};
use ppi_query::{BulkStats, IndexMapping, SearchIndex};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::filter::{contains_profanity, to_document};
use crate::tweet::RawTweet;

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Running totals are logged each time the processed count passes a
/// multiple of this.
const PROGRESS_INTERVAL: u64 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectOptions {
    pub batch_size: usize,
    /// Drop and recreate an existing index instead of appending to it
    pub drop_index: bool,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            drop_index: false,
        }
    }
}

/// Outcome of one collection run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    pub succeeded: u64,
    pub failed: u64,
    /// Lines that were unparsable, not profane, or missing document fields
    pub skipped: u64,
}

impl CollectStats {
    pub fn processed(&self) -> u64 {
        self.succeeded + self.failed
    }

    fn record(&mut self, bulk: BulkStats) {
        self.succeeded += bulk.succeeded;
        self.failed += bulk.failed;
    }
}

/// Makes sure `index` exists with the tweet mapping. An existing index is
/// kept unless `drop_index` is set.
pub async fn ensure_index(client: &dyn SearchIndex, index: &str, drop_index: bool) -> Result<()> {
    let mapping = IndexMapping::tweets();
    if client.index_exists(index).await? {
        warn!("Index {} exists.", index);
        if drop_index {
            warn!("Dropping {}.", index);
            client.delete_index(index).await?;
            info!("Creating {}.", index);
            client.create_index(index, &mapping).await?;
        }
    } else {
        info!("Creating {}.", index);
        client.create_index(index, &mapping).await?;
        info!("{} successfully created.", index);
    }
    Ok(())
}

/// Reads one tweet per line from `source` until EOF and stores the profane
/// ones in `index`.
pub async fn collect_tweets<R>(
    client: &dyn SearchIndex,
    index: &str,
    source: R,
    options: CollectOptions,
) -> Result<CollectStats>
where
    R: AsyncBufRead + Unpin,
{
    if options.batch_size == 0 {
        return Err(PpiError::invalid("batch_size", "must be at least 1"));
    }

    ensure_index(client, index, options.drop_index).await?;

    info!("Sending tweets to {}.", index);
    let mut stats = CollectStats::default();
    let mut batch: Vec<TweetDocument> = Vec::with_capacity(options.batch_size);
    let mut lines = source.lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let tweet = match RawTweet::from_json(line) {
            Ok(tweet) => tweet,
            Err(e) => {
                debug!(error = %e, "Skipping unparsable line.");
                stats.skipped += 1;
                continue;
            }
        };
        if !contains_profanity(&tweet) {
            stats.skipped += 1;
            continue;
        }
        match to_document(&tweet) {
            Some(doc) => batch.push(doc),
            None => {
                debug!("Skipping tweet without id, text or timestamp.");
                stats.skipped += 1;
                continue;
            }
        }

        if batch.len() == options.batch_size {
            flush(client, index, &mut batch, &mut stats).await?;
        }
    }
    if !batch.is_empty() {
        flush(client, index, &mut batch, &mut stats).await?;
    }

    info!(
        skipped = stats.skipped,
        "{} tweets processed: {} succeeded, {} failed.",
        stats.processed(),
        stats.succeeded,
        stats.failed
    );
    Ok(stats)
}

async fn flush(
    client: &dyn SearchIndex,
    index: &str,
    batch: &mut Vec<TweetDocument>,
    stats: &mut CollectStats,
) -> Result<()> {
    let before = stats.processed();
    let bulk = client.bulk_index(index, batch.as_slice()).await?;
    debug!(docs = batch.len(), succeeded = bulk.succeeded, failed = bulk.failed, "Bulk write.");
    batch.clear();
    stats.record(bulk);

    if stats.processed() / PROGRESS_INTERVAL > before / PROGRESS_INTERVAL {
        info!(
            "{} tweets processed: {} succeeded, {} failed.",
            stats.processed(),
            stats.succeeded,
            stats.failed
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = CollectOptions::default();
        assert_eq!(options.batch_size, 10);
        assert!(!options.drop_index);
    }

    #[test]
    fn test_stats_accumulate_bulk_results() {
        let mut stats = CollectStats::default();
        stats.record(BulkStats { succeeded: 9, failed: 1 });
        stats.record(BulkStats { succeeded: 3, failed: 0 });
        assert_eq!(stats.processed(), 13);
        assert_eq!(stats.failed, 1);
    }
}
