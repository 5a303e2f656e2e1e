//! PPI Collect: stores profane tweets for later aggregation
//!
//! Tweets arrive as newline-delimited JSON, one streaming-API payload per
//! line. Each is matched against the collection vocabulary; the profane ones
//! are reduced to a [`TweetDocument`](ppi_core::TweetDocument) and bulk
//! written to the search index in fixed-size batches.
//!
//! # Example
//!
//! ```ignore
//! use ppi_collect::{collect_tweets, CollectOptions};
//!
//! let stdin = tokio::io::BufReader::new(tokio::io::stdin());
//! let stats = collect_tweets(&client, "profanity-power-index", stdin, CollectOptions::default()).await?;
//! println!("{} stored, {} skipped", stats.succeeded, stats.skipped);
//! ```

pub mod filter;
pub mod pipeline;
pub mod tweet;

pub use filter::{contains_profanity, to_document};
pub use pipeline::{collect_tweets, ensure_index, CollectOptions, CollectStats, DEFAULT_BATCH_SIZE};
pub use tweet::{extract_text, RawTweet};
