//! PPI Query: per-minute profanity aggregation and its dense flattening
//!
//! # Pipeline Flow
//!
//! ```text
//! (start, end, subjects) → build_query → SearchIndex::search → BucketTree → flatten
//!                              ↓                                   ↓           ↓
//!                       AggregationQuery                       sparse      ProfanityRecord × N
//! ```
//!
//! The flattener is lenient on purpose: a bucket missing at any depth counts
//! as zero. Only a response without the top-level histogram is rejected.
//!
//! # Example
//!
//! ```ignore
//! use ppi_query::{extract_profanity, ElasticsearchClient, ExtractionRequest};
//!
//! let client = ElasticsearchClient::new("http://localhost:9200", timeout)?;
//! let request = ExtractionRequest::with_default_mapping(range, subjects)?;
//! let records = extract_profanity(&client, "profanity-power-index", &request).await?;
//! ```

pub mod elasticsearch;
pub mod extract;
pub mod flatten;
pub mod index;
pub mod query;
pub mod response;

pub use elasticsearch::ElasticsearchClient;
pub use extract::{extract_profanity, ExtractionRequest};
pub use flatten::{flatten, lookup_count};
pub use index::{BulkStats, IndexMapping, SearchIndex};
pub use query::{build_query, AggregationQuery};
pub use response::{BucketTree, MissingAggregations, SearchResponse, TimeBucket};
