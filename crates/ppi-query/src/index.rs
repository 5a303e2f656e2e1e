//! Search index port: everything the extraction and collection paths need
//! from the document store.
use async_trait::async_trait;
use ppi_core::time::TWITTER_DATE_FORMAT;
use ppi_core::{Result, TweetDocument};
use serde::Serialize;
use std::ops::AddAssign;

use crate::query::AggregationQuery;
use crate::response::SearchResponse;

#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Runs an aggregation query against `index`
    async fn search(&self, index: &str, query: &AggregationQuery) -> Result<SearchResponse>;

    async fn index_exists(&self, index: &str) -> Result<bool>;

    async fn create_index(&self, index: &str, mapping: &IndexMapping) -> Result<()>;

    async fn delete_index(&self, index: &str) -> Result<()>;

    /// Writes documents keyed by tweet id, reporting per-document outcomes
    async fn bulk_index(&self, index: &str, documents: &[TweetDocument]) -> Result<BulkStats>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkStats {
    pub succeeded: u64,
    pub failed: u64,
}

impl BulkStats {
    pub fn processed(&self) -> u64 {
        self.succeeded + self.failed
    }
}

impl AddAssign for BulkStats {
    fn add_assign(&mut self, other: Self) {
        self.succeeded += other.succeeded;
        self.failed += other.failed;
    }
}

/// Index settings for stored tweets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexMapping {
    pub mappings: Mappings,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mappings {
    pub properties: TweetProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TweetProperties {
    pub coordinates: FieldMapping,
    pub created_at: FieldMapping,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldMapping {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<&'static str>,
}

impl IndexMapping {
    /// Geo-point coordinates and Twitter-formatted creation dates.
    pub fn tweets() -> Self {
        Self {
            mappings: Mappings {
                properties: TweetProperties {
                    coordinates: FieldMapping {
                        kind: "geo_point",
                        format: None,
                    },
                    created_at: FieldMapping {
                        kind: "date",
                        format: Some(TWITTER_DATE_FORMAT),
                    },
                },
            },
        }
    }
}
