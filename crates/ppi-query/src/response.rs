//! Search response and the bucket tree inside it.
//!
//! Sub-aggregations come back inline on each bucket, keyed by aggregation
//! name (`profanity`, `target`). Any of those levels may be missing, and a
//! keyed bucket may be absent even when its siblings are present. Below the
//! histogram a level with the wrong shape is read as missing, so it lands in
//! the zero-fill path instead of failing the whole response.

use ppi_core::{PpiError, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

/// Reads an optional sub-aggregation, mapping a shape mismatch to `None`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub hits: Hits,
    pub aggregations: Option<ResponseAggregations>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub total: HitsTotal,
}

/// `hits.total` is a plain number before Elasticsearch 7 and an object after.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum HitsTotal {
    Count(u64),
    Tracked { value: u64, relation: String },
}

impl Default for HitsTotal {
    fn default() -> Self {
        HitsTotal::Count(0)
    }
}

impl HitsTotal {
    pub fn value(&self) -> u64 {
        match self {
            HitsTotal::Count(n) => *n,
            HitsTotal::Tracked { value, .. } => *value,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseAggregations {
    pub tweets_per_minute: Option<BucketTree>,
}

impl SearchResponse {
    pub fn hit_count(&self) -> u64 {
        self.hits.total.value()
    }

    /// Takes the histogram out of the response. A response without it is a
    /// contract violation, not an empty result.
    pub fn into_bucket_tree(self) -> Result<BucketTree> {
        self.aggregations
            .and_then(|aggs| aggs.tweets_per_minute)
            .ok_or_else(|| {
                PpiError::ResponseShape(
                    "response has no aggregations.tweets_per_minute".to_string(),
                )
            })
    }
}

/// The per-minute histogram, buckets in chronological order.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BucketTree {
    #[serde(default)]
    pub buckets: Vec<TimeBucket>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TimeBucket {
    /// Formatted minute label, e.g. `2020-11-04T00:01:00Z`
    pub key_as_string: String,
    #[serde(default)]
    pub doc_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub profanity: Option<KeyedBuckets<TermBucket>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KeyedBuckets<B> {
    #[serde(default = "HashMap::new")]
    pub buckets: HashMap<String, B>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TermBucket {
    #[serde(default)]
    pub doc_count: u64,
    #[serde(default, deserialize_with = "lenient")]
    pub target: Option<KeyedBuckets<SubjectBucket>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct SubjectBucket {
    #[serde(default)]
    pub doc_count: u64,
}

/// Intermediate aggregations that were absent outright or unreadable, as
/// opposed to individual keyed buckets being absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingAggregations {
    /// Time buckets with no `profanity` aggregation
    pub profanity: usize,
    /// Term buckets with no `target` aggregation
    pub target: usize,
}

impl MissingAggregations {
    pub fn is_empty(&self) -> bool {
        self.profanity == 0 && self.target == 0
    }
}

impl BucketTree {
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.buckets.iter().map(|b| b.key_as_string.as_str())
    }

    pub fn missing_aggregations(&self) -> MissingAggregations {
        let mut missing = MissingAggregations::default();
        for bucket in &self.buckets {
            match &bucket.profanity {
                None => missing.profanity += 1,
                Some(terms) => {
                    missing.target += terms.buckets.values().filter(|t| t.target.is_none()).count();
                }
            }
        }
        missing
    }
}
