//! Aggregation query builder.
//!
//! The query is three aggregations deep:
//!
//! ```text
//! tweets_per_minute (date_histogram, 1m)
//!   └─ profanity (filters, one per term)
//!        └─ target (filters, one per subject)
//! ```
//!
//! Every level is a typed struct so the shape can't drift, and keyed filter
//! maps serialize in insertion order so two builds from the same inputs are
//! byte-identical.

use ppi_core::time::SEARCH_DATE_FORMAT;
use ppi_core::{ProfanityMapping, SubjectSet, TimeRange};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

pub const HISTOGRAM_AGGREGATION: &str = "tweets_per_minute";
pub const PROFANITY_AGGREGATION: &str = "profanity";
pub const SUBJECT_AGGREGATION: &str = "target";

/// Document field holding the tweet timestamp
pub const TIMESTAMP_FIELD: &str = "created_at";
/// Document field holding the tweet text
pub const TEXT_FIELD: &str = "text";

const HISTOGRAM_INTERVAL: &str = "minute";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregationQuery {
    /// Always 0: only aggregations are wanted back
    pub size: u32,
    pub query: RangeFilter,
    pub aggregations: HistogramAggregations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeFilter {
    pub range: TimestampRange,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimestampRange {
    #[serde(rename = "created_at")]
    pub timestamp: RangeBounds,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeBounds {
    pub gte: String,
    pub lte: String,
    pub format: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramAggregations {
    pub tweets_per_minute: DateHistogramAggregation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateHistogramAggregation {
    pub date_histogram: DateHistogram,
    pub aggregations: ProfanityAggregations,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateHistogram {
    pub field: &'static str,
    pub calendar_interval: &'static str,
    pub format: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfanityAggregations {
    pub profanity: FiltersAggregation<SubjectAggregations>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubjectAggregations {
    pub target: FiltersAggregation<Leaf>,
}

/// Marker for the innermost level, which carries no sub-aggregations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Leaf;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiltersAggregation<A> {
    pub filters: FiltersBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregations: Option<A>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiltersBody {
    pub filters: KeyedFilters,
}

/// Named filters, serialized as a JSON object in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct KeyedFilters(Vec<(String, QueryStringFilter)>);

impl KeyedFilters {
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn get(&self, key: &str) -> Option<&QueryStringFilter> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, f)| f)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, QueryStringFilter)> for KeyedFilters {
    fn from_iter<I: IntoIterator<Item = (String, QueryStringFilter)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for KeyedFilters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, filter) in &self.0 {
            map.serialize_entry(key, filter)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryStringFilter {
    pub query_string: QueryString,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryString {
    pub query: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl QueryStringFilter {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query_string: QueryString {
                query: query.into(),
                fields: Vec::new(),
            },
        }
    }

    pub fn on_fields(mut self, fields: &[&str]) -> Self {
        self.query_string.fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }
}

/// Inclusive range on the timestamp field. An inverted range is passed
/// through as-is; the service simply matches nothing.
pub fn time_range(range: &TimeRange) -> RangeFilter {
    RangeFilter {
        range: TimestampRange {
            timestamp: RangeBounds {
                gte: range.start_label(),
                lte: range.end_label(),
                format: SEARCH_DATE_FORMAT,
            },
        },
    }
}

/// One filter per profanity term, matching the term's pattern.
pub fn profanity_filter(mapping: &ProfanityMapping) -> KeyedFilters {
    mapping
        .iter()
        .map(|(term, pattern)| (term.to_string(), QueryStringFilter::new(pattern)))
        .collect()
}

/// One filter per subject. Prefix match on the text field: a subject named
/// mid-sentence is not counted.
pub fn subject_filter(subjects: &SubjectSet) -> KeyedFilters {
    subjects
        .iter()
        .map(|subject| {
            (
                subject.to_string(),
                QueryStringFilter::new(format!("{}*", subject)).on_fields(&[TEXT_FIELD]),
            )
        })
        .collect()
}

/// Builds the full per-minute, per-term, per-subject aggregation query.
///
/// No validation happens here: an empty subject set yields a query with an
/// empty `target` filter map. Reject bad input before calling (see
/// [`crate::ExtractionRequest`]).
pub fn build_query(
    range: &TimeRange,
    subjects: &SubjectSet,
    mapping: &ProfanityMapping,
) -> AggregationQuery {
    AggregationQuery {
        size: 0,
        query: time_range(range),
        aggregations: HistogramAggregations {
            tweets_per_minute: DateHistogramAggregation {
                date_histogram: DateHistogram {
                    field: TIMESTAMP_FIELD,
                    calendar_interval: HISTOGRAM_INTERVAL,
                    format: SEARCH_DATE_FORMAT,
                },
                aggregations: ProfanityAggregations {
                    profanity: FiltersAggregation {
                        filters: FiltersBody {
                            filters: profanity_filter(mapping),
                        },
                        aggregations: Some(SubjectAggregations {
                            target: FiltersAggregation {
                                filters: FiltersBody {
                                    filters: subject_filter(subjects),
                                },
                                aggregations: None,
                            },
                        }),
                    },
                },
            },
        },
    }
}

impl AggregationQuery {
    pub fn profanity_filters(&self) -> &KeyedFilters {
        &self
            .aggregations
            .tweets_per_minute
            .aggregations
            .profanity
            .filters
            .filters
    }

    pub fn subject_filters(&self) -> Option<&KeyedFilters> {
        self.aggregations
            .tweets_per_minute
            .aggregations
            .profanity
            .aggregations
            .as_ref()
            .map(|sub| &sub.target.filters.filters)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use serde_json::json;

    fn range() -> TimeRange {
        TimeRange::new(
            DateTime::parse_from_rfc3339("2020-11-04T00:00:00Z").unwrap(),
            DateTime::parse_from_rfc3339("2020-11-04T06:00:00Z").unwrap(),
        )
    }

    #[test]
    fn test_keyed_filters_keep_insertion_order() {
        let subjects = SubjectSet::unchecked(["Trump", "Biden", "Anderson"]);
        let json = serde_json::to_string(&subject_filter(&subjects)).unwrap();
        let trump = json.find("\"Trump\"").unwrap();
        let biden = json.find("\"Biden\"").unwrap();
        let anderson = json.find("\"Anderson\"").unwrap();
        assert!(trump < biden && biden < anderson);
    }

    #[test]
    fn test_subject_filter_is_prefix_on_text() {
        let subjects = SubjectSet::unchecked(["Biden"]);
        let value = serde_json::to_value(subject_filter(&subjects)).unwrap();
        assert_eq!(
            value,
            json!({ "Biden": { "query_string": { "query": "Biden*", "fields": ["text"] } } })
        );
    }

    #[test]
    fn test_profanity_filter_has_no_field_restriction() {
        let value = serde_json::to_value(profanity_filter(&ProfanityMapping::default())).unwrap();
        assert_eq!(value["ass"], json!({ "query_string": { "query": "text:ass*" } }));
    }

    #[test]
    fn test_empty_subjects_still_builds() {
        let query = build_query(&range(), &SubjectSet::default(), &ProfanityMapping::default());
        assert!(query.subject_filters().unwrap().is_empty());
        assert_eq!(query.profanity_filters().len(), 5);
    }
}
