//! Extraction: validated request -> query -> search -> dense report.
use ppi_core::{PpiError, ProfanityMapping, ProfanityRecord, Result, SubjectSet, TimeRange};

use crate::flatten::flatten;
use crate::index::SearchIndex;
use crate::query::{build_query, AggregationQuery};
use crate::response::BucketTree;

/// Arguments for one extraction, checked up front so the builder and
/// flattener never see degenerate input.
#[derive(Debug, Clone)]
pub struct ExtractionRequest {
    range: TimeRange,
    subjects: SubjectSet,
    mapping: ProfanityMapping,
}

impl ExtractionRequest {
    pub fn new(range: TimeRange, subjects: SubjectSet, mapping: ProfanityMapping) -> Result<Self> {
        if range.is_inverted() {
            return Err(PpiError::invalid(
                "range",
                format!("start {} is after end {}", range.start_label(), range.end_label()),
            ));
        }
        subjects.validate()?;
        if mapping.is_empty() {
            return Err(PpiError::invalid(
                "profanity_mapping",
                "at least one profanity term is required",
            ));
        }
        Ok(Self {
            range,
            subjects,
            mapping,
        })
    }

    /// Request using the built-in profanity mapping
    pub fn with_default_mapping(range: TimeRange, subjects: SubjectSet) -> Result<Self> {
        Self::new(range, subjects, ProfanityMapping::default())
    }

    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    pub fn subjects(&self) -> &SubjectSet {
        &self.subjects
    }

    pub fn mapping(&self) -> &ProfanityMapping {
        &self.mapping
    }

    pub fn query(&self) -> AggregationQuery {
        build_query(&self.range, &self.subjects, &self.mapping)
    }

    pub fn flatten(&self, tree: &BucketTree) -> Vec<ProfanityRecord> {
        let terms: Vec<&str> = self.mapping.terms().collect();
        let subjects: Vec<&str> = self.subjects.iter().collect();
        flatten(tree, &terms, &subjects)
    }
}

/// Runs the aggregation against `index` and returns one record per
/// `(minute, term, subject)`.
pub async fn extract_profanity(
    client: &dyn SearchIndex,
    index: &str,
    request: &ExtractionRequest,
) -> Result<Vec<ProfanityRecord>> {
    let query = request.query();

    tracing::info!(index, "Calling elasticsearch.");
    let response = client.search(index, &query).await?;
    tracing::info!(took_ms = response.took, "Done. Hit count: {}", response.hit_count());

    let tree = response.into_bucket_tree()?;
    let missing = tree.missing_aggregations();
    if !missing.is_empty() {
        tracing::warn!(
            profanity = missing.profanity,
            target = missing.target,
            "Response is missing intermediate aggregations; counting them as zero."
        );
    }

    tracing::info!(buckets = tree.len(), "Marshalling elasticsearch results.");
    Ok(request.flatten(&tree))
}
