//! Sparse bucket tree -> dense report.
//!
//! The search service leaves out buckets with nothing in them, but the report
//! needs a row for every `(minute, term, subject)` so downstream plots get a
//! continuous series. Rows are emitted minute by minute in service order,
//! then term order, then subject order.

use ppi_core::ProfanityRecord;

use crate::response::{BucketTree, TimeBucket};

/// Count for one `(term, subject)` inside a time bucket, or `None` if any
/// level on the way down is missing.
pub fn lookup_count(bucket: &TimeBucket, term: &str, subject: &str) -> Option<u64> {
    let terms = bucket.profanity.as_ref()?;
    let subjects = terms.buckets.get(term)?.target.as_ref()?;
    subjects.buckets.get(subject).map(|s| s.doc_count)
}

/// Expands the tree into exactly `buckets × terms × subjects` records.
pub fn flatten(tree: &BucketTree, terms: &[&str], subjects: &[&str]) -> Vec<ProfanityRecord> {
    let mut records = Vec::with_capacity(tree.len() * terms.len() * subjects.len());

    for bucket in &tree.buckets {
        for term in terms {
            for subject in subjects {
                let count = match lookup_count(bucket, term, subject) {
                    Some(count) => count,
                    // zero-fill
                    None => 0,
                };
                records.push(ProfanityRecord::new(
                    bucket.key_as_string.as_str(),
                    *term,
                    *subject,
                    count,
                ));
            }
        }
    }

    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bucket(value: serde_json::Value) -> TimeBucket {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_lookup_each_level_missing() {
        let no_profanity = bucket(json!({ "key_as_string": "t" }));
        let no_term = bucket(json!({ "key_as_string": "t", "profanity": { "buckets": {} } }));
        let no_target = bucket(json!({
            "key_as_string": "t",
            "profanity": { "buckets": { "fuck": { "doc_count": 2 } } }
        }));
        let no_subject = bucket(json!({
            "key_as_string": "t",
            "profanity": { "buckets": { "fuck": { "doc_count": 2, "target": { "buckets": {} } } } }
        }));

        for b in [&no_profanity, &no_term, &no_target, &no_subject] {
            assert_eq!(lookup_count(b, "fuck", "Trump"), None);
        }
    }

    #[test]
    fn test_lookup_hit() {
        let b = bucket(json!({
            "key_as_string": "t",
            "profanity": { "buckets": { "fuck": {
                "doc_count": 2,
                "target": { "buckets": { "Trump": { "doc_count": 2 } } }
            } } }
        }));
        assert_eq!(lookup_count(&b, "fuck", "Trump"), Some(2));
    }

    #[test]
    fn test_empty_tree_yields_nothing() {
        assert!(flatten(&BucketTree::default(), &["fuck"], &["Trump"]).is_empty());
    }
}
