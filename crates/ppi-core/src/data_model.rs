//! Data Model: TimeRange, SubjectSet, ProfanityRecord, TweetDocument
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{PpiError, Result};
use crate::time::format_timestamp;

/// Closed interval of instants. `start <= end` is not enforced here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<FixedOffset>,
    pub end: DateTime<FixedOffset>,
}

impl TimeRange {
    pub fn new(start: DateTime<FixedOffset>, end: DateTime<FixedOffset>) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    /// Start bound in the shared search-service format
    pub fn start_label(&self) -> String {
        format_timestamp(&self.start)
    }

    /// End bound in the shared search-service format
    pub fn end_label(&self) -> String {
        format_timestamp(&self.end)
    }
}

/// Subjects to track, in caller order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectSet(Vec<String>);

impl SubjectSet {
    /// Builds the set without any checks; used by the query builder tests and
    /// anywhere the degenerate cases are wanted on purpose.
    pub fn unchecked<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(subjects.into_iter().map(Into::into).collect())
    }

    /// Builds a validated set: non-empty, no blank names, no duplicates.
    pub fn new<I, S>(subjects: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set = Self::unchecked(subjects);
        set.validate()?;
        Ok(set)
    }

    pub fn validate(&self) -> Result<()> {
        if self.0.is_empty() {
            return Err(PpiError::invalid("subjects", "at least one subject is required"));
        }
        let mut seen = HashSet::new();
        for subject in &self.0 {
            if subject.trim().is_empty() {
                return Err(PpiError::invalid("subjects", "subject names must not be blank"));
            }
            if !seen.insert(subject.as_str()) {
                return Err(PpiError::invalid(
                    "subjects",
                    format!("subject '{}' is listed more than once", subject),
                ));
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One row of the extracted report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProfanityRecord {
    /// Minute bucket label, verbatim from the search service
    pub time: String,
    pub word: String,
    pub subject: String,
    pub count: u64,
}

impl ProfanityRecord {
    pub fn new(
        time: impl Into<String>,
        word: impl Into<String>,
        subject: impl Into<String>,
        count: u64,
    ) -> Self {
        Self {
            time: time.into(),
            word: word.into(),
            subject: subject.into(),
            count,
        }
    }
}

/// A profane tweet as stored in the search index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TweetDocument {
    pub id: String,
    /// `[longitude, latitude]` when the tweet is geotagged
    pub coordinates: Option<[f64; 2]>,
    pub text: String,
    /// Twitter's own `created_at` string, parsed by the index mapping
    pub created_at: String,
}
