//! Read-only aggregations behind the dashboard endpoints.
//!
//! Every grouping keeps first-seen order of its keys, which for a report
//! straight out of extraction is time order then term order then subject
//! order.
use chrono::{DateTime, FixedOffset};
use ppi_core::time::parse_timestamp;
use ppi_core::{PpiError, ProfanityRecord, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

/// Report rows with their timestamps parsed once at load.
#[derive(Debug, Default)]
pub struct Dashboard {
    records: Vec<ProfanityRecord>,
    instants: Vec<Option<DateTime<FixedOffset>>>,
}

/// Raw query string of the filtered endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterParams {
    pub start: Option<String>,
    pub end: Option<String>,
    /// Comma-separated allow-list
    pub word: Option<String>,
    /// Comma-separated allow-list
    pub subject: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Filter {
    start: Option<DateTime<FixedOffset>>,
    end: Option<DateTime<FixedOffset>>,
    words: Option<HashSet<String>>,
    subjects: Option<HashSet<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Options {
    pub words: Vec<String>,
    pub subjects: Vec<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub records: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeriesPoint {
    pub time: String,
    pub subject: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectTotal {
    pub subject: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordCount {
    pub subject: String,
    pub word: String,
    pub count: u64,
}

impl FilterParams {
    pub fn into_filter(self) -> Result<Filter> {
        let start = self.start.as_deref().map(parse_timestamp).transpose()?;
        let end = self.end.as_deref().map(parse_timestamp).transpose()?;
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(PpiError::invalid("range", "start is after end"));
            }
        }
        Ok(Filter {
            start,
            end,
            words: self.word.as_deref().map(allow_list),
            subjects: self.subject.as_deref().map(allow_list),
        })
    }
}

fn allow_list(raw: &str) -> HashSet<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

impl Filter {
    fn has_bounds(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    fn admits(&self, record: &ProfanityRecord, instant: Option<&DateTime<FixedOffset>>) -> bool {
        if let Some(words) = &self.words {
            if !words.contains(&record.word) {
                return false;
            }
        }
        if let Some(subjects) = &self.subjects {
            if !subjects.contains(&record.subject) {
                return false;
            }
        }
        if !self.has_bounds() {
            return true;
        }
        // rows with unreadable times never fall inside a bounded window
        let Some(instant) = instant else {
            return false;
        };
        self.start.map_or(true, |start| *instant >= start)
            && self.end.map_or(true, |end| *instant <= end)
    }
}

impl Dashboard {
    pub fn new(records: Vec<ProfanityRecord>) -> Self {
        let instants = records
            .iter()
            .map(|r| parse_timestamp(&r.time).ok())
            .collect();
        Self { records, instants }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn matching<'a>(&'a self, filter: &'a Filter) -> impl Iterator<Item = &'a ProfanityRecord> + 'a {
        self.records
            .iter()
            .zip(&self.instants)
            .filter(move |(record, instant)| filter.admits(record, instant.as_ref()))
            .map(|(record, _)| record)
    }

    pub fn options(&self) -> Options {
        let words = first_seen(self.records.iter().map(|r| r.word.clone()));
        let subjects = first_seen(self.records.iter().map(|r| r.subject.clone()));

        let parsed = self
            .records
            .iter()
            .zip(&self.instants)
            .filter_map(|(r, i)| i.map(|i| (i, r.time.as_str())));
        let start = parsed.clone().min_by_key(|(i, _)| *i).map(|(_, t)| t.to_string());
        let end = parsed.max_by_key(|(i, _)| *i).map(|(_, t)| t.to_string());

        Options {
            words,
            subjects,
            start,
            end,
            records: self.records.len(),
        }
    }

    /// Per `(time, subject)` sums across the admitted terms.
    pub fn series(&self, filter: &Filter) -> Vec<SeriesPoint> {
        sum_by(self.matching(filter), |r| (r.time.clone(), r.subject.clone()))
            .into_iter()
            .map(|((time, subject), count)| SeriesPoint {
                time,
                subject,
                count,
            })
            .collect()
    }

    pub fn totals(&self, filter: &Filter) -> Vec<SubjectTotal> {
        sum_by(self.matching(filter), |r| r.subject.clone())
            .into_iter()
            .map(|(subject, count)| SubjectTotal { subject, count })
            .collect()
    }

    /// Per `(subject, word)` sums.
    pub fn breakdown(&self, filter: &Filter) -> Vec<WordCount> {
        sum_by(self.matching(filter), |r| (r.subject.clone(), r.word.clone()))
            .into_iter()
            .map(|((subject, word), count)| WordCount {
                subject,
                word,
                count,
            })
            .collect()
    }
}

fn first_seen(values: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(v.clone())).collect()
}

fn sum_by<'a, K, F>(records: impl Iterator<Item = &'a ProfanityRecord>, key: F) -> Vec<(K, u64)>
where
    K: Eq + Hash + Clone,
    F: Fn(&ProfanityRecord) -> K,
{
    let mut slots: HashMap<K, usize> = HashMap::new();
    let mut sums: Vec<(K, u64)> = Vec::new();
    for record in records {
        let k = key(record);
        match slots.get(&k) {
            Some(&slot) => sums[slot].1 += record.count,
            None => {
                slots.insert(k.clone(), sums.len());
                sums.push((k, record.count));
            }
        }
    }
    sums
}
