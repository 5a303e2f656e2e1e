//! Raw tweet payloads as delivered by the streaming API.
//!
//! Only the fields the pipeline reads are modelled; everything else in the
//! payload is ignored on deserialization.
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTweet {
    pub id_str: Option<String>,
    pub text: Option<String>,
    pub created_at: Option<String>,
    pub coordinates: Option<Point>,
    pub retweeted_status: Option<Box<RetweetedStatus>>,
}

/// GeoJSON point, `[longitude, latitude]`.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Point {
    pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RetweetedStatus {
    #[serde(default)]
    pub truncated: bool,
    pub text: Option<String>,
    pub extended_tweet: Option<ExtendedTweet>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtendedTweet {
    pub full_text: String,
}

impl RawTweet {
    pub fn from_json(line: &str) -> serde_json::Result<Self> {
        serde_json::from_str(line)
    }

    pub fn is_retweet(&self) -> bool {
        self.retweeted_status.is_some()
    }
}

/// The text worth matching: a retweet's original (full text when the
/// original was truncated), else the tweet's own text. `None` when the
/// payload lacks the field that applies.
pub fn extract_text(tweet: &RawTweet) -> Option<&str> {
    match &tweet.retweeted_status {
        Some(original) if original.truncated => original
            .extended_tweet
            .as_ref()
            .map(|extended| extended.full_text.as_str()),
        Some(original) => original.text.as_deref(),
        None => tweet.text.as_deref(),
    }
}
