//! Which tweets get stored, and in what form.
use ppi_core::profanity::text_contains_profanity;
use ppi_core::TweetDocument;

use crate::tweet::{extract_text, RawTweet};

/// A tweet whose text cannot be extracted is not profane.
pub fn contains_profanity(tweet: &RawTweet) -> bool {
    extract_text(tweet).is_some_and(text_contains_profanity)
}

/// Indexable document keyed by `id_str`. `None` if the payload is missing
/// the id, the timestamp or the text.
pub fn to_document(tweet: &RawTweet) -> Option<TweetDocument> {
    Some(TweetDocument {
        id: tweet.id_str.clone()?,
        coordinates: tweet.coordinates.map(|point| point.coordinates),
        text: extract_text(tweet)?.to_string(),
        created_at: tweet.created_at.clone()?,
    })
}
