//! PPI Core: data model, profanity vocabulary, timestamps and settings
//!
//! Everything the query, collection and output crates agree on lives here.

pub mod config;
pub mod data_model;
pub mod error;
pub mod profanity;
pub mod time;

pub use config::Settings;
pub use data_model::{ProfanityRecord, SubjectSet, TimeRange, TweetDocument};
pub use error::{PpiError, Result};
pub use profanity::ProfanityMapping;

/// Engine version reported by the API and CLI
pub const PPI_VERSION: &str = env!("CARGO_PKG_VERSION");
