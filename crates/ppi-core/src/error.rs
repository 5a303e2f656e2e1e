//! Unified Error Model
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PpiError {
    /// A caller-supplied argument is unusable (empty subject list, inverted range, ...)
    #[error("ARG/{name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    #[error("TIME/{0}")]
    Timestamp(String),

    #[error("CONFIG/{0}")]
    Config(String),

    /// The search service could not be reached or its body could not be read
    #[error("TRANSPORT/{0}")]
    Transport(String),

    /// The search service answered with a non-success status
    #[error("SERVICE/{status}: {body}")]
    Service { status: u16, body: String },

    /// The search response is missing structure the extraction depends on
    #[error("SHAPE/{0}")]
    ResponseShape(String),

    #[error("SERIALIZE/{0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO/{0}")]
    Io(#[from] std::io::Error),
}

impl PpiError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PpiError>;
