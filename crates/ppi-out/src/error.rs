use thiserror::Error;

/// Errors that can occur while exporting or rendering
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0} is not a supported color scheme.")]
    UnknownColorScheme(String),
    #[error("Site config invalid: {0}")]
    Config(String),
    #[error("Template load failed: {0}")]
    Template(String),
    #[error("Render failed: {0}")]
    Render(String),
    #[error("CSV line {line}: {reason}")]
    Csv { line: usize, reason: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RenderError>;
