use plotters::drawing::DrawingAreaErrorKind;
use thiserror::Error;

/// Everything that can abort a report run. Soft parse failures (dates,
/// numbers) never surface here; they become missing values instead.
#[derive(Debug, Error)]
pub enum EdaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing expected column '{column}' in {path}")]
    MissingColumn { column: String, path: String },

    #[error("chart rendering failed: {0}")]
    Chart(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl<E> From<DrawingAreaErrorKind<E>> for EdaError
where
    E: std::error::Error + Send + Sync,
{
    fn from(err: DrawingAreaErrorKind<E>) -> Self {
        EdaError::Chart(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EdaError>;
