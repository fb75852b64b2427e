use thiserror::Error;

/// Unified error type for the entire battery-roi-core library.
/// Every public fallible function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Pure computation ────────────────────────────────────────────
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Malformed analysis result: {0}")]
    MalformedResult(String),

    // ── Ingestion ───────────────────────────────────────────────────
    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("Required column not found: {0}")]
    MissingColumn(String),

    #[error("Price file contains no usable rows")]
    EmptySeries,

    // ── Facade state ────────────────────────────────────────────────
    #[error("No price data loaded — upload a price file first")]
    NoData,

    // ── Serialization / I/O ─────────────────────────────────────────
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("File I/O error: {0}")]
    FileIO(String),
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::FileIO(e.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        CoreError::Deserialization(e.to_string())
    }
}

impl From<calamine::XlsxError> for CoreError {
    fn from(e: calamine::XlsxError) -> Self {
        CoreError::InvalidFileFormat(e.to_string())
    }
}

impl From<csv::Error> for CoreError {
    fn from(e: csv::Error) -> Self {
        CoreError::InvalidFileFormat(e.to_string())
    }
}
