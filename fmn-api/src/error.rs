/// Error types for the flood-monitoring API library
use thiserror::Error;

/// Main error type for flood-monitoring API operations
#[derive(Error, Debug)]
pub enum ApiError {
    /// HTTP request failed
    #[cfg(feature = "api")]
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("Bad response status: {0}")]
    BadStatus(u16),

    /// Failed to parse CSV data
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// Failed to parse JSON metadata
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Failed to parse a reading timestamp
    #[error("Failed to parse timestamp: {0}")]
    TimestampParse(String),

    /// Station lookup returned no items
    #[error("Station not found: {0}")]
    StationNotFound(String),

    /// No measures matched the requested parameter/qualifier filter
    #[error("No measures found for station {station_id} matching {parameter:?}")]
    NoMatchingMeasures {
        station_id: String,
        parameter: Option<String>,
    },

    /// Date range failed validation
    #[error("Invalid date range: {0}")]
    InvalidDateRange(String),
}

/// Type alias for Results using ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
