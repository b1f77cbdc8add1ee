//! Error types for influxql-client.

use thiserror::Error;

/// Error type for influxql-client operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to deserialize a JSON configuration.
    #[error("Failed to deserialize configuration: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The server URL could not be parsed.
    #[error("Invalid InfluxDB URL '{url}': {source}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        source: url::ParseError,
    },

    /// A configuration value is missing or empty.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The server answered with a status other than the one the operation expects.
    #[error("Unexpected HTTP status: expected {expected}, got {actual}")]
    UnexpectedStatus {
        /// Status that signals success for the operation (204 write, 200 query).
        expected: u16,
        /// Status the server returned.
        actual: u16,
        /// Response body, usually InfluxDB's error message.
        body: String,
    },

    /// The query response has no data row.
    #[error("No values in response")]
    EmptyResult,

    /// The requested field does not exist in the data row.
    #[error("Field {field} out of range: data row has {available} fields")]
    FieldOutOfRange {
        /// Requested 1-based field number.
        field: usize,
        /// Number of fields in the data row.
        available: usize,
    },

    /// No header column with the given name.
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Failed to read the CSV header row.
    #[error("CSV parse error: {0}")]
    Csv(String),

    /// Failed to parse a value from the response.
    #[error("Failed to parse value: {message}")]
    Parse {
        /// Description of what failed to parse.
        message: String,
    },

    /// The operation needs a default measurement but none is configured.
    #[error("No default measurement configured")]
    MissingMeasurement,
}

/// Result type alias for influxql-client operations.
pub type Result<T> = std::result::Result<T, Error>;
