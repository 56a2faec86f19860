use thiserror::Error;

/// Convenient result alias for the Contrail library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// Estimation itself never returns these; they surface from the explicit
/// override-loading, configuration and sample-loading entry points.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when an override feed parsed but its contents were unusable.
    #[error("invalid burn-rate override from {source_name}: {message}")]
    OverrideParse {
        source_name: String,
        message: String,
    },

    /// Raised when an override feed contained no usable rates or families.
    #[error("burn-rate override from {source_name} contained no usable entries")]
    OverrideFeedEmpty { source_name: String },

    /// Raised when the override server answered with a non-success status.
    #[error("burn-rate override request to {url} failed with status {status}")]
    OverrideStatus { url: String, status: u16 },

    /// Raised when phase-detection configuration values are out of range.
    #[error("invalid phase detection configuration: {message}")]
    InvalidConfig { message: String },

    /// Raised when an altitude sample file cannot be interpreted.
    #[error("invalid altitude sample data: {message}")]
    SampleData { message: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Wrapper for CSV decoding errors.
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
