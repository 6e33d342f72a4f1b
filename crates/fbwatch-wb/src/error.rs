use thiserror::Error;

/// Errors returned by the Wildberries API client.
#[derive(Debug, Error)]
pub enum WbError {
    /// Network, TLS, timeout, or non-2xx status from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An endpoint URL handed to the client could not be parsed.
    #[error("invalid endpoint URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The card endpoint returned no product entries for the article number.
    #[error("product {0} not found")]
    ProductNotFound(i64),

    /// Every feedback mirror either failed or returned an empty collection.
    #[error("no feedback mirror returned data for group {0}")]
    FeedbacksUnavailable(i64),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
