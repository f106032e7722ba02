use reqwest::StatusCode;

/// Failures of a single REST call
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{status} : {body}")]
    Status { status: StatusCode, body: String },

    #[error("Couldn't unmarshal response: {source}\n {body}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("Couldn't marshal request body: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Invalid request URL '{0}'")]
    InvalidUrl(String),
}

impl ApiError {
    /// The server answers 424 when the target node is configured inactive
    pub fn is_node_inactive(&self) -> bool {
        matches!(self, ApiError::Status { status, .. } if *status == StatusCode::FAILED_DEPENDENCY)
    }
}
