use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UiError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<reqwest::Error>,
    },

    #[error("{url} answered with status {status}")]
    Status { url: String, status: StatusCode },

    #[error("malformed response from {url}: {source}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("element is missing the `{attr}` attribute")]
    MissingAttribute { attr: &'static str },

    #[error("attribute `{attr}` has malformed value {value:?}")]
    MalformedAttribute { attr: &'static str, value: String },

    #[error("no element with id `{0}` in the document")]
    MissingElement(&'static str),

    #[error("invalid configuration for {key}: {value:?}")]
    InvalidConfig { key: &'static str, value: String },
}

impl UiError {
    pub fn transport(url: impl Into<String>, err: reqwest::Error) -> Self {
        Self::Transport {
            url: url.into(),
            source: Box::new(err),
        }
    }

    /// Network-side failures, as opposed to a broken page contract.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Status { .. } | Self::MalformedResponse { .. }
        )
    }
}
