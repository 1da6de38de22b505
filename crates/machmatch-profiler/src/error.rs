use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProfilerError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("completion API returned status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("completion response carried no text content")]
    EmptyCompletion,

    #[error("no JSON array found in completion for {context}")]
    MissingArray { context: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
