use thiserror::Error;

/// Failures talking to the stream store. Never fatal for a batch.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to stream store failed: {0}")]
    Http(String),

    #[error("invalid stream store response: {0}")]
    Decode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid stored JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

    #[error("missing required setting: {0}")]
    MissingField(&'static str),

    #[error("invalid config: {0}")]
    Invalid(&'static str),
}

/// Bad JSON handed to one of the `*_json` entry points.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("parse error ({what}) at {path}: {message}")]
    Parse {
        what: &'static str,
        path: String,
        message: String,
    },

    #[error("cannot serialize result: {0}")]
    Serialize(#[from] serde_json::Error),
}
