use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {status} for {url}")]
    HttpStatus { status: u16, url: String },

    #[error("stage '{0}' has no vlr.gg id configured")]
    MissingStageId(String),

    #[error("invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },
}

pub type SourceResult<T> = Result<T, SourceError>;
