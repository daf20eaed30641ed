use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, ScanError>;

/// Failure to retrieve a single page. Recorded on the page, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("request timed out")]
    Timeout,

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("could not read body: {0}")]
    Body(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = err.status() {
            FetchError::Status(status.as_u16())
        } else if err.is_body() || err.is_decode() {
            FetchError::Body(err.to_string())
        } else {
            FetchError::Request(err.to_string())
        }
    }
}

/// A fetched document that could not be turned into links.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("not an HTML document ({0})")]
    NotHtml(String),

    #[error("invalid selector '{0}'")]
    InvalidSelector(String),
}

/// Why a raw link reference was discarded during normalization.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationReject {
    #[error("empty reference")]
    Empty,

    #[error("fragment-only reference")]
    FragmentOnly,

    #[error("script protocol")]
    ScriptProtocol,

    #[error("mail or telephone protocol")]
    MailProtocol,

    #[error("unparseable reference")]
    Unparseable,

    #[error("unsupported scheme")]
    UnsupportedScheme,
}
