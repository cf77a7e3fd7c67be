/// Errors surfaced by the reconciliation pipeline.
///
/// Nothing here is retried automatically; every failure is reported to the
/// caller so an empty result can never be mistaken for a failed fetch.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("indicator provider unavailable: {0}")]
    ProviderUnavailable(String),
    #[error("indicator code not recognized by provider: `{0}`")]
    InvalidIndicator(String),
    #[error("malformed tenure record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },
    #[error("tenure and indicator sources share no country codes: {0}")]
    SchemaMismatch(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("I/O error: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("CSV error: `{0}`")]
    Csv(#[from] csv::Error),
    #[error("URL error: `{0}`")]
    Url(#[from] url::ParseError),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // Timeouts and transport failures both mean the provider could not
        // be reached.
        Error::ProviderUnavailable(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
