use thiserror::Error;

/// Why a page could not be fetched.
///
/// The controller turns every variant into one of two generic user-facing
/// messages; the variant itself (and the status code of [`FetchError::HttpError`])
/// is kept for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("response carried no usable HTTP metadata")]
    BadResponse,
    #[error("provider answered with HTTP status {0}")]
    HttpError(u16),
    #[error("failed to decode collection body: {0}")]
    DecodingError(String),
    #[error("transport failure: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpError(code) => Some(*code),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(value: serde_json::Error) -> Self {
        Self::DecodingError(value.to_string())
    }
}
