use thiserror::Error;

/// CSRF validation errors, each mapped to the status code the filter replies
/// with. Both are expected occurrences, not pipeline failures: a client that
/// never loaded a page, or a forged cross-site request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CsrfError {
    /// Claimed token absent or empty at the configured source
    #[error("missing CSRF token in {0}")]
    MissingToken(&'static str),

    /// Claimed token present but does not equal the expected token
    #[error("CSRF token mismatch")]
    TokenMismatch,
}

impl CsrfError {
    /// Status code sent to the client, with no response body
    pub fn status_code(&self) -> u16 {
        match self {
            CsrfError::MissingToken(_) => 400,
            CsrfError::TokenMismatch => 403,
        }
    }
}

pub type Result<T> = std::result::Result<T, CsrfError>;
