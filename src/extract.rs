//! Claimed-token extraction strategies.
//!
//! The lookup string `"<source>:<key>"` is parsed once at middleware
//! construction into a [`TokenLookup`] variant; per-request extraction is a
//! tagged dispatch, never a string branch.

use crate::error::{CsrfError, Result};
use crate::http::HttpRequest;
use tracing::warn;

/// Default lookup when none is configured or the configured one is malformed
pub const DEFAULT_LOOKUP: &str = "header:X-CSRF-Token";

const DEFAULT_HEADER: &str = "X-CSRF-Token";

/// Token extraction strategies
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLookup {
    /// Read a named request header
    Header(String),
    /// Read a named form-encoded (or JSON) body field
    Form(String),
    /// Read a named query-string parameter
    Query(String),
    /// Read a named path/route parameter
    Param(String),
}

impl TokenLookup {
    /// Parse a `"<source>:<key>"` lookup string.
    ///
    /// An unrecognized source degrades to header extraction with the given
    /// key; a malformed string degrades to the full default lookup. Neither
    /// fails construction.
    pub fn parse(lookup: &str) -> Self {
        let (source, key) = match lookup.split_once(':') {
            Some((source, key)) if !key.is_empty() => (source, key),
            _ => {
                warn!(lookup, "malformed token lookup, using default header");
                return Self::Header(DEFAULT_HEADER.to_string());
            }
        };

        match source {
            "header" => Self::Header(key.to_string()),
            "form" => Self::Form(key.to_string()),
            "query" => Self::Query(key.to_string()),
            "param" => Self::Param(key.to_string()),
            other => {
                warn!(source = other, "unrecognized token source, using header");
                Self::Header(key.to_string())
            }
        }
    }

    /// Extract the claimed token from the request.
    ///
    /// Fails with [`CsrfError::MissingToken`] when the value is absent or
    /// empty at the configured source.
    pub fn extract(&self, req: &HttpRequest) -> Result<String> {
        let (token, source) = match self {
            Self::Header(name) => (req.header(name).map(str::to_string), "header"),
            Self::Form(name) => (req.form_value(name), "form"),
            Self::Query(name) => (req.query(name).cloned(), "query string"),
            Self::Param(name) => (req.param(name).cloned(), "url parameter"),
        };

        match token {
            Some(token) if !token.is_empty() => Ok(token),
            _ => Err(CsrfError::MissingToken(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_sources() {
        assert_eq!(
            TokenLookup::parse("header:X-CSRF-Token"),
            TokenLookup::Header("X-CSRF-Token".to_string())
        );
        assert_eq!(
            TokenLookup::parse("form:csrf_token"),
            TokenLookup::Form("csrf_token".to_string())
        );
        assert_eq!(
            TokenLookup::parse("query:csrf_token"),
            TokenLookup::Query("csrf_token".to_string())
        );
        assert_eq!(
            TokenLookup::parse("param:csrf"),
            TokenLookup::Param("csrf".to_string())
        );
    }

    #[test]
    fn test_parse_unrecognized_source_falls_back_to_header() {
        assert_eq!(
            TokenLookup::parse("body:csrf_token"),
            TokenLookup::Header("csrf_token".to_string())
        );
    }

    #[test]
    fn test_parse_malformed_falls_back_to_default() {
        assert_eq!(
            TokenLookup::parse("nonsense"),
            TokenLookup::Header("X-CSRF-Token".to_string())
        );
        assert_eq!(
            TokenLookup::parse("header:"),
            TokenLookup::Header("X-CSRF-Token".to_string())
        );
    }

    #[test]
    fn test_extract_header() {
        let lookup = TokenLookup::parse(DEFAULT_LOOKUP);
        let req = HttpRequest::new("POST", "/").with_header("X-CSRF-Token", "abc");
        assert_eq!(lookup.extract(&req).unwrap(), "abc");
    }

    #[test]
    fn test_extract_missing_header() {
        let lookup = TokenLookup::parse(DEFAULT_LOOKUP);
        let req = HttpRequest::new("POST", "/");
        assert_eq!(
            lookup.extract(&req),
            Err(CsrfError::MissingToken("header"))
        );
    }

    #[test]
    fn test_extract_empty_value_is_missing() {
        let lookup = TokenLookup::parse(DEFAULT_LOOKUP);
        let req = HttpRequest::new("POST", "/").with_header("X-CSRF-Token", "");
        assert!(lookup.extract(&req).is_err());
    }

    #[test]
    fn test_extract_form_field() {
        let lookup = TokenLookup::parse("form:csrf_token");
        let req = HttpRequest::new("POST", "/").with_body("csrf_token=abc&name=bob");
        assert_eq!(lookup.extract(&req).unwrap(), "abc");
    }

    #[test]
    fn test_extract_query_param() {
        let lookup = TokenLookup::parse("query:csrf_token");
        let req = HttpRequest::new("POST", "/").with_query_param("csrf_token", "abc");
        assert_eq!(lookup.extract(&req).unwrap(), "abc");
    }

    #[test]
    fn test_extract_query_ignores_other_surfaces() {
        // Token supplied only as a form field while query extraction is active
        let lookup = TokenLookup::parse("query:csrf_token");
        let req = HttpRequest::new("POST", "/").with_body("csrf_token=abc");
        assert_eq!(
            lookup.extract(&req),
            Err(CsrfError::MissingToken("query string"))
        );
    }

    #[test]
    fn test_extract_path_param() {
        let lookup = TokenLookup::parse("param:csrf");
        let req = HttpRequest::new("POST", "/submit/abc").with_path_param("csrf", "abc");
        assert_eq!(lookup.extract(&req).unwrap(), "abc");
    }
}
