use crate::extract::DEFAULT_LOOKUP;
use crate::http::HttpRequest;
use std::fmt;
use std::sync::Arc;

/// Predicate deciding whether a request bypasses CSRF protection entirely
pub type BypassPredicate = Arc<dyn Fn(&HttpRequest) -> bool + Send + Sync>;

/// CSRF protection configuration.
///
/// Every option has a default, so `CsrfConfig::default()` yields a usable
/// configuration. Defaults are applied at construction; nothing is resolved
/// per request.
#[derive(Clone)]
pub struct CsrfConfig {
    /// Skip all CSRF logic when this returns true for a request
    pub bypass: Option<BypassPredicate>,

    /// Number of random bytes in a generated token
    pub token_length: usize,

    /// Where to find the claimed token, as `"<source>:<key>"` with
    /// source one of `header`, `form`, `query`, `param`
    pub token_lookup: String,

    /// Request-context key under which the resolved token is exposed
    pub context_key: String,

    /// Name of the cookie transporting the token
    pub cookie_name: String,

    /// Cookie domain, emitted only when set
    pub cookie_domain: Option<String>,

    /// Cookie path, emitted only when set
    pub cookie_path: Option<String>,

    /// Cookie expiry horizon in seconds from time of issuance
    pub cookie_max_age: i64,

    /// Cookie Secure flag
    pub cookie_secure: bool,

    /// Cookie HttpOnly flag
    pub cookie_http_only: bool,

    /// Cookie SameSite attribute, emitted only when set
    pub cookie_same_site: Option<SameSite>,
}

/// Cookie SameSite attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

impl SameSite {
    pub fn as_str(&self) -> &'static str {
        match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        }
    }
}

impl CsrfConfig {
    /// Create a configuration with all defaults applied
    pub fn new() -> Self {
        Self {
            bypass: None,
            token_length: 32,
            token_lookup: DEFAULT_LOOKUP.to_string(),
            context_key: "csrf".to_string(),
            cookie_name: "_csrf".to_string(),
            cookie_domain: None,
            cookie_path: None,
            cookie_max_age: 86400, // 24hr
            cookie_secure: false,
            cookie_http_only: false,
            cookie_same_site: None,
        }
    }

    /// Set a bypass predicate
    pub fn with_bypass<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&HttpRequest) -> bool + Send + Sync + 'static,
    {
        self.bypass = Some(Arc::new(predicate));
        self
    }

    /// Set the generated token length in random bytes
    pub fn with_token_length(mut self, length: usize) -> Self {
        self.token_length = length;
        self
    }

    /// Set the token lookup string
    pub fn with_token_lookup(mut self, lookup: impl Into<String>) -> Self {
        self.token_lookup = lookup.into();
        self
    }

    /// Set the request-context key
    pub fn with_context_key(mut self, key: impl Into<String>) -> Self {
        self.context_key = key.into();
        self
    }

    /// Set the cookie name
    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    /// Set the cookie domain
    pub fn with_cookie_domain(mut self, domain: impl Into<String>) -> Self {
        self.cookie_domain = Some(domain.into());
        self
    }

    /// Set the cookie path
    pub fn with_cookie_path(mut self, path: impl Into<String>) -> Self {
        self.cookie_path = Some(path.into());
        self
    }

    /// Set the cookie max age in seconds
    pub fn with_cookie_max_age(mut self, seconds: i64) -> Self {
        self.cookie_max_age = seconds;
        self
    }

    /// Set the cookie Secure flag
    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Set the cookie HttpOnly flag
    pub fn with_cookie_http_only(mut self, http_only: bool) -> Self {
        self.cookie_http_only = http_only;
        self
    }

    /// Set the cookie SameSite policy
    pub fn with_cookie_same_site(mut self, same_site: SameSite) -> Self {
        self.cookie_same_site = Some(same_site);
        self
    }
}

impl Default for CsrfConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CsrfConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CsrfConfig")
            .field("bypass", &self.bypass.is_some())
            .field("token_length", &self.token_length)
            .field("token_lookup", &self.token_lookup)
            .field("context_key", &self.context_key)
            .field("cookie_name", &self.cookie_name)
            .field("cookie_domain", &self.cookie_domain)
            .field("cookie_path", &self.cookie_path)
            .field("cookie_max_age", &self.cookie_max_age)
            .field("cookie_secure", &self.cookie_secure)
            .field("cookie_http_only", &self.cookie_http_only)
            .field("cookie_same_site", &self.cookie_same_site)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CsrfConfig::default();
        assert!(config.bypass.is_none());
        assert_eq!(config.token_length, 32);
        assert_eq!(config.token_lookup, "header:X-CSRF-Token");
        assert_eq!(config.context_key, "csrf");
        assert_eq!(config.cookie_name, "_csrf");
        assert_eq!(config.cookie_domain, None);
        assert_eq!(config.cookie_path, None);
        assert_eq!(config.cookie_max_age, 86400);
        assert!(!config.cookie_secure);
        assert!(!config.cookie_http_only);
        assert_eq!(config.cookie_same_site, None);
    }

    #[test]
    fn test_builder() {
        let config = CsrfConfig::default()
            .with_token_lookup("form:csrf_token")
            .with_cookie_name("xsrf")
            .with_cookie_path("/app")
            .with_cookie_max_age(3600)
            .with_cookie_secure(true)
            .with_cookie_same_site(SameSite::Lax);

        assert_eq!(config.token_lookup, "form:csrf_token");
        assert_eq!(config.cookie_name, "xsrf");
        assert_eq!(config.cookie_path, Some("/app".to_string()));
        assert_eq!(config.cookie_max_age, 3600);
        assert!(config.cookie_secure);
        assert_eq!(config.cookie_same_site, Some(SameSite::Lax));
    }

    #[test]
    fn test_bypass_predicate() {
        let config = CsrfConfig::default().with_bypass(|req| req.path.starts_with("/webhooks"));
        let bypass = config.bypass.as_ref().unwrap();

        assert!(bypass(&HttpRequest::new("POST", "/webhooks/github")));
        assert!(!bypass(&HttpRequest::new("POST", "/register")));
    }

    #[test]
    fn test_same_site_enum() {
        assert_eq!(SameSite::Strict.as_str(), "Strict");
        assert_eq!(SameSite::Lax.as_str(), "Lax");
        assert_eq!(SameSite::None.as_str(), "None");
    }

    #[test]
    fn test_debug_does_not_require_predicate_debug() {
        let config = CsrfConfig::default().with_bypass(|_| true);
        let rendered = format!("{config:?}");
        assert!(rendered.contains("bypass: true"));
    }
}
