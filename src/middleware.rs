use crate::config::CsrfConfig;
use crate::extract::TokenLookup;
use crate::http::{Error, HttpRequest, HttpResponse, Middleware, Next};
use crate::token;
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{debug, trace};

/// CSRF protection middleware.
///
/// Resolves the expected token from the configured cookie (generating a fresh
/// one when absent), validates non-safe requests against the claimed token
/// extracted per the configured lookup, and on acceptance re-issues the cookie
/// and exposes the token to downstream handlers through the request context.
///
/// Holds only immutable state after construction; a single instance serves
/// any number of in-flight requests.
#[derive(Clone)]
pub struct CsrfMiddleware {
    config: Arc<CsrfConfig>,
    lookup: TokenLookup,
}

impl CsrfMiddleware {
    /// Create new CSRF middleware.
    ///
    /// The token lookup string is parsed into an extraction strategy here,
    /// once per instance.
    pub fn new(config: CsrfConfig) -> Self {
        let lookup = TokenLookup::parse(&config.token_lookup);
        Self {
            config: Arc::new(config),
            lookup,
        }
    }

    /// Resolve the expected token for this request: the current cookie value
    /// verbatim, or a freshly generated token when no cookie is present.
    ///
    /// The cookie value is not re-validated here. An attacker-supplied cookie
    /// only becomes the comparison target, never proof of anything; forgery
    /// still requires echoing that value through a channel cross-site code
    /// cannot read.
    fn expected_token(&self, req: &HttpRequest) -> String {
        match req.cookie(&self.config.cookie_name) {
            Some(value) if !value.is_empty() => value,
            _ => token::generate(self.config.token_length),
        }
    }

    /// Render the Set-Cookie value carrying the token
    fn build_cookie(&self, token: &str) -> String {
        let mut cookie = format!("{}={}", self.config.cookie_name, token);

        if let Some(ref path) = self.config.cookie_path {
            cookie.push_str(&format!("; Path={}", path));
        }

        if let Some(ref domain) = self.config.cookie_domain {
            cookie.push_str(&format!("; Domain={}", domain));
        }

        let expires = Utc::now() + Duration::seconds(self.config.cookie_max_age);
        cookie.push_str(&format!(
            "; Expires={}",
            expires.format("%a, %d %b %Y %H:%M:%S GMT")
        ));

        if self.config.cookie_secure {
            cookie.push_str("; Secure");
        }

        if self.config.cookie_http_only {
            cookie.push_str("; HttpOnly");
        }

        if let Some(same_site) = self.config.cookie_same_site {
            cookie.push_str(&format!("; SameSite={}", same_site.as_str()));
        }

        cookie
    }
}

/// Methods RFC 7231 defines as safe, exempt from validation
fn is_safe_method(method: &str) -> bool {
    matches!(method, "GET" | "HEAD" | "OPTIONS" | "TRACE")
}

#[async_trait::async_trait]
impl Middleware for CsrfMiddleware {
    async fn handle(&self, mut req: HttpRequest, next: Next) -> Result<HttpResponse, Error> {
        if let Some(ref bypass) = self.config.bypass {
            if bypass(&req) {
                trace!(method = %req.method, path = %req.path, "bypassing CSRF protection");
                return next(req).await;
            }
        }

        let expected = self.expected_token(&req);

        if !is_safe_method(&req.method) {
            let claimed = match self.lookup.extract(&req) {
                Ok(claimed) => claimed,
                Err(e) => {
                    debug!(method = %req.method, path = %req.path, error = %e, "rejecting request");
                    return Ok(HttpResponse::new(e.status_code()));
                }
            };

            if !token::tokens_match(&expected, &claimed) {
                debug!(method = %req.method, path = %req.path, "CSRF token mismatch");
                return Ok(HttpResponse::forbidden());
            }
        }

        // Expose the token to downstream handlers before passing control
        req.set_context(&self.config.context_key, expected.clone());

        let mut response = next(req).await?;

        response
            .headers
            .insert("Set-Cookie".to_string(), self.build_cookie(&expected));

        // Keep caches from serving one user's token to another
        response.add_vary("Cookie");

        Ok(response)
    }
}
