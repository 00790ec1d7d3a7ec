//! # Forgeguard
//!
//! Synchronizer-token CSRF protection middleware.
//!
//! ## Features
//!
//! - ✅ **Synchronizer Token Pattern** - Token issued via cookie, echoed back
//!   through a channel cross-site attackers cannot read
//! - ✅ **Configurable Lookup** - Claimed token read from a header, form
//!   field, query parameter, or path parameter
//! - ✅ **Constant-time Validation** - Comparison cost independent of where
//!   tokens first differ
//! - ✅ **Zero-config Defaults** - Every option has a documented default
//! - ✅ **Bypass Predicate** - Skip protection for selected requests
//! - ✅ **Stateless** - No server-side token storage; the cookie is the only
//!   state, and the token is not rotated across requests
//!
//! ## Quick Start
//!
//! ```rust
//! use forgeguard::{CsrfConfig, CsrfMiddleware};
//!
//! // Usable with zero configuration
//! let csrf = CsrfMiddleware::new(CsrfConfig::default());
//!
//! // Or configured explicitly
//! let config = CsrfConfig::default()
//!     .with_token_lookup("form:csrf_token")
//!     .with_cookie_secure(true)
//!     .with_cookie_http_only(true);
//! let csrf = CsrfMiddleware::new(config);
//! ```
//!
//! ## Request Lifecycle
//!
//! For each request the middleware resolves the *expected* token: the value of
//! the CSRF cookie, or a freshly generated random token when no cookie is
//! present. Safe methods (GET, HEAD, OPTIONS, TRACE) skip validation. All
//! other methods must carry the *claimed* token at the configured lookup
//! location; a missing token is answered with 400 and a mismatched one with
//! 403, both body-less. Accepted requests re-issue the expected token as a
//! cookie, expose it to downstream handlers under the configured context key,
//! and add `Cookie` to the response `Vary` header.
//!
//! ```rust
//! use forgeguard::{CsrfConfig, CsrfMiddleware, HttpRequest, HttpResponse, Middleware, Next};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let csrf = CsrfMiddleware::new(CsrfConfig::default());
//!
//! let handler: Next = Box::new(|req: HttpRequest| {
//!     Box::pin(async move {
//!         // Downstream handlers read the token for embedding in forms
//!         let token = req.context("csrf").cloned().unwrap_or_default();
//!         Ok(HttpResponse::ok().with_body(token))
//!     })
//! });
//!
//! let response = csrf.handle(HttpRequest::new("GET", "/"), handler).await.unwrap();
//! assert!(response.headers.contains_key("Set-Cookie"));
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod http;
pub mod middleware;
pub mod token;

pub use config::{BypassPredicate, CsrfConfig, SameSite};
pub use error::{CsrfError, Result};
pub use extract::TokenLookup;
pub use http::{Error, HttpRequest, HttpResponse, Middleware, Next};
pub use middleware::CsrfMiddleware;
