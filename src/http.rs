//! HTTP boundary types for the middleware pipeline.
//!
//! The CSRF filter only needs an abstract request/response capability from its
//! host: read a header, query, form, or path value, read and write the CSRF
//! cookie, stash a per-request context value, and either short-circuit with a
//! status code or hand control to the next handler. These types are that
//! boundary; a host server populates `HttpRequest` and drives the
//! [`Middleware`] chain.

use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Pipeline error type surfaced by handlers downstream of the filter.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    pub fn status_code(&self) -> u16 {
        match self {
            Error::BadRequest(_) => 400,
            Error::Forbidden(_) => 403,
            Error::Internal(_) => 500,
        }
    }
}

/// HTTP request wrapper
#[derive(Debug, Clone, Default)]
pub struct HttpRequest {
    /// Uppercase HTTP verb
    pub method: String,
    pub path: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    pub path_params: HashMap<String, String>,
    pub query_params: HashMap<String, String>,
    /// Per-request values visible to downstream handlers in the same pipeline
    pub context: HashMap<String, String>,
}

impl HttpRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set a request header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a query-string parameter
    pub fn with_query_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Set a path/route parameter
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    /// Get a header by name, trying the exact name then its lowercase form
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(name)
            .or_else(|| self.headers.get(&name.to_lowercase()))
            .map(String::as_str)
    }

    /// Get a path parameter by name
    pub fn param(&self, name: &str) -> Option<&String> {
        self.path_params.get(name)
    }

    /// Get a query parameter by name
    pub fn query(&self, name: &str) -> Option<&String> {
        self.query_params.get(name)
    }

    /// Get a cookie value from the `Cookie` header
    pub fn cookie(&self, name: &str) -> Option<String> {
        let header = self.header("Cookie")?;
        for pair in header.split(';') {
            if let Some((key, value)) = pair.trim().split_once('=') {
                if key == name {
                    return Some(value.to_string());
                }
            }
        }
        None
    }

    /// Get a form field from the request body.
    ///
    /// Tries URL-encoded form data first, then a top-level field of a JSON
    /// object body.
    pub fn form_value(&self, name: &str) -> Option<String> {
        if let Ok(pairs) = serde_urlencoded::from_bytes::<Vec<(String, String)>>(&self.body) {
            for (key, value) in pairs {
                if key == name {
                    return Some(value);
                }
            }
        }

        if let Ok(json) = serde_json::from_slice::<Value>(&self.body) {
            if let Some(value) = json.get(name) {
                return value.as_str().map(|s| s.to_string());
            }
        }

        None
    }

    /// Store a per-request value for downstream handlers
    pub fn set_context(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.context.insert(key.into(), value.into());
    }

    /// Get a per-request value stored by an upstream middleware
    pub fn context(&self, key: &str) -> Option<&String> {
        self.context.get(key)
    }
}

/// HTTP response wrapper
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: HashMap::new(),
            body: Vec::new(),
        }
    }

    pub fn ok() -> Self {
        Self::new(200)
    }

    pub fn bad_request() -> Self {
        Self::new(400)
    }

    pub fn forbidden() -> Self {
        Self::new(403)
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Merge a member into the `Vary` header without clobbering or duplicating
    pub fn add_vary(&mut self, value: &str) {
        match self.headers.get_mut("Vary") {
            Some(existing) => {
                let present = existing
                    .split(',')
                    .any(|member| member.trim().eq_ignore_ascii_case(value));
                if !present {
                    existing.push_str(", ");
                    existing.push_str(value);
                }
            }
            None => {
                self.headers.insert("Vary".to_string(), value.to_string());
            }
        }
    }
}

/// Type alias for the next handler in the middleware chain
pub type Next = Box<
    dyn FnOnce(HttpRequest) -> Pin<Box<dyn Future<Output = Result<HttpResponse, Error>> + Send>>
        + Send,
>;

/// Middleware trait for processing requests before they reach the handler
#[async_trait::async_trait]
pub trait Middleware: Send + Sync {
    /// Process the request and optionally pass to the next handler
    async fn handle(&self, req: HttpRequest, next: Next) -> Result<HttpResponse, Error>;
}
