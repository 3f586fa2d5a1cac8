//! Request model: verbs, URL normalization, routing and body coercion.
//!
//! Wire shape:
//!
//! ```text
//! { "request_id": "17", "body": { "method": "GET", "url": "/users/4", "body": null } }
//! ```

use crate::domain::envelope::Envelope;
use crate::domain::errors;
use crate::domain::id::RequestIdGenerator;
use crate::error::ParseMethodError;
use crate::ports::inbound::Validatable;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;
use tracing::debug;

/// Request verbs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    /// Canonical upper-case name
    pub const fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = ParseMethodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_method(s).as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "PATCH" => Ok(Method::Patch),
            "DELETE" => Ok(Method::Delete),
            _ => Err(ParseMethodError(s.to_string())),
        }
    }
}

/// First path segment and the remainder, computed once per request.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RouteSplit {
    prefix: String,
    remainder: String,
}

impl RouteSplit {
    fn from_url(url: &str) -> Self {
        let url = url.strip_prefix('/').unwrap_or(url);
        let mut parts = url.splitn(2, '/');
        let first = parts.next().unwrap_or_default();
        let rest = parts.next().unwrap_or_default();

        Self {
            prefix: format!("/{}", first),
            remainder: format!("/{}", rest),
        }
    }
}

/// HTTP-style part of a request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpRequest {
    #[serde(default)]
    method: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    body: Value,
    #[serde(skip)]
    route: OnceLock<RouteSplit>,
}

/// A request travelling over the transport.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Request {
    /// Correlation ID, echoed back by the response
    #[serde(rename = "request_id", default)]
    pub id: String,
    #[serde(rename = "body", default)]
    http: HttpRequest,
}

impl Request {
    /// Build a request with an explicit ID.
    ///
    /// The URL is normalized: surrounding whitespace and trailing slashes are
    /// removed and a leading slash is enforced.
    pub fn new(id: impl Into<String>, method: Method, url: &str, body: Value) -> Self {
        Self {
            id: id.into(),
            http: HttpRequest {
                method: method.as_str().to_string(),
                url: normalize_url(url),
                body,
                route: OnceLock::new(),
            },
        }
    }

    /// `GET` request stamped with a fresh ID.
    pub fn get(ids: &RequestIdGenerator, url: &str) -> Self {
        Self::new(ids.next_id(), Method::Get, url, Value::Null)
    }

    /// `POST` request stamped with a fresh ID.
    pub fn post(ids: &RequestIdGenerator, url: &str, body: impl Into<Value>) -> Self {
        Self::new(ids.next_id(), Method::Post, url, body.into())
    }

    /// `PUT` request stamped with a fresh ID.
    pub fn put(ids: &RequestIdGenerator, url: &str, body: impl Into<Value>) -> Self {
        Self::new(ids.next_id(), Method::Put, url, body.into())
    }

    /// `PATCH` request stamped with a fresh ID.
    pub fn patch(ids: &RequestIdGenerator, url: &str, body: impl Into<Value>) -> Self {
        Self::new(ids.next_id(), Method::Patch, url, body.into())
    }

    /// `DELETE` request stamped with a fresh ID.
    pub fn delete(ids: &RequestIdGenerator, url: &str) -> Self {
        Self::new(ids.next_id(), Method::Delete, url, Value::Null)
    }

    /// Raw method string as carried on the wire
    pub fn method(&self) -> &str {
        &self.http.method
    }

    /// Method parsed into a known verb
    pub fn parsed_method(&self) -> Result<Method, ParseMethodError> {
        self.http.method.parse()
    }

    pub fn url(&self) -> &str {
        &self.http.url
    }

    /// Replace the URL.
    ///
    /// Does not touch an already computed prefix split.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.http.url = url.into();
    }

    pub fn body(&self) -> &Value {
        &self.http.body
    }

    /// `"METHOD URL"`
    pub fn route(&self) -> String {
        format!("{} {}", self.http.method, self.http.url)
    }

    /// First path segment of the URL, e.g. `/a` for `/a/b/c`.
    ///
    /// Computed on first use and cached together with the remainder. Later
    /// calls return the cached segment even if the URL has changed since.
    pub fn prefix(&self) -> &str {
        &self.route_split().prefix
    }

    /// `"METHOD REMAINDER"` where the remainder is the URL with its first
    /// segment stripped, e.g. `GET /b/c` for `GET /a/b/c`.
    pub fn route_without_prefix(&self) -> String {
        format!("{} {}", self.http.method, self.route_split().remainder)
    }

    fn route_split(&self) -> &RouteSplit {
        self.http
            .route
            .get_or_init(|| RouteSplit::from_url(&self.http.url))
    }

    /// Body as an integer.
    pub fn int(&self) -> Result<i64, Envelope> {
        self.http
            .body
            .as_i64()
            .ok_or_else(|| errors::bad_request("Please supply an integer"))
    }

    /// Body as a boolean.
    pub fn bool(&self) -> Result<bool, Envelope> {
        self.http
            .body
            .as_bool()
            .ok_or_else(|| errors::bad_request("Please supply a boolean"))
    }

    /// Body as a string.
    pub fn string(&self) -> Result<&str, Envelope> {
        self.http
            .body
            .as_str()
            .ok_or_else(|| errors::bad_request("Please supply a string"))
    }

    /// Body as a double.
    ///
    /// Accepts double and single precision values as well as integers.
    pub fn float(&self) -> Result<f64, Envelope> {
        match &self.http.body {
            Value::Number(number) => number
                .as_f64()
                .ok_or_else(|| errors::bad_request("Please supply a float")),
            _ => Err(errors::bad_request("Please supply a float")),
        }
    }

    /// Decode an object body into `T` and run its validation.
    ///
    /// Returns a bad request envelope when the body is not an object or does
    /// not decode, otherwise whatever `T::validate` returns.
    pub fn decode_body<T>(&self) -> Result<T, Envelope>
    where
        T: DeserializeOwned + Validatable,
    {
        if !self.http.body.is_object() {
            return Err(errors::bad_request("Please supply an object body"));
        }

        let destination: T = serde_json::from_value(self.http.body.clone()).map_err(|e| {
            debug!(request_id = %self.id, error = %e, "Failed to decode request body");
            errors::bad_request("Failed to decode request")
        })?;

        destination.validate()?;
        Ok(destination)
    }

    /// Apply wire normalization to the method and URL.
    pub(crate) fn normalize(&mut self) {
        self.http.url = normalize_url(&self.http.url);
        self.http.method = normalize_method(&self.http.method);
    }
}

/// Trim whitespace and trailing slashes, then enforce a leading slash.
pub fn normalize_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Trim whitespace and upper-case.
pub fn normalize_method(method: &str) -> String {
    method.trim().to_uppercase()
}
