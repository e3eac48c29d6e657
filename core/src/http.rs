//! HTTP types shared by requests and transports.
//!
//! # Design
//! Requests are described as plain data: a method, a URL and the
//! `RequestParameters` triple of body, query and headers. A `Transport`
//! turns that description into an `HttpResponse`. The core never talks to
//! the network itself, so any transport (blocking client, test double) can
//! be plugged in.

use std::fmt;

use once_cell::unsync::OnceCell;
use serde_json::{Map, Value};

use crate::error::{DecodeError, TransportError};

/// Key-value map used for query strings and JSON bodies, kept in insertion order.
pub type Parameters = Map<String, Value>;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a transport needs besides method and URL.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParameters {
    pub body: Parameters,
    pub query: Parameters,
    pub headers: Vec<(String, String)>,
}

/// A raw response plus its lazily decoded JSON body.
///
/// The body is parsed at most once; later calls to `json` reuse the value.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    decoded: OnceCell<Value>,
}

impl HttpResponse {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
            decoded: OnceCell::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decode the body as structured JSON (object, array or scalar).
    pub fn json(&self) -> Result<&Value, DecodeError> {
        self.decoded
            .get_or_try_init(|| serde_json::from_slice(&self.body).map_err(DecodeError::from))
    }
}

/// Performs the actual HTTP round-trip.
///
/// Implementations own every network concern: timeouts, TLS, and the policy
/// for surfacing non-2xx statuses as `TransportError::Status`.
pub trait Transport {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        parameters: &RequestParameters,
    ) -> Result<HttpResponse, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        parameters: &RequestParameters,
    ) -> Result<HttpResponse, TransportError> {
        (**self).send(method, url, parameters)
    }
}
