//! `Transport` implementations.
//!
//! `UreqTransport` performs real blocking HTTP calls. `StaticTransport`
//! answers every call with a canned outcome and records what it was asked
//! to send, for tests of code built on `Request`.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use log::{debug, warn};
use ureq::{Agent, RequestBuilder};

use crate::error::TransportError;
use crate::http::{HttpMethod, HttpResponse, RequestParameters, Transport};
use crate::params::query_pairs;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking transport backed by a `ureq` agent.
///
/// Any status outside 2xx is reported as `TransportError::Status` with the
/// response body as text.
#[derive(Clone)]
pub struct UreqTransport {
    agent: Agent,
}

impl UreqTransport {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for UreqTransport {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        parameters: &RequestParameters,
    ) -> Result<HttpResponse, TransportError> {
        let query = query_pairs(&parameters.query);
        let headers = &parameters.headers;

        let result = match method {
            HttpMethod::Get => decorate(self.agent.get(url), &query, headers).call(),
            HttpMethod::Delete => decorate(self.agent.delete(url), &query, headers).call(),
            HttpMethod::Post | HttpMethod::Put => {
                let body = serde_json::to_vec(&parameters.body).map_err(|err| {
                    TransportError::Network {
                        message: format!("could not encode request body: {err}"),
                    }
                })?;
                let builder = match method {
                    HttpMethod::Put => self.agent.put(url),
                    _ => self.agent.post(url),
                };
                decorate(builder, &query, headers)
                    .content_type("application/json")
                    .send(body.as_slice())
            }
        };

        let mut response = result.map_err(network_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.body_mut().read_to_vec().map_err(network_error)?;
        debug!("{method} {url} -> {status}");

        let response = HttpResponse::new(status, headers, body);
        if !response.is_success() {
            warn!("{method} {url} returned HTTP {status}");
            return Err(TransportError::Status {
                status,
                body: response.text(),
            });
        }

        Ok(response)
    }
}

fn decorate<B>(
    mut builder: RequestBuilder<B>,
    query: &[(String, String)],
    headers: &[(String, String)],
) -> RequestBuilder<B> {
    for (key, value) in query {
        builder = builder.query(key, value);
    }
    for (key, value) in headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}

fn network_error(err: ureq::Error) -> TransportError {
    TransportError::Network {
        message: err.to_string(),
    }
}

/// A sent request as seen by `StaticTransport`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: HttpMethod,
    pub url: String,
    pub parameters: RequestParameters,
}

/// Canned transport that counts calls and keeps the last request.
#[derive(Debug)]
pub struct StaticTransport {
    outcome: Result<(u16, Vec<u8>), TransportError>,
    calls: Cell<usize>,
    last: RefCell<Option<RecordedRequest>>,
}

impl StaticTransport {
    /// Answer with status 200 and `body`.
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self::from_outcome(Ok((status, body.into())))
    }

    pub fn failing(error: TransportError) -> Self {
        Self::from_outcome(Err(error))
    }

    fn from_outcome(outcome: Result<(u16, Vec<u8>), TransportError>) -> Self {
        Self {
            outcome,
            calls: Cell::new(0),
            last: RefCell::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last.borrow().clone()
    }

    pub fn last_parameters(&self) -> Option<RequestParameters> {
        self.last_request().map(|request| request.parameters)
    }
}

impl Transport for StaticTransport {
    fn send(
        &self,
        method: HttpMethod,
        url: &str,
        parameters: &RequestParameters,
    ) -> Result<HttpResponse, TransportError> {
        self.calls.set(self.calls.get() + 1);
        *self.last.borrow_mut() = Some(RecordedRequest {
            method,
            url: url.to_string(),
            parameters: parameters.clone(),
        });
        match &self.outcome {
            Ok((status, body)) => Ok(HttpResponse::new(*status, Vec::new(), body.clone())),
            Err(err) => Err(err.clone()),
        }
    }
}
