//! Request lifecycle: mass assignment, request assembly, cached fetch.
//!
//! # Design
//! An `Endpoint` describes one kind of API call: which parameters it
//! accepts (its setter table), how it validates, and what method, path,
//! query and body it contributes. `Request` wraps an endpoint together
//! with credentials, a base URL and a `Transport`, and owns a single
//! response slot.
//!
//! The slot is filled by the first successful `fetch` and cleared only by
//! `invalidate`. Changing endpoint state afterwards does not clear it.
//! `validate` runs on every `fetch`, before the slot is consulted, so a
//! failing precondition hides a cached response.

use log::{debug, trace, warn};
use serde_json::Value;

use crate::config::{Config, Credentials};
use crate::error::{RequestError, TransportError, ValidationError};
use crate::http::{HttpMethod, HttpResponse, Parameters, RequestParameters, Transport};
use crate::hydrate::Model;
use crate::params::filter_parameters;

/// Handler invoked by mass assignment for one whitelisted parameter.
pub type Setter<E> = fn(&mut E, Value);

/// One kind of API call.
pub trait Endpoint: Default + 'static {
    /// Whitelisted parameter names and their handlers.
    const SETTERS: &'static [(&'static str, Setter<Self>)];

    /// Domain preconditions checked before every fetch.
    fn validate(&self) -> Result<(), ValidationError>;

    fn method(&self) -> HttpMethod {
        HttpMethod::Get
    }

    /// Suffix appended to the base URL.
    fn path(&self) -> String {
        String::new()
    }

    fn headers(&self) -> Vec<(String, String)> {
        default_headers()
    }

    /// Endpoint query parameters. Nulls are filtered before sending.
    fn query(&self) -> Parameters {
        Parameters::new()
    }

    /// JSON body parameters. Nulls are filtered before sending.
    fn body(&self) -> Parameters {
        Parameters::new()
    }
}

pub fn default_headers() -> Vec<(String, String)> {
    vec![("Accept-Encoding".to_string(), "gzip".to_string())]
}

/// The parameter names an endpoint accepts.
pub fn whitelist<E: Endpoint>() -> impl Iterator<Item = &'static str> {
    E::SETTERS.iter().map(|(name, _)| *name)
}

/// A single logical API call with a cached response.
pub struct Request<E, T> {
    endpoint: E,
    credentials: Credentials,
    base_url: String,
    transport: T,
    cached: Option<HttpResponse>,
}

impl<E: Endpoint, T: Transport> Request<E, T> {
    /// Build the endpoint from `parameters` through mass assignment.
    /// Nothing is validated or sent yet.
    pub fn new(
        config: &Config,
        transport: T,
        parameters: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        let mut request = Self::from_endpoint(E::default(), config, transport);
        request.set_parameters(parameters);
        request
    }

    pub fn from_endpoint(endpoint: E, config: &Config, transport: T) -> Self {
        Self {
            endpoint,
            credentials: config.credentials.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            transport,
            cached: None,
        }
    }

    /// Shorthand for a request against the production base URL.
    pub fn with_credentials(
        credentials: Credentials,
        transport: T,
        parameters: impl IntoIterator<Item = (String, Value)>,
    ) -> Self {
        Self::new(&Config::new(credentials), transport, parameters)
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Dispatch each whitelisted key to its setter; drop everything else.
    pub fn set_parameters(
        &mut self,
        parameters: impl IntoIterator<Item = (String, Value)>,
    ) -> &mut Self {
        for (key, value) in parameters {
            match E::SETTERS.iter().find(|(name, _)| *name == key) {
                Some((_, setter)) => setter(&mut self.endpoint, value),
                None => trace!("dropping non-whitelisted parameter `{key}`"),
            }
        }
        self
    }

    /// Clear the cached response.
    pub fn invalidate(&mut self) -> &mut Self {
        if self.cached.take().is_some() {
            debug!("response cache invalidated");
        }
        self
    }

    /// Validate, then return the cached response or perform the call and
    /// cache it. A failed call leaves the slot empty.
    pub fn fetch(&mut self) -> Result<&HttpResponse, RequestError> {
        self.endpoint.validate()?;

        let response = match self.cached {
            Some(ref response) => {
                debug!("response cache hit for {}", self.request_url());
                response
            }
            None => {
                let fresh = self.dispatch()?;
                self.cached.insert(fresh)
            }
        };
        Ok(response)
    }

    pub fn response(&self) -> Option<&HttpResponse> {
        self.cached.as_ref()
    }

    /// Fetch and decode the body as JSON.
    pub fn results(&mut self) -> Result<&Value, RequestError> {
        let response = self.fetch()?;
        Ok(response.json()?)
    }

    /// Fetch, decode and hydrate the top-level object into `M`.
    pub fn hydrate_results<M: Model>(&mut self) -> Result<M, RequestError> {
        let body = self.results()?;
        Ok(M::create_from_value("response", body)?)
    }

    pub fn request_method(&self) -> HttpMethod {
        self.endpoint.method()
    }

    pub fn request_url(&self) -> String {
        format!("{}{}", self.base_url, self.request_path())
    }

    pub fn request_path(&self) -> String {
        self.endpoint.path()
    }

    pub fn header_parameters(&self) -> Vec<(String, String)> {
        self.endpoint.headers()
    }

    /// Filtered endpoint parameters plus credentials. Credentials take
    /// precedence over any endpoint parameter with the same name.
    pub fn query_parameters(&self) -> Parameters {
        let mut query = filter_parameters(&self.endpoint.query());
        query.extend(self.credentials.to_parameters());
        query
    }

    pub fn body_parameters(&self) -> Parameters {
        filter_parameters(&self.endpoint.body())
    }

    pub fn filter_parameters(&self, parameters: &Parameters) -> Parameters {
        filter_parameters(parameters)
    }

    pub fn request_parameters(&self) -> RequestParameters {
        RequestParameters {
            body: self.body_parameters(),
            query: self.query_parameters(),
            headers: self.header_parameters(),
        }
    }

    pub fn endpoint(&self) -> &E {
        &self.endpoint
    }

    /// Direct access to endpoint state. Does not invalidate the cache.
    pub fn endpoint_mut(&mut self) -> &mut E {
        &mut self.endpoint
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn dispatch(&self) -> Result<HttpResponse, TransportError> {
        let method = self.request_method();
        let url = self.request_url();
        debug!("response cache miss, sending {method} {url}");
        self.transport
            .send(method, &url, &self.request_parameters())
            .inspect_err(|err| warn!("{method} {url} failed: {err}"))
    }
}
