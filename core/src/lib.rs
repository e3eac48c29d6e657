//! Synchronous client core for the Edamam nutrition API.
//!
//! # Overview
//! Two pieces do the work:
//! - `Request` builds a parameterized call against the API base URL,
//!   validates it, sends it through a pluggable `Transport` and caches the
//!   response until it is explicitly invalidated.
//! - `hydrate` and `NestedRepository` turn decoded JSON into typed models,
//!   copying only whitelisted keys and building nested objects and lists
//!   through per-field transformers.
//!
//! # Design
//! - Each API call is an `Endpoint`: a setter table keyed by parameter name
//!   (its whitelist), a `validate` hook and the pieces of the request.
//! - Credentials are an explicit `Config` value passed to every request.
//! - I/O stays behind `Transport`. `UreqTransport` performs blocking HTTP,
//!   `StaticTransport` replays a canned answer for tests.
//!
//! ```no_run
//! use edamam_core::{Config, FoodSearch, Request, UreqTransport};
//!
//! let config = Config::from_env()?;
//! let mut request: Request<FoodSearch, _> = Request::from_endpoint(
//!     FoodSearch::for_ingredient("1 large apple"),
//!     &config,
//!     UreqTransport::new(),
//! );
//! for food in request.food_results()?.foods() {
//!     println!("{:?}", food.label);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod hydrate;
pub mod models;
pub mod params;
pub mod repository;
pub mod request;
pub mod transport;

pub use config::{Config, Credentials};
pub use endpoints::{FoodSearch, NutritionAnalysis, RecipeSearch};
pub use error::{ConfigError, DecodeError, HydrateError, RequestError, TransportError, ValidationError};
pub use http::{HttpMethod, HttpResponse, Parameters, RequestParameters, Transport};
pub use hydrate::{hydrate, Model, Transformer};
pub use models::{Food, FoodMatch, FoodSearchResults, Measurement, Nutrient, NutritionFacts, Recipe};
pub use params::filter_parameters;
pub use repository::{create_all, NestedRepository};
pub use request::{Endpoint, Request, Setter};
pub use transport::{StaticTransport, UreqTransport};
