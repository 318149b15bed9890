//! # Gateway Layer
//!
//! The remote collection service is the source of truth for both resources.
//! This module describes the contract it must honor as a set of traits, so
//! the rest of the client never knows whether it is talking HTTP.
//!
//! ## Endpoints
//!
//! | Operation | Request | Response |
//! |---|---|---|
//! | list | `GET /{resource}` | array |
//! | get by key | `GET /{resource}/{key}` | entity |
//! | create | `POST /{resource}/save` | created entity |
//! | bulk create | `POST /{resource}/saveAll` | array |
//! | update | `PUT /{resource}/{key}` | updated entity |
//! | delete | `DELETE /{resource}/{key}` | empty |
//! | lookup | `GET /countries/lookup?value=` | entity or empty |
//! | by country code | `GET /prefixes/country/{code}` | array |
//! | by country name | `GET /prefixes/by-country-name?name=` | array |
//!
//! ## Implementations
//!
//! - [`http::HttpGateway`]: production client built on `reqwest`
//! - [`memory::InMemoryGateway`]: server simulation for tests and demo mode
//!
//! Every method returns `Result<_, TransportError>`; callers branch on a
//! closed error shape rather than inspecting arbitrary error objects.

use crate::error::TransportError;
use crate::model::{Country, Prefix, Resource};
use async_trait::async_trait;

pub mod http;
pub mod memory;

pub type GatewayResult<T> = std::result::Result<T, TransportError>;

/// CRUD over one resource collection.
#[async_trait]
pub trait Collection<R: Resource>: Send + Sync {
    async fn list(&self) -> GatewayResult<Vec<R>>;

    async fn get(&self, key: &R::Key) -> GatewayResult<R>;

    /// Create one record. The draft's key, if any, is not trusted.
    async fn create(&self, draft: &R) -> GatewayResult<R>;

    async fn create_all(&self, drafts: &[R]) -> GatewayResult<Vec<R>>;

    async fn update(&self, key: &R::Key, draft: &R) -> GatewayResult<R>;

    async fn delete(&self, key: &R::Key) -> GatewayResult<()>;
}

/// Single-value country lookup. What "matches" means is the server's business.
#[async_trait]
pub trait CountryLookup: Send + Sync {
    /// `Ok(None)` when nothing matched; that is not a failure.
    async fn lookup(&self, value: &str) -> GatewayResult<Option<Country>>;
}

/// Filtered prefix queries.
#[async_trait]
pub trait PrefixFilter: Send + Sync {
    async fn by_country_code(&self, code: &str) -> GatewayResult<Vec<Prefix>>;

    async fn by_country_name(&self, name: &str) -> GatewayResult<Vec<Prefix>>;
}

/// The full service surface used by the API facade.
pub trait Gateway: Collection<Country> + Collection<Prefix> + CountryLookup + PrefixFilter {}

impl<T> Gateway for T where T: Collection<Country> + Collection<Prefix> + CountryLookup + PrefixFilter
{}
