//! HTTP client for the collection service.

use super::{Collection, CountryLookup, GatewayResult, PrefixFilter};
use crate::config::GatewayConfig;
use crate::error::{DialbookError, Result, TransportError};
use crate::model::{Country, Prefix, Resource, ResourceKind};
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

/// Longest slice of an error body kept in a [`TransportError`] message.
const ERROR_BODY_EXCERPT: usize = 200;

/// A raw 2xx answer from the service.
struct Reply {
    status: StatusCode,
    body: Vec<u8>,
}

impl Reply {
    fn is_empty(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }

    fn decode<T: DeserializeOwned>(&self) -> GatewayResult<T> {
        serde_json::from_slice(&self.body)
            .map_err(|e| TransportError::malformed(Some(self.status.as_u16()), e.to_string()))
    }
}

/// Gateway client speaking JSON over HTTP.
pub struct HttpGateway {
    client: Client,
    base: Url,
    config: GatewayConfig,
}

impl HttpGateway {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let base = Url::parse(&config.base_url).map_err(|e| {
            DialbookError::Config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;
        if base.cannot_be_a_base() {
            return Err(DialbookError::Config(format!(
                "Base URL '{}' cannot carry a path",
                config.base_url
            )));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| DialbookError::Config(format!("Cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base,
            config,
        })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// `{base}/{resource path}/{segments...}`, each segment percent-encoded.
    pub fn endpoint(&self, kind: ResourceKind, segments: &[&str]) -> GatewayResult<Url> {
        let mut url = self.base.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                TransportError::unreachable(format!("base URL {} cannot carry a path", self.base))
            })?;
            path.pop_if_empty();
            for part in self.config.path_for(kind).split('/') {
                if !part.is_empty() {
                    path.push(part);
                }
            }
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    fn endpoint_with_query(
        &self,
        kind: ResourceKind,
        segments: &[&str],
        name: &str,
        value: &str,
    ) -> GatewayResult<Url> {
        let mut url = self.endpoint(kind, segments)?;
        url.query_pairs_mut().append_pair(name, value);
        Ok(url)
    }

    async fn execute<B>(&self, method: Method, url: Url, body: Option<&B>) -> GatewayResult<Reply>
    where
        B: Serialize + ?Sized + Sync,
    {
        debug!(%method, %url, "gateway request");

        let mut request = self.client.request(method.clone(), url.clone());
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();
        debug!(%method, %url, status = status.as_u16(), bytes = body.len(), "gateway response");

        if !status.is_success() {
            return Err(TransportError::status(status.as_u16(), excerpt(&body)));
        }
        Ok(Reply { status, body })
    }

    async fn fetch(&self, url: Url) -> GatewayResult<Reply> {
        self.execute::<()>(Method::GET, url, None).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::unreachable(err.to_string())
    } else if err.is_decode() || err.is_body() {
        TransportError::malformed(err.status().map(|s| s.as_u16()), err.to_string())
    } else if let Some(status) = err.status() {
        TransportError::status(status.as_u16(), err.to_string())
    } else {
        TransportError::unreachable(err.to_string())
    }
}

fn excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    match text.char_indices().nth(ERROR_BODY_EXCERPT) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

#[async_trait]
impl<R: Resource> Collection<R> for HttpGateway {
    async fn list(&self) -> GatewayResult<Vec<R>> {
        let url = self.endpoint(R::KIND, &[])?;
        self.fetch(url).await?.decode()
    }

    async fn get(&self, key: &R::Key) -> GatewayResult<R> {
        let key = key.to_string();
        let url = self.endpoint(R::KIND, &[&key])?;
        self.fetch(url).await?.decode()
    }

    async fn create(&self, draft: &R) -> GatewayResult<R> {
        let url = self.endpoint(R::KIND, &["save"])?;
        let body = draft.for_create();
        self.execute(Method::POST, url, Some(&body)).await?.decode()
    }

    async fn create_all(&self, drafts: &[R]) -> GatewayResult<Vec<R>> {
        let url = self.endpoint(R::KIND, &["saveAll"])?;
        let body: Vec<R> = drafts.iter().map(Resource::for_create).collect();
        self.execute(Method::POST, url, Some(&body)).await?.decode()
    }

    async fn update(&self, key: &R::Key, draft: &R) -> GatewayResult<R> {
        let key = key.to_string();
        let url = self.endpoint(R::KIND, &[&key])?;
        self.execute(Method::PUT, url, Some(draft)).await?.decode()
    }

    async fn delete(&self, key: &R::Key) -> GatewayResult<()> {
        let key = key.to_string();
        let url = self.endpoint(R::KIND, &[&key])?;
        self.execute::<()>(Method::DELETE, url, None).await?;
        Ok(())
    }
}

#[async_trait]
impl CountryLookup for HttpGateway {
    async fn lookup(&self, value: &str) -> GatewayResult<Option<Country>> {
        let url = self.endpoint_with_query(ResourceKind::Countries, &["lookup"], "value", value)?;
        let reply = match self.fetch(url).await {
            Ok(reply) => reply,
            Err(err) if err.is_not_found() => return Ok(None),
            Err(err) => return Err(err),
        };
        if reply.is_empty() {
            return Ok(None);
        }
        reply.decode()
    }
}

#[async_trait]
impl PrefixFilter for HttpGateway {
    async fn by_country_code(&self, code: &str) -> GatewayResult<Vec<Prefix>> {
        let url = self.endpoint(ResourceKind::Prefixes, &["country", code])?;
        self.fetch(url).await?.decode()
    }

    async fn by_country_name(&self, name: &str) -> GatewayResult<Vec<Prefix>> {
        let url =
            self.endpoint_with_query(ResourceKind::Prefixes, &["by-country-name"], "name", name)?;
        self.fetch(url).await?.decode()
    }
}
