// Transport contract and its reqwest-backed implementation.
//
// The state layer only ever talks to `dyn Transport`. `HttpTransport` is the
// production implementation: URL construction against the API root,
// envelope unwrapping, and status mapping. No retries, no auth.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::request::{Query, RequestBody};
use crate::response::{Envelope, ListResponse, Response};
use crate::transport::TransportConfig;

/// Asynchronous request contract consumed by the resource stores.
///
/// Paths are API-relative (`/spiders/{id}/files/list`). Every method raises
/// on a non-success status; none of them retry.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, path: &str, query: &Query) -> Result<Response, Error>;

    async fn post(
        &self,
        path: &str,
        body: RequestBody,
        query: Option<&Query>,
    ) -> Result<Response, Error>;

    async fn put(&self, path: &str, body: RequestBody) -> Result<Response, Error>;

    async fn del(&self, path: &str, query: &Query) -> Result<Response, Error>;

    /// `GET` a list endpoint and split the envelope into rows and total.
    async fn get_list(&self, path: &str, query: &Query) -> Result<ListResponse, Error> {
        let resp = self.get(path, query).await?;
        ListResponse::try_from(resp)
    }
}

// ── HttpTransport ────────────────────────────────────────────────────

/// JSON-over-HTTP transport for the Crawlab REST API.
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: Url,
    timeout_secs: u64,
}

impl HttpTransport {
    /// Build from an API root (e.g. `http://localhost:8080/api`) and a
    /// transport config.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            timeout_secs: transport.timeout_secs(),
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            timeout_secs: 0,
        }
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{base}{path}`, tolerating a trailing slash on the base and a
    /// missing leading slash on the path.
    fn url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    fn attach_body(builder: reqwest::RequestBuilder, body: RequestBody) -> reqwest::RequestBuilder {
        match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(form) => builder.multipart(form.into_reqwest()),
        }
    }

    async fn send(&self, builder: reqwest::RequestBuilder) -> Result<Response, Error> {
        let resp = builder.send().await.map_err(|e| self.map_send_error(e))?;
        self.parse_envelope(resp).await
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() && self.timeout_secs > 0 {
            Error::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            Error::Transport(err)
        }
    }

    /// Parse the `{status, data, total}` envelope.
    ///
    /// Non-2xx statuses become [`Error::Api`], using the envelope's `error`
    /// or `message` when the body has one.
    async fn parse_envelope(&self, resp: reqwest::Response) -> Result<Response, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if !status.is_success() {
            let message = serde_json::from_str::<Envelope>(&body)
                .ok()
                .and_then(|env| env.error.filter(|e| !e.is_empty()).or(env.message))
                .unwrap_or_else(|| {
                    if body.is_empty() {
                        status.to_string()
                    } else {
                        body.chars().take(200).collect()
                    }
                });
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Response::default());
        }

        let envelope: Envelope = serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(200).collect();
            Error::Deserialization {
                message: format!("{e} (body preview: {preview:?})"),
                body: body.clone(),
            }
        })?;

        envelope.into_response()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, path: &str, query: &Query) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={:?}", query.pairs());

        self.send(self.http.get(url).query(query.pairs())).await
    }

    async fn post(
        &self,
        path: &str,
        body: RequestBody,
        query: Option<&Query>,
    ) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!(multipart = body.is_multipart(), "POST {url}");

        let mut builder = self.http.post(url);
        if let Some(query) = query {
            builder = builder.query(query.pairs());
        }
        self.send(Self::attach_body(builder, body)).await
    }

    async fn put(&self, path: &str, body: RequestBody) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        self.send(Self::attach_body(self.http.put(url), body)).await
    }

    async fn del(&self, path: &str, query: &Query) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!("DELETE {url} params={:?}", query.pairs());

        self.send(self.http.delete(url).query(query.pairs())).await
    }
}
