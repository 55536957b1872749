//! HTTP client for the finance REST API.
//!
//! [`Client`] holds the base URL, the bearer token and the selected
//! organization. Every resource gets its own `impl Client` block in a
//! dedicated module; they all go through the helpers defined here.

use api_types::{Deleted, Envelope, ErrorBody, Id, Page};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::{Serialize, de::DeserializeOwned};

pub use error::ClientError;

mod accounts;
mod auth;
mod categories;
mod counterparties;
mod error;
mod imports;
mod invoices;
mod organizations;
mod parties;
mod reports;
mod transactions;

pub type Result<T> = std::result::Result<T, ClientError>;

/// Header carrying the selected organization (tenant).
pub const ORGANIZATION_HEADER: &str = "x-organization-id";
/// Header making create requests safe to retry.
pub const IDEMPOTENCY_HEADER: &str = "idempotency-key";
/// Largest page the server will return.
pub const MAX_PAGE_SIZE: u32 = 200;

#[derive(Debug, Clone)]
pub struct Client {
    base_url: Url,
    http: reqwest::Client,
    token: Option<String>,
    organization: Option<Id>,
}

impl Client {
    /// Creates a client for `base_url` (e.g. `https://api.example.com/api`).
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_http(base_url, reqwest::Client::new())
    }

    /// Same as [`Client::new`] with a preconfigured `reqwest` client.
    pub fn with_http(base_url: &str, http: reqwest::Client) -> Result<Self> {
        // `Url::join` drops the last segment unless the base ends with '/'.
        let normalized = format!("{}/", base_url.trim().trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .map_err(|err| ClientError::InvalidUrl(format!("{base_url}: {err}")))?;
        Ok(Self {
            base_url,
            http,
            token: None,
            organization: None,
        })
    }

    pub fn with_organization(mut self, organization: Option<Id>) -> Self {
        self.organization = organization;
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token.filter(|t| !t.trim().is_empty());
    }

    pub fn set_organization(&mut self, organization: Option<Id>) {
        self.organization = organization;
    }

    pub fn organization(&self) -> Option<&Id> {
        self.organization.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|err| ClientError::InvalidUrl(format!("{path}: {err}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.endpoint(path)?;
        tracing::debug!("{method} {url}");
        let mut req = self.http.request(method, url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        if let Some(organization) = &self.organization {
            req = req.header(ORGANIZATION_HEADER, organization.as_str());
        }
        Ok(req)
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T> {
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            return Ok(res.json::<T>().await?);
        }

        let message = res
            .json::<ErrorBody>()
            .await
            .map(|err| err.message)
            .unwrap_or_else(|_| "unknown error".to_string());
        tracing::warn!("request failed with {status}: {message}");
        Err(error_for_status(status, message))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let req = self.request(Method::GET, path)?;
        self.send::<Envelope<T>>(req).await.map(Envelope::into_data)
    }

    async fn get_with<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(Method::GET, path)?.query(query);
        self.send::<Envelope<T>>(req).await.map(Envelope::into_data)
    }

    async fn get_page<T, Q>(&self, path: &str, query: &Q) -> Result<Page<T>>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let req = self.request(Method::GET, path)?.query(query);
        self.send::<Envelope<Vec<T>>>(req).await.map(Page::from)
    }

    async fn send_json<T, B>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let req = self.request(method, path)?.json(body);
        self.send::<Envelope<T>>(req).await.map(Envelope::into_data)
    }

    /// POST with a fresh idempotency key.
    async fn create<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let key = uuid::Uuid::new_v4().to_string();
        let req = self
            .request(Method::POST, path)?
            .header(IDEMPOTENCY_HEADER, key)
            .json(body);
        self.send::<Envelope<T>>(req).await.map(Envelope::into_data)
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let req = self.request(Method::DELETE, path)?;
        let res = req.send().await?;
        let status = res.status();
        if status.is_success() {
            // Some endpoints answer 204, others a small JSON acknowledgement.
            if let Ok(ack) = res.json::<Deleted>().await
                && let Some(message) = ack.message
            {
                tracing::debug!("delete {path}: {message}");
            }
            return Ok(());
        }
        let message = res
            .json::<ErrorBody>()
            .await
            .map(|err| err.message)
            .unwrap_or_else(|_| "unknown error".to_string());
        Err(error_for_status(status, message))
    }
}

fn error_for_status(status: StatusCode, message: String) -> ClientError {
    match status.as_u16() {
        401 => ClientError::Unauthorized,
        403 => ClientError::Forbidden,
        404 => ClientError::NotFound,
        409 => ClientError::Conflict(message),
        400 | 422 => ClientError::Validation(message),
        _ => ClientError::Server { status, message },
    }
}

/// Percent-encodes an id for use as a single path segment.
fn segment(id: &Id) -> String {
    urlencoding::encode(id.as_str()).into_owned()
}
