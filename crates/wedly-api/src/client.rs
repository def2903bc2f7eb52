// Async HTTP client for the admin backend.
//
// Base path: configured API root (e.g. `http://localhost:8085/`)
// Auth: `Authorization: Bearer <token>` on every private route.
//
// The client is stateless with respect to auth: the token is passed in on
// each call, so whoever owns the session decides which token is current.

use reqwest::header::{AUTHORIZATION, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::body::RequestBody;
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::types::ErrorResponse;

/// Async client for the admin backend's REST API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for the API rooted at `base_url`.
    pub fn new(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::from_reqwest(base_url, http))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &Url, http: reqwest::Client) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// The API root, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"private/guests"`) onto the base URL.
    pub(crate) fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    // ── Authenticated verbs ──────────────────────────────────────────

    /// `GET {path}?{params}` and decode the JSON body.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .header(AUTHORIZATION, bearer(token)?)
            .query(params)
            .send()
            .await?;
        handle_response(resp).await
    }

    /// `POST {path}` with a JSON or multipart body.
    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
        body: RequestBody,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let builder = self.http.post(url).header(AUTHORIZATION, bearer(token)?);
        let resp = with_body(builder, body).send().await?;
        handle_response(resp).await
    }

    /// `PUT {path}` with a JSON or multipart body.
    pub async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        token: &SecretString,
        body: RequestBody,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PUT {url}");

        let builder = self.http.put(url).header(AUTHORIZATION, bearer(token)?);
        let resp = with_body(builder, body).send().await?;
        handle_response(resp).await
    }

    /// `DELETE {path}`; any success status counts, the body is ignored.
    pub async fn delete(&self, path: &str, token: &SecretString) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .header(AUTHORIZATION, bearer(token)?)
            .send()
            .await?;
        handle_empty(resp).await
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

fn normalize_base_url(raw: &Url) -> Url {
    let mut url = raw.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn bearer(token: &SecretString) -> Result<HeaderValue, Error> {
    let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
        .map_err(|e| Error::Authentication {
            message: format!("invalid token header value: {e}"),
        })?;
    value.set_sensitive(true);
    Ok(value)
}

fn with_body(builder: reqwest::RequestBuilder, body: RequestBody) -> reqwest::RequestBuilder {
    match body {
        RequestBody::Json(value) => builder.json(&value),
        RequestBody::Multipart(form) => builder.multipart(form.into_form()),
    }
}

// ── Response handling ────────────────────────────────────────────────

pub(crate) async fn handle_response<T: DeserializeOwned>(
    resp: reqwest::Response,
) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(status, resp).await);
    }

    let body = resp.text().await?;
    trace!(len = body.len(), "response body received");

    // Write endpoints may answer 201/204 with an empty body.
    let text = if body.trim().is_empty() {
        "null"
    } else {
        body.as_str()
    };
    serde_json::from_str(text).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body: body.clone(),
        }
    })
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(parse_error(status, resp).await)
    }
}

pub(crate) async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let raw = raw.trim();

    let (message, detail) = match serde_json::from_str::<ErrorResponse>(raw) {
        Ok(err) => (
            err.message.unwrap_or_else(|| status.to_string()),
            err.error,
        ),
        Err(_) if raw.is_empty() => (status.to_string(), None),
        Err(_) => (raw.to_owned(), None),
    };

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Error::Unauthorized { message };
    }

    Error::Api {
        status: status.as_u16(),
        message,
        detail,
    }
}
