//! HTTP transport: one authenticated round trip per call.
//!
//! The transport knows nothing about resources or decoding. It carries the
//! Basic auth header on every request, supports an optional proxy, and hands
//! back the status code plus the raw body for status interpretation.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::auth::Credentials;
use crate::error::{Error, ErrorBody, RestError, Result};

/// Outcome of a round trip before status interpretation.
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
}

impl Transport {
    pub fn new(
        credentials: &Credentials,
        proxy: Option<Url>,
        timeout: Duration,
    ) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&credentials.to_basic_auth())
            .map_err(|_| Error::Config("credentials are not valid header text".into()))?;
        auth.set_sensitive(true);
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let mut builder = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout);
        if let Some(proxy) = proxy {
            builder = builder.proxy(reqwest::Proxy::all(proxy)?);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }

    /// One request, one response. The body is drained on every path, so no
    /// connection is left holding a half-read stream.
    pub async fn execute(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<RawResponse> {
        let mut request = self.http.request(method, url.clone());
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();
        debug!(%status, %url, "round trip complete");
        Ok(RawResponse { status, body })
    }

    pub async fn get(&self, url: Url) -> Result<RawResponse> {
        self.execute(Method::GET, url, None).await
    }

    pub async fn post(&self, url: Url, body: Value) -> Result<RawResponse> {
        self.execute(Method::POST, url, Some(body)).await
    }

    pub async fn put(&self, url: Url, body: Value) -> Result<RawResponse> {
        self.execute(Method::PUT, url, Some(body)).await
    }

    pub async fn delete(&self, url: Url) -> Result<RawResponse> {
        self.execute(Method::DELETE, url, None).await
    }
}

/// Map a finished round trip onto the success range. 2xx yields the body
/// (empty for 204); anything else becomes a [`RestError`] carrying a
/// best-effort decode of the server error payload.
pub fn interpret_status(raw: RawResponse) -> Result<Vec<u8>> {
    if raw.status.is_success() {
        return Ok(raw.body);
    }
    let body = serde_json::from_slice::<ErrorBody>(&raw.body).unwrap_or_default();
    let reason = raw
        .status
        .canonical_reason()
        .unwrap_or("unknown status")
        .to_string();
    warn!(status = raw.status.as_u16(), %reason, "server returned an error status");
    Err(Error::Rest(RestError {
        status: raw.status.as_u16(),
        reason,
        body,
    }))
}

/// Interpret the status and decode a JSON body.
pub fn expect_json<T: DeserializeOwned>(raw: RawResponse) -> Result<T> {
    let body = interpret_status(raw)?;
    Ok(serde_json::from_slice(&body)?)
}

/// Interpret the status and discard the body. Used for calls where success
/// is a 204.
pub fn expect_success(raw: RawResponse) -> Result<()> {
    interpret_status(raw).map(|_| ())
}
