//! HTTP transport seam between the adapter and the remote store.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use drivefs_utils::error::{ContextExt, IntoInternal};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use crate::error::{Error, Result};

pub type BodyStream = BoxStream<'static, drivefs_utils::error::Result<Bytes>>;

/// A request as built by the adapter, independent of the HTTP client.
#[derive(Debug, Clone)]
pub struct RemoteRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl RemoteRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: HeaderName, value: &str) -> Result<Self> {
        let value = HeaderValue::from_str(value).internal()?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn header_str(&self, name: &HeaderName) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// A response whose body has not been read yet.
pub struct RemoteResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: BodyStream,
}

impl RemoteResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: BodyStream) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// A response with an already-available body.
    pub fn from_bytes(status: StatusCode, body: impl Into<Bytes>) -> Self {
        let body = body.into();
        Self::new(
            status,
            HeaderMap::new(),
            stream::once(async move { Ok(body) }).boxed(),
        )
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_text(&self) -> String {
        drivefs_utils::http::status_text(self.status)
    }

    pub fn is_success(&self) -> bool {
        let code = self.status.as_u16();
        !(code < 200 || code >= 300)
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Fails with [`Error::RemoteCallFailed`] unless the status is 2xx.
    pub fn ensure_success(self) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(Error::RemoteCallFailed {
                status: self.status.as_u16(),
                status_text: self.status_text(),
            })
        }
    }

    pub fn into_stream(self) -> BodyStream {
        self.body
    }

    pub async fn bytes(self) -> Result<Bytes> {
        let buf = self
            .body
            .try_fold(BytesMut::new(), |mut buf, chunk| async move {
                buf.extend_from_slice(&chunk);
                Ok(buf)
            })
            .await?;
        Ok(buf.freeze())
    }

    pub async fn text(self) -> Result<String> {
        let bytes = self.bytes().await?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub async fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

impl std::fmt::Debug for RemoteResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: RemoteRequest) -> Result<RemoteResponse>;
}

/// Production transport backed by `reqwest`.
pub struct ReqwestTransport {
    client: reqwest::Client,
    slow_threshold: Duration,
}

impl ReqwestTransport {
    pub fn new(slow_threshold: Duration) -> Self {
        Self::with_client(reqwest::Client::new(), slow_threshold)
    }

    pub fn with_client(client: reqwest::Client, slow_threshold: Duration) -> Self {
        Self {
            client,
            slow_threshold,
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: RemoteRequest) -> Result<RemoteResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        let request = builder.build().internal()?;
        let resp =
            drivefs_utils::http::execute(&self.client, request, self.slow_threshold).await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let body = resp
            .bytes_stream()
            .map(|chunk| chunk.internal().context("reading response body"))
            .boxed();
        Ok(RemoteResponse::new(status, headers, body))
    }
}
