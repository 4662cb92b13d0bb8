//! Typed calls against the Drive v2 REST surface.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE};
use serde::Deserialize;
use tracing::trace;

use crate::document::FetchPlan;
use crate::error::Result;
use crate::multipart::MultipartPayload;
use crate::settings::DriveSettings;
use crate::transport::{RemoteRequest, RemoteResponse, Transport};

/// Identifier assigned by the remote store.
pub type FileId = String;

/// Reserved identifier of the top-level container.
pub const ROOT_ID: &str = "root";

/// A file or folder as reported by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteObject {
    pub id: FileId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    items: Vec<RemoteObject>,
}

#[derive(Clone)]
pub struct DriveApi {
    settings: Arc<DriveSettings>,
    transport: Arc<dyn Transport>,
}

impl DriveApi {
    pub fn new(settings: Arc<DriveSettings>, transport: Arc<dyn Transport>) -> Self {
        Self {
            settings,
            transport,
        }
    }

    fn authorized(&self, method: Method, url: String) -> Result<RemoteRequest> {
        RemoteRequest::new(method, url)
            .header(AUTHORIZATION, &format!("Bearer {}", self.settings.token))
    }

    async fn send(&self, request: RemoteRequest) -> Result<RemoteResponse> {
        trace!("{} {}", request.method, request.url);
        self.transport.execute(request).await
    }

    /// `GET files/<id>...` against the metadata endpoint, returning the raw response.
    async fn get(&self, tail: String) -> Result<RemoteResponse> {
        let request = self.authorized(Method::GET, self.settings.api_url(&tail))?;
        self.send(request).await
    }

    /// Objects whose parent list includes `parent`, in listing order.
    pub async fn list_children(&self, parent: &str) -> Result<Vec<RemoteObject>> {
        let query = urlencoding::encode(&format!("'{parent}' in parents")).into_owned();
        let resp = self.get(format!("files?corpus=domain&q={query}")).await?;
        let list: FileList = resp.ensure_success()?.json().await?;
        Ok(list.items)
    }

    pub async fn get_metadata(&self, id: &str) -> Result<RemoteObject> {
        let resp = self.get(format!("files/{}", urlencoding::encode(id))).await?;
        resp.ensure_success()?.json().await
    }

    /// Starts a content download. The response is returned unread and
    /// unchecked so the caller can stream it.
    pub async fn fetch_content(&self, id: &str, plan: FetchPlan) -> Result<RemoteResponse> {
        let id = urlencoding::encode(id);
        let tail = match plan {
            FetchPlan::Export(mime_type) => format!(
                "files/{id}/export?mimeType={}",
                urlencoding::encode(mime_type)
            ),
            FetchPlan::Media => format!("files/{id}?alt=media"),
        };
        self.get(tail).await
    }

    /// Overwrites the content of an existing object.
    pub async fn replace_content(
        &self,
        id: &str,
        mime_type: &str,
        content: Bytes,
    ) -> Result<RemoteResponse> {
        let url = self.settings.upload_url(&format!(
            "files/{}?uploadType=media",
            urlencoding::encode(id)
        ));
        let request = self
            .authorized(Method::PUT, url)?
            .header(CONTENT_TYPE, mime_type)?
            .body(content);
        self.send(request).await
    }

    /// Creates a new object with metadata and content in one request.
    pub async fn create(&self, payload: MultipartPayload) -> Result<RemoteResponse> {
        let url = self.settings.upload_url("files?uploadType=multipart");
        let content_type = payload.content_type();
        let body = payload.into_body()?;
        let request = self
            .authorized(Method::POST, url)?
            .header(CONTENT_TYPE, &content_type)?
            .header(CONTENT_LENGTH, &body.len().to_string())?
            .body(body);
        self.send(request).await
    }
}
