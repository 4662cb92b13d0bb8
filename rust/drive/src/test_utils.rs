use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value as JsonValue, json};

use crate::api::DriveApi;
use crate::error::Result;
use crate::settings::DriveSettings;
use crate::transport::{RemoteRequest, RemoteResponse, Transport};

pub const API: &str = "http://api.test/drive/v2";
pub const UPLOAD: &str = "http://upload.test/drive/v2";

/// Replays queued responses in order and records every request it receives.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<(u16, Vec<u8>)>>,
    requests: Mutex<Vec<RemoteRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, status: u16, body: impl Into<Vec<u8>>) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back((status, body.into()));
        self
    }

    pub fn push_json(&self, status: u16, value: JsonValue) -> &Self {
        self.push(status, value.to_string())
    }

    /// Queues a successful listing of `(id, title, mime_type)` triples.
    pub fn push_listing(&self, items: &[(&str, &str, &str)]) -> &Self {
        self.push_json(200, listing(items))
    }

    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.url).collect()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: RemoteRequest) -> Result<RemoteResponse> {
        let next = self.responses.lock().unwrap().pop_front();
        let Some((status, body)) = next else {
            panic!("unexpected request {} {}", request.method, request.url);
        };
        self.requests.lock().unwrap().push(request);
        Ok(RemoteResponse::from_bytes(
            StatusCode::from_u16(status).unwrap(),
            body,
        ))
    }
}

pub fn listing(items: &[(&str, &str, &str)]) -> JsonValue {
    let items: Vec<JsonValue> = items
        .iter()
        .map(|(id, title, mime_type)| json!({"id": id, "title": title, "mimeType": mime_type}))
        .collect();
    json!({ "kind": "drive#fileList", "items": items })
}

/// Listing URL for the children of `parent`.
pub fn children_url(parent: &str) -> String {
    format!("{API}/files?corpus=domain&q=%27{parent}%27%20in%20parents")
}

pub fn settings() -> DriveSettings {
    DriveSettings::new("test-token").with_base_urls(API, UPLOAD)
}

pub fn api(transport: Arc<ScriptedTransport>) -> DriveApi {
    DriveApi::new(Arc::new(settings()), transport)
}
