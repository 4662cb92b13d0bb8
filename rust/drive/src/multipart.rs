//! `multipart/related` bodies for creating an object with metadata and
//! content in one request.

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use uuid::Uuid;

use crate::error::Result;

const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=UTF-8";

#[derive(Debug, Serialize)]
struct ParentRef<'a> {
    kind: &'static str,
    id: &'a str,
}

#[derive(Debug, Serialize)]
struct CreateMetadata<'a> {
    title: &'a str,
    parents: [ParentRef<'a>; 1],
}

/// Metadata and content of a new object, joined under one boundary.
#[derive(Debug, Clone)]
pub struct MultipartPayload {
    boundary: String,
    title: String,
    parent_id: String,
    content_type: String,
    content: Bytes,
}

impl MultipartPayload {
    pub fn new(title: impl Into<String>, parent_id: impl Into<String>, content: Bytes) -> Self {
        Self {
            boundary: Uuid::new_v4().to_string(),
            title: title.into(),
            parent_id: parent_id.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            content,
        }
    }

    /// Content type of the content part.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value of the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/related; boundary={}", self.boundary)
    }

    pub fn metadata_json(&self) -> Result<String> {
        let metadata = CreateMetadata {
            title: &self.title,
            parents: [ParentRef {
                kind: "drive#folder",
                id: &self.parent_id,
            }],
        };
        Ok(serde_json::to_string(&metadata)?)
    }

    pub fn into_body(self) -> Result<Bytes> {
        let metadata = self.metadata_json()?;
        let delimiter = format!("--{}", self.boundary);

        let mut body = BytesMut::with_capacity(metadata.len() + self.content.len() + 256);
        body.put_slice(delimiter.as_bytes());
        body.put_slice(b"\r\nContent-Type: application/json; charset=UTF-8\r\n\r\n");
        body.put_slice(metadata.as_bytes());
        body.put_slice(b"\r\n");
        body.put_slice(delimiter.as_bytes());
        body.put_slice(format!("\r\nContent-Type: {}\r\n\r\n", self.content_type).as_bytes());
        body.put_slice(&self.content);
        body.put_slice(b"\r\n");
        body.put_slice(delimiter.as_bytes());
        body.put_slice(b"--");
        Ok(body.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_fresh() {
        let a = MultipartPayload::new("a.txt", "p", Bytes::new());
        let b = MultipartPayload::new("a.txt", "p", Bytes::new());
        assert_ne!(a.boundary(), b.boundary());
        assert_eq!(
            a.content_type(),
            format!("multipart/related; boundary={}", a.boundary())
        );
    }

    #[test]
    fn metadata_names_title_and_parent() {
        let payload = MultipartPayload::new("notes.txt", "folder-1", Bytes::new());
        let value: serde_json::Value =
            serde_json::from_str(&payload.metadata_json().unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "title": "notes.txt",
                "parents": [{"kind": "drive#folder", "id": "folder-1"}]
            })
        );
    }

    #[test]
    fn metadata_escapes_title() {
        let payload = MultipartPayload::new(r#"say "hi".txt"#, "p", Bytes::new());
        let value: serde_json::Value =
            serde_json::from_str(&payload.metadata_json().unwrap()).unwrap();
        assert_eq!(value["title"], r#"say "hi".txt"#);
    }

    #[test]
    fn body_has_two_parts_and_closing_delimiter() {
        let payload = MultipartPayload::new("n.txt", "p", Bytes::from_static(b"hello"));
        let boundary = payload.boundary().to_string();
        let body = String::from_utf8(payload.into_body().unwrap().to_vec()).unwrap();

        let delimiter = format!("--{boundary}");
        assert!(body.starts_with(&delimiter));
        assert!(body.ends_with(&format!("{delimiter}--")));
        assert_eq!(body.matches(&delimiter).count(), 3);
        assert!(body.contains("Content-Type: application/json; charset=UTF-8"));
        assert!(body.contains("Content-Type: text/plain; charset=UTF-8\r\n\r\nhello\r\n"));
    }

    #[test]
    fn content_type_override() {
        let payload = MultipartPayload::new("x.png", "p", Bytes::from_static(b"\x89PNG"))
            .with_content_type("image/png");
        let body = payload.into_body().unwrap();
        let text = String::from_utf8_lossy(&body);
        assert!(text.contains("Content-Type: image/png\r\n\r\n"));
    }
}
