//! Filesystem view over the drive: `stat`, `read` and `write` by path.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Method;
use tracing::debug;

use crate::api::{DriveApi, RemoteObject};
use crate::document::ContentKind;
use crate::error::{Error, Result};
use crate::multipart::MultipartPayload;
use crate::path::DrivePath;
use crate::resolver::{PathResolver, Resolution};
use crate::settings::DriveSettings;
use crate::transport::{RemoteResponse, ReqwestTransport, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One child as seen through the filesystem view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub kind: EntryKind,
    pub name: String,
    /// Always 0: the listing call does not report sizes.
    pub size: u64,
}

impl From<RemoteObject> for DirEntry {
    fn from(object: RemoteObject) -> Self {
        let kind = if ContentKind::from_mime_type(&object.mime_type).is_folder() {
            EntryKind::Directory
        } else {
            EntryKind::File
        };
        Self {
            kind,
            name: object.title,
            size: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub exists: bool,
    pub entries: Vec<DirEntry>,
    /// Methods the resource advertises.
    pub methods: Vec<Method>,
}

impl Stat {
    pub fn supports(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }
}

/// Generic filesystem contract implemented by the drive adapter.
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn stat(&self, path: &str) -> Result<Stat>;

    /// Returns the in-flight content response; the body is not buffered.
    async fn read(&self, path: &str) -> Result<RemoteResponse>;

    /// Writes `content` and hands it back on success.
    async fn write(&self, path: &str, content: Bytes) -> Result<Bytes>;
}

struct DriveFileSystemInner {
    settings: Arc<DriveSettings>,
    subfolder: String,
    api: DriveApi,
    resolver: PathResolver,
}

/// Hierarchical view of a drive, rooted at the configured subfolder.
#[derive(Clone)]
pub struct DriveFileSystem {
    inner: Arc<DriveFileSystemInner>,
}

impl DriveFileSystem {
    /// Builds an adapter that talks to the remote store over HTTPS.
    pub fn new(settings: DriveSettings) -> Result<Self> {
        let transport = ReqwestTransport::new(settings.slow_request_threshold());
        Self::with_transport(settings, Arc::new(transport))
    }

    pub fn with_transport(settings: DriveSettings, transport: Arc<dyn Transport>) -> Result<Self> {
        settings.validate()?;
        let subfolder = settings.normalized_subfolder();
        let settings = Arc::new(settings);
        let api = DriveApi::new(settings.clone(), transport);
        let resolver = PathResolver::new(api.clone());
        debug!("drive filesystem rooted at `{subfolder}`");
        Ok(Self {
            inner: Arc::new(DriveFileSystemInner {
                settings,
                subfolder,
                api,
                resolver,
            }),
        })
    }

    pub fn settings(&self) -> &DriveSettings {
        &self.inner.settings
    }

    /// Prefixes the subfolder to a percent-encoded relative path.
    pub fn drive_path(&self, relative: &str) -> Result<Option<DrivePath>> {
        let decoded =
            urlencoding::decode(relative).map_err(|_| Error::InvalidPath(relative.to_owned()))?;
        Ok(DrivePath::parse(&format!("{}{}", self.inner.subfolder, decoded)))
    }

    pub async fn resolve(&self, relative: &str) -> Result<Resolution> {
        let path = self.drive_path(relative)?;
        self.inner.resolver.resolve(path.as_ref()).await
    }

    /// Resolves for `stat`/`read`: anything short of an id, including a 404
    /// while walking, becomes the given not-found error.
    async fn resolve_existing(
        &self,
        relative: &str,
        not_found: fn(String) -> Error,
    ) -> Result<String> {
        let path = self.drive_path(relative)?;
        let display = path
            .as_ref()
            .map_or_else(|| relative.to_owned(), DrivePath::to_string);
        match self.inner.resolver.resolve(path.as_ref()).await {
            Ok(Resolution::Found(id)) => Ok(id),
            Ok(Resolution::NotFound | Resolution::Unspecified) => Err(not_found(display)),
            Err(err) if err.is_remote_not_found() => Err(not_found(display)),
            Err(err) => Err(err),
        }
    }

    /// Metadata of the object at `relative`.
    pub async fn metadata(&self, relative: &str) -> Result<RemoteObject> {
        let id = self.resolve_existing(relative, Error::FileNotFound).await?;
        self.inner.api.get_metadata(&id).await.map_err(|err| match err {
            Error::RemoteCallFailed { .. } => Error::FileNotFound(relative.to_owned()),
            other => other,
        })
    }

    /// Like [`FileSystem::write`], with an explicit mime type. On update it
    /// becomes the upload's content type instead of the object's current one;
    /// on create it types the content part.
    pub async fn write_with_mime_type(
        &self,
        relative: &str,
        content: Bytes,
        mime_type: Option<&str>,
    ) -> Result<Bytes> {
        let path = self.drive_path(relative)?;
        let resolution = self.inner.resolver.resolve(path.as_ref()).await?;

        let resp = match (resolution, path) {
            (Resolution::Found(id), _) => {
                let mime_type = match mime_type {
                    Some(m) => m.to_owned(),
                    None => self.inner.api.get_metadata(&id).await?.mime_type,
                };
                debug!("updating {id} as {mime_type}");
                self.inner
                    .api
                    .replace_content(&id, &mime_type, content.clone())
                    .await?
            }
            (Resolution::NotFound, Some(path)) => {
                let folder = path.parent();
                let Some(folder_id) = self.inner.resolver.resolve(Some(&folder)).await?.into_id()
                else {
                    return Err(Error::CreateTargetMissing(folder.to_string()));
                };
                let name = path.file_name().unwrap_or_default();
                debug!("creating `{name}` under {folder_id}");
                let mut payload = MultipartPayload::new(name, folder_id, content.clone());
                if let Some(m) = mime_type {
                    payload = payload.with_content_type(m);
                }
                self.inner.api.create(payload).await?
            }
            (Resolution::NotFound | Resolution::Unspecified, _) => {
                return Err(Error::CreateTargetMissing(relative.to_owned()));
            }
        };

        resp.ensure_success()?;
        Ok(content)
    }
}

#[async_trait]
impl FileSystem for DriveFileSystem {
    async fn stat(&self, relative: &str) -> Result<Stat> {
        let id = self.resolve_existing(relative, Error::StatNotFound).await?;
        let children = self
            .inner
            .api
            .list_children(&id)
            .await
            .map_err(|err| match err {
                Error::RemoteCallFailed { .. } => Error::StatNotFound(relative.to_owned()),
                other => other,
            })?;
        Ok(Stat {
            exists: true,
            entries: children.into_iter().map(DirEntry::from).collect(),
            methods: vec![Method::GET, Method::OPTIONS],
        })
    }

    async fn read(&self, relative: &str) -> Result<RemoteResponse> {
        let id = self.resolve_existing(relative, Error::FileNotFound).await?;
        let object = self.inner.api.get_metadata(&id).await.map_err(|err| match err {
            Error::RemoteCallFailed { .. } => Error::FileNotFound(relative.to_owned()),
            other => other,
        })?;
        let plan = ContentKind::from_mime_type(&object.mime_type).fetch_plan();
        debug!("reading {id} ({}) via {plan:?}", object.mime_type);
        // Only the status is checked here; the body keeps streaming.
        self.inner
            .api
            .fetch_content(&id, plan)
            .await?
            .ensure_success()
            .map_err(|err| {
                if err.is_remote_not_found() {
                    Error::FileNotFound(relative.to_owned())
                } else {
                    err
                }
            })
    }

    async fn write(&self, relative: &str, content: Bytes) -> Result<Bytes> {
        self.write_with_mime_type(relative, content, None).await
    }
}
