//! Path to identifier resolution.

use tracing::debug;

use crate::api::{DriveApi, FileId, ROOT_ID};
use crate::error::Result;
use crate::path::DrivePath;

/// Outcome of resolving a path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// No path was given.
    Unspecified,
    Found(FileId),
    /// Some segment has no matching child.
    NotFound,
}

impl Resolution {
    pub fn id(&self) -> Option<&str> {
        match self {
            Resolution::Found(id) => Some(id.as_str()),
            Resolution::Unspecified | Resolution::NotFound => None,
        }
    }

    pub fn into_id(self) -> Option<FileId> {
        match self {
            Resolution::Found(id) => Some(id),
            Resolution::Unspecified | Resolution::NotFound => None,
        }
    }
}

/// Walks a path from the root, one listing call per segment.
#[derive(Clone)]
pub struct PathResolver {
    api: DriveApi,
}

impl PathResolver {
    pub fn new(api: DriveApi) -> Self {
        Self { api }
    }

    /// Resolves `path` to an identifier.
    ///
    /// Segments are looked up in order, each under the previous one's id. The
    /// first child whose title matches wins; duplicates are not reported.
    /// An empty segment stops the walk and yields the id reached so far.
    pub async fn resolve(&self, path: Option<&DrivePath>) -> Result<Resolution> {
        let Some(path) = path else {
            return Ok(Resolution::Unspecified);
        };

        let mut parent: FileId = ROOT_ID.to_string();
        for segment in path.segments() {
            if segment.is_empty() {
                return Ok(Resolution::Found(parent));
            }
            let children = self.api.list_children(&parent).await?;
            let Some(child) = children.into_iter().find(|c| c.title == segment) else {
                debug!("{path}: no `{segment}` under {parent}");
                return Ok(Resolution::NotFound);
            };
            parent = child.id;
        }
        debug!("{path} -> {parent}");
        Ok(Resolution::Found(parent))
    }
}
