//! Hierarchical `stat`/`read`/`write` access to a Google Drive, whose objects
//! are addressed by opaque ids and linked only through parent lists.

mod api;
mod document;
mod error;
mod fs;
mod multipart;
mod path;
mod resolver;
mod settings;
pub mod transport;

// Flat re-exports: the public API surface
pub use api::{DriveApi, FileId, ROOT_ID, RemoteObject};
pub use document::{ContentKind, FOLDER_MIME_TYPE, FetchPlan, NativeDocument};
pub use error::{Error, Result};
pub use fs::{DirEntry, DriveFileSystem, EntryKind, FileSystem, Stat};
pub use multipart::MultipartPayload;
pub use path::DrivePath;
pub use resolver::{PathResolver, Resolution};
pub use settings::{DEFAULT_API_BASE_URL, DEFAULT_UPLOAD_BASE_URL, DriveSettings, ENV_PREFIX};
pub use transport::{RemoteRequest, RemoteResponse, ReqwestTransport, Transport};

#[cfg(test)]
mod test_utils;
