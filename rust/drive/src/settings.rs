use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::path::normalize_subfolder;

pub const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/drive/v2";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v2";
const DEFAULT_SLOW_REQUEST_THRESHOLD_SECS: u64 = 30;

/// Prefix of the environment variables read by [`DriveSettings::from_env`].
pub const ENV_PREFIX: &str = "DRIVEFS";

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}
fn default_upload_base_url() -> String {
    DEFAULT_UPLOAD_BASE_URL.to_string()
}
fn default_slow_request_threshold_secs() -> u64 {
    DEFAULT_SLOW_REQUEST_THRESHOLD_SECS
}

/// Immutable adapter configuration.
#[derive(Clone, Deserialize)]
pub struct DriveSettings {
    /// OAuth bearer token sent with every request.
    #[serde(default)]
    pub token: String,
    /// Folder all paths are resolved under. Defaults to the drive root.
    #[serde(default)]
    pub subfolder: Option<String>,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_upload_base_url")]
    pub upload_base_url: String,
    /// Remote calls pending longer than this are logged. 0 disables.
    #[serde(default = "default_slow_request_threshold_secs")]
    pub slow_request_threshold_secs: u64,
}

impl DriveSettings {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            subfolder: None,
            api_base_url: default_api_base_url(),
            upload_base_url: default_upload_base_url(),
            slow_request_threshold_secs: default_slow_request_threshold_secs(),
        }
    }

    pub fn with_subfolder(mut self, subfolder: impl Into<String>) -> Self {
        self.subfolder = Some(subfolder.into());
        self
    }

    pub fn with_base_urls(mut self, api: impl Into<String>, upload: impl Into<String>) -> Self {
        self.api_base_url = api.into();
        self.upload_base_url = upload.into();
        self
    }

    /// Loads settings from `DRIVEFS_TOKEN`, `DRIVEFS_SUBFOLDER`,
    /// `DRIVEFS_API_BASE_URL`, `DRIVEFS_UPLOAD_BASE_URL` and
    /// `DRIVEFS_SLOW_REQUEST_THRESHOLD_SECS`.
    pub fn from_env() -> Result<Self> {
        Self::from_source(config::Environment::with_prefix(ENV_PREFIX))
    }

    fn from_source(source: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(source.try_parsing(true))
            .build()?
            .try_deserialize::<DriveSettings>()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(Error::MissingToken);
        }
        Ok(())
    }

    /// The subfolder prefix, empty or starting with `/`.
    pub fn normalized_subfolder(&self) -> String {
        normalize_subfolder(self.subfolder.as_deref())
    }

    pub fn slow_request_threshold(&self) -> Duration {
        Duration::from_secs(self.slow_request_threshold_secs)
    }

    pub(crate) fn api_url(&self, tail: &str) -> String {
        format!("{}/{tail}", self.api_base_url.trim_end_matches('/'))
    }

    pub(crate) fn upload_url(&self, tail: &str) -> String {
        format!("{}/{tail}", self.upload_base_url.trim_end_matches('/'))
    }
}

impl std::fmt::Debug for DriveSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriveSettings")
            .field("token", &"<redacted>")
            .field("subfolder", &self.subfolder)
            .field("api_base_url", &self.api_base_url)
            .field("upload_base_url", &self.upload_base_url)
            .field("slow_request_threshold_secs", &self.slow_request_threshold_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_from_json() {
        let settings: DriveSettings = serde_json::from_value(serde_json::json!({
            "token": "t0k"
        }))
        .unwrap();
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.upload_base_url, DEFAULT_UPLOAD_BASE_URL);
        assert_eq!(settings.slow_request_threshold(), Duration::from_secs(30));
        assert_eq!(settings.normalized_subfolder(), "");
        settings.validate().unwrap();
    }

    #[test]
    fn missing_token_is_rejected() {
        let settings: DriveSettings = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(matches!(settings.validate(), Err(Error::MissingToken)));
        assert!(matches!(
            DriveSettings::new("  ").validate(),
            Err(Error::MissingToken)
        ));
    }

    #[test]
    fn subfolder_gets_leading_slash() {
        let settings = DriveSettings::new("t").with_subfolder("projects/2024");
        assert_eq!(settings.normalized_subfolder(), "/projects/2024");
    }

    #[test]
    fn urls_join_without_double_slash() {
        let settings = DriveSettings::new("t").with_base_urls("http://api/", "http://up");
        assert_eq!(settings.api_url("files/x"), "http://api/files/x");
        assert_eq!(settings.upload_url("files"), "http://up/files");
    }

    fn environment(vars: &[(&str, &str)]) -> config::Environment {
        let mut map = config::Map::new();
        for (key, value) in vars {
            map.insert(key.to_string(), value.to_string());
        }
        config::Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    #[test]
    fn loads_from_environment() {
        let settings = DriveSettings::from_source(environment(&[
            ("DRIVEFS_TOKEN", "env-token"),
            ("DRIVEFS_SUBFOLDER", "shared"),
            ("DRIVEFS_SLOW_REQUEST_THRESHOLD_SECS", "5"),
            ("OTHER_TOKEN", "ignored"),
        ]))
        .unwrap();
        assert_eq!(settings.token, "env-token");
        assert_eq!(settings.normalized_subfolder(), "/shared");
        assert_eq!(settings.slow_request_threshold(), Duration::from_secs(5));
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn environment_without_token_is_rejected() {
        let result = DriveSettings::from_source(environment(&[("DRIVEFS_SUBFOLDER", "shared")]));
        assert!(matches!(result, Err(Error::MissingToken)));
    }

    #[test]
    fn debug_redacts_token() {
        let rendered = format!("{:?}", DriveSettings::new("secret-token"));
        assert!(!rendered.contains("secret-token"));
        assert!(rendered.contains("<redacted>"));
    }
}
