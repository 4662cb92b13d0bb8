/// A slash-delimited path inside the drive, held as its ordered segments.
///
/// A trailing empty segment (`"/a/"`) is kept: it asks for the containing
/// directory rather than a child with an empty name.
///
/// # Examples
/// ```
/// use drivefs::DrivePath;
///
/// let p = DrivePath::parse("/docs/report.txt").unwrap();
/// assert_eq!(p.file_name(), Some("report.txt"));
/// assert_eq!(p.parent().to_string(), "/docs");
/// assert!(DrivePath::parse("").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DrivePath {
    segments: Vec<String>,
}

impl DrivePath {
    /// The top-level container.
    pub fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Parses a slash-delimited string. Returns `None` for an empty string,
    /// which means "no path was given" and is distinct from the root.
    pub fn parse(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        if s == "/" {
            return Some(Self::root());
        }
        let stripped = s.strip_prefix('/').unwrap_or(s);
        Some(Self {
            segments: stripped.split('/').map(str::to_owned).collect(),
        })
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Whether the path ends in `/`.
    pub fn has_trailing_slash(&self) -> bool {
        self.segments.last().is_some_and(|s| s.is_empty())
    }

    /// Final segment; empty for a trailing-slash path, `None` for the root.
    pub fn file_name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The path minus its final segment. The parent of a top-level entry,
    /// and of the root itself, is the root.
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    pub fn join(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_owned());
        Self { segments }
    }
}

impl std::fmt::Display for DrivePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("/")?;
        f.write_str(&self.segments.join("/"))
    }
}

/// Normalizes a subfolder prefix so it is either empty or starts with `/`.
/// Trailing slashes are dropped so the prefix never ends in an empty segment.
pub(crate) fn normalize_subfolder(subfolder: Option<&str>) -> String {
    match subfolder.map(|s| s.trim_end_matches('/')) {
        None | Some("") => String::new(),
        Some(s) if s.starts_with('/') => s.to_owned(),
        Some(s) => format!("/{s}"),
    }
}
