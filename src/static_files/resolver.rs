use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::AppError;

/// Entry document served for `/` and for directory requests.
pub const ENTRY_DOCUMENT: &str = "index.html";

/// A filesystem path proven to lie inside the site root.
///
/// Only [`PathResolver::resolve`] and [`SafePath::join_entry`] construct it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafePath {
    full: PathBuf,
    /// Segments below the root, used by the allow-list.
    relative: Vec<String>,
}

impl SafePath {
    pub fn as_path(&self) -> &Path {
        &self.full
    }

    pub fn relative_segments(&self) -> &[String] {
        &self.relative
    }

    /// The entry document inside this path, assuming it names a directory.
    pub fn join_entry(&self) -> SafePath {
        let mut relative = self.relative.clone();
        relative.push(ENTRY_DOCUMENT.to_string());
        SafePath {
            full: self.full.join(ENTRY_DOCUMENT),
            relative,
        }
    }
}

/// Maps request paths onto the site root and refuses anything that escapes it.
///
/// Resolution is purely lexical: it never touches the filesystem.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
    anchor: PathBuf,
    root_segments: Vec<OsString>,
}

impl PathResolver {
    /// Build a resolver over `root`, which must be absolute.
    pub fn new(root: impl AsRef<Path>) -> Result<Self, AppError> {
        let root = root.as_ref();
        if !root.is_absolute() {
            return Err(AppError::Internal(format!(
                "Site root '{}' is not absolute",
                root.display()
            )));
        }

        let mut anchor = PathBuf::new();
        let mut root_segments: Vec<OsString> = Vec::new();
        for component in root.components() {
            match component {
                Component::Prefix(_) | Component::RootDir => anchor.push(component.as_os_str()),
                Component::CurDir => {}
                Component::ParentDir => {
                    root_segments.pop();
                }
                Component::Normal(segment) => root_segments.push(segment.to_os_string()),
            }
        }

        let root = root_segments
            .iter()
            .fold(anchor.clone(), |path, segment| path.join(segment));

        Ok(Self {
            root,
            anchor,
            root_segments,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an already percent-decoded request path against the root.
    ///
    /// Both `/` and `\` act as separators. `..` may climb inside the root but
    /// the normalized result must still have every root segment as its prefix.
    pub fn resolve(&self, requested: &str) -> Result<SafePath, AppError> {
        if requested.contains('\0') {
            return Err(AppError::PathEscape);
        }

        let mut segments: Vec<OsString> = self.root_segments.clone();
        for part in requested.split(['/', '\\']) {
            match part {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(AppError::PathEscape);
                    }
                }
                other => segments.push(OsString::from(other)),
            }
        }

        if !segments.starts_with(&self.root_segments) {
            return Err(AppError::PathEscape);
        }

        let relative = segments[self.root_segments.len()..]
            .iter()
            .map(|s| s.to_string_lossy().into_owned())
            .collect();

        let full = segments
            .iter()
            .fold(self.anchor.clone(), |path, segment| path.join(segment));

        Ok(SafePath { full, relative })
    }
}

/// Second boundary on top of traversal safety: only a few locations are
/// servable at all.
#[derive(Debug, Clone)]
pub struct ServePolicy {
    allowed_dirs: Vec<String>,
    public_files: Vec<String>,
}

impl Default for ServePolicy {
    fn default() -> Self {
        Self {
            allowed_dirs: vec!["assets".to_string(), "data".to_string()],
            public_files: vec![ENTRY_DOCUMENT.to_string()],
        }
    }
}

impl ServePolicy {
    pub fn new(allowed_dirs: Vec<String>, public_files: Vec<String>) -> Self {
        Self {
            allowed_dirs,
            public_files,
        }
    }

    pub fn allows(&self, path: &SafePath) -> bool {
        match path.relative_segments() {
            [file] => self.public_files.iter().any(|f| f == file),
            [dir, _, ..] => self.allowed_dirs.iter().any(|d| d == dir),
            [] => false,
        }
    }

    /// Whether `path` could be served, either as is or through its directory
    /// entry document. Purely lexical, so it runs before any filesystem access.
    pub fn admits(&self, path: &SafePath) -> bool {
        self.allows(path) || self.allows(&path.join_entry())
    }
}

/// Redirect a directory to its entry document.
///
/// Non-directories (and paths that do not exist) pass through unchanged so
/// the actual open decides between 404 and 500.
pub async fn resolve_entry(path: SafePath) -> Result<SafePath, AppError> {
    match tokio::fs::metadata(path.as_path()).await {
        Ok(meta) if meta.is_dir() => {
            let entry = path.join_entry();
            match tokio::fs::metadata(entry.as_path()).await {
                Ok(meta) if meta.is_file() => Ok(entry),
                _ => Err(AppError::NotFound),
            }
        }
        _ => Ok(path),
    }
}
