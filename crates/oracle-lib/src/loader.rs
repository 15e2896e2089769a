//! Schema file loading.
//!
//! Imports name schemas by repository-relative path, with or without the
//! schema extension (`import "schema/core/label"`). A [`FileLoader`] turns
//! such a path into source text; the analyzer never touches the filesystem
//! directly.

use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;

/// Extension of schema files.
pub const SCHEMA_EXTENSION: &str = ".oracle";

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("`{0}` not found")]
    NotFound(String),

    #[error("failed to read `{path}`")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Source text of a schema, with the path diagnostics should show for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub source: String,
    pub path: String,
}

pub trait FileLoader {
    fn load(&self, import_path: &str) -> Result<LoadedFile, LoadError>;
}

impl<L: FileLoader + ?Sized> FileLoader for &L {
    fn load(&self, import_path: &str) -> Result<LoadedFile, LoadError> {
        (**self).load(import_path)
    }
}

/// Strip the schema extension, so `a/b` and `a/b.oracle` name the same file.
pub fn normalize_import_path(path: &str) -> &str {
    path.strip_suffix(SCHEMA_EXTENSION).unwrap_or(path)
}

/// Namespace of a schema file: its file name without directories or extension.
///
/// `schema/core/label.oracle` and `schema/core/label` both give `label`.
pub fn derive_namespace(path: &str) -> &str {
    let base = path.rsplit(['/', '\\']).next().unwrap_or(path);
    normalize_import_path(base)
}

/// Loads schemas relative to a repository root.
#[derive(Debug, Clone)]
pub struct FileSystemLoader {
    root: PathBuf,
    extension: String,
}

impl FileSystemLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: SCHEMA_EXTENSION.to_owned(),
        }
    }

    /// Extension appended to import paths that lack it. Include the leading dot.
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, import_path: &str) -> PathBuf {
        let mut relative = import_path.to_owned();
        if !relative.ends_with(&self.extension) {
            relative.push_str(&self.extension);
        }
        let path = Path::new(&relative);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl FileLoader for FileSystemLoader {
    fn load(&self, import_path: &str) -> Result<LoadedFile, LoadError> {
        let path = self.resolve(import_path);
        let display = path.to_string_lossy().into_owned();
        match std::fs::read_to_string(&path) {
            Ok(source) => Ok(LoadedFile {
                source,
                path: display,
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(LoadError::NotFound(display)),
            Err(source) => Err(LoadError::Io {
                path: display,
                source,
            }),
        }
    }
}

/// In-memory schemas keyed by import path, for tests and editor tooling.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: IndexMap<String, String>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, path: &str, source: &str) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&mut self, path: &str, source: &str) {
        self.files
            .insert(normalize_import_path(path).to_owned(), source.to_owned());
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileLoader for MemoryLoader {
    fn load(&self, import_path: &str) -> Result<LoadedFile, LoadError> {
        let key = normalize_import_path(import_path);
        let source = self
            .files
            .get(key)
            .ok_or_else(|| LoadError::NotFound(import_path.to_owned()))?;
        Ok(LoadedFile {
            source: source.clone(),
            path: format!("{}{}", key, SCHEMA_EXTENSION),
        })
    }
}
