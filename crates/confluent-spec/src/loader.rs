use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::types::error::{SpecError, E_IO, E_UNRESOLVED_INCLUDE};
use crate::types::source::{Source, SourceId};

/// Raw content of a definition source, as returned by a [`SourceLoader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceText {
    pub id: SourceId,
    pub content: String,
}

/// Maps an include reference to the content of another definition source.
///
/// The graph builder calls this for every include directive; it never reads
/// sources on its own.
pub trait SourceLoader: Send + Sync {
    /// Load the source named by `reference`. `includer` is the source that
    /// contains the include directive (`None` for root sources).
    fn load(&self, reference: &str, includer: Option<&SourceId>) -> Result<SourceText, LoadError>;
}

/// Errors raised by source loaders
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("source not found: {0}")]
    NotFound(String),

    #[error("I/O error reading {0}: {1}")]
    IoError(String, std::io::Error),
}

impl LoadError {
    pub fn code(&self) -> &'static str {
        match self {
            LoadError::NotFound(_) => E_UNRESOLVED_INCLUDE,
            LoadError::IoError(..) => E_IO,
        }
    }
}

/// Loads definition sources from the file system. Relative include paths
/// are resolved against the directory of the including source.
#[derive(Debug, Clone, Default)]
pub struct FileSourceLoader {
    base_dir: Option<PathBuf>,
}

impl FileSourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative root references against `base_dir` instead of the
    /// working directory.
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    /// Load and parse a root source file.
    pub fn read_root(&self, path: &Path) -> Result<Source, ReadError> {
        let text = self.load(&path.to_string_lossy(), None)?;
        Ok(Source::parse(text)?)
    }

    fn resolve_path(&self, reference: &str, includer: Option<&SourceId>) -> PathBuf {
        let path = Path::new(reference);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        let dir = match includer {
            Some(id) => Path::new(id.as_str()).parent().map(Path::to_path_buf),
            None => self.base_dir.clone(),
        };
        match dir {
            Some(dir) => dir.join(path),
            None => path.to_path_buf(),
        }
    }
}

impl SourceLoader for FileSourceLoader {
    fn load(&self, reference: &str, includer: Option<&SourceId>) -> Result<SourceText, LoadError> {
        let path = self.resolve_path(reference, includer);
        if !path.is_file() {
            return Err(LoadError::NotFound(path.to_string_lossy().into_owned()));
        }

        // Canonical paths make the same file reached through different
        // relative routes compare equal.
        let path = path.canonicalize().unwrap_or(path);
        let content = std::fs::read_to_string(&path)
            .map_err(|e| LoadError::IoError(path.to_string_lossy().into_owned(), e))?;

        tracing::info!(path = %path.display(), "loaded definition source");
        Ok(SourceText {
            id: SourceId::from(path.as_path()),
            content,
        })
    }
}

/// Serves definition sources from memory, keyed by reference.
#[derive(Debug, Clone, Default)]
pub struct MemorySourceLoader {
    sources: IndexMap<String, String>,
}

impl MemorySourceLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, reference: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(reference, content);
        self
    }

    pub fn insert(&mut self, reference: impl Into<String>, content: impl Into<String>) {
        self.sources.insert(reference.into(), content.into());
    }

    /// Load and parse a registered source as a root source.
    pub fn read_root(&self, reference: &str) -> Result<Source, ReadError> {
        let text = self.load(reference, None)?;
        Ok(Source::parse(text)?)
    }
}

impl SourceLoader for MemorySourceLoader {
    fn load(&self, reference: &str, _includer: Option<&SourceId>) -> Result<SourceText, LoadError> {
        self.sources
            .get(reference)
            .map(|content| SourceText {
                id: SourceId::from(reference),
                content: content.clone(),
            })
            .ok_or_else(|| LoadError::NotFound(reference.to_string()))
    }
}

/// Failure to read a root source: it could not be loaded or not be parsed.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Spec(#[from] SpecError),
}

impl ReadError {
    pub fn code(&self) -> &'static str {
        match self {
            ReadError::Load(e) => e.code(),
            ReadError::Spec(e) => e.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_loader_resolves_relative_to_includer() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("nested");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("root.yaml"), "properties: []\n").unwrap();
        std::fs::write(nested.join("include.yaml"), "properties: []\n").unwrap();

        let loader = FileSourceLoader::new();
        let root = loader
            .load(&nested.join("root.yaml").to_string_lossy(), None)
            .unwrap();
        let included = loader.load("include.yaml", Some(&root.id)).unwrap();

        assert!(included.id.as_str().ends_with("include.yaml"));
        assert_eq!(included.content, "properties: []\n");
    }

    #[test]
    fn test_file_loader_base_dir() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("a.yaml"), "properties: []\n").unwrap();

        let loader = FileSourceLoader::with_base_dir(tmp.path());
        let source = loader.read_root(Path::new("a.yaml")).unwrap();
        assert!(source.document.properties.is_empty());
        assert_eq!(source.id.stem(), "a");
    }

    #[test]
    fn test_file_loader_missing_file() {
        let tmp = TempDir::new().unwrap();
        let loader = FileSourceLoader::with_base_dir(tmp.path());
        let err = loader.load("missing.yaml", None).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert_eq!(err.code(), E_UNRESOLVED_INCLUDE);
    }

    #[test]
    fn test_memory_loader() {
        let loader = MemorySourceLoader::new().with_source("a.yaml", "properties: []");
        assert_eq!(loader.load("a.yaml", None).unwrap().id.as_str(), "a.yaml");
        assert!(matches!(
            loader.load("b.yaml", None),
            Err(LoadError::NotFound(_))
        ));
    }

    #[test]
    fn test_read_root_reports_parse_errors() {
        let loader = MemorySourceLoader::new().with_source("bad.yaml", "properties: [ {");
        let err = loader.read_root("bad.yaml").unwrap_err();
        assert!(matches!(err, ReadError::Spec(SpecError::Parse { .. })));
    }
}
