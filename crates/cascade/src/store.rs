//! document store and its backends
//!
//! A [Backend] only knows about names and bytes. [DocumentStore] turns those bytes into [RawDocument]s.
//!
//! - [DirectoryBackend] reads `<name>.<ext>` files from one directory
//! - [MemoryBackend] keeps sources in memory, behind a shared handle
use crate::document::{RawDocument, BASE};
use crate::error::{Error, Result};
use crate::format::Format;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Unparsed document content and where it came from
///
/// The content is not required to be UTF-8, the store rejects it when it is not.
#[derive(Debug, Clone, PartialEq, derive_new::new)]
pub struct Source {
    pub format: Format,
    pub content: Vec<u8>,
    /// The path is only used to point at the file in messages
    #[new(default)]
    pub origin: Option<PathBuf>,
}

/// Something documents can be read from
pub trait Backend {
    /// Names of all documents, including the base document
    fn list_names(&self) -> std::io::Result<BTreeSet<String>>;

    /// Read the source of a document, `None` if there is no such document
    fn read(&self, name: &str) -> std::io::Result<Option<Source>>;
}

/// Loads [RawDocument]s by name
#[derive(Debug)]
pub struct DocumentStore<B> {
    backend: B,
}

impl<B: Backend> DocumentStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[tracing::instrument(level = "trace", skip(self))]
    pub fn load(&self, name: &str) -> Result<Option<RawDocument>> {
        let source = self.backend.read(name).map_err(|source| Error::Io {
            name: name.to_string(),
            source,
        })?;

        let Some(source) = source else {
            return Ok(None);
        };

        let text = std::str::from_utf8(&source.content).map_err(|err| {
            tracing::debug!(origin=?source.origin, %err, "document is not utf-8");
            Error::validation(name, err)
        })?;

        let value = source.format.parse(text).map_err(|err| {
            tracing::debug!(origin=?source.origin, %err, "unable to parse document");
            Error::validation(name, err)
        })?;

        RawDocument::from_value(name, value).map(Some)
    }

    /// Load the base document
    ///
    /// A missing base document is an empty one.
    pub fn load_base(&self) -> Result<RawDocument> {
        match self.load(BASE)? {
            Some(base) => Ok(base),
            None => {
                tracing::debug!("no base document, using an empty one");
                Ok(RawDocument::empty(BASE))
            }
        }
    }

    pub fn list_names(&self) -> Result<BTreeSet<String>> {
        self.backend.list_names().map_err(Error::List)
    }
}

/// Documents stored as files in a single directory
#[derive(Debug, Clone)]
pub struct DirectoryBackend {
    root: PathBuf,
}

impl DirectoryBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Names that would escape the directory or refer to hidden files are never found
    fn is_valid_name(name: &str) -> bool {
        !name.is_empty()
            && !name.starts_with('.')
            && !name.contains(|c| matches!(c, '/' | '\\'))
    }
}

impl Backend for DirectoryBackend {
    fn list_names(&self) -> std::io::Result<BTreeSet<String>> {
        let mut names = BTreeSet::new();

        for dir_entry in std::fs::read_dir(&self.root)? {
            let path = dir_entry?.path();
            // follows symlinks, the same way `read` does
            if !path.is_file() {
                continue;
            }

            let supported = path
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(Format::from_extension)
                .is_some();
            if !supported {
                continue;
            }

            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                if Self::is_valid_name(stem) {
                    names.insert(stem.to_string());
                }
            }
        }

        Ok(names)
    }

    fn read(&self, name: &str) -> std::io::Result<Option<Source>> {
        if !Self::is_valid_name(name) {
            return Ok(None);
        }

        for (extension, format) in Format::EXTENSIONS {
            let path = self.root.join(format!("{name}.{extension}"));
            if !path.is_file() {
                continue;
            }

            tracing::debug!(path=%path.display(), "reading document");
            let content = std::fs::read(&path)?;
            return Ok(Some(Source {
                format,
                content,
                origin: Some(path),
            }));
        }

        Ok(None)
    }
}

/// In-memory documents
///
/// Clones share the same documents, so a handle kept by the caller can change what a registry sees.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    documents: Arc<RwLock<IndexMap<String, Source>>>,
}

impl MemoryBackend {
    /// Insert or replace a document
    pub fn insert(&self, name: impl Into<String>, source: Source) {
        self.documents.write().insert(name.into(), source);
    }

    pub fn insert_yaml(&self, name: impl Into<String>, text: impl Into<String>) {
        self.insert(name, Source::new(Format::Yaml, text.into().into_bytes()));
    }

    pub fn remove(&self, name: &str) -> Option<Source> {
        self.documents.write().shift_remove(name)
    }
}

impl<N: Into<String>, T: Into<String>> FromIterator<(N, T)> for MemoryBackend {
    /// Collect YAML documents
    fn from_iter<I: IntoIterator<Item = (N, T)>>(iter: I) -> Self {
        let backend = MemoryBackend::default();
        for (name, text) in iter {
            backend.insert_yaml(name, text);
        }
        backend
    }
}

impl Backend for MemoryBackend {
    fn list_names(&self) -> std::io::Result<BTreeSet<String>> {
        Ok(self.documents.read().keys().cloned().collect())
    }

    fn read(&self, name: &str) -> std::io::Result<Option<Source>> {
        Ok(self.documents.read().get(name).cloned())
    }
}

/// Utility macro to create a [MemoryBackend] from YAML sources
///
/// ```
/// # use cascade::memory_documents;
/// use cascade::store::Backend;
///
/// let backend = memory_documents! {
///     "base" => "greeting: hello",
///     "loud" => "_inherits: [base]\ngreeting: HELLO",
/// };
/// assert_eq!(backend.list_names().unwrap().len(), 2);
/// ```
#[macro_export]
macro_rules! memory_documents {
    { $($name:expr => $text:expr),* $(,)? } => {{
        let backend = $crate::store::MemoryBackend::default();
        $(
            backend.insert_yaml($name, $text);
        )*
        backend
    }};
}
