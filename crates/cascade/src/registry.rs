//! registry facade
//!
//! The [Registry] is the only type callers need. It owns the [DocumentStore] and the [ResolutionCache]; there is no
//! process wide state. The cache lives as long as the registry.
//!
//! ```
//! use cascade::{memory_documents, registry::Registry, value::Value};
//!
//! let registry = Registry::new(memory_documents! {
//!     "base" => "system: be helpful\nreminder: be brief",
//!     "ask" => "_inherits: [base]\nsystem: answer questions",
//! });
//!
//! let ask = registry.get("ask").unwrap();
//! assert_eq!(ask["system"], Value::from("answer questions"));
//! assert_eq!(ask["reminder"], Value::from("be brief"));
//! assert_eq!(registry.list_available().unwrap(), ["ask"]);
//! ```
use crate::cache::ResolutionCache;
use crate::chain::{Chain, ChainResolver, DEFAULT_MAX_DEPTH};
use crate::document::BASE;
use crate::error::Result;
use crate::store::{Backend, DirectoryBackend, DocumentStore};
use crate::value::Mapping;
use parking_lot::Mutex;
use std::path::PathBuf;

/// Settings for a [Registry]
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct RegistryOptions {
    /// Maximum number of nested documents in one inheritance path
    #[new(value = "DEFAULT_MAX_DEPTH")]
    pub max_depth: usize,
}

impl Default for RegistryOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }
}

/// Resolves documents by name and caches the results
///
/// Resolution and reloads are serialized: a [Registry::reload] happens either completely before or completely after
/// any [Registry::get].
#[derive(Debug)]
pub struct Registry<B> {
    store: DocumentStore<B>,
    options: RegistryOptions,
    cache: Mutex<ResolutionCache>,
}

impl Registry<DirectoryBackend> {
    /// Registry over the documents of a directory
    pub fn from_directory(path: impl Into<PathBuf>) -> Self {
        let backend = DirectoryBackend::new(path);
        tracing::info!(directory=%backend.root().display(), "using document directory");
        Self::new(backend)
    }
}

impl<B: Backend> Registry<B> {
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, RegistryOptions::default())
    }

    pub fn with_options(backend: B, options: RegistryOptions) -> Self {
        Self {
            store: DocumentStore::new(backend),
            options,
            cache: Mutex::new(ResolutionCache::new()),
        }
    }

    pub fn store(&self) -> &DocumentStore<B> {
        &self.store
    }

    /// Fields of the resolved document, without the inheritance declaration
    ///
    /// The mapping is a copy. Changing it does not affect later calls.
    pub fn get(&self, name: &str) -> Result<Mapping> {
        let mut cache = self.cache.lock();
        let resolved = cache.get_or_resolve(&self.store, name, self.options.max_depth)?;
        Ok(resolved.fields.clone())
    }

    /// Forget everything resolved so far, the next [Registry::get] reads from the store again
    pub fn reload(&self) {
        tracing::info!("reloading documents");
        self.cache.lock().invalidate_all();
    }

    /// Names of all documents except the base document, sorted
    pub fn list_available(&self) -> Result<Vec<String>> {
        Ok(self
            .store
            .list_names()?
            .into_iter()
            .filter(|name| name != BASE)
            .collect())
    }

    /// Merge order used to build `name`, most basal document first
    ///
    /// Always read from the store, chains are not cached.
    pub fn chain(&self, name: &str) -> Result<Chain> {
        ChainResolver::new(&self.store, self.options.max_depth).resolve(name)
    }

    pub fn is_cached(&self, name: &str) -> bool {
        self.cache.lock().contains(name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::document::INHERITS_KEY;
    use crate::error::Error;
    use crate::memory_documents;
    use crate::store::MemoryBackend;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    fn diamond() -> MemoryBackend {
        memory_documents! {
            "a" => "shared: a\nonly_a: 1",
            "b" => "_inherits: [a]\nshared: b\nonly_b: 2",
            "c" => "_inherits: [a]\nshared: c\nonly_c: 3",
            "d" => "_inherits: [b, c]\nonly_d: 4",
        }
    }

    #[test]
    fn diamond_later_chain_entry_wins() {
        let registry = Registry::new(diamond());

        assert_eq!(registry.chain("d").unwrap().into_vec(), ["a", "b", "c", "d"]);

        let d = registry.get("d").unwrap();
        assert_eq!(d["shared"], Value::from("c"));
        assert_eq!(
            d.keys().collect::<Vec<_>>(),
            ["shared", "only_a", "only_b", "only_c", "only_d"]
        );
    }

    #[test]
    fn never_returns_inheritance_declaration() {
        let registry = Registry::new(diamond());

        for name in registry.list_available().unwrap() {
            assert!(!registry.get(&name).unwrap().contains_key(INHERITS_KEY));
        }
    }

    #[test]
    fn returned_mapping_is_a_copy() {
        let registry = Registry::new(diamond());

        let mut first = registry.get("b").unwrap();
        first.insert("shared".into(), Value::from("changed"));

        assert_eq!(registry.get("b").unwrap()["shared"], Value::from("b"));
    }

    #[test]
    fn reload_observes_changes() {
        let backend = diamond();
        let registry = Registry::new(backend.clone());

        assert_eq!(registry.get("a").unwrap()["shared"], Value::from("a"));

        backend.insert_yaml("a", "shared: changed");
        assert_eq!(registry.get("a").unwrap()["shared"], Value::from("a"));

        registry.reload();
        assert!(!registry.is_cached("a"));
        assert_eq!(registry.get("a").unwrap()["shared"], Value::from("changed"));
    }

    #[test]
    fn unknown_document() {
        let registry = Registry::new(diamond());
        assert!(matches!(
            registry.get("does-not-exist"),
            Err(Error::NotFound(name)) if name == "does-not-exist"
        ));
    }

    #[test]
    fn failed_get_leaves_no_entry() {
        let backend = memory_documents! { "broken" => "key: [unclosed" };
        let registry = Registry::new(backend.clone());

        assert!(matches!(
            registry.get("broken"),
            Err(Error::Validation { .. })
        ));
        assert!(!registry.is_cached("broken"));

        backend.insert_yaml("broken", "key: [closed]");
        assert_eq!(
            registry.get("broken").unwrap()["key"],
            Value::from(vec!["closed"])
        );
    }

    #[test]
    fn list_available_is_sorted_without_base() {
        let registry = Registry::new(memory_documents! {
            "wholefile" => "",
            "base" => "",
            "agent" => "",
            "editblock" => "",
        });

        assert_eq!(
            registry.list_available().unwrap(),
            ["agent", "editblock", "wholefile"]
        );
    }

    #[test]
    fn max_depth_option() {
        let registry = Registry::with_options(
            memory_documents! {
                "one" => "",
                "two" => "_inherits: [one]",
                "three" => "_inherits: [two]",
            },
            RegistryOptions::default().with_max_depth(2),
        );

        assert!(registry.get("two").is_ok());
        assert!(matches!(
            registry.get("three"),
            Err(Error::TooDeep { name, limit: 2 }) if name == "one"
        ));
    }

    #[test]
    fn shared_between_threads() {
        let registry = std::sync::Arc::new(Registry::new(diamond()));

        let handles: Vec<_> = (0..4)
            .map(|worker| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        if worker == 0 {
                            registry.reload();
                        }
                        assert_eq!(registry.get("d").unwrap()["shared"], Value::from("c"));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }
    }
}
