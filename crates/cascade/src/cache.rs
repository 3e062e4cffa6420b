//! resolution cache
//!
//! Resolved documents are cached by name. The base document is held on its own since almost every chain ends
//! up merging it.
//!
//! Invalidation is all or nothing: [ResolutionCache::invalidate_all] drops every entry, including the base.
use crate::chain::ChainResolver;
use crate::document::{RawDocument, ResolvedDocument, BASE};
use crate::error::Result;
use crate::merge::merge_chain;
use crate::store::{Backend, DocumentStore};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct ResolutionCache {
    resolved: HashMap<String, ResolvedDocument>,
    base: Option<RawDocument>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolved.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Return the cached document or resolve, cache and return it
    ///
    /// Nothing is cached when resolution fails.
    pub fn get_or_resolve<B: Backend>(
        &mut self,
        store: &DocumentStore<B>,
        name: &str,
        max_depth: usize,
    ) -> Result<&ResolvedDocument> {
        if self.resolved.contains_key(name) {
            tracing::debug!(document = name, "cache hit");
            return Ok(&self.resolved[name]);
        }

        tracing::debug!(document = name, "cache miss");
        let resolved = self.resolve(store, name, max_depth)?;
        Ok(self.resolved.entry(name.to_string()).or_insert(resolved))
    }

    /// Drop all cached documents and the held base document
    pub fn invalidate_all(&mut self) {
        tracing::debug!(entries = self.resolved.len(), "invalidating cache");
        self.resolved.clear();
        self.base = None;
    }

    #[tracing::instrument(level = "debug", skip(self, store))]
    fn resolve<B: Backend>(
        &mut self,
        store: &DocumentStore<B>,
        name: &str,
        max_depth: usize,
    ) -> Result<ResolvedDocument> {
        let mut resolver = ChainResolver::new(store, max_depth);
        let chain = resolver.resolve(name)?;

        let mut documents = Vec::with_capacity(chain.len());
        for current in &chain {
            if current == BASE {
                documents.push(self.base(store)?.clone());
            } else {
                documents.push(resolver.take_document(current)?);
            }
        }

        let fields = merge_chain(documents.iter().map(|document| &document.fields));
        tracing::trace!(%chain, "document resolved");

        Ok(ResolvedDocument::new(name.to_string(), fields))
    }

    /// The held base document, loading it on first use
    fn base<B: Backend>(&mut self, store: &DocumentStore<B>) -> Result<&RawDocument> {
        let base = match self.base.take() {
            Some(base) => base,
            None => store.load_base()?,
        };

        Ok(self.base.insert(base))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::chain::DEFAULT_MAX_DEPTH;
    use crate::document::INHERITS_KEY;
    use crate::error::Error;
    use crate::memory_documents;
    use crate::value::Value;
    use pretty_assertions::assert_eq;

    #[test]
    fn resolves_and_caches() {
        let backend = memory_documents! {
            "base" => "greeting: hello\nfarewell: bye",
            "loud" => "_inherits: [base]\ngreeting: HELLO",
        };
        let store = DocumentStore::new(backend.clone());
        let mut cache = ResolutionCache::new();

        let resolved = cache.get_or_resolve(&store, "loud", DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(resolved.name, "loud");
        assert_eq!(resolved.fields["greeting"], Value::from("HELLO"));
        assert_eq!(resolved.fields["farewell"], Value::from("bye"));
        assert!(!resolved.fields.contains_key(INHERITS_KEY));

        // served from the cache, even though the source changed
        backend.insert_yaml("loud", "_inherits: [base]\ngreeting: QUIET");
        let resolved = cache.get_or_resolve(&store, "loud", DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(resolved.fields["greeting"], Value::from("HELLO"));
    }

    #[test]
    fn base_is_held_until_invalidated() {
        let backend = memory_documents! {
            "base" => "version: 1",
            "one" => "_inherits: [base]",
            "two" => "_inherits: [base]",
        };
        let store = DocumentStore::new(backend.clone());
        let mut cache = ResolutionCache::new();

        cache.get_or_resolve(&store, "one", DEFAULT_MAX_DEPTH).unwrap();
        backend.insert_yaml("base", "version: 2");

        let two = cache.get_or_resolve(&store, "two", DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(two.fields["version"], Value::Integer(1));

        cache.invalidate_all();
        assert!(cache.is_empty());

        let two = cache.get_or_resolve(&store, "two", DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(two.fields["version"], Value::Integer(2));
    }

    #[test]
    fn failures_are_not_cached() {
        let backend = memory_documents! { "child" => "_inherits: [parent]" };
        let store = DocumentStore::new(backend.clone());
        let mut cache = ResolutionCache::new();

        assert!(matches!(
            cache.get_or_resolve(&store, "child", DEFAULT_MAX_DEPTH),
            Err(Error::NotFound(name)) if name == "parent"
        ));
        assert!(!cache.contains("child"));

        backend.insert_yaml("parent", "fixed: true");
        let child = cache.get_or_resolve(&store, "child", DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(child.fields["fixed"], Value::Boolean(true));
    }

    #[test]
    fn base_resolves_to_its_own_fields() {
        let store = DocumentStore::new(memory_documents! {
            "base" => "_inherits: []\nkey: value",
        });
        let mut cache = ResolutionCache::new();

        let base = cache.get_or_resolve(&store, BASE, DEFAULT_MAX_DEPTH).unwrap();
        assert_eq!(base.fields.keys().collect::<Vec<_>>(), ["key"]);
    }
}
