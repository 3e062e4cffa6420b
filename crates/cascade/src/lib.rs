//! # cascade - inheritance-aware configuration documents
//!
//! Builds flat mappings (for example the instruction set of one operating mode) out of reusable fragments.
//!
//! ## Introduction for developers
//!
//! Read this to understand how `cascade` works internally.
//!
//! ### Documents
//!
//! A document is a named mapping. It may declare parents in the reserved `_inherits` key:
//!
//! ```yaml
//! # editblock_fenced.yml
//! _inherits: [editblock]
//!
//! main_system: |
//!   Act as an expert software developer.
//! example_messages: []
//! ```
//!
//! The document named `base` is special: it is the root of every hierarchy, it never has parents (its `_inherits`
//! is ignored) and a missing base is just an empty document.
//!
//! ### Loading documents
//!
//! see [store]
//!
//! A [store::Backend] lists document names and reads their text, either from a directory
//! ([store::DirectoryBackend]) or from memory ([store::MemoryBackend]). The text is parsed according to its
//! [format::Format] (YAML, JSON or HCL) into a [value::Value] and turned into a [document::RawDocument] by the
//! [store::DocumentStore]. At this point `_inherits` is split off from the fields.
//!
//! ### Chains
//!
//! see [chain]
//!
//! Before merging we decide on the order. The chain of a document lists its ancestors, most basal first, followed
//! by the document itself. Every name appears once. Cycles and overly deep hierarchies are rejected.
//!
//! ### Merging
//!
//! see [merge]
//!
//! Documents are folded in chain order. Nested mappings merge key by key, everything else (including lists) is
//! replaced by the later document.
//!
//! ### Caching
//!
//! see [cache] and [registry]
//!
//! Resolved documents are cached by name until [registry::Registry::reload] drops the whole cache.
//!
pub mod cache;
pub mod chain;
pub mod document;
pub mod error;
pub mod format;
pub mod merge;
pub mod registry;
pub mod store;
pub mod value;

pub use error::{Error, Result};
pub use registry::{Registry, RegistryOptions};
