//! inheritance chain resolution
//!
//! A chain lists the documents that have to be merged to build a document, most basal ancestor first and the
//! document itself last.
//!
//! Chains are built depth first in declared parent order. Each parent contributes its own chain, and an entry is
//! only appended if it is not already part of the chain. The first discovery decides the position; later
//! occurrences are dropped, not moved.
//!
//! Given
//!
//! ```yaml
//! # a
//! greeting: hello
//! # b
//! _inherits: [a]
//! # c
//! _inherits: [a]
//! # d
//! _inherits: [b, c]
//! ```
//!
//! the chain of `d` is `a, b, c, d`.
//!
//! This is not a full linearization (such as C3). Parents sharing deep ancestors in a different order are not
//! reconciled.
//!
//! Resolution does not recurse. Pending parents live in an explicit stack of [Frame]s, one per document on the
//! current path. A parent that is already on the stack (or in the caller supplied `visiting` set) is a cycle.
//! Sibling branches never see each other, so a shared ancestor in a diamond is not a cycle.
//!
//! The chain of every document completed during a resolution is kept. Reaching that document again (through another
//! branch) reuses its chain instead of walking its ancestry again, so each document is expanded at most once per
//! resolution. A completed chain has already been searched for cycles all the way down.
use crate::document::{RawDocument, BASE};
use crate::error::{Error, Result};
use crate::store::{Backend, DocumentStore};
use std::collections::{HashMap, HashSet};

/// Default limit for nested inheritance
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Ordered, duplicate free list of document names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain(Vec<String>);

impl Chain {
    /// The chain of the base document
    pub fn base() -> Self {
        Self(vec![BASE.to_string()])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|existing| existing == name)
    }

    /// Append unless already present
    pub fn push(&mut self, name: String) {
        if !self.contains(&name) {
            self.0.push(name);
        }
    }

    /// Append all names of `other` that are not already present, keeping their order
    pub fn extend(&mut self, other: Chain) {
        for name in other.0 {
            self.push(name);
        }
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Chain {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0.join(" -> "))
    }
}

/// A document on the current resolution path
#[derive(Debug)]
struct Frame {
    name: String,
    /// Parents that still have to be resolved
    pending: std::vec::IntoIter<String>,
    /// Accumulated chain of the parents resolved so far
    chain: Chain,
}

/// Resolves chains against a [DocumentStore]
///
/// Documents read while resolving are kept until the resolver is dropped, so each document is read at most once
/// per resolution. Use a fresh resolver for every resolution.
pub struct ChainResolver<'s, B> {
    store: &'s DocumentStore<B>,
    max_depth: usize,
    loaded: HashMap<String, RawDocument>,
    /// Number of frames opened so far
    opened: usize,
}

impl<'s, B: Backend> ChainResolver<'s, B> {
    pub fn new(store: &'s DocumentStore<B>, max_depth: usize) -> Self {
        Self {
            store,
            max_depth,
            loaded: Default::default(),
            opened: 0,
        }
    }

    /// Resolve the chain of `name` without any documents being visited yet
    pub fn resolve(&mut self, name: &str) -> Result<Chain> {
        self.resolve_chain(name, &HashSet::new())
    }

    /// Resolve the chain of `name`
    ///
    /// Fails with [Error::CircularDependency] when `name` is part of `visiting`, or when any path of its ancestry
    /// leads back to a document on that path.
    #[tracing::instrument(level = "debug", skip(self, visiting))]
    pub fn resolve_chain(&mut self, name: &str, visiting: &HashSet<String>) -> Result<Chain> {
        if visiting.contains(name) {
            return Err(Error::CircularDependency(name.to_string()));
        }

        if name == BASE {
            return Ok(Chain::base());
        }

        let mut finished: HashMap<String, Chain> = HashMap::new();
        let mut stack = vec![self.open(name)?];

        while let Some(mut frame) = stack.pop() {
            if let Some(parent) = frame.pending.next() {
                let is_cycle = visiting.contains(&parent)
                    || frame.name == parent
                    || stack.iter().any(|on_path| on_path.name == parent);
                if is_cycle {
                    tracing::debug!(document = %frame.name, %parent, "cycle detected");
                    return Err(Error::CircularDependency(parent));
                }

                if parent == BASE {
                    frame.chain.extend(Chain::base());
                    stack.push(frame);
                    continue;
                }

                if let Some(parent_chain) = finished.get(&parent) {
                    frame.chain.extend(parent_chain.clone());
                    stack.push(frame);
                    continue;
                }

                // the frame goes back on the stack, the parent on top of it
                if stack.len() + 2 > self.max_depth {
                    return Err(Error::TooDeep {
                        name: parent,
                        limit: self.max_depth,
                    });
                }

                let parent_frame = self.open(&parent)?;
                stack.push(frame);
                stack.push(parent_frame);
                continue;
            }

            // all parents are done
            let Frame {
                name, mut chain, ..
            } = frame;
            chain.push(name.clone());
            tracing::trace!(%chain, "chain resolved");

            match stack.last_mut() {
                Some(child) => {
                    child.chain.extend(chain.clone());
                    finished.insert(name, chain);
                }
                None => {
                    tracing::debug!(frames = self.opened, "resolution complete");
                    return Ok(chain);
                }
            }
        }

        unreachable!("the requested document is the last frame to complete");
    }

    /// Take a document read during resolution, loading it if it was not read yet
    ///
    /// The base document is never read by the resolver.
    pub fn take_document(&mut self, name: &str) -> Result<RawDocument> {
        if let Some(document) = self.loaded.remove(name) {
            return Ok(document);
        }

        self.store
            .load(name)?
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn open(&mut self, name: &str) -> Result<Frame> {
        let inherits = match self.loaded.get(name) {
            Some(document) => document.inherits.clone(),
            None => {
                let document = self
                    .store
                    .load(name)?
                    .ok_or_else(|| Error::NotFound(name.to_string()))?;
                let inherits = document.inherits.clone();
                self.loaded.insert(name.to_string(), document);
                inherits
            }
        };

        self.opened += 1;
        tracing::trace!(document = name, parents = ?inherits, "visiting");
        Ok(Frame {
            name: name.to_string(),
            pending: inherits.into_iter(),
            chain: Chain::default(),
        })
    }
}
