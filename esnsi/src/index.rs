//! Lookup tables over a classifier's record list.
//!
//! Indices hold positions into the owning classifier's `records`, so they stay valid
//! for as long as the classifier itself.

use std::collections::{HashMap, hash_map::Entry};

use crate::error::ValidationError;

/// What an exact-keyed index does when a key is inserted twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Fail with [`ValidationError::DuplicateKey`].
    Reject,
    /// Keep the record that was inserted first.
    KeepFirst,
    /// Replace with the record inserted last.
    KeepLast,
}

/// At most one record per key.
#[derive(Debug, Clone)]
pub struct KeyIndex {
    scheme: &'static str,
    policy: DuplicatePolicy,
    map: HashMap<String, usize>,
}

impl KeyIndex {
    /// `scheme` names the code system in duplicate-key errors.
    pub fn new(scheme: &'static str, policy: DuplicatePolicy) -> Self {
        Self {
            scheme,
            policy,
            map: HashMap::new(),
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, pos: usize) -> Result<(), ValidationError> {
        match self.map.entry(key.into()) {
            Entry::Vacant(e) => {
                e.insert(pos);
            }
            Entry::Occupied(mut e) => match self.policy {
                DuplicatePolicy::Reject => {
                    return Err(ValidationError::DuplicateKey {
                        scheme: self.scheme,
                        key: e.key().clone(),
                    });
                }
                DuplicatePolicy::KeepFirst => {}
                DuplicatePolicy::KeepLast => {
                    e.insert(pos);
                }
            },
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<usize> {
        self.map.get(key).copied()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Any number of records per key, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MultiIndex {
    map: HashMap<String, Vec<usize>>,
}

impl MultiIndex {
    pub fn push(&mut self, key: impl Into<String>, pos: usize) {
        self.map.entry(key.into()).or_default().push(pos);
    }

    /// Insert only if nothing is stored under `key` yet. Returns whether it was inserted.
    pub fn push_first(&mut self, key: impl Into<String>, pos: usize) -> bool {
        match self.map.entry(key.into()) {
            Entry::Vacant(e) => {
                e.insert(vec![pos]);
                true
            }
            Entry::Occupied(_) => false,
        }
    }

    /// Positions under `key`; empty when the key is unknown.
    pub fn get(&self, key: &str) -> &[usize] {
        self.map.get(key).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
