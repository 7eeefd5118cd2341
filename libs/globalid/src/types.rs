//! Bidirectional type name <-> wire prefix registry.
//!
//! The registry is append-only: once an identifier has been minted with a
//! prefix, remapping that prefix would silently change the meaning of every
//! identifier already issued.
//!
//! Readers load an immutable snapshot without locking. Writers are serialized
//! and publish a new snapshot with a single pointer swap, so a lookup never
//! observes half of a registration.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::debug;

use crate::GlobalIdError;

/// Delimiter between the prefix and the payload of an encoded ID.
pub const PREFIX_DELIMITER: char = '_';

/// A registered (type, prefix) mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeEntry {
    /// Logical type name, e.g. `Organization`.
    pub type_name: String,
    /// Short wire prefix, e.g. `org`.
    pub prefix: String,
}

#[derive(Debug, Default, Clone)]
struct TypeSnapshot {
    type_to_prefix: HashMap<String, String>,
    prefix_to_type: HashMap<String, String>,
}

/// Registry mapping logical type names to wire prefixes and back.
#[derive(Debug)]
pub struct TypeRegistry {
    snapshot: ArcSwap<TypeSnapshot>,
    write_lock: Mutex<()>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            snapshot: ArcSwap::from_pointee(TypeSnapshot::default()),
            write_lock: Mutex::new(()),
        }
    }

    /// Registers a type under a prefix.
    ///
    /// Fails if the prefix is not usable on the wire, or if either the type or
    /// the prefix is already mapped. Both directions become visible together.
    pub fn register_type(
        &self,
        type_name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Result<(), GlobalIdError> {
        let type_name = type_name.into();
        let prefix = prefix.into();
        validate_prefix(&prefix)?;

        let _guard = self.write_lock.lock();
        let current = self.snapshot.load();

        if current.type_to_prefix.contains_key(&type_name) {
            return Err(GlobalIdError::DuplicateType { type_name });
        }
        if current.prefix_to_type.contains_key(&prefix) {
            return Err(GlobalIdError::DuplicatePrefix { prefix });
        }

        let mut next = TypeSnapshot::clone(&current);
        next.type_to_prefix.insert(type_name.clone(), prefix.clone());
        next.prefix_to_type.insert(prefix.clone(), type_name.clone());
        self.snapshot.store(Arc::new(next));

        debug!(type_name = %type_name, prefix = %prefix, "Registered type");
        Ok(())
    }

    /// Returns the prefix registered for a type.
    pub fn prefix_of(&self, type_name: &str) -> Option<String> {
        self.snapshot.load().type_to_prefix.get(type_name).cloned()
    }

    /// Returns the type registered for a prefix.
    pub fn type_of(&self, prefix: &str) -> Option<String> {
        self.snapshot.load().prefix_to_type.get(prefix).cloned()
    }

    /// All entries, sorted by type name.
    pub fn entries(&self) -> Vec<TypeEntry> {
        let snapshot = self.snapshot.load();
        let mut entries: Vec<TypeEntry> = snapshot
            .type_to_prefix
            .iter()
            .map(|(type_name, prefix)| TypeEntry {
                type_name: type_name.clone(),
                prefix: prefix.clone(),
            })
            .collect();
        entries.sort();
        entries
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.snapshot.load().type_to_prefix.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.snapshot.load().type_to_prefix.is_empty()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Checks that a prefix can delimit an encoded ID unambiguously.
pub fn validate_prefix(prefix: &str) -> Result<(), GlobalIdError> {
    if prefix.is_empty() {
        return Err(GlobalIdError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "prefix cannot be empty",
        });
    }
    if prefix.contains(PREFIX_DELIMITER) {
        return Err(GlobalIdError::InvalidPrefix {
            prefix: prefix.to_string(),
            reason: "prefix cannot contain '_'",
        });
    }
    Ok(())
}
