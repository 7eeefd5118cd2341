//! Versioned parser registry.
//!
//! Holds one parser per (prefix, version). A prefix must be registered in the
//! [`TypeRegistry`] before any parser can be attached to it, and a
//! (prefix, version) pair can only be registered once.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use parking_lot::Mutex;
use tracing::debug;

use crate::{ErasedParser, GlobalIdError, Parser, TypeRegistry};

/// Shared, type-erased parser handle.
pub type SharedParser = Arc<dyn ErasedParser>;

/// Parsers indexed by prefix, then version.
type ParserSnapshot = HashMap<String, HashMap<String, SharedParser>>;

/// Registry of parsers keyed by (prefix, version).
#[derive(Debug)]
pub struct ParserRegistry {
    types: Arc<TypeRegistry>,
    snapshot: ArcSwap<ParserSnapshot>,
    write_lock: Mutex<()>,
}

impl ParserRegistry {
    /// Creates an empty registry validated against `types`.
    pub fn new(types: Arc<TypeRegistry>) -> Self {
        Self {
            types,
            snapshot: ArcSwap::from_pointee(ParserSnapshot::new()),
            write_lock: Mutex::new(()),
        }
    }

    /// The type registry prefixes are validated against.
    pub fn types(&self) -> &Arc<TypeRegistry> {
        &self.types
    }

    /// Registers a parser for a prefix and version.
    pub fn register_parser<P: Parser>(
        &self,
        prefix: &str,
        version: &str,
        parser: P,
    ) -> Result<(), GlobalIdError> {
        self.register_erased(prefix, version, Arc::new(parser))
    }

    /// Registers an already type-erased parser for a prefix and version.
    ///
    /// Fails with [`GlobalIdError::UnknownPrefix`] if the prefix is not in the
    /// type registry, and with [`GlobalIdError::DuplicateVersion`] if the
    /// version is already taken. Existing registrations are never replaced.
    pub fn register_erased(
        &self,
        prefix: &str,
        version: &str,
        parser: SharedParser,
    ) -> Result<(), GlobalIdError> {
        if self.types.type_of(prefix).is_none() {
            return Err(GlobalIdError::UnknownPrefix {
                prefix: prefix.to_string(),
            });
        }

        let _guard = self.write_lock.lock();
        let current = self.snapshot.load();

        let already = current
            .get(prefix)
            .is_some_and(|versions| versions.contains_key(version));
        if already {
            return Err(GlobalIdError::DuplicateVersion {
                prefix: prefix.to_string(),
                version: version.to_string(),
            });
        }

        let value_type = parser.value_type_name();
        let mut next = ParserSnapshot::clone(&current);
        next.entry(prefix.to_string())
            .or_default()
            .insert(version.to_string(), parser);
        self.snapshot.store(Arc::new(next));

        debug!(prefix = %prefix, version = %version, value_type, "Registered parser");
        Ok(())
    }

    /// Looks up the parser for a prefix and version.
    ///
    /// Returns [`GlobalIdError::UnknownPrefix`] when nothing is registered for
    /// the prefix, and [`GlobalIdError::UnknownVersion`] when the prefix is
    /// known but the version is not.
    pub fn get_parser(&self, prefix: &str, version: &str) -> Result<SharedParser, GlobalIdError> {
        let snapshot = self.snapshot.load();
        let versions = snapshot
            .get(prefix)
            .ok_or_else(|| GlobalIdError::UnknownPrefix {
                prefix: prefix.to_string(),
            })?;

        versions
            .get(version)
            .cloned()
            .ok_or_else(|| GlobalIdError::UnknownVersion {
                prefix: prefix.to_string(),
                version: version.to_string(),
            })
    }

    /// Check if any parser is registered for the prefix.
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.snapshot.load().contains_key(prefix)
    }

    /// Registered versions for a prefix, sorted.
    pub fn versions(&self, prefix: &str) -> Vec<String> {
        let snapshot = self.snapshot.load();
        let mut versions: Vec<String> = snapshot
            .get(prefix)
            .map(|versions| versions.keys().cloned().collect())
            .unwrap_or_default();
        versions.sort();
        versions
    }
}

#[cfg(test)]
mod tests {
    use std::any::TypeId;

    use super::*;
    use crate::{JsonParser, StringParser};

    fn registry() -> ParserRegistry {
        let types = Arc::new(TypeRegistry::new());
        types.register_type("Organization", "org").unwrap();
        ParserRegistry::new(types)
    }

    #[test]
    fn test_register_and_get_parser() {
        let registry = registry();
        registry
            .register_parser("org", "1.0.0", StringParser)
            .unwrap();

        let parser = registry.get_parser("org", "1.0.0").unwrap();
        assert_eq!(parser.value_type_id(), TypeId::of::<String>());
        assert!(registry.has_prefix("org"));
    }

    #[test]
    fn test_register_unknown_prefix_rejected() {
        let registry = registry();
        let err = registry
            .register_parser("app", "1.0.0", StringParser)
            .unwrap_err();
        assert_eq!(
            err,
            GlobalIdError::UnknownPrefix {
                prefix: "app".to_string()
            }
        );
        assert!(!registry.has_prefix("app"));
    }

    #[test]
    fn test_duplicate_version_rejected_and_first_kept() {
        let registry = registry();
        registry
            .register_parser("org", "1.0.0", StringParser)
            .unwrap();

        let err = registry
            .register_parser("org", "1.0.0", JsonParser::<serde_json::Value>::new())
            .unwrap_err();
        assert!(matches!(err, GlobalIdError::DuplicateVersion { .. }));

        let parser = registry.get_parser("org", "1.0.0").unwrap();
        assert_eq!(parser.value_type_id(), TypeId::of::<String>());
    }

    #[test]
    fn test_get_parser_distinguishes_prefix_and_version() {
        let registry = registry();
        registry
            .register_parser("org", "1.0.0", StringParser)
            .unwrap();

        let err = registry.get_parser("app", "1.0.0").unwrap_err();
        assert!(matches!(err, GlobalIdError::UnknownPrefix { .. }));

        let err = registry.get_parser("org", "2.0.0").unwrap_err();
        assert_eq!(
            err,
            GlobalIdError::UnknownVersion {
                prefix: "org".to_string(),
                version: "2.0.0".to_string()
            }
        );
    }

    #[test]
    fn test_versions_coexist_and_sort() {
        let registry = registry();
        registry
            .register_parser("org", "2.0.0", JsonParser::<serde_json::Value>::new())
            .unwrap();
        registry
            .register_parser("org", "1.0.0", StringParser)
            .unwrap();

        assert_eq!(registry.versions("org"), vec!["1.0.0", "2.0.0"]);
        assert!(registry.versions("app").is_empty());
    }
}
