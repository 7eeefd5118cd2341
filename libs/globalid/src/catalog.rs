//! Named parser factories.
//!
//! Configuration refers to parsers by name (`"string"`, `"json"`, or any name
//! an application registers). The catalog turns that name into a fresh parser
//! instance.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::registry::SharedParser;
use crate::{GlobalIdError, JsonParser, Parser, StringParser};

/// Name of the built-in identity string parser.
pub const STRING_PARSER: &str = "string";

/// Name of the built-in JSON parser (values are `serde_json::Value`).
pub const JSON_PARSER: &str = "json";

/// Parser name used when configuration omits one.
pub(crate) fn default_parser() -> String {
    STRING_PARSER.to_string()
}

type Factory = Arc<dyn Fn() -> SharedParser + Send + Sync>;

/// Parser factories keyed by name.
#[derive(Clone, Default)]
pub struct ParserCatalog {
    factories: BTreeMap<String, Factory>,
}

impl ParserCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a catalog with the built-in parsers registered.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::new();
        catalog.register(STRING_PARSER, || StringParser);
        catalog.register(JSON_PARSER, JsonParser::<serde_json::Value>::new);
        catalog
    }

    /// Registers a factory under a name, replacing any previous one.
    pub fn register<P, F>(&mut self, name: impl Into<String>, factory: F)
    where
        P: Parser,
        F: Fn() -> P + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move || Arc::new(factory()) as SharedParser);
        self.factories.insert(name.into(), factory);
    }

    /// Builds a parser by name.
    pub fn build(&self, name: &str) -> Result<SharedParser, GlobalIdError> {
        self.factories
            .get(name)
            .map(|factory| factory())
            .ok_or_else(|| GlobalIdError::UnknownParser {
                name: name.to_string(),
            })
    }

    /// Check if a name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|k| k.as_str())
    }
}

impl fmt::Debug for ParserCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}
