//! Identifier carriers passed into the encoder and returned by the decoder.

use serde::{Deserialize, Serialize};

/// A typed, versioned value: the decoded form of an encoded global ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalId<T> {
    type_name: String,
    version: String,
    value: T,
}

impl<T> GlobalId<T> {
    /// Creates a new global ID.
    pub fn new(type_name: impl Into<String>, version: impl Into<String>, value: T) -> Self {
        Self {
            type_name: type_name.into(),
            version: version.into(),
            value,
        }
    }

    /// The logical type name, e.g. `Organization`.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The parser version the value was formatted with.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// The value.
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Consumes the ID, returning the value.
    pub fn into_value(self) -> T {
        self.value
    }

    /// Maps the value, keeping type and version.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GlobalId<U> {
        GlobalId {
            type_name: self.type_name,
            version: self.version,
            value: f(self.value),
        }
    }
}

/// The registry-independent content of an encoded ID.
///
/// `data` is the formatted value exactly as it was carried on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawGlobalId {
    pub prefix: String,
    pub data: String,
    pub version: String,
}
