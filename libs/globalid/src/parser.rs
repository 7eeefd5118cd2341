//! Value parsers: the conversion between a typed value and its canonical
//! string form for one (prefix, version) pair.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::GlobalIdError;

/// A type-erased decoded value.
pub type AnyValue = Box<dyn Any + Send + Sync>;

/// Converts values of one type to and from their canonical string form.
///
/// `format` must be deterministic and must not depend on mutable external
/// state. `parse` is its inverse and rejects anything `format` could not have
/// produced with [`GlobalIdError::MalformedValue`].
pub trait Parser: Send + Sync + 'static {
    /// The value type this parser handles.
    type Value: Send + Sync + 'static;

    /// Formats a value as its canonical string.
    fn format(&self, value: &Self::Value) -> Result<String, GlobalIdError>;

    /// Parses a canonical string back into a value.
    fn parse(&self, data: &str) -> Result<Self::Value, GlobalIdError>;
}

/// Object-safe view of a [`Parser`], as stored in the parser registry.
///
/// Implemented for every `Parser`; there is no need to implement it by hand.
pub trait ErasedParser: Send + Sync {
    /// Type name of the parser's value, for diagnostics.
    fn value_type_name(&self) -> &'static str;

    /// [`TypeId`] of the parser's value.
    fn value_type_id(&self) -> TypeId;

    /// Formats a value, or returns `None` if it is not the parser's value type.
    fn format_any(&self, value: &dyn Any) -> Option<Result<String, GlobalIdError>>;

    /// Parses a string into a boxed value.
    fn parse_any(&self, data: &str) -> Result<AnyValue, GlobalIdError>;

    /// Parses and re-formats a string, yielding its canonical form.
    fn canonicalize(&self, data: &str) -> Result<String, GlobalIdError>;
}

impl<P: Parser> ErasedParser for P {
    fn value_type_name(&self) -> &'static str {
        type_name::<P::Value>()
    }

    fn value_type_id(&self) -> TypeId {
        TypeId::of::<P::Value>()
    }

    fn format_any(&self, value: &dyn Any) -> Option<Result<String, GlobalIdError>> {
        value
            .downcast_ref::<P::Value>()
            .map(|value| self.format(value))
    }

    fn parse_any(&self, data: &str) -> Result<AnyValue, GlobalIdError> {
        let value = self.parse(data)?;
        Ok(Box::new(value))
    }

    fn canonicalize(&self, data: &str) -> Result<String, GlobalIdError> {
        let value = self.parse(data)?;
        self.format(&value)
    }
}

impl fmt::Debug for dyn ErasedParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedParser")
            .field("value_type", &self.value_type_name())
            .finish()
    }
}

/// Identity parser for plain strings. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringParser;

impl Parser for StringParser {
    type Value = String;

    fn format(&self, value: &String) -> Result<String, GlobalIdError> {
        Ok(value.clone())
    }

    fn parse(&self, data: &str) -> Result<String, GlobalIdError> {
        Ok(data.to_string())
    }
}

/// Parser for structured values, stored as compact JSON.
///
/// The canonical form is whatever `serde_json::to_string` produces for the
/// value, so field order follows the type's `Serialize` impl.
pub struct JsonParser<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> JsonParser<T> {
    /// Creates a JSON parser for `T`.
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for JsonParser<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for JsonParser<T> {
    fn clone(&self) -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for JsonParser<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonParser")
            .field("value_type", &type_name::<T>())
            .finish()
    }
}

impl<T> Parser for JsonParser<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    type Value = T;

    fn format(&self, value: &T) -> Result<String, GlobalIdError> {
        serde_json::to_string(value).map_err(|e| GlobalIdError::malformed(e.to_string()))
    }

    fn parse(&self, data: &str) -> Result<T, GlobalIdError> {
        serde_json::from_str(data).map_err(|e| GlobalIdError::malformed(e.to_string()))
    }
}
