//! Encoding typed values into global ID strings.

use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

use tracing::trace;

use crate::registry::SharedParser;
use crate::wire::{self, CborCodec, PayloadCodec};
use crate::{GlobalId, GlobalIdError, ParserRegistry, TypeRegistry};

/// Produces encoded IDs from (type, version, value).
///
/// Holds shared references to the registries and no mutable state, so one
/// encoder can be cloned or shared freely across threads.
#[derive(Debug, Clone)]
pub struct Encoder {
    types: Arc<TypeRegistry>,
    parsers: Arc<ParserRegistry>,
    payload: Arc<dyn PayloadCodec>,
}

impl Encoder {
    /// Creates an encoder using the CBOR payload codec.
    ///
    /// The type registry is the one `parsers` was validated against.
    pub fn new(parsers: Arc<ParserRegistry>) -> Self {
        Self::with_payload_codec(parsers, Arc::new(CborCodec))
    }

    /// Creates an encoder with a specific payload codec.
    pub fn with_payload_codec(
        parsers: Arc<ParserRegistry>,
        payload: Arc<dyn PayloadCodec>,
    ) -> Self {
        Self {
            types: Arc::clone(parsers.types()),
            parsers,
            payload,
        }
    }

    /// Encodes a global ID.
    pub fn encode<T: Any>(&self, id: &GlobalId<T>) -> Result<String, GlobalIdError> {
        self.encode_value(id.type_name(), id.version(), Some(id.value()))
    }

    /// Encodes a possibly absent value.
    ///
    /// Fails with [`GlobalIdError::MissingValue`] when `value` is `None`.
    pub fn encode_value<T: Any>(
        &self,
        type_name: &str,
        version: &str,
        value: Option<&T>,
    ) -> Result<String, GlobalIdError> {
        let value = value.ok_or(GlobalIdError::MissingValue)?;
        let (prefix, parser) = self.resolve(type_name, version)?;

        if parser.value_type_id() != TypeId::of::<T>() {
            return Err(mismatch::<T>(&parser));
        }
        let formatted = parser
            .format_any(value)
            .ok_or_else(|| mismatch::<T>(&parser))??;

        self.finish(&prefix, &formatted, version)
    }

    /// Encodes a value given in string form.
    ///
    /// The string is run through the parser (parse, then format) so only
    /// values the parser accepts are encoded, and always in canonical form.
    pub fn encode_raw(
        &self,
        type_name: &str,
        version: &str,
        data: Option<&str>,
    ) -> Result<String, GlobalIdError> {
        let data = data.ok_or(GlobalIdError::MissingValue)?;
        let (prefix, parser) = self.resolve(type_name, version)?;
        let formatted = parser.canonicalize(data)?;
        self.finish(&prefix, &formatted, version)
    }

    fn resolve(
        &self,
        type_name: &str,
        version: &str,
    ) -> Result<(String, SharedParser), GlobalIdError> {
        let prefix = self
            .types
            .prefix_of(type_name)
            .ok_or_else(|| GlobalIdError::UnknownType {
                name: type_name.to_string(),
            })?;
        let parser = self.parsers.get_parser(&prefix, version)?;
        Ok((prefix, parser))
    }

    fn finish(
        &self,
        prefix: &str,
        formatted: &str,
        version: &str,
    ) -> Result<String, GlobalIdError> {
        let bytes = self.payload.encode(formatted, version)?;
        let encoded = wire::join(prefix, &bytes);
        trace!(prefix = %prefix, version = %version, len = encoded.len(), "Encoded global ID");
        Ok(encoded)
    }
}

fn mismatch<T>(parser: &SharedParser) -> GlobalIdError {
    GlobalIdError::ValueTypeMismatch {
        parser_type: parser.value_type_name(),
        requested_type: type_name::<T>(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonParser, StringParser};

    fn encoder() -> Encoder {
        let types = Arc::new(TypeRegistry::new());
        types.register_type("Organization", "org").unwrap();
        types.register_type("Settings", "set").unwrap();
        let parsers = Arc::new(ParserRegistry::new(types));
        parsers
            .register_parser("org", "1.0.0", StringParser)
            .unwrap();
        parsers
            .register_parser("set", "1.0.0", JsonParser::<serde_json::Value>::new())
            .unwrap();
        Encoder::new(parsers)
    }

    #[test]
    fn test_encode_prefixes_and_strips_padding() {
        let encoded = encoder()
            .encode(&GlobalId::new("Organization", "1.0.0", "abc123".to_string()))
            .unwrap();
        assert!(encoded.starts_with("org_"));
        assert!(!encoded.contains('='));
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = encoder();
        let id = GlobalId::new("Organization", "1.0.0", "abc123".to_string());
        assert_eq!(encoder.encode(&id).unwrap(), encoder.encode(&id).unwrap());
    }

    #[test]
    fn test_encode_missing_value() {
        let err = encoder()
            .encode_value::<String>("Organization", "1.0.0", None)
            .unwrap_err();
        assert_eq!(err, GlobalIdError::MissingValue);

        let err = encoder().encode_raw("Organization", "1.0.0", None).unwrap_err();
        assert_eq!(err, GlobalIdError::MissingValue);
    }

    #[test]
    fn test_encode_unknown_type() {
        let err = encoder()
            .encode(&GlobalId::new("Application", "1.0.0", "x".to_string()))
            .unwrap_err();
        assert_eq!(
            err,
            GlobalIdError::UnknownType {
                name: "Application".to_string()
            }
        );
    }

    #[test]
    fn test_encode_unknown_version() {
        let err = encoder()
            .encode(&GlobalId::new("Organization", "2.0.0", "x".to_string()))
            .unwrap_err();
        assert!(matches!(err, GlobalIdError::UnknownVersion { .. }));
    }

    #[test]
    fn test_encode_value_type_mismatch() {
        let err = encoder()
            .encode(&GlobalId::new("Organization", "1.0.0", 42u64))
            .unwrap_err();
        assert!(matches!(
            err,
            GlobalIdError::ValueTypeMismatch {
                requested_type: "u64",
                ..
            }
        ));
    }

    #[test]
    fn test_encode_raw_canonicalizes() {
        let encoder = encoder();
        let loose = encoder
            .encode_raw("Settings", "1.0.0", Some("{ \"a\" : 1 }"))
            .unwrap();
        let tight = encoder
            .encode_raw("Settings", "1.0.0", Some("{\"a\":1}"))
            .unwrap();
        assert_eq!(loose, tight);

        let err = encoder
            .encode_raw("Settings", "1.0.0", Some("not json"))
            .unwrap_err();
        assert!(matches!(err, GlobalIdError::MalformedValue { .. }));
    }
}
