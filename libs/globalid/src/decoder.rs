//! Decoding global ID strings back into typed values.
//!
//! The type of a decoded ID always comes from the type registry via the
//! prefix. Nothing in the payload can claim a type.

use std::any::{type_name, Any, TypeId};
use std::sync::Arc;

use tracing::trace;

use crate::registry::SharedParser;
use crate::wire::{self, CborCodec, PayloadCodec};
use crate::{AnyValue, GlobalId, GlobalIdError, ParserRegistry, RawGlobalId, TypeRegistry};

/// Recovers (type, version, value) from encoded IDs.
#[derive(Debug, Clone)]
pub struct Decoder {
    types: Arc<TypeRegistry>,
    parsers: Arc<ParserRegistry>,
    payload: Arc<dyn PayloadCodec>,
}

impl Decoder {
    /// Creates a decoder using the CBOR payload codec.
    pub fn new(parsers: Arc<ParserRegistry>) -> Self {
        Self::with_payload_codec(parsers, Arc::new(CborCodec))
    }

    /// Creates a decoder with a specific payload codec.
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

    /// Decodes an ID whose value is expected to be a `T`.
    ///
    /// Fails with [`GlobalIdError::ValueTypeMismatch`] if the parser for the
    /// ID's (prefix, version) produces some other type.
    pub fn decode<T: Any>(&self, encoded: &str) -> Result<GlobalId<T>, GlobalIdError> {
        let (raw, parser) = self.unpack(encoded)?;

        if parser.value_type_id() != TypeId::of::<T>() {
            return Err(mismatch::<T>(&parser));
        }
        let value = parser
            .parse_any(&raw.data)?
            .downcast::<T>()
            .map_err(|_| mismatch::<T>(&parser))?;

        let type_name = self.type_of(&raw.prefix)?;
        Ok(GlobalId::new(type_name, raw.version, *value))
    }

    /// Decodes an ID without knowing its value type up front.
    pub fn decode_erased(&self, encoded: &str) -> Result<GlobalId<AnyValue>, GlobalIdError> {
        let (raw, parser) = self.unpack(encoded)?;
        let value = parser.parse_any(&raw.data)?;
        let type_name = self.type_of(&raw.prefix)?;
        Ok(GlobalId::new(type_name, raw.version, value))
    }

    /// Decodes an ID into the canonical string form of its value.
    ///
    /// The value is still run through its parser, so IDs whose data the
    /// parser rejects fail here exactly as they would in [`Decoder::decode`].
    pub fn decode_raw(&self, encoded: &str) -> Result<GlobalId<String>, GlobalIdError> {
        let (raw, parser) = self.unpack(encoded)?;
        let value = parser.canonicalize(&raw.data)?;
        let type_name = self.type_of(&raw.prefix)?;
        Ok(GlobalId::new(type_name, raw.version, value))
    }

    /// Reads prefix, version and data without consulting the registries.
    pub fn inspect(&self, encoded: &str) -> Result<RawGlobalId, GlobalIdError> {
        wire::unpack(encoded, self.payload.as_ref())
    }

    fn unpack(&self, encoded: &str) -> Result<(RawGlobalId, SharedParser), GlobalIdError> {
        let (prefix, payload) = wire::split(encoded)?;

        // An unknown prefix is reported as such, whatever the payload holds
        if !self.parsers.has_prefix(prefix) {
            return Err(GlobalIdError::UnknownPrefix {
                prefix: prefix.to_string(),
            });
        }

        let bytes = wire::decode_text(payload)?;
        let (data, version) = self.payload.decode(&bytes)?;
        let parser = self.parsers.get_parser(prefix, &version)?;

        trace!(prefix = %prefix, version = %version, "Decoded global ID payload");
        Ok((
            RawGlobalId {
                prefix: prefix.to_string(),
                data,
                version,
            },
            parser,
        ))
    }

    fn type_of(&self, prefix: &str) -> Result<String, GlobalIdError> {
        self.types
            .type_of(prefix)
            .ok_or_else(|| GlobalIdError::UnknownType {
                name: prefix.to_string(),
            })
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
    use rstest::rstest;

    use super::*;
    use crate::{Encoder, StringParser};

    fn codec() -> (Encoder, Decoder) {
        let types = Arc::new(TypeRegistry::new());
        types.register_type("Organization", "org").unwrap();
        let parsers = Arc::new(ParserRegistry::new(types));
        parsers
            .register_parser("org", "1.0.0", StringParser)
            .unwrap();
        (Encoder::new(Arc::clone(&parsers)), Decoder::new(parsers))
    }

    #[test]
    fn test_decode_roundtrip() {
        let (encoder, decoder) = codec();
        let encoded = encoder
            .encode(&GlobalId::new("Organization", "1.0.0", "abc123".to_string()))
            .unwrap();

        let decoded: GlobalId<String> = decoder.decode(&encoded).unwrap();
        assert_eq!(decoded.type_name(), "Organization");
        assert_eq!(decoded.version(), "1.0.0");
        assert_eq!(decoded.value(), "abc123");
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_separator("orgAAAA")]
    #[case::empty_prefix("_AAAA")]
    #[case::empty_payload("org_")]
    #[case::bad_base64("org_!!!")]
    #[case::not_an_array("org_AA")]
    fn test_decode_invalid_format(#[case] encoded: &str) {
        let (_, decoder) = codec();
        let err = decoder.decode::<String>(encoded).unwrap_err();
        assert!(matches!(err, GlobalIdError::InvalidFormat { .. }), "{err:?}");
    }

    #[test]
    fn test_decode_unknown_prefix_before_payload() {
        let (_, decoder) = codec();
        let err = decoder.decode::<String>("unknownprefix_AAA").unwrap_err();
        assert_eq!(
            err,
            GlobalIdError::UnknownPrefix {
                prefix: "unknownprefix".to_string()
            }
        );
    }

    #[test]
    fn test_decode_unknown_version() {
        let (_, decoder) = codec();
        let bytes = CborCodec.encode("abc", "9.9.9").unwrap();
        let encoded = wire::join("org", &bytes);

        let err = decoder.decode::<String>(&encoded).unwrap_err();
        assert_eq!(
            err,
            GlobalIdError::UnknownVersion {
                prefix: "org".to_string(),
                version: "9.9.9".to_string()
            }
        );
    }

    #[test]
    fn test_decode_requested_type_mismatch() {
        let (encoder, decoder) = codec();
        let encoded = encoder
            .encode(&GlobalId::new("Organization", "1.0.0", "abc".to_string()))
            .unwrap();

        let err = decoder.decode::<u32>(&encoded).unwrap_err();
        assert!(matches!(err, GlobalIdError::ValueTypeMismatch { .. }));
    }

    #[test]
    fn test_decode_erased_and_raw() {
        let (encoder, decoder) = codec();
        let encoded = encoder
            .encode(&GlobalId::new("Organization", "1.0.0", "abc".to_string()))
            .unwrap();

        let erased = decoder.decode_erased(&encoded).unwrap();
        assert_eq!(erased.type_name(), "Organization");
        assert_eq!(erased.value().downcast_ref::<String>().unwrap(), "abc");

        let raw = decoder.decode_raw(&encoded).unwrap();
        assert_eq!(raw, GlobalId::new("Organization", "1.0.0", "abc".to_string()));
    }

    #[test]
    fn test_inspect_ignores_registry() {
        let (_, decoder) = codec();
        let bytes = CborCodec.encode("payload", "3.1.4").unwrap();
        let encoded = wire::join("elsewhere", &bytes);

        let raw = decoder.inspect(&encoded).unwrap();
        assert_eq!(raw.prefix, "elsewhere");
        assert_eq!(raw.data, "payload");
        assert_eq!(raw.version, "3.1.4");
    }
}
