//! One-stop codec: a pair of registries with an encoder and decoder bound to
//! them.

use std::any::Any;
use std::sync::Arc;

use tracing::info;

use crate::registry::SharedParser;
use crate::wire::{CborCodec, PayloadCodec};
use crate::{
    AnyValue, Decoder, Encoder, GlobalId, GlobalIdError, Parser, ParserRegistry, RawGlobalId,
    TypeRegistry,
};

/// Registries plus the encoder and decoder that share them.
///
/// Cloning is cheap and every clone sees the same registries.
#[derive(Debug, Clone)]
pub struct GlobalIdCodec {
    types: Arc<TypeRegistry>,
    parsers: Arc<ParserRegistry>,
    encoder: Encoder,
    decoder: Decoder,
}

impl GlobalIdCodec {
    /// Creates an empty codec using CBOR payloads.
    pub fn new() -> Self {
        Self::with_payload_codec(Arc::new(CborCodec))
    }

    /// Creates an empty codec with a specific payload codec.
    pub fn with_payload_codec(payload: Arc<dyn PayloadCodec>) -> Self {
        let types = Arc::new(TypeRegistry::new());
        let parsers = Arc::new(ParserRegistry::new(Arc::clone(&types)));
        Self {
            encoder: Encoder::with_payload_codec(Arc::clone(&parsers), Arc::clone(&payload)),
            decoder: Decoder::with_payload_codec(Arc::clone(&parsers), payload),
            types,
            parsers,
        }
    }

    /// The type registry.
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// The parser registry.
    pub fn parsers(&self) -> &ParserRegistry {
        &self.parsers
    }

    /// The encoder bound to this codec's registries.
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    /// The decoder bound to this codec's registries.
    pub fn decoder(&self) -> &Decoder {
        &self.decoder
    }

    /// Registers a type and a parser for one of its versions in one call.
    pub fn configure<P: Parser>(
        &self,
        type_name: &str,
        prefix: &str,
        version: &str,
        parser: P,
    ) -> Result<(), GlobalIdError> {
        self.configure_erased(type_name, prefix, version, Arc::new(parser))
    }

    /// Like [`GlobalIdCodec::configure`], with an already type-erased parser.
    ///
    /// If `type_name` is already registered under `prefix`, only the parser
    /// is added. Any other existing mapping for the type or prefix fails as
    /// [`TypeRegistry::register_type`] would.
    pub fn configure_erased(
        &self,
        type_name: &str,
        prefix: &str,
        version: &str,
        parser: SharedParser,
    ) -> Result<(), GlobalIdError> {
        self.ensure_type(type_name, prefix)?;
        self.parsers.register_erased(prefix, version, parser)?;

        info!(type_name = %type_name, prefix = %prefix, version = %version, "Configured global ID");
        Ok(())
    }

    /// Registers `type_name` under `prefix` unless exactly that mapping exists.
    pub(crate) fn ensure_type(&self, type_name: &str, prefix: &str) -> Result<(), GlobalIdError> {
        if self.types.prefix_of(type_name).as_deref() == Some(prefix) {
            return Ok(());
        }
        self.types.register_type(type_name, prefix)
    }

    /// See [`Encoder::encode`].
    pub fn encode<T: Any>(&self, id: &GlobalId<T>) -> Result<String, GlobalIdError> {
        self.encoder.encode(id)
    }

    /// See [`Encoder::encode_raw`].
    pub fn encode_raw(
        &self,
        type_name: &str,
        version: &str,
        data: Option<&str>,
    ) -> Result<String, GlobalIdError> {
        self.encoder.encode_raw(type_name, version, data)
    }

    /// See [`Decoder::decode`].
    pub fn decode<T: Any>(&self, encoded: &str) -> Result<GlobalId<T>, GlobalIdError> {
        self.decoder.decode(encoded)
    }

    /// See [`Decoder::decode_erased`].
    pub fn decode_erased(&self, encoded: &str) -> Result<GlobalId<AnyValue>, GlobalIdError> {
        self.decoder.decode_erased(encoded)
    }

    /// See [`Decoder::decode_raw`].
    pub fn decode_raw(&self, encoded: &str) -> Result<GlobalId<String>, GlobalIdError> {
        self.decoder.decode_raw(encoded)
    }

    /// See [`Decoder::inspect`].
    pub fn inspect(&self, encoded: &str) -> Result<RawGlobalId, GlobalIdError> {
        self.decoder.inspect(encoded)
    }
}

impl Default for GlobalIdCodec {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{JsonParser, StringParser};

    #[test]
    fn test_configure_registers_type_and_parser() {
        let codec = GlobalIdCodec::new();
        codec
            .configure("Organization", "org", "1.0.0", StringParser)
            .unwrap();

        assert_eq!(codec.types().type_of("org").as_deref(), Some("Organization"));
        assert!(codec.parsers().get_parser("org", "1.0.0").is_ok());
    }

    #[test]
    fn test_configure_adds_versions_to_same_mapping() {
        let codec = GlobalIdCodec::new();
        codec
            .configure("Organization", "org", "1.0.0", StringParser)
            .unwrap();
        codec
            .configure(
                "Organization",
                "org",
                "2.0.0",
                JsonParser::<serde_json::Value>::new(),
            )
            .unwrap();

        assert_eq!(codec.parsers().versions("org"), vec!["1.0.0", "2.0.0"]);
    }

    #[test]
    fn test_configure_conflicting_mapping_fails() {
        let codec = GlobalIdCodec::new();
        codec
            .configure("Organization", "org", "1.0.0", StringParser)
            .unwrap();

        let err = codec
            .configure("Organization", "o", "1.0.0", StringParser)
            .unwrap_err();
        assert!(matches!(err, GlobalIdError::DuplicateType { .. }));

        let err = codec
            .configure("Origin", "org", "1.0.0", StringParser)
            .unwrap_err();
        assert!(matches!(err, GlobalIdError::DuplicatePrefix { .. }));

        let err = codec
            .configure("Organization", "org", "1.0.0", StringParser)
            .unwrap_err();
        assert!(matches!(err, GlobalIdError::DuplicateVersion { .. }));
    }

    #[test]
    fn test_clones_share_registries() {
        let codec = GlobalIdCodec::new();
        let clone = codec.clone();
        codec
            .configure("Organization", "org", "1.0.0", StringParser)
            .unwrap();

        let encoded = codec
            .encode(&GlobalId::new("Organization", "1.0.0", "abc".to_string()))
            .unwrap();
        let decoded: GlobalId<String> = clone.decode(&encoded).unwrap();
        assert_eq!(decoded.value(), "abc");
    }
}
