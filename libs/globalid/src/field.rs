//! Single-mapping encoder for record pipelines.
//!
//! A pipeline stage that stamps one field of each record with a global ID only
//! needs one (type, prefix, version, parser) mapping. [`FieldEncoder`] owns a
//! private codec configured with exactly that mapping and exposes
//! [`FieldEncoder::encode_field`]. Extracting the raw field from a record and
//! writing the result back is the caller's job.

use serde::{Deserialize, Serialize};

use crate::catalog::default_parser;
use crate::config::ConfigError;
use crate::registry::SharedParser;
use crate::{GlobalIdCodec, GlobalIdError, ParserCatalog};

/// Field encoder settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEncoderConfig {
    /// Logical type name (e.g. `Organization`).
    pub type_name: String,

    /// Prefix registered for the type (e.g. `org`).
    pub prefix: String,

    /// Parser version to encode with (e.g. `1.0.0`).
    pub version: String,

    /// Catalog name of the parser.
    #[serde(default = "default_parser")]
    pub parser: String,
}

impl FieldEncoderConfig {
    /// Reads the settings from `GLOBALID_TYPE`, `GLOBALID_PREFIX`,
    /// `GLOBALID_VERSION` and `GLOBALID_PARSER` (optional, defaults to
    /// `string`).
    pub fn from_env() -> Result<Self, ConfigError> {
        let type_name = require_var("GLOBALID_TYPE")?;
        let prefix = require_var("GLOBALID_PREFIX")?;
        let version = require_var("GLOBALID_VERSION")?;
        let parser = std::env::var("GLOBALID_PARSER").unwrap_or_else(|_| default_parser());

        Ok(Self {
            type_name,
            prefix,
            version,
            parser,
        })
    }
}

fn require_var(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingVar(name))
}

/// Encodes raw field values with one fixed type and version.
#[derive(Debug, Clone)]
pub struct FieldEncoder {
    codec: GlobalIdCodec,
    type_name: String,
    version: String,
}

impl FieldEncoder {
    /// Registers the mapping in a fresh codec.
    pub fn configure(
        type_name: &str,
        prefix: &str,
        version: &str,
        parser: SharedParser,
    ) -> Result<Self, GlobalIdError> {
        let codec = GlobalIdCodec::new();
        codec.configure_erased(type_name, prefix, version, parser)?;
        Ok(Self {
            codec,
            type_name: type_name.to_string(),
            version: version.to_string(),
        })
    }

    /// Builds the encoder from settings, resolving the parser by name.
    pub fn from_config(
        config: &FieldEncoderConfig,
        catalog: &ParserCatalog,
    ) -> Result<Self, ConfigError> {
        let parser = catalog.build(&config.parser)?;
        let encoder = Self::configure(&config.type_name, &config.prefix, &config.version, parser)?;
        Ok(encoder)
    }

    /// Encodes one raw field value.
    ///
    /// An absent field is [`GlobalIdError::MissingValue`]; whether to skip the
    /// record or fail is up to the caller.
    pub fn encode_field(&self, raw: Option<&str>) -> Result<String, GlobalIdError> {
        self.codec.encode_raw(&self.type_name, &self.version, raw)
    }

    /// The codec behind this encoder, e.g. for decoding what it produced.
    pub fn codec(&self) -> &GlobalIdCodec {
        &self.codec
    }
}
