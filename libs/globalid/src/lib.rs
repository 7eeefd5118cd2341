//! # globalid
//!
//! Versioned, prefix-typed global identifiers that decode back into the typed
//! value they were minted from.
//!
//! ## Design Principles
//!
//! - The prefix names the type; the registry, never the payload, decides it
//! - Registries are append-only so issued IDs never change meaning
//! - Each (prefix, version) has exactly one parser, so formats can evolve by
//!   adding versions while old IDs keep decoding
//! - Encode and decode are pure and all-or-nothing
//!
//! ## ID Format
//!
//! `{prefix}_{payload}` where the payload is the URL-safe, unpadded base64 of a
//! CBOR array `[formatted_value, version]`.
//!
//! Examples:
//! - `org_gmZhYmMxMjNlMS4wLjA`
//!
//! ## Usage
//!
//! ```
//! use globalid::{GlobalId, GlobalIdCodec, StringParser};
//!
//! let codec = GlobalIdCodec::new();
//! codec.configure("Organization", "org", "1.0.0", StringParser)?;
//!
//! let encoded = codec.encode(&GlobalId::new("Organization", "1.0.0", "abc123".to_string()))?;
//! assert!(encoded.starts_with("org_"));
//!
//! let decoded: GlobalId<String> = codec.decode(&encoded)?;
//! assert_eq!(decoded.value(), "abc123");
//! # Ok::<(), globalid::GlobalIdError>(())
//! ```

mod catalog;
mod codec;
mod config;
mod decoder;
mod encoder;
mod error;
mod field;
mod id;
mod parser;
mod registry;
mod types;
pub mod wire;

pub use catalog::{ParserCatalog, JSON_PARSER, STRING_PARSER};
pub use codec::GlobalIdCodec;
pub use config::{ConfigError, RegistryConfig, TypeConfig, VersionConfig};
pub use decoder::Decoder;
pub use encoder::Encoder;
pub use error::GlobalIdError;
pub use field::{FieldEncoder, FieldEncoderConfig};
pub use id::{GlobalId, RawGlobalId};
pub use parser::{AnyValue, ErasedParser, JsonParser, Parser, StringParser};
pub use registry::{ParserRegistry, SharedParser};
pub use types::{validate_prefix, TypeEntry, TypeRegistry, PREFIX_DELIMITER};
pub use wire::{CborCodec, PayloadCodec};

#[cfg(feature = "msgpack")]
pub use wire::MsgPackCodec;
