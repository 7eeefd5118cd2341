//! Wire format primitives.
//!
//! ```text
//! encoded      := prefix "_" text-payload
//! text-payload := base64url-unpadded(binary([formatted-value, version]))
//! ```
//!
//! The binary layer is pluggable through [`PayloadCodec`]. [`CborCodec`] is
//! the default and writes a definite-length CBOR array of two text strings.

use std::fmt;

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;

use crate::types::PREFIX_DELIMITER;
use crate::{GlobalIdError, RawGlobalId};

/// URL-safe base64 without padding on encode; padding is optional on decode.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Binary encoding of the `[data, version]` pair.
pub trait PayloadCodec: Send + Sync + fmt::Debug {
    /// Encodes the pair, value first and version second.
    fn encode(&self, data: &str, version: &str) -> Result<Vec<u8>, GlobalIdError>;

    /// Decodes bytes into `(data, version)`.
    ///
    /// Anything other than a sequence of exactly two strings, including bytes
    /// left over after it, is [`GlobalIdError::InvalidFormat`].
    fn decode(&self, bytes: &[u8]) -> Result<(String, String), GlobalIdError>;
}

/// CBOR payload codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct CborCodec;

impl PayloadCodec for CborCodec {
    fn encode(&self, data: &str, version: &str) -> Result<Vec<u8>, GlobalIdError> {
        let mut bytes = Vec::new();
        ciborium::into_writer(&(data, version), &mut bytes).map_err(|e| {
            GlobalIdError::EncodingFailure {
                message: e.to_string(),
            }
        })?;
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> Result<(String, String), GlobalIdError> {
        let mut reader = bytes;
        let items: Vec<String> = ciborium::from_reader(&mut reader)
            .map_err(|e| GlobalIdError::invalid_format(format!("CBOR payload: {e}")))?;
        ensure_consumed(reader)?;
        into_pair(items)
    }
}

/// MessagePack payload codec.
#[cfg(feature = "msgpack")]
#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackCodec;

#[cfg(feature = "msgpack")]
impl PayloadCodec for MsgPackCodec {
    fn encode(&self, data: &str, version: &str) -> Result<Vec<u8>, GlobalIdError> {
        rmp_serde::to_vec(&(data, version)).map_err(|e| GlobalIdError::EncodingFailure {
            message: e.to_string(),
        })
    }

    fn decode(&self, bytes: &[u8]) -> Result<(String, String), GlobalIdError> {
        let mut reader = bytes;
        let items: Vec<String> = rmp_serde::from_read(&mut reader)
            .map_err(|e| GlobalIdError::invalid_format(format!("MessagePack payload: {e}")))?;
        ensure_consumed(reader)?;
        into_pair(items)
    }
}

/// One encoded ID has exactly one payload encoding.
fn ensure_consumed(rest: &[u8]) -> Result<(), GlobalIdError> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(GlobalIdError::invalid_format(format!(
            "{} trailing byte(s) after payload",
            rest.len()
        )))
    }
}

fn into_pair(items: Vec<String>) -> Result<(String, String), GlobalIdError> {
    let count = items.len();
    let mut items = items.into_iter();
    match (items.next(), items.next(), items.next()) {
        (Some(data), Some(version), None) => Ok((data, version)),
        _ => Err(GlobalIdError::invalid_format(format!(
            "payload should contain [data, version], found {count} element(s)"
        ))),
    }
}

/// Splits an encoded ID at the first `_` into prefix and text payload.
pub fn split(encoded: &str) -> Result<(&str, &str), GlobalIdError> {
    if encoded.is_empty() {
        return Err(GlobalIdError::invalid_format("encoded ID cannot be empty"));
    }

    match encoded.split_once(PREFIX_DELIMITER) {
        Some((prefix, payload)) if !prefix.is_empty() => Ok((prefix, payload)),
        _ => Err(GlobalIdError::invalid_format("missing or misplaced underscore")),
    }
}

/// Joins a prefix and binary payload into the final string.
pub fn join(prefix: &str, bytes: &[u8]) -> String {
    let text = PAYLOAD_ENGINE.encode(bytes);
    let mut out = String::with_capacity(prefix.len() + 1 + text.len());
    out.push_str(prefix);
    out.push(PREFIX_DELIMITER);
    out.push_str(&text);
    out
}

/// Decodes the text payload back into bytes.
pub fn decode_text(payload: &str) -> Result<Vec<u8>, GlobalIdError> {
    PAYLOAD_ENGINE
        .decode(payload)
        .map_err(|e| GlobalIdError::invalid_format(format!("base64 payload: {e}")))
}

/// Reads an encoded ID without consulting any registry.
pub fn unpack(encoded: &str, codec: &dyn PayloadCodec) -> Result<RawGlobalId, GlobalIdError> {
    let (prefix, payload) = split(encoded)?;
    let bytes = decode_text(payload)?;
    let (data, version) = codec.decode(&bytes)?;
    Ok(RawGlobalId {
        prefix: prefix.to_string(),
        data,
        version,
    })
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_cbor_layout_is_two_text_strings() {
        let bytes = CborCodec.encode("abc123", "1.0.0").unwrap();
        // array(2), text(6) "abc123", text(5) "1.0.0"
        let mut expected = vec![0x82, 0x66];
        expected.extend_from_slice(b"abc123");
        expected.push(0x65);
        expected.extend_from_slice(b"1.0.0");
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_cbor_accepts_indefinite_length_array() {
        let mut bytes = vec![0x9f, 0x61, b'x', 0x61, b'1'];
        bytes.push(0xff);
        let pair = CborCodec.decode(&bytes).unwrap();
        assert_eq!(pair, ("x".to_string(), "1".to_string()));
    }

    #[rstest]
    #[case::empty(&[])]
    #[case::integer(&[0x00])]
    #[case::one_element(&[0x81, 0x61, b'x'])]
    #[case::three_elements(&[0x83, 0x61, b'a', 0x61, b'b', 0x61, b'c'])]
    #[case::non_string(&[0x82, 0x61, b'a', 0x01])]
    #[case::trailing_bytes(&[0x82, 0x61, b'x', 0x65, b'1', b'.', b'0', b'.', b'0', 0x00])]
    fn test_cbor_rejects_bad_payloads(#[case] bytes: &[u8]) {
        let err = CborCodec.decode(bytes).unwrap_err();
        assert!(matches!(err, GlobalIdError::InvalidFormat { .. }), "{err:?}");
    }

    #[rstest]
    #[case::empty("")]
    #[case::no_separator("orgABC")]
    #[case::leading_separator("_ABC")]
    fn test_split_rejects(#[case] encoded: &str) {
        let err = split(encoded).unwrap_err();
        assert!(matches!(err, GlobalIdError::InvalidFormat { .. }));
    }

    #[test]
    fn test_split_uses_first_underscore() {
        assert_eq!(split("org_ab_cd").unwrap(), ("org", "ab_cd"));
        assert_eq!(split("org_").unwrap(), ("org", ""));
    }

    #[test]
    fn test_text_payload_is_url_safe_and_unpadded() {
        // 0xfb 0xff encodes to "+/8=" in the standard alphabet
        let joined = join("org", &[0xfb, 0xff]);
        assert_eq!(joined, "org_-_8");

        let (_, payload) = split(&joined).unwrap();
        assert_eq!(decode_text(payload).unwrap(), vec![0xfb, 0xff]);
    }

    #[test]
    fn test_text_decode_tolerates_padding() {
        assert_eq!(decode_text("-_8=").unwrap(), vec![0xfb, 0xff]);
        assert!(decode_text("*").is_err());
    }

    #[test]
    fn test_unpack_reads_without_registry() {
        let bytes = CborCodec.encode("a_b", "v_1").unwrap();
        let encoded = join("thing", &bytes);

        let raw = unpack(&encoded, &CborCodec).unwrap();
        assert_eq!(raw.prefix, "thing");
        assert_eq!(raw.data, "a_b");
        assert_eq!(raw.version, "v_1");
    }

    #[cfg(feature = "msgpack")]
    #[test]
    fn test_msgpack_roundtrip() {
        let bytes = MsgPackCodec.encode("abc", "2.0.0").unwrap();
        let pair = MsgPackCodec.decode(&bytes).unwrap();
        assert_eq!(pair, ("abc".to_string(), "2.0.0".to_string()));
        let mut padded = bytes;
        padded.push(0xc0);
        let err = MsgPackCodec.decode(&padded).unwrap_err();
        assert!(matches!(err, GlobalIdError::InvalidFormat { .. }));
    }
}
