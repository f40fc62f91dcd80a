// ── Reserved-bytes codec ──
//
// The URI config format carries three "reserved" header bytes taken from
// the front of the base64 client identifier the registration returns.

use std::fmt;

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

use crate::error::{DecodeError, Warning};

/// Standard alphabet; trailing `=` padding is optional.
const CLIENT_ID_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// How to treat client identifiers that do not yield three bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservedMode {
    /// Zero-pad short identifiers and substitute zeros for undecodable ones.
    #[default]
    Lenient,
    /// Treat both as errors.
    Strict,
}

/// Exactly three reserved bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReservedBytes([u8; 3]);

impl ReservedBytes {
    pub const fn new(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> [u8; 3] {
        self.0
    }

    /// `"1,2,3"`
    pub fn to_comma_string(&self) -> String {
        self.join(",")
    }

    /// `"1%2C2%2C3"`, the form embedded in tunnel URIs.
    pub fn to_uri_component(&self) -> String {
        self.join("%2C")
    }

    fn join(&self, separator: &str) -> String {
        let [a, b, c] = self.0;
        format!("{a}{separator}{b}{separator}{c}")
    }
}

impl From<[u8; 3]> for ReservedBytes {
    fn from(bytes: [u8; 3]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ReservedBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_comma_string())
    }
}

/// Decode a base64 client identifier into its first three bytes.
///
/// Short identifiers are zero-padded with a warning in `Lenient` mode and
/// rejected in `Strict` mode. Malformed base64 is always an error here;
/// substituting zeros for it is the caller's decision.
pub fn decode_reserved(
    client_id: &str,
    mode: ReservedMode,
) -> Result<(ReservedBytes, Option<Warning>), DecodeError> {
    let raw = CLIENT_ID_ENGINE
        .decode(client_id.trim())
        .map_err(|e| DecodeError::Malformed(e.to_string()))?;

    let mut bytes = [0u8; 3];
    let available = raw.len().min(3);
    bytes[..available].copy_from_slice(&raw[..available]);

    if available == 3 {
        return Ok((ReservedBytes(bytes), None));
    }

    match mode {
        ReservedMode::Strict => Err(DecodeError::TooShort { available }),
        ReservedMode::Lenient => Ok((
            ReservedBytes(bytes),
            Some(Warning::ReservedPadded { available }),
        )),
    }
}

/// [`decode_reserved`], recovering from malformed base64 in `Lenient` mode.
///
/// The recovered value is `[0, 0, 0]` with a `ReservedUndecodable` warning.
pub fn decode_or_default(
    client_id: &str,
    mode: ReservedMode,
) -> Result<(ReservedBytes, Option<Warning>), DecodeError> {
    match decode_reserved(client_id, mode) {
        Err(e @ DecodeError::Malformed(_)) if mode == ReservedMode::Lenient => Ok((
            ReservedBytes::default(),
            Some(Warning::ReservedUndecodable {
                reason: e.to_string(),
            }),
        )),
        other => other,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn takes_first_three_bytes() {
        // 0x01 0x02 0x03 0xff
        let (reserved, warning) = decode_reserved("AQID/w==", ReservedMode::Strict).unwrap();
        assert_eq!(reserved.as_bytes(), [1, 2, 3]);
        assert!(warning.is_none());
    }

    #[test]
    fn decoding_is_idempotent() {
        let a = decode_reserved("Yt2A", ReservedMode::Lenient).unwrap();
        let b = decode_reserved("Yt2A", ReservedMode::Lenient).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.0.as_bytes(), [98, 221, 128]);
    }

    #[test]
    fn string_forms() {
        let reserved = ReservedBytes::new([98, 221, 128]);
        assert_eq!(reserved.to_comma_string(), "98,221,128");
        assert_eq!(reserved.to_string(), "98,221,128");
        assert_eq!(reserved.to_uri_component(), "98%2C221%2C128");
    }

    #[test]
    fn short_identifier_is_padded_in_lenient_mode() {
        // single byte 0x07
        let (reserved, warning) = decode_reserved("Bw==", ReservedMode::Lenient).unwrap();
        assert_eq!(reserved.as_bytes(), [7, 0, 0]);
        assert_eq!(warning, Some(Warning::ReservedPadded { available: 1 }));
    }

    #[test]
    fn padding_is_optional() {
        let (reserved, warning) = decode_reserved("AQI", ReservedMode::Lenient).unwrap();
        assert_eq!(reserved.as_bytes(), [1, 2, 0]);
        assert_eq!(warning, Some(Warning::ReservedPadded { available: 2 }));

        let (reserved, warning) = decode_or_default("Bw", ReservedMode::Lenient).unwrap();
        assert_eq!(reserved.as_bytes(), [7, 0, 0]);
        assert_eq!(warning, Some(Warning::ReservedPadded { available: 1 }));

        assert_eq!(
            decode_reserved("AQI", ReservedMode::Strict).unwrap_err(),
            DecodeError::TooShort { available: 2 }
        );
    }

    #[test]
    fn short_identifier_fails_in_strict_mode() {
        assert_eq!(
            decode_reserved("Bw==", ReservedMode::Strict).unwrap_err(),
            DecodeError::TooShort { available: 1 }
        );
    }

    #[test]
    fn empty_identifier_pads_to_zero() {
        let (reserved, _) = decode_reserved("", ReservedMode::Lenient).unwrap();
        assert_eq!(reserved.as_bytes(), [0, 0, 0]);
    }

    #[test]
    fn malformed_base64_is_an_error_in_both_modes() {
        for mode in [ReservedMode::Lenient, ReservedMode::Strict] {
            assert!(matches!(
                decode_reserved("not base64!", mode),
                Err(DecodeError::Malformed(_))
            ));
        }
    }

    #[test]
    fn lenient_fallback_recovers_from_bad_base64() {
        let (reserved, warning) = decode_or_default("%%%", ReservedMode::Lenient).unwrap();
        assert_eq!(reserved.as_bytes(), [0, 0, 0]);
        assert!(matches!(warning, Some(Warning::ReservedUndecodable { .. })));
    }

    #[test]
    fn strict_fallback_keeps_errors() {
        assert!(matches!(
            decode_or_default("%%%", ReservedMode::Strict),
            Err(DecodeError::Malformed(_))
        ));
        assert_eq!(
            decode_or_default("Bw==", ReservedMode::Strict).unwrap_err(),
            DecodeError::TooShort { available: 1 }
        );
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let (reserved, _) = decode_reserved("  AQID\n", ReservedMode::Strict).unwrap();
        assert_eq!(reserved.as_bytes(), [1, 2, 3]);
    }

    #[test]
    fn serializes_as_byte_array() {
        let json = serde_json::to_string(&ReservedBytes::new([1, 2, 3])).unwrap();
        assert_eq!(json, "[1,2,3]");
    }
}
