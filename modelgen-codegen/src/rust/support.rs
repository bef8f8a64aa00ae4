//! Support code emitted into generated Rust files.

/// Byte-string newtype emitted when any field uses `bytes`.
///
/// It serializes as a lower-case hex string, which every format carries
/// losslessly and which matches `xs:hexBinary` in the XSD.
pub const HEX_BYTES: &str = r#"/// Byte string serialized as lower-case hex.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HexBytes(pub Vec<u8>);

impl Serialize for HexBytes {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        const DIGITS: &[u8; 16] = b"0123456789abcdef";
        let mut text = String::with_capacity(self.0.len() * 2);
        for byte in &self.0 {
            text.push(char::from(DIGITS[usize::from(byte >> 4)]));
            text.push(char::from(DIGITS[usize::from(byte & 0x0f)]));
        }
        serializer.serialize_str(&text)
    }
}

impl<'de> Deserialize<'de> for HexBytes {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        if !text.is_ascii() || text.len() % 2 != 0 {
            return Err(serde::de::Error::custom("expected an even number of hex digits"));
        }
        (0..text.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&text[i..i + 2], 16).map_err(serde::de::Error::custom))
            .collect::<Result<Vec<u8>, D::Error>>()
            .map(HexBytes)
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_bytes_text() {
        assert!(HEX_BYTES.contains("pub struct HexBytes(pub Vec<u8>);"));
        assert!(HEX_BYTES.contains("impl Serialize for HexBytes"));
        assert!(HEX_BYTES.contains("impl<'de> Deserialize<'de> for HexBytes"));
    }
}
