use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Text encoding of generated files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
pub enum OutputEncoding {
    #[default]
    #[value(name = "utf-8", alias = "utf8")]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[value(name = "utf-8-bom", alias = "utf8-bom")]
    #[serde(rename = "utf-8-bom", alias = "utf8-bom")]
    Utf8Bom,
    #[value(name = "utf-16le", alias = "unicode")]
    #[serde(rename = "utf-16le", alias = "unicode")]
    Utf16Le,
    #[value(name = "utf-16be")]
    #[serde(rename = "utf-16be")]
    Utf16Be,
}

impl OutputEncoding {
    /// Human readable name written into the generated header.
    pub fn display_name(&self) -> &'static str {
        match self {
            OutputEncoding::Utf8 => "Unicode (UTF-8)",
            OutputEncoding::Utf8Bom => "Unicode (UTF-8 with signature)",
            OutputEncoding::Utf16Le => "Unicode (UTF-16 LE)",
            OutputEncoding::Utf16Be => "Unicode (UTF-16 BE)",
        }
    }

    /// Byte order mark.
    pub fn preamble(&self) -> &'static [u8] {
        match self {
            OutputEncoding::Utf8 => &[],
            OutputEncoding::Utf8Bom => &[0xEF, 0xBB, 0xBF],
            OutputEncoding::Utf16Le => &[0xFF, 0xFE],
            OutputEncoding::Utf16Be => &[0xFE, 0xFF],
        }
    }

    pub fn encode(&self, text: &str) -> Vec<u8> {
        let mut bytes = self.preamble().to_vec();
        match self {
            OutputEncoding::Utf8 | OutputEncoding::Utf8Bom => bytes.extend_from_slice(text.as_bytes()),
            OutputEncoding::Utf16Le => bytes.extend(text.encode_utf16().flat_map(u16::to_le_bytes)),
            OutputEncoding::Utf16Be => bytes.extend(text.encode_utf16().flat_map(u16::to_be_bytes)),
        }
        bytes
    }

    /// Encoding announced by a leading byte order mark, and the bytes after it.
    pub fn detect(bytes: &[u8]) -> Option<(Self, &[u8])> {
        [OutputEncoding::Utf8Bom, OutputEncoding::Utf16Le, OutputEncoding::Utf16Be]
            .into_iter()
            .find_map(|encoding| bytes.strip_prefix(encoding.preamble()).map(|rest| (encoding, rest)))
    }

    /// Decodes `bytes` lossily. A byte order mark takes precedence over `self`
    /// and is not part of the result.
    pub fn decode(&self, bytes: &[u8]) -> String {
        let (encoding, body) = Self::detect(bytes).unwrap_or((*self, bytes));
        match encoding {
            OutputEncoding::Utf8 | OutputEncoding::Utf8Bom => String::from_utf8_lossy(body).into_owned(),
            OutputEncoding::Utf16Le => decode_utf16(body, u16::from_le_bytes),
            OutputEncoding::Utf16Be => decode_utf16(body, u16::from_be_bytes),
        }
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_utf8_without_bom() {
        let encoding = OutputEncoding::default();
        assert_eq!(encoding, OutputEncoding::Utf8);
        assert_eq!(encoding.encode("abc"), b"abc".to_vec());
    }

    #[test]
    fn test_utf8_bom_preamble() {
        assert_eq!(
            OutputEncoding::Utf8Bom.encode("é"),
            vec![0xEF, 0xBB, 0xBF, 0xC3, 0xA9]
        );
    }

    #[test]
    fn test_utf16_byte_order() {
        assert_eq!(OutputEncoding::Utf16Le.encode("A"), vec![0xFF, 0xFE, 0x41, 0x00]);
        assert_eq!(OutputEncoding::Utf16Be.encode("A"), vec![0xFE, 0xFF, 0x00, 0x41]);
    }

    #[test]
    fn test_decode_strips_byte_order_marks() {
        assert_eq!(OutputEncoding::Utf8.decode(b"\xEF\xBB\xBFv1"), "v1");
        assert_eq!(OutputEncoding::Utf8.decode(&OutputEncoding::Utf16Le.encode("v1")), "v1");
        assert_eq!(OutputEncoding::Utf8.decode(&OutputEncoding::Utf16Be.encode("v1")), "v1");
    }

    #[test]
    fn test_decode_without_mark_uses_requested_encoding() {
        assert_eq!(OutputEncoding::Utf8.decode("é".as_bytes()), "é");
        assert_eq!(OutputEncoding::Utf16Le.decode(&[0x41, 0x00]), "A");
        assert_eq!(OutputEncoding::Utf8.decode(&[0x61, 0xFF]), "a\u{FFFD}");
        assert_eq!(OutputEncoding::detect(b"v1"), None);
    }

    #[test]
    fn test_value_enum_names() {
        assert_eq!(OutputEncoding::from_str("utf-8", true), Ok(OutputEncoding::Utf8));
        assert_eq!(OutputEncoding::from_str("UTF-8-BOM", true), Ok(OutputEncoding::Utf8Bom));
        assert_eq!(OutputEncoding::from_str("unicode", true), Ok(OutputEncoding::Utf16Le));
        assert!(OutputEncoding::from_str("latin1", true).is_err());
    }

    #[test]
    fn test_serde_names() {
        let encoding: OutputEncoding = serde_yaml::from_str("utf-16be").unwrap();
        assert_eq!(encoding, OutputEncoding::Utf16Be);
        assert_eq!(serde_yaml::to_string(&OutputEncoding::Utf8Bom).unwrap().trim(), "utf-8-bom");
    }
}
