use chardetng::EncodingDetector;
use encoding_rs::Encoding;

use crate::errors::{Result, TooltipError};

/// Text encodings a source file can be read and written with.
///
/// A file is written back with the encoding it was read with, mark included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    Utf8,
    Utf8Bom,
    Utf16Le,
    Utf16Be,
    Utf32Le,
    Utf32Be,
    /// A mark-less legacy code page, such as windows-1252, guessed from content.
    Legacy(&'static Encoding),
}

impl TextEncoding {
    /// Detects the encoding of `bytes`.
    ///
    /// A byte-order mark decides first. Without one, valid UTF-8 is UTF-8 and
    /// anything else is handed to the charset detector.
    pub fn detect(bytes: &[u8]) -> Self {
        // UTF-32 first: the UTF-32 LE mark starts with the UTF-16 LE one.
        match bytes {
            [0xFF, 0xFE, 0x00, 0x00, ..] => TextEncoding::Utf32Le,
            [0x00, 0x00, 0xFE, 0xFF, ..] => TextEncoding::Utf32Be,
            [0xEF, 0xBB, 0xBF, ..] => TextEncoding::Utf8Bom,
            [0xFF, 0xFE, ..] => TextEncoding::Utf16Le,
            [0xFE, 0xFF, ..] => TextEncoding::Utf16Be,
            _ if std::str::from_utf8(bytes).is_ok() => TextEncoding::Utf8,
            _ => {
                let mut detector = EncodingDetector::new();
                detector.feed(bytes, true);
                TextEncoding::Legacy(detector.guess(None, false))
            }
        }
    }

    /// Returns the string representation of this encoding.
    pub fn as_str(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf8Bom => "utf-8-bom",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
            TextEncoding::Utf32Le => "utf-32le",
            TextEncoding::Utf32Be => "utf-32be",
            TextEncoding::Legacy(encoding) => encoding.name(),
        }
    }

    /// The byte-order mark written before the text.
    pub fn bom(&self) -> &'static [u8] {
        match self {
            TextEncoding::Utf8 | TextEncoding::Legacy(_) => &[],
            TextEncoding::Utf8Bom => &[0xEF, 0xBB, 0xBF],
            TextEncoding::Utf16Le => &[0xFF, 0xFE],
            TextEncoding::Utf16Be => &[0xFE, 0xFF],
            TextEncoding::Utf32Le => &[0xFF, 0xFE, 0x00, 0x00],
            TextEncoding::Utf32Be => &[0x00, 0x00, 0xFE, 0xFF],
        }
    }

    /// Decodes `bytes`, which must start with this encoding's mark.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        let payload = bytes.strip_prefix(self.bom()).ok_or_else(|| TooltipError::Encoding {
            message: format!("missing {} byte-order mark", self.as_str()),
        })?;
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Bom => std::str::from_utf8(payload)
                .map(str::to_string)
                .map_err(|e| self.invalid(e)),
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => {
                if payload.len() % 2 != 0 {
                    return Err(self.invalid("odd number of bytes"));
                }
                let units: Vec<u16> = payload
                    .chunks_exact(2)
                    .map(|pair| {
                        let pair = [pair[0], pair[1]];
                        if *self == TextEncoding::Utf16Le {
                            u16::from_le_bytes(pair)
                        } else {
                            u16::from_be_bytes(pair)
                        }
                    })
                    .collect();
                String::from_utf16(&units).map_err(|e| self.invalid(e))
            }
            TextEncoding::Utf32Le | TextEncoding::Utf32Be => {
                if payload.len() % 4 != 0 {
                    return Err(self.invalid("byte count is not a multiple of four"));
                }
                payload
                    .chunks_exact(4)
                    .map(|quad| {
                        let quad = [quad[0], quad[1], quad[2], quad[3]];
                        let value = if *self == TextEncoding::Utf32Le {
                            u32::from_le_bytes(quad)
                        } else {
                            u32::from_be_bytes(quad)
                        };
                        char::from_u32(value)
                            .ok_or_else(|| self.invalid(format!("invalid code point {value:#x}")))
                    })
                    .collect()
            }
            TextEncoding::Legacy(encoding) => {
                let (text, had_errors) = encoding.decode_without_bom_handling(payload);
                if had_errors {
                    return Err(self.invalid("malformed byte sequence"));
                }
                Ok(text.into_owned())
            }
        }
    }

    /// Encodes `text`, mark included.
    ///
    /// Fails for a legacy code page that cannot represent every character.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        let mut bytes = self.bom().to_vec();
        match self {
            TextEncoding::Utf8 | TextEncoding::Utf8Bom => bytes.extend_from_slice(text.as_bytes()),
            TextEncoding::Utf16Le => text
                .encode_utf16()
                .for_each(|unit| bytes.extend_from_slice(&unit.to_le_bytes())),
            TextEncoding::Utf16Be => text
                .encode_utf16()
                .for_each(|unit| bytes.extend_from_slice(&unit.to_be_bytes())),
            TextEncoding::Utf32Le => text
                .chars()
                .for_each(|c| bytes.extend_from_slice(&(c as u32).to_le_bytes())),
            TextEncoding::Utf32Be => text
                .chars()
                .for_each(|c| bytes.extend_from_slice(&(c as u32).to_be_bytes())),
            TextEncoding::Legacy(encoding) => {
                let (encoded, _, unmappable) = encoding.encode(text);
                if unmappable {
                    return Err(self.invalid("character not representable"));
                }
                bytes.extend_from_slice(&encoded);
            }
        }
        Ok(bytes)
    }

    fn invalid(&self, reason: impl std::fmt::Display) -> TooltipError {
        TooltipError::Encoding {
            message: format!("invalid {} text: {}", self.as_str(), reason),
        }
    }
}

/// Detects the encoding of `bytes` and decodes them.
pub fn decode(bytes: &[u8]) -> Result<(String, TextEncoding)> {
    let encoding = TextEncoding::detect(bytes);
    let text = encoding.decode(bytes)?;
    Ok((text, encoding))
}
