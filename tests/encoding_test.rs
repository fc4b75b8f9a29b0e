use doc2tooltip::encoding::{self, TextEncoding};
use doc2tooltip::TooltipError;

const ALL: [TextEncoding; 6] = [
    TextEncoding::Utf8,
    TextEncoding::Utf8Bom,
    TextEncoding::Utf16Le,
    TextEncoding::Utf16Be,
    TextEncoding::Utf32Le,
    TextEncoding::Utf32Be,
];

#[test]
fn test_detect_from_byte_order_mark() {
    assert_eq!(TextEncoding::detect(b"plain"), TextEncoding::Utf8);
    assert_eq!(TextEncoding::detect(&[]), TextEncoding::Utf8);
    assert_eq!(TextEncoding::detect(&[0xEF, 0xBB, 0xBF, b'a']), TextEncoding::Utf8Bom);
    assert_eq!(TextEncoding::detect(&[0xFF, 0xFE, b'a', 0x00]), TextEncoding::Utf16Le);
    assert_eq!(TextEncoding::detect(&[0xFE, 0xFF, 0x00, b'a']), TextEncoding::Utf16Be);
    assert_eq!(TextEncoding::detect(&[0xFF, 0xFE, 0x00, 0x00]), TextEncoding::Utf32Le);
    assert_eq!(TextEncoding::detect(&[0x00, 0x00, 0xFE, 0xFF]), TextEncoding::Utf32Be);
}

#[test]
fn test_every_encoding_preserves_text_and_mark() {
    let text = "/// <summary>Vitesse é ✓ 𝄞</summary>\r\npublic float speed;\n";
    for encoding in ALL {
        let bytes = encoding.encode(text).unwrap();
        assert!(bytes.starts_with(encoding.bom()), "{}", encoding.as_str());
        let (decoded, detected) = encoding::decode(&bytes).unwrap();
        assert_eq!(detected, encoding, "{}", encoding.as_str());
        assert_eq!(decoded, text, "{}", encoding.as_str());
    }
}

#[test]
fn test_invalid_utf8_is_an_encoding_error() {
    let err = TextEncoding::Utf8.decode(&[b'a', 0xC3, 0x28]).unwrap_err();
    assert!(matches!(err, TooltipError::Encoding { .. }));
}

#[test]
fn test_markless_legacy_code_page_is_detected() {
    let bytes = b"/// <summary>Vitesse de d\xE9placement</summary>\npublic float speed;\n";
    let (text, detected) = encoding::decode(bytes).unwrap();
    assert!(matches!(detected, TextEncoding::Legacy(_)));
    assert_ne!(detected.as_str(), "UTF-8");
    assert!(detected.bom().is_empty());
    assert_eq!(
        text,
        "/// <summary>Vitesse de d\u{e9}placement</summary>\npublic float speed;\n"
    );
    assert_eq!(detected.encode(&text).unwrap(), bytes.to_vec());
}

#[test]
fn test_valid_utf8_without_mark_stays_utf8() {
    assert_eq!(TextEncoding::detect("déplacement".as_bytes()), TextEncoding::Utf8);
}

#[test]
fn test_unrepresentable_character_fails_to_encode() {
    let windows_1252 = TextEncoding::Legacy(encoding_rs::WINDOWS_1252);
    assert_eq!(windows_1252.as_str(), "windows-1252");
    assert_eq!(windows_1252.encode("caf\u{e9}").unwrap(), b"caf\xE9".to_vec());
    let err = windows_1252.encode("\u{2713}").unwrap_err();
    assert!(matches!(err, TooltipError::Encoding { .. }));
}

#[test]
fn test_truncated_utf16_is_an_encoding_error() {
    let err = encoding::decode(&[0xFE, 0xFF, 0x00]).unwrap_err();
    assert!(matches!(err, TooltipError::Encoding { .. }));
}

#[test]
fn test_decode_requires_the_mark() {
    assert!(TextEncoding::Utf16Le.decode(b"ab").is_err());
    assert_eq!(TextEncoding::Utf8.decode(b"ab").unwrap(), "ab");
}
