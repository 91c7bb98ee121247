//! Text decoding for token segments.
//!
//! Segment bytes are normally UTF-8, but some encoders emit UTF-16,
//! UTF-32 or a legacy 8-bit code page. [`decode_text`] tries each
//! supported [`Charset`] in a fixed order and keeps the first result.
//!
//! A decoding that produces U+0000 is treated as a failure. JSON text
//! never contains a raw NUL, and without this rule UTF-8 would accept
//! ASCII-range UTF-16 and UTF-32 input as NUL-riddled garbage.

/// A character encoding the decoder knows how to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Charset {
    Utf8,
    /// UTF-16 with a byte-order mark selecting the endianness.
    Utf16,
    Utf16Le,
    Utf16Be,
    /// UTF-32 with a byte-order mark selecting the endianness.
    Utf32,
    Utf32Le,
    Utf32Be,
    Ascii,
    /// ISO-8859-1, excluding the C1 control range 0x80-0x9F.
    Latin1,
    Windows1252,
}

impl Charset {
    /// Fallback order used by [`decode_text`].
    pub const FALLBACK_ORDER: [Charset; 10] = [
        Charset::Utf8,
        Charset::Utf16,
        Charset::Utf16Le,
        Charset::Utf16Be,
        Charset::Utf32,
        Charset::Utf32Le,
        Charset::Utf32Be,
        Charset::Ascii,
        Charset::Latin1,
        Charset::Windows1252,
    ];

    /// Decode `bytes` in this charset, or `None` if they are not valid in it.
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        let text = match self {
            Charset::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Charset::Utf16 => match bytes {
                [0xff, 0xfe, rest @ ..] => utf16(rest, u16::from_le_bytes),
                [0xfe, 0xff, rest @ ..] => utf16(rest, u16::from_be_bytes),
                _ => None,
            },
            Charset::Utf16Le => utf16(bytes, u16::from_le_bytes),
            Charset::Utf16Be => utf16(bytes, u16::from_be_bytes),
            Charset::Utf32 => match bytes {
                [0xff, 0xfe, 0x00, 0x00, rest @ ..] => utf32(rest, u32::from_le_bytes),
                [0x00, 0x00, 0xfe, 0xff, rest @ ..] => utf32(rest, u32::from_be_bytes),
                _ => None,
            },
            Charset::Utf32Le => utf32(bytes, u32::from_le_bytes),
            Charset::Utf32Be => utf32(bytes, u32::from_be_bytes),
            Charset::Ascii => bytes
                .is_ascii()
                .then(|| bytes.iter().map(|&b| char::from(b)).collect()),
            Charset::Latin1 => bytes
                .iter()
                .all(|b| !(0x80..=0x9f).contains(b))
                .then(|| bytes.iter().map(|&b| char::from(b)).collect()),
            Charset::Windows1252 => bytes.iter().map(|&b| windows_1252(b)).collect(),
        }?;

        (!text.contains('\0')).then_some(text)
    }
}

/// Decode `bytes` with the first charset in [`Charset::FALLBACK_ORDER`]
/// that accepts them.
pub fn decode_text(bytes: &[u8]) -> Option<(Charset, String)> {
    Charset::FALLBACK_ORDER
        .iter()
        .find_map(|&charset| charset.decode(bytes).map(|text| (charset, text)))
}

fn utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Option<String> {
    if bytes.len() % 2 != 0 {
        return None;
    }
    let units = bytes.chunks_exact(2).map(|c| unit([c[0], c[1]]));
    char::decode_utf16(units).collect::<Result<String, _>>().ok()
}

fn utf32(bytes: &[u8], unit: fn([u8; 4]) -> u32) -> Option<String> {
    if bytes.len() % 4 != 0 {
        return None;
    }
    bytes
        .chunks_exact(4)
        .map(|c| char::from_u32(unit([c[0], c[1], c[2], c[3]])))
        .collect()
}

fn windows_1252(byte: u8) -> Option<char> {
    let c = match byte {
        0x80 => '\u{20ac}',
        0x82 => '\u{201a}',
        0x83 => '\u{0192}',
        0x84 => '\u{201e}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02c6}',
        0x89 => '\u{2030}',
        0x8a => '\u{0160}',
        0x8b => '\u{2039}',
        0x8c => '\u{0152}',
        0x8e => '\u{017d}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201c}',
        0x94 => '\u{201d}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02dc}',
        0x99 => '\u{2122}',
        0x9a => '\u{0161}',
        0x9b => '\u{203a}',
        0x9c => '\u{0153}',
        0x9e => '\u{017e}',
        0x9f => '\u{0178}',
        0x81 | 0x8d | 0x8f | 0x90 | 0x9d => return None,
        other => char::from(other),
    };
    Some(c)
}
