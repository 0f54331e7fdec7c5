//! Standard-14 Helvetica fonts, WinAnsi text encoding and text measurement
//!
//! Generated pages use the non-embedded base fonts so every viewer can
//! render them. Widths come from the Adobe AFM metrics and are in 1/1000
//! of the font size.

use lopdf::{dictionary, Dictionary, Object, StringFormat};

/// Base fonts used by the generated pages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseFont {
    Helvetica,
    HelveticaBold,
}

impl BaseFont {
    /// Resource name used in content streams
    pub fn resource_name(self) -> &'static str {
        match self {
            BaseFont::Helvetica => "F1",
            BaseFont::HelveticaBold => "F2",
        }
    }

    pub fn postscript_name(self) -> &'static str {
        match self {
            BaseFont::Helvetica => "Helvetica",
            BaseFont::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Type1 font dictionary with WinAnsiEncoding
    pub fn dictionary(self) -> Dictionary {
        dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => self.postscript_name(),
            "Encoding" => "WinAnsiEncoding",
        }
    }

    fn widths(self) -> &'static [u16; 95] {
        match self {
            BaseFont::Helvetica => &HELVETICA_WIDTHS,
            BaseFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        }
    }

    /// Advance width of one WinAnsi byte, in 1/1000 em
    fn glyph_width(self, byte: u8) -> u16 {
        match byte {
            32..=126 => self.widths()[usize::from(byte - 32)],
            // Accented Latin-1 letters are close to the width of their base letter
            _ => 556,
        }
    }

    /// Width of `text` in points at `size`
    pub fn text_width(self, text: &str, size: f32) -> f32 {
        let units: u32 = to_win_ansi(text)
            .into_iter()
            .map(|b| u32::from(self.glyph_width(b)))
            .sum();
        units as f32 * size / 1000.0
    }
}

/// Helvetica widths for characters 32..=126
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // space - /
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,                               // 0 - 9
    278, 278, 584, 584, 584, 556, 1015,                                             // : - @
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,                // A - M
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,                // N - Z
    278, 278, 278, 469, 556, 333,                                                   // [ - `
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,                // a - m
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,                // n - z
    334, 260, 334, 584,                                                             // { - ~
];

/// Helvetica-Bold widths for characters 32..=126
#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

/// Encode text for a WinAnsiEncoding font
///
/// Latin-1 maps directly; the typographic characters WinAnsi places in
/// 0x80..0x9F are translated; anything else becomes `?`.
pub fn to_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            _ => b'?',
        })
        .collect()
}

/// A PDF text string (for outline titles and metadata)
///
/// ASCII is written as-is; anything else as UTF-16BE with a byte order mark.
pub fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xFE, 0xFF];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_tables_cover_printable_ascii() {
        assert_eq!(BaseFont::Helvetica.glyph_width(b' '), 278);
        assert_eq!(BaseFont::Helvetica.glyph_width(b'~'), 584);
        assert_eq!(BaseFont::HelveticaBold.glyph_width(b'W'), 944);
        assert_eq!(BaseFont::HelveticaBold.glyph_width(b'm'), 889);
    }

    #[test]
    fn test_text_width() {
        // "Hi" = 722 + 222
        let width = BaseFont::Helvetica.text_width("Hi", 10.0);
        assert!((width - 9.44).abs() < 0.001);
        assert_eq!(BaseFont::Helvetica.text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(to_win_ansi("Abc"), b"Abc".to_vec());
        assert_eq!(to_win_ansi("Bésame"), vec![b'B', 0xE9, b's', b'a', b'm', b'e']);
        assert_eq!(to_win_ansi("I’m"), vec![b'I', 0x92, b'm']);
        assert_eq!(to_win_ansi("日"), vec![b'?']);
    }

    #[test]
    fn test_text_string_encoding() {
        match text_string("Faith") {
            Object::String(bytes, StringFormat::Literal) => assert_eq!(bytes, b"Faith".to_vec()),
            other => panic!("unexpected {:?}", other),
        }
        match text_string("é") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(bytes, vec![0xFE, 0xFF, 0x00, 0xE9]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_font_dictionary() {
        let dict = BaseFont::HelveticaBold.dictionary();
        assert_eq!(dict.get(b"BaseFont").unwrap().as_name().unwrap(), b"Helvetica-Bold");
        assert_eq!(dict.get(b"Encoding").unwrap().as_name().unwrap(), b"WinAnsiEncoding");
    }
}
