//! The standard Type1 fonts used by the contact sheet and their horizontal metrics.
//!
//! The base-14 fonts are available in every PDF viewer, so no font program needs to be embedded
//! in the document. The advance widths are the ones published in the Adobe Font Metrics files,
//! expressed in thousandths of an em, for every code of `WinAnsiEncoding`.

/// Millimeters per typographic point.
const MILLIMETERS_PER_POINT: f32 = 25.4 / 72.0;

/// Converts millimeters to points. The PDF operators work in points, while the layout works
/// in millimeters which are easier to reason about.
pub fn millimeters_to_points(millimeters: f32) -> f32 {
    millimeters / MILLIMETERS_PER_POINT
}

pub fn points_to_millimeters(points: f32) -> f32 {
    points * MILLIMETERS_PER_POINT
}

/// The three faces of Helvetica used by the document: regular for the values, bold for the
/// labels and oblique for the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BuiltinFont {
    Helvetica,
    HelveticaBold,
    HelveticaOblique,
}

impl BuiltinFont {
    pub const ALL: [BuiltinFont; 3] = [
        BuiltinFont::Helvetica,
        BuiltinFont::HelveticaBold,
        BuiltinFont::HelveticaOblique,
    ];

    /// The PostScript name of the font, used for the `BaseFont` entry.
    pub fn base_font(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::HelveticaOblique => "Helvetica-Oblique",
        }
    }

    /// The advance width of a character in thousandths of an em. Characters which cannot be
    /// encoded are measured as the `?` they are replaced with.
    pub fn character_width(&self, character: char) -> u16 {
        let widths = match self {
            // The oblique face shares the metrics of the regular one
            BuiltinFont::Helvetica | BuiltinFont::HelveticaOblique => &HELVETICA_WIDTHS,
            BuiltinFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
        };
        let code = win_ansi_code(character).unwrap_or(REPLACEMENT_CODE);
        widths[usize::from(code - FIRST_CODE)]
    }

    /// The width of the text, when set at the given size in points, expressed in millimeters.
    pub fn text_width(&self, text: &str, font_size: f32) -> f32 {
        let total_width: u32 = text
            .chars()
            .map(|character| u32::from(self.character_width(character)))
            .sum();
        points_to_millimeters(total_width as f32 / 1000.0 * font_size)
    }
}

/// The first code of the width tables, the space.
const FIRST_CODE: u8 = 0x20;

const REPLACEMENT_CODE: u8 = b'?';

// Codes 0x7f, 0x81, 0x8d, 0x8f, 0x90 and 0x9d are unassigned in WinAnsiEncoding and never
// produced by `win_ansi_code`, their width is zero.

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 224] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0 - 9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A - Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a - z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~ and the unassigned 0x7f
    334, 260, 334, 584, 0,
    // 0x80 - 0x8f: Euro, quotesinglbase, florin, quotedblbase, ellipsis, dagger, daggerdbl,
    // circumflex, perthousand, Scaron, guilsinglleft, OE, Zcaron
    556, 0, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    // 0x90 - 0x9f: quotes, bullet, dashes, tilde, trademark, scaron, guilsinglright, oe,
    // zcaron, Ydieresis
    0, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 0, 500, 667,
    // 0xa0 - 0xaf
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // 0xb0 - 0xbf
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 0xc0 - 0xcf: Agrave - Idieresis
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // 0xd0 - 0xdf: Eth - germandbls
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 0xe0 - 0xef: agrave - idieresis
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // 0xf0 - 0xff: eth - ydieresis
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 224] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0 - 9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    333, 333, 584, 584, 584, 611, 975,
    // A - Z
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    333, 278, 333, 584, 556, 333,
    // a - z
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
    611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    // { | } ~ and the unassigned 0x7f
    389, 280, 389, 584, 0,
    // 0x80 - 0x8f
    556, 0, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 0, 611, 0,
    // 0x90 - 0x9f
    0, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 0, 500, 667,
    // 0xa0 - 0xaf
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // 0xb0 - 0xbf
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 0xc0 - 0xcf
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // 0xd0 - 0xdf
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 0xe0 - 0xef
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    // 0xf0 - 0xff
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];

/// The code of the character in WinAnsiEncoding, if it has one. Latin-1 maps onto itself,
/// the 0x80 - 0x9f range holds typographic punctuation and a few extra letters.
pub fn win_ansi_code(character: char) -> Option<u8> {
    let code = match character {
        ' '..='~' | '\u{a0}'..='\u{ff}' => character as u8,
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => return None,
    };

    Some(code)
}

/// Encodes the text into the single-byte WinAnsi encoding declared for the fonts. Characters
/// that have no code in the encoding are replaced by a question mark.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|character| {
            win_ansi_code(character).unwrap_or_else(|| {
                log::warn!(
                    "Unable to encode the character {:?} with the document fonts, replacing it",
                    character
                );
                REPLACEMENT_CODE
            })
        })
        .collect()
}
