//! Built-in standard font metrics
//!
//! The generator is limited to a fixed subset of the PDF standard 14 fonts,
//! so no font files are embedded; width tables from the Adobe AFM files are
//! compiled in for text measurement.

/// Built-in PDF standard fonts supported by the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BuiltinFont {
    #[default]
    Helvetica,
    HelveticaBold,
    TimesRoman,
    TimesBold,
    Courier,
    CourierBold,
}

/// Glyph widths for WinAnsi codes 0x20..=0x7E, in 1/1000 em (Adobe AFM)
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // sp..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // 0..9
    278, 278, 584, 584, 584, 556, 1015, // :..@
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, 667, // A..P
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // Q..Z
    278, 278, 278, 469, 556, 333, // [..`
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, // a..p
    556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // q..z
    334, 260, 334, 584, // {..~
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    333, 333, 584, 584, 584, 611, 975,
    722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, 667,
    778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    333, 278, 333, 584, 556, 333,
    556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, 611,
    611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
    389, 280, 389, 584,
];

const TIMES_ROMAN_WIDTHS: [u16; 95] = [
    250, 333, 408, 500, 500, 833, 778, 180, 333, 333, 500, 564, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    278, 278, 564, 564, 564, 444, 921,
    722, 667, 667, 722, 611, 556, 722, 722, 333, 389, 722, 611, 889, 722, 722, 556,
    722, 667, 556, 611, 722, 722, 944, 722, 722, 611,
    333, 278, 333, 469, 500, 333,
    444, 500, 444, 500, 444, 333, 500, 500, 278, 278, 500, 278, 778, 500, 500, 500,
    500, 333, 389, 278, 500, 500, 722, 500, 500, 444,
    480, 200, 480, 541,
];

const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570, 250, 333, 250, 278,
    500, 500, 500, 500, 500, 500, 500, 500, 500, 500,
    333, 333, 570, 570, 570, 500, 930,
    722, 667, 722, 722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778, 611,
    778, 722, 556, 667, 722, 722, 1000, 722, 722, 667,
    333, 278, 333, 581, 500, 333,
    500, 556, 444, 556, 444, 333, 500, 556, 278, 333, 556, 278, 833, 556, 500, 556,
    556, 444, 389, 333, 556, 500, 722, 500, 500, 444,
    394, 220, 394, 520,
];

impl BuiltinFont {
    /// PDF BaseFont name
    pub fn base_font(&self) -> &'static str {
        match self {
            BuiltinFont::Helvetica => "Helvetica",
            BuiltinFont::HelveticaBold => "Helvetica-Bold",
            BuiltinFont::TimesRoman => "Times-Roman",
            BuiltinFont::TimesBold => "Times-Bold",
            BuiltinFont::Courier => "Courier",
            BuiltinFont::CourierBold => "Courier-Bold",
        }
    }

    /// Resolve a template font family name to a builtin font.
    ///
    /// Unknown families fall back to the Helvetica/Arial mapping so that a
    /// document is always produced.
    pub fn lookup(family: &str, bold: bool) -> Self {
        let family = family.to_ascii_lowercase();
        if family.contains("times") {
            if bold {
                BuiltinFont::TimesBold
            } else {
                BuiltinFont::TimesRoman
            }
        } else if family.contains("courier") || family.contains("mono") {
            if bold {
                BuiltinFont::CourierBold
            } else {
                BuiltinFont::Courier
            }
        } else if bold {
            BuiltinFont::HelveticaBold
        } else {
            BuiltinFont::Helvetica
        }
    }

    /// Bold variant of this font family
    pub fn bold(&self) -> Self {
        match self {
            BuiltinFont::Helvetica | BuiltinFont::HelveticaBold => BuiltinFont::HelveticaBold,
            BuiltinFont::TimesRoman | BuiltinFont::TimesBold => BuiltinFont::TimesBold,
            BuiltinFont::Courier | BuiltinFont::CourierBold => BuiltinFont::CourierBold,
        }
    }

    /// Width of a single WinAnsi code in 1/1000 em
    fn glyph_width(&self, code: u8) -> u16 {
        match self {
            BuiltinFont::Courier | BuiltinFont::CourierBold => 600,
            _ => {
                let table = match self {
                    BuiltinFont::Helvetica => &HELVETICA_WIDTHS,
                    BuiltinFont::HelveticaBold => &HELVETICA_BOLD_WIDTHS,
                    BuiltinFont::TimesRoman => &TIMES_ROMAN_WIDTHS,
                    BuiltinFont::TimesBold => &TIMES_BOLD_WIDTHS,
                    _ => unreachable!(),
                };
                if (0x20..=0x7E).contains(&code) {
                    table[(code - 0x20) as usize]
                } else {
                    // Accented Latin-1 glyphs are close to their base letter;
                    // a mid-range estimate keeps alignment usable.
                    556
                }
            }
        }
    }

    /// Measure WinAnsi-encoded text at the given size, in points
    pub fn text_width_encoded(&self, encoded: &[u8], size: f32) -> f64 {
        let units: u64 = encoded.iter().map(|&c| self.glyph_width(c) as u64).sum();
        units as f64 * size as f64 / 1000.0
    }

    /// Measure a string at the given size, in points
    pub fn text_width(&self, text: &str, size: f32) -> f64 {
        self.text_width_encoded(&crate::text::encode_winansi(text), size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lookup_known_families() {
        assert_eq!(BuiltinFont::lookup("Helvetica", false), BuiltinFont::Helvetica);
        assert_eq!(BuiltinFont::lookup("Arial", true), BuiltinFont::HelveticaBold);
        assert_eq!(BuiltinFont::lookup("Times New Roman", false), BuiltinFont::TimesRoman);
        assert_eq!(BuiltinFont::lookup("courier", true), BuiltinFont::CourierBold);
    }

    #[test]
    fn test_lookup_unknown_falls_back_to_helvetica() {
        assert_eq!(BuiltinFont::lookup("Comic Sans MS", false), BuiltinFont::Helvetica);
        assert_eq!(BuiltinFont::lookup("", true), BuiltinFont::HelveticaBold);
    }

    #[test]
    fn test_courier_is_monospace() {
        let narrow = BuiltinFont::Courier.text_width("iii", 10.0);
        let wide = BuiltinFont::Courier.text_width("WWW", 10.0);
        assert_eq!(narrow, wide);
        assert_eq!(narrow, 3.0 * 600.0 * 10.0 / 1000.0);
    }

    #[test]
    fn test_helvetica_width() {
        // 'H' = 722, 'i' = 222 at 1000 units/em
        let w = BuiltinFont::Helvetica.text_width("Hi", 10.0);
        assert!((w - (722.0 + 222.0) / 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_bold_variant() {
        assert_eq!(BuiltinFont::TimesRoman.bold(), BuiltinFont::TimesBold);
        assert_eq!(BuiltinFont::HelveticaBold.bold(), BuiltinFont::HelveticaBold);
    }

    #[test]
    fn test_width_tables_cover_ascii() {
        for code in 0x20u8..=0x7E {
            assert!(BuiltinFont::Helvetica.glyph_width(code) > 0);
            assert!(BuiltinFont::TimesBold.glyph_width(code) > 0);
        }
    }
}
