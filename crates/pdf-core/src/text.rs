//! Text operator generation and WinAnsi encoding

use crate::document::Color;
use crate::Align;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text width in points (for alignment)
    pub text_width: f64,
    /// Text color (RGB)
    pub color: Color,
}

/// Encode a string to WinAnsi (CP-1252) bytes.
///
/// ASCII and Latin-1 pass through; the CP-1252 punctuation block is mapped
/// explicitly. Anything unrepresentable becomes '?' so rendering never fails
/// on exotic input.
pub fn encode_winansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u8,
            '€' => 0x80,
            '‚' => 0x82,
            '„' => 0x84,
            '…' => 0x85,
            '†' => 0x86,
            '‡' => 0x87,
            '‰' => 0x89,
            '‹' => 0x8B,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '›' => 0x9B,
            _ => b'?',
        })
        .collect()
}

/// Escape WinAnsi bytes into a PDF literal string, parentheses included.
pub fn escape_literal(encoded: &[u8]) -> String {
    let mut out = String::with_capacity(encoded.len() + 2);
    out.push('(');
    for &b in encoded {
        match b {
            b'(' => out.push_str("\\("),
            b')' => out.push_str("\\)"),
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("\\{b:03o}")),
        }
    }
    out.push(')');
    out
}

/// Generate PDF operators for text insertion
///
/// Creates the proper PDF text operators (BT, rg, Tf, Td, Tj, ET) to render
/// text at a specific position with alignment support.
///
/// # Arguments
/// * `literal` - Escaped PDF literal string (e.g., "(Hello)")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate in points (PDF coordinates, from bottom)
/// * `align` - Text alignment relative to the anchor
/// * `ctx` - Text rendering context
pub fn generate_text_operators(
    literal: &str,
    x: f64,
    y: f64,
    align: Align,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let x_offset = match align {
        Align::Left => 0.0,
        Align::Center => -ctx.text_width / 2.0,
        Align::Right => -ctx.text_width,
    };

    let final_x = x + x_offset;

    let mut ops = String::new();
    ops.push_str("BT\n");
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));
    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    ops.push_str(&format!("{final_x} {y} Td\n"));
    ops.push_str(&format!("{literal} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_encode_ascii_passthrough() {
        assert_eq!(encode_winansi("Invoice #42"), b"Invoice #42".to_vec());
    }

    #[test]
    fn test_encode_cp1252_punctuation() {
        assert_eq!(encode_winansi("–"), vec![0x96]);
        assert_eq!(encode_winansi("€"), vec![0x80]);
    }

    #[test]
    fn test_encode_unmappable() {
        assert_eq!(encode_winansi("₹"), vec![b'?']);
    }

    #[test]
    fn test_escape_parens_and_backslash() {
        assert_eq!(escape_literal(b"a(b)c\\d"), "(a\\(b\\)c\\\\d)");
    }

    #[test]
    fn test_escape_high_bytes_as_octal() {
        assert_eq!(escape_literal(&[0x96]), "(\\226)");
    }

    #[test]
    fn test_generate_text_operators_left() {
        let ctx = TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 12.0,
            text_width: 100.0,
            color: Color::black(),
        };

        let ops = generate_text_operators("(Hello)", 100.0, 700.0, Align::Left, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("BT"));
        assert!(ops_str.contains("/F1 12 Tf"));
        assert!(ops_str.contains("100 700 Td"));
        assert!(ops_str.contains("(Hello) Tj"));
        assert!(ops_str.contains("ET"));
    }

    #[test]
    fn test_generate_text_operators_center() {
        let ctx = TextRenderContext {
            font_name: "F2".to_string(),
            font_size: 14.0,
            text_width: 100.0,
            color: Color::black(),
        };

        let ops = generate_text_operators("(Test)", 200.0, 600.0, Align::Center, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("150 600 Td")); // 200 - 50 (half of 100)
    }

    #[test]
    fn test_generate_text_operators_right() {
        let ctx = TextRenderContext {
            font_name: "F3".to_string(),
            font_size: 16.0,
            text_width: 80.0,
            color: Color::black(),
        };

        let ops = generate_text_operators("(Right)", 300.0, 500.0, Align::Right, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("220 500 Td")); // 300 - 80
    }

    #[test]
    fn test_generate_text_operators_with_color() {
        let ctx = TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 12.0,
            text_width: 10.0,
            color: Color::rgb(1.0, 0.0, 0.0),
        };

        let ops = generate_text_operators("(A)", 0.0, 0.0, Align::Left, &ctx);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("1 0 0 rg"));
    }
}
