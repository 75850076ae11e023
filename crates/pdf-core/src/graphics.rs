//! Rectangle and line operator generation

use crate::document::Color;

/// Generate operators for a rectangle, optionally filled and/or stroked.
///
/// Fill and border are independent; both may apply to the same rectangle.
///
/// # Arguments
/// * `x`, `y` - lower-left corner in PDF coordinates (from bottom)
/// * `width`, `height` - rectangle extent in points
/// * `fill` - fill color, if any
/// * `stroke` - border color and line width, if any
pub fn generate_rect_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    fill: Option<Color>,
    stroke: Option<(Color, f64)>,
) -> Vec<u8> {
    let mut ops = String::from("q\n");

    if let Some(c) = fill {
        ops.push_str(&format!("{} {} {} rg\n", c.r, c.g, c.b));
        ops.push_str(&format!("{x} {y} {width} {height} re\nf\n"));
    }

    if let Some((c, line_width)) = stroke {
        ops.push_str(&format!("{} {} {} RG\n", c.r, c.g, c.b));
        ops.push_str(&format!("{line_width} w\n"));
        ops.push_str(&format!("{x} {y} {width} {height} re\nS\n"));
    }

    ops.push_str("Q\n");
    ops.into_bytes()
}

/// Generate operators for a dashed rectangle outline.
///
/// # Arguments
/// * `x`, `y` - lower-left corner in PDF coordinates
/// * `dash` - on/off length of the dash pattern in points
pub fn generate_dashed_rect_operators(
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    color: Color,
    line_width: f64,
    dash: f64,
) -> Vec<u8> {
    format!(
        "q\n{} {} {} RG\n{line_width} w\n[{dash} {dash}] 0 d\n{x} {y} {width} {height} re\nS\nQ\n",
        color.r, color.g, color.b
    )
    .into_bytes()
}

/// Generate operators for a stroked line segment.
///
/// Coordinates are PDF coordinates (from bottom).
pub fn generate_line_operators(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    thickness: f64,
    color: Color,
) -> Vec<u8> {
    format!(
        "q\n{} {} {} RG\n{thickness} w\n{x1} {y1} m\n{x2} {y2} l\nS\nQ\n",
        color.r, color.g, color.b
    )
    .into_bytes()
}
