//! Template schema types
//!
//! A template is a page description plus a flat list of absolutely
//! positioned elements. Coordinates are PDF points with the origin at the
//! top-left corner of the page; the renderer converts to PDF's bottom-left
//! origin when emitting operators.

use serde::{Deserialize, Deserializer, Serialize};

use crate::{Result, TemplateError};

/// An RGB color with components in 0.0-1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Color { r, g, b }
    }

    /// Build a color from 8-bit channel values
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
        }
    }

    pub fn black() -> Self {
        Color::rgb(0.0, 0.0, 0.0)
    }

    pub fn white() -> Self {
        Color::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::black()
    }
}

impl From<Color> for pdf_core::Color {
    fn from(c: Color) -> pdf_core::Color {
        pdf_core::Color::rgb(c.r as f32, c.g as f32, c.b as f32)
    }
}

/// Supported page sizes
///
/// Unrecognized names fall back to A4 rather than failing the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
}

impl PageSize {
    /// Portrait dimensions in points (width, height)
    pub fn dimensions(self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(match name.to_ascii_lowercase().as_str() {
            "a5" => PageSize::A5,
            "letter" => PageSize::Letter,
            "legal" => PageSize::Legal,
            _ => PageSize::A4,
        })
    }
}

/// Page orientation; landscape swaps the page dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page margins in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Margins {
            top: 40.0,
            right: 40.0,
            bottom: 40.0,
            left: 40.0,
        }
    }
}

/// Horizontal text alignment within an element's box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// Font weight for text elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// A complete invoice template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "pageSize", default)]
    pub page_size: PageSize,
    #[serde(default)]
    pub orientation: Orientation,
    #[serde(default)]
    pub margins: Margins,
    /// Full-page background fill; white is treated as no fill
    #[serde(default)]
    pub background: Option<Color>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

impl Template {
    /// Page dimensions after applying the orientation
    pub fn page_dimensions(&self) -> (f64, f64) {
        let (w, h) = self.page_size.dimensions();
        match self.orientation {
            Orientation::Portrait => (w, h),
            Orientation::Landscape => (h, w),
        }
    }
}

/// Parse a template from its JSON representation
pub fn parse_template(json: &str) -> Result<Template> {
    serde_json::from_str(json).map_err(|e| TemplateError::Parse(e.to_string()))
}

fn default_true() -> bool {
    true
}

fn default_font_family() -> String {
    "Helvetica".to_string()
}

fn default_font_size() -> f32 {
    10.0
}

fn default_border_width() -> f64 {
    1.0
}

fn default_signature_label() -> String {
    "Authorized Signatory".to_string()
}

/// A positioned element on the page, dispatched on its `type` field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Text(TextElement),
    Rectangle(RectangleElement),
    Line(LineElement),
    Image(ImageElement),
    Table(TableElement),
    Signature(SignatureElement),
}

impl Element {
    pub fn frame(&self) -> &Frame {
        match self {
            Element::Text(e) => &e.frame,
            Element::Rectangle(e) => &e.frame,
            Element::Line(e) => &e.frame,
            Element::Image(e) => &e.frame,
            Element::Table(e) => &e.frame,
            Element::Signature(e) => &e.frame,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.frame().visible
    }
}

/// Position, size and editor state common to every element kind
///
/// `locked` only matters to template editors; the renderer ignores it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextElement {
    #[serde(flatten)]
    pub frame: Frame,
    pub content: String,
    #[serde(rename = "fontFamily", default = "default_font_family")]
    pub font_family: String,
    #[serde(rename = "fontSize", default = "default_font_size")]
    pub font_size: f32,
    #[serde(rename = "fontWeight", default)]
    pub font_weight: FontWeight,
    #[serde(default)]
    pub color: Color,
    #[serde(default)]
    pub align: TextAlign,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectangleElement {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default)]
    pub background: Option<Color>,
    #[serde(rename = "borderColor", default)]
    pub border_color: Color,
    #[serde(rename = "borderWidth", default = "default_border_width")]
    pub border_width: f64,
}

/// A horizontal rule; the frame height doubles as the stroke thickness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineElement {
    #[serde(flatten)]
    pub frame: Frame,
    #[serde(default)]
    pub color: Color,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageElement {
    #[serde(flatten)]
    pub frame: Frame,
    /// Either a `data:` URL with a base64 payload or the named
    /// reference "logo" resolved from the render options
    #[serde(default)]
    pub src: Option<String>,
}

/// Marks where the line-items table starts; columns are fixed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableElement {
    #[serde(flatten)]
    pub frame: Frame,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureElement {
    #[serde(flatten)]
    pub frame: Frame,
    /// Optional signature image as a base64 `data:` URL
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_signature_label")]
    pub label: String,
}
