//! PDF Core - Low-level PDF construction
//!
//! This crate provides functionality for:
//! - Creating single-page PDF documents from scratch
//! - Opening existing PDFs for annotation overlay
//! - Drawing text with the built-in standard fonts (WinAnsi encoded)
//! - Drawing rectangles, lines and dashed boxes
//! - Embedding images (JPEG, PNG)
//! - Adding an empty digital-signature form field
//!
//! All public coordinates are top-left origin in points; conversion to the
//! PDF bottom-left origin happens internally.
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, BuiltinFont, PdfDocument};
//!
//! let mut doc = PdfDocument::new(595.28, 841.89);
//! doc.set_font(BuiltinFont::Helvetica, 12.0);
//! doc.insert_text("Hello, World!", 1, 100.0, 100.0, Align::Left)?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod graphics;
mod image;
mod text;

pub use document::{Color, PdfDocument};
pub use font::BuiltinFont;
pub use graphics::{generate_dashed_rect_operators, generate_line_operators, generate_rect_operators};
pub use image::{generate_image_operators, ImageXObject};
pub use text::{encode_winansi, escape_literal, generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to open PDF: {0}")]
    Open(String),

    #[error("Failed to save PDF: {0}")]
    Save(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("Image error: {0}")]
    Image(String),

    #[error("PDF parsing error: {0}")]
    Parse(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    Lopdf(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment relative to the anchor point
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}
