//! Invoice template engine
//!
//! This crate turns a positioned-element template plus structured invoice
//! data into a finished PDF:
//! - Template schema types (tagged-union elements over serde)
//! - `{path.to.value}` variable resolution against a JSON context
//! - GST tax computation (CGST/SGST/IGST) and totals
//! - Per-element renderers and the document assembler
//!
//! # Example
//!
//! ```ignore
//! use invoice_template::{generate, RenderOptions};
//!
//! let invoice: Invoice = serde_json::from_str(invoice_json)?;
//! let pdf_bytes = generate(None, &invoice, &RenderOptions::default())?;
//! ```

pub mod invoice;
mod render;
mod schema;
pub mod tax;
pub mod vars;

pub use invoice::{Invoice, LineItem, Party};
pub use render::{default_template, generate, generate_overlay, RenderOptions};
pub use schema::*;
pub use tax::{TaxBreakdown, Totals};

use thiserror::Error;

/// Errors that can occur during template processing
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to parse template: {0}")]
    Parse(String),

    #[error("Image error: {0}")]
    Image(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for template operations
pub type Result<T> = std::result::Result<T, TemplateError>;
