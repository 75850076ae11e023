//! Indian numbering system text processing
//!
//! This crate provides:
//! - Amount-to-words conversion in the Indian system (Crore/Lakh/Thousand)
//! - INR number formatting with Indian digit grouping (1,00,00,000.00)
//! - Invoice date formatting
//!
//! All conversions are pure and deterministic; no platform locale API is
//! involved.

mod formatter;
mod words;

pub use formatter::{format_date, format_inr};
pub use words::{amount_in_words, number_in_words};
