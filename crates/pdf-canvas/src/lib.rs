//! PDF Canvas - from-scratch PDF page construction
//!
//! This crate provides functionality for:
//! - Building a PDF document page by page
//! - Drawing text blocks with the standard-14 base fonts
//! - Drawing stroked lines
//! - Placing images (JPEG, PNG) with optional aspect-preserving scaling
//!
//! Coordinates are in points with the PDF origin (bottom-left corner).
//!
//! # Example
//!
//! ```ignore
//! use pdf_canvas::{Canvas, ImageScaleMode};
//!
//! let mut canvas = Canvas::a4();
//! canvas.draw_text_block(&["Hello, World!"], 100.0, 700.0, "Helvetica", 12.0)?;
//! canvas.show_page();
//! canvas.save("output.pdf")?;
//! ```

mod document;
mod image;
mod text;

pub use document::Canvas;
pub use image::{detect_format, fit_box, ImageFormat, ImageScaleMode, ImageXObject};
pub use text::{encode_literal, line_leading, text_block_operators};

use thiserror::Error;

/// Errors that can occur during canvas operations
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0} (only standard-14 base fonts are available)")]
    FontNotFound(String),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for canvas operations
pub type Result<T> = std::result::Result<T, CanvasError>;

/// Unit conversion and fixed page dimensions
pub mod units {
    /// Points per centimeter (72 dpi / 2.54 cm per inch)
    pub const PT_PER_CM: f64 = 72.0 / 2.54;

    /// ISO A4 width in points
    pub const A4_WIDTH: f64 = 595.28;

    /// ISO A4 height in points
    pub const A4_HEIGHT: f64 = 841.89;

    /// Convert centimeters to points
    pub fn cm(value: f64) -> f64 {
        value * PT_PER_CM
    }
}

/// Format a coordinate for a content stream
///
/// Rounds to 3 decimals and trims trailing zeros so operators are
/// deterministic and readable.
pub(crate) fn fmt_coord(value: f64) -> String {
    let s = format!("{value:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" {
        "0".to_string()
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cm_conversion() {
        assert!((units::cm(1.0) - 28.346_456_692_913_385).abs() < 1e-9);
        assert!((units::cm(2.54) - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_fmt_coord() {
        assert_eq!(fmt_coord(72.0), "72");
        assert_eq!(fmt_coord(56.6929), "56.693");
        assert_eq!(fmt_coord(0.5), "0.5");
        assert_eq!(fmt_coord(-0.0001), "0");
    }
}
