//! Report - branded PDF report composition
//!
//! This crate provides:
//! - `ReportCanvas`: a page canvas with a fixed branded template (logo,
//!   header line, title, generation tag) redrawn on every page
//! - Free-form text blocks and embedded raster images placed in
//!   centimeter coordinates
//! - An optional insertion-ordered metadata block
//!
//! # Example
//!
//! ```ignore
//! use report::{Metadata, ReportCanvas};
//!
//! let mut metadata = Metadata::new();
//! metadata.insert("Patient ID", "123");
//!
//! let mut report = ReportCanvas::builder("Winston-Lutz Analysis")
//!     .metadata(metadata)
//!     .create("analysis.pdf")?;
//! report.add_text("Max deviation: 1.2 mm", (2.0, 20.0), 10.0)?;
//! report.add_new_page()?;
//! report.add_image(&image_bytes, (3.0, 10.0), (12.0, 12.0), true)?;
//! report.finish()?;
//! ```

mod branding;
mod canvas;
mod metadata;

pub use branding::Branding;
pub use canvas::{Coordinate, ReportBuilder, ReportCanvas};
pub use metadata::{MetaValue, Metadata};

use thiserror::Error;

/// Errors that can occur while composing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Canvas error: {0}")]
    Canvas(#[from] pdf_canvas::CanvasError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Metadata error: {0}")]
    Metadata(String),
}

/// Result type for report operations
pub type Result<T> = std::result::Result<T, ReportError>;
