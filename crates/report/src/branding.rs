//! Branding and the fixed template layout
//!
//! The template geometry is deliberately not configurable per call: it
//! is the identity of the report, resolved once and reused for every
//! page.

use crate::Result;
use std::borrow::Cow;
use std::path::Path;

/// Logo bundled with the crate, drawn when no custom logo is supplied
const BUNDLED_LOGO: &[u8] = include_bytes!("../assets/logo.png");

/// Fixed per-page template geometry, in centimeters
pub(crate) mod layout {
    /// Bottom-left corner of the logo box
    pub const LOGO_POSITION: (f64, f64) = (1.0, 26.5);
    /// Logo box size; the logo is fit within it, aspect preserved
    pub const LOGO_BOX: (f64, f64) = (5.0, 3.0);
    /// Header separator line endpoints
    pub const HEADER_LINE: ((f64, f64), (f64, f64)) = ((1.0, 26.5), (20.0, 26.5));
    /// Page title position and font size
    pub const TITLE_POSITION: (f64, f64) = (7.0, 28.0);
    pub const TITLE_FONT_SIZE: f64 = 24.0;
    /// Generation tag position and font size
    pub const TAG_POSITION: (f64, f64) = (0.5, 0.5);
    pub const TAG_FONT_SIZE: f64 = 8.0;
    /// Default metadata block position
    pub const METADATA_POSITION: (f64, f64) = (2.0, 25.5);
    pub const METADATA_FONT_SIZE: f64 = 10.0;
    /// Generation tag timestamp format
    pub const TAG_DATE_FORMAT: &str = "%B %d, %Y, %H:%M";
}

/// Product identity stamped on every page
///
/// Holds the product name and version for the generation tag and the
/// logo image bytes. The default uses the crate's own name and version
/// with the bundled logo.
#[derive(Debug, Clone)]
pub struct Branding {
    product: String,
    version: String,
    logo: Cow<'static, [u8]>,
}

impl Branding {
    /// Branding with a custom product name and version
    pub fn new(product: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            version: version.into(),
            logo: Cow::Borrowed(BUNDLED_LOGO),
        }
    }

    /// Replace the logo with the given image bytes (PNG or JPEG)
    pub fn with_logo_bytes(mut self, logo: Vec<u8>) -> Self {
        self.logo = Cow::Owned(logo);
        self
    }

    /// Replace the logo with an image file
    ///
    /// Fails if the file cannot be read; an undecodable image is caught
    /// later, when the first page template is drawn.
    pub fn with_logo_file<P: AsRef<Path>>(self, path: P) -> Result<Self> {
        let logo = std::fs::read(path)?;
        Ok(self.with_logo_bytes(logo))
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn logo(&self) -> &[u8] {
        &self.logo
    }

    /// The generation tag line, e.g.
    /// "Generated with rsreport v0.1.0 on August 27, 2026, 14:02"
    pub(crate) fn generation_tag(&self, timestamp: &str) -> String {
        format!(
            "Generated with {} v{} on {}",
            self.product, self.version, timestamp
        )
    }
}

impl Default for Branding {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_branding_uses_bundled_logo() {
        let branding = Branding::default();
        assert!(!branding.logo().is_empty());
        assert_eq!(branding.product(), "report");
        // Bundled logo is a PNG
        assert_eq!(&branding.logo()[1..4], b"PNG");
    }

    #[test]
    fn test_generation_tag() {
        let branding = Branding::new("acme-qa", "2.3.1");
        assert_eq!(
            branding.generation_tag("August 27, 2026, 14:02"),
            "Generated with acme-qa v2.3.1 on August 27, 2026, 14:02"
        );
    }

    #[test]
    fn test_missing_logo_file() {
        let result = Branding::default().with_logo_file("/nonexistent/logo.png");
        assert!(result.is_err());
    }
}
