//! The report canvas: branded template, text, and image placement

use crate::branding::{layout, Branding};
use crate::{Metadata, Result};
use chrono::Local;
use pdf_canvas::{units, Canvas, ImageScaleMode};
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// A position in centimeters from the bottom-left page corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Convert to page units (points)
    pub fn to_points(self) -> (f64, f64) {
        (units::cm(self.x), units::cm(self.y))
    }
}

impl From<(f64, f64)> for Coordinate {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Builder for [`ReportCanvas`]
///
/// # Example
/// ```ignore
/// let report = ReportCanvas::builder("Starshot Analysis")
///     .font("Times-Roman")
///     .metadata(metadata)
///     .create("starshot.pdf")?;
/// ```
pub struct ReportBuilder {
    title: String,
    font: String,
    metadata: Option<Metadata>,
    metadata_location: Coordinate,
    branding: Branding,
}

impl ReportBuilder {
    fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            font: "Helvetica".to_string(),
            metadata: None,
            metadata_location: layout::METADATA_POSITION.into(),
            branding: Branding::default(),
        }
    }

    /// Base font for all text, one of the standard-14 names
    pub fn font(mut self, font: impl Into<String>) -> Self {
        self.font = font.into();
        self
    }

    /// Metadata block redrawn on every page
    pub fn metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Where the metadata block starts, in centimeters
    pub fn metadata_location(mut self, location: impl Into<Coordinate>) -> Self {
        self.metadata_location = location.into();
        self
    }

    /// Product identity for the logo and generation tag
    pub fn branding(mut self, branding: Branding) -> Self {
        self.branding = branding;
        self
    }

    /// Open `path` for writing and start the report
    ///
    /// The file is created immediately, so an unwritable path fails
    /// here rather than at `finish`. The first page's template and
    /// metadata block are drawn before this returns.
    pub fn create<P: AsRef<Path>>(self, path: P) -> Result<ReportCanvas> {
        let output = File::create(path)?;
        ReportCanvas::start(self, Some(output))
    }

    /// Start an in-memory report, finished with
    /// [`ReportCanvas::finish_to_bytes`]
    pub fn in_memory(self) -> Result<ReportCanvas> {
        ReportCanvas::start(self, None)
    }
}

/// A branded multi-page PDF report
///
/// Every page carries the fixed template (logo, header line, title,
/// generation tag) and, when supplied, the metadata block; both are
/// redrawn as part of each page transition. User content is placed in
/// centimeter coordinates from the bottom-left corner. Dropping the
/// canvas without calling `finish` discards the report.
pub struct ReportCanvas {
    canvas: Canvas,
    output: Option<File>,
    font: String,
    title: String,
    metadata: Option<Metadata>,
    metadata_location: Coordinate,
    branding: Branding,
}

impl ReportCanvas {
    /// Start building a report with the given page title
    pub fn builder(title: impl Into<String>) -> ReportBuilder {
        ReportBuilder::new(title)
    }

    fn start(builder: ReportBuilder, output: Option<File>) -> Result<Self> {
        let mut report = Self {
            canvas: Canvas::a4(),
            output,
            font: builder.font,
            title: builder.title,
            metadata: builder.metadata,
            metadata_location: builder.metadata_location,
            branding: builder.branding,
        };
        report.apply_template()?;
        Ok(report)
    }

    /// Finalize the current page and open a new one
    ///
    /// The template and metadata block are reapplied unconditionally,
    /// so the new page starts in the same state as the first.
    pub fn add_new_page(&mut self) -> Result<()> {
        self.canvas.show_page();
        debug!(page = self.canvas.page_count() + 1, "starting new page");
        self.apply_template()
    }

    /// Draw text at `location` (cm)
    ///
    /// Embedded `\n` characters split the text into lines; each line is
    /// offset downward from the previous one by a fixed leading of
    /// 1.2 x `font_size`. No wrapping is performed and long lines may
    /// overflow the page.
    pub fn add_text(
        &mut self,
        text: &str,
        location: impl Into<Coordinate>,
        font_size: f64,
    ) -> Result<()> {
        let lines: Vec<&str> = text.split('\n').collect();
        self.add_text_lines(&lines, location, font_size)
    }

    /// Draw a sequence of lines starting at `location` (cm)
    pub fn add_text_lines<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        location: impl Into<Coordinate>,
        font_size: f64,
    ) -> Result<()> {
        let (x, y) = location.into().to_points();
        self.canvas
            .draw_text_block(lines, x, y, &self.font, font_size)?;
        Ok(())
    }

    /// Place an image into a box at `location` with `dimensions` (cm)
    ///
    /// With `preserve_aspect_ratio` the image is scaled to fit within
    /// the box and centered in it; otherwise it is stretched to the
    /// exact box. Fails if the bytes are not a decodable PNG or JPEG.
    pub fn add_image(
        &mut self,
        image: &[u8],
        location: impl Into<Coordinate>,
        dimensions: (f64, f64),
        preserve_aspect_ratio: bool,
    ) -> Result<()> {
        let (x, y) = location.into().to_points();
        let mode = if preserve_aspect_ratio {
            ImageScaleMode::FitBox
        } else {
            ImageScaleMode::Stretch
        };
        self.canvas.draw_image(
            image,
            x,
            y,
            units::cm(dimensions.0),
            units::cm(dimensions.1),
            mode,
        )?;
        Ok(())
    }

    /// Number of pages the finished report will have, counting the
    /// page currently being drawn
    pub fn page_count(&self) -> usize {
        self.canvas.page_count() + 1
    }

    /// Flush the final page and write the report
    ///
    /// For in-memory reports this discards the document; use
    /// [`finish_to_bytes`](Self::finish_to_bytes) instead.
    pub fn finish(mut self) -> Result<()> {
        self.canvas.show_page();
        match self.output.take() {
            Some(mut file) => self.canvas.save_to(&mut file)?,
            None => drop(self.canvas.to_bytes()?),
        }
        Ok(())
    }

    /// Flush the final page and return the report bytes
    pub fn finish_to_bytes(mut self) -> Result<Vec<u8>> {
        self.canvas.show_page();
        Ok(self.canvas.to_bytes()?)
    }

    /// Draw the fixed template, then the metadata block
    ///
    /// Runs once at construction and again on every page transition:
    /// logo fit into its box, header separator line, page title, and
    /// the generation tag in the bottom-left corner.
    fn apply_template(&mut self) -> Result<()> {
        let (logo_x, logo_y) = Coordinate::from(layout::LOGO_POSITION).to_points();
        self.canvas.draw_image(
            self.branding.logo(),
            logo_x,
            logo_y,
            units::cm(layout::LOGO_BOX.0),
            units::cm(layout::LOGO_BOX.1),
            ImageScaleMode::FitBox,
        )?;

        let (start, end) = layout::HEADER_LINE;
        self.canvas.draw_line(
            units::cm(start.0),
            units::cm(start.1),
            units::cm(end.0),
            units::cm(end.1),
        );

        let title = self.title.clone();
        self.add_text(&title, layout::TITLE_POSITION, layout::TITLE_FONT_SIZE)?;

        let timestamp = Local::now().format(layout::TAG_DATE_FORMAT).to_string();
        let tag = self.branding.generation_tag(&timestamp);
        self.add_text(&tag, layout::TAG_POSITION, layout::TAG_FONT_SIZE)?;

        if let Some(metadata) = self.metadata.clone() {
            self.add_text_lines(
                &metadata.display_lines(),
                self.metadata_location,
                layout::METADATA_FONT_SIZE,
            )?;
        }

        debug!(page = self.canvas.page_count() + 1, "applied report template");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_coordinate_conversion() {
        let (x, y) = Coordinate::new(2.0, 20.0).to_points();
        assert!((x - 56.692_913).abs() < 1e-3);
        assert!((y - 566.929_134).abs() < 1e-3);
    }

    #[test]
    fn test_coordinate_from_tuple() {
        assert_eq!(Coordinate::from((1.5, 2.5)), Coordinate::new(1.5, 2.5));
    }

    #[test]
    fn test_builder_defaults() {
        let builder = ReportCanvas::builder("Title");
        assert_eq!(builder.font, "Helvetica");
        assert_eq!(builder.metadata_location, Coordinate::new(2.0, 25.5));
        assert!(builder.metadata.is_none());
    }

    #[test]
    fn test_page_count_counts_open_page() {
        let report = ReportCanvas::builder("Title").in_memory().unwrap();
        assert_eq!(report.page_count(), 1);
    }

    #[test]
    fn test_unknown_font_fails_at_construction() {
        // The template's title text is drawn during construction
        let result = ReportCanvas::builder("Title").font("NotAFont").in_memory();
        assert!(result.is_err());
    }
}
