//! Canvas: page-by-page PDF document builder

use crate::image::{fit_box, image_operators, ImageScaleMode, ImageXObject};
use crate::text::text_block_operators;
use crate::{fmt_coord, CanvasError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::path::Path;

/// The standard-14 base fonts every conforming reader provides
const STANDARD_FONTS: &[&str] = &[
    "Helvetica",
    "Helvetica-Bold",
    "Helvetica-Oblique",
    "Helvetica-BoldOblique",
    "Times-Roman",
    "Times-Bold",
    "Times-Italic",
    "Times-BoldItalic",
    "Courier",
    "Courier-Bold",
    "Courier-Oblique",
    "Courier-BoldOblique",
    "Symbol",
    "ZapfDingbats",
];

/// Drawing state of the page being composed
#[derive(Default)]
struct PageState {
    /// Buffered content stream operators
    content: Vec<u8>,
    /// Font name -> resource name ("F1") used on this page
    font_resources: HashMap<String, String>,
    /// Image data hash -> resource name ("Im1") used on this page
    image_resources: HashMap<u64, String>,
}

/// In-memory PDF builder with a fixed page size
///
/// Drawing calls target the in-progress page; `show_page` finalizes it
/// and begins the next one. Coordinates are points from the bottom-left
/// page corner. The finished document is produced by one of the
/// consuming `save`/`to_bytes` calls.
pub struct Canvas {
    width: f64,
    height: f64,
    /// The lopdf document that fonts and images are embedded into
    doc: Document,
    /// Embedded base fonts (font name -> object ID)
    font_ids: HashMap<String, ObjectId>,
    /// Embedded images keyed by content hash, with pixel dimensions
    image_ids: HashMap<u64, (ObjectId, u32, u32)>,
    /// Finished pages in order
    pages: Vec<PageState>,
    /// The page currently being drawn
    current: PageState,
}

impl Canvas {
    /// Create a canvas with the given page size in points
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            doc: Document::with_version("1.5"),
            font_ids: HashMap::new(),
            image_ids: HashMap::new(),
            pages: Vec::new(),
            current: PageState::default(),
        }
    }

    /// Create an ISO A4 canvas
    pub fn a4() -> Self {
        Self::new(crate::units::A4_WIDTH, crate::units::A4_HEIGHT)
    }

    /// Page width in points
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Page height in points
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Number of finished pages
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Finalize the in-progress page and start a fresh one
    ///
    /// The finished page keeps everything drawn so far; the new page is
    /// blank. A page is emitted even if nothing was drawn on it.
    pub fn show_page(&mut self) {
        let finished = std::mem::take(&mut self.current);
        self.pages.push(finished);
    }

    /// Draw a block of text lines on the current page
    ///
    /// The first line's baseline starts at `(x, y)`; each following
    /// line is offset downward by 1.2 x `font_size`. No wrapping or
    /// measurement is performed, so long lines overflow the page.
    ///
    /// # Arguments
    /// * `lines` - Lines of text, drawn top to bottom
    /// * `x` / `y` - First baseline position in points (from bottom-left)
    /// * `font` - One of the standard-14 base font names
    /// * `font_size` - Font size in points
    pub fn draw_text_block<S: AsRef<str>>(
        &mut self,
        lines: &[S],
        x: f64,
        y: f64,
        font: &str,
        font_size: f64,
    ) -> Result<()> {
        let resource = self.font_resource(font)?;
        let ops = text_block_operators(lines, x, y, &resource, font_size);
        self.current.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Draw a stroked line on the current page
    pub fn draw_line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        let ops = format!(
            "q\n{} {} m\n{} {} l\nS\nQ\n",
            fmt_coord(x1),
            fmt_coord(y1),
            fmt_coord(x2),
            fmt_coord(y2)
        );
        self.current.content.extend_from_slice(ops.as_bytes());
    }

    /// Draw an image on the current page
    ///
    /// The image bytes are decoded (JPEG or PNG), embedded once per
    /// canvas, and painted into the box whose bottom-left corner is at
    /// `(x, y)`. With `ImageScaleMode::FitBox` the image keeps its
    /// aspect ratio and is centered inside the box.
    ///
    /// # Arguments
    /// * `data` - Image file bytes
    /// * `x` / `y` - Bottom-left corner of the target box in points
    /// * `width` / `height` - Target box size in points
    /// * `mode` - Scaling mode
    pub fn draw_image(
        &mut self,
        data: &[u8],
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        mode: ImageScaleMode,
    ) -> Result<()> {
        let (resource, pixel_width, pixel_height) = self.image_resource(data)?;

        let (actual_width, actual_height, dx, dy) = match mode {
            ImageScaleMode::Stretch => (width, height, 0.0, 0.0),
            ImageScaleMode::FitBox => fit_box(pixel_width, pixel_height, width, height),
        };

        let ops = image_operators(&resource, x + dx, y + dy, actual_width, actual_height);
        self.current.content.extend_from_slice(&ops);
        Ok(())
    }

    /// Get or create the current page's resource name for a base font
    ///
    /// The font object itself is embedded once per canvas; each page
    /// that uses it references it through its own resource entry.
    fn font_resource(&mut self, font: &str) -> Result<String> {
        if !STANDARD_FONTS.contains(&font) {
            return Err(CanvasError::FontNotFound(font.to_string()));
        }

        if !self.font_ids.contains_key(font) {
            let font_id = self.doc.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font,
                "Encoding" => "WinAnsiEncoding",
            });
            self.font_ids.insert(font.to_string(), font_id);
        }

        if let Some(resource) = self.current.font_resources.get(font) {
            return Ok(resource.clone());
        }

        // Numbered within the page, so pages drawn the same way carry
        // identical content streams
        let resource = format!("F{}", self.current.font_resources.len() + 1);
        self.current
            .font_resources
            .insert(font.to_string(), resource.clone());
        Ok(resource)
    }

    /// Get or create the current page's resource name for an image
    ///
    /// Images are deduplicated by content hash, so placing the same
    /// bytes on several pages embeds a single XObject.
    fn image_resource(&mut self, data: &[u8]) -> Result<(String, u32, u32)> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if !self.image_ids.contains_key(&data_hash) {
            let xobject = ImageXObject::decode(data)?;
            let (pixel_width, pixel_height) = (xobject.width, xobject.height);
            let object_id = self.doc.add_object(xobject.to_pdf_stream());
            self.image_ids
                .insert(data_hash, (object_id, pixel_width, pixel_height));
        }
        let (_, pixel_width, pixel_height) = self.image_ids[&data_hash];

        if let Some(resource) = self.current.image_resources.get(&data_hash) {
            return Ok((resource.clone(), pixel_width, pixel_height));
        }

        let resource = format!("Im{}", self.current.image_resources.len() + 1);
        self.current
            .image_resources
            .insert(data_hash, resource.clone());
        Ok((resource, pixel_width, pixel_height))
    }

    /// Assemble the final lopdf document
    ///
    /// Builds one content stream and page dictionary per finished page,
    /// the Pages tree, and the catalog. If no page was ever finished the
    /// in-progress page is flushed so the document is never empty.
    fn assemble(mut self) -> Result<Document> {
        if self.pages.is_empty() {
            self.show_page();
        }

        let pages_id = self.doc.add_object(dictionary! {
            "Type" => "Pages",
            "Count" => self.pages.len() as i64,
            "Kids" => Vec::<Object>::new(),
        });

        let mut kids: Vec<Object> = Vec::with_capacity(self.pages.len());
        let pages = std::mem::take(&mut self.pages);
        for page in pages {
            let contents_id = self
                .doc
                .add_object(Stream::new(dictionary! {}, page.content));

            let mut font_dict = Dictionary::new();
            for (font, resource) in &page.font_resources {
                font_dict.set(resource.as_bytes(), Object::Reference(self.font_ids[font]));
            }

            let mut xobject_dict = Dictionary::new();
            for (data_hash, resource) in &page.image_resources {
                xobject_dict.set(
                    resource.as_bytes(),
                    Object::Reference(self.image_ids[data_hash].0),
                );
            }

            let mut resources = Dictionary::new();
            if !font_dict.is_empty() {
                resources.set("Font", Object::Dictionary(font_dict));
            }
            if !xobject_dict.is_empty() {
                resources.set("XObject", Object::Dictionary(xobject_dict));
            }

            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    self.width.into(),
                    self.height.into(),
                ],
                "Resources" => resources,
                "Contents" => contents_id,
            });
            kids.push(Object::Reference(page_id));
        }

        let mut pages_dict = self
            .doc
            .get_object(pages_id)
            .and_then(Object::as_dict)
            .map_err(|_| CanvasError::SaveError("Pages object is not a dictionary".to_string()))?
            .clone();
        pages_dict.set("Kids", Object::Array(kids));
        self.doc.objects.insert(pages_id, pages_dict.into());

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        Ok(self.doc)
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(self, path: P) -> Result<()> {
        let mut doc = self.assemble()?;
        doc.save(path)
            .map_err(|e| CanvasError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Save the document to a writer
    pub fn save_to<W: Write>(self, target: &mut W) -> Result<()> {
        let mut doc = self.assemble()?;
        doc.save_to(target)
            .map_err(|e| CanvasError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Serialize the document to bytes
    pub fn to_bytes(self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.save_to(&mut buffer)?;
        Ok(buffer)
    }
}
