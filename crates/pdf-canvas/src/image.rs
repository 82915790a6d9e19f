//! Raster image embedding

use crate::{fmt_coord, CanvasError, Result};
use image::{DynamicImage, ImageDecoder, ImageReader};
use lopdf::{Dictionary, Stream};
use std::io::Cursor;

impl From<image::ImageError> for CanvasError {
    fn from(err: image::ImageError) -> Self {
        CanvasError::ImageError(err.to_string())
    }
}

/// Detected raster format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
}

/// How an image is scaled into its requested box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageScaleMode {
    /// Stretch to the exact box dimensions
    #[default]
    Stretch,
    /// Fit within the box preserving aspect ratio, centered in the box
    FitBox,
}

/// Detect image format from magic bytes
pub fn detect_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 8 {
        return Err(CanvasError::ImageError("image data too short".to_string()));
    }
    if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
        return Ok(ImageFormat::Jpeg);
    }
    if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
        return Ok(ImageFormat::Png);
    }
    Err(CanvasError::ImageError("unknown image format".to_string()))
}

/// Fit an image into a box preserving aspect ratio
///
/// Returns the scaled dimensions and the offset that centers the image
/// inside the requested box.
///
/// # Arguments
/// * `pixel_width` / `pixel_height` - Source dimensions in pixels
/// * `box_width` / `box_height` - Target box in points
///
/// # Returns
/// (width, height, dx, dy) in points
pub fn fit_box(
    pixel_width: u32,
    pixel_height: u32,
    box_width: f64,
    box_height: f64,
) -> (f64, f64, f64, f64) {
    let scale = (box_width / pixel_width as f64).min(box_height / pixel_height as f64);
    let width = pixel_width as f64 * scale;
    let height = pixel_height as f64 * scale;
    (
        width,
        height,
        (box_width - width) / 2.0,
        (box_height - height) / 2.0,
    )
}

/// JPEG frame header fields needed for embedding
#[derive(Debug, Clone, Copy)]
struct JpegFrame {
    width: u32,
    height: u32,
    components: u8,
}

/// Scan a JPEG stream for its SOF marker
fn read_jpeg_frame(data: &[u8]) -> Result<JpegFrame> {
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];
        // SOF0-SOF15, excluding DHT/JPG/DAC
        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            return Ok(JpegFrame {
                height: u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32,
                width: u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32,
                components: data[i + 9],
            });
        }

        if i + 4 < data.len() {
            let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
            if length < 2 {
                break;
            }
            i += 2 + length;
        } else {
            break;
        }
    }

    Err(CanvasError::ImageError(
        "could not parse JPEG frame header".to_string(),
    ))
}

/// Image XObject ready for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color space ("DeviceRGB" or "DeviceGray")
    pub color_space: String,
    /// PDF filter ("DCTDecode" for JPEG, "FlateDecode" for PNG)
    pub filter: String,
    /// Encoded image data
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Build an XObject from raw image bytes, detecting the format
    pub fn decode(data: &[u8]) -> Result<Self> {
        match detect_format(data)? {
            ImageFormat::Jpeg => Self::from_jpeg(data),
            ImageFormat::Png => Self::from_png(data),
        }
    }

    /// JPEG data is embedded as-is with the DCTDecode filter
    pub fn from_jpeg(data: &[u8]) -> Result<Self> {
        let frame = read_jpeg_frame(data)?;
        let color_space = if frame.components == 1 {
            "DeviceGray"
        } else {
            "DeviceRGB"
        };

        Ok(Self {
            width: frame.width,
            height: frame.height,
            color_space: color_space.to_string(),
            filter: "DCTDecode".to_string(),
            data: data.to_vec(),
        })
    }

    /// PNG data is decoded, alpha is blended over white, and the raw
    /// samples are recompressed with FlateDecode
    pub fn from_png(data: &[u8]) -> Result<Self> {
        let reader = ImageReader::new(Cursor::new(data)).with_guessed_format()?;
        let decoder = reader.into_decoder()?;

        let (width, height) = decoder.dimensions();
        let color_type = decoder.color_type();
        let decoded = DynamicImage::from_decoder(decoder)?;

        let (samples, color_space) = match color_type {
            image::ColorType::L8 | image::ColorType::L16 => {
                (decoded.to_luma8().into_raw(), "DeviceGray")
            }
            image::ColorType::La8 | image::ColorType::La16 => {
                let la = decoded.to_luma_alpha8();
                let mut gray = Vec::with_capacity((width * height) as usize);
                for pixel in la.pixels() {
                    let alpha = pixel[1] as f32 / 255.0;
                    gray.push((pixel[0] as f32 * alpha + 255.0 * (1.0 - alpha)) as u8);
                }
                (gray, "DeviceGray")
            }
            image::ColorType::Rgba8 | image::ColorType::Rgba16 => {
                let rgba = decoded.to_rgba8();
                let mut rgb = Vec::with_capacity((width * height * 3) as usize);
                for pixel in rgba.pixels() {
                    let alpha = pixel[3] as f32 / 255.0;
                    for channel in 0..3 {
                        rgb.push(
                            (pixel[channel] as f32 * alpha + 255.0 * (1.0 - alpha)) as u8,
                        );
                    }
                }
                (rgb, "DeviceRGB")
            }
            _ => (decoded.to_rgb8().into_raw(), "DeviceRGB"),
        };

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut encoder, &samples)?;
        let data = encoder.finish()?;

        Ok(Self {
            width,
            height,
            color_space: color_space.to_string(),
            filter: "FlateDecode".to_string(),
            data,
        })
    }

    /// Convert to a lopdf Stream object
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();
        dict.set("Type", lopdf::Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", lopdf::Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set(
            "ColorSpace",
            lopdf::Object::Name(self.color_space.as_bytes().to_vec()),
        );
        dict.set("BitsPerComponent", 8i64);
        dict.set(
            "Filter",
            lopdf::Object::Name(self.filter.as_bytes().to_vec()),
        );
        dict.set("Length", self.data.len() as i64);

        Stream::new(dict, self.data.clone())
    }
}

/// Generate operators that paint an image resource
///
/// # Arguments
/// * `resource` - Image resource name (e.g., "Im1")
/// * `x` / `y` - Bottom-left corner in points
/// * `width` / `height` - Display size in points
pub fn image_operators(resource: &str, x: f64, y: f64, width: f64, height: f64) -> Vec<u8> {
    // q / cm / Do / Q: save state, position and scale the unit square,
    // paint the XObject, restore state
    format!(
        "q\n{} 0 0 {} {} {} cm\n/{} Do\nQ\n",
        fmt_coord(width),
        fmt_coord(height),
        fmt_coord(x),
        fmt_coord(y),
        resource
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn minimal_jpeg() -> Vec<u8> {
        vec![
            0xFF, 0xD8, // SOI
            0xFF, 0xC0, // SOF0
            0x00, 0x11, // length
            0x08, // precision
            0x00, 0x64, // height (100)
            0x00, 0xC8, // width (200)
            0x03, // components
            0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01, //
            0xFF, 0xD9, // EOI
        ]
    }

    #[test]
    fn test_detect_jpeg() {
        assert_eq!(detect_format(&minimal_jpeg()).unwrap(), ImageFormat::Jpeg);
    }

    #[test]
    fn test_detect_png() {
        let header = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        assert_eq!(detect_format(&header).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn test_detect_unknown() {
        assert!(detect_format(&[0u8; 8]).is_err());
        assert!(detect_format(&[0xFF, 0xD8]).is_err());
    }

    #[test]
    fn test_jpeg_frame_dimensions() {
        let xobject = ImageXObject::from_jpeg(&minimal_jpeg()).unwrap();
        assert_eq!(xobject.width, 200);
        assert_eq!(xobject.height, 100);
        assert_eq!(xobject.color_space, "DeviceRGB");
        assert_eq!(xobject.filter, "DCTDecode");
    }

    #[test]
    fn test_png_decode() {
        use image::{ImageBuffer, Rgb};

        let img: ImageBuffer<Rgb<u8>, Vec<u8>> = ImageBuffer::new(16, 8);
        let mut buffer = Vec::new();
        img.write_to(&mut Cursor::new(&mut buffer), image::ImageFormat::Png)
            .unwrap();

        let xobject = ImageXObject::decode(&buffer).unwrap();
        assert_eq!(xobject.width, 16);
        assert_eq!(xobject.height, 8);
        assert_eq!(xobject.filter, "FlateDecode");
    }

    #[test]
    fn test_decode_garbage() {
        assert!(ImageXObject::decode(b"not an image at all").is_err());
    }

    #[test]
    fn test_fit_box_width_limited() {
        // 800x600 into 100x200: scale 0.125, centered vertically
        let (w, h, dx, dy) = fit_box(800, 600, 100.0, 200.0);
        assert_eq!(w, 100.0);
        assert_eq!(h, 75.0);
        assert_eq!(dx, 0.0);
        assert_eq!(dy, 62.5);
    }

    #[test]
    fn test_fit_box_height_limited() {
        let (w, h, dx, dy) = fit_box(600, 800, 200.0, 100.0);
        assert_eq!(w, 75.0);
        assert_eq!(h, 100.0);
        assert_eq!(dx, 62.5);
        assert_eq!(dy, 0.0);
    }

    #[test]
    fn test_fit_box_preserves_ratio() {
        let (w, h, _, _) = fit_box(1920, 1080, 90.0, 90.0);
        assert!((w / h - 1920.0 / 1080.0).abs() < 1e-9);
    }

    #[test]
    fn test_to_pdf_stream() {
        let xobject = ImageXObject {
            width: 100,
            height: 50,
            color_space: "DeviceRGB".to_string(),
            filter: "DCTDecode".to_string(),
            data: vec![1, 2, 3],
        };

        let stream = xobject.to_pdf_stream();
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 100);
        assert_eq!(stream.dict.get(b"Height").unwrap().as_i64().unwrap(), 50);
        assert_eq!(
            stream.dict.get(b"Filter").unwrap().as_name().unwrap(),
            b"DCTDecode"
        );
        assert_eq!(stream.content, vec![1, 2, 3]);
    }

    #[test]
    fn test_image_operators() {
        let ops = image_operators("Im1", 100.0, 200.0, 50.0, 75.0);
        let ops_str = String::from_utf8(ops).unwrap();

        assert!(ops_str.contains("50 0 0 75 100 200 cm"));
        assert!(ops_str.contains("/Im1 Do"));
    }
}
