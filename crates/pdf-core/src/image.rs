//! Image embedding for PDF documents
//!
//! JPEGs are embedded as-is with DCTDecode after a lightweight SOF scan for
//! dimensions. PNGs are decoded, alpha-blended against white and re-encoded
//! as raw samples with FlateDecode.

use crate::{PdfError, Result};
use image::DynamicImage;
use lopdf::{Dictionary, Object, Stream};
use std::io::Cursor;

impl From<image::ImageError> for PdfError {
    fn from(err: image::ImageError) -> Self {
        PdfError::Image(err.to_string())
    }
}

/// Image XObject ready for PDF embedding
#[derive(Debug, Clone)]
pub struct ImageXObject {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Color space ("DeviceRGB" or "DeviceGray")
    pub color_space: &'static str,
    /// PDF filter ("DCTDecode" for JPEG, "FlateDecode" for PNG)
    pub filter: &'static str,
    /// Compressed sample data
    pub data: Vec<u8>,
}

impl ImageXObject {
    /// Decode JPEG or PNG bytes into an embeddable XObject.
    ///
    /// Format is sniffed from the magic bytes; anything else is an error.
    pub fn decode(data: &[u8]) -> Result<Self> {
        if data.len() < 8 {
            return Err(PdfError::Image("image data too short".to_string()));
        }

        if data[0] == 0xFF && data[1] == 0xD8 && data[2] == 0xFF {
            return Self::from_jpeg(data);
        }
        if data[0..8] == [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A] {
            return Self::from_png(data);
        }

        Err(PdfError::Image("unsupported image format".to_string()))
    }

    fn from_jpeg(data: &[u8]) -> Result<Self> {
        let (width, height, components) = scan_jpeg_sof(data)?;

        Ok(Self {
            width,
            height,
            color_space: if components == 1 {
                "DeviceGray"
            } else {
                "DeviceRGB"
            },
            filter: "DCTDecode",
            data: data.to_vec(),
        })
    }

    fn from_png(data: &[u8]) -> Result<Self> {
        let img = image::ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .decode()?;
        let (width, height) = (img.width(), img.height());

        let (raw, color_space) = match img {
            DynamicImage::ImageLuma8(gray) => (gray.into_raw(), "DeviceGray"),
            DynamicImage::ImageLumaA8(la) => {
                let mut out = Vec::with_capacity((width * height) as usize);
                for p in la.pixels() {
                    out.push(blend_white(p[0], p[1]));
                }
                (out, "DeviceGray")
            }
            DynamicImage::ImageRgb8(rgb) => (rgb.into_raw(), "DeviceRGB"),
            other => {
                // Everything else goes through RGBA and is blended to white
                let rgba = other.to_rgba8();
                let mut out = Vec::with_capacity((width * height * 3) as usize);
                for p in rgba.pixels() {
                    out.push(blend_white(p[0], p[3]));
                    out.push(blend_white(p[1], p[3]));
                    out.push(blend_white(p[2], p[3]));
                }
                (out, "DeviceRGB")
            }
        };

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut encoder, &raw)?;
        let data = encoder.finish()?;

        Ok(Self {
            width,
            height,
            color_space,
            filter: "FlateDecode",
            data,
        })
    }

    /// Convert to a lopdf stream object
    pub fn to_pdf_stream(&self) -> Stream {
        let mut dict = Dictionary::new();
        dict.set("Type", Object::Name(b"XObject".to_vec()));
        dict.set("Subtype", Object::Name(b"Image".to_vec()));
        dict.set("Width", self.width as i64);
        dict.set("Height", self.height as i64);
        dict.set(
            "ColorSpace",
            Object::Name(self.color_space.as_bytes().to_vec()),
        );
        dict.set("BitsPerComponent", 8);
        dict.set("Filter", Object::Name(self.filter.as_bytes().to_vec()));
        dict.set("Length", self.data.len() as i64);

        Stream::new(dict, self.data.clone())
    }
}

/// Composite a sample over a white background
fn blend_white(value: u8, alpha: u8) -> u8 {
    let a = alpha as f32 / 255.0;
    (value as f32 * a + 255.0 * (1.0 - a)) as u8
}

/// Scan JPEG markers for the SOF segment: (width, height, components)
fn scan_jpeg_sof(data: &[u8]) -> Result<(u32, u32, u8)> {
    let mut i = 2;
    while i + 10 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }

        let marker = data[i + 1];
        if (0xC0..=0xCF).contains(&marker) && marker != 0xC4 && marker != 0xC8 && marker != 0xCC {
            let height = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            let width = u16::from_be_bytes([data[i + 7], data[i + 8]]) as u32;
            return Ok((width, height, data[i + 9]));
        }

        let length = u16::from_be_bytes([data[i + 2], data[i + 3]]) as usize;
        if length < 2 {
            break;
        }
        i += 2 + length;
    }

    Err(PdfError::Image("could not parse JPEG header".to_string()))
}

/// Generate operators to draw an image XObject at position
///
/// # Arguments
/// * `image_name` - Image resource name (e.g., "Im1")
/// * `x`, `y` - lower-left corner in PDF coordinates (from bottom)
/// * `width`, `height` - display size in points
pub fn generate_image_operators(
    image_name: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
) -> Vec<u8> {
    format!("q\n{width} 0 0 {height} {x} {y} cm\n/{image_name} Do\nQ\n").into_bytes()
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
            0x01, 0x22, 0x00, 0x02, 0x11, 0x01, 0x03, 0x11, 0x01, 0xFF, 0xD9,
        ]
    }

    #[test]
    fn test_decode_jpeg_dimensions() {
        let xobj = ImageXObject::decode(&minimal_jpeg()).unwrap();
        assert_eq!(xobj.width, 200);
        assert_eq!(xobj.height, 100);
        assert_eq!(xobj.filter, "DCTDecode");
        assert_eq!(xobj.color_space, "DeviceRGB");
    }

    #[test]
    fn test_decode_unknown_format() {
        assert!(ImageXObject::decode(&[0u8; 16]).is_err());
    }

    #[test]
    fn test_decode_too_short() {
        assert!(ImageXObject::decode(&[0xFF, 0xD8]).is_err());
    }

    #[test]
    fn test_decode_png_roundtrip() {
        // Encode a tiny RGBA image via the image crate, then decode it
        let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 128]));
        let mut png = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let xobj = ImageXObject::decode(&png).unwrap();
        assert_eq!(xobj.width, 4);
        assert_eq!(xobj.height, 2);
        assert_eq!(xobj.filter, "FlateDecode");
        assert_eq!(xobj.color_space, "DeviceRGB");
    }

    #[test]
    fn test_blend_white() {
        assert_eq!(blend_white(0, 255), 0);
        assert_eq!(blend_white(0, 0), 255);
        assert_eq!(blend_white(100, 255), 100);
    }

    #[test]
    fn test_to_pdf_stream_dict() {
        let xobj = ImageXObject {
            width: 10,
            height: 20,
            color_space: "DeviceRGB",
            filter: "DCTDecode",
            data: vec![1, 2, 3],
        };

        let stream = xobj.to_pdf_stream();
        assert_eq!(stream.dict.get(b"Width").unwrap().as_i64().unwrap(), 10);
        assert_eq!(stream.dict.get(b"Height").unwrap().as_i64().unwrap(), 20);
        assert_eq!(
            stream.dict.get(b"Filter").unwrap().as_name().unwrap(),
            b"DCTDecode"
        );
        assert_eq!(stream.content, vec![1, 2, 3]);
    }

    #[test]
    fn test_generate_image_operators() {
        let ops = generate_image_operators("Im1", 100.0, 200.0, 50.0, 75.0);
        let s = String::from_utf8(ops).unwrap();

        assert!(s.contains("50 0 0 75 100 200 cm"));
        assert!(s.contains("/Im1 Do"));
    }
}
