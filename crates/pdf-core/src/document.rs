//! PDF document wrapper
//!
//! `PdfDocument` either creates a fresh single-page document or opens an
//! existing PDF for annotation overlay. Drawing operations take top-origin
//! coordinates and are buffered per page; buffers are flushed, compressed
//! and wired into the page tree at save time.

use crate::font::BuiltinFont;
use crate::graphics::{
    generate_dashed_rect_operators, generate_line_operators, generate_rect_operators,
};
use crate::image::{generate_image_operators, ImageXObject};
use crate::text::{encode_winansi, escape_literal, generate_text_operators, TextRenderContext};
use crate::{Align, PdfError, Result};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// A4 portrait dimensions in points, used as the fallback MediaBox
const A4: (f64, f64) = (595.28, 841.89);

/// PDF document wrapper providing high-level drawing operations
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Page object ids with their (width, height), in page order
    pages: Vec<(ObjectId, f64, f64)>,
    /// Current font
    current_font: BuiltinFont,
    /// Current font size
    current_size: f32,
    /// Current text color
    current_color: Color,
    /// Buffered content operators per page (page number -> operators)
    content_buffer: HashMap<usize, Vec<u8>>,
    /// Page font resources (page number -> font -> resource name)
    page_fonts: HashMap<usize, HashMap<BuiltinFont, String>>,
    /// Next font resource number
    next_font_resource: u32,
    /// Embedded images (data hash -> object id and pixel dimensions)
    embedded_images: HashMap<u64, (ObjectId, u32, u32)>,
    /// Page image resources (page number -> resource name -> object id)
    page_images: HashMap<usize, HashMap<String, ObjectId>>,
    /// Next image resource number
    next_image_resource: u32,
    /// Signature field annotations, collected into /AcroForm at save
    signature_fields: Vec<ObjectId>,
}

impl PdfDocument {
    /// Create a new single-page document of the given size in points
    pub fn new(width: f64, height: f64) -> Self {
        let mut inner = Document::with_version("1.5");

        let pages_id = inner.new_object_id();
        let contents_id = inner.add_object(Stream::new(Dictionary::new(), vec![]));
        let page_id = inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Resources" => dictionary! {},
            "Contents" => contents_id,
        });
        inner.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => 1,
                "Kids" => vec![page_id.into()],
            }),
        );
        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        Self::wrap(inner, vec![(page_id, width, height)])
    }

    /// Open an existing PDF from bytes for annotation overlay
    ///
    /// Malformed input is a fatal error; there is no partial recovery.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let inner = Document::load_mem(data).map_err(|e| PdfError::Open(e.to_string()))?;

        let mut pages = Vec::new();
        for (_, page_id) in inner.get_pages() {
            let (w, h) = media_box_dims(&inner, page_id);
            pages.push((page_id, w, h));
        }
        if pages.is_empty() {
            return Err(PdfError::Open("document has no pages".to_string()));
        }

        Ok(Self::wrap(inner, pages))
    }

    fn wrap(inner: Document, pages: Vec<(ObjectId, f64, f64)>) -> Self {
        Self {
            inner,
            pages,
            current_font: BuiltinFont::default(),
            current_size: 12.0,
            current_color: Color::default(),
            content_buffer: HashMap::new(),
            page_fonts: HashMap::new(),
            next_font_resource: 1,
            embedded_images: HashMap::new(),
            page_images: HashMap::new(),
            next_image_resource: 1,
            signature_fields: Vec::new(),
        }
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Get (width, height) of a page in points
    pub fn page_dimensions(&self, page: usize) -> Result<(f64, f64)> {
        self.pages
            .get(page.wrapping_sub(1))
            .map(|&(_, w, h)| (w, h))
            .ok_or(PdfError::InvalidPage(page, self.pages.len()))
    }

    /// Set the current font and size
    pub fn set_font(&mut self, font: BuiltinFont, size: f32) {
        self.current_font = font;
        self.current_size = size;
    }

    /// Set the current text color
    pub fn set_text_color(&mut self, color: Color) {
        self.current_color = color;
    }

    /// Measure text at the current font and size, in points
    pub fn text_width(&self, text: &str) -> f64 {
        self.current_font.text_width(text, self.current_size)
    }

    /// Insert text at a position (top-origin coordinates)
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        let (_, page_height) = self.page_dimensions(page)?;
        if text.is_empty() {
            return Ok(());
        }

        let encoded = encode_winansi(text);
        let text_width = self
            .current_font
            .text_width_encoded(&encoded, self.current_size);
        let font_name = self.get_or_create_font_ref(self.current_font, page);

        let ctx = TextRenderContext {
            font_name,
            font_size: self.current_size,
            text_width,
            color: self.current_color,
        };
        let ops = generate_text_operators(&escape_literal(&encoded), x, page_height - y, align, &ctx);
        self.buffer_content(page, &ops);

        Ok(())
    }

    /// Draw a rectangle (top-origin coordinates); fill and border independent
    pub fn draw_rect(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        fill: Option<Color>,
        stroke: Option<(Color, f64)>,
    ) -> Result<()> {
        if fill.is_none() && stroke.is_none() {
            return Ok(());
        }
        let (_, page_height) = self.page_dimensions(page)?;
        let ops = generate_rect_operators(x, page_height - y - height, width, height, fill, stroke);
        self.buffer_content(page, &ops);
        Ok(())
    }

    /// Draw a dashed rectangle outline (top-origin coordinates)
    pub fn draw_rect_dashed(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
        line_width: f64,
    ) -> Result<()> {
        let (_, page_height) = self.page_dimensions(page)?;
        let ops = generate_dashed_rect_operators(
            x,
            page_height - y - height,
            width,
            height,
            color,
            line_width,
            3.0,
        );
        self.buffer_content(page, &ops);
        Ok(())
    }

    /// Draw a line segment (top-origin coordinates)
    pub fn draw_line(
        &mut self,
        page: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        thickness: f64,
        color: Color,
    ) -> Result<()> {
        let (_, page_height) = self.page_dimensions(page)?;
        let ops = generate_line_operators(
            x1,
            page_height - y1,
            x2,
            page_height - y2,
            thickness,
            color,
        );
        self.buffer_content(page, &ops);
        Ok(())
    }

    /// Insert an image stretched into the given box (top-origin coordinates)
    ///
    /// # Arguments
    /// * `data` - Image file bytes (JPEG or PNG)
    pub fn insert_image(
        &mut self,
        data: &[u8],
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<()> {
        let (_, page_height) = self.page_dimensions(page)?;
        let (resource_name, _, _) = self.get_or_create_image_ref(data, page)?;

        let ops =
            generate_image_operators(&resource_name, x, page_height - y - height, width, height);
        self.buffer_content(page, &ops);
        Ok(())
    }

    /// Add an empty digital-signature form field with a widget annotation
    pub fn add_signature_field(
        &mut self,
        page: usize,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        name: &str,
    ) -> Result<()> {
        let (page_id, page_height) = {
            let entry = self
                .pages
                .get(page.wrapping_sub(1))
                .ok_or(PdfError::InvalidPage(page, self.pages.len()))?;
            (entry.0, entry.2)
        };

        let rect_y = page_height - y - height;
        let annot_id = self.inner.add_object(dictionary! {
            "Type" => "Annot",
            "Subtype" => "Widget",
            "FT" => "Sig",
            "Rect" => vec![x.into(), rect_y.into(), (x + width).into(), (rect_y + height).into()],
            "T" => Object::string_literal(name),
            "F" => 4,
            "P" => page_id,
        });

        // Append the widget to the page's /Annots array
        let page_dict = self.page_dict(page_id)?;
        let mut annots = match page_dict.get(b"Annots") {
            Ok(Object::Array(arr)) => arr.clone(),
            _ => Vec::new(),
        };
        annots.push(Object::Reference(annot_id));

        let mut new_page_dict = page_dict;
        new_page_dict.set(b"Annots", Object::Array(annots));
        self.inner.objects.insert(page_id, new_page_dict.into());

        self.signature_fields.push(annot_id);
        Ok(())
    }

    /// Set the document Info dictionary
    pub fn set_metadata(&mut self, title: &str, author: &str) {
        let info_id = self.inner.add_object(dictionary! {
            "Title" => Object::string_literal(title),
            "Author" => Object::string_literal(author),
            "Producer" => Object::string_literal("gstpdf"),
        });
        self.inner.trailer.set("Info", info_id);
    }

    /// Serialize the finished document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush_content_buffers()?;
        self.finalize_font_resources()?;
        self.finalize_acroform()?;

        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::Save(e.to_string()))?;
        Ok(buffer)
    }

    /// Buffer content operators for a page (flushed at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        self.content_buffer
            .entry(page)
            .or_default()
            .extend_from_slice(content);
    }

    /// Get or create a font resource name (e.g., "F1") for a page
    fn get_or_create_font_ref(&mut self, font: BuiltinFont, page: usize) -> String {
        let page_resources = self.page_fonts.entry(page).or_default();
        if let Some(name) = page_resources.get(&font) {
            return name.clone();
        }

        let name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;
        page_resources.insert(font, name.clone());
        name
    }

    /// Get or create an image resource for a page, deduplicated by data hash
    fn get_or_create_image_ref(&mut self, data: &[u8], page: usize) -> Result<(String, u32, u32)> {
        let mut hasher = DefaultHasher::new();
        data.hash(&mut hasher);
        let data_hash = hasher.finish();

        if !self.embedded_images.contains_key(&data_hash) {
            let xobject = ImageXObject::decode(data)?;
            let (w, h) = (xobject.width, xobject.height);
            let object_id = self.inner.add_object(xobject.to_pdf_stream());
            self.embedded_images.insert(data_hash, (object_id, w, h));
        }
        let (object_id, width, height) = self.embedded_images[&data_hash];

        let page_resources = self.page_images.entry(page).or_default();
        for (name, id) in page_resources.iter() {
            if *id == object_id {
                return Ok((name.clone(), width, height));
            }
        }

        let resource_name = format!("Im{}", self.next_image_resource);
        self.next_image_resource += 1;
        page_resources.insert(resource_name.clone(), object_id);

        self.add_image_to_page_resources(page, &resource_name, object_id)?;
        Ok((resource_name, width, height))
    }

    /// Clone a page dictionary by object id
    fn page_dict(&self, page_id: ObjectId) -> Result<Dictionary> {
        let obj = self.inner.get_object(page_id)?;
        obj.as_dict()
            .cloned()
            .map_err(|_| PdfError::Parse("page object is not a dictionary".to_string()))
    }

    /// Flush buffered content to page streams, Flate-compressed
    fn flush_content_buffers(&mut self) -> Result<()> {
        let mut buffers: Vec<(usize, Vec<u8>)> = self.content_buffer.drain().collect();
        buffers.sort_by_key(|(page, _)| *page);

        for (page, content) in buffers {
            if !content.is_empty() {
                self.append_to_content_stream(page, &content)?;
            }
        }
        Ok(())
    }

    /// Append operators to a page's content, rewriting it as one compressed stream
    fn append_to_content_stream(&mut self, page: usize, content: &[u8]) -> Result<()> {
        let page_id = self
            .pages
            .get(page.wrapping_sub(1))
            .map(|&(id, _, _)| id)
            .ok_or(PdfError::InvalidPage(page, self.pages.len()))?;

        let page_dict = self.page_dict(page_id)?;

        // Collect any existing content first (overlay path)
        let mut combined = match page_dict.get(b"Contents") {
            Ok(contents) => self.collect_content(contents),
            Err(_) => Vec::new(),
        };
        combined.extend_from_slice(content);

        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        std::io::Write::write_all(&mut encoder, &combined)?;
        let compressed = encoder.finish()?;

        let stream_dict = dictionary! { "Filter" => "FlateDecode" };
        let stream_id = self.inner.add_object(Stream::new(stream_dict, compressed));

        let mut new_page_dict = page_dict;
        new_page_dict.set(b"Contents", Object::Reference(stream_id));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    /// Gather decompressed content from a stream, reference, or array thereof
    fn collect_content(&self, contents: &Object) -> Vec<u8> {
        match contents {
            Object::Stream(stream) => stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
            Object::Reference(ref_id) => match self.inner.get_object(*ref_id) {
                Ok(Object::Stream(stream)) => stream
                    .decompressed_content()
                    .unwrap_or_else(|_| stream.content.clone()),
                _ => Vec::new(),
            },
            Object::Array(arr) => {
                let mut combined = Vec::new();
                for obj in arr {
                    combined.extend_from_slice(&self.collect_content(obj));
                }
                combined
            }
            _ => Vec::new(),
        }
    }

    /// Create Type1 font objects and wire them into page resources
    fn finalize_font_resources(&mut self) -> Result<()> {
        let page_fonts: Vec<(usize, Vec<(BuiltinFont, String)>)> = self
            .page_fonts
            .iter()
            .map(|(&page, fonts)| {
                (
                    page,
                    fonts.iter().map(|(&f, n)| (f, n.clone())).collect(),
                )
            })
            .collect();

        let mut font_objects: HashMap<BuiltinFont, ObjectId> = HashMap::new();

        for (page, fonts) in page_fonts {
            let page_id = self
                .pages
                .get(page.wrapping_sub(1))
                .map(|&(id, _, _)| id)
                .ok_or(PdfError::InvalidPage(page, self.pages.len()))?;

            let page_dict = self.page_dict(page_id)?;
            let mut resources = match page_dict.get(b"Resources").and_then(|r| r.as_dict()) {
                Ok(dict) => dict.clone(),
                Err(_) => Dictionary::new(),
            };
            let mut font_dict = match resources.get(b"Font").and_then(|f| f.as_dict()) {
                Ok(dict) => dict.clone(),
                Err(_) => Dictionary::new(),
            };

            for (font, resource_name) in fonts {
                let font_id = *font_objects.entry(font).or_insert_with(|| {
                    self.inner.add_object(dictionary! {
                        "Type" => "Font",
                        "Subtype" => "Type1",
                        "BaseFont" => font.base_font(),
                        "Encoding" => "WinAnsiEncoding",
                    })
                });
                font_dict.set(resource_name.as_bytes(), Object::Reference(font_id));
            }

            resources.set(b"Font", Object::Dictionary(font_dict));
            let mut new_page_dict = page_dict;
            new_page_dict.set(b"Resources", Object::Dictionary(resources));
            self.inner.objects.insert(page_id, new_page_dict.into());
        }

        Ok(())
    }

    /// Add image to a page's Resources/XObject dictionary
    fn add_image_to_page_resources(
        &mut self,
        page: usize,
        resource_name: &str,
        object_id: ObjectId,
    ) -> Result<()> {
        let page_id = self
            .pages
            .get(page.wrapping_sub(1))
            .map(|&(id, _, _)| id)
            .ok_or(PdfError::InvalidPage(page, self.pages.len()))?;

        let page_dict = self.page_dict(page_id)?;
        let mut resources = match page_dict.get(b"Resources").and_then(|r| r.as_dict()) {
            Ok(dict) => dict.clone(),
            Err(_) => Dictionary::new(),
        };
        let mut xobject_dict = match resources.get(b"XObject").and_then(|x| x.as_dict()) {
            Ok(dict) => dict.clone(),
            Err(_) => Dictionary::new(),
        };

        xobject_dict.set(resource_name.as_bytes(), Object::Reference(object_id));
        resources.set(b"XObject", Object::Dictionary(xobject_dict));

        let mut new_page_dict = page_dict;
        new_page_dict.set(b"Resources", Object::Dictionary(resources));
        self.inner.objects.insert(page_id, new_page_dict.into());

        Ok(())
    }

    /// Wire collected signature fields into the catalog's /AcroForm
    fn finalize_acroform(&mut self) -> Result<()> {
        if self.signature_fields.is_empty() {
            return Ok(());
        }

        let fields: Vec<Object> = self
            .signature_fields
            .iter()
            .map(|&id| Object::Reference(id))
            .collect();
        let acroform_id = self.inner.add_object(dictionary! {
            "Fields" => fields,
            "SigFlags" => 3,
        });

        let catalog_id = self
            .inner
            .trailer
            .get(b"Root")
            .and_then(|r| r.as_reference())
            .map_err(|_| PdfError::Parse("document trailer missing Root".to_string()))?;
        let catalog = self
            .inner
            .get_object(catalog_id)?
            .as_dict()
            .cloned()
            .map_err(|_| PdfError::Parse("catalog is not a dictionary".to_string()))?;

        let mut new_catalog = catalog;
        new_catalog.set(b"AcroForm", Object::Reference(acroform_id));
        self.inner.objects.insert(catalog_id, new_catalog.into());

        Ok(())
    }
}

/// Extract (width, height) from a page's MediaBox, following the parent
/// inheritance chain; falls back to A4 when absent
fn media_box_dims(doc: &Document, page_id: ObjectId) -> (f64, f64) {
    let mut current_id = page_id;

    for _ in 0..10 {
        let Ok(obj) = doc.get_object(current_id) else {
            break;
        };
        let Ok(dict) = obj.as_dict() else { break };

        if let Ok(media_box) = dict.get(b"MediaBox").or_else(|_| dict.get(b"CropBox")) {
            let arr = match media_box {
                Object::Array(arr) => Some(arr.clone()),
                Object::Reference(ref_id) => doc
                    .get_object(*ref_id)
                    .ok()
                    .and_then(|o| o.as_array().ok())
                    .cloned(),
                _ => None,
            };
            if let Some(arr) = arr {
                if arr.len() >= 4 {
                    let num = |o: &Object| {
                        o.as_f32()
                            .map(|v| v as f64)
                            .or_else(|_| o.as_i64().map(|v| v as f64))
                            .ok()
                    };
                    if let (Some(x1), Some(y1), Some(x2), Some(y2)) =
                        (num(&arr[0]), num(&arr[1]), num(&arr[2]), num(&arr[3]))
                    {
                        return (x2 - x1, y2 - y1);
                    }
                }
            }
        }

        match dict.get(b"Parent") {
            Ok(Object::Reference(parent_id)) => current_id = *parent_id,
            _ => break,
        }
    }

    A4
}
