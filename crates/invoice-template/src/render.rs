//! Element renderers and the document assembler
//!
//! `generate` walks the template's element list, then draws the fixed
//! supplementary blocks every invoice carries: the line-items table, the
//! tax summary, the grand-total band, the amount in words, terms, the
//! signatory block, and the optional QR code and signature form field.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use indic_text::{amount_in_words, format_date, format_inr};
use pdf_core::{Align, BuiltinFont, PdfDocument};
use serde_json::{json, Value};

use crate::invoice::{Invoice, LineItem};
use crate::schema::{
    Color, Element, FontWeight, ImageElement, LineElement, RectangleElement, SignatureElement,
    Template, TextAlign, TextElement,
};
use crate::tax::{TaxBreakdown, Totals};
use crate::vars::resolve;
use crate::{Result, TemplateError};

/// Fixed columns of the line-items table: header label and width in points
const TABLE_COLUMNS: [(&str, f64); 9] = [
    ("S.No", 40.0),
    ("Description", 120.0),
    ("HSN/SAC", 60.0),
    ("Qty", 40.0),
    ("Rate", 60.0),
    ("Amount", 70.0),
    ("Tax Rate", 60.0),
    ("Tax Amount", 70.0),
    ("Total", 70.0),
];

const ROW_HEIGHT: f64 = 18.0;
const CELL_PADDING: f64 = 3.0;
/// Baseline offset from the top of a table row
const CELL_BASELINE: f64 = 12.5;

/// Vertical position of the table when the template has no table element
const DEFAULT_TABLE_Y: f64 = 260.0;

const DEFAULT_TERMS: &str = "1. Goods once sold will not be taken back.\n\
    2. Interest @18% p.a. will be charged on overdue payments.\n\
    3. Subject to local jurisdiction.";

const PAGE: usize = 1;

fn header_color() -> pdf_core::Color {
    pdf_core::Color::from_rgb(52, 58, 64)
}

fn zebra_color() -> pdf_core::Color {
    pdf_core::Color::from_rgb(245, 245, 245)
}

fn muted_color() -> pdf_core::Color {
    pdf_core::Color::from_rgb(96, 96, 96)
}

/// Inputs that accompany the invoice data at render time
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Image bytes resolved by image elements whose `src` is "logo"
    pub logo: Option<Vec<u8>>,
    /// Draw a QR code carrying the invoice number and grand total
    pub qr_code: bool,
    /// Add an empty digital-signature form field
    pub signature_field: bool,
}

/// Render an invoice to a new single-page PDF
///
/// With no template the built-in default layout is used.
pub fn generate(
    template: Option<&Template>,
    invoice: &Invoice,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let fallback;
    let template = match template {
        Some(t) => t,
        None => {
            fallback = default_template();
            &fallback
        }
    };

    let (width, height) = template.page_dimensions();
    let mut doc = PdfDocument::new(width, height);
    render_into(&mut doc, template, invoice, options)?;
    Ok(doc.to_bytes()?)
}

/// Render an invoice on top of the first page of an existing PDF
///
/// Unlike template parsing, a malformed base document is a hard error.
pub fn generate_overlay(
    template: Option<&Template>,
    invoice: &Invoice,
    base_pdf: &[u8],
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let fallback;
    let template = match template {
        Some(t) => t,
        None => {
            fallback = default_template();
            &fallback
        }
    };

    let mut doc = PdfDocument::from_bytes(base_pdf)?;
    render_into(&mut doc, template, invoice, options)?;
    Ok(doc.to_bytes()?)
}

fn render_into(
    doc: &mut PdfDocument,
    template: &Template,
    invoice: &Invoice,
    options: &RenderOptions,
) -> Result<()> {
    let (page_width, page_height) = doc.page_dimensions(PAGE)?;

    if let Some(bg) = template.background {
        if bg != Color::white() {
            doc.draw_rect(PAGE, 0.0, 0.0, page_width, page_height, Some(bg.into()), None)?;
        }
    }

    let totals = Totals::compute(&invoice.items);
    let breakdown = TaxBreakdown::compute(
        &invoice.items,
        &invoice.company.state,
        &invoice.customer.state,
    );
    let context = build_context(invoice, &totals, &breakdown)?;

    for element in &template.elements {
        if !element.is_visible() {
            continue;
        }
        match element {
            Element::Text(e) => render_text(doc, e, &context)?,
            Element::Rectangle(e) => render_rectangle(doc, e)?,
            Element::Line(e) => render_line(doc, e)?,
            Element::Image(e) => render_image(doc, e, options),
            Element::Signature(e) => render_signature(doc, e)?,
            // The table is drawn with the supplementary blocks so the
            // summary can stack below its actual extent
            Element::Table(_) => {}
        }
    }

    let (table_x, table_y) = template
        .elements
        .iter()
        .find_map(|e| match e {
            Element::Table(t) if t.frame.visible => Some((t.frame.x, t.frame.y)),
            _ => None,
        })
        .unwrap_or((template.margins.left, DEFAULT_TABLE_Y));

    let table_end = render_items_table(doc, &invoice.items, table_x, table_y)?;
    let intra_state = invoice.company.state == invoice.customer.state;
    let summary_end = render_summary(
        doc,
        &totals,
        &breakdown,
        intra_state,
        page_width,
        template,
        table_end,
    )?;
    render_footer(doc, invoice, &totals, page_width, page_height, template, summary_end)?;

    if options.qr_code {
        render_qr_code(doc, invoice, &totals, page_height, template);
    }
    if options.signature_field {
        let field_x = page_width - template.margins.right - 150.0;
        let field_y = page_height - template.margins.bottom - 40.0;
        doc.add_signature_field(PAGE, field_x, field_y, 150.0, 40.0, "AuthorizedSignature")?;
    }

    doc.set_metadata(&format!("Invoice {}", invoice.number), &invoice.company.name);
    Ok(())
}

fn render_text(doc: &mut PdfDocument, element: &TextElement, context: &Value) -> Result<()> {
    let content = resolve(&element.content, context);
    let font = BuiltinFont::lookup(
        &element.font_family,
        element.font_weight == FontWeight::Bold,
    );
    doc.set_font(font, element.font_size);
    doc.set_text_color(element.color.into());

    let (anchor_x, align) = match element.align {
        TextAlign::Left => (element.frame.x, Align::Left),
        TextAlign::Center => (element.frame.x + element.frame.width / 2.0, Align::Center),
        TextAlign::Right => (element.frame.x + element.frame.width, Align::Right),
    };

    let line_height = element.font_size as f64 * 1.2;
    let baseline = element.frame.y + element.font_size as f64;
    for (i, line) in content.split('\n').enumerate() {
        doc.insert_text(line, PAGE, anchor_x, baseline + i as f64 * line_height, align)?;
    }
    Ok(())
}

fn render_rectangle(doc: &mut PdfDocument, element: &RectangleElement) -> Result<()> {
    let fill = element.background.map(Into::into);
    let stroke = (element.border_width > 0.0)
        .then(|| (element.border_color.into(), element.border_width));
    doc.draw_rect(
        PAGE,
        element.frame.x,
        element.frame.y,
        element.frame.width,
        element.frame.height,
        fill,
        stroke,
    )?;
    Ok(())
}

fn render_line(doc: &mut PdfDocument, element: &LineElement) -> Result<()> {
    // Lines are horizontal; the frame height carries the stroke thickness
    doc.draw_line(
        PAGE,
        element.frame.x,
        element.frame.y,
        element.frame.x + element.frame.width,
        element.frame.y,
        element.frame.height,
        element.color.into(),
    )?;
    Ok(())
}

fn render_image(doc: &mut PdfDocument, element: &ImageElement, options: &RenderOptions) {
    let data = match element.src.as_deref() {
        Some("logo") => options.logo.clone(),
        Some(src) => decode_image_src(src),
        None => None,
    };

    let Some(bytes) = data else {
        log::warn!("image element {} has no usable source, skipping", element.frame.id);
        return;
    };
    if let Err(e) = doc.insert_image(
        &bytes,
        PAGE,
        element.frame.x,
        element.frame.y,
        element.frame.width,
        element.frame.height,
    ) {
        log::warn!("image element {} could not be drawn: {e}", element.frame.id);
    }
}

fn render_signature(doc: &mut PdfDocument, element: &SignatureElement) -> Result<()> {
    let f = &element.frame;
    doc.draw_rect_dashed(PAGE, f.x, f.y, f.width, f.height, muted_color(), 1.0)?;

    doc.set_font(BuiltinFont::Helvetica, 8.0);
    doc.set_text_color(muted_color());
    doc.insert_text(
        &element.label,
        PAGE,
        f.x + f.width / 2.0,
        f.y + f.height - 5.0,
        Align::Center,
    )?;

    if let Some(src) = &element.image {
        match decode_image_src(src) {
            // 5pt inset on each side, 20pt at the bottom reserved for the label
            Some(bytes) => {
                if let Err(e) = doc.insert_image(
                    &bytes,
                    PAGE,
                    f.x + 5.0,
                    f.y + 5.0,
                    f.width - 10.0,
                    f.height - 20.0,
                ) {
                    log::warn!("signature image on {} could not be drawn: {e}", f.id);
                }
            }
            None => log::warn!("signature image on {} is not valid base64, skipping", f.id),
        }
    }
    Ok(())
}

/// Decode an image source string: a `data:` URL or bare base64
fn decode_image_src(src: &str) -> Option<Vec<u8>> {
    let payload = if src.starts_with("data:") {
        let (_, rest) = src.split_once(";base64,")?;
        rest
    } else {
        src
    };
    BASE64.decode(payload.trim()).ok()
}

/// Draw the line-items table; returns the y just below the last row
fn render_items_table(
    doc: &mut PdfDocument,
    items: &[LineItem],
    x: f64,
    y: f64,
) -> Result<f64> {
    let table_width: f64 = TABLE_COLUMNS.iter().map(|(_, w)| w).sum();

    doc.draw_rect(PAGE, x, y, table_width, ROW_HEIGHT, Some(header_color()), None)?;
    doc.set_font(BuiltinFont::HelveticaBold, 9.0);
    doc.set_text_color(pdf_core::Color::white());
    let mut cell_x = x;
    for (title, width) in TABLE_COLUMNS {
        doc.insert_text(title, PAGE, cell_x + CELL_PADDING, y + CELL_BASELINE, Align::Left)?;
        cell_x += width;
    }

    doc.set_font(BuiltinFont::Helvetica, 9.0);
    doc.set_text_color(pdf_core::Color::black());
    let mut row_y = y + ROW_HEIGHT;
    for (index, item) in items.iter().enumerate() {
        if index % 2 == 1 {
            doc.draw_rect(PAGE, x, row_y, table_width, ROW_HEIGHT, Some(zebra_color()), None)?;
        }
        let cells = [
            (index + 1).to_string(),
            item.description.clone(),
            item.hsn_sac.clone(),
            format_quantity(item.quantity),
            format_inr(item.rate),
            format_inr(item.amount()),
            format!("{}%", format_quantity(item.tax_rate)),
            format_inr(item.tax()),
            format_inr(item.total()),
        ];
        cell_x = x;
        for (cell, (_, width)) in cells.iter().zip(TABLE_COLUMNS) {
            doc.insert_text(cell, PAGE, cell_x + CELL_PADDING, row_y + CELL_BASELINE, Align::Left)?;
            cell_x += width;
        }
        row_y += ROW_HEIGHT;
    }

    doc.draw_line(PAGE, x, row_y, x + table_width, row_y, 0.5, pdf_core::Color::black())?;
    Ok(row_y)
}

/// Quantities print without a trailing ".0" when whole
fn format_quantity(q: f64) -> String {
    if q.fract() == 0.0 {
        format!("{}", q as i64)
    } else {
        format!("{q}")
    }
}

/// Subtotal, GST component lines and the grand-total band
fn render_summary(
    doc: &mut PdfDocument,
    totals: &Totals,
    breakdown: &TaxBreakdown,
    intra_state: bool,
    page_width: f64,
    template: &Template,
    table_end: f64,
) -> Result<f64> {
    let value_x = page_width - template.margins.right;
    let label_x = value_x - 180.0;
    let mut line_y = table_end + 16.0;

    // Rows follow the place-of-supply decision, not the amounts, so a
    // zero-tax inter-state invoice still shows an IGST line
    let mut lines: Vec<(&str, f64)> = vec![("Subtotal", totals.subtotal)];
    if intra_state {
        lines.push(("CGST", breakdown.cgst));
        lines.push(("SGST", breakdown.sgst));
    } else {
        lines.push(("IGST", breakdown.igst));
    }

    doc.set_font(BuiltinFont::Helvetica, 10.0);
    doc.set_text_color(pdf_core::Color::black());
    for (label, amount) in lines {
        doc.insert_text(label, PAGE, label_x, line_y, Align::Left)?;
        doc.insert_text(&format_inr(amount), PAGE, value_x, line_y, Align::Right)?;
        line_y += 14.0;
    }

    let band_y = line_y + 2.0;
    let band_height = 20.0;
    doc.draw_rect(
        PAGE,
        label_x - 6.0,
        band_y,
        value_x - label_x + 6.0,
        band_height,
        Some(header_color()),
        None,
    )?;
    doc.set_font(BuiltinFont::HelveticaBold, 11.0);
    doc.set_text_color(pdf_core::Color::white());
    doc.insert_text("Grand Total", PAGE, label_x, band_y + 14.0, Align::Left)?;
    doc.insert_text(
        &format_inr(totals.grand_total),
        PAGE,
        value_x,
        band_y + 14.0,
        Align::Right,
    )?;

    Ok(band_y + band_height)
}

/// Amount in words, terms and the signatory block
fn render_footer(
    doc: &mut PdfDocument,
    invoice: &Invoice,
    totals: &Totals,
    page_width: f64,
    page_height: f64,
    template: &Template,
    summary_end: f64,
) -> Result<()> {
    let left = template.margins.left;
    let mut y = summary_end + 18.0;

    doc.set_font(BuiltinFont::HelveticaBold, 9.0);
    doc.set_text_color(pdf_core::Color::black());
    doc.insert_text("Amount in Words:", PAGE, left, y, Align::Left)?;
    doc.set_font(BuiltinFont::Helvetica, 9.0);
    doc.insert_text(
        &amount_in_words(totals.grand_total),
        PAGE,
        left + 85.0,
        y,
        Align::Left,
    )?;
    y += 22.0;

    doc.set_font(BuiltinFont::HelveticaBold, 9.0);
    doc.insert_text("Terms & Conditions", PAGE, left, y, Align::Left)?;
    y += 12.0;
    doc.set_font(BuiltinFont::Helvetica, 8.0);
    doc.set_text_color(muted_color());
    let terms = invoice.terms.as_deref().unwrap_or(DEFAULT_TERMS);
    for line in terms.split('\n') {
        doc.insert_text(line, PAGE, left, y, Align::Left)?;
        y += 10.0;
    }

    if let Some(notes) = invoice.notes.as_deref() {
        y += 6.0;
        doc.set_font(BuiltinFont::HelveticaBold, 9.0);
        doc.set_text_color(pdf_core::Color::black());
        doc.insert_text("Notes", PAGE, left, y, Align::Left)?;
        y += 12.0;
        doc.set_font(BuiltinFont::Helvetica, 8.0);
        doc.set_text_color(muted_color());
        for line in notes.split('\n') {
            doc.insert_text(line, PAGE, left, y, Align::Left)?;
            y += 10.0;
        }
    }

    let sig_x = page_width - template.margins.right;
    let sig_y = page_height - template.margins.bottom;
    doc.set_font(BuiltinFont::HelveticaBold, 9.0);
    doc.set_text_color(pdf_core::Color::black());
    doc.insert_text(&format!("For {}", invoice.company.name), PAGE, sig_x, sig_y - 24.0, Align::Right)?;
    doc.draw_line(
        PAGE,
        sig_x - 140.0,
        sig_y - 12.0,
        sig_x,
        sig_y - 12.0,
        0.5,
        pdf_core::Color::black(),
    )?;
    doc.set_font(BuiltinFont::Helvetica, 8.0);
    doc.insert_text("Authorized Signatory", PAGE, sig_x, sig_y - 2.0, Align::Right)?;

    Ok(())
}

/// QR code at the bottom-left carrying the invoice number and total
///
/// QR generation failure is logged and skipped, never fatal.
fn render_qr_code(
    doc: &mut PdfDocument,
    invoice: &Invoice,
    totals: &Totals,
    page_height: f64,
    template: &Template,
) {
    let payload = format!("{}|{}", invoice.number, format_inr(totals.grand_total));
    let bytes = match qr_png(&payload) {
        Ok(b) => b,
        Err(e) => {
            log::warn!("QR code generation failed: {e}");
            return;
        }
    };
    let size = 70.0;
    let y = page_height - template.margins.bottom - size;
    if let Err(e) = doc.insert_image(&bytes, PAGE, template.margins.left, y, size, size) {
        log::warn!("QR code could not be drawn: {e}");
    }
}

/// Encode a string as a QR code PNG
fn qr_png(data: &str) -> Result<Vec<u8>> {
    use image::Luma;

    let code = qrcode::QrCode::new(data.as_bytes())
        .map_err(|e| TemplateError::Image(e.to_string()))?;
    let img = code.render::<Luma<u8>>().min_dimensions(200, 200).build();

    let mut bytes: Vec<u8> = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut bytes);
    image::DynamicImage::ImageLuma8(img)
        .write_to(&mut cursor, image::ImageFormat::Png)
        .map_err(|e| TemplateError::Image(e.to_string()))?;
    Ok(bytes)
}

/// Substitution context shared by every text element
fn build_context(
    invoice: &Invoice,
    totals: &Totals,
    breakdown: &TaxBreakdown,
) -> Result<Value> {
    // Drop null fields everywhere so a missing optional (GSTIN, due date)
    // leaves its placeholder verbatim instead of substituting an empty string
    let company = without_nulls(serde_json::to_value(&invoice.company)?);
    let customer = without_nulls(serde_json::to_value(&invoice.customer)?);
    let invoice_fields = without_nulls(json!({
        "number": invoice.number,
        "date": format_date(invoice.date),
        "dueDate": invoice.due_date.map(format_date),
        "notes": invoice.notes,
    }));

    Ok(json!({
        "invoice": invoice_fields,
        "company": company,
        "customer": customer,
        "totals": {
            "subtotal": format_inr(totals.subtotal),
            "taxTotal": format_inr(totals.total_tax),
            "grandTotal": format_inr(totals.grand_total),
            "amountInWords": amount_in_words(totals.grand_total),
        },
        "tax": {
            "cgst": format_inr(breakdown.cgst),
            "sgst": format_inr(breakdown.sgst),
            "igst": format_inr(breakdown.igst),
        },
    }))
}

fn without_nulls(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        obj.retain(|_, v| !v.is_null());
    }
    value
}

/// The built-in layout used when no template is supplied
pub fn default_template() -> Template {
    let json = r##"{
        "name": "default",
        "pageSize": "a4",
        "elements": [
            {"type": "text", "id": "company-name", "x": 40, "y": 36,
             "width": 300, "height": 22, "content": "{company.name}",
             "fontSize": 18, "fontWeight": "bold"},
            {"type": "text", "id": "company-details", "x": 40, "y": 62,
             "width": 300, "height": 40,
             "content": "{company.address}\nGSTIN: {company.gstin}\nState: {company.state}",
             "fontSize": 9, "color": {"r": 0.35, "g": 0.35, "b": 0.35}},
            {"type": "text", "id": "doc-title", "x": 355, "y": 36,
             "width": 200, "height": 20, "content": "TAX INVOICE",
             "fontSize": 16, "fontWeight": "bold", "align": "right"},
            {"type": "text", "id": "invoice-meta", "x": 355, "y": 62,
             "width": 200, "height": 30,
             "content": "Invoice #: {invoice.number}\nDate: {invoice.date}",
             "fontSize": 10, "align": "right"},
            {"type": "line", "id": "header-rule", "x": 40, "y": 110,
             "width": 515, "height": 1},
            {"type": "rectangle", "id": "bill-to-box", "x": 40, "y": 126,
             "width": 260, "height": 88, "borderWidth": 0.75,
             "borderColor": {"r": 0.6, "g": 0.6, "b": 0.6}},
            {"type": "text", "id": "bill-to-label", "x": 48, "y": 132,
             "width": 100, "height": 12, "content": "Bill To:",
             "fontSize": 9, "fontWeight": "bold"},
            {"type": "text", "id": "bill-to-details", "x": 48, "y": 148,
             "width": 244, "height": 60,
             "content": "{customer.name}\n{customer.address}\nGSTIN: {customer.gstin}\nState: {customer.state}",
             "fontSize": 9},
            {"type": "table", "id": "items", "x": 40, "y": 240,
             "width": 515, "height": 0}
        ]
    }"##;
    crate::schema::parse_template(json).expect("default template is valid")
}
