//! End-to-end invoice generation tests
//!
//! Each test renders an invoice, re-parses the bytes with lopdf and
//! asserts on the decompressed first-page content stream.

use chrono::NaiveDate;
use invoice_template::{
    generate, generate_overlay, parse_template, Invoice, LineItem, Party, RenderOptions,
};

fn sample_invoice() -> Invoice {
    Invoice {
        number: "INV-2024-001".to_string(),
        date: NaiveDate::from_ymd_opt(2024, 12, 1).unwrap(),
        due_date: None,
        company: Party {
            name: "Acme Traders".to_string(),
            address: "12 MG Road, Pune".to_string(),
            gstin: Some("27AAAAA0000A1Z5".to_string()),
            state: "Maharashtra".to_string(),
            phone: None,
            email: None,
        },
        customer: Party {
            name: "Globex Retail".to_string(),
            address: "4 Residency Road, Bengaluru".to_string(),
            gstin: Some("29BBBBB1111B2Z6".to_string()),
            state: "Maharashtra".to_string(),
            phone: None,
            email: None,
        },
        items: vec![
            LineItem {
                description: "Widget".to_string(),
                hsn_sac: "8471".to_string(),
                quantity: 2.0,
                rate: 1000.0,
                tax_rate: 18.0,
            },
            LineItem {
                description: "Gadget".to_string(),
                hsn_sac: "8517".to_string(),
                quantity: 1.0,
                rate: 2000.0,
                tax_rate: 18.0,
            },
        ],
        notes: None,
        terms: None,
    }
}

/// Decompressed content stream of the first page
fn first_page_content(bytes: &[u8]) -> String {
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    let page_id = *pages.get(&1).unwrap();
    let page_dict = doc.get_object(page_id).unwrap().as_dict().unwrap();
    let contents = page_dict.get(b"Contents").unwrap();
    String::from_utf8_lossy(&collect_content(&doc, contents)).into_owned()
}

fn collect_content(doc: &lopdf::Document, contents: &lopdf::Object) -> Vec<u8> {
    match contents {
        lopdf::Object::Stream(stream) => stream
            .decompressed_content()
            .unwrap_or_else(|_| stream.content.clone()),
        lopdf::Object::Reference(ref_id) => match doc.get_object(*ref_id) {
            Ok(obj) => collect_content(doc, obj),
            Err(_) => Vec::new(),
        },
        lopdf::Object::Array(arr) => arr
            .iter()
            .flat_map(|obj| collect_content(doc, obj))
            .collect(),
        _ => Vec::new(),
    }
}

#[test]
fn test_default_layout_renders_parties_and_items() {
    let bytes = generate(None, &sample_invoice(), &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    assert!(content.contains("(Acme Traders) Tj"));
    assert!(content.contains("(Globex Retail) Tj"));
    assert!(content.contains("(TAX INVOICE) Tj"));
    assert!(content.contains("(Invoice #: INV-2024-001) Tj"));
    assert!(content.contains("(Date: 01-12-2024) Tj"));
    assert!(content.contains("(Widget) Tj"));
    assert!(content.contains("(Gadget) Tj"));
    assert!(content.contains("(8471) Tj"));
}

#[test]
fn test_table_header_uses_fixed_column_labels() {
    let bytes = generate(None, &sample_invoice(), &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    for label in [
        "S.No", "Description", "HSN/SAC", "Qty", "Rate", "Amount", "Tax Rate", "Tax Amount",
        "Total",
    ] {
        assert!(
            content.contains(&format!("({label}) Tj")),
            "missing table header {label}"
        );
    }
}

#[test]
fn test_intra_state_invoice_shows_cgst_sgst() {
    let bytes = generate(None, &sample_invoice(), &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    // 4000 subtotal, 18% tax split in half: 360 + 360
    assert!(content.contains("(Subtotal) Tj"));
    assert!(content.contains("(4,000.00) Tj"));
    assert!(content.contains("(CGST) Tj"));
    assert!(content.contains("(SGST) Tj"));
    // 360.00 shows twice in the tax column and once each for CGST and SGST
    assert_eq!(content.matches("(360.00) Tj").count(), 4);
    assert!(!content.contains("(IGST) Tj"));
    assert!(content.contains("(Grand Total) Tj"));
    assert!(content.contains("(4,720.00) Tj"));
}

#[test]
fn test_inter_state_invoice_shows_igst() {
    let mut invoice = sample_invoice();
    invoice.customer.state = "Karnataka".to_string();
    let bytes = generate(None, &invoice, &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    assert!(content.contains("(IGST) Tj"));
    assert!(content.contains("(720.00) Tj"));
    assert!(!content.contains("(CGST) Tj"));
    assert!(!content.contains("(SGST) Tj"));
    assert!(content.contains("(4,720.00) Tj"));
}

#[test]
fn test_zero_tax_inter_state_still_shows_igst_line() {
    let mut invoice = sample_invoice();
    invoice.customer.state = "Karnataka".to_string();
    for item in &mut invoice.items {
        item.tax_rate = 0.0;
    }
    let bytes = generate(None, &invoice, &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    // The summary rows follow the place of supply even when the tax is zero
    assert!(content.contains("(IGST) Tj"));
    assert!(!content.contains("(CGST) Tj"));
    assert!(!content.contains("(SGST) Tj"));
}

#[test]
fn test_missing_optional_fields_stay_verbatim() {
    let template = parse_template(
        r#"{
        "elements": [
            {"type": "text", "id": "due", "x": 40, "y": 40, "width": 300,
             "height": 14, "content": "Due: {invoice.dueDate}"},
            {"type": "text", "id": "gst", "x": 40, "y": 60, "width": 300,
             "height": 14, "content": "GSTIN: {customer.gstin}"}
        ]
    }"#,
    )
    .unwrap();

    let mut invoice = sample_invoice();
    invoice.due_date = None;
    invoice.customer.gstin = None;
    let bytes = generate(Some(&template), &invoice, &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    // Absent optionals resolve the same way as any other miss
    assert!(content.contains("(Due: {invoice.dueDate}) Tj"));
    assert!(content.contains("(GSTIN: {customer.gstin}) Tj"));
}

#[test]
fn test_due_date_substituted_when_present() {
    let template = parse_template(
        r#"{
        "elements": [
            {"type": "text", "id": "due", "x": 40, "y": 40, "width": 300,
             "height": 14, "content": "Due: {invoice.dueDate}"}
        ]
    }"#,
    )
    .unwrap();

    let mut invoice = sample_invoice();
    invoice.due_date = NaiveDate::from_ymd_opt(2024, 12, 31);
    let bytes = generate(Some(&template), &invoice, &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);
    assert!(content.contains("(Due: 31-12-2024) Tj"));
}

#[test]
fn test_amount_in_words_rendered() {
    let bytes = generate(None, &sample_invoice(), &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    assert!(content.contains("(Amount in Words:) Tj"));
    assert!(content.contains("(Four Thousand Seven Hundred Twenty Rupees) Tj"));
}

#[test]
fn test_default_terms_and_signatory_block() {
    let bytes = generate(None, &sample_invoice(), &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    assert!(content.contains("(Terms & Conditions) Tj"));
    assert!(content.contains("(1. Goods once sold will not be taken back.) Tj"));
    assert!(content.contains("(For Acme Traders) Tj"));
    assert!(content.contains("(Authorized Signatory) Tj"));
}

#[test]
fn test_custom_terms_override_defaults() {
    let mut invoice = sample_invoice();
    invoice.terms = Some("Payment due in 15 days.".to_string());
    let bytes = generate(None, &invoice, &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    assert!(content.contains("(Payment due in 15 days.) Tj"));
    assert!(!content.contains("(1. Goods once sold will not be taken back.) Tj"));
}

#[test]
fn test_notes_rendered_when_present() {
    let mut invoice = sample_invoice();
    invoice.notes = Some("Delivery within 7 working days.".to_string());
    let bytes = generate(None, &invoice, &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    assert!(content.contains("(Notes) Tj"));
    assert!(content.contains("(Delivery within 7 working days.) Tj"));
}

#[test]
fn test_invisible_elements_are_skipped() {
    let template = parse_template(
        r#"{
        "elements": [
            {"type": "text", "id": "shown", "x": 40, "y": 40, "width": 200,
             "height": 14, "content": "Visible line"},
            {"type": "text", "id": "hidden", "x": 40, "y": 60, "width": 200,
             "height": 14, "content": "Hidden line", "visible": false}
        ]
    }"#,
    )
    .unwrap();

    let bytes = generate(Some(&template), &sample_invoice(), &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);
    assert!(content.contains("(Visible line) Tj"));
    assert!(!content.contains("(Hidden line) Tj"));
}

#[test]
fn test_unresolved_placeholder_stays_verbatim() {
    let template = parse_template(
        r#"{
        "elements": [
            {"type": "text", "id": "t", "x": 40, "y": 40, "width": 300,
             "height": 14, "content": "Ref: {invoice.poNumber}"}
        ]
    }"#,
    )
    .unwrap();

    let bytes = generate(Some(&template), &sample_invoice(), &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);
    assert!(content.contains("(Ref: {invoice.poNumber}) Tj"));
}

#[test]
fn test_rectangle_fill_and_border_both_drawn() {
    let template = parse_template(
        r#"{
        "elements": [
            {"type": "rectangle", "id": "box", "x": 40, "y": 40, "width": 100,
             "height": 50, "background": {"r": 0.9, "g": 0.9, "b": 0.9},
             "borderWidth": 2.0}
        ]
    }"#,
    )
    .unwrap();

    let bytes = generate(Some(&template), &sample_invoice(), &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);
    assert!(content.contains("re\nf"));
    assert!(content.contains("re\nS"));
}

#[test]
fn test_line_height_is_stroke_thickness() {
    let template = parse_template(
        r#"{
        "elements": [
            {"type": "line", "id": "rule", "x": 40, "y": 100, "width": 200,
             "height": 3}
        ]
    }"#,
    )
    .unwrap();

    let bytes = generate(Some(&template), &sample_invoice(), &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);
    assert!(content.contains("3 w"));
}

#[test]
fn test_signature_element_draws_dashed_box_and_label() {
    let template = parse_template(
        r#"{
        "elements": [
            {"type": "signature", "id": "sig", "x": 400, "y": 680, "width": 150,
             "height": 70}
        ]
    }"#,
    )
    .unwrap();

    let bytes = generate(Some(&template), &sample_invoice(), &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);
    assert!(content.contains("] 0 d"));
    assert!(content.contains("(Authorized Signatory) Tj"));
}

#[test]
fn test_qr_code_option_embeds_image() {
    let options = RenderOptions {
        qr_code: true,
        ..Default::default()
    };
    let bytes = generate(None, &sample_invoice(), &options).unwrap();
    let content = first_page_content(&bytes);
    assert!(content.contains(" Do"));
}

#[test]
fn test_signature_field_option_adds_acroform() {
    let options = RenderOptions {
        signature_field: true,
        ..Default::default()
    };
    let bytes = generate(None, &sample_invoice(), &options).unwrap();

    let parsed = lopdf::Document::load_mem(&bytes).unwrap();
    let root_id = parsed.trailer.get(b"Root").unwrap().as_reference().unwrap();
    let catalog = parsed.get_object(root_id).unwrap().as_dict().unwrap();
    assert!(catalog.get(b"AcroForm").is_ok());
}

#[test]
fn test_overlay_keeps_base_content() {
    let base = generate(
        Some(&parse_template(r#"{"elements": [
            {"type": "text", "id": "wm", "x": 200, "y": 400, "width": 200,
             "height": 20, "content": "PRE-PRINTED STATIONERY"}
        ]}"#).unwrap()),
        &sample_invoice(),
        &RenderOptions::default(),
    )
    .unwrap();

    let bytes = generate_overlay(None, &sample_invoice(), &base, &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);
    assert!(content.contains("(PRE-PRINTED STATIONERY) Tj"));
    assert!(content.contains("(Acme Traders) Tj"));
}

#[test]
fn test_overlay_on_malformed_base_is_fatal() {
    let result = generate_overlay(
        None,
        &sample_invoice(),
        b"this is not a pdf",
        &RenderOptions::default(),
    );
    assert!(result.is_err());
}

#[test]
fn test_metadata_carries_invoice_number() {
    let bytes = generate(None, &sample_invoice(), &RenderOptions::default()).unwrap();
    let parsed = lopdf::Document::load_mem(&bytes).unwrap();
    let info_ref = parsed.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = parsed.get_object(info_ref).unwrap().as_dict().unwrap();
    match info.get(b"Title").unwrap() {
        lopdf::Object::String(s, _) => assert_eq!(s.as_slice(), b"Invoice INV-2024-001"),
        other => panic!("Title is not a string: {other:?}"),
    }
}

#[test]
fn test_empty_item_list_still_generates() {
    let mut invoice = sample_invoice();
    invoice.items.clear();
    let bytes = generate(None, &invoice, &RenderOptions::default()).unwrap();
    let content = first_page_content(&bytes);

    assert!(content.contains("(S.No) Tj"));
    assert!(content.contains("(0.00) Tj"));
    assert!(content.contains("(Zero Rupees) Tj"));
}
