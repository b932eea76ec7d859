//! Shared in-memory PDF fixtures for integration tests
#![allow(dead_code)] // each test binary uses a different subset

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};

/// A piece of text placed on a page, in PDF user space (origin at the
/// bottom-left corner, y increasing upward).
#[derive(Debug, Clone)]
pub struct PlacedText {
    pub x: f64,
    pub y: f64,
    pub text: String,
}

pub fn placed(x: f64, y: f64, text: &str) -> PlacedText {
    PlacedText {
        x,
        y,
        text: text.to_string(),
    }
}

/// Builds a PDF with one page per entry of `pages`, every page sharing
/// the given media box size.
pub fn pdf_with_text(width: i64, height: i64, pages: &[Vec<PlacedText>]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut kids = Vec::new();
    for page_texts in pages {
        let mut operations = Vec::new();
        for placed in page_texts {
            operations.push(Operation::new("BT", vec![]));
            operations.push(Operation::new(
                "Td",
                vec![
                    Object::Real(placed.x as f32),
                    Object::Real(placed.y as f32),
                ],
            ));
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(
                    placed.text.as_bytes().to_vec(),
                    StringFormat::Literal,
                )],
            ));
            operations.push(Operation::new("ET", vec![]));
        }
        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => Object::Reference(content_id),
        });
        kids.push(Object::Reference(page_id));
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

/// Decoded operations of the nth page (zero-based) of a serialized PDF.
pub fn page_operations(bytes: &[u8], page_index: usize) -> Vec<Operation> {
    let doc = Document::load_mem(bytes).unwrap();
    let pages = doc.get_pages();
    let (_, &page_id) = pages.iter().nth(page_index).expect("page exists");
    let raw = doc.get_page_content(page_id).unwrap();
    Content::decode(&raw).unwrap().operations
}

/// Text shown by `Tj` operators, in stream order.
pub fn shown_strings(operations: &[Operation]) -> Vec<String> {
    operations
        .iter()
        .filter(|op| op.operator == "Tj")
        .filter_map(|op| match op.operands.first() {
            Some(Object::String(bytes, _)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        })
        .collect()
}

pub fn page_count(bytes: &[u8]) -> usize {
    Document::load_mem(bytes).unwrap().get_pages().len()
}

/// Numeric value of an operand.
pub fn operand_value(obj: &Object) -> f64 {
    match obj {
        Object::Integer(i) => *i as f64,
        Object::Real(r) => *r as f64,
        other => panic!("non-numeric operand: {:?}", other),
    }
}

/// `(x, y)` pairs of all `Td` operators, in stream order.
pub fn td_positions(operations: &[Operation]) -> Vec<(f64, f64)> {
    operations
        .iter()
        .filter(|op| op.operator == "Td")
        .map(|op| (operand_value(&op.operands[0]), operand_value(&op.operands[1])))
        .collect()
}
