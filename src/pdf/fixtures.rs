//! In-memory PDFs for tests. Each page carries a `(<prefix>-Page-<n>)` marker.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use std::path::{Path, PathBuf};

fn media_box() -> Object {
    Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ])
}

fn font_resources(doc: &mut Document) -> ObjectId {
    let font_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Font".to_vec())),
        ("Subtype", Object::Name(b"Type1".to_vec())),
        ("BaseFont", Object::Name(b"Helvetica".to_vec())),
    ]));
    doc.add_object(Dictionary::from_iter(vec![(
        "Font",
        Object::Dictionary(Dictionary::from_iter(vec![("F1", Object::Reference(font_id))])),
    )]))
}

fn marker_page(doc: &mut Document, parent: ObjectId, marker: String, inline_attrs: bool) -> ObjectId {
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
            Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
            Operation::new(
                "Tj",
                vec![Object::String(marker.into_bytes(), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

    let mut page = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Page".to_vec())),
        ("Parent", Object::Reference(parent)),
        ("Contents", Object::Reference(content_id)),
    ]);
    if inline_attrs {
        let resources = font_resources(doc);
        page.set("MediaBox", media_box());
        page.set("Resources", Object::Reference(resources));
    }
    doc.add_object(page)
}

fn finish(doc: &mut Document, pages_id: ObjectId) {
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
}

/// A flat page tree with attributes set on every page.
pub fn build_fixture(num_pages: u32, prefix: &str) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (1..=num_pages)
        .map(|n| {
            let marker = format!("{}-Page-{}", prefix, n);
            Object::Reference(marker_page(&mut doc, pages_id, marker, true))
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            ("Kids", Object::Array(kids)),
        ])),
    );
    finish(&mut doc, pages_id);
    doc
}

/// Root -> intermediate node -> pages; MediaBox and Resources live on the root only.
pub fn build_nested_fixture(num_pages: u32, prefix: &str) -> Document {
    let mut doc = Document::with_version("1.7");
    let root_id = doc.new_object_id();
    let branch_id = doc.new_object_id();

    let kids: Vec<Object> = (1..=num_pages)
        .map(|n| {
            let marker = format!("{}-Page-{}", prefix, n);
            Object::Reference(marker_page(&mut doc, branch_id, marker, false))
        })
        .collect();

    doc.objects.insert(
        branch_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Parent", Object::Reference(root_id)),
            ("Count", Object::Integer(num_pages as i64)),
            ("Kids", Object::Array(kids)),
        ])),
    );

    let resources = font_resources(&mut doc);
    doc.objects.insert(
        root_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(num_pages as i64)),
            ("Kids", Object::Array(vec![Object::Reference(branch_id)])),
            ("MediaBox", media_box()),
            ("Resources", Object::Reference(resources)),
        ])),
    );
    finish(&mut doc, root_id);
    doc
}

pub fn write_fixture(dir: &Path, name: &str, num_pages: u32, prefix: &str) -> PathBuf {
    let path = dir.join(name);
    build_fixture(num_pages, prefix).save(&path).unwrap();
    path
}

pub fn write_nested_fixture(dir: &Path, name: &str, num_pages: u32, prefix: &str) -> PathBuf {
    let path = dir.join(name);
    build_nested_fixture(num_pages, prefix).save(&path).unwrap();
    path
}

/// A document whose catalog has no page tree.
pub fn build_pageless_fixture() -> Document {
    let mut doc = Document::with_version("1.7");
    let catalog_id = doc.add_object(Dictionary::from_iter(vec![(
        "Type",
        Object::Name(b"Catalog".to_vec()),
    )]));
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

/// The `(...)` text shown on a page.
pub fn page_marker(doc: &Document, page_id: ObjectId) -> String {
    let content = doc.get_page_content(page_id).unwrap();
    let text = String::from_utf8_lossy(&content);
    let start = text.find('(').unwrap() + 1;
    let end = text[start..].find(')').unwrap() + start;
    text[start..end].to_string()
}

/// Markers of every page in a PDF on disk, in page order.
pub fn file_markers(path: &Path) -> Vec<String> {
    let doc = Document::load(path).unwrap();
    doc.get_pages()
        .into_values()
        .map(|id| page_marker(&doc, id))
        .collect()
}
