//! Page-tree surgery on lopdf documents.

use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeSet;

/// Attributes a page may inherit from its ancestors in the page tree.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Page trees deeper than this are treated as cyclic.
const MAX_TREE_DEPTH: usize = 64;

/// Build a one-page document from `page_id` and the objects it reaches.
///
/// Only the page's own object graph is copied (ids unchanged), so the cost
/// is proportional to that page, not to the whole document. `/Parent`
/// links are not followed; inherited attributes are copied onto the page.
pub fn single_page(doc: &Document, page_id: ObjectId) -> lopdf::Result<Document> {
    let mut page = doc.get_dictionary(page_id)?.clone();
    for key in INHERITABLE {
        if page.has(key) {
            continue;
        }
        if let Some(value) = inherited(doc, page_id, key) {
            page.set(key.to_vec(), value);
        }
    }

    let mut out = Document::with_version(doc.version.clone());
    let page = Object::Dictionary(page);
    let mut pending = Vec::new();
    references(&page, &mut pending);
    out.objects.insert(page_id, page);

    let mut seen = BTreeSet::from([page_id]);
    while let Some(id) = pending.pop() {
        if !seen.insert(id) {
            continue;
        }
        // Dangling references stay dangling; readers treat them as null.
        let Ok(object) = doc.get_object(id) else {
            continue;
        };
        references(object, &mut pending);
        out.objects.insert(id, object.clone());
    }

    out.max_id = doc.max_id;
    let pages_id = out.new_object_id();
    let catalog_id = out.new_object_id();
    out.objects.insert(
        pages_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Count", Object::Integer(1)),
            ("Kids", Object::Array(vec![Object::Reference(page_id)])),
        ])),
    );
    out.get_dictionary_mut(page_id)?
        .set("Parent", Object::Reference(pages_id));
    out.objects.insert(
        catalog_id,
        Object::Dictionary(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(pages_id)),
        ])),
    );
    out.trailer.set("Root", Object::Reference(catalog_id));
    Ok(out)
}

/// Append the pages of `rest`, in order, after the pages of `first`.
pub fn concatenate<I>(first: Document, rest: I) -> lopdf::Result<Document>
where
    I: IntoIterator<Item = Document>,
{
    let mut dest = first;
    let root = pages_root(&dest)?;
    let mut kids = pages_in_order(&dest);
    for &page_id in &kids {
        materialize_inherited(&mut dest, page_id)?;
    }

    for mut src in rest {
        let offset = dest.max_id;
        let src_pages = pages_in_order(&src);
        for &page_id in &src_pages {
            materialize_inherited(&mut src, page_id)?;
        }

        for ((num, generation), mut object) in std::mem::take(&mut src.objects) {
            shift_references(&mut object, offset);
            dest.objects.insert((num + offset, generation), object);
        }
        dest.max_id = dest.max_id.max(src.max_id + offset);
        kids.extend(
            src_pages
                .into_iter()
                .map(|(num, generation)| (num + offset, generation)),
        );
    }

    for &page_id in &kids {
        dest.get_dictionary_mut(page_id)?
            .set("Parent", Object::Reference(root));
    }

    let pages = dest.get_dictionary_mut(root)?;
    pages.set("Count", Object::Integer(kids.len() as i64));
    pages.set(
        "Kids",
        Object::Array(kids.into_iter().map(Object::Reference).collect()),
    );

    // Source catalogs and intermediate page-tree nodes are now unreachable.
    dest.prune_objects();
    Ok(dest)
}

fn pages_root(doc: &Document) -> lopdf::Result<ObjectId> {
    doc.catalog()?.get(b"Pages")?.as_reference()
}

fn pages_in_order(doc: &Document) -> Vec<ObjectId> {
    // get_pages is keyed by 1-based page number.
    doc.get_pages().into_values().collect()
}

/// Copy inherited attributes onto the page so it can be re-parented.
fn materialize_inherited(doc: &mut Document, page_id: ObjectId) -> lopdf::Result<()> {
    let mut found = Vec::new();
    {
        let page = doc.get_dictionary(page_id)?;
        for key in INHERITABLE {
            if page.has(key) {
                continue;
            }
            if let Some(value) = inherited(doc, page_id, key) {
                found.push((key.to_vec(), value));
            }
        }
    }

    let page = doc.get_dictionary_mut(page_id)?;
    for (key, value) in found {
        page.set(key, value);
    }
    Ok(())
}

fn inherited(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<Object> {
    let mut node = doc.get_dictionary(page_id).ok()?;
    for _ in 0..MAX_TREE_DEPTH {
        let parent = node.get(b"Parent").and_then(Object::as_reference).ok()?;
        node = doc.get_dictionary(parent).ok()?;
        if let Ok(value) = node.get(key) {
            return Some(value.clone());
        }
    }
    None
}

/// Push every reference in `object`, skipping `/Parent` links.
fn references(object: &Object, out: &mut Vec<ObjectId>) {
    match object {
        Object::Reference(id) => out.push(*id),
        Object::Array(items) => {
            for item in items {
                references(item, out);
            }
        }
        Object::Dictionary(dict) => dict_references(dict, out),
        Object::Stream(stream) => dict_references(&stream.dict, out),
        _ => {}
    }
}

fn dict_references(dict: &Dictionary, out: &mut Vec<ObjectId>) {
    for (key, value) in dict.iter() {
        if key.as_slice() != b"Parent" {
            references(value, out);
        }
    }
}

fn shift_references(object: &mut Object, offset: u32) {
    match object {
        Object::Reference(id) => id.0 += offset,
        Object::Array(items) => {
            for item in items {
                shift_references(item, offset);
            }
        }
        Object::Dictionary(dict) => {
            for (_, value) in dict.iter_mut() {
                shift_references(value, offset);
            }
        }
        Object::Stream(stream) => {
            for (_, value) in stream.dict.iter_mut() {
                shift_references(value, offset);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::fixtures::{build_fixture, build_nested_fixture, page_marker};
    use pretty_assertions::assert_eq;

    fn markers(doc: &Document) -> Vec<String> {
        pages_in_order(doc)
            .into_iter()
            .map(|id| page_marker(doc, id))
            .collect()
    }

    #[test]
    fn test_concatenate_preserves_order() {
        let merged = concatenate(build_fixture(3, "A"), [build_fixture(2, "B")]).unwrap();
        assert_eq!(
            markers(&merged),
            vec!["A-Page-1", "A-Page-2", "A-Page-3", "B-Page-1", "B-Page-2"]
        );
    }

    #[test]
    fn test_concatenate_same_document_twice() {
        let merged = concatenate(build_fixture(2, "A"), [build_fixture(2, "A")]).unwrap();
        assert_eq!(
            markers(&merged),
            vec!["A-Page-1", "A-Page-2", "A-Page-1", "A-Page-2"]
        );
    }

    #[test]
    fn test_concatenate_survives_save_and_reload() {
        let mut merged = concatenate(build_fixture(1, "A"), [build_fixture(2, "B")]).unwrap();
        let mut buffer = Vec::new();
        merged.save_to(&mut buffer).unwrap();

        let reloaded = Document::load_mem(&buffer).unwrap();
        assert_eq!(markers(&reloaded), vec!["A-Page-1", "B-Page-1", "B-Page-2"]);
    }

    #[test]
    fn test_concatenate_flattens_nested_tree() {
        let merged = concatenate(build_fixture(1, "A"), [build_nested_fixture(2, "N")]).unwrap();
        let pages = pages_in_order(&merged);
        assert_eq!(markers(&merged), vec!["A-Page-1", "N-Page-1", "N-Page-2"]);

        let nested_page = merged.get_dictionary(pages[1]).unwrap();
        assert!(nested_page.has(b"MediaBox"));
        assert!(nested_page.has(b"Resources"));
    }

    #[test]
    fn test_concatenate_single_document() {
        let merged = concatenate(build_nested_fixture(3, "S"), std::iter::empty()).unwrap();
        assert_eq!(markers(&merged), vec!["S-Page-1", "S-Page-2", "S-Page-3"]);
    }

    #[test]
    fn test_single_page_copies_only_that_page() {
        let doc = build_fixture(3, "K");
        let page_id = pages_in_order(&doc)[1];

        let single = single_page(&doc, page_id).unwrap();
        assert_eq!(markers(&single), vec!["K-Page-2"]);
        // page, content stream, resources and font; no sibling pages
        assert!(single.objects.len() < doc.objects.len());
        assert!(!single.objects.contains_key(&pages_in_order(&doc)[0]));
    }

    #[test]
    fn test_single_page_from_nested_tree_keeps_inherited_attributes() {
        let doc = build_nested_fixture(2, "N");
        let page_id = pages_in_order(&doc)[1];

        let mut single = single_page(&doc, page_id).unwrap();
        let mut buffer = Vec::new();
        single.save_to(&mut buffer).unwrap();
        let reloaded = Document::load_mem(&buffer).unwrap();

        let pages = pages_in_order(&reloaded);
        assert_eq!(markers(&reloaded), vec!["N-Page-2"]);
        let page = reloaded.get_dictionary(pages[0]).unwrap();
        assert!(page.has(b"MediaBox"));
        assert!(page.has(b"Resources"));
    }
}
