//! In-memory PDFs with an outline, for tests.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat};

pub struct Mark {
    pub title: &'static str,
    pub page: Option<u32>,
    pub children: Vec<Mark>,
}

pub fn mark(title: &'static str, page: Option<u32>) -> Mark {
    Mark {
        title,
        page,
        children: Vec::new(),
    }
}

pub fn parent(title: &'static str, page: Option<u32>, children: Vec<Mark>) -> Mark {
    Mark {
        title,
        page,
        children,
    }
}

/// Build a document with `num_pages` pages, each showing "Page N", and the
/// given bookmarks. Bookmark pages are 1-based.
pub fn build_pdf(num_pages: u32, marks: &[Mark]) -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut page_ids = Vec::new();
    for i in 0..num_pages {
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new(
                    "Tf",
                    vec![Object::Name(b"F1".to_vec()), Object::Integer(12)],
                ),
                Operation::new("Td", vec![Object::Integer(100), Object::Integer(700)]),
                Operation::new(
                    "Tj",
                    vec![Object::String(
                        format!("Page {}", i + 1).into_bytes(),
                        StringFormat::Literal,
                    )],
                ),
                Operation::new("ET", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode().unwrap()));

        let page = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Page".to_vec())),
            ("Parent", Object::Reference(pages_id)),
            (
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ]),
            ),
            ("Contents", Object::Reference(content_id)),
        ]);
        page_ids.push(doc.add_object(page));
    }

    let pages = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(num_pages as i64)),
        (
            "Kids",
            Object::Array(page_ids.iter().map(|id| Object::Reference(*id)).collect()),
        ),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);

    if !marks.is_empty() {
        let outlines_id = doc.new_object_id();
        let (first, last) = add_marks(&mut doc, marks, outlines_id, &page_ids);
        let outlines = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Outlines".to_vec())),
            ("First", Object::Reference(first)),
            ("Last", Object::Reference(last)),
            ("Count", Object::Integer(marks.len() as i64)),
        ]);
        doc.objects.insert(outlines_id, Object::Dictionary(outlines));
        catalog.set("Outlines", Object::Reference(outlines_id));
    }

    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

fn add_marks(
    doc: &mut Document,
    marks: &[Mark],
    parent_id: ObjectId,
    page_ids: &[ObjectId],
) -> (ObjectId, ObjectId) {
    let ids: Vec<ObjectId> = marks.iter().map(|_| doc.new_object_id()).collect();

    for (i, m) in marks.iter().enumerate() {
        let mut dict = Dictionary::new();
        dict.set(
            "Title",
            Object::String(m.title.as_bytes().to_vec(), StringFormat::Literal),
        );
        dict.set("Parent", Object::Reference(parent_id));
        if let Some(page) = m.page {
            dict.set(
                "Dest",
                Object::Array(vec![
                    Object::Reference(page_ids[(page - 1) as usize]),
                    Object::Name(b"Fit".to_vec()),
                ]),
            );
        }
        if i > 0 {
            dict.set("Prev", Object::Reference(ids[i - 1]));
        }
        if i + 1 < ids.len() {
            dict.set("Next", Object::Reference(ids[i + 1]));
        }
        if !m.children.is_empty() {
            let (first, last) = add_marks(doc, &m.children, ids[i], page_ids);
            dict.set("First", Object::Reference(first));
            dict.set("Last", Object::Reference(last));
            dict.set("Count", Object::Integer(m.children.len() as i64));
        }
        doc.objects.insert(ids[i], Object::Dictionary(dict));
    }

    (ids[0], ids[ids.len() - 1])
}
