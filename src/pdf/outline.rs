use crate::error::{Result, SplitError};
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;

/// Reference chains longer than this are treated as unresolvable.
const MAX_DEST_HOPS: usize = 8;

/// One bookmark entry. `target_page` is the 1-based physical page the
/// bookmark points at, or `None` when its destination cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineNode {
    pub title: String,
    pub target_page: Option<u32>,
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    #[cfg(test)]
    pub fn leaf(title: &str, target_page: u32) -> Self {
        OutlineNode {
            title: title.to_string(),
            target_page: Some(target_page),
            children: Vec::new(),
        }
    }

    #[cfg(test)]
    pub fn branch(title: &str, target_page: Option<u32>, children: Vec<OutlineNode>) -> Self {
        OutlineNode {
            title: title.to_string(),
            target_page,
            children,
        }
    }
}

/// Read the bookmark tree of a loaded document. A document without
/// `/Outlines` yields an empty list.
pub fn extract_outline_from_doc(doc: &Document) -> Result<Vec<OutlineNode>> {
    let catalog = doc.catalog().map_err(SplitError::Outline)?;

    let outlines = match catalog.get(b"Outlines") {
        Ok(Object::Reference(r)) => match doc.get_dictionary(*r) {
            Ok(d) => d,
            Err(_) => return Ok(Vec::new()),
        },
        Ok(Object::Dictionary(d)) => d,
        _ => return Ok(Vec::new()),
    };

    let first_ref = match outlines.get(b"First") {
        Ok(Object::Reference(r)) => *r,
        _ => return Ok(Vec::new()),
    };

    let page_map = build_page_map(doc);
    let mut visited = HashSet::new();

    Ok(parse_outline_items(doc, first_ref, &page_map, &mut visited))
}

fn parse_outline_items(
    doc: &Document,
    first_id: ObjectId,
    page_map: &[(ObjectId, u32)],
    visited: &mut HashSet<ObjectId>,
) -> Vec<OutlineNode> {
    let mut nodes = Vec::new();
    let mut current_id = Some(first_id);

    while let Some(id) = current_id {
        // Malformed files can link /Next or /First back into the tree.
        if !visited.insert(id) {
            tracing::warn!(object = ?id, "outline loops back on itself, stopping traversal");
            break;
        }

        let dict = match doc.get_dictionary(id) {
            Ok(d) => d,
            Err(_) => break,
        };

        let title = match dict.get(b"Title") {
            Ok(Object::String(bytes, _)) => decode_pdf_string(bytes),
            _ => String::new(),
        };

        let target_page = get_destination_page(doc, dict, page_map);

        let children = match dict.get(b"First") {
            Ok(Object::Reference(child_ref)) => {
                parse_outline_items(doc, *child_ref, page_map, visited)
            }
            _ => Vec::new(),
        };

        nodes.push(OutlineNode {
            title,
            target_page,
            children,
        });

        current_id = match dict.get(b"Next") {
            Ok(Object::Reference(r)) => Some(*r),
            _ => None,
        };
    }

    nodes
}

fn get_destination_page(
    doc: &Document,
    dict: &Dictionary,
    page_map: &[(ObjectId, u32)],
) -> Option<u32> {
    if let Ok(dest) = dict.get(b"Dest") {
        return resolve_destination(doc, dest, page_map, 0);
    }

    let action = match dict.get(b"A") {
        Ok(Object::Reference(action_ref)) => doc.get_dictionary(*action_ref).ok()?,
        Ok(Object::Dictionary(action_dict)) => action_dict,
        _ => return None,
    };

    match action.get(b"S") {
        Ok(Object::Name(action_type)) if action_type == b"GoTo" => {
            let dest = action.get(b"D").ok()?;
            resolve_destination(doc, dest, page_map, 0)
        }
        _ => None,
    }
}

fn resolve_destination(
    doc: &Document,
    dest: &Object,
    page_map: &[(ObjectId, u32)],
    hops: usize,
) -> Option<u32> {
    if hops > MAX_DEST_HOPS {
        return None;
    }

    match dest {
        Object::String(name, _) | Object::Name(name) => {
            resolve_named_destination(doc, name, page_map, hops + 1)
        }
        Object::Array(arr) => get_page_from_dest_array(arr, page_map),
        // Named-destination values may be wrapped as << /D [...] >>
        Object::Dictionary(d) => {
            let inner = d.get(b"D").ok()?;
            resolve_destination(doc, inner, page_map, hops + 1)
        }
        Object::Reference(r) => {
            let obj = doc.get_object(*r).ok()?;
            resolve_destination(doc, obj, page_map, hops + 1)
        }
        _ => None,
    }
}

fn resolve_named_destination(
    doc: &Document,
    name: &[u8],
    page_map: &[(ObjectId, u32)],
    hops: usize,
) -> Option<u32> {
    let catalog = doc.catalog().ok()?;

    if let Ok(Object::Reference(names_ref)) = catalog.get(b"Names") {
        if let Ok(names_dict) = doc.get_dictionary(*names_ref) {
            if let Ok(Object::Reference(dests_ref)) = names_dict.get(b"Dests") {
                let mut seen = HashSet::new();
                if let Some(dest) = search_name_tree(doc, *dests_ref, name, &mut seen) {
                    return resolve_destination(doc, dest, page_map, hops);
                }
            }
        }
    }

    // Older documents keep a flat /Dests dictionary in the catalog.
    if let Ok(Object::Reference(dests_ref)) = catalog.get(b"Dests") {
        if let Ok(dests_dict) = doc.get_dictionary(*dests_ref) {
            if let Ok(dest) = dests_dict.get(name) {
                return resolve_destination(doc, dest, page_map, hops);
            }
        }
    }

    None
}

fn search_name_tree<'a>(
    doc: &'a Document,
    node_id: ObjectId,
    name: &[u8],
    seen: &mut HashSet<ObjectId>,
) -> Option<&'a Object> {
    if !seen.insert(node_id) {
        return None;
    }
    let dict = doc.get_dictionary(node_id).ok()?;

    if let Ok(Object::Array(names)) = dict.get(b"Names") {
        for chunk in names.chunks(2) {
            if let [Object::String(key, _), value] = chunk {
                if key == name {
                    return Some(value);
                }
            }
        }
    }

    if let Ok(Object::Array(kids)) = dict.get(b"Kids") {
        for kid in kids {
            if let Object::Reference(kid_ref) = kid {
                if let Some(dest) = search_name_tree(doc, *kid_ref, name, seen) {
                    return Some(dest);
                }
            }
        }
    }

    None
}

fn get_page_from_dest_array(arr: &[Object], page_map: &[(ObjectId, u32)]) -> Option<u32> {
    // [page_ref /XYZ left top zoom] and friends
    match arr.first() {
        Some(Object::Reference(page_ref)) => page_map
            .iter()
            .find(|(id, _)| id == page_ref)
            .map(|(_, page_num)| *page_num),
        _ => None,
    }
}

fn build_page_map(doc: &Document) -> Vec<(ObjectId, u32)> {
    let mut pages: Vec<_> = doc.get_pages().into_iter().collect();
    pages.sort_by_key(|(num, _)| *num);
    pages.into_iter().map(|(num, id)| (id, num)).collect()
}

fn decode_pdf_string(bytes: &[u8]) -> String {
    if let [0xFE, 0xFF, rest @ ..] = bytes {
        let units: Vec<u16> = rest
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units)
    } else if let [0xEF, 0xBB, 0xBF, rest @ ..] = bytes {
        String::from_utf8_lossy(rest).into_owned()
    } else {
        // PDFDocEncoding, approximated as Latin-1
        bytes.iter().map(|&b| b as char).collect()
    }
}
