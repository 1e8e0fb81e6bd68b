// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Page reorder — moves the front matter (cover and catalog), which is
// rendered after the body, ahead of it.
//
// With B body pages out of P total, physical order is
// [body 1..=B][cover + catalog B+1..=P] and the final order is
// [B+1, ..., P, 1, ..., B].

use lopdf::{Document, Object, ObjectId};
use reportwerk_core::error::{ReportError, Result};
use tracing::{debug, instrument};

/// Page attributes a page may inherit from an intermediate /Pages node.
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// The permutation that puts the pages after the first `body_pages` in front.
///
/// Entries are 1-based physical page numbers; position `i` of the result is
/// the page that ends up at position `i + 1`.
pub fn front_matter_first(body_pages: usize, total_pages: usize) -> Result<Vec<usize>> {
    if body_pages > total_pages {
        return Err(ReportError::logic(format!(
            "{body_pages} body pages cannot exceed {total_pages} total pages"
        )));
    }
    Ok((body_pages + 1..=total_pages).chain(1..=body_pages).collect())
}

/// Check that `order` is a bijection over `1..=total_pages`.
pub fn validate_permutation(order: &[usize], total_pages: usize) -> Result<()> {
    if order.len() != total_pages {
        return Err(ReportError::logic(format!(
            "page order lists {} pages but the document has {}",
            order.len(),
            total_pages
        )));
    }
    let mut seen = vec![false; total_pages];
    for &page in order {
        if page == 0 || page > total_pages {
            return Err(ReportError::logic(format!(
                "page {page} out of range (document has {total_pages} pages)"
            )));
        }
        if std::mem::replace(&mut seen[page - 1], true) {
            return Err(ReportError::logic(format!("page {page} listed twice")));
        }
    }
    Ok(())
}

/// Rewrite the page tree of `doc` so its pages appear in `order`.
///
/// Every lookup happens before the first write, and the new page list is
/// swapped into the root /Pages node in one assignment. Nested page trees are
/// flattened; attributes inherited from the dropped intermediate nodes are
/// copied onto the pages that relied on them.
#[instrument(skip(doc, order), fields(pages = order.len()))]
pub fn apply_page_order(doc: &mut Document, order: &[usize]) -> Result<()> {
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    validate_permutation(order, pages.len())?;

    let root_pages = root_pages_id(doc)?;

    let mut patches = Vec::with_capacity(pages.len());
    for &page_id in &pages {
        patches.push((page_id, inherited_attributes(doc, page_id, root_pages)?));
    }

    let kids: Vec<Object> = order
        .iter()
        .map(|&page| Object::Reference(pages[page - 1]))
        .collect();

    for (page_id, inherited) in patches {
        let page = page_dict_mut(doc, page_id)?;
        for (key, value) in inherited {
            page.set(key, value);
        }
        page.set("Parent", Object::Reference(root_pages));
    }

    let root = doc
        .get_object_mut(root_pages)
        .and_then(Object::as_dict_mut)
        .map_err(|err| ReportError::rendering(format!("cannot update /Pages: {err}")))?;
    root.set("Count", Object::Integer(kids.len() as i64));
    root.set("Kids", Object::Array(kids));

    debug!(?order, "Page tree reordered");
    Ok(())
}

fn root_pages_id(doc: &Document) -> Result<ObjectId> {
    doc.catalog()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(Object::as_reference)
        .map_err(|err| ReportError::rendering(format!("no /Pages in document catalog: {err}")))
}

fn page_dict_mut(doc: &mut Document, page_id: ObjectId) -> Result<&mut lopdf::Dictionary> {
    doc.get_object_mut(page_id)
        .and_then(Object::as_dict_mut)
        .map_err(|err| ReportError::rendering(format!("page object {page_id:?}: {err}")))
}

/// Attributes `page_id` lacks but inherits from a /Pages node below the root.
fn inherited_attributes(
    doc: &Document,
    page_id: ObjectId,
    root_pages: ObjectId,
) -> Result<Vec<(Vec<u8>, Object)>> {
    let page = doc
        .get_dictionary(page_id)
        .map_err(|err| ReportError::rendering(format!("page object {page_id:?}: {err}")))?;

    let mut found: Vec<(Vec<u8>, Object)> = Vec::new();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
    while let Some(node_id) = parent {
        if node_id == root_pages {
            break;
        }
        let node = doc
            .get_dictionary(node_id)
            .map_err(|err| ReportError::rendering(format!("pages node {node_id:?}: {err}")))?;
        for key in INHERITABLE {
            let already = page.has(key) || found.iter().any(|(k, _)| k.as_slice() == key);
            if already {
                continue;
            }
            if let Ok(value) = node.get(key) {
                found.push((key.to_vec(), value.clone()));
            }
        }
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }
    Ok(found)
}
