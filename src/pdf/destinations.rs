//! Explicit and named destinations in the merged document

use std::collections::BTreeMap;

use lopdf::{dictionary, Document, Object, ObjectId, StringFormat};

use crate::error::{Error, Result};
use crate::layout::PageSize;

/// Upper edge of a page's `MediaBox`, following an indirect box if needed
pub fn page_top(doc: &Document, page_id: ObjectId) -> Option<f32> {
    let page = doc.get_dictionary(page_id).ok()?;
    let media_box = match page.get(b"MediaBox").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?,
        direct => direct,
    };
    let corners = media_box.as_array().ok()?;
    let ury = corners.get(3)?.as_float().ok()?;
    Some(ury)
}

/// `[page /XYZ 0 top 0]`: left edge, top of the page, zoom unchanged
///
/// Pages without a readable `MediaBox` are assumed to be US Letter.
pub fn page_top_destination(doc: &Document, page_id: ObjectId) -> Vec<Object> {
    let top = page_top(doc, page_id).unwrap_or(PageSize::LETTER.height);
    vec![
        Object::Reference(page_id),
        Object::Name(b"XYZ".to_vec()),
        Object::Integer(0),
        Object::Real(top),
        Object::Integer(0),
    ]
}

/// Named destination for a song's first page
pub fn destination_name(code: &str) -> String {
    format!("song_{}", code)
}

/// Write `names` (name → 0-based page index) into the catalog's `/Names /Dests` tree
///
/// The tree is a single leaf; a [`BTreeMap`] keeps the names sorted as the
/// format requires.
pub fn register_named_destinations(
    doc: &mut Document,
    names: &BTreeMap<String, usize>,
    page_ids: &[ObjectId],
) -> Result<()> {
    if names.is_empty() {
        return Ok(());
    }

    let mut pairs = Vec::with_capacity(names.len() * 2);
    for (name, &page_index) in names {
        let page_id = *page_ids.get(page_index).ok_or_else(|| {
            Error::Assembly(format!(
                "destination {} points past the last page ({})",
                name, page_index
            ))
        })?;
        pairs.push(Object::String(name.as_bytes().to_vec(), StringFormat::Literal));
        pairs.push(Object::Array(page_top_destination(doc, page_id)));
    }

    let dests_id = doc.add_object(dictionary! { "Names" => pairs });
    let names_id = doc.add_object(dictionary! { "Dests" => dests_id });
    doc.catalog_mut()?.set("Names", Object::Reference(names_id));
    Ok(())
}
