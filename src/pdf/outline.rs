//! Flat document outline (bookmarks), one entry per song

use lopdf::{dictionary, Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::pdf::destinations::page_top_destination;
use crate::pdf::fonts::text_string;

/// A top-level bookmark
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlineItem {
    pub title: String,
    /// 0-based page index in the merged document
    pub page_index: usize,
}

/// Create the outline and hook it into the catalog
///
/// Also sets `PageMode /UseOutlines` so viewers open the bookmark panel.
/// Returns the root `Outlines` id, or `None` when there is nothing to list.
pub fn build_outline(
    doc: &mut Document,
    items: &[OutlineItem],
    page_ids: &[ObjectId],
) -> Result<Option<ObjectId>> {
    if items.is_empty() {
        return Ok(None);
    }

    let root_id = doc.new_object_id();
    let item_ids: Vec<ObjectId> = items.iter().map(|_| doc.new_object_id()).collect();

    for (i, item) in items.iter().enumerate() {
        let page_id = *page_ids.get(item.page_index).ok_or_else(|| {
            Error::Assembly(format!(
                "outline entry '{}' points past the last page ({})",
                item.title, item.page_index
            ))
        })?;

        let mut dict = dictionary! {
            "Title" => text_string(&item.title),
            "Parent" => root_id,
            "Dest" => page_top_destination(doc, page_id),
        };
        if i > 0 {
            dict.set("Prev", item_ids[i - 1]);
        }
        if i + 1 < item_ids.len() {
            dict.set("Next", item_ids[i + 1]);
        }
        doc.objects.insert(item_ids[i], Object::Dictionary(dict));
    }

    doc.objects.insert(
        root_id,
        Object::Dictionary(dictionary! {
            "Type" => "Outlines",
            "First" => item_ids[0],
            "Last" => item_ids[item_ids.len() - 1],
            "Count" => item_ids.len() as i64,
        }),
    );

    let catalog = doc.catalog_mut()?;
    catalog.set("Outlines", Object::Reference(root_id));
    catalog.set("PageMode", Object::Name(b"UseOutlines".to_vec()));

    Ok(Some(root_id))
}
