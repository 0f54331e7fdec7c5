//! Page-level merging of single documents into one output

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};
use log::debug;

use crate::error::{Error, Result};
use crate::layout::PageSize;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"MediaBox", b"CropBox", b"Resources", b"Rotate"];

/// Accumulates the pages of several documents in order
///
/// Based on the lopdf merge example:
/// https://github.com/J-F-Liu/lopdf/blob/main/examples/merge.rs
///
/// Each appended document is renumbered into a shared id space. Its page
/// objects are kept; its catalog, page tree nodes and outline are dropped
/// and replaced by a single fresh page tree in [`PageMerger::finish`].
#[derive(Debug)]
pub struct PageMerger {
    objects: BTreeMap<ObjectId, Object>,
    page_ids: Vec<ObjectId>,
    next_id: u32,
}

/// The merged document plus its pages in output order
#[derive(Debug)]
pub struct MergedPages {
    pub document: Document,
    pub page_ids: Vec<ObjectId>,
}

impl Default for PageMerger {
    fn default() -> Self {
        Self::new()
    }
}

impl PageMerger {
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            page_ids: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of pages appended so far
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Append every page of `doc`; returns the 0-based index of its first page
    pub fn append(&mut self, mut doc: Document) -> Result<usize> {
        let start = self.page_ids.len();

        // Renumber objects in this document to avoid conflicts
        doc.renumber_objects_with(self.next_id);
        self.next_id = doc.max_id + 1;

        let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
        if pages.is_empty() {
            return Err(Error::Assembly("document has no pages".to_string()));
        }

        for &page_id in &pages {
            inherit_page_attributes(&mut doc, page_id)?;
        }

        debug!(
            "Appending {} page(s) at index {} (objects now below {})",
            pages.len(),
            start,
            self.next_id
        );

        self.page_ids.extend(pages);
        self.objects.extend(
            doc.objects
                .into_iter()
                .filter(|(_, object)| !is_structural(object)),
        );

        Ok(start)
    }

    /// Build the page tree and catalog around the collected pages
    pub fn finish(self) -> MergedPages {
        let mut document = Document::with_version("1.5");
        document.objects.extend(self.objects);

        // Fresh ids must sit above everything imported
        document.max_id = self.next_id - 1;

        let pages_id = document.new_object_id();
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| Object::Reference(id)).collect();

        let mut pages = Dictionary::new();
        pages.set("Type", Object::Name(b"Pages".to_vec()));
        pages.set("Count", Object::Integer(self.page_ids.len() as i64));
        pages.set("Kids", Object::Array(kids));
        document.objects.insert(pages_id, Object::Dictionary(pages));

        for &page_id in &self.page_ids {
            if let Ok(Object::Dictionary(dict)) = document.get_object_mut(page_id) {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = document.add_object(catalog);
        document.trailer.set("Root", Object::Reference(catalog_id));

        MergedPages {
            document,
            page_ids: self.page_ids,
        }
    }
}

/// Catalog, page tree node or outline: rebuilt by the merger, never copied
fn is_structural(object: &Object) -> bool {
    match object {
        Object::Dictionary(dict) => matches!(
            dict.get(b"Type").and_then(Object::as_name),
            Ok(b"Catalog") | Ok(b"Pages") | Ok(b"Outlines")
        ),
        _ => false,
    }
}

/// Copy attributes inherited from ancestor page tree nodes onto the page
///
/// A page that ends up with no `MediaBox` at all gets US Letter.
fn inherit_page_attributes(doc: &mut Document, page_id: ObjectId) -> Result<()> {
    let mut inherited: Vec<(&[u8], Object)> = Vec::new();
    {
        let page = doc.get_dictionary(page_id)?;
        let mut missing: Vec<&[u8]> = INHERITABLE
            .iter()
            .copied()
            .filter(|key| !page.has(key))
            .collect();

        let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();
        // Bounded in case of Parent cycles
        let mut depth = 0;
        while let Some(parent_id) = parent {
            if missing.is_empty() || depth > 64 {
                break;
            }
            let Ok(node) = doc.get_dictionary(parent_id) else {
                break;
            };
            missing.retain(|key| match node.get(key) {
                Ok(value) => {
                    inherited.push((*key, value.clone()));
                    false
                }
                Err(_) => true,
            });
            parent = node.get(b"Parent").and_then(Object::as_reference).ok();
            depth += 1;
        }

        if missing.contains(&&b"MediaBox"[..]) {
            let media_box: Vec<Object> = PageSize::LETTER
                .media_box()
                .iter()
                .map(|&v| Object::Real(v))
                .collect();
            inherited.push((b"MediaBox", Object::Array(media_box)));
        }
    }

    if !inherited.is_empty() {
        let page = doc.get_dictionary_mut(page_id)?;
        for (key, value) in inherited {
            page.set(key.to_vec(), value);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    /// A document whose page tree carries MediaBox and Resources on the root node
    fn doc_with_pages(count: usize) -> Document {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids = Vec::new();
        for _ in 0..count {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
            });
            kids.push(Object::Reference(page_id));
        }
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count as i64,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Resources" => dictionary! {},
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc
    }

    #[test]
    fn test_append_returns_start_indices() {
        let mut merger = PageMerger::new();
        assert_eq!(merger.append(doc_with_pages(1)).unwrap(), 0);
        assert_eq!(merger.append(doc_with_pages(3)).unwrap(), 1);
        assert_eq!(merger.append(doc_with_pages(2)).unwrap(), 4);
        assert_eq!(merger.page_count(), 6);
    }

    #[test]
    fn test_finish_builds_single_page_tree() {
        let mut merger = PageMerger::new();
        merger.append(doc_with_pages(2)).unwrap();
        merger.append(doc_with_pages(1)).unwrap();
        let merged = merger.finish();

        let pages = merged.document.get_pages();
        assert_eq!(pages.len(), 3);
        let ordered: Vec<ObjectId> = pages.into_values().collect();
        assert_eq!(ordered, merged.page_ids);

        let catalogs = merged
            .document
            .objects
            .values()
            .filter(|o| is_structural(o))
            .count();
        // One catalog plus one page tree root
        assert_eq!(catalogs, 2);
    }

    #[test]
    fn test_inherited_attributes_are_copied_to_pages() {
        let mut merger = PageMerger::new();
        merger.append(doc_with_pages(1)).unwrap();
        let merged = merger.finish();

        let page = merged.document.get_dictionary(merged.page_ids[0]).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[2].as_float().unwrap(), 595.0);
        assert!(page.has(b"Resources"));
    }

    #[test]
    fn test_missing_media_box_defaults_to_letter() {
        let mut doc = doc_with_pages(1);
        let pages_id = doc.catalog().unwrap().get(b"Pages").unwrap().as_reference().unwrap();
        doc.get_dictionary_mut(pages_id).unwrap().remove(b"MediaBox");

        let mut merger = PageMerger::new();
        merger.append(doc).unwrap();
        let merged = merger.finish();

        let page = merged.document.get_dictionary(merged.page_ids[0]).unwrap();
        let media_box = page.get(b"MediaBox").unwrap().as_array().unwrap();
        assert_eq!(media_box[3].as_float().unwrap(), 792.0);
    }

    #[test]
    fn test_empty_document_is_rejected() {
        let mut merger = PageMerger::new();
        assert!(merger.append(doc_with_pages(0)).is_err());
        assert_eq!(merger.page_count(), 0);
    }
}
