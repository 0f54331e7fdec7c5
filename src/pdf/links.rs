//! Clickable TOC lines
//!
//! Links are attached in two steps. A [`TocLinker`] plans every annotation
//! against the merged document without touching it; [`attach_toc_links`]
//! commits the plan only if all of it succeeded. A failed plan leaves the
//! TOC page exactly as rendered.

use lopdf::{dictionary, Dictionary, Document, Object, ObjectId};
use log::debug;

use crate::error::{Error, Result};
use crate::layout::TocLayout;
use crate::pdf::destinations::page_top_destination;

/// One TOC line and the page it should jump to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkTarget {
    /// 0-based TOC line
    pub line: usize,
    /// 0-based page index in the merged document
    pub page_index: usize,
}

/// Builds link annotation dictionaries for the TOC page
pub trait TocLinker {
    /// Plan one annotation per target, in order, or fail as a whole
    fn plan(
        &self,
        doc: &Document,
        layout: &TocLayout,
        page_ids: &[ObjectId],
        targets: &[LinkTarget],
    ) -> Result<Vec<Dictionary>>;
}

/// Borderless `/Link` over the whole line, jumping to the top of the target page
#[derive(Debug, Clone, Copy, Default)]
pub struct PageTopLinker;

impl TocLinker for PageTopLinker {
    fn plan(
        &self,
        doc: &Document,
        layout: &TocLayout,
        page_ids: &[ObjectId],
        targets: &[LinkTarget],
    ) -> Result<Vec<Dictionary>> {
        targets
            .iter()
            .map(|target| {
                let page_id = *page_ids.get(target.page_index).ok_or_else(|| {
                    Error::Annotation(format!(
                        "line {} targets page index {} of {}",
                        target.line,
                        target.page_index,
                        page_ids.len()
                    ))
                })?;
                let rect: Vec<Object> = layout
                    .link_rect(target.line)
                    .iter()
                    .map(|&v| Object::Real(v))
                    .collect();
                Ok(dictionary! {
                    "Type" => "Annot",
                    "Subtype" => "Link",
                    "Rect" => rect,
                    "Border" => vec![0.into(), 0.into(), 0.into()],
                    "Dest" => page_top_destination(doc, page_id),
                })
            })
            .collect()
    }
}

/// Plan with `linker` and add the annotations to `toc_page`
///
/// Returns the number of links attached. On error the document is unchanged.
pub fn attach_toc_links(
    doc: &mut Document,
    linker: &dyn TocLinker,
    layout: &TocLayout,
    toc_page: ObjectId,
    page_ids: &[ObjectId],
    targets: &[LinkTarget],
) -> Result<usize> {
    if targets.is_empty() {
        return Ok(0);
    }

    let planned = linker.plan(doc, layout, page_ids, targets)?;
    if planned.len() != targets.len() {
        return Err(Error::Annotation(format!(
            "planned {} links for {} TOC lines",
            planned.len(),
            targets.len()
        )));
    }

    // Everything that can fail is checked before the first object is added
    let mut annots = match doc.get_dictionary(toc_page)?.get(b"Annots") {
        Ok(Object::Array(existing)) => existing.clone(),
        Ok(_) => {
            return Err(Error::Annotation(
                "TOC page has a non-array /Annots entry".to_string(),
            ))
        }
        Err(_) => Vec::new(),
    };

    for mut annotation in planned {
        annotation.set("P", Object::Reference(toc_page));
        annots.push(Object::Reference(doc.add_object(annotation)));
    }
    let count = targets.len();
    doc.get_dictionary_mut(toc_page)?.set("Annots", Object::Array(annots));

    debug!("Attached {} TOC link(s)", count);
    Ok(count)
}
