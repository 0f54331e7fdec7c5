//! Set-list assembly: title page, TOC page and charts merged into one PDF
//!
//! Pages 1 and 2 are generated. Charts follow in set-list order, so the
//! chart at position *k* starts on page `3 + (pages of charts before it)`.
//! Codes without a usable chart are skipped with a warning and leave no
//! trace in the TOC, outline or page count.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use lopdf::{dictionary, Document, Object};
use log::{debug, info, warn};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::layout::TocLayout;
use crate::pdf::charts::{open_chart, ChartDocument};
use crate::pdf::destinations::{destination_name, register_named_destinations};
use crate::pdf::fonts::text_string;
use crate::pdf::links::{attach_toc_links, LinkTarget, PageTopLinker, TocLinker};
use crate::pdf::merge::{MergedPages, PageMerger};
use crate::pdf::outline::{build_outline, OutlineItem};
use crate::pdf::render::{render_title_page, render_toc_page, TocEntry};

/// Page number of the first chart page
const FIRST_CHART_PAGE: usize = 3;

/// Everything needed to build one set-list PDF
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    /// Catalog codes in performance order; repeats allowed
    pub codes: Vec<String>,
    pub gig_name: String,
    pub gig_date: NaiveDate,
    /// Directory holding `{code}.pdf` charts
    pub chart_dir: PathBuf,
}

/// A problem that was worked around during assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssemblyWarning {
    ChartNotFound { code: String, path: PathBuf },
    ChartUnreadable { code: String, path: PathBuf, reason: String },
    ChartEmpty { code: String, path: PathBuf },
    /// More songs than TOC lines; the extra lines run off the page unlinked
    TocOverflow { entries: usize, capacity: usize },
    /// The TOC was left without links
    AnnotationFailed { reason: String },
}

impl fmt::Display for AssemblyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssemblyWarning::ChartNotFound { code, path } => {
                write!(f, "chart for {} not found at {}, skipped", code, path.display())
            }
            AssemblyWarning::ChartUnreadable { code, path, reason } => {
                write!(f, "chart for {} at {} is unreadable ({}), skipped", code, path.display(), reason)
            }
            AssemblyWarning::ChartEmpty { code, path } => {
                write!(f, "chart for {} at {} has no pages, skipped", code, path.display())
            }
            AssemblyWarning::TocOverflow { entries, capacity } => {
                write!(
                    f,
                    "{} songs do not fit the {}-line table of contents; lines past {} are not linked",
                    entries, capacity, capacity
                )
            }
            AssemblyWarning::AnnotationFailed { reason } => {
                write!(f, "table of contents left without links: {}", reason)
            }
        }
    }
}

/// The merged PDF and a record of what went into it
#[derive(Debug, Clone)]
pub struct AssembledSetlist {
    pub bytes: Vec<u8>,
    pub page_count: usize,
    pub toc: Vec<TocEntry>,
    /// Named destination → 0-based page index
    pub destinations: BTreeMap<String, usize>,
    pub outline: Vec<OutlineItem>,
    /// Number of link annotations on the TOC page
    pub links: usize,
    pub warnings: Vec<AssemblyWarning>,
}

/// Assemble with the standard TOC links
pub fn assemble(request: &AssemblyRequest, catalog: &Catalog) -> Result<AssembledSetlist> {
    assemble_with(request, catalog, &PageTopLinker)
}

/// Assemble, planning the TOC links with `linker`
pub fn assemble_with(
    request: &AssemblyRequest,
    catalog: &Catalog,
    linker: &dyn TocLinker,
) -> Result<AssembledSetlist> {
    let layout = TocLayout::default();
    let mut warnings = Vec::new();

    let mut charts: Vec<ChartDocument> = Vec::with_capacity(request.codes.len());
    for code in &request.codes {
        match open_chart(&request.chart_dir, code) {
            Ok(chart) => charts.push(chart),
            Err(warning) => {
                warn!("{}", warning);
                warnings.push(warning);
            }
        }
    }

    let toc = plan_toc(&charts, catalog);

    let capacity = layout.lines_per_page();
    if toc.len() > capacity {
        warnings.push(AssemblyWarning::TocOverflow {
            entries: toc.len(),
            capacity,
        });
    }

    let title_page = render_title_page(&request.gig_name, &request.gig_date)
        .map_err(|e| Error::Assembly(format!("title page could not be rendered: {}", e)))?;
    let toc_page = render_toc_page(&toc, &layout)
        .map_err(|e| Error::Assembly(format!("table of contents could not be rendered: {}", e)))?;
    ensure_single_page(&title_page, "title page")?;
    ensure_single_page(&toc_page, "table of contents")?;

    let mut merger = PageMerger::new();
    merger.append(title_page)?;
    let toc_index = merger.append(toc_page)?;

    let mut destinations = BTreeMap::new();
    let mut outline = Vec::with_capacity(toc.len());
    let mut targets = Vec::with_capacity(toc.len());

    for (line, (chart, entry)) in charts.into_iter().zip(&toc).enumerate() {
        let start = merger.append(chart.document)?;
        debug!(
            "{} ({}) from {} starts at page {}",
            chart.code,
            entry.title,
            chart.path.display(),
            start + 1
        );
        if start + 1 != entry.absolute_start_page {
            return Err(Error::Assembly(format!(
                "{} landed on page {} instead of {}",
                chart.code,
                start + 1,
                entry.absolute_start_page
            )));
        }

        // A repeated song keeps the destination of its first appearance
        destinations.entry(entry.destination_id.clone()).or_insert(start);
        outline.push(OutlineItem {
            title: entry.title.clone(),
            page_index: start,
        });
        if line < capacity {
            targets.push(LinkTarget { line, page_index: start });
        }
    }

    let MergedPages {
        mut document,
        page_ids,
    } = merger.finish();

    register_named_destinations(&mut document, &destinations, &page_ids)?;
    build_outline(&mut document, &outline, &page_ids)?;

    let toc_page_id = page_ids
        .get(toc_index)
        .copied()
        .ok_or_else(|| Error::Assembly("table of contents page is missing".to_string()))?;
    let links = match attach_toc_links(&mut document, linker, &layout, toc_page_id, &page_ids, &targets) {
        Ok(count) => count,
        Err(e) => {
            let warning = AssemblyWarning::AnnotationFailed { reason: e.to_string() };
            warn!("{}", warning);
            warnings.push(warning);
            0
        }
    };

    let info_id = document.add_object(dictionary! {
        "Title" => text_string(&request.gig_name),
        "Producer" => text_string(concat!("setlist-pdf ", env!("CARGO_PKG_VERSION"))),
    });
    document.trailer.set("Info", Object::Reference(info_id));

    // Leftovers of the source catalogs, such as their bookmark items
    let pruned = document.prune_objects();
    if !pruned.is_empty() {
        debug!("Pruned {} unreachable objects", pruned.len());
    }
    document.compress();
    let mut bytes = Vec::new();
    document
        .save_to(&mut bytes)
        .map_err(|e| Error::Assembly(format!("output could not be written: {}", e)))?;

    info!(
        "Assembled '{}': {} pages, {} songs, {} links, {} warnings",
        request.gig_name,
        page_ids.len(),
        toc.len(),
        links,
        warnings.len()
    );

    Ok(AssembledSetlist {
        bytes,
        page_count: page_ids.len(),
        toc,
        destinations,
        outline,
        links,
        warnings,
    })
}

/// TOC rows for the retained charts, with their absolute start pages
fn plan_toc(charts: &[ChartDocument], catalog: &Catalog) -> Vec<TocEntry> {
    let mut next_page = FIRST_CHART_PAGE;
    charts
        .iter()
        .map(|chart| {
            let entry = TocEntry {
                title: catalog.title_for(&chart.code).to_string(),
                absolute_start_page: next_page,
                destination_id: destination_name(&chart.code),
            };
            next_page += chart.page_count;
            entry
        })
        .collect()
}

fn ensure_single_page(doc: &Document, what: &str) -> Result<()> {
    match doc.get_pages().len() {
        1 => Ok(()),
        n => Err(Error::Assembly(format!("{} has {} pages, expected 1", what, n))),
    }
}
