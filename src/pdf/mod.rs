//! PDF construction: generated pages, merging and navigation

pub mod assemble;
pub mod charts;
pub mod destinations;
pub mod fonts;
pub mod links;
pub mod merge;
pub mod outline;
pub mod render;

// Re-export commonly used items
pub use assemble::{assemble, assemble_with, AssembledSetlist, AssemblyRequest, AssemblyWarning};
pub use charts::{chart_path, open_chart, ChartDocument, ChartInventory, DEFAULT_CHART_DIR};
pub use links::{LinkTarget, PageTopLinker, TocLinker};
pub use outline::OutlineItem;
pub use render::{render_title_page, render_toc_page, TocEntry};
