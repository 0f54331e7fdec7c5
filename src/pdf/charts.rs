//! Chart PDFs: locating, opening and taking inventory

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use glob::{glob, Pattern};
use lopdf::Document;
use log::debug;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::pdf::assemble::AssemblyWarning;

/// Default directory holding `{code}.pdf` charts
pub const DEFAULT_CHART_DIR: &str = "song-bank";

/// A chart that was found and parsed
#[derive(Debug)]
pub struct ChartDocument {
    pub code: String,
    pub path: PathBuf,
    pub document: Document,
    pub page_count: usize,
}

/// Where the chart for `code` is expected
pub fn chart_path(chart_dir: &Path, code: &str) -> PathBuf {
    chart_dir.join(format!("{}.pdf", code))
}

/// Open the chart for `code`
///
/// A missing, unparsable or page-less chart comes back as the warning the
/// assembler records for it.
pub fn open_chart(chart_dir: &Path, code: &str) -> std::result::Result<ChartDocument, AssemblyWarning> {
    let path = chart_path(chart_dir, code);
    if !path.is_file() {
        return Err(AssemblyWarning::ChartNotFound {
            code: code.to_string(),
            path,
        });
    }

    let document = match Document::load(&path) {
        Ok(document) => document,
        Err(e) => {
            return Err(AssemblyWarning::ChartUnreadable {
                code: code.to_string(),
                path,
                reason: e.to_string(),
            })
        }
    };

    let page_count = document.get_pages().len();
    if page_count == 0 {
        return Err(AssemblyWarning::ChartEmpty {
            code: code.to_string(),
            path,
        });
    }

    debug!("Opened {} ({} pages)", path.display(), page_count);
    Ok(ChartDocument {
        code: code.to_string(),
        path,
        document,
        page_count,
    })
}

/// Which catalog songs have a chart on disk
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartInventory {
    /// Catalog codes with a chart file
    pub present: Vec<String>,
    /// Catalog codes without a chart file
    pub missing: Vec<String>,
    /// Chart files whose name is not a catalog code
    pub uncatalogued: Vec<String>,
}

impl ChartInventory {
    /// Compare the catalog with the `*.pdf` files in `chart_dir`
    pub fn scan(catalog: &Catalog, chart_dir: &Path) -> Result<Self> {
        let pattern = format!("{}/*.pdf", Pattern::escape(&chart_dir.to_string_lossy()));

        let mut on_disk = BTreeSet::new();
        for entry in glob(&pattern)? {
            let Ok(path) = entry else { continue };
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                on_disk.insert(stem.to_string());
            }
        }

        let mut inventory = ChartInventory::default();
        for (code, _) in catalog.iter() {
            if on_disk.remove(code) {
                inventory.present.push(code.to_string());
            } else {
                inventory.missing.push(code.to_string());
            }
        }
        inventory.uncatalogued = on_disk.into_iter().collect();
        Ok(inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntry, SongKind};
    use lopdf::{dictionary, Object};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_chart_path() {
        assert_eq!(chart_path(Path::new("song-bank"), "004"), Path::new("song-bank/004.pdf"));
    }

    #[test]
    fn test_open_missing_chart() {
        let dir = TempDir::new().unwrap();
        let result = open_chart(dir.path(), "099");
        assert!(matches!(result, Err(AssemblyWarning::ChartNotFound { .. })));
    }

    #[test]
    fn test_open_unreadable_chart() {
        let dir = TempDir::new().unwrap();
        fs::write(chart_path(dir.path(), "003"), b"not a pdf").unwrap();
        let result = open_chart(dir.path(), "003");
        assert!(matches!(result, Err(AssemblyWarning::ChartUnreadable { .. })));
    }

    #[test]
    fn test_open_chart_without_pages() {
        let dir = TempDir::new().unwrap();
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.add_object(dictionary! {
            "Type" => "Pages",
            "Kids" => Vec::<Object>::new(),
            "Count" => 0,
        });
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(chart_path(dir.path(), "004")).unwrap();

        let result = open_chart(dir.path(), "004");
        assert!(matches!(
            result,
            Err(AssemblyWarning::ChartEmpty { ref code, .. }) if code == "004"
        ));
    }

    #[test]
    fn test_open_chart_records_its_path() {
        let dir = TempDir::new().unwrap();
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(chart_path(dir.path(), "008")).unwrap();

        let chart = open_chart(dir.path(), "008").unwrap();
        assert_eq!(chart.code, "008");
        assert_eq!(chart.path, chart_path(dir.path(), "008"));
        assert_eq!(chart.page_count, 1);
    }

    #[test]
    fn test_inventory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("001.pdf"), b"").unwrap();
        fs::write(dir.path().join("777.pdf"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();

        let catalog: Catalog = [
            ("001".to_string(), CatalogEntry::new("Alive", SongKind::Single)),
            ("002".to_string(), CatalogEntry::new("Faith", SongKind::Single)),
        ]
        .into_iter()
        .collect();

        let inventory = ChartInventory::scan(&catalog, dir.path()).unwrap();
        assert_eq!(inventory.present, vec!["001"]);
        assert_eq!(inventory.missing, vec!["002"]);
        assert_eq!(inventory.uncatalogued, vec!["777"]);
    }
}
