//! Song catalog: code → title/kind lookup
//!
//! The catalog is persisted as a JSON object keyed by code:
//!
//! ```json
//! { "001": { "title": "Ain't too Proud to Beg/My Girl", "type": "medley" } }
//! ```
//!
//! Loading never fails: a missing or unreadable store yields the built-in
//! defaults plus a diagnostic. Saving is explicit and atomic.

use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Default location of the catalog store
pub const DEFAULT_CATALOG_PATH: &str = "song_data.json";

/// Whether a catalog entry is one song or several played as one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SongKind {
    Single,
    Medley,
    /// Any other free-form `type` value found in the store
    Other(String),
}

impl From<String> for SongKind {
    fn from(value: String) -> Self {
        match value.trim() {
            "" | "single" => SongKind::Single,
            "medley" => SongKind::Medley,
            other => SongKind::Other(other.to_string()),
        }
    }
}

impl From<SongKind> for String {
    fn from(kind: SongKind) -> Self {
        kind.to_string()
    }
}

impl fmt::Display for SongKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SongKind::Single => f.write_str("single"),
            SongKind::Medley => f.write_str("medley"),
            SongKind::Other(kind) => f.write_str(kind),
        }
    }
}

/// One catalog record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: String,
    #[serde(rename = "type", default = "default_kind")]
    pub kind: SongKind,
}

fn default_kind() -> SongKind {
    SongKind::Single
}

impl CatalogEntry {
    pub fn new(title: impl Into<String>, kind: SongKind) -> Self {
        Self { title: title.into(), kind }
    }
}

/// Why the persisted store was not used
#[derive(Debug)]
pub enum CatalogLoadError {
    /// No store at the given path
    Missing(PathBuf),
    /// The store exists but could not be read
    Unreadable { path: PathBuf, reason: String },
    /// The store is not a valid catalog document
    Corrupt { path: PathBuf, reason: String },
}

impl fmt::Display for CatalogLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogLoadError::Missing(path) => {
                write!(f, "no catalog at {}, using defaults", path.display())
            }
            CatalogLoadError::Unreadable { path, reason } => {
                write!(f, "could not read {} ({}), using defaults", path.display(), reason)
            }
            CatalogLoadError::Corrupt { path, reason } => {
                write!(f, "catalog {} is invalid ({}), using defaults", path.display(), reason)
            }
        }
    }
}

/// Result of [`Catalog::load`]: always a usable catalog
#[derive(Debug)]
pub struct CatalogLoad {
    pub catalog: Catalog,
    /// Set when the defaults were used instead of the store
    pub diagnostic: Option<CatalogLoadError>,
}

/// The code → entry mapping
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: BTreeMap<String, CatalogEntry>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in song bank used when no store is available
    pub fn defaults() -> Self {
        let songs: [(&str, &str, SongKind); 42] = [
            ("001", "Ain't too Proud to Beg/My Girl", SongKind::Medley),
            ("002", "Alive", SongKind::Single),
            ("003", "Are you Gonna Be My Girl", SongKind::Single),
            ("004", "Back in the USSR", SongKind::Single),
            ("005", "Besame Mucho", SongKind::Single),
            ("006", "Brown Eyed Girl/Rockin Robin", SongKind::Medley),
            ("007", "Comfortably Numb", SongKind::Single),
            ("008", "Faith", SongKind::Single),
            ("009", "Fun, Fun, Fun", SongKind::Single),
            ("010", "Fat Bottomed Girls", SongKind::Single),
            ("011", "Gimme some Lovin", SongKind::Single),
            ("012", "Gimme Three Steps", SongKind::Single),
            ("013", "Hungry Like the Wolf", SongKind::Single),
            ("014", "I Think We're Alone Now", SongKind::Single),
            ("015", "I Want to Be Sedated", SongKind::Single),
            ("016", "I'm a Believer", SongKind::Single),
            ("017", "In the End", SongKind::Single),
            ("018", "Keep Your Hands to Yourself", SongKind::Single),
            ("019", "Kryptonite", SongKind::Single),
            ("020", "Lean on Me", SongKind::Single),
            ("021", "Let it Be", SongKind::Single),
            ("022", "Mississippi Queen", SongKind::Single),
            ("023", "Pink Houses", SongKind::Single),
            ("024", "Play That Funky Music", SongKind::Single),
            ("025", "Plush", SongKind::Single),
            ("026", "Pour Some Sugar on Me", SongKind::Single),
            ("027", "Pretty Woman", SongKind::Single),
            ("028", "Runaround Sue", SongKind::Single),
            ("029", "Santeria", SongKind::Single),
            ("030", "Smooth Criminal", SongKind::Single),
            ("031", "Summer of '69", SongKind::Single),
            ("032", "The Middle", SongKind::Single),
            ("033", "Three Little Birds", SongKind::Single),
            ("034", "Wagon Wheel", SongKind::Single),
            ("035", "What I Like About You", SongKind::Single),
            ("036", "Yellow Ledbetter", SongKind::Single),
            ("037", "It Don't Matter to Me", SongKind::Single),
            ("038", "Ticket to Ride", SongKind::Single),
            ("039", "For Lovin' Me", SongKind::Single),
            ("040", "Besame Mucho", SongKind::Single),
            ("041", "Always on My Mind", SongKind::Single),
            ("042", "Two of Us", SongKind::Single),
        ];

        songs
            .into_iter()
            .map(|(code, title, kind)| (code.to_string(), CatalogEntry::new(title, kind)))
            .collect()
    }

    /// Load the store at `path`, falling back to [`Catalog::defaults`]
    pub fn load(path: &Path) -> CatalogLoad {
        let fallback = |diagnostic: CatalogLoadError| {
            warn!("{}", diagnostic);
            CatalogLoad { catalog: Catalog::defaults(), diagnostic: Some(diagnostic) }
        };

        if !path.exists() {
            let diagnostic = CatalogLoadError::Missing(path.to_path_buf());
            debug!("{}", diagnostic);
            return CatalogLoad { catalog: Catalog::defaults(), diagnostic: Some(diagnostic) };
        }

        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                return fallback(CatalogLoadError::Unreadable {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })
            }
        };

        match serde_json::from_str::<Catalog>(&text) {
            Ok(catalog) => {
                debug!("Loaded {} songs from {}", catalog.len(), path.display());
                CatalogLoad { catalog, diagnostic: None }
            }
            Err(e) => fallback(CatalogLoadError::Corrupt {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }),
        }
    }

    /// Atomically replace the store at `path` with this catalog
    ///
    /// The JSON is written to a temporary file next to `path` and renamed
    /// over it, so a failure leaves the previous store untouched.
    pub fn save(&self, path: &Path) -> Result<()> {
        let persistence = |reason: String| Error::Persistence { path: path.to_path_buf(), reason };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| persistence(e.to_string()))?;
        serde_json::to_writer_pretty(&mut temp, self).map_err(|e| persistence(e.to_string()))?;
        temp.write_all(b"\n").map_err(|e| persistence(e.to_string()))?;
        temp.as_file().sync_all().map_err(|e| persistence(e.to_string()))?;
        temp.persist(path).map_err(|e| persistence(e.error.to_string()))?;

        info!("Saved {} songs to {}", self.len(), path.display());
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&CatalogEntry> {
        self.entries.get(code)
    }

    /// Display title for `code`, or the code itself when it is not catalogued
    pub fn title_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.entries.get(code).map(|e| e.title.as_str()).unwrap_or(code)
    }

    pub fn insert(&mut self, code: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(code.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in code order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CatalogEntry)> {
        self.entries.iter().map(|(code, entry)| (code.as_str(), entry))
    }
}

impl FromIterator<(String, CatalogEntry)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, CatalogEntry)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// One row of a catalog import table
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ImportRow {
    #[serde(default)]
    pub index: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

/// Build a catalog from import rows
///
/// Rows without an index or title are dropped. A blank or absent type is
/// `single`. Later rows replace earlier rows with the same index.
pub fn import_from_table<I>(rows: I) -> Catalog
where
    I: IntoIterator<Item = ImportRow>,
{
    let mut catalog = Catalog::new();
    let mut dropped = 0usize;

    for row in rows {
        let (Some(code), Some(title)) = (non_blank(row.index.as_ref()), non_blank(row.title.as_ref()))
        else {
            dropped += 1;
            continue;
        };
        let kind = non_blank(row.kind.as_ref())
            .map(|k| SongKind::from(k.to_string()))
            .unwrap_or(SongKind::Single);
        catalog.insert(code, CatalogEntry::new(title, kind));
    }

    if dropped > 0 {
        debug!("Dropped {} import rows without index or title", dropped);
    }
    catalog
}

/// Read CSV rows with `index`, `title` and optional `type` columns
pub fn read_table<R: Read>(reader: R) -> Result<Vec<ImportRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for record in csv_reader.deserialize::<ImportRow>() {
        rows.push(record?);
    }
    Ok(rows)
}

/// Read a CSV table and build a catalog, failing if no row is usable
pub fn import_csv<R: Read>(reader: R) -> Result<Catalog> {
    let catalog = import_from_table(read_table(reader)?);
    if catalog.is_empty() {
        return Err(Error::NoValidRows);
    }
    Ok(catalog)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn row(index: &str, title: &str, kind: Option<&str>) -> ImportRow {
        ImportRow {
            index: Some(index.to_string()),
            title: Some(title.to_string()),
            kind: kind.map(str::to_string),
        }
    }

    #[test]
    fn test_defaults_are_stable() {
        let catalog = Catalog::defaults();
        assert_eq!(catalog.len(), 42);
        assert_eq!(catalog.get("004").unwrap().title, "Back in the USSR");
        assert_eq!(catalog.get("006").unwrap().kind, SongKind::Medley);
        assert_eq!(catalog.get("020").unwrap().title, "Lean on Me");
        assert_eq!(catalog.get("034").unwrap().title, "Wagon Wheel");
        // 040 repeats 005's title under its own code
        assert_eq!(catalog.get("040").unwrap().title, "Besame Mucho");
        assert_eq!(catalog.get("005").unwrap().title, "Besame Mucho");
        assert_eq!(catalog.get("042").unwrap().title, "Two of Us");
        assert!(catalog.get("043").is_none());
        assert_eq!(catalog, Catalog::defaults());
    }

    #[test]
    fn test_title_falls_back_to_code() {
        let catalog = Catalog::defaults();
        assert_eq!(catalog.title_for("008"), "Faith");
        assert_eq!(catalog.title_for("999"), "999");
    }

    #[test]
    fn test_import_drops_incomplete_rows() {
        let rows = vec![
            ImportRow { index: Some("101".into()), title: Some("Song A".into()), kind: None },
            ImportRow { index: Some("".into()), title: Some("Song B".into()), kind: None },
            ImportRow { index: Some("102".into()), title: None, kind: None },
        ];
        let catalog = import_from_table(rows);

        assert_eq!(catalog.len(), 1);
        let entry = catalog.get("101").unwrap();
        assert_eq!(entry.title, "Song A");
        assert_eq!(entry.kind, SongKind::Single);
    }

    #[test]
    fn test_import_kind_defaults_and_free_form() {
        let catalog = import_from_table(vec![
            row("201", "Blank type", Some("  ")),
            row("202", "Medley", Some("medley")),
            row("203", "Encore", Some("encore")),
        ]);
        assert_eq!(catalog.get("201").unwrap().kind, SongKind::Single);
        assert_eq!(catalog.get("202").unwrap().kind, SongKind::Medley);
        assert_eq!(catalog.get("203").unwrap().kind, SongKind::Other("encore".into()));
    }

    #[test]
    fn test_import_later_rows_win() {
        let catalog = import_from_table(vec![row("301", "First", None), row("301", "Second", None)]);
        assert_eq!(catalog.get("301").unwrap().title, "Second");
    }

    #[test]
    fn test_read_csv_with_optional_type_column() {
        let csv = "index,title,type\n001,Alive,\n002,Medley A/B,medley\n,No Index,single\n";
        let catalog = import_csv(csv.as_bytes()).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.get("001").unwrap().kind, SongKind::Single);
        assert_eq!(catalog.get("002").unwrap().kind, SongKind::Medley);

        let no_type = "index,title\n010,Faith\n";
        let catalog = import_csv(no_type.as_bytes()).unwrap();
        assert_eq!(catalog.get("010").unwrap().kind, SongKind::Single);
    }

    #[test]
    fn test_import_csv_with_no_valid_rows() {
        let csv = "index,title,type\n,Nothing,single\n";
        assert!(matches!(import_csv(csv.as_bytes()), Err(Error::NoValidRows)));
    }

    #[test]
    fn test_load_missing_store_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let load = Catalog::load(&dir.path().join("song_data.json"));
        assert_eq!(load.catalog, Catalog::defaults());
        assert!(matches!(load.diagnostic, Some(CatalogLoadError::Missing(_))));
    }

    #[test]
    fn test_load_corrupt_store_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song_data.json");
        std::fs::write(&path, "{ not json").unwrap();

        let load = Catalog::load(&path);
        assert_eq!(load.catalog, Catalog::defaults());
        assert!(matches!(load.diagnostic, Some(CatalogLoadError::Corrupt { .. })));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("song_data.json");
        let catalog = import_from_table(vec![
            row("101", "Song A", None),
            row("102", "Song B/Song C", Some("medley")),
        ]);

        catalog.save(&path).unwrap();
        let load = Catalog::load(&path);
        assert!(load.diagnostic.is_none());
        assert_eq!(load.catalog, catalog);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"type\": \"medley\""));
    }

    #[test]
    fn test_save_into_missing_directory_fails_cleanly() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("song_data.json");
        let result = Catalog::defaults().save(&path);
        assert!(matches!(result, Err(Error::Persistence { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_store_without_type_field() {
        let catalog: Catalog = serde_json::from_str(r#"{"050": {"title": "Untyped"}}"#).unwrap();
        assert_eq!(catalog.get("050").unwrap().kind, SongKind::Single);
    }
}
