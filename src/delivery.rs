//! Writing the assembled set list to disk

use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::info;
use tempfile::NamedTempFile;

use crate::date::format_sortable;
use crate::error::{Error, Result};
use crate::pdf::AssembledSetlist;

/// `{gig name, spaces → underscores}_{YYYY-MM-DD}.pdf`
///
/// ```
/// use chrono::NaiveDate;
/// use setlist_pdf::delivery::suggested_filename;
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 7).unwrap();
/// assert_eq!(suggested_filename("Friday Night Live", &date), "Friday_Night_Live_2026-03-07.pdf");
/// ```
pub fn suggested_filename(gig_name: &str, gig_date: &NaiveDate) -> String {
    format!("{}_{}.pdf", gig_name.replace(' ', "_"), format_sortable(gig_date))
}

/// Where the output goes: an explicit file, or the suggested name in `output_dir`
pub fn output_path(
    gig_name: &str,
    gig_date: &NaiveDate,
    explicit: Option<&Path>,
    output_dir: &Path,
) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => output_dir.join(suggested_filename(gig_name, gig_date)),
    }
}

/// Write the PDF bytes to `path`, replacing any existing file atomically
pub fn deliver(assembled: &AssembledSetlist, path: &Path) -> Result<PathBuf> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !dir.is_dir() {
        return Err(Error::FileNotFound(dir.to_path_buf()));
    }

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(&assembled.bytes)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| Error::Io(e.error))?;

    info!("Wrote {} ({} pages)", path.display(), assembled.page_count);
    Ok(path.to_path_buf())
}
