//! Set-list PDF builder
//!
//! Turns an ordered list of song codes into one performance-ready PDF:
//! - a title page with the gig name and date
//! - a table of contents whose lines link to each song
//! - every song's chart, merged in set-list order, with bookmarks and
//!   named destinations
//!
//! Song titles come from a small JSON [`catalog`]. Free-text set lists are
//! mapped to codes by an external language model; [`resolve`] builds its
//! prompt and reads the codes back out of its reply.
//!
//! # Example
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use setlist_pdf::catalog::Catalog;
//! use setlist_pdf::pdf::{assemble, AssemblyRequest};
//! use setlist_pdf::resolve::resolve_setlist;
//! use std::path::PathBuf;
//!
//! let request = AssemblyRequest {
//!     codes: resolve_setlist("004, 008, 025").unwrap(),
//!     gig_name: "Friday Night".to_string(),
//!     gig_date: NaiveDate::from_ymd_opt(2026, 3, 7).unwrap(),
//!     chart_dir: PathBuf::from("song-bank"),
//! };
//!
//! let assembled = assemble(&request, &Catalog::defaults()).expect("Failed to assemble");
//! println!("{} pages", assembled.page_count);
//! ```

pub mod catalog;
pub mod config;
pub mod date;
pub mod delivery;
pub mod error;
pub mod layout;
pub mod pdf;
pub mod resolve;

// Re-export commonly used items
pub use config::Config;
pub use error::{Error, Result};
