//! Turning set-list text into catalog codes
//!
//! The free-text → code translation itself is done by an external language
//! model. This module builds the instruction prompt given to it and pulls
//! the codes back out of whatever it answers.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::json;

use crate::catalog::Catalog;
use crate::error::{Error, Result};

lazy_static! {
    static ref DIGIT_RUN: Regex = Regex::new(r"[0-9]+").unwrap();
}

/// Every run of exactly three ASCII digits, in order, duplicates kept
///
/// Runs are maximal: `1234` is one four-digit run and yields nothing.
///
/// ```
/// use setlist_pdf::resolve::extract_codes;
///
/// assert_eq!(extract_codes("004, 008, Intro 025 outro"), vec!["004", "008", "025"]);
/// assert_eq!(extract_codes("12 1234 005"), vec!["005"]);
/// ```
pub fn extract_codes(text: &str) -> Vec<String> {
    DIGIT_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|run| run.len() == 3)
        .map(str::to_string)
        .collect()
}

/// Extract codes, failing when there are none to assemble
pub fn resolve_setlist(text: &str) -> Result<Vec<String>> {
    let codes = extract_codes(text);
    if codes.is_empty() {
        return Err(Error::NoIndicesResolved);
    }
    Ok(codes)
}

/// Instruction prompt for the set-list translator, with the catalog inlined
pub fn build_system_prompt(catalog: &Catalog) -> Result<String> {
    let song_bank = serde_json::to_string_pretty(&json!({ "song_bank": catalog }))?;

    Ok(format!(
        "You are an AI set list assistant.\n\
         You will be given a set list of songs to review. For each song in the set list, \
         respond with a simple, comma-separated list of index numbers (e.g., 004, 008, 025, …) \
         that correspond to each song's entry in the song_bank JSON object provided below.\n\n\
         Instructions:\n\n\
         • The order of the returned index numbers should match the order in which the songs \
         are provided in the set list.\n\
         • Some set list entries may be medleys (multiple songs combined, such as \
         'I Think We're Alone Now/Pretty Woman/MissQueen').\n\
         \u{20} – If the song_bank contains that exact medley as a single entry, return that single index.\n\
         \u{20} – Otherwise, return the indices of each individual song in order.\n\
         • Handle spelling or abbreviation differences intelligently.\n\n\
         Return **only** the ordered, comma-separated index numbers. \
         Do **not** include explanation or extra text.\n\n\
         {}",
        song_bank
    ))
}
