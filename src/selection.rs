//! Last search results and the single current selection.
//!
//! Both live as JSON in the state directory so that `search`, `select` and
//! `compose` can run as separate invocations:
//!
//! ```text
//! .covercard/
//! ├── results.json     # SearchResponse of the last search
//! └── selection.json   # the one selected CatalogItem
//! ```
//!
//! A new search clears the selection; selecting replaces it. Composition
//! receives the selection explicitly via [`load_selection`].

use crate::types::{CatalogItem, SearchResponse};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const RESULTS_FILENAME: &str = "results.json";
pub const SELECTION_FILENAME: &str = "selection.json";

#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Corrupt state file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("No search results yet: run `covercard search <query>` first")]
    NoResults,
    #[error("No result #{index}: the last search returned {count} result(s)")]
    OutOfRange { index: usize, count: usize },
}

/// Persist the last search results and drop any previous selection.
pub fn save_results(state_dir: &Path, response: &SearchResponse) -> Result<(), SelectionError> {
    fs::create_dir_all(state_dir)?;
    fs::write(
        state_dir.join(RESULTS_FILENAME),
        serde_json::to_string_pretty(response)?,
    )?;
    clear_selection(state_dir)?;
    Ok(())
}

/// The last search results, or `None` before the first search.
pub fn load_results(state_dir: &Path) -> Result<Option<SearchResponse>, SelectionError> {
    read_json(&state_dir.join(RESULTS_FILENAME))
}

/// Pick result `index` (1-based) of `results`.
pub fn pick(results: &SearchResponse, index: usize) -> Result<&CatalogItem, SelectionError> {
    index
        .checked_sub(1)
        .and_then(|i| results.results.get(i))
        .ok_or(SelectionError::OutOfRange {
            index,
            count: results.results.len(),
        })
}

/// Select result `index` (1-based) of the last search and persist it,
/// replacing any previous selection.
pub fn select(state_dir: &Path, index: usize) -> Result<CatalogItem, SelectionError> {
    let results = load_results(state_dir)?.ok_or(SelectionError::NoResults)?;
    let item = pick(&results, index)?.clone();
    fs::write(
        state_dir.join(SELECTION_FILENAME),
        serde_json::to_string_pretty(&item)?,
    )?;
    Ok(item)
}

/// The current selection, or `None` when nothing is selected.
pub fn load_selection(state_dir: &Path) -> Result<Option<CatalogItem>, SelectionError> {
    read_json(&state_dir.join(SELECTION_FILENAME))
}

pub fn clear_selection(state_dir: &Path) -> Result<(), SelectionError> {
    let path = state_dir.join(SELECTION_FILENAME);
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, SelectionError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&content)?))
}
