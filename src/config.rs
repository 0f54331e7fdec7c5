//! Locations of the catalog store and the chart directory

use std::env;
use std::path::PathBuf;

use crate::catalog::{Catalog, CatalogLoad, DEFAULT_CATALOG_PATH};
use crate::pdf::DEFAULT_CHART_DIR;

/// Environment variable overriding the catalog store path
pub const CATALOG_ENV: &str = "SETLIST_CATALOG";
/// Environment variable overriding the chart directory
pub const CHARTS_ENV: &str = "SETLIST_CHARTS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub catalog_path: PathBuf,
    pub chart_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            chart_dir: PathBuf::from(DEFAULT_CHART_DIR),
        }
    }
}

impl Config {
    /// Defaults, overridden by `SETLIST_CATALOG` and `SETLIST_CHARTS` when set
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var_os(key).map(PathBuf::from))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<PathBuf>) -> Self {
        let defaults = Self::default();
        Self {
            catalog_path: lookup(CATALOG_ENV)
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(defaults.catalog_path),
            chart_dir: lookup(CHARTS_ENV)
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(defaults.chart_dir),
        }
    }

    /// Apply command-line locations on top of this config
    pub fn with_overrides(mut self, catalog_path: Option<PathBuf>, chart_dir: Option<PathBuf>) -> Self {
        if let Some(path) = catalog_path {
            self.catalog_path = path;
        }
        if let Some(dir) = chart_dir {
            self.chart_dir = dir;
        }
        self
    }

    pub fn load_catalog(&self) -> CatalogLoad {
        Catalog::load(&self.catalog_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.catalog_path, PathBuf::from("song_data.json"));
        assert_eq!(config.chart_dir, PathBuf::from("song-bank"));
    }

    #[test]
    fn test_overrides_ignore_empty_values() {
        let config = Config::from_lookup(|key| match key {
            CATALOG_ENV => Some(PathBuf::from("/srv/songs.json")),
            CHARTS_ENV => Some(PathBuf::new()),
            _ => None,
        });
        assert_eq!(config.catalog_path, PathBuf::from("/srv/songs.json"));
        assert_eq!(config.chart_dir, PathBuf::from("song-bank"));
    }

    #[test]
    fn test_flags_win_over_environment() {
        let config = Config::from_lookup(|key| match key {
            CATALOG_ENV => Some(PathBuf::from("/srv/songs.json")),
            CHARTS_ENV => Some(PathBuf::from("/srv/charts")),
            _ => None,
        })
        .with_overrides(None, Some(PathBuf::from("charts")));
        assert_eq!(config.catalog_path, PathBuf::from("/srv/songs.json"));
        assert_eq!(config.chart_dir, PathBuf::from("charts"));
    }
}
