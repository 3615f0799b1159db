use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::category::{SourceCatalog, DEFAULT_NON_RENEWABLE, DEFAULT_RENEWABLE};

/// Looked up in the working directory when no path is given on the command line.
pub const DEFAULT_CONFIG_FILE: &str = "energy-dash.json";

// ---------------------------------------------------------------------------
// Dashboard settings
// ---------------------------------------------------------------------------

/// Where the tables live and how sources are classified.
///
/// ```json
/// {
///   "data_dir": "data",
///   "countries_file": "df_countries_10years.csv",
///   "continents_file": "df_continents_10years.parquet",
///   "renewable_sources": ["Solar", "Wind", "Hydro", "Biofuel", "Low_carbon"],
///   "non_renewable_sources": ["Coal", "Gas", "Oil", "Fossil", "Fossil Fuel", "Nuclear"]
/// }
/// ```
///
/// Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub data_dir: PathBuf,
    pub countries_file: String,
    pub continents_file: String,
    pub renewable_sources: Vec<String>,
    pub non_renewable_sources: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            countries_file: "df_countries_10years.csv".into(),
            continents_file: "df_continents_10years.csv".into(),
            renewable_sources: DEFAULT_RENEWABLE.iter().map(|s| s.to_string()).collect(),
            non_renewable_sources: DEFAULT_NON_RENEWABLE
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl DashboardConfig {
    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Resolve the startup configuration from `explicit`, else from
    /// [`DEFAULT_CONFIG_FILE`] when it exists. A missing default file gives the
    /// defaults silently; an unreadable or malformed file is logged as an error
    /// and also gives the defaults.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => p.to_path_buf(),
            None => {
                let p = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !p.exists() {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Self::default();
                }
                p
            }
        };

        match Self::from_file(&path) {
            Ok(cfg) => {
                log::info!("Using config {}", path.display());
                cfg
            }
            Err(e) => {
                log::error!("Failed to load config: {e:#}");
                Self::default()
            }
        }
    }

    pub fn countries_path(&self) -> PathBuf {
        self.data_dir.join(&self.countries_file)
    }

    pub fn continents_path(&self) -> PathBuf {
        self.data_dir.join(&self.continents_file)
    }

    pub fn catalog(&self) -> SourceCatalog {
        SourceCatalog::new(&self.renewable_sources, &self.non_renewable_sources)
    }
}
