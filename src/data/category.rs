use std::fmt;

use super::model::capitalize;

pub const DEFAULT_RENEWABLE: &[&str] = &["Solar", "Wind", "Hydro", "Biofuel", "Low_carbon"];
pub const DEFAULT_NON_RENEWABLE: &[&str] =
    &["Coal", "Gas", "Oil", "Fossil", "Fossil Fuel", "Nuclear"];

// ---------------------------------------------------------------------------
// EnergyCategory – classification used by the energy-type breakdown
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EnergyCategory {
    Renewable,
    NonRenewable,
    Other,
}

impl EnergyCategory {
    pub const ALL: [EnergyCategory; 3] = [
        EnergyCategory::Renewable,
        EnergyCategory::NonRenewable,
        EnergyCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EnergyCategory::Renewable => "Renewable",
            EnergyCategory::NonRenewable => "Non-Renewable",
            EnergyCategory::Other => "Other",
        }
    }
}

impl fmt::Display for EnergyCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// EnergyTypeFilter – the sidebar radio
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnergyTypeFilter {
    #[default]
    All,
    Renewable,
    NonRenewable,
}

impl EnergyTypeFilter {
    pub const ALL: [EnergyTypeFilter; 3] = [
        EnergyTypeFilter::All,
        EnergyTypeFilter::Renewable,
        EnergyTypeFilter::NonRenewable,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EnergyTypeFilter::All => "All",
            EnergyTypeFilter::Renewable => "Renewable",
            EnergyTypeFilter::NonRenewable => "Non-Renewable",
        }
    }
}

// ---------------------------------------------------------------------------
// SourceCatalog – membership lists
// ---------------------------------------------------------------------------

/// Renewable / non-renewable membership lists.
///
/// Entries are stored capitalized, the same form the loader gives every
/// `energy_source`, so `"Fossil Fuel"` in the list matches `"fossil fuel"` in
/// either file.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceCatalog {
    renewable: Vec<String>,
    non_renewable: Vec<String>,
}

impl Default for SourceCatalog {
    fn default() -> Self {
        Self::new(DEFAULT_RENEWABLE, DEFAULT_NON_RENEWABLE)
    }
}

impl SourceCatalog {
    pub fn new<S: AsRef<str>>(renewable: &[S], non_renewable: &[S]) -> Self {
        let norm = |list: &[S]| list.iter().map(|s| capitalize(s.as_ref())).collect();
        SourceCatalog {
            renewable: norm(renewable),
            non_renewable: norm(non_renewable),
        }
    }

    /// Classify a (normalized) source name.
    pub fn classify(&self, source: &str) -> EnergyCategory {
        if self.renewable.iter().any(|s| s == source) {
            EnergyCategory::Renewable
        } else if self.non_renewable.iter().any(|s| s == source) {
            EnergyCategory::NonRenewable
        } else {
            EnergyCategory::Other
        }
    }

    /// Whether the radio selection keeps rows of this source. `All` is the
    /// union of both lists, so `Other` sources never pass.
    pub fn admits(&self, filter: EnergyTypeFilter, source: &str) -> bool {
        match (filter, self.classify(source)) {
            (_, EnergyCategory::Other) => false,
            (EnergyTypeFilter::All, _) => true,
            (EnergyTypeFilter::Renewable, cat) => cat == EnergyCategory::Renewable,
            (EnergyTypeFilter::NonRenewable, cat) => cat == EnergyCategory::NonRenewable,
        }
    }
}
