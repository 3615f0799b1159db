use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// RecordKind – the `type` column
// ---------------------------------------------------------------------------

/// What a row measures. Labels are matched exactly as they appear in the
/// source files; anything unrecognised is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    /// Primary energy consumption (TWh).
    Consumption,
    /// Per-capita consumption (kWh).
    Cons,
    /// Per-capita energy (kWh), continent table only.
    Energy,
    /// CO2 emissions (million metric tons).
    Emissions,
    Other(String),
}

impl RecordKind {
    pub fn parse(label: &str) -> Self {
        match label {
            "consumption" => RecordKind::Consumption,
            "cons" => RecordKind::Cons,
            "energy" => RecordKind::Energy,
            "emissions" => RecordKind::Emissions,
            other => RecordKind::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RecordKind::Consumption => "consumption",
            RecordKind::Cons => "cons",
            RecordKind::Energy => "energy",
            RecordKind::Emissions => "emissions",
            RecordKind::Other(s) => s,
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EnergyRecord – one row of either table
// ---------------------------------------------------------------------------

/// One observation for a country (or continent) / year / source / kind.
///
/// In the continent table `country` holds the continent name; both files use
/// the same column layout.
#[derive(Debug, Clone, PartialEq)]
pub struct EnergyRecord {
    pub country: String,
    pub year: i32,
    pub kind: RecordKind,
    pub energy_source: String,
    pub value: f64,
}

/// Capitalize like the source data pipeline does: first character upper
/// case, the rest lower case (`"fossil Fuel"` → `"Fossil fuel"`).
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// EnergyTable – one loaded file
// ---------------------------------------------------------------------------

/// A loaded table with pre-computed column indices.
#[derive(Debug, Clone, Default)]
pub struct EnergyTable {
    /// All rows, in file order.
    pub records: Vec<EnergyRecord>,
    /// Distinct years, sorted.
    pub years: BTreeSet<i32>,
    /// Distinct `country` values in first-appearance order.
    pub regions: Vec<String>,
}

impl EnergyTable {
    /// Build indices from the loaded records. `energy_source` is normalized
    /// here so both tables compare against the catalog the same way.
    pub fn from_records(mut records: Vec<EnergyRecord>) -> Self {
        let mut years = BTreeSet::new();
        let mut seen = BTreeSet::new();
        let mut regions = Vec::new();

        for rec in &mut records {
            rec.energy_source = capitalize(&rec.energy_source);
            years.insert(rec.year);
            if seen.insert(rec.country.clone()) {
                regions.push(rec.country.clone());
            }
        }

        EnergyTable {
            records,
            years,
            regions,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Datasets – both tables together
// ---------------------------------------------------------------------------

/// The two source tables. Read-only once loaded.
#[derive(Debug, Clone, Default)]
pub struct Datasets {
    pub countries: EnergyTable,
    pub continents: EnergyTable,
}

impl Datasets {
    /// Continent names, in the order the checkboxes are shown.
    pub fn continents(&self) -> &[String] {
        &self.continents.regions
    }

    /// Years offered by the year multiselect.
    pub fn years(&self) -> &BTreeSet<i32> {
        &self.continents.years
    }

    pub fn total_rows(&self) -> usize {
        self.countries.len() + self.continents.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(country: &str, year: i32, source: &str) -> EnergyRecord {
        EnergyRecord {
            country: country.into(),
            year,
            kind: RecordKind::Consumption,
            energy_source: source.into(),
            value: 1.0,
        }
    }

    #[test]
    fn capitalize_matches_source_pipeline() {
        assert_eq!(capitalize("solar"), "Solar");
        assert_eq!(capitalize("LOW_CARBON"), "Low_carbon");
        assert_eq!(capitalize("Fossil Fuel"), "Fossil fuel");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn record_kind_parse_is_exact() {
        assert_eq!(RecordKind::parse("consumption"), RecordKind::Consumption);
        assert_eq!(RecordKind::parse("cons"), RecordKind::Cons);
        assert_eq!(RecordKind::parse("energy"), RecordKind::Energy);
        assert_eq!(RecordKind::parse("emissions"), RecordKind::Emissions);
        assert_eq!(
            RecordKind::parse("Emissions"),
            RecordKind::Other("Emissions".into())
        );
        assert_eq!(RecordKind::parse("share").to_string(), "share");
    }

    #[test]
    fn table_indices_keep_first_appearance_order() {
        let table = EnergyTable::from_records(vec![
            record("Europe", 2016, "coal"),
            record("Asia", 2015, "Solar"),
            record("Europe", 2015, "WIND"),
        ]);
        assert_eq!(table.regions, vec!["Europe", "Asia"]);
        assert_eq!(table.years.iter().copied().collect::<Vec<_>>(), vec![2015, 2016]);
        assert_eq!(table.records[0].energy_source, "Coal");
        assert_eq!(table.records[2].energy_source, "Wind");
        assert_eq!(table.len(), 3);
    }
}
