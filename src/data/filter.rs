use std::collections::BTreeSet;

use super::category::{EnergyTypeFilter, SourceCatalog};
use super::model::{Datasets, EnergyRecord, EnergyTable};

// ---------------------------------------------------------------------------
// Filter predicate: what the sidebar currently selects
// ---------------------------------------------------------------------------

/// Sidebar selection, rebuilt from widget state and passed by value into the
/// filter functions.
///
/// An empty `continents` or `years` set means nothing is selected, which
/// filters every row out (it is not "no filter").
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilterSelection {
    pub continents: BTreeSet<String>,
    pub years: BTreeSet<i32>,
    pub category: EnergyTypeFilter,
}

/// Initialise a [`FilterSelection`] with everything selected: every
/// continent, every year of the continent table, energy type `All`.
pub fn default_selection(datasets: &Datasets) -> FilterSelection {
    FilterSelection {
        continents: datasets.continents().iter().cloned().collect(),
        years: datasets.years().clone(),
        category: EnergyTypeFilter::All,
    }
}

// ---------------------------------------------------------------------------
// Filtered views
// ---------------------------------------------------------------------------

/// Rows of both tables that pass the selection. Borrowed from the source
/// tables, which stay untouched.
#[derive(Debug, Clone, Default)]
pub struct FilteredTables<'a> {
    pub countries: Vec<&'a EnergyRecord>,
    pub continents: Vec<&'a EnergyRecord>,
}

impl FilteredTables<'_> {
    pub fn len(&self) -> usize {
        self.countries.len() + self.continents.len()
    }
}

/// Apply the selection to both tables.
///
/// A row passes when:
/// * its year is in `selection.years`
/// * its energy source is admitted by `selection.category`
/// * (continent table only) its continent is in `selection.continents`
pub fn filter_tables<'a>(
    datasets: &'a Datasets,
    selection: &FilterSelection,
    catalog: &SourceCatalog,
) -> FilteredTables<'a> {
    FilteredTables {
        countries: filter_rows(&datasets.countries, selection, catalog, false),
        continents: filter_rows(&datasets.continents, selection, catalog, true),
    }
}

fn filter_rows<'a>(
    table: &'a EnergyTable,
    selection: &FilterSelection,
    catalog: &SourceCatalog,
    by_continent: bool,
) -> Vec<&'a EnergyRecord> {
    if selection.years.is_empty() || (by_continent && selection.continents.is_empty()) {
        // Nothing selected → hide everything
        return Vec::new();
    }
    table
        .records
        .iter()
        .filter(|rec| {
            selection.years.contains(&rec.year)
                && (!by_continent || selection.continents.contains(&rec.country))
                && catalog.admits(selection.category, &rec.energy_source)
        })
        .collect()
}

/// Year-only filter over a whole table, used by views that ignore the
/// continent and energy-type controls.
pub fn rows_in_years<'a>(table: &'a EnergyTable, years: &BTreeSet<i32>) -> Vec<&'a EnergyRecord> {
    table
        .records
        .iter()
        .filter(|rec| years.contains(&rec.year))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::RecordKind;

    fn rec(country: &str, year: i32, source: &str, value: f64) -> EnergyRecord {
        EnergyRecord {
            country: country.into(),
            year,
            kind: RecordKind::Consumption,
            energy_source: source.into(),
            value,
        }
    }

    fn datasets() -> Datasets {
        Datasets {
            countries: EnergyTable::from_records(vec![
                rec("France", 2015, "Nuclear", 400.0),
                rec("France", 2016, "Solar", 12.0),
                rec("Kenya", 2015, "Geothermal", 5.0),
            ]),
            continents: EnergyTable::from_records(vec![
                rec("Europe", 2015, "Solar", 10.0),
                rec("Europe", 2015, "Coal", 90.0),
                rec("Africa", 2015, "Hydro", 30.0),
                rec("Africa", 2016, "Oil", 70.0),
                rec("Africa", 2016, "Geothermal", 3.0),
            ]),
        }
    }

    #[test]
    fn default_selection_selects_everything() {
        let ds = datasets();
        let sel = default_selection(&ds);
        assert_eq!(sel.continents.len(), 2);
        assert_eq!(sel.years.len(), 2);
        assert_eq!(sel.category, EnergyTypeFilter::All);

        let out = filter_tables(&ds, &sel, &SourceCatalog::default());
        // Geothermal falls outside both lists and is dropped under All.
        assert_eq!(out.continents.len(), 4);
        assert_eq!(out.countries.len(), 2);
    }

    #[test]
    fn retained_rows_satisfy_every_predicate() {
        let ds = datasets();
        let catalog = SourceCatalog::default();
        let sel = FilterSelection {
            continents: ["Africa".to_string()].into(),
            years: [2016].into(),
            category: EnergyTypeFilter::NonRenewable,
        };
        let out = filter_tables(&ds, &sel, &catalog);
        assert_eq!(out.continents.len(), 1);
        for r in &out.continents {
            assert!(ds.continents.records.contains(*r));
            assert!(sel.years.contains(&r.year));
            assert!(sel.continents.contains(&r.country));
            assert!(catalog.admits(sel.category, &r.energy_source));
        }
        // The country table ignores the continent predicate.
        assert!(out.countries.is_empty());
    }

    #[test]
    fn renewable_keeps_only_renewable_rows() {
        let ds = datasets();
        let sel = FilterSelection {
            category: EnergyTypeFilter::Renewable,
            ..default_selection(&ds)
        };
        let out = filter_tables(&ds, &sel, &SourceCatalog::default());
        let sources: Vec<_> = out
            .continents
            .iter()
            .map(|r| r.energy_source.as_str())
            .collect();
        assert_eq!(sources, vec!["Solar", "Hydro"]);
    }

    #[test]
    fn empty_selections_yield_empty_tables() {
        let ds = datasets();
        let catalog = SourceCatalog::default();

        let no_years = FilterSelection {
            years: BTreeSet::new(),
            ..default_selection(&ds)
        };
        assert_eq!(filter_tables(&ds, &no_years, &catalog).len(), 0);

        let no_continents = FilterSelection {
            continents: BTreeSet::new(),
            ..default_selection(&ds)
        };
        let out = filter_tables(&ds, &no_continents, &catalog);
        assert!(out.continents.is_empty());
        assert_eq!(out.countries.len(), 2);
    }

    #[test]
    fn filtering_leaves_sources_untouched() {
        let ds = datasets();
        let before = ds.clone().continents.records;
        let sel = FilterSelection::default();
        let _ = filter_tables(&ds, &sel, &SourceCatalog::default());
        assert_eq!(ds.continents.records, before);
    }

    #[test]
    fn rows_in_years_ignores_other_predicates() {
        let ds = datasets();
        let rows = rows_in_years(&ds.countries, &[2015].into());
        assert_eq!(rows.len(), 2);
    }
}
