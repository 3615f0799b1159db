use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::category::{EnergyCategory, SourceCatalog};
use super::filter::{filter_tables, rows_in_years, FilterSelection};
use super::model::{Datasets, EnergyRecord, RecordKind};

// ---------------------------------------------------------------------------
// View types
// ---------------------------------------------------------------------------

/// One line of a time-series chart: `(year, summed value)` sorted by year.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub points: Vec<(i32, f64)>,
}

/// Year × energy-category totals, zero-filled. `values[row][col]` belongs to
/// `years[row]` and `categories[col]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryMatrix {
    pub years: Vec<i32>,
    pub categories: Vec<EnergyCategory>,
    pub values: Vec<Vec<f64>>,
}

impl CategoryMatrix {
    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Cumulative totals per year up to and including `col`, for stacking.
    pub fn stacked(&self, col: usize) -> Vec<(i32, f64)> {
        self.years
            .iter()
            .zip(&self.values)
            .map(|(&year, row)| (year, row[..=col].iter().sum()))
            .collect()
    }
}

/// A source's total and its share of all displayed sources.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceShare {
    pub energy_source: String,
    pub value: f64,
    pub percentage: f64,
}

impl SourceShare {
    /// Bar annotation, one decimal.
    pub fn label(&self) -> String {
        format!("{:.1}%", self.percentage)
    }
}

/// Continent × source totals, zero-filled. Both axes sorted by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContinentSourceMatrix {
    pub continents: Vec<String>,
    pub sources: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl ContinentSourceMatrix {
    pub fn is_empty(&self) -> bool {
        self.continents.is_empty()
    }
}

/// One emissions figure for the country map.
#[derive(Debug, Clone, PartialEq)]
pub struct EmissionRow {
    pub country: String,
    pub year: i32,
    pub value: f64,
}

/// Everything the central panel draws for one selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardViews {
    pub consumption_by_source: Vec<Series>,
    pub consumption_by_type: CategoryMatrix,
    pub source_distribution: Vec<SourceShare>,
    pub per_capita: Vec<Series>,
    pub source_by_continent: ContinentSourceMatrix,
    pub emissions: Vec<EmissionRow>,
    /// Rows surviving the sidebar filters across both tables.
    pub visible_rows: usize,
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Filter both tables with `selection` and build every view.
pub fn build_views(
    datasets: &Datasets,
    selection: &FilterSelection,
    catalog: &SourceCatalog,
) -> DashboardViews {
    let filtered = filter_tables(datasets, selection, catalog);
    let consumption = consumption_rows(&filtered.continents);
    let per_capita_rows = per_capita_rows(&filtered.continents);

    DashboardViews {
        consumption_by_source: consumption_by_source_over_time(&consumption),
        consumption_by_type: consumption_by_energy_type_over_time(&consumption, catalog),
        source_distribution: source_distribution(&consumption),
        per_capita: per_capita_by_continent(&per_capita_rows),
        source_by_continent: consumption_by_source_and_continent(&per_capita_rows),
        emissions: emissions_by_country(datasets, &selection.years),
        visible_rows: filtered.len(),
    }
}

// ---------------------------------------------------------------------------
// Row selections
// ---------------------------------------------------------------------------

/// Filtered continent rows measuring primary consumption.
pub fn consumption_rows<'a>(rows: &[&'a EnergyRecord]) -> Vec<&'a EnergyRecord> {
    rows.iter()
        .copied()
        .filter(|r| r.kind == RecordKind::Consumption)
        .collect()
}

/// Filtered continent rows of kind `cons` or `energy`.
///
/// Per-capita rows are picked from the already filtered continent rows, so
/// the year, continent and energy-type controls all apply to both kinds.
pub fn per_capita_rows<'a>(filtered: &[&'a EnergyRecord]) -> Vec<&'a EnergyRecord> {
    filtered
        .iter()
        .copied()
        .filter(|r| matches!(r.kind, RecordKind::Cons | RecordKind::Energy))
        .collect()
}

// ---------------------------------------------------------------------------
// View builders
// ---------------------------------------------------------------------------

/// One series per energy source, sources in first-appearance order.
pub fn consumption_by_source_over_time(rows: &[&EnergyRecord]) -> Vec<Series> {
    group_series(rows, |r| &r.energy_source)
}

/// Year × category totals for the stacked-area chart. Only categories that
/// occur are given a column.
pub fn consumption_by_energy_type_over_time(
    rows: &[&EnergyRecord],
    catalog: &SourceCatalog,
) -> CategoryMatrix {
    let mut totals: BTreeMap<(i32, EnergyCategory), f64> = BTreeMap::new();
    for r in rows {
        *totals
            .entry((r.year, catalog.classify(&r.energy_source)))
            .or_default() += r.value;
    }

    let years: Vec<i32> = totals
        .keys()
        .map(|(y, _)| *y)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let present: BTreeSet<EnergyCategory> = totals.keys().map(|(_, c)| *c).collect();
    let categories: Vec<EnergyCategory> = EnergyCategory::ALL
        .into_iter()
        .filter(|c| present.contains(c))
        .collect();

    let values = years
        .iter()
        .map(|y| {
            categories
                .iter()
                .map(|c| totals.get(&(*y, *c)).copied().unwrap_or(0.0))
                .collect()
        })
        .collect();

    CategoryMatrix {
        years,
        categories,
        values,
    }
}

/// Per-source totals with each source's share of the displayed total.
pub fn source_distribution(rows: &[&EnergyRecord]) -> Vec<SourceShare> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for r in rows {
        *totals.entry(r.energy_source.as_str()).or_default() += r.value;
    }
    let grand_total: f64 = totals.values().sum();

    totals
        .into_iter()
        .map(|(source, value)| SourceShare {
            energy_source: source.to_string(),
            value,
            percentage: if grand_total == 0.0 {
                0.0
            } else {
                value / grand_total * 100.0
            },
        })
        .collect()
}

/// One series per continent.
pub fn per_capita_by_continent(rows: &[&EnergyRecord]) -> Vec<Series> {
    group_series(rows, |r| &r.country)
}

/// Continent × source pivot of the per-capita rows.
pub fn consumption_by_source_and_continent(rows: &[&EnergyRecord]) -> ContinentSourceMatrix {
    let mut totals: BTreeMap<(&str, &str), f64> = BTreeMap::new();
    for r in rows {
        *totals
            .entry((r.country.as_str(), r.energy_source.as_str()))
            .or_default() += r.value;
    }

    let continents: Vec<String> = totals
        .keys()
        .map(|(c, _)| *c)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect();
    let sources: Vec<String> = totals
        .keys()
        .map(|(_, s)| *s)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect();

    let values = continents
        .iter()
        .map(|c| {
            sources
                .iter()
                .map(|s| {
                    totals
                        .get(&(c.as_str(), s.as_str()))
                        .copied()
                        .unwrap_or(0.0)
                })
                .collect()
        })
        .collect();

    ContinentSourceMatrix {
        continents,
        sources,
        values,
    }
}

/// Emissions rows of the country table for the selected years. The continent
/// and energy-type controls do not apply to this view.
pub fn emissions_by_country(datasets: &Datasets, years: &BTreeSet<i32>) -> Vec<EmissionRow> {
    rows_in_years(&datasets.countries, years)
        .into_iter()
        .filter(|r| r.kind == RecordKind::Emissions)
        .map(|r| EmissionRow {
            country: r.country.clone(),
            year: r.year,
            value: r.value,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Sum values per (key, year). Keys keep first-appearance order, points are
/// sorted by year.
fn group_series<'a, F>(rows: &[&'a EnergyRecord], key: F) -> Vec<Series>
where
    F: Fn(&'a EnergyRecord) -> &'a String,
{
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, BTreeMap<i32, f64>)> = Vec::new();

    for r in rows {
        let k = key(*r).as_str();
        let slot = *index.entry(k).or_insert_with(|| {
            groups.push((k, BTreeMap::new()));
            groups.len() - 1
        });
        *groups[slot].1.entry(r.year).or_default() += r.value;
    }

    groups
        .into_iter()
        .map(|(name, by_year)| Series {
            name: name.to_string(),
            points: by_year.into_iter().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::category::EnergyTypeFilter;
    use crate::data::filter::default_selection;
    use crate::data::model::EnergyTable;

    fn rec(country: &str, year: i32, kind: &str, source: &str, value: f64) -> EnergyRecord {
        EnergyRecord {
            country: country.into(),
            year,
            kind: RecordKind::parse(kind),
            energy_source: source.into(),
            value,
        }
    }

    fn datasets() -> Datasets {
        Datasets {
            countries: EnergyTable::from_records(vec![
                rec("France", 2015, "emissions", "Coal", 300.0),
                rec("France", 2016, "emissions", "Coal", 290.0),
                rec("Chile", 2016, "emissions", "Oil", 80.0),
                rec("Chile", 2016, "consumption", "Solar", 8.0),
            ]),
            continents: EnergyTable::from_records(vec![
                rec("Europe", 2015, "consumption", "Wind", 20.0),
                rec("Europe", 2015, "consumption", "Coal", 60.0),
                rec("Europe", 2016, "consumption", "Wind", 25.0),
                rec("Asia", 2015, "consumption", "Coal", 100.0),
                rec("Asia", 2016, "consumption", "Low_carbon", 15.0),
                rec("Europe", 2015, "cons", "Coal", 4.0),
                rec("Asia", 2015, "cons", "Coal", 3.0),
                rec("Asia", 2016, "energy", "Wind", 2.0),
                rec("Europe", 2016, "energy", "Hydro", 1.0),
            ]),
        }
    }

    fn cell(m: &ContinentSourceMatrix, continent: &str, source: &str) -> Option<f64> {
        let row = m.continents.iter().position(|c| c == continent)?;
        let col = m.sources.iter().position(|s| s == source)?;
        Some(m.values[row][col])
    }

    fn views(selection: &FilterSelection) -> (Datasets, DashboardViews) {
        let ds = datasets();
        let v = build_views(&ds, selection, &SourceCatalog::default());
        (ds, v)
    }

    #[test]
    fn consumption_series_follow_first_appearance() {
        let ds = datasets();
        let (_, v) = views(&default_selection(&ds));
        let names: Vec<_> = v
            .consumption_by_source
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Wind", "Coal", "Low_carbon"]);

        let wind = &v.consumption_by_source[0];
        assert_eq!(wind.points, vec![(2015, 20.0), (2016, 25.0)]);
        let coal = &v.consumption_by_source[1];
        assert_eq!(coal.points, vec![(2015, 160.0)]);
    }

    #[test]
    fn energy_type_rows_sum_to_yearly_totals() {
        let ds = datasets();
        let (_, v) = views(&default_selection(&ds));
        let m = &v.consumption_by_type;
        assert_eq!(m.years, vec![2015, 2016]);
        assert_eq!(
            m.categories,
            vec![EnergyCategory::Renewable, EnergyCategory::NonRenewable]
        );
        assert_eq!(m.values, vec![vec![20.0, 160.0], vec![40.0, 0.0]]);
        let row_totals: Vec<f64> = m.values.iter().map(|r| r.iter().sum()).collect();
        assert_eq!(row_totals, vec![180.0, 40.0]);
        assert_eq!(m.stacked(1), vec![(2015, 180.0), (2016, 40.0)]);
    }

    #[test]
    fn energy_type_breakdown_labels_unlisted_sources_other() {
        let rows = [
            rec("Asia", 2015, "consumption", "Geothermal", 5.0),
            rec("Asia", 2015, "consumption", "Solar", 5.0),
        ];
        let refs: Vec<&EnergyRecord> = rows.iter().collect();
        let m = consumption_by_energy_type_over_time(&refs, &SourceCatalog::default());
        assert_eq!(
            m.categories,
            vec![EnergyCategory::Renewable, EnergyCategory::Other]
        );
        assert_eq!(m.values, vec![vec![5.0, 5.0]]);
    }

    #[test]
    fn distribution_percentages_total_one_hundred() {
        let ds = datasets();
        let (_, v) = views(&default_selection(&ds));
        let total: f64 = v.source_distribution.iter().map(|s| s.percentage).sum();
        assert!((total - 100.0).abs() < 1e-9);
        let names: Vec<_> = v
            .source_distribution
            .iter()
            .map(|s| s.energy_source.as_str())
            .collect();
        assert_eq!(names, vec!["Coal", "Low_carbon", "Wind"]);
    }

    #[test]
    fn renewable_only_solar_takes_full_share() {
        let ds = Datasets {
            countries: EnergyTable::default(),
            continents: EnergyTable::from_records(vec![
                rec("Europe", 2015, "consumption", "Solar", 10.0),
                rec("Europe", 2015, "consumption", "Coal", 90.0),
            ]),
        };
        let sel = FilterSelection {
            category: EnergyTypeFilter::Renewable,
            ..default_selection(&ds)
        };
        let v = build_views(&ds, &sel, &SourceCatalog::default());
        assert_eq!(v.source_distribution.len(), 1);
        let share = &v.source_distribution[0];
        assert_eq!(share.energy_source, "Solar");
        assert_eq!(share.value, 10.0);
        assert_eq!(share.label(), "100.0%");
    }

    #[test]
    fn zero_total_gives_zero_shares() {
        let rows = [rec("Asia", 2015, "consumption", "Solar", 0.0)];
        let refs: Vec<&EnergyRecord> = rows.iter().collect();
        assert_eq!(source_distribution(&refs)[0].percentage, 0.0);
    }

    #[test]
    fn per_capita_uses_cons_and_energy_rows() {
        let ds = datasets();
        let (_, v) = views(&default_selection(&ds));
        let names: Vec<_> = v.per_capita.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Europe", "Asia"]);
        assert_eq!(v.per_capita[0].points, vec![(2015, 4.0), (2016, 1.0)]);
        assert_eq!(v.per_capita[1].points, vec![(2015, 3.0), (2016, 2.0)]);
    }

    #[test]
    fn per_capita_energy_rows_respect_filters() {
        let ds = datasets();
        let sel = FilterSelection {
            years: [2015].into(),
            ..default_selection(&ds)
        };
        let v = build_views(&ds, &sel, &SourceCatalog::default());
        assert!(v
            .per_capita
            .iter()
            .all(|s| s.points.iter().all(|(y, _)| *y == 2015)));
    }

    #[test]
    fn continent_source_matrix_is_zero_filled() {
        let ds = datasets();
        let (_, v) = views(&default_selection(&ds));
        let m = &v.source_by_continent;
        assert_eq!(m.continents, vec!["Asia", "Europe"]);
        assert_eq!(m.sources, vec!["Coal", "Hydro", "Wind"]);
        assert_eq!(cell(m, "Asia", "Coal"), Some(3.0));
        assert_eq!(cell(m, "Asia", "Hydro"), Some(0.0));
        assert_eq!(cell(m, "Europe", "Hydro"), Some(1.0));
        assert_eq!(cell(m, "Oceania", "Coal"), None);
    }

    #[test]
    fn emissions_ignore_category_and_continents() {
        let ds = datasets();
        let sel = FilterSelection {
            continents: BTreeSet::new(),
            years: [2016].into(),
            category: EnergyTypeFilter::Renewable,
        };
        let v = build_views(&ds, &sel, &SourceCatalog::default());
        assert_eq!(
            v.emissions,
            vec![
                EmissionRow {
                    country: "France".into(),
                    year: 2016,
                    value: 290.0
                },
                EmissionRow {
                    country: "Chile".into(),
                    year: 2016,
                    value: 80.0
                },
            ]
        );
        assert!(v.consumption_by_source.is_empty());
    }

    #[test]
    fn empty_selection_gives_empty_views() {
        let ds = datasets();
        let v = build_views(&ds, &FilterSelection::default(), &SourceCatalog::default());
        assert!(v.consumption_by_source.is_empty());
        assert!(v.consumption_by_type.is_empty());
        assert!(v.source_distribution.is_empty());
        assert!(v.per_capita.is_empty());
        assert!(v.source_by_continent.is_empty());
        assert!(v.emissions.is_empty());
        assert_eq!(v.visible_rows, 0);
    }

    #[test]
    fn rebuilding_is_idempotent() {
        let ds = datasets();
        let sel = default_selection(&ds);
        let catalog = SourceCatalog::default();
        let first = build_views(&ds, &sel, &catalog);
        let second = build_views(&ds, &sel, &catalog);
        assert_eq!(first, second);
    }
}
