use std::path::Path;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::aggregate::{build_views, DashboardViews};
use crate::data::category::{EnergyCategory, EnergyTypeFilter, SourceCatalog};
use crate::data::filter::{default_selection, FilterSelection};
use crate::data::loader::load_datasets;
use crate::data::model::Datasets;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Source classification derived from `config`.
    pub catalog: SourceCatalog,

    /// Loaded tables (None until a load succeeds).
    pub datasets: Option<Datasets>,

    /// Current sidebar selection.
    pub selection: FilterSelection,

    /// Views for the current selection, rebuilt on every change.
    pub views: DashboardViews,

    /// Colours for energy sources, continents and categories.
    pub colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DashboardConfig::default())
    }
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            catalog: config.catalog(),
            config,
            datasets: None,
            selection: FilterSelection::default(),
            views: DashboardViews::default(),
            colors: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load both tables from the configured location.
    pub fn reload(&mut self) {
        match load_datasets(&self.config) {
            Ok(datasets) => self.set_datasets(datasets),
            Err(e) => {
                log::error!("Failed to load data: {e:#}");
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Point the configuration at another folder and reload from it.
    pub fn open_data_dir(&mut self, dir: &Path) {
        self.config.data_dir = dir.to_path_buf();
        self.reload();
    }

    /// Ingest newly loaded tables, reset filters and colours.
    pub fn set_datasets(&mut self, datasets: Datasets) {
        self.selection = default_selection(&datasets);
        self.colors = build_color_map(&datasets);
        self.datasets = Some(datasets);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute every view from the source tables after a filter change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.datasets {
            self.views = build_views(ds, &self.selection, &self.catalog);
            log::debug!(
                "Recomputed views: {} visible rows, {} years, {} continents, {:?}",
                self.views.visible_rows,
                self.selection.years.len(),
                self.selection.continents.len(),
                self.selection.category
            );
        }
    }

    /// Toggle a continent checkbox.
    pub fn toggle_continent(&mut self, continent: &str) {
        if !self.selection.continents.remove(continent) {
            self.selection.continents.insert(continent.to_string());
        }
        self.refilter();
    }

    /// Toggle a year in the multiselect.
    pub fn toggle_year(&mut self, year: i32) {
        if !self.selection.years.remove(&year) {
            self.selection.years.insert(year);
        }
        self.refilter();
    }

    pub fn set_all_continents(&mut self, selected: bool) {
        self.selection.continents = match (&self.datasets, selected) {
            (Some(ds), true) => ds.continents().iter().cloned().collect(),
            _ => Default::default(),
        };
        self.refilter();
    }

    pub fn set_all_years(&mut self, selected: bool) {
        self.selection.years = match (&self.datasets, selected) {
            (Some(ds), true) => ds.years().clone(),
            _ => Default::default(),
        };
        self.refilter();
    }

    pub fn set_category(&mut self, category: EnergyTypeFilter) {
        if self.selection.category != category {
            self.selection.category = category;
            self.refilter();
        }
    }

    /// Back to the startup selection.
    pub fn reset_filters(&mut self) {
        if let Some(ds) = &self.datasets {
            self.selection = default_selection(ds);
            self.refilter();
        }
    }
}

/// One colour per distinct source, continent and category name.
fn build_color_map(datasets: &Datasets) -> ColorMap {
    let mut names: Vec<String> = Vec::new();
    for rec in datasets.continents.records.iter() {
        if !names.contains(&rec.energy_source) {
            names.push(rec.energy_source.clone());
        }
    }
    names.extend(datasets.continents().iter().cloned());
    names.extend(EnergyCategory::ALL.iter().map(|c| c.label().to_string()));
    ColorMap::new(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{EnergyRecord, EnergyTable, RecordKind};

    fn datasets() -> Datasets {
        let rec = |country: &str, year, source: &str, value| EnergyRecord {
            country: country.to_string(),
            year,
            kind: RecordKind::Consumption,
            energy_source: source.to_string(),
            value,
        };
        Datasets {
            countries: EnergyTable::default(),
            continents: EnergyTable::from_records(vec![
                rec("Europe", 2015, "Solar", 10.0),
                rec("Asia", 2016, "Coal", 90.0),
            ]),
        }
    }

    #[test]
    fn loading_selects_everything() {
        let mut state = AppState::default();
        state.set_datasets(datasets());
        assert_eq!(state.selection.continents.len(), 2);
        assert_eq!(state.views.visible_rows, 2);
        assert_eq!(state.views.consumption_by_source.len(), 2);
    }

    #[test]
    fn toggles_recompute_views() {
        let mut state = AppState::default();
        state.set_datasets(datasets());

        state.toggle_continent("Asia");
        assert_eq!(state.views.visible_rows, 1);
        state.toggle_continent("Asia");
        assert_eq!(state.views.visible_rows, 2);

        state.toggle_year(2015);
        assert_eq!(state.views.visible_rows, 1);

        state.set_all_years(false);
        assert_eq!(state.views.visible_rows, 0);
        state.set_all_years(true);
        assert_eq!(state.views.visible_rows, 2);

        state.set_category(EnergyTypeFilter::Renewable);
        assert_eq!(state.views.source_distribution.len(), 1);

        state.set_all_continents(false);
        assert_eq!(state.views.visible_rows, 0);

        state.reset_filters();
        assert_eq!(state.selection.category, EnergyTypeFilter::All);
        assert_eq!(state.views.visible_rows, 2);
    }

    #[test]
    fn failed_load_keeps_previous_data() {
        let mut state = AppState::default();
        state.set_datasets(datasets());
        state.open_data_dir(Path::new("/nonexistent/energy-dash"));
        assert!(state.status_message.is_some());
        assert!(state.datasets.is_some());
    }
}
