use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::Config;
use crate::data::filter::{DiagnosisFilter, SexFilter};
use crate::data::model::{sex_label, HeartDataset, Variable};
use crate::views::breakdown::{self, ChestPainCount, LabelCount, ScatterPoint};
use crate::views::distribution::{self, DistributionParams, Histogram};
use crate::views::error::ViewResult;
use crate::views::summary::{self, DatasetSummary};
use crate::views::table::{self, RecordDetail, SortOrder, TableColumn, TableParams, TableRow};
use crate::views::{guarded, ViewSettings};

// ---------------------------------------------------------------------------
// Evaluated views
// ---------------------------------------------------------------------------

/// Results of the last evaluation of every view. Each field is rebuilt only
/// when one of its inputs changes.
pub struct ViewCache {
    pub summary: DatasetSummary,
    pub distribution: ViewResult<Histogram>,
    pub sex: ViewResult<Vec<LabelCount>>,
    pub correlation: ViewResult<Vec<ScatterPoint>>,
    pub chest_pain: ViewResult<Vec<ChestPainCount>>,
    /// Rows from the table view, before the table-local sort and filter.
    pub table: ViewResult<Vec<TableRow>>,
    /// Rows actually displayed.
    pub visible_rows: Vec<TableRow>,
    pub detail: ViewResult<RecordDetail>,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a file is loaded).
    pub dataset: Option<Arc<HeartDataset>>,

    pub settings: ViewSettings,

    // ---- control values ----
    pub variable: Variable,
    pub sex: SexFilter,
    pub table_params: TableParams,
    pub row_limit_options: Vec<usize>,
    pub table_query: String,
    pub sort: Option<SortOrder>,
    pub selected_id: Option<usize>,

    /// Evaluated views for the current controls.
    pub views: Option<ViewCache>,

    /// Colours of the sex distribution slices.
    pub sex_colors: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            dataset: None,
            settings: config.view_settings(),
            variable: config.views.default_variable,
            sex: SexFilter::All,
            table_params: TableParams {
                diagnosis: DiagnosisFilter::All,
                row_limit: config.views.row_limit,
            },
            row_limit_options: config.views.row_limit_options.clone(),
            table_query: String::new(),
            sort: None,
            selected_id: None,
            views: None,
            sex_colors: ColorMap::new([0, 1].into_iter().filter_map(sex_label)),
            status_message: None,
        }
    }

    /// Ingest a newly loaded dataset and evaluate every view.
    pub fn set_dataset(&mut self, dataset: HeartDataset) {
        let dataset = Arc::new(dataset);
        self.selected_id = None;
        self.views = Some(evaluate_all(&dataset, self));
        self.dataset = Some(dataset);
        self.status_message = None;
    }

    // ---- control changes ----

    pub fn set_variable(&mut self, variable: Variable) {
        if self.variable != variable {
            self.variable = variable;
            self.refresh_charts();
        }
    }

    pub fn set_sex(&mut self, sex: SexFilter) {
        if self.sex != sex {
            self.sex = sex;
            self.refresh_charts();
        }
    }

    pub fn set_diagnosis(&mut self, diagnosis: DiagnosisFilter) {
        if self.table_params.diagnosis != diagnosis {
            self.table_params.diagnosis = diagnosis;
            self.refresh_table();
        }
    }

    pub fn set_row_limit(&mut self, row_limit: usize) {
        if self.table_params.row_limit != row_limit {
            self.table_params.row_limit = row_limit;
            self.refresh_table();
        }
    }

    pub fn set_table_query(&mut self, query: String) {
        self.table_query = query;
        self.refresh_visible_rows();
    }

    /// Clicking a header sorts ascending, clicking again flips the order.
    pub fn toggle_sort(&mut self, column: TableColumn) {
        self.sort = Some(match self.sort {
            Some(order) if order.column == column => SortOrder {
                column,
                descending: !order.descending,
            },
            _ => SortOrder {
                column,
                descending: false,
            },
        });
        self.refresh_visible_rows();
    }

    /// Select (or, passing `None`, clear) the detail row by identifier.
    pub fn select(&mut self, id: Option<usize>) {
        self.selected_id = id;
        let (Some(ds), Some(views)) = (&self.dataset, &mut self.views) else {
            return;
        };
        views.detail = detail_for(ds, id);
    }

    // ---- recomputation ----

    fn refresh_charts(&mut self) {
        let (Some(ds), Some(views)) = (&self.dataset, &mut self.views) else {
            return;
        };
        let params = DistributionParams {
            variable: self.variable.name().to_string(),
            sex: self.sex,
        };
        views.distribution =
            guarded(|| distribution::distribution(ds, &params, self.settings.bins));
        views.sex = guarded(|| breakdown::sex_distribution(ds, self.sex));
        views.correlation = guarded(|| breakdown::correlation(ds, self.sex));
        views.chest_pain = guarded(|| breakdown::chest_pain(ds, self.sex));
    }

    fn refresh_table(&mut self) {
        self.selected_id = None;
        let (Some(ds), Some(views)) = (&self.dataset, &mut self.views) else {
            return;
        };
        views.table = guarded(|| table::table_view(ds, &self.table_params));
        views.detail = detail_for(ds, None);
        self.refresh_visible_rows();
    }

    fn refresh_visible_rows(&mut self) {
        let Some(views) = &mut self.views else {
            return;
        };
        views.visible_rows = visible_rows(&views.table, &self.table_query, self.sort);
    }
}

fn evaluate_all(dataset: &HeartDataset, state: &AppState) -> ViewCache {
    let params = DistributionParams {
        variable: state.variable.name().to_string(),
        sex: state.sex,
    };
    let table = guarded(|| table::table_view(dataset, &state.table_params));
    ViewCache {
        summary: summary::summary(dataset),
        distribution: guarded(|| distribution::distribution(dataset, &params, state.settings.bins)),
        sex: guarded(|| breakdown::sex_distribution(dataset, state.sex)),
        correlation: guarded(|| breakdown::correlation(dataset, state.sex)),
        chest_pain: guarded(|| breakdown::chest_pain(dataset, state.sex)),
        visible_rows: visible_rows(&table, &state.table_query, state.sort),
        table,
        detail: detail_for(dataset, None),
    }
}

fn visible_rows(
    table: &ViewResult<Vec<TableRow>>,
    query: &str,
    sort: Option<SortOrder>,
) -> Vec<TableRow> {
    let Ok(rows) = table else {
        return Vec::new();
    };
    let mut rows = table::filter_rows(rows, query);
    if let Some(order) = sort {
        table::sort_rows(&mut rows, order);
    }
    rows
}

fn detail_for(dataset: &HeartDataset, id: Option<usize>) -> ViewResult<RecordDetail> {
    match id {
        Some(id) => guarded(|| table::record_detail(dataset, id)),
        None => table::lookup_selected(dataset, &[], None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::five_rows;
    use crate::views::error::ViewError;

    fn loaded() -> AppState {
        let mut state = AppState::default();
        state.set_dataset(five_rows());
        state
    }

    #[test]
    fn loading_evaluates_every_view() {
        let state = loaded();
        let views = state.views.as_ref().unwrap();
        assert_eq!(views.summary.total_records, 5);
        assert!(views.distribution.is_ok());
        assert_eq!(views.visible_rows.len(), 5);
        assert!(matches!(views.detail, Err(ViewError::NoData(_))));
    }

    #[test]
    fn sex_change_refreshes_charts() {
        let mut state = loaded();
        state.set_sex(SexFilter::Male);
        let views = state.views.as_ref().unwrap();
        let sex = views.sex.as_ref().unwrap();
        assert_eq!(sex.len(), 1);
        assert_eq!(sex[0].count, 2);
        assert_eq!(views.distribution.as_ref().unwrap().total(), 2);
    }

    #[test]
    fn table_change_clears_selection() {
        let mut state = loaded();
        state.select(Some(4));
        assert_eq!(state.views.as_ref().unwrap().detail.as_ref().unwrap().id, 4);

        state.set_diagnosis(DiagnosisFilter::Diseased);
        assert_eq!(state.selected_id, None);
        let views = state.views.as_ref().unwrap();
        let ids: Vec<usize> = views.visible_rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 5]);
        assert!(views.detail.is_err());
    }

    #[test]
    fn sort_toggles_direction() {
        let mut state = loaded();
        state.toggle_sort(TableColumn::Age);
        let first = state.views.as_ref().unwrap().visible_rows[0].id;
        assert_eq!(first, 1);
        state.toggle_sort(TableColumn::Age);
        let first = state.views.as_ref().unwrap().visible_rows[0].id;
        assert_eq!(first, 5);
    }

    #[test]
    fn query_narrows_visible_rows_only() {
        let mut state = loaded();
        state.set_table_query("Feminino".to_string());
        let views = state.views.as_ref().unwrap();
        assert_eq!(views.visible_rows.len(), 3);
        assert_eq!(views.table.as_ref().unwrap().len(), 5);
    }
}
