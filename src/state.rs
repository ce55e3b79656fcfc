use std::collections::BTreeSet;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Settings;
use crate::data::filter::{age_bounds, apply_filters, FilterCriteria};
use crate::data::schema::employee;
use crate::data::store::{DatasetStore, Datasets};
use crate::data::summary::{AttritionSummary, CorrelationsAndKpis, DeepAnalysis, HappinessInsights};

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    AttritionSummary,
    HappinessInsights,
    DeepAnalysis,
    CorrelationsKpis,
}

impl Tab {
    pub const ALL: [Tab; 4] = [
        Tab::AttritionSummary,
        Tab::HappinessInsights,
        Tab::DeepAnalysis,
        Tab::CorrelationsKpis,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Tab::AttritionSummary => "📊 Attrition Summary",
            Tab::HappinessInsights => "😊 Happiness Score Insights",
            Tab::DeepAnalysis => "📈 Deep Analysis",
            Tab::CorrelationsKpis => "📌 Correlation & KPIs",
        }
    }
}

/// Which filter set a toggle applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facet {
    Department,
    JobRole,
}

impl Facet {
    pub fn column(self) -> &'static str {
        match self {
            Facet::Department => employee::DEPARTMENT,
            Facet::JobRole => employee::JOB_ROLE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Facet::Department => "Department",
            Facet::JobRole => "Job Role",
        }
    }
}

// ---------------------------------------------------------------------------
// Derived per-render data
// ---------------------------------------------------------------------------

/// Summaries for the views that follow the filter.
#[derive(Debug, Clone)]
pub struct FilteredViews {
    pub matching_rows: usize,
    pub attrition: AttritionSummary,
    pub deep: DeepAnalysis,
}

/// Summaries over the unfiltered tables, computed once per load.
#[derive(Debug, Clone)]
pub struct StaticViews {
    pub happiness: HappinessInsights,
    pub correlations: CorrelationsAndKpis,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded tables (None until a load succeeds).
    pub datasets: Option<Arc<Datasets>>,

    /// Current filter selection.
    pub criteria: FilterCriteria,

    /// Department / job role universes, for the filter widgets.
    pub departments: BTreeSet<String>,
    pub job_roles: BTreeSet<String>,

    /// Slider limits for the age filter.
    pub age_limits: (i64, i64),

    pub filtered: Option<FilteredViews>,
    pub fixed: Option<StaticViews>,

    pub active_tab: Tab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    default_age: (i64, i64),
    bins: usize,
    exclusions: Vec<String>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Self {
        Self {
            datasets: None,
            criteria: FilterCriteria {
                departments: BTreeSet::new(),
                job_roles: BTreeSet::new(),
                age_range: settings.default_age_range(),
            },
            departments: BTreeSet::new(),
            job_roles: BTreeSet::new(),
            age_limits: settings.default_age_range(),
            filtered: None,
            fixed: None,
            active_tab: Tab::default(),
            status_message: None,
            default_age: settings.default_age_range(),
            bins: usize::from(settings.bins),
            exclusions: settings.exclude.clone(),
        }
    }

    /// Load through `store`, reporting failure in the status line.
    pub fn load_from(&mut self, store: &DatasetStore) {
        if store.is_loaded() {
            log::debug!("Reusing cached datasets");
        }
        match store.load().and_then(|ds| self.set_datasets(ds)) {
            Ok(()) => {
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to load datasets: {e:#}");
                self.datasets = None;
                self.filtered = None;
                self.fixed = None;
                self.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }

    /// Ingest newly loaded tables, reset filters and recompute every view.
    pub fn set_datasets(&mut self, datasets: Arc<Datasets>) -> Result<()> {
        let employees = &datasets.employees;
        self.criteria = FilterCriteria::from_table(employees, self.default_age)?;
        self.departments = self.criteria.departments.clone();
        self.job_roles = self.criteria.job_roles.clone();
        self.age_limits = age_bounds(employees)?.unwrap_or(self.default_age);

        let exclusions: Vec<&str> = self.exclusions.iter().map(String::as_str).collect();
        self.fixed = Some(StaticViews {
            happiness: HappinessInsights::compute(&datasets.happiness)?,
            correlations: CorrelationsAndKpis::compute(employees, &datasets.happiness, &exclusions)?,
        });

        self.datasets = Some(datasets);
        self.refilter();
        Ok(())
    }

    /// Recompute the filtered views after a criteria change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.datasets else {
            return;
        };
        let result = apply_filters(&ds.employees, &self.criteria).and_then(|filtered| {
            Ok(FilteredViews {
                matching_rows: filtered.len(),
                attrition: AttritionSummary::compute(&ds.employees, &filtered, self.bins)?,
                deep: DeepAnalysis::compute(&filtered, self.bins)?,
            })
        });
        match result {
            Ok(views) => {
                self.filtered = Some(views);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to recompute filtered views: {e}");
                self.filtered = None;
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    fn selection_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Department => &mut self.criteria.departments,
            Facet::JobRole => &mut self.criteria.job_roles,
        }
    }

    pub fn selection(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Department => &self.criteria.departments,
            Facet::JobRole => &self.criteria.job_roles,
        }
    }

    pub fn universe(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Department => &self.departments,
            Facet::JobRole => &self.job_roles,
        }
    }

    /// Toggle a single value in a facet's selection.
    pub fn toggle_filter_value(&mut self, facet: Facet, value: &str) {
        let selected = self.selection_mut(facet);
        if !selected.remove(value) {
            selected.insert(value.to_string());
        }
        self.refilter();
    }

    /// Select all values in a facet.
    pub fn select_all(&mut self, facet: Facet) {
        let all = self.universe(facet).clone();
        *self.selection_mut(facet) = all;
        self.refilter();
    }

    /// Deselect all values in a facet.
    pub fn select_none(&mut self, facet: Facet) {
        self.selection_mut(facet).clear();
        self.refilter();
    }

    pub fn set_age_range(&mut self, min: i64, max: i64) {
        if self.criteria.age_range != (min, max) {
            self.criteria.age_range = (min, max);
            self.refilter();
        }
    }
}
