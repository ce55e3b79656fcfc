// ---------------------------------------------------------------------------
// Per-tab bundles of the summaries each dashboard view draws.
// ---------------------------------------------------------------------------

use super::aggregate::{
    box_stats, correlation_matrix, format_fixed, group_count, histogram, mean, numeric_columns,
    scalar_kpis, scatter_series, BoxStats, CorrelationMatrix, GroupCounts, Histogram, RatePredicate,
    ScalarKpis, ScatterSeries,
};
use super::error::SchemaError;
use super::model::Table;
use super::schema::{employee, happiness};

const ATTRITION_RATE: RatePredicate<'static> = RatePredicate {
    column: employee::ATTRITION,
    equals: employee::ATTRITION_YES,
};

/// "Attrition Summary" tab.
#[derive(Debug, Clone, PartialEq)]
pub struct AttritionSummary {
    /// Attrition counts over the unfiltered table.
    pub overall: GroupCounts,
    pub by_department: GroupCounts,
    pub by_job_role: GroupCounts,
    pub age_distribution: Histogram,
    pub income_by_attrition: Vec<BoxStats>,
}

impl AttritionSummary {
    pub fn compute(full: &Table, filtered: &Table, bins: usize) -> Result<Self, SchemaError> {
        Ok(Self {
            overall: group_count(full, employee::ATTRITION, employee::ATTRITION)?,
            by_department: group_count(filtered, employee::DEPARTMENT, employee::ATTRITION)?,
            by_job_role: group_count(filtered, employee::JOB_ROLE, employee::ATTRITION)?,
            age_distribution: histogram(filtered, employee::AGE, employee::ATTRITION, bins)?,
            income_by_attrition: box_stats(
                filtered,
                employee::ATTRITION,
                employee::MONTHLY_INCOME,
                None,
            )?,
        })
    }
}

/// "Happiness Score Insights" tab. Always computed from the full table.
#[derive(Debug, Clone, PartialEq)]
pub struct HappinessInsights {
    pub score_by_region: Vec<BoxStats>,
    /// Every country's score per region, drawn over the boxes.
    pub region_points: Vec<ScatterSeries>,
    pub gdp_vs_score: Vec<ScatterSeries>,
    pub hdi_vs_score: Vec<ScatterSeries>,
    pub alcohol_vs_score: Vec<ScatterSeries>,
}

impl HappinessInsights {
    pub fn compute(table: &Table) -> Result<Self, SchemaError> {
        use happiness::*;
        Ok(Self {
            score_by_region: box_stats(table, REGION, HAPPINESS_SCORE, None)?,
            region_points: scatter_series(table, HAPPINESS_SCORE, HAPPINESS_SCORE, REGION, Some(COUNTRY))?,
            gdp_vs_score: scatter_series(table, GDP_PER_CAPITA, HAPPINESS_SCORE, REGION, Some(COUNTRY))?,
            hdi_vs_score: scatter_series(table, HDI, HAPPINESS_SCORE, REGION, Some(COUNTRY))?,
            alcohol_vs_score: scatter_series(
                table,
                ALCOHOL_CONSUMPTION,
                HAPPINESS_SCORE,
                REGION,
                Some(COUNTRY),
            )?,
        })
    }
}

/// "Deep Analysis" tab.
#[derive(Debug, Clone, PartialEq)]
pub struct DeepAnalysis {
    pub by_education_field: GroupCounts,
    pub by_business_travel: GroupCounts,
    pub by_gender: GroupCounts,
    pub age_by_work_life_balance: Vec<BoxStats>,
    pub distance_from_home: Histogram,
}

impl DeepAnalysis {
    pub fn compute(filtered: &Table, bins: usize) -> Result<Self, SchemaError> {
        use employee::*;
        Ok(Self {
            by_education_field: group_count(filtered, EDUCATION_FIELD, ATTRITION)?,
            by_business_travel: group_count(filtered, BUSINESS_TRAVEL, ATTRITION)?,
            by_gender: group_count(filtered, GENDER, ATTRITION)?,
            age_by_work_life_balance: box_stats(filtered, WORK_LIFE_BALANCE, AGE, Some(ATTRITION))?,
            distance_from_home: histogram(filtered, DISTANCE_FROM_HOME, ATTRITION, bins)?,
        })
    }
}

/// Headline numbers shown on the "Correlations & KPIs" tab.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiSnapshot {
    pub employees: ScalarKpis,
    pub happiness_mean: f64,
}

impl KpiSnapshot {
    pub fn compute(employees: &Table, happiness_table: &Table) -> Result<Self, SchemaError> {
        Ok(Self {
            employees: scalar_kpis(employees, ATTRITION_RATE, employee::MONTHLY_INCOME)?,
            happiness_mean: mean(happiness_table, happiness::HAPPINESS_SCORE)?,
        })
    }

    pub fn total_employees(&self) -> usize {
        self.employees.total_count
    }

    pub fn attrition_rate_label(&self) -> String {
        self.employees.positive_rate_label()
    }

    pub fn avg_happiness_label(&self) -> String {
        format_fixed(self.happiness_mean)
    }
}

/// "Correlations & KPIs" tab. Always computed from the full tables.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationsAndKpis {
    pub employee_correlation: CorrelationMatrix,
    pub happiness_correlation: CorrelationMatrix,
    pub kpis: KpiSnapshot,
}

impl CorrelationsAndKpis {
    /// `exclude` names employee columns kept out of the heatmap.
    pub fn compute(employees: &Table, happiness_table: &Table, exclude: &[&str]) -> Result<Self, SchemaError> {
        let employee_cols = numeric_columns(employees, exclude);
        let happiness_cols = numeric_columns(happiness_table, &happiness::IDENTIFIERS);
        Ok(Self {
            employee_correlation: correlation_matrix(employees, &employee_cols)?,
            happiness_correlation: correlation_matrix(happiness_table, &happiness_cols)?,
            kpis: KpiSnapshot::compute(employees, happiness_table)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{employee_row, employee_table, happiness_row, happiness_table};
    use crate::data::model::Value;

    fn employees() -> Table {
        employee_table(&[
            employee_row(1, "Sales", "Rep", 30, "Yes"),
            employee_row(2, "Sales", "Rep", 50, "No"),
            employee_row(3, "HR", "Mgr", 40, "No"),
            employee_row(4, "HR", "Rep", 35, "No"),
        ])
    }

    fn world() -> Table {
        happiness_table(&[
            happiness_row("Denmark", "Western Europe", 7.5, 57.0, 0.93, 10.4),
            happiness_row("Chad", "Sub-Saharan Africa", 3.8, 0.8, 0.40, 1.2),
            happiness_row("Japan", "East Asia", 5.9, 39.0, 0.91, 7.7),
        ])
    }

    #[test]
    fn test_attrition_overall_uses_full_table() {
        let full = employees();
        let filtered = full.select(&[2]);
        let summary = AttritionSummary::compute(&full, &filtered, 20).unwrap();
        assert_eq!(summary.overall.total(), 4);
        assert_eq!(summary.by_department.total(), 1);
        assert_eq!(summary.by_department.categories, vec![Value::from("HR")]);
        assert_eq!(summary.age_distribution.total(), 1);
        assert_eq!(summary.income_by_attrition.len(), 1);
    }

    #[test]
    fn test_deep_analysis_on_empty_filter() {
        let filtered = employees().select(&[]);
        let deep = DeepAnalysis::compute(&filtered, 20).unwrap();
        assert!(deep.by_gender.is_empty());
        assert!(deep.age_by_work_life_balance.is_empty());
        assert!(deep.distance_from_home.bins.is_empty());
    }

    #[test]
    fn test_happiness_insights_series_per_region() {
        let insights = HappinessInsights::compute(&world()).unwrap();
        assert_eq!(insights.score_by_region.len(), 3);
        assert_eq!(insights.gdp_vs_score.len(), 3);
        assert_eq!(insights.region_points.iter().map(|s| s.points.len()).sum::<usize>(), 3);
    }

    #[test]
    fn test_correlations_exclude_identifier_columns() {
        let tab = CorrelationsAndKpis::compute(
            &employees(),
            &world(),
            &employee::DEFAULT_CORRELATION_EXCLUSIONS,
        )
        .unwrap();
        assert!(!tab
            .employee_correlation
            .columns
            .contains(&employee::EMPLOYEE_NUMBER.to_string()));
        assert!(tab
            .employee_correlation
            .columns
            .contains(&employee::AGE.to_string()));
        assert_eq!(
            tab.happiness_correlation.columns,
            vec![
                happiness::HAPPINESS_SCORE.to_string(),
                happiness::GDP_PER_CAPITA.to_string(),
                happiness::HDI.to_string(),
                happiness::ALCOHOL_CONSUMPTION.to_string(),
            ]
        );
    }

    #[test]
    fn test_kpi_snapshot_labels() {
        let kpis = KpiSnapshot::compute(&employees(), &world()).unwrap();
        assert_eq!(kpis.total_employees(), 4);
        assert_eq!(kpis.attrition_rate_label(), "25.00%");
        // (7.5 + 3.8 + 5.9) / 3
        assert_eq!(kpis.avg_happiness_label(), "5.73");
    }
}
