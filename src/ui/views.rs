use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::color::{ColorMap, ColorScale};
use crate::data::model::Value;
use crate::data::schema::{employee, happiness};
use crate::data::summary::{AttritionSummary, CorrelationsAndKpis, DeepAnalysis, HappinessInsights};
use crate::state::{AppState, Tab};

use super::heatmap::correlation_heatmap;
use super::plot;

// ---------------------------------------------------------------------------
// Central panel – one renderer per tab
// ---------------------------------------------------------------------------

/// Render the active tab.
pub fn show(ui: &mut Ui, state: &AppState) {
    ui.heading(state.active_tab.title());
    ui.separator();

    let Some(ds) = &state.datasets else {
        ui.label("No dataset loaded. Use File → Open to pick the data files.");
        return;
    };

    let attrition: Vec<Value> = employee::ATTRITION_VALUES
        .iter()
        .map(|v| Value::from(*v))
        .collect();
    let attrition_colors = ColorMap::new(&attrition);
    let region_colors = ColorMap::new(
        ds.happiness
            .unique_values
            .get(happiness::REGION)
            .into_iter()
            .flatten(),
    );

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| match state.active_tab {
            Tab::AttritionSummary => {
                if let Some(views) = &state.filtered {
                    attrition_summary(ui, &views.attrition, &attrition_colors);
                }
            }
            Tab::HappinessInsights => {
                if let Some(fixed) = &state.fixed {
                    happiness_insights(ui, &fixed.happiness, &region_colors);
                }
            }
            Tab::DeepAnalysis => {
                if let Some(views) = &state.filtered {
                    deep_analysis(ui, &views.deep, &attrition_colors);
                }
            }
            Tab::CorrelationsKpis => {
                if let Some(fixed) = &state.fixed {
                    correlations_and_kpis(ui, &fixed.correlations);
                }
            }
        });
}

fn section(ui: &mut Ui, title: &str) {
    ui.add_space(8.0);
    ui.label(RichText::new(title).strong().size(16.0));
}

fn attrition_summary(ui: &mut Ui, summary: &AttritionSummary, colors: &ColorMap) {
    section(
        ui,
        &format!("Attrition Count ({} employees)", summary.overall.total()),
    );
    plot::count_bars(ui, "attrition_overall", &summary.overall, colors);

    section(ui, "Attrition by Department");
    plot::grouped_bars(ui, "attrition_department", &summary.by_department, colors);

    section(ui, "Attrition by Job Role");
    plot::grouped_bars(ui, "attrition_job_role", &summary.by_job_role, colors);

    section(ui, "Age Distribution by Attrition");
    plot::histogram(ui, "age_distribution", &summary.age_distribution, colors);

    section(ui, "Monthly Income by Attrition");
    plot::box_plot(
        ui,
        "income_by_attrition",
        employee::MONTHLY_INCOME,
        &summary.income_by_attrition,
        colors,
    );
}

fn happiness_insights(ui: &mut Ui, insights: &HappinessInsights, colors: &ColorMap) {
    section(ui, "Happiness Score by Region");
    plot::box_plot_with_points(
        ui,
        "score_by_region",
        happiness::REGION,
        happiness::HAPPINESS_SCORE,
        &insights.score_by_region,
        &insights.region_points,
        colors,
    );

    section(ui, "GDP per Capita vs Happiness Score");
    plot::scatter(
        ui,
        "gdp_vs_score",
        happiness::GDP_PER_CAPITA,
        happiness::HAPPINESS_SCORE,
        &insights.gdp_vs_score,
        colors,
    );

    section(ui, "HDI vs Happiness Score");
    plot::scatter(
        ui,
        "hdi_vs_score",
        happiness::HDI,
        happiness::HAPPINESS_SCORE,
        &insights.hdi_vs_score,
        colors,
    );

    section(ui, "Alcohol Consumption vs Happiness Score");
    plot::scatter(
        ui,
        "alcohol_vs_score",
        happiness::ALCOHOL_CONSUMPTION,
        happiness::HAPPINESS_SCORE,
        &insights.alcohol_vs_score,
        colors,
    );
}

fn deep_analysis(ui: &mut Ui, deep: &DeepAnalysis, colors: &ColorMap) {
    section(ui, "Education Field vs Attrition");
    plot::grouped_bars(ui, "education_field", &deep.by_education_field, colors);

    section(ui, "Business Travel vs Attrition");
    plot::grouped_bars(ui, "business_travel", &deep.by_business_travel, colors);

    section(ui, "Gender vs Attrition");
    plot::grouped_bars(ui, "gender", &deep.by_gender, colors);

    section(ui, "Age by Work-Life Balance and Attrition");
    plot::box_plot_with_points(
        ui,
        "age_by_work_life_balance",
        employee::WORK_LIFE_BALANCE,
        employee::AGE,
        &deep.age_by_work_life_balance,
        &[],
        colors,
    );

    section(ui, "Distance from Home by Attrition");
    plot::histogram(ui, "distance_from_home", &deep.distance_from_home, colors);
}

fn correlations_and_kpis(ui: &mut Ui, tab: &CorrelationsAndKpis) {
    section(ui, "Key Metrics");
    ui.columns(3, |cols: &mut [Ui]| {
        metric(&mut cols[0], "Total Employees", &tab.kpis.total_employees().to_string());
        metric(&mut cols[1], "Attrition Rate", &tab.kpis.attrition_rate_label());
        metric(&mut cols[2], "Avg Happiness", &tab.kpis.avg_happiness_label());
    });

    section(ui, "Employee Correlation Heatmap");
    correlation_heatmap(
        ui,
        "employee_correlation",
        &tab.employee_correlation,
        ColorScale::CoolWarm,
    );

    section(ui, "Happiness Correlation Heatmap");
    correlation_heatmap(
        ui,
        "happiness_correlation",
        &tab.happiness_correlation,
        ColorScale::YellowGreenBlue,
    );
}

fn metric(ui: &mut Ui, label: &str, value: &str) {
    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.vertical_centered(|ui: &mut Ui| {
            ui.weak(label);
            ui.label(RichText::new(value).size(24.0).strong());
        });
    });
}
