use std::ops::RangeInclusive;

use eframe::egui::Ui;
use egui_plot::{
    uniform_grid_spacer, Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot,
    PlotPoint, Points,
};

use crate::color::ColorMap;
use crate::data::aggregate::{BoxStats, GroupCounts, Histogram, ScatterSeries};
use crate::data::model::Value;

// ---------------------------------------------------------------------------
// Chart widgets (central panel)
// ---------------------------------------------------------------------------

const CHART_HEIGHT: f32 = 260.0;

/// Shared plot configuration: fixed height, legend, no scroll-zoom so the
/// surrounding scroll area keeps working.
fn base_plot(id: &str, x_label: &str, y_label: &str) -> Plot<'static> {
    Plot::new(id.to_string())
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(x_label.to_string())
        .y_axis_label(y_label.to_string())
        .allow_scroll(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_zoom(true)
}

/// Axis formatter that prints `labels[i]` at integer position `i`.
fn category_formatter(labels: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark, _range| {
        let idx = mark.value.round();
        if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
            return String::new();
        }
        labels.get(idx as usize).cloned().unwrap_or_default()
    }
}

fn category_plot(id: &str, x_label: &str, y_label: &str, labels: Vec<String>) -> Plot<'static> {
    base_plot(id, x_label, y_label)
        .x_grid_spacer(uniform_grid_spacer(|_| [1.0, 5.0, 10.0]))
        .x_axis_formatter(category_formatter(labels))
}

fn empty_notice(ui: &mut Ui) {
    ui.weak("No rows match the current filters.");
}

/// Side-by-side bars: one group per category, one bar per split value.
pub fn grouped_bars(ui: &mut Ui, id: &str, counts: &GroupCounts, colors: &ColorMap) {
    if counts.is_empty() {
        empty_notice(ui);
        return;
    }
    let labels: Vec<String> = counts.categories.iter().map(Value::to_string).collect();
    let n_splits = counts.splits.len().max(1);
    let width = 0.8 / n_splits as f64;

    let charts: Vec<BarChart> = counts
        .splits
        .iter()
        .enumerate()
        .map(|(k, split)| {
            let offset = (k as f64 - (n_splits as f64 - 1.0) / 2.0) * width;
            let bars = counts
                .series(split)
                .into_iter()
                .enumerate()
                .map(|(i, n)| Bar::new(i as f64 + offset, n as f64).width(width))
                .collect();
            BarChart::new(bars)
                .name(split.to_string())
                .color(colors.color_for(split))
        })
        .collect();

    category_plot(id, &counts.category_column, "count", labels).show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

/// One bar per split value with the category on the x axis, e.g. the
/// overall attrition count.
pub fn count_bars(ui: &mut Ui, id: &str, counts: &GroupCounts, colors: &ColorMap) {
    if counts.is_empty() {
        empty_notice(ui);
        return;
    }
    let labels: Vec<String> = counts.categories.iter().map(Value::to_string).collect();
    let charts: Vec<BarChart> = counts
        .categories
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let total: usize = counts.splits.iter().map(|s| counts.get(category, s)).sum();
            BarChart::new(vec![Bar::new(i as f64, total as f64).width(0.6)])
                .name(category.to_string())
                .color(colors.color_for(category))
        })
        .collect();

    category_plot(id, &counts.category_column, "count", labels).show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

/// Stacked histogram, one layer per split value.
pub fn histogram(ui: &mut Ui, id: &str, hist: &Histogram, colors: &ColorMap) {
    if hist.total() == 0 {
        empty_notice(ui);
        return;
    }

    let mut charts: Vec<BarChart> = Vec::new();
    for (split, counts) in &hist.counts {
        let bars = hist
            .bins
            .iter()
            .zip(counts)
            .map(|(bin, n)| Bar::new(bin.center(), *n as f64).width(bin.width().max(0.5)))
            .collect();
        let chart = BarChart::new(bars)
            .name(split.to_string())
            .color(colors.color_for(split));
        let chart = {
            let below: Vec<&BarChart> = charts.iter().collect();
            chart.stack_on(&below)
        };
        charts.push(chart);
    }

    base_plot(id, &hist.column, "count").show(ui, |plot_ui| {
        for chart in charts {
            plot_ui.bar_chart(chart);
        }
    });
}

/// Box plots positioned by group; split values sit side by side within a
/// group. `colors` is keyed by split value, or by group when unsplit.
pub fn box_plot(ui: &mut Ui, id: &str, y_label: &str, boxes: &[BoxStats], colors: &ColorMap) {
    box_plot_with_points(ui, id, "", y_label, boxes, &[], colors);
}

/// [`box_plot`] with every underlying observation drawn over its box.
/// `points` are matched to boxes by group and plotted at their `y`.
pub fn box_plot_with_points(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    boxes: &[BoxStats],
    points: &[ScatterSeries],
    colors: &ColorMap,
) {
    if boxes.is_empty() {
        empty_notice(ui);
        return;
    }

    let mut groups: Vec<&Value> = boxes.iter().map(|b| &b.group).collect();
    groups.dedup();
    let mut splits: Vec<&Value> = boxes.iter().filter_map(|b| b.split.as_ref()).collect();
    splits.sort();
    splits.dedup();

    let n_splits = splits.len().max(1);
    let width = 0.7 / n_splits as f64;
    let position = |b: &BoxStats| {
        let g = groups.iter().position(|v| *v == &b.group).unwrap_or(0) as f64;
        let k = b
            .split
            .as_ref()
            .and_then(|s| splits.iter().position(|v| *v == s))
            .unwrap_or(0) as f64;
        g + (k - (n_splits as f64 - 1.0) / 2.0) * width
    };

    // One BoxPlot per colour key so the legend lists splits (or groups).
    let mut plots: Vec<(Value, Vec<BoxElem>)> = Vec::new();
    let mut outliers: Vec<[f64; 2]> = Vec::new();
    for b in boxes {
        let x = position(b);
        let key = b.split.clone().unwrap_or_else(|| b.group.clone());
        let elem = BoxElem::new(
            x,
            BoxSpread::new(b.lower_whisker, b.q1, b.median, b.q3, b.upper_whisker),
        )
        .name(format!("{} (n={}, mean={:.2})", key, b.count, b.mean))
        .box_width(width * 0.9)
        .whisker_width(width * 0.5);
        match plots.iter_mut().find(|(k, _)| *k == key) {
            Some((_, elems)) => elems.push(elem),
            None => plots.push((key, vec![elem])),
        }
        outliers.extend(b.outliers.iter().map(|y| [x, *y]));
    }

    let labels: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
    let overlay: Vec<(Value, Vec<[f64; 2]>)> = points
        .iter()
        .map(|s| {
            let x = groups.iter().position(|g| *g == &s.group).unwrap_or(0) as f64;
            (s.group.clone(), s.points.iter().map(|p| [x, p.y]).collect())
        })
        .collect();

    category_plot(id, x_label, y_label, labels).show(ui, |plot_ui| {
        for (key, elems) in plots {
            plot_ui.box_plot(
                BoxPlot::new(elems)
                    .name(key.to_string())
                    .color(colors.color_for(&key)),
            );
        }
        if !outliers.is_empty() {
            plot_ui.points(Points::new(outliers).radius(2.5).name("outliers"));
        }
        for (group, pts) in overlay {
            plot_ui.points(
                Points::new(pts)
                    .radius(2.0)
                    .color(colors.color_for(&group))
                    .name(group.to_string()),
            );
        }
    });
}

/// Labelled scatter points for hover lookup. Distances are measured with
/// each axis divided by its span, so a wide x axis (e.g. GDP) does not
/// drown out the y axis.
struct LabelIndex {
    points: Vec<(f64, f64, String)>,
    x_span: f64,
    y_span: f64,
}

fn span(values: impl Iterator<Item = f64>) -> f64 {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    let span = hi - lo;
    if span.is_finite() && span > 0.0 {
        span
    } else {
        1.0
    }
}

impl LabelIndex {
    fn new(series: &[ScatterSeries]) -> Self {
        let points: Vec<(f64, f64, String)> = series
            .iter()
            .flat_map(|s| s.points.iter())
            .filter_map(|p| p.label.clone().map(|l| (p.x, p.y, l)))
            .collect();
        LabelIndex {
            x_span: span(points.iter().map(|p| p.0)),
            y_span: span(points.iter().map(|p| p.1)),
            points,
        }
    }

    fn nearest(&self, x: f64, y: f64) -> Option<&str> {
        let distance = |p: &(f64, f64, String)| {
            ((p.0 - x) / self.x_span).powi(2) + ((p.1 - y) / self.y_span).powi(2)
        };
        self.points
            .iter()
            .min_by(|a, b| distance(a).total_cmp(&distance(b)))
            .map(|p| p.2.as_str())
    }
}

/// Scatter plot, one colour per series. Hovering shows the nearest point's
/// label when the series carry labels.
pub fn scatter(
    ui: &mut Ui,
    id: &str,
    x_label: &str,
    y_label: &str,
    series: &[ScatterSeries],
    colors: &ColorMap,
) {
    if series.is_empty() {
        empty_notice(ui);
        return;
    }

    let labels = LabelIndex::new(series);
    let (x_name, y_name) = (x_label.to_string(), y_label.to_string());

    base_plot(id, x_label, y_label)
        .label_formatter(move |_name, value: &PlotPoint| {
            let nearest = labels
                .nearest(value.x, value.y)
                .map(|l| format!("{l}\n"))
                .unwrap_or_default();
            format!("{nearest}{x_name}: {:.2}\n{y_name}: {:.2}", value.x, value.y)
        })
        .show(ui, |plot_ui| {
            for s in series {
                let pts: Vec<[f64; 2]> = s.points.iter().map(|p| [p.x, p.y]).collect();
                plot_ui.points(
                    Points::new(pts)
                        .radius(3.5)
                        .color(colors.color_for(&s.group))
                        .name(s.group.to_string()),
                );
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::aggregate::ScatterPoint;

    fn country(x: f64, y: f64, name: &str) -> ScatterPoint {
        ScatterPoint {
            x,
            y,
            label: Some(name.to_string()),
        }
    }

    #[test]
    fn test_nearest_label_scales_each_axis() {
        // GDP spans tens of thousands, happiness a few points.
        let series = vec![ScatterSeries {
            group: Value::from("Europe"),
            points: vec![
                country(40_000.0, 7.5, "Denmark"),
                country(40_400.0, 3.8, "Chad"),
                country(0.0, 2.0, "Low"),
                country(80_000.0, 8.0, "High"),
            ],
        }];
        let labels = LabelIndex::new(&series);
        // Closer to Chad in raw units, but Denmark once both axes are scaled.
        assert_eq!(labels.nearest(40_300.0, 7.4), Some("Denmark"));
        assert_eq!(labels.nearest(40_100.0, 3.9), Some("Chad"));
    }

    #[test]
    fn test_nearest_label_without_labels() {
        let series = vec![ScatterSeries {
            group: Value::from("Europe"),
            points: vec![ScatterPoint {
                x: 1.0,
                y: 1.0,
                label: None,
            }],
        }];
        assert_eq!(LabelIndex::new(&series).nearest(1.0, 1.0), None);
    }

    #[test]
    fn test_span_of_constant_axis_is_one() {
        assert_eq!(span([5.0, 5.0].into_iter()), 1.0);
        assert_eq!(span(std::iter::empty()), 1.0);
        assert_eq!(span([2.0, 8.0].into_iter()), 6.0);
    }
}
