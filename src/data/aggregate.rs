// ---------------------------------------------------------------------------
// Pure summaries over a `Table`: grouped counts, correlation matrices,
// scalar KPIs, histograms, box-plot statistics and scatter series.
//
// Every function here fails only with a `SchemaError` for an absent (or,
// for numeric summaries, non-numeric) column. Empty tables and degenerate
// data produce empty collections or `NaN`, never an error.
// ---------------------------------------------------------------------------

use std::collections::{BTreeMap, BTreeSet};

use super::error::SchemaError;
use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Grouped counts
// ---------------------------------------------------------------------------

/// Row counts per (category, split) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupCounts {
    pub category_column: String,
    pub split_column: String,
    /// Every category value present in the input, sorted.
    pub categories: Vec<Value>,
    /// Every split value present in the input, sorted.
    pub splits: Vec<Value>,
    /// One entry per category × split, zero counts included.
    pub counts: BTreeMap<(Value, Value), usize>,
}

impl GroupCounts {
    pub fn get(&self, category: &Value, split: &Value) -> usize {
        self.counts
            .get(&(category.clone(), split.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Counts for one split value, in `categories` order.
    pub fn series(&self, split: &Value) -> Vec<usize> {
        self.categories.iter().map(|c| self.get(c, split)).collect()
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Count rows per `category` value, broken down by `split` value.
pub fn group_count(table: &Table, category: &str, split: &str) -> Result<GroupCounts, SchemaError> {
    let cats = table.values(category)?;
    let splits = table.values(split)?;

    let categories: BTreeSet<&Value> = cats.iter().copied().collect();
    let split_values: BTreeSet<&Value> = splits.iter().copied().collect();

    let mut counts: BTreeMap<(Value, Value), usize> = BTreeMap::new();
    for c in &categories {
        for s in &split_values {
            counts.insert(((*c).clone(), (*s).clone()), 0);
        }
    }
    for (c, s) in cats.into_iter().zip(splits) {
        *counts.entry((c.clone(), s.clone())).or_default() += 1;
    }

    Ok(GroupCounts {
        category_column: category.to_string(),
        split_column: split.to_string(),
        categories: categories.into_iter().cloned().collect(),
        splits: split_values.into_iter().cloned().collect(),
        counts,
    })
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Symmetric matrix of Pearson coefficients, indexed by `columns`.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[row][col]
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Numeric columns of `table` in source order, minus `exclude`.
pub fn numeric_columns(table: &Table, exclude: &[&str]) -> Vec<String> {
    table
        .numeric_columns()
        .into_iter()
        .filter(|c| !exclude.iter().any(|e| e == c))
        .map(str::to_string)
        .collect()
}

/// Pearson correlation of every pair in `columns`.
///
/// Pairs are computed over rows where both values are present. A column
/// with zero variance correlates as `NaN` with everything, itself included.
pub fn correlation_matrix(table: &Table, columns: &[String]) -> Result<CorrelationMatrix, SchemaError> {
    let data = columns
        .iter()
        .map(|c| table.numeric(c))
        .collect::<Result<Vec<_>, _>>()?;

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&data[i], &data[j]);
            let r = if i == j && !r.is_nan() { 1.0 } else { r };
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let pairs: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| !x.is_nan() && !y.is_nan())
        .map(|(x, y)| (*x, *y))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    (sxy / (sxx.sqrt() * syy.sqrt())).clamp(-1.0, 1.0)
}

// ---------------------------------------------------------------------------
// Scalar KPIs
// ---------------------------------------------------------------------------

/// Rows counted as positive: `column == equals`.
#[derive(Debug, Clone, Copy)]
pub struct RatePredicate<'a> {
    pub column: &'a str,
    pub equals: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarKpis {
    pub total_count: usize,
    /// Percentage (0–100) of rows matching the predicate.
    pub positive_rate: f64,
    pub mean: f64,
}

impl ScalarKpis {
    pub fn positive_rate_label(&self) -> String {
        format_percent(self.positive_rate)
    }
}

pub fn scalar_kpis(
    table: &Table,
    rate: RatePredicate<'_>,
    mean_column: &str,
) -> Result<ScalarKpis, SchemaError> {
    Ok(ScalarKpis {
        total_count: table.len(),
        positive_rate: positive_rate(table, rate)?,
        mean: mean(table, mean_column)?,
    })
}

/// Percentage of rows satisfying `rate`; `NaN` for an empty table.
pub fn positive_rate(table: &Table, rate: RatePredicate<'_>) -> Result<f64, SchemaError> {
    let values = table.values(rate.column)?;
    if table.is_empty() {
        return Ok(f64::NAN);
    }
    let hits = values
        .iter()
        .filter(|v| v.as_str() == Some(rate.equals))
        .count();
    Ok(hits as f64 / values.len() as f64 * 100.0)
}

/// Arithmetic mean of the present values of a numeric column.
pub fn mean(table: &Table, column: &str) -> Result<f64, SchemaError> {
    let present: Vec<f64> = table
        .numeric(column)?
        .into_iter()
        .filter(|v| !v.is_nan())
        .collect();
    if present.is_empty() {
        return Ok(f64::NAN);
    }
    Ok(present.iter().sum::<f64>() / present.len() as f64)
}

pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

pub fn format_fixed(value: f64) -> String {
    format!("{value:.2}")
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.lower + self.upper) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Equal-width bins over a numeric column with counts per split value.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub column: String,
    pub split_column: String,
    pub bins: Vec<Bin>,
    /// split value → one count per bin.
    pub counts: BTreeMap<Value, Vec<usize>>,
}

impl Histogram {
    pub fn total(&self) -> usize {
        self.counts.values().flatten().sum()
    }
}

/// Bin `column` into `bins` equal-width intervals over its observed range.
/// The last interval is closed so the maximum lands in it.
pub fn histogram(table: &Table, column: &str, split: &str, bins: usize) -> Result<Histogram, SchemaError> {
    let xs = table.numeric(column)?;
    let splits = table.values(split)?;

    let present: Vec<(f64, &Value)> = xs
        .into_iter()
        .zip(splits)
        .filter(|(x, _)| !x.is_nan())
        .collect();

    let mut hist = Histogram {
        column: column.to_string(),
        split_column: split.to_string(),
        bins: Vec::new(),
        counts: BTreeMap::new(),
    };
    let Some((lo, hi)) = present.iter().fold(None, |acc: Option<(f64, f64)>, (x, _)| match acc {
        None => Some((*x, *x)),
        Some((lo, hi)) => Some((lo.min(*x), hi.max(*x))),
    }) else {
        return Ok(hist);
    };

    let n = if hi > lo { bins.max(1) } else { 1 };
    let width = (hi - lo) / n as f64;
    hist.bins = (0..n)
        .map(|i| Bin {
            lower: lo + width * i as f64,
            upper: if i + 1 == n { hi } else { lo + width * (i + 1) as f64 },
        })
        .collect();

    for (x, s) in present {
        let idx = if width > 0.0 {
            (((x - lo) / width).floor() as usize).min(n - 1)
        } else {
            0
        };
        hist.counts.entry(s.clone()).or_insert_with(|| vec![0; n])[idx] += 1;
    }
    Ok(hist)
}

// ---------------------------------------------------------------------------
// Box plots
// ---------------------------------------------------------------------------

/// Five-number summary of one box, with Tukey whiskers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub group: Value,
    pub split: Option<Value>,
    pub count: usize,
    pub mean: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    /// Smallest value within 1.5 × IQR below `q1`.
    pub lower_whisker: f64,
    /// Largest value within 1.5 × IQR above `q3`.
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    fn from_values(group: Value, split: Option<Value>, mut values: Vec<f64>) -> Self {
        values.sort_by(f64::total_cmp);
        let q1 = quantile(&values, 0.25);
        let median = quantile(&values, 0.5);
        let q3 = quantile(&values, 0.75);
        let iqr = q3 - q1;
        let (low_fence, high_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

        let inside = || values.iter().copied().filter(|v| *v >= low_fence && *v <= high_fence);
        let lower_whisker = inside().fold(f64::INFINITY, f64::min);
        let upper_whisker = inside().fold(f64::NEG_INFINITY, f64::max);
        let outliers = values
            .iter()
            .copied()
            .filter(|v| *v < low_fence || *v > high_fence)
            .collect();

        BoxStats {
            group,
            split,
            count: values.len(),
            mean: values.iter().sum::<f64>() / values.len() as f64,
            q1,
            median,
            q3,
            lower_whisker,
            upper_whisker,
            outliers,
        }
    }
}

/// Linear-interpolated quantile of sorted, non-empty `values`.
fn quantile(values: &[f64], q: f64) -> f64 {
    let pos = q * (values.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (pos - lo as f64)
}

/// One box per `group` value (and per `split` value when given) summarising
/// the numeric `value` column. Groups with no present values get no box.
pub fn box_stats(
    table: &Table,
    group: &str,
    value: &str,
    split: Option<&str>,
) -> Result<Vec<BoxStats>, SchemaError> {
    let groups = table.values(group)?;
    let ys = table.numeric(value)?;
    let splits = match split {
        Some(col) => Some(table.values(col)?),
        None => None,
    };

    let mut buckets: BTreeMap<(Value, Option<Value>), Vec<f64>> = BTreeMap::new();
    for (i, (g, y)) in groups.into_iter().zip(ys).enumerate() {
        if y.is_nan() {
            continue;
        }
        let s = splits.as_ref().map(|s| s[i].clone());
        buckets.entry((g.clone(), s)).or_default().push(y);
    }

    Ok(buckets
        .into_iter()
        .map(|((g, s), values)| BoxStats::from_values(g, s, values))
        .collect())
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterPoint {
    pub x: f64,
    pub y: f64,
    pub label: Option<String>,
}

/// Points sharing one value of the colour column.
#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub group: Value,
    pub points: Vec<ScatterPoint>,
}

/// `x` against `y`, one series per `color` value, optionally labelled by
/// the `label` column. Rows missing either coordinate are skipped.
pub fn scatter_series(
    table: &Table,
    x: &str,
    y: &str,
    color: &str,
    label: Option<&str>,
) -> Result<Vec<ScatterSeries>, SchemaError> {
    let xs = table.numeric(x)?;
    let ys = table.numeric(y)?;
    let groups = table.values(color)?;
    let labels = match label {
        Some(col) => Some(table.values(col)?),
        None => None,
    };

    let mut series: BTreeMap<Value, Vec<ScatterPoint>> = BTreeMap::new();
    for (i, ((px, py), g)) in xs.into_iter().zip(ys).zip(groups).enumerate() {
        if px.is_nan() || py.is_nan() {
            continue;
        }
        series.entry(g.clone()).or_default().push(ScatterPoint {
            x: px,
            y: py,
            label: labels.as_ref().map(|l| l[i].to_string()),
        });
    }

    Ok(series
        .into_iter()
        .map(|(group, points)| ScatterSeries { group, points })
        .collect())
}
