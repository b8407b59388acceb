//! Chart Series Module
//! Aggregations behind the dashboard charts. No drawing happens here.

use crate::data::{column_labels, column_numbers, ColumnSchema};
use polars::prelude::DataFrame;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;

/// Default number of bins of the age histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

/// One histogram bar covering `[start, end)`; the last bin also includes `end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// All series drawn by the dashboard. Empty series are not drawn.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardCharts {
    pub headcount_by_department: Vec<(String, usize)>,
    pub salary_by_role: Vec<(String, f64)>,
    pub age_histogram: Vec<HistogramBin>,
    pub sex_distribution: Vec<(String, usize)>,
}

impl DashboardCharts {
    pub fn build(df: &DataFrame, schema: &ColumnSchema, histogram_bins: usize) -> Self {
        let ages: Vec<f64> = column_numbers(df, &schema.age)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();

        Self {
            headcount_by_department: ChartSeries::count_by(df, &schema.department),
            salary_by_role: ChartSeries::mean_by(df, &schema.role, &schema.base_salary),
            age_histogram: ChartSeries::histogram(&ages, histogram_bins),
            sex_distribution: ChartSeries::value_counts(df, &schema.sex),
        }
    }
}

pub struct ChartSeries;

impl ChartSeries {
    /// Rows per distinct non-null key, ordered by key.
    pub fn count_by(df: &DataFrame, key_col: &str) -> Vec<(String, usize)> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for key in column_labels(df, key_col).unwrap_or_default().into_iter().flatten() {
            *counts.entry(key).or_default() += 1;
        }
        counts.into_iter().collect()
    }

    /// Mean of `value_col` per distinct non-null key, ordered by key.
    ///
    /// Keys whose values are all missing are left out.
    pub fn mean_by(df: &DataFrame, key_col: &str, value_col: &str) -> Vec<(String, f64)> {
        let (Some(keys), Some(values)) =
            (column_labels(df, key_col), column_numbers(df, value_col))
        else {
            return Vec::new();
        };

        let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for (key, value) in keys.into_iter().zip(values) {
            if let (Some(key), Some(value)) = (key, value) {
                groups.entry(key).or_default().push(value);
            }
        }

        groups
            .into_iter()
            .map(|(key, values)| (key, values.iter().mean()))
            .collect()
    }

    /// Equal-width bins spanning the min and max of `values`.
    pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
        let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        if finite.is_empty() {
            return Vec::new();
        }

        let bins = bins.max(1);
        let mut min = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            min -= 0.5;
            max += 0.5;
        }
        let width = (max - min) / bins as f64;

        let mut result: Vec<HistogramBin> = (0..bins)
            .map(|i| HistogramBin {
                start: min + i as f64 * width,
                end: min + (i + 1) as f64 * width,
                count: 0,
            })
            .collect();

        for value in finite {
            let idx = (((value - min) / width).floor() as usize).min(bins - 1);
            result[idx].count += 1;
        }

        result
    }

    /// Rows per distinct non-null value, most frequent first.
    pub fn value_counts(df: &DataFrame, key_col: &str) -> Vec<(String, usize)> {
        let mut counts = Self::count_by(df, key_col);
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }
}
