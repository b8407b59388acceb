//! HR Indicator Module
//! Scalar summary statistics over the prepared employee table.

use crate::data::{column_numbers, ColumnSchema};
use polars::prelude::*;
use statrs::statistics::Statistics;

/// The six headline numbers of the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HrIndicators {
    pub active_headcount: usize,
    pub terminated_count: usize,
    pub payroll_total: f64,
    pub total_cost: f64,
    pub average_age: f64,
    pub average_rating: f64,
}

impl HrIndicators {
    pub fn compute(df: &DataFrame, schema: &ColumnSchema) -> Self {
        Self {
            active_headcount: IndicatorCalculator::active_headcount(df, schema),
            terminated_count: IndicatorCalculator::terminated_count(df, schema),
            payroll_total: IndicatorCalculator::payroll_total(df, schema),
            total_cost: IndicatorCalculator::total_cost(df, schema),
            average_age: IndicatorCalculator::average_age(df, schema),
            average_rating: IndicatorCalculator::average_rating(df, schema),
        }
    }
}

/// Indicator functions. Each returns zero when its source column is missing.
pub struct IndicatorCalculator;

impl IndicatorCalculator {
    pub fn active_headcount(df: &DataFrame, schema: &ColumnSchema) -> usize {
        Self::count_status(df, &schema.status, &schema.active_label)
    }

    pub fn terminated_count(df: &DataFrame, schema: &ColumnSchema) -> usize {
        Self::count_status(df, &schema.status, &schema.terminated_label)
    }

    /// Sum of base salaries of active employees.
    pub fn payroll_total(df: &DataFrame, schema: &ColumnSchema) -> f64 {
        Self::get_active_values(df, schema, &schema.base_salary)
            .iter()
            .fold(0.0, |acc, v| acc + v)
    }

    /// Sum of total monthly cost of active employees.
    pub fn total_cost(df: &DataFrame, schema: &ColumnSchema) -> f64 {
        Self::get_active_values(df, schema, &schema.total_monthly_cost)
            .iter()
            .fold(0.0, |acc, v| acc + v)
    }

    pub fn average_age(df: &DataFrame, schema: &ColumnSchema) -> f64 {
        Self::mean_of_column(df, &schema.age)
    }

    pub fn average_rating(df: &DataFrame, schema: &ColumnSchema) -> f64 {
        Self::mean_of_column(df, &schema.rating)
    }

    fn count_status(df: &DataFrame, status_col: &str, label: &str) -> usize {
        df.column(status_col)
            .ok()
            .and_then(|col| col.str().ok())
            .map(|ca| ca.into_iter().filter(|v| *v == Some(label)).count())
            .unwrap_or(0)
    }

    /// Values of `value_col` for rows whose status is the active label.
    fn get_active_values(df: &DataFrame, schema: &ColumnSchema, value_col: &str) -> Vec<f64> {
        df.clone()
            .lazy()
            .filter(col(schema.status.as_str()).eq(lit(schema.active_label.as_str())))
            .select([col(value_col).cast(DataType::Float64)])
            .collect()
            .ok()
            .and_then(|df| df.column(value_col).ok().cloned())
            .map(|col| {
                col.f64()
                    .ok()
                    .map(|ca| ca.into_iter().flatten().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Mean of the defined numeric values of a column; 0 when there are none.
    fn mean_of_column(df: &DataFrame, name: &str) -> f64 {
        let values: Vec<f64> = column_numbers(df, name)
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect();

        if values.is_empty() {
            0.0
        } else {
            values.iter().mean()
        }
    }
}
