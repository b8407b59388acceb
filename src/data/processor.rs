//! Data Processor Module
//! Normalizes a raw employee table and appends the derived HR columns.

use crate::data::coerce::{
    age_in_years, canonical_sex_code, coerce_money_number, coerce_money_text,
    date_to_epoch_days, epoch_days_to_date, parse_day_first_date, tenure_in_months, Coerced,
    CoercionIssue,
};
use crate::data::{is_numeric_dtype, ColumnSchema};
use chrono::NaiveDate;
use polars::prelude::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// One value that was replaced by a default during preparation.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub column: String,
    pub row: usize,
    pub issue: CoercionIssue,
}

/// Everything the preparation pass had to default.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparationReport {
    pub diagnostics: Vec<Diagnostic>,
}

impl PreparationReport {
    fn record(&mut self, column: &str, row: usize, issue: Option<CoercionIssue>) {
        if let Some(issue) = issue {
            tracing::debug!(column, row, %issue, "value defaulted");
            self.diagnostics.push(Diagnostic {
                column: column.to_string(),
                row,
                issue,
            });
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics raised for one column.
    pub fn for_column<'a>(&'a self, column: &'a str) -> impl Iterator<Item = &'a Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.column == column)
    }
}

/// The prepared table plus the defaults applied while building it.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub frame: DataFrame,
    pub report: PreparationReport,
}

/// Parsed date columns, kept around for the derived columns.
#[derive(Default)]
struct ParsedDates {
    birth: Option<Vec<Option<NaiveDate>>>,
    hire: Option<Vec<Option<NaiveDate>>>,
    termination: Option<Vec<Option<NaiveDate>>>,
}

/// Handles data cleaning and enrichment of the employee table.
pub struct DataProcessor;

impl DataProcessor {
    /// Prepare a raw table.
    ///
    /// Steps run in a fixed order: trim text, parse dates, canonicalize the
    /// sex code, coerce money, then derive age, tenure, status and total
    /// monthly cost. Bad values are replaced by defaults and listed in the
    /// returned report; missing columns are skipped or defaulted. The only
    /// errors are internal frame errors.
    pub fn prepare_data(
        mut df: DataFrame,
        schema: &ColumnSchema,
        today: NaiveDate,
    ) -> Result<PreparedData, ProcessorError> {
        let mut report = PreparationReport::default();

        Self::trim_text_columns(&mut df)?;

        let [birth, hire, termination] = schema.date_columns();
        let dates = ParsedDates {
            birth: Self::parse_date_column(&mut df, birth, &mut report)?,
            hire: Self::parse_date_column(&mut df, hire, &mut report)?,
            termination: Self::parse_date_column(&mut df, termination, &mut report)?,
        };

        Self::canonicalize_sex(&mut df, &schema.sex)?;

        let mut total_cost = vec![0.0; df.height()];
        for name in schema.monetary_columns() {
            let values = Self::coerce_money_column(&mut df, name, &mut report)?;
            for (total, value) in total_cost.iter_mut().zip(values) {
                *total += value;
            }
        }

        if let Some(birth) = &dates.birth {
            let ages: Vec<Option<i64>> = birth
                .iter()
                .map(|d| d.map(|b| age_in_years(b, today)))
                .collect();
            df.with_column(Column::new(schema.age.as_str().into(), ages))?;
        }

        if let Some(hire) = &dates.hire {
            let months: Vec<Option<i64>> = hire
                .iter()
                .map(|d| d.map(|h| tenure_in_months(h, today)))
                .collect();
            df.with_column(Column::new(schema.tenure_months.as_str().into(), months))?;
        }

        let status: Vec<&str> = match &dates.termination {
            Some(termination) => termination
                .iter()
                .map(|d| match d {
                    Some(_) => schema.terminated_label.as_str(),
                    None => schema.active_label.as_str(),
                })
                .collect(),
            None => vec![schema.active_label.as_str(); df.height()],
        };
        df.with_column(Column::new(schema.status.as_str().into(), status))?;

        df.with_column(Column::new(
            schema.total_monthly_cost.as_str().into(),
            total_cost,
        ))?;

        if report.is_clean() {
            tracing::info!(rows = df.height(), "table prepared");
        } else {
            tracing::warn!(
                rows = df.height(),
                defaulted = report.len(),
                "table prepared with defaulted values"
            );
        }

        Ok(PreparedData { frame: df, report })
    }

    /// Strip surrounding whitespace from every string column.
    fn trim_text_columns(df: &mut DataFrame) -> PolarsResult<()> {
        let names: Vec<PlSmallStr> = df
            .get_columns()
            .iter()
            .filter(|c| c.dtype() == &DataType::String)
            .map(|c| c.name().clone())
            .collect();

        for name in names {
            let trimmed: Vec<Option<String>> = df
                .column(name.as_str())?
                .str()?
                .into_iter()
                .map(|v| v.map(|s| s.trim().to_string()))
                .collect();
            df.with_column(Column::new(name, trimmed))?;
        }
        Ok(())
    }

    /// Rewrite a date column as `Date`, returning the parsed values.
    ///
    /// Returns `None` when the column does not exist.
    fn parse_date_column(
        df: &mut DataFrame,
        name: &str,
        report: &mut PreparationReport,
    ) -> PolarsResult<Option<Vec<Option<NaiveDate>>>> {
        let Ok(column) = df.column(name) else {
            return Ok(None);
        };

        let dates: Vec<Option<NaiveDate>> = match column.dtype() {
            DataType::Date | DataType::Datetime(_, _) => column
                .cast(&DataType::Date)?
                .cast(&DataType::Int32)?
                .i32()?
                .into_iter()
                .map(|days| days.and_then(epoch_days_to_date))
                .collect(),
            DataType::String => column
                .str()?
                .into_iter()
                .enumerate()
                .map(|(row, value)| {
                    let parsed = value
                        .map(parse_day_first_date)
                        .unwrap_or(Coerced::clean(None));
                    report.record(name, row, parsed.issue);
                    parsed.value
                })
                .collect(),
            _ => {
                let mut dates = Vec::with_capacity(column.len());
                for row in 0..column.len() {
                    let value = column.get(row)?;
                    if !value.is_null() {
                        report.record(name, row, Some(CoercionIssue::NotADate(value.to_string())));
                    }
                    dates.push(None);
                }
                dates
            }
        };

        let days: Vec<Option<i32>> = dates
            .iter()
            .map(|d| d.map(date_to_epoch_days))
            .collect();
        let parsed = Column::new(name.into(), days).cast(&DataType::Date)?;
        df.with_column(parsed)?;

        Ok(Some(dates))
    }

    /// Uppercase-match the sex column against the known codes.
    fn canonicalize_sex(df: &mut DataFrame, name: &str) -> PolarsResult<()> {
        let Ok(column) = df.column(name) else {
            return Ok(());
        };

        let text = if column.dtype() == &DataType::String {
            column.clone()
        } else {
            column.cast(&DataType::String)?
        };

        let codes: Vec<Option<String>> = text
            .str()?
            .into_iter()
            .map(|v| v.map(canonical_sex_code))
            .collect();
        df.with_column(Column::new(name.into(), codes))?;
        Ok(())
    }

    /// Ensure a monetary column exists as non-null `Float64`, returning its values.
    fn coerce_money_column(
        df: &mut DataFrame,
        name: &str,
        report: &mut PreparationReport,
    ) -> PolarsResult<Vec<f64>> {
        let height = df.height();

        let values: Vec<f64> = match df.column(name) {
            Err(_) => vec![0.0; height],
            Ok(column) => match column.dtype() {
                DataType::String => column
                    .str()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, value)| {
                        let coerced = value
                            .map(coerce_money_text)
                            .unwrap_or(Coerced::clean(0.0));
                        report.record(name, row, coerced.issue);
                        coerced.value
                    })
                    .collect(),
                DataType::Boolean => column
                    .bool()?
                    .into_iter()
                    .map(|value| if value == Some(true) { 1.0 } else { 0.0 })
                    .collect(),
                dtype if is_numeric_dtype(dtype) => column
                    .cast(&DataType::Float64)?
                    .f64()?
                    .into_iter()
                    .enumerate()
                    .map(|(row, value)| match value {
                        Some(v) => {
                            let coerced = coerce_money_number(v);
                            report.record(name, row, coerced.issue);
                            coerced.value
                        }
                        None => 0.0,
                    })
                    .collect(),
                _ => {
                    let mut values = Vec::with_capacity(height);
                    for row in 0..height {
                        let value = column.get(row)?;
                        if !value.is_null() {
                            report.record(
                                name,
                                row,
                                Some(CoercionIssue::NotNumeric(value.to_string())),
                            );
                        }
                        values.push(0.0);
                    }
                    values
                }
            },
        };

        df.with_column(Column::new(name.into(), values.clone()))?;
        Ok(values)
    }
}
