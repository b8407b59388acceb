//! Invariants of the prepared table over generated inputs.

use chrono::{Days, NaiveDate};
use hr_dashboard::data::coerce::{canonical_sex_code, parse_day_first_date};
use hr_dashboard::data::{ColumnSchema, DataProcessor};
use polars::prelude::*;
use proptest::prelude::*;
use proptest::test_runner::Config;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// Dates between 1900 and roughly 2119, written day-first.
fn day_first_date() -> impl Strategy<Value = String> {
    (0_u64..80_000).prop_map(|offset| {
        let base = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap();
        (base + Days::new(offset)).format("%d/%m/%Y").to_string()
    })
}

fn column_f64(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .into_iter()
        .collect()
}

proptest! {
    #![proptest_config(Config::with_cases(128))]

    #[test]
    fn status_follows_termination_date(
        terminations in prop::collection::vec(prop::option::of(day_first_date()), 0..40)
    ) {
        let raw = df!("Data de Demissao" => terminations.clone()).unwrap();
        let prepared = DataProcessor::prepare_data(raw, &ColumnSchema::default(), today()).unwrap();

        let status = prepared.frame.column("Status").unwrap().str().unwrap().clone();
        for (termination, status) in terminations.iter().zip(status.into_iter()) {
            let expected = if termination.is_some() { "Terminated" } else { "Active" };
            prop_assert_eq!(status, Some(expected));
        }
    }

    #[test]
    fn age_and_tenure_are_never_negative(
        births in prop::collection::vec(day_first_date(), 1..30),
        hires in prop::collection::vec(day_first_date(), 1..30)
    ) {
        let rows = births.len().min(hires.len());
        let raw = df!(
            "Data de Nascimento" => births[..rows].to_vec(),
            "Data de Contratacao" => hires[..rows].to_vec(),
        )
        .unwrap();
        let prepared = DataProcessor::prepare_data(raw, &ColumnSchema::default(), today()).unwrap();

        for age in column_f64(&prepared.frame, "Age") {
            prop_assert!(age.is_some_and(|a| a >= 0.0));
        }
        for months in column_f64(&prepared.frame, "TenureMonths") {
            prop_assert!(months.is_some_and(|m| m >= 0.0));
        }
    }

    #[test]
    fn total_cost_is_the_sum_of_money_columns(
        rows in prop::collection::vec(
            prop::array::uniform5(prop::option::of(0.0_f64..50_000.0)),
            1..30
        )
    ) {
        let column = |i: usize| rows.iter().map(|r| r[i]).collect::<Vec<Option<f64>>>();
        let raw = df!(
            "Salario Base" => column(0),
            "Impostos" => column(1),
            "Beneficios" => column(2),
            "VT" => column(3),
            "VR" => column(4),
        )
        .unwrap();
        let prepared = DataProcessor::prepare_data(raw, &ColumnSchema::default(), today()).unwrap();

        let totals = column_f64(&prepared.frame, "TotalMonthlyCost");
        for (row, total) in rows.iter().zip(totals) {
            let expected: f64 = row.iter().map(|v| v.unwrap_or(0.0)).sum();
            prop_assert!((total.unwrap() - expected).abs() < 1e-6);
        }
    }

    #[test]
    fn sex_canonicalization_is_idempotent(raw in "\\PC{0,12}") {
        let once = canonical_sex_code(&raw);
        prop_assert_eq!(canonical_sex_code(&once), once);
    }

    #[test]
    fn arbitrary_date_text_never_fails(
        values in prop::collection::vec(prop::option::of("\\PC{0,16}"), 0..20)
    ) {
        for value in values.iter().flatten() {
            let _ = parse_day_first_date(value);
        }

        let raw = df!(
            "Data de Nascimento" => values.clone(),
            "Data de Contratacao" => values.clone(),
            "Data de Demissao" => values,
        )
        .unwrap();
        prop_assert!(DataProcessor::prepare_data(raw, &ColumnSchema::default(), today()).is_ok());
    }
}
