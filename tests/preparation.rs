//! End-to-end behaviour of table preparation and the indicators built on it.

use chrono::NaiveDate;
use hr_dashboard::charts::DashboardCharts;
use hr_dashboard::data::{ColumnSchema, DataProcessor, PreparedData};
use hr_dashboard::stats::HrIndicators;
use polars::prelude::*;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn prepare(df: DataFrame) -> PreparedData {
    DataProcessor::prepare_data(df, &ColumnSchema::default(), today()).unwrap()
}

fn f64_at(df: &DataFrame, name: &str, row: usize) -> Option<f64> {
    df.column(name)
        .unwrap()
        .cast(&DataType::Float64)
        .unwrap()
        .f64()
        .unwrap()
        .get(row)
}

fn str_at(df: &DataFrame, name: &str, row: usize) -> Option<String> {
    df.column(name)
        .unwrap()
        .str()
        .unwrap()
        .get(row)
        .map(str::to_string)
}

#[test]
fn single_active_employee_with_partial_money() {
    let raw = df!(
        "Nome" => ["Ana"],
        "Data de Nascimento" => ["15/03/1990"],
        "Data de Contratacao" => ["01/01/2020"],
        "Data de Demissao" => [None::<&str>],
        "Salario Base" => ["5000"],
    )
    .unwrap();

    let prepared = prepare(raw);
    let df = &prepared.frame;

    assert_eq!(str_at(df, "Status", 0).as_deref(), Some("Active"));
    assert_eq!(f64_at(df, "TotalMonthlyCost", 0), Some(5000.0));
    assert_eq!(f64_at(df, "Age", 0), Some(34.0));
    assert_eq!(f64_at(df, "TenureMonths", 0), Some(53.0));
    for money in ["Impostos", "Beneficios", "VT", "VR"] {
        assert_eq!(f64_at(df, money, 0), Some(0.0), "{money}");
    }
    assert!(prepared.report.is_clean());
}

#[test]
fn sex_codes_are_canonicalized() {
    let raw = df!("Sexo" => ["feminino", " masculino ", "Outro", "f", "M"]).unwrap();
    let prepared = prepare(raw);

    let codes: Vec<Option<String>> = (0..5).map(|i| str_at(&prepared.frame, "Sexo", i)).collect();
    assert_eq!(
        codes,
        vec![
            Some("F".to_string()),
            Some("M".to_string()),
            Some("Outro".to_string()),
            Some("F".to_string()),
            Some("M".to_string()),
        ]
    );
}

#[test]
fn missing_termination_column_means_everyone_is_active() {
    let raw = df!("Nome" => ["Ana", "Bruno", "Carla"]).unwrap();
    let prepared = prepare(raw);

    let status = prepared.frame.column("Status").unwrap().str().unwrap().clone();
    assert!(status.into_iter().all(|s| s == Some("Active")));
    assert!(prepared.frame.column("Age").is_err());
    assert!(prepared.frame.column("TenureMonths").is_err());
}

#[test]
fn malformed_values_are_defaulted_and_reported() {
    let raw = df!(
        "Data de Nascimento" => ["31/02/1990", "não sei"],
        "Data de Demissao" => ["hoje", ""],
        "Salario Base" => ["abc", "1500.50"],
        "VT" => [Some(f64::NAN), Some(200.0)],
    )
    .unwrap();

    let prepared = prepare(raw);
    let df = &prepared.frame;

    assert_eq!(f64_at(df, "Age", 0), None);
    assert_eq!(f64_at(df, "Age", 1), None);
    // an unreadable termination date is not a termination
    assert_eq!(str_at(df, "Status", 0).as_deref(), Some("Active"));
    assert_eq!(f64_at(df, "Salario Base", 0), Some(0.0));
    assert_eq!(f64_at(df, "TotalMonthlyCost", 0), Some(0.0));
    assert_eq!(f64_at(df, "TotalMonthlyCost", 1), Some(1700.5));

    assert_eq!(prepared.report.for_column("Data de Nascimento").count(), 2);
    assert_eq!(prepared.report.for_column("Data de Demissao").count(), 1);
    assert_eq!(prepared.report.for_column("Salario Base").count(), 1);
    assert_eq!(prepared.report.for_column("VT").count(), 1);
}

#[test]
fn future_dates_give_zero_age_and_tenure() {
    let raw = df!(
        "Data de Nascimento" => ["01/01/2030"],
        "Data de Contratacao" => ["2025-02-01"],
    )
    .unwrap();

    let prepared = prepare(raw);
    assert_eq!(f64_at(&prepared.frame, "Age", 0), Some(0.0));
    assert_eq!(f64_at(&prepared.frame, "TenureMonths", 0), Some(0.0));
}

#[test]
fn unknown_columns_pass_through() {
    let raw = df!("Nome" => ["  Ana  "], "Matricula" => [42i64]).unwrap();
    let prepared = prepare(raw);

    assert_eq!(str_at(&prepared.frame, "Nome", 0).as_deref(), Some("Ana"));
    assert_eq!(f64_at(&prepared.frame, "Matricula", 0), Some(42.0));
}

#[test]
fn indicators_over_a_prepared_table() {
    let raw = df!(
        "Data de Nascimento" => ["15/03/1990", "20/07/1980", "01/01/2000"],
        "Data de Demissao" => [None, Some("10/02/2023"), None],
        "Salario Base" => [5000.0, 8000.0, 3000.0],
        "Impostos" => [1000.0, 1600.0, 600.0],
        "Área" => ["TI", "RH", "TI"],
        "Cargo" => ["Analista", "Gerente", "Analista"],
        "Sexo" => ["F", "M", "feminino"],
        "Avaliação do Funcionário" => [4.0, 3.0, 5.0],
    )
    .unwrap();

    let prepared = prepare(raw);
    let schema = ColumnSchema::default();
    let kpi = HrIndicators::compute(&prepared.frame, &schema);

    assert_eq!(kpi.active_headcount, 2);
    assert_eq!(kpi.terminated_count, 1);
    assert_eq!(kpi.payroll_total, 8000.0);
    assert_eq!(kpi.total_cost, 9600.0);
    assert_eq!(kpi.average_rating, 4.0);
    // 34, 43 and 24 whole years
    assert!((kpi.average_age - (34.0 + 43.0 + 24.0) / 3.0).abs() < 1e-9);

    let charts = DashboardCharts::build(&prepared.frame, &schema, 20);
    assert_eq!(
        charts.headcount_by_department,
        vec![("RH".to_string(), 1), ("TI".to_string(), 2)]
    );
    assert_eq!(charts.sex_distribution[0], ("F".to_string(), 2));
    assert_eq!(charts.age_histogram.len(), 20);
}

#[test]
fn empty_table_gives_zero_indicators() {
    let raw = df!(
        "Data de Nascimento" => Vec::<String>::new(),
        "Salario Base" => Vec::<f64>::new(),
    )
    .unwrap();

    let prepared = prepare(raw);
    assert_eq!(prepared.frame.height(), 0);
    assert_eq!(
        HrIndicators::compute(&prepared.frame, &ColumnSchema::default()),
        HrIndicators::default()
    );
}
