//! Column Schema Module
//! Names of the spreadsheet columns the dashboard recognizes, and of the
//! columns it derives.

use serde::{Deserialize, Serialize};

/// Recognized input headers and derived output names.
///
/// Defaults follow the headers of the HR spreadsheet the dashboard was built
/// for. Every name can be overridden from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSchema {
    pub birth_date: String,
    pub hire_date: String,
    pub termination_date: String,
    pub sex: String,
    pub department: String,
    pub role: String,
    pub base_salary: String,
    pub taxes: String,
    pub benefits: String,
    pub transport_allowance: String,
    pub meal_allowance: String,
    pub rating: String,

    pub age: String,
    pub tenure_months: String,
    pub status: String,
    pub total_monthly_cost: String,

    pub active_label: String,
    pub terminated_label: String,
}

impl Default for ColumnSchema {
    fn default() -> Self {
        Self {
            birth_date: "Data de Nascimento".to_string(),
            hire_date: "Data de Contratacao".to_string(),
            termination_date: "Data de Demissao".to_string(),
            sex: "Sexo".to_string(),
            department: "Área".to_string(),
            role: "Cargo".to_string(),
            base_salary: "Salario Base".to_string(),
            taxes: "Impostos".to_string(),
            benefits: "Beneficios".to_string(),
            transport_allowance: "VT".to_string(),
            meal_allowance: "VR".to_string(),
            rating: "Avaliação do Funcionário".to_string(),
            age: "Age".to_string(),
            tenure_months: "TenureMonths".to_string(),
            status: "Status".to_string(),
            total_monthly_cost: "TotalMonthlyCost".to_string(),
            active_label: "Active".to_string(),
            terminated_label: "Terminated".to_string(),
        }
    }
}

impl ColumnSchema {
    /// The three date columns, in birth / hire / termination order.
    pub fn date_columns(&self) -> [&str; 3] {
        [&self.birth_date, &self.hire_date, &self.termination_date]
    }

    /// The five monetary columns summed into the total monthly cost.
    pub fn monetary_columns(&self) -> [&str; 5] {
        [
            &self.base_salary,
            &self.taxes,
            &self.benefits,
            &self.transport_allowance,
            &self.meal_allowance,
        ]
    }
}
