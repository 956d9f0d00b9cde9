use std::future::Future;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Employee;
use crate::{AppError, AppResult};

/// Read/write access to the roster collection. The ledger is generic over
/// this so tests can interpose on the read and write paths.
pub trait RosterStore: Send + Sync {
    fn read_all(&self) -> impl Future<Output = AppResult<Vec<Employee>>> + Send;
    fn write_all(&self, employees: &[Employee]) -> impl Future<Output = AppResult<()>> + Send;
}

/// Whole-collection reader/writer for the employee roster CSV.
///
/// The backing file is the only persistence in the system and there is no
/// partial-row update primitive: every mutation is read-modify-write over the
/// full collection. Callers that need consistency under concurrent mutation
/// must serialize the whole span themselves (the ledger does).
#[derive(Clone, Debug)]
pub struct EmployeeStore {
    path: PathBuf,
}

/// One CSV row, in the fixed column order the file is written with. All
/// fields are read as strings so that malformed numerics degrade to zero
/// instead of failing the whole roster read.
#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    #[serde(rename = "ID", default)]
    id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Email", default)]
    email: String,
    #[serde(rename = "Annual Leave", default)]
    annual_leave: String,
    #[serde(rename = "Remaining Annual Leave", default)]
    remaining_annual_leave: String,
    #[serde(rename = "Sick Leave", default)]
    sick_leave: String,
    #[serde(rename = "Remaining Sick Leave", default)]
    remaining_sick_leave: String,
    #[serde(rename = "Personal Leave", default)]
    personal_leave: String,
    #[serde(rename = "Remaining Personal Leave", default)]
    remaining_personal_leave: String,
}

fn parse_or_zero(value: &str) -> u32 {
    value.trim().parse().unwrap_or(0)
}

impl From<CsvRow> for Employee {
    fn from(row: CsvRow) -> Self {
        let id = if row.id.trim().is_empty() {
            Uuid::new_v4().to_string()
        } else {
            row.id
        };

        Employee {
            id,
            name: row.name,
            email: row.email,
            annual_leave: parse_or_zero(&row.annual_leave),
            remaining_annual_leave: parse_or_zero(&row.remaining_annual_leave),
            sick_leave: parse_or_zero(&row.sick_leave),
            remaining_sick_leave: parse_or_zero(&row.remaining_sick_leave),
            personal_leave: parse_or_zero(&row.personal_leave),
            remaining_personal_leave: parse_or_zero(&row.remaining_personal_leave),
        }
    }
}

impl From<&Employee> for CsvRow {
    fn from(employee: &Employee) -> Self {
        CsvRow {
            id: employee.id.clone(),
            name: employee.name.clone(),
            email: employee.email.clone(),
            annual_leave: employee.annual_leave.to_string(),
            remaining_annual_leave: employee.remaining_annual_leave.to_string(),
            sick_leave: employee.sick_leave.to_string(),
            remaining_sick_leave: employee.remaining_sick_leave.to_string(),
            personal_leave: employee.personal_leave.to_string(),
            remaining_personal_leave: employee.remaining_personal_leave.to_string(),
        }
    }
}

impl EmployeeStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Reads the full roster. An empty file yields an empty collection.
    pub async fn read_all(&self) -> AppResult<Vec<Employee>> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            AppError::Storage(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes.as_slice());

        let mut employees = Vec::new();
        for row in reader.deserialize::<CsvRow>() {
            let row = row.map_err(|e| AppError::Storage(format!("malformed roster row: {}", e)))?;
            employees.push(Employee::from(row));
        }

        tracing::debug!(count = employees.len(), "roster read");
        Ok(employees)
    }

    /// Replaces the entire backing file with the supplied collection,
    /// serialized with the fixed column header order.
    pub async fn write_all(&self, employees: &[Employee]) -> AppResult<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for employee in employees {
            writer
                .serialize(CsvRow::from(employee))
                .map_err(|e| AppError::Storage(format!("failed to encode roster: {}", e)))?;
        }
        // With an empty roster, serialize() never runs and the header row
        // must be written explicitly.
        if employees.is_empty() {
            writer
                .write_record([
                    "ID",
                    "Name",
                    "Email",
                    "Annual Leave",
                    "Remaining Annual Leave",
                    "Sick Leave",
                    "Remaining Sick Leave",
                    "Personal Leave",
                    "Remaining Personal Leave",
                ])
                .map_err(|e| AppError::Storage(format!("failed to encode header: {}", e)))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Storage(format!("failed to flush roster: {}", e)))?;

        tokio::fs::write(&self.path, bytes).await.map_err(|e| {
            AppError::Storage(format!("failed to write {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(count = employees.len(), "roster written");
        Ok(())
    }
}

impl RosterStore for EmployeeStore {
    fn read_all(&self) -> impl Future<Output = AppResult<Vec<Employee>>> + Send {
        EmployeeStore::read_all(self)
    }

    fn write_all(&self, employees: &[Employee]) -> impl Future<Output = AppResult<()>> + Send {
        EmployeeStore::write_all(self, employees)
    }
}
