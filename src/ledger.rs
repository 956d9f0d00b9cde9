use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::models::{Employee, LeaveCategory, LeaveRequestInput};
use crate::store::{EmployeeStore, RosterStore};
use crate::{AppError, AppResult};

/// Inclusive day count between two calendar dates.
///
/// Inverted ranges are rejected outright rather than tolerated via an
/// absolute difference; a request with `end < start` never reaches the
/// balance check.
pub fn leave_duration(start: NaiveDate, end: NaiveDate) -> AppResult<u32> {
    if end < start {
        return Err(AppError::Validation(
            "endDate cannot be before startDate".to_string(),
        ));
    }
    Ok((end - start).num_days() as u32 + 1)
}

/// Enforces the balance invariant over the roster: no leave request succeeds
/// unless sufficient remaining balance exists in the targeted category, and a
/// successful request decrements exactly that balance.
///
/// Every mutation (submit, replace, delete) runs under one mutex spanning the
/// store's read-modify-write, since the flat-file store itself offers no
/// atomic per-row update.
pub struct LeaveLedger<S = EmployeeStore> {
    store: S,
    write_guard: Mutex<()>,
}

impl<S: RosterStore> LeaveLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            write_guard: Mutex::new(()),
        }
    }

    pub async fn list_employees(&self) -> AppResult<Vec<Employee>> {
        self.store.read_all().await
    }

    /// Full-collection replace, as driven by the settings surface.
    pub async fn replace_roster(&self, employees: &[Employee]) -> AppResult<()> {
        let _guard = self.write_guard.lock().await;
        self.store.write_all(employees).await
    }

    /// Id-filtered delete-then-replace.
    pub async fn delete_employee(&self, id: &str) -> AppResult<()> {
        let _guard = self.write_guard.lock().await;
        let employees = self.store.read_all().await?;
        let remaining: Vec<Employee> = employees.into_iter().filter(|e| e.id != id).collect();
        self.store.write_all(&remaining).await
    }

    /// Validates a leave request against the employee's remaining balance for
    /// the requested category and, on success, decrements it and rewrites the
    /// whole roster. Returns the consumed duration in days.
    pub async fn submit(&self, request: &LeaveRequestInput) -> AppResult<u32> {
        let duration = leave_duration(request.start_date, request.end_date)?;

        let _guard = self.write_guard.lock().await;
        let mut employees = self.store.read_all().await?;

        let employee = employees
            .iter_mut()
            .find(|e| e.id == request.employee_id)
            .ok_or_else(|| AppError::NotFound("Employee not found".to_string()))?;

        let remaining = employee.remaining(request.leave_type);
        if duration > remaining {
            return Err(AppError::InsufficientBalance(
                "Insufficient leave balance".to_string(),
            ));
        }

        *employee.remaining_mut(request.leave_type) = remaining - duration;
        self.store.write_all(&employees).await?;

        tracing::info!(
            employee_id = %request.employee_id,
            category = request.leave_type.as_str(),
            duration,
            "leave request approved"
        );
        Ok(duration)
    }
}

#[cfg(test)]
mod tests {
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn sample_employee(id: &str, remaining_annual: u32) -> Employee {
        Employee {
            id: id.to_string(),
            name: "Ada Lovelace".to_string(),
            email: format!("{}@example.com", id),
            annual_leave: 20,
            remaining_annual_leave: remaining_annual,
            sick_leave: 10,
            remaining_sick_leave: 10,
            personal_leave: 5,
            remaining_personal_leave: 5,
        }
    }

    async fn ledger_with(employees: &[Employee]) -> (tempfile::TempDir, LeaveLedger) {
        let dir = tempfile::tempdir().unwrap();
        let store = EmployeeStore::new(dir.path().join("employees.csv"));
        store.write_all(employees).await.unwrap();
        (dir, LeaveLedger::new(store))
    }

    fn request(employee_id: &str, start: &str, end: &str) -> LeaveRequestInput {
        LeaveRequestInput {
            employee_id: employee_id.to_string(),
            leave_type: LeaveCategory::Annual,
            start_date: date(start),
            end_date: date(end),
        }
    }

    #[test]
    fn test_duration_is_inclusive_of_both_endpoints() {
        assert_eq!(leave_duration(date("2024-01-10"), date("2024-01-12")).unwrap(), 3);
        assert_eq!(leave_duration(date("2024-01-10"), date("2024-01-10")).unwrap(), 1);
        assert_eq!(leave_duration(date("2024-02-28"), date("2024-03-01")).unwrap(), 3);
    }

    #[test]
    fn test_inverted_range_is_rejected() {
        let result = leave_duration(date("2024-01-12"), date("2024-01-10"));
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_submit_decrements_only_the_requested_category() {
        let (_dir, ledger) = ledger_with(&[sample_employee("1", 10)]).await;

        let duration = ledger.submit(&request("1", "2024-01-10", "2024-01-12")).await.unwrap();
        assert_eq!(duration, 3);

        let employees = ledger.list_employees().await.unwrap();
        assert_eq!(employees[0].remaining_annual_leave, 7);
        assert_eq!(employees[0].remaining_sick_leave, 10);
        assert_eq!(employees[0].remaining_personal_leave, 5);
    }

    #[tokio::test]
    async fn test_submit_leaves_other_records_untouched() {
        let other = sample_employee("2", 4);
        let (_dir, ledger) = ledger_with(&[sample_employee("1", 10), other.clone()]).await;

        ledger.submit(&request("1", "2024-01-10", "2024-01-10")).await.unwrap();

        let employees = ledger.list_employees().await.unwrap();
        assert_eq!(employees[1], other);
    }

    #[tokio::test]
    async fn test_insufficient_balance_fails_without_writing() {
        let (_dir, ledger) = ledger_with(&[sample_employee("1", 2)]).await;

        let result = ledger.submit(&request("1", "2024-01-10", "2024-01-12")).await;
        assert!(matches!(result, Err(AppError::InsufficientBalance(_))));

        let employees = ledger.list_employees().await.unwrap();
        assert_eq!(employees[0].remaining_annual_leave, 2);
    }

    /// Delegates to a real store while counting calls on the write path.
    struct CountingStore {
        inner: EmployeeStore,
        writes: Arc<AtomicUsize>,
    }

    impl RosterStore for CountingStore {
        fn read_all(&self) -> impl Future<Output = AppResult<Vec<Employee>>> + Send {
            self.inner.read_all()
        }

        fn write_all(&self, employees: &[Employee]) -> impl Future<Output = AppResult<()>> + Send {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.write_all(employees)
        }
    }

    #[tokio::test]
    async fn test_successful_submit_writes_the_roster_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let store = EmployeeStore::new(dir.path().join("employees.csv"));
        store.write_all(&[sample_employee("1", 10)]).await.unwrap();

        let writes = Arc::new(AtomicUsize::new(0));
        let ledger = LeaveLedger::new(CountingStore {
            inner: store,
            writes: writes.clone(),
        });

        ledger.submit(&request("1", "2024-01-10", "2024-01-12")).await.unwrap();
        assert_eq!(writes.load(Ordering::SeqCst), 1);

        // A rejected request performs no write at all.
        let result = ledger.submit(&request("1", "2024-02-01", "2024-02-28")).await;
        assert!(matches!(result, Err(AppError::InsufficientBalance(_))));
        assert_eq!(writes.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_balance_exactly_equal_to_duration_succeeds() {
        let (_dir, ledger) = ledger_with(&[sample_employee("1", 3)]).await;

        ledger.submit(&request("1", "2024-01-10", "2024-01-12")).await.unwrap();

        let employees = ledger.list_employees().await.unwrap();
        assert_eq!(employees[0].remaining_annual_leave, 0);
    }

    #[tokio::test]
    async fn test_unknown_employee_is_not_found() {
        let (_dir, ledger) = ledger_with(&[sample_employee("1", 10)]).await;

        let result = ledger.submit(&request("missing", "2024-01-10", "2024-01-12")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_submissions_are_serialized() {
        let (_dir, ledger) = ledger_with(&[sample_employee("1", 10)]).await;
        let ledger = std::sync::Arc::new(ledger);

        let a = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.submit(&request("1", "2024-01-10", "2024-01-12")).await })
        };
        let b = {
            let ledger = ledger.clone();
            tokio::spawn(async move { ledger.submit(&request("1", "2024-02-01", "2024-02-02")).await })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        // Both decrements are durable because the ledger holds the mutex
        // across each read-modify-write.
        let employees = ledger.list_employees().await.unwrap();
        assert_eq!(employees[0].remaining_annual_leave, 5);
    }

    #[tokio::test]
    async fn test_delete_employee_filters_by_id() {
        let (_dir, ledger) = ledger_with(&[sample_employee("1", 10), sample_employee("2", 4)]).await;

        ledger.delete_employee("1").await.unwrap();

        let employees = ledger.list_employees().await.unwrap();
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].id, "2");
    }
}
