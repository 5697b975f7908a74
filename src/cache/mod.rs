//! Named response caches with explicit invalidation on mutation.
//!
//! Read-through is cooperative: the calling service checks the cache, computes
//! the value from the stores on a miss and inserts it. Mutations evict, never
//! refresh, so staleness is bounded by the time-to-live alone.

use std::time::Duration;

use moka::future::Cache;

use crate::types::dto::department::DepartmentResponse;
use crate::types::dto::employee::EmployeeResponse;

/// The three named caches of the service
///
/// Each cache is bounded and carries a write-based and an access-based expiry,
/// whichever fires first for a given entry.
pub struct EntityCaches {
    departments: Cache<i64, DepartmentResponse>,
    employees: Cache<i64, EmployeeResponse>,
    department_employees: Cache<i64, Vec<EmployeeResponse>>,
}

impl EntityCaches {
    /// Build all caches with a shared policy
    ///
    /// Reference policy: 1000 entries per cache, expire 10 minutes after
    /// write or 5 minutes after last access.
    pub fn new(max_entries: u64, ttl: Duration, tti: Duration) -> Self {
        Self {
            departments: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .time_to_idle(tti)
                .build(),
            employees: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .time_to_idle(tti)
                .build(),
            department_employees: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .time_to_idle(tti)
                .build(),
        }
    }

    pub async fn get_department(&self, id: i64) -> Option<DepartmentResponse> {
        self.departments.get(&id).await
    }

    pub async fn put_department(&self, id: i64, value: DepartmentResponse) {
        self.departments.insert(id, value).await;
    }

    pub async fn get_employee(&self, id: i64) -> Option<EmployeeResponse> {
        self.employees.get(&id).await
    }

    pub async fn put_employee(&self, id: i64, value: EmployeeResponse) {
        self.employees.insert(id, value).await;
    }

    pub async fn get_department_employees(&self, department_id: i64) -> Option<Vec<EmployeeResponse>> {
        self.department_employees.get(&department_id).await
    }

    pub async fn put_department_employees(&self, department_id: i64, value: Vec<EmployeeResponse>) {
        self.department_employees.insert(department_id, value).await;
    }

    /// Coarse invalidation after a department create
    ///
    /// A new row may affect aggregate views, so the whole cache is distrusted.
    pub fn on_department_created(&self) {
        self.departments.invalidate_all();
    }

    /// Evict a single department after an update
    pub async fn on_department_changed(&self, id: i64) {
        self.departments.invalidate(&id).await;
    }

    /// Evict after a department delete
    ///
    /// Deletion rewrites every member employee row (the FK sets their
    /// department to null), so both employee caches are distrusted wholesale
    /// along with the department's own entry and roster.
    pub async fn on_department_deleted(&self, id: i64) {
        self.departments.invalidate(&id).await;
        self.employees.invalidate_all();
        self.department_employees.invalidate_all();
    }

    /// Coarse invalidation after an employee create
    pub fn on_employee_created(&self) {
        self.employees.invalidate_all();
        self.department_employees.invalidate_all();
    }

    /// Evict a single employee after update or delete
    ///
    /// The dependent department_employees cache is evicted at the same key.
    pub async fn on_employee_changed(&self, id: i64) {
        self.employees.invalidate(&id).await;
        self.department_employees.invalidate(&id).await;
    }
}
