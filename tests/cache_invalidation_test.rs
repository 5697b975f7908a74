mod common;

use std::sync::Arc;
use std::time::Duration;

use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use ems_backend::cache::EntityCaches;
use ems_backend::services::{DepartmentService, EmployeeService};
use ems_backend::stores::{DepartmentStore, EmployeeStore};
use ems_backend::types::db::{department, employee};
use ems_backend::types::dto::department::DepartmentRequest;
use ems_backend::types::dto::employee::{CreateEmployeeRequest, UpdateEmployeeRequest};

use common::setup_test_db;

fn build_services(db: DatabaseConnection) -> (EmployeeService, DepartmentService) {
    let caches = Arc::new(EntityCaches::new(
        1000,
        Duration::from_secs(600),
        Duration::from_secs(300),
    ));
    let employee_store = Arc::new(EmployeeStore::new(db.clone()));
    let department_store = Arc::new(DepartmentStore::new(db));

    let employees = EmployeeService::new(
        employee_store.clone(),
        department_store.clone(),
        caches.clone(),
    );
    let departments = DepartmentService::new(department_store, employee_store, caches);
    (employees, departments)
}

fn employee_request(name: &str, email: &str) -> CreateEmployeeRequest {
    CreateEmployeeRequest {
        name: name.to_string(),
        email: email.to_string(),
        employee_code: None,
        status: None,
        phone_number: None,
        address: None,
        hire_date: None,
        salary: None,
        job_title: None,
        department_id: None,
    }
}

fn department_request(name: &str) -> DepartmentRequest {
    DepartmentRequest {
        name: name.to_string(),
        description: None,
        location: None,
        budget: None,
    }
}

/// Renames an employee row directly, bypassing the service and its cache
async fn rename_employee_in_db(db: &DatabaseConnection, id: i64, name: &str) {
    employee::Entity::update_many()
        .col_expr(employee::Column::Name, Expr::value(name))
        .filter(employee::Column::Id.eq(id))
        .exec(db)
        .await
        .expect("Failed to rename employee");
}

async fn rename_department_in_db(db: &DatabaseConnection, id: i64, name: &str) {
    department::Entity::update_many()
        .col_expr(department::Column::Name, Expr::value(name))
        .filter(department::Column::Id.eq(id))
        .exec(db)
        .await
        .expect("Failed to rename department");
}

#[tokio::test]
async fn employee_reads_are_served_from_cache() {
    let db = setup_test_db().await;
    let (employees, _) = build_services(db.clone());

    let created = employees
        .create(employee_request("Alice", "alice@x.com"))
        .await
        .expect("Failed to create employee");

    // Populate the cache, then change the row behind the service's back
    let first = employees
        .get_by_id(created.id)
        .await
        .expect("Failed to read employee");
    assert_eq!(first.name, "Alice");

    rename_employee_in_db(&db, created.id, "Renamed").await;

    let second = employees
        .get_by_id(created.id)
        .await
        .expect("Failed to read employee");
    assert_eq!(second.name, "Alice", "read should hit the cache, not the store");
}

#[tokio::test]
async fn employee_update_evicts_only_that_entry() {
    let db = setup_test_db().await;
    let (employees, _) = build_services(db.clone());

    let a = employees
        .create(employee_request("Alice", "alice@x.com"))
        .await
        .expect("Failed to create employee");
    let b = employees
        .create(employee_request("Bob", "bob@x.com"))
        .await
        .expect("Failed to create employee");

    employees.get_by_id(a.id).await.expect("Failed to read employee");
    employees.get_by_id(b.id).await.expect("Failed to read employee");

    rename_employee_in_db(&db, a.id, "Alice (db)").await;
    rename_employee_in_db(&db, b.id, "Bob (db)").await;

    // Updating A must drop A's cache entry and leave B's alone
    employees
        .update(
            a.id,
            UpdateEmployeeRequest {
                job_title: Some("Engineer".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("Failed to update employee");

    let fresh_a = employees.get_by_id(a.id).await.expect("Failed to read employee");
    assert_eq!(fresh_a.name, "Alice (db)");
    assert_eq!(fresh_a.job_title.as_deref(), Some("Engineer"));

    let stale_b = employees.get_by_id(b.id).await.expect("Failed to read employee");
    assert_eq!(stale_b.name, "Bob", "unrelated entry must survive the eviction");
}

#[tokio::test]
async fn employee_create_invalidates_both_employee_caches() {
    let db = setup_test_db().await;
    let (employees, departments) = build_services(db.clone());

    let dept = departments
        .create(department_request("Engineering"))
        .await
        .expect("Failed to create department");

    let mut request = employee_request("Alice", "alice@x.com");
    request.department_id = Some(dept.id);
    let a = employees.create(request).await.expect("Failed to create employee");

    // Warm both caches
    employees.get_by_id(a.id).await.expect("Failed to read employee");
    let listed = employees
        .get_by_department(dept.id)
        .await
        .expect("Failed to list department employees");
    assert_eq!(listed.len(), 1);

    rename_employee_in_db(&db, a.id, "Alice (db)").await;

    let mut request = employee_request("Bob", "bob@x.com");
    request.department_id = Some(dept.id);
    employees.create(request).await.expect("Failed to create employee");

    let fresh_a = employees.get_by_id(a.id).await.expect("Failed to read employee");
    assert_eq!(fresh_a.name, "Alice (db)");

    let fresh_list = employees
        .get_by_department(dept.id)
        .await
        .expect("Failed to list department employees");
    assert_eq!(fresh_list.len(), 2);
}

#[tokio::test]
async fn department_create_distrusts_the_whole_cache() {
    let db = setup_test_db().await;
    let (_, departments) = build_services(db.clone());

    let first = departments
        .create(department_request("Engineering"))
        .await
        .expect("Failed to create department");

    departments
        .get_by_id(first.id)
        .await
        .expect("Failed to read department");
    rename_department_in_db(&db, first.id, "Renamed").await;

    departments
        .create(department_request("Sales"))
        .await
        .expect("Failed to create department");

    let fresh = departments
        .get_by_id(first.id)
        .await
        .expect("Failed to read department");
    assert_eq!(fresh.name, "Renamed");
}

#[tokio::test]
async fn department_update_evicts_only_that_entry() {
    let db = setup_test_db().await;
    let (_, departments) = build_services(db.clone());

    let a = departments
        .create(department_request("Engineering"))
        .await
        .expect("Failed to create department");
    let b = departments
        .create(department_request("Sales"))
        .await
        .expect("Failed to create department");

    departments.get_by_id(a.id).await.expect("Failed to read department");
    departments.get_by_id(b.id).await.expect("Failed to read department");

    rename_department_in_db(&db, b.id, "Sales (db)").await;

    departments
        .update(a.id, department_request("Platform"))
        .await
        .expect("Failed to update department");

    let fresh_a = departments.get_by_id(a.id).await.expect("Failed to read department");
    assert_eq!(fresh_a.name, "Platform");

    let stale_b = departments.get_by_id(b.id).await.expect("Failed to read department");
    assert_eq!(stale_b.name, "Sales", "unrelated entry must survive the eviction");
}

#[tokio::test]
async fn department_delete_clears_dependent_employee_caches() {
    let db = setup_test_db().await;
    let (employees, departments) = build_services(db.clone());

    let dept = departments
        .create(department_request("Engineering"))
        .await
        .expect("Failed to create department");

    let mut request = employee_request("Alice", "alice@x.com");
    request.department_id = Some(dept.id);
    let a = employees.create(request).await.expect("Failed to create employee");

    // Warm the roster and the single-employee entry
    let roster = employees
        .get_by_department(dept.id)
        .await
        .expect("Failed to list department employees");
    assert_eq!(roster.len(), 1);
    let cached = employees.get_by_id(a.id).await.expect("Failed to read employee");
    assert_eq!(cached.department_name.as_deref(), Some("Engineering"));

    departments.delete(dept.id).await.expect("Failed to delete department");

    // The roster must not survive the delete
    let gone = employees.get_by_department(dept.id).await;
    assert!(gone.is_err(), "deleted department must not serve a cached roster");

    // The member row was rewritten by the FK set-null; a fresh read must
    // reflect that instead of the cached assignment
    let fresh = employees.get_by_id(a.id).await.expect("Failed to read employee");
    assert_eq!(fresh.department_id, None);
    assert_eq!(fresh.department_name, None);
}

#[tokio::test]
async fn employee_delete_evicts_the_entry() {
    let db = setup_test_db().await;
    let (employees, _) = build_services(db.clone());

    let a = employees
        .create(employee_request("Alice", "alice@x.com"))
        .await
        .expect("Failed to create employee");
    employees.get_by_id(a.id).await.expect("Failed to read employee");

    employees.delete(a.id).await.expect("Failed to delete employee");

    let result = employees.get_by_id(a.id).await;
    assert!(result.is_err(), "deleted employee must not be served from cache");
}
