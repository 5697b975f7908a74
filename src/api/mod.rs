// API layer - poem-openapi endpoint implementations
pub mod departments;
pub mod employees;
pub mod health;
pub mod helpers;
pub mod reports;

pub use departments::DepartmentsApi;
pub use employees::EmployeesApi;
pub use health::HealthApi;
pub use reports::ReportsApi;

use poem_openapi::{auth::Bearer, SecurityScheme};

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);
