use poem_openapi::Object;

/// Request model for creating a new employee
#[derive(Object, Debug, Clone)]
pub struct CreateEmployeeRequest {
    /// Employee name (1-100 characters)
    #[oai(validator(min_length = 1, max_length = 100))]
    pub name: String,

    /// Work email address (unique)
    #[oai(validator(min_length = 3, max_length = 100))]
    pub email: String,

    /// Human-facing identifier, e.g. EMP001
    #[oai(validator(max_length = 20))]
    pub employee_code: Option<String>,

    /// ACTIVE, INACTIVE or TERMINATED (defaults to ACTIVE)
    pub status: Option<String>,

    /// Contact phone number
    #[oai(validator(max_length = 15))]
    pub phone_number: Option<String>,

    /// Postal address
    #[oai(validator(max_length = 200))]
    pub address: Option<String>,

    /// Hire date (YYYY-MM-DD)
    pub hire_date: Option<String>,

    /// Annual salary
    pub salary: Option<f64>,

    /// Job title
    #[oai(validator(max_length = 100))]
    pub job_title: Option<String>,

    /// Department the employee belongs to
    pub department_id: Option<i64>,
}

/// Request model for partially updating an employee
///
/// Absent fields leave the stored value unchanged.
#[derive(Object, Debug, Clone, Default)]
pub struct UpdateEmployeeRequest {
    #[oai(validator(min_length = 1, max_length = 100))]
    pub name: Option<String>,

    #[oai(validator(min_length = 3, max_length = 100))]
    pub email: Option<String>,

    #[oai(validator(max_length = 20))]
    pub employee_code: Option<String>,

    /// ACTIVE, INACTIVE or TERMINATED
    pub status: Option<String>,

    #[oai(validator(max_length = 15))]
    pub phone_number: Option<String>,

    #[oai(validator(max_length = 200))]
    pub address: Option<String>,

    /// Hire date (YYYY-MM-DD)
    pub hire_date: Option<String>,

    pub salary: Option<f64>,

    #[oai(validator(max_length = 100))]
    pub job_title: Option<String>,

    pub department_id: Option<i64>,
}

/// Request model for updating only the employment status
#[derive(Object, Debug, Clone)]
pub struct UpdateEmployeeStatusRequest {
    /// ACTIVE, INACTIVE or TERMINATED
    #[oai(validator(min_length = 1, max_length = 20))]
    pub status: String,
}

/// Response model representing an employee
#[derive(Object, Debug, Clone)]
pub struct EmployeeResponse {
    /// Unique identifier for the employee
    pub id: i64,

    /// Employee name
    pub name: String,

    /// Work email address
    pub email: String,

    /// Human-facing identifier, e.g. EMP001
    pub employee_code: Option<String>,

    /// ACTIVE, INACTIVE or TERMINATED
    pub status: String,

    /// Contact phone number
    pub phone_number: Option<String>,

    /// Postal address
    pub address: Option<String>,

    /// Hire date (YYYY-MM-DD)
    pub hire_date: Option<String>,

    /// Annual salary
    pub salary: Option<f64>,

    /// Job title
    pub job_title: Option<String>,

    /// Department the employee belongs to
    pub department_id: Option<i64>,

    /// Name of the department, resolved at read time
    pub department_name: Option<String>,

    /// Creation timestamp (Unix epoch seconds)
    pub created_at: i64,

    /// Last modification timestamp (Unix epoch seconds)
    pub updated_at: i64,

    /// Optimistic locking version
    pub version: i64,
}
