use poem_openapi::Object;

/// Request model for creating or updating a department
///
/// On update, absent fields leave the stored value unchanged.
#[derive(Object, Debug, Clone)]
pub struct DepartmentRequest {
    /// Department name (1-100 characters, unique)
    #[oai(validator(min_length = 1, max_length = 100))]
    pub name: String,

    /// Optional description of the department
    #[oai(validator(max_length = 500))]
    pub description: Option<String>,

    /// Office location
    #[oai(validator(max_length = 100))]
    pub location: Option<String>,

    /// Annual budget
    pub budget: Option<f64>,
}

/// Response model representing a department
#[derive(Object, Debug, Clone)]
pub struct DepartmentResponse {
    /// Unique identifier for the department
    pub id: i64,

    /// Department name
    pub name: String,

    /// Optional description of the department
    pub description: Option<String>,

    /// Office location
    pub location: Option<String>,

    /// Annual budget
    pub budget: Option<f64>,

    /// Number of employees assigned to the department
    pub head_count: i64,

    /// Creation timestamp (Unix epoch seconds)
    pub created_at: i64,

    /// Last modification timestamp (Unix epoch seconds)
    pub updated_at: i64,

    /// Optimistic locking version
    pub version: i64,
}
