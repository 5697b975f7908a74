use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("Employee not found with id: {id}")]
    EmployeeNotFound { id: i64 },

    #[error("Department not found with id: {id}")]
    DepartmentNotFound { id: i64 },

    #[error("Employee email already in use: {email}")]
    DuplicateEmployeeEmail { email: String },

    #[error("Department name already in use: {name}")]
    DuplicateDepartmentName { name: String },

    #[error("Invalid employee status: {status}")]
    InvalidStatus { status: String },

    #[error("Invalid date value: {value} ({message})")]
    InvalidDate { value: String, message: String },
}
