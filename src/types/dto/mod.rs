// Data transfer objects - request/response models for the HTTP API
pub mod common;
pub mod department;
pub mod employee;
pub mod report;
