use thiserror::Error;

pub mod database;
pub mod directory;
pub mod user;

pub use database::DatabaseError;
pub use directory::DirectoryError;
pub use user::UserError;

/// Internal error type for store and service operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors
/// (store-specific). Not exposed via API - endpoints convert to ApiError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }
}
