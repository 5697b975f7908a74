// Stores layer - SeaORM data access
pub mod department_store;
pub mod employee_store;
pub mod role_store;
pub mod user_store;

pub use department_store::DepartmentStore;
pub use employee_store::EmployeeStore;
pub use role_store::RoleStore;
pub use user_store::{UserStore, UserWithRoles};
