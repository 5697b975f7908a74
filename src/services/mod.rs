// Services layer - Business logic
pub mod authority_resolver;
pub mod department_service;
pub mod employee_service;
pub mod report_service;
pub mod token_service;
pub mod user_service_client;

pub use authority_resolver::{AuthorityResolver, LocalStoreAuthorityResolver};
pub use department_service::DepartmentService;
pub use employee_service::EmployeeService;
pub use report_service::{LogReportSink, ReportService, ReportSink};
pub use token_service::{TokenError, TokenService};
pub use user_service_client::UserServiceClient;
