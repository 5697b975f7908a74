use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::EntityCaches;
use crate::config::{AuthorityStrategy, Settings};
use crate::services::{
    AuthorityResolver, DepartmentService, EmployeeService, LocalStoreAuthorityResolver,
    LogReportSink, ReportService, TokenService, UserServiceClient,
};
use crate::stores::{DepartmentStore, EmployeeStore, RoleStore, UserStore};

/// Centralized application data following the main-owned stores pattern
///
/// All dependencies are created once here and shared via Arc across the API
/// structs and the scheduler. The authority resolver is built from exactly
/// one strategy; the other is never constructed.
pub struct AppData {
    pub settings: Arc<Settings>,
    pub caches: Arc<EntityCaches>,
    pub user_store: Arc<UserStore>,
    pub role_store: Arc<RoleStore>,
    pub employee_store: Arc<EmployeeStore>,
    pub department_store: Arc<DepartmentStore>,
    pub token_service: Arc<TokenService>,
    pub authority_resolver: Arc<dyn AuthorityResolver>,
    pub employee_service: Arc<EmployeeService>,
    pub department_service: Arc<DepartmentService>,
    pub report_service: Arc<ReportService>,
}

impl AppData {
    /// Wire all stores and services from a connected, migrated database
    pub fn init(db: DatabaseConnection, settings: Settings) -> Self {
        tracing::info!("Initializing AppData...");
        let settings = Arc::new(settings);

        let caches = Arc::new(EntityCaches::new(
            settings.cache_max_entries,
            Duration::from_secs(settings.cache_ttl_secs),
            Duration::from_secs(settings.cache_tti_secs),
        ));

        tracing::debug!("Creating stores...");
        let user_store = Arc::new(UserStore::new(db.clone()));
        let role_store = Arc::new(RoleStore::new(db.clone()));
        let employee_store = Arc::new(EmployeeStore::new(db.clone()));
        let department_store = Arc::new(DepartmentStore::new(db.clone()));

        let token_service = Arc::new(TokenService::new(
            settings.jwt_secret.clone(),
            settings.jwt_issuer.clone(),
            settings.jwt_audience.clone(),
        ));

        let authority_resolver: Arc<dyn AuthorityResolver> = match settings.authority_strategy {
            AuthorityStrategy::LocalStore => {
                tracing::info!("Using local store authority resolution");
                Arc::new(LocalStoreAuthorityResolver::new(
                    Arc::clone(&user_store),
                    Arc::clone(&role_store),
                ))
            }
            AuthorityStrategy::RemoteService => {
                tracing::info!(
                    url = %settings.user_service_url,
                    "Using remote user service authority resolution"
                );
                Arc::new(UserServiceClient::new(settings.user_service_url.clone()))
            }
        };

        let employee_service = Arc::new(EmployeeService::new(
            Arc::clone(&employee_store),
            Arc::clone(&department_store),
            Arc::clone(&caches),
        ));
        let department_service = Arc::new(DepartmentService::new(
            Arc::clone(&department_store),
            Arc::clone(&employee_store),
            Arc::clone(&caches),
        ));
        let report_service = Arc::new(ReportService::new(
            Arc::clone(&employee_store),
            Arc::new(LogReportSink),
        ));

        tracing::info!("AppData initialization complete");

        Self {
            settings,
            caches,
            user_store,
            role_store,
            employee_store,
            department_store,
            token_service,
            authority_resolver,
            employee_service,
            department_service,
            report_service,
        }
    }
}
