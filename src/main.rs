mod api;
mod app_data;
mod auth;
mod cache;
mod config;
mod errors;
mod scheduler;
mod services;
mod stores;
mod types;

use poem::{listener::TcpListener, EndpointExt, Route, Server};
use poem_openapi::OpenApiService;
use std::sync::Arc;

use api::{DepartmentsApi, EmployeesApi, HealthApi, ReportsApi};
use app_data::AppData;
use auth::CookieJwtBridge;
use config::Settings;
use scheduler::{ReportScheduler, ScheduleConfig};

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    config::init_logging().expect("Failed to initialize logging");

    let settings = Settings::from_env().expect("Failed to load settings");

    // Connect to database and run migrations (including the role seed)
    let db = config::init_database(&settings.database_url)
        .await
        .expect("Failed to connect to database");
    config::migrate(&db).await.expect("Failed to run migrations");

    let bind_address = settings.bind_address.clone();
    let cookie_name = settings.auth_cookie_name.clone();

    let app_data = Arc::new(AppData::init(db, settings));

    // Start the daily report job; the handle owns the task for the lifetime
    // of the server
    let report_scheduler = ReportScheduler::new(Arc::clone(&app_data.report_service));
    let _scheduler_handle = if app_data.settings.scheduler_enabled {
        Some(report_scheduler.start(ScheduleConfig {
            hour: app_data.settings.scheduler_hour,
            minute: app_data.settings.scheduler_minute,
            recipient: app_data.settings.report_recipient.clone(),
        }))
    } else {
        tracing::info!("Daily report scheduler is disabled");
        None
    };

    let employees_api = EmployeesApi::new(
        Arc::clone(&app_data.token_service),
        Arc::clone(&app_data.authority_resolver),
        Arc::clone(&app_data.employee_service),
    );
    let departments_api = DepartmentsApi::new(
        Arc::clone(&app_data.token_service),
        Arc::clone(&app_data.authority_resolver),
        Arc::clone(&app_data.department_service),
    );
    let reports_api = ReportsApi::new(
        Arc::clone(&app_data.token_service),
        Arc::clone(&app_data.authority_resolver),
        Arc::clone(&app_data.report_service),
        Arc::clone(&app_data.settings),
    );

    // Create OpenAPI service with API implementations
    let api_service = OpenApiService::new(
        (HealthApi, employees_api, departments_api, reports_api),
        "Employee Management API",
        "1.0.0",
    )
    .server("http://localhost:3000/api/v1");

    // Generate Swagger UI from OpenAPI service
    let ui = api_service.swagger_ui();

    // Compose routes: the cookie bridge runs before authentication so a
    // token carried in a cookie is visible as a bearer header downstream
    let app = Route::new()
        .nest("/api/v1", api_service.with(CookieJwtBridge::new(cookie_name)))
        .nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", bind_address);
    tracing::info!("Swagger UI available at /swagger");

    Server::new(TcpListener::bind(bind_address)).run(app).await
}
