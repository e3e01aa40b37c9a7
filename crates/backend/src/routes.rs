use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::handlers;
use crate::shared::state::AppState;

/// Конфигурация всех роутов приложения
pub fn configure_routes(state: AppState) -> Router {
    // Запас сверх лимита файла на остальные поля формы
    let upload_limit = state.config.import.max_upload_bytes() + 1024 * 1024;

    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SPREADSHEET IMPORT
        // ========================================
        .route(
            "/api/import/preview",
            post(handlers::u501_spreadsheet_import::preview),
        )
        .route(
            "/api/import/commit",
            post(handlers::u501_spreadsheet_import::commit),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
        .route(
            "/api/import/template/:type",
            get(handlers::u501_spreadsheet_import::template),
        )
        .route(
            "/api/import/target-fields/:type",
            get(handlers::u501_spreadsheet_import::target_fields_for),
        )
        // ========================================
        // CRM RECORDS
        // ========================================
        .route(
            "/api/customer",
            get(handlers::a001_customer::list_all).post(handlers::a001_customer::upsert),
        )
        .route(
            "/api/customer/:id",
            get(handlers::a001_customer::get_by_id).delete(handlers::a001_customer::delete),
        )
        .route(
            "/api/lead",
            get(handlers::a002_lead::list_all).post(handlers::a002_lead::upsert),
        )
        .route(
            "/api/lead/:id",
            get(handlers::a002_lead::get_by_id).delete(handlers::a002_lead::delete),
        )
        .route(
            "/api/sale",
            get(handlers::a003_sale::list_all).post(handlers::a003_sale::upsert),
        )
        .route(
            "/api/sale/:id",
            get(handlers::a003_sale::get_by_id).delete(handlers::a003_sale::delete),
        )
        // ========================================
        // SYSTEM LOG
        // ========================================
        .route(
            "/api/logs",
            get(handlers::logs::list_all)
                .post(handlers::logs::create)
                .delete(handlers::logs::clear_all),
        )
        .with_state(state)
}
