pub mod repository;

use repository::log_event_internal;

/// Логирование события на сервере
///
/// # Примеры
/// ```ignore
/// logger::log("startup", "Сервер запущен");
/// logger::log("import", "Загружено 12 клиентов");
/// ```
pub fn log(category: &str, message: &str) {
    log_event_internal("server", "info", category, message);
}
