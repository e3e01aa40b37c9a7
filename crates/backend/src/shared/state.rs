use std::sync::Arc;

use crate::shared::config::Config;
use crate::usecases::u501_spreadsheet_import::ImportExecutor;

/// Общее состояние обработчиков axum
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub importer: ImportExecutor,
}
