use serde::{Deserialize, Serialize};

/// Запись системного журнала
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub timestamp: String,
    pub source: String, // "client" или "server"
    pub level: String,
    pub category: String,
    pub message: String,
}

/// DTO для создания новой записи журнала с клиента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateLogRequest {
    pub source: String,
    #[serde(default = "default_level")]
    pub level: String,
    pub category: String,
    pub message: String,
}

fn default_level() -> String {
    "info".to_string()
}
