//! Шина событий импорта.
//!
//! Создаётся один раз в `main`, передаётся обработчикам через состояние axum.
//! Подписчик `spawn_log_subscriber` пишет события в `system_log`.

use contracts::enums::ImportType;
use tokio::sync::broadcast;

use crate::shared::logger::repository::log_event;

const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum ImportEvent {
    /// Файл разобран и показан пользователю
    Previewed {
        import_type: ImportType,
        file_name: String,
        rows: usize,
    },
    /// Пакет отклонён целиком (не сопоставлены обязательные поля и т.п.)
    Rejected {
        import_type: ImportType,
        reason: String,
    },
    RowFailed {
        import_type: ImportType,
        row: usize,
        message: String,
    },
    /// Бренд не распознан, подставлено значение по умолчанию
    BrandDefaulted {
        import_type: ImportType,
        row: usize,
        brand: String,
    },
    Completed {
        import_type: ImportType,
        created: usize,
        skipped: usize,
    },
}

impl ImportEvent {
    pub fn level(&self) -> &'static str {
        match self {
            ImportEvent::Previewed { .. } | ImportEvent::Completed { .. } => "info",
            ImportEvent::Rejected { .. } | ImportEvent::BrandDefaulted { .. } => "warn",
            ImportEvent::RowFailed { .. } => "error",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ImportEvent::Previewed {
                import_type,
                file_name,
                rows,
            } => format!("{}: preview of '{}' with {} rows", import_type, file_name, rows),
            ImportEvent::Rejected {
                import_type,
                reason,
            } => format!("{}: batch rejected: {}", import_type, reason),
            ImportEvent::RowFailed {
                import_type,
                row,
                message,
            } => format!("{}: row {} skipped: {}", import_type, row, message),
            ImportEvent::BrandDefaulted {
                import_type,
                row,
                brand,
            } => format!("{}: row {} brand defaulted to '{}'", import_type, row, brand),
            ImportEvent::Completed {
                import_type,
                created,
                skipped,
            } => format!(
                "{}: import finished, {} created, {} skipped",
                import_type, created, skipped
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ImportEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Отправка без подписчиков не считается ошибкой
    pub fn publish(&self, event: ImportEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ImportEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

/// Фоновая задача: каждое событие импорта записывается в системный журнал
pub fn spawn_log_subscriber(bus: &EventBus) -> tokio::task::JoinHandle<()> {
    let mut receiver = bus.subscribe();
    tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = log_event("server", event.level(), "import", &event.message()).await {
                        tracing::warn!("Failed to write import event to system_log: {}", e);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(missed)) => {
                    tracing::warn!("Import event subscriber lagged, {} events dropped", missed);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_receive_published_events() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        bus.publish(ImportEvent::Completed {
            import_type: ImportType::Customers,
            created: 3,
            skipped: 0,
        });

        let a = first.recv().await.unwrap();
        let b = second.recv().await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.message(), "customers: import finished, 3 created, 0 skipped");
    }

    #[test]
    fn test_publish_without_subscribers_is_ignored() {
        let bus = EventBus::default();
        bus.publish(ImportEvent::Rejected {
            import_type: ImportType::Leads,
            reason: "missing".into(),
        });
    }

    #[test]
    fn test_levels() {
        let failed = ImportEvent::RowFailed {
            import_type: ImportType::Sales,
            row: 2,
            message: "bad amount".into(),
        };
        assert_eq!(failed.level(), "error");
        assert_eq!(failed.message(), "sales: row 2 skipped: bad amount");
    }
}
