use async_trait::async_trait;
use contracts::domain::common::Origin;
use uuid::Uuid;

use super::typed_row::ImportRow;
use crate::domain::{a001_customer, a002_lead, a003_sale};

/// Куда попадают строки импорта
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Создание одной записи через обычный путь создания (та же валидация, что у форм)
    async fn create(&self, row: ImportRow) -> anyhow::Result<Uuid>;
}

/// Запись в БД через сервисы агрегатов
pub struct DbSink;

#[async_trait]
impl RecordSink for DbSink {
    async fn create(&self, row: ImportRow) -> anyhow::Result<Uuid> {
        match row {
            ImportRow::Customer(dto) => a001_customer::service::create(dto, Origin::Import).await,
            ImportRow::Lead(dto) => a002_lead::service::create(dto, Origin::Import).await,
            ImportRow::Sale(dto) => a003_sale::service::create(dto, Origin::Import).await,
        }
    }
}
