use super::repository;
use contracts::domain::a001_customer::aggregate::{Customer, CustomerDto};
use contracts::domain::common::{AggregateRoot, Origin};
use uuid::Uuid;

fn new_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Customer::code_prefix(), id[..8].to_uppercase())
}

/// Создание нового клиента (форма или импорт)
pub async fn create(dto: CustomerDto, origin: Origin) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(new_code);
    let mut aggregate = Customer::new_for_insert(code, &dto, origin);

    // Валидация
    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::insert(&aggregate).await
}

/// Обновление существующего клиента
pub async fn update(dto: CustomerDto) -> anyhow::Result<()> {
    let id = dto
        .id
        .as_ref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid ID"))?;

    let mut aggregate = repository::get_by_id(id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("Not found"))?;

    aggregate.update(&dto);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();

    repository::update(&aggregate).await
}

/// Мягкое удаление клиента
pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Customer>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Customer>> {
    repository::list_all().await
}
