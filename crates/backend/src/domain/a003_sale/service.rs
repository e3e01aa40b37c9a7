use super::repository;
use contracts::domain::a003_sale::aggregate::{Sale, SaleDto};
use contracts::domain::common::{AggregateRoot, Origin};
use uuid::Uuid;

/// Номер заказа для продаж, пришедших без него
fn new_order_number() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Sale::code_prefix(), id[..8].to_uppercase())
}

pub async fn create(dto: SaleDto, origin: Origin) -> anyhow::Result<Uuid> {
    let mut aggregate = Sale::new_for_insert(new_order_number(), &dto, origin);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: SaleDto) -> anyhow::Result<()> {
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

pub async fn delete(id: Uuid) -> anyhow::Result<bool> {
    repository::soft_delete(id).await
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Sale>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Sale>> {
    repository::list_all().await
}
