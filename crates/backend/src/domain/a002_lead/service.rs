use super::repository;
use contracts::domain::a002_lead::aggregate::{Lead, LeadDto};
use contracts::domain::common::{AggregateRoot, Origin};
use uuid::Uuid;

fn new_code() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}-{}", Lead::code_prefix(), id[..8].to_uppercase())
}

/// Создание нового лида
pub async fn create(dto: LeadDto, origin: Origin) -> anyhow::Result<Uuid> {
    let code = dto
        .code
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(new_code);
    let mut aggregate = Lead::new_for_insert(code, &dto, origin);

    aggregate
        .validate()
        .map_err(|e| anyhow::anyhow!("Validation failed: {}", e))?;

    aggregate.before_write();

    repository::insert(&aggregate).await
}

pub async fn update(dto: LeadDto) -> anyhow::Result<()> {
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

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Lead>> {
    repository::get_by_id(id).await
}

pub async fn list_all() -> anyhow::Result<Vec<Lead>> {
    repository::list_all().await
}
