use axum::{extract::Path, Json};
use contracts::domain::common::Origin;
use serde_json::json;

use crate::domain::a001_customer;

/// GET /api/customer
pub async fn list_all() -> Result<
    Json<Vec<contracts::domain::a001_customer::aggregate::Customer>>,
    axum::http::StatusCode,
> {
    match a001_customer::service::list_all().await {
        Ok(v) => Ok(Json(v)),
        Err(e) => {
            tracing::error!("Failed to list customers: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// GET /api/customer/:id
pub async fn get_by_id(
    Path(id): Path<String>,
) -> Result<Json<contracts::domain::a001_customer::aggregate::Customer>, axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a001_customer::service::get_by_id(uuid).await {
        Ok(Some(v)) => Ok(Json(v)),
        Ok(None) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(e) => {
            tracing::error!("Failed to load customer {}: {}", id, e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// POST /api/customer
///
/// Без `id` создаёт запись, с `id` обновляет существующую
pub async fn upsert(
    Json(dto): Json<contracts::domain::a001_customer::aggregate::CustomerDto>,
) -> Result<Json<serde_json::Value>, axum::http::StatusCode> {
    let result = match dto.id.clone() {
        Some(id) => a001_customer::service::update(dto).await.map(|_| id),
        None => a001_customer::service::create(dto, Origin::Self_)
            .await
            .map(|id| id.to_string()),
    };
    match result {
        Ok(id) => Ok(Json(json!({"id": id}))),
        Err(e) if e.to_string().starts_with("Validation failed") => {
            tracing::warn!("Rejected customer: {}", e);
            Err(axum::http::StatusCode::UNPROCESSABLE_ENTITY)
        }
        Err(e) => {
            tracing::error!("Failed to save customer: {}", e);
            Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// DELETE /api/customer/:id
pub async fn delete(Path(id): Path<String>) -> Result<(), axum::http::StatusCode> {
    let uuid = match uuid::Uuid::parse_str(&id) {
        Ok(uuid) => uuid,
        Err(_) => return Err(axum::http::StatusCode::BAD_REQUEST),
    };
    match a001_customer::service::delete(uuid).await {
        Ok(true) => Ok(()),
        Ok(false) => Err(axum::http::StatusCode::NOT_FOUND),
        Err(_) => Err(axum::http::StatusCode::INTERNAL_SERVER_ERROR),
    }
}
