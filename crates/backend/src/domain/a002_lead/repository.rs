use chrono::Utc;
use contracts::domain::a002_lead::aggregate::{Lead, LeadId, LeadStatus};
use contracts::domain::common::{BaseAggregate, EntityMetadata, Origin};
use contracts::enums::Brand;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_lead")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub origin: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_country: Option<String>,
    pub phone_number: Option<String>,
    pub source: Option<String>,
    pub status: String,
    pub brands: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Lead {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Lead {
            base: BaseAggregate::with_metadata(
                LeadId(uuid),
                m.code,
                m.description,
                m.comment,
                Origin::from_str(&m.origin),
                metadata,
            ),
            first_name: m.first_name,
            last_name: m.last_name,
            email: m.email,
            phone_country: m.phone_country,
            phone_number: m.phone_number,
            source: m.source,
            status: LeadStatus::from_code(&m.status).unwrap_or_default(),
            brands: Brand::parse_list(&m.brands),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Lead) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        origin: Set(aggregate.base.origin.as_str().to_string()),
        first_name: Set(aggregate.first_name.clone()),
        last_name: Set(aggregate.last_name.clone()),
        email: Set(aggregate.email.clone()),
        phone_country: Set(aggregate.phone_country.clone()),
        phone_number: Set(aggregate.phone_number.clone()),
        source: Set(aggregate.source.clone()),
        status: Set(aggregate.status.code().to_string()),
        brands: Set(Brand::join(&aggregate.brands)),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Lead>> {
    let mut items: Vec<Lead> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    // Новые лиды сверху
    items.sort_by(|a, b| b.base.metadata.created_at.cmp(&a.base.metadata.created_at));
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Lead>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Lead) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &Lead) -> anyhow::Result<()> {
    let mut active = to_active(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()).await?;
    Ok(())
}

pub async fn soft_delete(id: Uuid) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id.to_string()))
        .exec(conn())
        .await?;
    Ok(result.rows_affected > 0)
}
