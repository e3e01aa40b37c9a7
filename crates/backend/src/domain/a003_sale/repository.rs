use chrono::{NaiveDate, Utc};
use contracts::domain::a003_sale::aggregate::{Sale, SaleId};
use contracts::domain::common::{BaseAggregate, EntityMetadata, Origin};
use contracts::enums::Brand;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_sale")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Номер заказа
    pub code: String,
    /// Имя покупателя
    pub description: String,
    pub comment: Option<String>,
    pub origin: String,
    pub total_amount: f64,
    pub sale_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: Option<String>,
    pub brands: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Sale {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata {
            created_at: m.created_at.unwrap_or_else(Utc::now),
            updated_at: m.updated_at.unwrap_or_else(Utc::now),
            is_deleted: m.is_deleted,
            version: m.version,
        };
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Sale {
            base: BaseAggregate::with_metadata(
                SaleId(uuid),
                m.code,
                m.description,
                m.comment,
                Origin::from_str(&m.origin),
                metadata,
            ),
            total_amount: m.total_amount,
            sale_date: m.sale_date,
            email: m.email,
            customer_phone: m.customer_phone,
            payment_method: m.payment_method,
            brands: Brand::parse_list(&m.brands),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(aggregate: &Sale) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.base.id.value().to_string()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        origin: Set(aggregate.base.origin.as_str().to_string()),
        total_amount: Set(aggregate.total_amount),
        sale_date: Set(aggregate.sale_date),
        email: Set(aggregate.email.clone()),
        customer_phone: Set(aggregate.customer_phone.clone()),
        payment_method: Set(aggregate.payment_method.clone()),
        brands: Set(Brand::join(&aggregate.brands)),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

pub async fn list_all() -> anyhow::Result<Vec<Sale>> {
    let mut items: Vec<Sale> = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    // Сначала последние продажи, без даты в конце
    items.sort_by(|a, b| b.sale_date.cmp(&a.sale_date));
    Ok(items)
}

pub async fn get_by_id(id: Uuid) -> anyhow::Result<Option<Sale>> {
    let result = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Sale) -> anyhow::Result<Uuid> {
    let uuid = aggregate.base.id.value();
    to_active(aggregate).insert(conn()).await?;
    Ok(uuid)
}

pub async fn update(aggregate: &Sale) -> anyhow::Result<()> {
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
