use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::common::fields::{non_empty, validate_email};
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use crate::enums::Brand;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор продажи
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SaleId(pub Uuid);

impl SaleId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for SaleId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SaleId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Продажа: в `base.code` хранится номер заказа, в `base.description` имя покупателя.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sale {
    #[serde(flatten)]
    pub base: BaseAggregate<SaleId>,

    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
    #[serde(rename = "saleDate")]
    pub sale_date: Option<NaiveDate>,
    pub email: Option<String>,
    /// Телефон покупателя в международном формате
    #[serde(rename = "customerPhone")]
    pub customer_phone: Option<String>,
    #[serde(rename = "paymentMethod")]
    pub payment_method: Option<String>,
    pub brands: Vec<Brand>,
}

impl Sale {
    /// Создать новую продажу для вставки в БД
    pub fn new_for_insert(code: String, dto: &SaleDto, origin: Origin) -> Self {
        let mut base = BaseAggregate::new(SaleId::new_v4(), code, String::new());
        base.origin = origin;
        let mut sale = Self {
            base,
            total_amount: 0.0,
            sale_date: None,
            email: None,
            customer_phone: None,
            payment_method: None,
            brands: Vec::new(),
        };
        sale.update(dto);
        sale
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &SaleDto) {
        if let Some(order_number) = non_empty(dto.order_number.as_deref()) {
            self.base.code = order_number;
        }
        self.base.description = dto.customer_name.trim().to_string();
        self.base.comment = non_empty(dto.notes.as_deref());
        self.total_amount = dto.total_amount;
        self.sale_date = dto.sale_date;
        self.email = non_empty(dto.email.as_deref()).map(|e| e.to_lowercase());
        self.customer_phone = non_empty(dto.customer_phone.as_deref());
        self.payment_method = non_empty(dto.payment_method.as_deref());
        self.brands = dto.brands.clone();
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.is_empty() {
            return Err("Customer name is required".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Order number is required".into());
        }
        if !self.total_amount.is_finite() || self.total_amount < 0.0 {
            return Err(format!("Invalid total amount: {}", self.total_amount));
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Sale {
    type Id = SaleId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "sale"
    }

    fn code_prefix() -> &'static str {
        "SAL"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления продажи
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SaleDto {
    pub id: Option<String>,
    pub order_number: Option<String>,
    pub customer_name: String,
    pub total_amount: f64,
    pub sale_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub customer_phone: Option<String>,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub brands: Vec<Brand>,
    pub notes: Option<String>,
}
