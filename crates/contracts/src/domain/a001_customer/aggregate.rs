use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::common::fields::{display_name, non_empty, validate_country_code, validate_email};
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use crate::enums::Brand;
use crate::shared::phone::normalize_country_code;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор клиента
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub Uuid);

impl CustomerId {
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

impl AggregateId for CustomerId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(CustomerId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Клиент CRM. `base.description` хранит отображаемое имя.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(flatten)]
    pub base: BaseAggregate<CustomerId>,

    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: Option<String>,
    #[serde(rename = "phoneCountry")]
    pub phone_country: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    pub identification: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub brands: Vec<Brand>,
}

impl Customer {
    /// Создать нового клиента для вставки в БД
    pub fn new_for_insert(code: String, dto: &CustomerDto, origin: Origin) -> Self {
        let mut base = BaseAggregate::new(CustomerId::new_v4(), code, String::new());
        base.origin = origin;
        let mut customer = Self {
            base,
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            phone_country: None,
            phone_number: None,
            identification: None,
            address: None,
            city: None,
            province: None,
            brands: Vec::new(),
        };
        customer.update(dto);
        customer
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &CustomerDto) {
        if let Some(code) = dto.code.as_ref().filter(|c| !c.trim().is_empty()) {
            self.base.code = code.trim().to_string();
        }
        self.first_name = dto.first_name.trim().to_string();
        self.last_name = dto.last_name.trim().to_string();
        self.base.description = display_name(dto.name.as_deref(), &self.first_name, &self.last_name);
        self.base.comment = non_empty(dto.notes.as_deref());
        self.email = non_empty(dto.email.as_deref()).map(|e| e.to_lowercase());
        self.phone_country = non_empty(dto.phone_country.as_deref()).map(|c| normalize_country_code(&c));
        self.phone_number = non_empty(dto.phone_number.as_deref());
        self.identification = non_empty(dto.identification.as_deref());
        self.address = non_empty(dto.address.as_deref());
        self.city = non_empty(dto.city.as_deref());
        self.province = non_empty(dto.province.as_deref());
        self.brands = dto.brands.clone();
    }

    /// Валидация данных
    pub fn validate(&self) -> Result<(), String> {
        if self.first_name.is_empty() {
            return Err("First name is required".into());
        }
        if self.last_name.is_empty() {
            return Err("Last name is required".into());
        }
        if self.base.code.trim().is_empty() {
            return Err("Code is required".into());
        }
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(country) = &self.phone_country {
            validate_country_code(country)?;
        }
        Ok(())
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

impl AggregateRoot for Customer {
    type Id = CustomerId;

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
        "a001"
    }

    fn collection_name() -> &'static str {
        "customer"
    }

    fn code_prefix() -> &'static str {
        "CUS"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления клиента (форма и импорт)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub first_name: String,
    pub last_name: String,
    /// Отображаемое имя; если пусто, собирается из имени и фамилии
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_country: Option<String>,
    pub phone_number: Option<String>,
    pub identification: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    #[serde(default)]
    pub brands: Vec<Brand>,
    pub notes: Option<String>,
}
