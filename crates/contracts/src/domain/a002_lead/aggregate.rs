use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::domain::common::fields::{display_name, non_empty, validate_country_code, validate_email};
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata, Origin};
use crate::enums::Brand;
use crate::shared::phone::normalize_country_code;

// ============================================================================
// ID Type
// ============================================================================

/// Уникальный идентификатор лида
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LeadId(pub Uuid);

impl LeadId {
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

impl AggregateId for LeadId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(LeadId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

/// Стадия работы с лидом
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Converted,
    Lost,
}

impl LeadStatus {
    pub fn code(&self) -> &'static str {
        match self {
            LeadStatus::New => "new",
            LeadStatus::Contacted => "contacted",
            LeadStatus::Qualified => "qualified",
            LeadStatus::Converted => "converted",
            LeadStatus::Lost => "lost",
        }
    }

    /// Разбор статуса из файла; принимаются и испанские названия
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_lowercase().as_str() {
            "new" | "nuevo" => Some(LeadStatus::New),
            "contacted" | "contactado" => Some(LeadStatus::Contacted),
            "qualified" | "calificado" => Some(LeadStatus::Qualified),
            "converted" | "convertido" => Some(LeadStatus::Converted),
            "lost" | "perdido" => Some(LeadStatus::Lost),
            _ => None,
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// Потенциальный клиент
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    #[serde(flatten)]
    pub base: BaseAggregate<LeadId>,

    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: Option<String>,
    #[serde(rename = "phoneCountry")]
    pub phone_country: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
    /// Канал, откуда пришёл лид (instagram, feria, referido...)
    pub source: Option<String>,
    pub status: LeadStatus,
    pub brands: Vec<Brand>,
}

impl Lead {
    /// Создать новый лид для вставки в БД
    pub fn new_for_insert(code: String, dto: &LeadDto, origin: Origin) -> Self {
        let mut base = BaseAggregate::new(LeadId::new_v4(), code, String::new());
        base.origin = origin;
        let mut lead = Self {
            base,
            first_name: String::new(),
            last_name: String::new(),
            email: None,
            phone_country: None,
            phone_number: None,
            source: None,
            status: LeadStatus::New,
            brands: Vec::new(),
        };
        lead.update(dto);
        lead
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &LeadDto) {
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
        self.source = non_empty(dto.source.as_deref());
        self.status = dto.status.unwrap_or_default();
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

impl AggregateRoot for Lead {
    type Id = LeadId;

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
        "a002"
    }

    fn collection_name() -> &'static str {
        "lead"
    }

    fn code_prefix() -> &'static str {
        "LEAD"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления лида
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct LeadDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone_country: Option<String>,
    pub phone_number: Option<String>,
    pub source: Option<String>,
    pub status: Option<LeadStatus>,
    #[serde(default)]
    pub brands: Vec<Brand>,
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_accepts_spanish_names() {
        assert_eq!(LeadStatus::from_code(" Contactado "), Some(LeadStatus::Contacted));
        assert_eq!(LeadStatus::from_code("lost"), Some(LeadStatus::Lost));
        assert_eq!(LeadStatus::from_code("???"), None);
    }

    #[test]
    fn test_new_lead_defaults_to_new_status() {
        let dto = LeadDto {
            first_name: "Luis".into(),
            last_name: "Mora".into(),
            ..Default::default()
        };
        let lead = Lead::new_for_insert("LEAD-1".into(), &dto, Origin::Self_);
        assert_eq!(lead.status, LeadStatus::New);
        assert_eq!(lead.base.description, "Luis Mora");
        assert!(lead.validate().is_ok());
    }
}
