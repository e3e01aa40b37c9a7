//! Контракт редактора сопоставления: через какие стадии проходит загрузка файла.
//!
//! `FileSelected → Previewed → MappingConfirmed → Imported`, возврат из
//! `MappingConfirmed` в `Previewed` разрешён, `Imported` конечная стадия.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::field_spec::{target_fields, TargetFieldSpec};
use super::header_matcher::match_headers;
use super::mapping::{invalid_targets, missing_required, FieldMapping};
use crate::enums::ImportType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportStage {
    FileSelected,
    Previewed,
    MappingConfirmed,
    Imported,
}

impl ImportStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportStage::FileSelected => "file-selected",
            ImportStage::Previewed => "previewed",
            ImportStage::MappingConfirmed => "mapping-confirmed",
            ImportStage::Imported => "imported",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Действие недопустимо на текущей стадии
    InvalidTransition {
        stage: ImportStage,
        action: &'static str,
    },
    UnknownSource(String),
    UnknownTargets(Vec<String>),
    MissingRequired(Vec<String>),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidTransition { stage, action } => {
                write!(f, "cannot {} while import is {}", action, stage.as_str())
            }
            SessionError::UnknownSource(source) => write!(f, "unknown source column: {}", source),
            SessionError::UnknownTargets(targets) => {
                write!(f, "unknown target fields: {}", targets.join(", "))
            }
            SessionError::MissingRequired(fields) => {
                write!(f, "required fields are not mapped: {}", fields.join(", "))
            }
        }
    }
}

impl std::error::Error for SessionError {}

/// Состояние одной загрузки файла на стороне редактора
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSession {
    pub import_type: ImportType,
    pub stage: ImportStage,
    pub headers: Vec<String>,
    pub mappings: Vec<FieldMapping>,
    pub imported_count: Option<usize>,
}

impl ImportSession {
    pub fn new(import_type: ImportType) -> Self {
        Self {
            import_type,
            stage: ImportStage::FileSelected,
            headers: Vec::new(),
            mappings: Vec::new(),
            imported_count: None,
        }
    }

    pub fn target_fields(&self) -> Vec<TargetFieldSpec> {
        target_fields(self.import_type)
    }

    /// Заголовки извлечены: применяем автосопоставление.
    /// Повторный предпросмотр (другой файл) допускается до подтверждения.
    pub fn preview(&mut self, headers: Vec<String>) -> Result<(), SessionError> {
        self.expect_stage(&[ImportStage::FileSelected, ImportStage::Previewed], "preview")?;
        self.mappings = match_headers(&headers, &self.target_fields());
        self.headers = headers;
        self.stage = ImportStage::Previewed;
        Ok(())
    }

    /// Ручная правка одной колонки; пустая цель снимает сопоставление
    pub fn set_target(&mut self, source: &str, target: &str) -> Result<(), SessionError> {
        self.expect_stage(&[ImportStage::Previewed], "edit mapping")?;
        if !target.is_empty() && !self.target_fields().iter().any(|f| f.name == target) {
            return Err(SessionError::UnknownTargets(vec![target.to_string()]));
        }
        let mapping = self
            .mappings
            .iter_mut()
            .find(|m| m.source_field == source)
            .ok_or_else(|| SessionError::UnknownSource(source.to_string()))?;
        mapping.target_field = target.to_string();
        Ok(())
    }

    /// Замена всех сопоставлений тем, что прислал редактор.
    /// Колонки, о которых редактор не сообщил, становятся несопоставленными.
    pub fn apply_mappings(&mut self, mappings: &[FieldMapping]) -> Result<(), SessionError> {
        self.expect_stage(&[ImportStage::Previewed], "edit mapping")?;
        if let Some(unknown) = mappings
            .iter()
            .find(|m| !self.headers.contains(&m.source_field))
        {
            return Err(SessionError::UnknownSource(unknown.source_field.clone()));
        }
        let invalid = invalid_targets(mappings, &self.target_fields());
        if !invalid.is_empty() {
            return Err(SessionError::UnknownTargets(invalid));
        }
        self.mappings = self
            .headers
            .iter()
            .map(|header| {
                mappings
                    .iter()
                    .find(|m| &m.source_field == header)
                    .cloned()
                    .unwrap_or_else(|| FieldMapping::unmapped(header.clone()))
            })
            .collect();
        Ok(())
    }

    pub fn missing_required(&self) -> Vec<String> {
        missing_required(&self.mappings, &self.target_fields())
    }

    /// Подтверждение невозможно, пока хотя бы одно обязательное поле не сопоставлено
    pub fn confirm(&mut self) -> Result<(), SessionError> {
        self.expect_stage(&[ImportStage::Previewed], "confirm mapping")?;
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(SessionError::MissingRequired(missing));
        }
        self.stage = ImportStage::MappingConfirmed;
        Ok(())
    }

    pub fn back_to_preview(&mut self) -> Result<(), SessionError> {
        self.expect_stage(&[ImportStage::MappingConfirmed], "go back")?;
        self.stage = ImportStage::Previewed;
        Ok(())
    }

    pub fn mark_imported(&mut self, count: usize) -> Result<(), SessionError> {
        self.expect_stage(&[ImportStage::MappingConfirmed], "import")?;
        self.imported_count = Some(count);
        self.stage = ImportStage::Imported;
        Ok(())
    }

    fn expect_stage(&self, allowed: &[ImportStage], action: &'static str) -> Result<(), SessionError> {
        if allowed.contains(&self.stage) {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition {
                stage: self.stage,
                action,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::usecases::u501_spreadsheet_import::field_spec::{EMAIL, FIRST_NAME, LAST_NAME};

    fn headers(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_full_happy_path() {
        let mut session = ImportSession::new(ImportType::Customers);
        session.preview(headers(&["Nombres", "Apellidos", "Email"])).unwrap();
        assert_eq!(session.stage, ImportStage::Previewed);
        session.confirm().unwrap();
        session.mark_imported(3).unwrap();
        assert_eq!(session.stage, ImportStage::Imported);
        assert_eq!(session.imported_count, Some(3));
    }

    #[test]
    fn test_confirm_blocked_by_missing_required() {
        let mut session = ImportSession::new(ImportType::Customers);
        session.preview(headers(&["Correo", "Ciudad"])).unwrap();
        assert_eq!(
            session.confirm(),
            Err(SessionError::MissingRequired(vec![
                FIRST_NAME.to_string(),
                LAST_NAME.to_string()
            ]))
        );
        assert_eq!(session.stage, ImportStage::Previewed);
    }

    #[test]
    fn test_manual_edit_then_back_and_forth() {
        let mut session = ImportSession::new(ImportType::Customers);
        session.preview(headers(&["Col A", "Col B", "Col C"])).unwrap();
        session.set_target("Col A", FIRST_NAME).unwrap();
        session.set_target("Col B", LAST_NAME).unwrap();
        session.confirm().unwrap();

        assert!(session.set_target("Col C", EMAIL).is_err());
        session.back_to_preview().unwrap();
        session.set_target("Col C", EMAIL).unwrap();
        session.confirm().unwrap();
        assert_eq!(session.stage, ImportStage::MappingConfirmed);
    }

    #[test]
    fn test_unknown_target_rejected() {
        let mut session = ImportSession::new(ImportType::Sales);
        session.preview(headers(&["Col A"])).unwrap();
        assert_eq!(
            session.set_target("Col A", FIRST_NAME),
            Err(SessionError::UnknownTargets(vec![FIRST_NAME.to_string()]))
        );
    }

    #[test]
    fn test_imported_is_terminal() {
        let mut session = ImportSession::new(ImportType::Leads);
        session.preview(headers(&["Nombre", "Apellido"])).unwrap();
        session.confirm().unwrap();
        session.mark_imported(0).unwrap();
        assert!(session.back_to_preview().is_err());
        assert!(session.preview(headers(&["Nombre"])).is_err());
        assert!(session.mark_imported(1).is_err());
    }

    #[test]
    fn test_apply_mappings_fills_missing_columns_as_unmapped() {
        let mut session = ImportSession::new(ImportType::Customers);
        session.preview(headers(&["A", "B", "C"])).unwrap();
        session
            .apply_mappings(&[FieldMapping::new("A", FIRST_NAME), FieldMapping::new("C", LAST_NAME)])
            .unwrap();
        assert_eq!(session.mappings[1], FieldMapping::unmapped("B"));
        assert!(session.apply_mappings(&[FieldMapping::new("Z", EMAIL)]).is_err());
    }
}
