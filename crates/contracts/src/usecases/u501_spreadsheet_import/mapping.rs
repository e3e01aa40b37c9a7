use serde::{Deserialize, Serialize};

use super::field_spec::TargetFieldSpec;

/// Сопоставление колонки файла с целевым полем.
/// Пустой `target_field` означает, что колонка не загружается.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMapping {
    pub source_field: String,
    #[serde(default)]
    pub target_field: String,
}

impl FieldMapping {
    pub fn new(source_field: impl Into<String>, target_field: impl Into<String>) -> Self {
        Self {
            source_field: source_field.into(),
            target_field: target_field.into(),
        }
    }

    pub fn unmapped(source_field: impl Into<String>) -> Self {
        Self::new(source_field, String::new())
    }

    pub fn is_mapped(&self) -> bool {
        !self.target_field.is_empty()
    }
}

/// Цели, которых нет в списке полей текущего типа импорта
pub fn invalid_targets(mappings: &[FieldMapping], fields: &[TargetFieldSpec]) -> Vec<String> {
    let mut invalid = Vec::new();
    for mapping in mappings.iter().filter(|m| m.is_mapped()) {
        let known = fields.iter().any(|f| f.name == mapping.target_field);
        if !known && !invalid.contains(&mapping.target_field) {
            invalid.push(mapping.target_field.clone());
        }
    }
    invalid
}

/// Обязательные поля, на которые не указывает ни одно сопоставление (в порядке объявления)
pub fn missing_required(mappings: &[FieldMapping], fields: &[TargetFieldSpec]) -> Vec<String> {
    fields
        .iter()
        .filter(|f| f.required)
        .filter(|f| !mappings.iter().any(|m| m.target_field == f.name))
        .map(|f| f.name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ImportType;
    use crate::usecases::u501_spreadsheet_import::field_spec::{target_fields, EMAIL, FIRST_NAME, LAST_NAME};

    #[test]
    fn test_missing_required_lists_all_in_order() {
        let fields = target_fields(ImportType::Customers);
        let mappings = vec![FieldMapping::new("Correo", EMAIL), FieldMapping::unmapped("Otro")];
        assert_eq!(
            missing_required(&mappings, &fields),
            vec![FIRST_NAME.to_string(), LAST_NAME.to_string()]
        );
    }

    #[test]
    fn test_invalid_targets_ignore_unmapped() {
        let fields = target_fields(ImportType::Sales);
        let mappings = vec![
            FieldMapping::unmapped("A"),
            FieldMapping::new("B", "firstName"),
            FieldMapping::new("C", "firstName"),
        ];
        assert_eq!(invalid_targets(&mappings, &fields), vec!["firstName".to_string()]);
    }

    #[test]
    fn test_mapping_json_shape() {
        let mapping: FieldMapping = serde_json::from_str(r#"{"sourceField":"Nombres"}"#).unwrap();
        assert_eq!(mapping, FieldMapping::unmapped("Nombres"));
    }
}
