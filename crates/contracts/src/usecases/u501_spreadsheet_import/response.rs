use serde::{Deserialize, Serialize};

use super::field_spec::TargetFieldSpec;
use super::mapping::FieldMapping;
use super::record::ImportRecord;
use crate::enums::ImportType;

/// Ответ на загрузку файла: строки для предпросмотра и автосопоставление
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewResponse {
    pub import_type: ImportType,
    pub file_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<ImportRecord>,
    pub row_count: usize,
    pub mappings: Vec<FieldMapping>,
    pub target_fields: Vec<TargetFieldSpec>,
    pub missing_required: Vec<String>,
}

/// Замечание преобразователя: значение было подставлено, а не взято из файла
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformWarning {
    /// Номер строки данных, начиная с 1
    pub row: usize,
    pub field: String,
    pub message: String,
}

/// Строка, которая не была загружена
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: usize,
    pub message: String,
}

/// Результат загрузки
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportResponse {
    /// Сколько записей создано
    pub count: usize,
    pub skipped: usize,
    pub errors: Vec<RowError>,
    pub warnings: Vec<TransformWarning>,
}
