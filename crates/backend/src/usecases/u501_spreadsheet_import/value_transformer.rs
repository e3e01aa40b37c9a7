//! Нормализация значений строки по подтверждённому сопоставлению.
//!
//! Преобразование никогда не падает: если значение не удалось разобрать,
//! подставляется значение по умолчанию и добавляется предупреждение.

use contracts::enums::{Brand, ImportType};
use contracts::shared::phone::{clean_phone_number, normalize_country_code, parse_phone_number};
use contracts::usecases::u501_spreadsheet_import::field_spec::{
    BRAND, FIRST_NAME, LAST_NAME, NAME, PHONE_COUNTRY, PHONE_NUMBER,
};
use contracts::usecases::u501_spreadsheet_import::{
    FieldMapping, ImportRecord, MappedRecord, TransformWarning,
};

/// Фамилия, которая подставляется, когда в имени только одно слово
pub const LAST_NAME_PLACEHOLDER: &str = "-";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrandMatch {
    /// Бренды найдены в значении
    Recognized(Vec<Brand>),
    /// Ничего не найдено, подставлен бренд по умолчанию
    Defaulted(Brand),
    /// Ничего не найдено, бренд по умолчанию отключён
    Unrecognized,
}

/// Классификация свободного текста из колонки бренда:
/// 1. список через запятую: остаются только известные коды;
/// 2. ровно один известный код;
/// 3. поиск фрагментов названий ("pijama" → sleepwear);
/// 4. бренд по умолчанию.
pub fn classify_brand(value: &str, default_brand: Option<Brand>) -> BrandMatch {
    let lower = value.trim().to_lowercase();

    if lower.contains(',') {
        let brands = Brand::parse_list(&lower);
        if !brands.is_empty() {
            return BrandMatch::Recognized(brands);
        }
    } else if let Some(brand) = Brand::from_code(&lower) {
        return BrandMatch::Recognized(vec![brand]);
    }

    if !lower.is_empty() {
        let guessed: Vec<Brand> = Brand::all()
            .into_iter()
            .filter(|b| b.name_fragments().iter().any(|f| lower.contains(f)))
            .collect();
        if !guessed.is_empty() {
            return BrandMatch::Recognized(guessed);
        }
    }

    match default_brand {
        Some(brand) => BrandMatch::Defaulted(brand),
        None => BrandMatch::Unrecognized,
    }
}

pub struct ValueTransformer<'a> {
    import_type: ImportType,
    mappings: &'a [FieldMapping],
    default_brand: Option<Brand>,
}

#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    pub records: Vec<MappedRecord>,
    pub warnings: Vec<TransformWarning>,
}

impl<'a> ValueTransformer<'a> {
    pub fn new(import_type: ImportType, mappings: &'a [FieldMapping], default_brand: Option<Brand>) -> Self {
        Self {
            import_type,
            mappings,
            default_brand,
        }
    }

    pub fn transform_all(&self, records: &[ImportRecord]) -> TransformOutput {
        let mut output = TransformOutput::default();
        for (idx, record) in records.iter().enumerate() {
            let mapped = self.transform(idx + 1, record, &mut output.warnings);
            output.records.push(mapped);
        }
        output
    }

    /// `row` используется только в тексте предупреждений (нумерация с 1)
    pub fn transform(
        &self,
        row: usize,
        record: &ImportRecord,
        warnings: &mut Vec<TransformWarning>,
    ) -> MappedRecord {
        let mut out = MappedRecord::new();

        // Если на одно поле указывают несколько колонок, берётся первое непустое значение
        for mapping in self.mappings.iter().filter(|m| m.is_mapped()) {
            let value = record
                .get(&mapping.source_field)
                .map(|v| v.to_string())
                .unwrap_or_default();
            if value.is_empty() || out.contains_key(&mapping.target_field) {
                continue;
            }
            out.insert(mapping.target_field.clone(), value);
        }

        if let Some(country) = out.get(PHONE_COUNTRY).cloned() {
            out.insert(PHONE_COUNTRY.to_string(), normalize_country_code(&country));
        }
        self.normalize_phone_number(&mut out);

        if self.brand_is_mapped() {
            self.normalize_brand(row, &mut out, warnings);
        }

        if self.import_type.reconciles_names() {
            reconcile_names(row, &mut out, warnings);
        }

        out
    }

    fn brand_is_mapped(&self) -> bool {
        self.mappings.iter().any(|m| m.target_field == BRAND)
    }

    fn normalize_phone_number(&self, out: &mut MappedRecord) {
        let Some(number) = out.get(PHONE_NUMBER).map(|n| clean_phone_number(n)) else {
            return;
        };
        if number.is_empty() {
            out.remove(PHONE_NUMBER);
            return;
        }
        if number.starts_with('+') && !out.contains_key(PHONE_COUNTRY) {
            let parts = parse_phone_number(&number);
            if !parts.phone_country.is_empty() {
                out.insert(PHONE_COUNTRY.to_string(), parts.phone_country);
            }
            out.insert(PHONE_NUMBER.to_string(), parts.phone_number);
        } else {
            out.insert(PHONE_NUMBER.to_string(), number);
        }
    }

    fn normalize_brand(&self, row: usize, out: &mut MappedRecord, warnings: &mut Vec<TransformWarning>) {
        let raw = out.get(BRAND).cloned().unwrap_or_default();
        match classify_brand(&raw, self.default_brand) {
            BrandMatch::Recognized(brands) => {
                out.insert(BRAND.to_string(), Brand::join(&brands));
            }
            BrandMatch::Defaulted(brand) => {
                let message = if raw.is_empty() {
                    format!("brand is empty, using default '{}'", brand)
                } else {
                    format!("brand '{}' not recognized, using default '{}'", raw, brand)
                };
                tracing::warn!("{} row {}: {}", self.import_type, row, message);
                warnings.push(TransformWarning {
                    row,
                    field: BRAND.to_string(),
                    message,
                });
                out.insert(BRAND.to_string(), brand.code().to_string());
            }
            BrandMatch::Unrecognized => {
                if !raw.is_empty() {
                    warnings.push(TransformWarning {
                        row,
                        field: BRAND.to_string(),
                        message: format!("brand '{}' not recognized, left empty", raw),
                    });
                }
                out.remove(BRAND);
            }
        }
    }
}

/// Имя и фамилия → отображаемое имя; только отображаемое имя → имя и фамилия
fn reconcile_names(row: usize, out: &mut MappedRecord, warnings: &mut Vec<TransformWarning>) {
    let first = out.get(FIRST_NAME).cloned();
    let last = out.get(LAST_NAME).cloned();

    match (first, last, out.get(NAME).cloned()) {
        (Some(first), Some(last), None) => {
            out.insert(NAME.to_string(), format!("{} {}", first, last));
        }
        (first, last, Some(name)) if first.is_none() || last.is_none() => {
            let mut parts = name.trim().splitn(2, char::is_whitespace);
            let name_first = parts.next().unwrap_or_default().to_string();
            let name_last = parts.next().map(|s| s.trim().to_string()).unwrap_or_default();

            if first.is_none() {
                out.insert(FIRST_NAME.to_string(), name_first);
            }
            if last.is_none() {
                if name_last.is_empty() {
                    warnings.push(TransformWarning {
                        row,
                        field: LAST_NAME.to_string(),
                        message: format!("'{}' has no last name, using placeholder", name),
                    });
                    out.insert(LAST_NAME.to_string(), LAST_NAME_PLACEHOLDER.to_string());
                } else {
                    out.insert(LAST_NAME.to_string(), name_last);
                }
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::usecases::u501_spreadsheet_import::field_spec::{CUSTOMER_NAME, EMAIL, TOTAL_AMOUNT};
    use contracts::usecases::u501_spreadsheet_import::CellValue;

    fn record(cells: &[(&str, CellValue)]) -> ImportRecord {
        let mut r = ImportRecord::new();
        for (h, v) in cells {
            r.push(*h, v.clone());
        }
        r
    }

    fn text(s: &str) -> CellValue {
        CellValue::text(s)
    }

    fn run(import_type: ImportType, mappings: &[FieldMapping], rec: &ImportRecord) -> (MappedRecord, Vec<TransformWarning>) {
        let transformer = ValueTransformer::new(import_type, mappings, Some(Brand::Sleepwear));
        let mut warnings = Vec::new();
        let out = transformer.transform(1, rec, &mut warnings);
        (out, warnings)
    }

    #[test]
    fn test_brand_classification() {
        let default = Some(Brand::Sleepwear);
        assert_eq!(
            classify_brand("Sleepwear, BRIDE", default),
            BrandMatch::Recognized(vec![Brand::Sleepwear, Brand::Bride])
        );
        assert_eq!(classify_brand("bride", default), BrandMatch::Recognized(vec![Brand::Bride]));
        assert_eq!(classify_brand("pijama", default), BrandMatch::Recognized(vec![Brand::Sleepwear]));
        assert_eq!(classify_brand("Vestido de Novia", default), BrandMatch::Recognized(vec![Brand::Bride]));
        assert_eq!(classify_brand("xyz", default), BrandMatch::Defaulted(Brand::Sleepwear));
        assert_eq!(classify_brand("xyz", None), BrandMatch::Unrecognized);
    }

    #[test]
    fn test_brand_output_and_default_warning() {
        let mappings = vec![
            FieldMapping::new("Nombre", FIRST_NAME),
            FieldMapping::new("Apellido", LAST_NAME),
            FieldMapping::new("Marca", BRAND),
        ];
        let (out, warnings) = run(
            ImportType::Customers,
            &mappings,
            &record(&[("Nombre", text("Ana")), ("Apellido", text("Mora")), ("Marca", text("Sleepwear, BRIDE"))]),
        );
        assert_eq!(out.get(BRAND).map(String::as_str), Some("sleepwear,bride"));
        assert!(warnings.is_empty());

        let (out, warnings) = run(
            ImportType::Customers,
            &mappings,
            &record(&[("Nombre", text("Ana")), ("Apellido", text("Mora")), ("Marca", text("xyz"))]),
        );
        assert_eq!(out.get(BRAND).map(String::as_str), Some("sleepwear"));
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, BRAND);
    }

    #[test]
    fn test_unmapped_brand_is_not_defaulted() {
        let mappings = vec![FieldMapping::new("Nombre", FIRST_NAME), FieldMapping::new("Apellido", LAST_NAME)];
        let (out, warnings) = run(
            ImportType::Customers,
            &mappings,
            &record(&[("Nombre", text("Ana")), ("Apellido", text("Mora"))]),
        );
        assert!(!out.contains_key(BRAND));
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_name_synthesized_from_parts() {
        let mappings = vec![FieldMapping::new("Nombres", FIRST_NAME), FieldMapping::new("Apellidos", LAST_NAME)];
        let (out, _) = run(
            ImportType::Leads,
            &mappings,
            &record(&[("Nombres", text("Ana María")), ("Apellidos", text("Pérez"))]),
        );
        assert_eq!(out.get(NAME).map(String::as_str), Some("Ana María Pérez"));
    }

    #[test]
    fn test_name_split_with_placeholder() {
        let mappings = vec![FieldMapping::new("Cliente", NAME)];
        let (out, _) = run(
            ImportType::Customers,
            &mappings,
            &record(&[("Cliente", text("Ana María Pérez"))]),
        );
        assert_eq!(out.get(FIRST_NAME).map(String::as_str), Some("Ana"));
        assert_eq!(out.get(LAST_NAME).map(String::as_str), Some("María Pérez"));

        let (out, warnings) = run(ImportType::Customers, &mappings, &record(&[("Cliente", text("Madonna"))]));
        assert_eq!(out.get(FIRST_NAME).map(String::as_str), Some("Madonna"));
        assert_eq!(out.get(LAST_NAME).map(String::as_str), Some(LAST_NAME_PLACEHOLDER));
        assert_eq!(warnings[0].field, LAST_NAME);
    }

    #[test]
    fn test_sales_do_not_reconcile_names() {
        let mappings = vec![
            FieldMapping::new("Cliente", CUSTOMER_NAME),
            FieldMapping::new("Total", TOTAL_AMOUNT),
        ];
        let (out, _) = run(
            ImportType::Sales,
            &mappings,
            &record(&[("Cliente", text("Ana Pérez")), ("Total", CellValue::Number(89.0))]),
        );
        assert_eq!(out.get(TOTAL_AMOUNT).map(String::as_str), Some("89"));
        assert!(!out.contains_key(FIRST_NAME));
    }

    #[test]
    fn test_phone_normalization() {
        let mappings = vec![
            FieldMapping::new("Pais", PHONE_COUNTRY),
            FieldMapping::new("Telefono", PHONE_NUMBER),
        ];
        let (out, _) = run(
            ImportType::Leads,
            &mappings,
            &record(&[("Pais", CellValue::Number(593.0)), ("Telefono", text("099 123-4567"))]),
        );
        assert_eq!(out.get(PHONE_COUNTRY).map(String::as_str), Some("+593"));
        assert_eq!(out.get(PHONE_NUMBER).map(String::as_str), Some("0991234567"));

        let (out, _) = run(
            ImportType::Leads,
            &mappings,
            &record(&[("Pais", CellValue::Blank), ("Telefono", text("+593 99 123 4567"))]),
        );
        assert_eq!(out.get(PHONE_COUNTRY).map(String::as_str), Some("+593"));
        assert_eq!(out.get(PHONE_NUMBER).map(String::as_str), Some("991234567"));
    }

    #[test]
    fn test_first_non_blank_value_wins_for_duplicate_targets() {
        let mappings = vec![
            FieldMapping::new("Email trabajo", EMAIL),
            FieldMapping::new("Email personal", EMAIL),
        ];
        let (out, _) = run(
            ImportType::Leads,
            &mappings,
            &record(&[("Email trabajo", CellValue::Blank), ("Email personal", text("ana@example.com"))]),
        );
        assert_eq!(out.get(EMAIL).map(String::as_str), Some("ana@example.com"));
    }

    #[test]
    fn test_unmapped_columns_are_dropped() {
        let mappings = vec![FieldMapping::new("Email", EMAIL), FieldMapping::unmapped("Color")];
        let (out, _) = run(
            ImportType::Leads,
            &mappings,
            &record(&[("Email", text("a@b.co")), ("Color", text("rojo"))]),
        );
        assert_eq!(out.len(), 1);
    }
}
