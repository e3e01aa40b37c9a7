//! Автоматическое сопоставление заголовков файла с целевыми полями.
//!
//! Для каждого заголовка по очереди пробуются:
//! 1. точное совпадение с именем поля без учёта регистра;
//! 2. точное совпадение с синонимом из словаря;
//! 3. нечёткое совпадение: из заголовка и кандидатов удаляется всё, кроме букв
//!    и цифр, затем сравнение без учёта регистра.
//!
//! Если ничего не подошло, колонка остаётся несопоставленной. Заголовки
//! обрабатываются независимо друг от друга.

use super::alternative_names::alternative_names;
use super::field_spec::TargetFieldSpec;
use super::mapping::FieldMapping;

/// Одно сопоставление на каждый заголовок, в порядке колонок файла
pub fn match_headers(headers: &[String], fields: &[TargetFieldSpec]) -> Vec<FieldMapping> {
    headers
        .iter()
        .map(|header| match match_header(header, fields) {
            Some(target) => FieldMapping::new(header.clone(), target),
            None => FieldMapping::unmapped(header.clone()),
        })
        .collect()
}

/// Имя целевого поля для заголовка или `None`
pub fn match_header(header: &str, fields: &[TargetFieldSpec]) -> Option<String> {
    let header_lower = header.trim().to_lowercase();
    if header_lower.is_empty() {
        return None;
    }

    if let Some(field) = fields.iter().find(|f| f.name.to_lowercase() == header_lower) {
        return Some(field.name.clone());
    }

    if let Some(field) = fields
        .iter()
        .find(|f| alternative_names(&f.name).iter().any(|alt| *alt == header_lower))
    {
        return Some(field.name.clone());
    }

    let header_key = fuzzy_key(header);
    if header_key.is_empty() {
        return None;
    }
    fields
        .iter()
        .find(|f| {
            fuzzy_key(&f.name) == header_key
                || alternative_names(&f.name)
                    .iter()
                    .any(|alt| fuzzy_key(alt) == header_key)
        })
        .map(|f| f.name.clone())
}

/// Ключ для нечёткого сравнения: нижний регистр, испанские буквы с
/// диакритикой сведены к ASCII, всё кроме букв и цифр удалено.
/// `"N°_Teléfono"` → `"ntelefono"`
pub fn fuzzy_key(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(fold_accent)
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

fn fold_accent(c: char) -> char {
    match c {
        'á' | 'à' | 'ä' | 'â' => 'a',
        'é' | 'è' | 'ë' | 'ê' => 'e',
        'í' | 'ì' | 'ï' | 'î' => 'i',
        'ó' | 'ò' | 'ö' | 'ô' => 'o',
        'ú' | 'ù' | 'ü' | 'û' => 'u',
        'ñ' => 'n',
        'ç' => 'c',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::ImportType;
    use crate::usecases::u501_spreadsheet_import::field_spec::*;

    fn customers() -> Vec<TargetFieldSpec> {
        target_fields(ImportType::Customers)
    }

    fn target_of(header: &str) -> Option<String> {
        match_header(header, &customers())
    }

    #[test]
    fn test_exact_name_any_case() {
        assert_eq!(target_of("firstName").as_deref(), Some(FIRST_NAME));
        assert_eq!(target_of("FIRSTNAME").as_deref(), Some(FIRST_NAME));
        assert_eq!(target_of("  email ").as_deref(), Some(EMAIL));
    }

    #[test]
    fn test_synonym_match() {
        assert_eq!(target_of("Nombres").as_deref(), Some(FIRST_NAME));
        assert_eq!(target_of("APELLIDOS").as_deref(), Some(LAST_NAME));
        assert_eq!(target_of("Correo Electrónico").as_deref(), Some(EMAIL));
        assert_eq!(target_of("Num Telefono").as_deref(), Some(PHONE_NUMBER));
    }

    #[test]
    fn test_fuzzy_match_strips_punctuation() {
        assert_eq!(target_of("N°_Telefono").as_deref(), Some(PHONE_NUMBER));
        assert_eq!(target_of("phone_country").as_deref(), Some(PHONE_COUNTRY));
        assert_eq!(target_of("Correo-Electronico").as_deref(), Some(EMAIL));
        assert_eq!(target_of("TELÉFONO:").as_deref(), Some(PHONE_NUMBER));
    }

    #[test]
    fn test_exact_wins_over_fuzzy() {
        // "name" matches the target exactly even though "Nombre" synonyms exist
        assert_eq!(target_of("Name").as_deref(), Some(NAME));
    }

    #[test]
    fn test_unknown_header_is_unmapped() {
        let headers = vec!["Color favorito".to_string(), "".to_string(), "___".to_string()];
        let mappings = match_headers(&headers, &customers());
        assert!(mappings.iter().all(|m| !m.is_mapped()));
        assert_eq!(mappings.len(), 3);
    }

    #[test]
    fn test_rerun_gives_same_mapping() {
        let headers: Vec<String> = ["Nombres", "Apellidos", "Email", "Ciudad", "Marca", "Extra"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let first = match_headers(&headers, &customers());
        let second = match_headers(&headers, &customers());
        assert_eq!(first, second);
        assert_eq!(first[4], FieldMapping::new("Marca", BRAND));
        assert!(!first[5].is_mapped());
    }

    #[test]
    fn test_same_header_depends_on_import_type() {
        let sales = target_fields(ImportType::Sales);
        assert_eq!(match_header("Cliente", &sales).as_deref(), Some(CUSTOMER_NAME));
        assert_eq!(target_of("Cliente").as_deref(), Some(NAME));
    }

    #[test]
    fn test_fuzzy_key() {
        assert_eq!(fuzzy_key("N°_Teléfono"), "ntelefono");
        assert_eq!(fuzzy_key("Num Telefono"), "numtelefono");
        assert_eq!(fuzzy_key("Año"), "ano");
    }
}
