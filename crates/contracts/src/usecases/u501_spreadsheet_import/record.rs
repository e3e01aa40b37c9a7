use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Строка после преобразования: только целевые поля, значения уже нормализованы
pub type MappedRecord = BTreeMap<String, String>;

/// Разбирает `mappedData` клиента. Значения могут прийти числами или `null`
/// (например, из XLSX), они приводятся к тексту так же, как ячейки файла.
pub fn parse_mapped_records(json: &str) -> Result<Vec<MappedRecord>, serde_json::Error> {
    let raw: Vec<BTreeMap<String, serde_json::Value>> = serde_json::from_str(json)?;
    Ok(raw
        .into_iter()
        .map(|record| {
            record
                .into_iter()
                .map(|(key, value)| (key, json_to_text(value)))
                .collect()
        })
        .collect())
}

fn json_to_text(value: serde_json::Value) -> String {
    use serde_json::Value;
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Number(n) if n.is_i64() || n.is_u64() => n.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) => CellValue::Number(f).to_string(),
            None => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Значение ячейки в том виде, в каком его отдал файл
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
    Blank,
}

impl CellValue {
    /// Пустые строки и строки из пробелов считаются пустой ячейкой
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            CellValue::Blank
        } else {
            CellValue::Text(value)
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, CellValue::Blank)
    }
}

impl fmt::Display for CellValue {
    /// Целые числа выводятся без дробной части: `593`, а не `593.0`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{:.0}", n),
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s.trim()),
            CellValue::Blank => Ok(()),
        }
    }
}

/// Одна строка файла: пары заголовок → значение в порядке колонок.
/// В JSON сериализуется объектом с сохранением порядка ключей.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportRecord {
    cells: Vec<(String, CellValue)>,
}

impl ImportRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Строит запись по заголовкам первой строки; недостающие ячейки пустые,
    /// лишние ячейки (без заголовка) отбрасываются
    pub fn from_row(headers: &[String], values: Vec<CellValue>) -> Self {
        let mut values = values.into_iter();
        let cells = headers
            .iter()
            .map(|h| (h.clone(), values.next().unwrap_or(CellValue::Blank)))
            .collect();
        Self { cells }
    }

    pub fn push(&mut self, header: impl Into<String>, value: CellValue) {
        self.cells.push((header.into(), value));
    }

    pub fn get(&self, header: &str) -> Option<&CellValue> {
        self.cells.iter().find(|(h, _)| h == header).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v))
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.is_blank())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl Serialize for ImportRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (header, value) in &self.cells {
            map.serialize_entry(header, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ImportRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = ImportRecord;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of column values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut record = ImportRecord::new();
                while let Some((header, value)) = access.next_entry::<String, CellValue>()? {
                    record.push(header, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_display_drops_integer_fraction() {
        assert_eq!(CellValue::Number(593.0).to_string(), "593");
        assert_eq!(CellValue::Number(89.9).to_string(), "89.9");
        assert_eq!(CellValue::text("  ").to_string(), "");
    }

    #[test]
    fn test_from_row_pads_and_truncates() {
        let headers = vec!["A".to_string(), "B".to_string()];
        let short = ImportRecord::from_row(&headers, vec![CellValue::text("x")]);
        assert_eq!(short.get("B"), Some(&CellValue::Blank));

        let long = ImportRecord::from_row(
            &headers,
            vec![CellValue::text("x"), CellValue::text("y"), CellValue::text("z")],
        );
        assert_eq!(long.len(), 2);
    }

    #[test]
    fn test_json_keeps_column_order() {
        let mut record = ImportRecord::new();
        record.push("Zeta", CellValue::text("1"));
        record.push("Alfa", CellValue::Number(2.0));
        record.push("Beta", CellValue::Blank);
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Zeta":"1","Alfa":2.0,"Beta":null}"#);
    }

    #[test]
    fn test_mapped_records_accept_numbers_and_nulls() {
        let json = r#"[{"customerName":"Ana","totalAmount":89.9,"phoneNumber":991234567,"notes":null,"orderNumber":120.0}]"#;
        let records = parse_mapped_records(json).unwrap();
        let record = &records[0];
        assert_eq!(record["customerName"], "Ana");
        assert_eq!(record["totalAmount"], "89.9");
        assert_eq!(record["phoneNumber"], "991234567");
        assert_eq!(record["notes"], "");
        assert_eq!(record["orderNumber"], "120");
    }

    #[test]
    fn test_mapped_records_reject_non_objects() {
        assert!(parse_mapped_records(r#"["Ana"]"#).is_err());
    }
}
