//! Преобразованная строка → DTO конкретного агрегата.

use chrono::{NaiveDate, NaiveDateTime};
use contracts::domain::a001_customer::aggregate::CustomerDto;
use contracts::domain::a002_lead::aggregate::{LeadDto, LeadStatus};
use contracts::domain::a003_sale::aggregate::SaleDto;
use contracts::enums::{Brand, ImportType};
use contracts::shared::phone::join_phone_number;
use contracts::usecases::u501_spreadsheet_import::field_spec::*;
use contracts::usecases::u501_spreadsheet_import::MappedRecord;

use super::file_parser::excel_serial_to_date;

#[derive(Debug, Clone)]
pub enum ImportRow {
    Customer(CustomerDto),
    Lead(LeadDto),
    Sale(SaleDto),
}

impl ImportRow {
    /// Ошибка означает, что строку нельзя загрузить (например, сумма не число)
    pub fn from_record(import_type: ImportType, record: &MappedRecord) -> Result<Self, String> {
        let fields = Fields(record);
        match import_type {
            ImportType::Customers => Ok(ImportRow::Customer(CustomerDto {
                id: None,
                code: None,
                first_name: fields.text(FIRST_NAME),
                last_name: fields.text(LAST_NAME),
                name: fields.opt(NAME),
                email: fields.opt(EMAIL),
                phone_country: fields.opt(PHONE_COUNTRY),
                phone_number: fields.opt(PHONE_NUMBER),
                identification: fields.opt(IDENTIFICATION),
                address: fields.opt(ADDRESS),
                city: fields.opt(CITY),
                province: fields.opt(PROVINCE),
                brands: fields.brands(),
                notes: fields.opt(NOTES),
            })),
            ImportType::Leads => {
                let status = match fields.opt(STATUS) {
                    Some(raw) => Some(
                        LeadStatus::from_code(&raw).ok_or_else(|| format!("unknown lead status '{}'", raw))?,
                    ),
                    None => None,
                };
                Ok(ImportRow::Lead(LeadDto {
                    id: None,
                    code: None,
                    first_name: fields.text(FIRST_NAME),
                    last_name: fields.text(LAST_NAME),
                    name: fields.opt(NAME),
                    email: fields.opt(EMAIL),
                    phone_country: fields.opt(PHONE_COUNTRY),
                    phone_number: fields.opt(PHONE_NUMBER),
                    source: fields.opt(SOURCE),
                    status,
                    brands: fields.brands(),
                    notes: fields.opt(NOTES),
                }))
            }
            ImportType::Sales => {
                let amount = fields
                    .opt(TOTAL_AMOUNT)
                    .ok_or_else(|| format!("{} is empty", TOTAL_AMOUNT))?;
                let total_amount =
                    parse_amount(&amount).ok_or_else(|| format!("'{}' is not a valid amount", amount))?;
                let sale_date = match fields.opt(SALE_DATE) {
                    Some(raw) => Some(parse_date(&raw).ok_or_else(|| format!("'{}' is not a valid date", raw))?),
                    None => None,
                };
                let phone = join_phone_number(
                    &fields.text(PHONE_COUNTRY),
                    &fields.text(PHONE_NUMBER),
                );
                Ok(ImportRow::Sale(SaleDto {
                    id: None,
                    order_number: fields.opt(ORDER_NUMBER),
                    customer_name: fields.text(CUSTOMER_NAME),
                    total_amount,
                    sale_date,
                    email: fields.opt(EMAIL),
                    customer_phone: Some(phone).filter(|p| !p.is_empty()),
                    payment_method: fields.opt(PAYMENT_METHOD),
                    brands: fields.brands(),
                    notes: fields.opt(NOTES),
                }))
            }
        }
    }
}

struct Fields<'a>(&'a MappedRecord);

impl Fields<'_> {
    fn opt(&self, key: &str) -> Option<String> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    }

    fn text(&self, key: &str) -> String {
        self.opt(key).unwrap_or_default()
    }

    fn brands(&self) -> Vec<Brand> {
        Brand::parse_list(&self.text(BRAND).to_lowercase())
    }
}

/// Сумма в любом из распространённых форматов: `89.90`, `89,90`, `$1.234,50`,
/// `1,234.50`, `1.500`. Одиночный разделитель перед ровно тремя цифрами или
/// повторяющийся разделитель считается разделителем тысяч.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = match (cleaned.rfind('.'), cleaned.rfind(',')) {
        (Some(dot), Some(comma)) => {
            let (decimal, grouping) = if comma > dot { (',', '.') } else { ('.', ',') };
            if cleaned.matches(decimal).count() > 1 {
                return None;
            }
            cleaned.replace(grouping, "").replace(decimal, ".")
        }
        (Some(_), None) => single_separator(&cleaned, '.')?,
        (None, Some(_)) => single_separator(&cleaned, ',')?,
        (None, None) => cleaned,
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Решает, десятичный это разделитель или разделитель тысяч
fn single_separator(value: &str, separator: char) -> Option<String> {
    let mut groups = value.split(separator);
    let integer = groups.next().unwrap_or_default();
    let rest: Vec<&str> = groups.collect();

    if rest.len() > 1 {
        return rest
            .iter()
            .all(|g| g.len() == 3)
            .then(|| value.replace(separator, ""));
    }
    let fraction = rest.first().copied().unwrap_or_default();
    let leading_zero = integer.trim_start_matches('-').trim_start_matches('0').is_empty();
    match fraction.len() {
        3 if !leading_zero => Some(value.replace(separator, "")),
        1..=3 => Some(value.replace(separator, ".")),
        _ => None,
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    for format in ["%Y-%m-%d", "%d/%m/%Y", "%d-%m-%Y", "%Y/%m/%d", "%d.%m.%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%d/%m/%Y %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    raw.parse::<f64>().ok().and_then(excel_serial_to_date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(pairs: &[(&str, &str)]) -> MappedRecord {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_customer_row() {
        let row = ImportRow::from_record(
            ImportType::Customers,
            &rec(&[(FIRST_NAME, "Ana"), (LAST_NAME, "Mora"), (BRAND, "sleepwear,bride"), (CITY, " ")]),
        )
        .unwrap();
        let ImportRow::Customer(dto) = row else {
            panic!("expected customer");
        };
        assert_eq!(dto.first_name, "Ana");
        assert_eq!(dto.brands, vec![Brand::Sleepwear, Brand::Bride]);
        assert_eq!(dto.city, None);
    }

    #[test]
    fn test_lead_status() {
        let row = ImportRow::from_record(
            ImportType::Leads,
            &rec(&[(FIRST_NAME, "Ana"), (LAST_NAME, "Mora"), (STATUS, "Contactado")]),
        )
        .unwrap();
        let ImportRow::Lead(dto) = row else {
            panic!("expected lead");
        };
        assert_eq!(dto.status, Some(LeadStatus::Contacted));

        let err = ImportRow::from_record(ImportType::Leads, &rec(&[(STATUS, "tal vez")])).unwrap_err();
        assert!(err.contains("tal vez"));
    }

    #[test]
    fn test_sale_row() {
        let row = ImportRow::from_record(
            ImportType::Sales,
            &rec(&[
                (CUSTOMER_NAME, "Ana Pérez"),
                (TOTAL_AMOUNT, "$1.234,50"),
                (SALE_DATE, "15/03/2024"),
                (PHONE_COUNTRY, "+593"),
                (PHONE_NUMBER, "0991234567"),
            ]),
        )
        .unwrap();
        let ImportRow::Sale(dto) = row else {
            panic!("expected sale");
        };
        assert_eq!(dto.total_amount, 1234.5);
        assert_eq!(dto.sale_date, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(dto.customer_phone.as_deref(), Some("+5930991234567"));
    }

    #[test]
    fn test_sale_with_bad_amount_is_rejected() {
        let err = ImportRow::from_record(
            ImportType::Sales,
            &rec(&[(CUSTOMER_NAME, "Ana"), (TOTAL_AMOUNT, "gratis")]),
        )
        .unwrap_err();
        assert!(err.contains("gratis"));
        assert!(ImportRow::from_record(ImportType::Sales, &rec(&[(CUSTOMER_NAME, "Ana")])).is_err());
    }

    #[test]
    fn test_parse_amount_formats() {
        assert_eq!(parse_amount("89.90"), Some(89.9));
        assert_eq!(parse_amount("89,90"), Some(89.9));
        assert_eq!(parse_amount("1,234.50"), Some(1234.5));
        assert_eq!(parse_amount("USD 45"), Some(45.0));
        assert_eq!(parse_amount("abc"), None);
    }

    #[test]
    fn test_parse_amount_thousands_grouping() {
        assert_eq!(parse_amount("1,500"), Some(1500.0));
        assert_eq!(parse_amount("1.500"), Some(1500.0));
        assert_eq!(parse_amount("1.234.567"), Some(1_234_567.0));
        assert_eq!(parse_amount("1,234,567"), Some(1_234_567.0));
        assert_eq!(parse_amount("$1.234.567,25"), Some(1_234_567.25));
        assert_eq!(parse_amount("0,500"), Some(0.5));
        assert_eq!(parse_amount("12,5"), Some(12.5));
    }

    #[test]
    fn test_parse_amount_ambiguous_values_are_rejected() {
        assert_eq!(parse_amount("1.23.4"), None);
        assert_eq!(parse_amount("1,2345"), None);
        assert_eq!(parse_amount("1,5,0"), None);
        assert_eq!(parse_amount("1.234,5,6"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert_eq!(parse_date("2024-01-01"), expected);
        assert_eq!(parse_date("01/01/2024"), expected);
        assert_eq!(parse_date("2024-01-01 10:30:00"), expected);
        assert_eq!(parse_date("45292"), expected);
        assert_eq!(parse_date("ayer"), None);
    }
}
