//! Чтение CSV/XLSX в строки, ключи которых берутся из первой строки файла.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use chrono::{Duration, NaiveDate};
use contracts::usecases::u501_spreadsheet_import::{CellValue, ImportRecord};

use super::error::ImportError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Формат определяется по расширению, а без него по сигнатуре ZIP (`PK`)
    pub fn detect(file_name: &str, bytes: &[u8]) -> Result<Self, ImportError> {
        let lower = file_name.trim().to_lowercase();
        match lower.rsplit_once('.').map(|(_, ext)| ext) {
            Some("csv") | Some("txt") => Ok(FileFormat::Csv),
            Some("xlsx") | Some("xlsm") => Ok(FileFormat::Xlsx),
            Some(ext) if !ext.is_empty() => Err(ImportError::UnsupportedFormat(ext.to_string())),
            _ if bytes.starts_with(b"PK\x03\x04") => Ok(FileFormat::Xlsx),
            _ => Ok(FileFormat::Csv),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    pub headers: Vec<String>,
    pub rows: Vec<ImportRecord>,
}

pub fn parse_file(file_name: &str, bytes: &[u8]) -> Result<ParsedFile, ImportError> {
    let parsed = match FileFormat::detect(file_name, bytes)? {
        FileFormat::Csv => parse_csv(bytes)?,
        FileFormat::Xlsx => parse_xlsx(bytes)?,
    };
    tracing::info!(
        "Parsed '{}': {} columns, {} rows",
        file_name,
        parsed.headers.len(),
        parsed.rows.len()
    );
    Ok(parsed)
}

pub fn parse_csv(bytes: &[u8]) -> Result<ParsedFile, ImportError> {
    let text = decode_text(bytes);
    let text = text.trim_start_matches('\u{FEFF}');
    if text.trim().is_empty() {
        return Err(ImportError::EmptyFile);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(detect_delimiter(text))
        .from_reader(text.as_bytes());

    let mut raw_rows: Vec<Vec<CellValue>> = Vec::new();
    for result in reader.records() {
        let record = result?;
        raw_rows.push(record.iter().map(CellValue::text).collect());
    }

    build(raw_rows)
}

pub fn parse_xlsx(bytes: &[u8]) -> Result<ParsedFile, ImportError> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes.to_vec()))?;
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::Parse("workbook contains no sheets".into()))?;
    let range = workbook.worksheet_range(&sheet_name)?;

    let raw_rows = range
        .rows()
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    build(raw_rows)
}

/// Первая непустая строка становится заголовком, полностью пустые строки пропускаются
fn build(raw_rows: Vec<Vec<CellValue>>) -> Result<ParsedFile, ImportError> {
    let mut rows = raw_rows
        .into_iter()
        .filter(|cells| cells.iter().any(|c| !c.is_blank()));

    let header_cells = rows.next().ok_or(ImportError::EmptyFile)?;
    let headers = header_names(&header_cells);

    let records = rows
        .map(|cells| ImportRecord::from_row(&headers, cells))
        .filter(|record| !record.is_blank())
        .collect();

    Ok(ParsedFile {
        headers,
        rows: records,
    })
}

/// Пустые заголовки в конце строки отбрасываются, в середине получают имя
/// `Column N`; повторяющиеся заголовки нумеруются, чтобы ключи были уникальны
fn header_names(cells: &[CellValue]) -> Vec<String> {
    let last_named = cells.iter().rposition(|c| !c.is_blank()).map_or(0, |i| i + 1);
    let mut headers: Vec<String> = Vec::with_capacity(last_named);
    for (idx, cell) in cells[..last_named].iter().enumerate() {
        let base = match cell.to_string() {
            name if name.is_empty() => format!("Column {}", idx + 1),
            name => name,
        };
        let mut name = base.clone();
        let mut n = 2;
        while headers.contains(&name) {
            name = format!("{} ({})", base, n);
            n += 1;
        }
        headers.push(name);
    }
    headers
}

/// Разделитель по первой строке: `;` у испанской локали Excel, `\t` у TSV, иначе `,`
fn detect_delimiter(text: &str) -> u8 {
    let first_line = text.lines().next().unwrap_or_default();
    let count = |c: char| first_line.matches(c).count();
    let (semicolons, commas, tabs) = (count(';'), count(','), count('\t'));
    if tabs > commas && tabs > semicolons {
        b'\t'
    } else if semicolons > commas {
        b';'
    } else {
        b','
    }
}

/// UTF-8, а если не получилось, Windows-1252 (так сохраняет CSV Excel)
fn decode_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| windows_1252_char(b)).collect(),
    }
}

/// Символы Windows-1252 в диапазоне 0x80..=0x9F; остальные байты совпадают с Latin-1
const WINDOWS_1252_HIGH: [char; 32] = [
    '€', '\u{81}', '‚', 'ƒ', '„', '…', '†', '‡', 'ˆ', '‰', 'Š', '‹', 'Œ', '\u{8D}', 'Ž', '\u{8F}',
    '\u{90}', '‘', '’', '“', '”', '•', '–', '—', '˜', '™', 'š', '›', 'œ', '\u{9D}', 'ž', 'Ÿ',
];

fn windows_1252_char(byte: u8) -> char {
    match byte {
        0x80..=0x9F => WINDOWS_1252_HIGH[(byte - 0x80) as usize],
        _ => byte as char,
    }
}

fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Blank,
        Data::String(s) => CellValue::text(s.as_str()),
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::DateTime(dt) => match excel_serial_to_date(dt.as_f64()) {
            Some(date) => CellValue::Text(date.format("%Y-%m-%d").to_string()),
            None => CellValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s.as_str()),
    }
}

/// Дата из серийного номера Excel (система 1900)
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_signed(Duration::days(serial.trunc() as i64))
}
