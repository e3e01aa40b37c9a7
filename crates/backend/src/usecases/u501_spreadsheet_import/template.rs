//! XLSX-шаблон для загрузки: заголовки целевых полей и примеры строк.

use contracts::enums::ImportType;
use contracts::usecases::u501_spreadsheet_import::field_spec::TOTAL_AMOUNT;
use contracts::usecases::u501_spreadsheet_import::{example_rows, target_fields};
use rust_xlsxwriter::{Color, Format, Workbook, XlsxError};

pub fn template_file_name(import_type: ImportType) -> String {
    format!("plantilla_{}.xlsx", import_type.code())
}

/// Первый лист содержит данные для заполнения, второй описывает поля
pub fn build_template(import_type: ImportType) -> Result<Vec<u8>, XlsxError> {
    let fields = target_fields(import_type);
    let header_format = Format::new().set_bold().set_background_color(Color::Silver);
    let required_format = Format::new()
        .set_bold()
        .set_background_color(Color::Silver)
        .set_font_color(Color::Red);

    let mut workbook = Workbook::new();

    let data = workbook.add_worksheet();
    data.set_name(import_type.display_name())?;
    for (col, field) in fields.iter().enumerate() {
        let format = if field.required {
            &required_format
        } else {
            &header_format
        };
        data.write_string_with_format(0, col as u16, &field.name, format)?;
        data.set_column_width(col as u16, 22)?;
    }
    for (row_idx, row) in example_rows(import_type).iter().enumerate() {
        let row_num = row_idx as u32 + 1;
        for (col, (field, value)) in fields.iter().zip(row.iter()).enumerate() {
            if value.is_empty() {
                continue;
            }
            match value.parse::<f64>() {
                Ok(n) if field.name == TOTAL_AMOUNT => data.write_number(row_num, col as u16, n)?,
                _ => data.write_string(row_num, col as u16, *value)?,
            };
        }
    }

    let help = workbook.add_worksheet();
    help.set_name("Campos")?;
    for (col, title) in ["Campo", "Obligatorio", "Descripción"].iter().enumerate() {
        help.write_string_with_format(0, col as u16, *title, &header_format)?;
    }
    for (idx, field) in fields.iter().enumerate() {
        let row = idx as u32 + 1;
        help.write_string(row, 0, &field.name)?;
        help.write_string(row, 1, if field.required { "sí" } else { "no" })?;
        help.write_string(row, 2, &field.description)?;
    }
    help.set_column_width(0, 18)?;
    help.set_column_width(2, 45)?;

    workbook.save_to_buffer()
}
