pub mod u501_spreadsheet_import;
