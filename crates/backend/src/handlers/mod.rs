pub mod a001_customer;
pub mod a002_lead;
pub mod a003_sale;
pub mod logs;
pub mod u501_spreadsheet_import;
