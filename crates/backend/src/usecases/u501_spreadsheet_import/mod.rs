//! Загрузка клиентов, лидов и продаж из CSV/XLSX.
//!
//! `file_parser → header matcher (contracts) → value_transformer → typed_row → record_sink`

pub mod error;
pub mod executor;
pub mod file_parser;
pub mod record_sink;
pub mod template;
pub mod typed_row;
pub mod value_transformer;

pub use error::ImportError;
pub use executor::{CommitRequest, ImportExecutor};
pub use record_sink::{DbSink, RecordSink};
pub use typed_row::ImportRow;
