pub mod alternative_names;
pub mod field_spec;
pub mod header_matcher;
pub mod mapping;
pub mod record;
pub mod response;
pub mod session;

pub use field_spec::{example_rows, target_fields, TargetFieldSpec};
pub use header_matcher::{match_header, match_headers};
pub use mapping::{invalid_targets, missing_required, FieldMapping};
pub use record::{parse_mapped_records, CellValue, ImportRecord, MappedRecord};
pub use response::{ImportResponse, PreviewResponse, RowError, TransformWarning};
pub use session::{ImportSession, ImportStage, SessionError};
