use std::sync::Arc;

use contracts::enums::{Brand, ImportType};
use contracts::usecases::u501_spreadsheet_import::field_spec::BRAND;
use contracts::usecases::u501_spreadsheet_import::{
    FieldMapping, ImportResponse, ImportSession, MappedRecord, PreviewResponse, RowError,
};

use super::error::ImportError;
use super::file_parser::parse_file;
use super::record_sink::RecordSink;
use super::typed_row::ImportRow;
use super::value_transformer::ValueTransformer;
use crate::shared::events::{EventBus, ImportEvent};

/// Загрузка с подтверждённым сопоставлением
#[derive(Debug, Clone)]
pub struct CommitRequest {
    pub import_type: ImportType,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub mappings: Vec<FieldMapping>,
    /// Уже преобразованные строки от клиента; если есть, файл не разбирается повторно
    pub mapped_data: Option<Vec<MappedRecord>>,
}

/// Executor для загрузки клиентов, лидов и продаж из CSV/XLSX
#[derive(Clone)]
pub struct ImportExecutor {
    sink: Arc<dyn RecordSink>,
    events: EventBus,
    default_brand: Option<Brand>,
}

impl ImportExecutor {
    /// Пустой или неизвестный `default_brand` отключает подстановку бренда
    pub fn new(sink: Arc<dyn RecordSink>, events: EventBus, default_brand: &str) -> Self {
        let code = default_brand.trim().to_lowercase();
        let default_brand = Brand::from_code(&code);
        if default_brand.is_none() && !code.is_empty() {
            tracing::warn!("Unknown default brand '{}' in config, fallback disabled", code);
        }
        Self {
            sink,
            events,
            default_brand,
        }
    }

    /// Разбор файла и автосопоставление заголовков
    pub fn preview(
        &self,
        import_type: ImportType,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<PreviewResponse, ImportError> {
        let parsed = parse_file(file_name, bytes)?;

        let mut session = ImportSession::new(import_type);
        session.preview(parsed.headers.clone())?;

        self.events.publish(ImportEvent::Previewed {
            import_type,
            file_name: file_name.to_string(),
            rows: parsed.rows.len(),
        });

        Ok(PreviewResponse {
            import_type,
            file_name: file_name.to_string(),
            headers: parsed.headers,
            row_count: parsed.rows.len(),
            rows: parsed.rows,
            missing_required: session.missing_required(),
            target_fields: session.target_fields(),
            mappings: session.mappings,
        })
    }

    /// Проверка сопоставления, преобразование и создание записей по одной
    pub async fn commit(&self, request: CommitRequest) -> Result<ImportResponse, ImportError> {
        let import_type = request.import_type;
        match self.run(request).await {
            Ok(response) => Ok(response),
            Err(e) => {
                self.events.publish(ImportEvent::Rejected {
                    import_type,
                    reason: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run(&self, request: CommitRequest) -> Result<ImportResponse, ImportError> {
        let import_type = request.import_type;
        let mut session = ImportSession::new(import_type);
        let mut response = ImportResponse::default();

        let records = match request.mapped_data {
            Some(mapped) => {
                let headers = request.mappings.iter().map(|m| m.source_field.clone()).collect();
                session.preview(headers)?;
                session.apply_mappings(&request.mappings)?;
                session.confirm()?;
                mapped
            }
            None => {
                let parsed = parse_file(&request.file_name, &request.bytes)?;
                session.preview(parsed.headers)?;
                session.apply_mappings(&request.mappings)?;
                session.confirm()?;

                let transformer = ValueTransformer::new(import_type, &session.mappings, self.default_brand);
                let output = transformer.transform_all(&parsed.rows);
                response.warnings = output.warnings;
                output.records
            }
        };

        if let Some(brand) = self.default_brand {
            for warning in response.warnings.iter().filter(|w| w.field == BRAND) {
                self.events.publish(ImportEvent::BrandDefaulted {
                    import_type,
                    row: warning.row,
                    brand: brand.code().to_string(),
                });
            }
        }

        tracing::info!(
            "Importing {} {} rows from '{}'",
            records.len(),
            import_type,
            request.file_name
        );

        // Строки создаются последовательно, ошибка одной строки не останавливает пакет
        for (idx, record) in records.iter().enumerate() {
            let row = idx + 1;
            let result = match ImportRow::from_record(import_type, record) {
                Ok(typed) => self.sink.create(typed).await.map_err(|e| e.to_string()),
                Err(e) => Err(e),
            };
            match result {
                Ok(_) => response.count += 1,
                Err(message) => {
                    tracing::error!("Failed to import {} row {}: {}", import_type, row, message);
                    self.events.publish(ImportEvent::RowFailed {
                        import_type,
                        row,
                        message: message.clone(),
                    });
                    response.errors.push(RowError { row, message });
                    response.skipped += 1;
                }
            }
        }

        session.mark_imported(response.count)?;

        tracing::info!(
            "Import of {} finished: {} created, {} skipped",
            import_type,
            response.count,
            response.skipped
        );
        self.events.publish(ImportEvent::Completed {
            import_type,
            created: response.count,
            skipped: response.skipped,
        });

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use contracts::usecases::u501_spreadsheet_import::field_spec::*;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    struct MemorySink {
        rows: Mutex<Vec<ImportRow>>,
        /// Строки с таким email отклоняются, как будто БД вернула ошибку
        reject_email: Option<String>,
    }

    #[async_trait]
    impl RecordSink for MemorySink {
        async fn create(&self, row: ImportRow) -> anyhow::Result<Uuid> {
            if let (Some(reject), ImportRow::Customer(dto)) = (&self.reject_email, &row) {
                if dto.email.as_ref() == Some(reject) {
                    anyhow::bail!("Validation failed: duplicate email");
                }
            }
            self.rows.lock().unwrap().push(row);
            Ok(Uuid::new_v4())
        }
    }

    fn executor(sink: Arc<MemorySink>) -> (ImportExecutor, EventBus) {
        let bus = EventBus::new();
        (ImportExecutor::new(sink, bus.clone(), "sleepwear"), bus)
    }

    fn commit_request(import_type: ImportType, csv: &str, mappings: Vec<FieldMapping>) -> CommitRequest {
        CommitRequest {
            import_type,
            file_name: "data.csv".into(),
            bytes: csv.as_bytes().to_vec(),
            mappings,
            mapped_data: None,
        }
    }

    const CUSTOMERS_CSV: &str = "Nombres,Apellidos,Email\n\
        Ana,Pérez,ana@example.com\n\
        Luis,Mora,luis@example.com\n\
        María José,Vera,mj@example.com\n";

    #[tokio::test]
    async fn test_three_customers_from_csv() {
        let sink = Arc::new(MemorySink::default());
        let (executor, _) = executor(sink.clone());

        let preview = executor
            .preview(ImportType::Customers, "clientes.csv", CUSTOMERS_CSV.as_bytes())
            .unwrap();
        assert_eq!(preview.row_count, 3);
        assert!(preview.missing_required.is_empty());

        let response = executor
            .commit(commit_request(ImportType::Customers, CUSTOMERS_CSV, preview.mappings))
            .await
            .unwrap();
        assert_eq!(response.count, 3);
        assert_eq!(response.skipped, 0);

        let rows = sink.rows.lock().unwrap();
        let names: Vec<String> = rows
            .iter()
            .map(|r| match r {
                ImportRow::Customer(dto) => dto.name.clone().unwrap_or_default(),
                other => panic!("unexpected row {:?}", other),
            })
            .collect();
        assert_eq!(names, vec!["Ana Pérez", "Luis Mora", "María José Vera"]);
    }

    #[tokio::test]
    async fn test_missing_required_rejects_whole_batch() {
        let sink = Arc::new(MemorySink::default());
        let (executor, bus) = executor(sink.clone());
        let mut events = bus.subscribe();

        let csv = "Correo,Ciudad\nana@example.com,Quito\n";
        let mappings = vec![FieldMapping::new("Correo", EMAIL), FieldMapping::new("Ciudad", CITY)];
        let err = executor
            .commit(commit_request(ImportType::Customers, csv, mappings))
            .await
            .unwrap_err();

        match err {
            ImportError::MissingRequired(fields) => {
                assert_eq!(fields, vec![FIRST_NAME.to_string(), LAST_NAME.to_string()])
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(sink.rows.lock().unwrap().is_empty());
        assert!(matches!(events.recv().await.unwrap(), ImportEvent::Rejected { .. }));
    }

    #[tokio::test]
    async fn test_failed_row_is_skipped_and_reported() {
        let sink = Arc::new(MemorySink {
            reject_email: Some("luis@example.com".into()),
            ..Default::default()
        });
        let (executor, _) = executor(sink.clone());
        let mappings = vec![
            FieldMapping::new("Nombres", FIRST_NAME),
            FieldMapping::new("Apellidos", LAST_NAME),
            FieldMapping::new("Email", EMAIL),
        ];

        let response = executor
            .commit(commit_request(ImportType::Customers, CUSTOMERS_CSV, mappings))
            .await
            .unwrap();
        assert_eq!(response.count, 2);
        assert_eq!(response.skipped, 1);
        assert_eq!(response.errors[0].row, 2);
        assert!(response.errors[0].message.contains("duplicate email"));
    }

    #[tokio::test]
    async fn test_sales_with_untyped_row() {
        let sink = Arc::new(MemorySink::default());
        let (executor, _) = executor(sink.clone());
        let csv = "Cliente;Total;Marca\nAna Pérez;89,90;pijama\nLuis Mora;gratis;bride\nEva Paz;10;xyz\n";
        let mappings = vec![
            FieldMapping::new("Cliente", CUSTOMER_NAME),
            FieldMapping::new("Total", TOTAL_AMOUNT),
            FieldMapping::new("Marca", BRAND),
        ];

        let response = executor
            .commit(commit_request(ImportType::Sales, csv, mappings))
            .await
            .unwrap();
        assert_eq!(response.count, 2);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].row, 2);
        assert_eq!(response.warnings.len(), 1);
        assert_eq!(response.warnings[0].row, 3);

        let rows = sink.rows.lock().unwrap();
        match &rows[0] {
            ImportRow::Sale(dto) => {
                assert_eq!(dto.total_amount, 89.9);
                assert_eq!(dto.brands, vec![Brand::Sleepwear]);
            }
            other => panic!("unexpected row {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_mapped_data_is_used_as_is() {
        let sink = Arc::new(MemorySink::default());
        let (executor, _) = executor(sink.clone());
        let record: MappedRecord = [
            (FIRST_NAME.to_string(), "Ana".to_string()),
            (LAST_NAME.to_string(), "Mora".to_string()),
            (NAME.to_string(), "Anita".to_string()),
        ]
        .into_iter()
        .collect();

        let response = executor
            .commit(CommitRequest {
                import_type: ImportType::Leads,
                file_name: "leads.xlsx".into(),
                bytes: Vec::new(),
                mappings: vec![
                    FieldMapping::new("Nombre", FIRST_NAME),
                    FieldMapping::new("Apellido", LAST_NAME),
                ],
                mapped_data: Some(vec![record]),
            })
            .await
            .unwrap();
        assert_eq!(response.count, 1);
        let rows = sink.rows.lock().unwrap();
        match &rows[0] {
            ImportRow::Lead(dto) => assert_eq!(dto.name.as_deref(), Some("Anita")),
            other => panic!("unexpected row {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unknown_target_is_rejected() {
        let sink = Arc::new(MemorySink::default());
        let (executor, _) = executor(sink);
        let mappings = vec![
            FieldMapping::new("Nombres", FIRST_NAME),
            FieldMapping::new("Apellidos", LAST_NAME),
            FieldMapping::new("Email", "favouriteColour"),
        ];
        let err = executor
            .commit(commit_request(ImportType::Customers, CUSTOMERS_CSV, mappings))
            .await
            .unwrap_err();
        assert!(matches!(err, ImportError::InvalidMapping(_)));
    }

    #[test]
    fn test_preview_of_unparseable_file() {
        let (executor, _) = executor(Arc::new(MemorySink::default()));
        let err = executor
            .preview(ImportType::Leads, "notes.docx", b"whatever")
            .unwrap_err();
        assert!(matches!(err, ImportError::UnsupportedFormat(_)));
    }
}
