use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use contracts::enums::ImportType;
use contracts::usecases::u501_spreadsheet_import::{
    parse_mapped_records, target_fields, FieldMapping, ImportResponse, MappedRecord, PreviewResponse,
    TargetFieldSpec,
};

use crate::shared::format::format_size;
use crate::shared::state::AppState;
use crate::usecases::u501_spreadsheet_import::template::{build_template, template_file_name};
use crate::usecases::u501_spreadsheet_import::{CommitRequest, ImportError};

/// Поля формы загрузки
#[derive(Debug, Default)]
struct UploadForm {
    file_name: Option<String>,
    bytes: Option<Vec<u8>>,
    import_type: Option<String>,
    mappings: Option<String>,
    mapped_data: Option<String>,
}

impl UploadForm {
    async fn read(multipart: &mut Multipart, max_bytes: usize, limit_mb: usize) -> Result<Self, ImportError> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ImportError::BadRequest(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    form.file_name = field.file_name().map(str::to_string);
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ImportError::BadRequest(e.to_string()))?;
                    if bytes.len() > max_bytes {
                        return Err(ImportError::FileTooLarge { limit_mb });
                    }
                    form.bytes = Some(bytes.to_vec());
                }
                "type" | "mappings" | "mappedData" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ImportError::BadRequest(e.to_string()))?;
                    match name.as_str() {
                        "type" => form.import_type = Some(text),
                        "mappings" => form.mappings = Some(text),
                        _ => form.mapped_data = Some(text),
                    }
                }
                other => tracing::debug!("Ignoring multipart field '{}'", other),
            }
        }
        Ok(form)
    }

    fn import_type(&self) -> Result<ImportType, ImportError> {
        let raw = self
            .import_type
            .as_deref()
            .ok_or_else(|| ImportError::BadRequest("field 'type' is required".into()))?;
        parse_import_type(raw)
    }

    fn file(&mut self) -> Result<(String, Vec<u8>), ImportError> {
        let bytes = self
            .bytes
            .take()
            .ok_or_else(|| ImportError::BadRequest("field 'file' is required".into()))?;
        let name = self.file_name.take().unwrap_or_else(|| "upload".to_string());
        Ok((name, bytes))
    }
}

fn parse_import_type(raw: &str) -> Result<ImportType, ImportError> {
    ImportType::from_code(raw).ok_or_else(|| ImportError::UnknownImportType(raw.to_string()))
}

fn limits(state: &AppState) -> (usize, usize) {
    let import = &state.config.import;
    (import.max_upload_bytes(), import.max_upload_mb)
}

/// POST /api/import/preview
pub async fn preview(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<PreviewResponse>, ImportError> {
    let (max_bytes, limit_mb) = limits(&state);
    let mut form = UploadForm::read(&mut multipart, max_bytes, limit_mb).await?;
    let import_type = form.import_type()?;
    let (file_name, bytes) = form.file()?;

    tracing::info!(
        "Preview of '{}' ({}) as {}",
        file_name,
        format_size(bytes.len()),
        import_type
    );
    let response = state.importer.preview(import_type, &file_name, &bytes)?;
    Ok(Json(response))
}

/// POST /api/import/commit
pub async fn commit(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ImportError> {
    let (max_bytes, limit_mb) = limits(&state);
    let mut form = UploadForm::read(&mut multipart, max_bytes, limit_mb).await?;
    let import_type = form.import_type()?;

    let mappings: Vec<FieldMapping> = match form.mappings.as_deref() {
        Some(raw) => serde_json::from_str(raw)
            .map_err(|e| ImportError::BadRequest(format!("invalid 'mappings': {}", e)))?,
        None => return Err(ImportError::BadRequest("field 'mappings' is required".into())),
    };
    let mapped_data: Option<Vec<MappedRecord>> = match form.mapped_data.as_deref() {
        Some(raw) if !raw.trim().is_empty() => Some(
            parse_mapped_records(raw)
                .map_err(|e| ImportError::BadRequest(format!("invalid 'mappedData': {}", e)))?,
        ),
        _ => None,
    };

    // Файл обязателен, только если клиент не прислал готовые строки
    let (file_name, bytes) = match (form.file(), &mapped_data) {
        (Ok(file), _) => file,
        (Err(_), Some(_)) => ("mappedData".to_string(), Vec::new()),
        (Err(e), None) => return Err(e),
    };

    let response = state
        .importer
        .commit(CommitRequest {
            import_type,
            file_name,
            bytes,
            mappings,
            mapped_data,
        })
        .await?;
    Ok(Json(response))
}

/// GET /api/import/template/:type
pub async fn template(Path(import_type): Path<String>) -> Result<Response, ImportError> {
    let import_type = parse_import_type(&import_type)?;
    let bytes = build_template(import_type)?;

    Response::builder()
        .status(StatusCode::OK)
        .header(
            header::CONTENT_TYPE,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        )
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", template_file_name(import_type)),
        )
        .body(Body::from(bytes))
        .map_err(|e| ImportError::Storage(e.into()))
}

/// GET /api/import/target-fields/:type
pub async fn target_fields_for(
    Path(import_type): Path<String>,
) -> Result<Json<Vec<TargetFieldSpec>>, ImportError> {
    let import_type = parse_import_type(&import_type)?;
    Ok(Json(target_fields(import_type)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::config::Config;
    use crate::shared::events::EventBus;
    use crate::usecases::u501_spreadsheet_import::{ImportExecutor, ImportRow, RecordSink};
    use async_trait::async_trait;
    use axum::extract::FromRequest;
    use axum::http::Request;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use uuid::Uuid;

    const BOUNDARY: &str = "crm-test-boundary";

    #[derive(Default)]
    struct CountingSink {
        created: AtomicUsize,
    }

    #[async_trait]
    impl RecordSink for CountingSink {
        async fn create(&self, _row: ImportRow) -> anyhow::Result<Uuid> {
            self.created.fetch_add(1, Ordering::SeqCst);
            Ok(Uuid::new_v4())
        }
    }

    fn state(max_upload_mb: usize, sink: Arc<CountingSink>) -> AppState {
        let config: Config = toml::from_str(&format!(
            "[database]\npath = \"x.db\"\n[import]\nmax_upload_mb = {}\n",
            max_upload_mb
        ))
        .unwrap();
        AppState {
            importer: ImportExecutor::new(sink, EventBus::new(), &config.import.default_brand),
            config: Arc::new(config),
        }
    }

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a [u8]),
    }

    async fn multipart(parts: &[Part<'_>]) -> Multipart {
        let mut body: Vec<u8> = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(file_name, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"file\"; filename=\"{}\"\r\n\
                             Content-Type: application/octet-stream\r\n\r\n",
                            file_name
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        let request = Request::builder()
            .method("POST")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        Multipart::from_request(request, &()).await.unwrap()
    }

    const LEAD_MAPPINGS: &str =
        r#"[{"sourceField":"Nombre","targetField":"firstName"},{"sourceField":"Apellido","targetField":"lastName"}]"#;

    #[tokio::test]
    async fn test_commit_with_mapped_data_needs_no_file() {
        let sink = Arc::new(CountingSink::default());
        let form = multipart(&[
            Part::Text("type", "leads"),
            Part::Text("mappings", LEAD_MAPPINGS),
            Part::Text("mappedData", r#"[{"firstName":"Ana","lastName":"Mora","phoneNumber":991234567}]"#),
        ])
        .await;

        let Ok(Json(response)) = commit(State(state(20, sink.clone())), form).await else {
            panic!("commit without file should succeed when mappedData is present");
        };
        assert_eq!(response.count, 1);
        assert_eq!(sink.created.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_commit_without_mappings_is_bad_request() {
        let form = multipart(&[
            Part::Text("type", "customers"),
            Part::File("clientes.csv", b"Nombres,Apellidos\nAna,Mora\n"),
        ])
        .await;

        let Err(err) = commit(State(state(20, Arc::default())), form).await else {
            panic!("commit without mappings must fail");
        };
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("mappings"));
    }

    #[tokio::test]
    async fn test_unknown_type_is_bad_request() {
        let form = multipart(&[
            Part::Text("type", "invoices"),
            Part::File("clientes.csv", b"Nombres,Apellidos\nAna,Mora\n"),
        ])
        .await;

        let Err(err) = preview(State(state(20, Arc::default())), form).await else {
            panic!("unknown import type must fail");
        };
        assert!(matches!(err, ImportError::UnknownImportType(ref t) if t == "invoices"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let form = multipart(&[
            Part::Text("type", "customers"),
            Part::File("clientes.csv", b"Nombres,Apellidos\nAna,Mora\n"),
        ])
        .await;

        // Лимит 0 MB: любой непустой файл слишком большой
        let Err(err) = preview(State(state(0, Arc::default())), form).await else {
            panic!("upload above the limit must fail");
        };
        assert!(matches!(err, ImportError::FileTooLarge { limit_mb: 0 }));
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_preview_returns_auto_mapping() {
        let form = multipart(&[
            Part::Text("type", "customers"),
            Part::File("clientes.csv", b"Nombres,Apellidos\nAna,Mora\n"),
        ])
        .await;

        let Ok(Json(response)) = preview(State(state(20, Arc::default())), form).await else {
            panic!("preview of a valid csv should succeed");
        };
        assert_eq!(response.row_count, 1);
        assert!(response.missing_required.is_empty());
    }
}
