use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use chrono::Local;

use crate::shared::format::format_number;

/// Голубой для 2xx, коричневый для остального
fn status_color(status: StatusCode) -> &'static str {
    if status.is_success() {
        "36"
    } else {
        "33"
    }
}

fn log_line(status: StatusCode, method: &Method, path: &str, millis: u128, size: &str) -> String {
    let timestamp = Local::now();
    format!(
        "\x1b[{}m{}\x1b[0m | {:>5}ms | {:>12} | {} {:>6} {}",
        status_color(status),
        timestamp.format("%H:%M:%S"),
        millis,
        size,
        status.as_u16(),
        method,
        path
    )
}

/// Middleware для логирования HTTP запросов: время, длительность,
/// размер ответа, статус, метод и путь
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let start = std::time::Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let (parts, body) = response.into_parts();

    // Тело читается целиком, чтобы узнать реальный размер
    match to_bytes(body, usize::MAX).await {
        Ok(bytes) => {
            let size = format_number(bytes.len());
            println!(
                "{}",
                log_line(parts.status, &method, &path, start.elapsed().as_millis(), &size)
            );
            Response::from_parts(parts, Body::from(bytes))
        }
        Err(_) => {
            println!(
                "{}",
                log_line(parts.status, &method, &path, start.elapsed().as_millis(), "error")
            );
            Response::from_parts(parts, Body::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_color() {
        assert_eq!(status_color(StatusCode::OK), "36");
        assert_eq!(status_color(StatusCode::CREATED), "36");
        assert_eq!(status_color(StatusCode::UNPROCESSABLE_ENTITY), "33");
    }

    #[test]
    fn test_log_line_contains_request() {
        let line = log_line(StatusCode::OK, &Method::POST, "/api/import/commit", 12, "1.024");
        assert!(line.contains("POST /api/import/commit"));
        assert!(line.contains("1.024"));
        assert!(line.contains("200"));
    }
}
