use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use kubernetes_hello_core::CoreError;

/// A snapshot that could not be collected.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct WebError(#[from] CoreError);

impl ResponseError for WebError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        if self.0.is_expected() {
            tracing::warn!("Snapshot failed: {}", self.0);
        } else {
            tracing::error!("Snapshot failed: {}", self.0);
        }
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::plaintext())
            .body(format!("{}\n", self.0))
    }
}
