//! HTTP handlers and request logging

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceRequest, ServiceResponse};
use actix_web::http::header::{self, ContentType};
use actix_web::middleware::Next;
use actix_web::{HttpRequest, HttpResponse, web};
use kubernetes_hello_core::{NameValuePair, NameValuePairs, SnapshotService};

use crate::error::WebError;
use crate::render;

/// What the page shows about the request being served.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    /// `<method> <host><uri>`
    pub request: String,
    pub client_address: String,
    pub server_address: String,
    /// One pair per header value, sorted by name.
    pub headers: Vec<NameValuePair>,
}

impl RequestInfo {
    pub fn from_request(req: &HttpRequest) -> Self {
        let headers = req
            .headers()
            .iter()
            .filter(|(name, _)| *name != header::HOST)
            .map(|(name, value)| {
                NameValuePair::new(name.as_str(), String::from_utf8_lossy(value.as_bytes()))
            })
            .collect::<NameValuePairs>()
            .sorted();

        Self {
            request: format!("{} {}{}", req.method(), request_host(req), req.uri()),
            client_address: req.peer_addr().map(|addr| addr.to_string()).unwrap_or_default(),
            server_address: req.app_config().local_addr().to_string(),
            headers,
        }
    }
}

/// `Host` header, or the URI authority for HTTP/2 requests.
fn request_host(req: &HttpRequest) -> &str {
    req.headers()
        .get(header::HOST)
        .and_then(|value| value.to_str().ok())
        .or_else(|| req.uri().host())
        .unwrap_or_default()
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").to(index))
        .default_service(web::to(not_found));
}

async fn index(
    req: HttpRequest,
    service: web::Data<SnapshotService>,
) -> Result<HttpResponse, WebError> {
    let snapshot = service.collect().await?;
    let request = RequestInfo::from_request(&req);
    Ok(HttpResponse::Ok()
        .insert_header(ContentType::html())
        .body(render::index_page(&request, &snapshot)))
}

async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .insert_header(ContentType::plaintext())
        .body("Not Found\n")
}

/// Logs the beginning and end of every request.
pub async fn log_request(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, actix_web::Error> {
    let method = req.method().clone();
    let host = request_host(req.request()).to_string();
    let url = req.uri().clone();

    tracing::info!(%method, %host, %url, "begin handling request");
    let response = next.call(req).await;
    match &response {
        Ok(res) => {
            let status = res.status().as_u16();
            tracing::info!(%method, %host, %url, status, "end handling request");
        }
        Err(e) => tracing::info!(%method, %host, %url, error = %e, "end handling request"),
    }
    response
}
