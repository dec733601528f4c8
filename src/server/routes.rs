use crate::{config::Config, error::RelayError, handler::ImageHandler};
use actix_cors::Cors;
use actix_files::NamedFile;
use actix_web::{http::header, web, HttpMessage, HttpRequest, HttpResponse};
use futures::StreamExt;
use serde_json::Value;
use std::path::PathBuf;

pub const GENERATE_IMAGE_PATH: &str = "/generate-image";

#[derive(Debug, Clone)]
pub struct LandingPage(pub PathBuf);

/// Upper bound on a `/generate-image` request body, in bytes.
#[derive(Debug, Clone, Copy)]
pub struct BodyLimit(pub usize);

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config) {
    cfg.app_data(web::Data::new(LandingPage(config.landing_page_path())))
        .app_data(web::Data::new(BodyLimit(config.max_body_bytes)))
        .service(
            web::resource(GENERATE_IMAGE_PATH)
                .wrap(build_cors(config))
                .route(web::post().to(generate_image)),
        )
        .service(web::resource("/").route(web::get().to(landing_page)));
}

fn build_cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allowed_methods(vec!["POST", "OPTIONS"])
        .allowed_header(header::CONTENT_TYPE)
        .max_age(3600);

    if config.allows_any_origin() {
        cors.allow_any_origin()
    } else {
        config
            .allowed_origins
            .iter()
            .fold(cors, |cors, origin| cors.allowed_origin(origin))
    }
}

pub async fn generate_image(
    handler: web::Data<ImageHandler>,
    limit: web::Data<BodyLimit>,
    req: HttpRequest,
    payload: web::Payload,
) -> Result<HttpResponse, RelayError> {
    let body = read_body(payload, limit.0).await?;
    let payload = json_payload(&req, &body);
    let response = handler.handle(payload).await?;
    Ok(HttpResponse::Ok().json(response))
}

/// Collects the request body. Anything past `limit` can only be an
/// oversized prompt, so it is rejected the same way validation would.
async fn read_body(
    mut payload: web::Payload,
    limit: usize,
) -> Result<web::BytesMut, RelayError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| {
            log::debug!("failed reading request body: {}", e);
            RelayError::InvalidRequest("Request must be JSON".into())
        })?;
        if body.len() + chunk.len() > limit {
            log::warn!("request body exceeds {} bytes", limit);
            return Err(RelayError::InvalidRequest("Prompt is too long".into()));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

/// Same rule as Flask's `is_json`: `application/json` or any
/// `application/*+json`, compared case-insensitively.
fn is_json_content_type(content_type: &str) -> bool {
    let essence = content_type.trim().to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// `None` when the body is not declared as JSON or does not parse.
fn json_payload(req: &HttpRequest, body: &[u8]) -> Option<Value> {
    if !is_json_content_type(req.content_type()) {
        log::debug!("rejecting content type {:?}", req.content_type());
        return None;
    }

    match serde_json::from_slice(body) {
        Ok(value) => Some(value),
        Err(e) => {
            log::debug!("malformed JSON body: {}", e);
            None
        }
    }
}

pub async fn landing_page(page: web::Data<LandingPage>) -> actix_web::Result<NamedFile> {
    Ok(NamedFile::open_async(&page.0).await?)
}
