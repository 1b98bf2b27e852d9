//! HTTP adapter mapping requests onto the results service.

use actix_web::error::InternalError;
use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::services::ServiceError;
use crate::validation::PAYLOAD_PATH;

pub mod results;

/// Header carrying the submitter's public key.
pub const PUBLIC_KEY_HEADER: &str = "X-Public-Key";

/// Registers the results endpoints.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Unparseable bodies get the same envelope as rejected submissions.
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(json!({
            "message": err.to_string(),
            "field": PAYLOAD_PATH,
        }));
        InternalError::from_response(err, response).into()
    });

    cfg.service(
        web::scope("/v1")
            .app_data(json_config)
            .service(results::list_results)
            .service(results::create_result)
            .service(results::show_result),
    );
}

/// Maps a service failure onto the response sent to the client.
pub fn error_response(err: &ServiceError) -> HttpResponse {
    match err {
        ServiceError::Validation(validation) => HttpResponse::BadRequest().json(json!({
            "message": validation.reason,
            "field": validation.path,
        })),
        ServiceError::Filter(filter) => HttpResponse::BadRequest().json(json!({
            "message": format!("Reason: {filter}"),
        })),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        ServiceError::Internal => HttpResponse::InternalServerError().finish(),
    }
}
