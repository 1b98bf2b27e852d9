use std::collections::HashMap;

use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use serde_json::Value;

use crate::dto::results::SubmissionHeaders;
use crate::repository::DieselRepository;
use crate::routes::{PUBLIC_KEY_HEADER, error_response};
use crate::services::results::ResultsService;

fn submission_headers(req: &HttpRequest) -> SubmissionHeaders {
    SubmissionHeaders {
        public_key: req
            .headers()
            .get(PUBLIC_KEY_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    }
}

#[get("/results")]
/// List stored test runs, newest first, filtered by the query parameters.
pub async fn list_results(
    params: web::Query<HashMap<String, String>>,
    repo: web::Data<DieselRepository>,
    service: web::Data<ResultsService>,
) -> impl Responder {
    match service.list(repo.get_ref(), &params) {
        Ok(page) => HttpResponse::Ok().json(page),
        Err(err) => {
            log::warn!("Failed to list test runs: {err}");
            error_response(&err)
        }
    }
}

#[post("/results")]
/// Store a submitted test run.
pub async fn create_result(
    req: HttpRequest,
    payload: web::Json<Value>,
    repo: web::Data<DieselRepository>,
    service: web::Data<ResultsService>,
) -> impl Responder {
    let headers = submission_headers(&req);
    match service.create(repo.get_ref(), &payload, &headers) {
        Ok(created) => HttpResponse::Created().json(created),
        Err(err) => {
            log::warn!("Rejected test run submission: {err}");
            error_response(&err)
        }
    }
}

#[get("/results/{test_id}")]
/// Show a single test run with its executed test cases.
pub async fn show_result(
    test_id: web::Path<String>,
    repo: web::Data<DieselRepository>,
    service: web::Data<ResultsService>,
) -> impl Responder {
    match service.fetch_one(repo.get_ref(), &test_id) {
        Ok(detail) => HttpResponse::Ok().json(detail),
        Err(err) => error_response(&err),
    }
}
