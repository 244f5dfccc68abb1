use std::io::Write;

use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::http::header::ContentType;
use actix_web::{Error, HttpResponse, error, web};
use futures::{StreamExt, TryStreamExt};
use log::error;
use serde_json::json;
use shared::PredictResponse;

use crate::pages::Pages;
use crate::service::PredictService;

const UPLOAD_FIELD: &str = "file";
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: String) {
    cfg.service(web::resource("/").route(web::get().to(home)))
        .service(web::resource("/predict").route(web::post().to(predict_page)))
        .service(web::resource("/api/predict").route(web::post().to(predict_api)))
        .service(web::resource("/health").route(web::get().to(health)))
        .service(Files::new("/static", static_dir));
}

async fn home(pages: web::Data<Pages>) -> Result<HttpResponse, Error> {
    let body = pages.index().map_err(error::ErrorInternalServerError)?;
    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(body))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}

enum Upload {
    Image(Vec<u8>),
    Missing,
    TooLarge,
}

async fn read_upload(mut payload: Multipart) -> Result<Upload, Error> {
    while let Ok(Some(mut field)) = payload.try_next().await {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let mut image_data = Vec::new();
        while let Some(chunk) = field.next().await {
            let data = chunk?;
            if image_data.len() + data.len() > MAX_UPLOAD_BYTES {
                return Ok(Upload::TooLarge);
            }
            image_data.write_all(&data)?;
        }
        if image_data.is_empty() {
            return Ok(Upload::Missing);
        }
        return Ok(Upload::Image(image_data));
    }
    Ok(Upload::Missing)
}

enum Outcome {
    Advice(String),
    ClientError(&'static str),
    ServerError,
}

/// Shared core of both predict variants: drain the upload, short-circuit on
/// client errors, then run the two-tier prediction.
async fn run_predict(service: &PredictService, payload: Multipart) -> Result<Outcome, Error> {
    let image = match read_upload(payload).await? {
        Upload::Image(data) => data,
        Upload::Missing => return Ok(Outcome::ClientError("No file uploaded")),
        Upload::TooLarge => return Ok(Outcome::ClientError("File too large")),
    };

    match service.predict(&image) {
        Ok(prediction) => {
            log::debug!(
                "Serving advice for {} ({:?}, confidence {:.2})",
                prediction.label,
                prediction.source,
                prediction.confidence
            );
            Ok(Outcome::Advice(prediction.advice))
        }
        Err(e) => {
            error!("Prediction failed: {e}");
            Ok(Outcome::ServerError)
        }
    }
}

async fn predict_page(
    service: web::Data<PredictService>,
    pages: web::Data<Pages>,
    payload: Multipart,
) -> Result<HttpResponse, Error> {
    match run_predict(&service, payload).await? {
        Outcome::Advice(advice) => {
            let body = pages
                .display(200, &advice)
                .map_err(error::ErrorInternalServerError)?;
            Ok(HttpResponse::Ok()
                .content_type(ContentType::html())
                .body(body))
        }
        Outcome::ClientError(message) => {
            let body = pages
                .index_with_error(400, message)
                .map_err(error::ErrorInternalServerError)?;
            Ok(HttpResponse::BadRequest()
                .content_type(ContentType::html())
                .body(body))
        }
        Outcome::ServerError => {
            let body = pages
                .index_with_error(500, "Internal Server Error")
                .map_err(error::ErrorInternalServerError)?;
            Ok(HttpResponse::InternalServerError()
                .content_type(ContentType::html())
                .body(body))
        }
    }
}

async fn predict_api(
    service: web::Data<PredictService>,
    payload: Multipart,
) -> Result<HttpResponse, Error> {
    let response = match run_predict(&service, payload).await? {
        Outcome::Advice(advice) => HttpResponse::Ok().json(PredictResponse {
            status: 200,
            result: advice,
        }),
        Outcome::ClientError(message) => HttpResponse::BadRequest().json(PredictResponse {
            status: 400,
            result: message.to_string(),
        }),
        Outcome::ServerError => HttpResponse::InternalServerError().json(PredictResponse {
            status: 500,
            result: "Internal Server Error".to_string(),
        }),
    };
    Ok(response)
}
