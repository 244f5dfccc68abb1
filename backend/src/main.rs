mod advice;
mod config;
mod pages;
mod routes;
mod selection;
mod service;
mod vision;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, web};

use advice::AdviceStore;
use config::AppConfig;
use pages::Pages;
use routes::configure_routes;
use service::PredictService;
use vision::classifier::DiseaseClassifier;
use vision::detector::PestDetector;

fn startup_error(what: &str, err: impl std::fmt::Display) -> std::io::Error {
    log::error!("Failed to load {what}: {err}");
    std::io::Error::new(std::io::ErrorKind::Other, format!("{what} loading failed: {err}"))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();

    let detector = PestDetector::load(&config.pest_model_path, &config.pest_classes_path)
        .map_err(|e| startup_error("pest detector", e))?;
    let classifier = DiseaseClassifier::load(
        &config.disease_model_path,
        &config.disease_classes_path,
    )
    .map_err(|e| startup_error("disease classifier", e))?;
    let advice = AdviceStore::load(&config.pest_advice_path, &config.disease_advice_path)
        .map_err(|e| startup_error("advice tables", e))?;
    let pages = Pages::new().map_err(|e| startup_error("page templates", e))?;

    let service = web::Data::new(PredictService::new(
        Arc::new(detector),
        Arc::new(classifier),
        advice,
    ));
    let pages = web::Data::new(pages);
    let static_dir = config.static_dir.clone();

    let bind_address = config.bind_address();
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(service.clone())
            .app_data(pages.clone())
            .configure(|cfg| configure_routes(cfg, static_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
