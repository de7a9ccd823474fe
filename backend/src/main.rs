mod config;
mod echo;
mod extractor;
mod routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use config::{AppConfig, UploadMode};
use extractor::provider::GeminiProvider;
use extractor::service::ReceiptExtractor;
use routes::configure_routes;
use std::sync::Arc;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();

    if config.mode == UploadMode::Extract && config.api_key.is_empty() {
        log::warn!(
            "GEMINI_API_KEY is not set; extraction requests will fail at the first model call."
        );
    }

    let provider = GeminiProvider::new(config.api_key.clone(), config.model.clone());
    let extractor = ReceiptExtractor::new(Arc::new(provider));

    let bind_address = format!("0.0.0.0:{}", config.port);
    log::info!(
        "Starting server on {} ({:?} upload variant)",
        bind_address,
        config.mode
    );

    let mode = config.mode.clone();
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
            .app_data(web::Data::new(extractor.clone()))
            .configure(|cfg| configure_routes(cfg, &mode))
    })
    .bind(&bind_address)?
    .run()
    .await
}
