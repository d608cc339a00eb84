use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use brain_scan_classifier::classifier::{Classifier, OnnxClassifier};
use brain_scan_classifier::config::Config;
use brain_scan_classifier::handlers;
use clap::Parser;
use env_logger::{Env, TimestampPrecision};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp(Some(TimestampPrecision::Millis))
        .init();

    let config = Config::parse();

    std::fs::create_dir_all(&config.upload_dir)?;

    let classifier: Arc<dyn Classifier> = match OnnxClassifier::load(
        &config.model_path,
        config.image_height,
        config.image_width,
    ) {
        Ok(model) => Arc::new(model),
        Err(e) => {
            log::error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::Other, e));
        }
    };
    let classifier = web::Data::from(classifier);
    let settings = web::Data::new(config.upload_settings());

    log::info!("Server running at http://{}:{}", config.host, config.port);

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(classifier.clone())
            .app_data(settings.clone())
            .configure(handlers::configure)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
