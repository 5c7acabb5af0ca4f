// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use log::info;

use pr_quick_design::render::export::DesignExporter;
use pr_quick_design::services::{ContentRequestor, GeminiModel};
use pr_quick_design::{AppState, api_scope, handlers};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting PR Quick Design service...");

    let api_key = std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY must be set")?;
    let requestor = ContentRequestor::new(GeminiModel::new(api_key));
    let exporter = DesignExporter::new();
    let app_state = AppState::new(requestor, exporter);

    info!("Starting HTTP server on 0.0.0.0:8080");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .service(api_scope())
            .route("/health", web::get().to(handlers::health_check))
            .service(actix_files::Files::new("/", "./static").index_file("index.html"))
    })
    .bind("0.0.0.0:8080")
    .context("Failed to bind 0.0.0.0:8080")?
    .run()
    .await?;

    Ok(())
}
