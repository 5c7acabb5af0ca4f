// src/lib.rs
pub mod errors;
pub mod handlers;
pub mod models;
pub mod render;
pub mod services;

use std::sync::Arc;

use actix_web::{Scope, web};

use crate::handlers::{export_design, generate_design, render_surface, share_design};
use crate::render::export::DesignExporter;
use crate::services::ContentRequestor;

#[derive(Clone)]
pub struct AppState {
    requestor: Arc<ContentRequestor>,
    exporter: Arc<DesignExporter>,
}

impl AppState {
    pub fn new(requestor: ContentRequestor, exporter: DesignExporter) -> Self {
        AppState {
            requestor: Arc::new(requestor),
            exporter: Arc::new(exporter),
        }
    }
}

/// The staged design pipeline: generate content, render the surface, export
/// a bitmap, package a share payload. Mounted by the binary and built
/// directly by integration tests.
pub fn api_scope() -> Scope {
    web::scope("/api/v1")
        .route("/generate", web::post().to(generate_design))
        .route("/render", web::post().to(render_surface))
        .route("/export", web::post().to(export_design))
        .route("/share", web::post().to(share_design))
}
