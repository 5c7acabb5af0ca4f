// src/handlers.rs
use actix_web::{HttpResponse, web};
use base64::{Engine as _, engine::general_purpose};
use log::{error, info};

use crate::AppState;
use crate::errors::DesignError;
use crate::models::{GenerateRequest, SharePayload, SurfaceRequest};
use crate::render::{self, export};

const SHARE_TITLE: &str = "PR Quick Design";
const SHARE_TEXT: &str = "ดูดีไซน์ที่ฉันสร้างด้วย AI!";
const SHARE_FILENAME: &str = "design.png";

pub async fn generate_design(
    body: web::Json<GenerateRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, DesignError> {
    let request = body.into_inner();
    if request.text.trim().is_empty() {
        return Err(DesignError::Validation(
            "Design text must not be empty".to_string(),
        ));
    }

    let design = data
        .requestor
        .generate_design(&request.text, request.design_type)
        .await?;

    info!(
        "Generated {} design: layout={:?} pattern={:?} accent={}",
        request.design_type.label(),
        design.layout_style,
        design.background_pattern,
        design.accent_color
    );

    Ok(HttpResponse::Ok().json(&design))
}

pub async fn render_surface(body: web::Json<SurfaceRequest>) -> Result<HttpResponse, DesignError> {
    let request = body.into_inner();
    let svg = render::compose_svg(&request.design, request.design_type);

    Ok(HttpResponse::Ok()
        .content_type("image/svg+xml; charset=utf-8")
        .body(svg))
}

pub async fn export_design(
    body: web::Json<SurfaceRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, DesignError> {
    let request = body.into_inner();
    let options = request.options.unwrap_or_default();
    let svg = render::compose_svg(&request.design, request.design_type);
    let png = data.exporter.render_png(&svg, options)?;
    let filename = export::export_filename();

    info!("Exported {} as {} bytes of PNG", filename, png.len());

    Ok(HttpResponse::Ok()
        .content_type("image/png")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(png))
}

pub async fn share_design(
    body: web::Json<SurfaceRequest>,
    data: web::Data<AppState>,
) -> Result<HttpResponse, DesignError> {
    let request = body.into_inner();
    let options = request.options.unwrap_or_default();
    let svg = render::compose_svg(&request.design, request.design_type);
    let png = data.exporter.render_png(&svg, options).map_err(|e| {
        // The view surfaces share failures silently, so keep a server trace.
        error!("Share export failed: {}", e);
        e
    })?;

    let payload = SharePayload {
        title: SHARE_TITLE.to_string(),
        text: SHARE_TEXT.to_string(),
        filename: SHARE_FILENAME.to_string(),
        media_type: "image/png".to_string(),
        image_base64: general_purpose::STANDARD.encode(&png),
    };

    Ok(HttpResponse::Ok().json(&payload))
}

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "pr-quick-design",
        "version": "0.1.0"
    }))
}
