//! End-to-end tests for the staged design pipeline, driven through the HTTP
//! surface with a stubbed content model.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::{App, http::StatusCode, http::header, test, web};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose;
use image::GenericImageView;
use serde_json::{Value, json};

use pr_quick_design::errors::DesignError;
use pr_quick_design::models::is_palette_color;
use pr_quick_design::render::export::DesignExporter;
use pr_quick_design::services::{ContentModel, ContentRequestor};
use pr_quick_design::{AppState, api_scope};

const STUB_PAYLOAD: &str = r##"{
    "headline": "เปิดบ้านวิชาการ 2567",
    "subheadline": "วิทยาลัยการอาชีพบ้านผือ",
    "bodyText": "พบกับกิจกรรมมากมาย วันที่ 20 มกราคมนี้",
    "accentColor": "#ABCDEF",
    "backgroundColor": "#FFFFFF",
    "textColor": "#1F2937",
    "emojiIcon": "🎉",
    "layoutStyle": "minimal"
}"##;

/// Stands in for Gemini: returns a canned payload and counts invocations.
struct StubModel {
    payload: String,
    calls: Arc<AtomicUsize>,
}

impl StubModel {
    fn new(payload: &str) -> (Self, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let model = StubModel {
            payload: payload.to_string(),
            calls: calls.clone(),
        };
        (model, calls)
    }
}

#[async_trait]
impl ContentModel for StubModel {
    async fn generate_json(
        &self,
        _prompt: &str,
        _schema: Value,
    ) -> Result<String, DesignError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone())
    }
}

fn state_with(model: StubModel) -> AppState {
    AppState::new(ContentRequestor::new(model), DesignExporter::new())
}

#[actix_web::test]
async fn rejects_blank_text_without_calling_the_model() {
    let (model, calls) = StubModel::new(STUB_PAYLOAD);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(model)))
            .service(api_scope()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/generate")
        .set_json(json!({ "text": "   \n ", "designType": "Poster" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn generates_a_complete_design() {
    let (model, calls) = StubModel::new(STUB_PAYLOAD);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(model)))
            .service(api_scope()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/generate")
        .set_json(json!({ "text": "งานเปิดบ้านวิชาการ", "designType": "Poster" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let design: Value = test::read_body_json(resp).await;
    assert_eq!(design["headline"], "เปิดบ้านวิชาการ 2567");
    assert_eq!(design["textColor"], "#1F2937");
    assert_eq!(design["layoutStyle"], "minimal");

    // Accent and decor are rolled server-side, never taken from the model.
    assert!(is_palette_color(design["accentColor"].as_str().unwrap()));
    assert_ne!(design["accentColor"], "#ABCDEF");
    let elements = design["decorativeElements"].as_array().unwrap();
    assert!((3..=6).contains(&elements.len()));
    assert!(design["generatedAt"].is_string());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn malformed_model_payload_maps_to_service_unavailable() {
    let (model, _) = StubModel::new("this is not json");
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(model)))
            .service(api_scope()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/generate")
        .set_json(json!({ "text": "ประกาศรับสมัคร", "designType": "Name Card" }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "AI service error");
}

#[actix_web::test]
async fn regenerating_rolls_fresh_decor() {
    let (model, _) = StubModel::new(STUB_PAYLOAD);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(model)))
            .service(api_scope()),
    )
    .await;

    let mut ids: Vec<String> = Vec::new();
    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri("/api/v1/generate")
            .set_json(json!({ "text": "โปรโมชั่นพิเศษ", "designType": "Social Media Post" }))
            .to_request();
        let design: Value = test::read_body_json(test::call_service(&app, req).await).await;
        for element in design["decorativeElements"].as_array().unwrap() {
            ids.push(element["id"].as_str().unwrap().to_string());
        }
    }

    let mut unique = ids.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), ids.len());
}

#[actix_web::test]
async fn renders_the_posted_design_as_svg() {
    let (model, _) = StubModel::new(STUB_PAYLOAD);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(model)))
            .service(api_scope()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/generate")
        .set_json(json!({ "text": "งานเปิดบ้าน", "designType": "Poster" }))
        .to_request();
    let design: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/render")
        .set_json(json!({ "design": design, "designType": "Poster" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(content_type.starts_with("image/svg+xml"));

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    // The surface is a standalone document: XML declaration, then the svg root.
    assert!(body.starts_with("<?xml"));
    assert!(body.contains("<svg"));
    assert!(body.contains("xmlns=\"http://www.w3.org/2000/svg\""));
    assert!(body.contains("เปิดบ้านวิชาการ 2567"));
    assert!(body.contains("viewBox=\"0 0 500 700\""));
}

#[actix_web::test]
async fn exports_a_png_at_the_requested_pixel_ratio() {
    let (model, _) = StubModel::new(STUB_PAYLOAD);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(model)))
            .service(api_scope()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/generate")
        .set_json(json!({ "text": "งานเปิดบ้าน", "designType": "Poster" }))
        .to_request();
    let design: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export")
        .set_json(json!({
            "design": design,
            "designType": "Poster",
            "options": { "quality": 1.0, "pixelRatio": 2.0, "cacheBust": false }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/png"
    );

    let disposition = resp
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains("pr-quick-design-"));
    assert!(disposition.contains(".png"));

    let body = test::read_body(resp).await;
    let png = image::load_from_memory(&body).unwrap();
    assert_eq!(png.dimensions(), (1000, 1400));
}

#[actix_web::test]
async fn export_rejects_out_of_range_options() {
    let (model, _) = StubModel::new(STUB_PAYLOAD);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(model)))
            .service(api_scope()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/generate")
        .set_json(json!({ "text": "งานเปิดบ้าน", "designType": "Web Banner" }))
        .to_request();
    let design: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/export")
        .set_json(json!({
            "design": design,
            "designType": "Web Banner",
            "options": { "quality": 1.0, "pixelRatio": 9.0, "cacheBust": false }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn share_payload_carries_the_encoded_image() {
    let (model, _) = StubModel::new(STUB_PAYLOAD);
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state_with(model)))
            .service(api_scope()),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/api/v1/generate")
        .set_json(json!({ "text": "นามบัตรครูใหม่", "designType": "Name Card" }))
        .to_request();
    let design: Value = test::read_body_json(test::call_service(&app, req).await).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/share")
        .set_json(json!({ "design": design, "designType": "Name Card" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let payload: Value = test::read_body_json(resp).await;
    assert_eq!(payload["title"], "PR Quick Design");
    assert_eq!(payload["text"], "ดูดีไซน์ที่ฉันสร้างด้วย AI!");
    assert_eq!(payload["filename"], "design.png");
    assert_eq!(payload["mediaType"], "image/png");

    let bytes = general_purpose::STANDARD
        .decode(payload["imageBase64"].as_str().unwrap())
        .unwrap();
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}
