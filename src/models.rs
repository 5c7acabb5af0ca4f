// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

/// The four accent colors every design draws from. The content service is
/// instructed to stay inside this palette, and the accent override ignores
/// whatever it picked anyway.
pub const PALETTE: [&str; 4] = ["#FF8F8F", "#FFF1CB", "#C2E2FA", "#B7A3E3"];

/// Text color used when the content service omits one.
pub const DEFAULT_TEXT_COLOR: &str = "#1F2937";

/// Base color substituted for pure-white backgrounds so pattern motifs keep
/// some depth.
pub const WHITE_SUBSTITUTE: &str = "#F3F4F6";

pub fn is_palette_color(color: &str) -> bool {
    PALETTE.iter().any(|c| c.eq_ignore_ascii_case(color))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DesignType {
    Poster,
    #[serde(rename = "Name Card")]
    NameCard,
    #[serde(rename = "Web Banner")]
    Banner,
    #[serde(rename = "Social Media Post")]
    SocialPost,
}

impl DesignType {
    /// Canvas preset in CSS pixels, width x height. The design type controls
    /// nothing else about the composition.
    pub fn canvas_size(self) -> (u32, u32) {
        match self {
            DesignType::Poster => (500, 700),
            DesignType::NameCard => (500, 300),
            DesignType::Banner => (800, 300),
            DesignType::SocialPost => (500, 500),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DesignType::Poster => "Poster",
            DesignType::NameCard => "Name Card",
            DesignType::Banner => "Web Banner",
            DesignType::SocialPost => "Social Media Post",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutStyle {
    Minimal,
    Bold,
    Creative,
    Modern,
}

impl LayoutStyle {
    pub fn parse(name: &str) -> Option<LayoutStyle> {
        match name.trim().to_ascii_lowercase().as_str() {
            "minimal" => Some(LayoutStyle::Minimal),
            "bold" => Some(LayoutStyle::Bold),
            "creative" => Some(LayoutStyle::Creative),
            "modern" => Some(LayoutStyle::Modern),
            _ => None,
        }
    }
}

// Unrecognized style names fall back to the minimal layout instead of
// failing the whole payload.
impl<'de> Deserialize<'de> for LayoutStyle {
    fn deserialize<D>(deserializer: D) -> Result<LayoutStyle, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(LayoutStyle::parse(&name).unwrap_or_else(|| {
            log::debug!("unrecognized layout style '{}', using minimal", name);
            LayoutStyle::Minimal
        }))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundPattern {
    Solid,
    Dots,
    Grid,
    Lines,
    Gradient,
    Mesh,
}

impl BackgroundPattern {
    pub const ALL: [BackgroundPattern; 6] = [
        BackgroundPattern::Solid,
        BackgroundPattern::Dots,
        BackgroundPattern::Grid,
        BackgroundPattern::Lines,
        BackgroundPattern::Gradient,
        BackgroundPattern::Mesh,
    ];

    pub fn parse(name: &str) -> Option<BackgroundPattern> {
        match name.trim().to_ascii_lowercase().as_str() {
            "solid" => Some(BackgroundPattern::Solid),
            "dots" => Some(BackgroundPattern::Dots),
            "grid" => Some(BackgroundPattern::Grid),
            "lines" => Some(BackgroundPattern::Lines),
            "gradient" => Some(BackgroundPattern::Gradient),
            "mesh" => Some(BackgroundPattern::Mesh),
            _ => None,
        }
    }
}

// Unrecognized pattern names render as a solid fill.
impl<'de> Deserialize<'de> for BackgroundPattern {
    fn deserialize<D>(deserializer: D) -> Result<BackgroundPattern, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(BackgroundPattern::parse(&name).unwrap_or_else(|| {
            log::debug!("unrecognized background pattern '{}', using solid", name);
            BackgroundPattern::Solid
        }))
    }
}

/// Shape of a decorative element. Blobs carry four independent corner radii
/// (percent of the side length); circles are always perfectly round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DecorShape {
    Blob {
        #[serde(rename = "cornerRadii")]
        corner_radii: [f32; 4],
    },
    Circle,
}

/// One soft background shape. Created fresh per generation, owned by its
/// design, never mutated. Always rendered beneath the content layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorativeElement {
    pub id: Uuid,
    #[serde(flatten)]
    pub shape: DecorShape,
    /// Center position in percent of the canvas; may bleed off-canvas.
    pub top_pct: f32,
    pub left_pct: f32,
    pub size_px: f32,
    pub color: String,
    pub opacity: f32,
    pub rotation_deg: f32,
    pub blur_px: f32,
}

/// The raw payload the content service returns, before local overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignContent {
    pub headline: String,
    pub subheadline: String,
    pub body_text: String,
    pub accent_color: String,
    pub background_color: String,
    #[serde(default)]
    pub text_color: Option<String>,
    pub emoji_icon: String,
    pub layout_style: LayoutStyle,
}

/// A complete generated design. Constructed atomically by the content
/// requestor and replaced wholesale by the next generation; the view owns the
/// single current value and posts it back for render/export/share.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDesign {
    pub headline: String,
    pub subheadline: String,
    pub body_text: String,
    pub accent_color: String,
    pub background_color: String,
    pub text_color: String,
    pub emoji_icon: String,
    pub layout_style: LayoutStyle,
    pub background_pattern: BackgroundPattern,
    pub decorative_elements: Vec<DecorativeElement>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub text: String,
    pub design_type: DesignType,
}

/// Body shared by the render, export and share endpoints: the view hands the
/// current design back together with the canvas type it was generated for.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceRequest {
    pub design: GeneratedDesign,
    pub design_type: DesignType,
    #[serde(default)]
    pub options: Option<ExportOptions>,
}

/// Rasterizer options, mirroring the export boundary contract.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportOptions {
    pub quality: f32,
    pub pixel_ratio: f32,
    pub cache_bust: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        ExportOptions {
            quality: 1.0,
            pixel_ratio: 2.0,
            cache_bust: true,
        }
    }
}

/// Everything the view needs to hand the exported image to the platform
/// share sheet.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SharePayload {
    pub title: String,
    pub text: String,
    pub filename: String,
    pub media_type: String,
    pub image_base64: String,
}
