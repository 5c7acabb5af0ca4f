// src/render/pattern.rs
use crate::models::{BackgroundPattern, WHITE_SUBSTITUTE};

/// Accent tint strengths used by the pattern motifs, from the 0x33, 0x22 and
/// 0x11 alpha bytes of the source styling.
pub const TINT_STRONG: f32 = 51.0 / 255.0;
pub const TINT_SOFT: f32 = 34.0 / 255.0;
pub const TINT_FAINT: f32 = 17.0 / 255.0;

pub const DOT_TILE_PX: f32 = 30.0;
pub const DOT_RADIUS_PX: f32 = 2.25;
pub const GRID_TILE_PX: f32 = 40.0;
/// Stripes repeat every half of this tile, measured along the 45 degree
/// stripe axis.
pub const LINES_TILE_PX: f32 = 20.0;

/// An accent color at a given opacity. Kept separate so the composer can
/// emit fill and fill-opacity attributes instead of 8-digit hex.
#[derive(Debug, Clone, PartialEq)]
pub struct Tint {
    pub color: String,
    pub opacity: f32,
}

/// One radial highlight of the mesh pattern, positioned in canvas fractions.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshFocal {
    pub cx_frac: f32,
    pub cy_frac: f32,
    pub tint: Tint,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BackgroundFill {
    Solid { base: String },
    Dots { base: String, dot: Tint },
    Grid { base: String, line: Tint },
    Lines { base: String, line: Tint },
    Gradient { base: String, to: Tint },
    Mesh { base: String, focals: [MeshFocal; 3] },
}

fn base_color(background: &str) -> String {
    // Pure white washes the motifs out, so it gets a light gray instead.
    if background.eq_ignore_ascii_case("#ffffff") {
        WHITE_SUBSTITUTE.to_string()
    } else {
        background.to_string()
    }
}

fn tint(accent: &str, opacity: f32) -> Tint {
    Tint {
        color: accent.to_string(),
        opacity,
    }
}

/// Maps a pattern choice onto concrete fill directives. Pure; identical
/// inputs always yield identical directives.
pub fn resolve(pattern: BackgroundPattern, accent: &str, background: &str) -> BackgroundFill {
    let base = base_color(background);
    match pattern {
        BackgroundPattern::Solid => BackgroundFill::Solid { base },
        BackgroundPattern::Dots => BackgroundFill::Dots {
            base,
            dot: tint(accent, TINT_STRONG),
        },
        BackgroundPattern::Grid => BackgroundFill::Grid {
            base,
            line: tint(accent, TINT_SOFT),
        },
        BackgroundPattern::Lines => BackgroundFill::Lines {
            base,
            line: tint(accent, TINT_FAINT),
        },
        BackgroundPattern::Gradient => BackgroundFill::Gradient {
            base,
            to: tint(accent, TINT_SOFT),
        },
        BackgroundPattern::Mesh => BackgroundFill::Mesh {
            base,
            focals: [
                MeshFocal {
                    cx_frac: 0.4,
                    cy_frac: 0.2,
                    tint: tint(accent, TINT_SOFT),
                },
                MeshFocal {
                    cx_frac: 0.8,
                    cy_frac: 0.0,
                    tint: tint(accent, TINT_FAINT),
                },
                MeshFocal {
                    cx_frac: 0.0,
                    cy_frac: 0.5,
                    tint: tint(accent, TINT_FAINT),
                },
            ],
        },
    }
}
