// src/services/decor_generator.rs
use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::models::{BackgroundPattern, DecorShape, DecorativeElement, PALETTE};

/// Blur applied to every decorative element, in CSS pixels.
pub const BLUR_RADIUS_PX: f32 = 60.0;

pub fn random_accent(rng: &mut impl Rng) -> &'static str {
    PALETTE.choose(rng).copied().unwrap_or(PALETTE[0])
}

pub fn random_pattern(rng: &mut impl Rng) -> BackgroundPattern {
    BackgroundPattern::ALL
        .choose(rng)
        .copied()
        .unwrap_or(BackgroundPattern::Solid)
}

/// Draws 3 to 6 soft shapes scattered around the canvas. Positions run from
/// -10% to 110% so shapes can bleed past the edges.
pub fn generate_elements(rng: &mut impl Rng) -> Vec<DecorativeElement> {
    let count = rng.gen_range(3..=6);
    (0..count).map(|_| random_element(rng)).collect()
}

fn random_element(rng: &mut impl Rng) -> DecorativeElement {
    // Blobs are favored 70/30 over circles.
    let shape = if rng.gen_bool(0.7) {
        DecorShape::Blob {
            corner_radii: [
                rng.gen_range(30.0..70.0),
                rng.gen_range(30.0..70.0),
                rng.gen_range(30.0..70.0),
                rng.gen_range(30.0..70.0),
            ],
        }
    } else {
        DecorShape::Circle
    };

    DecorativeElement {
        id: Uuid::new_v4(),
        shape,
        top_pct: rng.gen_range(-10.0..110.0),
        left_pct: rng.gen_range(-10.0..110.0),
        size_px: rng.gen_range(150.0..550.0),
        color: random_accent(rng).to_string(),
        opacity: rng.gen_range(0.2..0.7),
        rotation_deg: rng.gen_range(0.0..360.0),
        blur_px: BLUR_RADIUS_PX,
    }
}
