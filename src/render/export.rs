// src/render/export.rs
use std::io::Cursor;

use chrono::Utc;
use image::{ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};

use crate::errors::DesignError;
use crate::models::ExportOptions;

const MAX_PIXEL_RATIO: f32 = 4.0;

/// Rasterizes composed surfaces to PNG. Holds the usvg options so system
/// fonts are loaded once at startup.
pub struct DesignExporter {
    options: usvg::Options<'static>,
}

impl DesignExporter {
    pub fn new() -> Self {
        let mut options = usvg::Options::default();
        options.fontdb_mut().load_system_fonts();
        Self { options }
    }

    pub fn render_png(&self, svg: &str, export: ExportOptions) -> Result<Vec<u8>, DesignError> {
        validate_options(&export)?;

        let svg = if export.cache_bust {
            cache_bust_hrefs(svg)
        } else {
            svg.to_string()
        };

        let tree = usvg::Tree::from_str(&svg, &self.options)
            .map_err(|e| DesignError::Render(format!("Invalid design surface: {}", e)))?;

        let size = tree.size();
        let width = (size.width() * export.pixel_ratio).round() as u32;
        let height = (size.height() * export.pixel_ratio).round() as u32;

        let mut pixmap = tiny_skia::Pixmap::new(width, height).ok_or_else(|| {
            DesignError::Export(format!("Invalid bitmap dimensions: {}x{}", width, height))
        })?;
        resvg::render(
            &tree,
            tiny_skia::Transform::from_scale(export.pixel_ratio, export.pixel_ratio),
            &mut pixmap.as_mut(),
        );

        encode_png(&pixmap)
    }
}

impl Default for DesignExporter {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_options(options: &ExportOptions) -> Result<(), DesignError> {
    if !(0.0..=1.0).contains(&options.quality) {
        return Err(DesignError::Validation(format!(
            "quality must be between 0 and 1, got {}",
            options.quality
        )));
    }
    if !(options.pixel_ratio > 0.0 && options.pixel_ratio <= MAX_PIXEL_RATIO) {
        return Err(DesignError::Validation(format!(
            "pixelRatio must be in (0, {}], got {}",
            MAX_PIXEL_RATIO, options.pixel_ratio
        )));
    }
    Ok(())
}

/// Appends a timestamp query to every remote href so intermediaries hand
/// back a fresh copy of linked assets.
pub fn cache_bust_hrefs(svg: &str) -> String {
    let stamp = Utc::now().timestamp_millis();
    let mut out = String::with_capacity(svg.len());
    let mut rest = svg;
    while let Some(pos) = rest.find("href=\"http") {
        let value_start = pos + "href=\"".len();
        out.push_str(&rest[..value_start]);
        let tail = &rest[value_start..];
        match tail.find('"') {
            Some(end) => {
                let url = &tail[..end];
                let sep = if url.contains('?') { '&' } else { '?' };
                out.push_str(url);
                out.push_str(&format!("{}v={}", sep, stamp));
                rest = &tail[end..];
            }
            None => {
                out.push_str(tail);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

// Pixmaps hold premultiplied RGBA, so demultiply before handing the buffer
// to the PNG encoder.
fn encode_png(pixmap: &tiny_skia::Pixmap) -> Result<Vec<u8>, DesignError> {
    let mut rgba = Vec::with_capacity(pixmap.pixels().len() * 4);
    for pixel in pixmap.pixels() {
        let pixel = pixel.demultiply();
        rgba.extend_from_slice(&[pixel.red(), pixel.green(), pixel.blue(), pixel.alpha()]);
    }
    let image = RgbaImage::from_raw(pixmap.width(), pixmap.height(), rgba)
        .ok_or_else(|| DesignError::Export("Pixel buffer size mismatch".to_string()))?;

    let mut out = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .map_err(|e| DesignError::Export(format!("PNG encoding failed: {}", e)))?;
    Ok(out)
}

/// Download name for an exported design, stamped to the millisecond.
pub fn export_filename() -> String {
    format!("pr-quick-design-{}.png", Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::GenericImageView;

    #[test]
    fn filename_carries_a_millisecond_stamp() {
        let name = export_filename();
        assert!(name.starts_with("pr-quick-design-"));
        assert!(name.ends_with(".png"));
        let stamp = &name["pr-quick-design-".len()..name.len() - ".png".len()];
        assert!(stamp.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn cache_bust_versions_remote_hrefs() {
        let svg = r#"<image href="https://example.com/logo.png" width="10"/>"#;
        let busted = cache_bust_hrefs(svg);
        assert!(busted.contains("https://example.com/logo.png?v="));

        let queried = r#"<image href="https://example.com/logo.png?size=2"/>"#;
        let busted = cache_bust_hrefs(queried);
        assert!(busted.contains("logo.png?size=2&v="));
    }

    #[test]
    fn cache_bust_leaves_local_references_alone() {
        let svg = r##"<rect fill="url(#bg-motif)"/><use href="#shape"/>"##;
        assert_eq!(cache_bust_hrefs(svg), svg);
    }

    #[test]
    fn rejects_out_of_range_options() {
        let exporter = DesignExporter::new();
        let svg = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"10\" height=\"10\"/>";

        let too_sharp = ExportOptions {
            quality: 1.5,
            ..ExportOptions::default()
        };
        assert!(matches!(
            exporter.render_png(svg, too_sharp),
            Err(DesignError::Validation(_))
        ));

        for ratio in [0.0, -1.0, 8.0] {
            let bad_ratio = ExportOptions {
                pixel_ratio: ratio,
                ..ExportOptions::default()
            };
            assert!(matches!(
                exporter.render_png(svg, bad_ratio),
                Err(DesignError::Validation(_))
            ));
        }
    }

    #[test]
    fn rejects_malformed_markup() {
        let exporter = DesignExporter::new();
        let result = exporter.render_png("not svg at all", ExportOptions::default());
        assert!(matches!(result, Err(DesignError::Render(_))));
    }

    #[test]
    fn renders_at_the_requested_pixel_ratio() {
        let exporter = DesignExporter::new();
        let svg = r##"<svg xmlns="http://www.w3.org/2000/svg" width="40" height="30"><rect width="40" height="30" fill="#FF8F8F"/></svg>"##;
        let png = exporter
            .render_png(svg, ExportOptions::default())
            .expect("render");
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");

        let decoded = image::load_from_memory(&png).expect("decode");
        assert_eq!(decoded.dimensions(), (80, 60));
    }
}
