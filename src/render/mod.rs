// src/render/mod.rs
pub mod export;
pub mod layout;
pub mod pattern;

use simple_xml_builder::XMLElement;

use crate::models::{
    BackgroundPattern, DecorShape, DecorativeElement, DesignType, GeneratedDesign,
};
use layout::{
    BlockDecoration, BlockWidth, EmojiBacking, EmojiPlacement, EmojiTreatment, HAlign,
    LayoutBundle, RotatePivot, Shadow, TextTreatment, VArrange,
};
use pattern::BackgroundFill;

/// Font stack for every design surface, Thai coverage first.
pub const FONT_FAMILY: &str = "'Noto Sans Thai', 'Noto Sans', sans-serif";

pub const FOOTER_TEXT: &str = "Copyright © โดย วิทยาลัยการอาชีพบ้านผือ";
const FOOTER_SIZE_PX: f32 = 10.0;
const FOOTER_OPACITY: f32 = 0.6;
const FOOTER_LIFT_PX: f32 = 14.0;

/// Decorative shapes are dimmed to this factor when a non-solid pattern sits
/// behind them. Applied at render time only; the stored opacity is kept.
pub const PATTERNED_DECOR_DAMPING: f32 = 0.7;

/// Average glyph advance as a fraction of the font size. Line breaking works
/// on this estimate instead of font metrics.
const GLYPH_WIDTH_FACTOR: f32 = 0.55;

/// Baseline offset from the top of a line box.
const BASELINE_FACTOR: f32 = 0.8;

/// Composes the complete design surface as an SVG document: background fill,
/// blurred decorative layer, typographic content and the footer line.
pub fn compose_svg(design: &GeneratedDesign, design_type: DesignType) -> String {
    let (w, h) = design_type.canvas_size();
    let (w, h) = (w as f32, h as f32);
    let bundle = layout::resolve(design.layout_style);
    let fill = pattern::resolve(
        design.background_pattern,
        &design.accent_color,
        &design.background_color,
    );

    let mut svg = XMLElement::new("svg");
    svg.add_attribute("xmlns", "http://www.w3.org/2000/svg");
    svg.add_attribute("width", &w.to_string());
    svg.add_attribute("height", &h.to_string());
    svg.add_attribute("viewBox", &format!("0 0 {} {}", w, h));
    svg.add_attribute("font-family", FONT_FAMILY);

    svg.add_child(defs(design, &fill));
    for node in background_nodes(&fill, w, h) {
        svg.add_child(node);
    }

    let damping = if design.background_pattern == BackgroundPattern::Solid {
        1.0
    } else {
        PATTERNED_DECOR_DAMPING
    };
    for el in &design.decorative_elements {
        svg.add_child(decor_node(el, w, h, damping));
    }

    for node in content_nodes(design, &bundle, w, h) {
        svg.add_child(node);
    }
    svg.add_child(footer_node(&design.text_color, &bundle, w, h));

    svg.to_string()
}

fn defs(design: &GeneratedDesign, fill: &BackgroundFill) -> XMLElement {
    let mut defs = XMLElement::new("defs");

    // One blur filter per distinct radius among the decorative elements.
    let mut radii: Vec<f32> = Vec::new();
    for el in &design.decorative_elements {
        if !radii.contains(&el.blur_px) {
            radii.push(el.blur_px);
        }
    }
    for radius in radii {
        let mut filter = XMLElement::new("filter");
        filter.add_attribute("id", &blur_id(radius));
        // Wide region so heavily blurred shapes are not clipped.
        filter.add_attribute("x", "-150%");
        filter.add_attribute("y", "-150%");
        filter.add_attribute("width", "400%");
        filter.add_attribute("height", "400%");
        let mut blur = XMLElement::new("feGaussianBlur");
        blur.add_attribute("stdDeviation", &radius.to_string());
        filter.add_child(blur);
        defs.add_child(filter);
    }

    defs.add_child(shadow_filter("shadow-sm", 1.0, 1.0, 0.05));
    defs.add_child(shadow_filter("shadow-lg", 8.0, 8.0, 0.15));

    for node in fill_defs(fill) {
        defs.add_child(node);
    }

    defs
}

fn blur_id(radius: f32) -> String {
    format!("blur-{}", radius as u32)
}

fn shadow_filter(id: &str, dy: f32, std_dev: f32, opacity: f32) -> XMLElement {
    let mut filter = XMLElement::new("filter");
    filter.add_attribute("id", id);
    filter.add_attribute("x", "-40%");
    filter.add_attribute("y", "-40%");
    filter.add_attribute("width", "180%");
    filter.add_attribute("height", "180%");
    let mut shadow = XMLElement::new("feDropShadow");
    shadow.add_attribute("dx", "0");
    shadow.add_attribute("dy", &dy.to_string());
    shadow.add_attribute("stdDeviation", &std_dev.to_string());
    shadow.add_attribute("flood-color", "#000000");
    shadow.add_attribute("flood-opacity", &opacity.to_string());
    filter.add_child(shadow);
    filter
}

fn shadow_url(shadow: Shadow) -> Option<&'static str> {
    match shadow {
        Shadow::None => None,
        Shadow::Small => Some("url(#shadow-sm)"),
        Shadow::Large => Some("url(#shadow-lg)"),
    }
}

fn fill_defs(fill: &BackgroundFill) -> Vec<XMLElement> {
    match fill {
        BackgroundFill::Solid { .. } => Vec::new(),
        BackgroundFill::Dots { dot, .. } => {
            let mut motif = XMLElement::new("pattern");
            motif.add_attribute("id", "bg-motif");
            motif.add_attribute("width", &pattern::DOT_TILE_PX.to_string());
            motif.add_attribute("height", &pattern::DOT_TILE_PX.to_string());
            motif.add_attribute("patternUnits", "userSpaceOnUse");
            let mut dot_el = XMLElement::new("circle");
            dot_el.add_attribute("cx", &(pattern::DOT_TILE_PX / 2.0).to_string());
            dot_el.add_attribute("cy", &(pattern::DOT_TILE_PX / 2.0).to_string());
            dot_el.add_attribute("r", &pattern::DOT_RADIUS_PX.to_string());
            dot_el.add_attribute("fill", &dot.color);
            dot_el.add_attribute("fill-opacity", &dot.opacity.to_string());
            motif.add_child(dot_el);
            vec![motif]
        }
        BackgroundFill::Grid { line, .. } => {
            let tile = pattern::GRID_TILE_PX;
            let mut motif = XMLElement::new("pattern");
            motif.add_attribute("id", "bg-motif");
            motif.add_attribute("width", &tile.to_string());
            motif.add_attribute("height", &tile.to_string());
            motif.add_attribute("patternUnits", "userSpaceOnUse");
            let mut path = XMLElement::new("path");
            path.add_attribute("d", &format!("M {} 0 L 0 0 0 {}", tile, tile));
            path.add_attribute("fill", "none");
            path.add_attribute("stroke", &line.color);
            path.add_attribute("stroke-opacity", &line.opacity.to_string());
            path.add_attribute("stroke-width", "1");
            motif.add_child(path);
            vec![motif]
        }
        BackgroundFill::Lines { line, .. } => {
            let period = pattern::LINES_TILE_PX * std::f32::consts::SQRT_2 / 2.0;
            let mut motif = XMLElement::new("pattern");
            motif.add_attribute("id", "bg-motif");
            motif.add_attribute("width", &period.to_string());
            motif.add_attribute("height", &period.to_string());
            motif.add_attribute("patternUnits", "userSpaceOnUse");
            motif.add_attribute("patternTransform", "rotate(45)");
            let mut stripe = XMLElement::new("rect");
            stripe.add_attribute("width", "1");
            stripe.add_attribute("height", &period.to_string());
            stripe.add_attribute("fill", &line.color);
            stripe.add_attribute("fill-opacity", &line.opacity.to_string());
            motif.add_child(stripe);
            vec![motif]
        }
        BackgroundFill::Gradient { base, to } => {
            // 135 degrees in CSS terms: top-left toward bottom-right.
            let mut grad = XMLElement::new("linearGradient");
            grad.add_attribute("id", "bg-grad");
            grad.add_attribute("x1", "0");
            grad.add_attribute("y1", "0");
            grad.add_attribute("x2", "1");
            grad.add_attribute("y2", "1");
            let mut from_stop = XMLElement::new("stop");
            from_stop.add_attribute("offset", "0");
            from_stop.add_attribute("stop-color", base);
            let mut to_stop = XMLElement::new("stop");
            to_stop.add_attribute("offset", "1");
            to_stop.add_attribute("stop-color", &to.color);
            to_stop.add_attribute("stop-opacity", &to.opacity.to_string());
            grad.add_child(from_stop);
            grad.add_child(to_stop);
            vec![grad]
        }
        BackgroundFill::Mesh { focals, .. } => focals
            .iter()
            .enumerate()
            .map(|(i, focal)| {
                let mut grad = XMLElement::new("radialGradient");
                grad.add_attribute("id", &format!("bg-mesh-{}", i));
                grad.add_attribute("cx", &focal.cx_frac.to_string());
                grad.add_attribute("cy", &focal.cy_frac.to_string());
                grad.add_attribute("r", "0.5");
                let mut from_stop = XMLElement::new("stop");
                from_stop.add_attribute("offset", "0");
                from_stop.add_attribute("stop-color", &focal.tint.color);
                from_stop.add_attribute("stop-opacity", &focal.tint.opacity.to_string());
                let mut to_stop = XMLElement::new("stop");
                to_stop.add_attribute("offset", "1");
                to_stop.add_attribute("stop-color", &focal.tint.color);
                to_stop.add_attribute("stop-opacity", "0");
                grad.add_child(from_stop);
                grad.add_child(to_stop);
                grad
            })
            .collect(),
    }
}

fn full_rect(w: f32, h: f32, fill: &str) -> XMLElement {
    let mut rect = XMLElement::new("rect");
    rect.add_attribute("x", "0");
    rect.add_attribute("y", "0");
    rect.add_attribute("width", &w.to_string());
    rect.add_attribute("height", &h.to_string());
    rect.add_attribute("fill", fill);
    rect
}

fn background_nodes(fill: &BackgroundFill, w: f32, h: f32) -> Vec<XMLElement> {
    match fill {
        BackgroundFill::Solid { base } => vec![full_rect(w, h, base)],
        BackgroundFill::Dots { base, .. }
        | BackgroundFill::Grid { base, .. }
        | BackgroundFill::Lines { base, .. } => vec![
            full_rect(w, h, base),
            full_rect(w, h, "url(#bg-motif)"),
        ],
        BackgroundFill::Gradient { base, .. } => {
            vec![full_rect(w, h, base), full_rect(w, h, "url(#bg-grad)")]
        }
        BackgroundFill::Mesh { base, focals } => {
            let mut nodes = vec![full_rect(w, h, base)];
            for i in 0..focals.len() {
                nodes.push(full_rect(w, h, &format!("url(#bg-mesh-{})", i)));
            }
            nodes
        }
    }
}

fn decor_node(el: &DecorativeElement, w: f32, h: f32, damping: f32) -> XMLElement {
    let cx = el.left_pct / 100.0 * w;
    let cy = el.top_pct / 100.0 * h;

    let mut node = match &el.shape {
        DecorShape::Circle => {
            let mut circle = XMLElement::new("circle");
            circle.add_attribute("r", &(el.size_px / 2.0).to_string());
            circle
        }
        DecorShape::Blob { corner_radii } => {
            let mut path = XMLElement::new("path");
            path.add_attribute("d", &blob_path(el.size_px, *corner_radii));
            path
        }
    };
    node.add_attribute(
        "transform",
        &format!("translate({} {}) rotate({})", cx, cy, el.rotation_deg),
    );
    node.add_attribute("fill", &el.color);
    node.add_attribute("opacity", &(el.opacity * damping).to_string());
    node.add_attribute("filter", &format!("url(#{})", blur_id(el.blur_px)));
    node
}

/// Rounded-rect path with one radius per corner (top-left, top-right,
/// bottom-right, bottom-left), centered on the origin. Adjacent radii are
/// scaled down together when they would overlap, as CSS does.
fn blob_path(size: f32, radii_pct: [f32; 4]) -> String {
    let half = size / 2.0;
    let mut radii = radii_pct.map(|pct| pct / 100.0 * size);
    let mut scale = 1.0f32;
    for (a, b) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
        let sum = radii[a] + radii[b];
        if sum > size {
            scale = scale.min(size / sum);
        }
    }
    for radius in &mut radii {
        *radius *= scale;
    }
    let [r0, r1, r2, r3] = radii;

    format!(
        "M {} {} H {} A {} {} 0 0 1 {} {} V {} A {} {} 0 0 1 {} {} H {} A {} {} 0 0 1 {} {} V {} A {} {} 0 0 1 {} {} Z",
        px(-half + r0),
        px(-half),
        px(half - r1),
        px(r1),
        px(r1),
        px(half),
        px(-half + r1),
        px(half - r2),
        px(r2),
        px(r2),
        px(half - r2),
        px(half),
        px(-half + r3),
        px(r3),
        px(r3),
        px(-half),
        px(half - r3),
        px(-half + r0),
        px(r0),
        px(r0),
        px(-half + r0),
        px(-half),
    )
}

/// Path coordinates rounded to two decimals, with float noise trimmed.
fn px(value: f32) -> String {
    let mut s = format!("{:.2}", value);
    while s.ends_with('0') {
        s.pop();
    }
    if s.ends_with('.') {
        s.pop();
    }
    if s == "-0" {
        s = "0".to_string();
    }
    s
}

enum Slot<'a> {
    Emoji {
        glyph: &'a str,
        treatment: &'a EmojiTreatment,
    },
    Text(TextBlock<'a>),
}

impl Slot<'_> {
    fn height(&self) -> f32 {
        match self {
            Slot::Emoji { treatment, .. } => emoji_box_side(treatment),
            Slot::Text(block) => block.height(),
        }
    }

    fn margin_bottom(&self) -> f32 {
        match self {
            Slot::Emoji { treatment, .. } => treatment.margin_bottom,
            Slot::Text(block) => block.treatment.margin_bottom,
        }
    }
}

struct TextBlock<'a> {
    lines: Vec<String>,
    treatment: &'a TextTreatment,
    fill: &'a str,
    block_w: f32,
}

impl TextBlock<'_> {
    fn text_height(&self) -> f32 {
        self.lines.len() as f32 * self.treatment.line_height
    }

    fn height(&self) -> f32 {
        let text_h = self.text_height();
        match self.treatment.decoration {
            BlockDecoration::TopRule { rule_px, gap_px } => rule_px + gap_px + text_h,
            BlockDecoration::Pill { pad_y_px, .. } => text_h + 2.0 * pad_y_px,
            BlockDecoration::Card { pad_px, .. } => text_h + 2.0 * pad_px,
            _ => text_h,
        }
    }
}

fn emoji_box_side(treatment: &EmojiTreatment) -> f32 {
    match treatment.backing {
        EmojiBacking::None => treatment.font_size,
        _ => treatment.font_size + 2.0 * treatment.backing_pad_px,
    }
}

fn text_block<'a>(
    text: &str,
    treatment: &'a TextTreatment,
    fill: &'a str,
    content_w: f32,
) -> Option<TextBlock<'a>> {
    if text.trim().is_empty() {
        return None;
    }
    let block_w = match treatment.width {
        BlockWidth::Full => content_w,
        BlockWidth::Px(width) => width.min(content_w),
        BlockWidth::Frac(frac) => content_w * frac,
    };
    let wrap_w = match treatment.decoration {
        BlockDecoration::LeftRule { rule_px, gap_px } => block_w - rule_px - gap_px,
        BlockDecoration::Pill { pad_x_px, .. } => block_w - 2.0 * pad_x_px,
        BlockDecoration::Card { pad_px, .. } => block_w - 2.0 * pad_px,
        _ => block_w,
    };
    let shown = if treatment.uppercase {
        text.to_uppercase()
    } else {
        text.to_string()
    };
    let lines = wrap_text(&shown, wrap_w, treatment.font_size);
    if lines.is_empty() {
        return None;
    }
    Some(TextBlock {
        lines,
        treatment,
        fill,
        block_w,
    })
}

fn content_nodes(
    design: &GeneratedDesign,
    bundle: &LayoutBundle,
    w: f32,
    h: f32,
) -> Vec<XMLElement> {
    let mut nodes = Vec::new();

    if bundle.frame_px > 0.0 {
        // The stroke sits astride the path, so inset by half its width.
        let inset = bundle.frame_px / 2.0;
        let mut frame = XMLElement::new("rect");
        frame.add_attribute("x", &inset.to_string());
        frame.add_attribute("y", &inset.to_string());
        frame.add_attribute("width", &(w - bundle.frame_px).to_string());
        frame.add_attribute("height", &(h - bundle.frame_px).to_string());
        frame.add_attribute("fill", "none");
        frame.add_attribute("stroke", &design.accent_color);
        frame.add_attribute("stroke-width", &bundle.frame_px.to_string());
        nodes.push(frame);
    }

    if let EmojiPlacement::TopRightCorner { offset_px } = bundle.emoji.placement {
        if !design.emoji_icon.trim().is_empty() {
            nodes.push(corner_emoji_node(
                &design.emoji_icon,
                &bundle.emoji,
                offset_px,
                bundle.frame_px,
                w,
            ));
        }
    }

    let pad = bundle.frame_px + bundle.padding_px;
    let content_x = pad;
    let content_w = w - 2.0 * pad;
    let content_top = pad;
    let content_bottom = h - pad;

    let mut slots: Vec<Slot> = Vec::new();
    if matches!(bundle.emoji.placement, EmojiPlacement::Inline)
        && !design.emoji_icon.trim().is_empty()
    {
        slots.push(Slot::Emoji {
            glyph: &design.emoji_icon,
            treatment: &bundle.emoji,
        });
    }
    let headline_fill: &str = if bundle.accent_headline {
        &design.accent_color
    } else {
        &design.text_color
    };
    let text_slots: [(&String, &TextTreatment, &str); 3] = [
        (&design.headline, &bundle.headline, headline_fill),
        (&design.subheadline, &bundle.subheadline, &design.text_color),
        (&design.body_text, &bundle.body, &design.text_color),
    ];
    for (text, treatment, fill) in text_slots {
        if let Some(block) = text_block(text, treatment, fill, content_w) {
            slots.push(Slot::Text(block));
        }
    }

    let total: f32 = slots.iter().map(|s| s.height() + s.margin_bottom()).sum();
    let start_y = match bundle.varrange {
        VArrange::Center => content_top + ((content_bottom - content_top) - total) / 2.0,
        VArrange::End => content_bottom - total,
        VArrange::SpaceBetween => content_top,
    };

    let last = slots.len().saturating_sub(1);
    let mut cursor = start_y;
    for (i, slot) in slots.iter().enumerate() {
        let y = if bundle.varrange == VArrange::SpaceBetween && i == last && slots.len() > 1 {
            content_bottom - slot.height() - slot.margin_bottom()
        } else {
            cursor
        };
        match slot {
            Slot::Emoji { glyph, treatment } => nodes.extend(inline_emoji_nodes(
                glyph,
                treatment,
                content_x,
                content_w,
                y,
                bundle.halign,
            )),
            Slot::Text(block) => nodes.push(text_block_node(
                block,
                content_x,
                content_w,
                y,
                &design.text_color,
                bundle.halign,
            )),
        }
        cursor = y + slot.height() + slot.margin_bottom();
    }

    nodes
}

fn text_block_node(
    block: &TextBlock,
    content_x: f32,
    content_w: f32,
    y: f32,
    text_color: &str,
    halign: HAlign,
) -> XMLElement {
    let t = block.treatment;
    let block_x = match halign {
        HAlign::Left => content_x,
        HAlign::Center => content_x + (content_w - block.block_w) / 2.0,
    };

    let mut group = XMLElement::new("g");
    if t.rotation_deg != 0.0 {
        let (pivot_x, pivot_y) = match t.pivot {
            RotatePivot::BottomLeft => (block_x, y + block.height()),
            RotatePivot::Center => (
                block_x + block.block_w / 2.0,
                y + block.height() / 2.0,
            ),
        };
        group.add_attribute(
            "transform",
            &format!("rotate({} {} {})", t.rotation_deg, pivot_x, pivot_y),
        );
    }
    if t.opacity < 1.0 {
        group.add_attribute("opacity", &t.opacity.to_string());
    }

    let text_h = block.text_height();
    let (text_x, text_top) = match t.decoration {
        BlockDecoration::None => (block_x, y),
        BlockDecoration::LeftRule { rule_px, gap_px } => {
            let mut rule = XMLElement::new("rect");
            rule.add_attribute("x", &block_x.to_string());
            rule.add_attribute("y", &y.to_string());
            rule.add_attribute("width", &rule_px.to_string());
            rule.add_attribute("height", &text_h.to_string());
            rule.add_attribute("fill", text_color);
            group.add_child(rule);
            (block_x + rule_px + gap_px, y)
        }
        BlockDecoration::TopRule { rule_px, gap_px } => {
            let mut rule = XMLElement::new("rect");
            rule.add_attribute("x", &block_x.to_string());
            rule.add_attribute("y", &y.to_string());
            rule.add_attribute("width", &block.block_w.to_string());
            rule.add_attribute("height", &rule_px.to_string());
            rule.add_attribute("fill", text_color);
            group.add_child(rule);
            (block_x, y + rule_px + gap_px)
        }
        BlockDecoration::Pill {
            fill_opacity,
            pad_x_px,
            pad_y_px,
        } => {
            let widest = block
                .lines
                .iter()
                .map(|line| estimate_width(line, t.font_size))
                .fold(0.0, f32::max);
            let pill_w = widest + 2.0 * pad_x_px;
            let pill_h = text_h + 2.0 * pad_y_px;
            let pill_x = match halign {
                HAlign::Left => block_x,
                HAlign::Center => content_x + (content_w - pill_w) / 2.0,
            };
            let mut pill = XMLElement::new("rect");
            pill.add_attribute("x", &pill_x.to_string());
            pill.add_attribute("y", &y.to_string());
            pill.add_attribute("width", &pill_w.to_string());
            pill.add_attribute("height", &pill_h.to_string());
            pill.add_attribute("rx", &(pill_h / 2.0).to_string());
            pill.add_attribute("fill", "#FFFFFF");
            pill.add_attribute("fill-opacity", &fill_opacity.to_string());
            group.add_child(pill);
            (pill_x + pad_x_px, y + pad_y_px)
        }
        BlockDecoration::Card {
            fill_opacity,
            pad_px,
            radius_px,
        } => {
            let mut card = XMLElement::new("rect");
            card.add_attribute("x", &block_x.to_string());
            card.add_attribute("y", &y.to_string());
            card.add_attribute("width", &block.block_w.to_string());
            card.add_attribute("height", &(text_h + 2.0 * pad_px).to_string());
            card.add_attribute("rx", &radius_px.to_string());
            card.add_attribute("fill", "#FFFFFF");
            card.add_attribute("fill-opacity", &fill_opacity.to_string());
            if let Some(url) = shadow_url(t.shadow) {
                card.add_attribute("filter", url);
            }
            group.add_child(card);
            (block_x + pad_px, y + pad_px)
        }
    };

    let text_shadow = if matches!(t.decoration, BlockDecoration::Card { .. }) {
        // The card already carries the shadow.
        None
    } else {
        shadow_url(t.shadow)
    };

    for (i, line) in block.lines.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        let mut text = XMLElement::new("text");
        match halign {
            HAlign::Left => text.add_attribute("x", &text_x.to_string()),
            HAlign::Center => {
                text.add_attribute("x", &(content_x + content_w / 2.0).to_string());
                text.add_attribute("text-anchor", "middle");
            }
        }
        let baseline = text_top + BASELINE_FACTOR * t.font_size + i as f32 * t.line_height;
        text.add_attribute("y", &baseline.to_string());
        text.add_attribute("font-size", &t.font_size.to_string());
        text.add_attribute("font-weight", &t.font_weight.to_string());
        text.add_attribute("fill", block.fill);
        if t.letter_spacing != 0.0 {
            text.add_attribute("letter-spacing", &t.letter_spacing.to_string());
        }
        if t.italic {
            text.add_attribute("font-style", "italic");
        }
        if let Some(url) = text_shadow {
            text.add_attribute("filter", url);
        }
        text.add_text(line);
        group.add_child(text);
    }

    group
}

fn inline_emoji_nodes(
    glyph: &str,
    treatment: &EmojiTreatment,
    content_x: f32,
    content_w: f32,
    y: f32,
    halign: HAlign,
) -> Vec<XMLElement> {
    let side = emoji_box_side(treatment);
    let box_x = match halign {
        HAlign::Left => content_x,
        HAlign::Center => content_x + (content_w - side) / 2.0,
    };

    let mut nodes = Vec::new();
    match treatment.backing {
        EmojiBacking::Rounded {
            fill_opacity,
            radius_px,
        } => {
            let mut backing = XMLElement::new("rect");
            backing.add_attribute("x", &box_x.to_string());
            backing.add_attribute("y", &y.to_string());
            backing.add_attribute("width", &side.to_string());
            backing.add_attribute("height", &side.to_string());
            backing.add_attribute("rx", &radius_px.to_string());
            backing.add_attribute("fill", "#FFFFFF");
            backing.add_attribute("fill-opacity", &fill_opacity.to_string());
            if let Some(url) = shadow_url(treatment.shadow) {
                backing.add_attribute("filter", url);
            }
            nodes.push(backing);
        }
        EmojiBacking::Circle { fill_opacity } => {
            let mut backing = XMLElement::new("circle");
            backing.add_attribute("cx", &(box_x + side / 2.0).to_string());
            backing.add_attribute("cy", &(y + side / 2.0).to_string());
            backing.add_attribute("r", &(side / 2.0).to_string());
            backing.add_attribute("fill", "#FFFFFF");
            backing.add_attribute("fill-opacity", &fill_opacity.to_string());
            nodes.push(backing);
        }
        EmojiBacking::None => {}
    }

    let mut text = XMLElement::new("text");
    text.add_attribute("x", &(box_x + side / 2.0).to_string());
    text.add_attribute(
        "y",
        &(y + (side - treatment.font_size) / 2.0 + BASELINE_FACTOR * treatment.font_size)
            .to_string(),
    );
    text.add_attribute("text-anchor", "middle");
    text.add_attribute("font-size", &treatment.font_size.to_string());
    if treatment.opacity < 1.0 {
        text.add_attribute("opacity", &treatment.opacity.to_string());
    }
    // Bare glyphs carry their own shadow; backed ones put it on the backing.
    if matches!(treatment.backing, EmojiBacking::None) {
        if let Some(url) = shadow_url(treatment.shadow) {
            text.add_attribute("filter", url);
        }
    }
    text.add_text(glyph);
    nodes.push(text);
    nodes
}

fn corner_emoji_node(
    glyph: &str,
    treatment: &EmojiTreatment,
    offset: f32,
    frame: f32,
    w: f32,
) -> XMLElement {
    let side = emoji_box_side(treatment);
    let box_x = w - frame - offset - side;
    let box_y = frame + offset;
    let cx = box_x + side / 2.0;
    let cy = box_y + side / 2.0;

    let mut group = XMLElement::new("g");
    if treatment.rotation_deg != 0.0 {
        group.add_attribute(
            "transform",
            &format!("rotate({} {} {})", treatment.rotation_deg, cx, cy),
        );
    }
    if treatment.opacity < 1.0 {
        group.add_attribute("opacity", &treatment.opacity.to_string());
    }

    match treatment.backing {
        EmojiBacking::Circle { fill_opacity } => {
            let mut backing = XMLElement::new("circle");
            backing.add_attribute("cx", &cx.to_string());
            backing.add_attribute("cy", &cy.to_string());
            backing.add_attribute("r", &(side / 2.0).to_string());
            backing.add_attribute("fill", "#FFFFFF");
            backing.add_attribute("fill-opacity", &fill_opacity.to_string());
            group.add_child(backing);
        }
        EmojiBacking::Rounded {
            fill_opacity,
            radius_px,
        } => {
            let mut backing = XMLElement::new("rect");
            backing.add_attribute("x", &box_x.to_string());
            backing.add_attribute("y", &box_y.to_string());
            backing.add_attribute("width", &side.to_string());
            backing.add_attribute("height", &side.to_string());
            backing.add_attribute("rx", &radius_px.to_string());
            backing.add_attribute("fill", "#FFFFFF");
            backing.add_attribute("fill-opacity", &fill_opacity.to_string());
            group.add_child(backing);
        }
        EmojiBacking::None => {}
    }

    let mut text = XMLElement::new("text");
    text.add_attribute("x", &cx.to_string());
    text.add_attribute(
        "y",
        &(box_y + (side - treatment.font_size) / 2.0 + BASELINE_FACTOR * treatment.font_size)
            .to_string(),
    );
    text.add_attribute("text-anchor", "middle");
    text.add_attribute("font-size", &treatment.font_size.to_string());
    text.add_text(glyph);
    group.add_child(text);

    group
}

fn footer_node(text_color: &str, bundle: &LayoutBundle, w: f32, h: f32) -> XMLElement {
    let mut text = XMLElement::new("text");
    text.add_attribute("x", &(w / 2.0).to_string());
    text.add_attribute("y", &(h - bundle.frame_px - FOOTER_LIFT_PX).to_string());
    text.add_attribute("text-anchor", "middle");
    text.add_attribute("font-size", &FOOTER_SIZE_PX.to_string());
    text.add_attribute("font-weight", "300");
    text.add_attribute("fill", text_color);
    text.add_attribute("opacity", &FOOTER_OPACITY.to_string());
    text.add_text(FOOTER_TEXT);
    text
}

/// Greedy line breaking on the average-advance estimate. Splits on
/// whitespace; unspaced runs (Thai text usually is one) are broken at the
/// character limit.
fn wrap_text(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let per_char = font_size * GLYPH_WIDTH_FACTOR;
    let max_chars = ((max_width / per_char) as usize).max(1);

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max_chars {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for chunk in chars.chunks(max_chars) {
                if chunk.len() == max_chars {
                    lines.push(chunk.iter().collect());
                } else {
                    current = chunk.iter().collect();
                    current_len = chunk.len();
                }
            }
            continue;
        }
        let needed = if current.is_empty() {
            word_len
        } else {
            current_len + 1 + word_len
        };
        if needed > max_chars && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
            current_len = needed;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn estimate_width(line: &str, font_size: f32) -> f32 {
    line.chars().count() as f32 * font_size * GLYPH_WIDTH_FACTOR
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LayoutStyle, WHITE_SUBSTITUTE};
    use chrono::Utc;
    use uuid::Uuid;

    fn sample_design(style: LayoutStyle, pattern: BackgroundPattern) -> GeneratedDesign {
        GeneratedDesign {
            headline: "Open House".to_string(),
            subheadline: "วิทยาลัยการอาชีพบ้านผือ".to_string(),
            body_text: "เปิดบ้านต้อนรับนักเรียนใหม่ พบกับกิจกรรมมากมาย".to_string(),
            accent_color: "#FF8F8F".to_string(),
            background_color: "#FFFFFF".to_string(),
            text_color: "#1F2937".to_string(),
            emoji_icon: "🎉".to_string(),
            layout_style: style,
            background_pattern: pattern,
            decorative_elements: vec![
                DecorativeElement {
                    id: Uuid::new_v4(),
                    shape: DecorShape::Blob {
                        corner_radii: [30.0, 45.0, 60.0, 35.0],
                    },
                    top_pct: 20.0,
                    left_pct: 80.0,
                    size_px: 300.0,
                    color: "#C2E2FA".to_string(),
                    opacity: 0.5,
                    rotation_deg: 45.0,
                    blur_px: 60.0,
                },
                DecorativeElement {
                    id: Uuid::new_v4(),
                    shape: DecorShape::Circle,
                    top_pct: -5.0,
                    left_pct: 10.0,
                    size_px: 200.0,
                    color: "#B7A3E3".to_string(),
                    opacity: 0.3,
                    rotation_deg: 0.0,
                    blur_px: 60.0,
                },
            ],
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn output_is_a_standalone_svg_document() {
        let design = sample_design(LayoutStyle::Minimal, BackgroundPattern::Solid);
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<svg"));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn canvas_size_follows_the_design_type() {
        let design = sample_design(LayoutStyle::Minimal, BackgroundPattern::Solid);
        let svg = compose_svg(&design, DesignType::Banner);
        assert!(svg.contains("width=\"800\""));
        assert!(svg.contains("height=\"300\""));
        assert!(svg.contains("viewBox=\"0 0 800 300\""));
    }

    #[test]
    fn white_background_renders_as_light_gray() {
        let design = sample_design(LayoutStyle::Minimal, BackgroundPattern::Solid);
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(svg.contains(WHITE_SUBSTITUTE));
    }

    #[test]
    fn bold_headline_is_accent_colored_and_uppercased() {
        let design = sample_design(LayoutStyle::Bold, BackgroundPattern::Solid);
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(svg.contains("OPEN HOUSE"));
        assert!(svg.contains("fill=\"#FF8F8F\""));
        assert!(svg.contains("stroke=\"#FF8F8F\""));
        assert!(svg.contains("stroke-width=\"16\""));
    }

    #[test]
    fn minimal_headline_keeps_the_text_color() {
        let design = sample_design(LayoutStyle::Minimal, BackgroundPattern::Solid);
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(svg.contains("Open House"));
        assert!(!svg.contains("OPEN HOUSE"));
        assert!(svg.contains("fill=\"#1F2937\""));
    }

    #[test]
    fn decor_is_dimmed_over_patterns_only() {
        let solid = sample_design(LayoutStyle::Minimal, BackgroundPattern::Solid);
        let svg = compose_svg(&solid, DesignType::Poster);
        assert!(svg.contains("opacity=\"0.5\""));

        let dotted = sample_design(LayoutStyle::Minimal, BackgroundPattern::Dots);
        let svg = compose_svg(&dotted, DesignType::Poster);
        assert!(svg.contains("opacity=\"0.35\""));
        assert!(!svg.contains("opacity=\"0.5\""));
    }

    #[test]
    fn decor_shapes_are_blurred() {
        let design = sample_design(LayoutStyle::Minimal, BackgroundPattern::Solid);
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(svg.contains("id=\"blur-60\""));
        assert!(svg.contains("filter=\"url(#blur-60)\""));
        assert!(svg.contains("stdDeviation=\"60\""));
    }

    #[test]
    fn solid_background_emits_no_motif_defs() {
        let design = sample_design(LayoutStyle::Minimal, BackgroundPattern::Solid);
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(!svg.contains("bg-motif"));
        assert!(!svg.contains("bg-grad"));
        assert!(!svg.contains("bg-mesh"));
    }

    #[test]
    fn dots_background_tiles_an_accent_motif() {
        let design = sample_design(LayoutStyle::Minimal, BackgroundPattern::Dots);
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(svg.contains("fill=\"url(#bg-motif)\""));
        assert!(svg.contains("fill-opacity=\"0.2\""));
    }

    #[test]
    fn mesh_background_layers_three_highlights() {
        let design = sample_design(LayoutStyle::Minimal, BackgroundPattern::Mesh);
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(svg.contains("url(#bg-mesh-0)"));
        assert!(svg.contains("url(#bg-mesh-1)"));
        assert!(svg.contains("url(#bg-mesh-2)"));
    }

    #[test]
    fn creative_pins_a_rotated_emoji_to_the_corner() {
        let design = sample_design(LayoutStyle::Creative, BackgroundPattern::Solid);
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(svg.contains("rotate(12"));
        assert!(svg.contains("🎉"));
    }

    #[test]
    fn footer_is_always_present() {
        for style in [
            LayoutStyle::Minimal,
            LayoutStyle::Bold,
            LayoutStyle::Creative,
            LayoutStyle::Modern,
        ] {
            let design = sample_design(style, BackgroundPattern::Solid);
            let svg = compose_svg(&design, DesignType::SocialPost);
            assert!(svg.contains(FOOTER_TEXT));
        }
    }

    #[test]
    fn markup_is_escaped() {
        let mut design = sample_design(LayoutStyle::Minimal, BackgroundPattern::Solid);
        design.headline = "A & B <script>".to_string();
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(svg.contains("A &amp; B &lt;script&gt;"));
        assert!(!svg.contains("<script>"));
    }

    #[test]
    fn blob_and_circle_shapes_both_render() {
        let design = sample_design(LayoutStyle::Minimal, BackgroundPattern::Solid);
        let svg = compose_svg(&design, DesignType::Poster);
        assert!(svg.contains("<path"));
        assert!(svg.contains("r=\"100\""));
    }

    #[test]
    fn blob_path_scales_overlapping_radii() {
        // 70% + 70% of the side overlap, so radii shrink to meet halfway.
        let d = blob_path(100.0, [70.0, 70.0, 70.0, 70.0]);
        assert!(d.contains("A 50 50"));
        assert!(!d.contains("A 70 70"));
    }

    #[test]
    fn wrap_keeps_short_text_on_one_line() {
        let lines = wrap_text("Hello world", 500.0, 16.0);
        assert_eq!(lines, vec!["Hello world".to_string()]);
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps over the lazy dog", 88.0, 16.0);
        // 88 / (16 * 0.55) = 10 chars per line.
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 10, "line too long: {:?}", line);
        }
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_splits_unspaced_runs() {
        let lines = wrap_text("เปิดรับสมัครนักศึกษาใหม่ประจำปีการศึกษา", 88.0, 16.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(line.chars().count() <= 10);
        }
    }

    #[test]
    fn wrap_of_blank_text_yields_nothing() {
        assert!(wrap_text("   ", 100.0, 16.0).is_empty());
    }
}
