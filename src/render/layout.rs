// src/render/layout.rs
use crate::models::LayoutStyle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VArrange {
    /// Blocks centered as a group inside the content box.
    Center,
    /// Blocks pushed to the bottom of the content box.
    End,
    /// Blocks stacked from the top with the last block anchored to the
    /// bottom edge.
    SpaceBetween,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmojiPlacement {
    /// Flows above the headline.
    Inline,
    /// Pinned near the top-right corner, offset from both edges.
    TopRightCorner { offset_px: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmojiBacking {
    None,
    Rounded { fill_opacity: f32, radius_px: f32 },
    Circle { fill_opacity: f32 },
}

/// How wide a text block may grow before wrapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockWidth {
    Full,
    Px(f32),
    Frac(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shadow {
    None,
    Small,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotatePivot {
    BottomLeft,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BlockDecoration {
    None,
    /// Vertical rule along the left edge, drawn in the text color.
    LeftRule { rule_px: f32, gap_px: f32 },
    /// Horizontal rule across the top, drawn in the text color.
    TopRule { rule_px: f32, gap_px: f32 },
    /// Translucent white pill hugging the text.
    Pill {
        fill_opacity: f32,
        pad_x_px: f32,
        pad_y_px: f32,
    },
    /// Translucent white card behind the whole block.
    Card {
        fill_opacity: f32,
        pad_px: f32,
        radius_px: f32,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextTreatment {
    pub font_size: f32,
    pub font_weight: u16,
    pub line_height: f32,
    /// Extra glyph advance in px; negative tightens.
    pub letter_spacing: f32,
    pub uppercase: bool,
    pub italic: bool,
    pub opacity: f32,
    pub margin_bottom: f32,
    pub rotation_deg: f32,
    pub pivot: RotatePivot,
    pub width: BlockWidth,
    pub decoration: BlockDecoration,
    pub shadow: Shadow,
}

impl Default for TextTreatment {
    fn default() -> Self {
        TextTreatment {
            font_size: 16.0,
            font_weight: 400,
            line_height: 24.0,
            letter_spacing: 0.0,
            uppercase: false,
            italic: false,
            opacity: 1.0,
            margin_bottom: 0.0,
            rotation_deg: 0.0,
            pivot: RotatePivot::Center,
            width: BlockWidth::Full,
            decoration: BlockDecoration::None,
            shadow: Shadow::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmojiTreatment {
    pub font_size: f32,
    pub placement: EmojiPlacement,
    pub backing: EmojiBacking,
    pub backing_pad_px: f32,
    pub margin_bottom: f32,
    pub rotation_deg: f32,
    pub opacity: f32,
    pub shadow: Shadow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBundle {
    pub padding_px: f32,
    /// Accent-colored frame around the whole canvas; zero everywhere but the
    /// bold style.
    pub frame_px: f32,
    pub halign: HAlign,
    pub varrange: VArrange,
    /// Fill the headline with the accent color instead of the text color.
    pub accent_headline: bool,
    pub headline: TextTreatment,
    pub subheadline: TextTreatment,
    pub body: TextTreatment,
    pub emoji: EmojiTreatment,
}

/// Resolves a layout style to its typographic bundle. Pure; the same style
/// always yields the same bundle.
pub fn resolve(style: LayoutStyle) -> LayoutBundle {
    match style {
        LayoutStyle::Minimal => LayoutBundle {
            padding_px: 48.0,
            frame_px: 0.0,
            halign: HAlign::Left,
            varrange: VArrange::Center,
            accent_headline: false,
            headline: TextTreatment {
                font_size: 36.0,
                font_weight: 700,
                line_height: 40.0,
                letter_spacing: 0.9,
                margin_bottom: 12.0,
                ..TextTreatment::default()
            },
            subheadline: TextTreatment {
                font_size: 18.0,
                line_height: 28.0,
                letter_spacing: 1.8,
                uppercase: true,
                opacity: 0.7,
                margin_bottom: 40.0,
                ..TextTreatment::default()
            },
            body: TextTreatment {
                font_size: 16.0,
                line_height: 32.0,
                width: BlockWidth::Px(448.0),
                decoration: BlockDecoration::LeftRule {
                    rule_px: 2.0,
                    gap_px: 24.0,
                },
                ..TextTreatment::default()
            },
            emoji: EmojiTreatment {
                font_size: 48.0,
                placement: EmojiPlacement::Inline,
                backing: EmojiBacking::Rounded {
                    fill_opacity: 0.6,
                    radius_px: 16.0,
                },
                backing_pad_px: 16.0,
                margin_bottom: 32.0,
                rotation_deg: 0.0,
                opacity: 1.0,
                shadow: Shadow::Small,
            },
        },
        LayoutStyle::Bold => LayoutBundle {
            padding_px: 32.0,
            frame_px: 16.0,
            halign: HAlign::Center,
            varrange: VArrange::Center,
            accent_headline: true,
            headline: TextTreatment {
                font_size: 48.0,
                font_weight: 900,
                line_height: 48.0,
                letter_spacing: -2.4,
                uppercase: true,
                margin_bottom: 16.0,
                shadow: Shadow::Small,
                ..TextTreatment::default()
            },
            subheadline: TextTreatment {
                font_size: 24.0,
                font_weight: 700,
                line_height: 32.0,
                opacity: 0.9,
                margin_bottom: 24.0,
                decoration: BlockDecoration::Pill {
                    fill_opacity: 0.4,
                    pad_x_px: 24.0,
                    pad_y_px: 8.0,
                },
                ..TextTreatment::default()
            },
            body: TextTreatment {
                font_size: 18.0,
                font_weight: 500,
                line_height: 29.25,
                width: BlockWidth::Frac(0.9),
                ..TextTreatment::default()
            },
            emoji: EmojiTreatment {
                font_size: 96.0,
                placement: EmojiPlacement::Inline,
                backing: EmojiBacking::None,
                backing_pad_px: 0.0,
                margin_bottom: 24.0,
                rotation_deg: 0.0,
                opacity: 1.0,
                shadow: Shadow::Large,
            },
        },
        LayoutStyle::Creative => LayoutBundle {
            padding_px: 40.0,
            frame_px: 0.0,
            halign: HAlign::Left,
            varrange: VArrange::SpaceBetween,
            accent_headline: false,
            headline: TextTreatment {
                font_size: 48.0,
                font_weight: 800,
                line_height: 60.0,
                margin_bottom: 16.0,
                rotation_deg: -2.0,
                pivot: RotatePivot::BottomLeft,
                ..TextTreatment::default()
            },
            subheadline: TextTreatment {
                font_size: 20.0,
                line_height: 28.0,
                italic: true,
                opacity: 0.8,
                decoration: BlockDecoration::LeftRule {
                    rule_px: 4.0,
                    gap_px: 16.0,
                },
                ..TextTreatment::default()
            },
            body: TextTreatment {
                font_size: 18.0,
                font_weight: 500,
                line_height: 28.0,
                rotation_deg: 1.0,
                decoration: BlockDecoration::Card {
                    fill_opacity: 0.7,
                    pad_px: 24.0,
                    radius_px: 16.0,
                },
                shadow: Shadow::Large,
                ..TextTreatment::default()
            },
            emoji: EmojiTreatment {
                font_size: 72.0,
                placement: EmojiPlacement::TopRightCorner { offset_px: 32.0 },
                backing: EmojiBacking::None,
                backing_pad_px: 0.0,
                margin_bottom: 0.0,
                rotation_deg: 12.0,
                opacity: 1.0,
                shadow: Shadow::None,
            },
        },
        LayoutStyle::Modern => LayoutBundle {
            padding_px: 48.0,
            frame_px: 0.0,
            halign: HAlign::Left,
            varrange: VArrange::End,
            accent_headline: false,
            headline: TextTreatment {
                font_size: 60.0,
                font_weight: 700,
                line_height: 60.0,
                letter_spacing: -1.5,
                margin_bottom: 16.0,
                ..TextTreatment::default()
            },
            subheadline: TextTreatment {
                font_size: 24.0,
                font_weight: 300,
                line_height: 32.0,
                opacity: 0.8,
                margin_bottom: 32.0,
                ..TextTreatment::default()
            },
            body: TextTreatment {
                font_size: 16.0,
                line_height: 28.0,
                width: BlockWidth::Frac(0.85),
                decoration: BlockDecoration::TopRule {
                    rule_px: 2.0,
                    gap_px: 24.0,
                },
                ..TextTreatment::default()
            },
            emoji: EmojiTreatment {
                font_size: 60.0,
                placement: EmojiPlacement::TopRightCorner { offset_px: 48.0 },
                backing: EmojiBacking::Circle { fill_opacity: 0.3 },
                backing_pad_px: 16.0,
                margin_bottom: 0.0,
                rotation_deg: 0.0,
                opacity: 0.8,
                shadow: Shadow::None,
            },
        },
    }
}
