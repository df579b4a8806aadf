//! Dark translucent look, applied once at startup.

use egui::{Color32, Rounding, Stroke, Vec2};

pub const BACKGROUND: Color32 = Color32::from_rgba_premultiplied(14, 14, 23, 217);
pub const TEXT: Color32 = Color32::from_rgb(0xcd, 0xd6, 0xf4);
pub const ACCENT: Color32 = Color32::from_rgb(0xcb, 0xa6, 0xf7);
const CARD: Color32 = Color32::from_rgba_premultiplied(24, 24, 37, 204);
const CARD_BORDER: Color32 = Color32::from_rgb(0x31, 0x32, 0x44);
const CARD_HOVER: Color32 = Color32::from_rgb(0x45, 0x47, 0x5a);

pub fn apply(ctx: &egui::Context) {
    let mut visuals = egui::Visuals::dark();
    visuals.panel_fill = BACKGROUND;
    visuals.window_fill = BACKGROUND;
    visuals.override_text_color = Some(TEXT);
    visuals.hyperlink_color = ACCENT;
    visuals.selection.stroke = Stroke::new(1.0, ACCENT);

    let rounding = Rounding::same(8.0);
    let inactive = &mut visuals.widgets.inactive;
    inactive.bg_fill = CARD;
    inactive.weak_bg_fill = CARD;
    inactive.bg_stroke = Stroke::new(1.0, CARD_BORDER);
    inactive.rounding = rounding;

    let hovered = &mut visuals.widgets.hovered;
    hovered.bg_fill = CARD_HOVER;
    hovered.weak_bg_fill = CARD_HOVER;
    hovered.bg_stroke = Stroke::new(1.0, ACCENT);
    hovered.rounding = rounding;
    hovered.expansion = 2.0;

    visuals.widgets.active.rounding = rounding;

    ctx.set_visuals(visuals);
    ctx.style_mut(|style| {
        style.spacing.item_spacing = Vec2::splat(12.0);
        style.spacing.button_padding = Vec2::ZERO;
    });
}
