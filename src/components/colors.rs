use eframe::egui;
use egui::{Color32, Pos2, Stroke, Vec2};
use image::Rgba;

/// Swatches offered by both editors, in display order.
pub const PALETTE: [&str; 14] = [
    "#FFFFFF", "#000000", "#FF0000", "#00FF00", "#0000FF", "#FFFF00", "#FF00FF", "#00FFFF",
    "#FFA500", "#800080", "#008080", "#FFC0CB", "#A52A2A", "#808080",
];

const SWATCH_SIZE: f32 = 22.0;
const SWATCHES_PER_ROW: usize = 7;

/// Parse `#RRGGBB` (leading `#` optional) into an opaque colour.
pub fn parse_hex(text: &str) -> Option<Rgba<u8>> {
    let hex = text.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let val = u32::from_str_radix(hex, 16).ok()?;
    Some(Rgba([
        ((val >> 16) & 0xFF) as u8,
        ((val >> 8) & 0xFF) as u8,
        (val & 0xFF) as u8,
        255,
    ]))
}

pub fn to_hex(color: Rgba<u8>) -> String {
    format!("#{:02X}{:02X}{:02X}", color[0], color[1], color[2])
}

pub fn palette_colors() -> impl Iterator<Item = Rgba<u8>> {
    PALETTE.iter().filter_map(|hex| parse_hex(hex))
}

pub fn to_color32(color: Rgba<u8>) -> Color32 {
    Color32::from_rgba_unmultiplied(color[0], color[1], color[2], color[3])
}

// ============================================================================
// ColorsPanel - palette swatches, custom picker and hex entry
// ============================================================================

#[derive(Default)]
pub struct ColorsPanel {
    /// Hex text being edited; `None` mirrors the current colour.
    hex_edit: Option<String>,
}

impl ColorsPanel {
    /// Show the panel for `color`.  Returns `true` when the user picked a
    /// different colour.
    pub fn show(&mut self, ui: &mut egui::Ui, color: &mut Rgba<u8>) -> bool {
        let mut changed = self.draw_palette(ui, color);
        ui.add_space(4.0);
        changed |= self.draw_custom_row(ui, color);
        changed
    }

    fn draw_palette(&mut self, ui: &mut egui::Ui, color: &mut Rgba<u8>) -> bool {
        let mut changed = false;
        let swatches: Vec<Rgba<u8>> = palette_colors().collect();
        for row in swatches.chunks(SWATCHES_PER_ROW) {
            ui.horizontal(|ui| {
                for &swatch in row {
                    let (rect, resp) =
                        ui.allocate_exact_size(Vec2::splat(SWATCH_SIZE), egui::Sense::click());
                    if ui.is_rect_visible(rect) {
                        let p = ui.painter();
                        p.rect_filled(rect, 3.0, to_color32(swatch));
                        // Highlight compares RGB only so a picked colour still lights up.
                        let selected = swatch.0[..3] == color.0[..3];
                        let border = if selected {
                            Stroke::new(2.0, ui.visuals().selection.stroke.color)
                        } else {
                            Stroke::new(1.0, ui.visuals().widgets.noninteractive.bg_stroke.color)
                        };
                        p.rect_stroke(rect, 3.0, border);
                    }
                    if resp.on_hover_text(to_hex(swatch)).clicked() && *color != swatch {
                        *color = swatch;
                        self.hex_edit = None;
                        changed = true;
                    }
                }
            });
        }
        changed
    }

    fn draw_custom_row(&mut self, ui: &mut egui::Ui, color: &mut Rgba<u8>) -> bool {
        let mut changed = false;
        ui.horizontal(|ui| {
            let mut rgb = [color[0], color[1], color[2]];
            if ui.color_edit_button_srgb(&mut rgb).changed() {
                *color = Rgba([rgb[0], rgb[1], rgb[2], 255]);
                self.hex_edit = None;
                changed = true;
            }

            ui.label(egui::RichText::new("#").monospace().strong());
            let mut hex = self
                .hex_edit
                .clone()
                .unwrap_or_else(|| to_hex(*color).trim_start_matches('#').to_string());
            let resp = ui.add_sized(
                [60.0, 18.0],
                egui::TextEdit::singleline(&mut hex).font(egui::TextStyle::Monospace),
            );
            if resp.changed() {
                if let Some(parsed) = parse_hex(&hex)
                    && parsed != *color
                {
                    *color = parsed;
                    changed = true;
                }
                self.hex_edit = Some(hex);
            }
            if resp.lost_focus() {
                self.hex_edit = None;
            }
        });
        changed
    }
}

/// Draw a checkerboard pattern inside `rect` (for transparency preview).
pub fn draw_checkerboard(painter: &egui::Painter, rect: egui::Rect, cell: f32) {
    painter.rect_filled(rect, 0.0, Color32::WHITE);
    let cols = (rect.width() / cell).ceil() as i32;
    let rows = (rect.height() / cell).ceil() as i32;
    for row in 0..rows {
        for col in 0..cols {
            if (row + col) % 2 == 1 {
                let cr = egui::Rect::from_min_size(
                    Pos2::new(
                        rect.min.x + col as f32 * cell,
                        rect.min.y + row as f32 * cell,
                    ),
                    Vec2::new(cell, cell),
                )
                .intersect(rect);
                painter.rect_filled(cr, 0.0, Color32::from_gray(200));
            }
        }
    }
}
