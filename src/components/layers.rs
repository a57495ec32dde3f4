use eframe::egui;
use egui::Color32;

use crate::canvas::{CanvasState, LayerId};

/// Layer edits requested by the panel.  The owning project applies them so
/// that status messages and history stay in one place.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LayerAction {
    Add,
    DeleteActive,
    Activate(LayerId),
    SetVisible(LayerId, bool),
    Rename(LayerId, String),
}

#[derive(Default)]
struct RenameState {
    layer: Option<LayerId>,
    text: String,
}

#[derive(Default)]
pub struct LayersPanel {
    rename_state: RenameState,
}

impl LayersPanel {
    /// Render the layer list (topmost first) and the add/delete footer.
    pub fn show(&mut self, ui: &mut egui::Ui, canvas_state: &CanvasState) -> Option<LayerAction> {
        let mut action = None;
        ui.vertical(|ui| {
            egui::ScrollArea::vertical()
                .id_source("layer_list_scroll")
                .max_height(220.0)
                .show(ui, |ui| {
                    for layer in canvas_state.layers().iter().rev() {
                        if let Some(a) = self.show_layer_row(ui, canvas_state, layer.id) {
                            action = Some(a);
                        }
                    }
                });

            ui.add_space(4.0);
            if let Some(a) = self.show_footer_toolbar(ui, canvas_state) {
                action = Some(a);
            }
        });
        action
    }

    fn show_layer_row(&mut self, ui: &mut egui::Ui, canvas_state: &CanvasState, id: LayerId) -> Option<LayerAction> {
        let layer = canvas_state.layer(id)?;
        let is_active = canvas_state.active_layer_id() == id;
        let mut action = None;

        ui.horizontal(|ui| {
            let mut visible = layer.visible;
            if ui.checkbox(&mut visible, "").on_hover_text("Visible").changed() {
                action = Some(LayerAction::SetVisible(id, visible));
            }

            if self.rename_state.layer == Some(id) {
                let resp = ui.text_edit_singleline(&mut self.rename_state.text);
                if resp.lost_focus() {
                    let name = self.rename_state.text.trim().to_string();
                    if !name.is_empty() && name != layer.name {
                        action = Some(LayerAction::Rename(id, name));
                    }
                    self.rename_state = RenameState::default();
                } else {
                    resp.request_focus();
                }
                return;
            }

            let text = if is_active {
                egui::RichText::new(&layer.name).strong()
            } else {
                egui::RichText::new(&layer.name)
            };
            let resp = ui.selectable_label(is_active, text);
            if resp.clicked() && !is_active {
                action = Some(LayerAction::Activate(id));
            }
            if resp.double_clicked() {
                self.rename_state.layer = Some(id);
                self.rename_state.text = layer.name.clone();
            }
        });
        action
    }

    fn show_footer_toolbar(&mut self, ui: &mut egui::Ui, canvas_state: &CanvasState) -> Option<LayerAction> {
        let mut action = None;
        ui.separator();
        ui.horizontal(|ui| {
            if ui.small_button("＋ Add").on_hover_text("New layer").clicked() {
                action = Some(LayerAction::Add);
            }

            let can_delete = canvas_state.layer_count() > 1;
            let delete = ui.add_enabled(can_delete, egui::Button::new("🗑 Delete").small());
            if delete.clicked() {
                action = Some(LayerAction::DeleteActive);
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let count_text = format!("{}", canvas_state.layer_count());
                ui.label(egui::RichText::new(count_text).size(11.0).color(Color32::GRAY));
            });
        });
        action
    }
}
