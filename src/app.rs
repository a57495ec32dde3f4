use eframe::egui;

use crate::components::colors::ColorsPanel;
use crate::components::history::HistoryPanel;
use crate::components::layers::LayersPanel;
use crate::components::tools::{
    Tool, ToolPanelAction, collect_shortcuts, show_brush_size, show_tool_buttons, show_zoom_controls,
};
use crate::grid::{MAX_GRID_SIZE, MIN_GRID_SIZE};
use crate::io::FileDialogSink;
use crate::project::{CanvasProject, PixelArtProject};
use crate::settings::{AppTab, EditorSettings};
use crate::theme::ThemeMode;
use crate::view::{CanvasView, GridView};

/// Seconds a status message stays at full strength.
const STATUS_HIGHLIGHT_SECS: f64 = 2.0;

const CANVAS_TOOLS: [Tool; 4] = [Tool::Paint, Tool::Erase, Tool::Fill, Tool::Pick];

struct StatusMessage {
    text: String,
    shown_at: f64,
}

pub struct DrawStudioApp {
    active_tab: AppTab,
    theme: ThemeMode,

    canvas: CanvasProject,
    pixel: PixelArtProject,

    canvas_view: CanvasView,
    grid_view: GridView,
    canvas_colors: ColorsPanel,
    pixel_colors: ColorsPanel,
    layers_panel: LayersPanel,
    canvas_history_panel: HistoryPanel,
    pixel_history_panel: HistoryPanel,

    export_sink: FileDialogSink,
    status: Option<StatusMessage>,
    /// Grid size slider value; applied on release.
    pending_grid_size: usize,
}

impl DrawStudioApp {
    pub fn new(cc: &eframe::CreationContext<'_>, settings: EditorSettings) -> Self {
        settings.theme.apply(&cc.egui_ctx);
        crate::log_info!(
            "Starting on {} ({}x{} canvas, {}x{} grid)",
            settings.start_tab.label(),
            settings.canvas_width,
            settings.canvas_height,
            settings.grid_size,
            settings.grid_size
        );

        let pixel = PixelArtProject::new(&settings);
        let pending_grid_size = pixel.grid.size();
        Self {
            active_tab: settings.start_tab,
            theme: settings.theme,
            canvas: CanvasProject::new(&settings),
            pixel,
            canvas_view: CanvasView::default(),
            grid_view: GridView::default(),
            canvas_colors: ColorsPanel::default(),
            pixel_colors: ColorsPanel::default(),
            layers_panel: LayersPanel::default(),
            canvas_history_panel: HistoryPanel::default(),
            pixel_history_panel: HistoryPanel::default(),
            export_sink: FileDialogSink::default(),
            status: None,
            pending_grid_size,
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        for action in collect_shortcuts(ctx) {
            match self.active_tab {
                AppTab::CanvasPro => self.canvas.handle_shortcut(action),
                AppTab::PixelArt => self.pixel.handle_shortcut(action),
            }
        }
    }

    /// Pull queued messages from both documents into the status bar.
    fn collect_status(&mut self, now: f64) {
        let latest = match self.active_tab {
            AppTab::CanvasPro => self.canvas.take_status(),
            AppTab::PixelArt => self.pixel.take_status(),
        };
        // Messages from the background tab are stale by the time it is shown.
        let _ = match self.active_tab {
            AppTab::CanvasPro => self.pixel.take_status(),
            AppTab::PixelArt => self.canvas.take_status(),
        };
        if let Some(text) = latest {
            self.status = Some(StatusMessage { text, shown_at: now });
        }
    }

    fn show_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("tab_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("DrawStudio");
                ui.separator();
                for tab in [AppTab::CanvasPro, AppTab::PixelArt] {
                    if ui.selectable_value(&mut self.active_tab, tab, tab.label()).clicked() {
                        crate::log_info!("Switched to {}", tab.label());
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let tip = match self.theme {
                        ThemeMode::Dark => "Switch to light theme",
                        ThemeMode::Light => "Switch to dark theme",
                    };
                    if ui.button(self.theme.toggle_icon()).on_hover_text(tip).clicked() {
                        self.theme = self.theme.toggled();
                        self.theme.apply(ctx);
                    }
                });
            });
        });
    }

    fn show_status_bar(&mut self, ctx: &egui::Context, now: f64) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(status) = &self.status {
                    let text = egui::RichText::new(&status.text);
                    if now - status.shown_at < STATUS_HIGHLIGHT_SECS {
                        ui.label(text.strong());
                        ctx.request_repaint_after(std::time::Duration::from_secs_f64(
                            STATUS_HIGHLIGHT_SECS,
                        ));
                    } else {
                        ui.label(text.weak());
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    match self.active_tab {
                        AppTab::CanvasPro => {
                            let state = &self.canvas.canvas_state;
                            ui.label(format!("{:.0}%", self.canvas.tools.zoom() * 100.0));
                            ui.separator();
                            ui.label(format!("{} x {}", state.width, state.height));
                            ui.separator();
                            ui.label(format!("Layer: {}", state.active_layer().name));
                        }
                        AppTab::PixelArt => {
                            let n = self.pixel.grid.size();
                            ui.label(format!("{:.0}%", self.pixel.tools.zoom() * 100.0));
                            ui.separator();
                            ui.label(format!("{} x {}", n, n));
                        }
                    }
                });
            });
        });
    }

    // ---- Canvas Pro ---------------------------------------------------------

    fn show_canvas_side_panels(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("canvas_tools").resizable(false).default_width(190.0).show(ctx, |ui| {
            ui.strong("Tools");
            if let Some(ToolPanelAction::SelectTool(tool)) =
                show_tool_buttons(ui, &self.canvas.tools, &CANVAS_TOOLS)
            {
                self.canvas.set_tool(tool);
            }

            ui.separator();
            ui.strong("Brush size");
            show_brush_size(ui, &mut self.canvas.tools);

            ui.separator();
            ui.strong("Color");
            let mut color = self.canvas.tools.color;
            if self.canvas_colors.show(ui, &mut color) {
                self.canvas.set_color(color);
            }

            ui.separator();
            ui.strong("Zoom");
            if let Some(ToolPanelAction::Zoom(steps)) = show_zoom_controls(ui, &self.canvas.tools) {
                self.canvas.zoom(steps);
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.add_enabled(self.canvas.history.can_undo(), egui::Button::new("↶ Undo")).clicked() {
                    self.canvas.undo();
                }
                if ui.add_enabled(self.canvas.history.can_redo(), egui::Button::new("↷ Redo")).clicked() {
                    self.canvas.redo();
                }
            });
            if ui.button("💾 Export PNG").clicked() {
                let _ = self.canvas.export(&mut self.export_sink);
            }
        });

        egui::SidePanel::right("canvas_layers").default_width(220.0).show(ctx, |ui| {
            ui.strong("Layers");
            if let Some(action) = self.layers_panel.show(ui, &self.canvas.canvas_state) {
                self.canvas.apply_layer_action(action);
            }

            ui.add_space(8.0);
            ui.strong("History");
            self.canvas_history_panel
                .show(ui, &mut self.canvas.history, &mut self.canvas.canvas_state);
        });
    }

    // ---- Pixel Art ----------------------------------------------------------

    fn show_pixel_side_panels(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("pixel_tools").resizable(false).default_width(190.0).show(ctx, |ui| {
            ui.strong("Tools");
            if let Some(ToolPanelAction::SelectTool(tool)) =
                show_tool_buttons(ui, &self.pixel.tools, Tool::all())
            {
                self.pixel.set_tool(tool);
            }

            ui.separator();
            ui.strong("Color");
            let mut color = self.pixel.tools.color;
            if self.pixel_colors.show(ui, &mut color) {
                self.pixel.set_color(color);
            }

            ui.separator();
            ui.strong("Grid size");
            let slider = ui.add(
                egui::Slider::new(&mut self.pending_grid_size, MIN_GRID_SIZE..=MAX_GRID_SIZE)
                    .suffix(" cells"),
            );
            if (slider.drag_released() || slider.lost_focus())
                && self.pending_grid_size != self.pixel.grid.size()
            {
                self.pixel.resize_grid(self.pending_grid_size);
            }

            ui.separator();
            ui.strong("Zoom");
            if let Some(ToolPanelAction::Zoom(steps)) = show_zoom_controls(ui, &self.pixel.tools) {
                self.pixel.zoom(steps);
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("⬛ Fill Screen").clicked() {
                    self.pixel.fill_screen();
                }
                if ui.button("🗑 Clear").clicked() {
                    self.pixel.clear();
                }
            });
            ui.horizontal(|ui| {
                if ui.add_enabled(self.pixel.history.can_undo(), egui::Button::new("↶ Undo")).clicked() {
                    self.pixel.undo();
                }
                if ui.add_enabled(self.pixel.history.can_redo(), egui::Button::new("↷ Redo")).clicked() {
                    self.pixel.redo();
                }
            });
            if ui.button("💾 Export PNG").clicked() {
                let _ = self.pixel.export(&mut self.export_sink);
            }
        });

        egui::SidePanel::right("pixel_history").default_width(200.0).show(ctx, |ui| {
            ui.strong("History");
            self.pixel_history_panel
                .show(ui, &mut self.pixel.history, &mut self.pixel.grid);
        });
    }
}

impl eframe::App for DrawStudioApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = ctx.input(|i| i.time);

        self.handle_shortcuts(ctx);
        self.show_top_bar(ctx);

        match self.active_tab {
            AppTab::CanvasPro => self.show_canvas_side_panels(ctx),
            AppTab::PixelArt => self.show_pixel_side_panels(ctx),
        }

        // Panels must all be laid out before the central panel claims the rest.
        self.collect_status(now);
        self.show_status_bar(ctx, now);

        let backdrop = self.theme.canvas_backdrop();
        egui::CentralPanel::default().show(ctx, |ui| match self.active_tab {
            AppTab::CanvasPro => self.canvas_view.show(ui, &mut self.canvas, backdrop),
            AppTab::PixelArt => self.grid_view.show(ui, &mut self.pixel, backdrop),
        });
    }
}
