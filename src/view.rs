use eframe::egui;
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

use crate::components::colors::{draw_checkerboard, to_color32};
use crate::components::tools::Dispatch;
use crate::grid::Cell;
use crate::project::{CanvasProject, PixelArtProject};

/// On-screen side of the pixel grid at 100% zoom.
const GRID_VIEW_SIDE: f32 = 480.0;
/// Grids denser than this are drawn without cell borders.
const GRID_LINE_MAX_SIZE: usize = 32;

/// Press / move / release edges derived from egui's per-frame pointer state.
#[derive(Clone, Copy, Debug, PartialEq)]
enum PointerEdge {
    Down(Pos2),
    Move(Pos2),
    Up,
    Idle,
}

fn pointer_edge(was_down: bool, down: bool, pos: Option<Pos2>) -> PointerEdge {
    match (was_down, down, pos) {
        (false, true, Some(p)) => PointerEdge::Down(p),
        (true, true, Some(p)) => PointerEdge::Move(p),
        (true, false, _) => PointerEdge::Up,
        _ => PointerEdge::Idle,
    }
}

// ============================================================================
// CANVAS VIEW - Canvas Pro drawing surface
// ============================================================================

/// Displays a layered document and feeds pointer input into it.  Holds only
/// the uploaded composite texture, never document pixels.
#[derive(Default)]
pub struct CanvasView {
    texture: Option<egui::TextureHandle>,
    /// Dirty generation the texture was built from.
    uploaded_generation: Option<u64>,
    was_down: bool,
}

impl CanvasView {
    pub fn show(&mut self, ui: &mut egui::Ui, project: &mut CanvasProject, backdrop: Color32) {
        let zoom = project.tools.zoom();
        let size = Vec2::new(
            project.canvas_state.width as f32 * zoom,
            project.canvas_state.height as f32 * zoom,
        );

        ui.painter().rect_filled(ui.max_rect(), 0.0, backdrop);
        egui::ScrollArea::both()
            .id_source("canvas_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let (response, painter) = ui.allocate_painter(size, Sense::click_and_drag());
                let rect = response.rect;

                self.handle_pointer(ui, &response, rect, project);

                let texture = self.texture_for(ui.ctx(), project);
                let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
                painter.image(texture.id(), rect, uv, Color32::WHITE);
                painter.rect_stroke(rect, 0.0, Stroke::new(1.0, Color32::from_gray(90)));

                if let Some(hover) = response.hover_pos()
                    && project.tools.tool.dispatch() == Dispatch::Stroke
                {
                    let radius = (project.tools.size() as f32 / 2.0 * zoom).max(1.0);
                    painter.circle_stroke(hover, radius, Stroke::new(1.0, Color32::from_gray(128)));
                }
            });
    }

    fn handle_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: Rect,
        project: &mut CanvasProject,
    ) {
        let zoom = project.tools.zoom();
        let to_canvas = |p: Pos2| ((p.x - rect.min.x) / zoom, (p.y - rect.min.y) / zoom);
        let down = response.is_pointer_button_down_on();
        let pos = ui.input(|i| i.pointer.interact_pos());

        match pointer_edge(self.was_down, down, pos) {
            PointerEdge::Down(p) if rect.contains(p) => project.pointer_down(to_canvas(p)),
            PointerEdge::Move(p) if rect.contains(p) => project.pointer_move(to_canvas(p)),
            PointerEdge::Move(_) => project.pointer_leave(),
            PointerEdge::Up => project.pointer_up(),
            _ => {}
        }
        self.was_down = down;
    }

    /// Re-upload the composite only when the document changed.
    fn texture_for(&mut self, ctx: &egui::Context, project: &CanvasProject) -> egui::TextureHandle {
        let generation = project.canvas_state.dirty_generation();
        if let Some(texture) = &self.texture
            && self.uploaded_generation == Some(generation)
        {
            return texture.clone();
        }

        let image = project.canvas_state.composite();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [image.width() as usize, image.height() as usize],
            image.as_raw(),
        );
        let texture = match &mut self.texture {
            Some(texture) => {
                texture.set(color_image, egui::TextureOptions::NEAREST);
                texture.clone()
            }
            None => ctx.load_texture(
                format!("canvas-{}", project.id),
                color_image,
                egui::TextureOptions::NEAREST,
            ),
        };
        self.texture = Some(texture.clone());
        self.uploaded_generation = Some(generation);
        texture
    }
}

// ============================================================================
// GRID VIEW - Pixel Art cell grid
// ============================================================================

#[derive(Default)]
pub struct GridView {
    was_down: bool,
}

impl GridView {
    pub fn show(&mut self, ui: &mut egui::Ui, project: &mut PixelArtProject, backdrop: Color32) {
        let n = project.grid.size();
        let cell_px = GRID_VIEW_SIDE / n as f32 * project.tools.zoom();
        let side = cell_px * n as f32;

        ui.painter().rect_filled(ui.max_rect(), 0.0, backdrop);
        egui::ScrollArea::both()
            .id_source("grid_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                let (response, painter) =
                    ui.allocate_painter(Vec2::splat(side), Sense::click_and_drag());
                let rect = response.rect;

                self.handle_pointer(ui, &response, rect, cell_px, project);

                draw_checkerboard(&painter, rect, (cell_px / 2.0).max(4.0));
                let cell_rect = |x: usize, y: usize| {
                    Rect::from_min_size(
                        Pos2::new(rect.min.x + x as f32 * cell_px, rect.min.y + y as f32 * cell_px),
                        Vec2::splat(cell_px),
                    )
                };
                for (i, cell) in project.grid.cells().iter().enumerate() {
                    if let Cell::Color(color) = *cell {
                        painter.rect_filled(cell_rect(i % n, i / n), 0.0, to_color32(color));
                    }
                }

                if n <= GRID_LINE_MAX_SIZE {
                    let line = Stroke::new(1.0, Color32::from_black_alpha(40));
                    for k in 0..=n {
                        let off = k as f32 * cell_px;
                        painter.line_segment(
                            [Pos2::new(rect.min.x + off, rect.min.y), Pos2::new(rect.min.x + off, rect.max.y)],
                            line,
                        );
                        painter.line_segment(
                            [Pos2::new(rect.min.x, rect.min.y + off), Pos2::new(rect.max.x, rect.min.y + off)],
                            line,
                        );
                    }
                }

                if let Some(hover) = response.hover_pos()
                    && let Some((x, y)) = cell_at(rect, cell_px, n, hover)
                {
                    let stroke = Stroke::new(2.0, ui.visuals().selection.stroke.color);
                    painter.rect_stroke(cell_rect(x, y), 0.0, stroke);
                }
            });
    }

    fn handle_pointer(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: Rect,
        cell_px: f32,
        project: &mut PixelArtProject,
    ) {
        let n = project.grid.size();
        let down = response.is_pointer_button_down_on();
        let pos = ui.input(|i| i.pointer.interact_pos());

        match pointer_edge(self.was_down, down, pos) {
            PointerEdge::Down(p) => {
                if let Some((x, y)) = cell_at(rect, cell_px, n, p) {
                    project.pointer_down(x, y);
                }
            }
            PointerEdge::Move(p) => match cell_at(rect, cell_px, n, p) {
                Some((x, y)) => project.pointer_drag(x, y),
                None => project.pointer_up(),
            },
            PointerEdge::Up => project.pointer_up(),
            PointerEdge::Idle => {}
        }
        self.was_down = down;
    }
}

/// Grid cell under `pos`, if any.
fn cell_at(rect: Rect, cell_px: f32, n: usize, pos: Pos2) -> Option<(usize, usize)> {
    if !rect.contains(pos) || cell_px <= 0.0 {
        return None;
    }
    let x = ((pos.x - rect.min.x) / cell_px).floor() as usize;
    let y = ((pos.y - rect.min.y) / cell_px).floor() as usize;
    (x < n && y < n).then_some((x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_edges_follow_button_state() {
        let p = Pos2::new(3.0, 4.0);
        assert_eq!(pointer_edge(false, true, Some(p)), PointerEdge::Down(p));
        assert_eq!(pointer_edge(true, true, Some(p)), PointerEdge::Move(p));
        assert_eq!(pointer_edge(true, false, None), PointerEdge::Up);
        assert_eq!(pointer_edge(false, false, Some(p)), PointerEdge::Idle);
    }

    #[test]
    fn cell_lookup_respects_bounds() {
        let rect = Rect::from_min_size(Pos2::new(10.0, 10.0), Vec2::splat(40.0));
        assert_eq!(cell_at(rect, 10.0, 4, Pos2::new(10.0, 10.0)), Some((0, 0)));
        assert_eq!(cell_at(rect, 10.0, 4, Pos2::new(45.0, 21.0)), Some((3, 1)));
        assert_eq!(cell_at(rect, 10.0, 4, Pos2::new(51.0, 20.0)), None);
        assert_eq!(cell_at(rect, 10.0, 4, Pos2::new(5.0, 20.0)), None);
    }
}
