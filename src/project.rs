use image::Rgba;
use uuid::Uuid;

use crate::canvas::{CanvasState, LayerId};
use crate::components::colors::to_hex;
use crate::components::history::{GridSnapshotCommand, HistoryManager, LayerPixelsCommand};
use crate::components::layers::LayerAction;
use crate::components::tools::{
    BRUSH_SIZE_STEP, Dispatch, ShortcutAction, StrokeTracker, Tool, ToolProperties, ZOOM_STEP,
};
use crate::grid::{Cell, PixelGrid};
use crate::io::{ExportError, ImageSink, suggested_file_name};
use crate::settings::EditorSettings;

pub const CANVAS_ZOOM_RANGE: (f32, f32) = (0.1, 5.0);
pub const PIXEL_ZOOM_RANGE: (f32, f32) = (0.5, 5.0);

/// Route a status message to the log and queue it for the status bar.
fn report(slot: &mut Option<String>, msg: String) {
    crate::log_info!("{}", msg);
    *slot = Some(msg);
}

// ============================================================================
// CANVAS PRO - layered painting document
// ============================================================================

/// One layered painting document with its own history and tool state.
pub struct CanvasProject {
    pub id: Uuid,
    pub canvas_state: CanvasState,
    pub history: HistoryManager<CanvasState>,
    pub tools: ToolProperties,
    stroke: StrokeTracker,
    status: Option<String>,
}

impl CanvasProject {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            canvas_state: CanvasState::new(
                settings.canvas_width,
                settings.canvas_height,
                settings.background,
            ),
            history: HistoryManager::new(settings.history_limit),
            tools: ToolProperties::new(settings.brush_color, settings.brush_size, CANVAS_ZOOM_RANGE),
            stroke: StrokeTracker::default(),
            status: None,
        }
    }

    /// Latest status message, if one is waiting.
    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    pub fn is_drawing(&self) -> bool {
        self.stroke.is_active()
    }

    // ---- pointer input ------------------------------------------------------

    /// `point` is in canvas pixels (already divided by zoom).
    pub fn pointer_down(&mut self, point: (f32, f32)) {
        // A press without a release (focus loss) still commits its stroke.
        self.commit_stroke();

        match self.tools.tool.dispatch() {
            Dispatch::Stroke => {
                let desc = match self.tools.tool {
                    Tool::Erase => "Eraser Stroke",
                    _ => "Brush Stroke",
                };
                self.stroke.start(&self.canvas_state, desc);
                self.canvas_state.end_stroke();
                self.canvas_state.stroke_to(point, &self.tools.stroke_style());
            }
            Dispatch::Atomic => self.fill_layer(),
            Dispatch::Sample => self.pick_color(point),
        }
    }

    pub fn pointer_move(&mut self, point: (f32, f32)) {
        if self.stroke.is_active() {
            self.canvas_state.stroke_to(point, &self.tools.stroke_style());
        }
    }

    pub fn pointer_up(&mut self) {
        self.commit_stroke();
    }

    /// Leaving the surface ends a stroke exactly like a release.
    pub fn pointer_leave(&mut self) {
        self.commit_stroke();
    }

    fn commit_stroke(&mut self) {
        if !self.stroke.is_active() {
            return;
        }
        self.canvas_state.end_stroke();
        if let Some(command) = self.stroke.finish(&self.canvas_state) {
            self.history.push(Box::new(command));
        }
    }

    // ---- tools --------------------------------------------------------------

    /// Fill the whole active layer with the brush colour as one history entry.
    pub fn fill_layer(&mut self) {
        let id = self.canvas_state.active_layer_id();
        let Some(before) = self.canvas_state.capture_layer(id) else {
            return;
        };
        self.canvas_state.fill_active_layer(self.tools.color);
        let Some(after) = self.canvas_state.capture_layer(id) else {
            return;
        };
        self.history.push(Box::new(LayerPixelsCommand::new(
            "Fill Layer".to_string(),
            id,
            before,
            after,
        )));
        report(&mut self.status, "Layer filled".to_string());
    }

    /// Take the active layer's colour under `point` as the brush colour and
    /// switch back to the brush.
    pub fn pick_color(&mut self, point: (f32, f32)) {
        let Some(px) = self.canvas_state.sample_active(point) else {
            return;
        };
        self.tools.color = Rgba([px[0], px[1], px[2], 255]);
        self.tools.tool = Tool::Paint;
        report(&mut self.status, format!("Color picked: {}", to_hex(self.tools.color)));
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.commit_stroke();
        self.tools.tool = tool;
        report(&mut self.status, format!("Tool: {}", tool.label().to_uppercase()));
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.tools.color = color;
    }

    pub fn change_size(&mut self, delta: i32) {
        self.tools.change_size(delta);
        report(&mut self.status, format!("Size: {}px", self.tools.size()));
    }

    pub fn zoom(&mut self, steps: i8) {
        self.tools.change_zoom(steps as f32 * ZOOM_STEP);
    }

    // ---- layers -------------------------------------------------------------

    pub fn add_layer(&mut self) -> LayerId {
        self.commit_stroke();
        self.canvas_state.add_layer(None)
    }

    pub fn delete_active_layer(&mut self) -> bool {
        self.commit_stroke();
        let deleted = self.canvas_state.delete_active_layer();
        if !deleted {
            report(&mut self.status, "Cannot delete the last layer".to_string());
        }
        deleted
    }

    pub fn set_active_layer(&mut self, id: LayerId) -> bool {
        self.commit_stroke();
        self.canvas_state.set_active_layer(id)
    }

    pub fn apply_layer_action(&mut self, action: LayerAction) {
        match action {
            LayerAction::Add => {
                self.add_layer();
            }
            LayerAction::DeleteActive => {
                self.delete_active_layer();
            }
            LayerAction::Activate(id) => {
                self.set_active_layer(id);
            }
            LayerAction::SetVisible(id, visible) => {
                self.canvas_state.set_layer_visible(id, visible);
            }
            LayerAction::Rename(id, name) => {
                self.canvas_state.rename_layer(id, &name);
            }
        }
    }

    // ---- history ------------------------------------------------------------

    pub fn undo(&mut self) {
        self.commit_stroke();
        if let Some(desc) = self.history.undo(&mut self.canvas_state) {
            report(&mut self.status, format!("Undo: {}", desc));
        }
    }

    pub fn redo(&mut self) {
        self.commit_stroke();
        if let Some(desc) = self.history.redo(&mut self.canvas_state) {
            report(&mut self.status, format!("Redo: {}", desc));
        }
    }

    pub fn handle_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::SelectTool(tool) => self.set_tool(tool),
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::ShrinkBrush => self.change_size(-BRUSH_SIZE_STEP),
            ShortcutAction::GrowBrush => self.change_size(BRUSH_SIZE_STEP),
        }
    }

    // ---- export -------------------------------------------------------------

    /// Flatten the visible layers over white and hand the result to `sink`.
    pub fn export(&mut self, sink: &mut dyn ImageSink) -> Result<(), ExportError> {
        self.commit_stroke();
        let image = self.canvas_state.composite();
        let result = sink.save_png(&image, &suggested_file_name("art"));
        export_status(&mut self.status, result)
    }
}

fn export_status(
    slot: &mut Option<String>,
    result: Result<std::path::PathBuf, ExportError>,
) -> Result<(), ExportError> {
    match result {
        Ok(path) => {
            report(slot, format!("Exported {}", path.display()));
            Ok(())
        }
        Err(ExportError::Cancelled) => {
            report(slot, ExportError::Cancelled.to_string());
            Err(ExportError::Cancelled)
        }
        Err(e) => {
            crate::log_err!("Export failed: {}", e);
            *slot = Some(format!("Export failed: {}", e));
            Err(e)
        }
    }
}

// ============================================================================
// PIXEL ART - grid document
// ============================================================================

pub struct PixelArtProject {
    pub id: Uuid,
    pub grid: PixelGrid,
    pub history: HistoryManager<PixelGrid>,
    pub tools: ToolProperties,
    export_scale: u32,
    /// Grid as it was when the current drag gesture began.
    gesture_before: Option<PixelGrid>,
    last_cell: Option<(usize, usize)>,
    status: Option<String>,
}

impl PixelArtProject {
    pub fn new(settings: &EditorSettings) -> Self {
        Self {
            id: Uuid::new_v4(),
            grid: PixelGrid::new(settings.grid_size),
            history: HistoryManager::new(settings.history_limit),
            tools: ToolProperties::new(settings.pixel_color, 1, PIXEL_ZOOM_RANGE),
            export_scale: settings.export_scale,
            gesture_before: None,
            last_cell: None,
            status: None,
        }
    }

    pub fn take_status(&mut self) -> Option<String> {
        self.status.take()
    }

    fn active_cell(&self) -> Cell {
        Cell::Color(self.tools.color)
    }

    fn record(&mut self, description: &str, before: PixelGrid) -> bool {
        self.history.push(Box::new(GridSnapshotCommand::new(
            description.to_string(),
            before,
            self.grid.clone(),
        )))
    }

    // ---- pointer input ------------------------------------------------------

    pub fn pointer_down(&mut self, x: usize, y: usize) {
        self.commit_gesture();

        match self.tools.tool.dispatch() {
            Dispatch::Stroke => {
                self.gesture_before = Some(self.grid.clone());
                self.last_cell = None;
                self.apply_drag_tool(x, y);
            }
            Dispatch::Atomic => {
                let before = self.grid.clone();
                let cell = self.active_cell();
                let (changed, desc) = match self.tools.tool {
                    Tool::FillScreen => (self.grid.fill_screen(cell), "Fill Screen"),
                    _ => (self.grid.flood_fill(x, y, cell), "Flood Fill"),
                };
                if changed > 0 {
                    self.record(desc, before);
                }
            }
            Dispatch::Sample => self.pick(x, y),
        }
    }

    /// Paint/erase under the pointer while the button is held.
    pub fn pointer_drag(&mut self, x: usize, y: usize) {
        if self.gesture_before.is_some() && self.last_cell != Some((x, y)) {
            self.apply_drag_tool(x, y);
        }
    }

    pub fn pointer_up(&mut self) {
        self.commit_gesture();
    }

    pub fn is_drawing(&self) -> bool {
        self.gesture_before.is_some()
    }

    fn apply_drag_tool(&mut self, x: usize, y: usize) {
        self.last_cell = Some((x, y));
        let cell = match self.tools.tool {
            Tool::Erase => Cell::Transparent,
            _ => self.active_cell(),
        };
        self.grid.paint_cell(x, y, cell);
    }

    /// One drag gesture becomes one history entry; nothing is recorded if it
    /// changed no cell.
    fn commit_gesture(&mut self) {
        self.last_cell = None;
        let Some(before) = self.gesture_before.take() else {
            return;
        };
        let desc = match self.tools.tool {
            Tool::Erase => "Erase",
            _ => "Paint",
        };
        self.record(desc, before);
    }

    // ---- tools --------------------------------------------------------------

    /// Copy a painted cell's colour; transparent cells leave it unchanged.
    pub fn pick(&mut self, x: usize, y: usize) {
        if let Some(color) = self.grid.pick_cell(x, y) {
            self.tools.color = color;
            report(&mut self.status, format!("Color picked: {}", to_hex(color)));
        }
    }

    /// One-shot fill of every cell; the active tool is left alone.
    pub fn fill_screen(&mut self) {
        self.commit_gesture();
        let before = self.grid.clone();
        let cell = self.active_cell();
        if self.grid.fill_screen(cell) > 0 {
            self.record("Fill Screen", before);
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.commit_gesture();
        self.tools.tool = tool;
        report(&mut self.status, format!("Tool: {}", tool.label().to_uppercase()));
    }

    pub fn set_color(&mut self, color: Rgba<u8>) {
        self.tools.color = color;
    }

    pub fn zoom(&mut self, steps: i8) {
        self.tools.change_zoom(steps as f32 * ZOOM_STEP);
    }

    /// Start over with an empty `size × size` grid.  The reset is not
    /// undoable and becomes the new history baseline.
    pub fn resize_grid(&mut self, size: usize) {
        self.commit_gesture();
        self.grid.resize(size);
        self.history.clear();
        report(
            &mut self.status,
            format!("Grid: {}x{}", self.grid.size(), self.grid.size()),
        );
    }

    pub fn clear(&mut self) {
        self.commit_gesture();
        let before = self.grid.clone();
        if self.grid.fill_screen(Cell::Transparent) > 0 {
            self.record("Clear", before);
        }
    }

    // ---- history ------------------------------------------------------------

    pub fn undo(&mut self) {
        self.commit_gesture();
        if let Some(desc) = self.history.undo(&mut self.grid) {
            report(&mut self.status, format!("Undo: {}", desc));
        }
    }

    pub fn redo(&mut self) {
        self.commit_gesture();
        if let Some(desc) = self.history.redo(&mut self.grid) {
            report(&mut self.status, format!("Redo: {}", desc));
        }
    }

    /// Brush size has no meaning on the grid, so `[` / `]` are ignored.
    pub fn handle_shortcut(&mut self, action: ShortcutAction) {
        match action {
            ShortcutAction::SelectTool(tool) => self.set_tool(tool),
            ShortcutAction::Undo => self.undo(),
            ShortcutAction::Redo => self.redo(),
            ShortcutAction::ShrinkBrush | ShortcutAction::GrowBrush => {}
        }
    }

    pub fn export(&mut self, sink: &mut dyn ImageSink) -> Result<(), ExportError> {
        self.commit_gesture();
        let image = self.grid.export_image(self.export_scale);
        let result = sink.save_png(&image, &suggested_file_name("pixel-art"));
        export_status(&mut self.status, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::TRANSPARENT;
    use crate::io::DirectorySink;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
    const GREEN: Rgba<u8> = Rgba([0, 255, 0, 255]);
    const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

    fn canvas_project() -> CanvasProject {
        let settings = EditorSettings {
            canvas_width: 40,
            canvas_height: 30,
            ..EditorSettings::default()
        };
        CanvasProject::new(&settings)
    }

    fn pixel_project(size: usize) -> PixelArtProject {
        let settings = EditorSettings {
            grid_size: size,
            ..EditorSettings::default()
        };
        PixelArtProject::new(&settings)
    }

    fn drag(project: &mut CanvasProject, from: (f32, f32), to: (f32, f32)) {
        project.pointer_down(from);
        project.pointer_move(to);
        project.pointer_up();
    }

    #[test]
    fn stroke_on_one_layer_leaves_the_other_alone() {
        let mut project = canvas_project();
        let layer_a = project.canvas_state.active_layer_id();
        let layer_b = project.add_layer();

        project.set_active_layer(layer_a);
        project.set_color(RED);
        drag(&mut project, (5.0, 5.0), (15.0, 5.0));
        let a_after_stroke = project.canvas_state.capture_layer(layer_a).expect("layer a");

        let composite = project.canvas_state.composite();
        assert_eq!(*composite.get_pixel(10, 5), RED);

        project.set_active_layer(layer_b);
        project.set_color(BLUE);
        drag(&mut project, (20.0, 20.0), (30.0, 25.0));

        assert_eq!(project.canvas_state.capture_layer(layer_a), Some(a_after_stroke));
        assert_eq!(*project.canvas_state.composite().get_pixel(10, 5), RED);
        assert_eq!(project.history.len(), 2);
    }

    #[test]
    fn deleting_the_last_layer_reports_and_keeps_it() {
        let mut project = canvas_project();
        let only = project.canvas_state.active_layer_id();
        assert!(!project.delete_active_layer());
        assert_eq!(project.canvas_state.layer_count(), 1);
        assert_eq!(project.canvas_state.active_layer_id(), only);
        assert_eq!(project.take_status().as_deref(), Some("Cannot delete the last layer"));
    }

    #[test]
    fn undo_follows_the_stroke_back_to_its_layer() {
        let mut project = canvas_project();
        let layer_a = project.canvas_state.active_layer_id();
        drag(&mut project, (2.0, 2.0), (8.0, 8.0));
        let layer_b = project.add_layer();
        assert_eq!(project.canvas_state.active_layer_id(), layer_b);

        project.undo();
        assert_eq!(project.canvas_state.active_layer_id(), layer_a);
        let restored = project.canvas_state.capture_layer(layer_a).expect("layer a");
        assert_eq!(*restored.get_pixel(5, 5), project.canvas_state.background());
    }

    #[test]
    fn undo_redo_round_trip_restores_strokes() {
        let mut project = canvas_project();
        let id = project.canvas_state.active_layer_id();
        for i in 0..5 {
            let y = 3.0 + i as f32 * 5.0;
            drag(&mut project, (2.0, y), (35.0, y));
        }
        let final_pixels = project.canvas_state.capture_layer(id).expect("layer");
        for _ in 0..5 {
            project.undo();
        }
        assert!(!project.history.can_undo());
        for _ in 0..5 {
            project.redo();
        }
        assert_eq!(project.canvas_state.capture_layer(id), Some(final_pixels));
    }

    #[test]
    fn leaving_the_surface_commits_the_stroke() {
        let mut project = canvas_project();
        project.pointer_down((4.0, 4.0));
        project.pointer_move((9.0, 4.0));
        project.pointer_leave();
        assert!(!project.is_drawing());
        assert_eq!(project.history.len(), 1);
        // Moves after the stroke ended do not paint.
        project.pointer_move((20.0, 20.0));
        assert_eq!(project.history.len(), 1);
    }

    #[test]
    fn eraser_clears_to_transparent() {
        let mut project = canvas_project();
        project.add_layer();
        project.set_color(GREEN);
        project.fill_layer();
        project.set_tool(Tool::Erase);
        drag(&mut project, (10.0, 10.0), (12.0, 10.0));
        let id = project.canvas_state.active_layer_id();
        let pixels = project.canvas_state.capture_layer(id).expect("layer");
        assert_eq!(*pixels.get_pixel(11, 10), TRANSPARENT);
        assert_eq!(*pixels.get_pixel(30, 25), GREEN);
    }

    #[test]
    fn fill_and_fill_screen_fill_the_active_layer_once() {
        let mut project = canvas_project();
        project.set_color(RED);
        project.set_tool(Tool::FillScreen);
        project.pointer_down((1.0, 1.0));
        project.pointer_up();
        assert_eq!(project.history.len(), 1);
        assert_eq!(*project.canvas_state.composite().get_pixel(39, 29), RED);

        project.set_tool(Tool::Fill);
        project.set_color(BLUE);
        project.pointer_down((0.0, 0.0));
        assert_eq!(project.history.len(), 2);
        assert_eq!(*project.canvas_state.composite().get_pixel(0, 0), BLUE);
    }

    #[test]
    fn pick_sets_brush_color_and_returns_to_paint() {
        let mut project = canvas_project();
        project.set_color(Rgba([0x12, 0x34, 0x56, 255]));
        project.fill_layer();
        project.set_color(RED);
        project.set_tool(Tool::Pick);
        let entries = project.history.len();

        project.pointer_down((3.0, 3.0));
        project.pointer_up();
        assert_eq!(project.tools.color, Rgba([0x12, 0x34, 0x56, 255]));
        assert_eq!(project.tools.tool, Tool::Paint);
        assert_eq!(project.history.len(), entries);
    }

    #[test]
    fn shortcuts_drive_tools_size_and_history() {
        let mut project = canvas_project();
        project.handle_shortcut(ShortcutAction::SelectTool(Tool::Erase));
        assert_eq!(project.tools.tool, Tool::Erase);
        assert_eq!(project.take_status().as_deref(), Some("Tool: ERASER"));

        project.handle_shortcut(ShortcutAction::GrowBrush);
        assert_eq!(project.tools.size(), 7);
        assert_eq!(project.take_status().as_deref(), Some("Size: 7px"));

        project.handle_shortcut(ShortcutAction::SelectTool(Tool::Paint));
        drag(&mut project, (1.0, 1.0), (5.0, 5.0));
        project.handle_shortcut(ShortcutAction::Undo);
        assert!(project.history.can_redo());
        project.handle_shortcut(ShortcutAction::Redo);
        assert!(!project.history.can_redo());
    }

    #[test]
    fn canvas_export_writes_composite_sized_png() {
        let dir = std::env::temp_dir().join(format!("drawstudio-canvas-{}", std::process::id()));
        let mut sink = DirectorySink::new(&dir);
        let mut project = canvas_project();
        project.export(&mut sink).expect("export");
        let status = project.take_status().expect("status");
        assert!(status.starts_with("Exported"));

        let exported = std::fs::read_dir(&dir)
            .expect("dir")
            .filter_map(Result::ok)
            .find(|e| e.file_name().to_string_lossy().starts_with("art-"))
            .expect("exported file");
        let image = image::open(exported.path()).expect("decodes").to_rgba8();
        assert_eq!(image.dimensions(), (40, 30));
        let _ = std::fs::remove_dir_all(&dir);
    }

    // ---- pixel art ----------------------------------------------------------

    #[test]
    fn same_color_flood_fill_is_not_recorded() {
        let mut project = pixel_project(4);
        project.set_color(RED);
        project.pointer_down(1, 1);
        project.pointer_up();
        assert_eq!(project.history.len(), 1);

        project.set_tool(Tool::Fill);
        project.pointer_down(1, 1);
        project.pointer_up();
        assert_eq!(project.history.len(), 1);
        let painted = project.grid.cells().iter().filter(|c| **c == Cell::Color(RED)).count();
        assert_eq!(painted, 1);
    }

    #[test]
    fn fill_screen_button_keeps_the_active_tool() {
        let mut project = pixel_project(4);
        project.set_color(GREEN);
        project.fill_screen();
        assert!(project.grid.cells().iter().all(|c| *c == Cell::Color(GREEN)));
        assert_eq!(project.grid.cells().len(), 16);
        assert_eq!(project.tools.tool, Tool::Paint);
        assert_eq!(project.history.len(), 1);

        // Nothing left to change.
        project.fill_screen();
        assert_eq!(project.history.len(), 1);
    }

    #[test]
    fn pick_round_trips_and_ignores_transparent_cells() {
        let mut project = pixel_project(4);
        let c = Rgba([0x80, 0x00, 0x80, 255]);
        project.set_color(c);
        project.pointer_down(2, 3);
        project.pointer_up();

        project.set_color(BLUE);
        project.set_tool(Tool::Pick);
        project.pointer_down(0, 0);
        assert_eq!(project.tools.color, BLUE);
        project.pointer_down(2, 3);
        assert_eq!(project.tools.color, c);
    }

    #[test]
    fn drag_gesture_is_a_single_history_entry() {
        let mut project = pixel_project(8);
        project.pointer_down(0, 0);
        for x in 1..6 {
            project.pointer_drag(x, 0);
        }
        project.pointer_up();
        assert_eq!(project.history.len(), 1);

        project.undo();
        assert!(project.grid.cells().iter().all(|c| c.is_transparent()));
        project.redo();
        assert_eq!(project.grid.get(5, 0), Some(Cell::Color(RED)));
    }

    #[test]
    fn resize_clears_history() {
        let mut project = pixel_project(8);
        project.pointer_down(1, 1);
        project.pointer_up();
        assert!(project.history.can_undo());

        project.resize_grid(12);
        assert_eq!(project.grid.size(), 12);
        assert!(!project.history.can_undo());
        assert!(!project.history.can_redo());
    }

    #[test]
    fn history_is_capped_at_thirty_entries() {
        let mut project = pixel_project(8);
        for i in 0..31 {
            project.pointer_down(i % 8, i / 8);
            project.pointer_up();
        }
        assert_eq!(project.history.len(), 30);
        for _ in 0..40 {
            project.undo();
        }
        // The very first cell could not be undone.
        assert_eq!(project.grid.get(0, 0), Some(Cell::Color(RED)));
        assert_eq!(project.grid.get(1, 0), Some(Cell::Transparent));
    }

    #[test]
    fn pixel_export_is_scaled_by_settings() {
        let dir = std::env::temp_dir().join(format!("drawstudio-pixel-{}", std::process::id()));
        let mut sink = DirectorySink::new(&dir);
        let mut project = pixel_project(4);
        project.export(&mut sink).expect("export");

        let exported = std::fs::read_dir(&dir)
            .expect("dir")
            .filter_map(Result::ok)
            .find(|e| e.file_name().to_string_lossy().starts_with("pixel-art-"))
            .expect("exported file");
        let image = image::open(exported.path()).expect("decodes").to_rgba8();
        assert_eq!(image.width(), 4 * crate::grid::DEFAULT_EXPORT_SCALE);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
