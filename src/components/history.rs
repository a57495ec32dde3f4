use eframe::egui;
use std::collections::VecDeque;

use crate::canvas::{CanvasState, LayerId, TiledImage};
use crate::grid::PixelGrid;

/// Number of undo steps kept per document.
pub const DEFAULT_HISTORY_LIMIT: usize = 30;

// ============================================================================
// COMMAND TRAIT
// ============================================================================

/// Trait for undoable/redoable commands against a document of type `T`.
pub trait Command<T> {
    fn undo(&self, target: &mut T);
    fn redo(&self, target: &mut T);
    fn description(&self) -> String;

    /// Commands that would not change anything are dropped by
    /// [`HistoryManager::push`].
    fn is_noop(&self) -> bool {
        false
    }

    fn memory_size(&self) -> usize {
        0
    }
}

// ============================================================================
// LAYER PIXELS COMMAND - before/after snapshot of one layer
// ============================================================================

/// Pixels of a single layer before and after a stroke or fill.
pub struct LayerPixelsCommand {
    description: String,
    layer_id: LayerId,
    before: TiledImage,
    after: TiledImage,
}

impl LayerPixelsCommand {
    pub fn new(description: String, layer_id: LayerId, before: TiledImage, after: TiledImage) -> Self {
        Self {
            description,
            layer_id,
            before,
            after,
        }
    }

    pub fn layer_id(&self) -> LayerId {
        self.layer_id
    }
}

impl Command<CanvasState> for LayerPixelsCommand {
    /// Restoring also re-activates the layer the edit came from.
    fn undo(&self, canvas: &mut CanvasState) {
        canvas.restore_layer(self.layer_id, &self.before);
    }

    fn redo(&self, canvas: &mut CanvasState) {
        canvas.restore_layer(self.layer_id, &self.after);
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn memory_size(&self) -> usize {
        self.before.memory_bytes() + self.after.memory_bytes()
    }
}

// ============================================================================
// GRID SNAPSHOT COMMAND - whole-grid before/after
// ============================================================================

pub struct GridSnapshotCommand {
    description: String,
    before: PixelGrid,
    after: PixelGrid,
}

impl GridSnapshotCommand {
    pub fn new(description: String, before: PixelGrid, after: PixelGrid) -> Self {
        Self {
            description,
            before,
            after,
        }
    }
}

impl Command<PixelGrid> for GridSnapshotCommand {
    fn undo(&self, grid: &mut PixelGrid) {
        *grid = self.before.clone();
    }

    fn redo(&self, grid: &mut PixelGrid) {
        *grid = self.after.clone();
    }

    fn description(&self) -> String {
        self.description.clone()
    }

    fn is_noop(&self) -> bool {
        self.before == self.after
    }

    fn memory_size(&self) -> usize {
        (self.before.cells().len() + self.after.cells().len()) * std::mem::size_of::<crate::grid::Cell>()
    }
}

// ============================================================================
// HISTORY MANAGER - bounded linear undo/redo
// ============================================================================

/// Linear undo/redo history.
///
/// `entries[..cursor]` are applied (undoable), `entries[cursor..]` are the
/// redo tail.  `cursor == 0` means there is nothing to undo.
pub struct HistoryManager<T> {
    entries: VecDeque<Box<dyn Command<T>>>,
    cursor: usize,
    max_history_size: usize,
}

impl<T> Default for HistoryManager<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T> HistoryManager<T> {
    pub fn new(max_history_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            cursor: 0,
            max_history_size: max_history_size.max(1),
        }
    }

    /// Record a completed action.  Returns `false` when the command was a
    /// no-op and nothing was recorded.
    pub fn push(&mut self, command: Box<dyn Command<T>>) -> bool {
        if command.is_noop() {
            return false;
        }

        // A new action discards everything that could have been redone.
        self.entries.truncate(self.cursor);
        self.entries.push_back(command);
        self.cursor += 1;

        while self.entries.len() > self.max_history_size {
            self.entries.pop_front();
            self.cursor -= 1;
        }
        true
    }

    pub fn undo(&mut self, target: &mut T) -> Option<String> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        let command = &self.entries[self.cursor];
        command.undo(target);
        Some(command.description())
    }

    pub fn redo(&mut self, target: &mut T) -> Option<String> {
        let command = self.entries.get(self.cursor)?;
        command.redo(target);
        self.cursor += 1;
        Some(command.description())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.entries.len()
    }

    pub fn undo_count(&self) -> usize {
        self.cursor
    }

    pub fn redo_count(&self) -> usize {
        self.entries.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_history_size(&self) -> usize {
        self.max_history_size
    }

    /// Descriptions of undoable entries, most recent first.
    pub fn undo_history(&self) -> Vec<String> {
        self.entries
            .iter()
            .take(self.cursor)
            .rev()
            .map(|c| c.description())
            .collect()
    }

    pub fn memory_usage(&self) -> usize {
        self.entries.iter().map(|c| c.memory_size()).sum()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }

    /// Undo `steps` entries (0 = stay on the current state).
    pub fn undo_to(&mut self, steps: usize, target: &mut T) {
        for _ in 0..steps {
            if self.undo(target).is_none() {
                break;
            }
        }
    }
}

// ============================================================================
// HISTORY PANEL - UI for displaying history
// ============================================================================

#[derive(Default)]
pub struct HistoryPanel {
    show_memory_info: bool,
}

impl HistoryPanel {
    /// Show the undo list; clicking an older entry reverts to it.
    pub fn show<T>(&mut self, ui: &mut egui::Ui, history: &mut HistoryManager<T>, target: &mut T) {
        ui.horizontal(|ui| {
            ui.label(format!(
                "Undo: {} | Redo: {}",
                history.undo_count(),
                history.redo_count()
            ));
            if ui.small_button("ℹ").on_hover_text("Show memory info").clicked() {
                self.show_memory_info = !self.show_memory_info;
            }
        });

        if self.show_memory_info {
            let mem_mb = history.memory_usage() as f64 / (1024.0 * 1024.0);
            ui.label(format!("Memory: {:.2} MB", mem_mb));
        }

        egui::ScrollArea::vertical()
            .id_source("history_scroll")
            .max_height(150.0)
            .show(ui, |ui| {
                let items = history.undo_history();
                if items.is_empty() {
                    ui.weak("No history yet");
                    return;
                }
                let mut revert_to: Option<usize> = None;
                for (i, desc) in items.iter().enumerate() {
                    let text = if i == 0 {
                        egui::RichText::new(format!("▶ {}", desc)).strong()
                    } else {
                        egui::RichText::new(format!("  {}", desc)).weak()
                    };
                    let response = ui.add(egui::Label::new(text).sense(egui::Sense::click()));
                    if response.clicked() && i > 0 {
                        revert_to = Some(i);
                    }
                    if i > 0 {
                        response.on_hover_text("Click to revert to this state");
                    }
                }
                if let Some(steps) = revert_to {
                    history.undo_to(steps, target);
                }
            });
    }
}
