use eframe::egui;
use image::Rgba;

use crate::canvas::{CanvasState, LayerId, StrokeStyle, TiledImage};
use crate::components::history::LayerPixelsCommand;

pub const MIN_BRUSH_SIZE: u32 = 1;
pub const MAX_BRUSH_SIZE: u32 = 100;
/// Brush size change for the `[` / `]` shortcuts.
pub const BRUSH_SIZE_STEP: i32 = 2;
pub const ZOOM_STEP: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Paint,
    Erase,
    Fill,
    Pick,
    FillScreen,
}

/// How a tool's pointer-down is turned into an engine mutation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// Mutates while the pointer moves; one history entry per gesture.
    Stroke,
    /// One synchronous mutation wrapped in a single history entry.
    Atomic,
    /// Reads state, mutates nothing.
    Sample,
}

impl Tool {
    pub fn all() -> &'static [Tool] {
        &[Tool::Paint, Tool::Erase, Tool::Fill, Tool::Pick, Tool::FillScreen]
    }

    pub fn dispatch(self) -> Dispatch {
        match self {
            Tool::Paint | Tool::Erase => Dispatch::Stroke,
            Tool::Fill | Tool::FillScreen => Dispatch::Atomic,
            Tool::Pick => Dispatch::Sample,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tool::Paint => "Brush",
            Tool::Erase => "Eraser",
            Tool::Fill => "Fill",
            Tool::Pick => "Picker",
            Tool::FillScreen => "Fill Screen",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Tool::Paint => "🖌",
            Tool::Erase => "⌫",
            Tool::Fill => "🪣",
            Tool::Pick => "💧",
            Tool::FillScreen => "⬛",
        }
    }

    pub fn shortcut_hint(self) -> Option<&'static str> {
        match self {
            Tool::Paint => Some("B"),
            Tool::Erase => Some("E"),
            Tool::Fill => Some("F / G"),
            Tool::Pick => Some("I"),
            Tool::FillScreen => None,
        }
    }
}

// ============================================================================
// TOOL PROPERTIES
// ============================================================================

#[derive(Clone, Debug)]
pub struct ToolProperties {
    pub tool: Tool,
    pub color: Rgba<u8>,
    size: u32,
    zoom: f32,
    zoom_range: (f32, f32),
}

impl ToolProperties {
    pub fn new(color: Rgba<u8>, size: u32, zoom_range: (f32, f32)) -> Self {
        let mut props = Self {
            tool: Tool::default(),
            color,
            size: MIN_BRUSH_SIZE,
            zoom: 1.0,
            zoom_range,
        };
        props.set_size(size);
        props.set_zoom(1.0);
        props
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size.clamp(MIN_BRUSH_SIZE, MAX_BRUSH_SIZE);
    }

    pub fn change_size(&mut self, delta: i32) {
        let next = (self.size as i64 + delta as i64).clamp(MIN_BRUSH_SIZE as i64, MAX_BRUSH_SIZE as i64);
        self.size = next as u32;
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        let (lo, hi) = self.zoom_range;
        // Round to the step grid so repeated +/- never drifts.
        let snapped = (zoom * 100.0).round() / 100.0;
        self.zoom = snapped.clamp(lo, hi);
    }

    pub fn change_zoom(&mut self, delta: f32) {
        self.set_zoom(self.zoom + delta);
    }

    /// Brush parameters for the layer engine.
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            size: self.size,
            erase: self.tool == Tool::Erase,
        }
    }
}

// ============================================================================
// KEYBOARD SHORTCUTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShortcutAction {
    SelectTool(Tool),
    Undo,
    Redo,
    ShrinkBrush,
    GrowBrush,
}

/// Map a key press to an editor action.  Nothing fires while a text field
/// has keyboard focus.
pub fn shortcut_for(key: char, command: bool, text_focused: bool) -> Option<ShortcutAction> {
    if text_focused {
        return None;
    }
    let key = key.to_ascii_lowercase();
    if command {
        return match key {
            'z' => Some(ShortcutAction::Undo),
            'y' => Some(ShortcutAction::Redo),
            _ => None,
        };
    }
    match key {
        'b' => Some(ShortcutAction::SelectTool(Tool::Paint)),
        'e' => Some(ShortcutAction::SelectTool(Tool::Erase)),
        'f' | 'g' => Some(ShortcutAction::SelectTool(Tool::Fill)),
        'i' => Some(ShortcutAction::SelectTool(Tool::Pick)),
        '[' => Some(ShortcutAction::ShrinkBrush),
        ']' => Some(ShortcutAction::GrowBrush),
        _ => None,
    }
}

/// Collect this frame's shortcut actions from egui input.
///
/// Letters and brackets arrive as text events; command+Z / command+Y never
/// produce text, so they are read from key events.
pub fn collect_shortcuts(ctx: &egui::Context) -> Vec<ShortcutAction> {
    let text_focused = ctx.wants_keyboard_input();
    ctx.input(|i| {
        let mut actions = Vec::new();
        for event in &i.events {
            match event {
                egui::Event::Text(text) if !i.modifiers.command => {
                    actions.extend(text.chars().filter_map(|c| shortcut_for(c, false, text_focused)));
                }
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } if modifiers.command => {
                    let c = match key {
                        egui::Key::Z => 'z',
                        egui::Key::Y => 'y',
                        _ => continue,
                    };
                    actions.extend(shortcut_for(c, true, text_focused));
                }
                _ => {}
            }
        }
        actions
    })
}

// ============================================================================
// STROKE TRACKER - Idle / Drawing state for the layer engine
// ============================================================================

/// Tracks one in-progress layer stroke for undo/redo integration.
#[derive(Default)]
pub struct StrokeTracker {
    layer_id: Option<LayerId>,
    /// Layer pixels captured at pointer-down.
    before: Option<TiledImage>,
    description: String,
}

impl StrokeTracker {
    pub fn is_active(&self) -> bool {
        self.layer_id.is_some()
    }

    /// Idle → Drawing: remember the active layer's pixels.
    pub fn start(&mut self, canvas: &CanvasState, description: &str) {
        let layer = canvas.active_layer();
        self.layer_id = Some(layer.id);
        self.before = Some(layer.pixels.clone());
        self.description = description.to_string();
    }

    /// Drawing → Idle: pair the saved pixels with the layer's current ones.
    pub fn finish(&mut self, canvas: &CanvasState) -> Option<LayerPixelsCommand> {
        let layer_id = self.layer_id.take()?;
        let before = self.before.take()?;
        let after = canvas.capture_layer(layer_id)?;
        Some(LayerPixelsCommand::new(
            std::mem::take(&mut self.description),
            layer_id,
            before,
            after,
        ))
    }
}

// ============================================================================
// TOOLS PANEL - tool buttons, brush size, zoom
// ============================================================================

/// What the tools panel asked for this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToolPanelAction {
    SelectTool(Tool),
    SizeChanged,
    Zoom(i8),
}

/// Draw a vertical strip of tool buttons; `tools` lists the ones this
/// editor offers.
pub fn show_tool_buttons(ui: &mut egui::Ui, props: &ToolProperties, tools: &[Tool]) -> Option<ToolPanelAction> {
    let mut action = None;
    for &tool in tools {
        let label = format!("{} {}", tool.icon(), tool.label());
        let mut response = ui.selectable_label(props.tool == tool, label);
        if let Some(hint) = tool.shortcut_hint() {
            response = response.on_hover_text(format!("Shortcut: {}", hint));
        }
        if response.clicked() {
            action = Some(ToolPanelAction::SelectTool(tool));
        }
    }
    action
}

pub fn show_brush_size(ui: &mut egui::Ui, props: &mut ToolProperties) -> Option<ToolPanelAction> {
    let mut size = props.size();
    let changed = ui
        .add(egui::Slider::new(&mut size, MIN_BRUSH_SIZE..=MAX_BRUSH_SIZE).text("px"))
        .changed();
    if changed {
        props.set_size(size);
        return Some(ToolPanelAction::SizeChanged);
    }
    None
}

pub fn show_zoom_controls(ui: &mut egui::Ui, props: &ToolProperties) -> Option<ToolPanelAction> {
    let mut action = None;
    ui.horizontal(|ui| {
        if ui.small_button("−").clicked() {
            action = Some(ToolPanelAction::Zoom(-1));
        }
        ui.label(format!("{:.0}%", props.zoom() * 100.0));
        if ui.small_button("+").clicked() {
            action = Some(ToolPanelAction::Zoom(1));
        }
    });
    action
}
