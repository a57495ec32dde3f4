use image::Rgba;

use crate::canvas::DEFAULT_BACKGROUND;
use crate::components::history::DEFAULT_HISTORY_LIMIT;
use crate::grid::{DEFAULT_EXPORT_SCALE, DEFAULT_GRID_SIZE};
use crate::theme::ThemeMode;

/// Which editor is in front.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum AppTab {
    #[default]
    CanvasPro,
    PixelArt,
}

impl AppTab {
    pub fn label(self) -> &'static str {
        match self {
            AppTab::CanvasPro => "Canvas Pro",
            AppTab::PixelArt => "Pixel Art",
        }
    }
}

/// Session configuration.  Built from launch flags, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    pub canvas_width: u32,
    pub canvas_height: u32,
    pub background: Rgba<u8>,
    pub brush_color: Rgba<u8>,
    pub brush_size: u32,
    pub pixel_color: Rgba<u8>,
    pub grid_size: usize,
    /// Pixels per cell in Pixel Art exports.
    pub export_scale: u32,
    pub history_limit: usize,
    pub theme: ThemeMode,
    pub start_tab: AppTab,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            background: DEFAULT_BACKGROUND,
            brush_color: Rgba([0x7F, 0x5A, 0xF0, 255]),
            brush_size: 5,
            pixel_color: Rgba([255, 0, 0, 255]),
            grid_size: DEFAULT_GRID_SIZE,
            export_scale: DEFAULT_EXPORT_SCALE,
            history_limit: DEFAULT_HISTORY_LIMIT,
            theme: ThemeMode::default(),
            start_tab: AppTab::default(),
        }
    }
}
