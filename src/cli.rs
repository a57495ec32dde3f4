// ============================================================================
// Launch options (clap Derive)
// ============================================================================
//
// Usage examples:
//   DrawStudio --width 1024 --height 768
//   DrawStudio --tab pixel-art --grid-size 32 --theme light

use clap::Parser;

use crate::settings::{AppTab, EditorSettings};
use crate::theme::ThemeMode;

/// DrawStudio layered painter and pixel-art editor.
#[derive(Parser, Debug)]
#[command(name = "DrawStudio", about = "Layered painter and pixel-art editor")]
pub struct LaunchArgs {
    /// Canvas Pro document width in pixels.
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(u32).range(1..=8192))]
    pub width: Option<u32>,

    /// Canvas Pro document height in pixels.
    #[arg(long, value_name = "PX", value_parser = clap::value_parser!(u32).range(1..=8192))]
    pub height: Option<u32>,

    /// Pixel Art grid size (cells per side, 4-64).
    #[arg(long, value_name = "N")]
    pub grid_size: Option<usize>,

    /// UI theme.
    #[arg(long, value_enum)]
    pub theme: Option<ThemeMode>,

    /// Editor shown at startup.
    #[arg(long, value_enum)]
    pub tab: Option<AppTab>,

    /// Undo steps kept per document.
    #[arg(long, value_name = "STEPS")]
    pub history_limit: Option<usize>,
}

impl LaunchArgs {
    /// Overlay the given flags on the default settings.
    pub fn editor_settings(&self) -> EditorSettings {
        let mut settings = EditorSettings::default();
        if let Some(w) = self.width {
            settings.canvas_width = w;
        }
        if let Some(h) = self.height {
            settings.canvas_height = h;
        }
        if let Some(n) = self.grid_size {
            settings.grid_size = n;
        }
        if let Some(theme) = self.theme {
            settings.theme = theme;
        }
        if let Some(tab) = self.tab {
            settings.start_tab = tab;
        }
        if let Some(limit) = self.history_limit {
            settings.history_limit = limit.max(1);
        }
        settings
    }
}
