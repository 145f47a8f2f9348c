use serde::{Deserialize, Serialize};

pub const FONT_SIZE_RANGE: (f32, f32) = (16.0, 48.0);
pub const LINE_SPACING_RANGE: (f32, f32) = (1.0, 3.0);
pub const DISPLAY_WIDTH_RANGE: (f32, f32) = (0.5, 1.0);
pub const SCROLL_SPEED_RANGE: (f32, f32) = (5.0, 100.0);

/// Appearance and behaviour of the prompter.
///
/// Treated as an immutable snapshot: updates build a new value with struct
/// update syntax and hand it to the settings collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeleprompterSettings {
    pub font_size: f32,
    /// ARGB, e.g. `0xFF1F2937`.
    pub text_color: u32,
    pub line_spacing: f32,
    pub background_color: u32,
    /// Fraction of the screen width used for text.
    pub display_width: f32,
    /// Baseline scroll speed in px/s before the speed curve is applied.
    pub scroll_speed: f32,
    pub acceleration: f32,
    pub is_mirror_mode: bool,
    pub is_vertical_mirror_mode: bool,
    pub is_highlight_current_line: bool,
}

impl Default for TeleprompterSettings {
    fn default() -> Self {
        Self {
            font_size: 24.0,
            text_color: 0xFF1F_2937,
            line_spacing: 1.5,
            background_color: 0xFFFF_FFFF,
            display_width: 0.85,
            scroll_speed: 30.0,
            acceleration: 1.0,
            is_mirror_mode: false,
            is_vertical_mirror_mode: false,
            is_highlight_current_line: true,
        }
    }
}

fn clamp_or(value: f32, (lo, hi): (f32, f32), fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(lo, hi)
    } else {
        fallback
    }
}

impl TeleprompterSettings {
    /// Copy with every numeric field forced into its allowed range.
    pub fn normalized(self) -> Self {
        let defaults = Self::default();
        let acceleration = if self.acceleration.is_finite() && self.acceleration > 0.0 {
            self.acceleration
        } else {
            defaults.acceleration
        };
        Self {
            font_size: clamp_or(self.font_size, FONT_SIZE_RANGE, defaults.font_size),
            line_spacing: clamp_or(self.line_spacing, LINE_SPACING_RANGE, defaults.line_spacing),
            display_width: clamp_or(self.display_width, DISPLAY_WIDTH_RANGE, defaults.display_width),
            scroll_speed: clamp_or(self.scroll_speed, SCROLL_SPEED_RANGE, defaults.scroll_speed),
            acceleration,
            ..self
        }
    }

    /// Line height in the same unit as `font_size`.
    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_spacing
    }

    /// Horizontal padding on each side for a screen `screen_width` wide.
    pub fn side_padding(&self, screen_width: f32) -> f32 {
        screen_width * (1.0 - self.display_width) / 2.0
    }

    pub fn toggle_mirror(self) -> Self {
        Self {
            is_mirror_mode: !self.is_mirror_mode,
            ..self
        }
    }

    pub fn toggle_vertical_mirror(self) -> Self {
        Self {
            is_vertical_mirror_mode: !self.is_vertical_mirror_mode,
            ..self
        }
    }

    pub fn toggle_highlight_current_line(self) -> Self {
        Self {
            is_highlight_current_line: !self.is_highlight_current_line,
            ..self
        }
    }
}
