use ratatui::style::Color;

use crate::model::UiConfig;

/// Board colors, overridable from `[ui.colors]`
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub background: Color,
    /// Card labels and field values
    pub text: Color,
    /// Titles and the selected card
    pub text_bright: Color,
    /// Borders, field names, hints
    pub dim: Color,
    /// Drop target and focused input
    pub highlight: Color,
    pub selection_bg: Color,
    /// Loading and status-row messages
    pub warning: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            warning: Color::Rgb(0xFF, 0xD7, 0x00),
        }
    }
}

/// Parse `#RRGGBB` or `#RGB`
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => {
            let short = |i: usize| channel(&hex[i..i + 1]).map(|v| v * 0x11);
            Some(Color::Rgb(short(0)?, short(1)?, short(2)?))
        }
        _ => None,
    }
}

impl Theme {
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();
        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                continue;
            };
            let slot = match key.as_str() {
                "background" => &mut theme.background,
                "text" => &mut theme.text,
                "text_bright" => &mut theme.text_bright,
                "dim" => &mut theme.dim,
                "highlight" => &mut theme.highlight,
                "selection_bg" => &mut theme.selection_bg,
                "warning" => &mut theme.warning,
                _ => continue,
            };
            *slot = color;
        }
        theme
    }
}
