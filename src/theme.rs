use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme built from configuration. Only the first call wins.
pub fn init(theme: Theme) {
    if THEME.set(theme).is_err() {
        tracing::debug!("theme already initialised");
    }
}

/// Get the active theme, falling back to the default palette.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone)]
pub struct Theme {
    #[allow(dead_code)]
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub event: Style,
    pub drag: Style,
    pub accent: Style,
    pub error: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            event: Style::default().fg(Color::Black).bg(Color::Green),
            drag: Style::default().fg(Color::Black).bg(Color::Magenta),
            accent: Style::default().fg(Color::Green),
            error: Style::default().fg(Color::Red),
        }
    }
}

impl Theme {
    /// Built-in preset by name; unknown names give the default palette.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::dracula(),
            "nord" => Self::nord(),
            _ => Self::default(),
        }
    }

    fn dracula() -> Self {
        Self {
            name: "dracula".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(189, 147, 249)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(139, 233, 253)),
            header: Style::default().fg(Color::Rgb(248, 248, 242)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(98, 114, 164)),
            border: Style::default().fg(Color::Rgb(68, 71, 90)),
            status: Style::default()
                .fg(Color::Rgb(248, 248, 242))
                .bg(Color::Rgb(68, 71, 90)),
            event: Style::default().fg(Color::Black).bg(Color::Rgb(80, 250, 123)),
            drag: Style::default().fg(Color::Black).bg(Color::Rgb(255, 121, 198)),
            accent: Style::default().fg(Color::Rgb(80, 250, 123)),
            error: Style::default().fg(Color::Rgb(255, 85, 85)),
        }
    }

    fn nord() -> Self {
        Self {
            name: "nord".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Rgb(235, 203, 139)),
            selected: Style::default().fg(Color::Black).bg(Color::Rgb(136, 192, 208)),
            header: Style::default().fg(Color::Rgb(229, 233, 240)).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::Rgb(76, 86, 106)),
            border: Style::default().fg(Color::Rgb(67, 76, 94)),
            status: Style::default()
                .fg(Color::Rgb(229, 233, 240))
                .bg(Color::Rgb(67, 76, 94)),
            event: Style::default().fg(Color::Black).bg(Color::Rgb(163, 190, 140)),
            drag: Style::default().fg(Color::Black).bg(Color::Rgb(180, 142, 173)),
            accent: Style::default().fg(Color::Rgb(163, 190, 140)),
            error: Style::default().fg(Color::Rgb(191, 97, 106)),
        }
    }
}

// ── [theme] section of config.toml ──

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ThemeConfig {
    pub preset: Option<String>,
    pub today_bg: Option<String>,
    pub selected_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub event_bg: Option<String>,
    pub drag_bg: Option<String>,
    pub accent_fg: Option<String>,
}

impl ThemeConfig {
    pub fn into_theme(self) -> Theme {
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        if let Some(c) = color_field("today_bg", &self.today_bg) {
            theme.today = theme.today.bg(c);
        }
        if let Some(c) = color_field("selected_bg", &self.selected_bg) {
            theme.selected = theme.selected.bg(c);
        }
        if let Some(c) = color_field("header_fg", &self.header_fg) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = color_field("dim_fg", &self.dim_fg) {
            theme.dim = theme.dim.fg(c);
        }
        if let Some(c) = color_field("border_fg", &self.border_fg) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = color_field("event_bg", &self.event_bg) {
            theme.event = theme.event.bg(c);
        }
        if let Some(c) = color_field("drag_bg", &self.drag_bg) {
            theme.drag = theme.drag.bg(c);
        }
        if let Some(c) = color_field("accent_fg", &self.accent_fg) {
            theme.accent = theme.accent.fg(c);
        }

        theme
    }
}

fn color_field(key: &str, value: &Option<String>) -> Option<Color> {
    let value = value.as_deref()?;
    let color = parse_color(value);
    if color.is_none() {
        tracing::warn!(key, value, "ignoring unrecognised colour");
    }
    color
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(hex.get(0..2)?, 16).ok()?;
        let g = u8::from_str_radix(hex.get(2..4)?, 16).ok()?;
        let b = u8::from_str_radix(hex.get(4..6)?, 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_names() {
        assert_eq!(parse_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_color(" Cyan "), Some(Color::Cyan));
        assert_eq!(parse_color("#ff80"), None);
        assert_eq!(parse_color("#zz0000"), None);
        assert_eq!(parse_color("chartreuse"), None);
    }

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let theme = ThemeConfig {
            preset: Some("nord".into()),
            event_bg: Some("#010203".into()),
            accent_fg: Some("not a colour".into()),
            ..Default::default()
        }
        .into_theme();

        assert_eq!(theme.name, "nord");
        assert_eq!(theme.event.bg, Some(Color::Rgb(1, 2, 3)));
        assert_eq!(theme.accent, Theme::preset("nord").accent);
    }

    #[test]
    fn unknown_preset_falls_back_to_default() {
        assert_eq!(Theme::preset("solarized").name, "default");
    }
}
