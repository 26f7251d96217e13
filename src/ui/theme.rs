//! Theme configuration for the TUI.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;

use crate::data::Health;

/// Colors and styles used by every view.
///
/// [`Theme::auto_detect()`] picks a palette from the terminal background;
/// [`Theme::dark()`] and [`Theme::light()`] force one.
#[derive(Debug, Clone)]
pub struct Theme {
    pub highlight: Color,
    /// Degraded health and mid-range readings.
    pub warning: Color,
    /// Backend down and low readings.
    pub critical: Color,
    /// Excellent health and high readings.
    pub healthy: Color,
    pub border: Color,
    /// Line colors for the four overview metrics.
    pub series: [Color; 4],
    /// Prompt log author colors.
    pub user: Color,
    pub assistant: Color,
    pub header: Style,
    pub selected: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,
    pub border_type: BorderType,
}

impl Theme {
    pub fn dark() -> Self {
        Self::palette(
            Color::Cyan,
            Color::Gray,
            Color::DarkGray,
            [Color::Magenta, Color::Cyan, Color::Green, Color::Yellow],
        )
    }

    pub fn light() -> Self {
        Self::palette(
            Color::Blue,
            Color::DarkGray,
            Color::LightBlue,
            [Color::Magenta, Color::Blue, Color::Green, Color::Red],
        )
    }

    // Status colors are shared; only the accent, chrome and chart lines differ
    fn palette(accent: Color, chrome: Color, selection: Color, series: [Color; 4]) -> Self {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        Self {
            highlight: accent,
            warning: Color::Yellow,
            critical: Color::Red,
            healthy: Color::Green,
            border: chrome,
            series,
            user: accent,
            assistant: Color::Magenta,
            header: bold.fg(accent),
            selected: bold.bg(selection),
            tab_active: bold.fg(accent),
            tab_inactive: Style::default().fg(chrome),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        // Use terminal-light crate to detect background luminance
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Get style for a backend health value
    pub fn health_style(&self, health: &Health) -> Style {
        match health {
            Health::Excellent => Style::default().fg(self.healthy),
            Health::Unknown => Style::default().add_modifier(Modifier::DIM),
            Health::Reported(status) if is_down(status) => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
            Health::Reported(_) => Style::default().fg(self.warning),
        }
    }

    /// Style for a 0-100 reading: green when high, yellow, red when low.
    pub fn level_style(&self, value: f64) -> Style {
        if value >= 90.0 {
            Style::default().fg(self.healthy)
        } else if value >= 75.0 {
            Style::default().fg(self.warning)
        } else {
            Style::default().fg(self.critical)
        }
    }
}

// Spring Boot statuses meaning the service is unavailable
fn is_down(status: &str) -> bool {
    matches!(status, "DOWN" | "OUT_OF_SERVICE")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_colors() {
        let theme = Theme::dark();
        assert_eq!(theme.health_style(&Health::Excellent).fg, Some(Color::Green));
        assert_eq!(theme.health_style(&Health::Reported("DOWN".into())).fg, Some(Color::Red));
        assert_eq!(
            theme.health_style(&Health::Reported("UNKNOWN".into())).fg,
            Some(Color::Yellow)
        );
    }

    #[test]
    fn level_thresholds() {
        let theme = Theme::light();
        assert_eq!(theme.level_style(95.0).fg, Some(Color::Green));
        assert_eq!(theme.level_style(80.0).fg, Some(Color::Yellow));
        assert_eq!(theme.level_style(10.0).fg, Some(Color::Red));
    }
}
