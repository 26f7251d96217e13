//! Terminal rendering.
//!
//! One module per view plus the shared chrome in [`common`]. Views only read
//! from the [`DashboardContext`](crate::context::DashboardContext); all
//! mutation happens in [`events`](crate::events) or in background timers.

pub mod common;
pub mod consciousness;
pub mod overview;
pub mod prompt;
pub mod status;
pub mod theme;

pub use theme::Theme;

/// Sparkline characters (8 levels of height).
pub(crate) const SPARKLINE_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Render normalized levels (0-7) as sparkline characters, keeping the most
/// recent `width` values.
pub(crate) fn render_sparkline(levels: &[u8], width: usize) -> String {
    if levels.is_empty() {
        return " ".repeat(width);
    }

    let skip = levels.len().saturating_sub(width);
    levels[skip..]
        .iter()
        .map(|&v| SPARKLINE_CHARS[v.min(7) as usize])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparkline_keeps_latest_values() {
        assert_eq!(render_sparkline(&[0, 7, 3], 2), "█▄");
        assert_eq!(render_sparkline(&[0, 7], 8), "▁█");
    }

    #[test]
    fn empty_sparkline_is_blank() {
        assert_eq!(render_sparkline(&[], 4), "    ");
    }
}
