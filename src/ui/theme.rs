//! Theme configuration for the TUI.

use ratatui::style::{Color, Modifier, Style};

use crate::data::TimeControl;

/// Lichess-style gold used for the selected mode and the rating line
const GOLD: Color = Color::Rgb(197, 160, 89);

/// Display attributes for one mode's tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeStyle {
    pub glyph: &'static str,
    pub color: Color,
}

/// Glyph and accent per mode, indexed in `TimeControl::ALL` order
const MODE_STYLES: [(TimeControl, ModeStyle); 5] = [
    (TimeControl::Bullet, ModeStyle { glyph: "»", color: Color::LightRed }),
    (TimeControl::Blitz, ModeStyle { glyph: "ϟ", color: Color::Yellow }),
    (TimeControl::Rapid, ModeStyle { glyph: "◷", color: Color::LightGreen }),
    (TimeControl::Classical, ModeStyle { glyph: "♜", color: Color::LightBlue }),
    (TimeControl::Puzzle, ModeStyle { glyph: "✦", color: Color::LightMagenta }),
];

/// Color theme for the application
#[derive(Debug, Clone)]
pub struct Theme {
    pub bg: Color,
    pub fg: Color,
    pub highlight_bg: Color,
    pub highlight_fg: Color,
    pub border: Color,
    pub title: Color,
    pub accent: Color,
    pub rising: Color,
    pub falling: Color,
    pub muted: Color,
    pub error: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            bg: Color::Reset,
            fg: Color::White,
            highlight_bg: Color::Rgb(60, 60, 80),
            highlight_fg: Color::White,
            border: Color::Rgb(100, 100, 120),
            title: Color::Cyan,
            accent: GOLD,
            rising: Color::Green,
            falling: Color::Red,
            muted: Color::Gray,
            error: Color::LightRed,
        }
    }
}

impl Theme {
    /// Base surface style used to paint widget backgrounds
    pub fn surface_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Convenience helper returning (border_style, title_style) for focus state
    pub fn panel_styles(&self, focused: bool) -> (Style, Style) {
        if focused {
            (self.focused_border_style(), self.focused_border_style())
        } else {
            (self.border_style(), self.title_style())
        }
    }

    /// Get style for normal text
    pub fn normal_style(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    /// Get style for highlighted/selected items
    pub fn highlight_style(&self) -> Style {
        Style::default()
            .fg(self.highlight_fg)
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    /// Get style for borders
    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    /// Get style for focused panel borders (distinct from normal borders)
    pub fn focused_border_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    /// Get style for titles
    pub fn title_style(&self) -> Style {
        Style::default().fg(self.title).add_modifier(Modifier::BOLD)
    }

    /// Get style for secondary text
    pub fn muted_style(&self) -> Style {
        Style::default().fg(self.muted).add_modifier(Modifier::DIM)
    }

    /// Get style for the error banner
    pub fn error_style(&self) -> Style {
        Style::default().fg(self.error).add_modifier(Modifier::BOLD)
    }

    /// Get style for a rating trend (`prog`)
    pub fn trend_style(&self, prog: i32) -> Style {
        let color = match prog.signum() {
            1 => self.rising,
            -1 => self.falling,
            _ => self.muted,
        };
        Style::default().fg(color)
    }

    /// Glyph and accent color for a mode tile
    pub fn mode_style(&self, mode: TimeControl) -> ModeStyle {
        MODE_STYLES[mode.index()].1
    }
}
