//! Help overlay widget showing keyboard shortcuts.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use super::theme::Theme;

const DESCRIPTION: &str = "Look up a Lichess player and follow their rating across time controls. Profile and history are fetched once per search; switching modes or ranges reuses them.";

type Shortcut = (&'static str, &'static str);

/// Key bindings grouped by what they act on
const SECTIONS: [(&str, &[Shortcut]); 4] = [
    (
        "Search",
        &[
            ("/ or Tab", "Focus the search box"),
            ("Enter", "Analyze the typed username"),
            ("Esc", "Cancel a running search / leave the box"),
            ("Ctrl+U", "Clear the search box"),
        ],
    ),
    (
        "Modes",
        &[
            ("1-5", "Bullet, Blitz, Rapid, Classical, Puzzles"),
            ("← / →, h / l", "Previous / next mode"),
        ],
    ),
    (
        "Time range",
        &[
            ("[", "Narrower window (3M, 6M, 1Y)"),
            ("]", "Wider window (up to All Time)"),
        ],
    ),
    (
        "General",
        &[
            ("r", "Re-run the last search"),
            ("? or F1", "Toggle this help"),
            ("q / Ctrl+C", "Quit"),
        ],
    ),
];

/// Help overlay showing all keyboard shortcuts
pub struct HelpOverlay<'a> {
    theme: &'a Theme,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        HelpOverlay { theme }
    }

    /// Shortcut table rendered by the overlay
    pub fn sections() -> &'static [(&'static str, &'static [Shortcut])] {
        &SECTIONS
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let heading = Style::default()
            .add_modifier(Modifier::BOLD)
            .add_modifier(Modifier::UNDERLINED);
        let key_style = Style::default().fg(self.theme.title);

        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("  {DESCRIPTION}"),
                Style::default().add_modifier(Modifier::ITALIC),
            )),
            Line::from(""),
        ];
        for (section, shortcuts) in Self::sections() {
            lines.push(Line::from(Span::styled(format!("  {section} "), heading)));
            lines.push(Line::from(""));
            lines.extend(shortcuts.iter().map(|(key, desc)| {
                Line::from(vec![
                    Span::raw("    "),
                    Span::styled(format!("{key:<14}"), key_style),
                    Span::raw(*desc),
                ])
            }));
            lines.push(Line::from(""));
        }
        lines
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let popup_area = popup_area(area, 65, 80);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" lichess-insight Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style())
            .style(self.theme.surface_style());
        let paragraph = Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .style(self.theme.surface_style());

        frame.render_widget(paragraph, popup_area);
    }
}

/// Centered popup taking the given percentages of `area`
fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(row);
    popup
}
