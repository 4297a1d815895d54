//! UI widgets for the player dashboard.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::data::{Profile, TimeControl};
use super::theme::Theme;

/// Bio text when the player has none
const NO_BIO: &str = "No bio available.";

/// Format an integer with thousands separators, e.g. 12345 -> "12,345"
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Two-letter avatar from the username
fn initials(username: &str) -> String {
    username.chars().take(2).collect::<String>().to_uppercase()
}

/// Username input box
pub struct SearchBar<'a> {
    query: &'a str,
    loading: bool,
    theme: &'a Theme,
}

impl<'a> SearchBar<'a> {
    pub fn new(query: &'a str, loading: bool, theme: &'a Theme) -> Self {
        SearchBar {
            query,
            loading,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, focused: bool) {
        let (border_style, title_style) = self.theme.panel_styles(focused);
        let block = Block::default()
            .title(" Search ")
            .borders(Borders::ALL)
            .border_type(if focused {
                BorderType::Double
            } else {
                BorderType::Plain
            })
            .border_style(border_style)
            .title_style(title_style);

        let input = if self.query.is_empty() {
            Span::styled(
                "Enter Lichess username (e.g., MagnusCarlsen)",
                self.theme.muted_style(),
            )
        } else {
            Span::styled(self.query, self.theme.normal_style())
        };

        let action = if self.loading {
            Span::styled(" Analyzing... ", self.theme.muted_style())
        } else {
            Span::styled(" [Enter] Analyze ", Style::default().fg(self.theme.accent))
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(18)])
            .split(block.inner(area));
        frame.render_widget(block, area);

        let cursor = if focused && !self.loading { "▏" } else { "" };
        frame.render_widget(
            Paragraph::new(Line::from(vec![Span::raw(" "), input, Span::raw(cursor)])),
            chunks[0],
        );
        frame.render_widget(Paragraph::new(action).alignment(Alignment::Right), chunks[1]);
    }
}

/// Profile summary panel
pub struct ProfilePanel<'a> {
    profile: &'a Profile,
    theme: &'a Theme,
}

impl<'a> ProfilePanel<'a> {
    pub fn new(profile: &'a Profile, theme: &'a Theme) -> Self {
        ProfilePanel { profile, theme }
    }

    fn lines(&self) -> Vec<Line<'a>> {
        let p = self.profile;
        let accent = Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD);

        let mut heading = vec![Span::styled(
            format!("[{}] ", initials(&p.username)),
            accent,
        )];
        if let Some(name) = p.full_name() {
            heading.push(Span::styled(
                format!("{name} "),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        if let Some(title) = &p.title {
            heading.push(Span::styled(format!("{title} "), Style::default().fg(self.theme.error)));
        }
        heading.push(Span::styled(p.username.clone(), accent));
        if p.online {
            heading.push(Span::styled(" ●", Style::default().fg(self.theme.rising)));
        }
        heading.push(Span::styled(format!("   ID: {}", p.id), self.theme.muted_style()));

        let bio = p.bio().unwrap_or(NO_BIO).to_string();

        let mut stats = vec![
            Span::raw(format!("{} games played", format_thousands(p.count.all))),
            Span::styled("  ·  ", self.theme.muted_style()),
            Span::raw(format!("{} wins", format_thousands(p.count.win))),
            Span::styled("  ·  ", self.theme.muted_style()),
            Span::raw(format!("{:.1} hours played", p.hours_played())),
        ];
        if let Some(location) = p.location() {
            stats.push(Span::styled("  ·  ", self.theme.muted_style()));
            stats.push(Span::raw(location.to_string()));
        }
        if let Some(since) = p.member_since() {
            stats.push(Span::styled("  ·  ", self.theme.muted_style()));
            stats.push(Span::raw(format!("member since {}", since.format("%b %Y"))));
        }

        vec![
            Line::from(heading),
            Line::from(Span::styled(bio, Style::default().add_modifier(Modifier::ITALIC))),
            Line::from(stats),
            Line::from(Span::styled(p.url.clone(), self.theme.muted_style())),
        ]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.lines())
            .block(
                Block::default()
                    .title(" Player ")
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style())
                    .title_style(self.theme.title_style()),
            )
            .wrap(Wrap { trim: true });

        frame.render_widget(paragraph, area);
    }
}

/// Row of per-mode stat tiles
pub struct StatTiles<'a> {
    profile: &'a Profile,
    selected: TimeControl,
    theme: &'a Theme,
}

impl<'a> StatTiles<'a> {
    pub fn new(profile: &'a Profile, selected: TimeControl, theme: &'a Theme) -> Self {
        StatTiles {
            profile,
            selected,
            theme,
        }
    }

    /// Rating text for a tile; unplayed modes show "?"
    pub fn rating_text(profile: &Profile, mode: TimeControl) -> String {
        match profile.perf(mode).and_then(|p| p.display_rating().map(|r| (r, p.prov))) {
            Some((rating, true)) => format!("{rating}?"),
            Some((rating, false)) => rating.to_string(),
            None => "?".to_string(),
        }
    }

    /// Trend text (arrow and magnitude); empty for unplayed modes
    pub fn trend_text(profile: &Profile, mode: TimeControl) -> Option<(String, i32)> {
        let perf = profile.perf(mode).filter(|p| p.games > 0)?;
        let arrow = match perf.prog.signum() {
            1 => "▲",
            -1 => "▼",
            _ => "–",
        };
        Some((format!("{arrow} {}", perf.prog.unsigned_abs()), perf.prog))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let constraints = [Constraint::Ratio(1, TimeControl::ALL.len() as u32); 5];
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        for (i, mode) in TimeControl::ALL.into_iter().enumerate() {
            self.render_tile(frame, chunks[i], mode, i + 1);
        }
    }

    fn render_tile(&self, frame: &mut Frame, area: Rect, mode: TimeControl, hotkey: usize) {
        let style = self.theme.mode_style(mode);
        let selected = mode == self.selected;

        let block = Block::default()
            .title(format!(" {} {} [{hotkey}] ", style.glyph, mode.history_name().to_uppercase()))
            .borders(Borders::ALL)
            .border_type(if selected {
                BorderType::Thick
            } else {
                BorderType::Plain
            })
            .border_style(if selected {
                self.theme.focused_border_style()
            } else {
                self.theme.border_style()
            })
            .title_style(Style::default().fg(style.color).add_modifier(Modifier::BOLD));

        let mut rating_line = vec![Span::styled(
            Self::rating_text(self.profile, mode),
            Style::default().add_modifier(Modifier::BOLD),
        )];
        if let Some((trend, prog)) = Self::trend_text(self.profile, mode) {
            rating_line.push(Span::raw("  "));
            rating_line.push(Span::styled(trend, self.theme.trend_style(prog)));
        }

        let games = self.profile.games_in(mode);
        let lines = vec![
            Line::from(rating_line),
            Line::from(Span::styled(
                format!("{} games played", format_thousands(u64::from(games))),
                self.theme.muted_style(),
            )),
        ];

        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}

/// Status bar widget
pub struct StatusBar<'a> {
    username: Option<&'a str>,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> StatusBar<'a> {
    pub fn new(username: Option<&'a str>, error: Option<&'a str>, theme: &'a Theme) -> Self {
        StatusBar {
            username,
            error,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = if let Some(e) = self.error {
            Line::from(vec![
                Span::styled("Error: ", self.theme.error_style()),
                Span::styled(e, Style::default().fg(self.theme.error)),
            ])
        } else {
            let text = match self.username {
                Some(u) => format!("lichess-insight: {u} | [/] Search [?] Help [q] Quit"),
                None => "lichess-insight | [/] Search [?] Help [q] Quit".to_string(),
            };
            Line::from(text)
        };

        let paragraph = Paragraph::new(line).block(Block::default().borders(Borders::TOP));

        frame.render_widget(paragraph, area);
    }
}
