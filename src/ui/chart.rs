//! Rating chart widget for the selected mode.

use chrono::DateTime;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::data::{PeriodSummary, Projection, TimeControl, TimeRange};
use super::theme::Theme;

/// Placeholder shown where a rating figure is unavailable
pub const NO_VALUE: &str = "-";

/// Rating-over-time chart with a range selector and period summary
pub struct RatingChart<'a> {
    projection: &'a Projection,
    mode: TimeControl,
    range: TimeRange,
    theme: &'a Theme,
}

impl<'a> RatingChart<'a> {
    pub fn new(
        projection: &'a Projection,
        mode: TimeControl,
        range: TimeRange,
        theme: &'a Theme,
    ) -> Self {
        RatingChart {
            projection,
            mode,
            range,
            theme,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .title(format!(" {} Progress ", self.mode.history_name()))
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title_style(self.theme.title_style());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.projection.is_empty_series() {
            let message = Paragraph::new(format!(
                "No rating history available for {}.",
                self.mode.history_name()
            ))
            .style(Style::default().add_modifier(Modifier::DIM))
            .alignment(Alignment::Center);
            frame.render_widget(message, centered_line(inner));
            return;
        }

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Range selector
                Constraint::Min(5),    // Plot
                Constraint::Length(1), // Summary
            ])
            .split(inner);

        RangeSelector::new(self.range, self.theme).render(frame, chunks[0]);

        if self.projection.points.is_empty() {
            let message = Paragraph::new(format!("No games in the {} window.", self.range))
                .style(Style::default().add_modifier(Modifier::DIM))
                .alignment(Alignment::Center);
            frame.render_widget(message, centered_line(chunks[1]));
        } else {
            self.render_plot(frame, chunks[1]);
        }

        self.render_summary(frame, chunks[2]);
    }

    fn render_plot(&self, frame: &mut Frame, area: Rect) {
        let data: Vec<(f64, f64)> = self
            .projection
            .points
            .iter()
            .map(|p| (p.timestamp as f64, f64::from(p.rating)))
            .collect();

        let (mut x_min, mut x_max) = data
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), (x, _)| (lo.min(*x), hi.max(*x)));
        let (mut y_min, mut y_max) = match &self.projection.bounds {
            Some(b) => (b.domain_low as f64, b.domain_high as f64),
            None => (0.0, 1.0),
        };

        // A single point or a flat series still needs a non-empty axis
        if x_min >= x_max {
            x_min -= DAY_MS;
            x_max += DAY_MS;
        }
        if y_min >= y_max {
            y_min -= 1.0;
            y_max += 1.0;
        }

        let x_labels = vec![
            Span::raw(axis_date(x_min)),
            Span::raw(axis_date((x_min + x_max) / 2.0)),
            Span::raw(axis_date(x_max)),
        ];
        let y_labels = vec![
            Span::raw(format!("{y_min:.0}")),
            Span::raw(format!("{:.0}", (y_min + y_max) / 2.0)),
            Span::raw(format!("{y_max:.0}")),
        ];

        let dataset = Dataset::default()
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(self.theme.accent))
            .data(&data);

        let chart = Chart::new(vec![dataset])
            .x_axis(
                Axis::default()
                    .style(self.theme.normal_style())
                    .bounds([x_min, x_max])
                    .labels(x_labels),
            )
            .y_axis(
                Axis::default()
                    .title(Span::styled("rating", Style::default().add_modifier(Modifier::DIM)))
                    .style(self.theme.normal_style())
                    .bounds([y_min, y_max])
                    .labels(y_labels),
            );

        frame.render_widget(chart, area);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let summary = PeriodSummary::new(&self.projection.points, self.projection.bounds.as_ref());
        let line = Line::from(vec![
            Span::styled("Current ", self.theme.muted_style()),
            Span::styled(
                format_rating(summary.current),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                self.projection
                    .points
                    .last()
                    .map(|p| format!(" ({})", p.date))
                    .unwrap_or_default(),
                self.theme.muted_style(),
            ),
            Span::raw("   "),
            Span::styled("Peak (Period) ", self.theme.muted_style()),
            Span::styled(format_rating(summary.peak), self.theme.trend_style(1)),
            Span::raw("   "),
            Span::styled("Lowest (Period) ", self.theme.muted_style()),
            Span::styled(format_rating(summary.lowest), self.theme.trend_style(-1)),
        ]);
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

const DAY_MS: f64 = 86_400_000.0;

/// Short date for an axis tick given epoch milliseconds
fn axis_date(timestamp_ms: f64) -> String {
    DateTime::from_timestamp_millis(timestamp_ms as i64)
        .map(|dt| dt.format("%b %Y").to_string())
        .unwrap_or_default()
}

/// A rating or the placeholder
pub fn format_rating(rating: Option<i32>) -> String {
    rating.map(|r| r.to_string()).unwrap_or_else(|| NO_VALUE.to_string())
}

/// The middle line of `area`, for single-line messages
fn centered_line(area: Rect) -> Rect {
    Rect {
        y: area.y + area.height / 2,
        height: area.height.min(1),
        ..area
    }
}

/// Time range selector bar widget
pub struct RangeSelector<'a> {
    selected: TimeRange,
    theme: &'a Theme,
}

impl<'a> RangeSelector<'a> {
    pub fn new(selected: TimeRange, theme: &'a Theme) -> Self {
        RangeSelector { selected, theme }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let mut spans: Vec<Span> = vec![Span::styled("[ ", Style::default().add_modifier(Modifier::DIM))];
        for range in TimeRange::ALL {
            let style = if range == self.selected {
                self.theme.highlight_style().fg(self.theme.accent)
            } else {
                self.theme.normal_style()
            };
            spans.push(Span::styled(format!(" {} ", range.label()), style));
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled("]", Style::default().add_modifier(Modifier::DIM)));

        let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Right);
        frame.render_widget(paragraph, area);
    }
}
