//! Main application logic and TUI event loop.

use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Terminal,
};
use tokio::runtime::Runtime;

use crate::cli::AppConfig;
use crate::data::{FetchError, LichessClient, SearchResult, TimeControl};
use crate::state::{DashboardState, Effect, Event};
use crate::ui::{
    chart::RatingChart,
    widgets::{ProfilePanel, SearchBar, StatTiles, StatusBar},
    HelpOverlay, Theme,
};

/// How long to wait for a key before checking for finished searches
const POLL_INTERVAL: Duration = Duration::from_millis(100);

const SPINNER: [&str; 4] = ["◐", "◓", "◑", "◒"];

/// Which part of the screen receives keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Search,
    Dashboard,
}

/// Outcome of a background search, tagged with its sequence number
struct SearchMessage {
    seq: u64,
    outcome: Result<SearchResult, FetchError>,
}

/// Application state
pub struct App {
    theme: Theme,

    // Network
    client: LichessClient,
    runtime: Runtime,
    results_tx: Sender<SearchMessage>,
    results_rx: Receiver<SearchMessage>,

    // Dashboard data and selections
    state: DashboardState,

    // UI State
    focus: Focus,
    show_help: bool,
    started: Instant,

    // Exit flag
    should_quit: bool,
}

impl App {
    /// Create a new App instance, starting a search if a user was given
    pub fn new(config: AppConfig) -> Result<Self> {
        let client = LichessClient::new(&config.api_url)?;
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .context("Failed to start async runtime")?;
        let (results_tx, results_rx) = mpsc::channel();

        let mut app = App {
            theme: Theme::default(),
            client,
            runtime,
            results_tx,
            results_rx,
            state: DashboardState::with_range(config.initial_range),
            focus: Focus::Search,
            show_help: false,
            started: Instant::now(),
            should_quit: false,
        };

        if let Some(user) = config.initial_user {
            for c in user.chars() {
                app.dispatch(Event::Input(c));
            }
            app.dispatch(Event::Submit);
            app.focus = Focus::Dashboard;
        }

        Ok(app)
    }

    /// Apply an event to the dashboard state and carry out its effect
    fn dispatch(&mut self, event: Event) {
        if let Some(effect) = self.state.apply(event) {
            self.perform(effect);
        }
    }

    fn perform(&mut self, effect: Effect) {
        match effect {
            Effect::Search { seq, username } => {
                let client = self.client.clone();
                let tx = self.results_tx.clone();
                self.runtime.spawn(async move {
                    let outcome = client.search(&username).await;
                    // The receiver only goes away on shutdown
                    let _ = tx.send(SearchMessage { seq, outcome });
                });
            }
        }
    }

    /// Feed finished searches back into the state
    fn drain_results(&mut self) {
        while let Ok(SearchMessage { seq, outcome }) = self.results_rx.try_recv() {
            self.dispatch(Event::SearchFinished { seq, outcome });
            if self.state.is_loading() {
                continue;
            }
            self.focus = if self.state.profile.is_some() {
                Focus::Dashboard
            } else {
                Focus::Search
            };
        }
    }

    /// Handle keyboard input
    fn handle_input(&mut self, key: KeyEvent) {
        // Global shortcuts
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }
        if self.show_help {
            if matches!(key.code, KeyCode::Char('?') | KeyCode::Esc | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match self.focus {
            Focus::Search => self.handle_search_input(key),
            Focus::Dashboard => self.handle_dashboard_input(key),
        }
    }

    fn handle_search_input(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.dispatch(Event::Submit),
            KeyCode::Esc => {
                if self.state.is_loading() {
                    self.dispatch(Event::Cancel);
                } else if self.state.profile.is_some() {
                    self.focus = Focus::Dashboard;
                }
            }
            KeyCode::Tab if self.state.profile.is_some() => self.focus = Focus::Dashboard,
            KeyCode::Backspace => self.dispatch(Event::Backspace),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(Event::ClearInput)
            }
            KeyCode::Char(c) => self.dispatch(Event::Input(c)),
            _ => {}
        }
    }

    fn handle_dashboard_input(&mut self, key: KeyEvent) {
        let mode = self.state.selected_mode;
        let range = self.state.time_range;
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help = true,
            KeyCode::Char('/') | KeyCode::Tab => self.focus = Focus::Search,
            KeyCode::Esc => self.dispatch(Event::Cancel),
            KeyCode::Char('r') => self.dispatch(Event::Refresh),
            KeyCode::Left | KeyCode::Char('h') => self.dispatch(Event::SelectMode(mode.prev())),
            KeyCode::Right | KeyCode::Char('l') => self.dispatch(Event::SelectMode(mode.next())),
            KeyCode::Char('[') => self.dispatch(Event::SelectRange(range.narrower())),
            KeyCode::Char(']') => self.dispatch(Event::SelectRange(range.wider())),
            KeyCode::Char(c) => {
                // Mode selection with number keys
                if let Some(n) = c.to_digit(10) {
                    if n > 0 && (n as usize) <= TimeControl::ALL.len() {
                        self.dispatch(Event::SelectMode(TimeControl::ALL[n as usize - 1]));
                    }
                }
            }
            _ => {}
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        let size = frame.area();

        // Main layout: search, body, footer
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar
                Constraint::Min(10),   // Body
                Constraint::Length(2), // Status bar
            ])
            .split(size);

        let search_bar = SearchBar::new(&self.state.query, self.state.is_loading(), &self.theme);
        search_bar.render(frame, main_chunks[0], self.focus == Focus::Search);

        if self.state.is_loading() {
            self.render_loading(frame, main_chunks[1]);
        } else if let Some(profile) = &self.state.profile {
            // Dashboard layout: profile, tiles, chart
            let body_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(6), // Profile
                    Constraint::Length(4), // Stat tiles
                    Constraint::Min(8),    // Chart
                ])
                .split(main_chunks[1]);

            ProfilePanel::new(profile, &self.theme).render(frame, body_chunks[0]);
            StatTiles::new(profile, self.state.selected_mode, &self.theme)
                .render(frame, body_chunks[1]);

            // Re-filtered against the wall clock on every frame
            let projection = self.state.projection(Utc::now().timestamp_millis());
            let chart = RatingChart::new(
                &projection,
                self.state.selected_mode,
                self.state.time_range,
                &self.theme,
            );
            chart.render(frame, body_chunks[2]);
        } else {
            self.render_landing(frame, main_chunks[1]);
        }

        let status_bar = StatusBar::new(
            self.state.searched_username.as_deref(),
            self.state.error.as_deref(),
            &self.theme,
        );
        status_bar.render(frame, main_chunks[2]);

        // Render help overlay if active
        if self.show_help {
            let help = HelpOverlay::new(&self.theme);
            help.render(frame, size);
        }
    }

    fn render_loading(&self, frame: &mut ratatui::Frame, area: Rect) {
        let tick = (self.started.elapsed().as_millis() / 150) as usize % SPINNER.len();
        let text = Line::from(vec![
            Span::styled(SPINNER[tick], Style::default().fg(self.theme.accent)),
            Span::raw(format!(" Analyzing {}...", self.state.query.trim())),
        ]);
        let area = Rect {
            y: area.y + area.height / 2,
            height: area.height.min(1),
            ..area
        };
        frame.render_widget(Paragraph::new(text).alignment(Alignment::Center), area);
    }

    fn render_landing(&self, frame: &mut ratatui::Frame, area: Rect) {
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled("Master Your ", Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    "Chess Growth",
                    Style::default().fg(self.theme.accent).add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(""),
            Line::from(Span::styled(
                "Analyze your Lichess rating history and visualize progress across time controls.",
                self.theme.muted_style(),
            )),
            Line::from(""),
        ];
        if let Some(error) = &self.state.error {
            lines.push(Line::from(vec![
                Span::styled("Error: ", self.theme.error_style()),
                Span::styled(error.as_str(), Style::default().fg(self.theme.error)),
            ]));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

/// Restore terminal to normal state
fn restore_terminal() {
    // Best effort cleanup - ignore errors since we may be in a panic
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen);
}

/// Run the TUI application
pub fn run(config: AppConfig) -> Result<()> {
    // Create app first so configuration errors print on a normal terminal
    let mut app = App::new(config).context("Failed to initialize application")?;

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        restore_terminal();
        return Err(e).context("Failed to setup terminal");
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = match Terminal::new(backend) {
        Ok(t) => t,
        Err(e) => {
            restore_terminal();
            return Err(e).context("Failed to create terminal");
        }
    };

    let result = run_main_loop(&mut terminal, &mut app);

    // Always restore terminal, regardless of result
    restore_terminal();
    terminal.show_cursor().ok();

    tracing::info!("dashboard closed");
    result
}

/// Main application loop
fn run_main_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.drain_results();

        terminal.draw(|f| app.render(f))?;

        if event::poll(POLL_INTERVAL)? {
            if let TermEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key);
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
