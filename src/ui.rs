use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

use veni_vici::picker::{draw, DrawOutcome, DrawPolicy, RecordSource};
use veni_vici::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Discover,
    BanList,
    History,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Discover => Page::BanList,
            Page::BanList => Page::History,
            Page::History => Page::Discover,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Page::Discover => Page::History,
            Page::BanList => Page::Discover,
            Page::History => Page::BanList,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Discover => "Discover",
            Page::BanList => "Ban List",
            Page::History => "History",
        }
    }
}

/// The four clickable attributes of the current item, in display order.
/// Index matches `CatRecord::bannable_tokens`.
const ATTRIBUTE_COUNT: usize = 4;
const ATTRIBUTE_LABELS: [&str; ATTRIBUTE_COUNT] = ["Breed", "Origin", "Lifespan", "Weight"];
const ATTRIBUTE_UNITS: [&str; ATTRIBUTE_COUNT] = ["", "", "years", "kg"];

pub struct App {
    pub state: AppState,
    pub policy: DrawPolicy,
    pub current_page: Page,
    pub attribute_index: usize,
    pub ban_state: ListState,
    pub history_state: TableState,
}

impl App {
    pub fn new(state: AppState, policy: DrawPolicy) -> Self {
        let mut ban_state = ListState::default();
        ban_state.select(Some(0));

        let mut history_state = TableState::default();
        history_state.select(Some(0));

        Self {
            state,
            policy,
            current_page: Page::Discover,
            attribute_index: 0,
            ban_state,
            history_state,
        }
    }

    pub fn next_page(&mut self) {
        self.current_page = self.current_page.next();
    }

    pub fn previous_page(&mut self) {
        self.current_page = self.current_page.previous();
    }

    /// Run one synchronous draw against the source. Blocking here is what
    /// serializes draws: a second one cannot start while this is in flight.
    pub fn draw_next<S: RecordSource>(&mut self, source: &S) {
        if !self.state.catalog.is_ready() {
            self.state
                .record_error("Breed catalog not loaded - discovery is disabled");
            return;
        }

        let outcome = draw(
            source,
            &self.state.catalog,
            &self.state.ban_list,
            &self.policy,
            &mut rand::thread_rng(),
        );

        match outcome {
            DrawOutcome::Accepted(record) => {
                self.state.accept(record);
                self.attribute_index = 0;
                self.history_state.select(Some(0));
                self.current_page = Page::Discover;
            }
            DrawOutcome::Exhausted { attempts } => {
                self.state.record_error(format!(
                    "No eligible cat found after {} attempts - try unbanning something",
                    attempts
                ));
            }
            DrawOutcome::Failed { attempts, source } => {
                self.state.record_error(format!(
                    "Failed to load cat after {} attempts: {}",
                    attempts, source
                ));
            }
            DrawOutcome::NotReady => {
                self.state
                    .record_error("Breed catalog not loaded - discovery is disabled");
            }
        }
    }

    pub fn next_attribute(&mut self) {
        self.attribute_index = (self.attribute_index + 1) % ATTRIBUTE_COUNT;
    }

    pub fn previous_attribute(&mut self) {
        self.attribute_index = (self.attribute_index + ATTRIBUTE_COUNT - 1) % ATTRIBUTE_COUNT;
    }

    /// Toggle the ban on the selected attribute of the current item.
    pub fn toggle_selected_attribute(&mut self) {
        let token = match self.state.current() {
            Some(record) => record.bannable_tokens()[self.attribute_index].to_string(),
            None => return,
        };
        self.state.toggle_ban(&token);
    }

    pub fn next_ban(&mut self) {
        let len = self.state.ban_list.len();
        if len == 0 {
            return;
        }
        let i = match self.ban_state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.ban_state.select(Some(i));
    }

    pub fn previous_ban(&mut self) {
        let len = self.state.ban_list.len();
        if len == 0 {
            return;
        }
        let i = match self.ban_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.ban_state.select(Some(i));
    }

    /// Remove the selected ban token (the toggle's removal half).
    pub fn remove_selected_ban(&mut self) {
        let token = match self
            .ban_state
            .selected()
            .and_then(|i| self.state.ban_list.tokens().get(i))
        {
            Some(token) => token.clone(),
            None => return,
        };
        self.state.toggle_ban(&token);

        let len = self.state.ban_list.len();
        if len == 0 {
            self.ban_state.select(None);
        } else if let Some(i) = self.ban_state.selected() {
            if i >= len {
                self.ban_state.select(Some(len - 1));
            }
        }
    }

    pub fn next_history(&mut self) {
        let len = self.state.history().len();
        if len == 0 {
            return;
        }
        let i = match self.history_state.selected() {
            Some(i) if i >= len - 1 => 0,
            Some(i) => i + 1,
            None => 0,
        };
        self.history_state.select(Some(i));
    }

    pub fn previous_history(&mut self) {
        let len = self.state.history().len();
        if len == 0 {
            return;
        }
        let i = match self.history_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.history_state.select(Some(i));
    }
}

pub fn run_ui<S: RecordSource>(app: &mut App, source: &S) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app, source);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: RecordSource>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    source: &S,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        app.previous_page();
                    } else {
                        app.next_page();
                    }
                }
                KeyCode::BackTab => app.previous_page(),
                KeyCode::Char('d') | KeyCode::Char(' ') => app.draw_next(source),
                KeyCode::Enter => match app.current_page {
                    Page::Discover => app.toggle_selected_attribute(),
                    Page::BanList => app.remove_selected_ban(),
                    Page::History => {}
                },
                KeyCode::Down | KeyCode::Char('j') => match app.current_page {
                    Page::Discover => app.next_attribute(),
                    Page::BanList => app.next_ban(),
                    Page::History => app.next_history(),
                },
                KeyCode::Up | KeyCode::Char('k') => match app.current_page {
                    Page::Discover => app.previous_attribute(),
                    Page::BanList => app.previous_ban(),
                    Page::History => app.previous_history(),
                },
                KeyCode::Home => {
                    if app.current_page == Page::History {
                        app.history_state.select(Some(0));
                    }
                }
                KeyCode::End => {
                    if app.current_page == Page::History && !app.state.history().is_empty() {
                        app.history_state
                            .select(Some(app.state.history().len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with navigation
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Discover => render_discover(f, chunks[1], app),
        Page::BanList => render_ban_list(f, chunks[1], app),
        Page::History => render_history(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let pages = [Page::Discover, Page::BanList, Page::History];

    let mut tab_spans = vec![];
    for (i, page) in pages.iter().enumerate() {
        if i > 0 {
            tab_spans.push(Span::raw(" │ "));
        }

        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        tab_spans.push(Span::styled(page.title(), style));
    }

    tab_spans.push(Span::raw("  |  "));
    let catalog_span = if app.state.catalog.is_ready() {
        Span::styled(
            format!("Breeds: {}", app.state.catalog.len()),
            Style::default().fg(Color::White),
        )
    } else {
        Span::styled("Breeds: not loaded", Style::default().fg(Color::Red))
    };
    tab_spans.push(catalog_span);
    tab_spans.push(Span::raw("  |  "));
    tab_spans.push(Span::styled(
        format!("Banned: {}", app.state.ban_list.len()),
        Style::default().fg(Color::Red),
    ));
    tab_spans.push(Span::raw("  "));
    tab_spans.push(Span::styled(
        format!("Seen: {}", app.state.history().len()),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(vec![Line::from(tab_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Veni Vici "),
    );

    f.render_widget(header, area);
}

fn render_discover(f: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![Line::from("")];

    if !app.state.catalog.is_ready() {
        content.push(Line::from(vec![Span::styled(
            "  Breed catalog unavailable - discovery is disabled for this session.",
            Style::default().fg(Color::Red),
        )]));
    } else if let Some(record) = app.state.current() {
        content.push(Line::from(vec![
            Span::styled(
                "  Image: ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                record.image_url.as_str(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::UNDERLINED),
            ),
        ]));
        content.push(Line::from(""));

        for (i, token) in record.bannable_tokens().iter().enumerate() {
            let selected = i == app.attribute_index;
            let banned = app.state.ban_list.contains(token);

            let marker = if selected {
                Span::styled(
                    "→ ",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw("  ")
            };

            let value_style = if banned {
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::CROSSED_OUT)
            } else if selected {
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let mut spans = vec![
                Span::raw("  "),
                marker,
                Span::styled(
                    format!("{:<10}", ATTRIBUTE_LABELS[i]),
                    Style::default().fg(Color::Cyan),
                ),
                Span::styled(token.to_string(), value_style),
            ];
            if !ATTRIBUTE_UNITS[i].is_empty() {
                spans.push(Span::styled(
                    format!(" {}", ATTRIBUTE_UNITS[i]),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            if banned {
                spans.push(Span::styled(
                    "  [banned]",
                    Style::default().fg(Color::Red),
                ));
            }

            content.push(Line::from(spans));
        }

        content.push(Line::from(""));
        content.push(Line::from(vec![Span::styled(
            "  Enter toggles the ban on the selected attribute.",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]));
    } else {
        content.push(Line::from(vec![Span::styled(
            "  Press 'd' to discover a cat.",
            Style::default().fg(Color::White),
        )]));
    }

    if let Some(error) = app.state.last_error() {
        content.push(Line::from(""));
        content.push(Line::from(vec![Span::styled(
            format!("  ⚠ {}", error),
            Style::default().fg(Color::Red),
        )]));
    }

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Discover "),
    );

    f.render_widget(paragraph, area);
}

fn render_ban_list(f: &mut Frame, area: Rect, app: &mut App) {
    if app.state.ban_list.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from("  No attributes banned yet."),
            Line::from(""),
            Line::from(vec![Span::styled(
                "  Select an attribute on the Discover page and press Enter.",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )]),
        ])
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Ban List "),
        );
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .state
        .ban_list
        .tokens()
        .iter()
        .map(|token| {
            ListItem::new(Line::from(vec![
                Span::styled(token.as_str(), Style::default().fg(Color::Red)),
                Span::styled(
                    "  (Enter removes)",
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Ban List "),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("→ ");

    f.render_stateful_widget(list, area, &mut app.ban_state);
}

fn render_history(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Breed", "Origin", "Lifespan", "Weight (kg)", "Accepted"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.state.history().iter().map(|record| {
        let cells = vec![
            Cell::from(truncate(&record.breed, 22)),
            Cell::from(truncate(&record.origin, 20)),
            Cell::from(record.lifespan.clone()),
            Cell::from(record.weight.clone()),
            Cell::from(record.fetched_at.format("%H:%M:%S").to_string()),
        ];
        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(24),
            Constraint::Length(22),
            Constraint::Length(12),
            Constraint::Length(12),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" History - {} cats this session ", app.state.history().len())),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.history_state);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = vec![];

    if app.state.catalog.is_ready() {
        status_spans.push(Span::styled(" d", Style::default().fg(Color::Yellow)));
        status_spans.push(Span::raw(" Discover | "));
    } else {
        status_spans.push(Span::styled(
            " Loading breeds failed - discovery disabled",
            Style::default().fg(Color::Red),
        ));
        status_spans.push(Span::raw(" | "));
    }

    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    let enter_hint = match app.current_page {
        Page::Discover => " Toggle ban | ",
        Page::BanList => " Unban | ",
        Page::History => " - | ",
    };
    status_spans.push(Span::raw(enter_hint));
    status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Page | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}

// ============================================================================
// TESTS
// ============================================================================
