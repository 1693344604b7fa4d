//! Core TUI application state and event loop.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use tokio::runtime::Handle;
use tokio::sync::Mutex;

use shelfpage_core::{
    ConfigUpdateChannel, RefreshConfig, Refresher, STATUS_LOADING, SnapshotSurfaces, refresh,
};
use shelfpage_render::star_count;
use shelfpage_shared::{
    Bucket, RenderedCard, ShelfSnapshot, StatusLine, config_file_path, load_config,
};

/// Pane titles, in bucket display order.
const PANE_TITLES: [&str; 3] = ["Czytam teraz", "Planuję przeczytać", "Przeczytane"];

/// Placeholder shown for a card with an empty title cell.
const UNTITLED: &str = "(bez tytułu)";

/// Application state.
pub(crate) struct App {
    /// Latest snapshot received from a refresh cycle.
    pub snapshot: ShelfSnapshot,
    /// Which bucket pane has focus (index into [`Bucket::ALL`]).
    pub focus: usize,
    /// Selected card per pane.
    pub selected: [usize; 3],
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Whether help overlay is visible.
    pub show_help: bool,
}

impl App {
    pub(crate) fn new() -> Self {
        Self {
            snapshot: ShelfSnapshot::empty(StatusLine::info("Naciśnij r, aby odświeżyć — ? pomoc")),
            focus: 0,
            selected: [0; 3],
            should_quit: false,
            show_help: false,
        }
    }

    /// Adopt a snapshot, clamping selections to the new list lengths.
    fn adopt(&mut self, snapshot: ShelfSnapshot) {
        self.snapshot = snapshot;
        for (index, bucket) in Bucket::ALL.iter().enumerate() {
            let len = self.snapshot.cards(*bucket).len();
            self.selected[index] = self.selected[index].min(len.saturating_sub(1));
        }
    }

    fn focused_len(&self) -> usize {
        self.snapshot.cards(Bucket::ALL[self.focus]).len()
    }
}

/// Entry point — sets up terminal, runs event loop, restores terminal.
pub(crate) fn run(handle: Handle) -> Result<()> {
    let config = load_config()?;
    let channel = ConfigUpdateChannel::new(config_file_path()?);
    let refresher = Arc::new(Mutex::new(Refresher::new(
        RefreshConfig::from(&config),
        Box::new(channel),
    )?));

    // Setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, handle, refresher);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

/// Run one refresh cycle off the UI thread and deliver its snapshot.
fn spawn_refresh(
    handle: &Handle,
    refresher: Arc<Mutex<Refresher>>,
    tx: Sender<ShelfSnapshot>,
) {
    handle.spawn(async move {
        // Hold the refresher only long enough to check out the client and
        // config; the fetch itself runs unlocked, so overlapping refresh
        // triggers race and the last snapshot delivered wins.
        let (client, config) = refresher.lock().await.checkout();
        let mut surfaces = SnapshotSurfaces::new();
        refresh(&client, &config, &mut surfaces).await;
        // The UI may have quit already; a dead channel is fine.
        let _ = tx.send(surfaces.into_snapshot());
    });
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    handle: Handle,
    refresher: Arc<Mutex<Refresher>>,
) -> Result<()> {
    let mut app = App::new();
    let (tx, rx): (Sender<ShelfSnapshot>, Receiver<ShelfSnapshot>) = channel();

    // Initial load.
    app.snapshot.status = StatusLine::info(STATUS_LOADING);
    spawn_refresh(&handle, refresher.clone(), tx.clone());

    loop {
        // Snapshots replace the display wholesale; with several refreshes in
        // flight the last one delivered wins.
        while let Ok(snapshot) = rx.try_recv() {
            app.adopt(snapshot);
        }

        terminal.draw(|f| draw(f, &mut app))?;

        // Poll for events with 100ms timeout for responsive UI
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                handle_key(
                    &mut app,
                    key.code,
                    key.modifiers,
                    &handle,
                    &refresher,
                    &tx,
                );
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}

fn handle_key(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    handle: &Handle,
    refresher: &Arc<Mutex<Refresher>>,
    tx: &Sender<ShelfSnapshot>,
) {
    // Global keybindings (always active)
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('q') => {
            app.should_quit = true;
            return;
        }
        KeyCode::Char('?') => {
            app.show_help = !app.show_help;
            return;
        }
        KeyCode::Esc if app.show_help => {
            app.show_help = false;
            return;
        }
        _ => {}
    }

    // If help is showing, consume any key to dismiss
    if app.show_help {
        app.show_help = false;
        return;
    }

    match code {
        KeyCode::Char('r') => {
            app.snapshot.status = StatusLine::info(STATUS_LOADING);
            spawn_refresh(handle, refresher.clone(), tx.clone());
        }
        KeyCode::Tab => {
            app.focus = (app.focus + 1) % Bucket::ALL.len();
        }
        KeyCode::BackTab => {
            app.focus = if app.focus == 0 {
                Bucket::ALL.len() - 1
            } else {
                app.focus - 1
            };
        }
        KeyCode::Up => {
            app.selected[app.focus] = app.selected[app.focus].saturating_sub(1);
        }
        KeyCode::Down => {
            let len = app.focused_len();
            if len > 0 {
                app.selected[app.focus] = (app.selected[app.focus] + 1).min(len - 1);
            }
        }
        _ => {}
    }
}

fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),    // Shelf panes
            Constraint::Length(1), // Status bar
        ])
        .split(f.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(33),
            Constraint::Percentage(34),
            Constraint::Percentage(33),
        ])
        .split(chunks[0]);

    for (index, bucket) in Bucket::ALL.iter().enumerate() {
        draw_pane(f, app, *bucket, index, panes[index]);
    }

    // Status bar
    let bar = crate::widgets::status_bar(&app.snapshot.status);
    f.render_widget(bar, chunks[1]);

    // Help overlay
    if app.show_help {
        draw_help_overlay(f);
    }
}

fn draw_pane(f: &mut Frame, app: &mut App, bucket: Bucket, index: usize, area: Rect) {
    let cards = app.snapshot.cards(bucket);
    let focused = app.focus == index;

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::White)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ({}) ", PANE_TITLES[index], cards.len()));

    if cards.is_empty() {
        let empty = Paragraph::new("—")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = cards.iter().map(card_item).collect();

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.selected[index]));
    }
    f.render_stateful_widget(list, area, &mut state);
}

/// One card as a multi-line list item: title, author/genre, rating stars.
fn card_item(card: &RenderedCard) -> ListItem<'_> {
    let record = &card.record;

    let title = if record.title.is_empty() {
        UNTITLED.to_string()
    } else {
        record.title.clone()
    };

    let mut lines = vec![Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    let meta = match (record.author.is_empty(), record.genre.is_empty()) {
        (false, false) => Some(format!("  {} · {}", record.author, record.genre)),
        (false, true) => Some(format!("  {}", record.author)),
        (true, false) => Some(format!("  {}", record.genre)),
        (true, true) => None,
    };
    if let Some(meta) = meta {
        lines.push(Line::from(Span::styled(
            meta,
            Style::default().fg(Color::Gray),
        )));
    }

    if let Some(stars) = star_count(&record.rating) {
        lines.push(Line::from(Span::styled(
            format!("  {}", crate::widgets::star_row(stars)),
            Style::default().fg(Color::Yellow),
        )));
    }

    lines.push(Line::from(""));
    ListItem::new(lines)
}

fn draw_help_overlay(f: &mut Frame) {
    let area = centered_rect(50, 50, f.area());

    let help_text = vec![
        Line::from("Keybindings").style(Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from("  r            Refresh from the sheet"),
        Line::from("  Tab/S-Tab    Next/previous shelf"),
        Line::from("  ↑/↓          Navigate cards"),
        Line::from("  ?            Toggle this help"),
        Line::from("  q / Ctrl-C   Quit"),
    ];

    let help = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Help — press any key to close ")
                .style(Style::default().bg(Color::DarkGray)),
        )
        .style(Style::default().fg(Color::White).bg(Color::DarkGray));

    // Clear background
    f.render_widget(ratatui::widgets::Clear, area);
    f.render_widget(help, area);
}

/// Create a centered rectangle with percentage width and height.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
