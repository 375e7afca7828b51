//! Terminal UI
//!
//! Single page: the whitelist count line plus the action label, driven
//! entirely by the session's published view snapshots. Keys: `c` connect,
//! `j` join, `q` quit. Connects automatically on startup, mirroring the
//! page loading in a browser with a wallet available.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::{Frame, Terminal};
use tokio::sync::Mutex;
use tracing::warn;

use crate::backend::ChainBackend;
use crate::error::Error;
use crate::session::{Action, SessionController, View};

type SharedSession = Arc<Mutex<SessionController<ChainBackend>>>;

/// Run the terminal UI until the user quits
pub async fn run_tui(session: SessionController<ChainBackend>) -> Result<(), Error> {
    let view_rx = session.subscribe();
    let session: SharedSession = Arc::new(Mutex::new(session));

    // Connect on startup, like the page does on first render
    spawn_connect(session.clone());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = event_loop(&mut terminal, view_rx, session).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    view_rx: tokio::sync::watch::Receiver<View>,
    session: SharedSession,
) -> Result<(), Error> {
    loop {
        let view = view_rx.borrow().clone();
        terminal.draw(|frame| draw(frame, &view))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                    KeyCode::Char('c') => spawn_connect(session.clone()),
                    KeyCode::Char('j') => spawn_join(session.clone()),
                    _ => {}
                }
            }
        }
    }
}

fn spawn_connect(session: SharedSession) {
    tokio::spawn(async move {
        if let Err(e) = session.lock().await.connect_wallet().await {
            warn!(error = %e, "connect failed");
        }
    });
}

fn spawn_join(session: SharedSession) {
    tokio::spawn(async move {
        if let Err(e) = session.lock().await.join_whitelist().await {
            warn!(error = %e, "join failed");
        }
    });
}

fn draw(frame: &mut Frame, view: &View) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(4),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let title = Paragraph::new("Web3 Whitelist dApp")
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, rows[0]);

    let body = Paragraph::new(vec![
        Line::from("Web3 whitelist waitinglist"),
        Line::from(view.count_line()),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(body, rows[1]);

    let action_style = if view.action.is_actionable() {
        Style::default()
            .fg(Color::Blue)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::Green)
    };
    let action = Paragraph::new(view.action.label())
        .style(action_style)
        .alignment(Alignment::Center);
    frame.render_widget(action, rows[2]);

    if let Some(notice) = &view.notice {
        let notice = Paragraph::new(notice.as_str())
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(notice, rows[3]);
    }

    let hints = match view.action {
        Action::Connect => "c: connect  q: quit",
        Action::Join => "j: join  q: quit",
        _ => "q: quit",
    };
    let footer = Paragraph::new(hints)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(footer, rows[4]);
}
