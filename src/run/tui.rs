use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;

use crate::config::Settings;
use crate::db::Database;
use crate::ui::app::{App, Screen};

pub(crate) fn as_tui(db: &mut Database, settings: &Settings) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let mut app = App::new(settings.clone(), today);
    app.refresh_all(db)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &mut Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // Tab bar, status bar, message line, table borders and header
            let content_height = f.area().height.saturating_sub(6) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            handle_key(key, app, db)?;
        }
    }
    Ok(())
}

fn handle_key(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('1') => switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Periods)?,
        KeyCode::Tab => {
            let next = app.screen.next();
            switch_screen(app, db, next)?;
        }
        KeyCode::Char('j') | KeyCode::Down if app.screen == Screen::Periods => {
            app.period_cursor.down(app.history.len(), app.visible_rows);
        }
        KeyCode::Char('k') | KeyCode::Up if app.screen == Screen::Periods => {
            app.period_cursor.up();
        }
        KeyCode::Char('g') if app.screen == Screen::Periods => {
            app.period_cursor.top();
        }
        KeyCode::Char('G') if app.screen == Screen::Periods => {
            app.period_cursor.bottom(app.history.len(), app.visible_rows);
        }
        KeyCode::Char('r') => {
            app.today = chrono::Local::now().date_naive();
            app.refresh_all(db)?;
            app.set_status("Refreshed");
        }
        KeyCode::Char('?') => app.show_help = true,
        KeyCode::Esc => app.status_message.clear(),
        _ => {}
    }
    Ok(())
}

fn switch_screen(app: &mut App, db: &Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    match screen {
        Screen::Dashboard => app.refresh_dashboard(db)?,
        Screen::Periods => app.refresh_periods(db)?,
    }
    Ok(())
}
