use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::{error, warn};

use crate::guard::Route;
use crate::session::AppContext;
use crate::ui::app::{App, InputMode};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(ctx: &mut AppContext) -> Result<()> {
    let mut app = App::new();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, ctx);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        error!("TUI exited with error: {e:#}");
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ctx: &mut AppContext,
) -> Result<()> {
    // One frame of the loading screen while the token is checked
    draw(terminal, app, ctx)?;
    app.finish_boot(ctx);

    while app.running {
        draw(terminal, app, ctx)?;

        if let Event::Key(key) = event::read()? {
            if app.show_help {
                app.show_help = false;
                continue;
            }
            if key.code == KeyCode::Char('q') && key.modifiers.contains(KeyModifiers::CONTROL) {
                app.running = false;
                continue;
            }
            match app.input_mode {
                InputMode::Alert => app.dismiss_alert(),
                InputMode::Command => handle_command_input(key, app, ctx),
                InputMode::Confirm => handle_confirm_input(key, app, ctx),
                InputMode::Editing if app.is_auth_screen() => handle_auth_input(key, app, ctx),
                InputMode::Editing => handle_editing_input(key, app, ctx),
                InputMode::Normal => handle_normal_input(key, app, ctx),
            }
        }
    }
    Ok(())
}

fn draw(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ctx: &AppContext,
) -> Result<()> {
    terminal.draw(|f| {
        // 1 tab + 1 status + 1 cmd + 2 borders + 1 header
        let content_height = f.area().height.saturating_sub(6) as usize;
        app.visible_rows = content_height.max(1);
        crate::ui::render::render(f, app, ctx);
    })?;
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: KeyEvent, app: &mut App, ctx: &mut AppContext) {
    if app.is_auth_screen() {
        // Auth screens have nothing but their form
        app.input_mode = InputMode::Editing;
        handle_auth_input(key, app, ctx);
        return;
    }

    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') => app.running = false,
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app, ctx),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('g') => {
            if let Some((index, scroll)) = app.row_cursor() {
                scroll_to_top(index, scroll);
            }
        }
        KeyCode::Char('G') => {
            let len = app.row_count(ctx);
            let page = table_page(app);
            if let Some((index, scroll)) = app.row_cursor() {
                scroll_to_bottom(index, scroll, len, page);
            }
        }
        KeyCode::Char('1') => app.navigate(ctx, Route::Home),
        KeyCode::Char('2') => app.navigate(ctx, Route::Categories),
        KeyCode::Tab => app.cycle_tab(ctx, 1),
        KeyCode::BackTab => app.cycle_tab(ctx, -1),
        KeyCode::Backspace => app.back(ctx),
        KeyCode::Char('a') => app.open_form(false),
        KeyCode::Char('i') => app.open_form(true),
        KeyCode::Char('e') | KeyCode::Enter => app.edit_selected(ctx),
        KeyCode::Char('d') => app.request_delete(ctx),
        KeyCode::Char('x') | KeyCode::Esc => app.cancel_edit(),
        KeyCode::Char('r') => {
            app.refresh(ctx);
            app.set_status("Refreshed");
        }
        KeyCode::Char('L') => app.log_out(ctx),
        KeyCode::Char('?') => app.show_help = true,
        _ => {}
    }
}

fn handle_command_input(key: KeyEvent, app: &mut App, ctx: &mut AppContext) {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            if let Err(e) = commands::handle_command(&input, app, ctx) {
                warn!("Command :{input} failed: {e:#}");
                app.set_status(format!("Error: {e:#}"));
            }
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
}

/// Typing into the Home or Categories form.
fn handle_editing_input(key: KeyEvent, app: &mut App, ctx: &mut AppContext) {
    match key.code {
        KeyCode::Enter => app.submit_form(ctx),
        KeyCode::Esc => {
            // Leave the form but keep the draft; `x` discards it
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab | KeyCode::Down => app.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.prev_field(),
        KeyCode::Left | KeyCode::Right => {
            app.cycle_choice();
        }
        _ => edit_focused_field(key, app),
    }
}

/// Login and Register are always in editing mode.
fn handle_auth_input(key: KeyEvent, app: &mut App, ctx: &mut AppContext) {
    match key.code {
        KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let other = if app.screen() == Route::Login {
                Route::Register
            } else {
                Route::Login
            };
            app.navigate(ctx, other);
        }
        KeyCode::Enter => app.submit_form(ctx),
        KeyCode::Tab | KeyCode::Down => app.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.prev_field(),
        KeyCode::Esc => {
            if let Some(field) = app.focused_field_mut() {
                field.clear();
            }
        }
        _ => edit_focused_field(key, app),
    }
}

fn edit_focused_field(key: KeyEvent, app: &mut App) {
    let Some(field) = app.focused_field_mut() else {
        return;
    };
    match key.code {
        KeyCode::Backspace => {
            field.pop();
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => field.clear(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => field.push(c),
        _ => {}
    }
}

fn handle_confirm_input(key: KeyEvent, app: &mut App, ctx: &mut AppContext) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_pending(ctx),
        _ => app.cancel_pending(),
    }
}

fn table_page(app: &App) -> usize {
    match app.screen() {
        // Chart takes 12 rows above the table
        Route::Home => app.visible_rows.saturating_sub(12).max(1),
        _ => app.visible_rows,
    }
}

fn handle_move_down(app: &mut App, ctx: &AppContext) {
    let len = app.row_count(ctx);
    let page = table_page(app);
    if let Some((index, scroll)) = app.row_cursor() {
        scroll_down(index, scroll, len, page);
    }
}

fn handle_move_up(app: &mut App) {
    if let Some((index, scroll)) = app.row_cursor() {
        scroll_up(index, scroll);
    }
}
