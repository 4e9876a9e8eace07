use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
    Frame,
};

use super::app::{App, InputMode};
use super::commands;
use super::theme;
use crate::bootstrap::BootState;
use crate::guard::Route;
use crate::session::AppContext;

pub(crate) fn render(f: &mut Frame, app: &App, ctx: &AppContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Command bar
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app, ctx);
    render_screen(f, chunks[1], app, ctx);
    render_status_bar(f, chunks[2], app, ctx);
    render_command_bar(f, chunks[3], app);

    if let Some(msg) = &app.alert {
        render_alert(f, f.area(), msg);
    }
    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App, ctx: &AppContext) {
    let tabs = if app.boot == BootState::Loading {
        &[][..]
    } else {
        Route::tabs(ctx.has_credentials())
    };

    let titles: Vec<Line> = tabs
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let num = format!("{}", i + 1);
            if *r == app.screen() {
                Line::from(vec![
                    Span::styled(format!("{num}:"), Style::default().fg(theme::TEXT_DIM)),
                    Span::styled(
                        format!("{r}"),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(
                    format!("{num}:{r}"),
                    Style::default().fg(theme::TEXT_DIM),
                ))
            }
        })
        .collect();

    let tabs = Tabs::new(titles)
        .divider(Span::styled(" | ", Style::default().fg(theme::OVERLAY)))
        .style(Style::default().bg(theme::HEADER_BG));

    f.render_widget(tabs, area);
}

fn render_screen(f: &mut Frame, area: Rect, app: &App, ctx: &AppContext) {
    if app.boot == BootState::Loading {
        render_loading(f, area);
        return;
    }
    match app.screen() {
        Route::Home => super::screens::home::render(f, area, app, ctx),
        Route::Categories => super::screens::categories::render(f, area, app, ctx),
        Route::Login | Route::Register => super::screens::auth::render(f, area, app),
    }
}

fn render_loading(f: &mut Frame, area: Rect) {
    let y = area.y + area.height / 2;
    let line = Rect::new(area.x, y, area.width, 1);
    let msg = Paragraph::new(Line::from(Span::styled(
        "Loading...",
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    )))
    .centered();
    f.render_widget(msg, line);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App, ctx: &AppContext) {
    let mode_label = format!(" {} ", app.input_mode);
    let mode_bg = match app.input_mode {
        InputMode::Normal => theme::ACCENT,
        InputMode::Command | InputMode::Editing => theme::GREEN,
        InputMode::Confirm | InputMode::Alert => theme::RED,
    };
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(mode_bg)
        .add_modifier(Modifier::BOLD);

    let who = match ctx.session().user() {
        Some(user) => format!("{} <{}>", user.full_name(), user.email),
        None => "not signed in".into(),
    };
    let info = format!(" {} | {who}", app.screen());

    let right = match (app.screen(), app.input_mode) {
        (Route::Login | Route::Register, _) => " Enter submit | Ctrl-r switch form ",
        (_, InputMode::Editing) => " Enter save | Esc leave form ",
        (Route::Home, _) => " a add | e edit | d delete | L logout | ? help ",
        (Route::Categories, _) => " a add | e edit | d delete | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.chars().count();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_command_bar(f: &mut Frame, area: Rect, app: &App) {
    let (content, cursor_offset) = match app.input_mode {
        InputMode::Command => (
            Line::from(vec![
                Span::styled(":", Style::default().fg(theme::ACCENT)),
                Span::styled(&app.command_input, theme::command_bar_style()),
            ]),
            Some(1 + app.command_input.chars().count() as u16),
        ),
        InputMode::Confirm => (
            Line::from(vec![
                Span::styled(&app.confirm_message, Style::default().fg(theme::YELLOW)),
                Span::styled(" [y/N] ", Style::default().fg(theme::RED)),
            ]),
            None,
        ),
        InputMode::Normal | InputMode::Editing | InputMode::Alert => (
            if app.status_message.is_empty() {
                Line::from(Span::styled(
                    " Press : for commands, ? for help",
                    theme::dim_style(),
                ))
            } else {
                Line::from(Span::styled(
                    &app.status_message,
                    theme::command_bar_style(),
                ))
            },
            None,
        ),
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::COMMAND_BG));
    f.render_widget(bar, area);

    if let Some(offset) = cursor_offset {
        f.set_cursor_position((area.x + offset, area.y));
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn render_alert(f: &mut Frame, area: Rect, msg: &str) {
    let popup_area = centered(area, 52, 7);
    f.render_widget(Clear, popup_area);
    let body = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(msg, theme::error_style())),
        Line::from(""),
        Line::from(Span::styled("Press any key to close", theme::dim_style())),
    ])
    .centered()
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::RED))
            .title(Span::styled(" Alert ", theme::error_style()))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(body, popup_area);
}

fn render_help_overlay(f: &mut Frame, area: Rect) {
    let section = |title: &'static str| {
        Line::from(Span::styled(
            title,
            Style::default()
                .fg(theme::YELLOW)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let row = |text: &'static str| Line::from(Span::styled(text, theme::normal_style()));

    let mut help_text = vec![
        Line::from(Span::styled(
            " ExpenseTUI Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Navigation"),
        row("  j/k or Up/Down   Move cursor           1-2        Switch tabs"),
        row("  Tab/Shift-Tab    Cycle tabs            g/G        Top/Bottom"),
        row("  Backspace        Previous screen       Ctrl-q, q  Quit"),
        Line::from(""),
        section(" Tables"),
        row("  a / i            Add / resume form     e, Enter   Edit row"),
        row("  d                Delete row            x          Cancel edit"),
        row("  r                Refresh               L          Log out"),
        Line::from(""),
        section(" Forms"),
        row("  Tab/Up/Down      Next/Prev field       Enter      Submit"),
        row("  Left/Right       Pick icon             Esc        Leave form"),
        row("  Ctrl-r           Login <-> Register"),
        Line::from(""),
        section(" Commands"),
    ];

    // Build command list dynamically from COMMANDS registry
    let mut seen = std::collections::HashSet::new();
    let mut cmd_lines: Vec<(&str, &str)> = Vec::new();
    for (&name, cmd) in commands::COMMANDS.iter() {
        if name.len() <= 2 {
            continue;
        }
        if seen.insert(cmd.description) {
            cmd_lines.push((name, cmd.description));
        }
    }
    cmd_lines.sort_by_key(|(name, _)| *name);
    for (name, desc) in &cmd_lines {
        help_text.push(Line::from(Span::styled(
            format!("  :{name:<12} {desc}"),
            theme::normal_style(),
        )));
    }

    help_text.push(Line::from(""));
    help_text.push(Line::from(Span::styled(
        " Press any key to close ",
        Style::default().fg(theme::TEXT_DIM),
    )));

    let popup_area = centered(area, 72, help_text.len() as u16 + 2);
    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
