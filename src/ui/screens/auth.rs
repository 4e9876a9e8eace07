use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::form::{self, FormView};
use crate::guard::Route;
use crate::ui::app::App;
use crate::ui::theme;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let width = 64.min(area.width);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let column = Rect::new(x, area.y, width, area.height);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Heading
            Constraint::Length(10), // Form
            Constraint::Min(0),
        ])
        .split(column);

    let (heading, switch) = match app.screen() {
        Route::Register => ("Create an account", "Already registered? Ctrl-r to sign in"),
        _ => ("Sign in", "No account yet? Ctrl-r to register"),
    };

    let header = Paragraph::new(vec![
        Line::from(Span::styled(
            heading,
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(switch, theme::dim_style())),
    ])
    .centered();
    f.render_widget(header, chunks[0]);

    let focus = Some(app.field_index);
    let hint = "Tab/Up/Down move | Enter submit | Ctrl-q quit";
    match app.screen() {
        Route::Register => form::render(
            f,
            chunks[1],
            FormView {
                title: "Register".into(),
                draft: &app.register,
                focus,
                error: None,
                hint,
            },
        ),
        _ => form::render(
            f,
            chunks[1],
            FormView {
                title: "Login".into(),
                draft: &app.login,
                focus,
                error: None,
                hint,
            },
        ),
    }
}
