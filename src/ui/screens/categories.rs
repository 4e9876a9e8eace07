use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::form::{self, FormView};
use crate::forms::FormMode;
use crate::session::AppContext;
use crate::ui::app::{App, InputMode};
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, ctx: &AppContext) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_form(f, chunks[0], app);
    render_table(f, chunks[1], app, ctx);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.category_form;
    let title = match form.mode() {
        FormMode::Create => "Add Category",
        FormMode::Edit(_) => "Edit Category",
    };
    let focus = (app.input_mode == InputMode::Editing).then_some(app.field_index);
    let hint = match focus {
        Some(1) => "Left/Right pick icon | Enter save | Esc leave",
        Some(_) => "Enter save | Tab next | Esc leave",
        None if form.is_editing() => "i resume | x cancel edit",
        None => "a add",
    };

    let area = Rect {
        height: area.height.min(9),
        ..area
    };
    form::render(
        f,
        area,
        FormView {
            title: title.into(),
            draft: form.draft(),
            focus,
            error: form.error(),
            hint,
        },
    );
}

fn render_table(f: &mut Frame, area: Rect, app: &App, ctx: &AppContext) {
    let categories = ctx.categories();
    let focused = app.input_mode != InputMode::Editing;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(focused))
        .title(Span::styled(
            format!(" Categories ({}) ", categories.len()),
            theme::title_style(focused),
        ));

    if categories.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No categories yet", theme::dim_style())),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Icon", "Label"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let editing_id = match app.category_form.mode() {
        FormMode::Edit(id) => Some(id.as_str()),
        FormMode::Create => None,
    };

    let rows: Vec<Row> = categories
        .iter()
        .enumerate()
        .skip(app.category_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, cat)| {
            let is_cursor = focused && i == app.category_index;
            let is_editing = editing_id.is_some() && cat.id.as_deref() == editing_id;

            let style = if is_cursor {
                theme::selected_style()
            } else if is_editing {
                Style::default().fg(theme::YELLOW)
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(cat.display_icon()),
                Cell::from(truncate(&cat.label, 40)),
            ])
            .style(style)
        })
        .collect();

    let widths = [Constraint::Length(8), Constraint::Min(20)];
    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}
