use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;

use super::form::{self, FormView};
use crate::chart::CHART_TITLE;
use crate::forms::{category_icon, FormMode};
use crate::session::AppContext;
use crate::ui::app::{App, InputMode};
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, ctx: &AppContext) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(12), // Monthly chart
            Constraint::Min(8),     // Form + table
        ])
        .split(area);

    render_chart(f, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(chunks[1]);

    render_form(f, body[0], app);
    render_table(f, body[1], app, ctx);
}

fn render_chart(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(
            format!(" {CHART_TITLE} "),
            Style::default()
                .fg(theme::TEXT_DIM)
                .add_modifier(Modifier::BOLD),
        ));

    let bars = app.ledger.bars();
    if bars.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No expenses recorded yet. Press a to add one",
            theme::dim_style(),
        )))
        .centered()
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = bars
        .iter()
        .map(|bar| {
            let val = bar.total.round().to_u64().unwrap_or(0);
            Bar::default()
                .value(val)
                .text_value(format_amount(bar.total))
                .label(Line::from(bar.label))
                .style(Style::default().fg(theme::PURPLE))
                .value_style(
                    Style::default()
                        .fg(theme::HEADER_BG)
                        .bg(theme::PURPLE)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(9)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme::PURPLE))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let form = &app.transaction_form;
    let title = match form.mode() {
        FormMode::Create => "Add Transaction".to_string(),
        FormMode::Edit(_) => "Edit Transaction".to_string(),
    };
    let focus = (app.input_mode == InputMode::Editing).then_some(app.field_index);
    let hint = if focus.is_some() {
        "Enter save | Tab next | Esc leave"
    } else if form.is_editing() {
        "i resume | x cancel edit"
    } else {
        "a add"
    };

    form::render(
        f,
        area,
        FormView {
            title,
            draft: form.draft(),
            focus,
            error: form.error(),
            hint,
        },
    );
}

fn render_table(f: &mut Frame, area: Rect, app: &App, ctx: &AppContext) {
    let txns = app.ledger.transactions();
    let focused = app.input_mode != InputMode::Editing;

    if txns.is_empty() {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused))
            .title(Span::styled(" Transactions (0) ", theme::title_style(focused)));
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No transactions yet", theme::dim_style())),
        ];
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Amount (₹)", "Description", "Category", "Date"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let user = ctx.session().user();
    let editing_id = match app.transaction_form.mode() {
        FormMode::Edit(id) => Some(id.as_str()),
        FormMode::Create => None,
    };

    let rows: Vec<Row> = txns
        .iter()
        .enumerate()
        .skip(app.transaction_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, txn)| {
            let is_cursor = focused && i == app.transaction_index;
            let is_editing = editing_id.is_some() && txn.id.as_deref() == editing_id;

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
                Cell::from(Span::styled(format_amount(txn.amount), theme::amount_style())),
                Cell::from(truncate(&txn.description, 40)),
                Cell::from(category_icon(user, txn.category_id.as_deref())),
                Cell::from(txn.display_date()),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Min(16),
        Constraint::Length(9),
        Constraint::Length(13),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style(focused))
            .title(Span::styled(
                format!(" Transactions ({}) ", txns.len()),
                theme::title_style(focused),
            )),
    );

    f.render_widget(table, area);
}
