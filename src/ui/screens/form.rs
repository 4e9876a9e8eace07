use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::forms::Draft;
use crate::ui::theme;
use crate::ui::util::mask;

/// How a draft is drawn: its title, which field has the cursor, and any
/// inline error from the last submit.
pub(crate) struct FormView<'a, D: Draft> {
    pub(crate) title: String,
    pub(crate) draft: &'a D,
    pub(crate) focus: Option<usize>,
    pub(crate) error: Option<&'a str>,
    pub(crate) hint: &'a str,
}

pub(crate) fn render<D: Draft>(f: &mut Frame, area: Rect, view: FormView<'_, D>) {
    let focused = view.focus.is_some();
    let label_width = D::labels().iter().map(|l| l.len()).max().unwrap_or(0) + 2;

    let mut lines = vec![Line::from("")];
    for (i, label) in D::labels().iter().enumerate() {
        let raw = view.draft.field(i);
        let value = if D::is_secret(i) {
            mask(raw)
        } else {
            raw.to_string()
        };
        let is_cursor = view.focus == Some(i);

        let marker = if is_cursor { "▸ " } else { "  " };
        let label_style = if is_cursor {
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            theme::dim_style()
        };
        let value_style = if is_cursor {
            Style::default()
                .fg(theme::TEXT)
                .bg(theme::SURFACE)
        } else {
            theme::normal_style()
        };
        let cursor = if is_cursor { "▏" } else { "" };

        lines.push(Line::from(vec![
            Span::styled(marker, Style::default().fg(theme::ACCENT)),
            Span::styled(format!("{label:<label_width$}"), label_style),
            Span::styled(format!("{value}{cursor}"), value_style),
        ]));
    }

    lines.push(Line::from(""));
    if let Some(err) = view.error {
        lines.push(Line::from(Span::styled(format!("  {err}"), theme::error_style())));
    }
    lines.push(Line::from(Span::styled(
        format!("  {}", view.hint),
        theme::dim_style(),
    )));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style(focused))
        .title(Span::styled(
            format!(" {} ", view.title),
            theme::title_style(focused),
        ));

    f.render_widget(Paragraph::new(lines).block(block), area);
}
