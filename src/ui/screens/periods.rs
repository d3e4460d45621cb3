use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, spend_bar};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    if app.history.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled("No budget periods yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Run `periodledger import <dir>` to rebuild history from exported sheets",
                theme::dim_style(),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                " Periods (0) ",
                theme::title_style(),
            ));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["", "Start", "End", "Allowance", "Spent", "Remaining", "Used"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = app
        .history
        .iter()
        .enumerate()
        .skip(app.period_cursor.scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, (period, spent))| {
            let remaining = period.allowance - *spent;
            let style = if i == app.period_cursor.index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            Row::new(vec![
                Cell::from(Span::styled(
                    if period.is_current { "\u{2022}" } else { "" },
                    theme::current_period_style(),
                )),
                Cell::from(period.start_date.format("%Y-%m-%d").to_string()),
                Cell::from(period.end_date.format("%Y-%m-%d").to_string()),
                Cell::from(format_amount(period.allowance)),
                Cell::from(format_amount(*spent)),
                Cell::from(Span::styled(format_amount(remaining), theme::balance_style(remaining))),
                Cell::from(spend_bar(*spent, period.allowance, 16)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(2),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Min(18),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::OVERLAY))
            .title(Span::styled(
                format!(" Periods ({}) ", app.history.len()),
                theme::title_style(),
            )),
    );

    f.render_widget(table, area);
}
