use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline},
    Frame,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Period cards
            Constraint::Min(10),   // Category chart + today
            Constraint::Length(3), // Daily spend sparkline
        ])
        .split(area);

    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_period_cards(f, chunks[0], app);
    render_category_chart(f, middle[0], app);
    render_today(f, middle[1], app);
    render_daily_sparkline(f, chunks[2], app);
}

fn render_period_cards(f: &mut Frame, area: Rect, app: &App) {
    let Some(status) = &app.status else {
        return;
    };

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    render_card(
        f,
        cards[0],
        "Allowance",
        status.period.allowance,
        theme::ACCENT,
        Some(status.period.label()),
    );
    render_card(
        f,
        cards[1],
        "Spent",
        status.total_spent,
        theme::RED,
        Some(format!("{} entries total", app.expense_count)),
    );
    render_card(
        f,
        cards[2],
        "Remaining",
        status.remaining,
        theme::balance_color(status.remaining),
        None,
    );
    render_card(
        f,
        cards[3],
        "Daily Limit",
        status.daily_limit,
        theme::balance_color(status.daily_limit),
        Some(format!("{} days left", status.days_left)),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    amount: Decimal,
    color: ratatui::style::Color,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(format!(" {title} "), theme::title_style()));

    let sub_text = subtitle.unwrap_or_default();

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format_amount(amount),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub_text, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn panel(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme::OVERLAY))
        .title(Span::styled(title, theme::title_style()))
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " Spending by Category (last {} days) ",
        app.settings.history_days
    );
    if app.category_totals.is_empty() {
        let msg = Paragraph::new(Line::from(Span::styled(
            "No spending yet. Add entries with `periodledger add` or import sheets.",
            theme::dim_style(),
        )))
        .centered()
        .block(panel(title));
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = app
        .category_totals
        .iter()
        .map(|(category, amt)| {
            let val = amt.to_u64().unwrap_or(0);
            Bar::default()
                .value(val)
                .label(Line::from(truncate(category.as_str(), 10)))
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(panel(title))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_today(f: &mut Frame, area: Rect, app: &App) {
    let Some(today) = &app.today_spending else {
        f.render_widget(panel(" Today ".to_string()), area);
        return;
    };
    let title = format!(" Today: {} ", format_amount(today.total));

    let mut lines: Vec<Line> = today
        .entries
        .iter()
        .map(|e| {
            Line::from(vec![
                Span::styled(format!(" {:>10} ", format_amount(e.amount)), theme::normal_style()),
                Span::styled(truncate(&e.description, 30), theme::dim_style()),
            ])
        })
        .collect();
    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            " Nothing spent today",
            theme::dim_style(),
        )));
    }

    f.render_widget(Paragraph::new(lines).block(panel(title)), area);
}

fn render_daily_sparkline(f: &mut Frame, area: Rect, app: &App) {
    let data: Vec<u64> = app
        .daily_spend
        .iter()
        .map(|amt| amt.to_u64().unwrap_or(0))
        .collect();

    let sparkline = Sparkline::default()
        .block(panel(" Daily Spending ".to_string()))
        .data(&data)
        .style(Style::default().fg(theme::YELLOW));

    f.render_widget(sparkline, area);
}
