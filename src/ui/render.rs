use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Tabs},
    Frame,
};

use super::app::{App, Screen};
use super::theme;

pub(crate) fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Tab bar
            Constraint::Min(5),    // Main content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Message line
        ])
        .split(f.area());

    render_tab_bar(f, chunks[0], app);
    render_screen(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);
    render_message_line(f, chunks[3], app);

    if app.show_help {
        render_help_overlay(f, f.area());
    }
}

fn render_tab_bar(f: &mut Frame, area: Rect, app: &App) {
    let titles: Vec<Line> = Screen::all()
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let num = format!("{}", i + 1);
            if *s == app.screen {
                Line::from(vec![
                    Span::styled(format!("{num}:"), Style::default().fg(theme::TEXT_DIM)),
                    Span::styled(
                        format!("{s}"),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(Span::styled(
                    format!("{num}:{s}"),
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

fn render_screen(f: &mut Frame, area: Rect, app: &App) {
    match app.screen {
        Screen::Dashboard => super::screens::dashboard::render(f, area, app),
        Screen::Periods => super::screens::periods::render(f, area, app),
    }
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mode_label = format!(" {} ", app.today.format("%a %b %d"));
    let mode_style = Style::default()
        .fg(theme::HEADER_BG)
        .bg(theme::ACCENT)
        .add_modifier(Modifier::BOLD);

    let period = app
        .status
        .as_ref()
        .map(|s| s.period.label())
        .unwrap_or_else(|| "no current period".into());
    let info = format!(" {} | {} | {} periods", app.screen, period, app.history.len());

    let right = match app.screen {
        Screen::Dashboard => " r refresh | Tab switch | ? help ",
        Screen::Periods => " j/k move | r refresh | ? help ",
    };

    let available = area.width as usize;
    let used = mode_label.chars().count() + info.chars().count() + right.len();
    let pad = available.saturating_sub(used);

    let bar = Paragraph::new(Line::from(vec![
        Span::styled(&mode_label, mode_style),
        Span::styled(&info, theme::status_bar_style()),
        Span::styled(" ".repeat(pad), theme::status_bar_style()),
        Span::styled(right, theme::status_bar_style()),
    ]));
    f.render_widget(bar, area);
}

fn render_message_line(f: &mut Frame, area: Rect, app: &App) {
    let content = if app.status_message.is_empty() {
        Line::from(Span::styled(
            " Press ? for help, q to quit",
            theme::dim_style(),
        ))
    } else {
        Line::from(Span::styled(
            &app.status_message,
            theme::message_style(),
        ))
    };

    let bar = Paragraph::new(content).style(Style::default().bg(theme::MESSAGE_BG));
    f.render_widget(bar, area);
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
    let entry = |text: &'static str| Line::from(Span::styled(text, theme::normal_style()));

    let help_text = vec![
        Line::from(Span::styled(
            " PeriodLedger Help ",
            Style::default()
                .fg(theme::ACCENT)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section(" Navigation"),
        entry("  j/k or Up/Down   Move cursor           1-2        Switch tabs"),
        entry("  Tab              Cycle tabs            g/G        Top/Bottom"),
        Line::from(""),
        section(" Actions"),
        entry("  r                Reload from the ledger"),
        entry("  q / Ctrl-q       Quit"),
        Line::from(""),
        section(" Editing"),
        entry("  periodledger add <date> <amount> <description>"),
        entry("  periodledger import <dir>   periodledger allowance <amount>"),
        Line::from(""),
        Line::from(Span::styled(
            " Press any key to close ",
            Style::default().fg(theme::TEXT_DIM),
        )),
    ];

    // Center the popup, clamped to terminal height
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_width = 72.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);
    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT))
            .style(Style::default().bg(theme::HEADER_BG)),
    );
    f.render_widget(help, popup_area);
}
