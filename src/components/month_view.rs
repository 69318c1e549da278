use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::days_in_month;
use crate::theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        day_counts: &HashMap<u32, usize>,
        dragging: bool,
    ) {
        let year = selected_date.year();
        let month = selected_date.month();

        let block = Block::default()
            .title(format!(" {} ", selected_date.format("%B %Y")))
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header = Line::from(
            DAY_NAMES
                .iter()
                .map(|d| Span::styled(format!("{:^5}", d), theme::current().header))
                .collect::<Vec<_>>(),
        );

        let weeks = month_grid(year, month)
            .into_iter()
            .map(|week| {
                let cells: Vec<Span> = week
                    .iter()
                    .map(|cell| match cell {
                        None => Span::raw("     "),
                        Some(date) => {
                            let day = date.day();
                            let text = format!(" {:>2}{} ", day, count_marker(day_counts.get(&day)));
                            Span::styled(text, cell_style(*date, selected_date, today, dragging))
                        }
                    })
                    .collect();
                Line::from(cells)
            })
            .collect::<Vec<_>>();

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(weeks.iter().map(|_| Constraint::Length(1)));
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, week) in weeks.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(week), rows[i + 1]);
        }
    }
}

/// Weeks of the month, Sunday first, padded with `None` outside the month.
pub fn month_grid(year: i32, month: u32) -> Vec<[Option<NaiveDate>; 7]> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };
    let lead = first.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(year, month) as usize;

    let mut weeks = Vec::new();
    let mut week = [None; 7];
    for slot in 0..lead + days {
        if slot >= lead {
            week[slot % 7] = NaiveDate::from_ymd_opt(year, month, (slot - lead + 1) as u32);
        }
        if slot % 7 == 6 {
            weeks.push(week);
            week = [None; 7];
        }
    }
    if week.iter().any(Option::is_some) {
        weeks.push(week);
    }
    weeks
}

fn count_marker(count: Option<&usize>) -> char {
    match count.copied().unwrap_or(0) {
        0 => ' ',
        1 => '*',
        n if n <= 9 => char::from_digit(n as u32, 10).unwrap_or('+'),
        _ => '+',
    }
}

fn cell_style(date: NaiveDate, selected: NaiveDate, today: NaiveDate, dragging: bool) -> Style {
    if date == selected && dragging {
        theme::current().drag.add_modifier(Modifier::BOLD)
    } else if date == selected && date == today {
        theme::current().today.add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
    } else if date == selected {
        theme::current().selected
    } else if date == today {
        theme::current().today
    } else {
        Style::default()
    }
}
