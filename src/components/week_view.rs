use chrono::{Duration, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::Slot;
use crate::calendar::Event;
use crate::theme;

pub struct WeekView;

/// Cursor position and mode for the week grid.
pub struct WeekCursor {
    pub date: NaiveDate,
    pub slot: Slot,
    pub dragging: bool,
}

impl WeekView {
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        week_start: NaiveDate,
        today: NaiveDate,
        cursor: &WeekCursor,
        hours: (u32, u32),
        events: &[Event],
        now_hour: Option<u32>,
    ) {
        let block = Block::default()
            .title(format!(" Week of {} ", week_start.format("%b %d, %Y")))
            .title_style(theme::current().header)
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.width < 10 || inner.height < 3 {
            return;
        }

        let time_col_w: u16 = if inner.width >= 70 { 6 } else { 4 };
        let col_w = (inner.width.saturating_sub(time_col_w) / 7).max(1);

        let mut col_constraints = vec![Constraint::Length(time_col_w)];
        col_constraints.extend((0..7).map(|_| Constraint::Length(col_w)));
        col_constraints.push(Constraint::Min(0));
        let cols = Layout::horizontal(col_constraints).split(inner);

        // header + all-day row + hour rows, scrolled to keep the cursor visible
        let visible_rows = (inner.height as usize).saturating_sub(2);
        let (hour_start, hour_end) = hours;
        let first_hour = first_visible_hour(cursor.slot, hours, visible_rows);
        let last_hour = (first_hour + visible_rows as u32).min(hour_end);

        let mut row_constraints = vec![Constraint::Length(1), Constraint::Length(1)];
        row_constraints.extend((first_hour..last_hour).map(|_| Constraint::Length(1)));
        row_constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(row_constraints).split(inner);

        for day_offset in 0..7usize {
            let date = week_start + Duration::days(day_offset as i64);
            let col = cols[day_offset + 1];

            let label = if col_w >= 10 {
                date.format("%a %d").to_string()
            } else if col_w >= 5 {
                date.format("%a").to_string()
            } else {
                date.format("%d").to_string()
            };
            let header_style = if date == today {
                theme::current().today.add_modifier(Modifier::BOLD)
            } else {
                theme::current().header
            };
            frame.render_widget(
                Paragraph::new(Span::styled(
                    format!("{:^width$}", label, width = col_w as usize),
                    header_style,
                )),
                col.intersection(rows[0]),
            );

            let all_day: Vec<&Event> = events
                .iter()
                .filter(|e| e.all_day && e.date() == date)
                .collect();
            render_cell(
                frame,
                col.intersection(rows[1]),
                &all_day,
                cursor.date == date && cursor.slot == Slot::AllDay,
                cursor.dragging,
            );

            for (i, hour) in (first_hour..last_hour).enumerate() {
                let slot_events: Vec<&Event> = events
                    .iter()
                    .filter(|e| e.in_slot(date, hour, hours))
                    .collect();
                render_cell(
                    frame,
                    col.intersection(rows[i + 2]),
                    &slot_events,
                    cursor.date == date && cursor.slot == Slot::Hour(hour),
                    cursor.dragging,
                );
            }
        }

        frame.render_widget(
            Paragraph::new(Span::styled("all", theme::current().dim)),
            cols[0].intersection(rows[1]),
        );
        for (i, hour) in (first_hour..last_hour).enumerate() {
            let label = if time_col_w >= 6 {
                format!("{:>2}:00 ", hour)
            } else {
                format!("{:>2} ", hour)
            };
            let style = if Some(hour) == now_hour && hour >= hour_start {
                theme::current().error
            } else {
                theme::current().dim
            };
            frame.render_widget(
                Paragraph::new(Span::styled(label, style)),
                cols[0].intersection(rows[i + 2]),
            );
        }
    }
}

/// First hour row to draw so the cursor slot stays on screen.
pub fn first_visible_hour(slot: Slot, hours: (u32, u32), visible_rows: usize) -> u32 {
    let (start, end) = hours;
    let span = (end - start) as usize;
    if visible_rows == 0 || span <= visible_rows {
        return start;
    }
    match slot {
        Slot::Hour(h) if h >= start + visible_rows as u32 => h + 1 - visible_rows as u32,
        _ => start,
    }
}

fn render_cell(frame: &mut Frame, area: Rect, events: &[&Event], is_cursor: bool, dragging: bool) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let width = area.width as usize;

    let (text, style) = match events.first() {
        Some(ev) => {
            let more = if events.len() > 1 { "+" } else { "" };
            let title: String = ev.title.chars().take(width.saturating_sub(more.len())).collect();
            (format!("{}{}", title, more), theme::current().event)
        }
        None => (String::new(), Style::default()),
    };

    let style = match (is_cursor, dragging) {
        (true, true) => theme::current().drag,
        (true, false) => theme::current().selected,
        _ => style,
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(format!("{:<width$}", text, width = width), style))),
        area,
    );
}
