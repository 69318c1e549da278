use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::app::Slot;
use crate::calendar::{Event, EventId};
use crate::components::week_view::first_visible_hour;
use crate::theme;

pub struct DayView;

/// Cursor state the day list needs to draw its highlight.
pub struct DayCursor<'a> {
    pub slot: Option<Slot>,
    pub highlighted: Option<&'a EventId>,
    pub dragging: bool,
    /// Hour to mark as "now" when the agenda shows today.
    pub now_hour: Option<u32>,
}

impl DayView {
    /// Hour-by-hour agenda for one date. With `cursor.slot == None` the list
    /// shows only the events of the day (used beside the month grid).
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        events: &[&Event],
        hours: (u32, u32),
        cursor: &DayCursor,
    ) {
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let count = match events.len() {
            0 => String::new(),
            1 => " 1 event ".to_string(),
            n => format!(" {} events ", n),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::current().header)
            .title_bottom(Line::from(Span::styled(count, theme::current().dim)))
            .borders(Borders::ALL)
            .border_style(theme::current().border);

        let inner_h = area.height.saturating_sub(2) as usize;

        let items: Vec<ListItem> = match cursor.slot {
            None if events.is_empty() => vec![ListItem::new(Span::styled(
                "No events",
                theme::current().dim,
            ))],
            None => events
                .iter()
                .map(|ev| ListItem::new(event_line(ev, cursor)))
                .collect(),
            Some(slot) => {
                let first = first_visible_hour(slot, hours, inner_h.saturating_sub(1));
                let mut rows = vec![slot_row(
                    "All day",
                    events.iter().filter(|e| e.all_day),
                    slot == Slot::AllDay,
                    false,
                    cursor,
                )];
                rows.extend((first..hours.1).map(|hour| {
                    slot_row(
                        &format!("{:02}:00", hour),
                        events.iter().filter(|e| e.in_slot(date, hour, hours)),
                        slot == Slot::Hour(hour),
                        cursor.now_hour == Some(hour),
                        cursor,
                    )
                }));
                rows
            }
        };

        frame.render_widget(List::new(items).block(block), area);
    }
}

fn event_line<'a>(ev: &'a Event, cursor: &DayCursor) -> Line<'a> {
    let style = if cursor.highlighted == Some(&ev.id) {
        theme::current().selected
    } else {
        theme::current().event
    };
    Line::from(vec![
        Span::styled(format!(" {:<8}", ev.time_display()), theme::current().dim),
        Span::styled(format!(" {} ", ev.title), style),
    ])
}

fn slot_row<'a, 'e>(
    label: &str,
    events: impl Iterator<Item = &'a &'e Event>,
    is_cursor: bool,
    is_now: bool,
    cursor: &DayCursor,
) -> ListItem<'e>
where
    'e: 'a,
{
    let label_style = match (is_cursor, cursor.dragging) {
        (true, true) => theme::current().drag,
        (true, false) => theme::current().selected,
        _ if is_now => theme::current().error,
        _ => theme::current().dim,
    };
    let mut spans = vec![Span::styled(format!(" {:<8}", label), label_style)];
    for ev in events {
        let style = if is_cursor && cursor.highlighted == Some(&ev.id) {
            theme::current().selected.add_modifier(Modifier::BOLD)
        } else {
            theme::current().event
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(format!(" {} ", ev.title), style));
    }
    ListItem::new(Line::from(spans))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDateTime;
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn render_to_string(events: &[&Event], cursor: &DayCursor) -> String {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(50, 24)).unwrap();
        terminal
            .draw(|frame| DayView::render(frame, frame.area(), date, events, (6, 23), cursor))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn empty_agenda_says_so() {
        let cursor = DayCursor {
            slot: None,
            highlighted: None,
            dragging: false,
            now_hour: None,
        };
        let text = render_to_string(&[], &cursor);
        assert!(text.contains("Monday, June 10, 2024"));
        assert!(text.contains("No events"));
    }

    #[test]
    fn slot_rows_show_events_by_hour() {
        let ev = Event {
            id: EventId::from(1),
            title: "Lunch".into(),
            start: NaiveDateTime::parse_from_str("2024-06-10 12:30", "%Y-%m-%d %H:%M").unwrap(),
            all_day: false,
        };
        let cursor = DayCursor {
            slot: Some(Slot::Hour(12)),
            highlighted: Some(&ev.id),
            dragging: false,
            now_hour: None,
        };
        let text = render_to_string(&[&ev], &cursor);
        assert!(text.contains("12:00"));
        assert!(text.contains("Lunch"));
        assert!(text.contains("1 event"));
    }

    #[test]
    fn early_events_show_in_first_slot() {
        let ev = Event {
            id: EventId::from(2),
            title: "early bird".into(),
            start: NaiveDateTime::parse_from_str("2024-06-10 05:00", "%Y-%m-%d %H:%M").unwrap(),
            all_day: false,
        };
        let cursor = DayCursor {
            slot: Some(Slot::Hour(6)),
            highlighted: None,
            dragging: false,
            now_hour: None,
        };
        let text = render_to_string(&[&ev], &cursor);
        assert!(text.contains("early bird"));
    }

    #[test]
    fn current_hour_label_is_marked() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let cursor = DayCursor {
            slot: Some(Slot::Hour(9)),
            highlighted: None,
            dragging: false,
            now_hour: Some(11),
        };
        let mut terminal = Terminal::new(TestBackend::new(50, 24)).unwrap();
        terminal
            .draw(|frame| DayView::render(frame, frame.area(), date, &[], (6, 23), &cursor))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let row_of = |label: &str| {
            (0..buffer.area.height)
                .find(|&y| {
                    let line: String = (0..buffer.area.width)
                        .map(|x| buffer[(x, y)].symbol())
                        .collect();
                    line.contains(label)
                })
                .unwrap()
        };
        // Label cells start after the border and the leading space.
        let now_cell = &buffer[(2, row_of("11:00"))];
        let other_cell = &buffer[(2, row_of("12:00"))];
        assert_eq!(now_cell.fg, theme::current().error.fg.unwrap());
        assert_eq!(other_cell.fg, theme::current().dim.fg.unwrap());
    }
}
