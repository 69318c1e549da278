use chrono::{NaiveDate, NaiveDateTime, Timelike};

use super::id::EventId;

#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    pub start: NaiveDateTime,
    pub all_day: bool,
}

impl Event {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// `YYYY-MM-DD` for all-day events, ISO-8601 date-time otherwise.
    pub fn start_display(&self) -> String {
        if self.all_day {
            self.start.format("%Y-%m-%d").to_string()
        } else {
            self.start.format("%Y-%m-%dT%H:%M:%S").to_string()
        }
    }

    pub fn time_display(&self) -> String {
        if self.all_day {
            "All day".to_string()
        } else {
            self.start.format("%H:%M").to_string()
        }
    }

    /// Whether a timed event belongs to the given hour slot of a grid showing
    /// `hours` (start inclusive, end exclusive). Events before the first slot
    /// land in it, events after the last slot land in the last one.
    pub fn in_slot(&self, date: NaiveDate, hour: u32, hours: (u32, u32)) -> bool {
        if self.all_day || self.date() != date {
            return false;
        }
        let (first, end) = hours;
        let last = end.saturating_sub(1).max(first);
        self.start.hour().clamp(first, last) == hour
    }
}
