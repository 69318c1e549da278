use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use super::event::Event;
use super::id::EventId;

#[derive(Debug, Error, PartialEq)]
pub enum StoreError {
    #[error("an event with id {0} already exists")]
    DuplicateId(EventId),
    #[error("no event with id {0}")]
    NotFound(EventId),
}

/// Ordered event storage. Insertion order is preserved by `list`.
pub trait EventStore {
    fn list(&self) -> &[Event];

    fn append(&mut self, event: Event) -> Result<(), StoreError>;

    fn remove(&mut self, id: &EventId) -> Result<Event, StoreError>;

    fn get(&self, id: &EventId) -> Option<&Event> {
        self.list().iter().find(|e| &e.id == id)
    }

    fn contains(&self, id: &EventId) -> bool {
        self.get(id).is_some()
    }

    /// Events on `date`: all-day entries first, then by start time.
    fn events_for_date(&self, date: NaiveDate) -> Vec<&Event> {
        let mut events: Vec<&Event> = self.list().iter().filter(|e| e.date() == date).collect();
        events.sort_by_key(|e| (!e.all_day, e.start));
        events
    }

    fn events_for_month(&self, year: i32, month: u32) -> Vec<&Event> {
        self.list()
            .iter()
            .filter(|e| e.start.year() == year && e.start.month() == month)
            .collect()
    }
}

/// In-memory backend; everything is gone when the program exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: Vec<Event>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventStore for MemoryStore {
    fn list(&self) -> &[Event] {
        &self.events
    }

    fn append(&mut self, event: Event) -> Result<(), StoreError> {
        if self.contains(&event.id) {
            tracing::warn!(id = %event.id, "refusing to append duplicate event id");
            return Err(StoreError::DuplicateId(event.id));
        }
        tracing::debug!(id = %event.id, title = %event.title, start = %event.start_display(), "event appended");
        self.events.push(event);
        Ok(())
    }

    fn remove(&mut self, id: &EventId) -> Result<Event, StoreError> {
        match self.events.iter().position(|e| &e.id == id) {
            Some(idx) => {
                let event = self.events.remove(idx);
                tracing::debug!(id = %event.id, "event removed");
                Ok(event)
            }
            None => {
                tracing::warn!(%id, "no event to remove");
                Err(StoreError::NotFound(id.clone()))
            }
        }
    }
}
