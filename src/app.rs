use std::collections::HashMap;

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};
use color_eyre::Result;

use crate::calendar::{
    DragPayload, DragSource, Event, EventId, EventStore, MemoryStore, TemplatePanel,
};
use crate::config::Config;
use crate::scheduler::{Modal, ModalAction, Outcome, Scheduler, SurfaceEvent};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Month,
    Week,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Focus {
    Calendar,
    Templates,
}

/// Row of the week and day grids the cursor sits on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Slot {
    AllDay,
    Hour(u32),
}

pub struct App {
    pub running: bool,
    pub view_mode: ViewMode,
    pub focus: Focus,
    pub selected_date: NaiveDate,
    pub slot: Slot,
    /// Which of the events under the cursor is highlighted.
    pub event_index: usize,
    pub today: NaiveDate,
    pub day_start_hour: u32,
    pub day_end_hour: u32,
    pub dragging: Option<DragPayload>,
    pub drag_source: Option<DragSource>,
    pub status_message: Option<String>,
    pub show_help: bool,
    scheduler: Scheduler<MemoryStore>,
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_today(config, Local::now().date_naive())
    }

    pub fn with_today(config: &Config, today: NaiveDate) -> Result<Self> {
        let panel = TemplatePanel::new(config.template_items()?);
        let mut status_message = None;
        let drag_source = match DragSource::register(panel) {
            Ok(source) => Some(source),
            Err(err) => {
                status_message = Some(format!("Drag panel disabled: {}", err));
                None
            }
        };

        let mut scheduler = Scheduler::new(MemoryStore::new());
        for (title, start, all_day) in config.seed_events(today)? {
            if let Err(err) = scheduler.seed(title, start, all_day) {
                tracing::warn!(%err, "skipping seed event");
            }
        }

        Ok(Self {
            running: true,
            view_mode: ViewMode::Month,
            focus: Focus::Calendar,
            selected_date: today,
            slot: Slot::Hour(config.day_start_hour.max(9).min(config.day_end_hour - 1)),
            event_index: 0,
            today,
            day_start_hour: config.day_start_hour,
            day_end_hour: config.day_end_hour,
            dragging: None,
            drag_source,
            status_message,
            show_help: false,
            scheduler,
        })
    }

    pub fn events(&self) -> &[Event] {
        self.scheduler.events()
    }

    pub fn modal(&self) -> &Modal {
        self.scheduler.modal()
    }

    pub fn event(&self, id: &EventId) -> Option<&Event> {
        self.scheduler.store().get(id)
    }

    pub fn events_for_date(&self, date: NaiveDate) -> Vec<&Event> {
        self.scheduler.store().events_for_date(date)
    }

    /// Number of events per day of the selected month.
    pub fn day_counts(&self) -> HashMap<u32, usize> {
        let mut counts = HashMap::new();
        let store = self.scheduler.store();
        for ev in store.events_for_month(self.selected_date.year(), self.selected_date.month()) {
            *counts.entry(ev.start.day()).or_insert(0) += 1;
        }
        counts
    }

    pub fn week_start(&self) -> NaiveDate {
        let offset = self.selected_date.weekday().num_days_from_sunday() as i64;
        self.selected_date - Duration::days(offset)
    }

    /// Events the cursor is on: the whole day in month view, the slot otherwise.
    pub fn cursor_events(&self) -> Vec<&Event> {
        let day = self.events_for_date(self.selected_date);
        let hours = (self.day_start_hour, self.day_end_hour);
        match (self.view_mode, self.slot) {
            (ViewMode::Month, _) => day,
            (_, Slot::AllDay) => day.into_iter().filter(|e| e.all_day).collect(),
            (_, Slot::Hour(h)) => day
                .into_iter()
                .filter(|e| e.in_slot(self.selected_date, h, hours))
                .collect(),
        }
    }

    pub fn highlighted_event(&self) -> Option<&Event> {
        let events = self.cursor_events();
        if events.is_empty() {
            return None;
        }
        Some(events[self.event_index % events.len()])
    }

    /// Start and all-day flag for whatever the cursor is on.
    pub fn cursor_target(&self) -> (NaiveDateTime, bool) {
        match (self.view_mode, self.slot) {
            (ViewMode::Month, _) | (_, Slot::AllDay) => {
                (self.selected_date.and_time(NaiveTime::MIN), true)
            }
            (_, Slot::Hour(h)) => {
                let time = NaiveTime::from_hms_opt(h, 0, 0).unwrap_or(NaiveTime::MIN);
                (self.selected_date.and_time(time), false)
            }
        }
    }

    // ── calendar gestures ──

    /// A click on the cursor: an event under it if there is one, the empty slot otherwise.
    pub fn click(&mut self) {
        if self.dragging.is_some() {
            self.drop_dragged();
            return;
        }
        match self.highlighted_event().map(|e| e.id.clone()) {
            Some(id) => self.dispatch(SurfaceEvent::EventClick(id)),
            None => self.click_date(),
        }
    }

    pub fn click_date(&mut self) {
        let (start, all_day) = self.cursor_target();
        self.dispatch(SurfaceEvent::DateClick { start, all_day });
    }

    pub fn click_event(&mut self) {
        match self.highlighted_event().map(|e| e.id.clone()) {
            Some(id) => self.dispatch(SurfaceEvent::EventClick(id)),
            None => self.status_message = Some("No event here".to_string()),
        }
    }

    pub fn cycle_event(&mut self) {
        let n = self.cursor_events().len();
        if n > 0 {
            self.event_index = (self.event_index + 1) % n;
        }
    }

    // ── drag and drop ──

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Calendar if self.drag_source.is_some() => Focus::Templates,
            Focus::Calendar => {
                self.status_message = Some("No templates to drag".to_string());
                Focus::Calendar
            }
            Focus::Templates => Focus::Calendar,
        };
    }

    pub fn select_next_template(&mut self) {
        if let Some(ref mut source) = self.drag_source {
            source.panel_mut().select_next();
        }
    }

    pub fn select_prev_template(&mut self) {
        if let Some(ref mut source) = self.drag_source {
            source.panel_mut().select_prev();
        }
    }

    pub fn pick_up_template(&mut self) {
        let Some(payload) = self.drag_source.as_ref().and_then(|s| s.selected_payload()) else {
            return;
        };
        self.status_message = Some(format!("Dragging \"{}\"; Enter to drop, Esc to cancel", payload.title));
        self.dragging = Some(payload);
        self.focus = Focus::Calendar;
    }

    pub fn cancel_drag(&mut self) {
        if let Some(payload) = self.dragging.take() {
            tracing::debug!(title = %payload.title, "drag abandoned");
        }
    }

    pub fn drop_dragged(&mut self) {
        let Some(payload) = self.dragging.take() else {
            return;
        };
        tracing::debug!(template = %payload.id, title = %payload.title, "template dropped");
        let (mut start, mut all_day) = self.cursor_target();
        // A preset time only applies to drops on day cells.
        if let (true, Some(time)) = (all_day, payload.start) {
            start = start.date().and_time(time);
            all_day = false;
        }
        self.dispatch(SurfaceEvent::ExternalDrop {
            start,
            title: payload.title,
            all_day,
        });
    }

    // ── dialog ──

    pub fn modal_action(&mut self, action: ModalAction) {
        let outcome = self.scheduler.modal_action(action);
        self.report(outcome);
    }

    fn dispatch(&mut self, event: SurfaceEvent) {
        let outcome = self.scheduler.handle(event);
        self.report(outcome);
    }

    fn report(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Created(ev) => {
                tracing::info!(id = %ev.id, title = %ev.title, start = %ev.start_display(), "event created");
                self.status_message = Some(format!("Created \"{}\"", ev.title));
            }
            Outcome::Deleted(ev) => {
                tracing::info!(id = %ev.id, title = %ev.title, "event deleted");
                self.status_message = Some(format!("Deleted \"{}\"", ev.title));
                self.event_index = 0;
            }
            Outcome::Rejected(msg) => self.status_message = Some(msg),
            Outcome::Unchanged | Outcome::Opened | Outcome::Invalid | Outcome::Cancelled => {}
        }
    }

    // ── navigation ──

    pub fn cursor_left(&mut self) {
        self.move_days(-1);
    }

    pub fn cursor_right(&mut self) {
        self.move_days(1);
    }

    pub fn cursor_up(&mut self) {
        match self.view_mode {
            ViewMode::Month => self.move_days(-7),
            _ => {
                self.slot = match self.slot {
                    Slot::AllDay => Slot::AllDay,
                    Slot::Hour(h) if h <= self.day_start_hour => Slot::AllDay,
                    Slot::Hour(h) => Slot::Hour(h - 1),
                };
                self.event_index = 0;
            }
        }
    }

    pub fn cursor_down(&mut self) {
        match self.view_mode {
            ViewMode::Month => self.move_days(7),
            _ => {
                self.slot = match self.slot {
                    Slot::AllDay => Slot::Hour(self.day_start_hour),
                    Slot::Hour(h) if h + 1 >= self.day_end_hour => Slot::Hour(h),
                    Slot::Hour(h) => Slot::Hour(h + 1),
                };
                self.event_index = 0;
            }
        }
    }

    pub fn next_month(&mut self) {
        let (year, month) = match self.selected_date.month() {
            12 => (self.selected_date.year() + 1, 1),
            m => (self.selected_date.year(), m + 1),
        };
        self.jump_to_month(year, month);
    }

    pub fn prev_month(&mut self) {
        let (year, month) = match self.selected_date.month() {
            1 => (self.selected_date.year() - 1, 12),
            m => (self.selected_date.year(), m - 1),
        };
        self.jump_to_month(year, month);
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.selected_date = self.today;
        self.event_index = 0;
    }

    pub fn set_view(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.event_index = 0;
    }

    fn move_days(&mut self, days: i64) {
        if let Some(date) = self.selected_date.checked_add_signed(Duration::days(days)) {
            self.selected_date = date;
            self.event_index = 0;
        }
    }

    fn jump_to_month(&mut self, year: i32, month: u32) {
        let day = self.selected_date.day().min(days_in_month(year, month));
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            self.selected_date = date;
            self.event_index = 0;
        }
    }
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1);
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    match (first, next) {
        (Some(first), Some(next)) => next.signed_duration_since(first).num_days() as u32,
        _ => 31,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn unseeded() -> Config {
        Config {
            seed: Vec::new(),
            ..Config::default()
        }
    }

    fn app() -> App {
        App::with_today(&unseeded(), date(2024, 6, 10)).unwrap()
    }

    fn type_title(app: &mut App, title: &str) {
        for c in title.chars() {
            app.modal_action(ModalAction::Input(c));
        }
    }

    #[test]
    fn month_click_creates_all_day_event() {
        let mut app = app();
        app.click();
        assert!(matches!(app.modal(), Modal::CreateDraft(_)));

        type_title(&mut app, "Meeting");
        app.modal_action(ModalAction::Submit);

        assert_eq!(app.modal(), &Modal::Closed);
        assert_eq!(app.events().len(), 1);
        assert_eq!(app.events()[0].start_display(), "2024-06-10");
        assert!(app.events()[0].all_day);
        assert_eq!(app.status_message.as_deref(), Some("Created \"Meeting\""));
    }

    #[test]
    fn drag_template_onto_week_slot() {
        let mut app = app();
        app.set_view(ViewMode::Week);
        app.cursor_right();
        app.slot = Slot::Hour(14);

        app.toggle_focus();
        assert_eq!(app.focus, Focus::Templates);
        app.pick_up_template();
        assert_eq!(app.focus, Focus::Calendar);
        assert!(app.dragging.is_some());

        app.click();
        assert!(app.dragging.is_none());
        assert_eq!(app.modal(), &Modal::Closed);
        let ev = &app.events()[0];
        assert_eq!(ev.title, "event 1");
        assert_eq!(ev.start_display(), "2024-06-11T14:00:00");
        assert!(!ev.all_day);
    }

    #[test]
    fn preset_time_applies_to_day_cell_drops() {
        let config = Config::parse(
            r#"
[[templates]]
title = "standup"
time = "09:15"
"#,
        )
        .unwrap();
        let mut app = App::with_today(&config, date(2024, 6, 10)).unwrap();
        app.pick_up_template();
        app.drop_dragged();

        let ev = &app.events()[0];
        assert_eq!(ev.start_display(), "2024-06-10T09:15:00");
        assert!(!ev.all_day);
    }

    #[test]
    fn cancelled_drag_creates_nothing() {
        let mut app = app();
        app.pick_up_template();
        app.cancel_drag();
        app.drop_dragged();
        assert!(app.events().is_empty());
    }

    #[test]
    fn click_on_existing_event_asks_to_delete() {
        let mut app = app();
        app.pick_up_template();
        app.click();
        assert_eq!(app.events().len(), 1);

        app.click();
        let id = app.events()[0].id.clone();
        assert_eq!(app.modal(), &Modal::ConfirmDelete(id));

        app.modal_action(ModalAction::Confirm);
        assert!(app.events().is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Deleted \"event 1\""));
    }

    #[test]
    fn click_date_always_opens_create_form() {
        let mut app = app();
        app.pick_up_template();
        app.click();
        app.click_date();
        assert!(matches!(app.modal(), Modal::CreateDraft(_)));
    }

    #[test]
    fn click_event_on_empty_day_reports() {
        let mut app = app();
        app.click_event();
        assert_eq!(app.modal(), &Modal::Closed);
        assert_eq!(app.status_message.as_deref(), Some("No event here"));
    }

    #[test]
    fn cycle_event_moves_highlight() {
        let mut app = app();
        for _ in 0..2 {
            app.pick_up_template();
            app.drop_dragged();
        }
        let first = app.highlighted_event().unwrap().id.clone();
        app.cycle_event();
        let second = app.highlighted_event().unwrap().id.clone();
        assert_ne!(first, second);
        app.cycle_event();
        assert_eq!(app.highlighted_event().unwrap().id, first);
    }

    #[test]
    fn empty_template_config_disables_drag_panel() {
        let config = Config::parse("templates = []").unwrap();
        let mut app = App::with_today(&config, date(2024, 6, 10)).unwrap();
        assert!(app.drag_source.is_none());
        assert!(app.status_message.is_some());

        app.toggle_focus();
        assert_eq!(app.focus, Focus::Calendar);
        app.pick_up_template();
        assert!(app.dragging.is_none());
    }

    #[test]
    fn seed_events_are_loaded() {
        let config = Config::parse(
            r#"
[[seed]]
title = "welcome"
date = "today"
"#,
        )
        .unwrap();
        let app = App::with_today(&config, date(2024, 6, 10)).unwrap();
        assert_eq!(app.events().len(), 1);
        assert_eq!(app.day_counts().get(&10), Some(&1));
    }

    #[test]
    fn default_config_opens_with_welcome_event() {
        let app = App::with_today(&Config::default(), date(2024, 6, 10)).unwrap();
        assert_eq!(app.events().len(), 1);
        assert_eq!(app.events()[0].title, "Welcome");
        assert_eq!(app.events()[0].start_display(), "2024-06-10");
    }

    #[test]
    fn events_outside_hour_range_are_reachable() {
        let config = Config::parse(
            r#"
[[seed]]
title = "early bird"
date = "today"
time = "05:00"

[[seed]]
title = "night owl"
date = "today"
time = "23:30"
"#,
        )
        .unwrap();
        let mut app = App::with_today(&config, date(2024, 6, 10)).unwrap();
        app.set_view(ViewMode::Day);

        app.slot = Slot::Hour(app.day_start_hour);
        assert_eq!(app.highlighted_event().unwrap().title, "early bird");

        app.slot = Slot::Hour(app.day_end_hour - 1);
        assert_eq!(app.highlighted_event().unwrap().title, "night owl");

        app.click();
        let id = app.events()[1].id.clone();
        assert_eq!(app.modal(), &Modal::ConfirmDelete(id));
        app.modal_action(ModalAction::Confirm);
        assert_eq!(app.events().len(), 1);
    }

    #[test]
    fn slot_cursor_stays_in_range() {
        let mut app = app();
        app.set_view(ViewMode::Day);
        app.slot = Slot::Hour(app.day_start_hour);
        app.cursor_up();
        assert_eq!(app.slot, Slot::AllDay);
        app.cursor_up();
        assert_eq!(app.slot, Slot::AllDay);
        app.cursor_down();
        assert_eq!(app.slot, Slot::Hour(app.day_start_hour));

        app.slot = Slot::Hour(app.day_end_hour - 1);
        app.cursor_down();
        assert_eq!(app.slot, Slot::Hour(app.day_end_hour - 1));
    }

    #[test]
    fn month_navigation_clamps_day() {
        let mut app = App::with_today(&Config::default(), date(2024, 1, 31)).unwrap();
        app.next_month();
        assert_eq!(app.selected_date, date(2024, 2, 29));
        app.prev_month();
        app.prev_month();
        assert_eq!(app.selected_date, date(2023, 12, 29));
    }

    #[test]
    fn week_starts_on_sunday() {
        let app = app();
        assert_eq!(app.week_start(), date(2024, 6, 9));
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
    }
}
