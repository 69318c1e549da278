pub mod day_view;
pub mod event_form;
pub mod month_view;
pub mod status_bar;
pub mod template_list;
pub mod week_view;

pub use day_view::{DayCursor, DayView};
pub use event_form::{DeleteConfirm, EventForm};
pub use month_view::MonthView;
pub use status_bar::StatusBar;
pub use template_list::TemplateList;
pub use week_view::{WeekCursor, WeekView};
