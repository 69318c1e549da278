use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Focus, ViewMode};
use crate::scheduler::Modal;
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let w = area.width as usize;

        let mode_str = match app.view_mode {
            ViewMode::Month => "[1]Month",
            ViewMode::Week => "[2]Week",
            ViewMode::Day => "[3]Day",
        };

        let indicator = match (app.modal(), app.focus, &app.dragging) {
            (Modal::CreateDraft(_), _, _) => " [New Event]".to_string(),
            (Modal::ConfirmDelete(_), _, _) => " [Delete]".to_string(),
            (Modal::Closed, _, Some(payload)) => format!(" [Dragging: {}]", payload.title),
            (Modal::Closed, Focus::Templates, None) => " [Templates]".to_string(),
            (Modal::Closed, Focus::Calendar, None) => String::new(),
        };

        let right = match app.status_message {
            Some(ref msg) => format!(" {} ", msg),
            None => hints(app, w).to_string(),
        };

        let left = format!(" {}{} ", mode_str, indicator);
        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, theme::current().status),
            Span::styled(padding, theme::current().status),
            Span::styled(right, theme::current().status),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme::current().status), area);
    }
}

fn hints(app: &App, w: usize) -> &'static str {
    if app.dragging.is_some() {
        return " Enter:Drop Esc:Cancel";
    }
    match app.focus {
        Focus::Templates if w >= 50 => " jk:Select Space:Pick up Tab:Calendar q:Quit",
        Focus::Templates => " Space:Pick Tab:Back",
        Focus::Calendar if w >= 80 => " hjkl:Move [/]:Mon t:Today Enter:Click n:New d:Del Tab:Drag ?:Help q:Quit",
        Focus::Calendar if w >= 50 => " Enter:Click n:New d:Del Tab:Drag q:Quit",
        Focus::Calendar => " ?:Help q:Quit",
    }
}
