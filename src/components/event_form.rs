use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};
use thiserror::Error;

use crate::calendar::Event;
use crate::scheduler::Draft;
use crate::theme;

pub const MIN_TITLE_LEN: usize = 2;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("Title must be at least {min} characters.")]
    TitleTooShort { min: usize },
}

/// Check the title field as typed. Length is counted in characters and the
/// title is kept verbatim.
pub fn validate_title(input: &str) -> Result<String, ValidationError> {
    if input.chars().count() < MIN_TITLE_LEN {
        return Err(ValidationError::TitleTooShort { min: MIN_TITLE_LEN });
    }
    Ok(input.to_string())
}

/// The create dialog's only field plus its inline message.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleForm {
    pub title: String,
    pub error: Option<ValidationError>,
}

impl TitleForm {
    pub fn input_char(&mut self, c: char) {
        self.title.push(c);
    }

    pub fn backspace(&mut self) {
        self.title.pop();
    }

    /// On failure the message is kept for display and the field is left as typed.
    pub fn validate(&mut self) -> Result<String, ValidationError> {
        match validate_title(&self.title) {
            Ok(title) => {
                self.error = None;
                Ok(title)
            }
            Err(err) => {
                self.error = Some(err.clone());
                Err(err)
            }
        }
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, draft: &Draft) {
        let form_area = popup_area(area, 50, 9);
        frame.render_widget(Clear, form_area);

        let block = Block::default()
            .title(" New Event ")
            .title_style(theme::current().accent.add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(theme::current().accent);

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // validation message
            Constraint::Length(1), // start
            Constraint::Length(1), // description
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let field = Line::from(vec![
            Span::styled(format!("{:<7}", "Title:"), theme::current().dim),
            Span::styled(
                format!("{}_", draft.form.title),
                Style::default().fg(ratatui::style::Color::Cyan),
            ),
        ]);
        frame.render_widget(Paragraph::new(field), rows[0]);

        if let Some(ref err) = draft.form.error {
            let msg = Line::from(Span::styled(format!("       {}", err), theme::current().error));
            frame.render_widget(Paragraph::new(msg), rows[1]);
        }

        let when = if draft.all_day {
            draft.start.format("%a %b %d, %Y (all day)").to_string()
        } else {
            draft.start.format("%a %b %d, %Y %H:%M").to_string()
        };
        let start = Line::from(vec![
            Span::styled(format!("{:<7}", "Start:"), theme::current().dim),
            Span::raw(when),
        ]);
        frame.render_widget(Paragraph::new(start), rows[2]);

        frame.render_widget(
            Paragraph::new(Span::styled(
                "This is how the event appears on the calendar.",
                theme::current().dim,
            )),
            rows[3],
        );

        let help = Line::from(vec![
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Submit ", theme::current().dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme::current().dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[5]);
    }
}

pub struct DeleteConfirm;

impl DeleteConfirm {
    pub fn render(frame: &mut Frame, area: Rect, event: Option<&Event>) {
        let popup = popup_area(area, 44, 7);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Delete Event ")
            .title_style(theme::current().error.add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(theme::current().error);

        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let mut lines = vec![Line::from("Do you want to delete this event?")];
        if let Some(ev) = event {
            lines.push(Line::from(vec![
                Span::styled(ev.title.clone(), theme::current().header),
                Span::styled(format!("  {}", ev.start_display()), theme::current().dim),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Delete ", theme::current().dim),
            Span::styled("n/Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme::current().dim),
        ]));

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

/// Centered popup clamped to the available area.
pub fn popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let w = area.width.min(width).max(area.width.min(30));
    let h = area.height.min(height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_titles_are_refused() {
        assert_eq!(
            validate_title("a"),
            Err(ValidationError::TitleTooShort { min: 2 })
        );
        assert!(validate_title("").is_err());
        assert!(validate_title("日").is_err());
    }

    #[test]
    fn titles_are_kept_as_typed_and_counted_in_chars() {
        assert_eq!(validate_title("  x  ").unwrap(), "  x  ");
        assert_eq!(validate_title(" Meeting ").unwrap(), " Meeting ");
        assert_eq!(validate_title("日本").unwrap(), "日本");
    }

    #[test]
    fn form_keeps_message_until_valid() {
        let mut form = TitleForm::default();
        form.input_char('M');
        assert!(form.validate().is_err());
        assert_eq!(
            form.error.as_ref().map(|e| e.to_string()),
            Some("Title must be at least 2 characters.".to_string())
        );

        form.input_char('e');
        assert_eq!(form.validate().unwrap(), "Me");
        assert_eq!(form.error, None);

        form.backspace();
        assert_eq!(form.title, "M");
    }

    #[test]
    fn popup_is_centered_and_clamped() {
        let area = Rect::new(0, 0, 100, 40);
        assert_eq!(popup_area(area, 50, 10), Rect::new(25, 15, 50, 10));

        let small = Rect::new(0, 0, 20, 5);
        assert_eq!(popup_area(small, 50, 10), Rect::new(0, 0, 20, 5));
    }
}
