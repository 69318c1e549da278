mod app;
mod calendar;
mod components;
mod config;
mod event;
mod logging;
mod scheduler;
mod theme;
mod tui;

use std::path::PathBuf;
use std::time::Duration;

use app::{App, Focus, Slot, ViewMode};
use chrono::{Local, Timelike};
use clap::Parser;
use color_eyre::Result;
use event::{Command, InputContext};
use ratatui::layout::{Constraint, Layout, Rect};
use scheduler::Modal;

#[derive(Parser)]
#[command(name = "calendar-scheduler")]
#[command(about = "Drag-and-drop event scheduler for the terminal", long_about = None)]
struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let _log_guard = logging::init(&config::log_dir())?;
    let config = config::Config::load(cli.config.as_deref())?;
    theme::init(config.theme.clone().into_theme());

    let mut app = App::new(&config)?;
    tracing::info!(events = app.events().len(), "starting scheduler");

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app);
    tui::restore()?;
    tracing::info!("scheduler closed");
    result
}

fn run(terminal: &mut tui::Tui, app: &mut App) -> Result<()> {
    while app.running {
        terminal.draw(|frame| render(frame, app))?;

        let Some(key) = event::next_key_event(Duration::from_millis(100))? else {
            continue;
        };
        let Some(command) = event::command_for(key, input_context(app)) else {
            continue;
        };

        // A new gesture replaces the last message.
        if !matches!(command, Command::Modal(_)) {
            app.status_message = None;
        }
        apply(app, command);
    }

    Ok(())
}

fn input_context(app: &App) -> InputContext {
    if app.show_help {
        return InputContext::Help;
    }
    match app.modal() {
        Modal::CreateDraft(_) => InputContext::CreateForm,
        Modal::ConfirmDelete(_) => InputContext::ConfirmDelete,
        Modal::Closed if app.focus == Focus::Templates => InputContext::Templates,
        Modal::Closed => InputContext::Calendar {
            dragging: app.dragging.is_some(),
        },
    }
}

fn apply(app: &mut App, command: Command) {
    match command {
        Command::Quit => app.running = false,
        Command::ShowHelp => app.show_help = true,
        Command::CloseHelp => app.show_help = false,
        Command::View(mode) => app.set_view(mode),
        Command::Today => app.go_to_today(),
        Command::PrevMonth => app.prev_month(),
        Command::NextMonth => app.next_month(),
        Command::Left => app.cursor_left(),
        Command::Right => app.cursor_right(),
        Command::Up => app.cursor_up(),
        Command::Down => app.cursor_down(),
        Command::Click => app.click(),
        Command::NewEvent => app.click_date(),
        Command::DeleteEvent => app.click_event(),
        Command::CycleEvent => app.cycle_event(),
        Command::ToggleFocus => app.toggle_focus(),
        Command::PrevTemplate => app.select_prev_template(),
        Command::NextTemplate => app.select_next_template(),
        Command::PickUp => app.pick_up_template(),
        Command::CancelDrag => app.cancel_drag(),
        Command::Modal(action) => app.modal_action(action),
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();

    let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
    let panel_w = if area.width >= 80 { 24 } else { 18 };
    let content = Layout::horizontal([Constraint::Min(20), Constraint::Length(panel_w)]).split(layout[0]);

    match app.view_mode {
        ViewMode::Month => render_month_layout(frame, content[0], app),
        ViewMode::Week => {
            let now = Local::now();
            let cursor = components::WeekCursor {
                date: app.selected_date,
                slot: app.slot,
                dragging: app.dragging.is_some(),
            };
            let now_hour = (now.date_naive() >= app.week_start()
                && now.date_naive() < app.week_start() + chrono::Duration::days(7))
            .then(|| now.hour());
            components::WeekView::render(
                frame,
                content[0],
                app.week_start(),
                app.today,
                &cursor,
                (app.day_start_hour, app.day_end_hour),
                app.events(),
                now_hour,
            );
        }
        ViewMode::Day => render_day(frame, content[0], app, Some(app.slot)),
    }

    components::TemplateList::render(
        frame,
        content[1],
        app.drag_source.as_ref(),
        app.dragging.as_ref(),
        app.focus == Focus::Templates,
    );

    match app.modal() {
        Modal::Closed => {}
        Modal::CreateDraft(draft) => components::EventForm::render(frame, area, draft),
        Modal::ConfirmDelete(id) => components::DeleteConfirm::render(frame, area, app.event(id)),
    }

    if app.show_help {
        render_help(frame, area);
    }

    components::StatusBar::render(frame, layout[1], app);
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &App) {
    let counts = app.day_counts();
    let dragging = app.dragging.is_some();

    if area.width < 60 {
        components::MonthView::render(frame, area, app.selected_date, app.today, &counts, dragging);
        return;
    }

    let content = Layout::horizontal([Constraint::Length(37), Constraint::Min(20)]).split(area);
    components::MonthView::render(frame, content[0], app.selected_date, app.today, &counts, dragging);
    render_day(frame, content[1], app, None);
}

fn render_day(frame: &mut ratatui::Frame, area: Rect, app: &App, slot: Option<Slot>) {
    let events = app.events_for_date(app.selected_date);
    let highlighted = app.highlighted_event().map(|e| &e.id);
    let now = Local::now();
    let cursor = components::DayCursor {
        slot,
        highlighted,
        dragging: app.dragging.is_some(),
        now_hour: (now.date_naive() == app.selected_date).then(|| now.hour()),
    };
    components::DayView::render(
        frame,
        area,
        app.selected_date,
        &events,
        (app.day_start_hour, app.day_end_hour),
        &cursor,
    );
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_area = components::event_form::popup_area(area, 54, 24);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Green));

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let section_style = Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {:<10}", keys), key_style),
            Span::raw(desc),
        ])
    };

    let lines = vec![
        Line::from(Span::styled("Calendar", section_style)),
        entry("h/l", "Previous/next day"),
        entry("j/k", "Next/previous week or hour"),
        entry("[/]", "Previous/next month"),
        entry("t", "Jump to today"),
        entry("1/2/3", "Month / Week / Day view"),
        entry("Enter", "Click: open event or new event"),
        entry("n", "New event on the cursor"),
        entry("d", "Delete the highlighted event"),
        entry("e", "Highlight next event here"),
        Line::from(""),
        Line::from(Span::styled("Drag panel", section_style)),
        entry("Tab", "Focus the template panel"),
        entry("Space", "Pick up template"),
        entry("Enter", "Drop on the cursor"),
        entry("Esc", "Cancel drag"),
        Line::from(""),
        Line::from(Span::styled("Dialog", section_style)),
        entry("Enter", "Submit title / confirm delete"),
        entry("Esc", "Cancel"),
        Line::from(""),
        entry("q", "Quit"),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::{backend::TestBackend, Terminal};

    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        if let Some(command) = event::command_for(key, input_context(app)) {
            apply(app, command);
        }
    }

    fn type_str(app: &mut App, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn test_app() -> App {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let config = config::Config {
            seed: Vec::new(),
            ..config::Config::default()
        };
        App::with_today(&config, today).unwrap()
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn create_event_by_keyboard() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        assert!(screen(&app).contains("New Event"));

        type_str(&mut app, "M");
        press(&mut app, KeyCode::Enter);
        assert!(screen(&app).contains("Title must be at least 2 characters."));

        type_str(&mut app, "eeting");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.modal(), &Modal::Closed);
        assert_eq!(app.events()[0].title, "Meeting");
        assert_eq!(app.events()[0].start_display(), "2024-06-10");
    }

    #[test]
    fn typing_q_in_dialog_does_not_quit() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('n'));
        type_str(&mut app, "qq");
        assert!(app.running);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.modal(), &Modal::Closed);
        assert!(app.events().is_empty());
    }

    #[test]
    fn drag_and_drop_then_delete_by_keyboard() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('3'));
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Char('j'));
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.dragging.as_ref().map(|p| p.title.as_str()), Some("event 2"));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.events().len(), 1);
        assert_eq!(app.modal(), &Modal::Closed);
        assert!(screen(&app).contains("event 2"));

        press(&mut app, KeyCode::Char('d'));
        assert!(screen(&app).contains("Do you want to delete this event?"));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.events().is_empty());
    }

    #[test]
    fn early_event_shows_in_week_and_day_views() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let config = config::Config::parse(
            r#"
[[seed]]
title = "early bird"
date = "today"
time = "05:00"
"#,
        )
        .unwrap();
        let mut app = App::with_today(&config, today).unwrap();

        press(&mut app, KeyCode::Char('2'));
        assert!(screen(&app).contains("early bird"));
        press(&mut app, KeyCode::Char('3'));
        assert!(screen(&app).contains("early bird"));
    }

    #[test]
    fn all_views_render() {
        let mut app = test_app();
        for view in ['1', '2', '3'] {
            press(&mut app, KeyCode::Char(view));
            assert!(screen(&app).contains("Drag Event"));
        }
        press(&mut app, KeyCode::Char('?'));
        assert!(screen(&app).contains("Keybindings"));
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_help);
    }
}
