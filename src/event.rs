use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::ViewMode;
use crate::scheduler::ModalAction;

/// Wait up to `timeout` for a key press. Releases and repeats are skipped.
pub fn next_key_event(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

/// Which part of the screen receives keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputContext {
    Help,
    CreateForm,
    ConfirmDelete,
    Templates,
    Calendar { dragging: bool },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Quit,
    ShowHelp,
    CloseHelp,
    View(ViewMode),
    Today,
    PrevMonth,
    NextMonth,
    Left,
    Right,
    Up,
    Down,
    Click,
    NewEvent,
    DeleteEvent,
    CycleEvent,
    ToggleFocus,
    PrevTemplate,
    NextTemplate,
    PickUp,
    CancelDrag,
    Modal(ModalAction),
}

pub fn command_for(key: KeyEvent, ctx: InputContext) -> Option<Command> {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(Command::Quit);
    }

    match ctx {
        InputContext::Help => match key.code {
            KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => Some(Command::CloseHelp),
            _ => None,
        },
        InputContext::CreateForm => match key.code {
            KeyCode::Esc => Some(Command::Modal(ModalAction::Cancel)),
            KeyCode::Enter => Some(Command::Modal(ModalAction::Submit)),
            KeyCode::Backspace => Some(Command::Modal(ModalAction::Backspace)),
            KeyCode::Char(c) => Some(Command::Modal(ModalAction::Input(c))),
            _ => None,
        },
        InputContext::ConfirmDelete => match key.code {
            KeyCode::Char('y') | KeyCode::Enter => Some(Command::Modal(ModalAction::Confirm)),
            KeyCode::Char('n') | KeyCode::Esc => Some(Command::Modal(ModalAction::Cancel)),
            _ => None,
        },
        InputContext::Templates => match key.code {
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Tab | KeyCode::Esc => Some(Command::ToggleFocus),
            KeyCode::Up | KeyCode::Char('k') => Some(Command::PrevTemplate),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::NextTemplate),
            KeyCode::Char(' ') | KeyCode::Enter => Some(Command::PickUp),
            KeyCode::Char('?') => Some(Command::ShowHelp),
            _ => None,
        },
        InputContext::Calendar { dragging } => match key.code {
            KeyCode::Esc if dragging => Some(Command::CancelDrag),
            KeyCode::Enter | KeyCode::Char(' ') => Some(Command::Click),
            KeyCode::Char('q') => Some(Command::Quit),
            KeyCode::Char('1') => Some(Command::View(ViewMode::Month)),
            KeyCode::Char('2') => Some(Command::View(ViewMode::Week)),
            KeyCode::Char('3') => Some(Command::View(ViewMode::Day)),
            KeyCode::Char('t') => Some(Command::Today),
            KeyCode::Char('[') => Some(Command::PrevMonth),
            KeyCode::Char(']') => Some(Command::NextMonth),
            KeyCode::Left | KeyCode::Char('h') => Some(Command::Left),
            KeyCode::Right | KeyCode::Char('l') => Some(Command::Right),
            KeyCode::Up | KeyCode::Char('k') => Some(Command::Up),
            KeyCode::Down | KeyCode::Char('j') => Some(Command::Down),
            KeyCode::Char('n') if !dragging => Some(Command::NewEvent),
            KeyCode::Char('d') if !dragging => Some(Command::DeleteEvent),
            KeyCode::Char('e') => Some(Command::CycleEvent),
            KeyCode::Tab if !dragging => Some(Command::ToggleFocus),
            KeyCode::Char('?') => Some(Command::ShowHelp),
            _ => None,
        },
    }
}
