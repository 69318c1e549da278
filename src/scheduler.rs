use chrono::NaiveDateTime;

use crate::calendar::{Event, EventId, EventStore, IdIssuer, MemoryStore, StoreError};
use crate::components::event_form::TitleForm;

/// Callbacks emitted by the calendar views.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    /// An empty cell or time slot was activated.
    DateClick { start: NaiveDateTime, all_day: bool },
    /// A template was dropped onto a cell or time slot.
    ExternalDrop {
        start: NaiveDateTime,
        title: String,
        all_day: bool,
    },
    /// An existing event was activated.
    EventClick(EventId),
}

/// User input while the dialog is open.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModalAction {
    Input(char),
    Backspace,
    Submit,
    Confirm,
    Cancel,
}

/// A staged event waiting for its title.
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    pub id: EventId,
    pub start: NaiveDateTime,
    pub all_day: bool,
    pub form: TitleForm,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum Modal {
    #[default]
    Closed,
    CreateDraft(Draft),
    ConfirmDelete(EventId),
}

impl Modal {
    pub fn is_open(&self) -> bool {
        !matches!(self, Modal::Closed)
    }
}

/// What a gesture did, for the status bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Unchanged,
    Opened,
    Created(Event),
    Deleted(Event),
    Invalid,
    Cancelled,
    Rejected(String),
}

/// Turns calendar callbacks and dialog input into store mutations.
pub struct Scheduler<S: EventStore = MemoryStore> {
    store: S,
    modal: Modal,
    ids: IdIssuer,
}

impl<S: EventStore> Scheduler<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            modal: Modal::Closed,
            ids: IdIssuer::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events(&self) -> &[Event] {
        self.store.list()
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    /// Append an event directly, bypassing the dialog. Used for startup data.
    pub fn seed(
        &mut self,
        title: impl Into<String>,
        start: NaiveDateTime,
        all_day: bool,
    ) -> Result<EventId, StoreError> {
        let id = self.ids.issue();
        self.store.append(Event {
            id: id.clone(),
            title: title.into(),
            start,
            all_day,
        })?;
        Ok(id)
    }

    pub fn handle(&mut self, event: SurfaceEvent) -> Outcome {
        if self.modal.is_open() {
            tracing::debug!(?event, "dialog open, ignoring calendar callback");
            return Outcome::Unchanged;
        }

        match event {
            SurfaceEvent::DateClick { start, all_day } => {
                let id = self.ids.issue();
                tracing::debug!(%id, %start, all_day, "staging draft");
                self.modal = Modal::CreateDraft(Draft {
                    id,
                    start,
                    all_day,
                    form: TitleForm::default(),
                });
                Outcome::Opened
            }
            SurfaceEvent::ExternalDrop {
                start,
                title,
                all_day,
            } => {
                let event = Event {
                    id: self.ids.issue(),
                    title,
                    start,
                    all_day,
                };
                self.commit(event)
            }
            SurfaceEvent::EventClick(id) => {
                if !self.store.contains(&id) {
                    tracing::warn!(%id, "clicked event is not in the store");
                    return Outcome::Rejected(format!("No event with id {}", id));
                }
                self.modal = Modal::ConfirmDelete(id);
                Outcome::Opened
            }
        }
    }

    pub fn modal_action(&mut self, action: ModalAction) -> Outcome {
        match (std::mem::take(&mut self.modal), action) {
            (Modal::Closed, _) => Outcome::Unchanged,
            (_, ModalAction::Cancel) => {
                tracing::debug!("dialog cancelled");
                Outcome::Cancelled
            }
            (Modal::CreateDraft(draft), action) => self.draft_action(draft, action),
            (Modal::ConfirmDelete(id), ModalAction::Confirm) => match self.store.remove(&id) {
                Ok(event) => Outcome::Deleted(event),
                Err(err) => Outcome::Rejected(err.to_string()),
            },
            (pending @ Modal::ConfirmDelete(_), _) => {
                self.modal = pending;
                Outcome::Unchanged
            }
        }
    }

    fn draft_action(&mut self, mut draft: Draft, action: ModalAction) -> Outcome {
        match action {
            ModalAction::Input(c) => draft.form.input_char(c),
            ModalAction::Backspace => draft.form.backspace(),
            ModalAction::Submit => match draft.form.validate() {
                Ok(title) => {
                    return self.commit(Event {
                        id: draft.id,
                        title,
                        start: draft.start,
                        all_day: draft.all_day,
                    });
                }
                Err(err) => {
                    tracing::debug!(%err, "draft title rejected");
                    self.modal = Modal::CreateDraft(draft);
                    return Outcome::Invalid;
                }
            },
            ModalAction::Confirm | ModalAction::Cancel => {}
        }
        self.modal = Modal::CreateDraft(draft);
        Outcome::Unchanged
    }

    fn commit(&mut self, event: Event) -> Outcome {
        match self.store.append(event.clone()) {
            Ok(()) => Outcome::Created(event),
            Err(err) => Outcome::Rejected(err.to_string()),
        }
    }
}
