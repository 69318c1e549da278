use chrono::NaiveTime;
use thiserror::Error;

use super::id::EventId;

/// One entry in the "Drag Event" panel.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateItem {
    pub id: EventId,
    pub title: String,
    /// Preset start time carried in the drop payload.
    pub time: Option<NaiveTime>,
}

impl TemplateItem {
    pub fn new(id: impl Into<EventId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            time: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplatePanel {
    items: Vec<TemplateItem>,
    selected: usize,
}

impl TemplatePanel {
    pub fn new(items: Vec<TemplateItem>) -> Self {
        Self { items, selected: 0 }
    }

    pub fn items(&self) -> &[TemplateItem] {
        &self.items
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }
}

/// What a dragged template hands to the calendar when it is dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct DragPayload {
    pub title: String,
    pub id: EventId,
    pub start: Option<NaiveTime>,
}

#[derive(Debug, Error, PartialEq)]
pub enum DragSourceError {
    #[error("template panel has no items to drag")]
    EmptyPanel,
}

/// Registration of a template panel as a drop source.
///
/// The handle owns the panel for as long as it is registered; dropping the
/// handle releases the registration.
#[derive(Debug)]
pub struct DragSource {
    panel: TemplatePanel,
}

impl DragSource {
    pub fn register(panel: TemplatePanel) -> Result<Self, DragSourceError> {
        if panel.is_empty() {
            tracing::warn!("drag source not registered: template panel is empty");
            return Err(DragSourceError::EmptyPanel);
        }
        tracing::debug!(items = panel.items.len(), "drag source registered");
        Ok(Self { panel })
    }

    pub fn panel(&self) -> &TemplatePanel {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut TemplatePanel {
        &mut self.panel
    }

    pub fn payload(&self, index: usize) -> Option<DragPayload> {
        let item = self.panel.items.get(index)?;
        tracing::debug!(title = %item.title, id = %item.id, "creating drag payload");
        Some(DragPayload {
            title: item.title.clone(),
            id: item.id.clone(),
            start: item.time,
        })
    }

    pub fn selected_payload(&self) -> Option<DragPayload> {
        self.payload(self.panel.selected)
    }
}

impl Drop for DragSource {
    fn drop(&mut self) {
        tracing::debug!("drag source released");
    }
}

/// `event 1` .. `event 4`, ids 1..4.
pub fn default_templates() -> Vec<TemplateItem> {
    (1..=4u64)
        .map(|n| TemplateItem::new(n, format!("event {}", n)))
        .collect()
}
