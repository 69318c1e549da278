pub mod event;
pub mod id;
pub mod store;
pub mod template;

pub use event::Event;
pub use id::{EventId, IdIssuer};
pub use store::{EventStore, MemoryStore, StoreError};
pub use template::{default_templates, DragPayload, DragSource, TemplateItem, TemplatePanel};
