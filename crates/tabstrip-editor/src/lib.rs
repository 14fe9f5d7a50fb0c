//! Tabstrip Editor
//!
//! Design-time surface of the tab group:
//! - `UI / Tab System` menu action creating a pre-wired group
//! - Inspector commands (`count 3`, `select 1`, `clear`, `reset`, ...)
//!   applied as single undoable steps

mod command;
mod error;
mod inspector;
mod menu;

pub use command::InspectorCommand;
pub use error::EditorError;
pub use inspector::{Inspector, InspectorView, UndoEntry, DISABLED_WARNING};
pub use menu::{create_tab_group, CreatedGroup, GroupTemplate, CANVAS_NODE_NAME, GROUP_NODE_NAME};

pub type Result<T> = std::result::Result<T, EditorError>;
