//! Tabstrip Core
//!
//! Coordination layer: one `Stage` owns the scene, every tab group living in
//! it and the inspector history. Hosts feed it pointer events and frame ticks.

mod config;
mod error;
mod stage;

pub use config::Config;
pub use error::CoreError;
pub use stage::{PointerEvent, Stage};

// Re-export the building blocks
pub use tabstrip_editor::{
    create_tab_group, CreatedGroup, EditorError, GroupTemplate, Inspector, InspectorCommand,
    InspectorView, UndoEntry,
};
pub use tabstrip_scene::{
    Color, HostMode, InteractionGroup, Node, NodeId, Scene, SceneError, Sprite,
};
pub use tabstrip_widget::{
    ButtonState, ColorFade, CustomTransition, FadeMode, SpriteSwap, TabButton, TabError,
    TabGroup, Transition,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
