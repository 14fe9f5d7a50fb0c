//! Tabstrip Widget
//!
//! A tab group owns an ordered list of tab buttons, keeps it in sync with a
//! declared count, tracks the selected index and tells every button which
//! visual state to assume. Buttons run their own transition (color tween,
//! sprite swap or custom callback).

mod button;
mod error;
mod events;
mod group;
mod interaction;
mod state;
mod transition;
mod tween;

pub use button::{TabButton, DEFAULT_LABEL, ICON_NODE_NAME, LABEL_NODE_NAME};
pub use error::TabError;
pub use events::{TabClickedListener, TabCreatedListener, TabEvents};
pub use group::{TabGroup, MAX_TABS};
pub use interaction::{ancestor_groups_allow, AncestorInteractionAware, PointerTarget, TabButtonMut};
pub use state::ButtonState;
pub use transition::{
    ColorFade, CustomTransition, FadeMode, SpriteSwap, Transition, TransitionCallback,
};
pub use tween::{smoothstep, ColorTween, TweenStep};

pub type Result<T> = std::result::Result<T, TabError>;
