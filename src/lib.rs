//! Core engine of a panel workspace indicator.
//!
//! ribbon keeps an ordered, consistent view of workspace existence,
//! visibility, naming, window occupancy and attention state in the face of
//! asynchronous host-driven mutation events, and implements the scroll
//! navigation and drag-reorder logic built on top of that view. The
//! compositor shell, the settings store and the keybinding facility are
//! reached exclusively through the traits in [`host`]; rendering is left to
//! the embedder, which subscribes to update notifications and reads the
//! derived workspace states back.

pub mod common;
pub mod engine;
pub mod host;
pub mod indicator;
pub mod input;
pub mod runloop;
pub mod util;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{SwitchCause, UpdateReason, WorkspaceState, Workspaces};
pub use indicator::Indicator;
pub use runloop::RunLoop;
