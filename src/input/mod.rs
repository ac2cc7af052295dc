//! User input surfaces: scroll navigation, drag reordering and global
//! keybindings.

pub mod drag;
pub mod keybindings;
pub mod scroll;
