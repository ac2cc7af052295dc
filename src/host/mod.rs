//! Collaborator boundary toward the host shell.
//!
//! Everything the indicator needs from the compositor (workspace and
//! window queries, activation and reorder commands, listener registration,
//! the settings store and the global keybinding facility) is expressed as
//! a trait here, with a minimal structural type per event. The crate never
//! reaches past this boundary.

use bitflags::bitflags;
use strum_macros::{Display, EnumString};

slotmap::new_key_type! {
    /// Stable handle for a live workspace. Handles survive reordering;
    /// indices do not.
    pub struct WorkspaceId;

    /// Stable handle for a window.
    pub struct WindowId;
}

/// Handle to a listener registration on the host. The host does not
/// garbage-collect dangling connections, so every issued id must
/// eventually be passed back to [`HostShell::disconnect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalId(pub u64);

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct WindowFlags: u8 {
        /// Excluded from taskbar-like listings.
        const SKIP_TASKBAR = 1 << 0;
        /// Pinned to every workspace, e.g. on a secondary monitor when
        /// workspaces do not span all screens.
        const ON_ALL_WORKSPACES = 1 << 1;
        /// Requests user notice without stealing focus; the host clears
        /// this flag when the window is focused.
        const DEMANDS_ATTENTION = 1 << 2;
        /// Urgency hint. Sticky: may stay set after the window is focused.
        const URGENT = 1 << 3;
    }
}

impl WindowFlags {
    pub fn wants_attention(self) -> bool {
        self.intersects(WindowFlags::DEMANDS_ATTENTION | WindowFlags::URGENT)
    }

    /// Whether the window counts toward workspace occupancy and attention.
    pub fn occupies_workspace(self) -> bool {
        !self.intersects(WindowFlags::SKIP_TASKBAR | WindowFlags::ON_ALL_WORKSPACES)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
    Left,
    Right,
}

/// Which widget the scroll listener is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ScrollTarget {
    Panel,
    Indicator,
}

/// Events the host delivers on its run loop, one structural variant per
/// signal. Window and workspace listener events arrive only while the
/// corresponding connection is live.
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// The number of workspaces changed.
    WorkspacesChanged,
    /// Live workspaces were reordered without a count change.
    WorkspacesReordered,
    ActiveWorkspaceChanged,
    /// The host's global window tracking changed (windows opened, closed
    /// or renamed anywhere).
    TrackedWindowsChanged,
    /// A workspace is about to be inserted at `index`. The host commits to
    /// calling this before the insertion becomes observable.
    WorkspaceWillBeInserted { index: usize },
    WindowAdded { workspace: WorkspaceId },
    WindowRemoved { workspace: WorkspaceId },
    WindowDemandsAttention { window: WindowId },
    WindowMarkedUrgent { window: WindowId },
    /// The attention/urgency flags of a tracked window changed.
    WindowAttentionChanged { window: WindowId },
    WindowFocused { window: WindowId },
    WindowUnmanaged { window: WindowId },
    Scroll { direction: ScrollDirection },
    Keybinding { name: String },
    SettingChanged { key: String },
}

/// The compositor's workspace and window API.
///
/// All index- and handle-based lookups tolerate stale input by returning
/// `None` or an empty list; commands on missing targets are no-ops on the
/// host side.
pub trait HostShell {
    fn workspace_count(&self) -> usize;
    fn active_workspace_index(&self) -> usize;
    fn workspace_at(&self, index: usize) -> Option<WorkspaceId>;
    fn workspace_index(&self, workspace: WorkspaceId) -> Option<usize>;

    /// Windows on a workspace in host listing order.
    fn windows_on(&self, workspace: WorkspaceId) -> Vec<WindowId>;
    /// Windows on a workspace, most recently used first.
    fn windows_mru(&self, workspace: WorkspaceId) -> Vec<WindowId>;
    fn all_windows(&self) -> Vec<WindowId>;
    /// Empty flags for unknown windows.
    fn window_flags(&self, window: WindowId) -> WindowFlags;
    /// Application identifier used for smart naming.
    fn window_app_id(&self, window: WindowId) -> Option<String>;
    /// For attached dialogs, the window the dialog belongs to.
    fn dialog_owner(&self, window: WindowId) -> Option<WindowId>;
    fn focused_window(&self) -> Option<WindowId>;

    fn activate_workspace(&self, index: usize);
    /// Appends a new workspace at the end and activates it.
    fn append_workspace(&self);
    fn remove_workspace(&self, index: usize);
    fn reorder_workspace(&self, old_index: usize, new_index: usize);
    fn focus_window(&self, window: WindowId);

    fn overview_visible(&self) -> bool;
    fn show_overview(&self);
    fn toggle_overview(&self);

    fn connect_window_added(&self, workspace: WorkspaceId) -> SignalId;
    fn connect_window_removed(&self, workspace: WorkspaceId) -> SignalId;
    /// Connects the attention-flag, focus and unmanage signals of one
    /// window as a single registration.
    fn connect_window_signals(&self, window: WindowId) -> SignalId;
    fn connect_scroll(&self, target: ScrollTarget) -> SignalId;
    fn disconnect(&self, signal: SignalId);
}

/// Typed key-value settings store owned by the host. Missing keys read as
/// the type's empty value.
pub trait SettingsStore {
    fn get_boolean(&self, key: &str) -> bool;
    fn set_boolean(&self, key: &str, value: bool);
    fn get_int(&self, key: &str) -> i64;
    fn set_int(&self, key: &str, value: i64);
    fn get_string(&self, key: &str) -> String;
    fn set_string(&self, key: &str, value: &str);
    fn get_string_array(&self, key: &str) -> Vec<String>;
    fn set_string_array(&self, key: &str, value: &[String]);
}

/// Global shortcut facility with add/remove-by-name semantics. Pressing a
/// registered binding is delivered as [`HostEvent::Keybinding`].
pub trait KeyBindingRegistrar {
    fn add_keybinding(&self, name: &str);
    fn remove_keybinding(&self, name: &str);
}
