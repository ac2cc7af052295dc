//! Shared test doubles for the host boundary.
//!
//! [`FakeShell`] keeps a real workspace/window model behind the
//! [`HostShell`] trait: commands mutate the model immediately and are also
//! recorded as [`ShellOp`]s so tests can assert on both the resulting
//! state and the exact command stream.

use std::cell::RefCell;

use slotmap::SlotMap;

use crate::common::collections::HashMap;
use crate::host::{
    HostShell, KeyBindingRegistrar, ScrollTarget, SettingsStore, SignalId, WindowFlags,
    WindowId, WorkspaceId,
};

/// A command issued against the shell, in issue order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellOp {
    ActivateWorkspace(usize),
    AppendWorkspace,
    RemoveWorkspace(usize),
    ReorderWorkspace(usize, usize),
    FocusWindow(WindowId),
    ShowOverview,
    ToggleOverview,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    WindowAdded(WorkspaceId),
    WindowRemoved(WorkspaceId),
    WindowSignals(WindowId),
    Scroll(ScrollTarget),
}

#[derive(Debug, Clone)]
struct FakeWindow {
    workspace: WorkspaceId,
    flags: WindowFlags,
    app_id: Option<String>,
    dialog_owner: Option<WindowId>,
}

#[derive(Default)]
struct ShellState {
    order: Vec<WorkspaceId>,
    workspaces: SlotMap<WorkspaceId, ()>,
    windows: SlotMap<WindowId, FakeWindow>,
    /// Global most-recently-used order, front is most recent.
    mru: Vec<WindowId>,
    active: usize,
    focused: Option<WindowId>,
    overview: bool,
    next_signal: u64,
    connections: HashMap<SignalId, Connection>,
    ops: Vec<ShellOp>,
}

#[derive(Default)]
pub struct FakeShell {
    state: RefCell<ShellState>,
}

impl FakeShell {
    pub fn new() -> Self {
        FakeShell::default()
    }

    pub fn add_workspaces(&self, count: usize) {
        let mut state = self.state.borrow_mut();
        for _ in 0..count {
            let id = state.workspaces.insert(());
            state.order.push(id);
        }
    }

    /// Removes the workspace at `index` along with its windows, without
    /// recording a command.
    pub fn drop_workspace(&self, index: usize) {
        let mut state = self.state.borrow_mut();
        let id = state.order.remove(index);
        state.workspaces.remove(id);
        let doomed: Vec<WindowId> = state
            .windows
            .iter()
            .filter(|(_, w)| w.workspace == id)
            .map(|(k, _)| k)
            .collect();
        for window in doomed {
            state.windows.remove(window);
            state.mru.retain(|&w| w != window);
        }
        if state.active >= state.order.len() && state.active > 0 {
            state.active = state.order.len() - 1;
        }
    }

    pub fn add_window(
        &self,
        workspace_index: usize,
        app_id: Option<&str>,
        flags: WindowFlags,
    ) -> WindowId {
        let mut state = self.state.borrow_mut();
        let workspace = state.order[workspace_index];
        let id = state.windows.insert(FakeWindow {
            workspace,
            flags,
            app_id: app_id.map(str::to_string),
            dialog_owner: None,
        });
        state.mru.push(id);
        id
    }

    pub fn remove_window(&self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        state.windows.remove(window);
        state.mru.retain(|&w| w != window);
        if state.focused == Some(window) {
            state.focused = None;
        }
    }

    pub fn set_flags(&self, window: WindowId, flags: WindowFlags) {
        self.state.borrow_mut().windows[window].flags = flags;
    }

    pub fn set_dialog_owner(&self, dialog: WindowId, owner: WindowId) {
        self.state.borrow_mut().windows[dialog].dialog_owner = Some(owner);
    }

    pub fn set_active(&self, index: usize) {
        self.state.borrow_mut().active = index;
    }

    /// Moves `window` to the front of the MRU order and focuses it,
    /// without recording a command.
    pub fn raise(&self, window: WindowId) {
        let mut state = self.state.borrow_mut();
        state.mru.retain(|&w| w != window);
        state.mru.insert(0, window);
        state.focused = Some(window);
    }

    pub fn set_overview(&self, visible: bool) {
        self.state.borrow_mut().overview = visible;
    }

    pub fn connection_count(&self) -> usize {
        self.state.borrow().connections.len()
    }

    pub fn connections(&self) -> Vec<Connection> {
        self.state.borrow().connections.values().cloned().collect()
    }

    pub fn ops(&self) -> Vec<ShellOp> {
        self.state.borrow().ops.clone()
    }

    pub fn clear_ops(&self) {
        self.state.borrow_mut().ops.clear();
    }

    fn connect(&self, connection: Connection) -> SignalId {
        let mut state = self.state.borrow_mut();
        state.next_signal += 1;
        let id = SignalId(state.next_signal);
        state.connections.insert(id, connection);
        id
    }

    fn record(&self, op: ShellOp) {
        self.state.borrow_mut().ops.push(op);
    }
}

impl HostShell for FakeShell {
    fn workspace_count(&self) -> usize {
        self.state.borrow().order.len()
    }

    fn active_workspace_index(&self) -> usize {
        self.state.borrow().active
    }

    fn workspace_at(&self, index: usize) -> Option<WorkspaceId> {
        self.state.borrow().order.get(index).copied()
    }

    fn workspace_index(&self, workspace: WorkspaceId) -> Option<usize> {
        self.state.borrow().order.iter().position(|&w| w == workspace)
    }

    fn windows_on(&self, workspace: WorkspaceId) -> Vec<WindowId> {
        let state = self.state.borrow();
        state
            .windows
            .iter()
            .filter(|(_, w)| w.workspace == workspace)
            .map(|(k, _)| k)
            .collect()
    }

    fn windows_mru(&self, workspace: WorkspaceId) -> Vec<WindowId> {
        let state = self.state.borrow();
        state
            .mru
            .iter()
            .copied()
            .filter(|&w| state.windows.get(w).is_some_and(|win| win.workspace == workspace))
            .collect()
    }

    fn all_windows(&self) -> Vec<WindowId> {
        self.state.borrow().windows.keys().collect()
    }

    fn window_flags(&self, window: WindowId) -> WindowFlags {
        self.state
            .borrow()
            .windows
            .get(window)
            .map(|w| w.flags)
            .unwrap_or_default()
    }

    fn window_app_id(&self, window: WindowId) -> Option<String> {
        self.state.borrow().windows.get(window).and_then(|w| w.app_id.clone())
    }

    fn dialog_owner(&self, window: WindowId) -> Option<WindowId> {
        self.state.borrow().windows.get(window).and_then(|w| w.dialog_owner)
    }

    fn focused_window(&self) -> Option<WindowId> {
        self.state.borrow().focused
    }

    fn activate_workspace(&self, index: usize) {
        {
            let mut state = self.state.borrow_mut();
            if index < state.order.len() {
                state.active = index;
            }
        }
        self.record(ShellOp::ActivateWorkspace(index));
    }

    fn append_workspace(&self) {
        {
            let mut state = self.state.borrow_mut();
            let id = state.workspaces.insert(());
            state.order.push(id);
            state.active = state.order.len() - 1;
        }
        self.record(ShellOp::AppendWorkspace);
    }

    fn remove_workspace(&self, index: usize) {
        self.record(ShellOp::RemoveWorkspace(index));
        if index < self.state.borrow().order.len() {
            self.drop_workspace(index);
        }
    }

    fn reorder_workspace(&self, old_index: usize, new_index: usize) {
        {
            let mut state = self.state.borrow_mut();
            if old_index < state.order.len() && new_index < state.order.len() {
                let id = state.order.remove(old_index);
                state.order.insert(new_index, id);
            }
        }
        self.record(ShellOp::ReorderWorkspace(old_index, new_index));
    }

    fn focus_window(&self, window: WindowId) {
        {
            let mut state = self.state.borrow_mut();
            if state.windows.contains_key(window) {
                state.mru.retain(|&w| w != window);
                state.mru.insert(0, window);
                state.focused = Some(window);
            }
        }
        self.record(ShellOp::FocusWindow(window));
    }

    fn overview_visible(&self) -> bool {
        self.state.borrow().overview
    }

    fn show_overview(&self) {
        self.state.borrow_mut().overview = true;
        self.record(ShellOp::ShowOverview);
    }

    fn toggle_overview(&self) {
        {
            let mut state = self.state.borrow_mut();
            state.overview = !state.overview;
        }
        self.record(ShellOp::ToggleOverview);
    }

    fn connect_window_added(&self, workspace: WorkspaceId) -> SignalId {
        self.connect(Connection::WindowAdded(workspace))
    }

    fn connect_window_removed(&self, workspace: WorkspaceId) -> SignalId {
        self.connect(Connection::WindowRemoved(workspace))
    }

    fn connect_window_signals(&self, window: WindowId) -> SignalId {
        self.connect(Connection::WindowSignals(window))
    }

    fn connect_scroll(&self, target: ScrollTarget) -> SignalId {
        self.connect(Connection::Scroll(target))
    }

    fn disconnect(&self, signal: SignalId) {
        self.state.borrow_mut().connections.remove(&signal);
    }
}

#[derive(Debug, Clone)]
enum StoreValue {
    Boolean(bool),
    Int(i64),
    Str(String),
    StrArray(Vec<String>),
}

/// In-memory [`SettingsStore`]. Missing or type-mismatched keys read as
/// the requested type's empty value, matching the host contract.
#[derive(Default)]
pub struct FakeStore {
    values: RefCell<HashMap<String, StoreValue>>,
}

impl FakeStore {
    pub fn new() -> Self {
        FakeStore::default()
    }
}

impl SettingsStore for FakeStore {
    fn get_boolean(&self, key: &str) -> bool {
        match self.values.borrow().get(key) {
            Some(StoreValue::Boolean(value)) => *value,
            _ => false,
        }
    }

    fn set_boolean(&self, key: &str, value: bool) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), StoreValue::Boolean(value));
    }

    fn get_int(&self, key: &str) -> i64 {
        match self.values.borrow().get(key) {
            Some(StoreValue::Int(value)) => *value,
            _ => 0,
        }
    }

    fn set_int(&self, key: &str, value: i64) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), StoreValue::Int(value));
    }

    fn get_string(&self, key: &str) -> String {
        match self.values.borrow().get(key) {
            Some(StoreValue::Str(value)) => value.clone(),
            _ => String::new(),
        }
    }

    fn set_string(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), StoreValue::Str(value.to_string()));
    }

    fn get_string_array(&self, key: &str) -> Vec<String> {
        match self.values.borrow().get(key) {
            Some(StoreValue::StrArray(value)) => value.clone(),
            _ => Vec::new(),
        }
    }

    fn set_string_array(&self, key: &str, value: &[String]) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), StoreValue::StrArray(value.to_vec()));
    }
}

/// Records registered binding names.
#[derive(Default)]
pub struct FakeRegistrar {
    names: RefCell<Vec<String>>,
}

impl FakeRegistrar {
    pub fn new() -> Self {
        FakeRegistrar::default()
    }

    pub fn registered(&self) -> Vec<String> {
        let mut names = self.names.borrow().clone();
        names.sort();
        names
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.names.borrow().iter().any(|n| n == name)
    }
}

impl KeyBindingRegistrar for FakeRegistrar {
    fn add_keybinding(&self, name: &str) {
        let mut names = self.names.borrow_mut();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }

    fn remove_keybinding(&self, name: &str) {
        self.names.borrow_mut().retain(|n| n != name);
    }
}
