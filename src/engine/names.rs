//! Persisted workspace name sequence and smart-name associations.
//!
//! The name sequence lives in the settings store, one entry per workspace
//! index. Entries may be empty, meaning "no name", but are kept as
//! placeholders so later names stay aligned; trailing empty entries are
//! trimmed on every write. This type is the sole writer of the
//! `workspace-names` and `workspace-names-map` keys.

use std::cell::Cell;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::common::settings::Settings;
use crate::host::HostShell;

pub struct WorkspaceNames {
    settings: Rc<Settings>,
    host: Rc<dyn HostShell>,
    /// Number of live workspaces, kept current by the reconciliation pass.
    enabled_workspaces: Rc<Cell<usize>>,
}

impl WorkspaceNames {
    pub fn new(
        settings: Rc<Settings>,
        host: Rc<dyn HostShell>,
        enabled_workspaces: Rc<Cell<usize>>,
    ) -> Self {
        WorkspaceNames {
            settings,
            host,
            enabled_workspaces,
        }
    }

    /// Shifts all names at or after `index` one position later, making room
    /// for a workspace inserted at that position.
    pub fn insert(&self, index: usize) {
        let mut names = self.names();
        if index < names.len() {
            names.insert(index, String::new());
        } else {
            set_array_value(&mut names, index, String::new());
        }
        self.set_names(names);
    }

    /// Deletes the name at `index`, shifting later names earlier.
    pub fn remove(&self, index: usize) {
        let mut names = self.names();
        if index < names.len() {
            names.remove(index);
        }
        self.set_names(names);
    }

    /// Rebuilds the name sequence according to `map`, where
    /// `map[new_index]` is the old index of the workspace now at
    /// `new_index`, or `None` for a workspace with no prior name.
    pub fn reorder(&self, map: &[Option<usize>]) {
        let old_names = self.names();
        let new_names = map
            .iter()
            .map(|old_index| {
                old_index
                    .and_then(|old| old_names.get(old).cloned())
                    .unwrap_or_default()
            })
            .collect();
        debug!(?map, "reordering workspace names");
        self.set_names(new_names);
    }

    /// Sets the name at `index`, padding with empty entries as needed. If
    /// smart naming is active and the name is non-empty, the applications
    /// on that workspace are associated with it.
    pub fn rename(&self, index: usize, new_name: &str) {
        let mut names = self.names();
        set_array_value(&mut names, index, new_name.to_string());
        self.set_names(names);
        if self.settings.smart_workspace_names.get() && !new_name.is_empty() {
            self.save_association(index, new_name);
        }
    }

    /// Assigns a previously-associated name to workspace `index`, picking
    /// the first candidate not already used by another enabled workspace.
    /// No-op when no candidate is found.
    pub fn restore_smart_name(&self, index: usize) {
        let map = self.settings.workspace_names_map_now();
        let in_use = self.enabled_names();
        for app_id in self.app_ids_on(index) {
            let Some(candidates) = map.get(&app_id).filter(|list| !list.is_empty()) else {
                continue;
            };
            if let Some(name) = candidates.iter().find(|name| !in_use.contains(name)) {
                trace!(index, name, app = %app_id, "restoring smart workspace name");
                let mut names = self.names();
                set_array_value(&mut names, index, name.clone());
                self.set_names(names);
                return;
            }
        }
    }

    /// Whether the name at `index` is still supported by an application on
    /// that workspace, i.e. some window's association list contains it.
    pub fn name_backed_by_windows(&self, index: usize, name: &str) -> bool {
        let map = self.settings.workspace_names_map_now();
        self.app_ids_on(index).iter().any(|app_id| {
            map.get(app_id).is_some_and(|list| list.iter().any(|n| n == name))
        })
    }

    /// Appends `new_name` to the association list of every application on
    /// workspace `index`. Stale entries, names no longer used by any
    /// enabled workspace, are garbage-collected lazily on this path.
    fn save_association(&self, index: usize, new_name: &str) {
        let mut map = self.settings.workspace_names_map_now();
        let in_use = self.enabled_names();
        for app_id in self.app_ids_on(index) {
            let list = map.entry(app_id).or_default();
            list.retain(|name| name != new_name && in_use.contains(name));
            list.push(new_name.to_string());
        }
        self.settings.set_workspace_names_map(&map);
    }

    /// Application identifiers of the windows on workspace `index`,
    /// excluding windows that live on all workspaces.
    fn app_ids_on(&self, index: usize) -> Vec<String> {
        let Some(workspace) = self.host.workspace_at(index) else {
            return Vec::new();
        };
        self.host
            .windows_on(workspace)
            .into_iter()
            .filter(|&window| {
                !self
                    .host
                    .window_flags(window)
                    .contains(crate::host::WindowFlags::ON_ALL_WORKSPACES)
            })
            .filter_map(|window| self.host.window_app_id(window))
            .collect()
    }

    fn names(&self) -> Vec<String> {
        self.settings.workspace_names_now()
    }

    fn set_names(&self, mut names: Vec<String>) {
        while names.last().is_some_and(|name| name.is_empty()) {
            names.pop();
        }
        self.settings.set_workspace_names(&names);
    }

    /// Names currently backing an enabled workspace.
    fn enabled_names(&self) -> Vec<String> {
        let mut names = self.names();
        names.truncate(self.enabled_workspaces.get());
        names
    }
}

/// Sets `array[index]`, padding any missing entries with empty strings.
fn set_array_value(array: &mut Vec<String>, index: usize, value: String) {
    while array.len() < index {
        array.push(String::new());
    }
    if index < array.len() {
        array[index] = value;
    } else {
        array.push(value);
    }
}
