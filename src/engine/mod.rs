//! Workspace reconciliation engine.
//!
//! The engine listens to host events and settings changes, and on every
//! relevant change recomputes the full list of [`WorkspaceState`]s from
//! scratch rather than patching it incrementally. Downstream consumers are
//! notified through a coalescing notifier, so bursts of host events cause
//! one refresh. The engine is also the command surface: navigation,
//! reordering and renaming all go through here and come back around as
//! host events.

pub mod attention;
pub mod names;


use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use strum_macros::Display;
use tracing::{debug, trace};

use crate::common::collections::HashSet;
use crate::common::settings::Settings;
use crate::engine::attention::AttentionTracker;
use crate::engine::names::WorkspaceNames;
use crate::host::{HostShell, SignalId, WindowFlags, WindowId, WorkspaceId};
use crate::runloop::RunLoop;
use crate::util::notifier::{DebouncingNotifier, SubscriberId};

/// Snapshot of one workspace slot, recomputed wholesale on every
/// reconciliation pass.
///
/// Slots beyond the live workspace count exist whenever the persisted name
/// sequence is longer than the workspace list; they carry `is_enabled:
/// false` and keep their name so a transient count fluctuation never
/// truncates names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceState {
    pub index: usize,
    pub is_enabled: bool,
    /// Whether the slot should render in the bar.
    pub is_visible: bool,
    pub has_windows: bool,
    pub has_attention: bool,
    /// Persisted name entry. `Some("")` is a placeholder kept for index
    /// alignment; `None` means the name sequence does not reach this slot.
    pub name: Option<String>,
}

impl WorkspaceState {
    /// The name, if present and non-empty.
    pub fn named(&self) -> Option<&str> {
        self.name.as_deref().filter(|name| !name.is_empty())
    }
}

/// The external cause of a reconciliation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum UpdateReason {
    Init,
    ActiveWorkspaceChanged,
    WorkspacesChanged,
    WorkspaceNamesChanged,
    WindowsChanged,
}

/// How a workspace switch to the already-current workspace was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SwitchCause {
    ClickOnLabel,
    KeyboardShortcut,
}

pub struct Workspaces {
    host: Rc<dyn HostShell>,
    settings: Rc<Settings>,
    names: WorkspaceNames,
    attention: AttentionTracker,

    workspaces: Vec<WorkspaceState>,
    current_index: usize,
    last_visible: usize,
    /// Live workspace count, shared with the name store.
    enabled_count: Rc<Cell<usize>>,
    /// Handles in their last observed order, for reorder detection.
    known_workspaces: Vec<WorkspaceId>,

    /// The workspace to return to with activate-previous.
    previous_workspace: usize,
    /// Debounced shadow of the current workspace, the candidate for the
    /// next "previous workspace". Briefly visited workspaces never make it
    /// in here.
    debounced_current: usize,

    /// One entry per live window-added/removed registration on a
    /// workspace. Only `update_window_listeners` mutates this.
    window_listeners: Vec<(WorkspaceId, SignalId)>,

    update_notifier: DebouncingNotifier<()>,
    /// Smart-name reevaluation is deferred so workspaces settling after
    /// empty-dynamic-workspace cleanup are not observed mid-flight.
    smart_names_notifier: DebouncingNotifier<()>,
    previous_notifier: DebouncingNotifier<usize>,

    teardown: Vec<Box<dyn FnOnce()>>,
}

impl Workspaces {
    pub fn new(
        host: Rc<dyn HostShell>,
        settings: Rc<Settings>,
        runloop: Rc<RunLoop>,
    ) -> Rc<RefCell<Self>> {
        let enabled_count = Rc::new(Cell::new(0));
        let names = WorkspaceNames::new(settings.clone(), host.clone(), enabled_count.clone());
        let this = Rc::new(RefCell::new(Workspaces {
            update_notifier: DebouncingNotifier::coalescing(&runloop),
            smart_names_notifier: DebouncingNotifier::coalescing(&runloop),
            previous_notifier: DebouncingNotifier::new(&runloop, Duration::from_millis(1000), true),
            host,
            settings,
            names,
            attention: AttentionTracker::new(),
            workspaces: Vec::new(),
            current_index: 0,
            last_visible: 0,
            enabled_count,
            known_workspaces: Vec::new(),
            previous_workspace: 0,
            debounced_current: 0,
            window_listeners: Vec::new(),
            teardown: Vec::new(),
        }));
        Self::init(&this);
        this
    }

    fn init(this: &Rc<RefCell<Self>>) {
        let weak = Rc::downgrade(this);
        {
            let engine = this.borrow();
            let w = weak.clone();
            engine.previous_notifier.subscribe(move |&index| {
                if let Some(this) = w.upgrade() {
                    this.borrow_mut().debounced_current = index;
                }
            });
            let w = weak.clone();
            engine.smart_names_notifier.subscribe(move |&()| {
                if let Some(this) = w.upgrade() {
                    this.borrow_mut().update_smart_names();
                }
            });
        }

        let settings = this.borrow().settings.clone();
        let mut teardown: Vec<Box<dyn FnOnce()>> = Vec::new();

        let w = weak.clone();
        let id = settings.dynamic_workspaces.subscribe(move |_| {
            if let Some(this) = w.upgrade() {
                this.borrow_mut()
                    .update(UpdateReason::WorkspacesChanged, "dynamic-workspaces setting");
            }
        });
        {
            let settings = settings.clone();
            teardown.push(Box::new(move || settings.dynamic_workspaces.unsubscribe(id)));
        }

        let w = weak.clone();
        let id = settings.workspace_names.subscribe(move |_| {
            if let Some(this) = w.upgrade() {
                this.borrow_mut()
                    .update(UpdateReason::WorkspaceNamesChanged, "workspace-names setting");
            }
        });
        {
            let settings = settings.clone();
            teardown.push(Box::new(move || settings.workspace_names.unsubscribe(id)));
        }

        let w = weak.clone();
        let id = settings.show_empty_workspaces.subscribe(move |_| {
            if let Some(this) = w.upgrade() {
                this.borrow_mut()
                    .update(UpdateReason::WorkspacesChanged, "show-empty-workspaces setting");
            }
        });
        {
            let settings = settings.clone();
            teardown.push(Box::new(move || settings.show_empty_workspaces.unsubscribe(id)));
        }

        this.borrow_mut().startup();

        let w = weak.clone();
        let id = settings.smart_workspace_names.subscribe_with_current(move |&enabled| {
            if enabled {
                if let Some(this) = w.upgrade() {
                    this.borrow().clear_empty_workspace_names();
                }
            }
        });
        {
            let settings = settings.clone();
            teardown.push(Box::new(move || settings.smart_workspace_names.unsubscribe(id)));
        }

        let w = weak.clone();
        let id = settings.smart_workspace_names.subscribe(move |_| {
            if let Some(this) = w.upgrade() {
                this.borrow_mut().update_window_listeners();
            }
        });
        {
            let settings = settings.clone();
            teardown.push(Box::new(move || settings.smart_workspace_names.unsubscribe(id)));
        }

        let w = weak;
        let id = settings.reevaluate_smart_workspace_names.subscribe(move |_| {
            if let Some(this) = w.upgrade() {
                this.borrow_mut().update_window_listeners();
            }
        });
        {
            let settings = settings.clone();
            teardown.push(Box::new(move || {
                settings.reevaluate_smart_workspace_names.unsubscribe(id)
            }));
        }

        this.borrow_mut().teardown = teardown;
    }

    fn startup(&mut self) {
        self.attention.snapshot_existing(self.host.as_ref());
        self.update(UpdateReason::Init, "init");
    }

    pub fn destroy(&mut self) {
        for teardown in self.teardown.drain(..) {
            teardown();
        }
        self.update_notifier.destroy();
        self.smart_names_notifier.destroy();
        self.previous_notifier.destroy();
        for (_, signal) in self.window_listeners.drain(..) {
            self.host.disconnect(signal);
        }
        self.attention.destroy(self.host.as_ref());
    }

    // Read surface.

    pub fn states(&self) -> &[WorkspaceState] {
        &self.workspaces
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn last_visible_workspace(&self) -> usize {
        self.last_visible
    }

    pub fn number_of_enabled_workspaces(&self) -> usize {
        self.enabled_count.get()
    }

    /// Registers a callback fired after every reconciliation pass,
    /// coalesced over one run-loop drain.
    pub fn on_update(&self, callback: impl Fn() + 'static) -> SubscriberId {
        self.update_notifier.subscribe(move |&()| callback())
    }

    pub fn off_update(&self, id: SubscriberId) {
        self.update_notifier.unsubscribe(id);
    }

    // Host event entry points.

    pub fn on_workspaces_changed(&mut self) {
        self.update(UpdateReason::WorkspacesChanged, "workspace count");
    }

    pub fn on_workspaces_reordered(&mut self) {
        self.update(UpdateReason::WorkspacesChanged, "workspace order");
    }

    pub fn on_active_workspace_changed(&mut self) {
        let previous = self.current_index;
        self.update(UpdateReason::ActiveWorkspaceChanged, "active workspace");
        self.previous_notifier.notify(self.current_index);
        // The next "previous workspace" is the debounced shadow, unless we
        // came back to it. Then the origin counts, however briefly it was
        // active.
        self.previous_workspace = if self.debounced_current != self.current_index {
            self.debounced_current
        } else {
            previous
        };
        self.handle_attention_on_activation();
        // Moving away from the last dynamic workspace can change names.
        self.smart_names_notifier.notify(());
    }

    pub fn on_tracked_windows_changed(&mut self) {
        self.update(UpdateReason::WindowsChanged, "tracked windows");
        self.smart_names_notifier.notify(());
    }

    /// The host inserts workspaces at arbitrary positions only under
    /// dynamic workspaces; otherwise the announcement is ignored.
    pub fn on_workspace_will_be_inserted(&mut self, index: usize) {
        if self.settings.dynamic_workspaces.get() {
            self.names.insert(index);
        }
    }

    pub fn on_window_added(&mut self, _workspace: WorkspaceId) {
        self.update(UpdateReason::WindowsChanged, "window added");
        self.update_smart_names();
    }

    pub fn on_window_removed(&mut self, _workspace: WorkspaceId) {
        self.update(UpdateReason::WindowsChanged, "window removed");
        self.update_smart_names();
    }

    pub fn on_window_attention(&mut self, window: WindowId) {
        if self.host.window_flags(window).wants_attention() {
            self.attention.note(self.host.as_ref(), window);
        } else {
            self.attention.detach(self.host.as_ref(), window);
        }
        self.update(UpdateReason::WindowsChanged, "window attention");
    }

    pub fn on_window_focused(&mut self, window: WindowId) {
        self.attention.detach(self.host.as_ref(), window);
        self.update(UpdateReason::WindowsChanged, "window focused");
    }

    pub fn on_window_unmanaged(&mut self, window: WindowId) {
        self.attention.detach(self.host.as_ref(), window);
        self.update(UpdateReason::WindowsChanged, "window unmanaged");
    }

    // Navigation and commands.

    /// Switches to `index` the way a direct user request does. Requests
    /// for the already-current workspace turn into back-and-forth
    /// navigation, window focus or an overview toggle depending on
    /// settings and cause.
    pub fn switch_to(&mut self, index: usize, cause: SwitchCause) {
        trace!(index, %cause, "switch requested");
        if index != self.current_index {
            self.activate(index);
            return;
        }
        if self.settings.back_and_forth.get() {
            self.activate_previous();
            return;
        }
        let focused_spans_all = self.host.focused_window().is_some_and(|window| {
            self.host
                .window_flags(window)
                .contains(WindowFlags::ON_ALL_WORKSPACES)
        });
        if cause == SwitchCause::KeyboardShortcut
            && self.workspaces.get(index).is_some_and(|w| w.has_windows)
            && focused_spans_all
        {
            self.focus_most_recent_window_on(index);
        } else if self.settings.toggle_overview.get() {
            self.host.toggle_overview();
        }
    }

    /// Activates `index` and focuses its most recent window. Shows the
    /// overview on an empty target when configured. Unknown indices and
    /// the current workspace are no-ops.
    pub fn activate(&mut self, index: usize) {
        if index == self.current_index || self.host.workspace_at(index).is_none() {
            return;
        }
        self.host.activate_workspace(index);
        self.focus_most_recent_window_on(index);
        if !self.host.overview_visible()
            && self.workspaces.get(index).is_some_and(|w| !w.has_windows)
            && self.settings.overview_on_empty_workspace.get()
        {
            self.host.show_overview();
        }
    }

    /// Activation variant for scroll navigation: no overview handling.
    pub fn activate_and_focus(&mut self, index: usize) {
        if self.host.workspace_at(index).is_none() {
            return;
        }
        self.host.activate_workspace(index);
        self.focus_most_recent_window_on(index);
    }

    /// Activates the previously active workspace. The workspace activated
    /// by this call becomes the next "previous workspace" even if active
    /// only briefly.
    pub fn activate_previous(&mut self) {
        let previous = self.previous_workspace;
        self.debounced_current = previous;
        self.activate(previous);
    }

    pub fn add_workspace(&mut self) {
        if self.settings.dynamic_workspaces.get() {
            self.activate(self.enabled_count.get().saturating_sub(1));
        } else {
            self.host.append_workspace();
        }
    }

    pub fn activate_empty_or_add(&mut self) {
        let empty = self
            .workspaces
            .iter()
            .find(|w| w.is_enabled && !w.has_windows)
            .map(|w| w.index);
        match empty {
            Some(index) => self.activate(index),
            None => self.host.append_workspace(),
        }
    }

    pub fn remove_workspace(&mut self, index: usize) {
        self.host.remove_workspace(index);
    }

    pub fn reorder_workspace(&mut self, old_index: usize, new_index: usize) {
        self.host.reorder_workspace(old_index, new_index);
    }

    /// Moves the current workspace one position if the destination is in
    /// range.
    pub fn move_current_workspace(&mut self, direction: isize) {
        let target = self.current_index as isize + direction;
        if target >= 0 && (target as usize) < self.enabled_count.get() {
            self.reorder_workspace(self.current_index, target as usize);
        }
    }

    pub fn rename_workspace(&self, index: usize, name: &str) {
        self.names.rename(index, name);
    }

    /// Walks from the current workspace by `step`, skipping non-visible
    /// slots. Returns `None` when no other visible workspace exists in
    /// that direction; with wraparound, also when the walk would revisit
    /// the start.
    pub fn find_visible_workspace(&self, step: isize, wraparound: bool) -> Option<usize> {
        let count = self.enabled_count.get() as isize;
        if count == 0 {
            return None;
        }
        let start = self.current_index as isize;
        let mut index = start;
        loop {
            index += step;
            if index < 0 || index >= count {
                if !wraparound {
                    return None;
                }
                index = index.rem_euclid(count);
            }
            if index == start {
                return None;
            }
            if self.workspaces.get(index as usize).is_some_and(|w| w.is_visible) {
                return Some(index as usize);
            }
        }
    }

    /// Under dynamic workspaces, whether `workspace` is the trailing spare
    /// that is currently neither used nor focused.
    pub fn is_extra_dynamic_workspace(&self, workspace: &WorkspaceState) -> bool {
        self.settings.dynamic_workspaces.get()
            && workspace.index > 0
            && workspace.index == self.enabled_count.get().saturating_sub(1)
            && !workspace.has_windows
            && self.current_index != workspace.index
    }

    // Display names.

    pub fn display_name(&self, workspace: &WorkspaceState) -> String {
        if self.is_extra_dynamic_workspace(workspace) {
            return "+".to_string();
        }
        if self.settings.enable_custom_label.get() {
            self.custom_display_name(workspace)
        } else {
            self.default_display_name(workspace)
        }
    }

    pub fn default_display_name(&self, workspace: &WorkspaceState) -> String {
        let number = (workspace.index + 1).to_string();
        match workspace.named() {
            Some(name) if !self.settings.always_show_numbers.get() => name.to_string(),
            Some(name) => format!("{number}: {name}"),
            None => number,
        }
    }

    fn custom_display_name(&self, workspace: &WorkspaceState) -> String {
        let named = workspace.named();
        let template = if named.is_some() {
            self.settings.custom_label_named.get()
        } else {
            self.settings.custom_label_unnamed.get()
        };
        let enabled = self.enabled_count.get();
        // {{total}} excludes an unused trailing spare; {{Total}} never does.
        let total = if self.settings.dynamic_workspaces.get()
            && self.current_index != enabled.saturating_sub(1)
        {
            enabled.saturating_sub(1)
        } else {
            enabled
        };
        let number = (workspace.index + 1).to_string();
        let label = template
            .replace("{{name}}", named.unwrap_or(""))
            .replace("{{number}}", &number)
            .replace("{{total}}", &total.to_string())
            .replace("{{Total}}", &enabled.to_string());
        if self.settings.always_show_numbers.get() && !template.contains("{{number}}") {
            format!("{number}: {label}")
        } else {
            label
        }
    }

    /// Focuses the most recent window on workspace `index`, preferring
    /// attached-dialog owners over the dialogs themselves and skipping
    /// windows that live on all workspaces.
    pub fn focus_most_recent_window_on(&self, index: usize) {
        let Some(workspace) = self.host.workspace_at(index) else {
            return;
        };
        let mut seen = HashSet::default();
        let target = self
            .host
            .windows_mru(workspace)
            .into_iter()
            .map(|window| self.host.dialog_owner(window).unwrap_or(window))
            .filter(|&window| seen.insert(window))
            .filter(|&window| {
                !self.host.window_flags(window).contains(WindowFlags::SKIP_TASKBAR)
            })
            .find(|&window| {
                !self.host.window_flags(window).contains(WindowFlags::ON_ALL_WORKSPACES)
            });
        if let Some(window) = target {
            self.host.focus_window(window);
        }
    }

    // Reconciliation.

    fn update(&mut self, reason: UpdateReason, source: &str) {
        debug!(%reason, source, "reconciling workspace state");
        self.attention.sweep_stale(self.host.as_ref());
        let count = self.host.workspace_count();
        self.enabled_count.set(count);
        self.current_index = self.host.active_workspace_index();
        let dynamic = self.settings.dynamic_workspaces.get();
        let show_empty = self.settings.show_empty_workspaces.get();
        // The trailing spare is hidden unless it is current or empty
        // workspaces are shown anyway.
        self.last_visible = if dynamic && !show_empty && self.current_index != count.saturating_sub(1)
        {
            count.saturating_sub(2)
        } else {
            count.saturating_sub(1)
        };
        let names = self.settings.workspace_names.get();
        let tracked = count.max(names.len());
        let states: Vec<WorkspaceState> = (0..tracked)
            .map(|index| self.workspace_state(index, &names))
            .collect();
        self.workspaces = states;
        self.update_notifier.notify(());

        if matches!(reason, UpdateReason::WorkspacesChanged | UpdateReason::Init) {
            self.detect_reorder();
        }
        if matches!(
            reason,
            UpdateReason::WorkspacesChanged
                | UpdateReason::WorkspaceNamesChanged
                | UpdateReason::Init
        ) {
            self.update_window_listeners();
        }
    }

    fn workspace_state(&self, index: usize, names: &[String]) -> WorkspaceState {
        let name = names.get(index).cloned();
        if index >= self.enabled_count.get() {
            return WorkspaceState {
                index,
                is_enabled: false,
                is_visible: false,
                has_windows: false,
                has_attention: false,
                name,
            };
        }
        let has_windows = self.host.workspace_at(index).is_some_and(|workspace| {
            self.host
                .windows_on(workspace)
                .into_iter()
                .any(|window| self.host.window_flags(window).occupies_workspace())
        });
        let has_attention = index != self.current_index
            && self.settings.attention_indicator.get()
            && self.host.workspace_at(index).is_some_and(|workspace| {
                self.host.windows_on(workspace).into_iter().any(|window| {
                    let flags = self.host.window_flags(window);
                    flags.occupies_workspace()
                        && flags.wants_attention()
                        && !self.attention.is_acknowledged(window)
                })
            });
        WorkspaceState {
            index,
            is_enabled: true,
            is_visible: has_windows || self.empty_but_visible(index),
            has_windows,
            has_attention,
            name,
        }
    }

    /// Visibility of an enabled workspace without windows.
    fn empty_but_visible(&self, index: usize) -> bool {
        if index == self.current_index {
            true
        } else if self.settings.dynamic_workspaces.get()
            && !self.settings.show_empty_workspaces.get()
        {
            false
        } else {
            self.settings.show_empty_workspaces.get()
        }
    }

    /// Matches live handles against their last observed order and adapts
    /// names when positions changed. Always re-records the handle list.
    fn detect_reorder(&mut self) {
        let current: Vec<WorkspaceId> = (0..self.enabled_count.get())
            .filter_map(|index| self.host.workspace_at(index))
            .collect();
        let mut moved = false;
        let map: Vec<Option<usize>> = current
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let old = self.known_workspaces.iter().position(|known| known == id);
                if old.is_some_and(|old| old != index) {
                    moved = true;
                }
                old
            })
            .collect();
        if moved {
            debug!(?map, "live workspaces were reordered");
            self.names.reorder(&map);
        }
        self.known_workspaces = current;
    }

    /// Diffs the wanted window-added/removed registrations against the
    /// held ones. This is the only place that mutates the listener list,
    /// so repeated passes never leak connections.
    fn update_window_listeners(&mut self) {
        let smart = self.settings.smart_workspace_names.get();
        let reevaluate = self.settings.reevaluate_smart_workspace_names.get();
        if smart {
            for state in &self.workspaces {
                if !state.is_enabled || (state.named().is_some() && !reevaluate) {
                    continue;
                }
                let Some(workspace) = self.host.workspace_at(state.index) else {
                    continue;
                };
                if self.window_listeners.iter().any(|(w, _)| *w == workspace) {
                    continue;
                }
                self.window_listeners
                    .push((workspace, self.host.connect_window_added(workspace)));
                if reevaluate {
                    self.window_listeners
                        .push((workspace, self.host.connect_window_removed(workspace)));
                }
            }
        }
        let listeners = std::mem::take(&mut self.window_listeners);
        let mut kept = Vec::with_capacity(listeners.len());
        for (workspace, signal) in listeners {
            if smart && self.listener_still_wanted(workspace, reevaluate) {
                kept.push((workspace, signal));
            } else {
                self.host.disconnect(signal);
            }
        }
        self.window_listeners = kept;
    }

    fn listener_still_wanted(&self, workspace: WorkspaceId, reevaluate: bool) -> bool {
        let Some(index) = self.host.workspace_index(workspace) else {
            return false;
        };
        let Some(state) = self.workspaces.get(index) else {
            return false;
        };
        state.is_enabled && !(state.named().is_some() && !reevaluate)
    }

    fn update_smart_names(&mut self) {
        if !self.settings.smart_workspace_names.get() {
            return;
        }
        let reevaluate = self.settings.reevaluate_smart_workspace_names.get();
        for i in 0..self.workspaces.len() {
            if reevaluate {
                if let Some(name) = self.workspaces[i].named().map(str::to_string) {
                    if !self.names.name_backed_by_windows(self.workspaces[i].index, &name) {
                        self.names.rename(self.workspaces[i].index, "");
                        self.workspaces[i].name = Some(String::new());
                    }
                }
            }
            let state = &self.workspaces[i];
            if state.has_windows && state.named().is_none() {
                self.names.restore_smart_name(state.index);
            }
            if self.is_extra_dynamic_workspace(state) {
                self.names.remove(state.index);
            }
        }
    }

    /// Run when smart naming is switched on: disabled and spare slots lose
    /// their name entry entirely, empty enabled workspaces keep a blank
    /// placeholder so later names stay aligned. Removals run back to
    /// front so earlier indices stay valid.
    fn clear_empty_workspace_names(&self) {
        for state in self.workspaces.iter().rev() {
            if (!state.is_enabled || self.is_extra_dynamic_workspace(state)) && state.name.is_some()
            {
                self.names.remove(state.index);
            } else if !state.has_windows && state.named().is_some() {
                self.names.rename(state.index, "");
            }
        }
    }

    /// On arrival at a workspace with pending attention: optionally focus
    /// the first flagged window. A sticky urgency flag is acknowledged so
    /// it does not retrigger while still set.
    fn handle_attention_on_activation(&mut self) {
        if !self.settings.attention_indicator.get() {
            return;
        }
        let Some(workspace) = self.host.workspace_at(self.current_index) else {
            return;
        };
        let target = self.host.windows_on(workspace).into_iter().find(|&window| {
            let flags = self.host.window_flags(window);
            flags.occupies_workspace()
                && flags.wants_attention()
                && !self.attention.is_acknowledged(window)
        });
        let Some(window) = target else {
            return;
        };
        if self.settings.attention_auto_focus.get() {
            self.host.focus_window(window);
            if self.host.window_flags(window).contains(WindowFlags::URGENT) {
                self.attention.acknowledge(window);
            }
        }
    }
}
