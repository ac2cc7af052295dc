//! Top-level assembly wiring the engine, settings and input handlers to a
//! host shell.
//!
//! The renderer owns one [`Indicator`], forwards every [`HostEvent`] into
//! [`Indicator::handle_event`], and redraws from [`workspace_states`] when
//! the update callback fires. Everything runs on the host's single thread.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::common::settings::Settings;
use crate::engine::{SwitchCause, WorkspaceState, Workspaces};
use crate::host::{HostEvent, HostShell, KeyBindingRegistrar, SettingsStore};
use crate::input::keybindings::KeyBindings;
use crate::input::scroll::ScrollHandler;
use crate::runloop::RunLoop;
use crate::util::notifier::SubscriberId;

pub struct Indicator {
    settings: Rc<Settings>,
    engine: Rc<RefCell<Workspaces>>,
    scroll: Rc<ScrollHandler>,
    keybindings: Rc<KeyBindings>,
}

impl Indicator {
    pub fn new(
        host: Rc<dyn HostShell>,
        store: Rc<dyn SettingsStore>,
        registrar: Rc<dyn KeyBindingRegistrar>,
        runloop: Rc<RunLoop>,
    ) -> Self {
        let settings = Settings::new(store, runloop.clone());
        let engine = Workspaces::new(host.clone(), settings.clone(), runloop.clone());
        let scroll = ScrollHandler::new(host, settings.clone(), runloop, engine.clone());
        let keybindings = KeyBindings::new(registrar, settings.clone(), engine.clone());
        info!("indicator initialized");
        Indicator {
            settings,
            engine,
            scroll,
            keybindings,
        }
    }

    pub fn destroy(&self) {
        self.keybindings.destroy();
        self.scroll.destroy();
        self.engine.borrow_mut().destroy();
    }

    /// Routes one host event to its handler. Returns `true` when the event
    /// was consumed, which for scroll events means the host should not
    /// propagate it further.
    pub fn handle_event(&self, event: HostEvent) -> bool {
        match event {
            HostEvent::WorkspacesChanged => self.engine.borrow_mut().on_workspaces_changed(),
            HostEvent::WorkspacesReordered => self.engine.borrow_mut().on_workspaces_reordered(),
            HostEvent::ActiveWorkspaceChanged => {
                self.engine.borrow_mut().on_active_workspace_changed()
            }
            HostEvent::TrackedWindowsChanged => {
                self.engine.borrow_mut().on_tracked_windows_changed()
            }
            HostEvent::WorkspaceWillBeInserted { index } => {
                self.engine.borrow_mut().on_workspace_will_be_inserted(index)
            }
            HostEvent::WindowAdded { workspace } => {
                self.engine.borrow_mut().on_window_added(workspace)
            }
            HostEvent::WindowRemoved { workspace } => {
                self.engine.borrow_mut().on_window_removed(workspace)
            }
            HostEvent::WindowDemandsAttention { window }
            | HostEvent::WindowMarkedUrgent { window }
            | HostEvent::WindowAttentionChanged { window } => {
                self.engine.borrow_mut().on_window_attention(window)
            }
            HostEvent::WindowFocused { window } => {
                self.engine.borrow_mut().on_window_focused(window)
            }
            HostEvent::WindowUnmanaged { window } => {
                self.engine.borrow_mut().on_window_unmanaged(window)
            }
            HostEvent::Scroll { direction } => return self.scroll.handle_scroll(direction),
            HostEvent::Keybinding { name } => return self.keybindings.handle_action(&name),
            HostEvent::SettingChanged { key } => self.settings.setting_changed(&key),
        }
        true
    }

    pub fn settings(&self) -> &Rc<Settings> {
        &self.settings
    }

    /// Registers a redraw callback, fired once per coalesced batch of
    /// state changes.
    pub fn on_update(&self, callback: impl Fn() + 'static) -> SubscriberId {
        self.engine.borrow().on_update(callback)
    }

    /// Detaches a redraw callback registered with
    /// [`on_update`](Self::on_update).
    pub fn off_update(&self, id: SubscriberId) {
        self.engine.borrow().off_update(id);
    }

    pub fn workspace_states(&self) -> Vec<WorkspaceState> {
        self.engine.borrow().states().to_vec()
    }

    pub fn current_index(&self) -> usize {
        self.engine.borrow().current_index()
    }

    pub fn last_visible_workspace(&self) -> usize {
        self.engine.borrow().last_visible_workspace()
    }

    /// The label text for one workspace state.
    pub fn display_name(&self, workspace: &WorkspaceState) -> String {
        self.engine.borrow().display_name(workspace)
    }

    pub fn switch_to(&self, index: usize, cause: SwitchCause) {
        self.engine.borrow_mut().switch_to(index, cause);
    }

    pub fn add_workspace(&self) {
        self.engine.borrow_mut().add_workspace();
    }

    pub fn remove_workspace(&self, index: usize) {
        self.engine.borrow_mut().remove_workspace(index);
    }

    pub fn reorder_workspace(&self, old_index: usize, new_index: usize) {
        self.engine.borrow_mut().reorder_workspace(old_index, new_index);
    }

    pub fn rename_workspace(&self, index: usize, name: &str) {
        self.engine.borrow().rename_workspace(index, name);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use pretty_assertions::assert_eq;

    use super::Indicator;
    use crate::common::settings::keys;
    use crate::engine::SwitchCause;
    use crate::host::{HostEvent, HostShell, ScrollDirection, SettingsStore, WindowFlags};
    use crate::runloop::RunLoop;
    use crate::testing::{FakeRegistrar, FakeShell, FakeStore, ShellOp};

    struct Fixture {
        runloop: Rc<RunLoop>,
        store: Rc<FakeStore>,
        shell: Rc<FakeShell>,
        registrar: Rc<FakeRegistrar>,
        indicator: Indicator,
    }

    fn fixture(workspaces: usize, configure: impl FnOnce(&FakeStore)) -> Fixture {
        let runloop = RunLoop::new();
        let store = Rc::new(FakeStore::new());
        store.set_boolean(keys::SHOW_EMPTY_WORKSPACES, true);
        configure(&store);
        let shell = Rc::new(FakeShell::new());
        shell.add_workspaces(workspaces);
        let registrar = Rc::new(FakeRegistrar::new());
        let indicator = Indicator::new(
            shell.clone(),
            store.clone(),
            registrar.clone(),
            runloop.clone(),
        );
        runloop.drain();
        shell.clear_ops();
        Fixture {
            runloop,
            store,
            shell,
            registrar,
            indicator,
        }
    }

    /// Feeds an event and settles the run loop.
    fn feed(f: &Fixture, event: HostEvent) {
        f.indicator.handle_event(event);
        f.runloop.drain();
    }

    #[test]
    fn startup_reconciles_the_host_state() {
        let f = fixture(3, |_| {});
        let states = f.indicator.workspace_states();
        assert_eq!(states.len(), 3);
        assert!(states.iter().all(|s| s.is_visible));
        assert_eq!(f.indicator.current_index(), 0);
    }

    #[test]
    fn active_workspace_events_move_the_current_index() {
        let f = fixture(3, |_| {});
        f.shell.set_active(2);
        feed(&f, HostEvent::ActiveWorkspaceChanged);
        assert_eq!(f.indicator.current_index(), 2);
    }

    #[test]
    fn update_callbacks_fire_once_per_event_batch() {
        let f = fixture(3, |_| {});
        let fired = Rc::new(Cell::new(0));
        let count = fired.clone();
        f.indicator.on_update(move || count.set(count.get() + 1));

        f.indicator.handle_event(HostEvent::WorkspacesChanged);
        f.indicator.handle_event(HostEvent::TrackedWindowsChanged);
        f.runloop.drain();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn update_callbacks_can_be_detached() {
        let f = fixture(3, |_| {});
        let fired = Rc::new(Cell::new(0));
        let count = fired.clone();
        let id = f.indicator.on_update(move || count.set(count.get() + 1));

        f.indicator.handle_event(HostEvent::WorkspacesChanged);
        f.runloop.drain();
        assert_eq!(fired.get(), 1);

        f.indicator.off_update(id);
        f.indicator.handle_event(HostEvent::WorkspacesChanged);
        f.runloop.drain();
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn workspace_name_writes_come_back_as_state() {
        let f = fixture(3, |_| {});
        f.indicator.rename_workspace(1, "mail");
        f.runloop.drain();
        let states = f.indicator.workspace_states();
        assert_eq!(states[1].named(), Some("mail"));
        assert_eq!(f.indicator.display_name(&states[1]), "mail");
    }

    #[test]
    fn scroll_events_report_whether_they_were_consumed() {
        let f = fixture(3, |_| {});
        assert!(f.indicator.handle_event(HostEvent::Scroll {
            direction: ScrollDirection::Down,
        }));
        assert_eq!(f.shell.ops()[0], ShellOp::ActivateWorkspace(1));

        f.store
            .set_string(keys::SCROLL_WHEEL_VERTICAL, "disabled");
        f.indicator
            .handle_event(HostEvent::SettingChanged {
                key: keys::SCROLL_WHEEL_VERTICAL.to_owned(),
            });
        assert!(!f.indicator.handle_event(HostEvent::Scroll {
            direction: ScrollDirection::Down,
        }));
    }

    #[test]
    fn keybinding_events_dispatch_to_the_engine() {
        let f = fixture(3, |store| {
            store.set_boolean(keys::ENABLE_ACTIVATE_WORKSPACE_SHORTCUTS, true);
        });
        assert!(f.indicator.handle_event(HostEvent::Keybinding {
            name: "activate-3-key".to_owned(),
        }));
        assert_eq!(f.shell.ops(), vec![ShellOp::ActivateWorkspace(2)]);
        assert!(!f.indicator.handle_event(HostEvent::Keybinding {
            name: "unrelated".to_owned(),
        }));
    }

    #[test]
    fn attention_events_mark_workspaces_until_visited() {
        let f = fixture(3, |store| {
            store.set_boolean(keys::ATTENTION_INDICATOR, true);
        });
        let window = f
            .shell
            .add_window(1, Some("org.gnome.Nautilus"), WindowFlags::empty());
        let workspace = f.shell.workspace_at(1).unwrap();
        feed(&f, HostEvent::WindowAdded { workspace });
        f.shell.set_flags(window, WindowFlags::DEMANDS_ATTENTION);
        feed(&f, HostEvent::WindowDemandsAttention { window });
        assert!(f.indicator.workspace_states()[1].has_attention);

        f.shell.set_active(1);
        feed(&f, HostEvent::ActiveWorkspaceChanged);
        assert!(!f.indicator.workspace_states()[1].has_attention);
    }

    #[test]
    fn click_activation_goes_through_switch_to() {
        let f = fixture(3, |_| {});
        f.indicator.switch_to(2, SwitchCause::ClickOnLabel);
        assert_eq!(f.shell.ops(), vec![ShellOp::ActivateWorkspace(2)]);
    }

    #[test]
    fn destroy_releases_keybindings_and_host_connections() {
        let f = fixture(3, |_| {});
        assert!(f.registrar.is_registered("activate-previous-key"));
        assert!(f.shell.connection_count() > 0);
        f.indicator.destroy();
        assert!(f.registrar.registered().is_empty());
        assert_eq!(f.shell.connection_count(), 0);
    }
}
