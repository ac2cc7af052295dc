//! Scroll-wheel workspace navigation.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::common::settings::{ScrollAxisMode, ScrollBinding, Settings};
use crate::engine::Workspaces;
use crate::host::{HostShell, ScrollDirection, ScrollTarget, SignalId};
use crate::runloop::RunLoop;
use crate::util::subject::SubscriptionId;

/// Binds scroll events to either the whole panel or the indicator widget,
/// exclusively, and turns them into visible-workspace steps.
///
/// The debounce is leading edge: the window is measured from the last
/// accepted event, so a burst accepts at most one scroll per window and
/// the first event of a burst is never delayed.
pub struct ScrollHandler {
    host: Rc<dyn HostShell>,
    settings: Rc<Settings>,
    runloop: Rc<RunLoop>,
    engine: Rc<RefCell<Workspaces>>,
    binding: Cell<Option<SignalId>>,
    last_accepted: Cell<Option<Duration>>,
    subscription: Cell<Option<SubscriptionId>>,
}

impl ScrollHandler {
    pub fn new(
        host: Rc<dyn HostShell>,
        settings: Rc<Settings>,
        runloop: Rc<RunLoop>,
        engine: Rc<RefCell<Workspaces>>,
    ) -> Rc<Self> {
        let this = Rc::new(ScrollHandler {
            host,
            settings,
            runloop,
            engine,
            binding: Cell::new(None),
            last_accepted: Cell::new(None),
            subscription: Cell::new(None),
        });
        let weak = Rc::downgrade(&this);
        let id = this.settings.scroll_wheel.subscribe_with_current(move |&binding| {
            if let Some(this) = weak.upgrade() {
                this.rebind(binding);
            }
        });
        this.subscription.set(Some(id));
        this
    }

    pub fn destroy(&self) {
        if let Some(id) = self.subscription.take() {
            self.settings.scroll_wheel.unsubscribe(id);
        }
        if let Some(signal) = self.binding.take() {
            self.host.disconnect(signal);
        }
    }

    /// Tears down the previous registration before the new one goes up, so
    /// at most one scroll binding is ever live.
    fn rebind(&self, binding: ScrollBinding) {
        if let Some(signal) = self.binding.take() {
            self.host.disconnect(signal);
        }
        let target = match binding {
            ScrollBinding::Panel => Some(ScrollTarget::Panel),
            ScrollBinding::Indicator => Some(ScrollTarget::Indicator),
            ScrollBinding::Disabled => None,
        };
        if let Some(target) = target {
            trace!(%target, "binding scroll listener");
            self.binding.set(Some(self.host.connect_scroll(target)));
        }
    }

    /// Handles one scroll event. Returns whether the event was consumed;
    /// events on a disabled axis propagate.
    pub fn handle_scroll(&self, direction: ScrollDirection) -> bool {
        let (step, mode) = match direction {
            ScrollDirection::Up => (-1, self.settings.scroll_wheel_vertical.get()),
            ScrollDirection::Down => (1, self.settings.scroll_wheel_vertical.get()),
            ScrollDirection::Left => (-1, self.settings.scroll_wheel_horizontal.get()),
            ScrollDirection::Right => (1, self.settings.scroll_wheel_horizontal.get()),
        };
        let step = match mode {
            ScrollAxisMode::Normal => step,
            ScrollAxisMode::Inverted => -step,
            ScrollAxisMode::Disabled => return false,
        };
        let wraparound = self.settings.scroll_wheel_wrap_around.get();
        let target = self.engine.borrow().find_visible_workspace(step, wraparound);
        if let Some(index) = target {
            if self.debounce_elapsed() {
                self.engine.borrow_mut().activate_and_focus(index);
            }
        }
        true
    }

    /// Whether enough time has passed since the last accepted scroll. A
    /// `true` return resets the debounce window.
    fn debounce_elapsed(&self) -> bool {
        if !self.settings.scroll_wheel_debounce.get() {
            return true;
        }
        let window =
            Duration::from_millis(self.settings.scroll_wheel_debounce_time.get().max(0) as u64);
        let now = self.runloop.now();
        match self.last_accepted.get() {
            Some(last) if now < last + window => false,
            _ => {
                self.last_accepted.set(Some(now));
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use pretty_assertions::assert_eq;

    use super::ScrollHandler;
    use crate::common::settings::{keys, Settings};
    use crate::engine::Workspaces;
    use crate::host::{HostShell, ScrollDirection, ScrollTarget, SettingsStore, WindowFlags};
    use crate::runloop::RunLoop;
    use crate::testing::{Connection, FakeShell, FakeStore, ShellOp};

    struct Fixture {
        runloop: Rc<RunLoop>,
        store: Rc<FakeStore>,
        shell: Rc<FakeShell>,
        settings: Rc<Settings>,
        engine: Rc<RefCell<Workspaces>>,
        scroll: Rc<ScrollHandler>,
    }

    fn fixture(configure: impl FnOnce(&FakeStore)) -> Fixture {
        let runloop = RunLoop::new();
        let store = Rc::new(FakeStore::new());
        store.set_boolean(keys::SHOW_EMPTY_WORKSPACES, true);
        configure(&store);
        let shell = Rc::new(FakeShell::new());
        shell.add_workspaces(3);
        let settings = Settings::new(store.clone(), runloop.clone());
        let engine = Workspaces::new(shell.clone(), settings.clone(), runloop.clone());
        let scroll = ScrollHandler::new(
            shell.clone(),
            settings.clone(),
            runloop.clone(),
            engine.clone(),
        );
        Fixture {
            runloop,
            store,
            shell,
            settings,
            engine,
            scroll,
        }
    }

    impl Fixture {
        fn set_string(&self, key: &str, value: &str) {
            self.store.set_string(key, value);
            self.settings.setting_changed(key);
        }

        /// Scrolls and, if a workspace activation resulted, feeds the
        /// active-workspace event back like the host would.
        fn scroll(&self, direction: ScrollDirection) -> bool {
            let consumed = self.scroll.handle_scroll(direction);
            let active = self.shell.active_workspace_index();
            if active != self.engine.borrow().current_index() {
                self.engine.borrow_mut().on_active_workspace_changed();
            }
            consumed
        }
    }

    #[test]
    fn binds_to_the_panel_by_default() {
        let f = fixture(|_| {});
        assert_eq!(f.shell.connections(), vec![Connection::Scroll(ScrollTarget::Panel)]);
    }

    #[test]
    fn rebinding_tears_down_the_old_registration() {
        let f = fixture(|_| {});
        f.set_string(keys::SCROLL_WHEEL, "indicator");
        assert_eq!(
            f.shell.connections(),
            vec![Connection::Scroll(ScrollTarget::Indicator)]
        );
        f.set_string(keys::SCROLL_WHEEL, "disabled");
        assert_eq!(f.shell.connection_count(), 0);
    }

    #[test]
    fn scrolling_down_moves_to_the_next_visible_workspace() {
        let f = fixture(|_| {});
        assert!(f.scroll(ScrollDirection::Down));
        assert_eq!(f.shell.ops(), vec![ShellOp::ActivateWorkspace(1)]);
        assert!(f.scroll(ScrollDirection::Up));
        assert_eq!(&f.shell.ops()[1..], &[ShellOp::ActivateWorkspace(0)]);
    }

    #[test]
    fn inverted_axis_reverses_the_direction() {
        let f = fixture(|store| {
            store.set_string(keys::SCROLL_WHEEL_VERTICAL, "inverted");
        });
        f.shell.set_active(1);
        f.engine.borrow_mut().on_active_workspace_changed();
        f.shell.clear_ops();
        assert!(f.scroll(ScrollDirection::Down));
        assert_eq!(f.shell.ops(), vec![ShellOp::ActivateWorkspace(0)]);
    }

    #[test]
    fn disabled_axis_propagates_the_event() {
        let f = fixture(|store| {
            store.set_string(keys::SCROLL_WHEEL_HORIZONTAL, "disabled");
        });
        assert!(!f.scroll(ScrollDirection::Right));
        assert!(f.shell.ops().is_empty());
    }

    #[test]
    fn scrolling_past_the_end_without_wraparound_does_nothing() {
        let f = fixture(|_| {});
        f.shell.set_active(2);
        f.engine.borrow_mut().on_active_workspace_changed();
        f.shell.clear_ops();
        assert!(f.scroll(ScrollDirection::Down));
        assert!(f.shell.ops().is_empty());
    }

    #[test]
    fn wraparound_continues_at_the_first_workspace() {
        let f = fixture(|store| {
            store.set_boolean(keys::SCROLL_WHEEL_WRAP_AROUND, true);
        });
        f.shell.set_active(2);
        f.engine.borrow_mut().on_active_workspace_changed();
        f.shell.clear_ops();
        assert!(f.scroll(ScrollDirection::Down));
        assert_eq!(f.shell.ops(), vec![ShellOp::ActivateWorkspace(0)]);
    }

    #[test]
    fn debounce_accepts_at_most_one_scroll_per_window() {
        let f = fixture(|store| {
            store.set_boolean(keys::SCROLL_WHEEL_DEBOUNCE, true);
            store.set_int(keys::SCROLL_WHEEL_DEBOUNCE_TIME, 100);
        });
        assert!(f.scroll(ScrollDirection::Down));
        f.runloop.advance(Duration::from_millis(50));
        assert!(f.scroll(ScrollDirection::Down));
        assert_eq!(f.shell.ops(), vec![ShellOp::ActivateWorkspace(1)]);
        // The leading edge opens again one window after the accepted event.
        f.runloop.advance(Duration::from_millis(50));
        assert!(f.scroll(ScrollDirection::Down));
        assert_eq!(&f.shell.ops()[1..], &[ShellOp::ActivateWorkspace(2)]);
    }

    #[test]
    fn scrolling_focuses_the_most_recent_window_on_the_target() {
        let f = fixture(|_| {});
        let window = f.shell.add_window(1, None, WindowFlags::empty());
        f.shell.raise(window);
        f.engine.borrow_mut().on_tracked_windows_changed();
        f.shell.clear_ops();
        assert!(f.scroll(ScrollDirection::Down));
        assert_eq!(
            f.shell.ops(),
            vec![ShellOp::ActivateWorkspace(1), ShellOp::FocusWindow(window)]
        );
    }

    #[test]
    fn destroy_releases_the_scroll_binding() {
        let f = fixture(|_| {});
        f.scroll.destroy();
        assert_eq!(f.shell.connection_count(), 0);
    }
}
