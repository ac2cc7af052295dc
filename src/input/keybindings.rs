//! Keyboard shortcut registration and dispatch.
//!
//! A fixed set of navigation bindings is always registered. The numbered
//! activate and move-to-workspace bindings follow their enable settings,
//! so the shortcuts do not shadow other keybindings while switched off.
//! The move-to-workspace bindings are registered only to arm their
//! accelerators; the host's own handler moves the focused window, so
//! their presses are never consumed here.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::debug;

use crate::common::settings::Settings;
use crate::engine::{SwitchCause, Workspaces};
use crate::host::KeyBindingRegistrar;
use crate::util::subject::SubscriptionId;

const MOVE_WORKSPACE_LEFT: &str = "move-workspace-left";
const MOVE_WORKSPACE_RIGHT: &str = "move-workspace-right";
const ACTIVATE_PREVIOUS: &str = "activate-previous-key";
const ACTIVATE_EMPTY: &str = "activate-empty-key";

const NUMBERED_SHORTCUTS: usize = 10;

pub struct KeyBindings {
    registrar: Rc<dyn KeyBindingRegistrar>,
    settings: Rc<Settings>,
    engine: Rc<RefCell<Workspaces>>,
    /// Every name currently registered, for dispatch and teardown.
    added: RefCell<Vec<String>>,
    activate_subscription: Cell<Option<SubscriptionId>>,
    move_subscription: Cell<Option<SubscriptionId>>,
}

impl KeyBindings {
    pub fn new(
        registrar: Rc<dyn KeyBindingRegistrar>,
        settings: Rc<Settings>,
        engine: Rc<RefCell<Workspaces>>,
    ) -> Rc<Self> {
        let this = Rc::new(KeyBindings {
            registrar,
            settings: settings.clone(),
            engine,
            added: RefCell::new(Vec::new()),
            activate_subscription: Cell::new(None),
            move_subscription: Cell::new(None),
        });
        for name in [
            MOVE_WORKSPACE_LEFT,
            MOVE_WORKSPACE_RIGHT,
            ACTIVATE_PREVIOUS,
            ACTIVATE_EMPTY,
        ] {
            this.add(name.to_owned());
        }
        let weak = Rc::downgrade(&this);
        this.activate_subscription.set(Some(
            settings
                .enable_activate_workspace_shortcuts
                .subscribe_with_current(move |&enabled| {
                    if let Some(this) = weak.upgrade() {
                        this.set_numbered(activate_binding, enabled);
                    }
                }),
        ));
        let weak = Rc::downgrade(&this);
        this.move_subscription.set(Some(
            settings
                .enable_move_to_workspace_shortcuts
                .subscribe_with_current(move |&enabled| {
                    if let Some(this) = weak.upgrade() {
                        this.set_numbered(move_to_binding, enabled);
                    }
                }),
        ));
        this
    }

    pub fn destroy(&self) {
        if let Some(id) = self.activate_subscription.take() {
            self.settings.enable_activate_workspace_shortcuts.unsubscribe(id);
        }
        if let Some(id) = self.move_subscription.take() {
            self.settings.enable_move_to_workspace_shortcuts.unsubscribe(id);
        }
        for name in self.added.borrow_mut().drain(..) {
            self.registrar.remove_keybinding(&name);
        }
    }

    /// Dispatches a pressed binding. Returns `false` for names this
    /// instance never registered and for the move-to-workspace bindings,
    /// which the host handles itself.
    pub fn handle_action(&self, name: &str) -> bool {
        let known = self.added.borrow().iter().any(|added| added == name);
        if !known || is_move_to_binding(name) {
            return false;
        }
        debug!(name, "keybinding pressed");
        let mut engine = self.engine.borrow_mut();
        match name {
            MOVE_WORKSPACE_LEFT => engine.move_current_workspace(-1),
            MOVE_WORKSPACE_RIGHT => engine.move_current_workspace(1),
            ACTIVATE_PREVIOUS => engine.activate_previous(),
            ACTIVATE_EMPTY => engine.activate_empty_or_add(),
            _ => {
                if let Some(number) = parse_activate_binding(name) {
                    engine.switch_to(number - 1, SwitchCause::KeyboardShortcut);
                }
            }
        }
        true
    }

    fn add(&self, name: String) {
        self.registrar.add_keybinding(&name);
        self.added.borrow_mut().push(name);
    }

    fn remove(&self, name: &str) {
        self.registrar.remove_keybinding(name);
        self.added.borrow_mut().retain(|added| added != name);
    }

    fn set_numbered(&self, binding: fn(usize) -> String, enabled: bool) {
        for number in 1..=NUMBERED_SHORTCUTS {
            let name = binding(number);
            let registered = self.added.borrow().iter().any(|added| *added == name);
            match (enabled, registered) {
                (true, false) => self.add(name),
                (false, true) => self.remove(&name),
                _ => {}
            }
        }
    }
}

fn activate_binding(number: usize) -> String {
    format!("activate-{number}-key")
}

fn move_to_binding(number: usize) -> String {
    format!("move-to-workspace-{number}")
}

fn is_move_to_binding(name: &str) -> bool {
    name.strip_prefix("move-to-workspace-")
        .and_then(|number| number.parse::<usize>().ok())
        .is_some_and(|number| (1..=NUMBERED_SHORTCUTS).contains(&number))
}

fn parse_activate_binding(name: &str) -> Option<usize> {
    let number: usize = name
        .strip_prefix("activate-")?
        .strip_suffix("-key")?
        .parse()
        .ok()?;
    (1..=NUMBERED_SHORTCUTS).contains(&number).then_some(number)
}
