//! Typed, observable bridge over the host settings store.
//!
//! One [`Subject`] per logical setting. External changes arrive as
//! [`crate::host::HostEvent::SettingChanged`] and are applied through
//! [`Settings::setting_changed`], which re-reads the store and updates the
//! matching subject. Writes made by this crate land in the store
//! immediately, but the change notification is queued on the run loop, the
//! same asynchronous shape the host store's own change signal has. No
//! subscriber ever runs re-entrantly under a caller's borrow.

use std::rc::{Rc, Weak};
use std::str::FromStr;

use strum_macros::{Display, EnumString};
use thiserror::Error;
use tracing::warn;

use crate::common::collections::HashMap;
use crate::host::SettingsStore;
use crate::runloop::RunLoop;
use crate::util::subject::Subject;

/// Setting keys consumed or produced by this crate. Appearance keys are
/// owned by the preferences UI and never read here.
pub mod keys {
    pub const DYNAMIC_WORKSPACES: &str = "dynamic-workspaces";
    pub const SHOW_EMPTY_WORKSPACES: &str = "show-empty-workspaces";
    pub const SMART_WORKSPACE_NAMES: &str = "smart-workspace-names";
    pub const REEVALUATE_SMART_WORKSPACE_NAMES: &str = "reevaluate-smart-workspace-names";
    pub const TOGGLE_OVERVIEW: &str = "toggle-overview";
    pub const OVERVIEW_ON_EMPTY_WORKSPACE: &str = "overview-on-empty-workspace";
    pub const BACK_AND_FORTH: &str = "back-and-forth";
    pub const ALWAYS_SHOW_NUMBERS: &str = "always-show-numbers";
    pub const ENABLE_CUSTOM_LABEL: &str = "enable-custom-label";
    pub const CUSTOM_LABEL_NAMED: &str = "custom-label-named";
    pub const CUSTOM_LABEL_UNNAMED: &str = "custom-label-unnamed";
    pub const SCROLL_WHEEL: &str = "scroll-wheel";
    pub const SCROLL_WHEEL_VERTICAL: &str = "scroll-wheel-vertical";
    pub const SCROLL_WHEEL_HORIZONTAL: &str = "scroll-wheel-horizontal";
    pub const SCROLL_WHEEL_DEBOUNCE: &str = "scroll-wheel-debounce";
    pub const SCROLL_WHEEL_DEBOUNCE_TIME: &str = "scroll-wheel-debounce-time";
    pub const SCROLL_WHEEL_WRAP_AROUND: &str = "scroll-wheel-wrap-around";
    pub const ATTENTION_INDICATOR: &str = "attention-indicator";
    pub const ATTENTION_AUTO_FOCUS: &str = "attention-auto-focus";
    pub const ENABLE_ACTIVATE_WORKSPACE_SHORTCUTS: &str = "enable-activate-workspace-shortcuts";
    pub const ENABLE_MOVE_TO_WORKSPACE_SHORTCUTS: &str = "enable-move-to-workspace-shortcuts";
    pub const WORKSPACE_NAMES: &str = "workspace-names";
    pub const WORKSPACE_NAMES_MAP: &str = "workspace-names-map";
}

/// Where scroll events are picked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ScrollBinding {
    #[default]
    Panel,
    Indicator,
    Disabled,
}

/// Per-axis scroll direction handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum ScrollAxisMode {
    #[default]
    Normal,
    Inverted,
    Disabled,
}

/// Smart-name association table: application identifier to the workspace
/// names previously used with it, most recently used last.
pub type NamesMap = HashMap<String, Vec<String>>;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid value {value:?} for setting {key}")]
    InvalidValue { key: &'static str, value: String },
    #[error("failed to decode setting {key}: {source}")]
    Decode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

pub struct Settings {
    store: Rc<dyn SettingsStore>,
    runloop: Rc<RunLoop>,

    pub dynamic_workspaces: Subject<bool>,
    pub show_empty_workspaces: Subject<bool>,
    pub smart_workspace_names: Subject<bool>,
    pub reevaluate_smart_workspace_names: Subject<bool>,
    pub toggle_overview: Subject<bool>,
    pub overview_on_empty_workspace: Subject<bool>,
    pub back_and_forth: Subject<bool>,
    pub always_show_numbers: Subject<bool>,
    pub enable_custom_label: Subject<bool>,
    pub custom_label_named: Subject<String>,
    pub custom_label_unnamed: Subject<String>,
    pub scroll_wheel: Subject<ScrollBinding>,
    pub scroll_wheel_vertical: Subject<ScrollAxisMode>,
    pub scroll_wheel_horizontal: Subject<ScrollAxisMode>,
    pub scroll_wheel_debounce: Subject<bool>,
    pub scroll_wheel_debounce_time: Subject<i64>,
    pub scroll_wheel_wrap_around: Subject<bool>,
    pub attention_indicator: Subject<bool>,
    pub attention_auto_focus: Subject<bool>,
    pub enable_activate_workspace_shortcuts: Subject<bool>,
    pub enable_move_to_workspace_shortcuts: Subject<bool>,
    pub workspace_names: Subject<Vec<String>>,
    pub workspace_names_map: Subject<NamesMap>,
}

impl Settings {
    pub fn new(store: Rc<dyn SettingsStore>, runloop: Rc<RunLoop>) -> Rc<Self> {
        let s = &store;
        Rc::new(Settings {
            dynamic_workspaces: Subject::new(s.get_boolean(keys::DYNAMIC_WORKSPACES)),
            show_empty_workspaces: Subject::new(s.get_boolean(keys::SHOW_EMPTY_WORKSPACES)),
            smart_workspace_names: Subject::new(s.get_boolean(keys::SMART_WORKSPACE_NAMES)),
            reevaluate_smart_workspace_names: Subject::new(
                s.get_boolean(keys::REEVALUATE_SMART_WORKSPACE_NAMES),
            ),
            toggle_overview: Subject::new(s.get_boolean(keys::TOGGLE_OVERVIEW)),
            overview_on_empty_workspace: Subject::new(
                s.get_boolean(keys::OVERVIEW_ON_EMPTY_WORKSPACE),
            ),
            back_and_forth: Subject::new(s.get_boolean(keys::BACK_AND_FORTH)),
            always_show_numbers: Subject::new(s.get_boolean(keys::ALWAYS_SHOW_NUMBERS)),
            enable_custom_label: Subject::new(s.get_boolean(keys::ENABLE_CUSTOM_LABEL)),
            custom_label_named: Subject::new(s.get_string(keys::CUSTOM_LABEL_NAMED)),
            custom_label_unnamed: Subject::new(s.get_string(keys::CUSTOM_LABEL_UNNAMED)),
            scroll_wheel: Subject::new(parse_enum(keys::SCROLL_WHEEL, s.get_string(keys::SCROLL_WHEEL))),
            scroll_wheel_vertical: Subject::new(parse_enum(
                keys::SCROLL_WHEEL_VERTICAL,
                s.get_string(keys::SCROLL_WHEEL_VERTICAL),
            )),
            scroll_wheel_horizontal: Subject::new(parse_enum(
                keys::SCROLL_WHEEL_HORIZONTAL,
                s.get_string(keys::SCROLL_WHEEL_HORIZONTAL),
            )),
            scroll_wheel_debounce: Subject::new(s.get_boolean(keys::SCROLL_WHEEL_DEBOUNCE)),
            scroll_wheel_debounce_time: Subject::new(s.get_int(keys::SCROLL_WHEEL_DEBOUNCE_TIME)),
            scroll_wheel_wrap_around: Subject::new(s.get_boolean(keys::SCROLL_WHEEL_WRAP_AROUND)),
            attention_indicator: Subject::new(s.get_boolean(keys::ATTENTION_INDICATOR)),
            attention_auto_focus: Subject::new(s.get_boolean(keys::ATTENTION_AUTO_FOCUS)),
            enable_activate_workspace_shortcuts: Subject::new(
                s.get_boolean(keys::ENABLE_ACTIVATE_WORKSPACE_SHORTCUTS),
            ),
            enable_move_to_workspace_shortcuts: Subject::new(
                s.get_boolean(keys::ENABLE_MOVE_TO_WORKSPACE_SHORTCUTS),
            ),
            workspace_names: Subject::new(s.get_string_array(keys::WORKSPACE_NAMES)),
            workspace_names_map: Subject::new(decode_names_map(s.get_string(keys::WORKSPACE_NAMES_MAP))),
            store,
            runloop,
        })
    }

    /// Applies an external change notification for `key`, re-reading the
    /// store and updating the matching subject. Keys not consumed by this
    /// crate are ignored.
    pub fn setting_changed(&self, key: &str) {
        let s = &self.store;
        match key {
            keys::DYNAMIC_WORKSPACES => self.dynamic_workspaces.set(s.get_boolean(key)),
            keys::SHOW_EMPTY_WORKSPACES => self.show_empty_workspaces.set(s.get_boolean(key)),
            keys::SMART_WORKSPACE_NAMES => self.smart_workspace_names.set(s.get_boolean(key)),
            keys::REEVALUATE_SMART_WORKSPACE_NAMES => {
                self.reevaluate_smart_workspace_names.set(s.get_boolean(key))
            }
            keys::TOGGLE_OVERVIEW => self.toggle_overview.set(s.get_boolean(key)),
            keys::OVERVIEW_ON_EMPTY_WORKSPACE => {
                self.overview_on_empty_workspace.set(s.get_boolean(key))
            }
            keys::BACK_AND_FORTH => self.back_and_forth.set(s.get_boolean(key)),
            keys::ALWAYS_SHOW_NUMBERS => self.always_show_numbers.set(s.get_boolean(key)),
            keys::ENABLE_CUSTOM_LABEL => self.enable_custom_label.set(s.get_boolean(key)),
            keys::CUSTOM_LABEL_NAMED => self.custom_label_named.set(s.get_string(key)),
            keys::CUSTOM_LABEL_UNNAMED => self.custom_label_unnamed.set(s.get_string(key)),
            keys::SCROLL_WHEEL => {
                self.scroll_wheel.set(parse_enum(keys::SCROLL_WHEEL, s.get_string(key)))
            }
            keys::SCROLL_WHEEL_VERTICAL => self
                .scroll_wheel_vertical
                .set(parse_enum(keys::SCROLL_WHEEL_VERTICAL, s.get_string(key))),
            keys::SCROLL_WHEEL_HORIZONTAL => self
                .scroll_wheel_horizontal
                .set(parse_enum(keys::SCROLL_WHEEL_HORIZONTAL, s.get_string(key))),
            keys::SCROLL_WHEEL_DEBOUNCE => self.scroll_wheel_debounce.set(s.get_boolean(key)),
            keys::SCROLL_WHEEL_DEBOUNCE_TIME => {
                self.scroll_wheel_debounce_time.set(s.get_int(key))
            }
            keys::SCROLL_WHEEL_WRAP_AROUND => self.scroll_wheel_wrap_around.set(s.get_boolean(key)),
            keys::ATTENTION_INDICATOR => self.attention_indicator.set(s.get_boolean(key)),
            keys::ATTENTION_AUTO_FOCUS => self.attention_auto_focus.set(s.get_boolean(key)),
            keys::ENABLE_ACTIVATE_WORKSPACE_SHORTCUTS => {
                self.enable_activate_workspace_shortcuts.set(s.get_boolean(key))
            }
            keys::ENABLE_MOVE_TO_WORKSPACE_SHORTCUTS => {
                self.enable_move_to_workspace_shortcuts.set(s.get_boolean(key))
            }
            keys::WORKSPACE_NAMES => self.workspace_names.set(s.get_string_array(key)),
            keys::WORKSPACE_NAMES_MAP => {
                self.workspace_names_map.set(decode_names_map(s.get_string(key)))
            }
            _ => {}
        }
    }

    /// Current persisted workspace names, read from the store rather than
    /// the subject: our own writes update the store before the queued
    /// change notification catches the subject up.
    pub fn workspace_names_now(&self) -> Vec<String> {
        self.store.get_string_array(keys::WORKSPACE_NAMES)
    }

    pub fn workspace_names_map_now(&self) -> NamesMap {
        decode_names_map(self.store.get_string(keys::WORKSPACE_NAMES_MAP))
    }

    /// Writes the workspace name sequence and queues the change
    /// notification on the run loop.
    pub fn set_workspace_names(self: &Rc<Self>, names: &[String]) {
        self.store.set_string_array(keys::WORKSPACE_NAMES, names);
        self.queue_changed(keys::WORKSPACE_NAMES);
    }

    pub fn set_workspace_names_map(self: &Rc<Self>, map: &NamesMap) {
        match serde_json::to_string(map) {
            Ok(blob) => {
                self.store.set_string(keys::WORKSPACE_NAMES_MAP, &blob);
                self.queue_changed(keys::WORKSPACE_NAMES_MAP);
            }
            Err(err) => warn!(?err, "failed to encode workspace names map"),
        }
    }

    fn queue_changed(self: &Rc<Self>, key: &'static str) {
        let weak: Weak<Settings> = Rc::downgrade(self);
        self.runloop.post(move || {
            if let Some(settings) = weak.upgrade() {
                settings.setting_changed(key);
            }
        });
    }
}

fn decode_names_map(blob: String) -> NamesMap {
    if blob.is_empty() {
        return NamesMap::default();
    }
    match serde_json::from_str::<NamesMap>(&blob) {
        Ok(map) => map,
        Err(source) => {
            let err = SettingsError::Decode {
                key: keys::WORKSPACE_NAMES_MAP,
                source,
            };
            warn!(%err, "ignoring malformed association table");
            NamesMap::default()
        }
    }
}

fn parse_enum<T>(key: &'static str, raw: String) -> T
where
    T: FromStr + Default,
{
    if raw.is_empty() {
        return T::default();
    }
    match raw.parse() {
        Ok(value) => value,
        Err(_) => {
            let err = SettingsError::InvalidValue { key, value: raw };
            warn!(%err, "falling back to default");
            T::default()
        }
    }
}
