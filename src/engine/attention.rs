//! Bookkeeping for windows that request user attention.
//!
//! The host clears `DEMANDS_ATTENTION` on focus, but `URGENT` is sticky,
//! so a window stays flagged after it was dealt with. Acknowledged windows
//! are remembered here and excluded from the indicator until their flags
//! clear and come back.

use tracing::trace;

use crate::common::collections::{HashMap, HashSet};
use crate::host::{HostShell, SignalId, WindowId};

#[derive(Default)]
pub struct AttentionTracker {
    acknowledged: HashSet<WindowId>,
    /// Per-window signal registrations, so flag changes on flagged
    /// windows keep reaching us.
    connections: HashMap<WindowId, SignalId>,
}

impl AttentionTracker {
    pub fn new() -> Self {
        AttentionTracker::default()
    }

    /// Pre-acknowledges every window already flagged at startup. Stale
    /// urgency from before our time never lights up the indicator.
    pub fn snapshot_existing(&mut self, host: &dyn HostShell) {
        for window in host.all_windows() {
            if host.window_flags(window).wants_attention() {
                self.acknowledged.insert(window);
            }
        }
    }

    /// Forgets acknowledgements whose flags have cleared in the meantime.
    /// The next time such a window raises a flag it counts again.
    pub fn sweep_stale(&mut self, host: &dyn HostShell) {
        self.acknowledged
            .retain(|&window| host.window_flags(window).wants_attention());
    }

    /// Registers a fresh attention request. Connects the window's signals
    /// if not yet connected, so focus and unmanage events arrive.
    pub fn note(&mut self, host: &dyn HostShell, window: WindowId) {
        if self.acknowledged.remove(&window) {
            trace!(?window, "window flagged again after acknowledgement");
        }
        self.connections
            .entry(window)
            .or_insert_with(|| host.connect_window_signals(window));
    }

    pub fn acknowledge(&mut self, window: WindowId) {
        self.acknowledged.insert(window);
    }

    pub fn is_acknowledged(&self, window: WindowId) -> bool {
        self.acknowledged.contains(&window)
    }

    /// Drops all state for a window that was focused or unmanaged.
    pub fn detach(&mut self, host: &dyn HostShell, window: WindowId) {
        if let Some(signal) = self.connections.remove(&window) {
            host.disconnect(signal);
        }
        self.acknowledged.remove(&window);
    }

    pub fn destroy(&mut self, host: &dyn HostShell) {
        for (_, signal) in self.connections.drain() {
            host.disconnect(signal);
        }
        self.acknowledged.clear();
    }
}
