//! Drag-and-drop workspace reordering.
//!
//! Pure geometry: the renderer feeds in box positions at drag start and
//! the dragged box's left edge on every motion tick, and gets back
//! placeholder instructions and, on drop, at most one reorder command.
//! All coordinates are in the bar's local space.

use tracing::trace;

/// Position of one workspace box in the bar at drag start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub workspace_index: usize,
    pub x: f64,
    pub width: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderSide {
    Before,
    After,
}

/// Where the dragged workspace would land right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropPosition {
    /// Reorder target index, with the dragged workspace removed from the
    /// sequence.
    pub target: usize,
    /// Workspace index of the box that carries the placeholder margin.
    pub anchor: usize,
    pub side: PlaceholderSide,
    /// Placeholder width, the dragged box's width.
    pub width: f64,
}

/// Sibling snapshot entry: the drop index the sibling stands for and its
/// horizontal center, adjusted for the dragged box's removal from the
/// flow.
#[derive(Debug, Clone, Copy)]
struct SiblingPosition {
    target: usize,
    anchor: usize,
    center: f64,
}

/// State machine for one drag gesture.
pub struct DragReorder {
    dragged_index: usize,
    dragged_width: f64,
    siblings: Vec<SiblingPosition>,
    last_visible: usize,
    initial: Option<DropPosition>,
    bar_width_at_start: f64,
    has_left_initial: bool,
}

impl DragReorder {
    /// Captures the sibling layout at drag start. `boxes` are all visible
    /// workspace boxes in bar order, including the dragged one;
    /// `last_visible` is the index an after-the-end drop targets.
    pub fn begin(
        boxes: &[BoxGeometry],
        dragged_workspace: usize,
        bar_width: f64,
        last_visible: usize,
    ) -> Option<Self> {
        let dragged_position = boxes
            .iter()
            .position(|b| b.workspace_index == dragged_workspace)?;
        let dragged = boxes[dragged_position];
        let siblings: Vec<SiblingPosition> = boxes
            .iter()
            .filter(|b| b.workspace_index != dragged_workspace)
            .enumerate()
            .map(|(position, b)| {
                // Siblings that originally followed the dragged box shift
                // left by its width once it leaves the flow.
                let adjust = if position >= dragged_position {
                    dragged.width
                } else {
                    0.0
                };
                SiblingPosition {
                    target: drop_index(dragged_workspace, b.workspace_index),
                    anchor: b.workspace_index,
                    center: b.x + b.width / 2.0 - adjust,
                }
            })
            .collect();
        if siblings.is_empty() {
            return None;
        }
        let mut this = DragReorder {
            dragged_index: dragged_workspace,
            dragged_width: dragged.width,
            siblings,
            last_visible,
            initial: None,
            bar_width_at_start: bar_width,
            has_left_initial: false,
        };
        this.initial = Some(this.drop_position(dragged.x));
        trace!(dragged_workspace, ?this.initial, "drag started");
        Some(this)
    }

    /// The drop position for the dragged box's current left edge: insert
    /// before the first sibling whose adjusted center lies right of the
    /// edge, or after the last one.
    pub fn drop_position(&self, dragged_left: f64) -> DropPosition {
        for sibling in &self.siblings {
            if dragged_left < sibling.center {
                return DropPosition {
                    target: sibling.target,
                    anchor: sibling.anchor,
                    side: PlaceholderSide::Before,
                    width: self.dragged_width,
                };
            }
        }
        let last = self.siblings[self.siblings.len() - 1];
        DropPosition {
            target: self.last_visible,
            anchor: last.anchor,
            side: PlaceholderSide::After,
            width: self.dragged_width,
        }
    }

    /// The placeholder to render for the current pointer position, or
    /// `None` when it should stay as it is. Updates are suppressed while
    /// the target still equals the drag-start target and the bar width has
    /// not changed, so micro-movements around the origin do not flicker.
    pub fn placeholder(&mut self, dragged_left: f64, bar_width: f64) -> Option<DropPosition> {
        let position = self.drop_position(dragged_left);
        let at_initial = self
            .initial
            .is_some_and(|initial| initial.target == position.target && initial.side == position.side);
        if at_initial {
            if bar_width != self.bar_width_at_start {
                self.has_left_initial = true;
            }
            if !self.has_left_initial {
                return None;
            }
        } else {
            self.has_left_initial = true;
        }
        Some(position)
    }

    /// The placeholder restoring the drag-start state, for cancelled
    /// drags.
    pub fn cancel(&self) -> Option<DropPosition> {
        self.initial
    }

    /// Concludes the gesture. Returns the single reorder command to issue,
    /// or `None` when the workspace would land where it started.
    pub fn finish(&self, dragged_left: f64) -> Option<(usize, usize)> {
        let position = self.drop_position(dragged_left);
        if position.target == self.dragged_index {
            return None;
        }
        Some((self.dragged_index, position.target))
    }
}

/// The index `other` stands for as a drop target once `dragged` is
/// removed from the sequence.
fn drop_index(dragged: usize, other: usize) -> usize {
    if dragged < other { other - 1 } else { other }
}
