//! Interaction state for the Fibonacci strip.
//!
//! Every handler takes the state by value and returns the next state, so
//! transitions can be exercised without a terminal.

use crate::sequence::{self, generate, DEFAULT_LENGTH};

/// Pointer drag bookkeeping captured at drag start
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DragState {
    pub dragging: bool,
    /// Pointer column when the drag started
    pub anchor_x: i32,
    /// Scroll offset when the drag started
    pub anchor_offset: i32,
}

/// Fixed on-screen geometry of a single box, in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxMetrics {
    pub width: u16,
    pub height: u16,
    pub gap: u16,
    /// Content width no box may shrink below
    pub min_content_width: u16,
}

impl Default for BoxMetrics {
    fn default() -> Self {
        Self {
            width: 15,
            height: 5,
            gap: 1,
            min_content_width: 13,
        }
    }
}

impl BoxMetrics {
    /// Outer width of a box including its borders
    pub fn footprint_width(&self) -> u16 {
        self.width.max(self.min_content_width.saturating_add(2))
    }

    /// Horizontal distance between the left edges of consecutive boxes
    pub fn pitch(&self) -> u16 {
        self.footprint_width().saturating_add(self.gap).max(1)
    }

    /// Total width of `count` boxes laid out in a row
    pub fn content_width(&self, count: usize) -> i32 {
        if count == 0 {
            return 0;
        }
        count as i32 * self.pitch() as i32 - self.gap as i32
    }

    /// Index of the box covering content column `content_x`, if any.
    ///
    /// Columns in the gap between boxes or past the last box hit nothing.
    pub fn box_at(&self, content_x: i32, count: usize) -> Option<usize> {
        if content_x < 0 {
            return None;
        }
        let pitch = self.pitch() as i32;
        let index = (content_x / pitch) as usize;
        if index >= count || content_x % pitch >= self.footprint_width() as i32 {
            return None;
        }
        Some(index)
    }
}

/// Map a scroll offset to the index of the box nearest the viewport origin.
///
/// Rounds half up, then clamps to the valid range for `length` boxes.
pub fn active_index_for_offset(offset: i32, pitch: u16, length: usize) -> usize {
    if length == 0 {
        return 0;
    }
    let pitch = pitch.max(1) as f64;
    let index = (offset.max(0) as f64 / pitch).round() as usize;
    index.min(length - 1)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StripState {
    pub length: usize,
    pub sequence: Vec<u64>,
    pub active_index: usize,
    pub drag: DragState,
    /// Box under the pointer
    pub hovered: Option<usize>,
}

impl Default for StripState {
    fn default() -> Self {
        Self::new(DEFAULT_LENGTH)
    }
}

impl StripState {
    /// Create a state for `length` boxes; out-of-range lengths are clamped
    pub fn new(length: usize) -> Self {
        let length = sequence::clamp_length(length.min(i64::MAX as usize) as i64);
        Self {
            length,
            sequence: generate(length),
            active_index: 0,
            drag: DragState::default(),
            hovered: None,
        }
    }

    /// Apply raw text from the length field
    pub fn on_length_input(self, raw: &str) -> Self {
        let length = sequence::normalize_length(raw);
        tracing::debug!(raw, length, "length input");
        self.with_length(length)
    }

    /// Replace the length, regenerating the sequence and resetting the active box
    pub fn with_length(self, length: usize) -> Self {
        let next = Self {
            drag: self.drag,
            ..Self::new(length)
        };
        if next.length != self.length {
            tracing::info!(from = self.length, to = next.length, "sequence length changed");
        }
        next
    }

    /// Step the length by `delta`, staying within bounds
    pub fn step_length(self, delta: i64) -> Self {
        let target = (self.length as i64).saturating_add(delta);
        let length = sequence::clamp_length(target);
        self.with_length(length)
    }

    pub fn on_drag_start(self, pointer_x: i32, scroll_offset: i32) -> Self {
        tracing::debug!(pointer_x, scroll_offset, "drag start");
        Self {
            drag: DragState {
                dragging: true,
                anchor_x: pointer_x,
                anchor_offset: scroll_offset,
            },
            ..self
        }
    }

    /// Scroll offset requested by moving the pointer to `pointer_x`.
    ///
    /// Returns `None` when no drag is in progress.
    pub fn drag_target(&self, pointer_x: i32) -> Option<i32> {
        if !self.drag.dragging {
            return None;
        }
        let delta = pointer_x - self.drag.anchor_x;
        Some(self.drag.anchor_offset - delta)
    }

    /// End the drag; used for button release and for the pointer leaving the strip
    pub fn on_drag_end(self) -> Self {
        if self.drag.dragging {
            tracing::debug!("drag end");
        }
        Self {
            drag: DragState {
                dragging: false,
                ..self.drag
            },
            ..self
        }
    }

    pub fn on_hover(self, hovered: Option<usize>) -> Self {
        let hovered = hovered.filter(|&index| index < self.length);
        Self { hovered, ..self }
    }

    pub fn on_scroll(self, offset: i32, pitch: u16) -> Self {
        let active_index = active_index_for_offset(offset, pitch, self.length);
        if active_index != self.active_index {
            tracing::debug!(offset, active_index, "active box changed");
        }
        Self {
            active_index,
            ..self
        }
    }

    /// Value of the highlighted box
    pub fn active_value(&self) -> Option<u64> {
        self.sequence.get(self.active_index).copied()
    }
}
