//! Horizontal scroll surface for the strip.
//!
//! The surface reports every offset change to an attached listener as an
//! [`AppEvent::Scroll`]. A listener is attached with [`ScrollSurface::attach`]
//! and stays attached until its [`ScrollListener`] guard is detached or dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};
use std::sync::mpsc::Sender;

use crate::AppEvent;

type ListenerSlot = Rc<RefCell<Option<(u64, Sender<AppEvent>)>>>;

#[derive(Debug, Default)]
pub struct ScrollSurface {
    offset: i32,
    content_width: i32,
    viewport_width: i32,
    listener: ListenerSlot,
    next_listener_id: u64,
}

impl ScrollSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn viewport_width(&self) -> i32 {
        self.viewport_width
    }

    /// Largest reachable offset for the current extent
    pub fn max_offset(&self) -> i32 {
        (self.content_width - self.viewport_width).max(0)
    }

    /// Move to `target`, clamped to the scrollable range. Returns the applied offset.
    pub fn set_offset(&mut self, target: i32) -> i32 {
        let clamped = target.clamp(0, self.max_offset());
        if clamped != self.offset {
            self.offset = clamped;
            self.notify();
        }
        self.offset
    }

    pub fn scroll_by(&mut self, delta: i32) -> i32 {
        self.set_offset(self.offset.saturating_add(delta))
    }

    /// Update content and viewport widths, re-clamping the current offset
    pub fn set_extent(&mut self, content_width: i32, viewport_width: i32) {
        self.content_width = content_width.max(0);
        self.viewport_width = viewport_width.max(0);
        let offset = self.offset;
        self.set_offset(offset);
    }

    /// Register `events` to receive scroll notifications.
    ///
    /// Replaces any listener attached earlier. The earlier guard becomes inert.
    pub fn attach(&mut self, events: Sender<AppEvent>) -> ScrollListener {
        self.next_listener_id += 1;
        let id = self.next_listener_id;
        *self.listener.borrow_mut() = Some((id, events));
        tracing::debug!(id, "scroll listener attached");
        ScrollListener {
            id,
            slot: Rc::downgrade(&self.listener),
        }
    }

    pub fn has_listener(&self) -> bool {
        self.listener.borrow().is_some()
    }

    fn notify(&self) {
        if let Some((_, events)) = self.listener.borrow().as_ref() {
            // A closed channel means nobody is listening anymore
            let _ = events.send(AppEvent::Scroll(self.offset));
        }
    }
}

/// Keeps a scroll listener attached for as long as it lives
#[derive(Debug)]
pub struct ScrollListener {
    id: u64,
    slot: Weak<RefCell<Option<(u64, Sender<AppEvent>)>>>,
}

impl ScrollListener {
    pub fn detach(self) {
        // Drop does the work
    }
}

impl Drop for ScrollListener {
    fn drop(&mut self) {
        let Some(slot) = self.slot.upgrade() else {
            return;
        };
        let mut slot = slot.borrow_mut();
        if matches!(slot.as_ref(), Some((id, _)) if *id == self.id) {
            *slot = None;
            tracing::debug!(id = self.id, "scroll listener detached");
        }
    }
}
