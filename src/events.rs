//! Event queue between input translation and the main loop.
//!
//! Window and bezel input is translated into [`QueuedEvent`] values and pushed
//! here. The tick handler pops one event per tick, in arrival order.
//!
//! The queue is a fixed-capacity ring buffer: when it is full the oldest event
//! is dropped so that a burst of input can never stall the display.

use heapless::Deque;
use tracing::warn;

use crate::keys::Key;

/// Maximum number of events held between ticks.
pub const EVENT_QUEUE_SIZE: usize = 64;

/// One translated input or housekeeping event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueuedEvent {
    KeyPressed(Key),
    KeyReleased(Key),
    /// Raw window position, top-left origin.
    PointerPressed { x: i32, y: i32 },
    /// Raw window position, top-left origin.
    PointerReleased { x: i32, y: i32 },
    Resize { width: u32, height: u32 },
    Redraw,
    /// A widget changed its own content (status sampler, video).
    WidgetUpdate,
    /// Nothing happened this tick.
    Idle,
}

/// FIFO event buffer.
pub struct EventQueue {
    buffer: Deque<QueuedEvent, EVENT_QUEUE_SIZE>,
    dropped: u32,
}

impl EventQueue {
    pub const fn new() -> Self {
        Self { buffer: Deque::new(), dropped: 0 }
    }

    /// Append an event. If the queue is full the oldest event is dropped.
    pub fn push(&mut self, event: QueuedEvent) {
        if self.buffer.is_full() {
            if let Some(lost) = self.buffer.pop_front() {
                warn!(?lost, "event queue full, dropping oldest event");
            }
            self.dropped += 1;
        }
        self.buffer.push_back(event).ok();
    }

    /// Oldest pending event.
    pub fn pop(&mut self) -> Option<QueuedEvent> {
        self.buffer.pop_front()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Events lost to overflow since start-up.
    #[inline]
    pub const fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}
