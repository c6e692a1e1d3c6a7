//! Bounded button event queue
//!
//! Hands button reports from the tick context to the UI consumer. The queue
//! keeps the newest events: when it is full the oldest entry is dropped and
//! counted.

use heapless::Deque;

use super::engine::ButtonReport;
use super::event::EventMask;

/// FIFO of button reports filtered by event kind
pub struct ButtonQueue<const Q: usize> {
    events: Deque<ButtonReport, Q>,
    mask: EventMask,
    dropped: u32,
}

impl<const Q: usize> ButtonQueue<Q> {
    /// Create an empty queue accepting every event kind
    pub fn new() -> Self {
        Self::with_mask(EventMask::ALL)
    }

    /// Create an empty queue accepting only the kinds in `mask`
    pub fn with_mask(mask: EventMask) -> Self {
        Self {
            events: Deque::new(),
            mask,
            dropped: 0,
        }
    }

    /// Event kinds accepted by [`push`](Self::push)
    pub fn mask(&self) -> EventMask {
        self.mask
    }

    /// Change the accepted event kinds
    ///
    /// Already queued reports are kept.
    pub fn set_mask(&mut self, mask: EventMask) {
        self.mask = mask;
    }

    /// Queue a report
    ///
    /// Returns `false` if its event kind is filtered out.
    pub fn push(&mut self, report: ButtonReport) -> bool {
        if !self.mask.contains(report.event) {
            return false;
        }

        if self.events.is_full() {
            self.events.pop_front();
            self.dropped = self.dropped.saturating_add(1);
        }
        // Space was made above
        let _ = self.events.push_back(report);
        true
    }

    /// Queue every report from one engine tick, in order
    pub fn push_reports<'a, I>(&mut self, reports: I) -> usize
    where
        I: IntoIterator<Item = &'a ButtonReport>,
    {
        reports
            .into_iter()
            .filter(|report| self.push(**report))
            .count()
    }

    /// Take the oldest report
    pub fn pop(&mut self) -> Option<ButtonReport> {
        self.events.pop_front()
    }

    /// Oldest report without removing it
    pub fn peek(&self) -> Option<&ButtonReport> {
        self.events.front()
    }

    /// Number of queued reports
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Reports discarded because the queue was full
    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    /// Discard every queued report and clear the drop counter
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped = 0;
    }
}

impl<const Q: usize> Default for ButtonQueue<Q> {
    fn default() -> Self {
        Self::new()
    }
}
