//! Trailing-edge repaint coalescing.

use log::trace;

/// Coalesces repaint requests to at most one paint per display refresh.
///
/// The host drives the scheduler: when [`request`](Self::request) returns
/// `true` it must arrange one call to [`on_tick`](Self::on_tick) at the next
/// refresh. Requests arriving while a tick is pending overwrite a single
/// trailing slot, so a burst of input produces one paint for its first request
/// and one final paint for its last.
#[derive(Debug)]
pub struct RepaintScheduler<T> {
    scheduled: Option<T>,
    trailing: Option<T>,
}

impl<T> Default for RepaintScheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RepaintScheduler<T> {
    pub fn new() -> Self {
        Self {
            scheduled: None,
            trailing: None,
        }
    }

    /// Queues `payload`. Returns `true` when the caller must schedule a tick.
    pub fn request(&mut self, payload: T) -> bool {
        if self.scheduled.is_none() {
            self.scheduled = Some(payload);
            true
        } else {
            if self.trailing.replace(payload).is_some() {
                trace!("Superseded pending repaint");
            }
            false
        }
    }

    /// Takes the payload to paint on this tick.
    ///
    /// A trailing payload, if any, becomes the next scheduled one; check
    /// [`is_pending`](Self::is_pending) afterwards to know whether another tick
    /// is needed.
    pub fn on_tick(&mut self) -> Option<T> {
        let payload = self.scheduled.take();
        self.scheduled = self.trailing.take();
        payload
    }

    /// True while a tick is owed.
    pub fn is_pending(&self) -> bool {
        self.scheduled.is_some()
    }

    /// Drops everything pending.
    pub fn cancel(&mut self) {
        self.scheduled = None;
        self.trailing = None;
    }
}
