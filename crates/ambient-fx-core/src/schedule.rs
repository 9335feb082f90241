//! Scheduling ports and a deterministic in-memory host.
//!
//! Both widgets are single-threaded and cooperative: the field re-arms one
//! frame callback per frame, the typewriter arms one delay timer per
//! transition. Handles are plain ids so a stale delivery can be recognised
//! and ignored.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Shared stop flag for one animation session. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Rc<Cell<bool>>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.get()
    }
}

/// Per-refresh callbacks and viewport resize notifications.
///
/// `None` from a request means the host cannot schedule; the caller stops.
pub trait FrameHost {
    fn request_frame(&mut self) -> Option<FrameId>;
    fn cancel_frame(&mut self, id: FrameId);
    fn watch_resize(&mut self) -> Option<ListenerId>;
    fn unwatch_resize(&mut self, id: ListenerId);
}

/// One-shot delay timers.
pub trait TimerHost {
    fn set_timeout(&mut self, delay_ms: u32) -> Option<TimerId>;
    fn clear_timeout(&mut self, id: TimerId);
}

#[derive(Clone, Copy, Debug)]
struct PendingTimer {
    due_ms: u64,
    id: TimerId,
}

/// Virtual-clock host. Frames are queued until taken, timers fire in due
/// order (ties in arming order) when the clock is advanced.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now_ms: u64,
    next_id: u64,
    timers: Vec<PendingTimer>,
    frames: Vec<FrameId>,
    listeners: Vec<ListenerId>,
    /// Every timer ever armed, in order, with its delay.
    pub timer_log: Vec<(TimerId, u32)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    pub fn active_listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    /// Dequeue the oldest requested frame.
    pub fn take_frame(&mut self) -> Option<FrameId> {
        if self.frames.is_empty() {
            None
        } else {
            Some(self.frames.remove(0))
        }
    }

    /// Move the clock forward by `ms`, handing each timer that comes due to
    /// `fire` together with the scheduler so it can arm the next one.
    /// Timers armed during the advance fire too if they fall inside it.
    pub fn advance_by<F>(&mut self, ms: u64, mut fire: F)
    where
        F: FnMut(TimerId, &mut ManualScheduler),
    {
        let until = self.now_ms.saturating_add(ms);
        while let Some(id) = self.pop_due(until) {
            fire(id, self);
        }
        self.now_ms = until;
    }

    fn pop_due(&mut self, until: u64) -> Option<TimerId> {
        let (index, timer) = self
            .timers
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until)
            .min_by_key(|(_, t)| (t.due_ms, t.id))?;
        self.timers.remove(index);
        self.now_ms = timer.due_ms;
        Some(timer.id)
    }

    fn next(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }
}

impl FrameHost for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameId> {
        let id = FrameId(self.next());
        self.frames.push(id);
        Some(id)
    }

    fn cancel_frame(&mut self, id: FrameId) {
        self.frames.retain(|f| *f != id);
    }

    fn watch_resize(&mut self) -> Option<ListenerId> {
        let id = ListenerId(self.next());
        self.listeners.push(id);
        Some(id)
    }

    fn unwatch_resize(&mut self, id: ListenerId) {
        self.listeners.retain(|l| *l != id);
    }
}

impl TimerHost for ManualScheduler {
    fn set_timeout(&mut self, delay_ms: u32) -> Option<TimerId> {
        let id = TimerId(self.next());
        self.timers.push(PendingTimer {
            due_ms: self.now_ms + u64::from(delay_ms),
            id,
        });
        self.timer_log.push((id, delay_ms));
        Some(id)
    }

    fn clear_timeout(&mut self, id: TimerId) {
        self.timers.retain(|t| t.id != id);
    }
}
