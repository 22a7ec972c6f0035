/// Cancellable one-second countdown owned by a typing session.
///
/// The session arms it on every entry into Running and cancels it on every
/// exit, so at most one countdown is live per session and tick events that
/// arrive after a transition are inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    duration_secs: u64,
    remaining_secs: u64,
    armed: bool,
}

impl Countdown {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            remaining_secs: duration_secs,
            armed: false,
        }
    }

    pub fn duration(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining(&self) -> u64 {
        self.remaining_secs
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Idempotent: arming an armed countdown changes nothing.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Idempotent: cancelling a disarmed countdown is a no-op, not an error.
    pub fn cancel(&mut self) {
        self.armed = false;
    }

    /// Restore the full duration and disarm.
    pub fn reset(&mut self) {
        self.remaining_secs = self.duration_secs;
        self.armed = false;
    }

    /// Advance one second. Returns the new remaining time, or `None` when
    /// disarmed (an orphaned tick must not mutate anything). Clamps at zero.
    pub fn tick(&mut self) -> Option<u64> {
        if !self.armed {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        Some(self.remaining_secs)
    }
}
