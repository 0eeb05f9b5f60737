use std::time::{Duration, Instant};

/// Measures whole milliseconds between ticks.
///
/// Only whole milliseconds are handed out; the fractional remainder stays on
/// the clock and is paid out on a later tick, so the sum of deltas tracks
/// wall time exactly.
#[derive(Clone, Copy, Debug)]
pub struct FrameClock {
    last: Instant,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self { last: start }
    }

    pub fn delta_ms(&mut self) -> u64 {
        self.delta_ms_at(Instant::now())
    }

    /// Milliseconds elapsed up to `now`.  A `now` earlier than the last
    /// reading yields zero.
    pub fn delta_ms_at(&mut self, now: Instant) -> u64 {
        let elapsed = now.saturating_duration_since(self.last);
        let ms = elapsed.as_millis() as u64;
        self.last += Duration::from_millis(ms);
        ms
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
