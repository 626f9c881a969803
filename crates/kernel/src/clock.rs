use std::time::Duration;

/// Timing for one rendered frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTime {
    /// Time since the first frame.
    pub elapsed: Duration,
    /// Time since the previous frame.
    pub delta: Duration,
    /// Frame counter, starting at 1.
    pub frame: u64,
}

/// Turns externally supplied timestamps into per-frame timing.
///
/// The render loop owns real time; the clock only sees the `now` values it
/// is handed, which keeps updates reproducible under a synthetic clock.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    start: Option<Duration>,
    last: Option<Duration>,
    frame: u64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame at timestamp `now`. Timestamps that go backwards
    /// produce a zero delta.
    pub fn tick(&mut self, now: Duration) -> FrameTime {
        let start = *self.start.get_or_insert(now);
        let delta = self
            .last
            .map(|last| now.saturating_sub(last))
            .unwrap_or(Duration::ZERO);
        self.last = Some(now.max(self.last.unwrap_or(now)));
        self.frame += 1;
        FrameTime {
            elapsed: now.saturating_sub(start),
            delta,
            frame: self.frame,
        }
    }

    pub fn frames(&self) -> u64 {
        self.frame
    }
}
