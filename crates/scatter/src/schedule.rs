use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Rate cap and interleaving for particle updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePolicy {
    /// Minimum wall-clock time between two accepted ticks.
    pub min_interval: Duration,
    /// Slots are split into this many interleaved subsets; one subset ticks
    /// per accepted tick.
    pub stride: usize,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self {
            min_interval: Duration::from_millis(32),
            stride: 2,
        }
    }
}

/// Which slots tick: those with `slot % stride == phase % stride`. A zero
/// stride acts as one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickSelection {
    pub stride: usize,
    pub phase: usize,
}

impl TickSelection {
    /// Every slot.
    pub const ALL: Self = Self {
        stride: 1,
        phase: 0,
    };

    pub fn includes(&self, slot: usize) -> bool {
        let (stride, phase) = self.normalized();
        slot % stride == phase
    }

    /// Selected slots below `len`, ascending.
    pub fn slots(&self, len: usize) -> impl Iterator<Item = usize> {
        let (stride, phase) = self.normalized();
        (phase..len).step_by(stride)
    }

    fn normalized(&self) -> (usize, usize) {
        let stride = self.stride.max(1);
        (stride, self.phase % stride)
    }
}

/// Decides, per render frame, whether particles tick and which subset.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    policy: UpdatePolicy,
    last_tick: Option<Duration>,
    accepted: u64,
    skipped: u64,
}

impl FrameScheduler {
    pub fn new(policy: UpdatePolicy) -> Self {
        Self {
            policy,
            last_tick: None,
            accepted: 0,
            skipped: 0,
        }
    }

    pub fn policy(&self) -> &UpdatePolicy {
        &self.policy
    }

    /// `now` is time since session start. The first poll always ticks.
    pub fn poll(&mut self, now: Duration) -> Option<TickSelection> {
        if let Some(last) = self.last_tick {
            if now.saturating_sub(last) < self.policy.min_interval {
                self.skipped += 1;
                return None;
            }
        }
        self.last_tick = Some(now);
        self.accepted += 1;

        let stride = self.policy.stride.max(1);
        let period = self.policy.min_interval.as_millis().max(1);
        let phase = ((now.as_millis() / period) % stride as u128) as usize;
        Some(TickSelection { stride, phase })
    }

    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

/// Ring buffer of recent tick durations.
#[derive(Debug)]
pub struct FrameTimer {
    history: Vec<Duration>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl FrameTimer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            history: vec![Duration::ZERO; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, dt: Duration) {
        self.history[self.index] = dt;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn recorded(&self) -> &[Duration] {
        &self.history[..self.count()]
    }

    pub fn average(&self) -> Duration {
        let recorded = self.recorded();
        if recorded.is_empty() {
            return Duration::ZERO;
        }
        recorded.iter().sum::<Duration>() / recorded.len() as u32
    }

    pub fn max(&self) -> Duration {
        self.recorded().iter().copied().max().unwrap_or(Duration::ZERO)
    }

    pub fn min(&self) -> Duration {
        self.recorded().iter().copied().min().unwrap_or(Duration::ZERO)
    }

    pub fn count(&self) -> usize {
        if self.filled { self.capacity } else { self.index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn policy_defaults() {
        let p = UpdatePolicy::default();
        assert_eq!(p.min_interval, ms(32));
        assert_eq!(p.stride, 2);
    }

    #[test]
    fn rate_cap_skips_early_frames() {
        let mut s = FrameScheduler::new(UpdatePolicy::default());
        assert!(s.poll(ms(0)).is_some());
        assert!(s.poll(ms(16)).is_none());
        assert!(s.poll(ms(31)).is_none());
        assert!(s.poll(ms(32)).is_some());
        assert!(s.poll(ms(40)).is_none());
        assert_eq!(s.accepted(), 2);
        assert_eq!(s.skipped(), 3);
    }

    #[test]
    fn phase_alternates_with_wall_clock() {
        let mut s = FrameScheduler::new(UpdatePolicy::default());
        let phases: Vec<usize> = [0, 40, 80, 120, 160]
            .into_iter()
            .filter_map(|t| s.poll(ms(t)))
            .map(|sel| sel.phase)
            .collect();
        assert_eq!(phases, vec![0, 1, 0, 1, 1]);
    }

    #[test]
    fn stride_one_selects_everything() {
        let mut s = FrameScheduler::new(UpdatePolicy {
            min_interval: ms(10),
            stride: 1,
        });
        let sel = s.poll(ms(123)).unwrap();
        assert_eq!(sel, TickSelection::ALL);
        assert_eq!(sel.slots(4).collect::<Vec<_>>(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn selection_partitions_slots() {
        let even = TickSelection { stride: 2, phase: 0 };
        let odd = TickSelection { stride: 2, phase: 1 };
        assert_eq!(even.slots(5).collect::<Vec<_>>(), vec![0, 2, 4]);
        assert_eq!(odd.slots(5).collect::<Vec<_>>(), vec![1, 3]);
        assert!(odd.includes(3) && !odd.includes(4));
        assert_eq!(odd.slots(0).count(), 0);
    }

    #[test]
    fn oversized_phase_wraps_into_stride() {
        let wide = TickSelection { stride: 2, phase: 3 };
        let slots: Vec<usize> = wide.slots(8).collect();
        assert_eq!(slots, vec![1, 3, 5, 7]);
        assert!(slots.iter().all(|&slot| wide.includes(slot)));
        assert!(!wide.includes(0));

        let zero_stride = TickSelection { stride: 0, phase: 5 };
        assert_eq!(zero_stride.slots(3).count(), 3);
        assert!((0..3).all(|slot| zero_stride.includes(slot)));
    }

    #[test]
    fn frame_timer_tracks_history() {
        let mut timer = FrameTimer::new(3);
        timer.record(ms(10));
        timer.record(ms(20));
        timer.record(ms(30));

        assert_eq!(timer.count(), 3);
        assert_eq!(timer.average(), ms(20));
        assert_eq!(timer.max(), ms(30));
        assert_eq!(timer.min(), ms(10));
    }

    #[test]
    fn frame_timer_wraps_around() {
        let mut timer = FrameTimer::new(2);
        timer.record(ms(10));
        timer.record(ms(20));
        timer.record(ms(30)); // overwrites first

        assert_eq!(timer.count(), 2);
        assert_eq!(timer.average(), ms(25));
    }

    #[test]
    fn empty_timer_reports_zero() {
        let timer = FrameTimer::new(0);
        assert_eq!(timer.count(), 0);
        assert_eq!(timer.average(), Duration::ZERO);
        assert_eq!(timer.max(), Duration::ZERO);
    }
}
