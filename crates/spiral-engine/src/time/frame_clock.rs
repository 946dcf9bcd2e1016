use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Clamped seconds since the previous tick.
    pub dt: f32,

    /// Sum of all clamped `dt` values so far, in seconds.
    ///
    /// Animation driven by this value pauses while the viewer stalls instead
    /// of jumping ahead.
    pub elapsed: f32,

    /// Monotonic timestamp taken at the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Produces `FrameTime` snapshots with clamped delta time.
///
/// Delta time is clamped so a debugger pause or a minimized window does not
/// produce a huge step.
#[derive(Debug, Clone)]
pub struct FrameClock {
    last: Instant,
    elapsed: f32,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    /// Creates a clock clamping `dt` to `[100µs, 250ms]`.
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            last: Instant::now(),
            elapsed: 0.0,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    /// Advances the clock.
    pub fn tick(&mut self) -> FrameTime {
        let now = Instant::now();
        self.tick_at(now)
    }

    fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max)
            .as_secs_f32();

        self.last = now;
        self.elapsed += dt;

        let ft = FrameTime {
            dt,
            elapsed: self.elapsed,
            now,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clock() -> FrameClock {
        FrameClock::with_clamps(Duration::from_millis(1), Duration::from_millis(100))
    }

    #[test]
    fn frame_index_counts_ticks() {
        let mut c = clock();
        let base = c.last;
        assert_eq!(c.tick_at(base).frame_index, 0);
        assert_eq!(c.tick_at(base).frame_index, 1);
        assert_eq!(c.tick_at(base).frame_index, 2);
    }

    #[test]
    fn dt_clamped_to_min() {
        let mut c = clock();
        let base = c.last;
        let ft = c.tick_at(base);
        assert!((ft.dt - 0.001).abs() < 1e-6);
    }

    #[test]
    fn dt_clamped_to_max_after_stall() {
        let mut c = clock();
        let base = c.last;
        let ft = c.tick_at(base + Duration::from_secs(5));
        assert!((ft.dt - 0.1).abs() < 1e-6);
    }

    #[test]
    fn elapsed_accumulates_clamped_dt() {
        let mut c = clock();
        let base = c.last;
        c.tick_at(base + Duration::from_millis(20));
        let ft = c.tick_at(base + Duration::from_millis(50));
        assert!((ft.elapsed - 0.05).abs() < 1e-5);
    }

    #[test]
    fn clock_going_backwards_counts_as_min() {
        let mut c = clock();
        let base = c.last;
        c.tick_at(base + Duration::from_millis(10));
        let ft = c.tick_at(base);
        assert!((ft.dt - 0.001).abs() < 1e-6);
    }
}
