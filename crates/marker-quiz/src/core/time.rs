/// Repeating countdown tick driven by variable frame time.
/// Converts frame deltas into whole ticks of `interval` seconds while running.
pub struct TickClock {
    /// Length of one tick in seconds.
    interval: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
    running: bool,
}

/// Upper bound on ticks delivered by a single frame (e.g. after a backgrounded tab).
const MAX_TICKS_PER_FRAME: u32 = 10;

impl TickClock {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulator: 0.0,
            running: false,
        }
    }

    /// Start ticking from a clean accumulator. Restarting clears any partial tick.
    pub fn start(&mut self) {
        self.accumulator = 0.0;
        self.running = true;
    }

    /// Stop ticking and drop any partial tick.
    pub fn stop(&mut self) {
        self.accumulator = 0.0;
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Add frame time. Returns the number of whole ticks elapsed.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !self.running || frame_dt <= 0.0 {
            return 0;
        }
        self.accumulator += frame_dt;
        self.accumulator = self.accumulator.min(self.interval * MAX_TICKS_PER_FRAME as f32);
        let ticks = (self.accumulator / self.interval) as u32;
        self.accumulator -= ticks as f32 * self.interval;
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_clock_never_ticks() {
        let mut clock = TickClock::new(1.0);
        assert_eq!(clock.accumulate(5.0), 0);
    }

    #[test]
    fn one_tick_per_interval() {
        let mut clock = TickClock::new(1.0);
        clock.start();
        assert_eq!(clock.accumulate(1.0), 1);
        assert_eq!(clock.accumulate(0.5), 0);
        assert_eq!(clock.accumulate(0.5), 1);
    }

    #[test]
    fn accumulates_partial_frames() {
        let mut clock = TickClock::new(1.0);
        clock.start();
        for _ in 0..3 {
            assert_eq!(clock.accumulate(0.25), 0);
        }
        assert_eq!(clock.accumulate(0.25), 1);
    }

    #[test]
    fn stop_discards_partial_tick() {
        let mut clock = TickClock::new(1.0);
        clock.start();
        clock.accumulate(0.75);
        clock.stop();
        clock.start();
        assert_eq!(clock.accumulate(0.5), 0);
        assert_eq!(clock.accumulate(0.5), 1);
    }

    #[test]
    fn caps_ticks_per_frame() {
        let mut clock = TickClock::new(1.0);
        clock.start();
        assert_eq!(clock.accumulate(60.0), 10);
    }
}
