//! Round countdown
//!
//! Each arm bumps the epoch. Ticks carry the epoch they were scheduled
//! under, so ticks from a cancelled timer are dropped instead of counting
//! down the new round.

/// Result of feeding one tick to the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockTick {
    /// Tick from an old timer or a stopped clock
    Stale,
    /// Counted down, time remaining
    Running(i32),
    /// Hit zero on this tick; the clock is now stopped
    Expired,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameClock {
    pub time_left: i32,
    pub running: bool,
    pub epoch: u32,
}

impl GameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh countdown, invalidating any previous timer.
    /// Returns the epoch the new timer must tick with.
    pub fn arm(&mut self, time_limit: i32) -> u32 {
        self.epoch = self.epoch.wrapping_add(1);
        self.time_left = time_limit;
        self.running = true;
        self.epoch
    }

    pub fn tick(&mut self, epoch: u32) -> ClockTick {
        if !self.running || epoch != self.epoch {
            return ClockTick::Stale;
        }
        self.time_left -= 1;
        if self.time_left <= 0 {
            self.running = false;
            ClockTick::Expired
        } else {
            ClockTick::Running(self.time_left)
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}
