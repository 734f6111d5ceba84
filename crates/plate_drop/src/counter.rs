use crate::core::config::COUNTER_MAX;

/// Session points counter. Only ever moves up, one step per tick, and freezes
/// at its maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreCounter {
    value: u32,
    max: u32,
}

impl ScoreCounter {
    pub const fn new(max: u32) -> Self {
        Self { value: 0, max }
    }

    /// Returns `true` when the counter moved.
    pub const fn tick(&mut self) -> bool {
        if self.value < self.max {
            self.value += 1;
            true
        } else {
            false
        }
    }

    pub const fn value(&self) -> u32 {
        self.value
    }

    pub const fn is_saturated(&self) -> bool {
        self.value >= self.max
    }

    pub const fn reset(&mut self) {
        self.value = 0;
    }
}

impl Default for ScoreCounter {
    fn default() -> Self {
        Self::new(COUNTER_MAX)
    }
}
