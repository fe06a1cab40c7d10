//! Year playback.
//!
//! The displayed year can auto-advance on a timer. `Playback` is the state
//! behind that timer: the caller schedules ticks every [`Playback::tick_interval`]
//! while [`Playback::is_playing`] holds, and drops the timer as soon as a
//! tick reports [`TickResult::Finished`] or playback is paused.

use gta_utils::years::YearRange;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Tick period at 1x speed.
pub const BASE_TICK: Duration = Duration::from_millis(600);
pub const MIN_SPEED: f64 = 0.5;
pub const MAX_SPEED: f64 = 3.0;
/// Increment used by [`Playback::cycle_speed`].
pub const SPEED_STEP: f64 = 0.5;

/// Result of one timer tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Not playing; nothing changed.
    Idle,
    /// Moved to the contained year.
    Advanced(i32),
    /// Reached the last year and stopped; the timer must be cancelled.
    Finished(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playback {
    range: YearRange,
    current_year: i32,
    playing: bool,
    speed: f64,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(YearRange::default())
    }
}

impl Playback {
    /// Paused at the first year of `range`, 1x speed.
    pub fn new(range: YearRange) -> Self {
        Self {
            range,
            current_year: range.min(),
            playing: false,
            speed: 1.0,
        }
    }

    pub fn current_year(&self) -> i32 {
        self.current_year
    }

    pub fn range(&self) -> YearRange {
        self.range
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Start advancing. Starting at the last year rewinds first, so play
    /// always has somewhere to go.
    pub fn play(&mut self) {
        if self.current_year >= self.range.max() {
            self.current_year = self.range.min();
        }
        self.playing = true;
        log::debug!("[GTA] playback: play from {}", self.current_year);
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Pause and rewind to the first year.
    pub fn stop(&mut self) {
        self.playing = false;
        self.current_year = self.range.min();
    }

    pub fn toggle(&mut self) {
        if self.playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Jump to a year, clamped into the range. Reaching the last year
    /// while playing stops playback.
    pub fn set_year(&mut self, year: i32) -> i32 {
        self.current_year = self.range.clamp(year);
        if self.current_year >= self.range.max() {
            self.playing = false;
        }
        self.current_year
    }

    /// Step forward one year (clamped) without affecting play state.
    pub fn next_year(&mut self) -> i32 {
        self.current_year = self.range.clamp(self.current_year + 1);
        self.current_year
    }

    /// Step back one year (clamped).
    pub fn prev_year(&mut self) -> i32 {
        self.current_year = self.range.clamp(self.current_year - 1);
        self.current_year
    }

    /// Set the speed multiplier, clamped to `[MIN_SPEED, MAX_SPEED]`.
    /// Non-finite input leaves the speed unchanged.
    pub fn set_speed(&mut self, speed: f64) -> f64 {
        if speed.is_finite() {
            self.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
        }
        self.speed
    }

    /// Step the speed up by [`SPEED_STEP`], wrapping back to 1x past the max.
    pub fn cycle_speed(&mut self) -> f64 {
        let next = if self.speed >= MAX_SPEED {
            1.0
        } else {
            self.speed + SPEED_STEP
        };
        self.set_speed(next)
    }

    /// Delay between ticks at the current speed.
    pub fn tick_interval(&self) -> Duration {
        let millis = BASE_TICK.as_millis() as f64 / self.speed;
        Duration::from_millis(millis.round() as u64)
    }

    /// Advance one year if playing.
    pub fn tick(&mut self) -> TickResult {
        if !self.playing {
            return TickResult::Idle;
        }
        let year = self.next_year();
        if year >= self.range.max() {
            self.playing = false;
            log::debug!("[GTA] playback: reached {}, stopping", year);
            return TickResult::Finished(year);
        }
        TickResult::Advanced(year)
    }
}
