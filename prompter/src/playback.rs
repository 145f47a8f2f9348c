//! Auto-scroll state machine.
//!
//! The engine is pure: it never reads a clock. Callers pass the time elapsed
//! since the previous tick, which keeps every transition reproducible in
//! tests. [`crate::session::PrompterSession`] supplies real time.

use std::time::Duration;

use crate::settings::{SCROLL_SPEED_RANGE, TeleprompterSettings};
use crate::types::{PlaybackPhase, PlaybackState};

/// Target cadence of the tick loop (about 60 Hz).
pub const TICK_INTERVAL: Duration = Duration::from_millis(16);
/// Distance moved by one rewind or forward action.
pub const SEEK_STEP_PX: i64 = 500;
/// Offsets this close to a boundary count as being at it when playback starts.
pub const SNAP_TOLERANCE_PX: i64 = 1;
pub const SLOW_DOWN_FACTOR: f32 = 0.8;
pub const SPEED_UP_FACTOR: f32 = 1.2;
/// Slider value that maps to a speed factor of 1.
const BASELINE_SPEED: f64 = 30.0;

/// Result of a single tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing happened.
    Idle,
    /// Offset moved to the contained value.
    Advanced(i64),
    /// The offset was already at the terminal boundary; playback stopped.
    Finished,
}

/// Scroll direction derived from the vertical mirror flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Offset grows from 0 towards the maximum.
    Forward,
    /// Vertical mirror: offset shrinks from the maximum towards 0.
    Reverse,
}

#[derive(Debug, Clone)]
pub struct PlaybackEngine {
    offset: i64,
    max_offset: i64,
    phase: PlaybackPhase,
    scroll_speed: f32,
    acceleration: f32,
    mirror_horizontal: bool,
    mirror_vertical: bool,
}

impl Default for PlaybackEngine {
    fn default() -> Self {
        Self::new(&TeleprompterSettings::default())
    }
}

impl PlaybackEngine {
    /// A stopped engine at the start boundary. The content extent is unknown
    /// until [`Self::set_max_scroll_offset`] is called after layout.
    pub fn new(settings: &TeleprompterSettings) -> Self {
        let mut engine = Self {
            offset: 0,
            max_offset: 0,
            phase: PlaybackPhase::Stopped,
            scroll_speed: settings.scroll_speed,
            acceleration: settings.acceleration,
            mirror_horizontal: settings.is_mirror_mode,
            mirror_vertical: settings.is_vertical_mirror_mode,
        };
        engine.offset = engine.start_boundary();
        engine
    }

    pub fn state(&self) -> PlaybackState {
        PlaybackState {
            scroll_offset: self.offset,
            max_scroll_offset: self.max_offset,
            is_playing: self.is_playing(),
            scroll_speed: self.scroll_speed,
            acceleration: self.acceleration,
            mirror_horizontal: self.mirror_horizontal,
            mirror_vertical: self.mirror_vertical,
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn is_playing(&self) -> bool {
        self.phase == PlaybackPhase::Playing
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    pub fn max_scroll_offset(&self) -> i64 {
        self.max_offset
    }

    pub fn scroll_speed(&self) -> f32 {
        self.scroll_speed
    }

    pub fn direction(&self) -> Direction {
        if self.mirror_vertical {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    /// Fraction of the content scrolled past, in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.max_offset <= 0 {
            return 0.0;
        }
        (self.offset as f64 / self.max_offset as f64) as f32
    }

    /// Pixels per second actually applied: `(speed / 30)² × acceleration × 30`.
    pub fn effective_speed(&self) -> f64 {
        let speed = f64::from(self.scroll_speed);
        let accel = f64::from(self.acceleration);
        if !speed.is_finite() || !accel.is_finite() || speed <= 0.0 || accel <= 0.0 {
            return 0.0;
        }
        let factor = speed / BASELINE_SPEED;
        factor * factor * accel * BASELINE_SPEED
    }

    /// Pixels one tick of `elapsed` moves; never less than 1.
    pub fn scroll_amount(&self, elapsed: Duration) -> i64 {
        let px = (self.effective_speed() * elapsed.as_secs_f64()).floor();
        if px.is_finite() && px >= 1.0 {
            px.min(i64::MAX as f64) as i64
        } else {
            1
        }
    }

    /// Record the content extent once layout is known.
    ///
    /// A stopped engine still sitting at the start boundary follows it to the
    /// new extent, so a mirrored script opens at its first line.
    pub fn set_max_scroll_offset(&mut self, max: i64) {
        let at_start = self.offset == self.start_boundary();
        self.max_offset = max.max(0);
        if self.phase == PlaybackPhase::Stopped && at_start {
            self.offset = self.start_boundary();
        } else {
            self.offset = self.offset.clamp(0, self.max_offset);
        }
    }

    /// Start or resume. Returns `false` when already playing.
    pub fn play(&mut self) -> bool {
        if self.is_playing() {
            return false;
        }
        match self.direction() {
            Direction::Reverse if self.offset <= SNAP_TOLERANCE_PX => self.offset = self.max_offset,
            Direction::Forward if self.offset >= self.max_offset - SNAP_TOLERANCE_PX => self.offset = 0,
            _ => {}
        }
        tracing::debug!(offset = self.offset, max = self.max_offset, "playback started");
        self.phase = PlaybackPhase::Playing;
        true
    }

    /// Pause in place. Returns `false` when not playing.
    pub fn pause(&mut self) -> bool {
        if !self.is_playing() {
            return false;
        }
        self.phase = PlaybackPhase::Paused;
        true
    }

    /// Play when idle, pause when playing. Returns whether it is now playing.
    pub fn toggle(&mut self) -> bool {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
        self.is_playing()
    }

    /// Advance by the time elapsed since the previous tick.
    pub fn tick(&mut self, elapsed: Duration) -> TickOutcome {
        if !self.is_playing() {
            return TickOutcome::Idle;
        }
        if self.offset == self.terminal_boundary() {
            self.phase = PlaybackPhase::Stopped;
            tracing::debug!(offset = self.offset, "playback reached the end");
            return TickOutcome::Finished;
        }
        let amount = self.scroll_amount(elapsed);
        self.offset = match self.direction() {
            Direction::Forward => self.offset.saturating_add(amount).min(self.max_offset),
            Direction::Reverse => self.offset.saturating_sub(amount).max(0),
        };
        TickOutcome::Advanced(self.offset)
    }

    /// Move by `delta` pixels, clamped to the content. Valid in any phase.
    pub fn seek_by(&mut self, delta: i64) -> i64 {
        self.offset = self.offset.saturating_add(delta).clamp(0, self.max_offset);
        self.offset
    }

    /// Jump to an absolute offset, clamped to the content.
    pub fn seek_to(&mut self, offset: i64) -> i64 {
        self.offset = offset.clamp(0, self.max_offset);
        self.offset
    }

    pub fn rewind(&mut self) -> i64 {
        self.seek_by(-SEEK_STEP_PX)
    }

    pub fn forward(&mut self) -> i64 {
        self.seek_by(SEEK_STEP_PX)
    }

    /// Stop and return to where reading starts for the current direction.
    pub fn reset(&mut self) {
        self.phase = PlaybackPhase::Stopped;
        self.offset = self.start_boundary();
    }

    /// Multiply the speed by [`SLOW_DOWN_FACTOR`]. Returns the new speed.
    pub fn slow_down(&mut self) -> f32 {
        self.scale_speed(SLOW_DOWN_FACTOR)
    }

    /// Multiply the speed by [`SPEED_UP_FACTOR`]. Returns the new speed.
    pub fn speed_up(&mut self) -> f32 {
        self.scale_speed(SPEED_UP_FACTOR)
    }

    /// Take speed, acceleration and mirror flags from a settings snapshot.
    ///
    /// Flipping the vertical mirror snaps to the new start boundary.
    pub fn apply_settings(&mut self, settings: &TeleprompterSettings) {
        self.scroll_speed = settings.scroll_speed;
        self.acceleration = settings.acceleration;
        self.mirror_horizontal = settings.is_mirror_mode;
        self.set_mirror_vertical(settings.is_vertical_mirror_mode);
    }

    pub fn set_mirror_vertical(&mut self, mirrored: bool) {
        if mirrored == self.mirror_vertical {
            return;
        }
        self.mirror_vertical = mirrored;
        self.offset = self.start_boundary();
    }

    fn scale_speed(&mut self, factor: f32) -> f32 {
        let (lo, hi) = SCROLL_SPEED_RANGE;
        let base = if self.scroll_speed.is_finite() {
            self.scroll_speed
        } else {
            BASELINE_SPEED as f32
        };
        self.scroll_speed = (base * factor).clamp(lo, hi);
        self.scroll_speed
    }

    fn start_boundary(&self) -> i64 {
        match self.direction() {
            Direction::Forward => 0,
            Direction::Reverse => self.max_offset,
        }
    }

    fn terminal_boundary(&self) -> i64 {
        match self.direction() {
            Direction::Forward => self.max_offset,
            Direction::Reverse => 0,
        }
    }
}
