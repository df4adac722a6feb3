//! Simulation state shared by the processors, physics and renderer.
//!
//! Only [`crate::engine::ModeController`] owns a [`SimulationState`]; every
//! other stage borrows it for the duration of one call.

/// Number of spectrum bands.
pub const BAND_COUNT: usize = 64;

/// Upper bound of a VU level (+3 VU headroom above unity).
pub const LEVEL_MAX: f32 = 1.2;

/// Seconds a peak marker stays frozen after being raised.
pub const PEAK_HOLD_SECS: f32 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandState {
    /// Current magnitude, 0..=1.
    pub value: f32,
    /// Peak marker, never below `value` after a physics tick.
    pub peak: f32,
    /// Remaining freeze time of the peak marker in seconds.
    pub peak_hold_remaining: f32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelState {
    /// Displayed level, 0..=LEVEL_MAX.
    pub current: f32,
    /// Level the meter is seeking, from the latest processed frame.
    pub target: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulationState {
    pub bands: [BandState; BAND_COUNT],
    pub left: LevelState,
    pub right: LevelState,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            bands: [BandState::default(); BAND_COUNT],
            left: LevelState::default(),
            right: LevelState::default(),
        }
    }
}

impl SimulationState {
    /// Zero every band and both channels.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_silent(&self) -> bool {
        self.bands.iter().all(|b| b.value == 0.0 && b.peak == 0.0)
            && self.left.current == 0.0
            && self.right.current == 0.0
    }
}
