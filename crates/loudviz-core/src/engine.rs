//! ModeController: the state machine between transport, physics and renderer.
//!
//! The controller owns the only [`SimulationState`], the live [`VizConfig`]
//! and the connection session. It is driven by two independent clocks that
//! the front end schedules:
//!
//! - the sampling loop hands every fetched frame to [`ModeController::on_frame`]
//!   (or a failure to [`ModeController::on_fetch_error`]);
//! - the render loop calls [`ModeController::render_tick`] and then
//!   [`ModeController::render`] once per display refresh.
//!
//! Neither clock ever blocks the other. A session is opened by `connect()`;
//! its cancellation token lets in-flight fetches bail out the moment the
//! user disconnects, and its id lets the controller drop any frame that was
//! already on its way back.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::config::{Cycle, VizConfig};
use crate::error::TransportError;
use crate::level::{self, Stereo};
use crate::protocol::SampleFrame;
use crate::render::{self, Palette, Scene, Surface};
use crate::spectrum;
use crate::state::SimulationState;

/// Longest physics step taken after a stall (suspended terminal, slow draw).
pub const MAX_TICK_SECS: f32 = 0.5;

/// Active visualization. Each mode pairs one processor with one physics
/// step; switching modes swaps both together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Spectrum,
    #[default]
    Vu,
}

impl Mode {
    pub fn label(self) -> &'static str {
        match self {
            Mode::Spectrum => "SPECTRUM",
            Mode::Vu => "VU METER",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Mode::Spectrum => Mode::Vu,
            Mode::Vu => Mode::Spectrum,
        }
    }

    /// Fold a frame into `state`. Returns `false` if the frame was unusable.
    pub fn process(
        self,
        state: &mut SimulationState,
        frame: &SampleFrame,
        config: &VizConfig,
        rng: &mut StdRng,
    ) -> bool {
        match self {
            Mode::Spectrum => spectrum::process_frame(&mut state.bands, frame, config.gain),
            Mode::Vu => {
                let stereo = Stereo {
                    enabled: config.stereo_sim,
                    noise: config.stereo_noise,
                };
                let SimulationState { left, right, .. } = state;
                level::process_frame(left, right, frame, config.gain, stereo, rng);
                true
            }
        }
    }

    /// Advance the physics of this mode by `dt` seconds.
    pub fn step(self, state: &mut SimulationState, dt: f32, config: &VizConfig) {
        match self {
            Mode::Spectrum => spectrum::step(&mut state.bands, dt, config.decay),
            Mode::Vu => {
                let SimulationState { left, right, .. } = state;
                level::step(left, right, dt, config.decay);
            }
        }
    }

    /// Configuration controls that apply to this mode.
    pub fn controls(self) -> &'static [Control] {
        match self {
            Mode::Spectrum => &[
                Control::SpectrumStyle,
                Control::Gain,
                Control::Decay,
                Control::Theme,
            ],
            Mode::Vu => &[
                Control::VuStyle,
                Control::StereoSim,
                Control::StereoNoise,
                Control::Gain,
                Control::Decay,
                Control::Theme,
            ],
        }
    }
}

impl Cycle for Mode {
    const ALL: &'static [Self] = &[Mode::Spectrum, Mode::Vu];
}

/// Tri-state connection indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionStatus {
    #[default]
    Idle,
    Connected,
    Error,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Idle => "idle",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        }
    }
}

/// A user-adjustable setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    SpectrumStyle,
    VuStyle,
    StereoSim,
    StereoNoise,
    Gain,
    Decay,
    Theme,
}

impl Control {
    pub fn label(self) -> &'static str {
        match self {
            Control::SpectrumStyle => "Mode",
            Control::VuStyle => "Style",
            Control::StereoSim => "Stereo Sim",
            Control::StereoNoise => "Noise",
            Control::Gain => "Gain",
            Control::Decay => "Decay",
            Control::Theme => "Theme",
        }
    }

    /// Current value of this control, formatted for display.
    pub fn value(self, config: &VizConfig) -> &'static str {
        match self {
            Control::SpectrumStyle => config.spectrum_style.label(),
            Control::VuStyle => config.vu_style.label(),
            Control::StereoSim => {
                if config.stereo_sim {
                    "on"
                } else {
                    "off"
                }
            }
            Control::StereoNoise => config.stereo_noise.label(),
            Control::Gain => config.gain.label(),
            Control::Decay => config.decay.label(),
            Control::Theme => config.theme.label(),
        }
    }

    /// Step this control forward or back through its options.
    fn adjust(self, config: &mut VizConfig, forward: bool) {
        fn turn<T: Cycle>(v: T, forward: bool) -> T {
            if forward {
                v.next()
            } else {
                v.prev()
            }
        }
        match self {
            Control::SpectrumStyle => config.spectrum_style = turn(config.spectrum_style, forward),
            Control::VuStyle => config.vu_style = turn(config.vu_style, forward),
            Control::StereoSim => config.stereo_sim = !config.stereo_sim,
            Control::StereoNoise => config.stereo_noise = turn(config.stereo_noise, forward),
            Control::Gain => config.gain = turn(config.gain, forward),
            Control::Decay => config.decay = turn(config.decay, forward),
            Control::Theme => config.theme = turn(config.theme, forward),
        }
    }
}

/// Handle to one connected session, given to the sampling loop.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    pub id: u64,
    pub token: CancellationToken,
}

/// Measures elapsed time between render ticks.
#[derive(Debug, Default)]
struct RenderClock {
    last: Option<Instant>,
}

impl RenderClock {
    /// Seconds since the previous tick; 0 on the first tick.
    fn tick(&mut self, now: Instant) -> f32 {
        let dt = match self.last {
            Some(last) => now.saturating_duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last = Some(now);
        dt.min(MAX_TICK_SECS)
    }

    fn reset(&mut self) {
        self.last = None;
    }
}

/// Frames rendered per wall-clock second.
#[derive(Debug, Default)]
struct FpsCounter {
    frames: u32,
    window_start: Option<Instant>,
    fps: u32,
}

impl FpsCounter {
    fn frame(&mut self, now: Instant) {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;
        if now.saturating_duration_since(start) >= Duration::from_secs(1) {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = Some(now);
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

pub struct ModeController {
    mode: Mode,
    config: VizConfig,
    state: SimulationState,
    status: ConnectionStatus,
    session: Option<SessionHandle>,
    next_session_id: u64,
    clock: RenderClock,
    fps: FpsCounter,
    rng: StdRng,
}

impl ModeController {
    pub fn new(mode: Mode, config: VizConfig) -> Self {
        Self::with_rng(mode, config, StdRng::from_entropy())
    }

    /// Build with a fixed jitter source (deterministic stereo simulation).
    pub fn with_rng(mode: Mode, config: VizConfig, rng: StdRng) -> Self {
        Self {
            mode,
            config,
            state: SimulationState::default(),
            status: ConnectionStatus::Idle,
            session: None,
            next_session_id: 1,
            clock: RenderClock::default(),
            fps: FpsCounter::default(),
            rng,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &VizConfig {
        &self.config
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    pub fn palette(&self) -> &'static Palette {
        Palette::for_theme(self.config.theme)
    }

    /// Controls the front end should currently offer.
    pub fn exposed_controls(&self) -> &'static [Control] {
        self.mode.controls()
    }

    // ── User input ───────────────────────────────────────────────────────────

    /// Switch the active mode: zero all state and clear the surface.
    pub fn select_mode(&mut self, mode: Mode, surface: &mut impl Surface) {
        if mode == self.mode {
            return;
        }
        info!("mode: {} -> {}", self.mode.label(), mode.label());
        self.mode = mode;
        self.state.reset();
        surface.clear(self.palette().background);
    }

    /// Step a control. Controls the active mode does not expose are ignored
    /// and `false` is returned.
    pub fn adjust(&mut self, control: Control, forward: bool) -> bool {
        if !self.exposed_controls().contains(&control) {
            return false;
        }
        control.adjust(&mut self.config, forward);
        debug!("{} = {}", control.label(), control.value(&self.config));
        true
    }

    // ── Connection lifecycle ─────────────────────────────────────────────────

    /// Open a new session. Any previous session is cancelled first.
    pub fn connect(&mut self) -> SessionHandle {
        if let Some(old) = self.session.take() {
            old.token.cancel();
        }
        let handle = SessionHandle {
            id: self.next_session_id,
            token: CancellationToken::new(),
        };
        self.next_session_id += 1;
        self.state.reset();
        self.clock.reset();
        self.fps.reset();
        self.status = ConnectionStatus::Connected;
        self.session = Some(handle.clone());
        info!("connected (session {})", handle.id);
        handle
    }

    /// Cancel the session and zero everything synchronously.
    pub fn disconnect(&mut self) {
        if let Some(session) = self.session.take() {
            session.token.cancel();
            info!("disconnected (session {})", session.id);
        }
        self.state.reset();
        self.clock.reset();
        self.fps.reset();
        self.status = ConnectionStatus::Idle;
    }

    /// Returns the new session when this call connected.
    pub fn toggle_connection(&mut self) -> Option<SessionHandle> {
        if self.is_connected() {
            self.disconnect();
            None
        } else {
            Some(self.connect())
        }
    }

    fn is_current(&self, session_id: u64) -> bool {
        self.session.as_ref().is_some_and(|s| s.id == session_id)
    }

    // ── Sampling loop ────────────────────────────────────────────────────────

    /// Route a fetched frame to the active processor. Frames from a stale
    /// session (or arriving after disconnect) are dropped; returns whether
    /// the frame was applied.
    pub fn on_frame(&mut self, session_id: u64, frame: &SampleFrame) -> bool {
        if !self.is_current(session_id) {
            trace!("dropping frame from stale session {}", session_id);
            return false;
        }
        let applied = self
            .mode
            .process(&mut self.state, frame, &self.config, &mut self.rng);
        if applied {
            self.status = ConnectionStatus::Connected;
            trace!("frame: {} samples", frame.len());
        } else {
            debug!("ignored frame with {} samples", frame.len());
        }
        applied
    }

    /// Record a failed fetch. State stays as it was.
    pub fn on_fetch_error(&mut self, session_id: u64, err: &TransportError) {
        if !self.is_current(session_id) {
            return;
        }
        warn!("fetch failed: {}", err);
        self.status = ConnectionStatus::Error;
    }

    // ── Render loop ──────────────────────────────────────────────────────────

    /// Run one physics step. Returns the step length, or `None` once
    /// disconnected, which ends the render loop.
    pub fn render_tick(&mut self, now: Instant) -> Option<f32> {
        if !self.is_connected() {
            return None;
        }
        let dt = self.clock.tick(now);
        self.mode.step(&mut self.state, dt, &self.config);
        self.fps.frame(now);
        Some(dt)
    }

    /// Draw the current state. Pure with respect to the controller.
    pub fn render(&self, surface: &mut impl Surface) {
        let scene = Scene {
            state: &self.state,
            mode: self.mode,
            spectrum_style: self.config.spectrum_style,
            vu_style: self.config.vu_style,
            palette: self.palette(),
        };
        render::render(surface, &scene);
    }
}
