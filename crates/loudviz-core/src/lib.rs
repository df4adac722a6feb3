//! Signal processing, meter physics and rendering for the loudness visualizer.
//!
//! A frame of waveform samples arrives from the sensor on every sampling tick
//! and is folded into [`state::SimulationState`] by the processor of the
//! active [`engine::Mode`]. On every render tick the matching physics step
//! animates the state and [`render::render`] draws it onto a
//! [`render::Surface`].

pub mod config;
pub mod engine;
pub mod error;
pub mod level;
pub mod platform;
pub mod protocol;
pub mod render;
pub mod spectrum;
pub mod state;
pub mod transport;
