//! Synthetic signal: a few tones whose pitch and level wander, plus noise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::TAU;

/// Samples are clamped to the signed 16-bit range.
pub const FULL_SCALE: f32 = i16::MAX as f32;

const NOISE_AMPLITUDE: f32 = 120.0;

#[derive(Debug, Clone)]
struct Tone {
    /// Cycles per frame.
    cycles: f32,
    amplitude: f32,
    phase: f32,
}

pub struct Synth {
    frame_len: usize,
    tones: Vec<Tone>,
    rng: StdRng,
}

impl Synth {
    pub fn new(frame_len: usize) -> Self {
        Self::with_rng(frame_len, StdRng::from_entropy())
    }

    pub fn with_rng(frame_len: usize, rng: StdRng) -> Self {
        let tones = [(3.0, 900.0), (11.0, 500.0), (27.0, 260.0), (48.0, 150.0)]
            .into_iter()
            .map(|(cycles, amplitude)| Tone {
                cycles,
                amplitude,
                phase: 0.0,
            })
            .collect();
        Self {
            frame_len: frame_len.max(2),
            tones,
            rng,
        }
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    /// Produce one frame and let every tone drift a little.
    pub fn next_frame(&mut self) -> Vec<f32> {
        let len = self.frame_len as f32;
        let mut out = Vec::with_capacity(self.frame_len);
        for n in 0..self.frame_len {
            let t = n as f32 / len;
            let mut value: f32 = self
                .tones
                .iter()
                .map(|tone| tone.amplitude * (TAU * tone.cycles * t + tone.phase).sin())
                .sum();
            value += self.rng.gen_range(-NOISE_AMPLITUDE..=NOISE_AMPLITUDE);
            out.push(value.clamp(-FULL_SCALE, FULL_SCALE).round());
        }
        self.drift();
        out
    }

    fn drift(&mut self) {
        let nyquist = (self.frame_len as f32 / 2.0 - 1.0).max(1.0);
        for tone in &mut self.tones {
            tone.phase = (tone.phase + TAU * tone.cycles) % TAU;
            tone.cycles = (tone.cycles + self.rng.gen_range(-0.5..=0.5)).clamp(1.0, nyquist);
            let level = tone.amplitude * self.rng.gen_range(0.85..=1.15);
            tone.amplitude = level.clamp(40.0, 4000.0);
        }
    }
}
