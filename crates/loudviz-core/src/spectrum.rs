//! Spectrum mode: per-band magnitude estimation and bar physics.
//!
//! Each band correlates the Hann-windowed frame against a single DFT bin.
//! The bin mapping `floor((k + 1) * 1.5)` and the 2000 sensitivity divisor
//! are tuned by eye against the sensor's output and must stay as they are
//! for the display to look the way it does.

use std::f64::consts::PI;

use crate::config::{DecayProfile, Gain};
use crate::protocol::SampleFrame;
use crate::state::{BandState, BAND_COUNT, PEAK_HOLD_SECS};

/// Magnitude (after gain) that maps to a full-height bar.
pub const SENSITIVITY: f64 = 2000.0;

/// Bars below this are snapped to zero.
const VALUE_FLOOR: f32 = 0.01;

/// Peak fall speed once the hold expires, in units per second.
const PEAK_GRAVITY: f32 = 0.5;

/// DFT bin evaluated for band `k`.
pub fn freq_index(band: usize) -> usize {
    (band + 1) * 3 / 2
}

/// Hann window coefficient for sample `n` of an `len`-sample frame.
fn hann(n: usize, len: usize) -> f64 {
    0.5 * (1.0 - (2.0 * PI * n as f64 / (len - 1) as f64).cos())
}

/// Normalized magnitude of band `band` for `frame`, clamped to 0..=1.
pub fn band_magnitude(samples: &[f32], band: usize, gain: Gain) -> f32 {
    let len = samples.len();
    let bin = freq_index(band) as f64;
    let (mut real, mut imag) = (0.0_f64, 0.0_f64);

    for (n, &x) in samples.iter().enumerate() {
        let sample = hann(n, len) * x as f64;
        let angle = 2.0 * PI * bin * n as f64 / len as f64;
        real += sample * angle.cos();
        imag += sample * angle.sin();
    }

    let magnitude = (real * real + imag * imag).sqrt() / len as f64;
    let normalized = magnitude * gain.factor() as f64 / SENSITIVITY;
    normalized.clamp(0.0, 1.0) as f32
}

/// Fold one frame into the bands. Values only ever rise here; falling is
/// left to [`step`].
///
/// Returns `false` when the frame is too short to window (fewer than two
/// samples) and nothing was touched.
pub fn process_frame(bands: &mut [BandState; BAND_COUNT], frame: &SampleFrame, gain: Gain) -> bool {
    if frame.len() < 2 {
        return false;
    }
    for (k, band) in bands.iter_mut().enumerate() {
        let normalized = band_magnitude(&frame.samples, k, gain);
        if normalized > band.value {
            band.value = normalized;
        }
    }
    true
}

/// Advance bar decay and peak markers by `dt` seconds.
pub fn step(bands: &mut [BandState; BAND_COUNT], dt: f32, decay: DecayProfile) {
    let rate = decay.decay_rate();
    let gravity = PEAK_GRAVITY * dt;

    for band in bands.iter_mut() {
        band.value *= rate;
        if band.value < VALUE_FLOOR {
            band.value = 0.0;
        }

        if band.value > band.peak {
            band.peak = band.value;
            band.peak_hold_remaining = PEAK_HOLD_SECS;
        } else if band.peak_hold_remaining > 0.0 {
            band.peak_hold_remaining = (band.peak_hold_remaining - dt).max(0.0);
        } else {
            band.peak -= gravity;
        }

        band.peak = band.peak.max(0.0).max(band.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tone(len: usize, bin: usize, amplitude: f32) -> SampleFrame {
        let samples = (0..len)
            .map(|n| {
                let phase = 2.0 * std::f32::consts::PI * bin as f32 * n as f32 / len as f32;
                amplitude * phase.cos()
            })
            .collect();
        SampleFrame::new(samples)
    }

    fn silent_bands() -> [BandState; BAND_COUNT] {
        [BandState::default(); BAND_COUNT]
    }

    #[test]
    fn test_freq_index_mapping() {
        assert_eq!(freq_index(0), 1);
        assert_eq!(freq_index(1), 3);
        assert_eq!(freq_index(2), 4);
        assert_eq!(freq_index(10), 16);
        assert_eq!(freq_index(63), 96);
    }

    #[test]
    fn test_tone_lights_its_band() {
        // band 10 evaluates bin 16
        let frame = tone(256, 16, 4000.0);
        let mut bands = silent_bands();
        assert!(process_frame(&mut bands, &frame, Gain::X1));

        let loudest = bands
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.value.total_cmp(&b.1.value))
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(loudest, 10);
        assert!(bands[10].value > 0.4);
        assert!(bands[40].value < 0.05);
    }

    #[test]
    fn test_magnitude_matches_closed_form() {
        // A windowed cosine at the exact bin gives |X| ≈ A*N/4, so the
        // normalized value is A/4 * gain / 2000.
        let frame = tone(512, 16, 1000.0);
        let value = band_magnitude(&frame.samples, 10, Gain::X1);
        assert!((value - 0.125).abs() < 0.005, "got {value}");
    }

    #[test]
    fn test_values_clamped_to_unity() {
        let frame = tone(256, 16, 30_000.0);
        let mut bands = silent_bands();
        process_frame(&mut bands, &frame, Gain::X12);
        assert_eq!(bands[10].value, 1.0);
        assert!(bands.iter().all(|b| (0.0..=1.0).contains(&b.value)));
    }

    #[test]
    fn test_processor_never_lowers_values() {
        let mut bands = silent_bands();
        bands[10].value = 0.9;
        process_frame(&mut bands, &SampleFrame::new(vec![0.0; 128]), Gain::X4);
        assert_eq!(bands[10].value, 0.9);
    }

    #[test]
    fn test_short_frames_are_skipped() {
        let mut bands = silent_bands();
        assert!(!process_frame(&mut bands, &SampleFrame::new(vec![1000.0]), Gain::X4));
        assert!(!process_frame(&mut bands, &SampleFrame::default(), Gain::X4));
        assert!(bands.iter().all(|b| b.value == 0.0));
    }

    #[test]
    fn test_multiplicative_decay_and_floor() {
        let mut bands = silent_bands();
        bands[0].value = 0.5;
        bands[1].value = 0.011;
        step(&mut bands, 0.016, DecayProfile::Fast);
        assert!((bands[0].value - 0.3).abs() < 1e-6);
        assert_eq!(bands[1].value, 0.0);
    }

    #[test]
    fn test_peak_hold_then_gravity() {
        let dt = 0.125;
        let mut bands = silent_bands();
        bands[5].value = 0.8;

        step(&mut bands, dt, DecayProfile::Normal);
        let held = bands[5].peak;
        assert!((held - 0.64).abs() < 1e-6);
        assert_eq!(bands[5].peak_hold_remaining, PEAK_HOLD_SECS);

        // Bar falls away; peak stays frozen for the 0.5 s hold window.
        bands[5].value = 0.0;
        for _ in 0..4 {
            step(&mut bands, dt, DecayProfile::Normal);
            assert_eq!(bands[5].peak, held);
        }
        assert_eq!(bands[5].peak_hold_remaining, 0.0);

        // Then it falls at 0.5 units/s.
        step(&mut bands, dt, DecayProfile::Normal);
        assert!((bands[5].peak - (held - 0.0625)).abs() < 1e-6);
        step(&mut bands, dt, DecayProfile::Normal);
        assert!((bands[5].peak - (held - 0.125)).abs() < 1e-6);

        for _ in 0..20 {
            step(&mut bands, dt, DecayProfile::Normal);
        }
        assert_eq!(bands[5].peak, 0.0);
    }

    #[test]
    fn test_peak_never_below_value() {
        let mut bands = silent_bands();
        for b in bands.iter_mut() {
            b.value = 0.9;
            b.peak = 0.9;
        }
        for _ in 0..50 {
            step(&mut bands, 0.1, DecayProfile::Slow);
            for b in &bands {
                assert!(b.peak >= b.value);
                assert!((0.0..=1.0).contains(&b.value));
            }
            for b in bands.iter_mut() {
                b.value = (b.value + 0.05).min(1.0);
            }
        }
    }
}
