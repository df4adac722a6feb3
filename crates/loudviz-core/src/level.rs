//! VU mode: loudness targets from peak amplitude, and needle ballistics.

use rand::Rng;

use crate::config::{DecayProfile, Gain, StereoNoise};
use crate::protocol::SampleFrame;
use crate::state::{LevelState, LEVEL_MAX};

/// Peak amplitude (after gain) that maps to 0 VU.
pub const SENSITIVITY: f32 = 18000.0;

/// Levels below this are snapped to zero.
const LEVEL_FLOOR: f32 = 0.005;

/// Release runs at this fraction of the attack speed.
const RELEASE_RATIO: f32 = 0.6;

/// Stereo simulation settings for one processed frame.
#[derive(Debug, Clone, Copy)]
pub struct Stereo {
    pub enabled: bool,
    pub noise: StereoNoise,
}

/// Mono loudness of a frame before any stereo jitter.
pub fn base_volume(frame: &SampleFrame, gain: Gain) -> f32 {
    frame.peak_amplitude().max(0.0) * gain.factor() / SENSITIVITY
}

/// Set new left/right targets from `frame`.
///
/// With stereo simulation on, each channel gets its own uniform jitter in
/// `[-noise, +noise]` drawn fresh for this frame, approximating a stereo
/// image from the sensor's single channel.
pub fn process_frame<R: Rng>(
    left: &mut LevelState,
    right: &mut LevelState,
    frame: &SampleFrame,
    gain: Gain,
    stereo: Stereo,
    rng: &mut R,
) {
    let base = base_volume(frame, gain);
    let (target_l, target_r) = if stereo.enabled {
        let noise = stereo.noise.amount();
        let jitter_l = rng.gen_range(-noise..=noise);
        let jitter_r = rng.gen_range(-noise..=noise);
        (base * (1.0 + jitter_l), base * (1.0 + jitter_r))
    } else {
        (base, base)
    };

    left.target = target_l.clamp(0.0, LEVEL_MAX);
    right.target = target_r.clamp(0.0, LEVEL_MAX);
}

/// Move one channel toward its target: attack at `speed`, release at 60%
/// of it. A step that would cross the target lands on it instead.
pub fn seek(level: &mut LevelState, dt: f32, speed: f32) {
    let delta = level.target - level.current;
    let rate = if delta > 0.0 { speed } else { speed * RELEASE_RATIO };
    let step = delta * rate * dt;

    level.current = if step.abs() >= delta.abs() {
        level.target
    } else {
        level.current + step
    };

    if level.current < LEVEL_FLOOR {
        level.current = 0.0;
    }
}

/// Advance both meters by `dt` seconds.
pub fn step(left: &mut LevelState, right: &mut LevelState, dt: f32, decay: DecayProfile) {
    let speed = decay.attack_speed();
    seek(left, dt, speed);
    seek(right, dt, speed);
}

/// Needle travel 0..=1.1 for a level: linear to unity, half-rate above it.
pub fn needle_fraction(level: f32) -> f32 {
    let v = level.clamp(0.0, LEVEL_MAX);
    if v > 1.0 {
        1.0 + (v - 1.0) * 0.5
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const MONO: Stereo = Stereo {
        enabled: false,
        noise: StereoNoise::Medium,
    };

    fn frame(samples: &[f32]) -> SampleFrame {
        SampleFrame::new(samples.to_vec())
    }

    #[test]
    fn test_base_volume_from_peak() {
        let f = frame(&[100.0, -4500.0, 2000.0]);
        assert!((base_volume(&f, Gain::X4) - 1.0).abs() < 1e-6);
        assert_eq!(base_volume(&SampleFrame::default(), Gain::X4), 0.0);
    }

    #[test]
    fn test_mono_targets_are_equal() {
        let mut rng = StdRng::seed_from_u64(7);
        let (mut l, mut r) = (LevelState::default(), LevelState::default());
        let f = frame(&[1800.0, -900.0]);
        process_frame(&mut l, &mut r, &f, Gain::X2, MONO, &mut rng);
        let base = base_volume(&f, Gain::X2);
        assert_eq!(l.target, base);
        assert_eq!(r.target, base);
    }

    #[test]
    fn test_stereo_jitter_stays_in_band() {
        let mut rng = StdRng::seed_from_u64(42);
        let (mut l, mut r) = (LevelState::default(), LevelState::default());
        let f = frame(&[4500.0]);
        let stereo = Stereo {
            enabled: true,
            noise: StereoNoise::Max,
        };
        let mut differed = false;
        for _ in 0..200 {
            process_frame(&mut l, &mut r, &f, Gain::X1, stereo, &mut rng);
            for t in [l.target, r.target] {
                assert!((0.25 * 0.6 - 1e-6..=0.25 * 1.4 + 1e-6).contains(&t), "{t}");
            }
            differed |= l.target != r.target;
        }
        assert!(differed);
    }

    #[test]
    fn test_targets_clamped() {
        let mut rng = StdRng::seed_from_u64(1);
        let (mut l, mut r) = (LevelState::default(), LevelState::default());
        process_frame(&mut l, &mut r, &frame(&[32767.0]), Gain::X12, MONO, &mut rng);
        assert_eq!(l.target, LEVEL_MAX);
        assert_eq!(r.target, LEVEL_MAX);
    }

    #[test]
    fn test_attack_step() {
        let mut level = LevelState {
            current: 0.0,
            target: 1.0,
        };
        seek(&mut level, 0.1, 8.0);
        assert!((level.current - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_attack_converges_monotonically_without_overshoot() {
        let mut level = LevelState {
            current: 0.0,
            target: 1.0,
        };
        let mut prev = level.current;
        for _ in 0..100 {
            seek(&mut level, 0.1, 8.0);
            assert!(level.current >= prev);
            assert!(level.current <= 1.0);
            prev = level.current;
        }
        assert!((level.current - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_release_is_slower_than_attack() {
        let mut rising = LevelState {
            current: 0.0,
            target: 1.0,
        };
        let mut falling = LevelState {
            current: 1.0,
            target: 0.0,
        };
        seek(&mut rising, 0.05, 8.0);
        seek(&mut falling, 0.05, 8.0);
        assert!((rising.current - 0.4).abs() < 1e-6);
        assert!((falling.current - 0.76).abs() < 1e-6);
    }

    #[test]
    fn test_large_dt_lands_on_target() {
        let mut level = LevelState {
            current: 0.2,
            target: 0.9,
        };
        seek(&mut level, 1.0, 15.0);
        assert_eq!(level.current, 0.9);

        level.target = 0.0;
        seek(&mut level, 1.0, 15.0);
        assert_eq!(level.current, 0.0);
    }

    #[test]
    fn test_floor_snaps_to_zero() {
        let mut level = LevelState {
            current: 0.0052,
            target: 0.0,
        };
        seek(&mut level, 0.016, 8.0);
        assert_eq!(level.current, 0.0);
    }

    #[test]
    fn test_step_uses_profile_speed() {
        let (mut l, mut r) = (
            LevelState {
                current: 0.0,
                target: 1.0,
            },
            LevelState {
                current: 0.0,
                target: 0.5,
            },
        );
        step(&mut l, &mut r, 0.05, DecayProfile::Fast);
        assert!((l.current - 0.75).abs() < 1e-6);
        assert!((r.current - 0.375).abs() < 1e-6);
    }

    #[test]
    fn test_needle_soft_compression() {
        assert_eq!(needle_fraction(-0.5), 0.0);
        assert_eq!(needle_fraction(0.5), 0.5);
        assert_eq!(needle_fraction(1.0), 1.0);
        assert!((needle_fraction(1.2) - 1.1).abs() < 1e-6);
        assert!((needle_fraction(3.0) - 1.1).abs() < 1e-6);
    }
}
