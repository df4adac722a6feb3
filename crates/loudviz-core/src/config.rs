use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::Mode;
use crate::error::ConfigError;
use crate::platform;

// ── Enumerated visualizer options ─────────────────────────────────────────────

/// Closed option sets the user can step through from the keyboard.
pub trait Cycle: Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn next(self) -> Self {
        let all = Self::ALL;
        let idx = all.iter().position(|v| *v == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    fn prev(self) -> Self {
        let all = Self::ALL;
        let idx = all.iter().position(|v| *v == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// Input gain multiplier applied before the sensitivity constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub enum Gain {
    Half,
    X1,
    X2,
    #[default]
    X4,
    X8,
    X12,
}

impl Gain {
    pub fn factor(self) -> f32 {
        match self {
            Gain::Half => 0.5,
            Gain::X1 => 1.0,
            Gain::X2 => 2.0,
            Gain::X4 => 4.0,
            Gain::X8 => 8.0,
            Gain::X12 => 12.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Gain::Half => "0.5x",
            Gain::X1 => "1x",
            Gain::X2 => "2x",
            Gain::X4 => "4x",
            Gain::X8 => "8x",
            Gain::X12 => "12x",
        }
    }
}

impl Cycle for Gain {
    const ALL: &'static [Self] = &[
        Gain::Half,
        Gain::X1,
        Gain::X2,
        Gain::X4,
        Gain::X8,
        Gain::X12,
    ];
}

impl TryFrom<f32> for Gain {
    type Error = ConfigError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|g| (g.factor() - value).abs() < 1e-4)
            .ok_or(ConfigError::InvalidGain(value))
    }
}

impl From<Gain> for f32 {
    fn from(gain: Gain) -> f32 {
        gain.factor()
    }
}

/// Shared speed setting: multiplicative bar decay and VU ballistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecayProfile {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl DecayProfile {
    /// Per-render-tick multiplier for spectrum band values.
    pub fn decay_rate(self) -> f32 {
        match self {
            DecayProfile::Slow => 0.9,
            DecayProfile::Normal => 0.8,
            DecayProfile::Fast => 0.6,
        }
    }

    /// VU attack speed in 1/s. Release runs at 60% of this.
    pub fn attack_speed(self) -> f32 {
        match self {
            DecayProfile::Slow => 4.0,
            DecayProfile::Normal => 8.0,
            DecayProfile::Fast => 15.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DecayProfile::Slow => "slow",
            DecayProfile::Normal => "normal",
            DecayProfile::Fast => "fast",
        }
    }
}

impl Cycle for DecayProfile {
    const ALL: &'static [Self] = &[DecayProfile::Slow, DecayProfile::Normal, DecayProfile::Fast];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectrumStyle {
    #[default]
    Bars,
    Line,
    Mirror,
}

impl SpectrumStyle {
    pub fn label(self) -> &'static str {
        match self {
            SpectrumStyle::Bars => "bars",
            SpectrumStyle::Line => "line",
            SpectrumStyle::Mirror => "mirror",
        }
    }
}

impl Cycle for SpectrumStyle {
    const ALL: &'static [Self] = &[SpectrumStyle::Bars, SpectrumStyle::Line, SpectrumStyle::Mirror];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VuStyle {
    #[default]
    Analog,
    Led,
}

impl VuStyle {
    pub fn label(self) -> &'static str {
        match self {
            VuStyle::Analog => "analog",
            VuStyle::Led => "led",
        }
    }
}

impl Cycle for VuStyle {
    const ALL: &'static [Self] = &[VuStyle::Analog, VuStyle::Led];
}

/// Amplitude of the synthetic per-channel jitter in stereo simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub enum StereoNoise {
    Low,
    #[default]
    Medium,
    High,
    Max,
}

impl StereoNoise {
    pub fn amount(self) -> f32 {
        match self {
            StereoNoise::Low => 0.10,
            StereoNoise::Medium => 0.20,
            StereoNoise::High => 0.30,
            StereoNoise::Max => 0.40,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StereoNoise::Low => "10%",
            StereoNoise::Medium => "20%",
            StereoNoise::High => "30%",
            StereoNoise::Max => "40%",
        }
    }
}

impl Cycle for StereoNoise {
    const ALL: &'static [Self] = &[
        StereoNoise::Low,
        StereoNoise::Medium,
        StereoNoise::High,
        StereoNoise::Max,
    ];
}

impl TryFrom<f32> for StereoNoise {
    type Error = ConfigError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::ALL
            .iter()
            .copied()
            .find(|n| (n.amount() - value).abs() < 1e-4)
            .ok_or(ConfigError::InvalidNoise(value))
    }
}

impl From<StereoNoise> for f32 {
    fn from(noise: StereoNoise) -> f32 {
        noise.amount()
    }
}

/// Colour theme. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeName {
    #[default]
    Dark,
    Light,
    Blue,
    Green,
}

impl ThemeName {
    pub fn label(self) -> &'static str {
        match self {
            ThemeName::Dark => "dark",
            ThemeName::Light => "light",
            ThemeName::Blue => "blue",
            ThemeName::Green => "green",
        }
    }
}

impl Cycle for ThemeName {
    const ALL: &'static [Self] = &[
        ThemeName::Dark,
        ThemeName::Light,
        ThemeName::Blue,
        ThemeName::Green,
    ];
}

/// Live visualizer settings. Mutated by user input, read on every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VizConfig {
    #[serde(default)]
    pub gain: Gain,
    #[serde(default)]
    pub decay: DecayProfile,
    #[serde(default)]
    pub spectrum_style: SpectrumStyle,
    #[serde(default)]
    pub vu_style: VuStyle,
    #[serde(default)]
    pub stereo_sim: bool,
    #[serde(default)]
    pub stereo_noise: StereoNoise,
    #[serde(default)]
    pub theme: ThemeName,
}

// ── Config file ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sensor: SensorConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub viz: VizConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Where and how often to poll the sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    /// Host name or address of the sensor; `http://` is assumed when no
    /// scheme is given.
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    #[serde(default)]
    pub auto_connect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default)]
    pub initial_mode: Mode,
    #[serde(default = "default_render_fps")]
    pub render_fps: u32,
    /// Logical drawing units per raster pixel.
    #[serde(default = "default_scale")]
    pub scale: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// `tracing_subscriber` env-filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            endpoint: default_endpoint(),
            poll_interval_ms: default_poll_interval_ms(),
            request_timeout_ms: default_request_timeout_ms(),
            auto_connect: false,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            initial_mode: Mode::default(),
            render_fps: default_render_fps(),
            scale: default_scale(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_host() -> String {
    "192.168.1.57".to_string()
}

fn default_endpoint() -> String {
    "/data".to_string()
}

fn default_poll_interval_ms() -> u64 {
    40
}

fn default_request_timeout_ms() -> u64 {
    1000
}

fn default_render_fps() -> u32 {
    60
}

fn default_scale() -> f32 {
    3.0
}

fn default_log_filter() -> String {
    "debug,hyper_util=warn,reqwest=warn,hyper=warn".to_string()
}

impl SensorConfig {
    /// Full URL of the sample endpoint.
    pub fn data_url(&self) -> String {
        let host = self.host.trim().trim_end_matches('/');
        let base = if host.contains("://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        };
        if self.endpoint.starts_with('/') {
            format!("{}{}", base, self.endpoint)
        } else {
            format!("{}/{}", base, self.endpoint)
        }
    }
}

impl Config {
    /// Load the config file, writing the defaults first if it is missing.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(io_err)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
