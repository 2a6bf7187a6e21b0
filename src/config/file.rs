// src/config/file.rs
//! Configuration file loading and validation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::audio::visualizer::Rgb;

/// Waveform pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualizerConfig {
    /// Analysis window in samples. Each frame draws `fft_size / 2` points.
    /// Must be a power of two between 32 and 32768.
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    /// Half-width of the moving-average window. 0 disables smoothing.
    #[serde(default = "default_smoothing_radius")]
    pub smoothing_radius: usize,
    /// Upper bound on drawn frames per second.
    #[serde(default = "default_target_fps")]
    pub target_fps: f64,
    /// Index divisor of the decorative sine ripple; larger values stretch the ripple.
    #[serde(default = "default_ripple_divisor")]
    pub ripple_divisor: f64,
    /// Deviation scale as a divisor of the surface height; smaller values exaggerate.
    #[serde(default = "default_amplitude_divisor")]
    pub amplitude_divisor: f64,
    /// Stroke width in pixels (raster snapshots only).
    #[serde(default = "default_line_width")]
    pub line_width: f32,
    /// Background color as `#rrggbb`.
    #[serde(default = "default_background")]
    pub background: String,
    /// Stroke color as `#rrggbb`.
    #[serde(default = "default_stroke")]
    pub stroke: String,
}

fn default_fft_size() -> usize {
    2048
}

fn default_smoothing_radius() -> usize {
    20
}

fn default_target_fps() -> f64 {
    12.0
}

fn default_ripple_divisor() -> f64 {
    10.0
}

fn default_amplitude_divisor() -> f64 {
    1.5
}

fn default_line_width() -> f32 {
    8.0
}

fn default_background() -> String {
    "#000000".to_string()
}

fn default_stroke() -> String {
    "#ffffff".to_string()
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            fft_size: default_fft_size(),
            smoothing_radius: default_smoothing_radius(),
            target_fps: default_target_fps(),
            ripple_divisor: default_ripple_divisor(),
            amplitude_divisor: default_amplitude_divisor(),
            line_width: default_line_width(),
            background: default_background(),
            stroke: default_stroke(),
        }
    }
}

impl VisualizerConfig {
    /// Number of samples drawn per frame.
    pub fn sample_count(&self) -> usize {
        self.fft_size / 2
    }

    pub fn validate(&self) -> Result<()> {
        if !self.fft_size.is_power_of_two() || !(32..=32768).contains(&self.fft_size) {
            bail!(
                "visualizer.fft_size must be a power of two between 32 and 32768, got {}",
                self.fft_size
            );
        }
        if !(self.target_fps.is_finite() && self.target_fps > 0.0) {
            bail!("visualizer.target_fps must be positive, got {}", self.target_fps);
        }
        if !(self.ripple_divisor.is_finite() && self.ripple_divisor > 0.0) {
            bail!("visualizer.ripple_divisor must be positive, got {}", self.ripple_divisor);
        }
        if !(self.amplitude_divisor.is_finite() && self.amplitude_divisor > 0.0) {
            bail!(
                "visualizer.amplitude_divisor must be positive, got {}",
                self.amplitude_divisor
            );
        }
        if !(self.line_width.is_finite() && self.line_width > 0.0) {
            bail!("visualizer.line_width must be positive, got {}", self.line_width);
        }
        self.background
            .parse::<Rgb>()
            .context("invalid visualizer.background")?;
        self.stroke.parse::<Rgb>().context("invalid visualizer.stroke")?;
        Ok(())
    }
}

/// Playback control settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Seconds skipped by the left/right seek keys.
    #[serde(default = "default_seek_step_secs")]
    pub seek_step_secs: f64,
    /// How often the playback position is refreshed, in milliseconds.
    #[serde(default = "default_time_update_ms")]
    pub time_update_ms: u64,
    /// Host loop tick in milliseconds; the frame scheduler is polled this often.
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
}

fn default_seek_step_secs() -> f64 {
    5.0
}

fn default_time_update_ms() -> u64 {
    250
}

fn default_tick_rate_ms() -> u64 {
    16
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            seek_step_secs: default_seek_step_secs(),
            time_update_ms: default_time_update_ms(),
            tick_rate_ms: default_tick_rate_ms(),
        }
    }
}

impl PlayerConfig {
    pub fn time_update_interval(&self) -> Duration {
        Duration::from_millis(self.time_update_ms)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.seek_step_secs.is_finite() && self.seek_step_secs > 0.0) {
            bail!("player.seek_step_secs must be positive, got {}", self.seek_step_secs);
        }
        if self.time_update_ms == 0 {
            bail!("player.time_update_ms must be at least 1");
        }
        if self.tick_rate_ms == 0 {
            bail!("player.tick_rate_ms must be at least 1");
        }
        Ok(())
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WavelineConfig {
    #[serde(default)]
    pub visualizer: VisualizerConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

impl WavelineConfig {
    /// Loads configuration from `path`, or from the default location when
    /// `path` is `None`. A missing default file yields the defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => {
                    tracing::debug!("no config directory, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !explicit && !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.visualizer.validate()?;
        self.player.validate()
    }
}

/// `<config dir>/waveline/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("waveline").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_values() {
        let config = WavelineConfig::default();
        assert_eq!(config.visualizer.fft_size, 2048);
        assert_eq!(config.visualizer.sample_count(), 1024);
        assert_eq!(config.visualizer.smoothing_radius, 20);
        assert_eq!(config.visualizer.target_fps, 12.0);
        assert_eq!(config.visualizer.ripple_divisor, 10.0);
        assert_eq!(config.visualizer.amplitude_divisor, 1.5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = WavelineConfig::from_toml(
            r##"
            [visualizer]
            target_fps = 30.0
            stroke = "#ff8800"
            "##,
        )
        .unwrap();
        assert_eq!(config.visualizer.target_fps, 30.0);
        assert_eq!(config.visualizer.stroke, "#ff8800");
        assert_eq!(config.visualizer.smoothing_radius, 20);
        assert_eq!(config.player, PlayerConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_file_is_default() {
        let config = WavelineConfig::from_toml("").unwrap();
        assert_eq!(config, WavelineConfig::default());
    }

    #[test]
    fn test_rejects_non_power_of_two_fft_size() {
        let mut config = WavelineConfig::default();
        config.visualizer.fft_size = 1000;
        assert!(config.validate().is_err());
        config.visualizer.fft_size = 16;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_numbers_and_colors() {
        let mut config = WavelineConfig::default();
        config.visualizer.target_fps = 0.0;
        assert!(config.validate().is_err());

        let mut config = WavelineConfig::default();
        config.visualizer.amplitude_divisor = -1.5;
        assert!(config.validate().is_err());

        let mut config = WavelineConfig::default();
        config.visualizer.background = "black".to_string();
        assert!(config.validate().is_err());

        let mut config = WavelineConfig::default();
        config.player.seek_step_secs = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let path = std::env::temp_dir().join("waveline-does-not-exist.toml");
        assert!(WavelineConfig::load(Some(&path)).is_err());
    }
}
