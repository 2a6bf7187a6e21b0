// src/config/mod.rs
//! Configuration module for user settings.
//!
//! Settings live in a TOML file with a `[visualizer]` table for the waveform
//! pipeline and a `[player]` table for playback controls.

pub mod file;

pub use file::{PlayerConfig, VisualizerConfig, WavelineConfig};
