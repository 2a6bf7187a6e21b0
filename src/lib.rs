// src/lib.rs
//! Waveline - a terminal audio player with a decorative live waveform.
//!
//! The library holds the playback engine, the waveform pipeline (sampling,
//! smoothing, frame scheduling and rendering) and the terminal UI around them.

pub mod app;
pub mod audio;
pub mod config;
pub mod logging;
pub mod snapshot;
pub mod ui;
