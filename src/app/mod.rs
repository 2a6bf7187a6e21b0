// src/app/mod.rs
//! Application module - contains application state and playback controls.

pub mod playback;
pub mod state;

// Re-export the App struct
pub use state::App;
