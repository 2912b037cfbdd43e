//! pfpaint - profile picture palette art
//!
//! Recolors SVG designs with colors sampled from a profile's avatar and
//! serves them as PNG. This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod rendering;
pub mod server;
pub mod services;
