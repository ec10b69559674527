//! Endless fireworks: rockets climb, burst into shaped showers of sparks, and
//! fade into the night sky.
//!
//! The [`show`] module holds the simulation and is independent of any
//! terminal; it draws through [`render::RenderTarget`] and makes noise through
//! [`audio::AudioTrigger`]. [`app`] wires it to a real terminal.

pub mod app;
pub mod audio;
pub mod config;
pub mod error;
pub mod render;
pub mod show;

pub use error::Error;
