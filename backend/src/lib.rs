//! Companies Backend Library
//!
//! This library exposes modules for testing and external use.
//! The main binary is in `src/main.rs`.

pub mod api;
pub mod company;
pub mod config;
pub mod error;
/// Application state shared across handlers
pub mod state;
