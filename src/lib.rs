//! # Suntheme Library
//!
//! Internal library for the suntheme binary.
//!
//! This library exists to enable testing of the solar math and daemon
//! internals and to provide a clean separation between CLI dispatch
//! (main.rs) and application logic.
//!
//! ## Architecture
//!
//! - **Solar math**: `solar` holds the pure sunrise/sunset approximation
//! - **Estimator**: `estimator` caches the per-day computation and classifies
//!   day vs. night
//! - **Location**: `location` resolves coordinates from IP geolocation with a
//!   bounded timeout
//! - **Theme**: `theme` owns the persisted preference and the apply hook
//! - **Core Logic**: `core` runs the scheduler loop
//! - **Infrastructure**: argument parsing, configuration, signal handling,
//!   logging, and the mockable time source

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

// Public API modules
pub mod args;
pub mod commands;
pub mod config;
pub mod constants;
pub mod core;
pub mod estimator;
pub mod location;
pub mod signals;
pub mod solar;
pub mod theme;
pub mod time_source;

// Re-export for binary and integration tests
pub use estimator::{Coordinates, SolarDayNightEstimator};
pub use theme::ThemeMode;
