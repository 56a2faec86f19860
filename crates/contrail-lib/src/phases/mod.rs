//! Flight phase segmentation.
//!
//! This module is organized into focused submodules:
//!
//! - [`types`] - Samples, phases and phase slices
//! - [`config`] - Segmentation thresholds and their defaults
//! - [`smoothing`] - Rolling median and vertical speed derivation
//! - [`classify`] - Per-sample classification state machine
//! - [`segment`] - Slice building, merge pass and contiguity repair

pub mod classify;
pub mod config;
pub mod segment;
pub mod smoothing;
pub mod types;

pub use classify::ClassifierState;
pub use config::PhaseDetectionConfig;
pub use segment::detect_phases;
pub use types::{AltitudeSample, FlightPhase, PhaseSlice};
