//! Testing utilities for sharpgate
//!
//! Deterministic synthetic luminance planes for offline tests and benches.
//! No camera hardware or RNG involved; the same call always produces the
//! same pixels.

pub mod synthetic_data;

pub use synthetic_data::{
    checkerboard_plane, flat_plane, gradient_plane, noise_plane, synthetic_luma_frame,
};
