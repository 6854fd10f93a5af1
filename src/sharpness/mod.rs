/// Frame sharpness evaluation module
///
/// Implements variance-of-Laplacian blur detection: convolve the luminance
/// plane with a 3x3 Laplacian kernel and threshold the population standard
/// deviation of the response. Flat or defocused frames produce a low-variance
/// response and are rejected.
pub mod convolve;
pub mod evaluator;

pub use convolve::convolve_3x3;
pub use evaluator::{evaluate_raw, SharpnessEvaluator, SharpnessLevel, SharpnessResult};
