//! Sharpness scoring from the Laplacian response
//!
//! The population standard deviation of the convolved plane is the sharpness
//! score: defocused frames concentrate energy in low frequencies and score
//! near zero, in-focus frames score high.

use serde::{Deserialize, Serialize};

use crate::errors::InvalidInputError;
use crate::kernel::Kernel;
use crate::sharpness::convolve::convolve_3x3;
use crate::types::LumaPlane;

/// Coarse sharpness grading derived from the response standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SharpnessLevel {
    Sharp,
    Good,
    Moderate,
    Soft,
    Blurry,
}

impl SharpnessLevel {
    /// Map a response standard deviation to a level.
    pub fn from_std_dev(std_dev: f32) -> Self {
        if std_dev >= 40.0 {
            SharpnessLevel::Sharp
        } else if std_dev >= 25.0 {
            SharpnessLevel::Good
        } else if std_dev >= 12.0 {
            SharpnessLevel::Moderate
        } else if std_dev >= 5.0 {
            SharpnessLevel::Soft
        } else {
            SharpnessLevel::Blurry
        }
    }

    /// Normalized quality score for this level
    pub fn quality_score(&self) -> f32 {
        match self {
            SharpnessLevel::Sharp => 1.0,
            SharpnessLevel::Good => 0.8,
            SharpnessLevel::Moderate => 0.6,
            SharpnessLevel::Soft => 0.3,
            SharpnessLevel::Blurry => 0.1,
        }
    }
}

/// Result of evaluating one luminance plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharpnessResult {
    /// Population standard deviation of the Laplacian response
    pub std_dev: f32,
    /// Arithmetic mean of the Laplacian response
    pub mean: f32,
    /// Whether `std_dev` exceeded the evaluator's pass threshold
    pub passed: bool,
    /// Coarse grading of `std_dev`
    pub level: SharpnessLevel,
}

/// Stateless sharpness evaluator.
///
/// Holds a validated kernel and pass threshold. `evaluate` is a pure
/// synchronous computation with no shared state; one evaluator can be cloned
/// across any number of threads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharpnessEvaluator {
    kernel: Kernel,
    threshold: f32,
}

impl SharpnessEvaluator {
    /// Evaluator with the Laplacian kernel and the given pass threshold.
    pub fn new(threshold: f32) -> Result<Self, InvalidInputError> {
        Self::with_kernel(Kernel::LAPLACIAN, threshold)
    }

    /// Evaluator with a custom kernel.
    pub fn with_kernel(kernel: Kernel, threshold: f32) -> Result<Self, InvalidInputError> {
        if !threshold.is_finite() {
            return Err(InvalidInputError::NonFiniteThreshold { value: threshold });
        }
        Ok(Self { kernel, threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn kernel(&self) -> &Kernel {
        &self.kernel
    }

    /// Score one plane.
    ///
    /// Infallible: plane, kernel, and threshold were all validated at
    /// construction. A frame passes when `std_dev` is strictly greater than
    /// the threshold, so a zero threshold still rejects flat frames.
    pub fn evaluate(&self, plane: &LumaPlane<'_>) -> SharpnessResult {
        let response = convolve_3x3(plane, &self.kernel);
        let (mean, std_dev) = response_stats(&response);

        let std_dev = std_dev as f32;
        SharpnessResult {
            std_dev,
            mean: mean as f32,
            passed: std_dev > self.threshold,
            level: SharpnessLevel::from_std_dev(std_dev),
        }
    }
}

impl Default for SharpnessEvaluator {
    fn default() -> Self {
        Self {
            kernel: Kernel::LAPLACIAN,
            threshold: 0.0,
        }
    }
}

/// One-shot evaluation of raw luminance bytes.
///
/// Validates the plane, kernel, and threshold, then evaluates. This is the
/// full contract in a single call for callers that do not hold a validated
/// plane or a long-lived evaluator.
pub fn evaluate_raw(
    data: &[u8],
    width: usize,
    height: usize,
    stride: usize,
    kernel: Kernel,
    threshold: f32,
) -> Result<SharpnessResult, InvalidInputError> {
    let plane = LumaPlane::new(data, width, height, stride)?;
    let evaluator = SharpnessEvaluator::with_kernel(kernel, threshold)?;
    Ok(evaluator.evaluate(&plane))
}

/// Mean and population standard deviation, f64 accumulation, fixed
/// sequential order so repeated runs are bit-identical.
fn response_stats(values: &[f32]) -> (f64, f64) {
    let n = values.len() as f64;
    let mut sum = 0.0f64;
    for v in values {
        sum += *v as f64;
    }
    let mean = sum / n;

    let mut sq_sum = 0.0f64;
    for v in values {
        let d = *v as f64 - mean;
        sq_sum += d * d;
    }
    (mean, (sq_sum / n).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LumaBuffer;

    fn checkerboard(width: usize, height: usize) -> LumaBuffer {
        let data = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                if (x + y) % 2 == 0 {
                    255
                } else {
                    0
                }
            })
            .collect();
        LumaBuffer::from_raw(data, width, height).unwrap()
    }

    #[test]
    fn test_flat_plane_scores_zero() {
        let evaluator = SharpnessEvaluator::default();
        let buffer = LumaBuffer::from_raw(vec![128; 16], 4, 4).unwrap();
        let result = evaluator.evaluate(&buffer.as_plane());

        assert_eq!(result.std_dev, 0.0);
        assert_eq!(result.mean, 0.0);
        assert!(!result.passed);
        assert_eq!(result.level, SharpnessLevel::Blurry);
    }

    #[test]
    fn test_checkerboard_beats_flat() {
        let evaluator = SharpnessEvaluator::new(10.0).unwrap();
        let sharp = evaluator.evaluate(&checkerboard(8, 8).as_plane());
        assert!(sharp.std_dev > 50.0);
        assert!(sharp.passed);
        assert_eq!(sharp.level, SharpnessLevel::Sharp);
    }

    #[test]
    fn test_deterministic_evaluation() {
        let evaluator = SharpnessEvaluator::default();
        let buffer = checkerboard(16, 12);
        let a = evaluator.evaluate(&buffer.as_plane());
        let b = evaluator.evaluate(&buffer.as_plane());
        assert_eq!(a.std_dev.to_bits(), b.std_dev.to_bits());
        assert_eq!(a.mean.to_bits(), b.mean.to_bits());
    }

    #[test]
    fn test_rejects_non_finite_threshold() {
        assert!(SharpnessEvaluator::new(f32::NAN).is_err());
        assert!(SharpnessEvaluator::new(f32::INFINITY).is_err());
        assert!(SharpnessEvaluator::new(-5.0).is_ok());
    }

    #[test]
    fn test_evaluate_raw_validates_dimensions() {
        let data = vec![0u8; 8];
        let err = evaluate_raw(&data, 4, 4, 4, Kernel::LAPLACIAN, 0.0).unwrap_err();
        assert!(matches!(err, InvalidInputError::BufferTooShort { .. }));
    }

    #[test]
    fn test_negative_threshold_passes_flat_frames() {
        // Below-zero thresholds are accepted and make passed trivially true
        let evaluator = SharpnessEvaluator::new(-1.0).unwrap();
        let buffer = LumaBuffer::from_raw(vec![0; 16], 4, 4).unwrap();
        assert!(evaluator.evaluate(&buffer.as_plane()).passed);
    }

    #[test]
    fn test_level_boundaries() {
        assert_eq!(SharpnessLevel::from_std_dev(80.0), SharpnessLevel::Sharp);
        assert_eq!(SharpnessLevel::from_std_dev(30.0), SharpnessLevel::Good);
        assert_eq!(SharpnessLevel::from_std_dev(15.0), SharpnessLevel::Moderate);
        assert_eq!(SharpnessLevel::from_std_dev(6.0), SharpnessLevel::Soft);
        assert_eq!(SharpnessLevel::from_std_dev(1.0), SharpnessLevel::Blurry);

        assert_eq!(SharpnessLevel::Sharp.quality_score(), 1.0);
        assert_eq!(SharpnessLevel::Blurry.quality_score(), 0.1);
    }
}
