//! SharpGate: sharpness gating for camera frame pipelines
//!
//! This crate decides, per captured frame, whether the frame is sharp enough
//! to forward into a downstream processing pipeline. The core is the classic
//! variance-of-Laplacian blur heuristic: convolve the luminance plane with a
//! 3x3 Laplacian kernel and threshold the standard deviation of the response.
//!
//! # Features
//! - Bounds-checked luminance plane types with stride support
//! - Pure, synchronous, thread-safe sharpness evaluator
//! - Worker-pool frame gate with bounded queues and drop-counting
//! - TOML configuration for thresholds and gate sizing
//! - Deterministic synthetic test data for offline testing
//!
//! # Usage
//! ```rust
//! use sharpgate::{LumaBuffer, SharpnessEvaluator};
//!
//! let evaluator = SharpnessEvaluator::new(10.0).unwrap();
//! let frame = LumaBuffer::from_raw(vec![128u8; 64 * 64], 64, 64).unwrap();
//! let result = evaluator.evaluate(&frame.as_plane());
//! assert!(!result.passed); // flat frames never pass
//! ```
pub mod config;
pub mod errors;
pub mod gate;
pub mod kernel;
pub mod sharpness;
pub mod testing;
pub mod types;

// Re-exports for convenience
pub use config::SharpGateConfig;
pub use errors::InvalidInputError;
pub use gate::{FrameGate, GatedFrame, GateStatsSnapshot};
pub use kernel::Kernel;
pub use sharpness::{
    evaluate_raw, SharpnessEvaluator, SharpnessLevel, SharpnessResult,
};
pub use types::{LumaBuffer, LumaFrame, LumaPlane};

/// Initialize logging for the gate pipeline
pub fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "sharpgate=info");
    }
    let _ = env_logger::try_init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get crate information
pub fn get_info() -> CrateInfo {
    CrateInfo {
        name: NAME.to_string(),
        version: VERSION.to_string(),
        description: DESCRIPTION.to_string(),
    }
}

/// Crate information structure
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CrateInfo {
    pub name: String,
    pub version: String,
    pub description: String,
}
