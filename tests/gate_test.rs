//! Frame gate integration tests
//!
//! Drives the worker-pool gate end to end with synthetic frames and checks
//! the forwarding, rejection, and shutdown behavior.

use std::time::Duration;

use sharpgate::testing::{checkerboard_plane, flat_plane, synthetic_luma_frame};
use sharpgate::{FrameGate, LumaFrame, SharpnessEvaluator};

#[test]
fn test_gate_forwards_only_sharp_frames() {
    let evaluator = SharpnessEvaluator::new(10.0).unwrap();
    let mut gate = FrameGate::with_capacity(evaluator, 2, 16);

    // Interleave sharp and flat frames
    for i in 0..4 {
        let sharp = LumaFrame::new(checkerboard_plane(32, 32, 1), format!("sharp-{}", i));
        let flat = LumaFrame::new(flat_plane(32, 32, 128), format!("flat-{}", i));
        assert!(gate.submit(sharp));
        assert!(gate.submit(flat));
    }

    let mut passed = Vec::new();
    while let Some(gated) = gate.next_timeout(Duration::from_secs(5)) {
        passed.push(gated);
        if passed.len() == 4 {
            break;
        }
    }
    gate.stop();

    assert_eq!(passed.len(), 4);
    for gated in &passed {
        assert!(gated.frame.source_id.starts_with("sharp-"));
        assert!(gated.result.passed);
        assert!(gated.result.std_dev > 10.0);
    }

    let stats = gate.stats();
    assert_eq!(stats.submitted, 8);
    assert_eq!(stats.passed, 4);
    assert_eq!(stats.rejected, 4);
    assert_eq!(stats.dropped, 0);
}

#[test]
fn test_gate_counters_add_up() {
    // The synthetic ramp frames have a zero Laplacian response in the
    // interior, so a zero threshold still rejects every one of them.
    let evaluator = SharpnessEvaluator::new(0.0).unwrap();
    let mut gate = FrameGate::with_capacity(evaluator, 1, 64);

    let submitted = 16;
    for n in 0..submitted {
        assert!(gate.submit(synthetic_luma_frame(n, 24, 24)));
    }

    assert!(gate.next_timeout(Duration::from_secs(2)).is_none());
    gate.stop();

    let stats = gate.stats();
    assert_eq!(stats.submitted, submitted);
    assert_eq!(stats.passed, 0);
    assert_eq!(stats.rejected, submitted);
    assert_eq!(stats.dropped, 0);
}

#[test]
fn test_gate_sheds_when_queue_full() {
    let evaluator = SharpnessEvaluator::new(0.0).unwrap();
    // One worker, tiny queue, and no consumer draining the output
    let mut gate = FrameGate::with_capacity(evaluator, 1, 1);

    let mut accepted = 0u64;
    let mut shed = 0u64;
    for i in 0..64 {
        if gate.submit(LumaFrame::new(
            checkerboard_plane(64, 64, 1),
            format!("burst-{}", i),
        )) {
            accepted += 1;
        } else {
            shed += 1;
        }
    }

    gate.stop();
    let stats = gate.stats();
    assert_eq!(stats.submitted, accepted);
    // Input shedding plus any passed frames the full output queue rejected
    assert!(stats.dropped >= shed);
    assert!(accepted > 0);
}

#[test]
fn test_stop_joins_and_further_submits_fail() {
    let mut gate = FrameGate::new(SharpnessEvaluator::default());
    assert!(gate.is_running());

    gate.stop();
    assert!(!gate.is_running());
    assert!(!gate.submit(LumaFrame::new(flat_plane(8, 8, 0), "late".to_string())));

    // Stopping again is a no-op
    gate.stop();
}

#[test]
fn test_gated_frame_serialization() {
    let evaluator = SharpnessEvaluator::new(1.0).unwrap();
    let mut gate = FrameGate::with_capacity(evaluator, 1, 4);

    gate.submit(LumaFrame::new(checkerboard_plane(16, 16, 1), "cam0".to_string()));
    let gated = gate
        .next_timeout(Duration::from_secs(5))
        .expect("frame should pass");
    gate.stop();

    let json = serde_json::to_string(&gated).unwrap();
    assert!(json.contains("std_dev"));
    assert!(json.contains("cam0"));
}
