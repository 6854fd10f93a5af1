//! Synthetic luminance test data
//!
//! Pattern generators covering the evaluator's interesting regimes: flat
//! (zero response), checkerboard (maximal contrast), gradient (low constant
//! response), and hash noise (broadband). All are deterministic.

use crate::types::{LumaBuffer, LumaFrame};

/// Uniform plane. Produces a zero Laplacian response at every pixel.
pub fn flat_plane(width: usize, height: usize, value: u8) -> LumaBuffer {
    LumaBuffer::from_raw(vec![value; width * height], width, height)
        .expect("flat plane dimensions are valid")
}

/// Alternating 0/255 cells of `cell` pixels. `cell == 1` is the
/// maximal-contrast pattern.
pub fn checkerboard_plane(width: usize, height: usize, cell: usize) -> LumaBuffer {
    let cell = cell.max(1);
    let mut data = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                data[y * width + x] = 255;
            }
        }
    }
    LumaBuffer::from_raw(data, width, height).expect("checkerboard dimensions are valid")
}

/// Horizontal ramp from 0 to 255 across the width.
pub fn gradient_plane(width: usize, height: usize) -> LumaBuffer {
    let mut data = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            data[y * width + x] = (x * 255 / width.max(1)) as u8;
        }
    }
    LumaBuffer::from_raw(data, width, height).expect("gradient dimensions are valid")
}

/// Deterministic broadband noise from a position hash. `seed` selects the
/// pattern; equal seeds give equal planes.
pub fn noise_plane(width: usize, height: usize, seed: u64) -> LumaBuffer {
    let mut data = vec![0u8; width * height];
    for (i, px) in data.iter_mut().enumerate() {
        // splitmix64-style scramble of (seed, index)
        let mut z = seed.wrapping_add(i as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        *px = (z >> 56) as u8;
    }
    LumaBuffer::from_raw(data, width, height).expect("noise dimensions are valid")
}

/// A frame whose content varies with `frame_number`, for exercising the gate
/// with a stream of distinct frames.
pub fn synthetic_luma_frame(frame_number: u64, width: usize, height: usize) -> LumaFrame {
    let base = (frame_number % 256) as u8;
    let mut data = vec![0u8; width * height];
    for y in 0..height {
        for x in 0..width {
            data[y * width + x] = base.wrapping_add(((x + y) % 256) as u8);
        }
    }
    let buffer = LumaBuffer::from_raw(data, width, height).expect("frame dimensions are valid");
    LumaFrame::new(buffer, "synthetic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_plane_is_uniform() {
        let plane = flat_plane(16, 8, 77);
        assert_eq!(plane.width(), 16);
        assert_eq!(plane.height(), 8);
        assert!(plane.data().iter().all(|&v| v == 77));
    }

    #[test]
    fn test_checkerboard_alternates() {
        let plane = checkerboard_plane(4, 4, 1);
        assert_eq!(plane.data()[0], 255);
        assert_eq!(plane.data()[1], 0);
        assert_eq!(plane.data()[4], 0);
        assert_eq!(plane.data()[5], 255);
    }

    #[test]
    fn test_noise_plane_is_seed_deterministic() {
        let a = noise_plane(32, 32, 42);
        let b = noise_plane(32, 32, 42);
        let c = noise_plane(32, 32, 43);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_synthetic_frames_differ() {
        let f0 = synthetic_luma_frame(0, 32, 24);
        let f1 = synthetic_luma_frame(1, 32, 24);
        assert_ne!(f0.buffer.data()[0], f1.buffer.data()[0]);
    }
}
