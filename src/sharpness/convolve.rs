//! 3x3 convolution over a luminance plane
//!
//! Samples are widened to f32 in [0, 255] without rescaling. The kernel is
//! applied wherever the 3x3 window fits entirely inside the plane; the
//! one-pixel output border is left at zero. A uniform plane therefore
//! produces an all-zero response, which is what lets the evaluator treat
//! flat frames as having zero sharpness.

use crate::kernel::Kernel;
use crate::types::LumaPlane;

/// Convolve `plane` with a 3x3 kernel.
///
/// Output is `width * height` response values in row-major order, border
/// zeroed. The plane was validated at construction, so row access here
/// cannot go out of bounds. Intermediate sums stay well inside f32 range
/// (worst case 255 * 8 = 2040 per tap).
pub fn convolve_3x3(plane: &LumaPlane<'_>, kernel: &Kernel) -> Vec<f32> {
    let width = plane.width();
    let height = plane.height();
    let mut out = vec![0.0f32; width * height];

    if width < 3 || height < 3 {
        // No position fits a full 3x3 window; the response stays zero.
        return out;
    }

    for y in 1..height - 1 {
        let above = plane.row(y - 1);
        let center = plane.row(y);
        let below = plane.row(y + 1);
        let out_row = y * width;

        for x in 1..width - 1 {
            let mut acc = 0.0f32;
            for (ky, row) in [above, center, below].iter().enumerate() {
                for kx in 0..3 {
                    acc += kernel.weight(ky, kx) * row[x + kx - 1] as f32;
                }
            }
            out[out_row + x] = acc;
        }
    }

    out
}
