//! Triangle-affine resampling.
//!
//! Small source triangles are mapped onto the warped destination through the
//! unique affine transform between them, then painted by scanning the
//! destination triangle's bounding box and inverse-mapping each covered
//! pixel back into source space. Affine transforms use the row-major 2×3
//! `[f64; 6]` layout: `u = m[0]x + m[1]y + m[2]`, `v = m[3]x + m[4]y + m[5]`.

use glam::DVec2;

use crate::surface::Surface;

/// Determinant threshold below which a triangle counts as degenerate.
const DEGENERATE_EPS: f64 = 1e-10;

/// Inclusion slack for the barycentric edge test, so pixels exactly on a
/// shared triangle edge are painted by both neighbors instead of neither.
const EDGE_EPS: f64 = 1e-9;

/// Solves the unique affine transform `M, e` with `M·src_i + e = dst_i`.
///
/// Returns `None` when the source triangle is degenerate (its two edge
/// vectors are linearly dependent); skipping such a triangle is a defined
/// no-op of the resampler, not an error.
pub fn solve_affine(src: &[DVec2; 3], dst: &[DVec2; 3]) -> Option<[f64; 6]> {
    let ax = src[1].x - src[0].x;
    let ay = src[1].y - src[0].y;
    let bx = src[2].x - src[0].x;
    let by = src[2].y - src[0].y;

    let det = ax * by - bx * ay;
    if det.abs() < DEGENERATE_EPS {
        return None;
    }
    let inv_det = 1.0 / det;
    let a11 = by * inv_det;
    let a12 = -bx * inv_det;
    let a21 = -ay * inv_det;
    let a22 = ax * inv_det;

    let ux = dst[1].x - dst[0].x;
    let uy = dst[1].y - dst[0].y;
    let vx = dst[2].x - dst[0].x;
    let vy = dst[2].y - dst[0].y;

    let m11 = ux * a11 + vx * a21;
    let m12 = ux * a12 + vx * a22;
    let m21 = uy * a11 + vy * a21;
    let m22 = uy * a12 + vy * a22;

    let e = dst[0].x - (m11 * src[0].x + m12 * src[0].y);
    let f = dst[0].y - (m21 * src[0].x + m22 * src[0].y);

    Some([m11, m12, e, m21, m22, f])
}

/// Inverts a 2×3 affine transform. Returns `None` for a singular matrix.
pub fn invert_affine(m: &[f64; 6]) -> Option<[f64; 6]> {
    let det = m[0] * m[4] - m[1] * m[3];
    if det.abs() < DEGENERATE_EPS {
        return None;
    }
    let inv_det = 1.0 / det;
    let a = m[4] * inv_det;
    let b = -m[1] * inv_det;
    let d = -m[3] * inv_det;
    let e = m[0] * inv_det;
    let c = -(a * m[2] + b * m[5]);
    let f = -(d * m[2] + e * m[5]);
    Some([a, b, c, d, e, f])
}

/// Applies a 2×3 affine transform to a point.
pub fn transform_point(m: &[f64; 6], p: DVec2) -> DVec2 {
    DVec2::new(
        m[0] * p.x + m[1] * p.y + m[2],
        m[3] * p.x + m[4] * p.y + m[5],
    )
}

/// Paints one source triangle of `src_image` into `out` through the affine
/// transform onto the destination triangle.
///
/// Degenerate source or destination triangles are skipped silently; every
/// destination pixel whose center lies inside the triangle is overwritten
/// with an edge-clamped bilinear sample of the source.
pub fn draw_triangle(
    out: &mut Surface,
    src_image: &Surface,
    src: [DVec2; 3],
    dst: [DVec2; 3],
) {
    let Some(forward) = solve_affine(&src, &dst) else {
        log::trace!("skipping degenerate source triangle");
        return;
    };
    let Some(inverse) = invert_affine(&forward) else {
        log::trace!("skipping degenerate destination triangle");
        return;
    };

    let (x0, y0) = (dst[0].x, dst[0].y);
    let (x1, y1) = (dst[1].x, dst[1].y);
    let (x2, y2) = (dst[2].x, dst[2].y);

    let denom = (y1 - y2) * (x0 - x2) + (x2 - x1) * (y0 - y2);
    if denom.abs() < DEGENERATE_EPS {
        return;
    }
    let inv_denom = 1.0 / denom;

    let min_x = x0.min(x1).min(x2).floor().max(0.0) as usize;
    let min_y = y0.min(y1).min(y2).floor().max(0.0) as usize;
    let max_x = (x0.max(x1).max(x2).ceil() as usize).min(out.width() - 1);
    let max_y = (y0.max(y1).max(y2).ceil() as usize).min(out.height() - 1);
    if min_x > max_x || min_y > max_y {
        return;
    }

    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let (x, y) = (px as f64, py as f64);
            let a = ((y1 - y2) * (x - x2) + (x2 - x1) * (y - y2)) * inv_denom;
            let b = ((y2 - y0) * (x - x2) + (x0 - x2) * (y - y2)) * inv_denom;
            let c = 1.0 - a - b;
            if a < -EDGE_EPS || b < -EDGE_EPS || c < -EDGE_EPS {
                continue;
            }
            let s = transform_point(&inverse, DVec2::new(x, y));
            let sample = src_image.sample_bilinear(s.x, s.y);
            out.put_pixel(
                px,
                py,
                [
                    sample[0].round() as u8,
                    sample[1].round() as u8,
                    sample[2].round() as u8,
                    sample[3].round() as u8,
                ],
            );
        }
    }
}
