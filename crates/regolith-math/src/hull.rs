//! 2D convex hull via Graham scan.
//!
//! Cluster bounding boxes only need the planar footprint of the cluster's
//! vertex set, so the hull is computed over the XY projection. The Z
//! component of each input point is carried through untouched.

use std::cmp::Ordering;

use crate::Vec3;

/// Turns smaller than this are treated as collinear.
const COLLINEAR_TOL: f64 = 1.0e-12;

/// Signed area of the turn `o -> a -> b` in the XY plane.
#[inline]
fn turn_xy(o: Vec3, a: Vec3, b: Vec3) -> f64 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

/// Computes the convex hull of `points` projected onto the XY plane.
///
/// Returns the hull vertices in counter-clockwise order, or an empty vector
/// when the projection is degenerate (fewer than three non-collinear
/// points); callers fall back to the raw vertex set in that case.
pub fn convex_hull_xy(points: &[Vec3]) -> Vec<Vec3> {
    if points.len() < 3 {
        return Vec::new();
    }

    let mut pts = points.to_vec();

    // Pivot: lowest y, ties broken by lowest x.
    let mut pivot_idx = 0;
    for (i, p) in pts.iter().enumerate().skip(1) {
        let best = pts[pivot_idx];
        if p.y < best.y || (p.y == best.y && p.x < best.x) {
            pivot_idx = i;
        }
    }
    pts.swap(0, pivot_idx);
    let pivot = pts[0];

    // Sort the rest by polar angle around the pivot; collinear points by
    // distance, closest first.
    pts[1..].sort_by(|a, b| {
        let t = turn_xy(pivot, *a, *b);
        if t.abs() < COLLINEAR_TOL {
            let da = (*a - pivot).truncate().length_squared();
            let db = (*b - pivot).truncate().length_squared();
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        } else if t > 0.0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    });

    let mut hull: Vec<Vec3> = Vec::with_capacity(pts.len());
    for p in pts {
        while hull.len() >= 2 && turn_xy(hull[hull.len() - 2], hull[hull.len() - 1], p) <= COLLINEAR_TOL
        {
            hull.pop();
        }
        hull.push(p);
    }

    if hull.len() < 3 {
        return Vec::new();
    }
    hull
}
