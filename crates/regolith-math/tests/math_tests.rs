//! Integration tests for regolith-math.

use regolith_math::{convex_hull_xy, BlockMat3, Mat3, Vec3, VectorInterval};

// ─── Interval Arithmetic Tests ────────────────────────────────

#[test]
fn static_interval_collapses_to_point() {
    let a = VectorInterval::fixed(Vec3::new(1.0, -2.0, 3.0));
    let b = VectorInterval::fixed(Vec3::new(0.5, 0.5, 0.5));

    let d = a.dot(&b);
    assert_eq!(d.lo, d.hi);
    assert!((d.lo - (0.5 - 1.0 + 1.5)).abs() < 1e-15);

    let c = a.cross(&b);
    assert_eq!(c.lower, c.upper);

    let diff = a - b;
    assert!(diff.is_static());
}

#[test]
fn dot_interval_encloses_sampled_motion() {
    // a(t) sweeps from a0 to a1, b(t) from b0 to b1; every sampled dot
    // product must fall inside the interval bounds.
    let a = VectorInterval::new(Vec3::new(1.0, 0.0, -1.0), Vec3::new(-1.0, 2.0, 0.5));
    let b = VectorInterval::new(Vec3::new(0.0, 1.0, 1.0), Vec3::new(3.0, -1.0, 2.0));

    let bounds = a.dot(&b);
    for i in 0..=20 {
        let t = i as f64 / 20.0;
        let at = a.lower.lerp(a.upper, t);
        let bt = b.lower.lerp(b.upper, t);
        let v = at.dot(bt);
        assert!(
            v >= bounds.lo - 1e-12 && v <= bounds.hi + 1e-12,
            "sampled dot {} outside [{}, {}] at t={}",
            v,
            bounds.lo,
            bounds.hi,
            t
        );
    }
}

#[test]
fn cross_interval_encloses_sampled_motion() {
    let a = VectorInterval::new(Vec3::new(1.0, 2.0, 0.0), Vec3::new(0.0, 1.0, -2.0));
    let b = VectorInterval::new(Vec3::new(-1.0, 0.5, 1.0), Vec3::new(2.0, 0.0, 1.5));

    let bounds = a.cross(&b);
    for i in 0..=20 {
        let t = i as f64 / 20.0;
        let v = a.lower.lerp(a.upper, t).cross(b.lower.lerp(b.upper, t));
        for k in 0..3 {
            assert!(
                v[k] >= bounds.lower[k] - 1e-12 && v[k] <= bounds.upper[k] + 1e-12,
                "cross component {} = {} escaped enclosure at t={}",
                k,
                v[k],
                t
            );
        }
    }
}

#[test]
fn plane_crossing_straddles_zero() {
    // A point dropping through the z=0 plane: the signed distance interval
    // must straddle zero; a point staying above must not.
    let above = Vec3::new(0.0, 0.0, 0.2);
    let below = Vec3::new(0.0, 0.0, -0.2);
    let normal = VectorInterval::fixed(Vec3::Z);

    let crossing = VectorInterval::new(above, below).dot(&normal);
    assert!(crossing.straddles_zero(1e-12));

    let hovering = VectorInterval::new(above, above * 0.5).dot(&normal);
    assert!(!hovering.straddles_zero(1e-12));
}

#[test]
fn scalar_interval_max_abs() {
    let a = VectorInterval::new(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(2.0, 0.0, 0.0));
    let d = a.dot(&VectorInterval::fixed(Vec3::X));
    assert_eq!(d.max_abs(), 3.0);
    assert_eq!(d.width(), 5.0);
}

// ─── Convex Hull Tests ────────────────────────────────────────

#[test]
fn hull_of_square_with_interior_point() {
    let points = vec![
        Vec3::new(0.0, 0.0, 0.1),
        Vec3::new(1.0, 0.0, 0.2),
        Vec3::new(1.0, 1.0, 0.3),
        Vec3::new(0.0, 1.0, 0.4),
        Vec3::new(0.5, 0.5, 0.5), // interior
    ];
    let hull = convex_hull_xy(&points);
    assert_eq!(hull.len(), 4, "interior point must be dropped");
    // No hull vertex is the interior point.
    assert!(hull.iter().all(|p| (p.x - 0.5).abs() > 1e-9 || (p.y - 0.5).abs() > 1e-9));
}

#[test]
fn hull_of_collinear_points_is_degenerate() {
    let points = vec![
        Vec3::new(0.0, 0.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(2.0, 2.0, 0.0),
        Vec3::new(3.0, 3.0, 0.0),
    ];
    assert!(convex_hull_xy(&points).is_empty());
}

#[test]
fn hull_of_too_few_points_is_degenerate() {
    let points = vec![Vec3::ZERO, Vec3::X];
    assert!(convex_hull_xy(&points).is_empty());
}

// ─── Block Matrix Tests ───────────────────────────────────────

#[test]
fn block_round_trip() {
    let mut m = BlockMat3::zeros(2);
    let b = Mat3::from_cols(
        Vec3::new(1.0, 2.0, 3.0),
        Vec3::new(4.0, 5.0, 6.0),
        Vec3::new(7.0, 8.0, 9.0),
    );
    m.set_block(1, 0, b);
    assert_eq!(m.block(1, 0), b);
    assert_eq!(m.block(0, 1), Mat3::ZERO);
    assert_eq!(m.dim(), 6);
    assert_eq!(m.blocks(), 2);
}

#[test]
fn identity_blocks_give_identity_product() {
    let mut m = BlockMat3::zeros(2);
    m.set_block(0, 0, Mat3::IDENTITY);
    m.set_block(1, 1, Mat3::IDENTITY);

    let x = vec![1.0, -2.0, 3.0, 4.0, -5.0, 6.0];
    let y = m.mul_vec(&x);
    for (a, b) in x.iter().zip(y.iter()) {
        assert!((a - b).abs() < 1e-14);
    }
}

#[test]
fn mul_vec_matches_hand_computation() {
    let mut m = BlockMat3::zeros(1);
    // Rows: (1, 2, 0), (0, 1, 0), (0, 0, 2)
    m.set_block(
        0,
        0,
        Mat3::from_cols(
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(2.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 2.0),
        ),
    );
    let y = m.mul_vec(&[1.0, 1.0, 1.0]);
    assert!((y[0] - 3.0).abs() < 1e-14);
    assert!((y[1] - 1.0).abs() < 1e-14);
    assert!((y[2] - 2.0).abs() < 1e-14);
}
