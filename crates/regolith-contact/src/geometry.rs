//! Instantaneous geometric tests used by the narrow phase.
//!
//! The swept interval filters only say a pair *may* touch during the step;
//! these tests localize the touch at the current instant.

use regolith_math::Vec3;

/// Result of projecting a support point into a triangle.
#[derive(Debug, Clone, Copy)]
pub struct FaceProjection {
    /// Projection of the support point onto the triangle plane.
    pub point: Vec3,
    /// Unsigned distance from the support point to the plane.
    pub distance: f64,
}

/// Projects `support` onto the plane of triangle `(v0, v1, v2)` and tests
/// whether the projection lies inside the triangle.
///
/// The inside test splits the plane into three sectors by the inward
/// vertex bisectors (oriented by the face normal), then checks the
/// projection against the edge bounding its sector. Points on an edge
/// count as inside; the caller's deduplication keeps shared edges from
/// double-reporting.
pub fn project_into_triangle(
    support: Vec3,
    v0: Vec3,
    v1: Vec3,
    v2: Vec3,
) -> Option<FaceProjection> {
    let u01 = v1 - v0;
    let u02 = v2 - v0;
    let u12 = v2 - v1;
    let n = u01.cross(u02).normalize();

    let alpha = (support - v0).dot(n);
    let point = support - alpha * n;
    let projection = FaceProjection {
        point,
        distance: alpha.abs(),
    };

    // Inward bisector directions at each vertex.
    let b0 = -u01.normalize() - u02.normalize();
    let b1 = -u12.normalize() + u01.normalize();
    let b2 = u02.normalize() + u12.normalize();

    let f0 = b0.cross(point - v0).dot(n);
    let f1 = b1.cross(point - v1).dot(n);
    let f2 = b2.cross(point - v2).dot(n);

    let on_inner_side = |a: Vec3, b: Vec3| ((a - point).cross(b - point)).dot(n) >= -1e-9;

    if f1 <= 0.0 && f0 > 0.0 {
        return on_inner_side(v0, v1).then_some(projection);
    }
    if f2 <= 0.0 && f1 > 0.0 {
        return on_inner_side(v1, v2).then_some(projection);
    }
    if f0 <= 0.0 && f2 > 0.0 {
        return on_inner_side(v2, v0).then_some(projection);
    }
    None
}

/// Closest-approach classification between two segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentClosest {
    /// Closest points fall inside both segments.
    Crossing {
        /// Closest point on segment 1.
        point_a: Vec3,
        /// Closest point on segment 2.
        point_b: Vec3,
    },
    /// Segments are nearly parallel with overlapping spans; the points are
    /// representative midpoints of the overlap.
    ParallelOverlap {
        /// Representative point on segment 1.
        point_a: Vec3,
        /// Representative point on segment 2.
        point_b: Vec3,
    },
    /// Closest approach lies outside at least one segment.
    Disjoint,
}

/// Computes the closest approach between segment `(p1, p2)` and segment
/// `(p3, p4)`.
///
/// Nearly-parallel pairs (vanishing denominator) fall through to explicit
/// overlap cases resolved by projecting segment endpoints.
pub fn segment_closest_points(p1: Vec3, p2: Vec3, p3: Vec3, p4: Vec3) -> SegmentClosest {
    let line21 = p2 - p1;

    // Orient segment 2 along segment 1 so the overlap cases below see a
    // consistent arrangement.
    let (v3, v4) = if line21.dot(p4 - p3) < 0.0 {
        (p4, p3)
    } else {
        (p3, p4)
    };
    let line13 = p1 - v3;
    let line43 = v4 - v3;

    let d1343 = line13.dot(line43);
    let d4321 = line43.dot(line21);
    let d1321 = line13.dot(line21);
    let d4343 = line43.dot(line43);
    let d2121 = line21.dot(line21);

    let denom = d2121 * d4343 - d4321 * d4321;
    if denom.abs() < 1e-9 {
        let line23 = p2 - v3;
        let line24 = p2 - v4;
        let line41 = v4 - p1;

        // Segment 2 starts inside segment 1 and extends past its end.
        if line13.dot(line43) < 0.0 && line24.dot(-line43) > 0.0 {
            let a = p1 + ((-line13).dot(line21) / d2121) * line21;
            let b = v3 + (line23.dot(line43) / d4343) * line43;
            return SegmentClosest::ParallelOverlap {
                point_a: (a + p2) / 2.0,
                point_b: (b + v3) / 2.0,
            };
        }
        // Segment 2 lies entirely within segment 1's span.
        if line13.dot(line43) < 0.0 && line24.dot(-line43) < 0.0 {
            let a1 = p1 + ((-line13).dot(line21) / d2121) * line21;
            let a2 = p1 + (line41.dot(line21) / d2121) * line21;
            return SegmentClosest::ParallelOverlap {
                point_a: (a1 + a2) / 2.0,
                point_b: (v3 + v4) / 2.0,
            };
        }
        // Segment 2 starts before segment 1 and ends inside it.
        if (-line43).dot(line24) < 0.0 && line13.dot(line43) > 0.0 {
            let a = p1 + (line41.dot(line21) / d2121) * line21;
            let b = v3 + (line13.dot(line43) / d4343) * line43;
            return SegmentClosest::ParallelOverlap {
                point_a: (a + p1) / 2.0,
                point_b: (b + v4) / 2.0,
            };
        }
        // Segment 2 extends past segment 1 on both sides.
        if (-line43).dot(line24) > 0.0 && line13.dot(line43) > 0.0 {
            let b1 = v3 + (line13.dot(line43) / d4343) * line43;
            let b2 = v3 + (line23.dot(line43) / d4343) * line43;
            return SegmentClosest::ParallelOverlap {
                point_a: (p1 + p2) / 2.0,
                point_b: (b1 + b2) / 2.0,
            };
        }
        // End-to-end arrangements touching at a single point.
        let t = line21.dot(-line23);
        if (-1e-6..=1e-6).contains(&t) {
            return SegmentClosest::ParallelOverlap {
                point_a: p2,
                point_b: v3,
            };
        }
        let t = (-line41).dot(line21);
        if (-1e-6..=1e-6).contains(&t) {
            return SegmentClosest::ParallelOverlap {
                point_a: p1,
                point_b: v4,
            };
        }
        let t1 = line21.dot(line13);
        let t2 = line21.dot(line24);
        if (-1e-6..=1e-6).contains(&t1) && (-1e-6..=1e-6).contains(&t2) {
            return SegmentClosest::ParallelOverlap {
                point_a: (p1 + p2) / 2.0,
                point_b: (v3 + v4) / 2.0,
            };
        }
        return SegmentClosest::Disjoint;
    }

    let numer = d1343 * d4321 - d1321 * d4343;
    let mua = numer / denom;
    let mub = (d1343 + d4321 * mua) / d4343;

    if !(0.0..=1.0).contains(&mua) || !(0.0..=1.0).contains(&mub) {
        return SegmentClosest::Disjoint;
    }

    SegmentClosest::Crossing {
        point_a: p1 + mua * line21,
        point_b: v3 + mub * line43,
    }
}
