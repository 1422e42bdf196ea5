//! Planar geometry utilities
//!
//! Angle normalization and the rigid world <-> body transform used to express
//! reference-line waypoints in the ego frame of a tracked body. Transforms are
//! built as 3x3 homogeneous matrices so they compose with other planar
//! transforms.

use crate::types::BodyState;
use glam::{DMat3, DVec2};
use std::f64::consts::{PI, TAU};

/// Normalize an angle to `[-pi, pi)`.
///
/// `pi` maps to `-pi` exactly. The result is congruent to the input modulo
/// `2 * pi` and the operation is idempotent.
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    // in-range angles are returned bit-for-bit
    if (-PI..PI).contains(&angle) {
        return angle;
    }
    let positive = ((angle % TAU) + TAU) % TAU;
    if positive >= PI {
        positive - TAU
    } else {
        positive
    }
}

/// Normalize every angle of a slice in place.
pub fn normalize_angles(angles: &mut [f64]) {
    for angle in angles.iter_mut() {
        *angle = normalize_angle(*angle);
    }
}

/// Homogeneous transform taking world coordinates into the frame of `body`.
///
/// Translate by `-(x, y)`, then rotate by `-r`.
#[must_use]
pub fn world_to_body_matrix(body: &BodyState) -> DMat3 {
    DMat3::from_angle(-body.r) * DMat3::from_translation(DVec2::new(-body.x, -body.y))
}

/// Homogeneous transform taking body coordinates back into the world frame.
#[must_use]
pub fn body_to_world_matrix(body: &BodyState) -> DMat3 {
    DMat3::from_translation(DVec2::new(body.x, body.y)) * DMat3::from_angle(body.r)
}

/// Express world points in the frame of `body`.
#[must_use]
pub fn world_to_body(points: &[[f64; 2]], body: &BodyState) -> Vec<[f64; 2]> {
    apply(&world_to_body_matrix(body), points)
}

/// Express body-frame points in the world frame.
#[must_use]
pub fn body_to_world(points: &[[f64; 2]], body: &BodyState) -> Vec<[f64; 2]> {
    apply(&body_to_world_matrix(body), points)
}

fn apply(transform: &DMat3, points: &[[f64; 2]]) -> Vec<[f64; 2]> {
    points
        .iter()
        .map(|p| transform.transform_point2(DVec2::from_array(*p)).to_array())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pi_maps_to_minus_pi() {
        assert_eq!(normalize_angle(PI), -PI);
        assert_eq!(normalize_angle(-PI), -PI);
        assert_eq!(normalize_angle(0.0), 0.0);
    }

    #[test]
    fn test_normalize_range_and_congruence() {
        for i in -2000..2000 {
            let theta = f64::from(i) * 0.0173;
            let n = normalize_angle(theta);
            assert!((-PI..PI).contains(&n), "theta={theta} n={n}");
            let turns = (theta - n) / TAU;
            assert!((turns - turns.round()).abs() < 1e-9, "theta={theta} n={n}");
            assert_eq!(normalize_angle(n), n, "not idempotent at {theta}");
        }
    }

    #[test]
    fn test_normalize_tiny_negative() {
        let n = normalize_angle(-1e-20);
        assert!((-PI..PI).contains(&n));
    }

    #[test]
    fn test_identity_body_transform() {
        let body = BodyState::new(0.0, 0.0, 0.0);
        let local = world_to_body(&[[1.0, 2.0]], &body);
        assert_eq!(local, vec![[1.0, 2.0]]);
    }

    #[test]
    fn test_rotated_body_sees_point_ahead() {
        // Body at (1, 1) facing +y; a world point at (1, 3) is 2 m straight ahead
        let body = BodyState::new(1.0, 1.0, std::f64::consts::FRAC_PI_2);
        let local = world_to_body(&[[1.0, 3.0]], &body);
        assert!((local[0][0] - 2.0).abs() < 1e-12);
        assert!(local[0][1].abs() < 1e-12);
    }

    #[test]
    fn test_round_trip() {
        let bodies = [
            BodyState::new(0.0, 0.0, 0.0),
            BodyState::new(-3.5, 12.0, 2.9),
            BodyState::new(100.0, -42.0, -1.2),
        ];
        let points = [[0.0, 0.0], [1.0, -1.0], [57.3, 8.25], [-1000.0, 3.0]];
        for body in &bodies {
            let back = body_to_world(&world_to_body(&points, body), body);
            for (p, q) in points.iter().zip(&back) {
                assert!((p[0] - q[0]).abs() < 1e-5 && (p[1] - q[1]).abs() < 1e-5);
            }
        }
    }
}
