//! Mapping from wheel rotation to the segment under the pointer.
//!
//! Angles follow the canvas convention: 0 is 3 o'clock and angles grow
//! clockwise. The pointer is drawn at 12 o'clock, i.e. `3π/2` in the
//! unrotated frame of the wheel.

use std::f64::consts::{PI, TAU};

pub const POINTER_ANGLE: f64 = 1.5 * PI;

/// Angular width of one segment. `segment_count` must be non-zero.
pub fn segment_angle(segment_count: usize) -> f64 {
    TAU / segment_count as f64
}

/// Index of the segment whose span contains `(3π/2 - rotation) mod 2π`.
///
/// Used both for the per-tick click feedback and for the final result, so
/// the two can never disagree.
///
/// # Panics
///
/// Panics if `segment_count` is zero. Loaded wheels always have at least
/// one segment.
pub fn resolve(rotation: f64, segment_count: usize) -> usize {
    assert!(segment_count > 0, "a wheel has at least one segment");

    let normalized_rotation = rotation.rem_euclid(TAU);
    let pointer_angle = (POINTER_ANGLE - normalized_rotation).rem_euclid(TAU);

    // rem_euclid may round up to exactly TAU, the modulo folds that back to 0
    let index = (pointer_angle / segment_angle(segment_count)).floor() as usize;
    index % segment_count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_boundary_is_segment_zero() {
        for n in 1..=24 {
            assert_eq!(resolve(POINTER_ANGLE, n), 0, "segment count {}", n);
        }
    }

    #[test]
    fn test_near_zero_rotation() {
        // Unrotated, the pointer sits three quarters around, on the 2|3 boundary
        // of a four segment wheel.
        assert_eq!(resolve(0.01, 4), 2);
        assert_eq!(resolve(-0.01, 4), 3);
        assert_eq!(resolve(0.01, 8), 5);
        assert_eq!(resolve(-0.01, 8), 6);
    }

    #[test]
    fn test_periodicity() {
        let rotations = [0.3, 1.1, -2.7, 10.0, 123.456, -0.05];
        for n in 1..=12 {
            for &rotation in &rotations {
                let base = resolve(rotation, n);
                for k in -3i32..=3 {
                    assert_eq!(
                        resolve(rotation + TAU * k as f64, n),
                        base,
                        "rotation {} segments {} turns {}",
                        rotation,
                        n,
                        k
                    );
                }
            }
        }
    }

    #[test]
    fn test_index_decreases_as_wheel_turns_clockwise() {
        let n = 8;
        let step = segment_angle(n);
        // Start in the middle of a segment to stay away from boundaries.
        let start = step / 2.0;
        let first = resolve(start, n);
        let second = resolve(start + step, n);
        assert_eq!((first + n - 1) % n, second);
    }

    #[test]
    fn test_single_segment_always_wins() {
        for rotation in [-100.0, -1.0, 0.0, 0.5, PI, 42.0] {
            assert_eq!(resolve(rotation, 1), 0);
        }
    }

    #[test]
    fn test_result_is_always_in_range() {
        let mut rotation = -50.0;
        while rotation < 50.0 {
            for n in [1, 2, 3, 7, 31] {
                assert!(resolve(rotation, n) < n);
            }
            rotation += 0.173;
        }
    }

    #[test]
    #[should_panic(expected = "a wheel has at least one segment")]
    fn test_empty_wheel_has_no_pointer_segment() {
        resolve(0.0, 0);
    }
}
