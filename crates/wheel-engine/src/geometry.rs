//! Wheel geometry
//!
//! Segments are equal slices laid out clockwise from wheel-local angle 0.
//! Positive rotation turns the wheel clockwise. The pointer is fixed at
//! `POINTER_ANGLE_DEG` in screen space; planning and recovery both read it
//! from here, so moving the pointer only touches this constant.

/// Screen angle of the fixed pointer (0 = top)
pub const POINTER_ANGLE_DEG: f64 = 0.0;

/// Degrees in one full turn
pub const FULL_TURN_DEG: f64 = 360.0;

/// Angular width of one segment
#[inline]
pub fn segment_angle(segment_count: usize) -> f64 {
    FULL_TURN_DEG / segment_count as f64
}

/// Normalise an angle to [0°, 360°).
#[inline]
pub fn normalize_degrees_360(deg: f64) -> f64 {
    deg.rem_euclid(FULL_TURN_DEG)
}

/// Normalise an angle to (-180°, 180°].
pub fn normalize_signed_180(deg: f64) -> f64 {
    let wrapped = normalize_degrees_360(deg);
    if wrapped > 180.0 {
        wrapped - FULL_TURN_DEG
    } else {
        wrapped
    }
}

/// Wheel-local angle of a segment's center
#[inline]
pub fn segment_center_angle(index: usize, segment_count: usize) -> f64 {
    let angle = segment_angle(segment_count);
    index as f64 * angle + angle / 2.0
}

/// Rotation (mod 360) that puts the center of `index` under the pointer
pub fn resting_angle_for(index: usize, segment_count: usize) -> f64 {
    normalize_degrees_360(POINTER_ANGLE_DEG - segment_center_angle(index, segment_count))
}

/// Wheel-local angle currently under the pointer
#[inline]
pub fn angle_under_pointer(rotation_deg: f64) -> f64 {
    normalize_degrees_360(POINTER_ANGLE_DEG - rotation_deg)
}

/// Segment under the pointer for a given wheel rotation
///
/// Returns `None` for an empty wheel.
pub fn segment_at_pointer(rotation_deg: f64, segment_count: usize) -> Option<usize> {
    if segment_count == 0 {
        return None;
    }
    let slot = (angle_under_pointer(rotation_deg) / segment_angle(segment_count)).floor();
    // rem_euclid may round up to exactly 360.0
    Some(slot as usize % segment_count)
}

/// Segment boundaries that pass the pointer while rotating from `from_deg` to `to_deg`
pub fn boundaries_crossed(from_deg: f64, to_deg: f64, segment_count: usize) -> u32 {
    if segment_count == 0 {
        return 0;
    }
    let angle = segment_angle(segment_count);
    let slot = |rotation: f64| ((POINTER_ANGLE_DEG - rotation) / angle).floor();
    (slot(from_deg) - slot(to_deg)).abs() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_signed_180() {
        assert_eq!(normalize_signed_180(-225.0), 135.0);
        assert_eq!(normalize_signed_180(-180.0), 180.0);
        assert_eq!(normalize_signed_180(190.0), -170.0);
        assert_eq!(normalize_signed_180(720.0), 0.0);
    }

    #[test]
    fn test_segment_centers() {
        assert_eq!(segment_angle(4), 90.0);
        assert_eq!(segment_center_angle(2, 4), 225.0);
        assert_eq!(resting_angle_for(2, 4), 135.0);
        assert_eq!(resting_angle_for(0, 1), 180.0);
    }

    #[test]
    fn test_segment_at_pointer() {
        // Unrotated wheel: segment 0 spans [0, 90) and sits right of the pointer
        assert_eq!(segment_at_pointer(0.0, 4), Some(0));
        assert_eq!(segment_at_pointer(-10.0, 4), Some(0));
        assert_eq!(segment_at_pointer(10.0, 4), Some(3));
        assert_eq!(segment_at_pointer(135.0, 4), Some(2));
        assert_eq!(segment_at_pointer(1935.0, 4), Some(2));
        assert_eq!(segment_at_pointer(45.0, 0), None);
    }

    #[test]
    fn test_tiny_negative_remainder() {
        // -1e-20 wraps to exactly 360.0, which is the boundary of segment 0
        assert_eq!(segment_at_pointer(1e-20, 6), Some(0));
    }

    #[test]
    fn test_boundaries_crossed() {
        assert_eq!(boundaries_crossed(0.0, 0.0, 4), 0);
        assert_eq!(boundaries_crossed(0.0, 360.0, 4), 4);
        assert_eq!(boundaries_crossed(10.0, 80.0, 4), 0);
        assert_eq!(boundaries_crossed(10.0, 100.0, 4), 1);
        assert_eq!(boundaries_crossed(0.0, 720.0, 1), 2);
    }
}
