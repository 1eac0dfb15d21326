//! Dial scrubbing: converting a pointer position on the circular
//! progress control into an absolute remaining time.
//!
//! The geometry here is pure; the drag lifecycle gating (paused only,
//! cancelled by text edit, pointer-up anywhere ends it) lives in the
//! session.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// A pointer position in the host's coordinate space (y grows downward,
/// as in screen coordinates).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// The dial's bounding circle as reported by the host renderer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DialGeometry {
    pub center: Point,
}

/// Transient drag state; exists only between pointer-down and
/// pointer-up.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct DialDrag {
    pub dragging: bool,
}

/// Clockwise angle of `pointer` around `geometry.center`, measured from
/// 12 o'clock. Range `[0, 2*PI)`: 0 at the top, `PI/2` at 3 o'clock,
/// `PI` at the bottom.
pub fn pointer_angle(geometry: DialGeometry, pointer: Point) -> f64 {
    let dx = pointer.x - geometry.center.x;
    let dy = pointer.y - geometry.center.y;
    // atan2 measures from 3 o'clock counter-clockwise in math
    // coordinates; with screen y flipped it runs clockwise, so shifting
    // by a quarter turn puts 0 at the top.
    (dy.atan2(dx) + PI / 2.0).rem_euclid(2.0 * PI)
}

/// Map a clockwise angle to remaining seconds: the top of the dial is a
/// full countdown, sweeping clockwise empties it.
pub fn angle_to_secs(angle: f64, total_secs: u32) -> u32 {
    if total_secs == 0 {
        return 0;
    }
    let progress = angle / (2.0 * PI);
    let time_left = (total_secs as f64 * (1.0 - progress)).round();
    (time_left.max(0.0) as u32).min(total_secs)
}

/// Pointer position straight to remaining seconds.
pub fn pointer_to_secs(geometry: DialGeometry, pointer: Point, total_secs: u32) -> u32 {
    angle_to_secs(pointer_angle(geometry, pointer), total_secs)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CENTER: DialGeometry = DialGeometry {
        center: Point { x: 100.0, y: 100.0 },
    };

    #[test]
    fn cardinal_points_map_clockwise_from_top() {
        let top = Point { x: 100.0, y: 0.0 };
        let right = Point { x: 200.0, y: 100.0 };
        let bottom = Point { x: 100.0, y: 200.0 };
        let left = Point { x: 0.0, y: 100.0 };
        assert!((pointer_angle(CENTER, top) - 0.0).abs() < 1e-9);
        assert!((pointer_angle(CENTER, right) - PI / 2.0).abs() < 1e-9);
        assert!((pointer_angle(CENTER, bottom) - PI).abs() < 1e-9);
        assert!((pointer_angle(CENTER, left) - 3.0 * PI / 2.0).abs() < 1e-9);
    }

    #[test]
    fn top_is_full_bottom_is_half_near_full_turn_is_empty() {
        let total = 52 * 60;
        assert_eq!(angle_to_secs(0.0, total), total);
        assert_eq!(angle_to_secs(PI, total), total / 2);
        let near_full = 2.0 * PI - 1e-6;
        assert_eq!(angle_to_secs(near_full, total), 0);
    }

    #[test]
    fn result_is_always_clamped() {
        let total = 17 * 60;
        for i in 0..=360 {
            let angle = 2.0 * PI * (i as f64) / 360.0;
            let secs = angle_to_secs(angle.min(2.0 * PI - f64::EPSILON), total);
            assert!(secs <= total);
        }
        assert_eq!(angle_to_secs(0.3, 0), 0);
    }

    #[test]
    fn pointer_to_secs_composes() {
        let total = 3120;
        let top = Point { x: 100.0, y: 10.0 };
        assert_eq!(pointer_to_secs(CENTER, top, total), total);
        let bottom = Point { x: 100.0, y: 300.0 };
        assert_eq!(pointer_to_secs(CENTER, bottom, total), total / 2);
    }
}
