//! View-relative angle to screen column mapping.
//!
//! The classic engine bakes this into the `viewangletox` table; here the
//! same mapping is computed directly from the focal length. It is monotonic
//! over the viewing cone: `+clip_angle` lands on column 0, `-clip_angle`
//! on `width`, one past the last drawable column.

use crate::angle::Angle;

pub struct Projection {
    width: i32,
    centerx: f32,
    focal: f32,
    clip_angle: Angle,
}

impl Projection {
    /// `fov` is the full horizontal field of view in radians.
    pub fn new(width: usize, fov: f32) -> Self {
        let centerx = width as f32 * 0.5;
        Projection {
            width: width as i32,
            centerx,
            focal: centerx / (fov * 0.5).tan(),
            clip_angle: Angle::from_radians(fov * 0.5),
        }
    }

    /// Half the horizontal field of view; view-relative angles beyond
    /// `±clip_angle` are off screen.
    #[inline]
    pub fn clip_angle(&self) -> Angle {
        self.clip_angle
    }

    /// Screen column for a view-relative angle (positive = left of the view
    /// direction). Callers clamp the angle into the viewing cone first; the
    /// result is in `[0, width]`.
    pub fn angle_to_column(&self, angle: Angle) -> i32 {
        let x = (self.centerx - angle.tan() * self.focal).ceil();
        (x as i32).clamp(0, self.width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn cone_edges_map_to_screen_edges() {
        let p = Projection::new(320, FRAC_PI_2);
        assert_eq!(p.angle_to_column(p.clip_angle()), 0);
        assert_eq!(p.angle_to_column(-p.clip_angle()), 320);
        assert_eq!(p.angle_to_column(Angle::ZERO), 160);
    }

    #[test]
    fn mapping_is_monotonic() {
        let p = Projection::new(320, FRAC_PI_2);
        let mut prev = p.angle_to_column(p.clip_angle());
        for i in 1..=64 {
            // Sweep +clip .. -clip.
            let t = i as f32 / 64.0;
            let rad = FRAC_PI_2 * 0.5 * (1.0 - 2.0 * t);
            let col = p.angle_to_column(Angle::from_radians(rad));
            assert!(col >= prev, "column went backwards at step {i}");
            prev = col;
        }
        assert_eq!(prev, 320);
    }
}
