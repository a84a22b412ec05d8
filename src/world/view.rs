//! The frame's viewpoint.

use crate::angle::Angle;
use glam::{Vec2, Vec3};

/// Eye position and heading, frozen for the duration of one frame. Every
/// component of the render pass reads it; none writes it.
#[derive(Clone, Copy, Debug)]
pub struct Viewpoint {
    /// World position; `z` is the absolute eye height.
    pub pos: Vec3,
    pub angle: Angle,
}

impl Viewpoint {
    pub fn new(pos: Vec3, angle: Angle) -> Self {
        Viewpoint { pos, angle }
    }

    /// World angle from the eye to `p`.
    #[inline]
    pub fn angle_to(&self, p: Vec2) -> Angle {
        Angle::from_vector(p.x - self.pos.x, p.y - self.pos.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle::ANG90;
    use glam::vec2;

    #[test]
    fn angle_to_is_relative_to_eye() {
        let v = Viewpoint::new(Vec3::new(10.0, 10.0, 0.0), Angle::ZERO);
        assert_eq!(v.angle_to(vec2(10.0, 20.0)), ANG90);
    }
}
