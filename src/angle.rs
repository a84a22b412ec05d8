//! Binary angle measurement.
//!
//! Angles live in a `u32` where the full circle is the full integer range,
//! so addition and subtraction wrap exactly like headings do. That makes
//! the back-face test a single comparison: two wall endpoints more than a
//! half turn apart, as unsigned difference, mean the wall faces away.

use std::fmt;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

const BAM_SCALE: f64 = 4294967296.0; // 2^32 units per turn

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Angle(pub u32);

pub const ANG45: Angle = Angle(0x2000_0000);
pub const ANG90: Angle = Angle(0x4000_0000);
pub const ANG180: Angle = Angle(0x8000_0000);
pub const ANG270: Angle = Angle(0xC000_0000);

impl Angle {
    pub const ZERO: Angle = Angle(0);

    /// Convert from radians, reduced to one turn.
    pub fn from_radians(rad: f32) -> Self {
        let turns = (rad as f64 / std::f64::consts::TAU).rem_euclid(1.0);
        Angle((turns * BAM_SCALE) as u64 as u32)
    }

    /// World heading of the vector `(dx, dy)`; zero points along +x.
    /// Computed in f64 so axis and diagonal headings are bit-exact.
    pub fn from_vector(dx: f32, dy: f32) -> Self {
        let rad = (dy as f64).atan2(dx as f64);
        let turns = (rad / std::f64::consts::TAU).rem_euclid(1.0);
        Angle((turns * BAM_SCALE) as u64 as u32)
    }

    /// Back to radians in `(-pi, pi]`.
    pub fn to_radians(self) -> f32 {
        (self.0 as i32) as f64 as f32 * (std::f64::consts::TAU / BAM_SCALE) as f32
    }

    #[inline]
    pub fn tan(self) -> f32 {
        self.to_radians().tan()
    }
}

impl Add for Angle {
    type Output = Angle;
    #[inline]
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_add(rhs.0))
    }
}

impl Sub for Angle {
    type Output = Angle;
    #[inline]
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0.wrapping_sub(rhs.0))
    }
}

impl Neg for Angle {
    type Output = Angle;
    #[inline]
    fn neg(self) -> Angle {
        Angle(self.0.wrapping_neg())
    }
}

impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Angle) {
        *self = *self + rhs;
    }
}

impl SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Angle) {
        *self = *self - rhs;
    }
}

impl fmt::Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}deg", self.0 as f64 * (360.0 / BAM_SCALE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn arithmetic_wraps_around_the_circle() {
        assert_eq!(ANG270 + ANG180, ANG90);
        assert_eq!(Angle::ZERO - ANG45, Angle(0xE000_0000));
        assert_eq!(-ANG90, ANG270);
    }

    #[test]
    fn unsigned_difference_detects_a_half_turn() {
        // Endpoint order flipped: the difference lands at or past 180.
        let a = Angle::from_radians(0.3);
        let b = Angle::from_radians(-0.3);
        assert!(a - b < ANG180);
        assert!(b - a >= ANG180);
    }

    #[test]
    fn radians_round_trip() {
        for rad in [0.0, FRAC_PI_4, -FRAC_PI_4, FRAC_PI_2, 3.0] {
            let back = Angle::from_radians(rad).to_radians();
            assert!((back - rad).abs() < 1e-4, "{rad} came back as {back}");
        }
        // pi maps to the wrap point and comes back negative.
        assert!((Angle::from_radians(PI).to_radians() + PI).abs() < 1e-4);
    }

    #[test]
    fn vector_headings_hit_the_axes() {
        assert_eq!(Angle::from_vector(1.0, 0.0), Angle::ZERO);
        assert_eq!(Angle::from_vector(0.0, 1.0), ANG90);
        assert_eq!(Angle::from_vector(-1.0, 0.0), ANG180);
        assert_eq!(Angle::from_vector(0.0, -1.0), ANG270);
    }

    #[test]
    fn diagonal_headings_are_exact_eighths() {
        assert_eq!(Angle::from_vector(10.0, 10.0), ANG45);
        assert_eq!(Angle::from_vector(-3.0, -3.0), ANG180 + ANG45);
    }
}
