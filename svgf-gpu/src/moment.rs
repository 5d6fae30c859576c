use glam::{vec2, vec4, Vec2, Vec4};

use crate::lerp;

/// First and second raw moments of luminance, tracked separately for direct
/// and indirect lighting.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Moment {
    /// `E[L]` for (direct, indirect)
    pub m1: Vec2,

    /// `E[L^2]` for (direct, indirect)
    pub m2: Vec2,
}

impl Moment {
    /// Creates a moment out of a single sample's luminances.
    pub fn from_luma(direct: f32, indirect: f32) -> Self {
        let m1 = vec2(direct, indirect);

        Self { m1, m2: m1 * m1 }
    }

    pub fn serialize(&self) -> Vec4 {
        vec4(self.m1.x, self.m1.y, self.m2.x, self.m2.y)
    }

    pub fn deserialize(d0: Vec4) -> Self {
        Self {
            m1: vec2(d0.x, d0.y),
            m2: vec2(d0.z, d0.w),
        }
    }

    /// Returns `E[L^2] - E[L]^2` for (direct, indirect).
    ///
    /// Floating-point cancellation can make the difference slightly negative,
    /// hence the clamping.
    pub fn variance(&self) -> Vec2 {
        (self.m2 - self.m1 * self.m1).max(Vec2::ZERO)
    }

    /// Exponential moving average step towards `curr`.
    pub fn blend(self, curr: Self, alpha: f32) -> Self {
        Self {
            m1: lerp(self.m1, curr.m1, alpha),
            m2: lerp(self.m2, curr.m2, alpha),
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn serialization() {
        let target = Moment {
            m1: vec2(1.0, 2.0),
            m2: vec2(3.0, 4.0),
        };

        assert_eq!(vec4(1.0, 2.0, 3.0, 4.0), target.serialize());
        assert_eq!(target, Moment::deserialize(target.serialize()));
    }

    #[test]
    fn variance() {
        let target = Moment {
            m1: vec2(2.0, 0.5),
            m2: vec2(5.0, 0.5),
        };

        assert_relative_eq!(target.variance().x, 1.0);
        assert_relative_eq!(target.variance().y, 0.25);
    }

    #[test]
    fn variance_is_never_negative() {
        for m1 in [-3.0, -0.1, 0.0, 0.7, 1.0, 12.5, 1e6] {
            for m2 in [-1.0, 0.0, 0.3, 1.0, 100.0, 1e12] {
                let target = Moment {
                    m1: vec2(m1, m1),
                    m2: vec2(m2, m2),
                };

                assert!(target.variance().x >= 0.0);
                assert!(target.variance().y >= 0.0);
            }
        }
    }

    #[test]
    fn variance_of_single_sample_is_zero() {
        let target = Moment::from_luma(0.3, 7.0);

        assert_eq!(Vec2::ZERO, target.variance());
    }

    #[test]
    fn blend() {
        let prev = Moment::from_luma(0.0, 1.0);
        let curr = Moment::from_luma(1.0, 1.0);
        let actual = prev.blend(curr, 0.25);

        assert_relative_eq!(actual.m1.x, 0.25);
        assert_relative_eq!(actual.m1.y, 1.0);
        assert_relative_eq!(actual.m2.x, 0.25);
        assert_relative_eq!(actual.m2.y, 1.0);
    }
}
