mod atrous;
mod finalize;
mod temporal;
mod variance;

pub use self::atrous::*;
pub use self::finalize::*;
pub use self::temporal::*;
pub use self::variance::*;

use glam::Vec4;

/// Direct & indirect radiance of a single pixel, with variances in `.w`.
#[derive(Clone, Copy, Default, PartialEq)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct RadianceSample {
    pub direct: Vec4,
    pub indirect: Vec4,
}

#[cfg(test)]
mod fixtures;
