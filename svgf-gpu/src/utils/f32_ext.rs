#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

pub trait F32Ext
where
    Self: Sized,
{
    fn sqr(self) -> Self;

    /// Returns `1 / sqrt(self + SVGF_EPSILON)`, treating negative values as
    /// zero.
    fn inverse_sqrt(self) -> Self;
}

impl F32Ext for f32 {
    fn sqr(self) -> Self {
        self * self
    }

    fn inverse_sqrt(self) -> Self {
        1.0 / (self.max(0.0) + crate::SVGF_EPSILON).sqrt()
    }
}
