use glam::{vec3, Vec3};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

pub trait Vec3Ext
where
    Self: Sized,
{
    /// Returns luminance of this color-vector.
    fn luma(self) -> f32;

    /// Divides this color-vector by albedo, component-wise, guarding against
    /// black albedo.
    fn demodulate(self, albedo: Self) -> Self;

    /// Tone-maps this color-vector using luminance-based Reinhard operator and
    /// converts it into (approximate) gamma space.
    fn tonemap_sqrt(self) -> Self;
}

impl Vec3Ext for Vec3 {
    fn luma(self) -> f32 {
        self.dot(vec3(0.2126, 0.7152, 0.0722))
    }

    fn demodulate(self, albedo: Self) -> Self {
        self / albedo.max(Vec3::splat(crate::SVGF_EPSILON))
    }

    fn tonemap_sqrt(self) -> Self {
        let color = self / (1.0 + self.luma());

        vec3(
            color.x.max(0.0).sqrt(),
            color.y.max(0.0).sqrt(),
            color.z.max(0.0).sqrt(),
        )
    }
}
