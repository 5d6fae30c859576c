mod f32_ext;
mod vec3_ext;

use core::ops;

use glam::{vec4, Vec2, Vec4};

pub use self::f32_ext::*;
pub use self::vec3_ext::*;

pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: ops::Add<Output = T>,
    T: ops::Sub<Output = T>,
    T: ops::Mul<f32, Output = T>,
    T: Copy,
{
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Returns bilinear weights of the 2x2 footprint at given fractional
/// position, in the order of [`crate::BILINEAR_OFFSETS`].
pub fn bilinear_weights(uv: Vec2) -> Vec4 {
    let w0 = (1.0 - uv.x) * (1.0 - uv.y);
    let w1 = uv.x * (1.0 - uv.y);
    let w2 = (1.0 - uv.x) * uv.y;

    vec4(w0, w1, w2, 1.0 - w0 - w1 - w2)
}
