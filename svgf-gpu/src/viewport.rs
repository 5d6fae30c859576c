use bytemuck::{Pod, Zeroable};
use glam::{uvec2, IVec2, UVec2, Vec2};

use crate::{TILE_HEIGHT, TILE_WIDTH};

/// Describes the pixel grid all buffers are laid out in.
///
/// Buffers are row-major with a row stride of `pitch` pixels, which might be
/// larger than `width` for alignment purposes; pixels past `width` are padding
/// and don't get touched by any of the passes.
#[repr(C)]
#[derive(Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
#[cfg_attr(not(target_arch = "spirv"), derive(Debug))]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub pitch: u32,
    pub _padding: u32,
}

impl Viewport {
    /// Creates a viewport with pitch rounded up to the tile width.
    pub fn new(width: u32, height: u32) -> Self {
        let pitch = (width + TILE_WIDTH - 1) / TILE_WIDTH * TILE_WIDTH;

        Self::with_pitch(width, height, pitch)
    }

    pub fn with_pitch(width: u32, height: u32, pitch: u32) -> Self {
        Self {
            width,
            height,
            pitch,
            _padding: 0,
        }
    }

    pub fn size(&self) -> UVec2 {
        uvec2(self.width, self.height)
    }

    /// Number of entries a buffer laid out in this viewport has to have,
    /// padding included.
    pub fn len(&self) -> usize {
        (self.pitch * self.height) as usize
    }

    /// Returns whether given point lays inside the viewport.
    pub fn contains(&self, pos: IVec2) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.x < self.width as i32
            && pos.y < self.height as i32
    }

    /// Given a point in screen-coordinates, returns its index into buffers.
    pub fn index(&self, pos: UVec2) -> usize {
        (pos.y * self.pitch + pos.x) as usize
    }

    /// Inverse of [`Self::index()`]; for padding pixels the returned position
    /// lays outside of the viewport.
    pub fn position(&self, idx: usize) -> UVec2 {
        let idx = idx as u32;

        uvec2(idx % self.pitch, idx / self.pitch)
    }

    /// Clamps given point to the nearest pixel inside the viewport.
    pub fn clamp(&self, pos: IVec2) -> UVec2 {
        pos.clamp(
            IVec2::ZERO,
            self.size().as_ivec2() - IVec2::ONE,
        )
        .as_uvec2()
    }

    /// Returns normalized device coordinates of given pixel's center.
    pub fn pixel_to_ndc(&self, pos: UVec2) -> Vec2 {
        (pos.as_vec2() + 0.5) / self.size().as_vec2() * 2.0 - 1.0
    }

    /// Converts normalized device coordinates into continuous pixel
    /// coordinates, where `(0.0, 0.0)` is the center of the top-left pixel.
    pub fn ndc_to_pixel(&self, ndc: Vec2) -> Vec2 {
        (0.5 + 0.5 * ndc) * self.size().as_vec2() - 0.5
    }

    /// Number of workgroups required to cover the viewport.
    pub fn workgroups(&self) -> UVec2 {
        uvec2(
            (self.width + TILE_WIDTH - 1) / TILE_WIDTH,
            (self.height + TILE_HEIGHT - 1) / TILE_HEIGHT,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::{ivec2, vec2};

    use super::*;

    #[test]
    fn pitch() {
        assert_eq!(8, Viewport::new(1, 1).pitch);
        assert_eq!(8, Viewport::new(8, 1).pitch);
        assert_eq!(904, Viewport::new(904, 600).pitch);
        assert_eq!(912, Viewport::new(905, 600).pitch);
    }

    #[test]
    fn index() {
        let target = Viewport::with_pitch(3, 2, 4);

        assert_eq!(8, target.len());
        assert_eq!(0, target.index(uvec2(0, 0)));
        assert_eq!(2, target.index(uvec2(2, 0)));
        assert_eq!(6, target.index(uvec2(2, 1)));

        for idx in 0..target.len() {
            assert_eq!(idx, target.index(target.position(idx)));
        }

        assert!(!target.contains(target.position(3).as_ivec2()));
    }

    #[test]
    fn contains() {
        let target = Viewport::new(4, 3);

        assert!(target.contains(ivec2(0, 0)));
        assert!(target.contains(ivec2(3, 2)));
        assert!(!target.contains(ivec2(-1, 0)));
        assert!(!target.contains(ivec2(0, -1)));
        assert!(!target.contains(ivec2(4, 0)));
        assert!(!target.contains(ivec2(0, 3)));
    }

    #[test]
    fn ndc() {
        let target = Viewport::new(4, 2);

        for y in 0..2 {
            for x in 0..4 {
                let pos = uvec2(x, y);
                let pixel = target.ndc_to_pixel(target.pixel_to_ndc(pos));

                assert_relative_eq!(pixel.x, x as f32, epsilon = 1e-5);
                assert_relative_eq!(pixel.y, y as f32, epsilon = 1e-5);
            }
        }

        assert_eq!(vec2(-0.75, -0.5), target.pixel_to_ndc(uvec2(0, 0)));
    }

    #[test]
    fn workgroups() {
        assert_eq!(uvec2(113, 150), Viewport::new(904, 600).workgroups());
        assert_eq!(uvec2(1, 1), Viewport::new(2, 2).workgroups());
    }
}
