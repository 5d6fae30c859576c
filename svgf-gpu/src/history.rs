use glam::{IVec2, Vec4, Vec4Swizzles};
#[cfg(target_arch = "spirv")]
use spirv_std::num_traits::Float;

use crate::{
    GBufferEntry, Normal, Viewport, TAP_DEPTH_BIAS, TAP_DEPTH_THRESHOLD,
    TAP_NORMAL_THRESHOLD,
};

/// Read-only view over the previous frame's state.
#[derive(Clone, Copy)]
pub struct HistoryMap<'a> {
    /// Packed normal & depth, see [`crate::GBufferMap::normal_and_depth()`].
    pub normal_and_depth: &'a [Vec4],
    pub direct: &'a [Vec4],
    pub indirect: &'a [Vec4],
    pub moment: &'a [Vec4],
    pub length: &'a [u32],
}

impl<'a> HistoryMap<'a> {
    /// Returns whether history at `pos` can be reused for given surface.
    ///
    /// Out-of-screen taps are never consistent; otherwise the historical
    /// surface must face the same way and lay at (roughly) the same depth.
    pub fn is_tap_consistent(
        &self,
        viewport: &Viewport,
        pos: IVec2,
        surface: &GBufferEntry,
    ) -> bool {
        if !viewport.contains(pos) {
            return false;
        }

        let prev = self.normal_and_depth[viewport.index(pos.as_uvec2())];
        let prev_depth = prev.z;

        if prev_depth == 0.0 {
            return false;
        }

        let prev_normal = Normal::decode(prev.xy());

        let max_depth_change =
            TAP_DEPTH_THRESHOLD * (surface.max_depth_change() + TAP_DEPTH_BIAS);

        let consistent_normals =
            surface.normal.dot(prev_normal) > TAP_NORMAL_THRESHOLD;

        let consistent_depths =
            (surface.prev_depth - prev_depth).abs() < max_depth_change;

        consistent_normals && consistent_depths
    }
}
