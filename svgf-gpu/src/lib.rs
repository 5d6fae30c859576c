//! Common structs and per-pixel kernels used by both SVGF shaders and the
//! host-side executors.
//!
//! Every kernel here is a plain function of `screen_pos -> sample` that only
//! reads from immutable slices, which is what allows the same code to run
//! inside a compute shader and inside a thread pool on the CPU.

#![cfg_attr(target_arch = "spirv", no_std)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::manual_range_contains)]

mod edge_stopping;
mod gbuffer;
mod history;
mod moment;
mod normal;
mod params;
mod passes;
mod utils;
mod viewport;

pub use self::edge_stopping::*;
pub use self::gbuffer::*;
pub use self::history::*;
pub use self::moment::*;
pub use self::normal::*;
pub use self::params::*;
pub use self::passes::*;
pub use self::utils::*;
pub use self::viewport::*;

pub mod prelude {
    pub use glam::*;
    #[cfg(target_arch = "spirv")]
    pub use spirv_std::num_traits::Float;

    pub use crate::*;
}

/// Guards divisions in the edge-stopping functions.
pub const SVGF_EPSILON: f32 = 1e-8;

/// Minimum number of frames a pixel has to be accumulated for before its
/// temporal variance estimate is considered trustworthy; below that, variance
/// gets estimated spatially.
pub const MIN_HISTORY_LENGTH: u32 = 4;

/// Minimum cosine between current and historical normal for a history tap to
/// be considered consistent.
pub const TAP_NORMAL_THRESHOLD: f32 = 0.95;

/// How many "depth gradients" a history tap's depth is allowed to differ by.
pub const TAP_DEPTH_THRESHOLD: f32 = 2.0;

/// Added to the per-pixel depth gradient before scaling it by
/// [`TAP_DEPTH_THRESHOLD`], so that surfaces facing the camera head-on don't
/// end up with a zero tolerance.
pub const TAP_DEPTH_BIAS: f32 = 0.01;

/// Radius of the spatial variance estimation gather (7x7).
pub const VARIANCE_RADIUS: i32 = 3;

/// Floor applied to variance estimation's weight sums.
pub const VARIANCE_MIN_WEIGHT: f32 = 1e-6;

/// Weight sums of the à-trous filter must stay above this; the center tap
/// always contributes a weight of one, so anything below means the math went
/// sideways.
pub const ATROUS_MIN_WEIGHT: f32 = 1e-5;

/// Upper bound for the number of à-trous iterations (and so the step size,
/// which grows as `1 << iteration`).
pub const MAX_ATROUS_ITERATIONS: u32 = 10;

/// 3x3 Gaussian used to blur variance before the à-trous filter; indexed by
/// `[|dx|][|dy|]`.
pub const GAUSSIAN_KERNEL: [[f32; 2]; 2] =
    [[1.0 / 4.0, 1.0 / 8.0], [1.0 / 8.0, 1.0 / 16.0]];

/// Offsets of the 2x2 bilinear footprint, ordered to match
/// [`bilinear_weights()`].
pub const BILINEAR_OFFSETS: [[i32; 2]; 4] = [[0, 0], [1, 0], [0, 1], [1, 1]];

/// Size of a workgroup; matches the `threads(...)` attribute of the shaders.
pub const TILE_WIDTH: u32 = 8;

/// See: [`TILE_WIDTH`].
pub const TILE_HEIGHT: u32 = 4;
