//! Spatiotemporal variance-guided filtering (SVGF) of path-traced frames.
//!
//! Takes noisy direct & indirect radiance together with a G-buffer, and
//! produces a denoised frame by accumulating samples over time and then
//! blurring them with an edge-aware filter whose strength follows the
//! estimated per-pixel variance.
//!
//! There are two executors sharing the same per-pixel kernels (see
//! [`gpu`]):
//!
//! - [`CpuDenoiser`], running the passes through a thread pool,
//! - `GpuDenoiser` (behind the `gpu` feature), running them as compute
//!   shaders via wgpu.

#![allow(clippy::len_without_is_empty)]

#[cfg(feature = "gpu")]
mod buffers;
mod cpu;
#[cfg(feature = "gpu")]
mod denoiser;
mod error;
mod frame;
mod grid;
mod history;
mod settings;
#[cfg(feature = "gpu")]
mod shaders;
mod utils;

pub use svgf_gpu as gpu;
pub use svgf_gpu::{GBufferEntry, Viewport};

#[cfg(feature = "gpu")]
pub(crate) use self::buffers::*;
pub use self::cpu::*;
#[cfg(feature = "gpu")]
pub use self::denoiser::GpuDenoiser;
#[cfg(feature = "gpu")]
pub(crate) use self::denoiser::*;
pub use self::error::*;
pub use self::frame::*;
pub use self::grid::*;
pub use self::history::*;
pub use self::settings::*;
#[cfg(feature = "gpu")]
pub(crate) use self::shaders::*;
