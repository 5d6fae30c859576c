//! Compute entry points of the denoiser; each pass lives in its own module
//! and exposes a single `main()` function.
//!
//! Binding layouts here have to match the ones built by `svgf::GpuDenoiser`.

#![cfg_attr(target_arch = "spirv", no_std)]

pub mod atrous;
pub mod finalize;
pub mod temporal;
pub mod variance;
