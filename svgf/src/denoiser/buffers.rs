use std::mem;

use glam::Vec4;
use log::debug;

use crate::{
    gpu, DenoiserSettings, DoubleBuffered, MappedUniformBuffer, StorageBuffer,
    Viewport,
};

/// VRAM counterparts of the CPU executor's grids and scratch buffers.
#[derive(Debug)]
pub struct DenoiserBuffers {
    pub params: MappedUniformBuffer<gpu::DenoiserParams>,

    pub gbuffer_d0: StorageBuffer,
    pub gbuffer_d1: StorageBuffer,

    pub frame_albedo: StorageBuffer,
    pub frame_direct: StorageBuffer,
    pub frame_indirect: StorageBuffer,

    pub history_normal_and_depth: StorageBuffer,
    pub history_direct: StorageBuffer,
    pub history_indirect: StorageBuffer,
    pub history_moment: StorageBuffer,
    pub history_length: StorageBuffer,

    pub temporal_direct: StorageBuffer,
    pub temporal_indirect: StorageBuffer,
    pub temporal_moment: StorageBuffer,
    pub temporal_history_length: StorageBuffer,

    /// Output of variance estimation (in `a`) and of the à-trous iterations,
    /// which ping-pong between `a` and `b`.
    pub direct: DoubleBuffered<StorageBuffer>,

    /// See: [`Self::direct`].
    pub indirect: DoubleBuffered<StorageBuffer>,

    pub accumulator: StorageBuffer,
    pub taa: StorageBuffer,
}

impl DenoiserBuffers {
    pub fn new(
        device: &wgpu::Device,
        viewport: Viewport,
        settings: &DenoiserSettings,
    ) -> Self {
        debug!(
            "Initializing denoiser buffers ({}x{})",
            viewport.width, viewport.height
        );

        let colors = viewport.len() * mem::size_of::<Vec4>();
        let lengths = viewport.len() * mem::size_of::<u32>();
        let buffer = |label, size| StorageBuffer::new(device, label, size);

        Self {
            params: MappedUniformBuffer::new(
                device,
                "svgf_params",
                settings.serialize(viewport),
            ),

            gbuffer_d0: buffer("svgf_gbuffer_d0", colors),
            gbuffer_d1: buffer("svgf_gbuffer_d1", colors),

            frame_albedo: buffer("svgf_frame_albedo", colors),
            frame_direct: buffer("svgf_frame_direct", colors),
            frame_indirect: buffer("svgf_frame_indirect", colors),

            history_normal_and_depth: buffer(
                "svgf_history_normal_and_depth",
                colors,
            ),
            history_direct: buffer("svgf_history_direct", colors),
            history_indirect: buffer("svgf_history_indirect", colors),
            history_moment: buffer("svgf_history_moment", colors),
            history_length: buffer("svgf_history_length", lengths),

            temporal_direct: buffer("svgf_temporal_direct", colors),
            temporal_indirect: buffer("svgf_temporal_indirect", colors),
            temporal_moment: buffer("svgf_temporal_moment", colors),
            temporal_history_length: buffer(
                "svgf_temporal_history_length",
                lengths,
            ),

            direct: DoubleBuffered::<StorageBuffer>::new(
                device,
                "svgf_direct",
                colors,
            ),
            indirect: DoubleBuffered::<StorageBuffer>::new(
                device,
                "svgf_indirect",
                colors,
            ),

            accumulator: buffer("svgf_accumulator", colors),
            taa: buffer("svgf_taa", colors),
        }
    }

    /// Byte length of a buffer holding one `Vec4` per pixel.
    pub fn colors_size(viewport: Viewport) -> wgpu::BufferAddress {
        (viewport.len() * mem::size_of::<Vec4>()) as _
    }
}
