use crate::{DenoiserBuffers, DenoiserComputePass, Shaders, Viewport};

#[derive(Debug)]
pub struct TemporalPass {
    pass: DenoiserComputePass,
}

impl TemporalPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        buffers: &DenoiserBuffers,
    ) -> Self {
        let pass = DenoiserComputePass::builder("temporal")
            .bind([
                &buffers.params,
                &buffers.gbuffer_d0.bind_readable(),
                &buffers.gbuffer_d1.bind_readable(),
                &buffers.frame_albedo.bind_readable(),
                &buffers.frame_direct.bind_readable(),
                &buffers.frame_indirect.bind_readable(),
            ])
            .bind([
                &buffers.history_normal_and_depth.bind_readable(),
                &buffers.history_direct.bind_readable(),
                &buffers.history_indirect.bind_readable(),
                &buffers.history_moment.bind_readable(),
                &buffers.history_length.bind_readable(),
            ])
            .bind([
                &buffers.temporal_direct.bind_writable(),
                &buffers.temporal_indirect.bind_writable(),
                &buffers.temporal_moment.bind_writable(),
                &buffers.temporal_history_length.bind_writable(),
            ])
            .build(device, &shaders.temporal);

        Self { pass }
    }

    pub fn run(&self, encoder: &mut wgpu::CommandEncoder, viewport: Viewport) {
        self.pass.run(encoder, viewport, false, ());
    }
}
