use crate::{DenoiserBuffers, DenoiserComputePass, Shaders, Viewport};

#[derive(Debug)]
pub struct VariancePass {
    pass: DenoiserComputePass,
}

impl VariancePass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        buffers: &DenoiserBuffers,
    ) -> Self {
        let pass = DenoiserComputePass::builder("variance")
            .bind([
                &buffers.params,
                &buffers.gbuffer_d0.bind_readable(),
                &buffers.gbuffer_d1.bind_readable(),
            ])
            .bind([
                &buffers.temporal_direct.bind_readable(),
                &buffers.temporal_indirect.bind_readable(),
                &buffers.temporal_moment.bind_readable(),
                &buffers.temporal_history_length.bind_readable(),
            ])
            .bind([
                &buffers.direct.curr().bind_writable(),
                &buffers.indirect.curr().bind_writable(),
            ])
            .build(device, &shaders.variance);

        Self { pass }
    }

    /// Writes into `a` of [`DenoiserBuffers::direct`] and
    /// [`DenoiserBuffers::indirect`].
    pub fn run(&self, encoder: &mut wgpu::CommandEncoder, viewport: Viewport) {
        self.pass.run(encoder, viewport, false, ());
    }
}
