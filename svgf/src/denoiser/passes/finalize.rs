use crate::{
    AtrousPass, DenoiserBuffers, DenoiserComputePass, Shaders, Viewport,
};

#[derive(Debug)]
pub struct FinalizePass {
    pass: DenoiserComputePass,
}

impl FinalizePass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        buffers: &DenoiserBuffers,
    ) -> Self {
        let pass = DenoiserComputePass::builder("finalize")
            .bind([
                &buffers.params,
                &buffers.gbuffer_d0.bind_readable(),
                &buffers.frame_albedo.bind_readable(),
            ])
            .bind([
                &buffers.direct.curr().bind_readable(),
                &buffers.indirect.curr().bind_readable(),
                &buffers.temporal_direct.bind_readable(),
                &buffers.temporal_indirect.bind_readable(),
                &buffers.temporal_moment.bind_readable(),
                &buffers.temporal_history_length.bind_readable(),
            ])
            .bind([
                &buffers.history_normal_and_depth.bind_writable(),
                &buffers.history_direct.bind_writable(),
                &buffers.history_indirect.bind_writable(),
                &buffers.history_moment.bind_writable(),
                &buffers.history_length.bind_writable(),
                &buffers.accumulator.bind_writable(),
                &buffers.taa.bind_writable(),
            ])
            .build(device, &shaders.finalize);

        Self { pass }
    }

    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        viewport: Viewport,
        atrous_iterations: u32,
    ) {
        self.pass.run(
            encoder,
            viewport,
            AtrousPass::result_alternate(atrous_iterations),
            (),
        );
    }
}
