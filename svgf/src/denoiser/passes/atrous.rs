use crate::{gpu, DenoiserBuffers, DenoiserComputePass, Shaders, Viewport};

#[derive(Debug)]
pub struct AtrousPass {
    pass: DenoiserComputePass<gpu::AtrousPassParams>,
}

impl AtrousPass {
    pub fn new(
        device: &wgpu::Device,
        shaders: &Shaders,
        buffers: &DenoiserBuffers,
    ) -> Self {
        let pass = DenoiserComputePass::builder("atrous")
            .bind([
                &buffers.params,
                &buffers.gbuffer_d0.bind_readable(),
                &buffers.gbuffer_d1.bind_readable(),
            ])
            .bind([
                &buffers.direct.curr().bind_readable(),
                &buffers.indirect.curr().bind_readable(),
                &buffers.direct.past().bind_writable(),
                &buffers.indirect.past().bind_writable(),
            ])
            .build(device, &shaders.atrous);

        Self { pass }
    }

    /// Runs given iteration, reading from [`Self::input_alternate()`] and
    /// writing into [`Self::output_alternate()`].
    pub fn run(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        viewport: Viewport,
        iteration: u32,
    ) {
        self.pass.run(
            encoder,
            viewport,
            Self::input_alternate(iteration),
            gpu::AtrousPassParams::new(iteration),
        );
    }

    /// Returns which buffer of the double-buffered pair given iteration reads
    /// from; iteration zero reads variance estimation's output, i.e. `a`.
    pub fn input_alternate(iteration: u32) -> bool {
        iteration % 2 == 1
    }

    /// Returns which buffer of the double-buffered pair holds the output of
    /// given iteration.
    pub fn output_alternate(iteration: u32) -> bool {
        !Self::input_alternate(iteration)
    }

    /// Returns which buffer of the double-buffered pair holds the final
    /// result, after all of the iterations have been run.
    pub fn result_alternate(iterations: u32) -> bool {
        match iterations.checked_sub(1) {
            Some(last) => Self::output_alternate(last),
            None => false,
        }
    }
}
