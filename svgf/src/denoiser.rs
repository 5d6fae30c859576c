mod buffers;
mod pass;
mod passes;

use std::mem;

use log::{debug, info, trace};

pub use self::buffers::*;
pub use self::pass::*;
pub use self::passes::*;
use crate::{
    gpu, DenoiserSettings, Error, FrameBuffers, GBuffer, Result, Shaders,
    Viewport,
};

/// Denoiser running all of the passes on the GPU.
///
/// Usage boils down to:
///
/// - uploading the frame through [`Self::write_frame()`] and
///   [`Self::write_gbuffer()`],
/// - calling [`Self::flush()`] to upload modified settings,
/// - recording the passes via [`Self::render()`],
/// - reading the result out of [`Self::accumulator()`] (and, optionally,
///   [`Self::taa()`]).
///
/// History lives in VRAM and is owned by the denoiser.
#[derive(Debug)]
pub struct GpuDenoiser {
    viewport: Viewport,
    settings: DenoiserSettings,
    shaders: Shaders,
    buffers: DenoiserBuffers,
    passes: DenoiserPasses,
}

impl GpuDenoiser {
    /// Device features the denoiser needs; the device passed into
    /// [`Self::new()`] must have been created with them.
    pub fn required_features() -> wgpu::Features {
        wgpu::Features::PUSH_CONSTANTS
    }

    /// Device limits the denoiser needs, see [`Self::required_features()`].
    pub fn required_limits() -> wgpu::Limits {
        wgpu::Limits {
            // Finalize binds fifteen storage buffers
            max_storage_buffers_per_shader_stage: 16,
            max_push_constant_size: mem::size_of::<gpu::AtrousPassParams>()
                as u32,
            ..Default::default()
        }
    }

    pub fn new(
        device: &wgpu::Device,
        viewport: Viewport,
        settings: DenoiserSettings,
    ) -> Result<Self> {
        Error::check_viewport(&viewport)?;
        settings.validate()?;

        info!(
            "Creating GPU denoiser ({}x{})",
            viewport.width, viewport.height
        );

        let shaders = Shaders::new(device);
        let buffers = DenoiserBuffers::new(device, viewport, &settings);
        let passes = DenoiserPasses::new(device, &shaders, &buffers);

        debug!("GPU denoiser created");

        Ok(Self {
            viewport,
            settings,
            shaders,
            buffers,
            passes,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn settings(&self) -> &DenoiserSettings {
        &self.settings
    }

    /// Updates settings; they get uploaded, and take effect, on the next
    /// [`Self::flush()`].
    pub fn set_settings(&mut self, settings: DenoiserSettings) -> Result<()> {
        settings.validate()?;

        debug!("Updating settings: {settings:?}");

        *self.buffers.params = settings.serialize(self.viewport);
        self.settings = settings;

        Ok(())
    }

    /// Reallocates all of the buffers for a new viewport, dropping history;
    /// settings have to be uploaded again through [`Self::flush()`].
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        viewport: Viewport,
    ) -> Result<()> {
        Error::check_viewport(&viewport)?;

        info!(
            "Resizing GPU denoiser ({}x{} -> {}x{})",
            self.viewport.width,
            self.viewport.height,
            viewport.width,
            viewport.height
        );

        self.viewport = viewport;
        self.rebuild_buffers(device);
        self.rebuild_passes(device);

        Ok(())
    }

    fn rebuild_buffers(&mut self, device: &wgpu::Device) {
        debug!("Rebuilding buffers");

        self.buffers =
            DenoiserBuffers::new(device, self.viewport, &self.settings);
    }

    fn rebuild_passes(&mut self, device: &wgpu::Device) {
        debug!("Rebuilding passes");

        self.passes = DenoiserPasses::new(device, &self.shaders, &self.buffers);
    }

    /// Uploads noisy inputs of the current frame.
    pub fn write_frame(
        &self,
        queue: &wgpu::Queue,
        frame: &FrameBuffers,
    ) -> Result<()> {
        frame.ensure_viewport(self.viewport)?;

        self.buffers
            .frame_albedo
            .write(queue, frame.albedo.as_slice());

        self.buffers
            .frame_direct
            .write(queue, frame.direct.as_slice());

        self.buffers
            .frame_indirect
            .write(queue, frame.indirect.as_slice());

        Ok(())
    }

    /// Uploads geometry of the current frame.
    pub fn write_gbuffer(
        &self,
        queue: &wgpu::Queue,
        gbuffer: &GBuffer,
    ) -> Result<()> {
        gbuffer.ensure_viewport(self.viewport)?;

        self.buffers.gbuffer_d0.write(queue, gbuffer.d0.as_slice());
        self.buffers.gbuffer_d1.write(queue, gbuffer.d1.as_slice());

        Ok(())
    }

    pub fn flush(&mut self, queue: &wgpu::Queue) {
        self.buffers.params.flush(queue);
    }

    /// Records all of the passes into given encoder.
    ///
    /// Passes run with settings as of the last [`Self::flush()`]; settings
    /// changed afterwards don't affect the recorded frame, not even the
    /// number of à-trous iterations.
    ///
    /// Frame buffers get cleared at the end, so that the renderer can
    /// accumulate the next frame's samples right into them.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder) {
        trace!("Rendering frame");

        let params = *self.buffers.params.uploaded();
        let viewport = self.viewport;

        self.passes.temporal.run(encoder, viewport);
        self.passes.variance.run(encoder, viewport);

        for iteration in 0..params.atrous_iterations {
            self.passes.atrous.run(encoder, viewport, iteration);

            if params.is_feedback_iteration(iteration) {
                let alternate = AtrousPass::output_alternate(iteration);
                let size = DenoiserBuffers::colors_size(viewport);

                encoder.copy_buffer_to_buffer(
                    self.buffers.direct.get(alternate).buffer(),
                    0,
                    self.buffers.history_direct.buffer(),
                    0,
                    size,
                );

                encoder.copy_buffer_to_buffer(
                    self.buffers.indirect.get(alternate).buffer(),
                    0,
                    self.buffers.history_indirect.buffer(),
                    0,
                    size,
                );
            }
        }

        self.passes
            .finalize
            .run(encoder, viewport, params.atrous_iterations);

        encoder.clear_buffer(self.buffers.frame_albedo.buffer(), 0, None);
        encoder.clear_buffer(self.buffers.frame_direct.buffer(), 0, None);
        encoder.clear_buffer(self.buffers.frame_indirect.buffer(), 0, None);
    }

    /// Buffer with the final color, one `Vec4` per pixel, laid out according
    /// to [`Self::viewport()`].
    pub fn accumulator(&self) -> &wgpu::Buffer {
        self.buffers.accumulator.buffer()
    }

    /// Buffer with the tone-mapped color for the anti-aliasing stage; present
    /// only when [`DenoiserSettings::enable_taa`] was set as of the last
    /// [`Self::flush()`].
    pub fn taa(&self) -> Option<&wgpu::Buffer> {
        self.buffers
            .params
            .uploaded()
            .is_taa_enabled()
            .then(|| self.buffers.taa.buffer())
    }
}

impl Drop for GpuDenoiser {
    fn drop(&mut self) {
        info!("Releasing GPU denoiser");
    }
}
