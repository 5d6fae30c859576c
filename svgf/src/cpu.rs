use std::mem;

use derivative::Derivative;
use glam::{UVec2, Vec4};
use log::{debug, info, trace};
use rayon::prelude::*;

use crate::{
    gpu, utils, DenoisedFrame, DenoiserSettings, Error, FrameBuffers, GBuffer,
    Grid, History, Result, Viewport,
};

/// Denoiser running all of the passes on the CPU, through a thread pool.
///
/// Kernels are the very same ones the shaders use; each pass is a single
/// parallel map over all pixels of the viewport, and passes run one after
/// another.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct CpuDenoiser {
    viewport: Viewport,
    settings: DenoiserSettings,
    params: gpu::DenoiserParams,

    #[derivative(Debug = "ignore")]
    scratch: Scratch,
}

impl CpuDenoiser {
    pub fn new(viewport: Viewport, settings: DenoiserSettings) -> Result<Self> {
        Error::check_viewport(&viewport)?;
        settings.validate()?;

        info!(
            "Creating CPU denoiser ({}x{})",
            viewport.width, viewport.height
        );

        Ok(Self {
            viewport,
            params: settings.serialize(viewport),
            settings,
            scratch: Scratch::new(viewport),
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn settings(&self) -> &DenoiserSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: DenoiserSettings) -> Result<()> {
        settings.validate()?;

        debug!("Updating settings: {settings:?}");

        self.params = settings.serialize(self.viewport);
        self.settings = settings;

        Ok(())
    }

    /// Reallocates scratch buffers for a new viewport.
    ///
    /// Buffers owned by the caller (frame, G-buffer, history) have to be
    /// reallocated as well, since history doesn't survive a resize.
    pub fn resize(&mut self, viewport: Viewport) -> Result<()> {
        Error::check_viewport(&viewport)?;

        info!(
            "Resizing CPU denoiser ({}x{} -> {}x{})",
            self.viewport.width,
            self.viewport.height,
            viewport.width,
            viewport.height
        );

        self.viewport = viewport;
        self.params = self.settings.serialize(viewport);
        self.scratch = Scratch::new(viewport);

        Ok(())
    }

    /// Denoises a single frame.
    ///
    /// Consumes (and then clears) `frame`, updates `history` for the next
    /// frame and returns the final color.
    pub fn denoise(
        &mut self,
        frame: &mut FrameBuffers,
        gbuffer: &GBuffer,
        history: &mut History,
    ) -> Result<DenoisedFrame> {
        frame.ensure_viewport(self.viewport)?;
        gbuffer.ensure_viewport(self.viewport)?;
        history.ensure_viewport(self.viewport)?;

        trace!("Denoising frame");

        let params = &self.params;
        let viewport = &params.viewport;

        let Scratch {
            temporal_direct,
            temporal_indirect,
            moment,
            history_length,
            front_direct,
            front_indirect,
            back_direct,
            back_indirect,
        } = &mut self.scratch;

        utils::measure("temporal", || {
            let pass = gpu::TemporalPass {
                params,
                gbuffer: gbuffer.map(),
                albedo: frame.albedo.as_slice(),
                direct: frame.direct.as_slice(),
                indirect: frame.indirect.as_slice(),
                history: history.map(),
            };

            dispatch(viewport, |pos| pass.run(pos), |idx, sample| {
                temporal_direct[idx] = sample.direct;
                temporal_indirect[idx] = sample.indirect;
                moment[idx] = sample.moment;
                history_length[idx] = sample.history_length;
            });
        });

        utils::measure("variance", || {
            let pass = gpu::VariancePass {
                params,
                gbuffer: gbuffer.map(),
                direct: temporal_direct.as_slice(),
                indirect: temporal_indirect.as_slice(),
                moment: moment.as_slice(),
                history_length: history_length.as_slice(),
            };

            dispatch(viewport, |pos| pass.run(pos), |idx, sample| {
                front_direct[idx] = sample.direct;
                front_indirect[idx] = sample.indirect;
            });
        });

        for iteration in 0..params.atrous_iterations {
            utils::measure("atrous", || {
                let pass = gpu::AtrousPass {
                    params,
                    gbuffer: gbuffer.map(),
                    direct: front_direct.as_slice(),
                    indirect: front_indirect.as_slice(),
                    step_size: gpu::AtrousPassParams::new(iteration).step_size,
                };

                dispatch(viewport, |pos| pass.run(pos), |idx, sample| {
                    back_direct[idx] = sample.direct;
                    back_indirect[idx] = sample.indirect;
                });
            });

            mem::swap(front_direct, back_direct);
            mem::swap(front_indirect, back_indirect);

            if params.is_feedback_iteration(iteration) {
                history
                    .direct
                    .as_mut_slice()
                    .copy_from_slice(front_direct.as_slice());

                history
                    .indirect
                    .as_mut_slice()
                    .copy_from_slice(front_indirect.as_slice());
            }
        }

        let mut accumulator = Grid::new(self.viewport)?;

        let mut taa = if params.is_taa_enabled() {
            Some(Grid::new(self.viewport)?)
        } else {
            None
        };

        utils::measure("finalize", || {
            let pass = gpu::FinalizePass {
                params,
                normal_and_depth: gbuffer.d0.as_slice(),
                albedo: frame.albedo.as_slice(),
                direct: front_direct.as_slice(),
                indirect: front_indirect.as_slice(),
                temporal_direct: temporal_direct.as_slice(),
                temporal_indirect: temporal_indirect.as_slice(),
                moment: moment.as_slice(),
                history_length: history_length.as_slice(),
            };

            let commits_colors = params.finalize_commits_colors();

            dispatch(viewport, |pos| pass.run(pos), |idx, sample| {
                accumulator.as_mut_slice()[idx] = sample.colour;

                if let Some(taa) = &mut taa {
                    taa.as_mut_slice()[idx] = sample.taa;
                }

                history.normal_and_depth.as_mut_slice()[idx] =
                    sample.history_normal_and_depth;

                history.moment.as_mut_slice()[idx] = sample.history_moment;
                history.length.as_mut_slice()[idx] = sample.history_length;

                if commits_colors {
                    history.direct.as_mut_slice()[idx] = sample.history_direct;

                    history.indirect.as_mut_slice()[idx] =
                        sample.history_indirect;
                }
            });
        });

        frame.clear();

        Ok(DenoisedFrame { accumulator, taa })
    }
}

impl Drop for CpuDenoiser {
    fn drop(&mut self) {
        info!("Releasing CPU denoiser");
    }
}

/// Frame-local buffers, kept around so that they don't have to be
/// reallocated every frame.
struct Scratch {
    temporal_direct: Vec<Vec4>,
    temporal_indirect: Vec<Vec4>,
    moment: Vec<Vec4>,
    history_length: Vec<u32>,
    front_direct: Vec<Vec4>,
    front_indirect: Vec<Vec4>,
    back_direct: Vec<Vec4>,
    back_indirect: Vec<Vec4>,
}

impl Scratch {
    fn new(viewport: Viewport) -> Self {
        debug!("Allocating scratch buffers ({} entries)", viewport.len());

        let buffer = || vec![Vec4::ZERO; viewport.len()];

        Self {
            temporal_direct: buffer(),
            temporal_indirect: buffer(),
            moment: buffer(),
            history_length: vec![0; viewport.len()],
            front_direct: buffer(),
            front_indirect: buffer(),
            back_direct: buffer(),
            back_indirect: buffer(),
        }
    }
}

/// Runs `kernel` for every pixel of the viewport in parallel and then hands
/// the samples to `store`; padding pixels are skipped.
///
/// Since all samples are collected before any of them is stored, this acts
/// as a barrier between passes.
fn dispatch<T>(
    viewport: &Viewport,
    kernel: impl Fn(UVec2) -> T + Sync,
    mut store: impl FnMut(usize, T),
) where
    T: Send,
{
    let samples: Vec<_> = (0..viewport.len())
        .into_par_iter()
        .map(|idx| {
            let pos = viewport.position(idx);

            viewport.contains(pos.as_ivec2()).then(|| kernel(pos))
        })
        .collect();

    for (idx, sample) in samples.into_iter().enumerate() {
        if let Some(sample) = sample {
            store(idx, sample);
        }
    }
}

#[cfg(test)]
mod tests;
