use glam::{UVec2, Vec4};

use crate::{gpu, GBufferEntry, Grid, Result, Viewport};

/// Noisy per-frame inputs.
///
/// They're consumed by [`crate::CpuDenoiser::denoise()`], which clears them
/// afterwards, so that the renderer can accumulate the next frame's samples
/// right into them.
#[derive(Clone, Debug)]
pub struct FrameBuffers {
    pub albedo: Grid<Vec4>,
    pub direct: Grid<Vec4>,
    pub indirect: Grid<Vec4>,
}

impl FrameBuffers {
    pub fn new(viewport: Viewport) -> Result<Self> {
        Ok(Self {
            albedo: Grid::new(viewport)?,
            direct: Grid::new(viewport)?,
            indirect: Grid::new(viewport)?,
        })
    }

    pub fn clear(&mut self) {
        self.albedo.fill(Vec4::ZERO);
        self.direct.fill(Vec4::ZERO);
        self.indirect.fill(Vec4::ZERO);
    }

    pub(crate) fn ensure_viewport(&self, expected: Viewport) -> Result<()> {
        self.albedo.ensure_viewport("albedo", expected)?;
        self.direct.ensure_viewport("direct", expected)?;
        self.indirect.ensure_viewport("indirect", expected)?;

        Ok(())
    }
}

/// Geometry of the current frame, packed the way kernels expect it; see
/// [`GBufferEntry::pack()`].
#[derive(Clone, Debug)]
pub struct GBuffer {
    pub d0: Grid<Vec4>,
    pub d1: Grid<Vec4>,
}

impl GBuffer {
    /// Creates a G-buffer where every pixel is background.
    pub fn new(viewport: Viewport) -> Result<Self> {
        Ok(Self {
            d0: Grid::new(viewport)?,
            d1: Grid::new(viewport)?,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.d0.viewport()
    }

    pub fn get(&self, pos: UVec2) -> GBufferEntry {
        GBufferEntry::unpack([*self.d0.get(pos), *self.d1.get(pos)])
    }

    pub fn set(&mut self, pos: UVec2, entry: GBufferEntry) {
        let [d0, d1] = entry.pack();

        self.d0.set(pos, d0);
        self.d1.set(pos, d1);
    }

    pub(crate) fn map(&self) -> gpu::GBufferMap<'_> {
        gpu::GBufferMap::new(self.d0.as_slice(), self.d1.as_slice())
    }

    pub(crate) fn ensure_viewport(&self, expected: Viewport) -> Result<()> {
        self.d0.ensure_viewport("gbuffer_d0", expected)?;
        self.d1.ensure_viewport("gbuffer_d1", expected)?;

        Ok(())
    }
}

/// Output of a single denoised frame.
#[derive(Clone, Debug)]
pub struct DenoisedFrame {
    /// Final, remodulated color; alpha is always one.
    pub accumulator: Grid<Vec4>,

    /// Tone-mapped color for the anti-aliasing stage; present only when
    /// [`crate::DenoiserSettings::enable_taa`] is set.
    pub taa: Option<Grid<Vec4>>,
}
