use glam::Vec4;

use crate::{gpu, Grid, Result, Viewport};

/// State carried between frames.
///
/// Starts (and, after [`Self::reset()`], restarts) empty: every pixel is
/// background with a history length of zero, so the first frame is always
/// treated as a disocclusion.
#[derive(Clone, Debug)]
pub struct History {
    /// Previous frame's packed normal & depth.
    pub normal_and_depth: Grid<Vec4>,

    /// Previous frame's demodulated direct radiance, filtered up to the
    /// feedback iteration.
    pub direct: Grid<Vec4>,

    /// See: [`Self::direct`].
    pub indirect: Grid<Vec4>,

    /// Accumulated luminance moments, see [`gpu::Moment::serialize()`].
    pub moment: Grid<Vec4>,

    /// Number of frames each pixel has been accumulated for.
    pub length: Grid<u32>,
}

impl History {
    pub fn new(viewport: Viewport) -> Result<Self> {
        Ok(Self {
            normal_and_depth: Grid::new(viewport)?,
            direct: Grid::new(viewport)?,
            indirect: Grid::new(viewport)?,
            moment: Grid::new(viewport)?,
            length: Grid::new(viewport)?,
        })
    }

    pub fn viewport(&self) -> Viewport {
        self.length.viewport()
    }

    /// Forgets everything, e.g. after a camera cut.
    pub fn reset(&mut self) {
        self.normal_and_depth.fill(Vec4::ZERO);
        self.direct.fill(Vec4::ZERO);
        self.indirect.fill(Vec4::ZERO);
        self.moment.fill(Vec4::ZERO);
        self.length.fill(0);
    }

    pub(crate) fn map(&self) -> gpu::HistoryMap<'_> {
        gpu::HistoryMap {
            normal_and_depth: self.normal_and_depth.as_slice(),
            direct: self.direct.as_slice(),
            indirect: self.indirect.as_slice(),
            moment: self.moment.as_slice(),
            length: self.length.as_slice(),
        }
    }

    pub(crate) fn ensure_viewport(&self, expected: Viewport) -> Result<()> {
        self.normal_and_depth
            .ensure_viewport("history_normal_and_depth", expected)?;

        self.direct.ensure_viewport("history_direct", expected)?;
        self.indirect.ensure_viewport("history_indirect", expected)?;
        self.moment.ensure_viewport("history_moment", expected)?;
        self.length.ensure_viewport("history_length", expected)?;

        Ok(())
    }
}
