use bytemuck::Pod;
use derivative::Derivative;
use glam::UVec2;

use crate::{Error, Result, Viewport};

/// Host-side buffer laid out according to a [`Viewport`].
///
/// Entries past the viewport's width (the padding) are kept, but never read
/// nor written by any of the passes.
#[derive(Clone, Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Grid<T> {
    viewport: Viewport,

    #[derivative(Debug = "ignore")]
    data: Vec<T>,
}

impl<T> Grid<T>
where
    T: Clone + Default,
{
    pub fn new(viewport: Viewport) -> Result<Self> {
        Self::filled(viewport, T::default())
    }

    pub fn filled(viewport: Viewport, value: T) -> Result<Self> {
        Error::check_viewport(&viewport)?;

        Ok(Self {
            viewport,
            data: vec![value; viewport.len()],
        })
    }

    pub fn from_fn(
        viewport: Viewport,
        mut f: impl FnMut(UVec2) -> T,
    ) -> Result<Self> {
        let mut this = Self::new(viewport)?;

        for y in 0..viewport.height {
            for x in 0..viewport.width {
                let pos = UVec2::new(x, y);

                this.set(pos, f(pos));
            }
        }

        Ok(this)
    }

    pub fn fill(&mut self, value: T) {
        self.data.fill(value);
    }
}

impl<T> Grid<T> {
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// # Panics
    ///
    /// Panics if `pos` lays outside of the buffer.
    pub fn get(&self, pos: UVec2) -> &T {
        &self.data[self.viewport.index(pos)]
    }

    /// # Panics
    ///
    /// Panics if `pos` lays outside of the buffer.
    pub fn set(&mut self, pos: UVec2, value: T) {
        let idx = self.viewport.index(pos);

        self.data[idx] = value;
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub(crate) fn ensure_viewport(
        &self,
        buffer: &'static str,
        expected: Viewport,
    ) -> Result<()> {
        if self.viewport == expected {
            Ok(())
        } else {
            Err(Error::ViewportMismatch {
                buffer,
                expected,
                actual: self.viewport,
            })
        }
    }
}

impl<T> Grid<T>
where
    T: Pod,
{
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}
