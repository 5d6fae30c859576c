use thiserror::Error;

use crate::Viewport;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum Error {
    #[error("viewport must not be empty (got {width}x{height})")]
    EmptyViewport { width: u32, height: u32 },

    #[error(
        "viewport's pitch ({pitch}) must not be smaller than its width \
         ({width})"
    )]
    InvalidPitch { width: u32, pitch: u32 },

    #[error(
        "buffer `{buffer}` has been allocated for {actual:?}, but the \
         denoiser works on {expected:?}"
    )]
    ViewportMismatch {
        buffer: &'static str,
        expected: Viewport,
        actual: Viewport,
    },

    #[error("invalid setting `{name}`: {reason}")]
    InvalidSetting {
        name: &'static str,
        reason: &'static str,
    },
}

impl Error {
    /// Makes sure given viewport describes a buffer that can be actually
    /// allocated and indexed.
    pub(crate) fn check_viewport(viewport: &Viewport) -> Result<()> {
        if viewport.width == 0 || viewport.height == 0 {
            return Err(Self::EmptyViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        if viewport.pitch < viewport.width {
            return Err(Self::InvalidPitch {
                width: viewport.width,
                pitch: viewport.pitch,
            });
        }

        Ok(())
    }
}
