mod bind_group;
mod bindable;
mod double_buffered;
mod mapped_uniform_buffer;
mod storage_buffer;

pub use self::bind_group::*;
pub use self::bindable::*;
pub use self::double_buffered::*;
pub use self::mapped_uniform_buffer::*;
pub use self::storage_buffer::*;

/// Rounds given buffer size up to a multiple of 32 bytes.
fn pad_size(size: usize) -> usize {
    (size + 31) & !31
}
