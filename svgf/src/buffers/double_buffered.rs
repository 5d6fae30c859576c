use crate::{Bindable, Binding, DoubleBufferedBindable, StorageBuffer};

/// Pair of buffers used for ping-ponging; which one is read and which one is
/// written depends on the `alternate` flag the pass is run with.
#[derive(Debug)]
pub struct DoubleBuffered<T> {
    a: T,
    b: T,
}

impl DoubleBuffered<StorageBuffer> {
    /// Creates a double-buffered storage buffer.
    ///
    /// See: [`StorageBuffer::new()`].
    pub fn new(
        device: &wgpu::Device,
        label: impl AsRef<str>,
        size: usize,
    ) -> Self {
        let label = label.as_ref();

        Self {
            a: StorageBuffer::new(device, format!("{label}_a"), size),
            b: StorageBuffer::new(device, format!("{label}_b"), size),
        }
    }
}

impl DoubleBuffered<&StorageBuffer> {
    /// See: [`StorageBuffer::bind_readable()`].
    pub fn bind_readable(&self) -> impl DoubleBufferedBindable + '_ {
        DoubleBufferedBinder {
            a: self.a.bind_readable(),
            b: self.b.bind_readable(),
        }
    }

    /// See: [`StorageBuffer::bind_writable()`].
    pub fn bind_writable(&self) -> impl DoubleBufferedBindable + '_ {
        DoubleBufferedBinder {
            a: self.a.bind_writable(),
            b: self.b.bind_writable(),
        }
    }
}

impl<T> DoubleBuffered<T> {
    pub fn get(&self, alternate: bool) -> &T {
        if alternate {
            &self.b
        } else {
            &self.a
        }
    }

    /// Returns a view where `a` is `a`; that is, non-alternate passes see the
    /// first buffer.
    pub fn curr(&self) -> DoubleBuffered<&T> {
        DoubleBuffered {
            a: &self.a,
            b: &self.b,
        }
    }

    /// Returns a view where `a` and `b` are swapped; binding `curr()` as the
    /// input and `past()` as the output makes a pass read one buffer and write
    /// the other.
    pub fn past(&self) -> DoubleBuffered<&T> {
        DoubleBuffered {
            a: &self.b,
            b: &self.a,
        }
    }
}

pub struct DoubleBufferedBinder<T> {
    a: T,
    b: T,
}

impl<T> DoubleBufferedBindable for DoubleBufferedBinder<T>
where
    T: Bindable,
{
    fn bind(&self) -> [Binding<'_>; 2] {
        [self.a.bind(), self.b.bind()]
    }
}
