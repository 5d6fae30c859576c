use std::ops::{Deref, DerefMut};
use std::{any, mem};

use bytemuck::Pod;
use log::debug;

use super::{pad_size, Bindable, Binding};

/// Uniform buffer with a host-side copy of its contents; modifications are
/// uploaded on the next [`Self::flush()`].
#[derive(Debug)]
pub struct MappedUniformBuffer<T> {
    buffer: wgpu::Buffer,
    staging: Staging<T>,
}

impl<T> MappedUniformBuffer<T>
where
    T: Pod,
{
    pub fn new(device: &wgpu::Device, label: impl AsRef<str>, data: T) -> Self {
        let label = label.as_ref();
        let size = pad_size(mem::size_of::<T>());

        debug!(
            "Allocating uniform buffer `{label}`; ty={}, size={size} (padded \
             from {})",
            any::type_name::<T>(),
            mem::size_of::<T>(),
        );

        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::UNIFORM,
            size: size as _,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            staging: Staging::new(data),
        }
    }

    pub fn flush(&mut self, queue: &wgpu::Queue) {
        if let Some(data) = self.staging.take() {
            queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(data));
        }
    }

    /// Returns contents as the shaders see them, i.e. as of the last
    /// [`Self::flush()`]; zeroed before the first one.
    pub fn uploaded(&self) -> &T {
        &self.staging.uploaded
    }
}

impl<T> Deref for MappedUniformBuffer<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.staging.data
    }
}

impl<T> DerefMut for MappedUniformBuffer<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.staging.dirty = true;

        &mut self.staging.data
    }
}

impl<T> Bindable for MappedUniformBuffer<T> {
    fn bind(&self) -> Binding<'_> {
        Binding {
            ty: wgpu::BufferBindingType::Uniform,
            buffer: &self.buffer,
        }
    }
}

#[derive(Debug)]
struct Staging<T> {
    data: T,
    uploaded: T,
    dirty: bool,
}

impl<T> Staging<T>
where
    T: Pod,
{
    fn new(data: T) -> Self {
        Self {
            data,
            uploaded: bytemuck::Zeroable::zeroed(),
            dirty: true,
        }
    }

    /// Returns data that has to be uploaded, if it's changed since the last
    /// call.
    fn take(&mut self) -> Option<&T> {
        if !mem::take(&mut self.dirty) {
            return None;
        }

        self.uploaded = self.data;

        Some(&self.uploaded)
    }
}
