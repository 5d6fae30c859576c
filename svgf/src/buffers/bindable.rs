/// Buffer attached to one of the compute passes, together with the way the
/// kernel accesses it.
#[derive(Clone, Copy, Debug)]
pub struct Binding<'a> {
    pub ty: wgpu::BufferBindingType,
    pub buffer: &'a wgpu::Buffer,
}

impl Binding<'_> {
    pub fn layout(&self, binding: u32) -> wgpu::BindGroupLayoutEntry {
        layout(binding, self.ty)
    }
}

/// Object that can be attached to a pipeline, e.g. a storage buffer.
pub trait Bindable {
    fn bind(&self) -> Binding<'_>;
}

/// Object whose binding depends on the à-trous parity a pass is run with;
/// returns bindings for variant `a` and `b` of the bind group.
///
/// See: [`crate::DoubleBuffered`], [`crate::BindGroup::get()`].
pub trait DoubleBufferedBindable {
    fn bind(&self) -> [Binding<'_>; 2];
}

impl<T> DoubleBufferedBindable for T
where
    T: Bindable,
{
    fn bind(&self) -> [Binding<'_>; 2] {
        [T::bind(self); 2]
    }
}

/// All of the kernels are compute shaders reading whole buffers, so the
/// binding type is the only thing that varies between entries.
fn layout(
    binding: u32,
    ty: wgpu::BufferBindingType,
) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}
