use log::debug;

use crate::{Binding, DoubleBufferedBindable};

/// Bind group created in two variants: `a` binds the first buffer of every
/// double-buffered item, `b` binds the second one; single buffers are bound
/// the same way in both.
#[derive(Debug)]
pub struct BindGroup {
    a: wgpu::BindGroup,
    b: wgpu::BindGroup,
    layout: wgpu::BindGroupLayout,
}

impl BindGroup {
    pub fn builder<'a>(label: impl ToString) -> BindGroupBuilder<'a> {
        BindGroupBuilder {
            label: label.to_string(),
            bindings: Default::default(),
        }
    }

    pub fn get(&self, alternate: bool) -> &wgpu::BindGroup {
        if alternate {
            &self.b
        } else {
            &self.a
        }
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }
}

pub struct BindGroupBuilder<'a> {
    label: String,
    bindings: Vec<[Binding<'a>; 2]>,
}

impl<'a> BindGroupBuilder<'a> {
    pub fn add(mut self, item: &'a dyn DoubleBufferedBindable) -> Self {
        let [a, b] = item.bind();

        // Both variants share a single layout
        assert_eq!(a.ty, b.ty);

        self.bindings.push([a, b]);
        self
    }

    pub fn build(self, device: &wgpu::Device) -> BindGroup {
        let label = format!("svgf_{}", self.label);

        debug!("Creating bind group `{label}`; len={}", self.bindings.len());

        let entries: Vec<_> = self
            .bindings
            .iter()
            .enumerate()
            .map(|(idx, [binding, _])| binding.layout(idx as u32))
            .collect();

        let layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label}_layout")),
                entries: &entries,
            });

        let variant = |variant: usize, suffix: &str| {
            let entries: Vec<_> = self
                .bindings
                .iter()
                .enumerate()
                .map(|(idx, bindings)| wgpu::BindGroupEntry {
                    binding: idx as u32,
                    resource: bindings[variant].buffer.as_entire_binding(),
                })
                .collect();

            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{label}_{suffix}")),
                layout: &layout,
                entries: &entries,
            })
        };

        let a = variant(0, "a");
        let b = variant(1, "b");

        BindGroup { a, b, layout }
    }
}
