macro_rules! shaders {
    ([ $( $name:ident, )* ]) => {
        /// Compiled SPIR-V modules, paired with their entry points.
        #[derive(Debug)]
        pub struct Shaders {
            $( pub $name: (wgpu::ShaderModule, &'static str), )*
        }

        impl Shaders {
            pub fn new(device: &wgpu::Device) -> Self {
                log::debug!("Loading shaders");

                Self {
                    $(
                        $name: (
                            device.create_shader_module(wgpu::include_spirv!(
                                env!(concat!(
                                    "svgf_shaders::",
                                    stringify!($name),
                                    ".path"
                                ))
                            )),
                            env!(concat!(
                                "svgf_shaders::",
                                stringify!($name),
                                ".entry_point"
                            )),
                        ),
                    )*
                }
            }
        }
    };
}

shaders!([atrous, finalize, temporal, variance,]);
