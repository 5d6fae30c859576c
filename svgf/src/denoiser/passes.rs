use log::debug;

use crate::{DenoiserBuffers, Shaders};

macro_rules! passes {
    ([ $( $name:ident => $class:ident, )* ]) => {
        $( mod $name; )*
        $( pub use self::$name::*; )*

        #[derive(Debug)]
        pub struct DenoiserPasses {
            $( pub $name: $class, )*
        }

        impl DenoiserPasses {
            pub fn new(
                device: &wgpu::Device,
                shaders: &Shaders,
                buffers: &DenoiserBuffers,
            ) -> Self {
                debug!("Initializing denoiser passes");

                Self {
                    $( $name: $class::new(device, shaders, buffers), )*
                }
            }
        }
    };
}

passes!([
    atrous => AtrousPass,
    finalize => FinalizePass,
    temporal => TemporalPass,
    variance => VariancePass,
]);
