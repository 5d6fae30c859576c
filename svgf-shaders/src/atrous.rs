use spirv_std::spirv;
use svgf_gpu::prelude::*;

#[spirv(compute(threads(8, 4)))]
#[allow(clippy::too_many_arguments)]
pub fn main(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(push_constant)] pass_params: &AtrousPassParams,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] params: &DenoiserParams,
    #[spirv(descriptor_set = 0, binding = 1, storage_buffer)]
    gbuffer_d0: &[Vec4],
    #[spirv(descriptor_set = 0, binding = 2, storage_buffer)]
    gbuffer_d1: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 0, storage_buffer)] direct: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 1, storage_buffer)]
    indirect: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 2, storage_buffer)]
    out_direct: &mut [Vec4],
    #[spirv(descriptor_set = 1, binding = 3, storage_buffer)]
    out_indirect: &mut [Vec4],
) {
    let screen_pos = global_id.xy();

    if !params.viewport.contains(screen_pos.as_ivec2()) {
        return;
    }

    // -------------------------------------------------------------------------

    let sample = AtrousPass {
        params,
        gbuffer: GBufferMap::new(gbuffer_d0, gbuffer_d1),
        direct,
        indirect,
        step_size: pass_params.step_size,
    }
    .run(screen_pos);

    let screen_idx = params.viewport.index(screen_pos);

    out_direct[screen_idx] = sample.direct;
    out_indirect[screen_idx] = sample.indirect;
}
