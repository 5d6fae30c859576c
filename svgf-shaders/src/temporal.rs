use spirv_std::spirv;
use svgf_gpu::prelude::*;

#[spirv(compute(threads(8, 4)))]
#[allow(clippy::too_many_arguments)]
pub fn main(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] params: &DenoiserParams,
    #[spirv(descriptor_set = 0, binding = 1, storage_buffer)]
    gbuffer_d0: &[Vec4],
    #[spirv(descriptor_set = 0, binding = 2, storage_buffer)]
    gbuffer_d1: &[Vec4],
    #[spirv(descriptor_set = 0, binding = 3, storage_buffer)] albedo: &[Vec4],
    #[spirv(descriptor_set = 0, binding = 4, storage_buffer)] direct: &[Vec4],
    #[spirv(descriptor_set = 0, binding = 5, storage_buffer)]
    indirect: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 0, storage_buffer)]
    history_normal_and_depth: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 1, storage_buffer)]
    history_direct: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 2, storage_buffer)]
    history_indirect: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 3, storage_buffer)]
    history_moment: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 4, storage_buffer)]
    history_length: &[u32],
    #[spirv(descriptor_set = 2, binding = 0, storage_buffer)]
    out_direct: &mut [Vec4],
    #[spirv(descriptor_set = 2, binding = 1, storage_buffer)]
    out_indirect: &mut [Vec4],
    #[spirv(descriptor_set = 2, binding = 2, storage_buffer)]
    out_moment: &mut [Vec4],
    #[spirv(descriptor_set = 2, binding = 3, storage_buffer)]
    out_history_length: &mut [u32],
) {
    let screen_pos = global_id.xy();

    if !params.viewport.contains(screen_pos.as_ivec2()) {
        return;
    }

    // -------------------------------------------------------------------------

    let sample = TemporalPass {
        params,
        gbuffer: GBufferMap::new(gbuffer_d0, gbuffer_d1),
        albedo,
        direct,
        indirect,
        history: HistoryMap {
            normal_and_depth: history_normal_and_depth,
            direct: history_direct,
            indirect: history_indirect,
            moment: history_moment,
            length: history_length,
        },
    }
    .run(screen_pos);

    let screen_idx = params.viewport.index(screen_pos);

    out_direct[screen_idx] = sample.direct;
    out_indirect[screen_idx] = sample.indirect;
    out_moment[screen_idx] = sample.moment;
    out_history_length[screen_idx] = sample.history_length;
}
