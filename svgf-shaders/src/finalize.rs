use spirv_std::spirv;
use svgf_gpu::prelude::*;

#[spirv(compute(threads(8, 4)))]
#[allow(clippy::too_many_arguments)]
pub fn main(
    #[spirv(global_invocation_id)] global_id: UVec3,
    #[spirv(descriptor_set = 0, binding = 0, uniform)] params: &DenoiserParams,
    #[spirv(descriptor_set = 0, binding = 1, storage_buffer)]
    gbuffer_d0: &[Vec4],
    #[spirv(descriptor_set = 0, binding = 2, storage_buffer)] albedo: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 0, storage_buffer)] direct: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 1, storage_buffer)]
    indirect: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 2, storage_buffer)]
    temporal_direct: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 3, storage_buffer)]
    temporal_indirect: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 4, storage_buffer)] moment: &[Vec4],
    #[spirv(descriptor_set = 1, binding = 5, storage_buffer)]
    history_length: &[u32],
    #[spirv(descriptor_set = 2, binding = 0, storage_buffer)]
    out_history_normal_and_depth: &mut [Vec4],
    #[spirv(descriptor_set = 2, binding = 1, storage_buffer)]
    out_history_direct: &mut [Vec4],
    #[spirv(descriptor_set = 2, binding = 2, storage_buffer)]
    out_history_indirect: &mut [Vec4],
    #[spirv(descriptor_set = 2, binding = 3, storage_buffer)]
    out_history_moment: &mut [Vec4],
    #[spirv(descriptor_set = 2, binding = 4, storage_buffer)]
    out_history_length: &mut [u32],
    #[spirv(descriptor_set = 2, binding = 5, storage_buffer)]
    out_accumulator: &mut [Vec4],
    #[spirv(descriptor_set = 2, binding = 6, storage_buffer)]
    out_taa: &mut [Vec4],
) {
    let screen_pos = global_id.xy();

    if !params.viewport.contains(screen_pos.as_ivec2()) {
        return;
    }

    // -------------------------------------------------------------------------

    let sample = FinalizePass {
        params,
        normal_and_depth: gbuffer_d0,
        albedo,
        direct,
        indirect,
        temporal_direct,
        temporal_indirect,
        moment,
        history_length,
    }
    .run(screen_pos);

    let screen_idx = params.viewport.index(screen_pos);

    out_accumulator[screen_idx] = sample.colour;

    if params.is_taa_enabled() {
        out_taa[screen_idx] = sample.taa;
    }

    if params.finalize_commits_colors() {
        out_history_direct[screen_idx] = sample.history_direct;
        out_history_indirect[screen_idx] = sample.history_indirect;
    }

    out_history_normal_and_depth[screen_idx] = sample.history_normal_and_depth;
    out_history_moment[screen_idx] = sample.history_moment;
    out_history_length[screen_idx] = sample.history_length;
}
