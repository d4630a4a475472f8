// Don't use standard formatting in this file
#![allow(unused_attributes)]
#![allow(unused_variables)]

use crate::*;

//
// Root of the API
//
pub struct OnyxApiEmpty;
impl OnyxApiEmpty {
    pub fn device_context(&self) -> &OnyxDeviceContextEmpty { unimplemented!() }

    pub fn destroy(&mut self) -> OnyxResult<()> { unimplemented!() }
}

#[derive(Clone, Debug)]
pub struct OnyxDeviceContextEmpty;
impl OnyxDeviceContextEmpty {
    pub fn device_info(&self) -> &OnyxDeviceInfo { unimplemented!() }

    pub fn create_queue(&self, queue_type: OnyxQueueType) -> OnyxResult<OnyxQueueEmpty> { unimplemented!() }
    pub fn create_fence(&self) -> OnyxResult<OnyxFenceEmpty> { unimplemented!() }
    pub fn create_sampler(&self, sampler_def: &OnyxSamplerDef) -> OnyxResult<OnyxSamplerEmpty> { unimplemented!() }
    pub fn create_texture(&self, texture_def: &OnyxTextureDef) -> OnyxResult<OnyxTextureEmpty> { unimplemented!() }
    pub fn create_buffer(&self, buffer_def: &OnyxBufferDef) -> OnyxResult<OnyxBufferEmpty> { unimplemented!() }
    pub fn create_shader(&self, stages: Vec<OnyxShaderStageDef>) -> OnyxResult<OnyxShaderEmpty> { unimplemented!() }
    pub fn create_shader_module(&self, bytecode: &[u8]) -> OnyxResult<OnyxShaderModuleEmpty> { unimplemented!() }
    pub fn create_pipeline_layout(&self, pipeline_layout_def: &OnyxPipelineLayoutDef) -> OnyxResult<OnyxPipelineLayoutEmpty> { unimplemented!() }
    pub fn create_descriptor_pool(&self, descriptor_pool_def: &OnyxDescriptorPoolDef) -> OnyxResult<OnyxDescriptorPoolEmpty> { unimplemented!() }
    pub fn create_descriptor(&self, descriptor_def: &OnyxDescriptorDef) -> OnyxResult<OnyxDescriptorEmpty> { unimplemented!() }
    pub fn create_graphics_pipeline(&self, graphics_pipeline_def: &OnyxGraphicsPipelineDef) -> OnyxResult<OnyxPipelineEmpty> { unimplemented!() }
    pub fn create_compute_pipeline(&self, compute_pipeline_def: &OnyxComputePipelineDef) -> OnyxResult<OnyxPipelineEmpty> { unimplemented!() }

    pub fn wait_for_fences(&self, fences: &[&OnyxFenceEmpty]) -> OnyxResult<()> { unimplemented!() }
}

//
// Resources
//
#[derive(Debug)]
pub struct OnyxBufferEmpty;
impl OnyxBufferEmpty {
    pub fn buffer_def(&self) -> &OnyxBufferDef { unimplemented!() }
    pub fn map_buffer(&self) -> OnyxResult<*mut u8> { unimplemented!() }
    pub fn unmap_buffer(&self) -> OnyxResult<()> { unimplemented!() }
    pub fn copy_to_host_visible_buffer<T: Copy>(&self, data: &[T]) -> OnyxResult<()> { unimplemented!() }
    pub fn copy_to_host_visible_buffer_with_offset<T: Copy>(&self, data: &[T], buffer_byte_offset: u64) -> OnyxResult<()> { unimplemented!() }
    pub fn set_memory_priority(&self, priority: f32) { unimplemented!() }
}

#[derive(Clone, Debug)]
pub struct OnyxTextureEmpty;
impl OnyxTextureEmpty {
    pub fn texture_def(&self) -> &OnyxTextureDef { unimplemented!() }
    pub fn set_memory_priority(&self, priority: f32) { unimplemented!() }
}

#[derive(Clone, Debug)]
pub struct OnyxSamplerEmpty;

#[derive(Clone, Debug)]
pub struct OnyxShaderModuleEmpty;
impl OnyxShaderModuleEmpty {
    pub fn bytecode(&self) -> &[u8] { unimplemented!() }
}

#[derive(Clone, Debug)]
pub struct OnyxShaderEmpty;
impl OnyxShaderEmpty {
    pub fn stage_flags(&self) -> OnyxShaderStageFlags { unimplemented!() }
}

//
// Descriptors
//
#[derive(Clone, Debug)]
pub struct OnyxDescriptorEmpty;
impl OnyxDescriptorEmpty {
    pub fn class(&self) -> OnyxDescriptorClass { unimplemented!() }
    pub fn is_integer_format(&self) -> bool { unimplemented!() }
}

#[derive(Clone, Debug)]
pub struct OnyxDescriptorPoolEmpty;
impl OnyxDescriptorPoolEmpty {
    pub fn allocate_descriptor_set(&self, pipeline_layout: &OnyxPipelineLayoutEmpty, set_index: u32) -> OnyxResult<OnyxDescriptorSetEmpty> { unimplemented!() }
    pub fn reset(&self) { unimplemented!() }
}

#[derive(Clone, Debug)]
pub struct OnyxDescriptorSetEmpty;
impl OnyxDescriptorSetEmpty {
    pub fn set_index(&self) -> u32 { unimplemented!() }
    pub fn descriptor_count(&self) -> u32 { unimplemented!() }
    pub fn update_descriptors(&self, range_index: u32, offset_in_range: u32, descriptors: &[&OnyxDescriptorEmpty]) -> OnyxResult<()> { unimplemented!() }
    pub fn update_dynamic_constant_buffers(&self, first: u32, descriptors: &[&OnyxDescriptorEmpty]) -> OnyxResult<()> { unimplemented!() }
}

//
// Pipelines
//
#[derive(Clone, Debug)]
pub struct OnyxPipelineLayoutEmpty;
impl OnyxPipelineLayoutEmpty {
    pub fn pipeline_type(&self) -> OnyxPipelineType { unimplemented!() }
    pub fn set_count(&self) -> u32 { unimplemented!() }
    pub fn push_constant_count(&self) -> u32 { unimplemented!() }
    pub fn set_descriptor_count(&self, set_index: u32) -> OnyxResult<u32> { unimplemented!() }
}

#[derive(Clone, Debug)]
pub struct OnyxPipelineEmpty;
impl OnyxPipelineEmpty {
    pub fn pipeline_type(&self) -> OnyxPipelineType { unimplemented!() }
}

//
// Command recording and submission
//
pub struct OnyxCommandPoolEmpty;
impl OnyxCommandPoolEmpty {
    pub fn create_command_buffer(&self, command_buffer_def: &OnyxCommandBufferDef) -> OnyxResult<OnyxCommandBufferEmpty> { unimplemented!() }
    pub fn reset_command_pool(&self) -> OnyxResult<()> { unimplemented!() }
}

#[derive(Debug)]
pub struct OnyxCommandBufferEmpty;
impl OnyxCommandBufferEmpty {
    pub fn begin(&self) -> OnyxResult<()> { unimplemented!() }
    pub fn end(&self) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_set_viewports(&self, viewports: &[OnyxViewport]) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_set_scissors(&self, scissors: &[OnyxScissor]) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_set_stencil_reference(&self, value: u32) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_set_sample_positions(&self, positions: &[OnyxSamplePosition]) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_bind_render_targets(&self, color_targets: &[&OnyxTextureEmpty], depth_target: Option<&OnyxTextureEmpty>) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_clear_render_target(&self, texture: &OnyxTextureEmpty, color: [f32; 4]) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_clear_depth_stencil(&self, texture: &OnyxTextureEmpty, depth: f32, stencil: u8) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_clear_storage(&self, descriptor: &OnyxDescriptorEmpty, value: OnyxClearStorageValue) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_bind_vertex_buffers(&self, first_binding: u32, bindings: &[OnyxVertexBufferBinding]) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_bind_index_buffer(&self, binding: &OnyxIndexBufferBinding) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_bind_pipeline_layout(&self, pipeline_layout: &OnyxPipelineLayoutEmpty) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_bind_pipeline(&self, pipeline: &OnyxPipelineEmpty) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_bind_descriptor_set(&self, descriptor_set: &OnyxDescriptorSetEmpty, dynamic_offsets: &[u32]) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_set_push_constants(&self, push_constant_index: u32, data: &[u8]) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_draw(&self, vertex_count: u32, first_vertex: u32) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_draw_instanced(&self, vertex_count: u32, instance_count: u32, first_vertex: u32, first_instance: u32) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_draw_indexed(&self, index_count: u32, first_index: u32, vertex_offset: i32) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_draw_indexed_instanced(&self, index_count: u32, instance_count: u32, first_index: u32, vertex_offset: i32, first_instance: u32) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_draw_indirect(&self, args_buffer: &OnyxBufferEmpty, byte_offset: u32) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_draw_indexed_indirect(&self, args_buffer: &OnyxBufferEmpty, byte_offset: u32) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_dispatch(&self, group_count_x: u32, group_count_y: u32, group_count_z: u32) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_dispatch_indirect(&self, args_buffer: &OnyxBufferEmpty, byte_offset: u32) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_copy_buffer_to_buffer(&self, src_buffer: &OnyxBufferEmpty, dst_buffer: &OnyxBufferEmpty, src_offset: u64, dst_offset: u64, size: u64) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_copy_texture(&self, src_texture: &OnyxTextureEmpty, src_mip_level: u32, src_array_layer: u32, dst_texture: &OnyxTextureEmpty, dst_mip_level: u32, dst_array_layer: u32) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_resource_barrier(&self, buffer_barriers: &[OnyxBufferBarrier], texture_barriers: &[OnyxTextureBarrier]) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_begin_annotation(&self, name: &str) -> OnyxResult<()> { unimplemented!() }
    pub fn cmd_end_annotation(&self) -> OnyxResult<()> { unimplemented!() }
}

#[derive(Clone, Debug)]
pub struct OnyxQueueEmpty;
impl OnyxQueueEmpty {
    pub fn queue_id(&self) -> u32 { unimplemented!() }
    pub fn queue_type(&self) -> OnyxQueueType { unimplemented!() }
    pub fn create_command_pool(&self, command_pool_def: &OnyxCommandPoolDef) -> OnyxResult<OnyxCommandPoolEmpty> { unimplemented!() }
    pub fn submit(&self, command_buffers: &[&OnyxCommandBufferEmpty], wait_fences: &[&OnyxFenceEmpty], signal_fences: &[&OnyxFenceEmpty]) -> OnyxResult<()> { unimplemented!() }
    pub fn wait_for_queue_idle(&self) -> OnyxResult<()> { unimplemented!() }
}

#[derive(Debug)]
pub struct OnyxFenceEmpty;
impl OnyxFenceEmpty {
    pub fn wait(&self) -> OnyxResult<()> { unimplemented!() }
    pub fn get_fence_status(&self) -> OnyxResult<OnyxFenceStatus> { unimplemented!() }
}
