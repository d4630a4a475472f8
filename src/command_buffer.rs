#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxCommandBufferDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxCommandBufferEmpty;
use crate::{
    OnyxBufferBarrier, OnyxClearStorageValue, OnyxDescriptor, OnyxDescriptorSet,
    OnyxIndexBufferBinding, OnyxPipeline, OnyxPipelineLayout, OnyxResult, OnyxSamplePosition,
    OnyxScissor, OnyxTexture, OnyxTextureBarrier, OnyxVertexBufferBinding, OnyxViewport,
};

/// A recorded stream of rendering/compute/copy work. `begin` starts a recording (resetting any
/// previous one), `end` finalizes it, and the queue replays it at submit time. A command buffer
/// is single-threaded, but separate command buffers may be recorded concurrently.
#[derive(Debug)]
pub enum OnyxCommandBuffer {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxCommandBufferDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxCommandBufferEmpty),
}

macro_rules! dispatch {
    ($self:ident, $inner:ident, $body:expr) => {
        match $self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11($inner) => $body,
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty($inner) => $body,
        }
    };
}

impl OnyxCommandBuffer {
    pub fn begin(&self) -> OnyxResult<()> {
        dispatch!(self, inner, inner.begin())
    }

    pub fn end(&self) -> OnyxResult<()> {
        dispatch!(self, inner, inner.end())
    }

    pub fn cmd_set_viewports(
        &self,
        viewports: &[OnyxViewport],
    ) -> OnyxResult<()> {
        dispatch!(self, inner, inner.cmd_set_viewports(viewports))
    }

    pub fn cmd_set_scissors(
        &self,
        scissors: &[OnyxScissor],
    ) -> OnyxResult<()> {
        dispatch!(self, inner, inner.cmd_set_scissors(scissors))
    }

    pub fn cmd_set_stencil_reference(
        &self,
        value: u32,
    ) -> OnyxResult<()> {
        dispatch!(self, inner, inner.cmd_set_stencil_reference(value))
    }

    pub fn cmd_set_sample_positions(
        &self,
        positions: &[OnyxSamplePosition],
    ) -> OnyxResult<()> {
        dispatch!(self, inner, inner.cmd_set_sample_positions(positions))
    }

    pub fn cmd_bind_render_targets(
        &self,
        color_targets: &[&OnyxTexture],
        depth_target: Option<&OnyxTexture>,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => {
                let color_targets: Vec<_> = color_targets
                    .iter()
                    .map(|t| t.dx11_texture().unwrap())
                    .collect();
                inner.cmd_bind_render_targets(
                    &color_targets,
                    depth_target.map(|t| t.dx11_texture().unwrap()),
                )
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => {
                let color_targets: Vec<_> = color_targets
                    .iter()
                    .map(|t| t.empty_texture().unwrap())
                    .collect();
                inner.cmd_bind_render_targets(
                    &color_targets,
                    depth_target.map(|t| t.empty_texture().unwrap()),
                )
            }
        }
    }

    pub fn cmd_clear_render_target(
        &self,
        texture: &OnyxTexture,
        color: [f32; 4],
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => {
                inner.cmd_clear_render_target(texture.dx11_texture().unwrap(), color)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => {
                inner.cmd_clear_render_target(texture.empty_texture().unwrap(), color)
            }
        }
    }

    pub fn cmd_clear_depth_stencil(
        &self,
        texture: &OnyxTexture,
        depth: f32,
        stencil: u8,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => {
                inner.cmd_clear_depth_stencil(texture.dx11_texture().unwrap(), depth, stencil)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => {
                inner.cmd_clear_depth_stencil(texture.empty_texture().unwrap(), depth, stencil)
            }
        }
    }

    pub fn cmd_clear_storage(
        &self,
        descriptor: &OnyxDescriptor,
        value: OnyxClearStorageValue,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => {
                inner.cmd_clear_storage(descriptor.dx11_descriptor().unwrap(), value)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => {
                inner.cmd_clear_storage(descriptor.empty_descriptor().unwrap(), value)
            }
        }
    }

    pub fn cmd_bind_vertex_buffers(
        &self,
        first_binding: u32,
        bindings: &[OnyxVertexBufferBinding],
    ) -> OnyxResult<()> {
        dispatch!(self, inner, inner.cmd_bind_vertex_buffers(first_binding, bindings))
    }

    pub fn cmd_bind_index_buffer(
        &self,
        binding: &OnyxIndexBufferBinding,
    ) -> OnyxResult<()> {
        dispatch!(self, inner, inner.cmd_bind_index_buffer(binding))
    }

    pub fn cmd_bind_pipeline_layout(
        &self,
        pipeline_layout: &OnyxPipelineLayout,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => {
                inner.cmd_bind_pipeline_layout(pipeline_layout.dx11_pipeline_layout().unwrap())
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => {
                inner.cmd_bind_pipeline_layout(pipeline_layout.empty_pipeline_layout().unwrap())
            }
        }
    }

    pub fn cmd_bind_pipeline(
        &self,
        pipeline: &OnyxPipeline,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => {
                inner.cmd_bind_pipeline(pipeline.dx11_pipeline().unwrap())
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => {
                inner.cmd_bind_pipeline(pipeline.empty_pipeline().unwrap())
            }
        }
    }

    /// Bind a descriptor set. `dynamic_offsets` supplies one byte offset per
    /// dynamic-constant-buffer range declared in the set, in declaration order; the count must
    /// match exactly.
    pub fn cmd_bind_descriptor_set(
        &self,
        descriptor_set: &OnyxDescriptorSet,
        dynamic_offsets: &[u32],
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => inner.cmd_bind_descriptor_set(
                descriptor_set.dx11_descriptor_set().unwrap(),
                dynamic_offsets,
            ),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => inner.cmd_bind_descriptor_set(
                descriptor_set.empty_descriptor_set().unwrap(),
                dynamic_offsets,
            ),
        }
    }

    pub fn cmd_set_push_constants(
        &self,
        push_constant_index: u32,
        data: &[u8],
    ) -> OnyxResult<()> {
        dispatch!(self, inner, inner.cmd_set_push_constants(push_constant_index, data))
    }

    pub fn cmd_draw(
        &self,
        vertex_count: u32,
        first_vertex: u32,
    ) -> OnyxResult<()> {
        dispatch!(self, inner, inner.cmd_draw(vertex_count, first_vertex))
    }

    pub fn cmd_draw_instanced(
        &self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> OnyxResult<()> {
        dispatch!(
            self,
            inner,
            inner.cmd_draw_instanced(vertex_count, instance_count, first_vertex, first_instance)
        )
    }

    pub fn cmd_draw_indexed(
        &self,
        index_count: u32,
        first_index: u32,
        vertex_offset: i32,
    ) -> OnyxResult<()> {
        dispatch!(
            self,
            inner,
            inner.cmd_draw_indexed(index_count, first_index, vertex_offset)
        )
    }

    pub fn cmd_draw_indexed_instanced(
        &self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) -> OnyxResult<()> {
        dispatch!(
            self,
            inner,
            inner.cmd_draw_indexed_instanced(
                index_count,
                instance_count,
                first_index,
                vertex_offset,
                first_instance,
            )
        )
    }

    pub fn cmd_draw_indirect(
        &self,
        args_buffer: &crate::OnyxBuffer,
        byte_offset: u32,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => {
                inner.cmd_draw_indirect(args_buffer.dx11_buffer().unwrap(), byte_offset)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => {
                inner.cmd_draw_indirect(args_buffer.empty_buffer().unwrap(), byte_offset)
            }
        }
    }

    pub fn cmd_draw_indexed_indirect(
        &self,
        args_buffer: &crate::OnyxBuffer,
        byte_offset: u32,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => {
                inner.cmd_draw_indexed_indirect(args_buffer.dx11_buffer().unwrap(), byte_offset)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => {
                inner.cmd_draw_indexed_indirect(args_buffer.empty_buffer().unwrap(), byte_offset)
            }
        }
    }

    pub fn cmd_dispatch(
        &self,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) -> OnyxResult<()> {
        dispatch!(
            self,
            inner,
            inner.cmd_dispatch(group_count_x, group_count_y, group_count_z)
        )
    }

    pub fn cmd_dispatch_indirect(
        &self,
        args_buffer: &crate::OnyxBuffer,
        byte_offset: u32,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => {
                inner.cmd_dispatch_indirect(args_buffer.dx11_buffer().unwrap(), byte_offset)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => {
                inner.cmd_dispatch_indirect(args_buffer.empty_buffer().unwrap(), byte_offset)
            }
        }
    }

    pub fn cmd_copy_buffer_to_buffer(
        &self,
        src_buffer: &crate::OnyxBuffer,
        dst_buffer: &crate::OnyxBuffer,
        src_offset: u64,
        dst_offset: u64,
        size: u64,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => inner.cmd_copy_buffer_to_buffer(
                src_buffer.dx11_buffer().unwrap(),
                dst_buffer.dx11_buffer().unwrap(),
                src_offset,
                dst_offset,
                size,
            ),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => inner.cmd_copy_buffer_to_buffer(
                src_buffer.empty_buffer().unwrap(),
                dst_buffer.empty_buffer().unwrap(),
                src_offset,
                dst_offset,
                size,
            ),
        }
    }

    pub fn cmd_copy_texture(
        &self,
        src_texture: &OnyxTexture,
        src_mip_level: u32,
        src_array_layer: u32,
        dst_texture: &OnyxTexture,
        dst_mip_level: u32,
        dst_array_layer: u32,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => inner.cmd_copy_texture(
                src_texture.dx11_texture().unwrap(),
                src_mip_level,
                src_array_layer,
                dst_texture.dx11_texture().unwrap(),
                dst_mip_level,
                dst_array_layer,
            ),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => inner.cmd_copy_texture(
                src_texture.empty_texture().unwrap(),
                src_mip_level,
                src_array_layer,
                dst_texture.empty_texture().unwrap(),
                dst_mip_level,
                dst_array_layer,
            ),
        }
    }

    pub fn cmd_resource_barrier(
        &self,
        buffer_barriers: &[OnyxBufferBarrier],
        texture_barriers: &[OnyxTextureBarrier],
    ) -> OnyxResult<()> {
        dispatch!(
            self,
            inner,
            inner.cmd_resource_barrier(buffer_barriers, texture_barriers)
        )
    }

    pub fn cmd_begin_annotation(
        &self,
        name: &str,
    ) -> OnyxResult<()> {
        dispatch!(self, inner, inner.cmd_begin_annotation(name))
    }

    pub fn cmd_end_annotation(&self) -> OnyxResult<()> {
        dispatch!(self, inner, inner.cmd_end_annotation())
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_command_buffer(&self) -> Option<&OnyxCommandBufferDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(_) => None,
        }
    }

    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    pub fn empty_command_buffer(&self) -> Option<&OnyxCommandBufferEmpty> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandBuffer::Dx11(_) => None,
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandBuffer::Empty(inner) => Some(inner),
        }
    }
}
