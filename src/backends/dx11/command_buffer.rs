use crate::dx11::{
    OnyxCommandPoolDx11, OnyxDescriptorDx11, OnyxDescriptorSetDx11, OnyxDeviceContextDx11,
    OnyxPipelineDx11, OnyxPipelineLayoutDx11, OnyxTextureDx11,
};
use crate::{
    OnyxBufferBarrier, OnyxClearStorageValue, OnyxCommandBuffer, OnyxCommandBufferDef, OnyxError,
    OnyxIndexBufferBinding, OnyxResourceType, OnyxResult, OnyxSamplePosition, OnyxScissor,
    OnyxTextureBarrier, OnyxVertexBufferBinding, OnyxViewport,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use super::d3d11::{D3D11_CLEAR_DEPTH, D3D11_CLEAR_STENCIL, D3D11_RECT, D3D11_VIEWPORT,
    DXGI_FORMAT};
use super::internal::binding_state::BindingState;
use super::internal::native::{
    Dx11ContextOps, NativeBuffer, NativeCommandList, NativeDsv, NativeRtv, NativeTexture,
    NativeUav,
};
use super::internal::op_stream::{Op, OpStream};

// Rasterizer discard is emulated by scissoring everything out
const DISCARD_SCISSOR: D3D11_RECT = D3D11_RECT {
    left: -1,
    top: -1,
    right: -1,
    bottom: -1,
};

#[derive(Debug)]
struct DirectState {
    binding_state: BindingState,
    pipeline_layout: Option<OnyxPipelineLayoutDx11>,
    pipeline: Option<OnyxPipelineDx11>,
    stencil_ref: u32,
    // Application-requested scissors, restored when a discard pipeline is unbound
    scissors: Vec<D3D11_RECT>,
    command_list: Option<NativeCommandList>,
}

/// Records command-buffer calls by issuing them directly against a native context: a deferred
/// context while recording, or the immediate context when an emulated command buffer replays
/// through it at submit time. Both paths go through the same methods so the two command buffer
/// variants produce identical native call sequences.
#[derive(Debug)]
pub(crate) struct DirectCommandBuffer {
    device_context: OnyxDeviceContextDx11,
    context: Arc<dyn Dx11ContextOps>,
    is_deferred: bool,
    state: Mutex<DirectState>,
}

impl DirectCommandBuffer {
    pub fn new(
        device_context: OnyxDeviceContextDx11,
        context: Arc<dyn Dx11ContextOps>,
        is_deferred: bool,
    ) -> Self {
        DirectCommandBuffer {
            device_context,
            context,
            is_deferred,
            state: Mutex::new(DirectState {
                binding_state: BindingState::new(),
                pipeline_layout: None,
                pipeline: None,
                stencil_ref: 0,
                scissors: Vec::new(),
                command_list: None,
            }),
        }
    }

    /// Returns the command buffer to a hazard-free initial state. Must run before the first
    /// binding of every recording.
    fn begin(&self) {
        let mut state = self.state.lock().unwrap();
        if let Some(list) = state.command_list.take() {
            // Re-recorded without ever being submitted
            self.device_context.device_ops().destroy_object(list.0);
        }
        state.binding_state.unbind_and_reset(&*self.context);
        state.pipeline_layout = None;
        state.pipeline = None;
        state.stencil_ref = 0;
        state.scissors.clear();
    }

    fn end(&self) -> OnyxResult<()> {
        if self.is_deferred {
            let list = self.context.finish_command_list()?;
            self.state.lock().unwrap().command_list = Some(list);
        }
        Ok(())
    }

    fn take_command_list(&self) -> OnyxResult<NativeCommandList> {
        self.state.lock().unwrap().command_list.take().ok_or_else(|| {
            OnyxError::InvalidArgument(
                "command buffer has no finished command list to submit".to_string(),
            )
        })
    }

    fn set_viewports(
        &self,
        viewports: &[D3D11_VIEWPORT],
    ) {
        self.context.rs_set_viewports(viewports);
    }

    fn set_scissors(
        &self,
        rects: &[D3D11_RECT],
    ) {
        let mut state = self.state.lock().unwrap();
        state.scissors = rects.to_vec();

        let discard = state
            .pipeline
            .as_ref()
            .map_or(false, |p| p.is_rasterizer_discard_enabled());
        if discard {
            self.context.rs_set_scissor_rects(&[DISCARD_SCISSOR]);
        } else {
            self.context.rs_set_scissor_rects(rects);
        }
    }

    fn set_stencil_reference(
        &self,
        value: u32,
    ) {
        let mut state = self.state.lock().unwrap();
        state.stencil_ref = value;
        if let Some(pipeline) = &state.pipeline {
            pipeline.apply_stencil_reference(&*self.context, value);
        }
    }

    fn set_sample_positions(
        &self,
        positions: &[OnyxSamplePosition],
    ) -> OnyxResult<()> {
        let state = self.state.lock().unwrap();
        let pipeline = state.pipeline.as_ref().ok_or_else(|| {
            OnyxError::InvalidArgument(
                "sample positions require a bound graphics pipeline".to_string(),
            )
        })?;
        pipeline.change_sample_positions(&*self.context, positions)
    }

    fn bind_render_targets(
        &self,
        rtvs: &[Option<NativeRtv>],
        dsv: Option<NativeDsv>,
    ) {
        self.context.om_set_render_targets(rtvs, dsv);
    }

    fn clear_render_target(
        &self,
        view: NativeRtv,
        color: [f32; 4],
    ) {
        self.context.clear_render_target_view(view, color);
    }

    fn clear_depth_stencil(
        &self,
        view: NativeDsv,
        flags: u32,
        depth: f32,
        stencil: u8,
    ) {
        self.context.clear_depth_stencil_view(view, flags, depth, stencil);
    }

    fn clear_storage(
        &self,
        view: NativeUav,
        as_uint: bool,
        words: [u32; 4],
    ) {
        if as_uint {
            self.context.clear_unordered_access_view_uint(view, words);
        } else {
            self.context.clear_unordered_access_view_float(
                view,
                [
                    f32::from_bits(words[0]),
                    f32::from_bits(words[1]),
                    f32::from_bits(words[2]),
                    f32::from_bits(words[3]),
                ],
            );
        }
    }

    fn bind_vertex_buffers(
        &self,
        first_binding: u32,
        buffers: &[NativeBuffer],
        byte_offsets: &[u32],
    ) -> OnyxResult<()> {
        let state = self.state.lock().unwrap();
        // Vertex strides are baked into the pipeline, so one must be bound first
        let pipeline = state.pipeline.as_ref().ok_or_else(|| {
            OnyxError::InvalidArgument(
                "vertex buffers require a bound graphics pipeline".to_string(),
            )
        })?;

        let strides = pipeline.vertex_strides();
        let first = first_binding as usize;
        if first + buffers.len() > strides.len() {
            return Err(OnyxError::InvalidArgument(format!(
                "vertex buffer bindings [{}..+{}] exceed the pipeline's {} declared buffers",
                first_binding,
                buffers.len(),
                strides.len()
            )));
        }

        let views: Vec<_> = buffers.iter().map(|&b| Some(b)).collect();
        self.context.ia_set_vertex_buffers(
            first_binding,
            &views,
            &strides[first..first + buffers.len()],
            byte_offsets,
        );
        Ok(())
    }

    fn bind_index_buffer(
        &self,
        buffer: NativeBuffer,
        format: DXGI_FORMAT,
        byte_offset: u32,
    ) {
        self.context.ia_set_index_buffer(Some(buffer), format, byte_offset);
    }

    fn bind_pipeline_layout(
        &self,
        pipeline_layout: &OnyxPipelineLayoutDx11,
    ) {
        let mut state = self.state.lock().unwrap();
        pipeline_layout.bind_push_constant_buffers(&*self.context);
        state.pipeline_layout = Some(pipeline_layout.clone());
    }

    fn bind_pipeline(
        &self,
        pipeline: &OnyxPipelineDx11,
    ) {
        let mut state = self.state.lock().unwrap();

        let previous = state.pipeline.take();
        pipeline.bind(&*self.context, previous.as_ref(), state.stencil_ref);

        let was_discard = previous
            .as_ref()
            .map_or(false, |p| p.is_rasterizer_discard_enabled());
        if pipeline.is_rasterizer_discard_enabled() {
            self.context.rs_set_scissor_rects(&[DISCARD_SCISSOR]);
        } else if was_discard && !state.scissors.is_empty() {
            self.context.rs_set_scissor_rects(&state.scissors);
        }

        state.pipeline = Some(pipeline.clone());
    }

    fn bind_descriptor_set(
        &self,
        descriptor_set: &OnyxDescriptorSetDx11,
        dynamic_offsets: &[u32],
    ) -> OnyxResult<()> {
        let mut state = self.state.lock().unwrap();
        let pipeline_layout = state.pipeline_layout.clone().ok_or_else(|| {
            OnyxError::InvalidArgument(
                "descriptor sets require a bound pipeline layout".to_string(),
            )
        })?;
        pipeline_layout.bind_descriptor_set(
            &*self.context,
            &mut state.binding_state,
            descriptor_set,
            dynamic_offsets,
        )
    }

    fn set_push_constants(
        &self,
        push_constant_index: u32,
        data: &[u8],
    ) -> OnyxResult<()> {
        let state = self.state.lock().unwrap();
        let pipeline_layout = state.pipeline_layout.as_ref().ok_or_else(|| {
            OnyxError::InvalidArgument(
                "push constants require a bound pipeline layout".to_string(),
            )
        })?;
        pipeline_layout.set_constants(&*self.context, push_constant_index, data)
    }

    fn draw(
        &self,
        vertex_count: u32,
        first_vertex: u32,
    ) {
        self.context.draw(vertex_count, first_vertex);
    }

    fn draw_instanced(
        &self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) {
        self.context
            .draw_instanced(vertex_count, instance_count, first_vertex, first_instance);
    }

    fn draw_indexed(
        &self,
        index_count: u32,
        first_index: u32,
        vertex_offset: i32,
    ) {
        self.context.draw_indexed(index_count, first_index, vertex_offset);
    }

    fn draw_indexed_instanced(
        &self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) {
        self.context.draw_indexed_instanced(
            index_count,
            instance_count,
            first_index,
            vertex_offset,
            first_instance,
        );
    }

    fn draw_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    ) {
        self.context.draw_instanced_indirect(args, byte_offset);
    }

    fn draw_indexed_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    ) {
        self.context.draw_indexed_instanced_indirect(args, byte_offset);
    }

    fn dispatch(
        &self,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) {
        self.context.dispatch(group_count_x, group_count_y, group_count_z);
    }

    fn dispatch_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    ) {
        self.context.dispatch_indirect(args, byte_offset);
    }

    fn copy_buffer(
        &self,
        dst: NativeBuffer,
        dst_offset: u64,
        src: NativeBuffer,
        src_offset: u64,
        size: u64,
    ) {
        self.context.copy_buffer_region(dst, dst_offset, src, src_offset, size);
    }

    fn copy_texture(
        &self,
        dst: NativeTexture,
        dst_subresource: u32,
        src: NativeTexture,
        src_subresource: u32,
    ) {
        self.context
            .copy_texture_region(dst, dst_subresource, [0, 0, 0], src, src_subresource, None);
    }

    fn resource_barrier(&self) {
        // The driver tracks hazards; barriers carry no native work on this backend
    }

    fn begin_annotation(
        &self,
        name: &str,
    ) {
        self.context.begin_annotation(name);
    }

    fn end_annotation(&self) {
        self.context.end_annotation();
    }
}

/// Objects a recorded op refers to. Retained until replay so the referenced objects stay alive
/// for the lifetime of the recording.
#[derive(Debug)]
enum EmuObject {
    PipelineLayout(OnyxPipelineLayoutDx11),
    Pipeline(OnyxPipelineDx11),
    DescriptorSet(OnyxDescriptorSetDx11),
}

#[derive(Debug, Default)]
struct EmuRecording {
    stream: OpStream,
    objects: Vec<EmuObject>,
}

impl EmuRecording {
    fn push_object(
        &mut self,
        object: EmuObject,
    ) -> u32 {
        self.objects.push(object);
        (self.objects.len() - 1) as u32
    }
}

/// Software command buffer: every call appends one tagged record to the op-stream, and `submit`
/// replays the stream in order against the immediate context through a `DirectCommandBuffer`.
/// The record and replay arms below are hand-kept in sync, one payload shape per op.
#[derive(Debug, Default)]
pub(crate) struct EmuCommandBuffer {
    recording: Mutex<EmuRecording>,
}

impl EmuCommandBuffer {
    fn begin(&self) {
        let mut recording = self.recording.lock().unwrap();
        recording.stream.clear();
        recording.objects.clear();
    }

    #[profiling::function]
    fn replay(
        &self,
        direct: &DirectCommandBuffer,
    ) -> OnyxResult<()> {
        let mut recording = self.recording.lock().unwrap();

        {
            let recording = &*recording;
            let mut reader = recording.stream.reader();
            while !reader.is_exhausted() {
                match reader.read_op() {
                    Op::SetViewports => {
                        let count = reader.read_u32();
                        let viewports: Vec<_> = (0..count)
                            .map(|_| D3D11_VIEWPORT {
                                TopLeftX: reader.read_f32(),
                                TopLeftY: reader.read_f32(),
                                Width: reader.read_f32(),
                                Height: reader.read_f32(),
                                MinDepth: reader.read_f32(),
                                MaxDepth: reader.read_f32(),
                            })
                            .collect();
                        direct.set_viewports(&viewports);
                    }
                    Op::SetScissors => {
                        let count = reader.read_u32();
                        let rects: Vec<_> = (0..count)
                            .map(|_| D3D11_RECT {
                                left: reader.read_i32(),
                                top: reader.read_i32(),
                                right: reader.read_i32(),
                                bottom: reader.read_i32(),
                            })
                            .collect();
                        direct.set_scissors(&rects);
                    }
                    Op::SetStencilReference => {
                        let value = reader.read_u32();
                        direct.set_stencil_reference(value);
                    }
                    Op::SetSamplePositions => {
                        let count = reader.read_u32();
                        let positions: Vec<_> = (0..count)
                            .map(|_| OnyxSamplePosition {
                                x: reader.read_i32() as i8,
                                y: reader.read_i32() as i8,
                            })
                            .collect();
                        direct.set_sample_positions(&positions)?;
                    }
                    Op::SetRenderTargets => {
                        let count = reader.read_u32();
                        let rtvs: Vec<_> = (0..count)
                            .map(|_| match reader.read_u64() {
                                0 => None,
                                id => Some(NativeRtv(id)),
                            })
                            .collect();
                        let dsv = match reader.read_u64() {
                            0 => None,
                            id => Some(NativeDsv(id)),
                        };
                        direct.bind_render_targets(&rtvs, dsv);
                    }
                    Op::ClearRenderTarget => {
                        let view = NativeRtv(reader.read_u64());
                        let color = [
                            reader.read_f32(),
                            reader.read_f32(),
                            reader.read_f32(),
                            reader.read_f32(),
                        ];
                        direct.clear_render_target(view, color);
                    }
                    Op::ClearDepthStencil => {
                        let view = NativeDsv(reader.read_u64());
                        let flags = reader.read_u32();
                        let depth = reader.read_f32();
                        let stencil = reader.read_u32() as u8;
                        direct.clear_depth_stencil(view, flags, depth, stencil);
                    }
                    Op::ClearStorage => {
                        let view = NativeUav(reader.read_u64());
                        let as_uint = reader.read_u32() != 0;
                        let words = [
                            reader.read_u32(),
                            reader.read_u32(),
                            reader.read_u32(),
                            reader.read_u32(),
                        ];
                        direct.clear_storage(view, as_uint, words);
                    }
                    Op::SetVertexBuffers => {
                        let first_binding = reader.read_u32();
                        let count = reader.read_u32();
                        let mut buffers = Vec::with_capacity(count as usize);
                        let mut offsets = Vec::with_capacity(count as usize);
                        for _ in 0..count {
                            buffers.push(NativeBuffer(reader.read_u64()));
                            offsets.push(reader.read_u32());
                        }
                        direct.bind_vertex_buffers(first_binding, &buffers, &offsets)?;
                    }
                    Op::SetIndexBuffer => {
                        let buffer = NativeBuffer(reader.read_u64());
                        let format = DXGI_FORMAT(reader.read_u32());
                        let byte_offset = reader.read_u32();
                        direct.bind_index_buffer(buffer, format, byte_offset);
                    }
                    Op::BindPipelineLayout => {
                        let index = reader.read_u32() as usize;
                        match &recording.objects[index] {
                            EmuObject::PipelineLayout(layout) => {
                                direct.bind_pipeline_layout(layout)
                            }
                            _ => panic!("malformed op stream: object {} is not a layout", index),
                        }
                    }
                    Op::BindPipeline => {
                        let index = reader.read_u32() as usize;
                        match &recording.objects[index] {
                            EmuObject::Pipeline(pipeline) => direct.bind_pipeline(pipeline),
                            _ => panic!("malformed op stream: object {} is not a pipeline", index),
                        }
                    }
                    Op::BindDescriptorSet => {
                        let index = reader.read_u32() as usize;
                        let dynamic_offsets = reader.read_u32_vec();
                        match &recording.objects[index] {
                            EmuObject::DescriptorSet(set) => {
                                direct.bind_descriptor_set(set, &dynamic_offsets)?
                            }
                            _ => panic!("malformed op stream: object {} is not a set", index),
                        }
                    }
                    Op::SetPushConstants => {
                        let push_constant_index = reader.read_u32();
                        let data = reader.read_bytes();
                        direct.set_push_constants(push_constant_index, &data)?;
                    }
                    Op::Draw => {
                        let vertex_count = reader.read_u32();
                        let first_vertex = reader.read_u32();
                        direct.draw(vertex_count, first_vertex);
                    }
                    Op::DrawInstanced => {
                        let vertex_count = reader.read_u32();
                        let instance_count = reader.read_u32();
                        let first_vertex = reader.read_u32();
                        let first_instance = reader.read_u32();
                        direct.draw_instanced(
                            vertex_count,
                            instance_count,
                            first_vertex,
                            first_instance,
                        );
                    }
                    Op::DrawIndexed => {
                        let index_count = reader.read_u32();
                        let first_index = reader.read_u32();
                        let vertex_offset = reader.read_i32();
                        direct.draw_indexed(index_count, first_index, vertex_offset);
                    }
                    Op::DrawIndexedInstanced => {
                        let index_count = reader.read_u32();
                        let instance_count = reader.read_u32();
                        let first_index = reader.read_u32();
                        let vertex_offset = reader.read_i32();
                        let first_instance = reader.read_u32();
                        direct.draw_indexed_instanced(
                            index_count,
                            instance_count,
                            first_index,
                            vertex_offset,
                            first_instance,
                        );
                    }
                    Op::DrawInstancedIndirect => {
                        let args = NativeBuffer(reader.read_u64());
                        let byte_offset = reader.read_u32();
                        direct.draw_indirect(args, byte_offset);
                    }
                    Op::DrawIndexedInstancedIndirect => {
                        let args = NativeBuffer(reader.read_u64());
                        let byte_offset = reader.read_u32();
                        direct.draw_indexed_indirect(args, byte_offset);
                    }
                    Op::Dispatch => {
                        let x = reader.read_u32();
                        let y = reader.read_u32();
                        let z = reader.read_u32();
                        direct.dispatch(x, y, z);
                    }
                    Op::DispatchIndirect => {
                        let args = NativeBuffer(reader.read_u64());
                        let byte_offset = reader.read_u32();
                        direct.dispatch_indirect(args, byte_offset);
                    }
                    Op::CopyBuffer => {
                        let dst = NativeBuffer(reader.read_u64());
                        let dst_offset = reader.read_u64();
                        let src = NativeBuffer(reader.read_u64());
                        let src_offset = reader.read_u64();
                        let size = reader.read_u64();
                        direct.copy_buffer(dst, dst_offset, src, src_offset, size);
                    }
                    Op::CopyTexture => {
                        let dst = NativeTexture(reader.read_u64());
                        let dst_subresource = reader.read_u32();
                        let src = NativeTexture(reader.read_u64());
                        let src_subresource = reader.read_u32();
                        direct.copy_texture(dst, dst_subresource, src, src_subresource);
                    }
                    Op::ResourceBarrier => {
                        direct.resource_barrier();
                    }
                    Op::BeginAnnotation => {
                        let name = reader.read_bytes();
                        direct.begin_annotation(&String::from_utf8_lossy(&name));
                    }
                    Op::EndAnnotation => {
                        direct.end_annotation();
                    }
                }
            }
        }

        // Consume once
        recording.stream.clear();
        recording.objects.clear();
        Ok(())
    }
}

#[derive(Debug)]
enum CommandBufferVariant {
    /// Records into a real deferred context, finalized into a native command list at `end`
    Deferred(DirectCommandBuffer),
    /// Records into the op-stream, replayed against the immediate context at submit
    Emulated(EmuCommandBuffer),
}

pub struct OnyxCommandBufferDx11 {
    device_context: OnyxDeviceContextDx11,
    recording: AtomicBool,
    variant: CommandBufferVariant,
}

impl std::fmt::Debug for OnyxCommandBufferDx11 {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("OnyxCommandBufferDx11")
            .field("emulated", &self.is_emulated())
            .finish()
    }
}

impl Into<OnyxCommandBuffer> for OnyxCommandBufferDx11 {
    fn into(self) -> OnyxCommandBuffer {
        OnyxCommandBuffer::Dx11(self)
    }
}

impl OnyxCommandBufferDx11 {
    pub fn new(
        command_pool: &OnyxCommandPoolDx11,
        command_buffer_def: &OnyxCommandBufferDef,
    ) -> OnyxResult<Self> {
        let device_context = command_pool.device_context().clone();

        // The variant is chosen once, at creation, from the capability probe
        let emulated =
            command_buffer_def.force_emulated || device_context.use_emulated_command_buffers();

        let variant = if emulated {
            log::trace!("creating emulated OnyxCommandBufferDx11");
            CommandBufferVariant::Emulated(EmuCommandBuffer::default())
        } else {
            log::trace!("creating deferred-context OnyxCommandBufferDx11");
            let deferred_context = device_context.device_ops().create_deferred_context()?;
            CommandBufferVariant::Deferred(DirectCommandBuffer::new(
                device_context.clone(),
                deferred_context,
                true,
            ))
        };

        Ok(OnyxCommandBufferDx11 {
            device_context,
            recording: AtomicBool::new(false),
            variant,
        })
    }

    pub fn is_emulated(&self) -> bool {
        matches!(self.variant, CommandBufferVariant::Emulated(_))
    }

    pub fn begin(&self) -> OnyxResult<()> {
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.begin(),
            CommandBufferVariant::Emulated(emu) => emu.begin(),
        }
        self.recording.store(true, Ordering::Release);
        Ok(())
    }

    pub fn end(&self) -> OnyxResult<()> {
        self.check_recording()?;
        if let CommandBufferVariant::Deferred(direct) = &self.variant {
            direct.end()?;
        }
        self.recording.store(false, Ordering::Release);
        Ok(())
    }

    fn check_recording(&self) -> OnyxResult<()> {
        if !self.recording.load(Ordering::Acquire) {
            return Err(OnyxError::InvalidArgument(
                "command buffer is not recording".to_string(),
            ));
        }
        Ok(())
    }

    /// Hand the recorded work to the immediate context. The caller (the queue) holds the
    /// immediate-context lock.
    pub(crate) fn submit_locked(
        &self,
        immediate_context: &Arc<dyn Dx11ContextOps>,
    ) -> OnyxResult<()> {
        if self.recording.load(Ordering::Acquire) {
            return Err(OnyxError::InvalidArgument(
                "command buffer submitted while recording".to_string(),
            ));
        }

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                let list = direct.take_command_list()?;
                immediate_context.execute_command_list(list, false);
                self.device_context.device_ops().destroy_object(list.0);
                Ok(())
            }
            CommandBufferVariant::Emulated(emu) => {
                let replayer = DirectCommandBuffer::new(
                    self.device_context.clone(),
                    immediate_context.clone(),
                    false,
                );
                emu.replay(&replayer)
            }
        }
    }

    pub fn cmd_set_viewports(
        &self,
        viewports: &[OnyxViewport],
    ) -> OnyxResult<()> {
        self.check_recording()?;
        let native: Vec<_> = viewports
            .iter()
            .map(|v| D3D11_VIEWPORT {
                TopLeftX: v.x,
                TopLeftY: v.y,
                Width: v.width,
                Height: v.height,
                MinDepth: v.min_depth,
                MaxDepth: v.max_depth,
            })
            .collect();

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.set_viewports(&native),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::SetViewports);
                recording.stream.push_u32(native.len() as u32);
                for viewport in &native {
                    recording.stream.push_f32(viewport.TopLeftX);
                    recording.stream.push_f32(viewport.TopLeftY);
                    recording.stream.push_f32(viewport.Width);
                    recording.stream.push_f32(viewport.Height);
                    recording.stream.push_f32(viewport.MinDepth);
                    recording.stream.push_f32(viewport.MaxDepth);
                }
            }
        }
        Ok(())
    }

    pub fn cmd_set_scissors(
        &self,
        scissors: &[OnyxScissor],
    ) -> OnyxResult<()> {
        self.check_recording()?;
        let native: Vec<_> = scissors
            .iter()
            .map(|s| D3D11_RECT {
                left: s.x,
                top: s.y,
                right: s.x + s.width as i32,
                bottom: s.y + s.height as i32,
            })
            .collect();

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.set_scissors(&native),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::SetScissors);
                recording.stream.push_u32(native.len() as u32);
                for rect in &native {
                    recording.stream.push_i32(rect.left);
                    recording.stream.push_i32(rect.top);
                    recording.stream.push_i32(rect.right);
                    recording.stream.push_i32(rect.bottom);
                }
            }
        }
        Ok(())
    }

    pub fn cmd_set_stencil_reference(
        &self,
        value: u32,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.set_stencil_reference(value),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::SetStencilReference);
                recording.stream.push_u32(value);
            }
        }
        Ok(())
    }

    pub fn cmd_set_sample_positions(
        &self,
        positions: &[OnyxSamplePosition],
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.set_sample_positions(positions)?,
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::SetSamplePositions);
                recording.stream.push_u32(positions.len() as u32);
                for position in positions {
                    recording.stream.push_i32(position.x as i32);
                    recording.stream.push_i32(position.y as i32);
                }
            }
        }
        Ok(())
    }

    pub fn cmd_bind_render_targets(
        &self,
        color_targets: &[&OnyxTextureDx11],
        depth_target: Option<&OnyxTextureDx11>,
    ) -> OnyxResult<()> {
        self.check_recording()?;

        let mut rtvs = Vec::with_capacity(color_targets.len());
        for target in color_targets {
            let view = target.dx11_render_target_view().ok_or_else(|| {
                OnyxError::InvalidArgument(
                    "color target texture has no render target view".to_string(),
                )
            })?;
            rtvs.push(Some(view));
        }
        let dsv = match depth_target {
            Some(target) => Some(target.dx11_depth_stencil_view().ok_or_else(|| {
                OnyxError::InvalidArgument(
                    "depth target texture has no depth stencil view".to_string(),
                )
            })?),
            None => None,
        };

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.bind_render_targets(&rtvs, dsv),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::SetRenderTargets);
                recording.stream.push_u32(rtvs.len() as u32);
                for rtv in &rtvs {
                    recording.stream.push_u64(rtv.map_or(0, |v| v.0));
                }
                recording.stream.push_u64(dsv.map_or(0, |v| v.0));
            }
        }
        Ok(())
    }

    pub fn cmd_clear_render_target(
        &self,
        texture: &OnyxTextureDx11,
        color: [f32; 4],
    ) -> OnyxResult<()> {
        self.check_recording()?;
        let view = texture.dx11_render_target_view().ok_or_else(|| {
            OnyxError::InvalidArgument("texture has no render target view".to_string())
        })?;

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.clear_render_target(view, color),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::ClearRenderTarget);
                recording.stream.push_u64(view.0);
                for &channel in &color {
                    recording.stream.push_f32(channel);
                }
            }
        }
        Ok(())
    }

    pub fn cmd_clear_depth_stencil(
        &self,
        texture: &OnyxTextureDx11,
        depth: f32,
        stencil: u8,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        let view = texture.dx11_depth_stencil_view().ok_or_else(|| {
            OnyxError::InvalidArgument("texture has no depth stencil view".to_string())
        })?;

        let mut flags = D3D11_CLEAR_DEPTH;
        if texture.texture_def().format.has_stencil() {
            flags |= D3D11_CLEAR_STENCIL;
        }

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.clear_depth_stencil(view, flags, depth, stencil)
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::ClearDepthStencil);
                recording.stream.push_u64(view.0);
                recording.stream.push_u32(flags);
                recording.stream.push_f32(depth);
                recording.stream.push_u32(stencil as u32);
            }
        }
        Ok(())
    }

    pub fn cmd_clear_storage(
        &self,
        descriptor: &OnyxDescriptorDx11,
        value: OnyxClearStorageValue,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        let view = descriptor.dx11_uav().ok_or_else(|| {
            OnyxError::InvalidArgument("descriptor has no writable view to clear".to_string())
        })?;

        // The descriptor's integer-format flag selects the native clear representation
        let (as_uint, words) = match (value, descriptor.is_integer_format()) {
            (OnyxClearStorageValue::Uint(values), true) => (true, values),
            (OnyxClearStorageValue::Float(values), false) => (
                false,
                [
                    values[0].to_bits(),
                    values[1].to_bits(),
                    values[2].to_bits(),
                    values[3].to_bits(),
                ],
            ),
            _ => {
                return Err(OnyxError::InvalidArgument(
                    "clear value representation does not match the descriptor format".to_string(),
                ))
            }
        };

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.clear_storage(view, as_uint, words),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::ClearStorage);
                recording.stream.push_u64(view.0);
                recording.stream.push_u32(as_uint as u32);
                for &word in &words {
                    recording.stream.push_u32(word);
                }
            }
        }
        Ok(())
    }

    pub fn cmd_bind_vertex_buffers(
        &self,
        first_binding: u32,
        bindings: &[OnyxVertexBufferBinding],
    ) -> OnyxResult<()> {
        self.check_recording()?;

        let mut buffers = Vec::with_capacity(bindings.len());
        let mut offsets = Vec::with_capacity(bindings.len());
        for binding in bindings {
            let buffer = binding.buffer.dx11_buffer().ok_or_else(|| {
                OnyxError::InvalidArgument("vertex buffer is not a dx11 buffer".to_string())
            })?;
            buffers.push(buffer.dx11_buffer());
            offsets.push(binding.byte_offset as u32);
        }

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.bind_vertex_buffers(first_binding, &buffers, &offsets)?
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::SetVertexBuffers);
                recording.stream.push_u32(first_binding);
                recording.stream.push_u32(buffers.len() as u32);
                for (buffer, offset) in buffers.iter().zip(&offsets) {
                    recording.stream.push_u64(buffer.0);
                    recording.stream.push_u32(*offset);
                }
            }
        }
        Ok(())
    }

    pub fn cmd_bind_index_buffer(
        &self,
        binding: &OnyxIndexBufferBinding,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        let buffer = binding.buffer.dx11_buffer().ok_or_else(|| {
            OnyxError::InvalidArgument("index buffer is not a dx11 buffer".to_string())
        })?;
        let format: DXGI_FORMAT = binding.index_type.into();

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.bind_index_buffer(buffer.dx11_buffer(), format, binding.byte_offset as u32)
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::SetIndexBuffer);
                recording.stream.push_u64(buffer.dx11_buffer().0);
                recording.stream.push_u32(format.0);
                recording.stream.push_u32(binding.byte_offset as u32);
            }
        }
        Ok(())
    }

    pub fn cmd_bind_pipeline_layout(
        &self,
        pipeline_layout: &OnyxPipelineLayoutDx11,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.bind_pipeline_layout(pipeline_layout),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                let index =
                    recording.push_object(EmuObject::PipelineLayout(pipeline_layout.clone()));
                recording.stream.push_op(Op::BindPipelineLayout);
                recording.stream.push_u32(index);
            }
        }
        Ok(())
    }

    pub fn cmd_bind_pipeline(
        &self,
        pipeline: &OnyxPipelineDx11,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.bind_pipeline(pipeline),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                let index = recording.push_object(EmuObject::Pipeline(pipeline.clone()));
                recording.stream.push_op(Op::BindPipeline);
                recording.stream.push_u32(index);
            }
        }
        Ok(())
    }

    pub fn cmd_bind_descriptor_set(
        &self,
        descriptor_set: &OnyxDescriptorSetDx11,
        dynamic_offsets: &[u32],
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.bind_descriptor_set(descriptor_set, dynamic_offsets)?
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                let index =
                    recording.push_object(EmuObject::DescriptorSet(descriptor_set.clone()));
                recording.stream.push_op(Op::BindDescriptorSet);
                recording.stream.push_u32(index);
                recording.stream.push_u32_slice(dynamic_offsets);
            }
        }
        Ok(())
    }

    pub fn cmd_set_push_constants(
        &self,
        push_constant_index: u32,
        data: &[u8],
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.set_push_constants(push_constant_index, data)?
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::SetPushConstants);
                recording.stream.push_u32(push_constant_index);
                recording.stream.push_bytes(data);
            }
        }
        Ok(())
    }

    pub fn cmd_draw(
        &self,
        vertex_count: u32,
        first_vertex: u32,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.draw(vertex_count, first_vertex),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::Draw);
                recording.stream.push_u32(vertex_count);
                recording.stream.push_u32(first_vertex);
            }
        }
        Ok(())
    }

    pub fn cmd_draw_instanced(
        &self,
        vertex_count: u32,
        instance_count: u32,
        first_vertex: u32,
        first_instance: u32,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.draw_instanced(vertex_count, instance_count, first_vertex, first_instance)
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::DrawInstanced);
                recording.stream.push_u32(vertex_count);
                recording.stream.push_u32(instance_count);
                recording.stream.push_u32(first_vertex);
                recording.stream.push_u32(first_instance);
            }
        }
        Ok(())
    }

    pub fn cmd_draw_indexed(
        &self,
        index_count: u32,
        first_index: u32,
        vertex_offset: i32,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.draw_indexed(index_count, first_index, vertex_offset)
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::DrawIndexed);
                recording.stream.push_u32(index_count);
                recording.stream.push_u32(first_index);
                recording.stream.push_i32(vertex_offset);
            }
        }
        Ok(())
    }

    pub fn cmd_draw_indexed_instanced(
        &self,
        index_count: u32,
        instance_count: u32,
        first_index: u32,
        vertex_offset: i32,
        first_instance: u32,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.draw_indexed_instanced(
                index_count,
                instance_count,
                first_index,
                vertex_offset,
                first_instance,
            ),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::DrawIndexedInstanced);
                recording.stream.push_u32(index_count);
                recording.stream.push_u32(instance_count);
                recording.stream.push_u32(first_index);
                recording.stream.push_i32(vertex_offset);
                recording.stream.push_u32(first_instance);
            }
        }
        Ok(())
    }

    pub fn cmd_draw_indirect(
        &self,
        args_buffer: &crate::dx11::OnyxBufferDx11,
        byte_offset: u32,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        validate_indirect_buffer(args_buffer)?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.draw_indirect(args_buffer.dx11_buffer(), byte_offset)
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::DrawInstancedIndirect);
                recording.stream.push_u64(args_buffer.dx11_buffer().0);
                recording.stream.push_u32(byte_offset);
            }
        }
        Ok(())
    }

    pub fn cmd_draw_indexed_indirect(
        &self,
        args_buffer: &crate::dx11::OnyxBufferDx11,
        byte_offset: u32,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        validate_indirect_buffer(args_buffer)?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.draw_indexed_indirect(args_buffer.dx11_buffer(), byte_offset)
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::DrawIndexedInstancedIndirect);
                recording.stream.push_u64(args_buffer.dx11_buffer().0);
                recording.stream.push_u32(byte_offset);
            }
        }
        Ok(())
    }

    pub fn cmd_dispatch(
        &self,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.dispatch(group_count_x, group_count_y, group_count_z)
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::Dispatch);
                recording.stream.push_u32(group_count_x);
                recording.stream.push_u32(group_count_y);
                recording.stream.push_u32(group_count_z);
            }
        }
        Ok(())
    }

    pub fn cmd_dispatch_indirect(
        &self,
        args_buffer: &crate::dx11::OnyxBufferDx11,
        byte_offset: u32,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        validate_indirect_buffer(args_buffer)?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => {
                direct.dispatch_indirect(args_buffer.dx11_buffer(), byte_offset)
            }
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::DispatchIndirect);
                recording.stream.push_u64(args_buffer.dx11_buffer().0);
                recording.stream.push_u32(byte_offset);
            }
        }
        Ok(())
    }

    pub fn cmd_copy_buffer_to_buffer(
        &self,
        src_buffer: &crate::dx11::OnyxBufferDx11,
        dst_buffer: &crate::dx11::OnyxBufferDx11,
        src_offset: u64,
        dst_offset: u64,
        size: u64,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.copy_buffer(
                dst_buffer.dx11_buffer(),
                dst_offset,
                src_buffer.dx11_buffer(),
                src_offset,
                size,
            ),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::CopyBuffer);
                recording.stream.push_u64(dst_buffer.dx11_buffer().0);
                recording.stream.push_u64(dst_offset);
                recording.stream.push_u64(src_buffer.dx11_buffer().0);
                recording.stream.push_u64(src_offset);
                recording.stream.push_u64(size);
            }
        }
        Ok(())
    }

    pub fn cmd_copy_texture(
        &self,
        src_texture: &OnyxTextureDx11,
        src_mip_level: u32,
        src_array_layer: u32,
        dst_texture: &OnyxTextureDx11,
        dst_mip_level: u32,
        dst_array_layer: u32,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        let src_subresource = src_texture.subresource_index(src_mip_level, src_array_layer);
        let dst_subresource = dst_texture.subresource_index(dst_mip_level, dst_array_layer);

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.copy_texture(
                dst_texture.dx11_texture(),
                dst_subresource,
                src_texture.dx11_texture(),
                src_subresource,
            ),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::CopyTexture);
                recording.stream.push_u64(dst_texture.dx11_texture().0);
                recording.stream.push_u32(dst_subresource);
                recording.stream.push_u64(src_texture.dx11_texture().0);
                recording.stream.push_u32(src_subresource);
            }
        }
        Ok(())
    }

    pub fn cmd_resource_barrier(
        &self,
        buffer_barriers: &[OnyxBufferBarrier],
        texture_barriers: &[OnyxTextureBarrier],
    ) -> OnyxResult<()> {
        self.check_recording()?;

        for barrier in buffer_barriers {
            if barrier.buffer.dx11_buffer().is_none() {
                return Err(OnyxError::InvalidArgument(
                    "buffer barrier over a non-dx11 buffer".to_string(),
                ));
            }
        }
        for barrier in texture_barriers {
            if barrier.texture.dx11_texture().is_none() {
                return Err(OnyxError::InvalidArgument(
                    "texture barrier over a non-dx11 texture".to_string(),
                ));
            }
        }

        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.resource_barrier(),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::ResourceBarrier);
            }
        }
        Ok(())
    }

    pub fn cmd_begin_annotation(
        &self,
        name: &str,
    ) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.begin_annotation(name),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::BeginAnnotation);
                recording.stream.push_bytes(name.as_bytes());
            }
        }
        Ok(())
    }

    pub fn cmd_end_annotation(&self) -> OnyxResult<()> {
        self.check_recording()?;
        match &self.variant {
            CommandBufferVariant::Deferred(direct) => direct.end_annotation(),
            CommandBufferVariant::Emulated(emu) => {
                let mut recording = emu.recording.lock().unwrap();
                recording.stream.push_op(Op::EndAnnotation);
            }
        }
        Ok(())
    }
}

fn validate_indirect_buffer(buffer: &crate::dx11::OnyxBufferDx11) -> OnyxResult<()> {
    if !buffer
        .buffer_def()
        .resource_type
        .intersects(OnyxResourceType::INDIRECT_BUFFER)
    {
        return Err(OnyxError::InvalidArgument(
            "indirect argument buffer was not created with INDIRECT_BUFFER resource type"
                .to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::internal::testing::{MockDevice, NativeCall};
    use super::*;
    use crate::dx11::{OnyxApiDefDx11, OnyxApiDx11};
    use crate::{
        OnyxBlendState, OnyxBufferDef, OnyxCommandPoolDef, OnyxDepthState, OnyxDescriptorClass,
        OnyxDescriptorDef, OnyxDescriptorPoolDef, OnyxDescriptorRangeDef,
        OnyxDescriptorSetLayoutDef, OnyxExtents3D, OnyxFormat, OnyxGraphicsPipelineDef,
        OnyxIndexType, OnyxMemoryUsage, OnyxPipelineLayoutDef, OnyxPipelineType,
        OnyxRasterizerState, OnyxSampleCount, OnyxShaderStageDef, OnyxShaderStageFlags,
        OnyxTextureDef, OnyxTextureViewDef, OnyxTextureViewKind, OnyxVertexAttributeRate,
        OnyxVertexLayout, OnyxVertexLayoutAttribute, OnyxVertexLayoutBuffer,
    };

    struct Fixture {
        api: OnyxApiDx11,
        device: std::sync::Arc<MockDevice>,
    }

    impl Fixture {
        fn new() -> Self {
            let device = MockDevice::new();
            let api =
                OnyxApiDx11::from_device_ops(device.clone(), &OnyxApiDefDx11::default()).unwrap();
            Fixture { api, device }
        }

        fn command_buffer(
            &self,
            force_emulated: bool,
        ) -> OnyxCommandBufferDx11 {
            let queue = self.api.device_context().create_queue(crate::OnyxQueueType::Graphics).unwrap();
            let pool = queue.create_command_pool(&OnyxCommandPoolDef::default()).unwrap();
            pool.create_command_buffer(&OnyxCommandBufferDef { force_emulated })
                .unwrap()
        }
    }

    struct Scene {
        pipeline_layout: crate::dx11::OnyxPipelineLayoutDx11,
        pipeline: crate::dx11::OnyxPipelineDx11,
        descriptor_set: crate::dx11::OnyxDescriptorSetDx11,
        vertex_buffer: crate::OnyxBuffer,
        index_buffer: crate::OnyxBuffer,
        indirect_buffer: crate::dx11::OnyxBufferDx11,
        // Keeps the sampled texture alive for the duration of the test
        _descriptor: crate::dx11::OnyxDescriptorDx11,
    }

    fn build_scene(fixture: &Fixture) -> Scene {
        let device_context = fixture.api.device_context();

        let pipeline_layout = device_context
            .create_pipeline_layout(&OnyxPipelineLayoutDef {
                pipeline_type: OnyxPipelineType::Graphics,
                descriptor_sets: vec![OnyxDescriptorSetLayoutDef {
                    ranges: vec![OnyxDescriptorRangeDef {
                        base_slot: 0,
                        descriptor_count: 1,
                        class: OnyxDescriptorClass::ShaderResource,
                        stages: OnyxShaderStageFlags::FRAGMENT,
                    }],
                    dynamic_constant_buffers: vec![],
                }],
                push_constants: vec![],
            })
            .unwrap();

        let module = crate::OnyxShaderModule::Dx11(
            device_context.create_shader_module(&[0xde, 0xad]).unwrap(),
        );
        let shader = crate::OnyxShader::Dx11(
            device_context
                .create_shader(vec![OnyxShaderStageDef {
                    shader_module: module,
                    entry_point: "main".to_string(),
                    shader_stage: OnyxShaderStageFlags::VERTEX,
                }])
                .unwrap(),
        );

        let vertex_layout = OnyxVertexLayout {
            attributes: vec![OnyxVertexLayoutAttribute {
                format: OnyxFormat::R32G32B32_FLOAT,
                buffer_index: 0,
                byte_offset: 0,
                semantic: "POSITION".to_string(),
                semantic_index: 0,
            }],
            buffers: vec![OnyxVertexLayoutBuffer {
                stride: 12,
                rate: OnyxVertexAttributeRate::Vertex,
            }],
        };

        let pipeline = device_context
            .create_graphics_pipeline(&OnyxGraphicsPipelineDef {
                shader: &shader,
                pipeline_layout: &crate::OnyxPipelineLayout::Dx11(pipeline_layout.clone()),
                vertex_layout: &vertex_layout,
                blend_state: &OnyxBlendState::default(),
                depth_state: &OnyxDepthState::default(),
                rasterizer_state: &OnyxRasterizerState::default(),
                primitive_topology: crate::OnyxPrimitiveTopology::TriangleList,
                color_formats: &[OnyxFormat::R8G8B8A8_UNORM],
                depth_stencil_format: None,
                sample_count: OnyxSampleCount::SampleCount1,
                sample_mask: !0,
            })
            .unwrap();

        let texture = crate::OnyxTexture::Dx11(
            device_context
                .create_texture(&OnyxTextureDef {
                    extents: OnyxExtents3D {
                        width: 4,
                        height: 4,
                        depth: 1,
                    },
                    format: OnyxFormat::R8G8B8A8_UNORM,
                    resource_type: crate::OnyxResourceType::TEXTURE,
                    ..Default::default()
                })
                .unwrap(),
        );
        let descriptor = device_context
            .create_descriptor(&OnyxDescriptorDef::TextureView(OnyxTextureViewDef {
                texture: &texture,
                kind: OnyxTextureViewKind::ShaderResource,
                mip_first: 0,
                mip_count: 1,
                layer_first: 0,
                layer_count: 1,
            }))
            .unwrap();

        let descriptor_pool = device_context
            .create_descriptor_pool(&OnyxDescriptorPoolDef {
                descriptor_capacity: 4,
            })
            .unwrap();
        let descriptor_set = descriptor_pool
            .allocate_descriptor_set(&pipeline_layout, 0)
            .unwrap();
        descriptor_set.update_descriptors(0, 0, &[&descriptor]).unwrap();

        let vertex_buffer = crate::OnyxBuffer::Dx11(
            device_context
                .create_buffer(&OnyxBufferDef {
                    size: 1024,
                    memory_usage: OnyxMemoryUsage::GpuOnly,
                    resource_type: crate::OnyxResourceType::VERTEX_BUFFER,
                    ..Default::default()
                })
                .unwrap(),
        );
        let index_buffer = crate::OnyxBuffer::Dx11(
            device_context
                .create_buffer(&OnyxBufferDef {
                    size: 1024,
                    memory_usage: OnyxMemoryUsage::GpuOnly,
                    resource_type: crate::OnyxResourceType::INDEX_BUFFER,
                    ..Default::default()
                })
                .unwrap(),
        );
        let indirect_buffer = device_context
            .create_buffer(&OnyxBufferDef {
                size: 64,
                memory_usage: OnyxMemoryUsage::GpuOnly,
                resource_type: crate::OnyxResourceType::INDIRECT_BUFFER,
                ..Default::default()
            })
            .unwrap();

        Scene {
            pipeline_layout,
            pipeline,
            descriptor_set,
            vertex_buffer,
            index_buffer,
            indirect_buffer,
            _descriptor: descriptor,
        }
    }

    fn record_scene(
        command_buffer: &OnyxCommandBufferDx11,
        scene: &Scene,
    ) {
        command_buffer.begin().unwrap();
        command_buffer.cmd_begin_annotation("scene").unwrap();
        command_buffer
            .cmd_bind_pipeline_layout(&scene.pipeline_layout)
            .unwrap();
        command_buffer.cmd_bind_pipeline(&scene.pipeline).unwrap();
        command_buffer
            .cmd_set_viewports(&[
                OnyxViewport {
                    x: 0.0,
                    y: 0.0,
                    width: 800.0,
                    height: 600.0,
                    min_depth: 0.0,
                    max_depth: 1.0,
                },
                OnyxViewport {
                    x: 0.0,
                    y: 0.0,
                    width: 400.0,
                    height: 300.0,
                    min_depth: 0.0,
                    max_depth: 1.0,
                },
            ])
            .unwrap();
        command_buffer
            .cmd_set_scissors(&[OnyxScissor {
                x: 0,
                y: 0,
                width: 800,
                height: 600,
            }])
            .unwrap();
        command_buffer
            .cmd_bind_descriptor_set(&scene.descriptor_set, &[])
            .unwrap();
        command_buffer
            .cmd_bind_vertex_buffers(
                0,
                &[OnyxVertexBufferBinding {
                    buffer: &scene.vertex_buffer,
                    byte_offset: 0,
                }],
            )
            .unwrap();
        command_buffer
            .cmd_bind_index_buffer(&OnyxIndexBufferBinding {
                buffer: &scene.index_buffer,
                byte_offset: 0,
                index_type: OnyxIndexType::Uint16,
            })
            .unwrap();
        command_buffer
            .cmd_resource_barrier(&[], &[])
            .unwrap();
        command_buffer.cmd_draw_indexed(36, 0, 0).unwrap();
        command_buffer
            .cmd_dispatch_indirect(&scene.indirect_buffer, 16)
            .unwrap();
        command_buffer.cmd_end_annotation().unwrap();
        command_buffer.end().unwrap();
    }

    #[test]
    fn emulated_replay_matches_direct_recording_call_for_call() {
        let fixture = Fixture::new();
        let scene = build_scene(&fixture);

        // Record through a real deferred context
        let deferred_cb = fixture.command_buffer(false);
        assert!(!deferred_cb.is_emulated());
        record_scene(&deferred_cb, &scene);

        let deferred_contexts = fixture.device.mock_deferred_contexts();
        assert_eq!(deferred_contexts.len(), 1);
        let mut deferred_calls = deferred_contexts[0].take_calls();
        assert_eq!(deferred_calls.pop(), Some(NativeCall::FinishCommandList));

        // Record the identical sequence through the op-stream and replay it
        let emulated_cb = fixture.command_buffer(true);
        assert!(emulated_cb.is_emulated());
        record_scene(&emulated_cb, &scene);

        let immediate = fixture.device.mock_immediate();
        immediate.take_calls();
        emulated_cb.submit_locked(&(immediate.clone() as Arc<dyn Dx11ContextOps>)).unwrap();
        let replayed_calls = immediate.take_calls();

        assert_eq!(deferred_calls, replayed_calls);
    }

    #[test]
    fn viewport_counts_and_order_survive_the_op_stream() {
        let fixture = Fixture::new();
        let command_buffer = fixture.command_buffer(true);

        command_buffer.begin().unwrap();
        command_buffer
            .cmd_set_viewports(&[
                OnyxViewport {
                    x: 0.0,
                    y: 0.0,
                    width: 128.0,
                    height: 128.0,
                    min_depth: 0.0,
                    max_depth: 1.0,
                },
                OnyxViewport {
                    x: 8.0,
                    y: 8.0,
                    width: 64.0,
                    height: 64.0,
                    min_depth: 0.0,
                    max_depth: 0.5,
                },
            ])
            .unwrap();
        command_buffer.cmd_draw(3, 0).unwrap();
        command_buffer.end().unwrap();

        let immediate = fixture.device.mock_immediate();
        immediate.take_calls();
        command_buffer.submit_locked(&(immediate.clone() as Arc<dyn Dx11ContextOps>)).unwrap();

        let calls = immediate.take_calls();
        assert_eq!(calls.len(), 2);
        match &calls[0] {
            NativeCall::RsSetViewports(viewports) => {
                assert_eq!(viewports.len(), 2);
                assert_eq!(viewports[1].Width, 64.0);
            }
            other => panic!("expected the viewport set first, got {:?}", other),
        }
        assert_eq!(
            calls[1],
            NativeCall::Draw {
                vertex_count: 3,
                start_vertex: 0,
            }
        );
    }

    #[test]
    fn submission_consumes_the_op_stream() {
        let fixture = Fixture::new();
        let command_buffer = fixture.command_buffer(true);

        command_buffer.begin().unwrap();
        command_buffer.cmd_draw(3, 0).unwrap();
        command_buffer.end().unwrap();

        let immediate = fixture.device.mock_immediate();
        immediate.take_calls();

        command_buffer.submit_locked(&(immediate.clone() as Arc<dyn Dx11ContextOps>)).unwrap();
        assert_eq!(immediate.take_calls().len(), 1);

        // A second submission replays nothing
        command_buffer.submit_locked(&(immediate.clone() as Arc<dyn Dx11ContextOps>)).unwrap();
        assert_eq!(immediate.take_calls().len(), 0);
    }

    #[test]
    fn begin_discards_the_previous_recording() {
        let fixture = Fixture::new();
        let command_buffer = fixture.command_buffer(true);

        command_buffer.begin().unwrap();
        command_buffer.cmd_draw(3, 0).unwrap();
        command_buffer.cmd_draw(6, 0).unwrap();
        command_buffer.end().unwrap();

        command_buffer.begin().unwrap();
        command_buffer.cmd_dispatch(1, 2, 3).unwrap();
        command_buffer.end().unwrap();

        let immediate = fixture.device.mock_immediate();
        immediate.take_calls();
        command_buffer.submit_locked(&(immediate.clone() as Arc<dyn Dx11ContextOps>)).unwrap();

        assert_eq!(
            immediate.take_calls(),
            vec![NativeCall::Dispatch {
                group_count_x: 1,
                group_count_y: 2,
                group_count_z: 3,
            }]
        );
    }

    #[test]
    fn recording_outside_begin_end_is_rejected() {
        let fixture = Fixture::new();
        let command_buffer = fixture.command_buffer(true);

        assert!(command_buffer.cmd_draw(3, 0).is_err());
        command_buffer.begin().unwrap();
        command_buffer.cmd_draw(3, 0).unwrap();
        command_buffer.end().unwrap();
        assert!(command_buffer.cmd_draw(3, 0).is_err());
    }

    #[test]
    fn drivers_without_command_lists_fall_back_to_emulation() {
        let device =
            MockDevice::with_capabilities(super::super::d3d11::D3D_FEATURE_LEVEL_11_0, false);
        let api = OnyxApiDx11::from_device_ops(device, &OnyxApiDefDx11::default()).unwrap();

        let queue = api.device_context().create_queue(crate::OnyxQueueType::Graphics).unwrap();
        let pool = queue.create_command_pool(&OnyxCommandPoolDef::default()).unwrap();
        let command_buffer = pool
            .create_command_buffer(&OnyxCommandBufferDef::default())
            .unwrap();

        assert!(command_buffer.is_emulated());
    }

    #[test]
    fn deferred_command_buffers_execute_their_command_list() {
        let fixture = Fixture::new();
        let command_buffer = fixture.command_buffer(false);

        command_buffer.begin().unwrap();
        command_buffer.cmd_draw(3, 0).unwrap();
        command_buffer.end().unwrap();

        let immediate = fixture.device.mock_immediate();
        immediate.take_calls();
        command_buffer.submit_locked(&(immediate.clone() as Arc<dyn Dx11ContextOps>)).unwrap();

        let calls = immediate.take_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(calls[0], NativeCall::ExecuteCommandList { .. }));

        // The command list is consumed; resubmitting without re-recording fails
        assert!(command_buffer.submit_locked(&(immediate.clone() as Arc<dyn Dx11ContextOps>)).is_err());
    }
}
