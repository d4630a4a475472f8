//! Recording implementations of the native call surface, used by unit tests to diff the exact
//! sequence of native calls (with decoded arguments) an operation produces.

use super::super::d3d11::*;
use super::native::*;
use crate::{OnyxError, OnyxResult};
use fnv::FnvHashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// One native context call with its decoded arguments
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum NativeCall {
    IaSetInputLayout(Option<NativeInputLayout>),
    IaSetPrimitiveTopology(D3D_PRIMITIVE_TOPOLOGY),
    IaSetVertexBuffers {
        start_slot: u32,
        buffers: Vec<Option<NativeBuffer>>,
        strides: Vec<u32>,
        offsets: Vec<u32>,
    },
    IaSetIndexBuffer {
        buffer: Option<NativeBuffer>,
        format: DXGI_FORMAT,
        byte_offset: u32,
    },
    SetShader {
        stage: Dx11ShaderStage,
        shader: Option<NativeShader>,
    },
    SetConstantBuffers {
        stage: Dx11ShaderStage,
        start_slot: u32,
        buffers: Vec<Option<NativeBuffer>>,
    },
    SetConstantBuffers1 {
        stage: Dx11ShaderStage,
        start_slot: u32,
        buffers: Vec<Option<NativeBuffer>>,
        first_constants: Vec<u32>,
        num_constants: Vec<u32>,
    },
    SetShaderResources {
        stage: Dx11ShaderStage,
        start_slot: u32,
        views: Vec<Option<NativeSrv>>,
    },
    SetSamplers {
        stage: Dx11ShaderStage,
        start_slot: u32,
        samplers: Vec<Option<NativeSampler>>,
    },
    CsSetUnorderedAccessViews {
        start_slot: u32,
        views: Vec<Option<NativeUav>>,
    },
    OmSetUnorderedAccessViews {
        start_slot: u32,
        views: Vec<Option<NativeUav>>,
    },
    OmSetRenderTargets {
        rtvs: Vec<Option<NativeRtv>>,
        dsv: Option<NativeDsv>,
    },
    OmSetBlendState {
        state: Option<NativeBlendState>,
        blend_factor: [f32; 4],
        sample_mask: u32,
    },
    OmSetDepthStencilState {
        state: Option<NativeDepthStencilState>,
        stencil_ref: u32,
    },
    RsSetState(Option<NativeRasterizerState>),
    RsSetViewports(Vec<D3D11_VIEWPORT>),
    RsSetScissorRects(Vec<D3D11_RECT>),
    Draw {
        vertex_count: u32,
        start_vertex: u32,
    },
    DrawInstanced {
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex: u32,
        start_instance: u32,
    },
    DrawIndexed {
        index_count: u32,
        start_index: u32,
        base_vertex: i32,
    },
    DrawIndexedInstanced {
        index_count_per_instance: u32,
        instance_count: u32,
        start_index: u32,
        base_vertex: i32,
        start_instance: u32,
    },
    DrawInstancedIndirect {
        args: NativeBuffer,
        byte_offset: u32,
    },
    DrawIndexedInstancedIndirect {
        args: NativeBuffer,
        byte_offset: u32,
    },
    Dispatch {
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    },
    DispatchIndirect {
        args: NativeBuffer,
        byte_offset: u32,
    },
    CopyBufferRegion {
        dst: NativeBuffer,
        dst_offset: u64,
        src: NativeBuffer,
        src_offset: u64,
        size: u64,
    },
    CopyTextureRegion {
        dst: NativeTexture,
        dst_subresource: u32,
        dst_offset: [u32; 3],
        src: NativeTexture,
        src_subresource: u32,
        src_box: Option<D3D11_BOX>,
    },
    UpdateSubresource {
        dst: NativeResource,
        dst_subresource: u32,
        data: Vec<u8>,
    },
    ClearRenderTargetView {
        view: NativeRtv,
        color: [f32; 4],
    },
    ClearDepthStencilView {
        view: NativeDsv,
        flags: u32,
        depth: f32,
        stencil: u8,
    },
    ClearUnorderedAccessViewFloat {
        view: NativeUav,
        values: [f32; 4],
    },
    ClearUnorderedAccessViewUint {
        view: NativeUav,
        values: [u32; 4],
    },
    BeginAnnotation(String),
    EndAnnotation,
    EndEventQuery(NativeQuery),
    Flush,
    ClearState,
    FinishCommandList,
    ExecuteCommandList {
        list: NativeCommandList,
        restore_context_state: bool,
    },
}

#[derive(Debug, Default)]
struct MockShared {
    next_id: AtomicU64,
    live_objects: Mutex<FnvHashMap<u64, &'static str>>,
    buffer_storage: Mutex<FnvHashMap<u64, Box<[u8]>>>,
}

impl MockShared {
    fn allocate(
        &self,
        kind: &'static str,
    ) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.live_objects.lock().unwrap().insert(id, kind);
        id
    }
}

/// A recording `Dx11ContextOps`. Standalone construction is enough for binding-engine tests;
/// contexts created through `MockDevice` additionally support `map`.
#[derive(Debug, Default)]
pub(crate) struct MockContext {
    calls: Mutex<Vec<NativeCall>>,
    shared: Option<Arc<MockShared>>,
    is_deferred: bool,
}

impl MockContext {
    pub fn new() -> Self {
        Default::default()
    }

    /// Drain and return everything recorded so far
    pub fn take_calls(&self) -> Vec<NativeCall> {
        std::mem::take(&mut *self.calls.lock().unwrap())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(
        &self,
        call: NativeCall,
    ) {
        self.calls.lock().unwrap().push(call);
    }
}

impl Dx11ContextOps for MockContext {
    fn ia_set_input_layout(
        &self,
        layout: Option<NativeInputLayout>,
    ) {
        self.record(NativeCall::IaSetInputLayout(layout));
    }

    fn ia_set_primitive_topology(
        &self,
        topology: D3D_PRIMITIVE_TOPOLOGY,
    ) {
        self.record(NativeCall::IaSetPrimitiveTopology(topology));
    }

    fn ia_set_vertex_buffers(
        &self,
        start_slot: u32,
        buffers: &[Option<NativeBuffer>],
        strides: &[u32],
        offsets: &[u32],
    ) {
        self.record(NativeCall::IaSetVertexBuffers {
            start_slot,
            buffers: buffers.to_vec(),
            strides: strides.to_vec(),
            offsets: offsets.to_vec(),
        });
    }

    fn ia_set_index_buffer(
        &self,
        buffer: Option<NativeBuffer>,
        format: DXGI_FORMAT,
        byte_offset: u32,
    ) {
        self.record(NativeCall::IaSetIndexBuffer {
            buffer,
            format,
            byte_offset,
        });
    }

    fn set_shader(
        &self,
        stage: Dx11ShaderStage,
        shader: Option<NativeShader>,
    ) {
        self.record(NativeCall::SetShader { stage, shader });
    }

    fn set_constant_buffers(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        buffers: &[Option<NativeBuffer>],
    ) {
        self.record(NativeCall::SetConstantBuffers {
            stage,
            start_slot,
            buffers: buffers.to_vec(),
        });
    }

    fn set_constant_buffers1(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        buffers: &[Option<NativeBuffer>],
        first_constants: &[u32],
        num_constants: &[u32],
    ) {
        self.record(NativeCall::SetConstantBuffers1 {
            stage,
            start_slot,
            buffers: buffers.to_vec(),
            first_constants: first_constants.to_vec(),
            num_constants: num_constants.to_vec(),
        });
    }

    fn set_shader_resources(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        views: &[Option<NativeSrv>],
    ) {
        self.record(NativeCall::SetShaderResources {
            stage,
            start_slot,
            views: views.to_vec(),
        });
    }

    fn set_samplers(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        samplers: &[Option<NativeSampler>],
    ) {
        self.record(NativeCall::SetSamplers {
            stage,
            start_slot,
            samplers: samplers.to_vec(),
        });
    }

    fn cs_set_unordered_access_views(
        &self,
        start_slot: u32,
        views: &[Option<NativeUav>],
    ) {
        self.record(NativeCall::CsSetUnorderedAccessViews {
            start_slot,
            views: views.to_vec(),
        });
    }

    fn om_set_unordered_access_views(
        &self,
        start_slot: u32,
        views: &[Option<NativeUav>],
    ) {
        self.record(NativeCall::OmSetUnorderedAccessViews {
            start_slot,
            views: views.to_vec(),
        });
    }

    fn om_set_render_targets(
        &self,
        rtvs: &[Option<NativeRtv>],
        dsv: Option<NativeDsv>,
    ) {
        self.record(NativeCall::OmSetRenderTargets {
            rtvs: rtvs.to_vec(),
            dsv,
        });
    }

    fn om_set_blend_state(
        &self,
        state: Option<NativeBlendState>,
        blend_factor: [f32; 4],
        sample_mask: u32,
    ) {
        self.record(NativeCall::OmSetBlendState {
            state,
            blend_factor,
            sample_mask,
        });
    }

    fn om_set_depth_stencil_state(
        &self,
        state: Option<NativeDepthStencilState>,
        stencil_ref: u32,
    ) {
        self.record(NativeCall::OmSetDepthStencilState { state, stencil_ref });
    }

    fn rs_set_state(
        &self,
        state: Option<NativeRasterizerState>,
    ) {
        self.record(NativeCall::RsSetState(state));
    }

    fn rs_set_viewports(
        &self,
        viewports: &[D3D11_VIEWPORT],
    ) {
        self.record(NativeCall::RsSetViewports(viewports.to_vec()));
    }

    fn rs_set_scissor_rects(
        &self,
        rects: &[D3D11_RECT],
    ) {
        self.record(NativeCall::RsSetScissorRects(rects.to_vec()));
    }

    fn draw(
        &self,
        vertex_count: u32,
        start_vertex: u32,
    ) {
        self.record(NativeCall::Draw {
            vertex_count,
            start_vertex,
        });
    }

    fn draw_instanced(
        &self,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex: u32,
        start_instance: u32,
    ) {
        self.record(NativeCall::DrawInstanced {
            vertex_count_per_instance,
            instance_count,
            start_vertex,
            start_instance,
        });
    }

    fn draw_indexed(
        &self,
        index_count: u32,
        start_index: u32,
        base_vertex: i32,
    ) {
        self.record(NativeCall::DrawIndexed {
            index_count,
            start_index,
            base_vertex,
        });
    }

    fn draw_indexed_instanced(
        &self,
        index_count_per_instance: u32,
        instance_count: u32,
        start_index: u32,
        base_vertex: i32,
        start_instance: u32,
    ) {
        self.record(NativeCall::DrawIndexedInstanced {
            index_count_per_instance,
            instance_count,
            start_index,
            base_vertex,
            start_instance,
        });
    }

    fn draw_instanced_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    ) {
        self.record(NativeCall::DrawInstancedIndirect { args, byte_offset });
    }

    fn draw_indexed_instanced_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    ) {
        self.record(NativeCall::DrawIndexedInstancedIndirect { args, byte_offset });
    }

    fn dispatch(
        &self,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) {
        self.record(NativeCall::Dispatch {
            group_count_x,
            group_count_y,
            group_count_z,
        });
    }

    fn dispatch_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    ) {
        self.record(NativeCall::DispatchIndirect { args, byte_offset });
    }

    fn copy_buffer_region(
        &self,
        dst: NativeBuffer,
        dst_offset: u64,
        src: NativeBuffer,
        src_offset: u64,
        size: u64,
    ) {
        self.record(NativeCall::CopyBufferRegion {
            dst,
            dst_offset,
            src,
            src_offset,
            size,
        });
    }

    fn copy_texture_region(
        &self,
        dst: NativeTexture,
        dst_subresource: u32,
        dst_offset: [u32; 3],
        src: NativeTexture,
        src_subresource: u32,
        src_box: Option<D3D11_BOX>,
    ) {
        self.record(NativeCall::CopyTextureRegion {
            dst,
            dst_subresource,
            dst_offset,
            src,
            src_subresource,
            src_box,
        });
    }

    fn update_subresource(
        &self,
        dst: NativeResource,
        dst_subresource: u32,
        data: &[u8],
    ) {
        self.record(NativeCall::UpdateSubresource {
            dst,
            dst_subresource,
            data: data.to_vec(),
        });
    }

    fn clear_render_target_view(
        &self,
        view: NativeRtv,
        color: [f32; 4],
    ) {
        self.record(NativeCall::ClearRenderTargetView { view, color });
    }

    fn clear_depth_stencil_view(
        &self,
        view: NativeDsv,
        flags: u32,
        depth: f32,
        stencil: u8,
    ) {
        self.record(NativeCall::ClearDepthStencilView {
            view,
            flags,
            depth,
            stencil,
        });
    }

    fn clear_unordered_access_view_float(
        &self,
        view: NativeUav,
        values: [f32; 4],
    ) {
        self.record(NativeCall::ClearUnorderedAccessViewFloat { view, values });
    }

    fn clear_unordered_access_view_uint(
        &self,
        view: NativeUav,
        values: [u32; 4],
    ) {
        self.record(NativeCall::ClearUnorderedAccessViewUint { view, values });
    }

    fn map(
        &self,
        resource: NativeResource,
        _map_type: D3D11_MAP,
    ) -> OnyxResult<*mut u8> {
        let shared = self.shared.as_ref().ok_or_else(|| {
            OnyxError::StringError("mock context has no backing device".to_string())
        })?;

        let mut storage = shared.buffer_storage.lock().unwrap();
        let data = storage.get_mut(&resource.0).ok_or(OnyxError::NativeCallFailed {
            call: "ID3D11DeviceContext::Map",
            result: -2147024809,
        })?;
        Ok(data.as_mut_ptr())
    }

    fn unmap(
        &self,
        _resource: NativeResource,
    ) {
    }

    fn begin_annotation(
        &self,
        name: &str,
    ) {
        self.record(NativeCall::BeginAnnotation(name.to_string()));
    }

    fn end_annotation(&self) {
        self.record(NativeCall::EndAnnotation);
    }

    fn end_event_query(
        &self,
        query: NativeQuery,
    ) {
        self.record(NativeCall::EndEventQuery(query));
    }

    fn get_event_query_data(
        &self,
        _query: NativeQuery,
    ) -> bool {
        // The mock GPU completes instantly
        true
    }

    fn flush(&self) {
        self.record(NativeCall::Flush);
    }

    fn clear_state(&self) {
        self.record(NativeCall::ClearState);
    }

    fn finish_command_list(&self) -> OnyxResult<NativeCommandList> {
        if !self.is_deferred {
            return Err(OnyxError::NativeCallFailed {
                call: "ID3D11DeviceContext::FinishCommandList",
                result: -2147467263,
            });
        }

        self.record(NativeCall::FinishCommandList);
        let id = self
            .shared
            .as_ref()
            .map_or(u64::MAX, |s| s.allocate("command_list"));
        Ok(NativeCommandList(id))
    }

    fn execute_command_list(
        &self,
        list: NativeCommandList,
        restore_context_state: bool,
    ) {
        self.record(NativeCall::ExecuteCommandList {
            list,
            restore_context_state,
        });
    }
}

/// A recording `Dx11DeviceOps` handing out monotonically increasing handle ids and tracking
/// which are live, so tests can assert balanced create/destroy.
#[derive(Debug)]
pub(crate) struct MockDevice {
    shared: Arc<MockShared>,
    immediate: Arc<MockContext>,
    feature_level: D3D_FEATURE_LEVEL,
    command_list_support: bool,
    fail_next_create: AtomicBool,
    deferred_contexts: Mutex<Vec<Arc<MockContext>>>,
}

impl MockDevice {
    pub fn new() -> Arc<Self> {
        Self::with_capabilities(D3D_FEATURE_LEVEL_11_1, true)
    }

    pub fn with_capabilities(
        feature_level: D3D_FEATURE_LEVEL,
        command_list_support: bool,
    ) -> Arc<Self> {
        let shared = Arc::new(MockShared::default());
        let immediate = Arc::new(MockContext {
            calls: Default::default(),
            shared: Some(shared.clone()),
            is_deferred: false,
        });

        Arc::new(MockDevice {
            shared,
            immediate,
            feature_level,
            command_list_support,
            fail_next_create: AtomicBool::new(false),
            deferred_contexts: Default::default(),
        })
    }

    pub fn mock_immediate(&self) -> &Arc<MockContext> {
        &self.immediate
    }

    /// Deferred contexts created so far, in creation order
    pub fn mock_deferred_contexts(&self) -> Vec<Arc<MockContext>> {
        self.deferred_contexts.lock().unwrap().clone()
    }

    pub fn live_object_count(&self) -> usize {
        self.shared.live_objects.lock().unwrap().len()
    }

    /// Make the next state-object creation fail, to exercise native-failure fallbacks
    pub fn fail_next_create(&self) {
        self.fail_next_create.store(true, Ordering::Relaxed);
    }

    fn check_forced_failure(
        &self,
        call: &'static str,
    ) -> OnyxResult<()> {
        if self.fail_next_create.swap(false, Ordering::Relaxed) {
            // E_INVALIDARG
            Err(OnyxError::NativeCallFailed {
                call,
                result: -2147024809,
            })
        } else {
            Ok(())
        }
    }
}

impl Dx11DeviceOps for MockDevice {
    fn feature_level(&self) -> D3D_FEATURE_LEVEL {
        self.feature_level
    }

    fn check_command_list_support(&self) -> bool {
        self.command_list_support
    }

    fn immediate_context(&self) -> Arc<dyn Dx11ContextOps> {
        self.immediate.clone()
    }

    fn create_deferred_context(&self) -> OnyxResult<Arc<dyn Dx11ContextOps>> {
        if !self.command_list_support {
            return Err(OnyxError::NativeCallFailed {
                call: "ID3D11Device::CreateDeferredContext",
                result: -2147467263,
            });
        }

        let context = Arc::new(MockContext {
            calls: Default::default(),
            shared: Some(self.shared.clone()),
            is_deferred: true,
        });
        self.deferred_contexts.lock().unwrap().push(context.clone());
        Ok(context)
    }

    fn create_buffer(
        &self,
        desc: &D3D11_BUFFER_DESC,
        initial_data: Option<&[u8]>,
    ) -> OnyxResult<NativeBuffer> {
        self.check_forced_failure("ID3D11Device::CreateBuffer")?;

        let id = self.shared.allocate("buffer");
        let mut storage = vec![0u8; desc.ByteWidth as usize].into_boxed_slice();
        if let Some(initial_data) = initial_data {
            storage[..initial_data.len()].copy_from_slice(initial_data);
        }
        self.shared.buffer_storage.lock().unwrap().insert(id, storage);
        Ok(NativeBuffer(id))
    }

    fn create_texture(
        &self,
        _desc: &Dx11TextureDesc,
    ) -> OnyxResult<NativeTexture> {
        self.check_forced_failure("ID3D11Device::CreateTexture2D")?;
        Ok(NativeTexture(self.shared.allocate("texture")))
    }

    fn create_shader_resource_view(
        &self,
        _resource: NativeResource,
        _desc: &Dx11SrvDesc,
    ) -> OnyxResult<NativeSrv> {
        self.check_forced_failure("ID3D11Device::CreateShaderResourceView")?;
        Ok(NativeSrv(self.shared.allocate("srv")))
    }

    fn create_unordered_access_view(
        &self,
        _resource: NativeResource,
        _desc: &Dx11UavDesc,
    ) -> OnyxResult<NativeUav> {
        self.check_forced_failure("ID3D11Device::CreateUnorderedAccessView")?;
        Ok(NativeUav(self.shared.allocate("uav")))
    }

    fn create_render_target_view(
        &self,
        _resource: NativeResource,
        _desc: &Dx11RtvDesc,
    ) -> OnyxResult<NativeRtv> {
        Ok(NativeRtv(self.shared.allocate("rtv")))
    }

    fn create_depth_stencil_view(
        &self,
        _resource: NativeResource,
        _desc: &Dx11DsvDesc,
    ) -> OnyxResult<NativeDsv> {
        Ok(NativeDsv(self.shared.allocate("dsv")))
    }

    fn create_sampler_state(
        &self,
        _desc: &Dx11SamplerDesc,
    ) -> OnyxResult<NativeSampler> {
        Ok(NativeSampler(self.shared.allocate("sampler")))
    }

    fn create_input_layout(
        &self,
        _elements: &[Dx11InputElementDesc],
        _vertex_shader_bytecode: &[u8],
    ) -> OnyxResult<NativeInputLayout> {
        Ok(NativeInputLayout(self.shared.allocate("input_layout")))
    }

    fn create_rasterizer_state(
        &self,
        _desc: &Dx11RasterizerDesc,
        _sample_positions: &[crate::OnyxSamplePosition],
    ) -> OnyxResult<NativeRasterizerState> {
        self.check_forced_failure("ID3D11Device::CreateRasterizerState")?;
        Ok(NativeRasterizerState(
            self.shared.allocate("rasterizer_state"),
        ))
    }

    fn create_blend_state(
        &self,
        _desc: &Dx11BlendDesc,
    ) -> OnyxResult<NativeBlendState> {
        Ok(NativeBlendState(self.shared.allocate("blend_state")))
    }

    fn create_depth_stencil_state(
        &self,
        _desc: &Dx11DepthStencilDesc,
    ) -> OnyxResult<NativeDepthStencilState> {
        Ok(NativeDepthStencilState(
            self.shared.allocate("depth_stencil_state"),
        ))
    }

    fn create_shader(
        &self,
        _stage: Dx11ShaderStage,
        _bytecode: &[u8],
    ) -> OnyxResult<NativeShader> {
        self.check_forced_failure("ID3D11Device::CreateVertexShader")?;
        Ok(NativeShader(self.shared.allocate("shader")))
    }

    fn create_event_query(&self) -> OnyxResult<NativeQuery> {
        Ok(NativeQuery(self.shared.allocate("query")))
    }

    fn set_eviction_priority(
        &self,
        _resource: NativeResource,
        _priority: u32,
    ) {
    }

    fn destroy_object(
        &self,
        object_id: u64,
    ) {
        let removed = self.shared.live_objects.lock().unwrap().remove(&object_id);
        assert!(
            removed.is_some(),
            "double release of native object {}",
            object_id
        );
        self.shared.buffer_storage.lock().unwrap().remove(&object_id);
    }
}
