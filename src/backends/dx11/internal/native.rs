//! The native call surface the D3D11 backend is written against.
//!
//! `Dx11DeviceOps` covers `ID3D11Device` object creation and capability queries,
//! `Dx11ContextOps` covers the `ID3D11DeviceContext`/`ID3D11DeviceContext1` per-stage slot-array
//! calls. The Windows FFI layer forwards these to the COM vtables verbatim; tests substitute a
//! recording implementation and diff call logs.
//!
//! Native objects are opaque handles whose numeric value mirrors COM pointer identity, so handle
//! equality is pointer equality. Each handle is exclusively owned by the wrapping object that
//! created it and must be released through `destroy_object` exactly once.

use super::super::d3d11::*;
use crate::{OnyxResult, OnyxSamplePosition};
use std::sync::Arc;

macro_rules! native_handle {
    ($name:ident) => {
        #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
        pub struct $name(pub u64);

        impl $name {
            pub fn id(self) -> u64 {
                self.0
            }
        }
    };
}

native_handle!(NativeBuffer);
native_handle!(NativeTexture);
// NativeResource is the view-independent resource identity. Buffers and textures share this id
// space; a buffer or texture handle converts to the resource handle of the same object.
native_handle!(NativeResource);
native_handle!(NativeSrv);
native_handle!(NativeUav);
native_handle!(NativeRtv);
native_handle!(NativeDsv);
native_handle!(NativeSampler);
native_handle!(NativeShader);
native_handle!(NativeInputLayout);
native_handle!(NativeRasterizerState);
native_handle!(NativeBlendState);
native_handle!(NativeDepthStencilState);
native_handle!(NativeQuery);
native_handle!(NativeCommandList);

impl NativeBuffer {
    pub fn as_resource(self) -> NativeResource {
        NativeResource(self.0)
    }
}

impl NativeTexture {
    pub fn as_resource(self) -> NativeResource {
        NativeResource(self.0)
    }
}

/// The native shader stages. D3D11 exposes a separate slot-array call set per stage.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Dx11ShaderStage {
    Vertex,
    Hull,
    Domain,
    Geometry,
    Pixel,
    Compute,
}

pub const ALL_SHADER_STAGES: [Dx11ShaderStage; 6] = [
    Dx11ShaderStage::Vertex,
    Dx11ShaderStage::Hull,
    Dx11ShaderStage::Domain,
    Dx11ShaderStage::Geometry,
    Dx11ShaderStage::Pixel,
    Dx11ShaderStage::Compute,
];

impl Dx11ShaderStage {
    pub fn is_graphics(self) -> bool {
        self != Dx11ShaderStage::Compute
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum Dx11TextureDimension {
    Dim1D,
    Dim2D,
    Dim3D,
}

#[derive(Clone, Debug)]
pub struct Dx11TextureDesc {
    pub dimension: Dx11TextureDimension,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub array_size: u32,
    pub mip_levels: u32,
    pub format: DXGI_FORMAT,
    pub sample_count: u32,
    pub usage: D3D11_USAGE,
    pub bind_flags: u32,
    pub cpu_access_flags: u32,
    pub misc_flags: u32,
}

#[derive(Clone, Debug)]
pub enum Dx11SrvDesc {
    Buffer {
        format: DXGI_FORMAT,
        first_element: u64,
        num_elements: u64,
        structure_byte_stride: u32,
    },
    Texture {
        format: DXGI_FORMAT,
        dimension: Dx11TextureDimension,
        mip_first: u32,
        mip_count: u32,
        layer_first: u32,
        layer_count: u32,
    },
}

#[derive(Clone, Debug)]
pub enum Dx11UavDesc {
    Buffer {
        format: DXGI_FORMAT,
        first_element: u64,
        num_elements: u64,
        structure_byte_stride: u32,
    },
    Texture {
        format: DXGI_FORMAT,
        dimension: Dx11TextureDimension,
        mip_slice: u32,
        layer_first: u32,
        layer_count: u32,
    },
}

#[derive(Clone, Debug)]
pub struct Dx11RtvDesc {
    pub format: DXGI_FORMAT,
    pub dimension: Dx11TextureDimension,
    pub mip_slice: u32,
    pub layer_first: u32,
    pub layer_count: u32,
}

#[derive(Clone, Debug)]
pub struct Dx11DsvDesc {
    pub format: DXGI_FORMAT,
    pub mip_slice: u32,
    pub layer_first: u32,
    pub layer_count: u32,
}

#[derive(Clone, Debug)]
pub struct Dx11SamplerDesc {
    pub filter: D3D11_FILTER,
    pub address_u: D3D11_TEXTURE_ADDRESS_MODE,
    pub address_v: D3D11_TEXTURE_ADDRESS_MODE,
    pub address_w: D3D11_TEXTURE_ADDRESS_MODE,
    pub mip_lod_bias: f32,
    pub max_anisotropy: u32,
    pub comparison_func: D3D11_COMPARISON_FUNC,
    pub border_color: [f32; 4],
    pub min_lod: f32,
    pub max_lod: f32,
}

#[derive(Clone, Debug)]
pub struct Dx11InputElementDesc {
    pub semantic_name: String,
    pub semantic_index: u32,
    pub format: DXGI_FORMAT,
    pub input_slot: u32,
    pub aligned_byte_offset: u32,
    pub per_instance: bool,
    pub instance_data_step_rate: u32,
}

#[derive(Clone, Debug)]
pub struct Dx11RasterizerDesc {
    pub fill_mode: D3D11_FILL_MODE,
    pub cull_mode: D3D11_CULL_MODE,
    pub front_counter_clockwise: bool,
    pub depth_bias: i32,
    pub depth_bias_clamp: f32,
    pub slope_scaled_depth_bias: f32,
    pub depth_clip_enable: bool,
    pub scissor_enable: bool,
    pub multisample_enable: bool,
    pub antialiased_line_enable: bool,
}

#[derive(Copy, Clone, Debug)]
pub struct Dx11RenderTargetBlendDesc {
    pub blend_enable: bool,
    pub src_blend: D3D11_BLEND,
    pub dest_blend: D3D11_BLEND,
    pub blend_op: D3D11_BLEND_OP,
    pub src_blend_alpha: D3D11_BLEND,
    pub dest_blend_alpha: D3D11_BLEND,
    pub blend_op_alpha: D3D11_BLEND_OP,
    pub render_target_write_mask: u8,
}

impl Default for Dx11RenderTargetBlendDesc {
    fn default() -> Self {
        Dx11RenderTargetBlendDesc {
            blend_enable: false,
            src_blend: D3D11_BLEND_ONE,
            dest_blend: D3D11_BLEND_ZERO,
            blend_op: D3D11_BLEND_OP_ADD,
            src_blend_alpha: D3D11_BLEND_ONE,
            dest_blend_alpha: D3D11_BLEND_ZERO,
            blend_op_alpha: D3D11_BLEND_OP_ADD,
            render_target_write_mask: 0x0F,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Dx11BlendDesc {
    pub alpha_to_coverage_enable: bool,
    pub independent_blend_enable: bool,
    pub render_target: [Dx11RenderTargetBlendDesc; 8],
}

#[derive(Copy, Clone, Debug)]
pub struct Dx11DepthStencilOpDesc {
    pub fail_op: D3D11_STENCIL_OP,
    pub depth_fail_op: D3D11_STENCIL_OP,
    pub pass_op: D3D11_STENCIL_OP,
    pub func: D3D11_COMPARISON_FUNC,
}

#[derive(Clone, Debug)]
pub struct Dx11DepthStencilDesc {
    pub depth_enable: bool,
    pub depth_write_enable: bool,
    pub depth_func: D3D11_COMPARISON_FUNC,
    pub stencil_enable: bool,
    pub stencil_read_mask: u8,
    pub stencil_write_mask: u8,
    pub front_face: Dx11DepthStencilOpDesc,
    pub back_face: Dx11DepthStencilOpDesc,
}

/// `ID3D11Device` surface consumed by the backend. Creation calls return exclusively-owned
/// handles; `destroy_object` releases one by id.
pub trait Dx11DeviceOps: Send + Sync + std::fmt::Debug {
    fn feature_level(&self) -> D3D_FEATURE_LEVEL;

    /// Whether the driver can record real deferred-context command lists
    /// (`D3D11_FEATURE_THREADING`). When false, command buffers use op-stream emulation.
    fn check_command_list_support(&self) -> bool;

    fn immediate_context(&self) -> Arc<dyn Dx11ContextOps>;
    fn create_deferred_context(&self) -> OnyxResult<Arc<dyn Dx11ContextOps>>;

    fn create_buffer(
        &self,
        desc: &D3D11_BUFFER_DESC,
        initial_data: Option<&[u8]>,
    ) -> OnyxResult<NativeBuffer>;
    fn create_texture(
        &self,
        desc: &Dx11TextureDesc,
    ) -> OnyxResult<NativeTexture>;
    fn create_shader_resource_view(
        &self,
        resource: NativeResource,
        desc: &Dx11SrvDesc,
    ) -> OnyxResult<NativeSrv>;
    fn create_unordered_access_view(
        &self,
        resource: NativeResource,
        desc: &Dx11UavDesc,
    ) -> OnyxResult<NativeUav>;
    fn create_render_target_view(
        &self,
        resource: NativeResource,
        desc: &Dx11RtvDesc,
    ) -> OnyxResult<NativeRtv>;
    fn create_depth_stencil_view(
        &self,
        resource: NativeResource,
        desc: &Dx11DsvDesc,
    ) -> OnyxResult<NativeDsv>;
    fn create_sampler_state(
        &self,
        desc: &Dx11SamplerDesc,
    ) -> OnyxResult<NativeSampler>;
    fn create_input_layout(
        &self,
        elements: &[Dx11InputElementDesc],
        vertex_shader_bytecode: &[u8],
    ) -> OnyxResult<NativeInputLayout>;

    /// Non-empty `sample_positions` requests a vendor-extension rasterizer state with
    /// programmable sample locations baked in.
    fn create_rasterizer_state(
        &self,
        desc: &Dx11RasterizerDesc,
        sample_positions: &[OnyxSamplePosition],
    ) -> OnyxResult<NativeRasterizerState>;
    fn create_blend_state(
        &self,
        desc: &Dx11BlendDesc,
    ) -> OnyxResult<NativeBlendState>;
    fn create_depth_stencil_state(
        &self,
        desc: &Dx11DepthStencilDesc,
    ) -> OnyxResult<NativeDepthStencilState>;
    fn create_shader(
        &self,
        stage: Dx11ShaderStage,
        bytecode: &[u8],
    ) -> OnyxResult<NativeShader>;
    fn create_event_query(&self) -> OnyxResult<NativeQuery>;

    fn set_eviction_priority(
        &self,
        resource: NativeResource,
        priority: u32,
    );

    fn destroy_object(
        &self,
        object_id: u64,
    );
}

/// `ID3D11DeviceContext`/`ID3D11DeviceContext1` surface consumed by the backend. One
/// implementation wraps the immediate context, others wrap deferred contexts; the recording mock
/// in tests implements the same trait.
pub trait Dx11ContextOps: Send + Sync + std::fmt::Debug {
    // Input assembler
    fn ia_set_input_layout(
        &self,
        layout: Option<NativeInputLayout>,
    );
    fn ia_set_primitive_topology(
        &self,
        topology: D3D_PRIMITIVE_TOPOLOGY,
    );
    fn ia_set_vertex_buffers(
        &self,
        start_slot: u32,
        buffers: &[Option<NativeBuffer>],
        strides: &[u32],
        offsets: &[u32],
    );
    fn ia_set_index_buffer(
        &self,
        buffer: Option<NativeBuffer>,
        format: DXGI_FORMAT,
        byte_offset: u32,
    );

    // Per-stage slot arrays
    fn set_shader(
        &self,
        stage: Dx11ShaderStage,
        shader: Option<NativeShader>,
    );
    fn set_constant_buffers(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        buffers: &[Option<NativeBuffer>],
    );
    /// The `*SetConstantBuffers1` bounded-range variant. Offsets and counts are in 16-byte
    /// constants. Only exists on feature level 11.1+; not interchangeable with the plain call on
    /// downlevel devices.
    fn set_constant_buffers1(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        buffers: &[Option<NativeBuffer>],
        first_constants: &[u32],
        num_constants: &[u32],
    );
    fn set_shader_resources(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        views: &[Option<NativeSrv>],
    );
    fn set_samplers(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        samplers: &[Option<NativeSampler>],
    );
    fn cs_set_unordered_access_views(
        &self,
        start_slot: u32,
        views: &[Option<NativeUav>],
    );
    /// The single globally-shared graphics UAV slot range, bound through the output merger while
    /// keeping the current render targets.
    fn om_set_unordered_access_views(
        &self,
        start_slot: u32,
        views: &[Option<NativeUav>],
    );

    // Output merger / rasterizer state
    fn om_set_render_targets(
        &self,
        rtvs: &[Option<NativeRtv>],
        dsv: Option<NativeDsv>,
    );
    fn om_set_blend_state(
        &self,
        state: Option<NativeBlendState>,
        blend_factor: [f32; 4],
        sample_mask: u32,
    );
    fn om_set_depth_stencil_state(
        &self,
        state: Option<NativeDepthStencilState>,
        stencil_ref: u32,
    );
    fn rs_set_state(
        &self,
        state: Option<NativeRasterizerState>,
    );
    fn rs_set_viewports(
        &self,
        viewports: &[D3D11_VIEWPORT],
    );
    fn rs_set_scissor_rects(
        &self,
        rects: &[D3D11_RECT],
    );

    // Draw/dispatch
    fn draw(
        &self,
        vertex_count: u32,
        start_vertex: u32,
    );
    fn draw_instanced(
        &self,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex: u32,
        start_instance: u32,
    );
    fn draw_indexed(
        &self,
        index_count: u32,
        start_index: u32,
        base_vertex: i32,
    );
    fn draw_indexed_instanced(
        &self,
        index_count_per_instance: u32,
        instance_count: u32,
        start_index: u32,
        base_vertex: i32,
        start_instance: u32,
    );
    fn draw_instanced_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    );
    fn draw_indexed_instanced_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    );
    fn dispatch(
        &self,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    );
    fn dispatch_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    );

    // Copies/updates
    fn copy_buffer_region(
        &self,
        dst: NativeBuffer,
        dst_offset: u64,
        src: NativeBuffer,
        src_offset: u64,
        size: u64,
    );
    fn copy_texture_region(
        &self,
        dst: NativeTexture,
        dst_subresource: u32,
        dst_offset: [u32; 3],
        src: NativeTexture,
        src_subresource: u32,
        src_box: Option<D3D11_BOX>,
    );
    fn update_subresource(
        &self,
        dst: NativeResource,
        dst_subresource: u32,
        data: &[u8],
    );

    // Clears
    fn clear_render_target_view(
        &self,
        view: NativeRtv,
        color: [f32; 4],
    );
    fn clear_depth_stencil_view(
        &self,
        view: NativeDsv,
        flags: u32,
        depth: f32,
        stencil: u8,
    );
    fn clear_unordered_access_view_float(
        &self,
        view: NativeUav,
        values: [f32; 4],
    );
    fn clear_unordered_access_view_uint(
        &self,
        view: NativeUav,
        values: [u32; 4],
    );

    // Mapping (immediate context only; callers hold the immediate-context lock)
    fn map(
        &self,
        resource: NativeResource,
        map_type: D3D11_MAP,
    ) -> OnyxResult<*mut u8>;
    fn unmap(
        &self,
        resource: NativeResource,
    );

    // Debug annotations
    fn begin_annotation(
        &self,
        name: &str,
    );
    fn end_annotation(&self);

    // Event queries (fences)
    fn end_event_query(
        &self,
        query: NativeQuery,
    );
    fn get_event_query_data(
        &self,
        query: NativeQuery,
    ) -> bool;

    fn flush(&self);
    fn clear_state(&self);

    // Deferred-context recording (deferred contexts only)
    fn finish_command_list(&self) -> OnyxResult<NativeCommandList>;
    fn execute_command_list(
        &self,
        list: NativeCommandList,
        restore_context_state: bool,
    );
}
