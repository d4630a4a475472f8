use super::*;
use crate::{OnyxBuffer, OnyxPipelineLayout, OnyxSampler, OnyxShader, OnyxShaderModule, OnyxTexture};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// General configuration that all APIs will make best effort to respect
#[derive(Default)]
pub struct OnyxApiDef {
    /// Used to enable/disable validation at runtime. Not all APIs allow this. Validation is
    /// helpful during development but very expensive. Applications should not ship with validation
    /// enabled.
    pub validation_mode: OnyxValidationMode,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxBufferElementData {
    // For structured buffers
    pub element_begin_index: u64,
    pub element_count: u64,
    pub element_stride: u64,
}

/// Used to create an `OnyxBuffer`
#[derive(Clone, Debug)]
pub struct OnyxBufferDef {
    pub size: u64,
    pub memory_usage: OnyxMemoryUsage,
    pub resource_type: OnyxResourceType,

    // Set to undefined unless this is a typed buffer
    pub format: OnyxFormat,

    // For structured buffers
    pub elements: OnyxBufferElementData,
}

impl Default for OnyxBufferDef {
    fn default() -> Self {
        OnyxBufferDef {
            size: 0,
            memory_usage: OnyxMemoryUsage::Unknown,
            resource_type: OnyxResourceType::UNDEFINED,
            format: OnyxFormat::UNDEFINED,
            elements: Default::default(),
        }
    }
}

impl OnyxBufferDef {
    pub fn verify(&self) {
        assert_ne!(self.size, 0);
    }

    pub fn for_staging_buffer(
        size: usize,
        resource_type: OnyxResourceType,
    ) -> OnyxBufferDef {
        OnyxBufferDef {
            size: size as u64,
            memory_usage: OnyxMemoryUsage::CpuToGpu,
            resource_type,
            format: OnyxFormat::UNDEFINED,
            elements: Default::default(),
        }
    }

    pub fn for_staging_buffer_data<T: Copy>(
        data: &[T],
        resource_type: OnyxResourceType,
    ) -> OnyxBufferDef {
        Self::for_staging_buffer(data.len() * std::mem::size_of::<T>(), resource_type)
    }
}

/// Determines how many dimensions the texture will have.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxTextureDimensions {
    /// Assume 2D if depth = 1, otherwise 3d
    Auto,
    Dim1D,
    Dim2D,
    Dim3D,
}

impl Default for OnyxTextureDimensions {
    fn default() -> Self {
        OnyxTextureDimensions::Auto
    }
}

impl OnyxTextureDimensions {
    pub fn determine_dimensions(
        self,
        extents: OnyxExtents3D,
    ) -> OnyxTextureDimensions {
        match self {
            OnyxTextureDimensions::Auto => {
                if extents.depth > 1 {
                    OnyxTextureDimensions::Dim3D
                } else {
                    OnyxTextureDimensions::Dim2D
                }
            }
            OnyxTextureDimensions::Dim1D => {
                assert_eq!(extents.height, 1);
                assert_eq!(extents.depth, 1);
                OnyxTextureDimensions::Dim1D
            }
            OnyxTextureDimensions::Dim2D => {
                assert_eq!(extents.depth, 1);
                OnyxTextureDimensions::Dim2D
            }
            OnyxTextureDimensions::Dim3D => OnyxTextureDimensions::Dim3D,
        }
    }
}

/// Used to create an `OnyxTexture`
#[derive(Clone, Debug)]
pub struct OnyxTextureDef {
    pub extents: OnyxExtents3D,
    pub array_length: u32,
    pub mip_count: u32,
    pub sample_count: OnyxSampleCount,
    pub format: OnyxFormat,
    pub resource_type: OnyxResourceType,
    pub dimensions: OnyxTextureDimensions,
}

impl Default for OnyxTextureDef {
    fn default() -> Self {
        OnyxTextureDef {
            extents: OnyxExtents3D {
                width: 0,
                height: 0,
                depth: 1,
            },
            array_length: 1,
            mip_count: 1,
            sample_count: OnyxSampleCount::SampleCount1,
            format: OnyxFormat::UNDEFINED,
            resource_type: OnyxResourceType::TEXTURE,
            dimensions: OnyxTextureDimensions::Auto,
        }
    }
}

impl OnyxTextureDef {
    pub fn verify(&self) {
        assert!(self.extents.width > 0);
        assert!(self.extents.height > 0);
        assert!(self.extents.depth > 0);
        assert!(self.array_length > 0);
        assert!(self.mip_count > 0);
        assert_ne!(self.format, OnyxFormat::UNDEFINED);
    }
}

/// Used to create an `OnyxSampler`
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxSamplerDef {
    pub min_filter: OnyxFilterType,
    pub mag_filter: OnyxFilterType,
    pub mip_map_mode: OnyxMipMapMode,
    pub address_mode_u: OnyxAddressMode,
    pub address_mode_v: OnyxAddressMode,
    pub address_mode_w: OnyxAddressMode,
    pub mip_lod_bias: f32,
    pub max_anisotropy: f32,
    pub compare_op: Option<OnyxCompareOp>,
}

/// Used to create an `OnyxCommandPool`
#[derive(Clone, Debug, Default)]
pub struct OnyxCommandPoolDef {
    /// Set to true if the command buffers allocated from the pool are expected to have short
    /// lifetimes
    pub transient: bool,
}

/// Used to create an `OnyxCommandBuffer`
#[derive(Clone, Debug, Default)]
pub struct OnyxCommandBufferDef {
    /// Force the software op-stream command buffer even when the driver supports real deferred
    /// command lists. Mostly useful for testing and for working around driver bugs.
    pub force_emulated: bool,
}

/// One contiguous span of descriptor slots within a descriptor set layout, sharing a descriptor
/// class and stage visibility.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxDescriptorRangeDef {
    /// First native register the range binds to
    pub base_slot: u32,
    pub descriptor_count: u32,
    pub class: OnyxDescriptorClass,
    pub stages: OnyxShaderStageFlags,
}

/// A constant buffer binding whose effective offset is supplied per-bind rather than baked into
/// the descriptor.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxDynamicConstantBufferDef {
    pub slot: u32,
    pub stages: OnyxShaderStageFlags,
}

/// One descriptor set slot of a pipeline layout
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxDescriptorSetLayoutDef {
    pub ranges: Vec<OnyxDescriptorRangeDef>,
    pub dynamic_constant_buffers: Vec<OnyxDynamicConstantBufferDef>,
}

/// A push constant block. Realized by the backend as a native constant buffer owned by the
/// pipeline layout and updated in place by `cmd_set_push_constants`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxPushConstantDef {
    pub slot: u32,
    pub size: u32,
    pub stages: OnyxShaderStageFlags,
}

/// Used to create an `OnyxPipelineLayout`
#[derive(Clone, Debug)]
pub struct OnyxPipelineLayoutDef {
    pub pipeline_type: OnyxPipelineType,
    pub descriptor_sets: Vec<OnyxDescriptorSetLayoutDef>,
    pub push_constants: Vec<OnyxPushConstantDef>,
}

/// Used to create an `OnyxDescriptorPool`
#[derive(Clone, Debug)]
pub struct OnyxDescriptorPoolDef {
    /// Total descriptors the pool's shared storage can hold across all sets allocated from it
    pub descriptor_capacity: u32,
}

/// Describes a single stage within a shader
#[derive(Clone, Debug)]
pub struct OnyxShaderStageDef {
    pub shader_module: OnyxShaderModule,
    pub entry_point: String,
    pub shader_stage: OnyxShaderStageFlags,
}

/// Owned, serializable shader bytecode. The bytecode is backend-specific (DXBC for the D3D11
/// backend).
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxShaderPackage {
    #[cfg_attr(feature = "serde-support", serde(with = "serde_bytes"))]
    pub bytecode: Vec<u8>,
}

/// Describes an attribute within an `OnyxVertexLayout`
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxVertexLayoutAttribute {
    pub format: OnyxFormat,
    /// Which buffer binding the attribute is read from
    pub buffer_index: u32,
    pub byte_offset: u32,
    /// The HLSL semantic name the input layout matches against
    pub semantic: String,
    pub semantic_index: u32,
}

/// Describes a buffer binding within an `OnyxVertexLayout`
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxVertexLayoutBuffer {
    pub stride: u32,
    pub rate: OnyxVertexAttributeRate,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxVertexLayout {
    pub attributes: Vec<OnyxVertexLayoutAttribute>,
    pub buffers: Vec<OnyxVertexLayoutBuffer>,
}

bitflags::bitflags! {
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct OnyxColorFlags: u8 {
        const RED = 1;
        const GREEN = 2;
        const BLUE = 4;
        const ALPHA = 8;
        const ALL = 0x0F;
    }
}

impl Default for OnyxColorFlags {
    fn default() -> Self {
        OnyxColorFlags::ALL
    }
}

/// Blend state for one render target
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxBlendStateRenderTarget {
    pub blend_enabled: bool,
    pub src_factor: OnyxBlendFactor,
    pub dst_factor: OnyxBlendFactor,
    pub blend_op: OnyxBlendOp,
    pub src_factor_alpha: OnyxBlendFactor,
    pub dst_factor_alpha: OnyxBlendFactor,
    pub blend_op_alpha: OnyxBlendOp,
    pub masks: OnyxColorFlags,
}

impl Default for OnyxBlendStateRenderTarget {
    fn default() -> Self {
        OnyxBlendStateRenderTarget {
            blend_enabled: false,
            src_factor: OnyxBlendFactor::One,
            dst_factor: OnyxBlendFactor::Zero,
            blend_op: OnyxBlendOp::Add,
            src_factor_alpha: OnyxBlendFactor::One,
            dst_factor_alpha: OnyxBlendFactor::Zero,
            blend_op_alpha: OnyxBlendOp::Add,
            masks: OnyxColorFlags::ALL,
        }
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxBlendState {
    /// Per-target blend state. If `independent_blend` is false, only the first entry is used for
    /// all targets.
    pub render_target_blend_states: Vec<OnyxBlendStateRenderTarget>,
    pub independent_blend: bool,
    pub alpha_to_coverage_enabled: bool,
    pub blend_constants: [f32; 4],
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxStencilOpState {
    pub fail_op: OnyxStencilOp,
    pub depth_fail_op: OnyxStencilOp,
    pub pass_op: OnyxStencilOp,
    pub compare_op: OnyxCompareOp,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxDepthState {
    pub depth_test_enable: bool,
    pub depth_write_enable: bool,
    pub depth_compare_op: OnyxCompareOp,
    pub stencil_test_enable: bool,
    pub stencil_read_mask: u8,
    pub stencil_write_mask: u8,
    pub front: OnyxStencilOpState,
    pub back: OnyxStencilOpState,
}

impl Default for OnyxDepthState {
    fn default() -> Self {
        OnyxDepthState {
            depth_test_enable: false,
            depth_write_enable: false,
            depth_compare_op: OnyxCompareOp::LessOrEqual,
            stencil_test_enable: false,
            stencil_read_mask: 0xFF,
            stencil_write_mask: 0xFF,
            front: Default::default(),
            back: Default::default(),
        }
    }
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxRasterizerState {
    pub fill_mode: OnyxFillMode,
    pub cull_mode: OnyxCullMode,
    pub front_face: OnyxFrontFace,
    pub depth_bias: i32,
    pub depth_bias_clamp: f32,
    pub slope_scaled_depth_bias: f32,
    pub depth_clip_enabled: bool,
    pub multisample_enabled: bool,
    /// D3D11 has no native rasterizer-discard flag. The backend approximates it by forcing an
    /// invalid scissor rect while a discard pipeline is bound; depth/stencil side effects may not
    /// match backends with real discard.
    pub rasterizer_discard_enabled: bool,
}

impl Default for OnyxRasterizerState {
    fn default() -> Self {
        OnyxRasterizerState {
            fill_mode: OnyxFillMode::Solid,
            cull_mode: OnyxCullMode::None,
            front_face: OnyxFrontFace::CounterClockwise,
            depth_bias: 0,
            depth_bias_clamp: 0.0,
            slope_scaled_depth_bias: 0.0,
            depth_clip_enabled: true,
            multisample_enabled: false,
            rasterizer_discard_enabled: false,
        }
    }
}

/// Used to create an `OnyxPipeline` targeting the graphics pipeline
#[derive(Clone, Debug)]
pub struct OnyxGraphicsPipelineDef<'a> {
    pub shader: &'a OnyxShader,
    pub pipeline_layout: &'a OnyxPipelineLayout,
    pub vertex_layout: &'a OnyxVertexLayout,
    pub blend_state: &'a OnyxBlendState,
    pub depth_state: &'a OnyxDepthState,
    pub rasterizer_state: &'a OnyxRasterizerState,
    pub primitive_topology: OnyxPrimitiveTopology,
    pub color_formats: &'a [OnyxFormat],
    pub depth_stencil_format: Option<OnyxFormat>,
    pub sample_count: OnyxSampleCount,
    pub sample_mask: u32,
}

/// Used to create an `OnyxPipeline` targeting the compute pipeline
#[derive(Clone, Debug)]
pub struct OnyxComputePipelineDef<'a> {
    pub shader: &'a OnyxShader,
    pub pipeline_layout: &'a OnyxPipelineLayout,
}

/// Which view a buffer descriptor resolves to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OnyxBufferViewKind {
    /// Read-only shader resource view
    ShaderResource,
    /// Read/write unordered access view
    Storage,
}

/// Which view a texture descriptor resolves to
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum OnyxTextureViewKind {
    ShaderResource,
    Storage,
}

/// Used to create a buffer descriptor
#[derive(Clone, Debug)]
pub struct OnyxBufferViewDef<'a> {
    pub buffer: &'a OnyxBuffer,
    pub kind: OnyxBufferViewKind,
    /// UNDEFINED for structured buffers
    pub format: OnyxFormat,
    pub element_offset: u64,
    pub element_count: u64,
}

/// Used to create a texture descriptor. The mip/layer window becomes the descriptor's
/// subresource identity, the key hazard tracking matches on.
#[derive(Clone, Debug)]
pub struct OnyxTextureViewDef<'a> {
    pub texture: &'a OnyxTexture,
    pub kind: OnyxTextureViewKind,
    pub mip_first: u8,
    pub mip_count: u8,
    pub layer_first: u16,
    pub layer_count: u16,
}

/// Used to create a constant buffer descriptor. `byte_offset` is baked into the descriptor; for
/// dynamic ranges an additional per-bind offset is added on top of it.
#[derive(Clone, Debug)]
pub struct OnyxConstantBufferViewDef<'a> {
    pub buffer: &'a OnyxBuffer,
    pub byte_offset: u64,
    pub byte_size: u64,
}

/// Used to create an `OnyxDescriptor`
#[derive(Clone, Debug)]
pub enum OnyxDescriptorDef<'a> {
    BufferView(OnyxBufferViewDef<'a>),
    TextureView(OnyxTextureViewDef<'a>),
    ConstantBufferView(OnyxConstantBufferViewDef<'a>),
    Sampler(&'a OnyxSampler),
}

#[derive(Clone, Debug)]
pub struct OnyxVertexBufferBinding<'a> {
    pub buffer: &'a OnyxBuffer,
    pub byte_offset: u64,
}

#[derive(Clone, Debug)]
pub struct OnyxIndexBufferBinding<'a> {
    pub buffer: &'a OnyxBuffer,
    pub byte_offset: u64,
    pub index_type: OnyxIndexType,
}

/// A resource transition. D3D11 tracks hazards internally, so barriers validate their arguments
/// and issue no native work; they exist so call sequences match backends with explicit barriers.
#[derive(Clone, Debug)]
pub struct OnyxBufferBarrier<'a> {
    pub buffer: &'a OnyxBuffer,
    pub src_state: OnyxResourceState,
    pub dst_state: OnyxResourceState,
}

#[derive(Clone, Debug)]
pub struct OnyxTextureBarrier<'a> {
    pub texture: &'a OnyxTexture,
    pub src_state: OnyxResourceState,
    pub dst_state: OnyxResourceState,
}
