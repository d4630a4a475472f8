use super::super::d3d11::*;
use super::native::*;
use crate::{
    OnyxAddressMode, OnyxBlendFactor, OnyxBlendOp, OnyxBlendState, OnyxCompareOp, OnyxCullMode,
    OnyxDepthState, OnyxFillMode, OnyxFilterType, OnyxFormat, OnyxIndexType, OnyxMemoryUsage,
    OnyxMipMapMode, OnyxPrimitiveTopology, OnyxRasterizerState, OnyxSamplerDef,
    OnyxShaderStageFlags, OnyxStencilOp,
};

impl Into<D3D11_COMPARISON_FUNC> for OnyxCompareOp {
    fn into(self) -> D3D11_COMPARISON_FUNC {
        match self {
            OnyxCompareOp::Never => D3D11_COMPARISON_NEVER,
            OnyxCompareOp::Less => D3D11_COMPARISON_LESS,
            OnyxCompareOp::Equal => D3D11_COMPARISON_EQUAL,
            OnyxCompareOp::LessOrEqual => D3D11_COMPARISON_LESS_EQUAL,
            OnyxCompareOp::Greater => D3D11_COMPARISON_GREATER,
            OnyxCompareOp::NotEqual => D3D11_COMPARISON_NOT_EQUAL,
            OnyxCompareOp::GreaterOrEqual => D3D11_COMPARISON_GREATER_EQUAL,
            OnyxCompareOp::Always => D3D11_COMPARISON_ALWAYS,
        }
    }
}

impl Into<D3D11_STENCIL_OP> for OnyxStencilOp {
    fn into(self) -> D3D11_STENCIL_OP {
        match self {
            OnyxStencilOp::Keep => D3D11_STENCIL_OP_KEEP,
            OnyxStencilOp::Zero => D3D11_STENCIL_OP_ZERO,
            OnyxStencilOp::Replace => D3D11_STENCIL_OP_REPLACE,
            OnyxStencilOp::IncrementAndClamp => D3D11_STENCIL_OP_INCR_SAT,
            OnyxStencilOp::DecrementAndClamp => D3D11_STENCIL_OP_DECR_SAT,
            OnyxStencilOp::Invert => D3D11_STENCIL_OP_INVERT,
            OnyxStencilOp::IncrementAndWrap => D3D11_STENCIL_OP_INCR,
            OnyxStencilOp::DecrementAndWrap => D3D11_STENCIL_OP_DECR,
        }
    }
}

impl Into<D3D11_BLEND> for OnyxBlendFactor {
    fn into(self) -> D3D11_BLEND {
        match self {
            OnyxBlendFactor::Zero => D3D11_BLEND_ZERO,
            OnyxBlendFactor::One => D3D11_BLEND_ONE,
            OnyxBlendFactor::SrcColor => D3D11_BLEND_SRC_COLOR,
            OnyxBlendFactor::OneMinusSrcColor => D3D11_BLEND_INV_SRC_COLOR,
            OnyxBlendFactor::DstColor => D3D11_BLEND_DEST_COLOR,
            OnyxBlendFactor::OneMinusDstColor => D3D11_BLEND_INV_DEST_COLOR,
            OnyxBlendFactor::SrcAlpha => D3D11_BLEND_SRC_ALPHA,
            OnyxBlendFactor::OneMinusSrcAlpha => D3D11_BLEND_INV_SRC_ALPHA,
            OnyxBlendFactor::DstAlpha => D3D11_BLEND_DEST_ALPHA,
            OnyxBlendFactor::OneMinusDstAlpha => D3D11_BLEND_INV_DEST_ALPHA,
            OnyxBlendFactor::SrcAlphaSaturate => D3D11_BLEND_SRC_ALPHA_SAT,
            OnyxBlendFactor::ConstantColor => D3D11_BLEND_BLEND_FACTOR,
            OnyxBlendFactor::OneMinusConstantColor => D3D11_BLEND_INV_BLEND_FACTOR,
        }
    }
}

impl Into<D3D11_BLEND_OP> for OnyxBlendOp {
    fn into(self) -> D3D11_BLEND_OP {
        match self {
            OnyxBlendOp::Add => D3D11_BLEND_OP_ADD,
            OnyxBlendOp::Subtract => D3D11_BLEND_OP_SUBTRACT,
            OnyxBlendOp::ReverseSubtract => D3D11_BLEND_OP_REV_SUBTRACT,
            OnyxBlendOp::Min => D3D11_BLEND_OP_MIN,
            OnyxBlendOp::Max => D3D11_BLEND_OP_MAX,
        }
    }
}

impl Into<D3D11_CULL_MODE> for OnyxCullMode {
    fn into(self) -> D3D11_CULL_MODE {
        match self {
            OnyxCullMode::None => D3D11_CULL_NONE,
            OnyxCullMode::Front => D3D11_CULL_FRONT,
            OnyxCullMode::Back => D3D11_CULL_BACK,
        }
    }
}

impl Into<D3D11_FILL_MODE> for OnyxFillMode {
    fn into(self) -> D3D11_FILL_MODE {
        match self {
            OnyxFillMode::Solid => D3D11_FILL_SOLID,
            OnyxFillMode::Wireframe => D3D11_FILL_WIREFRAME,
        }
    }
}

impl Into<D3D11_TEXTURE_ADDRESS_MODE> for OnyxAddressMode {
    fn into(self) -> D3D11_TEXTURE_ADDRESS_MODE {
        match self {
            OnyxAddressMode::Mirror => D3D11_TEXTURE_ADDRESS_MIRROR,
            OnyxAddressMode::Repeat => D3D11_TEXTURE_ADDRESS_WRAP,
            OnyxAddressMode::ClampToEdge => D3D11_TEXTURE_ADDRESS_CLAMP,
            OnyxAddressMode::ClampToBorder => D3D11_TEXTURE_ADDRESS_BORDER,
        }
    }
}

impl Into<D3D_PRIMITIVE_TOPOLOGY> for OnyxPrimitiveTopology {
    fn into(self) -> D3D_PRIMITIVE_TOPOLOGY {
        match self {
            OnyxPrimitiveTopology::PointList => D3D_PRIMITIVE_TOPOLOGY_POINTLIST,
            OnyxPrimitiveTopology::LineList => D3D_PRIMITIVE_TOPOLOGY_LINELIST,
            OnyxPrimitiveTopology::LineStrip => D3D_PRIMITIVE_TOPOLOGY_LINESTRIP,
            OnyxPrimitiveTopology::TriangleList => D3D_PRIMITIVE_TOPOLOGY_TRIANGLELIST,
            OnyxPrimitiveTopology::TriangleStrip => D3D_PRIMITIVE_TOPOLOGY_TRIANGLESTRIP,
            OnyxPrimitiveTopology::PatchList {
                control_point_count,
            } => {
                assert!(control_point_count >= 1 && control_point_count <= 32);
                D3D_PRIMITIVE_TOPOLOGY(
                    D3D_PRIMITIVE_TOPOLOGY_1_CONTROL_POINT_PATCHLIST.0
                        + (control_point_count as u32 - 1),
                )
            }
        }
    }
}

impl Into<DXGI_FORMAT> for OnyxFormat {
    fn into(self) -> DXGI_FORMAT {
        match self {
            OnyxFormat::UNDEFINED => DXGI_FORMAT_UNKNOWN,
            OnyxFormat::R8_UNORM => DXGI_FORMAT_R8_UNORM,
            OnyxFormat::R8_UINT => DXGI_FORMAT_R8_UINT,
            OnyxFormat::R8G8B8A8_UNORM => DXGI_FORMAT_R8G8B8A8_UNORM,
            OnyxFormat::R8G8B8A8_SRGB => DXGI_FORMAT_R8G8B8A8_UNORM_SRGB,
            OnyxFormat::R8G8B8A8_UINT => DXGI_FORMAT_R8G8B8A8_UINT,
            OnyxFormat::B8G8R8A8_UNORM => DXGI_FORMAT_B8G8R8A8_UNORM,
            OnyxFormat::B8G8R8A8_SRGB => DXGI_FORMAT_B8G8R8A8_UNORM_SRGB,
            OnyxFormat::R10G10B10A2_UNORM => DXGI_FORMAT_R10G10B10A2_UNORM,
            OnyxFormat::R11G11B10_FLOAT => DXGI_FORMAT_R11G11B10_FLOAT,
            OnyxFormat::R16_FLOAT => DXGI_FORMAT_R16_FLOAT,
            OnyxFormat::R16_UINT => DXGI_FORMAT_R16_UINT,
            OnyxFormat::R16G16_FLOAT => DXGI_FORMAT_R16G16_FLOAT,
            OnyxFormat::R16G16B16A16_FLOAT => DXGI_FORMAT_R16G16B16A16_FLOAT,
            OnyxFormat::R16G16B16A16_UINT => DXGI_FORMAT_R16G16B16A16_UINT,
            OnyxFormat::R32_FLOAT => DXGI_FORMAT_R32_FLOAT,
            OnyxFormat::R32_UINT => DXGI_FORMAT_R32_UINT,
            OnyxFormat::R32_SINT => DXGI_FORMAT_R32_SINT,
            OnyxFormat::R32G32_FLOAT => DXGI_FORMAT_R32G32_FLOAT,
            OnyxFormat::R32G32B32_FLOAT => DXGI_FORMAT_R32G32B32_FLOAT,
            OnyxFormat::R32G32B32A32_FLOAT => DXGI_FORMAT_R32G32B32A32_FLOAT,
            OnyxFormat::R32G32B32A32_UINT => DXGI_FORMAT_R32G32B32A32_UINT,
            OnyxFormat::D16_UNORM => DXGI_FORMAT_D16_UNORM,
            OnyxFormat::D24_UNORM_S8_UINT => DXGI_FORMAT_D24_UNORM_S8_UINT,
            OnyxFormat::D32_FLOAT => DXGI_FORMAT_D32_FLOAT,
            OnyxFormat::BC1_UNORM => DXGI_FORMAT_BC1_UNORM,
            OnyxFormat::BC3_UNORM => DXGI_FORMAT_BC3_UNORM,
            OnyxFormat::BC7_UNORM => DXGI_FORMAT_BC7_UNORM,
        }
    }
}

impl Into<DXGI_FORMAT> for OnyxIndexType {
    fn into(self) -> DXGI_FORMAT {
        match self {
            OnyxIndexType::Uint32 => DXGI_FORMAT_R32_UINT,
            OnyxIndexType::Uint16 => DXGI_FORMAT_R16_UINT,
        }
    }
}

pub(crate) fn stage_flag(stage: Dx11ShaderStage) -> OnyxShaderStageFlags {
    match stage {
        Dx11ShaderStage::Vertex => OnyxShaderStageFlags::VERTEX,
        Dx11ShaderStage::Hull => OnyxShaderStageFlags::TESSELLATION_CONTROL,
        Dx11ShaderStage::Domain => OnyxShaderStageFlags::TESSELLATION_EVALUATION,
        Dx11ShaderStage::Geometry => OnyxShaderStageFlags::GEOMETRY,
        Dx11ShaderStage::Pixel => OnyxShaderStageFlags::FRAGMENT,
        Dx11ShaderStage::Compute => OnyxShaderStageFlags::COMPUTE,
    }
}

/// The native filter value is bit-encoded from the min/mag/mip selections
pub(crate) fn filter(
    min_filter: OnyxFilterType,
    mag_filter: OnyxFilterType,
    mip_map_mode: OnyxMipMapMode,
    max_anisotropy: f32,
    comparison: bool,
) -> D3D11_FILTER {
    let mut bits = 0;
    if max_anisotropy > 1.0 {
        bits |= D3D11_FILTER_ANISOTROPIC_BIT | 0x15;
    } else {
        if min_filter == OnyxFilterType::Linear {
            bits |= 0x10;
        }
        if mag_filter == OnyxFilterType::Linear {
            bits |= 0x4;
        }
        if mip_map_mode == OnyxMipMapMode::Linear {
            bits |= 0x1;
        }
    }
    if comparison {
        bits |= D3D11_FILTER_COMPARISON_BIT;
    }
    D3D11_FILTER(bits)
}

/// The native `{usage, CPU-access}` pair derived from the abstract memory usage
pub(crate) fn memory_usage(usage: OnyxMemoryUsage) -> (D3D11_USAGE, u32) {
    match usage {
        OnyxMemoryUsage::Unknown | OnyxMemoryUsage::GpuOnly => (D3D11_USAGE_DEFAULT, 0),
        OnyxMemoryUsage::CpuOnly => (
            D3D11_USAGE_STAGING,
            D3D11_CPU_ACCESS_READ | D3D11_CPU_ACCESS_WRITE,
        ),
        OnyxMemoryUsage::CpuToGpu => (D3D11_USAGE_DYNAMIC, D3D11_CPU_ACCESS_WRITE),
        OnyxMemoryUsage::GpuToCpu => (D3D11_USAGE_STAGING, D3D11_CPU_ACCESS_READ),
    }
}

/// Maps the externally supplied residency priority (-1.0 lowest .. 1.0 highest) onto the small
/// native eviction priority enum.
pub(crate) fn eviction_priority(priority: f32) -> u32 {
    // DXGI_RESOURCE_PRIORITY_* values
    const MINIMUM: u32 = 0x28000000;
    const LOW: u32 = 0x50000000;
    const NORMAL: u32 = 0x78000000;
    const HIGH: u32 = 0xa0000000;
    const MAXIMUM: u32 = 0xc8000000;

    if priority < -0.6 {
        MINIMUM
    } else if priority < -0.2 {
        LOW
    } else if priority <= 0.2 {
        NORMAL
    } else if priority <= 0.6 {
        HIGH
    } else {
        MAXIMUM
    }
}

pub(crate) fn rasterizer_desc(state: &OnyxRasterizerState) -> Dx11RasterizerDesc {
    Dx11RasterizerDesc {
        fill_mode: state.fill_mode.into(),
        cull_mode: state.cull_mode.into(),
        front_counter_clockwise: state.front_face == crate::OnyxFrontFace::CounterClockwise,
        depth_bias: state.depth_bias,
        depth_bias_clamp: state.depth_bias_clamp,
        slope_scaled_depth_bias: state.slope_scaled_depth_bias,
        depth_clip_enable: state.depth_clip_enabled,
        // Always on: rasterizer discard is emulated by forcing an invalid scissor rect
        scissor_enable: true,
        multisample_enable: state.multisample_enabled,
        antialiased_line_enable: false,
    }
}

pub(crate) fn blend_desc(state: &OnyxBlendState) -> Dx11BlendDesc {
    let mut render_target = [Dx11RenderTargetBlendDesc::default(); 8];
    for (i, rt) in render_target.iter_mut().enumerate() {
        let src = if state.independent_blend {
            state.render_target_blend_states.get(i)
        } else {
            state.render_target_blend_states.first()
        };

        if let Some(src) = src {
            rt.blend_enable = src.blend_enabled;
            rt.src_blend = src.src_factor.into();
            rt.dest_blend = src.dst_factor.into();
            rt.blend_op = src.blend_op.into();
            rt.src_blend_alpha = src.src_factor_alpha.into();
            rt.dest_blend_alpha = src.dst_factor_alpha.into();
            rt.blend_op_alpha = src.blend_op_alpha.into();
            rt.render_target_write_mask = src.masks.bits();
        }
    }

    Dx11BlendDesc {
        alpha_to_coverage_enable: state.alpha_to_coverage_enabled,
        independent_blend_enable: state.independent_blend,
        render_target,
    }
}

pub(crate) fn depth_stencil_desc(state: &OnyxDepthState) -> Dx11DepthStencilDesc {
    Dx11DepthStencilDesc {
        depth_enable: state.depth_test_enable,
        depth_write_enable: state.depth_write_enable,
        depth_func: state.depth_compare_op.into(),
        stencil_enable: state.stencil_test_enable,
        stencil_read_mask: state.stencil_read_mask,
        stencil_write_mask: state.stencil_write_mask,
        front_face: Dx11DepthStencilOpDesc {
            fail_op: state.front.fail_op.into(),
            depth_fail_op: state.front.depth_fail_op.into(),
            pass_op: state.front.pass_op.into(),
            func: state.front.compare_op.into(),
        },
        back_face: Dx11DepthStencilOpDesc {
            fail_op: state.back.fail_op.into(),
            depth_fail_op: state.back.depth_fail_op.into(),
            pass_op: state.back.pass_op.into(),
            func: state.back.compare_op.into(),
        },
    }
}

pub(crate) fn sampler_desc(def: &OnyxSamplerDef) -> Dx11SamplerDesc {
    Dx11SamplerDesc {
        filter: filter(
            def.min_filter,
            def.mag_filter,
            def.mip_map_mode,
            def.max_anisotropy,
            def.compare_op.is_some(),
        ),
        address_u: def.address_mode_u.into(),
        address_v: def.address_mode_v.into(),
        address_w: def.address_mode_w.into(),
        mip_lod_bias: def.mip_lod_bias,
        max_anisotropy: if def.max_anisotropy > 1.0 {
            def.max_anisotropy as u32
        } else {
            1
        },
        comparison_func: def.compare_op.unwrap_or(crate::OnyxCompareOp::Never).into(),
        border_color: [0.0; 4],
        min_lod: 0.0,
        max_lod: f32::MAX,
    }
}
