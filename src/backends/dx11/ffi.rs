//! Thin forwarding layer between the backend's native-surface traits and the real D3D11 COM
//! interfaces. Every function here is a mechanical translation of trait arguments into the
//! corresponding vtable call; no binding or hazard decisions live at this level.

#![allow(clippy::missing_safety_doc)]

use crate::{OnyxError, OnyxResult, OnyxSamplePosition};
use std::ffi::CString;
use std::ptr;
use std::sync::Arc;

use winapi::shared::dxgi::IDXGIResource;
use winapi::shared::winerror::SUCCEEDED;
use winapi::um::d3d11 as sys;
use winapi::um::d3d11_1 as sys1;
use winapi::um::d3dcommon;
use winapi::um::unknwnbase::IUnknown;
use winapi::Interface;

use super::d3d11::*;
use super::internal::native::*;

fn check(
    call: &'static str,
    hr: i32,
) -> OnyxResult<()> {
    if SUCCEEDED(hr) {
        Ok(())
    } else {
        log::error!("{} failed with {:#x}", call, hr);
        Err(OnyxError::NativeCallFailed { call, result: hr })
    }
}

unsafe fn release(object_id: u64) {
    if object_id != 0 {
        (*(object_id as *mut IUnknown)).Release();
    }
}

fn to_wide(name: &str) -> Vec<u16> {
    name.encode_utf16().chain(std::iter::once(0)).collect()
}

/// `Dx11DeviceOps` over a real `ID3D11Device`
pub(crate) struct FfiDevice {
    device: *mut sys::ID3D11Device,
    feature_level: D3D_FEATURE_LEVEL,
    command_list_support: bool,
    immediate: Arc<FfiContext>,
}

// The D3D11 device is internally synchronized; the immediate context is guarded by the device
// context's critical section discipline
unsafe impl Send for FfiDevice {}
unsafe impl Sync for FfiDevice {}

impl std::fmt::Debug for FfiDevice {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("FfiDevice")
            .field("feature_level", &self.feature_level)
            .finish()
    }
}

impl Drop for FfiDevice {
    fn drop(&mut self) {
        unsafe { release(self.device as u64) };
    }
}

impl FfiDevice {
    /// Create a hardware device on the default adapter
    pub unsafe fn new() -> OnyxResult<Arc<FfiDevice>> {
        let feature_levels = [
            d3dcommon::D3D_FEATURE_LEVEL_11_1,
            d3dcommon::D3D_FEATURE_LEVEL_11_0,
        ];

        let mut device: *mut sys::ID3D11Device = ptr::null_mut();
        let mut context: *mut sys::ID3D11DeviceContext = ptr::null_mut();
        let mut chosen_level = 0;

        let mut hr = sys::D3D11CreateDevice(
            ptr::null_mut(),
            d3dcommon::D3D_DRIVER_TYPE_HARDWARE,
            ptr::null_mut(),
            0,
            feature_levels.as_ptr(),
            feature_levels.len() as u32,
            sys::D3D11_SDK_VERSION,
            &mut device,
            &mut chosen_level,
            &mut context,
        );
        if !SUCCEEDED(hr) {
            // Drivers without 11.1 reject the level array; retry with 11.0 alone
            hr = sys::D3D11CreateDevice(
                ptr::null_mut(),
                d3dcommon::D3D_DRIVER_TYPE_HARDWARE,
                ptr::null_mut(),
                0,
                feature_levels[1..].as_ptr(),
                1,
                sys::D3D11_SDK_VERSION,
                &mut device,
                &mut chosen_level,
                &mut context,
            );
        }
        check("D3D11CreateDevice", hr)?;

        let mut threading = sys::D3D11_FEATURE_DATA_THREADING {
            DriverConcurrentCreates: 0,
            DriverCommandLists: 0,
        };
        let hr = (*device).CheckFeatureSupport(
            sys::D3D11_FEATURE_THREADING,
            &mut threading as *mut _ as *mut _,
            std::mem::size_of::<sys::D3D11_FEATURE_DATA_THREADING>() as u32,
        );
        let command_list_support = SUCCEEDED(hr) && threading.DriverCommandLists != 0;

        Ok(Arc::new(FfiDevice {
            device,
            feature_level: D3D_FEATURE_LEVEL(chosen_level as u32),
            command_list_support,
            immediate: Arc::new(FfiContext::new(context)),
        }))
    }

    unsafe fn dxgi_resource(
        &self,
        resource: NativeResource,
    ) -> Option<*mut IDXGIResource> {
        let mut dxgi: *mut IDXGIResource = ptr::null_mut();
        let hr = (*(resource.0 as *mut IUnknown)).QueryInterface(
            &IDXGIResource::uuidof(),
            &mut dxgi as *mut _ as *mut _,
        );
        if SUCCEEDED(hr) {
            Some(dxgi)
        } else {
            None
        }
    }
}

fn buffer_desc(desc: &D3D11_BUFFER_DESC) -> sys::D3D11_BUFFER_DESC {
    sys::D3D11_BUFFER_DESC {
        ByteWidth: desc.ByteWidth,
        Usage: desc.Usage.0,
        BindFlags: desc.BindFlags,
        CPUAccessFlags: desc.CPUAccessFlags,
        MiscFlags: desc.MiscFlags,
        StructureByteStride: desc.StructureByteStride,
    }
}

impl Dx11DeviceOps for FfiDevice {
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
        unsafe {
            let mut context: *mut sys::ID3D11DeviceContext = ptr::null_mut();
            check(
                "ID3D11Device::CreateDeferredContext",
                (*self.device).CreateDeferredContext(0, &mut context),
            )?;
            Ok(Arc::new(FfiContext::new(context)))
        }
    }

    fn create_buffer(
        &self,
        desc: &D3D11_BUFFER_DESC,
        initial_data: Option<&[u8]>,
    ) -> OnyxResult<NativeBuffer> {
        unsafe {
            let native_desc = buffer_desc(desc);
            let initial = initial_data.map(|data| sys::D3D11_SUBRESOURCE_DATA {
                pSysMem: data.as_ptr() as *const _,
                SysMemPitch: 0,
                SysMemSlicePitch: 0,
            });

            let mut buffer: *mut sys::ID3D11Buffer = ptr::null_mut();
            check(
                "ID3D11Device::CreateBuffer",
                (*self.device).CreateBuffer(
                    &native_desc,
                    initial.as_ref().map_or(ptr::null(), |i| i),
                    &mut buffer,
                ),
            )?;
            Ok(NativeBuffer(buffer as u64))
        }
    }

    fn create_texture(
        &self,
        desc: &Dx11TextureDesc,
    ) -> OnyxResult<NativeTexture> {
        unsafe {
            match desc.dimension {
                Dx11TextureDimension::Dim1D => {
                    let native_desc = sys::D3D11_TEXTURE1D_DESC {
                        Width: desc.width,
                        MipLevels: desc.mip_levels,
                        ArraySize: desc.array_size,
                        Format: desc.format.0,
                        Usage: desc.usage.0,
                        BindFlags: desc.bind_flags,
                        CPUAccessFlags: desc.cpu_access_flags,
                        MiscFlags: desc.misc_flags,
                    };
                    let mut texture: *mut sys::ID3D11Texture1D = ptr::null_mut();
                    check(
                        "ID3D11Device::CreateTexture1D",
                        (*self.device).CreateTexture1D(&native_desc, ptr::null(), &mut texture),
                    )?;
                    Ok(NativeTexture(texture as u64))
                }
                Dx11TextureDimension::Dim2D => {
                    let native_desc = sys::D3D11_TEXTURE2D_DESC {
                        Width: desc.width,
                        Height: desc.height,
                        MipLevels: desc.mip_levels,
                        ArraySize: desc.array_size,
                        Format: desc.format.0,
                        SampleDesc: winapi::shared::dxgitype::DXGI_SAMPLE_DESC {
                            Count: desc.sample_count,
                            Quality: 0,
                        },
                        Usage: desc.usage.0,
                        BindFlags: desc.bind_flags,
                        CPUAccessFlags: desc.cpu_access_flags,
                        MiscFlags: desc.misc_flags,
                    };
                    let mut texture: *mut sys::ID3D11Texture2D = ptr::null_mut();
                    check(
                        "ID3D11Device::CreateTexture2D",
                        (*self.device).CreateTexture2D(&native_desc, ptr::null(), &mut texture),
                    )?;
                    Ok(NativeTexture(texture as u64))
                }
                Dx11TextureDimension::Dim3D => {
                    let native_desc = sys::D3D11_TEXTURE3D_DESC {
                        Width: desc.width,
                        Height: desc.height,
                        Depth: desc.depth,
                        MipLevels: desc.mip_levels,
                        Format: desc.format.0,
                        Usage: desc.usage.0,
                        BindFlags: desc.bind_flags,
                        CPUAccessFlags: desc.cpu_access_flags,
                        MiscFlags: desc.misc_flags,
                    };
                    let mut texture: *mut sys::ID3D11Texture3D = ptr::null_mut();
                    check(
                        "ID3D11Device::CreateTexture3D",
                        (*self.device).CreateTexture3D(&native_desc, ptr::null(), &mut texture),
                    )?;
                    Ok(NativeTexture(texture as u64))
                }
            }
        }
    }

    fn create_shader_resource_view(
        &self,
        resource: NativeResource,
        desc: &Dx11SrvDesc,
    ) -> OnyxResult<NativeSrv> {
        unsafe {
            let mut native_desc: sys::D3D11_SHADER_RESOURCE_VIEW_DESC = std::mem::zeroed();

            match desc {
                Dx11SrvDesc::Buffer {
                    format,
                    first_element,
                    num_elements,
                    ..
                } => {
                    native_desc.Format = format.0;
                    native_desc.ViewDimension = d3dcommon::D3D11_SRV_DIMENSION_BUFFER;
                    let buffer = native_desc.u.Buffer_mut();
                    *buffer.u1.FirstElement_mut() = *first_element as u32;
                    *buffer.u2.NumElements_mut() = *num_elements as u32;
                }
                Dx11SrvDesc::Texture {
                    format,
                    dimension,
                    mip_first,
                    mip_count,
                    layer_first,
                    layer_count,
                } => {
                    native_desc.Format = format.0;
                    match dimension {
                        Dx11TextureDimension::Dim1D => {
                            native_desc.ViewDimension =
                                d3dcommon::D3D11_SRV_DIMENSION_TEXTURE1DARRAY;
                            let view = native_desc.u.Texture1DArray_mut();
                            view.MostDetailedMip = *mip_first;
                            view.MipLevels = *mip_count;
                            view.FirstArraySlice = *layer_first;
                            view.ArraySize = *layer_count;
                        }
                        Dx11TextureDimension::Dim2D => {
                            native_desc.ViewDimension =
                                d3dcommon::D3D11_SRV_DIMENSION_TEXTURE2DARRAY;
                            let view = native_desc.u.Texture2DArray_mut();
                            view.MostDetailedMip = *mip_first;
                            view.MipLevels = *mip_count;
                            view.FirstArraySlice = *layer_first;
                            view.ArraySize = *layer_count;
                        }
                        Dx11TextureDimension::Dim3D => {
                            native_desc.ViewDimension = d3dcommon::D3D11_SRV_DIMENSION_TEXTURE3D;
                            let view = native_desc.u.Texture3D_mut();
                            view.MostDetailedMip = *mip_first;
                            view.MipLevels = *mip_count;
                        }
                    }
                }
            }

            let mut view: *mut sys::ID3D11ShaderResourceView = ptr::null_mut();
            check(
                "ID3D11Device::CreateShaderResourceView",
                (*self.device).CreateShaderResourceView(
                    resource.0 as *mut sys::ID3D11Resource,
                    &native_desc,
                    &mut view,
                ),
            )?;
            Ok(NativeSrv(view as u64))
        }
    }

    fn create_unordered_access_view(
        &self,
        resource: NativeResource,
        desc: &Dx11UavDesc,
    ) -> OnyxResult<NativeUav> {
        unsafe {
            let mut native_desc: sys::D3D11_UNORDERED_ACCESS_VIEW_DESC = std::mem::zeroed();

            match desc {
                Dx11UavDesc::Buffer {
                    format,
                    first_element,
                    num_elements,
                    ..
                } => {
                    native_desc.Format = format.0;
                    native_desc.ViewDimension = sys::D3D11_UAV_DIMENSION_BUFFER;
                    let buffer = native_desc.u.Buffer_mut();
                    buffer.FirstElement = *first_element as u32;
                    buffer.NumElements = *num_elements as u32;
                    buffer.Flags = 0;
                }
                Dx11UavDesc::Texture {
                    format,
                    dimension,
                    mip_slice,
                    layer_first,
                    layer_count,
                } => {
                    native_desc.Format = format.0;
                    match dimension {
                        Dx11TextureDimension::Dim1D => {
                            native_desc.ViewDimension = sys::D3D11_UAV_DIMENSION_TEXTURE1DARRAY;
                            let view = native_desc.u.Texture1DArray_mut();
                            view.MipSlice = *mip_slice;
                            view.FirstArraySlice = *layer_first;
                            view.ArraySize = *layer_count;
                        }
                        Dx11TextureDimension::Dim2D => {
                            native_desc.ViewDimension = sys::D3D11_UAV_DIMENSION_TEXTURE2DARRAY;
                            let view = native_desc.u.Texture2DArray_mut();
                            view.MipSlice = *mip_slice;
                            view.FirstArraySlice = *layer_first;
                            view.ArraySize = *layer_count;
                        }
                        Dx11TextureDimension::Dim3D => {
                            native_desc.ViewDimension = sys::D3D11_UAV_DIMENSION_TEXTURE3D;
                            let view = native_desc.u.Texture3D_mut();
                            view.MipSlice = *mip_slice;
                            view.FirstWSlice = *layer_first;
                            view.WSize = *layer_count;
                        }
                    }
                }
            }

            let mut view: *mut sys::ID3D11UnorderedAccessView = ptr::null_mut();
            check(
                "ID3D11Device::CreateUnorderedAccessView",
                (*self.device).CreateUnorderedAccessView(
                    resource.0 as *mut sys::ID3D11Resource,
                    &native_desc,
                    &mut view,
                ),
            )?;
            Ok(NativeUav(view as u64))
        }
    }

    fn create_render_target_view(
        &self,
        resource: NativeResource,
        desc: &Dx11RtvDesc,
    ) -> OnyxResult<NativeRtv> {
        unsafe {
            let mut native_desc: sys::D3D11_RENDER_TARGET_VIEW_DESC = std::mem::zeroed();
            native_desc.Format = desc.format.0;
            native_desc.ViewDimension = sys::D3D11_RTV_DIMENSION_TEXTURE2DARRAY;
            let view = native_desc.u.Texture2DArray_mut();
            view.MipSlice = desc.mip_slice;
            view.FirstArraySlice = desc.layer_first;
            view.ArraySize = desc.layer_count;

            let mut rtv: *mut sys::ID3D11RenderTargetView = ptr::null_mut();
            check(
                "ID3D11Device::CreateRenderTargetView",
                (*self.device).CreateRenderTargetView(
                    resource.0 as *mut sys::ID3D11Resource,
                    &native_desc,
                    &mut rtv,
                ),
            )?;
            Ok(NativeRtv(rtv as u64))
        }
    }

    fn create_depth_stencil_view(
        &self,
        resource: NativeResource,
        desc: &Dx11DsvDesc,
    ) -> OnyxResult<NativeDsv> {
        unsafe {
            let mut native_desc: sys::D3D11_DEPTH_STENCIL_VIEW_DESC = std::mem::zeroed();
            native_desc.Format = desc.format.0;
            native_desc.ViewDimension = sys::D3D11_DSV_DIMENSION_TEXTURE2DARRAY;
            let view = native_desc.u.Texture2DArray_mut();
            view.MipSlice = desc.mip_slice;
            view.FirstArraySlice = desc.layer_first;
            view.ArraySize = desc.layer_count;

            let mut dsv: *mut sys::ID3D11DepthStencilView = ptr::null_mut();
            check(
                "ID3D11Device::CreateDepthStencilView",
                (*self.device).CreateDepthStencilView(
                    resource.0 as *mut sys::ID3D11Resource,
                    &native_desc,
                    &mut dsv,
                ),
            )?;
            Ok(NativeDsv(dsv as u64))
        }
    }

    fn create_sampler_state(
        &self,
        desc: &Dx11SamplerDesc,
    ) -> OnyxResult<NativeSampler> {
        unsafe {
            let native_desc = sys::D3D11_SAMPLER_DESC {
                Filter: desc.filter.0,
                AddressU: desc.address_u.0,
                AddressV: desc.address_v.0,
                AddressW: desc.address_w.0,
                MipLODBias: desc.mip_lod_bias,
                MaxAnisotropy: desc.max_anisotropy,
                ComparisonFunc: desc.comparison_func.0,
                BorderColor: desc.border_color,
                MinLOD: desc.min_lod,
                MaxLOD: desc.max_lod,
            };

            let mut sampler: *mut sys::ID3D11SamplerState = ptr::null_mut();
            check(
                "ID3D11Device::CreateSamplerState",
                (*self.device).CreateSamplerState(&native_desc, &mut sampler),
            )?;
            Ok(NativeSampler(sampler as u64))
        }
    }

    fn create_input_layout(
        &self,
        elements: &[Dx11InputElementDesc],
        vertex_shader_bytecode: &[u8],
    ) -> OnyxResult<NativeInputLayout> {
        unsafe {
            let mut semantic_names = Vec::with_capacity(elements.len());
            for element in elements {
                semantic_names.push(CString::new(element.semantic_name.as_str()).map_err(
                    |_| {
                        OnyxError::InvalidArgument(
                            "vertex semantic name contains a NUL byte".to_string(),
                        )
                    },
                )?);
            }

            let native_elements: Vec<sys::D3D11_INPUT_ELEMENT_DESC> = elements
                .iter()
                .zip(&semantic_names)
                .map(|(e, name)| sys::D3D11_INPUT_ELEMENT_DESC {
                    SemanticName: name.as_ptr(),
                    SemanticIndex: e.semantic_index,
                    Format: e.format.0,
                    InputSlot: e.input_slot,
                    AlignedByteOffset: e.aligned_byte_offset,
                    InputSlotClass: if e.per_instance {
                        sys::D3D11_INPUT_PER_INSTANCE_DATA
                    } else {
                        sys::D3D11_INPUT_PER_VERTEX_DATA
                    },
                    InstanceDataStepRate: e.instance_data_step_rate,
                })
                .collect();

            let mut layout: *mut sys::ID3D11InputLayout = ptr::null_mut();
            check(
                "ID3D11Device::CreateInputLayout",
                (*self.device).CreateInputLayout(
                    native_elements.as_ptr(),
                    native_elements.len() as u32,
                    vertex_shader_bytecode.as_ptr() as *const _,
                    vertex_shader_bytecode.len(),
                    &mut layout,
                ),
            )?;
            Ok(NativeInputLayout(layout as u64))
        }
    }

    fn create_rasterizer_state(
        &self,
        desc: &Dx11RasterizerDesc,
        sample_positions: &[OnyxSamplePosition],
    ) -> OnyxResult<NativeRasterizerState> {
        if !sample_positions.is_empty() {
            // Programmable sample positions need a vendor extension (NVAPI/AGS); without one
            // the standard positions apply
            log::debug!("sample positions ignored without a vendor extension");
        }

        unsafe {
            let native_desc = sys::D3D11_RASTERIZER_DESC {
                FillMode: desc.fill_mode.0,
                CullMode: desc.cull_mode.0,
                FrontCounterClockwise: desc.front_counter_clockwise as i32,
                DepthBias: desc.depth_bias,
                DepthBiasClamp: desc.depth_bias_clamp,
                SlopeScaledDepthBias: desc.slope_scaled_depth_bias,
                DepthClipEnable: desc.depth_clip_enable as i32,
                ScissorEnable: desc.scissor_enable as i32,
                MultisampleEnable: desc.multisample_enable as i32,
                AntialiasedLineEnable: desc.antialiased_line_enable as i32,
            };

            let mut state: *mut sys::ID3D11RasterizerState = ptr::null_mut();
            check(
                "ID3D11Device::CreateRasterizerState",
                (*self.device).CreateRasterizerState(&native_desc, &mut state),
            )?;
            Ok(NativeRasterizerState(state as u64))
        }
    }

    fn create_blend_state(
        &self,
        desc: &Dx11BlendDesc,
    ) -> OnyxResult<NativeBlendState> {
        unsafe {
            let mut native_desc: sys::D3D11_BLEND_DESC = std::mem::zeroed();
            native_desc.AlphaToCoverageEnable = desc.alpha_to_coverage_enable as i32;
            native_desc.IndependentBlendEnable = desc.independent_blend_enable as i32;
            for (dst, src) in native_desc.RenderTarget.iter_mut().zip(&desc.render_target) {
                dst.BlendEnable = src.blend_enable as i32;
                dst.SrcBlend = src.src_blend.0;
                dst.DestBlend = src.dest_blend.0;
                dst.BlendOp = src.blend_op.0;
                dst.SrcBlendAlpha = src.src_blend_alpha.0;
                dst.DestBlendAlpha = src.dest_blend_alpha.0;
                dst.BlendOpAlpha = src.blend_op_alpha.0;
                dst.RenderTargetWriteMask = src.render_target_write_mask;
            }

            let mut state: *mut sys::ID3D11BlendState = ptr::null_mut();
            check(
                "ID3D11Device::CreateBlendState",
                (*self.device).CreateBlendState(&native_desc, &mut state),
            )?;
            Ok(NativeBlendState(state as u64))
        }
    }

    fn create_depth_stencil_state(
        &self,
        desc: &Dx11DepthStencilDesc,
    ) -> OnyxResult<NativeDepthStencilState> {
        unsafe {
            let native_desc = sys::D3D11_DEPTH_STENCIL_DESC {
                DepthEnable: desc.depth_enable as i32,
                DepthWriteMask: if desc.depth_write_enable {
                    sys::D3D11_DEPTH_WRITE_MASK_ALL
                } else {
                    sys::D3D11_DEPTH_WRITE_MASK_ZERO
                },
                DepthFunc: desc.depth_func.0,
                StencilEnable: desc.stencil_enable as i32,
                StencilReadMask: desc.stencil_read_mask,
                StencilWriteMask: desc.stencil_write_mask,
                FrontFace: sys::D3D11_DEPTH_STENCILOP_DESC {
                    StencilFailOp: desc.front_face.fail_op.0,
                    StencilDepthFailOp: desc.front_face.depth_fail_op.0,
                    StencilPassOp: desc.front_face.pass_op.0,
                    StencilFunc: desc.front_face.func.0,
                },
                BackFace: sys::D3D11_DEPTH_STENCILOP_DESC {
                    StencilFailOp: desc.back_face.fail_op.0,
                    StencilDepthFailOp: desc.back_face.depth_fail_op.0,
                    StencilPassOp: desc.back_face.pass_op.0,
                    StencilFunc: desc.back_face.func.0,
                },
            };

            let mut state: *mut sys::ID3D11DepthStencilState = ptr::null_mut();
            check(
                "ID3D11Device::CreateDepthStencilState",
                (*self.device).CreateDepthStencilState(&native_desc, &mut state),
            )?;
            Ok(NativeDepthStencilState(state as u64))
        }
    }

    fn create_shader(
        &self,
        stage: Dx11ShaderStage,
        bytecode: &[u8],
    ) -> OnyxResult<NativeShader> {
        unsafe {
            let code = bytecode.as_ptr() as *const _;
            let len = bytecode.len();
            let device = &*self.device;

            let mut shader: *mut IUnknown = ptr::null_mut();
            let (call, hr) = match stage {
                Dx11ShaderStage::Vertex => (
                    "ID3D11Device::CreateVertexShader",
                    device.CreateVertexShader(
                        code,
                        len,
                        ptr::null_mut(),
                        &mut shader as *mut _ as *mut _,
                    ),
                ),
                Dx11ShaderStage::Hull => (
                    "ID3D11Device::CreateHullShader",
                    device.CreateHullShader(
                        code,
                        len,
                        ptr::null_mut(),
                        &mut shader as *mut _ as *mut _,
                    ),
                ),
                Dx11ShaderStage::Domain => (
                    "ID3D11Device::CreateDomainShader",
                    device.CreateDomainShader(
                        code,
                        len,
                        ptr::null_mut(),
                        &mut shader as *mut _ as *mut _,
                    ),
                ),
                Dx11ShaderStage::Geometry => (
                    "ID3D11Device::CreateGeometryShader",
                    device.CreateGeometryShader(
                        code,
                        len,
                        ptr::null_mut(),
                        &mut shader as *mut _ as *mut _,
                    ),
                ),
                Dx11ShaderStage::Pixel => (
                    "ID3D11Device::CreatePixelShader",
                    device.CreatePixelShader(
                        code,
                        len,
                        ptr::null_mut(),
                        &mut shader as *mut _ as *mut _,
                    ),
                ),
                Dx11ShaderStage::Compute => (
                    "ID3D11Device::CreateComputeShader",
                    device.CreateComputeShader(
                        code,
                        len,
                        ptr::null_mut(),
                        &mut shader as *mut _ as *mut _,
                    ),
                ),
            };
            check(call, hr)?;
            Ok(NativeShader(shader as u64))
        }
    }

    fn create_event_query(&self) -> OnyxResult<NativeQuery> {
        unsafe {
            let desc = sys::D3D11_QUERY_DESC {
                Query: sys::D3D11_QUERY_EVENT,
                MiscFlags: 0,
            };
            let mut query: *mut sys::ID3D11Query = ptr::null_mut();
            check(
                "ID3D11Device::CreateQuery",
                (*self.device).CreateQuery(&desc, &mut query),
            )?;
            Ok(NativeQuery(query as u64))
        }
    }

    fn set_eviction_priority(
        &self,
        resource: NativeResource,
        priority: u32,
    ) {
        unsafe {
            if let Some(dxgi) = self.dxgi_resource(resource) {
                (*dxgi).SetEvictionPriority(priority);
                (*dxgi).Release();
            }
        }
    }

    fn destroy_object(
        &self,
        object_id: u64,
    ) {
        unsafe { release(object_id) };
    }
}

/// `Dx11ContextOps` over a real `ID3D11DeviceContext`
pub(crate) struct FfiContext {
    context: *mut sys::ID3D11DeviceContext,
    // Present on 11.1 runtimes; carries the bounded-range constant buffer binds
    context1: *mut sys1::ID3D11DeviceContext1,
    annotation: *mut sys1::ID3DUserDefinedAnnotation,
}

// Deferred contexts are single-owner; the immediate context is guarded by the device context's
// critical section discipline
unsafe impl Send for FfiContext {}
unsafe impl Sync for FfiContext {}

impl std::fmt::Debug for FfiContext {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("FfiContext").finish()
    }
}

impl Drop for FfiContext {
    fn drop(&mut self) {
        unsafe {
            release(self.annotation as u64);
            release(self.context1 as u64);
            release(self.context as u64);
        }
    }
}

impl FfiContext {
    unsafe fn new(context: *mut sys::ID3D11DeviceContext) -> Self {
        let mut context1: *mut sys1::ID3D11DeviceContext1 = ptr::null_mut();
        (*context).QueryInterface(
            &sys1::ID3D11DeviceContext1::uuidof(),
            &mut context1 as *mut _ as *mut _,
        );

        let mut annotation: *mut sys1::ID3DUserDefinedAnnotation = ptr::null_mut();
        (*context).QueryInterface(
            &sys1::ID3DUserDefinedAnnotation::uuidof(),
            &mut annotation as *mut _ as *mut _,
        );

        FfiContext {
            context,
            context1,
            annotation,
        }
    }

    unsafe fn raw(&self) -> &sys::ID3D11DeviceContext {
        &*self.context
    }
}

// Helper trait so the slot-array calls can share one pointer-vector builder
pub(crate) trait HandleId {
    fn raw_id(self) -> u64;
}

fn pointers<T>(handles: &[Option<T>]) -> Vec<*mut winapi::ctypes::c_void>
where
    T: Copy + HandleId,
{
    handles
        .iter()
        .map(|h| h.map_or(ptr::null_mut(), |h| h.raw_id() as *mut _))
        .collect()
}

macro_rules! impl_handle_id {
    ($name:ident) => {
        impl HandleId for $name {
            fn raw_id(self) -> u64 {
                self.0
            }
        }
    };
}

impl_handle_id!(NativeBuffer);
impl_handle_id!(NativeSrv);
impl_handle_id!(NativeUav);
impl_handle_id!(NativeRtv);
impl_handle_id!(NativeSampler);

impl Dx11ContextOps for FfiContext {
    fn ia_set_input_layout(
        &self,
        layout: Option<NativeInputLayout>,
    ) {
        unsafe {
            self.raw()
                .IASetInputLayout(layout.map_or(ptr::null_mut(), |l| l.0 as *mut _));
        }
    }

    fn ia_set_primitive_topology(
        &self,
        topology: D3D_PRIMITIVE_TOPOLOGY,
    ) {
        unsafe { self.raw().IASetPrimitiveTopology(topology.0) };
    }

    fn ia_set_vertex_buffers(
        &self,
        start_slot: u32,
        buffers: &[Option<NativeBuffer>],
        strides: &[u32],
        offsets: &[u32],
    ) {
        unsafe {
            let buffers = pointers(buffers);
            self.raw().IASetVertexBuffers(
                start_slot,
                buffers.len() as u32,
                buffers.as_ptr() as *const _,
                strides.as_ptr(),
                offsets.as_ptr(),
            );
        }
    }

    fn ia_set_index_buffer(
        &self,
        buffer: Option<NativeBuffer>,
        format: DXGI_FORMAT,
        byte_offset: u32,
    ) {
        unsafe {
            self.raw().IASetIndexBuffer(
                buffer.map_or(ptr::null_mut(), |b| b.0 as *mut _),
                format.0,
                byte_offset,
            );
        }
    }

    fn set_shader(
        &self,
        stage: Dx11ShaderStage,
        shader: Option<NativeShader>,
    ) {
        unsafe {
            let raw = self.raw();
            let shader = shader.map_or(0, |s| s.0);
            match stage {
                Dx11ShaderStage::Vertex => {
                    raw.VSSetShader(shader as *mut _, ptr::null(), 0)
                }
                Dx11ShaderStage::Hull => raw.HSSetShader(shader as *mut _, ptr::null(), 0),
                Dx11ShaderStage::Domain => raw.DSSetShader(shader as *mut _, ptr::null(), 0),
                Dx11ShaderStage::Geometry => raw.GSSetShader(shader as *mut _, ptr::null(), 0),
                Dx11ShaderStage::Pixel => raw.PSSetShader(shader as *mut _, ptr::null(), 0),
                Dx11ShaderStage::Compute => raw.CSSetShader(shader as *mut _, ptr::null(), 0),
            }
        }
    }

    fn set_constant_buffers(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        buffers: &[Option<NativeBuffer>],
    ) {
        unsafe {
            let raw = self.raw();
            let buffers = pointers(buffers);
            let num = buffers.len() as u32;
            let ptr = buffers.as_ptr() as *const _;
            match stage {
                Dx11ShaderStage::Vertex => raw.VSSetConstantBuffers(start_slot, num, ptr),
                Dx11ShaderStage::Hull => raw.HSSetConstantBuffers(start_slot, num, ptr),
                Dx11ShaderStage::Domain => raw.DSSetConstantBuffers(start_slot, num, ptr),
                Dx11ShaderStage::Geometry => raw.GSSetConstantBuffers(start_slot, num, ptr),
                Dx11ShaderStage::Pixel => raw.PSSetConstantBuffers(start_slot, num, ptr),
                Dx11ShaderStage::Compute => raw.CSSetConstantBuffers(start_slot, num, ptr),
            }
        }
    }

    fn set_constant_buffers1(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        buffers: &[Option<NativeBuffer>],
        first_constants: &[u32],
        num_constants: &[u32],
    ) {
        if self.context1.is_null() {
            // Downlevel runtime: the bounded-range variant does not exist. The offset is
            // silently wrong here; the device context warned about this at creation.
            self.set_constant_buffers(stage, start_slot, buffers);
            return;
        }

        unsafe {
            let raw = &*self.context1;
            let buffers = pointers(buffers);
            let num = buffers.len() as u32;
            let ptr = buffers.as_ptr() as *const _;
            let first = first_constants.as_ptr();
            let counts = num_constants.as_ptr();
            match stage {
                Dx11ShaderStage::Vertex => {
                    raw.VSSetConstantBuffers1(start_slot, num, ptr, first, counts)
                }
                Dx11ShaderStage::Hull => {
                    raw.HSSetConstantBuffers1(start_slot, num, ptr, first, counts)
                }
                Dx11ShaderStage::Domain => {
                    raw.DSSetConstantBuffers1(start_slot, num, ptr, first, counts)
                }
                Dx11ShaderStage::Geometry => {
                    raw.GSSetConstantBuffers1(start_slot, num, ptr, first, counts)
                }
                Dx11ShaderStage::Pixel => {
                    raw.PSSetConstantBuffers1(start_slot, num, ptr, first, counts)
                }
                Dx11ShaderStage::Compute => {
                    raw.CSSetConstantBuffers1(start_slot, num, ptr, first, counts)
                }
            }
        }
    }

    fn set_shader_resources(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        views: &[Option<NativeSrv>],
    ) {
        unsafe {
            let raw = self.raw();
            let views = pointers(views);
            let num = views.len() as u32;
            let ptr = views.as_ptr() as *const _;
            match stage {
                Dx11ShaderStage::Vertex => raw.VSSetShaderResources(start_slot, num, ptr),
                Dx11ShaderStage::Hull => raw.HSSetShaderResources(start_slot, num, ptr),
                Dx11ShaderStage::Domain => raw.DSSetShaderResources(start_slot, num, ptr),
                Dx11ShaderStage::Geometry => raw.GSSetShaderResources(start_slot, num, ptr),
                Dx11ShaderStage::Pixel => raw.PSSetShaderResources(start_slot, num, ptr),
                Dx11ShaderStage::Compute => raw.CSSetShaderResources(start_slot, num, ptr),
            }
        }
    }

    fn set_samplers(
        &self,
        stage: Dx11ShaderStage,
        start_slot: u32,
        samplers: &[Option<NativeSampler>],
    ) {
        unsafe {
            let raw = self.raw();
            let samplers = pointers(samplers);
            let num = samplers.len() as u32;
            let ptr = samplers.as_ptr() as *const _;
            match stage {
                Dx11ShaderStage::Vertex => raw.VSSetSamplers(start_slot, num, ptr),
                Dx11ShaderStage::Hull => raw.HSSetSamplers(start_slot, num, ptr),
                Dx11ShaderStage::Domain => raw.DSSetSamplers(start_slot, num, ptr),
                Dx11ShaderStage::Geometry => raw.GSSetSamplers(start_slot, num, ptr),
                Dx11ShaderStage::Pixel => raw.PSSetSamplers(start_slot, num, ptr),
                Dx11ShaderStage::Compute => raw.CSSetSamplers(start_slot, num, ptr),
            }
        }
    }

    fn cs_set_unordered_access_views(
        &self,
        start_slot: u32,
        views: &[Option<NativeUav>],
    ) {
        unsafe {
            let views = pointers(views);
            self.raw().CSSetUnorderedAccessViews(
                start_slot,
                views.len() as u32,
                views.as_ptr() as *const _,
                ptr::null(),
            );
        }
    }

    fn om_set_unordered_access_views(
        &self,
        start_slot: u32,
        views: &[Option<NativeUav>],
    ) {
        unsafe {
            let views = pointers(views);
            self.raw().OMSetRenderTargetsAndUnorderedAccessViews(
                sys::D3D11_KEEP_RENDER_TARGETS_AND_DEPTH_STENCIL,
                ptr::null(),
                ptr::null_mut(),
                start_slot,
                views.len() as u32,
                views.as_ptr() as *const _,
                ptr::null(),
            );
        }
    }

    fn om_set_render_targets(
        &self,
        rtvs: &[Option<NativeRtv>],
        dsv: Option<NativeDsv>,
    ) {
        unsafe {
            let rtvs = pointers(rtvs);
            self.raw().OMSetRenderTargets(
                rtvs.len() as u32,
                rtvs.as_ptr() as *const _,
                dsv.map_or(ptr::null_mut(), |d| d.0 as *mut _),
            );
        }
    }

    fn om_set_blend_state(
        &self,
        state: Option<NativeBlendState>,
        blend_factor: [f32; 4],
        sample_mask: u32,
    ) {
        unsafe {
            self.raw().OMSetBlendState(
                state.map_or(ptr::null_mut(), |s| s.0 as *mut _),
                &blend_factor,
                sample_mask,
            );
        }
    }

    fn om_set_depth_stencil_state(
        &self,
        state: Option<NativeDepthStencilState>,
        stencil_ref: u32,
    ) {
        unsafe {
            self.raw().OMSetDepthStencilState(
                state.map_or(ptr::null_mut(), |s| s.0 as *mut _),
                stencil_ref,
            );
        }
    }

    fn rs_set_state(
        &self,
        state: Option<NativeRasterizerState>,
    ) {
        unsafe {
            self.raw()
                .RSSetState(state.map_or(ptr::null_mut(), |s| s.0 as *mut _));
        }
    }

    fn rs_set_viewports(
        &self,
        viewports: &[D3D11_VIEWPORT],
    ) {
        unsafe {
            let native: Vec<sys::D3D11_VIEWPORT> = viewports
                .iter()
                .map(|v| sys::D3D11_VIEWPORT {
                    TopLeftX: v.TopLeftX,
                    TopLeftY: v.TopLeftY,
                    Width: v.Width,
                    Height: v.Height,
                    MinDepth: v.MinDepth,
                    MaxDepth: v.MaxDepth,
                })
                .collect();
            self.raw().RSSetViewports(native.len() as u32, native.as_ptr());
        }
    }

    fn rs_set_scissor_rects(
        &self,
        rects: &[D3D11_RECT],
    ) {
        unsafe {
            let native: Vec<winapi::shared::windef::RECT> = rects
                .iter()
                .map(|r| winapi::shared::windef::RECT {
                    left: r.left,
                    top: r.top,
                    right: r.right,
                    bottom: r.bottom,
                })
                .collect();
            self.raw().RSSetScissorRects(native.len() as u32, native.as_ptr());
        }
    }

    fn draw(
        &self,
        vertex_count: u32,
        start_vertex: u32,
    ) {
        unsafe { self.raw().Draw(vertex_count, start_vertex) };
    }

    fn draw_instanced(
        &self,
        vertex_count_per_instance: u32,
        instance_count: u32,
        start_vertex: u32,
        start_instance: u32,
    ) {
        unsafe {
            self.raw().DrawInstanced(
                vertex_count_per_instance,
                instance_count,
                start_vertex,
                start_instance,
            );
        }
    }

    fn draw_indexed(
        &self,
        index_count: u32,
        start_index: u32,
        base_vertex: i32,
    ) {
        unsafe { self.raw().DrawIndexed(index_count, start_index, base_vertex) };
    }

    fn draw_indexed_instanced(
        &self,
        index_count_per_instance: u32,
        instance_count: u32,
        start_index: u32,
        base_vertex: i32,
        start_instance: u32,
    ) {
        unsafe {
            self.raw().DrawIndexedInstanced(
                index_count_per_instance,
                instance_count,
                start_index,
                base_vertex,
                start_instance,
            );
        }
    }

    fn draw_instanced_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    ) {
        unsafe {
            self.raw()
                .DrawInstancedIndirect(args.0 as *mut _, byte_offset);
        }
    }

    fn draw_indexed_instanced_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    ) {
        unsafe {
            self.raw()
                .DrawIndexedInstancedIndirect(args.0 as *mut _, byte_offset);
        }
    }

    fn dispatch(
        &self,
        group_count_x: u32,
        group_count_y: u32,
        group_count_z: u32,
    ) {
        unsafe {
            self.raw()
                .Dispatch(group_count_x, group_count_y, group_count_z);
        }
    }

    fn dispatch_indirect(
        &self,
        args: NativeBuffer,
        byte_offset: u32,
    ) {
        unsafe { self.raw().DispatchIndirect(args.0 as *mut _, byte_offset) };
    }

    fn copy_buffer_region(
        &self,
        dst: NativeBuffer,
        dst_offset: u64,
        src: NativeBuffer,
        src_offset: u64,
        size: u64,
    ) {
        unsafe {
            let src_box = sys::D3D11_BOX {
                left: src_offset as u32,
                top: 0,
                front: 0,
                right: (src_offset + size) as u32,
                bottom: 1,
                back: 1,
            };
            self.raw().CopySubresourceRegion(
                dst.0 as *mut _,
                0,
                dst_offset as u32,
                0,
                0,
                src.0 as *mut _,
                0,
                &src_box,
            );
        }
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
        unsafe {
            let native_box = src_box.map(|b| sys::D3D11_BOX {
                left: b.left,
                top: b.top,
                front: b.front,
                right: b.right,
                bottom: b.bottom,
                back: b.back,
            });
            self.raw().CopySubresourceRegion(
                dst.0 as *mut _,
                dst_subresource,
                dst_offset[0],
                dst_offset[1],
                dst_offset[2],
                src.0 as *mut _,
                src_subresource,
                native_box.as_ref().map_or(ptr::null(), |b| b),
            );
        }
    }

    fn update_subresource(
        &self,
        dst: NativeResource,
        dst_subresource: u32,
        data: &[u8],
    ) {
        unsafe {
            self.raw().UpdateSubresource(
                dst.0 as *mut _,
                dst_subresource,
                ptr::null(),
                data.as_ptr() as *const _,
                0,
                0,
            );
        }
    }

    fn clear_render_target_view(
        &self,
        view: NativeRtv,
        color: [f32; 4],
    ) {
        unsafe { self.raw().ClearRenderTargetView(view.0 as *mut _, &color) };
    }

    fn clear_depth_stencil_view(
        &self,
        view: NativeDsv,
        flags: u32,
        depth: f32,
        stencil: u8,
    ) {
        unsafe {
            self.raw()
                .ClearDepthStencilView(view.0 as *mut _, flags, depth, stencil);
        }
    }

    fn clear_unordered_access_view_float(
        &self,
        view: NativeUav,
        values: [f32; 4],
    ) {
        unsafe {
            self.raw()
                .ClearUnorderedAccessViewFloat(view.0 as *mut _, &values);
        }
    }

    fn clear_unordered_access_view_uint(
        &self,
        view: NativeUav,
        values: [u32; 4],
    ) {
        unsafe {
            self.raw()
                .ClearUnorderedAccessViewUint(view.0 as *mut _, &values);
        }
    }

    fn map(
        &self,
        resource: NativeResource,
        map_type: D3D11_MAP,
    ) -> OnyxResult<*mut u8> {
        unsafe {
            let mut mapped: sys::D3D11_MAPPED_SUBRESOURCE = std::mem::zeroed();
            check(
                "ID3D11DeviceContext::Map",
                self.raw()
                    .Map(resource.0 as *mut _, 0, map_type.0, 0, &mut mapped),
            )?;
            Ok(mapped.pData as *mut u8)
        }
    }

    fn unmap(
        &self,
        resource: NativeResource,
    ) {
        unsafe { self.raw().Unmap(resource.0 as *mut _, 0) };
    }

    fn begin_annotation(
        &self,
        name: &str,
    ) {
        unsafe {
            if !self.annotation.is_null() {
                let wide = to_wide(name);
                (*self.annotation).BeginEvent(wide.as_ptr());
            }
        }
    }

    fn end_annotation(&self) {
        unsafe {
            if !self.annotation.is_null() {
                (*self.annotation).EndEvent();
            }
        }
    }

    fn end_event_query(
        &self,
        query: NativeQuery,
    ) {
        unsafe { self.raw().End(query.0 as *mut _) };
    }

    fn get_event_query_data(
        &self,
        query: NativeQuery,
    ) -> bool {
        unsafe {
            self.raw()
                .GetData(query.0 as *mut _, ptr::null_mut(), 0, 0)
                == 0
        }
    }

    fn flush(&self) {
        unsafe { self.raw().Flush() };
    }

    fn clear_state(&self) {
        unsafe { self.raw().ClearState() };
    }

    fn finish_command_list(&self) -> OnyxResult<NativeCommandList> {
        unsafe {
            let mut list: *mut sys::ID3D11CommandList = ptr::null_mut();
            check(
                "ID3D11DeviceContext::FinishCommandList",
                self.raw().FinishCommandList(0, &mut list),
            )?;
            Ok(NativeCommandList(list as u64))
        }
    }

    fn execute_command_list(
        &self,
        list: NativeCommandList,
        restore_context_state: bool,
    ) {
        unsafe {
            self.raw()
                .ExecuteCommandList(list.0 as *mut _, restore_context_state as i32);
        }
    }
}
