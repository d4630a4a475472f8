use crate::dx11::{OnyxDeviceContextDx11, OnyxSamplerDx11};
use crate::{
    OnyxBufferViewKind, OnyxDescriptorClass, OnyxDescriptorDef, OnyxError, OnyxFormat,
    OnyxResourceType, OnyxResult, OnyxTextureDimensions, OnyxTextureViewKind,
};
use std::sync::Arc;

use super::internal::binding_state::{SubresourceIdentity, SubresourceKey};
use super::internal::native::{
    Dx11SrvDesc, Dx11TextureDimension, Dx11UavDesc, NativeBuffer, NativeSampler, NativeSrv,
    NativeUav,
};

/// A resolved descriptor: the native view plus the four values the binding engine consumes,
/// which are the element offset/count, the integer-format flag, and the subresource identity
/// hazard tracking keys on. The underlying buffer/texture must outlive every descriptor created
/// over it.
#[derive(Debug)]
pub struct OnyxDescriptorDx11Inner {
    device_context: OnyxDeviceContextDx11,
    class: OnyxDescriptorClass,

    srv: Option<NativeSrv>,
    uav: Option<NativeUav>,
    constant_buffer: Option<NativeBuffer>,
    // Samplers are held rather than copied by handle so the native object outlives the descriptor
    sampler: Option<OnyxSamplerDx11>,

    /// First element for buffer views, first 16-byte constant for constant buffer views
    element_offset: u64,
    element_count: u64,
    integer_format: bool,
    identity: Option<SubresourceIdentity>,
}

impl Drop for OnyxDescriptorDx11Inner {
    fn drop(&mut self) {
        let device_ops = self.device_context.device_ops();
        if let Some(srv) = self.srv {
            device_ops.destroy_object(srv.0);
        }
        if let Some(uav) = self.uav {
            device_ops.destroy_object(uav.0);
        }
    }
}

#[derive(Clone, Debug)]
pub struct OnyxDescriptorDx11 {
    inner: Arc<OnyxDescriptorDx11Inner>,
}

impl OnyxDescriptorDx11 {
    pub fn new(
        device_context: &OnyxDeviceContextDx11,
        descriptor_def: &OnyxDescriptorDef,
    ) -> OnyxResult<Self> {
        match descriptor_def {
            OnyxDescriptorDef::BufferView(def) => {
                let buffer = def.buffer.dx11_buffer().ok_or_else(|| {
                    OnyxError::InvalidArgument(
                        "buffer view over a non-dx11 buffer".to_string(),
                    )
                })?;
                let buffer_def = buffer.buffer_def();

                let structured = buffer_def.elements.element_stride > 0
                    && def.format == OnyxFormat::UNDEFINED;
                if !structured && def.format == OnyxFormat::UNDEFINED {
                    return Err(OnyxError::InvalidArgument(
                        "typed buffer view requires a format".to_string(),
                    ));
                }

                let identity = SubresourceIdentity {
                    resource: buffer.dx11_resource(),
                    key: SubresourceKey::WHOLE,
                };

                let device_ops = device_context.device_ops();
                let (class, srv, uav) = match def.kind {
                    OnyxBufferViewKind::ShaderResource => {
                        if !buffer_def.resource_type.intersects(OnyxResourceType::BUFFER) {
                            return Err(OnyxError::InvalidArgument(
                                "buffer was not created with BUFFER resource type".to_string(),
                            ));
                        }
                        let srv = device_ops.create_shader_resource_view(
                            buffer.dx11_resource(),
                            &Dx11SrvDesc::Buffer {
                                format: def.format.into(),
                                first_element: def.element_offset,
                                num_elements: def.element_count,
                                structure_byte_stride: if structured {
                                    buffer_def.elements.element_stride as u32
                                } else {
                                    0
                                },
                            },
                        )?;
                        (OnyxDescriptorClass::ShaderResource, Some(srv), None)
                    }
                    OnyxBufferViewKind::Storage => {
                        if !buffer_def
                            .resource_type
                            .intersects(OnyxResourceType::BUFFER_READ_WRITE)
                        {
                            return Err(OnyxError::InvalidArgument(
                                "buffer was not created with BUFFER_READ_WRITE resource type"
                                    .to_string(),
                            ));
                        }
                        let uav = device_ops.create_unordered_access_view(
                            buffer.dx11_resource(),
                            &Dx11UavDesc::Buffer {
                                format: def.format.into(),
                                first_element: def.element_offset,
                                num_elements: def.element_count,
                                structure_byte_stride: if structured {
                                    buffer_def.elements.element_stride as u32
                                } else {
                                    0
                                },
                            },
                        )?;
                        (OnyxDescriptorClass::Storage, None, Some(uav))
                    }
                };

                Ok(Self::from_inner(OnyxDescriptorDx11Inner {
                    device_context: device_context.clone(),
                    class,
                    srv,
                    uav,
                    constant_buffer: None,
                    sampler: None,
                    element_offset: def.element_offset,
                    element_count: def.element_count,
                    integer_format: def.format.is_integer(),
                    identity: Some(identity),
                }))
            }

            OnyxDescriptorDef::TextureView(def) => {
                let texture = def.texture.dx11_texture().ok_or_else(|| {
                    OnyxError::InvalidArgument(
                        "texture view over a non-dx11 texture".to_string(),
                    )
                })?;
                let texture_def = texture.texture_def();

                if def.mip_first as u32 + def.mip_count as u32 > texture_def.mip_count
                    || def.layer_first as u32 + def.layer_count as u32 > texture_def.array_length
                {
                    return Err(OnyxError::InvalidArgument(format!(
                        "view window (mips {}..+{}, layers {}..+{}) exceeds the texture",
                        def.mip_first, def.mip_count, def.layer_first, def.layer_count
                    )));
                }

                let identity = SubresourceIdentity {
                    resource: texture.dx11_resource(),
                    key: SubresourceKey::pack(
                        def.mip_first,
                        def.mip_count,
                        def.layer_first,
                        def.layer_count,
                    )?,
                };

                let dimension = match texture_def
                    .dimensions
                    .determine_dimensions(texture_def.extents)
                {
                    OnyxTextureDimensions::Dim1D => Dx11TextureDimension::Dim1D,
                    OnyxTextureDimensions::Dim3D => Dx11TextureDimension::Dim3D,
                    _ => Dx11TextureDimension::Dim2D,
                };

                let device_ops = device_context.device_ops();
                let (class, srv, uav) = match def.kind {
                    OnyxTextureViewKind::ShaderResource => {
                        if !texture_def.resource_type.intersects(OnyxResourceType::TEXTURE) {
                            return Err(OnyxError::InvalidArgument(
                                "texture was not created with TEXTURE resource type".to_string(),
                            ));
                        }
                        let srv = device_ops.create_shader_resource_view(
                            texture.dx11_resource(),
                            &Dx11SrvDesc::Texture {
                                format: texture_def.format.into(),
                                dimension,
                                mip_first: def.mip_first as u32,
                                mip_count: def.mip_count as u32,
                                layer_first: def.layer_first as u32,
                                layer_count: def.layer_count as u32,
                            },
                        )?;
                        (OnyxDescriptorClass::ShaderResource, Some(srv), None)
                    }
                    OnyxTextureViewKind::Storage => {
                        if !texture_def
                            .resource_type
                            .intersects(OnyxResourceType::TEXTURE_READ_WRITE)
                        {
                            return Err(OnyxError::InvalidArgument(
                                "texture was not created with TEXTURE_READ_WRITE resource type"
                                    .to_string(),
                            ));
                        }
                        // A writable view covers exactly one mip
                        if def.mip_count != 1 {
                            return Err(OnyxError::InvalidArgument(
                                "storage texture views must cover exactly one mip".to_string(),
                            ));
                        }
                        let uav = device_ops.create_unordered_access_view(
                            texture.dx11_resource(),
                            &Dx11UavDesc::Texture {
                                format: texture_def.format.into(),
                                dimension,
                                mip_slice: def.mip_first as u32,
                                layer_first: def.layer_first as u32,
                                layer_count: def.layer_count as u32,
                            },
                        )?;
                        (OnyxDescriptorClass::Storage, None, Some(uav))
                    }
                };

                Ok(Self::from_inner(OnyxDescriptorDx11Inner {
                    device_context: device_context.clone(),
                    class,
                    srv,
                    uav,
                    constant_buffer: None,
                    sampler: None,
                    element_offset: 0,
                    element_count: 0,
                    integer_format: texture_def.format.is_integer(),
                    identity: Some(identity),
                }))
            }

            OnyxDescriptorDef::ConstantBufferView(def) => {
                let buffer = def.buffer.dx11_buffer().ok_or_else(|| {
                    OnyxError::InvalidArgument(
                        "constant buffer view over a non-dx11 buffer".to_string(),
                    )
                })?;
                if !buffer
                    .buffer_def()
                    .resource_type
                    .intersects(OnyxResourceType::CONSTANT_BUFFER)
                {
                    return Err(OnyxError::InvalidArgument(
                        "buffer was not created with CONSTANT_BUFFER resource type".to_string(),
                    ));
                }
                // Bounded-range binds work in 16-constant (256 byte) granularity
                if def.byte_offset % 256 != 0 {
                    return Err(OnyxError::InvalidArgument(format!(
                        "constant buffer view offset {} is not 256-byte aligned",
                        def.byte_offset
                    )));
                }

                Ok(Self::from_inner(OnyxDescriptorDx11Inner {
                    device_context: device_context.clone(),
                    class: OnyxDescriptorClass::ConstantBuffer,
                    srv: None,
                    uav: None,
                    constant_buffer: Some(buffer.dx11_buffer()),
                    sampler: None,
                    element_offset: def.byte_offset / 16,
                    element_count: (def.byte_size + 15) / 16,
                    integer_format: false,
                    identity: Some(SubresourceIdentity {
                        resource: buffer.dx11_resource(),
                        key: SubresourceKey::WHOLE,
                    }),
                }))
            }

            OnyxDescriptorDef::Sampler(sampler) => {
                let sampler = sampler.dx11_sampler().ok_or_else(|| {
                    OnyxError::InvalidArgument("sampler is not a dx11 sampler".to_string())
                })?;

                Ok(Self::from_inner(OnyxDescriptorDx11Inner {
                    device_context: device_context.clone(),
                    class: OnyxDescriptorClass::Sampler,
                    srv: None,
                    uav: None,
                    constant_buffer: None,
                    sampler: Some(sampler.clone()),
                    element_offset: 0,
                    element_count: 0,
                    integer_format: false,
                    identity: None,
                }))
            }
        }
    }

    fn from_inner(inner: OnyxDescriptorDx11Inner) -> Self {
        OnyxDescriptorDx11 {
            inner: Arc::new(inner),
        }
    }

    pub fn class(&self) -> OnyxDescriptorClass {
        self.inner.class
    }

    pub fn element_offset(&self) -> u64 {
        self.inner.element_offset
    }

    pub fn element_count(&self) -> u64 {
        self.inner.element_count
    }

    pub fn is_integer_format(&self) -> bool {
        self.inner.integer_format
    }

    pub fn dx11_srv(&self) -> Option<NativeSrv> {
        self.inner.srv
    }

    pub fn dx11_uav(&self) -> Option<NativeUav> {
        self.inner.uav
    }

    pub fn dx11_constant_buffer(&self) -> Option<NativeBuffer> {
        self.inner.constant_buffer
    }

    pub fn dx11_sampler(&self) -> Option<NativeSampler> {
        self.inner.sampler.as_ref().map(|s| s.dx11_sampler())
    }

    pub(crate) fn identity(&self) -> Option<SubresourceIdentity> {
        self.inner.identity
    }
}
