use crate::dx11::OnyxDeviceContextDx11;
use crate::{OnyxResourceType, OnyxResult, OnyxTextureDef, OnyxTextureDimensions};
use std::sync::Arc;

use super::d3d11;
use super::internal::conversions;
use super::internal::native::{
    Dx11DsvDesc, Dx11RtvDesc, Dx11TextureDesc, Dx11TextureDimension, NativeDsv, NativeResource,
    NativeRtv, NativeTexture,
};

#[derive(Debug)]
pub struct OnyxTextureDx11Inner {
    device_context: OnyxDeviceContextDx11,
    texture_def: OnyxTextureDef,
    texture: NativeTexture,
    // Whole-resource attachment views, created eagerly when the resource type asks for them
    render_target_view: Option<NativeRtv>,
    depth_stencil_view: Option<NativeDsv>,
}

impl Drop for OnyxTextureDx11Inner {
    fn drop(&mut self) {
        log::trace!("destroying OnyxTextureDx11 {:?}", self.texture);
        let device_ops = self.device_context.device_ops();
        if let Some(view) = self.render_target_view {
            device_ops.destroy_object(view.0);
        }
        if let Some(view) = self.depth_stencil_view {
            device_ops.destroy_object(view.0);
        }
        device_ops.destroy_object(self.texture.0);
    }
}

#[derive(Clone, Debug)]
pub struct OnyxTextureDx11 {
    inner: Arc<OnyxTextureDx11Inner>,
}

impl PartialEq for OnyxTextureDx11 {
    fn eq(
        &self,
        other: &Self,
    ) -> bool {
        self.inner.texture == other.inner.texture
    }
}

impl OnyxTextureDx11 {
    pub fn new(
        device_context: &OnyxDeviceContextDx11,
        texture_def: &OnyxTextureDef,
    ) -> OnyxResult<Self> {
        texture_def.verify();

        let dimensions = texture_def.dimensions.determine_dimensions(texture_def.extents);
        let dimension = match dimensions {
            OnyxTextureDimensions::Dim1D => Dx11TextureDimension::Dim1D,
            OnyxTextureDimensions::Dim2D => Dx11TextureDimension::Dim2D,
            OnyxTextureDimensions::Dim3D => Dx11TextureDimension::Dim3D,
            OnyxTextureDimensions::Auto => unreachable!(),
        };

        let resource_type = texture_def.resource_type;

        let mut bind_flags = 0;
        if resource_type.intersects(OnyxResourceType::TEXTURE) {
            bind_flags |= d3d11::D3D11_BIND_SHADER_RESOURCE;
        }
        if resource_type.intersects(OnyxResourceType::TEXTURE_READ_WRITE) {
            bind_flags |= d3d11::D3D11_BIND_SHADER_RESOURCE | d3d11::D3D11_BIND_UNORDERED_ACCESS;
        }
        if resource_type.intersects(OnyxResourceType::RENDER_TARGET_COLOR) {
            bind_flags |= d3d11::D3D11_BIND_RENDER_TARGET;
        }
        if resource_type.intersects(OnyxResourceType::RENDER_TARGET_DEPTH_STENCIL) {
            bind_flags |= d3d11::D3D11_BIND_DEPTH_STENCIL;
        }

        let mut misc_flags = 0;
        if resource_type.contains(OnyxResourceType::TEXTURE_CUBE) {
            misc_flags |= d3d11::D3D11_RESOURCE_MISC_TEXTURECUBE;
        }

        let desc = Dx11TextureDesc {
            dimension,
            width: texture_def.extents.width,
            height: texture_def.extents.height,
            depth: texture_def.extents.depth,
            array_size: texture_def.array_length,
            mip_levels: texture_def.mip_count,
            format: texture_def.format.into(),
            sample_count: texture_def.sample_count.as_u32(),
            usage: d3d11::D3D11_USAGE_DEFAULT,
            bind_flags,
            cpu_access_flags: 0,
            misc_flags,
        };

        let device_ops = device_context.device_ops();
        let texture = device_ops.create_texture(&desc)?;
        log::trace!("created OnyxTextureDx11 {:?}", texture);

        let render_target_view = if resource_type
            .intersects(OnyxResourceType::RENDER_TARGET_COLOR)
        {
            Some(device_ops.create_render_target_view(
                texture.as_resource(),
                &Dx11RtvDesc {
                    format: texture_def.format.into(),
                    dimension,
                    mip_slice: 0,
                    layer_first: 0,
                    layer_count: texture_def.array_length,
                },
            )?)
        } else {
            None
        };

        let depth_stencil_view = if resource_type
            .intersects(OnyxResourceType::RENDER_TARGET_DEPTH_STENCIL)
        {
            Some(device_ops.create_depth_stencil_view(
                texture.as_resource(),
                &Dx11DsvDesc {
                    format: texture_def.format.into(),
                    mip_slice: 0,
                    layer_first: 0,
                    layer_count: texture_def.array_length,
                },
            )?)
        } else {
            None
        };

        Ok(OnyxTextureDx11 {
            inner: Arc::new(OnyxTextureDx11Inner {
                device_context: device_context.clone(),
                texture_def: texture_def.clone(),
                texture,
                render_target_view,
                depth_stencil_view,
            }),
        })
    }

    pub fn texture_def(&self) -> &OnyxTextureDef {
        &self.inner.texture_def
    }

    pub fn dx11_texture(&self) -> NativeTexture {
        self.inner.texture
    }

    pub(crate) fn dx11_resource(&self) -> NativeResource {
        self.inner.texture.as_resource()
    }

    pub fn dx11_render_target_view(&self) -> Option<NativeRtv> {
        self.inner.render_target_view
    }

    pub fn dx11_depth_stencil_view(&self) -> Option<NativeDsv> {
        self.inner.depth_stencil_view
    }

    /// `D3D11CalcSubresource` for this texture's mip count
    pub fn subresource_index(
        &self,
        mip_level: u32,
        array_layer: u32,
    ) -> u32 {
        mip_level + array_layer * self.inner.texture_def.mip_count
    }

    /// Update the externally supplied residency priority for this texture's backing memory
    pub fn set_memory_priority(
        &self,
        priority: f32,
    ) {
        self.inner.device_context.device_ops().set_eviction_priority(
            self.dx11_resource(),
            conversions::eviction_priority(priority),
        );
    }
}
