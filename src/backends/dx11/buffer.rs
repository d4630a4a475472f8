use crate::dx11::OnyxDeviceContextDx11;
use crate::{OnyxBufferDef, OnyxError, OnyxFormat, OnyxMemoryUsage, OnyxResourceType, OnyxResult};

use super::d3d11;
use super::internal::conversions;
use super::internal::native::{NativeBuffer, NativeResource};
use super::internal::round_size_up_to_alignment_u32;

/// A buffer and the native `{usage, CPU-access, bind-flags}` triple derived from its abstract
/// usage. Mapping goes through the immediate-context critical section because mapping races with
/// deferred command list finalization on other threads.
#[derive(Debug)]
pub struct OnyxBufferDx11 {
    device_context: OnyxDeviceContextDx11,
    buffer_def: OnyxBufferDef,
    buffer: NativeBuffer,
}

impl Drop for OnyxBufferDx11 {
    fn drop(&mut self) {
        log::trace!("destroying OnyxBufferDx11 {:?}", self.buffer);
        self.device_context.device_ops().destroy_object(self.buffer.0);
    }
}

impl OnyxBufferDx11 {
    pub fn new(
        device_context: &OnyxDeviceContextDx11,
        buffer_def: &OnyxBufferDef,
    ) -> OnyxResult<Self> {
        buffer_def.verify();

        let (usage, cpu_access_flags) = conversions::memory_usage(buffer_def.memory_usage);

        let mut byte_width = buffer_def.size as u32;
        let mut bind_flags = 0;
        let mut misc_flags = 0;

        // Staging resources cannot carry bind flags
        if usage != d3d11::D3D11_USAGE_STAGING {
            let resource_type = buffer_def.resource_type;
            if resource_type.intersects(OnyxResourceType::VERTEX_BUFFER) {
                bind_flags |= d3d11::D3D11_BIND_VERTEX_BUFFER;
            }
            if resource_type.intersects(OnyxResourceType::INDEX_BUFFER) {
                bind_flags |= d3d11::D3D11_BIND_INDEX_BUFFER;
            }
            if resource_type.intersects(OnyxResourceType::CONSTANT_BUFFER) {
                bind_flags |= d3d11::D3D11_BIND_CONSTANT_BUFFER;
                byte_width = round_size_up_to_alignment_u32(byte_width, 16);
            }
            if resource_type.intersects(OnyxResourceType::BUFFER) {
                bind_flags |= d3d11::D3D11_BIND_SHADER_RESOURCE;
            }
            if resource_type.intersects(OnyxResourceType::BUFFER_READ_WRITE) {
                bind_flags |= d3d11::D3D11_BIND_SHADER_RESOURCE | d3d11::D3D11_BIND_UNORDERED_ACCESS;
            }
            if resource_type.intersects(OnyxResourceType::INDIRECT_BUFFER) {
                misc_flags |= d3d11::D3D11_RESOURCE_MISC_DRAWINDIRECT_ARGS;
            }
        }

        let structured = buffer_def.elements.element_stride > 0
            && buffer_def.format == OnyxFormat::UNDEFINED
            && buffer_def
                .resource_type
                .intersects(OnyxResourceType::BUFFER | OnyxResourceType::BUFFER_READ_WRITE);
        if structured {
            misc_flags |= d3d11::D3D11_RESOURCE_MISC_BUFFER_STRUCTURED;
        }

        let desc = d3d11::D3D11_BUFFER_DESC {
            ByteWidth: byte_width,
            Usage: usage,
            BindFlags: bind_flags,
            CPUAccessFlags: cpu_access_flags,
            MiscFlags: misc_flags,
            StructureByteStride: if structured {
                buffer_def.elements.element_stride as u32
            } else {
                0
            },
        };

        let buffer = device_context.device_ops().create_buffer(&desc, None)?;
        log::trace!("created OnyxBufferDx11 {:?}", buffer);

        Ok(OnyxBufferDx11 {
            device_context: device_context.clone(),
            buffer_def: buffer_def.clone(),
            buffer,
        })
    }

    pub fn buffer_def(&self) -> &OnyxBufferDef {
        &self.buffer_def
    }

    pub fn dx11_buffer(&self) -> NativeBuffer {
        self.buffer
    }

    pub(crate) fn dx11_resource(&self) -> NativeResource {
        self.buffer.as_resource()
    }

    pub fn map_buffer(&self) -> OnyxResult<*mut u8> {
        let map_type = match self.buffer_def.memory_usage {
            OnyxMemoryUsage::CpuToGpu => d3d11::D3D11_MAP_WRITE_DISCARD,
            OnyxMemoryUsage::GpuToCpu => d3d11::D3D11_MAP_READ,
            OnyxMemoryUsage::CpuOnly => d3d11::D3D11_MAP_READ_WRITE,
            _ => {
                return Err(OnyxError::InvalidArgument(
                    "buffer memory usage does not allow mapping".to_string(),
                ))
            }
        };

        let _guard = self.device_context.immediate_context_lock();
        self.device_context
            .immediate_context()
            .map(self.dx11_resource(), map_type)
    }

    pub fn unmap_buffer(&self) -> OnyxResult<()> {
        let _guard = self.device_context.immediate_context_lock();
        self.device_context
            .immediate_context()
            .unmap(self.dx11_resource());
        Ok(())
    }

    pub fn copy_to_host_visible_buffer<T: Copy>(
        &self,
        data: &[T],
    ) -> OnyxResult<()> {
        self.copy_to_host_visible_buffer_with_offset(data, 0)
    }

    pub fn copy_to_host_visible_buffer_with_offset<T: Copy>(
        &self,
        data: &[T],
        buffer_byte_offset: u64,
    ) -> OnyxResult<()> {
        let data_size_in_bytes = data.len() * std::mem::size_of::<T>();
        assert!(buffer_byte_offset + data_size_in_bytes as u64 <= self.buffer_def.size);

        let dst = self.map_buffer()?;
        unsafe {
            std::ptr::copy_nonoverlapping(
                data.as_ptr() as *const u8,
                dst.add(buffer_byte_offset as usize),
                data_size_in_bytes,
            );
        }
        self.unmap_buffer()?;

        Ok(())
    }

    /// Update the externally supplied residency priority for this buffer's backing memory
    pub fn set_memory_priority(
        &self,
        priority: f32,
    ) {
        self.device_context.device_ops().set_eviction_priority(
            self.dx11_resource(),
            conversions::eviction_priority(priority),
        );
    }
}
