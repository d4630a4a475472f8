#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxBufferDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxBufferEmpty;
use crate::{OnyxBufferDef, OnyxResult};

#[derive(Debug)]
pub enum OnyxBuffer {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxBufferDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxBufferEmpty),
}

impl OnyxBuffer {
    pub fn buffer_def(&self) -> &OnyxBufferDef {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxBuffer::Dx11(inner) => inner.buffer_def(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxBuffer::Empty(inner) => inner.buffer_def(),
        }
    }

    pub fn map_buffer(&self) -> OnyxResult<*mut u8> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxBuffer::Dx11(inner) => inner.map_buffer(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxBuffer::Empty(inner) => inner.map_buffer(),
        }
    }

    pub fn unmap_buffer(&self) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxBuffer::Dx11(inner) => inner.unmap_buffer(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxBuffer::Empty(inner) => inner.unmap_buffer(),
        }
    }

    pub fn copy_to_host_visible_buffer<T: Copy>(
        &self,
        data: &[T],
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxBuffer::Dx11(inner) => inner.copy_to_host_visible_buffer(data),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxBuffer::Empty(inner) => inner.copy_to_host_visible_buffer(data),
        }
    }

    pub fn copy_to_host_visible_buffer_with_offset<T: Copy>(
        &self,
        data: &[T],
        buffer_byte_offset: u64,
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxBuffer::Dx11(inner) => {
                inner.copy_to_host_visible_buffer_with_offset(data, buffer_byte_offset)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxBuffer::Empty(inner) => {
                inner.copy_to_host_visible_buffer_with_offset(data, buffer_byte_offset)
            }
        }
    }

    /// Update the externally supplied residency priority (-1.0 lowest .. 1.0 highest) for the
    /// buffer's backing memory
    pub fn set_memory_priority(
        &self,
        priority: f32,
    ) {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxBuffer::Dx11(inner) => inner.set_memory_priority(priority),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxBuffer::Empty(inner) => inner.set_memory_priority(priority),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_buffer(&self) -> Option<&OnyxBufferDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxBuffer::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxBuffer::Empty(_) => None,
        }
    }

    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    pub fn empty_buffer(&self) -> Option<&OnyxBufferEmpty> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxBuffer::Dx11(_) => None,
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxBuffer::Empty(inner) => Some(inner),
        }
    }
}
