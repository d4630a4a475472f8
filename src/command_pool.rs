#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxCommandPoolDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxCommandPoolEmpty;
use crate::{OnyxCommandBuffer, OnyxCommandBufferDef, OnyxResult};

pub enum OnyxCommandPool {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxCommandPoolDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxCommandPoolEmpty),
}

impl OnyxCommandPool {
    pub fn create_command_buffer(
        &self,
        command_buffer_def: &OnyxCommandBufferDef,
    ) -> OnyxResult<OnyxCommandBuffer> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandPool::Dx11(inner) => {
                OnyxCommandBuffer::Dx11(inner.create_command_buffer(command_buffer_def)?)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandPool::Empty(inner) => {
                OnyxCommandBuffer::Empty(inner.create_command_buffer(command_buffer_def)?)
            }
        })
    }

    pub fn reset_command_pool(&self) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandPool::Dx11(inner) => inner.reset_command_pool(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandPool::Empty(inner) => inner.reset_command_pool(),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_command_pool(&self) -> Option<&OnyxCommandPoolDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxCommandPool::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxCommandPool::Empty(_) => None,
        }
    }
}
