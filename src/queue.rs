#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxQueueDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxQueueEmpty;
use crate::{OnyxCommandBuffer, OnyxCommandPool, OnyxCommandPoolDef, OnyxFence, OnyxResult};

/// The submission path. A submission drains wait fences, then command buffers, then signal
/// fences, in that strict order.
#[derive(Clone, Debug)]
pub enum OnyxQueue {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxQueueDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxQueueEmpty),
}

impl OnyxQueue {
    pub fn queue_id(&self) -> u32 {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxQueue::Dx11(inner) => inner.queue_id(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxQueue::Empty(inner) => inner.queue_id(),
        }
    }

    pub fn queue_type(&self) -> crate::OnyxQueueType {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxQueue::Dx11(inner) => inner.queue_type(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxQueue::Empty(inner) => inner.queue_type(),
        }
    }

    pub fn create_command_pool(
        &self,
        command_pool_def: &OnyxCommandPoolDef,
    ) -> OnyxResult<OnyxCommandPool> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxQueue::Dx11(inner) => {
                OnyxCommandPool::Dx11(inner.create_command_pool(command_pool_def)?)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxQueue::Empty(inner) => {
                OnyxCommandPool::Empty(inner.create_command_pool(command_pool_def)?)
            }
        })
    }

    pub fn submit(
        &self,
        command_buffers: &[&OnyxCommandBuffer],
        wait_fences: &[&OnyxFence],
        signal_fences: &[&OnyxFence],
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxQueue::Dx11(inner) => {
                let command_buffers: Vec<_> = command_buffers
                    .iter()
                    .map(|c| c.dx11_command_buffer().unwrap())
                    .collect();
                let wait_fences: Vec<_> =
                    wait_fences.iter().map(|f| f.dx11_fence().unwrap()).collect();
                let signal_fences: Vec<_> = signal_fences
                    .iter()
                    .map(|f| f.dx11_fence().unwrap())
                    .collect();
                inner.submit(&command_buffers, &wait_fences, &signal_fences)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxQueue::Empty(inner) => {
                let command_buffers: Vec<_> = command_buffers
                    .iter()
                    .map(|c| c.empty_command_buffer().unwrap())
                    .collect();
                let wait_fences: Vec<_> = wait_fences
                    .iter()
                    .map(|f| f.empty_fence().unwrap())
                    .collect();
                let signal_fences: Vec<_> = signal_fences
                    .iter()
                    .map(|f| f.empty_fence().unwrap())
                    .collect();
                inner.submit(&command_buffers, &wait_fences, &signal_fences)
            }
        }
    }

    pub fn wait_for_queue_idle(&self) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxQueue::Dx11(inner) => inner.wait_for_queue_idle(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxQueue::Empty(inner) => inner.wait_for_queue_idle(),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_queue(&self) -> Option<&OnyxQueueDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxQueue::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxQueue::Empty(_) => None,
        }
    }
}
