#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxFenceDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxFenceEmpty;
use crate::{OnyxFenceStatus, OnyxResult};

/// The only completion-signaling primitive: signaled by queue submissions, waited on by the CPU.
#[derive(Debug)]
pub enum OnyxFence {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxFenceDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxFenceEmpty),
}

impl OnyxFence {
    pub fn wait(&self) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxFence::Dx11(inner) => inner.wait(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxFence::Empty(inner) => inner.wait(),
        }
    }

    pub fn get_fence_status(&self) -> OnyxResult<OnyxFenceStatus> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxFence::Dx11(inner) => inner.get_fence_status(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxFence::Empty(inner) => inner.get_fence_status(),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_fence(&self) -> Option<&OnyxFenceDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxFence::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxFence::Empty(_) => None,
        }
    }

    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    pub fn empty_fence(&self) -> Option<&OnyxFenceEmpty> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxFence::Dx11(_) => None,
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxFence::Empty(inner) => Some(inner),
        }
    }
}
