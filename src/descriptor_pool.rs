#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxDescriptorPoolDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxDescriptorPoolEmpty;
use crate::{OnyxDescriptorSet, OnyxPipelineLayout, OnyxResult};

/// A recyclable pool of descriptor storage. Sets allocated from it borrow the pool's storage;
/// `reset` reclaims everything at once for reuse across frames.
#[derive(Clone, Debug)]
pub enum OnyxDescriptorPool {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxDescriptorPoolDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxDescriptorPoolEmpty),
}

impl OnyxDescriptorPool {
    pub fn allocate_descriptor_set(
        &self,
        pipeline_layout: &OnyxPipelineLayout,
        set_index: u32,
    ) -> OnyxResult<OnyxDescriptorSet> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptorPool::Dx11(inner) => OnyxDescriptorSet::Dx11(
                inner.allocate_descriptor_set(
                    pipeline_layout.dx11_pipeline_layout().unwrap(),
                    set_index,
                )?,
            ),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptorPool::Empty(inner) => OnyxDescriptorSet::Empty(
                inner.allocate_descriptor_set(
                    pipeline_layout.empty_pipeline_layout().unwrap(),
                    set_index,
                )?,
            ),
        })
    }

    /// Recycle the pool. All sets allocated from it become stale and must be re-allocated.
    pub fn reset(&self) {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptorPool::Dx11(inner) => inner.reset(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptorPool::Empty(inner) => inner.reset(),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_descriptor_pool(&self) -> Option<&OnyxDescriptorPoolDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptorPool::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptorPool::Empty(_) => None,
        }
    }
}
