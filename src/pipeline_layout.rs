#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxPipelineLayoutDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxPipelineLayoutEmpty;
use crate::{OnyxPipelineType, OnyxResult};

/// The compiled binding interface of a pipeline: descriptor set layouts, dynamic constant
/// buffers, and push constants, translated into native binding ranges.
#[derive(Clone, Debug)]
pub enum OnyxPipelineLayout {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxPipelineLayoutDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxPipelineLayoutEmpty),
}

impl OnyxPipelineLayout {
    /// Returns what kind of pipeline this is
    pub fn pipeline_type(&self) -> OnyxPipelineType {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxPipelineLayout::Dx11(inner) => inner.pipeline_type(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxPipelineLayout::Empty(inner) => inner.pipeline_type(),
        }
    }

    pub fn set_count(&self) -> u32 {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxPipelineLayout::Dx11(inner) => inner.set_count(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxPipelineLayout::Empty(inner) => inner.set_count(),
        }
    }

    /// Total descriptors a set built over the given set slot holds
    pub fn set_descriptor_count(
        &self,
        set_index: u32,
    ) -> OnyxResult<u32> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxPipelineLayout::Dx11(inner) => inner.set_descriptor_count(set_index),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxPipelineLayout::Empty(inner) => inner.set_descriptor_count(set_index),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_pipeline_layout(&self) -> Option<&OnyxPipelineLayoutDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxPipelineLayout::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxPipelineLayout::Empty(_) => None,
        }
    }

    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    pub fn empty_pipeline_layout(&self) -> Option<&OnyxPipelineLayoutEmpty> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxPipelineLayout::Dx11(_) => None,
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxPipelineLayout::Empty(inner) => Some(inner),
        }
    }
}
