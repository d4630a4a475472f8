#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxDescriptorSetDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxDescriptorSetEmpty;
use crate::{OnyxDescriptor, OnyxResult};

/// A reusable record of resolved descriptors over one descriptor-set slot of a pipeline layout
#[derive(Clone, Debug)]
pub enum OnyxDescriptorSet {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxDescriptorSetDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxDescriptorSetEmpty),
}

impl OnyxDescriptorSet {
    pub fn set_index(&self) -> u32 {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptorSet::Dx11(inner) => inner.set_index(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptorSet::Empty(inner) => inner.set_index(),
        }
    }

    pub fn descriptor_count(&self) -> u32 {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptorSet::Dx11(inner) => inner.descriptor_count(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptorSet::Empty(inner) => inner.descriptor_count(),
        }
    }

    /// Write descriptors into one declared range, indexed in declaration order
    pub fn update_descriptors(
        &self,
        range_index: u32,
        offset_in_range: u32,
        descriptors: &[&OnyxDescriptor],
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptorSet::Dx11(inner) => {
                let descriptors: Vec<_> = descriptors
                    .iter()
                    .map(|d| d.dx11_descriptor().unwrap())
                    .collect();
                inner.update_descriptors(range_index, offset_in_range, &descriptors)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptorSet::Empty(inner) => {
                let descriptors: Vec<_> = descriptors
                    .iter()
                    .map(|d| d.empty_descriptor().unwrap())
                    .collect();
                inner.update_descriptors(range_index, offset_in_range, &descriptors)
            }
        }
    }

    /// Write dynamic-constant-buffer descriptors, indexed in declaration order
    pub fn update_dynamic_constant_buffers(
        &self,
        first: u32,
        descriptors: &[&OnyxDescriptor],
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptorSet::Dx11(inner) => {
                let descriptors: Vec<_> = descriptors
                    .iter()
                    .map(|d| d.dx11_descriptor().unwrap())
                    .collect();
                inner.update_dynamic_constant_buffers(first, &descriptors)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptorSet::Empty(inner) => {
                let descriptors: Vec<_> = descriptors
                    .iter()
                    .map(|d| d.empty_descriptor().unwrap())
                    .collect();
                inner.update_dynamic_constant_buffers(first, &descriptors)
            }
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_descriptor_set(&self) -> Option<&OnyxDescriptorSetDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptorSet::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptorSet::Empty(_) => None,
        }
    }

    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    pub fn empty_descriptor_set(&self) -> Option<&OnyxDescriptorSetEmpty> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptorSet::Dx11(_) => None,
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptorSet::Empty(inner) => Some(inner),
        }
    }
}
