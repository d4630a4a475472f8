#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxDescriptorDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxDescriptorEmpty;
use crate::OnyxDescriptorClass;

/// A resolved resource view plus the metadata the binding engine consumes
#[derive(Clone, Debug)]
pub enum OnyxDescriptor {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxDescriptorDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxDescriptorEmpty),
}

impl OnyxDescriptor {
    pub fn class(&self) -> OnyxDescriptorClass {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptor::Dx11(inner) => inner.class(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptor::Empty(inner) => inner.class(),
        }
    }

    pub fn is_integer_format(&self) -> bool {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptor::Dx11(inner) => inner.is_integer_format(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptor::Empty(inner) => inner.is_integer_format(),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_descriptor(&self) -> Option<&OnyxDescriptorDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptor::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptor::Empty(_) => None,
        }
    }

    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    pub fn empty_descriptor(&self) -> Option<&OnyxDescriptorEmpty> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDescriptor::Dx11(_) => None,
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDescriptor::Empty(inner) => Some(inner),
        }
    }
}
