#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxSamplerDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxSamplerEmpty;

#[derive(Clone, Debug)]
pub enum OnyxSampler {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxSamplerDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxSamplerEmpty),
}

impl OnyxSampler {
    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_sampler(&self) -> Option<&OnyxSamplerDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxSampler::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxSampler::Empty(_) => None,
        }
    }
}
