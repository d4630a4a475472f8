#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxTextureDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxTextureEmpty;
use crate::OnyxTextureDef;

#[derive(Clone, Debug)]
pub enum OnyxTexture {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxTextureDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxTextureEmpty),
}

impl OnyxTexture {
    pub fn texture_def(&self) -> &OnyxTextureDef {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxTexture::Dx11(inner) => inner.texture_def(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxTexture::Empty(inner) => inner.texture_def(),
        }
    }

    /// Update the externally supplied residency priority (-1.0 lowest .. 1.0 highest) for the
    /// texture's backing memory
    pub fn set_memory_priority(
        &self,
        priority: f32,
    ) {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxTexture::Dx11(inner) => inner.set_memory_priority(priority),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxTexture::Empty(inner) => inner.set_memory_priority(priority),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_texture(&self) -> Option<&OnyxTextureDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxTexture::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxTexture::Empty(_) => None,
        }
    }

    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    pub fn empty_texture(&self) -> Option<&OnyxTextureEmpty> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxTexture::Dx11(_) => None,
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxTexture::Empty(inner) => Some(inner),
        }
    }
}
