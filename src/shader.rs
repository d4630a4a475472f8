#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxShaderDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxShaderEmpty;
use crate::OnyxShaderStageFlags;

/// A set of shader stages that are attached to a pipeline together
#[derive(Clone, Debug)]
pub enum OnyxShader {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxShaderDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxShaderEmpty),
}

impl OnyxShader {
    pub fn stage_flags(&self) -> OnyxShaderStageFlags {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxShader::Dx11(inner) => inner.stage_flags(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxShader::Empty(inner) => inner.stage_flags(),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_shader(&self) -> Option<&OnyxShaderDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxShader::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxShader::Empty(_) => None,
        }
    }
}
