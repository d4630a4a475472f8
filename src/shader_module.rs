#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxShaderModuleDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxShaderModuleEmpty;

/// Shader bytecode in the backend's native format
#[derive(Clone, Debug)]
pub enum OnyxShaderModule {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxShaderModuleDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxShaderModuleEmpty),
}

impl OnyxShaderModule {
    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_shader_module(&self) -> Option<&OnyxShaderModuleDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxShaderModule::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxShaderModule::Empty(_) => None,
        }
    }
}
