#[cfg(feature = "onyx-dx11")]
use crate::dx11::{OnyxApiDefDx11, OnyxApiDx11};
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxApiEmpty;
use crate::*;

/// Primary entry point to using the API. Use the `new_*` functions to initialize the desired
/// backend.
///
/// **This API object must persist for the lifetime of all objects created through it.**
///
/// Once the API object is created, use `device_context()` to obtain a cloneable handle to the
/// device. The `OnyxDeviceContext` is the primary way of interacting with the API once it has
/// been initialized.
pub enum OnyxApi {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxApiDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxApiEmpty),
}

impl OnyxApi {
    /// Create a device using the "default" backend for the platform.
    ///
    /// # Safety
    ///
    /// GPU programming is fundamentally unsafe, so all onyx APIs that interact with the GPU
    /// should be considered unsafe. However, onyx APIs are only gated by unsafe if they can
    /// cause undefined behavior on the CPU for reasons other than interacting with the GPU.
    #[allow(unreachable_code)]
    pub unsafe fn new(_api_def: &OnyxApiDef) -> OnyxResult<Self> {
        #[cfg(feature = "onyx-dx11")]
        {
            return OnyxApi::new_dx11(_api_def, &Default::default());
        }

        return Err(
            "Onyx was compiled with no backend feature flag. Enable the onyx-dx11 feature",
        )?;
    }

    /// Initialize a device using D3D11
    ///
    /// # Safety
    ///
    /// GPU programming is fundamentally unsafe, so all onyx APIs that interact with the GPU
    /// should be considered unsafe. However, onyx APIs are only gated by unsafe if they can
    /// cause undefined behavior on the CPU for reasons other than interacting with the GPU.
    #[cfg(feature = "onyx-dx11")]
    pub unsafe fn new_dx11(
        api_def: &OnyxApiDef,
        dx11_api_def: &OnyxApiDefDx11,
    ) -> OnyxResult<Self> {
        Ok(OnyxApi::Dx11(OnyxApiDx11::new(api_def, dx11_api_def)?))
    }

    /// Create a cloneable handle to the device. Most of the interaction with the graphics
    /// backend is done through this handle.
    pub fn device_context(&self) -> OnyxDeviceContext {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxApi::Dx11(inner) => OnyxDeviceContext::Dx11(inner.device_context().clone()),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxApi::Empty(inner) => OnyxDeviceContext::Empty(inner.device_context().clone()),
        }
    }

    /// Destroys the graphics API instance. Any `OnyxDeviceContext` created through this API, and
    /// any object created through those device contexts, must be dropped before calling
    /// destroy().
    ///
    /// `destroy()` is automatically called if OnyxApi is dropped and it has not yet been called,
    /// so it is not necessary to call this function explicitly.
    pub fn destroy(&mut self) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxApi::Dx11(inner) => inner.destroy(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxApi::Empty(inner) => inner.destroy(),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_api(&self) -> Option<&OnyxApiDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxApi::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxApi::Empty(_) => None,
        }
    }
}
