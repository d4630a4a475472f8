use crate::{OnyxApiDef, OnyxResult};
use std::sync::Arc;

use crate::dx11::{Dx11DeviceOps, OnyxDeviceContextDx11, OnyxDeviceContextDx11Inner};

/// Dx11-specific configuration
#[derive(Default)]
pub struct OnyxApiDefDx11 {
    /// Force the software op-stream command buffer even when the driver supports real deferred
    /// command lists
    pub force_emulated_command_buffers: bool,
}

pub struct OnyxApiDx11 {
    device_context: Option<OnyxDeviceContextDx11>,
}

impl Drop for OnyxApiDx11 {
    fn drop(&mut self) {
        self.destroy().unwrap();
    }
}

impl OnyxApiDx11 {
    /// Create the API over the default hardware adapter.
    ///
    /// # Safety
    ///
    /// GPU programming is fundamentally unsafe. The API object must outlive every object created
    /// through it.
    #[cfg(windows)]
    pub unsafe fn new(
        _api_def: &OnyxApiDef,
        dx11_api_def: &OnyxApiDefDx11,
    ) -> OnyxResult<Self> {
        let device_ops = super::ffi::FfiDevice::new()?;
        Self::from_device_ops(device_ops, dx11_api_def)
    }

    #[cfg(not(windows))]
    pub unsafe fn new(
        _api_def: &OnyxApiDef,
        _dx11_api_def: &OnyxApiDefDx11,
    ) -> OnyxResult<Self> {
        Err("The D3D11 backend requires a native device. On non-Windows platforms, wrap an \
             existing device with OnyxApiDx11::from_device_ops"
            .into())
    }

    /// Create the API over an already-created native device (or a software implementation of the
    /// native surface).
    pub fn from_device_ops(
        device_ops: Arc<dyn Dx11DeviceOps>,
        dx11_api_def: &OnyxApiDefDx11,
    ) -> OnyxResult<Self> {
        log::trace!("Creating OnyxApiDx11");

        let inner = Arc::new(OnyxDeviceContextDx11Inner::new(
            device_ops,
            dx11_api_def.force_emulated_command_buffers,
        )?);
        let device_context = OnyxDeviceContextDx11::new(inner)?;

        Ok(OnyxApiDx11 {
            device_context: Some(device_context),
        })
    }

    pub fn device_context(&self) -> &OnyxDeviceContextDx11 {
        self.device_context.as_ref().unwrap()
    }

    pub fn destroy(&mut self) -> OnyxResult<()> {
        if let Some(device_context) = self.device_context.take() {
            // Clean up the device context if the caller kept no other clones of it
            let inner = device_context.inner.clone();
            std::mem::drop(device_context);

            let _strong_count = Arc::strong_count(&inner);

            #[cfg(debug_assertions)]
            #[cfg(feature = "track-device-contexts")]
            {
                if _strong_count > 1 {
                    let all_contexts = inner.all_contexts.lock().unwrap();
                    for (k, v) in all_contexts.iter() {
                        let mut v = v.clone();
                        v.resolve();
                        log::warn!("device context {} not dropped before destroy: {:?}", k, v);
                    }
                }
            }
        }

        Ok(())
    }
}
