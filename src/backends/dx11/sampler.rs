use crate::dx11::OnyxDeviceContextDx11;
use crate::{OnyxResult, OnyxSamplerDef};
use std::sync::Arc;

use super::internal::conversions;
use super::internal::native::NativeSampler;

#[derive(Debug)]
pub struct OnyxSamplerDx11Inner {
    device_context: OnyxDeviceContextDx11,
    sampler: NativeSampler,
}

impl Drop for OnyxSamplerDx11Inner {
    fn drop(&mut self) {
        log::trace!("destroying OnyxSamplerDx11 {:?}", self.sampler);
        self.device_context.device_ops().destroy_object(self.sampler.0);
    }
}

#[derive(Clone, Debug)]
pub struct OnyxSamplerDx11 {
    inner: Arc<OnyxSamplerDx11Inner>,
}

impl OnyxSamplerDx11 {
    pub fn new(
        device_context: &OnyxDeviceContextDx11,
        sampler_def: &OnyxSamplerDef,
    ) -> OnyxResult<Self> {
        let desc = conversions::sampler_desc(sampler_def);
        let sampler = device_context.device_ops().create_sampler_state(&desc)?;
        log::trace!("created OnyxSamplerDx11 {:?}", sampler);

        Ok(OnyxSamplerDx11 {
            inner: Arc::new(OnyxSamplerDx11Inner {
                device_context: device_context.clone(),
                sampler,
            }),
        })
    }

    pub fn dx11_sampler(&self) -> NativeSampler {
        self.inner.sampler
    }
}
