use crate::dx11::OnyxDeviceContextDx11;
use crate::{OnyxError, OnyxResult};
use std::sync::Arc;

/// DXBC bytecode. Native shader objects are created per stage at pipeline creation time because
/// the stage is not known until the shader is attached to one.
#[derive(Debug)]
pub struct OnyxShaderModuleDx11Inner {
    bytecode: Vec<u8>,
}

#[derive(Clone, Debug)]
pub struct OnyxShaderModuleDx11 {
    inner: Arc<OnyxShaderModuleDx11Inner>,
}

impl OnyxShaderModuleDx11 {
    pub fn new(
        _device_context: &OnyxDeviceContextDx11,
        bytecode: &[u8],
    ) -> OnyxResult<Self> {
        if bytecode.is_empty() {
            return Err(OnyxError::InvalidArgument(
                "shader module bytecode is empty".to_string(),
            ));
        }

        Ok(OnyxShaderModuleDx11 {
            inner: Arc::new(OnyxShaderModuleDx11Inner {
                bytecode: bytecode.to_vec(),
            }),
        })
    }

    pub fn bytecode(&self) -> &[u8] {
        &self.inner.bytecode
    }
}
