use crate::dx11::OnyxDeviceContextDx11;
use crate::{OnyxError, OnyxResult, OnyxShaderStageDef, OnyxShaderStageFlags};
use std::sync::Arc;

#[derive(Debug)]
pub struct OnyxShaderDx11Inner {
    stage_flags: OnyxShaderStageFlags,
    stages: Vec<OnyxShaderStageDef>,
}

/// A set of shader stages that will be attached to a pipeline together
#[derive(Clone, Debug)]
pub struct OnyxShaderDx11 {
    inner: Arc<OnyxShaderDx11Inner>,
}

impl OnyxShaderDx11 {
    pub fn new(
        _device_context: &OnyxDeviceContextDx11,
        stages: Vec<OnyxShaderStageDef>,
    ) -> OnyxResult<Self> {
        let mut stage_flags = OnyxShaderStageFlags::NONE;
        for stage in &stages {
            if stage_flags.intersects(stage.shader_stage) {
                return Err(OnyxError::InvalidArgument(format!(
                    "shader stage {:?} supplied more than once",
                    stage.shader_stage
                )));
            }
            stage_flags |= stage.shader_stage;
        }

        if stage_flags.intersects(OnyxShaderStageFlags::COMPUTE)
            && stage_flags != OnyxShaderStageFlags::COMPUTE
        {
            return Err(OnyxError::InvalidArgument(
                "a compute shader cannot be combined with graphics stages".to_string(),
            ));
        }

        Ok(OnyxShaderDx11 {
            inner: Arc::new(OnyxShaderDx11Inner {
                stage_flags,
                stages,
            }),
        })
    }

    pub fn stages(&self) -> &[OnyxShaderStageDef] {
        &self.inner.stages
    }

    pub fn stage_flags(&self) -> OnyxShaderStageFlags {
        self.inner.stage_flags
    }

    pub fn stage_def(
        &self,
        stage: OnyxShaderStageFlags,
    ) -> Option<&OnyxShaderStageDef> {
        self.inner
            .stages
            .iter()
            .find(|s| s.shader_stage.intersects(stage))
    }
}
