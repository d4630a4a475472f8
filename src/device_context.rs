#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxDeviceContextDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxDeviceContextEmpty;
use crate::*;

/// A cloneable handle to the device. All resources are created through it, and it is intended
/// to be safely shared across threads.
#[derive(Clone)]
pub enum OnyxDeviceContext {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxDeviceContextDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxDeviceContextEmpty),
}

impl OnyxDeviceContext {
    pub fn device_info(&self) -> &OnyxDeviceInfo {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => inner.device_info(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => inner.device_info(),
        }
    }

    pub fn create_queue(
        &self,
        queue_type: OnyxQueueType,
    ) -> OnyxResult<OnyxQueue> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => OnyxQueue::Dx11(inner.create_queue(queue_type)?),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => OnyxQueue::Empty(inner.create_queue(queue_type)?),
        })
    }

    pub fn create_fence(&self) -> OnyxResult<OnyxFence> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => OnyxFence::Dx11(inner.create_fence()?),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => OnyxFence::Empty(inner.create_fence()?),
        })
    }

    pub fn create_sampler(
        &self,
        sampler_def: &OnyxSamplerDef,
    ) -> OnyxResult<OnyxSampler> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => OnyxSampler::Dx11(inner.create_sampler(sampler_def)?),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => {
                OnyxSampler::Empty(inner.create_sampler(sampler_def)?)
            }
        })
    }

    pub fn create_texture(
        &self,
        texture_def: &OnyxTextureDef,
    ) -> OnyxResult<OnyxTexture> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => OnyxTexture::Dx11(inner.create_texture(texture_def)?),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => {
                OnyxTexture::Empty(inner.create_texture(texture_def)?)
            }
        })
    }

    pub fn create_buffer(
        &self,
        buffer_def: &OnyxBufferDef,
    ) -> OnyxResult<OnyxBuffer> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => OnyxBuffer::Dx11(inner.create_buffer(buffer_def)?),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => OnyxBuffer::Empty(inner.create_buffer(buffer_def)?),
        })
    }

    pub fn create_shader(
        &self,
        stages: Vec<OnyxShaderStageDef>,
    ) -> OnyxResult<OnyxShader> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => OnyxShader::Dx11(inner.create_shader(stages)?),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => OnyxShader::Empty(inner.create_shader(stages)?),
        })
    }

    pub fn create_shader_module(
        &self,
        bytecode: &[u8],
    ) -> OnyxResult<OnyxShaderModule> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => {
                OnyxShaderModule::Dx11(inner.create_shader_module(bytecode)?)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => {
                OnyxShaderModule::Empty(inner.create_shader_module(bytecode)?)
            }
        })
    }

    pub fn create_pipeline_layout(
        &self,
        pipeline_layout_def: &OnyxPipelineLayoutDef,
    ) -> OnyxResult<OnyxPipelineLayout> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => {
                OnyxPipelineLayout::Dx11(inner.create_pipeline_layout(pipeline_layout_def)?)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => {
                OnyxPipelineLayout::Empty(inner.create_pipeline_layout(pipeline_layout_def)?)
            }
        })
    }

    pub fn create_descriptor_pool(
        &self,
        descriptor_pool_def: &OnyxDescriptorPoolDef,
    ) -> OnyxResult<OnyxDescriptorPool> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => {
                OnyxDescriptorPool::Dx11(inner.create_descriptor_pool(descriptor_pool_def)?)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => {
                OnyxDescriptorPool::Empty(inner.create_descriptor_pool(descriptor_pool_def)?)
            }
        })
    }

    pub fn create_descriptor(
        &self,
        descriptor_def: &OnyxDescriptorDef,
    ) -> OnyxResult<OnyxDescriptor> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => {
                OnyxDescriptor::Dx11(inner.create_descriptor(descriptor_def)?)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => {
                OnyxDescriptor::Empty(inner.create_descriptor(descriptor_def)?)
            }
        })
    }

    pub fn create_graphics_pipeline(
        &self,
        graphics_pipeline_def: &OnyxGraphicsPipelineDef,
    ) -> OnyxResult<OnyxPipeline> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => {
                OnyxPipeline::Dx11(inner.create_graphics_pipeline(graphics_pipeline_def)?)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => {
                OnyxPipeline::Empty(inner.create_graphics_pipeline(graphics_pipeline_def)?)
            }
        })
    }

    pub fn create_compute_pipeline(
        &self,
        compute_pipeline_def: &OnyxComputePipelineDef,
    ) -> OnyxResult<OnyxPipeline> {
        Ok(match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => {
                OnyxPipeline::Dx11(inner.create_compute_pipeline(compute_pipeline_def)?)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => {
                OnyxPipeline::Empty(inner.create_compute_pipeline(compute_pipeline_def)?)
            }
        })
    }

    pub fn wait_for_fences(
        &self,
        fences: &[&OnyxFence],
    ) -> OnyxResult<()> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => {
                let fences: Vec<_> = fences.iter().map(|f| f.dx11_fence().unwrap()).collect();
                inner.wait_for_fences(&fences)
            }
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(inner) => {
                let fences: Vec<_> = fences.iter().map(|f| f.empty_fence().unwrap()).collect();
                inner.wait_for_fences(&fences)
            }
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_device_context(&self) -> Option<&OnyxDeviceContextDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxDeviceContext::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxDeviceContext::Empty(_) => None,
        }
    }
}
