#[cfg(feature = "onyx-dx11")]
use crate::dx11::OnyxPipelineDx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
use crate::empty::OnyxPipelineEmpty;
use crate::OnyxPipelineType;

#[derive(Clone, Debug)]
pub enum OnyxPipeline {
    #[cfg(feature = "onyx-dx11")]
    Dx11(OnyxPipelineDx11),
    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    Empty(OnyxPipelineEmpty),
}

impl OnyxPipeline {
    pub fn pipeline_type(&self) -> OnyxPipelineType {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxPipeline::Dx11(inner) => inner.pipeline_type(),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxPipeline::Empty(inner) => inner.pipeline_type(),
        }
    }

    /// Get the underlying dx11 API object. This provides access to any internally created
    /// dx11 objects.
    #[cfg(feature = "onyx-dx11")]
    pub fn dx11_pipeline(&self) -> Option<&OnyxPipelineDx11> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxPipeline::Dx11(inner) => Some(inner),
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxPipeline::Empty(_) => None,
        }
    }

    #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
    pub fn empty_pipeline(&self) -> Option<&OnyxPipelineEmpty> {
        match self {
            #[cfg(feature = "onyx-dx11")]
            OnyxPipeline::Dx11(_) => None,
            #[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
            OnyxPipeline::Empty(inner) => Some(inner),
        }
    }
}
