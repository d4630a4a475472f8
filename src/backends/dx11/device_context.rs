use crate::{
    OnyxBufferDef, OnyxComputePipelineDef, OnyxDescriptorDef, OnyxDescriptorPoolDef,
    OnyxDeviceContext, OnyxDeviceInfo, OnyxGraphicsPipelineDef, OnyxPipelineLayoutDef,
    OnyxQueueType, OnyxResult, OnyxSamplerDef, OnyxShaderStageDef, OnyxTextureDef,
};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::dx11::{
    OnyxBufferDx11, OnyxDescriptorDx11, OnyxDescriptorPoolDx11, OnyxFenceDx11,
    OnyxPipelineDx11, OnyxPipelineLayoutDx11, OnyxQueueDx11, OnyxSamplerDx11, OnyxShaderDx11,
    OnyxShaderModuleDx11, OnyxTextureDx11,
};

use super::d3d11;
use super::internal::native::{Dx11ContextOps, Dx11DeviceOps};

#[cfg(debug_assertions)]
#[cfg(feature = "track-device-contexts")]
use std::sync::atomic::AtomicU64;
use std::sync::atomic::{AtomicBool, Ordering};

pub struct OnyxDeviceContextDx11Inner {
    pub(crate) device_info: OnyxDeviceInfo,

    force_emulated_command_buffers: bool,

    device_ops: Arc<dyn Dx11DeviceOps>,
    immediate_context: Arc<dyn Dx11ContextOps>,

    // The process-wide critical section entered around every immediate-context call that could
    // race with deferred recording or mapping on another thread
    immediate_context_lock: Mutex<()>,

    destroyed: AtomicBool,

    #[cfg(debug_assertions)]
    #[cfg(feature = "track-device-contexts")]
    next_create_index: AtomicU64,

    #[cfg(debug_assertions)]
    #[cfg(feature = "track-device-contexts")]
    pub(crate) all_contexts: Mutex<fnv::FnvHashMap<u64, backtrace::Backtrace>>,
}

impl std::fmt::Debug for OnyxDeviceContextDx11Inner {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("OnyxDeviceContextDx11Inner")
            .field("device_info", &self.device_info)
            .finish()
    }
}

impl Drop for OnyxDeviceContextDx11Inner {
    fn drop(&mut self) {
        if !self.destroyed.swap(true, Ordering::AcqRel) {
            log::trace!("destroying device");
        }
    }
}

impl OnyxDeviceContextDx11Inner {
    pub fn new(
        device_ops: Arc<dyn Dx11DeviceOps>,
        force_emulated_command_buffers: bool,
    ) -> OnyxResult<Self> {
        let feature_level = device_ops.feature_level();
        let supports_deferred_command_lists = device_ops.check_command_list_support();
        let supports_constant_buffer_offsets = feature_level.0 >= d3d11::D3D_FEATURE_LEVEL_11_1.0;

        if !supports_deferred_command_lists {
            log::warn!(
                "Driver does not support deferred command lists, command buffers will be emulated"
            );
        }
        if !supports_constant_buffer_offsets {
            log::warn!(
                "Feature level {:#x} has no bounded-range constant buffer binds, dynamic \
                 constant buffer offsets will not work correctly",
                feature_level.0
            );
        }

        let device_info = OnyxDeviceInfo {
            supports_multithreaded_usage: true,
            supports_deferred_command_lists,
            supports_constant_buffer_offsets,
            // The bounded-range constant buffer binds work in 16-constant granularity
            min_uniform_buffer_offset_alignment: 256,
            min_storage_buffer_offset_alignment: 4,
            // UpdateSubresource imposes no placement alignment
            upload_buffer_texture_alignment: 1,
            upload_buffer_texture_row_alignment: 1,
            max_vertex_attribute_count: 32,
        };

        let immediate_context = device_ops.immediate_context();

        #[cfg(debug_assertions)]
        #[cfg(feature = "track-device-contexts")]
        let all_contexts = {
            let create_backtrace = backtrace::Backtrace::new_unresolved();
            let mut all_contexts = fnv::FnvHashMap::<u64, backtrace::Backtrace>::default();
            all_contexts.insert(0, create_backtrace);
            all_contexts
        };

        Ok(OnyxDeviceContextDx11Inner {
            device_info,
            force_emulated_command_buffers,
            device_ops,
            immediate_context,
            immediate_context_lock: Mutex::new(()),
            destroyed: AtomicBool::new(false),

            #[cfg(debug_assertions)]
            #[cfg(feature = "track-device-contexts")]
            all_contexts: Mutex::new(all_contexts),

            #[cfg(debug_assertions)]
            #[cfg(feature = "track-device-contexts")]
            next_create_index: AtomicU64::new(1),
        })
    }
}

pub struct OnyxDeviceContextDx11 {
    pub(crate) inner: Arc<OnyxDeviceContextDx11Inner>,
    #[cfg(debug_assertions)]
    #[cfg(feature = "track-device-contexts")]
    pub(crate) create_index: u64,
}

impl std::fmt::Debug for OnyxDeviceContextDx11 {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter,
    ) -> std::fmt::Result {
        f.debug_struct("OnyxDeviceContextDx11").finish()
    }
}

impl Clone for OnyxDeviceContextDx11 {
    fn clone(&self) -> Self {
        #[cfg(debug_assertions)]
        #[cfg(feature = "track-device-contexts")]
        let create_index = {
            let create_index = self.inner.next_create_index.fetch_add(1, Ordering::Relaxed);

            let create_backtrace = backtrace::Backtrace::new_unresolved();
            self.inner
                .all_contexts
                .lock()
                .unwrap()
                .insert(create_index, create_backtrace);

            log::trace!("Cloned OnyxDeviceContextDx11 create_index {}", create_index);
            create_index
        };

        OnyxDeviceContextDx11 {
            inner: self.inner.clone(),
            #[cfg(debug_assertions)]
            #[cfg(feature = "track-device-contexts")]
            create_index,
        }
    }
}

impl Drop for OnyxDeviceContextDx11 {
    fn drop(&mut self) {
        #[cfg(debug_assertions)]
        #[cfg(feature = "track-device-contexts")]
        {
            self.inner
                .all_contexts
                .lock()
                .unwrap()
                .remove(&self.create_index);
        }
    }
}

impl Into<OnyxDeviceContext> for OnyxDeviceContextDx11 {
    fn into(self) -> OnyxDeviceContext {
        OnyxDeviceContext::Dx11(self)
    }
}

impl OnyxDeviceContextDx11 {
    pub fn new(inner: Arc<OnyxDeviceContextDx11Inner>) -> OnyxResult<Self> {
        Ok(OnyxDeviceContextDx11 {
            inner,
            #[cfg(debug_assertions)]
            #[cfg(feature = "track-device-contexts")]
            create_index: 0,
        })
    }

    pub fn device_info(&self) -> &OnyxDeviceInfo {
        &self.inner.device_info
    }

    pub(crate) fn device_ops(&self) -> &Arc<dyn Dx11DeviceOps> {
        &self.inner.device_ops
    }

    /// The immediate context. Callers must hold the lock from `immediate_context_lock` around
    /// any use that could race with deferred recording or mapping on another thread.
    pub(crate) fn immediate_context(&self) -> &Arc<dyn Dx11ContextOps> {
        &self.inner.immediate_context
    }

    pub(crate) fn immediate_context_lock(&self) -> MutexGuard<'_, ()> {
        self.inner.immediate_context_lock.lock().unwrap()
    }

    /// True when command buffers must use the software op-stream recorder, either because the
    /// driver has no real deferred command lists or because emulation was forced at creation
    pub(crate) fn use_emulated_command_buffers(&self) -> bool {
        self.inner.force_emulated_command_buffers
            || !self.inner.device_info.supports_deferred_command_lists
    }

    pub fn create_queue(
        &self,
        queue_type: OnyxQueueType,
    ) -> OnyxResult<OnyxQueueDx11> {
        OnyxQueueDx11::new(self, queue_type)
    }

    pub fn create_fence(&self) -> OnyxResult<OnyxFenceDx11> {
        OnyxFenceDx11::new(self)
    }

    pub fn create_sampler(
        &self,
        sampler_def: &OnyxSamplerDef,
    ) -> OnyxResult<OnyxSamplerDx11> {
        OnyxSamplerDx11::new(self, sampler_def)
    }

    pub fn create_texture(
        &self,
        texture_def: &OnyxTextureDef,
    ) -> OnyxResult<OnyxTextureDx11> {
        OnyxTextureDx11::new(self, texture_def)
    }

    pub fn create_buffer(
        &self,
        buffer_def: &OnyxBufferDef,
    ) -> OnyxResult<OnyxBufferDx11> {
        OnyxBufferDx11::new(self, buffer_def)
    }

    pub fn create_shader(
        &self,
        stages: Vec<OnyxShaderStageDef>,
    ) -> OnyxResult<OnyxShaderDx11> {
        OnyxShaderDx11::new(self, stages)
    }

    pub fn create_shader_module(
        &self,
        bytecode: &[u8],
    ) -> OnyxResult<OnyxShaderModuleDx11> {
        OnyxShaderModuleDx11::new(self, bytecode)
    }

    pub fn create_pipeline_layout(
        &self,
        pipeline_layout_def: &OnyxPipelineLayoutDef,
    ) -> OnyxResult<OnyxPipelineLayoutDx11> {
        OnyxPipelineLayoutDx11::new(self, pipeline_layout_def)
    }

    pub fn create_descriptor_pool(
        &self,
        descriptor_pool_def: &OnyxDescriptorPoolDef,
    ) -> OnyxResult<OnyxDescriptorPoolDx11> {
        OnyxDescriptorPoolDx11::new(self, descriptor_pool_def)
    }

    pub fn create_descriptor(
        &self,
        descriptor_def: &OnyxDescriptorDef,
    ) -> OnyxResult<OnyxDescriptorDx11> {
        OnyxDescriptorDx11::new(self, descriptor_def)
    }

    pub fn create_graphics_pipeline(
        &self,
        graphics_pipeline_def: &OnyxGraphicsPipelineDef,
    ) -> OnyxResult<OnyxPipelineDx11> {
        OnyxPipelineDx11::new_graphics_pipeline(self, graphics_pipeline_def)
    }

    pub fn create_compute_pipeline(
        &self,
        compute_pipeline_def: &OnyxComputePipelineDef,
    ) -> OnyxResult<OnyxPipelineDx11> {
        OnyxPipelineDx11::new_compute_pipeline(self, compute_pipeline_def)
    }

    pub fn wait_for_fences(
        &self,
        fences: &[&OnyxFenceDx11],
    ) -> OnyxResult<()> {
        OnyxFenceDx11::wait_for_fences(self, fences)
    }
}
