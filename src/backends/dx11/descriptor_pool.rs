use crate::dx11::{OnyxDescriptorDx11, OnyxDescriptorSetDx11, OnyxDeviceContextDx11,
    OnyxPipelineLayoutDx11};
use crate::{OnyxDescriptorPoolDef, OnyxError, OnyxResult};
use std::sync::{Arc, Mutex};

/// Backing storage shared by every set allocated from one pool. Sets hold a base offset into
/// `slots`; the pool owns the descriptors, not the sets.
#[derive(Debug)]
pub(crate) struct PoolStorage {
    pub slots: Vec<Option<OnyxDescriptorDx11>>,
    pub next_offset: u32,
    /// Bumped on `reset`. Sets allocated before a reset are stale and must not be bound.
    pub generation: u64,
}

#[derive(Debug)]
pub struct OnyxDescriptorPoolDx11Inner {
    device_context: OnyxDeviceContextDx11,
    capacity: u32,
    pub(crate) storage: Mutex<PoolStorage>,
}

/// A recyclable pool of descriptor storage. `reset` rewinds the pool for reuse across frames;
/// every set handed out afterwards recomputes its range list from scratch, so range metadata is
/// never read stale.
#[derive(Clone, Debug)]
pub struct OnyxDescriptorPoolDx11 {
    pub(crate) inner: Arc<OnyxDescriptorPoolDx11Inner>,
}

impl OnyxDescriptorPoolDx11 {
    pub fn new(
        device_context: &OnyxDeviceContextDx11,
        descriptor_pool_def: &OnyxDescriptorPoolDef,
    ) -> OnyxResult<Self> {
        log::trace!(
            "creating OnyxDescriptorPoolDx11 with capacity {}",
            descriptor_pool_def.descriptor_capacity
        );

        let capacity = descriptor_pool_def.descriptor_capacity;
        Ok(OnyxDescriptorPoolDx11 {
            inner: Arc::new(OnyxDescriptorPoolDx11Inner {
                device_context: device_context.clone(),
                capacity,
                storage: Mutex::new(PoolStorage {
                    slots: vec![None; capacity as usize],
                    next_offset: 0,
                    generation: 0,
                }),
            }),
        })
    }

    pub fn device_context(&self) -> &OnyxDeviceContextDx11 {
        &self.inner.device_context
    }

    /// Allocate a set over the given descriptor-set slot of a pipeline layout. The set's total
    /// descriptor count is validated against the remaining pool capacity before the set is
    /// handed out.
    pub fn allocate_descriptor_set(
        &self,
        pipeline_layout: &OnyxPipelineLayoutDx11,
        set_index: u32,
    ) -> OnyxResult<OnyxDescriptorSetDx11> {
        let descriptor_count = pipeline_layout.set_descriptor_count(set_index)?;

        let (base_offset, generation) = {
            let mut storage = self.inner.storage.lock().unwrap();
            if storage.next_offset + descriptor_count > self.inner.capacity {
                return Err(OnyxError::StringError(format!(
                    "descriptor pool exhausted: capacity {}, in use {}, requested {}",
                    self.inner.capacity, storage.next_offset, descriptor_count
                )));
            }

            let base_offset = storage.next_offset;
            storage.next_offset += descriptor_count;
            (base_offset, storage.generation)
        };

        let set = OnyxDescriptorSetDx11::initialize(
            self,
            pipeline_layout,
            set_index,
            base_offset,
            generation,
        )?;
        debug_assert_eq!(set.descriptor_count(), descriptor_count);

        Ok(set)
    }

    /// Recycle the pool. All sets allocated from it become stale and must be re-allocated before
    /// their range metadata is read again.
    pub fn reset(&self) {
        let mut storage = self.inner.storage.lock().unwrap();
        for slot in storage.slots.iter_mut() {
            *slot = None;
        }
        storage.next_offset = 0;
        storage.generation += 1;
    }
}
