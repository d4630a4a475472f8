use crate::dx11::{OnyxDescriptorDx11, OnyxDescriptorPoolDx11, OnyxPipelineLayoutDx11};
use crate::{OnyxError, OnyxResult};
use std::sync::Arc;

/// One `{descriptorOffset, descriptorNum}` window into the pool's shared descriptor storage
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct SetRange {
    /// Offset relative to the set's base offset in the pool
    pub descriptor_offset: u32,
    pub descriptor_num: u32,
}

#[derive(Debug)]
pub struct OnyxDescriptorSetDx11Inner {
    pool: OnyxDescriptorPoolDx11,
    pipeline_layout: OnyxPipelineLayoutDx11,
    set_index: u32,
    base_offset: u32,
    generation: u64,

    /// Recomputed on every (re)initialization. Dynamic-constant-buffer ranges come first, then
    /// the declared ranges. `OnyxPipelineLayoutDx11` mirrors this layout when it resolves
    /// descriptor pointers, so the two must never disagree.
    ranges: Vec<SetRange>,
    dynamic_range_count: u32,
    descriptor_count: u32,
}

#[derive(Clone, Debug)]
pub struct OnyxDescriptorSetDx11 {
    pub(crate) inner: Arc<OnyxDescriptorSetDx11Inner>,
}

impl OnyxDescriptorSetDx11 {
    /// Build the set's range list over a freshly reserved window of the pool's storage. Called
    /// by the pool on every allocation, including re-allocations after `reset`; the range list
    /// is never carried over from a previous generation.
    pub(crate) fn initialize(
        pool: &OnyxDescriptorPoolDx11,
        pipeline_layout: &OnyxPipelineLayoutDx11,
        set_index: u32,
        base_offset: u32,
        generation: u64,
    ) -> OnyxResult<Self> {
        let set_info = pipeline_layout.binding_set(set_index)?;

        let mut ranges =
            Vec::with_capacity((set_info.range_num) as usize);

        // Dynamic constant buffers first, one descriptor each
        for i in 0..set_info.dynamic_constant_buffer_num {
            ranges.push(SetRange {
                descriptor_offset: i,
                descriptor_num: 1,
            });
        }

        // Then the declared ranges, in declaration order, packed after the dynamic block
        let mut next_offset = set_info.dynamic_constant_buffer_num;
        for range in pipeline_layout.declared_ranges(set_index)? {
            ranges.push(SetRange {
                descriptor_offset: next_offset,
                descriptor_num: range.descriptor_num,
            });
            next_offset += range.descriptor_num;
        }

        Ok(OnyxDescriptorSetDx11 {
            inner: Arc::new(OnyxDescriptorSetDx11Inner {
                pool: pool.clone(),
                pipeline_layout: pipeline_layout.clone(),
                set_index,
                base_offset,
                generation,
                ranges,
                dynamic_range_count: set_info.dynamic_constant_buffer_num,
                descriptor_count: next_offset,
            }),
        })
    }

    pub fn pipeline_layout(&self) -> &OnyxPipelineLayoutDx11 {
        &self.inner.pipeline_layout
    }

    pub fn set_index(&self) -> u32 {
        self.inner.set_index
    }

    pub fn descriptor_count(&self) -> u32 {
        self.inner.descriptor_count
    }

    /// Write descriptors into one declared range. `range_index` counts declared ranges in
    /// declaration order; dynamic constant buffers are updated separately.
    pub fn update_descriptors(
        &self,
        range_index: u32,
        offset_in_range: u32,
        descriptors: &[&OnyxDescriptorDx11],
    ) -> OnyxResult<()> {
        let internal_index = self.inner.dynamic_range_count + range_index;
        let range = *self.range(internal_index)?;

        let expected_class = self
            .inner
            .pipeline_layout
            .declared_range_class(self.inner.set_index, range_index)?;
        for descriptor in descriptors {
            if descriptor.class() != expected_class {
                return Err(OnyxError::InvalidArgument(format!(
                    "descriptor class {:?} does not match range class {:?}",
                    descriptor.class(),
                    expected_class
                )));
            }
        }

        self.write(range, offset_in_range, descriptors)
    }

    /// Write dynamic-constant-buffer descriptors, indexed in declaration order
    pub fn update_dynamic_constant_buffers(
        &self,
        first: u32,
        descriptors: &[&OnyxDescriptorDx11],
    ) -> OnyxResult<()> {
        if first + descriptors.len() as u32 > self.inner.dynamic_range_count {
            return Err(OnyxError::InvalidArgument(format!(
                "dynamic constant buffer update [{}..+{}] exceeds the {} declared",
                first,
                descriptors.len(),
                self.inner.dynamic_range_count
            )));
        }

        for (i, descriptor) in descriptors.iter().enumerate() {
            if descriptor.class() != crate::OnyxDescriptorClass::ConstantBuffer {
                return Err(OnyxError::InvalidArgument(
                    "dynamic constant buffer ranges take constant buffer descriptors".to_string(),
                ));
            }
            let range = *self.range(first + i as u32)?;
            self.write(range, 0, &[descriptor])?;
        }

        Ok(())
    }

    fn range(
        &self,
        internal_index: u32,
    ) -> OnyxResult<&SetRange> {
        self.inner.ranges.get(internal_index as usize).ok_or_else(|| {
            OnyxError::InvalidArgument(format!(
                "range index {} out of bounds ({} ranges)",
                internal_index,
                self.inner.ranges.len()
            ))
        })
    }

    fn write(
        &self,
        range: SetRange,
        offset_in_range: u32,
        descriptors: &[&OnyxDescriptorDx11],
    ) -> OnyxResult<()> {
        if offset_in_range + descriptors.len() as u32 > range.descriptor_num {
            return Err(OnyxError::InvalidArgument(format!(
                "descriptor write [{}..+{}] exceeds range of {} descriptors",
                offset_in_range,
                descriptors.len(),
                range.descriptor_num
            )));
        }

        let mut storage = self.inner.pool.inner.storage.lock().unwrap();
        debug_assert_eq!(
            storage.generation, self.inner.generation,
            "descriptor set used after pool reset"
        );

        let base =
            (self.inner.base_offset + range.descriptor_offset + offset_in_range) as usize;
        for (i, descriptor) in descriptors.iter().enumerate() {
            storage.slots[base + i] = Some((*descriptor).clone());
        }

        Ok(())
    }

    /// Resolve the live descriptors for one window of this set. Consulted by the pipeline
    /// layout during binding.
    pub(crate) fn resolve_descriptors(
        &self,
        descriptor_offset: u32,
        descriptor_num: u32,
    ) -> OnyxResult<Vec<OnyxDescriptorDx11>> {
        let storage = self.inner.pool.inner.storage.lock().unwrap();
        debug_assert_eq!(
            storage.generation, self.inner.generation,
            "descriptor set bound after pool reset"
        );

        let base = (self.inner.base_offset + descriptor_offset) as usize;
        let mut descriptors = Vec::with_capacity(descriptor_num as usize);
        for i in 0..descriptor_num as usize {
            let descriptor = storage.slots[base + i].as_ref().ok_or_else(|| {
                OnyxError::InvalidArgument(format!(
                    "descriptor {} of the bound set was never written",
                    descriptor_offset as usize + i
                ))
            })?;
            descriptors.push(descriptor.clone());
        }

        Ok(descriptors)
    }

    #[cfg(test)]
    pub(crate) fn ranges(&self) -> &[SetRange] {
        &self.inner.ranges
    }

    #[cfg(test)]
    pub(crate) fn dynamic_range_count(&self) -> u32 {
        self.inner.dynamic_range_count
    }
}

#[cfg(test)]
mod tests {
    use super::super::internal::testing::MockDevice;
    use super::*;
    use crate::dx11::{OnyxApiDefDx11, OnyxApiDx11};
    use crate::{
        OnyxDescriptorClass, OnyxDescriptorPoolDef, OnyxDescriptorRangeDef,
        OnyxDescriptorSetLayoutDef, OnyxDynamicConstantBufferDef, OnyxPipelineLayoutDef,
        OnyxPipelineType, OnyxShaderStageFlags,
    };

    fn test_api() -> OnyxApiDx11 {
        OnyxApiDx11::from_device_ops(MockDevice::new(), &OnyxApiDefDx11::default()).unwrap()
    }

    fn layout_with_trailing_dynamic_ranges(
        api: &OnyxApiDx11
    ) -> crate::dx11::OnyxPipelineLayoutDx11 {
        // Dynamic constant buffers declared AFTER the plain ranges; initialization must still
        // order them first
        api.device_context()
            .create_pipeline_layout(&OnyxPipelineLayoutDef {
                pipeline_type: OnyxPipelineType::Graphics,
                descriptor_sets: vec![OnyxDescriptorSetLayoutDef {
                    ranges: vec![
                        OnyxDescriptorRangeDef {
                            base_slot: 0,
                            descriptor_count: 3,
                            class: OnyxDescriptorClass::ShaderResource,
                            stages: OnyxShaderStageFlags::FRAGMENT,
                        },
                        OnyxDescriptorRangeDef {
                            base_slot: 0,
                            descriptor_count: 2,
                            class: OnyxDescriptorClass::Sampler,
                            stages: OnyxShaderStageFlags::FRAGMENT,
                        },
                    ],
                    dynamic_constant_buffers: vec![
                        OnyxDynamicConstantBufferDef {
                            slot: 0,
                            stages: OnyxShaderStageFlags::VERTEX,
                        },
                        OnyxDynamicConstantBufferDef {
                            slot: 1,
                            stages: OnyxShaderStageFlags::FRAGMENT,
                        },
                    ],
                }],
                push_constants: vec![],
            })
            .unwrap()
    }

    #[test]
    fn dynamic_ranges_precede_declared_ranges() {
        let api = test_api();
        let layout = layout_with_trailing_dynamic_ranges(&api);
        let pool = api
            .device_context()
            .create_descriptor_pool(&OnyxDescriptorPoolDef {
                descriptor_capacity: 16,
            })
            .unwrap();

        let set = pool.allocate_descriptor_set(&layout, 0).unwrap();

        assert_eq!(set.dynamic_range_count(), 2);
        assert_eq!(
            set.ranges(),
            &[
                // Both dynamic constant buffers first, regardless of declaration order
                SetRange {
                    descriptor_offset: 0,
                    descriptor_num: 1
                },
                SetRange {
                    descriptor_offset: 1,
                    descriptor_num: 1
                },
                // Declared ranges packed after the dynamic block
                SetRange {
                    descriptor_offset: 2,
                    descriptor_num: 3
                },
                SetRange {
                    descriptor_offset: 5,
                    descriptor_num: 2
                },
            ]
        );
        assert_eq!(set.descriptor_count(), 7);
    }

    #[test]
    fn pool_validates_capacity_before_handing_out_sets() {
        let api = test_api();
        let layout = layout_with_trailing_dynamic_ranges(&api);
        let pool = api
            .device_context()
            .create_descriptor_pool(&OnyxDescriptorPoolDef {
                descriptor_capacity: 10,
            })
            .unwrap();

        // Each set needs 7 descriptors; the second one does not fit
        pool.allocate_descriptor_set(&layout, 0).unwrap();
        assert!(pool.allocate_descriptor_set(&layout, 0).is_err());

        // After reset the same pool serves fresh sets again
        pool.reset();
        pool.allocate_descriptor_set(&layout, 0).unwrap();
    }
}
