use crate::dx11::{OnyxDescriptorSetDx11, OnyxDeviceContextDx11};
use crate::{
    OnyxDescriptorClass, OnyxError, OnyxPipelineLayout, OnyxPipelineLayoutDef, OnyxPipelineType,
    OnyxResult, OnyxShaderStageFlags,
};
use std::sync::Arc;

use super::d3d11;
use super::internal::binding_state::BindingState;
use super::internal::conversions::stage_flag;
use super::internal::native::{Dx11ContextOps, NativeBuffer, ALL_SHADER_STAGES};
use super::internal::round_size_up_to_alignment_u32;

/// Descriptor class of a compiled binding range. Dynamic constant buffers get their own class
/// because they consume a per-bind offset the plain class does not.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum BindingClass {
    Sampler,
    ConstantBuffer,
    DynamicConstantBuffer,
    ShaderResource,
    Storage,
}

/// A contiguous span of native slots compiled from one declared range
#[derive(Clone, Debug)]
pub(crate) struct BindingRange {
    pub base_slot: u32,
    pub descriptor_num: u32,
    /// Offset into the owning set's descriptor array. The array is laid out with all dynamic
    /// constant buffer descriptors first, then the declared ranges in declaration order;
    /// `OnyxDescriptorSetDx11::initialize` builds the same layout.
    pub descriptor_offset: u32,
    pub stages: OnyxShaderStageFlags,
    pub class: BindingClass,
}

/// One descriptor set slot of the layout: a window into the flat range list. The window holds
/// the declared ranges first (in declaration order) with the dynamic-constant-buffer ranges
/// appended after them.
#[derive(Clone, Debug)]
pub(crate) struct BindingSet {
    pub range_first: u32,
    pub range_num: u32,
    pub dynamic_constant_buffer_num: u32,
    pub descriptor_num: u32,
}

#[derive(Debug)]
struct PushConstantBlock {
    buffer: NativeBuffer,
    slot: u32,
    stages: OnyxShaderStageFlags,
    size: u32,
}

#[derive(Debug)]
pub struct OnyxPipelineLayoutDx11Inner {
    device_context: OnyxDeviceContextDx11,
    pipeline_type: OnyxPipelineType,
    sets: Vec<BindingSet>,
    ranges: Vec<BindingRange>,
    // Created once at layout build time, mutated in place by set_constants
    push_constants: Vec<PushConstantBlock>,
}

impl Drop for OnyxPipelineLayoutDx11Inner {
    fn drop(&mut self) {
        log::trace!("destroying OnyxPipelineLayoutDx11");
        for block in &self.push_constants {
            self.device_context.device_ops().destroy_object(block.buffer.0);
        }
    }
}

#[derive(Clone, Debug)]
pub struct OnyxPipelineLayoutDx11 {
    pub(crate) inner: Arc<OnyxPipelineLayoutDx11Inner>,
}

impl Into<OnyxPipelineLayout> for OnyxPipelineLayoutDx11 {
    fn into(self) -> OnyxPipelineLayout {
        OnyxPipelineLayout::Dx11(self)
    }
}

fn validate_range_window(
    class: BindingClass,
    base_slot: u32,
    descriptor_num: u32,
) -> OnyxResult<()> {
    let capacity = match class {
        BindingClass::Sampler => d3d11::D3D11_COMMONSHADER_SAMPLER_SLOT_COUNT,
        BindingClass::ConstantBuffer | BindingClass::DynamicConstantBuffer => {
            d3d11::D3D11_COMMONSHADER_CONSTANT_BUFFER_API_SLOT_COUNT
        }
        BindingClass::ShaderResource => d3d11::D3D11_COMMONSHADER_INPUT_RESOURCE_SLOT_COUNT,
        BindingClass::Storage => d3d11::D3D11_PS_CS_UAV_REGISTER_COUNT,
    };

    if base_slot + descriptor_num > capacity {
        return Err(OnyxError::InvalidArgument(format!(
            "{:?} range [{}..+{}] exceeds the {} native slots",
            class, base_slot, descriptor_num, capacity
        )));
    }

    Ok(())
}

impl OnyxPipelineLayoutDx11 {
    pub fn new(
        device_context: &OnyxDeviceContextDx11,
        pipeline_layout_def: &OnyxPipelineLayoutDef,
    ) -> OnyxResult<Self> {
        log::trace!("creating OnyxPipelineLayoutDx11");

        let pipeline_type = pipeline_layout_def.pipeline_type;
        let mut sets = Vec::with_capacity(pipeline_layout_def.descriptor_sets.len());
        let mut ranges = Vec::new();
        let mut has_dynamic_constant_buffers = false;

        for set_def in &pipeline_layout_def.descriptor_sets {
            let range_first = ranges.len() as u32;
            let dynamic_num = set_def.dynamic_constant_buffers.len() as u32;

            // Declared ranges first. Their descriptors live after the dynamic block in the
            // set's descriptor array.
            let mut descriptor_offset = dynamic_num;
            for range_def in &set_def.ranges {
                if range_def.descriptor_count == 0 {
                    return Err(OnyxError::InvalidArgument(
                        "descriptor range with zero descriptors".to_string(),
                    ));
                }
                validate_stage_visibility(pipeline_type, range_def.stages)?;

                let class = match range_def.class {
                    OnyxDescriptorClass::Sampler => BindingClass::Sampler,
                    OnyxDescriptorClass::ConstantBuffer => BindingClass::ConstantBuffer,
                    OnyxDescriptorClass::ShaderResource => BindingClass::ShaderResource,
                    OnyxDescriptorClass::Storage => BindingClass::Storage,
                };
                validate_range_window(class, range_def.base_slot, range_def.descriptor_count)?;

                ranges.push(BindingRange {
                    base_slot: range_def.base_slot,
                    descriptor_num: range_def.descriptor_count,
                    descriptor_offset,
                    stages: range_def.stages,
                    class,
                });
                descriptor_offset += range_def.descriptor_count;
            }

            // Dynamic constant buffer ranges appended after. OnyxDescriptorSetDx11::initialize
            // mirrors this split; the two must agree or binding silently corrupts.
            for (i, dynamic_def) in set_def.dynamic_constant_buffers.iter().enumerate() {
                validate_stage_visibility(pipeline_type, dynamic_def.stages)?;
                validate_range_window(BindingClass::DynamicConstantBuffer, dynamic_def.slot, 1)?;
                has_dynamic_constant_buffers = true;

                ranges.push(BindingRange {
                    base_slot: dynamic_def.slot,
                    descriptor_num: 1,
                    descriptor_offset: i as u32,
                    stages: dynamic_def.stages,
                    class: BindingClass::DynamicConstantBuffer,
                });
            }

            sets.push(BindingSet {
                range_first,
                range_num: ranges.len() as u32 - range_first,
                dynamic_constant_buffer_num: dynamic_num,
                descriptor_num: descriptor_offset,
            });
        }

        if has_dynamic_constant_buffers
            && !device_context.device_info().supports_constant_buffer_offsets
        {
            // Known limitation: the bind proceeds but the effective offset is wrong on this
            // hardware
            log::warn!(
                "pipeline layout declares dynamic constant buffers but the device has no \
                 bounded-range constant buffer binds"
            );
        }

        let mut push_constants = Vec::with_capacity(pipeline_layout_def.push_constants.len());
        for push_constant_def in &pipeline_layout_def.push_constants {
            validate_stage_visibility(pipeline_type, push_constant_def.stages)?;
            if push_constant_def.size == 0 {
                return Err(OnyxError::InvalidArgument(
                    "push constant block with zero size".to_string(),
                ));
            }

            let size = round_size_up_to_alignment_u32(push_constant_def.size, 16);
            let desc = d3d11::D3D11_BUFFER_DESC {
                ByteWidth: size,
                Usage: d3d11::D3D11_USAGE_DEFAULT,
                BindFlags: d3d11::D3D11_BIND_CONSTANT_BUFFER,
                CPUAccessFlags: 0,
                MiscFlags: 0,
                StructureByteStride: 0,
            };
            let buffer = device_context.device_ops().create_buffer(&desc, None)?;

            push_constants.push(PushConstantBlock {
                buffer,
                slot: push_constant_def.slot,
                stages: push_constant_def.stages,
                size,
            });
        }

        Ok(OnyxPipelineLayoutDx11 {
            inner: Arc::new(OnyxPipelineLayoutDx11Inner {
                device_context: device_context.clone(),
                pipeline_type,
                sets,
                ranges,
                push_constants,
            }),
        })
    }

    pub fn pipeline_type(&self) -> OnyxPipelineType {
        self.inner.pipeline_type
    }

    pub fn set_count(&self) -> u32 {
        self.inner.sets.len() as u32
    }

    pub fn push_constant_count(&self) -> u32 {
        self.inner.push_constants.len() as u32
    }

    pub(crate) fn binding_set(
        &self,
        set_index: u32,
    ) -> OnyxResult<&BindingSet> {
        self.inner.sets.get(set_index as usize).ok_or_else(|| {
            OnyxError::InvalidArgument(format!(
                "set index {} out of bounds ({} sets)",
                set_index,
                self.inner.sets.len()
            ))
        })
    }

    /// The declared (non-dynamic) ranges of a set, in declaration order
    pub(crate) fn declared_ranges(
        &self,
        set_index: u32,
    ) -> OnyxResult<&[BindingRange]> {
        let set = self.binding_set(set_index)?;
        let first = set.range_first as usize;
        let declared_num = (set.range_num - set.dynamic_constant_buffer_num) as usize;
        Ok(&self.inner.ranges[first..first + declared_num])
    }

    pub(crate) fn declared_range_class(
        &self,
        set_index: u32,
        range_index: u32,
    ) -> OnyxResult<OnyxDescriptorClass> {
        let ranges = self.declared_ranges(set_index)?;
        let range = ranges.get(range_index as usize).ok_or_else(|| {
            OnyxError::InvalidArgument(format!(
                "range index {} out of bounds ({} declared ranges)",
                range_index,
                ranges.len()
            ))
        })?;

        Ok(match range.class {
            BindingClass::Sampler => OnyxDescriptorClass::Sampler,
            BindingClass::ConstantBuffer => OnyxDescriptorClass::ConstantBuffer,
            BindingClass::ShaderResource => OnyxDescriptorClass::ShaderResource,
            BindingClass::Storage => OnyxDescriptorClass::Storage,
            BindingClass::DynamicConstantBuffer => unreachable!(),
        })
    }

    /// Total descriptors a set built from this layout holds; descriptor pools validate their
    /// remaining capacity against it before handing out a set
    pub fn set_descriptor_count(
        &self,
        set_index: u32,
    ) -> OnyxResult<u32> {
        Ok(self.binding_set(set_index)?.descriptor_num)
    }

    /// Bind the push-constant buffers to their declared slots. Issued when a command buffer
    /// binds this layout.
    pub(crate) fn bind_push_constant_buffers(
        &self,
        context: &dyn Dx11ContextOps,
    ) {
        for block in &self.inner.push_constants {
            for &stage in &ALL_SHADER_STAGES {
                if block.stages.intersects(stage_flag(stage)) {
                    context.set_constant_buffers(stage, block.slot, &[Some(block.buffer)]);
                }
            }
        }
    }

    /// Write a push-constant block in place. The constant buffers are shared by every command
    /// buffer that binds this layout; interleaving writes from concurrently recording command
    /// buffers is a caller hazard.
    pub(crate) fn set_constants(
        &self,
        context: &dyn Dx11ContextOps,
        push_constant_index: u32,
        data: &[u8],
    ) -> OnyxResult<()> {
        let block = self
            .inner
            .push_constants
            .get(push_constant_index as usize)
            .ok_or_else(|| {
                OnyxError::InvalidArgument(format!(
                    "push constant index {} out of bounds ({} blocks)",
                    push_constant_index,
                    self.inner.push_constants.len()
                ))
            })?;

        if data.len() as u32 > block.size {
            return Err(OnyxError::InvalidArgument(format!(
                "push constant write of {} bytes exceeds the {} byte block",
                data.len(),
                block.size
            )));
        }

        context.update_subresource(block.buffer.as_resource(), 0, data);
        Ok(())
    }

    /// Resolve and bind every range of `descriptor_set`. Dynamic constant buffer ranges consume
    /// one offset each from `dynamic_offsets` (in bytes, 256-aligned), regardless of their
    /// descriptor counts.
    #[profiling::function]
    pub(crate) fn bind_descriptor_set(
        &self,
        context: &dyn Dx11ContextOps,
        binding_state: &mut BindingState,
        descriptor_set: &OnyxDescriptorSetDx11,
        dynamic_offsets: &[u32],
    ) -> OnyxResult<()> {
        debug_assert!(Arc::ptr_eq(
            &self.inner,
            &descriptor_set.pipeline_layout().inner
        ));

        let set_index = descriptor_set.set_index();
        let set = self.binding_set(set_index)?;

        if dynamic_offsets.len() as u32 != set.dynamic_constant_buffer_num {
            return Err(OnyxError::InvalidArgument(format!(
                "{} dynamic offsets supplied, the set declares {} dynamic constant buffer ranges",
                dynamic_offsets.len(),
                set.dynamic_constant_buffer_num
            )));
        }

        let first = set.range_first as usize;
        let ranges = &self.inner.ranges[first..first + set.range_num as usize];
        let mut offset_cursor = dynamic_offsets.iter();
        let mut has_graphics_storage = false;

        for range in ranges {
            let descriptors =
                descriptor_set.resolve_descriptors(range.descriptor_offset, range.descriptor_num)?;

            match range.class {
                BindingClass::Sampler => {
                    let samplers: Vec<_> =
                        descriptors.iter().map(|d| d.dx11_sampler()).collect();
                    for &stage in &ALL_SHADER_STAGES {
                        if range.stages.intersects(stage_flag(stage)) {
                            context.set_samplers(stage, range.base_slot, &samplers);
                        }
                    }
                }

                BindingClass::ConstantBuffer | BindingClass::DynamicConstantBuffer => {
                    // The cursor advances once per dynamic range, not once per descriptor
                    let extra_offset = if range.class == BindingClass::DynamicConstantBuffer {
                        *offset_cursor.next().unwrap()
                    } else {
                        0
                    };
                    if extra_offset % 256 != 0 {
                        return Err(OnyxError::InvalidArgument(format!(
                            "dynamic constant buffer offset {} is not 256-byte aligned",
                            extra_offset
                        )));
                    }
                    let extra_constants = extra_offset / 16;

                    let mut buffers = Vec::with_capacity(descriptors.len());
                    let mut first_constants = Vec::with_capacity(descriptors.len());
                    let mut num_constants = Vec::with_capacity(descriptors.len());
                    for descriptor in &descriptors {
                        buffers.push(descriptor.dx11_constant_buffer());
                        first_constants.push(descriptor.element_offset() as u32 + extra_constants);
                        // The bounded-range binds also want 16-constant granularity on the size
                        num_constants.push(round_size_up_to_alignment_u32(
                            descriptor.element_count() as u32,
                            16,
                        ));
                    }

                    // The zero test must be exact: the two native call variants are not
                    // interchangeable on downlevel feature levels
                    let with_offsets = first_constants.iter().any(|&c| c != 0);
                    for &stage in &ALL_SHADER_STAGES {
                        if range.stages.intersects(stage_flag(stage)) {
                            if with_offsets {
                                context.set_constant_buffers1(
                                    stage,
                                    range.base_slot,
                                    &buffers,
                                    &first_constants,
                                    &num_constants,
                                );
                            } else {
                                context.set_constant_buffers(stage, range.base_slot, &buffers);
                            }
                        }
                    }
                }

                BindingClass::ShaderResource => {
                    let mut views = Vec::with_capacity(descriptors.len());
                    for (i, descriptor) in descriptors.iter().enumerate() {
                        if let Some(identity) = descriptor.identity() {
                            binding_state.track_srv_and_unbind_storage(
                                context,
                                identity,
                                range.base_slot + i as u32,
                            );
                        }
                        views.push(descriptor.dx11_srv());
                    }
                    for &stage in &ALL_SHADER_STAGES {
                        if range.stages.intersects(stage_flag(stage)) {
                            context.set_shader_resources(stage, range.base_slot, &views);
                        }
                    }
                }

                BindingClass::Storage => {
                    let graphics = self.inner.pipeline_type == OnyxPipelineType::Graphics;
                    let mut views = Vec::with_capacity(descriptors.len());
                    for (i, descriptor) in descriptors.iter().enumerate() {
                        let view = descriptor.dx11_uav().ok_or_else(|| {
                            OnyxError::InvalidArgument(
                                "storage range descriptor has no writable view".to_string(),
                            )
                        })?;
                        if let Some(identity) = descriptor.identity() {
                            binding_state.track_uav_and_unbind_resources(
                                context,
                                identity,
                                range.base_slot + i as u32,
                                graphics,
                                view,
                            );
                        }
                        views.push(Some(view));
                    }

                    if graphics {
                        // Graphics UAVs cannot be issued per stage; they accumulate in the
                        // mirror array and flush once after the whole set is processed
                        has_graphics_storage = true;
                    } else {
                        context.cs_set_unordered_access_views(range.base_slot, &views);
                    }
                }
            }
        }

        if has_graphics_storage {
            binding_state.flush_graphics_uavs(context);
        }

        Ok(())
    }
}

fn validate_stage_visibility(
    pipeline_type: OnyxPipelineType,
    stages: OnyxShaderStageFlags,
) -> OnyxResult<()> {
    let compute = stages.intersects(OnyxShaderStageFlags::COMPUTE);
    let graphics = stages.intersects(OnyxShaderStageFlags::ALL_GRAPHICS);

    let valid = match pipeline_type {
        OnyxPipelineType::Graphics => graphics && !compute,
        OnyxPipelineType::Compute => compute && !graphics,
    };

    if !valid {
        return Err(OnyxError::InvalidArgument(format!(
            "stage visibility {:?} does not match a {:?} pipeline layout",
            stages, pipeline_type
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::internal::testing::{MockContext, MockDevice, NativeCall};
    use super::*;
    use crate::dx11::{
        Dx11ShaderStage, NativeSrv, OnyxApiDefDx11, OnyxApiDx11, OnyxDescriptorDx11,
    };
    use crate::{
        OnyxBufferDef, OnyxBufferViewDef, OnyxBufferViewKind, OnyxConstantBufferViewDef,
        OnyxDescriptorDef, OnyxDescriptorPoolDef, OnyxDescriptorRangeDef,
        OnyxDescriptorSetLayoutDef, OnyxDynamicConstantBufferDef, OnyxExtents3D, OnyxFormat,
        OnyxMemoryUsage, OnyxPushConstantDef, OnyxResourceType, OnyxTextureDef,
        OnyxTextureViewDef, OnyxTextureViewKind,
    };

    struct Fixture {
        api: OnyxApiDx11,
        device: std::sync::Arc<MockDevice>,
    }

    impl Fixture {
        fn new() -> Self {
            let device = MockDevice::new();
            let api =
                OnyxApiDx11::from_device_ops(device.clone(), &OnyxApiDefDx11::default()).unwrap();
            Fixture { api, device }
        }

        fn context(&self) -> &std::sync::Arc<MockContext> {
            self.device.mock_immediate()
        }

        fn texture_descriptor(&self) -> OnyxDescriptorDx11 {
            let texture = crate::OnyxTexture::Dx11(
                self.api
                    .device_context()
                    .create_texture(&OnyxTextureDef {
                        extents: OnyxExtents3D {
                            width: 16,
                            height: 16,
                            depth: 1,
                        },
                        format: OnyxFormat::R8G8B8A8_UNORM,
                        resource_type: OnyxResourceType::TEXTURE,
                        ..Default::default()
                    })
                    .unwrap(),
            );
            self.api
                .device_context()
                .create_descriptor(&OnyxDescriptorDef::TextureView(OnyxTextureViewDef {
                    texture: &texture,
                    kind: OnyxTextureViewKind::ShaderResource,
                    mip_first: 0,
                    mip_count: 1,
                    layer_first: 0,
                    layer_count: 1,
                }))
                .unwrap()
        }

        fn constant_buffer_descriptor(
            &self,
            byte_offset: u64,
        ) -> OnyxDescriptorDx11 {
            let buffer = crate::OnyxBuffer::Dx11(
                self.api
                    .device_context()
                    .create_buffer(&OnyxBufferDef {
                        size: 4096,
                        memory_usage: OnyxMemoryUsage::GpuOnly,
                        resource_type: OnyxResourceType::CONSTANT_BUFFER,
                        ..Default::default()
                    })
                    .unwrap(),
            );
            self.api
                .device_context()
                .create_descriptor(&OnyxDescriptorDef::ConstantBufferView(
                    OnyxConstantBufferViewDef {
                        buffer: &buffer,
                        byte_offset,
                        byte_size: 256,
                    },
                ))
                .unwrap()
        }

        fn storage_buffer_descriptor(&self) -> OnyxDescriptorDx11 {
            let buffer = crate::OnyxBuffer::Dx11(
                self.api
                    .device_context()
                    .create_buffer(&OnyxBufferDef {
                        size: 1024,
                        memory_usage: OnyxMemoryUsage::GpuOnly,
                        resource_type: OnyxResourceType::BUFFER_READ_WRITE,
                        format: OnyxFormat::R32_UINT,
                        ..Default::default()
                    })
                    .unwrap(),
            );
            self.api
                .device_context()
                .create_descriptor(&OnyxDescriptorDef::BufferView(OnyxBufferViewDef {
                    buffer: &buffer,
                    kind: OnyxBufferViewKind::Storage,
                    format: OnyxFormat::R32_UINT,
                    element_offset: 0,
                    element_count: 256,
                }))
                .unwrap()
        }
    }

    fn srv_range_layout(
        fixture: &Fixture,
        base_slot: u32,
        count: u32,
    ) -> OnyxPipelineLayoutDx11 {
        fixture
            .api
            .device_context()
            .create_pipeline_layout(&OnyxPipelineLayoutDef {
                pipeline_type: crate::OnyxPipelineType::Graphics,
                descriptor_sets: vec![OnyxDescriptorSetLayoutDef {
                    ranges: vec![OnyxDescriptorRangeDef {
                        base_slot,
                        descriptor_count: count,
                        class: OnyxDescriptorClass::ShaderResource,
                        stages: OnyxShaderStageFlags::FRAGMENT,
                    }],
                    dynamic_constant_buffers: vec![],
                }],
                push_constants: vec![],
            })
            .unwrap()
    }

    #[test]
    fn fragment_srv_range_binds_with_one_pixel_stage_call() {
        let fixture = Fixture::new();
        let layout = srv_range_layout(&fixture, 2, 4);
        let pool = fixture
            .api
            .device_context()
            .create_descriptor_pool(&OnyxDescriptorPoolDef {
                descriptor_capacity: 8,
            })
            .unwrap();
        let set = pool.allocate_descriptor_set(&layout, 0).unwrap();

        let descriptors: Vec<_> = (0..4).map(|_| fixture.texture_descriptor()).collect();
        let refs: Vec<_> = descriptors.iter().collect();
        set.update_descriptors(0, 0, &refs).unwrap();

        let context = fixture.context();
        context.take_calls();

        let mut binding_state = BindingState::new();
        layout
            .bind_descriptor_set(&**context, &mut binding_state, &set, &[])
            .unwrap();

        let calls = context.take_calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            NativeCall::SetShaderResources {
                stage,
                start_slot,
                views,
            } => {
                assert_eq!(*stage, Dx11ShaderStage::Pixel);
                assert_eq!(*start_slot, 2);
                assert_eq!(views.len(), 4);
                assert!(views.iter().all(Option::<NativeSrv>::is_some));
            }
            other => panic!("expected a single pixel-stage SRV bind, got {:?}", other),
        }
    }

    #[test]
    fn empty_set_produces_an_empty_binding_pass() {
        let fixture = Fixture::new();
        let layout = fixture
            .api
            .device_context()
            .create_pipeline_layout(&OnyxPipelineLayoutDef {
                pipeline_type: crate::OnyxPipelineType::Graphics,
                descriptor_sets: vec![OnyxDescriptorSetLayoutDef::default()],
                push_constants: vec![],
            })
            .unwrap();
        let pool = fixture
            .api
            .device_context()
            .create_descriptor_pool(&OnyxDescriptorPoolDef {
                descriptor_capacity: 1,
            })
            .unwrap();
        let set = pool.allocate_descriptor_set(&layout, 0).unwrap();

        let context = fixture.context();
        context.take_calls();

        let mut binding_state = BindingState::new();
        layout
            .bind_descriptor_set(&**context, &mut binding_state, &set, &[])
            .unwrap();

        assert_eq!(context.call_count(), 0);
    }

    fn dynamic_layout(fixture: &Fixture) -> OnyxPipelineLayoutDx11 {
        fixture
            .api
            .device_context()
            .create_pipeline_layout(&OnyxPipelineLayoutDef {
                pipeline_type: crate::OnyxPipelineType::Graphics,
                descriptor_sets: vec![OnyxDescriptorSetLayoutDef {
                    ranges: vec![],
                    dynamic_constant_buffers: vec![OnyxDynamicConstantBufferDef {
                        slot: 1,
                        stages: OnyxShaderStageFlags::VERTEX,
                    }],
                }],
                push_constants: vec![],
            })
            .unwrap()
    }

    #[test]
    fn zero_offsets_use_the_plain_constant_buffer_bind() {
        let fixture = Fixture::new();
        let layout = dynamic_layout(&fixture);
        let pool = fixture
            .api
            .device_context()
            .create_descriptor_pool(&OnyxDescriptorPoolDef {
                descriptor_capacity: 1,
            })
            .unwrap();
        let set = pool.allocate_descriptor_set(&layout, 0).unwrap();
        let descriptor = fixture.constant_buffer_descriptor(0);
        set.update_dynamic_constant_buffers(0, &[&descriptor]).unwrap();

        let context = fixture.context();
        context.take_calls();

        let mut binding_state = BindingState::new();
        layout
            .bind_descriptor_set(&**context, &mut binding_state, &set, &[0])
            .unwrap();

        let calls = context.take_calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            &calls[0],
            NativeCall::SetConstantBuffers {
                stage: Dx11ShaderStage::Vertex,
                start_slot: 1,
                ..
            }
        ));
    }

    #[test]
    fn nonzero_offsets_use_the_bounded_range_bind() {
        let fixture = Fixture::new();
        let layout = dynamic_layout(&fixture);
        let pool = fixture
            .api
            .device_context()
            .create_descriptor_pool(&OnyxDescriptorPoolDef {
                descriptor_capacity: 1,
            })
            .unwrap();
        let set = pool.allocate_descriptor_set(&layout, 0).unwrap();
        let descriptor = fixture.constant_buffer_descriptor(256);
        set.update_dynamic_constant_buffers(0, &[&descriptor]).unwrap();

        let context = fixture.context();
        context.take_calls();

        let mut binding_state = BindingState::new();
        layout
            .bind_descriptor_set(&**context, &mut binding_state, &set, &[512])
            .unwrap();

        let calls = context.take_calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            NativeCall::SetConstantBuffers1 {
                stage,
                start_slot,
                first_constants,
                num_constants,
                ..
            } => {
                assert_eq!(*stage, Dx11ShaderStage::Vertex);
                assert_eq!(*start_slot, 1);
                // Baked descriptor offset (256 bytes = 16 constants) plus the per-bind offset
                // (512 bytes = 32 constants)
                assert_eq!(first_constants, &[48]);
                assert_eq!(num_constants, &[16]);
            }
            other => panic!("expected a bounded-range bind, got {:?}", other),
        }
    }

    #[test]
    fn offset_count_must_match_dynamic_range_count_exactly() {
        let fixture = Fixture::new();
        let layout = dynamic_layout(&fixture);
        let pool = fixture
            .api
            .device_context()
            .create_descriptor_pool(&OnyxDescriptorPoolDef {
                descriptor_capacity: 1,
            })
            .unwrap();
        let set = pool.allocate_descriptor_set(&layout, 0).unwrap();
        let descriptor = fixture.constant_buffer_descriptor(0);
        set.update_dynamic_constant_buffers(0, &[&descriptor]).unwrap();

        let mut binding_state = BindingState::new();
        let context = fixture.context();

        assert!(layout
            .bind_descriptor_set(&**context, &mut binding_state, &set, &[])
            .is_err());
        assert!(layout
            .bind_descriptor_set(&**context, &mut binding_state, &set, &[0, 0])
            .is_err());
    }

    #[test]
    fn graphics_storage_ranges_flush_once_after_the_set_pass() {
        let fixture = Fixture::new();
        let layout = fixture
            .api
            .device_context()
            .create_pipeline_layout(&OnyxPipelineLayoutDef {
                pipeline_type: crate::OnyxPipelineType::Graphics,
                descriptor_sets: vec![OnyxDescriptorSetLayoutDef {
                    ranges: vec![OnyxDescriptorRangeDef {
                        base_slot: 0,
                        descriptor_count: 2,
                        class: OnyxDescriptorClass::Storage,
                        stages: OnyxShaderStageFlags::FRAGMENT,
                    }],
                    dynamic_constant_buffers: vec![],
                }],
                push_constants: vec![],
            })
            .unwrap();
        let pool = fixture
            .api
            .device_context()
            .create_descriptor_pool(&OnyxDescriptorPoolDef {
                descriptor_capacity: 2,
            })
            .unwrap();
        let set = pool.allocate_descriptor_set(&layout, 0).unwrap();
        let descriptors = [
            fixture.storage_buffer_descriptor(),
            fixture.storage_buffer_descriptor(),
        ];
        set.update_descriptors(0, 0, &[&descriptors[0], &descriptors[1]])
            .unwrap();

        let context = fixture.context();
        context.take_calls();

        let mut binding_state = BindingState::new();
        layout
            .bind_descriptor_set(&**context, &mut binding_state, &set, &[])
            .unwrap();

        let calls = context.take_calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            NativeCall::OmSetUnorderedAccessViews { start_slot, views } => {
                assert_eq!(*start_slot, 0);
                assert_eq!(views.len(), 2);
                assert!(views.iter().all(Option::is_some));
            }
            other => panic!("expected one combined graphics UAV bind, got {:?}", other),
        }
    }

    #[test]
    fn push_constants_update_in_place_and_bind_with_the_layout() {
        let fixture = Fixture::new();
        let layout = fixture
            .api
            .device_context()
            .create_pipeline_layout(&OnyxPipelineLayoutDef {
                pipeline_type: crate::OnyxPipelineType::Graphics,
                descriptor_sets: vec![],
                // 20 bytes rounds up to a 32 byte native buffer
                push_constants: vec![OnyxPushConstantDef {
                    slot: 3,
                    size: 20,
                    stages: OnyxShaderStageFlags::VERTEX,
                }],
            })
            .unwrap();

        let context = fixture.context();
        context.take_calls();

        layout.bind_push_constant_buffers(&**context);
        layout.set_constants(&**context, 0, &[7u8; 20]).unwrap();

        let calls = context.take_calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(
            &calls[0],
            NativeCall::SetConstantBuffers {
                stage: Dx11ShaderStage::Vertex,
                start_slot: 3,
                ..
            }
        ));
        match &calls[1] {
            NativeCall::UpdateSubresource { data, .. } => assert_eq!(data.len(), 20),
            other => panic!("expected an in-place subresource update, got {:?}", other),
        }

        // Oversized writes are rejected without touching the buffer
        assert!(layout.set_constants(&**context, 0, &[0u8; 64]).is_err());
    }
}
