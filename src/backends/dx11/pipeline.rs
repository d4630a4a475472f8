use crate::dx11::{OnyxDeviceContextDx11, OnyxPipelineLayoutDx11};
use crate::{
    OnyxComputePipelineDef, OnyxError, OnyxGraphicsPipelineDef, OnyxPipeline, OnyxPipelineType,
    OnyxResult, OnyxSamplePosition, OnyxShaderStageFlags, OnyxVertexAttributeRate,
};
use fnv::FnvHasher;
use std::hash::Hasher;
use std::sync::{Arc, Mutex};

use super::d3d11;
use super::internal::conversions;
use super::internal::native::{
    Dx11ContextOps, Dx11InputElementDesc, Dx11RasterizerDesc, Dx11ShaderStage,
    NativeBlendState, NativeDepthStencilState, NativeInputLayout, NativeRasterizerState,
    NativeShader,
};

/// Rasterizer state plus lazily created variants for programmable sample positions. D3D11 bakes
/// sample positions into the rasterizer state object, so each distinct position set needs its
/// own native object, cached under an FNV-1a hash of the raw position bytes. Hash collisions are
/// treated as identical state.
#[derive(Debug)]
struct RasterizerVariants {
    base_desc: Dx11RasterizerDesc,
    base: NativeRasterizerState,
    current: NativeRasterizerState,
    variants: fnv::FnvHashMap<u64, NativeRasterizerState>,
}

#[derive(Debug)]
pub struct OnyxPipelineDx11Inner {
    device_context: OnyxDeviceContextDx11,
    pipeline_type: OnyxPipelineType,
    pipeline_layout: OnyxPipelineLayoutDx11,

    vertex_shader: Option<NativeShader>,
    hull_shader: Option<NativeShader>,
    domain_shader: Option<NativeShader>,
    geometry_shader: Option<NativeShader>,
    pixel_shader: Option<NativeShader>,
    compute_shader: Option<NativeShader>,

    input_layout: Option<NativeInputLayout>,
    topology: d3d11::D3D_PRIMITIVE_TOPOLOGY,
    vertex_strides: Vec<u32>,

    blend_state: Option<NativeBlendState>,
    blend_factor: [f32; 4],
    sample_mask: u32,
    depth_stencil_state: Option<NativeDepthStencilState>,

    rasterizer: Option<Mutex<RasterizerVariants>>,
    rasterizer_discard: bool,
}

impl Drop for OnyxPipelineDx11Inner {
    fn drop(&mut self) {
        log::trace!("destroying OnyxPipelineDx11");
        let device_ops = self.device_context.device_ops();

        for shader in [
            self.vertex_shader,
            self.hull_shader,
            self.domain_shader,
            self.geometry_shader,
            self.pixel_shader,
            self.compute_shader,
        ]
        .iter()
        .flatten()
        {
            device_ops.destroy_object(shader.0);
        }

        if let Some(input_layout) = self.input_layout {
            device_ops.destroy_object(input_layout.0);
        }
        if let Some(blend_state) = self.blend_state {
            device_ops.destroy_object(blend_state.0);
        }
        if let Some(depth_stencil_state) = self.depth_stencil_state {
            device_ops.destroy_object(depth_stencil_state.0);
        }
        if let Some(rasterizer) = &self.rasterizer {
            let rasterizer = rasterizer.lock().unwrap();
            device_ops.destroy_object(rasterizer.base.0);
            for variant in rasterizer.variants.values() {
                device_ops.destroy_object(variant.0);
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct OnyxPipelineDx11 {
    pub(crate) inner: Arc<OnyxPipelineDx11Inner>,
}

impl Into<OnyxPipeline> for OnyxPipelineDx11 {
    fn into(self) -> OnyxPipeline {
        OnyxPipeline::Dx11(self)
    }
}

impl OnyxPipelineDx11 {
    pub fn new_graphics_pipeline(
        device_context: &OnyxDeviceContextDx11,
        def: &OnyxGraphicsPipelineDef,
    ) -> OnyxResult<Self> {
        log::trace!("creating graphics OnyxPipelineDx11");

        let shader = def.shader.dx11_shader().ok_or_else(|| {
            OnyxError::InvalidArgument("shader is not a dx11 shader".to_string())
        })?;
        let pipeline_layout = def.pipeline_layout.dx11_pipeline_layout().ok_or_else(|| {
            OnyxError::InvalidArgument("pipeline layout is not a dx11 layout".to_string())
        })?;

        let device_ops = device_context.device_ops();

        let vertex_stage = shader
            .stage_def(OnyxShaderStageFlags::VERTEX)
            .ok_or_else(|| {
                OnyxError::InvalidArgument(
                    "graphics pipelines require a vertex shader stage".to_string(),
                )
            })?;
        let vertex_bytecode = vertex_stage
            .shader_module
            .dx11_shader_module()
            .ok_or_else(|| {
                OnyxError::InvalidArgument("shader module is not a dx11 module".to_string())
            })?
            .bytecode()
            .to_vec();

        let mut create_stage = |stage_flag: OnyxShaderStageFlags,
                                stage: Dx11ShaderStage|
         -> OnyxResult<Option<NativeShader>> {
            match shader.stage_def(stage_flag) {
                Some(stage_def) => {
                    let module = stage_def.shader_module.dx11_shader_module().ok_or_else(
                        || {
                            OnyxError::InvalidArgument(
                                "shader module is not a dx11 module".to_string(),
                            )
                        },
                    )?;
                    Ok(Some(device_ops.create_shader(stage, module.bytecode())?))
                }
                None => Ok(None),
            }
        };

        let vertex_shader = create_stage(OnyxShaderStageFlags::VERTEX, Dx11ShaderStage::Vertex)?;
        let hull_shader = create_stage(
            OnyxShaderStageFlags::TESSELLATION_CONTROL,
            Dx11ShaderStage::Hull,
        )?;
        let domain_shader = create_stage(
            OnyxShaderStageFlags::TESSELLATION_EVALUATION,
            Dx11ShaderStage::Domain,
        )?;
        let geometry_shader =
            create_stage(OnyxShaderStageFlags::GEOMETRY, Dx11ShaderStage::Geometry)?;
        let pixel_shader = create_stage(OnyxShaderStageFlags::FRAGMENT, Dx11ShaderStage::Pixel)?;

        let input_layout = if def.vertex_layout.attributes.is_empty() {
            None
        } else {
            let mut elements = Vec::with_capacity(def.vertex_layout.attributes.len());
            for attribute in &def.vertex_layout.attributes {
                let buffer = def
                    .vertex_layout
                    .buffers
                    .get(attribute.buffer_index as usize)
                    .ok_or_else(|| {
                        OnyxError::InvalidArgument(format!(
                            "vertex attribute {:?} references buffer binding {} of {}",
                            attribute.semantic,
                            attribute.buffer_index,
                            def.vertex_layout.buffers.len()
                        ))
                    })?;

                let per_instance = buffer.rate == OnyxVertexAttributeRate::Instance;
                elements.push(Dx11InputElementDesc {
                    semantic_name: attribute.semantic.clone(),
                    semantic_index: attribute.semantic_index,
                    format: attribute.format.into(),
                    input_slot: attribute.buffer_index,
                    aligned_byte_offset: attribute.byte_offset,
                    per_instance,
                    instance_data_step_rate: if per_instance { 1 } else { 0 },
                });
            }
            Some(device_ops.create_input_layout(&elements, &vertex_bytecode)?)
        };

        let blend_state =
            Some(device_ops.create_blend_state(&conversions::blend_desc(def.blend_state))?);
        let depth_stencil_state = Some(
            device_ops
                .create_depth_stencil_state(&conversions::depth_stencil_desc(def.depth_state))?,
        );

        let base_desc = conversions::rasterizer_desc(def.rasterizer_state);
        let base = device_ops.create_rasterizer_state(&base_desc, &[])?;
        let rasterizer = RasterizerVariants {
            base_desc,
            base,
            current: base,
            variants: Default::default(),
        };

        let vertex_strides = def.vertex_layout.buffers.iter().map(|b| b.stride).collect();

        Ok(OnyxPipelineDx11 {
            inner: Arc::new(OnyxPipelineDx11Inner {
                device_context: device_context.clone(),
                pipeline_type: OnyxPipelineType::Graphics,
                pipeline_layout: pipeline_layout.clone(),
                vertex_shader,
                hull_shader,
                domain_shader,
                geometry_shader,
                pixel_shader,
                compute_shader: None,
                input_layout,
                topology: def.primitive_topology.into(),
                vertex_strides,
                blend_state,
                blend_factor: def.blend_state.blend_constants,
                sample_mask: def.sample_mask,
                depth_stencil_state,
                rasterizer: Some(Mutex::new(rasterizer)),
                rasterizer_discard: def.rasterizer_state.rasterizer_discard_enabled,
            }),
        })
    }

    pub fn new_compute_pipeline(
        device_context: &OnyxDeviceContextDx11,
        def: &OnyxComputePipelineDef,
    ) -> OnyxResult<Self> {
        log::trace!("creating compute OnyxPipelineDx11");

        let shader = def.shader.dx11_shader().ok_or_else(|| {
            OnyxError::InvalidArgument("shader is not a dx11 shader".to_string())
        })?;
        let pipeline_layout = def.pipeline_layout.dx11_pipeline_layout().ok_or_else(|| {
            OnyxError::InvalidArgument("pipeline layout is not a dx11 layout".to_string())
        })?;

        let compute_stage = shader
            .stage_def(OnyxShaderStageFlags::COMPUTE)
            .ok_or_else(|| {
                OnyxError::InvalidArgument(
                    "compute pipelines require a compute shader stage".to_string(),
                )
            })?;
        let module = compute_stage
            .shader_module
            .dx11_shader_module()
            .ok_or_else(|| {
                OnyxError::InvalidArgument("shader module is not a dx11 module".to_string())
            })?;

        let compute_shader = Some(
            device_context
                .device_ops()
                .create_shader(Dx11ShaderStage::Compute, module.bytecode())?,
        );

        Ok(OnyxPipelineDx11 {
            inner: Arc::new(OnyxPipelineDx11Inner {
                device_context: device_context.clone(),
                pipeline_type: OnyxPipelineType::Compute,
                pipeline_layout: pipeline_layout.clone(),
                vertex_shader: None,
                hull_shader: None,
                domain_shader: None,
                geometry_shader: None,
                pixel_shader: None,
                compute_shader,
                input_layout: None,
                topology: d3d11::D3D_PRIMITIVE_TOPOLOGY_UNDEFINED,
                vertex_strides: Vec::new(),
                blend_state: None,
                blend_factor: [0.0; 4],
                sample_mask: !0,
                depth_stencil_state: None,
                rasterizer: None,
                rasterizer_discard: false,
            }),
        })
    }

    pub fn pipeline_type(&self) -> OnyxPipelineType {
        self.inner.pipeline_type
    }

    pub fn pipeline_layout(&self) -> &OnyxPipelineLayoutDx11 {
        &self.inner.pipeline_layout
    }

    pub(crate) fn vertex_strides(&self) -> &[u32] {
        &self.inner.vertex_strides
    }

    pub(crate) fn is_rasterizer_discard_enabled(&self) -> bool {
        self.inner.rasterizer_discard
    }

    pub(crate) fn is_same(
        &self,
        other: &OnyxPipelineDx11,
    ) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Issue the native state calls that differ from `previous`. A `None` previous pipeline
    /// (the first bind after a reset) sets every slot unconditionally.
    pub(crate) fn bind(
        &self,
        context: &dyn Dx11ContextOps,
        previous: Option<&OnyxPipelineDx11>,
        stencil_ref: u32,
    ) {
        let this = &*self.inner;
        let prev = previous.map(|p| &*p.inner);

        if this.pipeline_type == OnyxPipelineType::Compute {
            if prev.map_or(true, |p| p.compute_shader != this.compute_shader) {
                context.set_shader(Dx11ShaderStage::Compute, this.compute_shader);
            }
            return;
        }

        if prev.map_or(true, |p| p.vertex_shader != this.vertex_shader) {
            context.set_shader(Dx11ShaderStage::Vertex, this.vertex_shader);
        }
        if prev.map_or(true, |p| p.hull_shader != this.hull_shader) {
            context.set_shader(Dx11ShaderStage::Hull, this.hull_shader);
        }
        if prev.map_or(true, |p| p.domain_shader != this.domain_shader) {
            context.set_shader(Dx11ShaderStage::Domain, this.domain_shader);
        }
        if prev.map_or(true, |p| p.geometry_shader != this.geometry_shader) {
            context.set_shader(Dx11ShaderStage::Geometry, this.geometry_shader);
        }
        if prev.map_or(true, |p| p.pixel_shader != this.pixel_shader) {
            context.set_shader(Dx11ShaderStage::Pixel, this.pixel_shader);
        }

        if prev.map_or(true, |p| p.input_layout != this.input_layout) {
            context.ia_set_input_layout(this.input_layout);
        }
        if prev.map_or(true, |p| p.topology != this.topology) {
            context.ia_set_primitive_topology(this.topology);
        }

        if prev.map_or(true, |p| {
            p.blend_state != this.blend_state
                || p.blend_factor != this.blend_factor
                || p.sample_mask != this.sample_mask
        }) {
            context.om_set_blend_state(this.blend_state, this.blend_factor, this.sample_mask);
        }

        if prev.map_or(true, |p| p.depth_stencil_state != this.depth_stencil_state) {
            context.om_set_depth_stencil_state(this.depth_stencil_state, stencil_ref);
        }

        let current_rasterizer = this
            .rasterizer
            .as_ref()
            .map(|r| r.lock().unwrap().current);
        let prev_rasterizer = prev
            .and_then(|p| p.rasterizer.as_ref())
            .map(|r| r.lock().unwrap().current);
        if previous.is_none() || current_rasterizer != prev_rasterizer {
            context.rs_set_state(current_rasterizer);
        }
    }

    /// Re-issue the depth-stencil state with a new dynamic stencil reference value
    pub(crate) fn apply_stencil_reference(
        &self,
        context: &dyn Dx11ContextOps,
        stencil_ref: u32,
    ) {
        if self.inner.pipeline_type == OnyxPipelineType::Graphics {
            context.om_set_depth_stencil_state(self.inner.depth_stencil_state, stencil_ref);
        }
    }

    /// Switch to (or lazily create) the rasterizer-state variant for `sample_positions` and bind
    /// it. An empty position set reverts to the base state. If the native creation fails the
    /// previous rasterizer state stays bound and the error is returned.
    pub(crate) fn change_sample_positions(
        &self,
        context: &dyn Dx11ContextOps,
        sample_positions: &[OnyxSamplePosition],
    ) -> OnyxResult<()> {
        let rasterizer = match &self.inner.rasterizer {
            Some(rasterizer) => rasterizer,
            None => {
                return Err(OnyxError::InvalidArgument(
                    "sample positions only apply to graphics pipelines".to_string(),
                ))
            }
        };

        let mut rasterizer = rasterizer.lock().unwrap();

        let state = if sample_positions.is_empty() {
            rasterizer.base
        } else {
            let hash = hash_sample_positions(sample_positions);
            match rasterizer.variants.get(&hash) {
                Some(&variant) => variant,
                None => {
                    let variant = match self
                        .inner
                        .device_context
                        .device_ops()
                        .create_rasterizer_state(&rasterizer.base_desc, sample_positions)
                    {
                        Ok(variant) => variant,
                        Err(e) => {
                            log::error!(
                                "ID3D11Device::CreateRasterizerState failed for sample position \
                                 variant, keeping the previous rasterizer state: {}",
                                e
                            );
                            return Err(e);
                        }
                    };
                    rasterizer.variants.insert(hash, variant);
                    variant
                }
            }
        };

        if state != rasterizer.current {
            rasterizer.current = state;
            context.rs_set_state(Some(state));
        }

        Ok(())
    }
}

/// 64-bit FNV-1a over the raw position bytes. Colliding position sets are treated as identical
/// state.
fn hash_sample_positions(sample_positions: &[OnyxSamplePosition]) -> u64 {
    let mut hasher = FnvHasher::default();
    for position in sample_positions {
        hasher.write(&[position.x as u8, position.y as u8]);
    }
    hasher.write_u8(sample_positions.len() as u8);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::super::internal::testing::{MockDevice, NativeCall};
    use super::*;
    use crate::dx11::{OnyxApiDefDx11, OnyxApiDx11};
    use crate::{
        OnyxBlendState, OnyxDepthState, OnyxPipelineLayoutDef, OnyxRasterizerState,
        OnyxSampleCount, OnyxShaderStageDef, OnyxVertexLayout,
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

        fn graphics_pipeline(&self) -> OnyxPipelineDx11 {
            let device_context = self.api.device_context();

            let vertex_module = crate::OnyxShaderModule::Dx11(
                device_context.create_shader_module(&[1, 2, 3, 4]).unwrap(),
            );
            let shader = crate::OnyxShader::Dx11(
                device_context
                    .create_shader(vec![OnyxShaderStageDef {
                        shader_module: vertex_module,
                        entry_point: "main".to_string(),
                        shader_stage: OnyxShaderStageFlags::VERTEX,
                    }])
                    .unwrap(),
            );
            let pipeline_layout = crate::OnyxPipelineLayout::Dx11(
                device_context
                    .create_pipeline_layout(&OnyxPipelineLayoutDef {
                        pipeline_type: OnyxPipelineType::Graphics,
                        descriptor_sets: vec![],
                        push_constants: vec![],
                    })
                    .unwrap(),
            );

            device_context
                .create_graphics_pipeline(&OnyxGraphicsPipelineDef {
                    shader: &shader,
                    pipeline_layout: &pipeline_layout,
                    vertex_layout: &OnyxVertexLayout::default(),
                    blend_state: &OnyxBlendState::default(),
                    depth_state: &OnyxDepthState::default(),
                    rasterizer_state: &OnyxRasterizerState::default(),
                    primitive_topology: crate::OnyxPrimitiveTopology::TriangleList,
                    color_formats: &[crate::OnyxFormat::R8G8B8A8_UNORM],
                    depth_stencil_format: None,
                    sample_count: OnyxSampleCount::SampleCount1,
                    sample_mask: !0,
                })
                .unwrap()
        }
    }

    #[test]
    fn first_bind_sets_every_slot() {
        let fixture = Fixture::new();
        let pipeline = fixture.graphics_pipeline();
        let context = fixture.device.mock_immediate();
        context.take_calls();

        pipeline.bind(&**context, None, 0);

        let calls = context.take_calls();
        // 5 shader stages, input layout, topology, blend, depth-stencil, rasterizer
        assert_eq!(calls.len(), 10);
    }

    #[test]
    fn rebinding_the_same_pipeline_issues_zero_calls() {
        let fixture = Fixture::new();
        let pipeline = fixture.graphics_pipeline();
        let context = fixture.device.mock_immediate();

        pipeline.bind(&**context, None, 0);
        context.take_calls();

        pipeline.bind(&**context, Some(&pipeline), 0);
        assert_eq!(context.call_count(), 0);
    }

    #[test]
    fn sample_position_variants_are_cached_by_hash() {
        let fixture = Fixture::new();
        let pipeline = fixture.graphics_pipeline();
        let context = fixture.device.mock_immediate();
        context.take_calls();

        let positions = [
            OnyxSamplePosition { x: -4, y: 4 },
            OnyxSamplePosition { x: 4, y: -4 },
        ];

        let live_before = fixture.device.live_object_count();
        pipeline.change_sample_positions(&**context, &positions).unwrap();
        let live_after_first = fixture.device.live_object_count();
        assert_eq!(live_after_first, live_before + 1);

        // Re-binding the base, then the same positions again: the variant is reused
        pipeline.change_sample_positions(&**context, &[]).unwrap();
        pipeline.change_sample_positions(&**context, &positions).unwrap();
        assert_eq!(fixture.device.live_object_count(), live_after_first);

        let calls = context.take_calls();
        assert_eq!(
            calls.iter().filter(|c| matches!(c, NativeCall::RsSetState(_))).count(),
            3
        );
    }

    #[test]
    fn failed_variant_creation_keeps_the_previous_rasterizer_state() {
        let fixture = Fixture::new();
        let pipeline = fixture.graphics_pipeline();
        let context = fixture.device.mock_immediate();
        context.take_calls();

        fixture.device.fail_next_create();
        let result = pipeline
            .change_sample_positions(&**context, &[OnyxSamplePosition { x: 1, y: 1 }]);

        assert!(result.is_err());
        // No native state change was issued; the previous rasterizer state stays bound
        assert_eq!(context.call_count(), 0);

        // Binding again still uses the base state, never a null pointer
        pipeline.bind(&**context, None, 0);
        let calls = context.take_calls();
        assert!(calls
            .iter()
            .any(|c| matches!(c, NativeCall::RsSetState(Some(_)))));
    }
}
