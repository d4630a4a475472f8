#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Controls if validation is enabled or not. The requirements/behaviors of validation is
/// API-specific.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OnyxValidationMode {
    /// Do not enable validation. Even if validation is turned on through external means, do not
    /// intentionally fail initialization
    Disabled,

    /// Enable validation if possible. (Details on requirements to enable at runtime are
    /// API-specific)
    EnabledIfAvailable,

    /// Enable validation, and fail if we cannot enable it or detect that it is not enabled through
    /// external means. (Details on this are API-specific)
    Enabled,
}

impl Default for OnyxValidationMode {
    fn default() -> Self {
        #[cfg(debug_assertions)]
        let validation_mode = OnyxValidationMode::EnabledIfAvailable;
        #[cfg(not(debug_assertions))]
        let validation_mode = OnyxValidationMode::Disabled;

        validation_mode
    }
}

/// Information about the device: limits, alignment requirements, and flags indicating which
/// capabilities the backend could enable at creation time.
#[derive(Clone, Debug)]
pub struct OnyxDeviceInfo {
    pub supports_multithreaded_usage: bool,

    /// True when the driver can record real deferred-context command lists. When false, command
    /// buffers fall back to software op-stream emulation.
    pub supports_deferred_command_lists: bool,

    /// True on feature level 11.1+ where the bounded-range constant buffer bind calls exist.
    /// Dynamic constant buffer offsets are silently wrong below this level.
    pub supports_constant_buffer_offsets: bool,

    pub min_uniform_buffer_offset_alignment: u32,
    pub min_storage_buffer_offset_alignment: u32,
    pub upload_buffer_texture_alignment: u32,
    pub upload_buffer_texture_row_alignment: u32,

    pub max_vertex_attribute_count: u32,
}

/// Used to indicate which type of queue to use. Some operations require certain types of queues.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OnyxQueueType {
    /// Graphics queues generally supports all operations and are a safe default choice
    Graphics,

    /// Compute queues can be used for compute-based work.
    Compute,

    /// Transfer queues are generally limited to basic operations like copying data from buffers
    /// to images.
    Transfer,
}

/// Whether a pipeline (and the layout it was built from) targets the graphics or the compute
/// pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum OnyxPipelineType {
    Graphics,
    Compute,
}

/// The status of a fence as of the most recent poll.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OnyxFenceStatus {
    /// The fence was submitted and the GPU has completed the work preceding it
    Complete,
    /// The fence was submitted but the GPU has not reached it yet
    Incomplete,
    /// The fence has never been submitted, waiting on it would deadlock
    Unsubmitted,
}

/// A 2d size for textures, viewports, etc.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OnyxExtents2D {
    pub width: u32,
    pub height: u32,
}

/// A 3d size for textures, dispatch sizes, etc.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OnyxExtents3D {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl OnyxExtents3D {
    pub fn to_2d(self) -> OnyxExtents2D {
        OnyxExtents2D {
            width: self.width,
            height: self.height,
        }
    }
}

/// Number of MSAA samples to use. 1xMSAA and 4xMSAA are most broadly supported
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxSampleCount {
    SampleCount1,
    SampleCount2,
    SampleCount4,
    SampleCount8,
    SampleCount16,
}

impl Default for OnyxSampleCount {
    fn default() -> Self {
        OnyxSampleCount::SampleCount1
    }
}

impl OnyxSampleCount {
    pub fn as_u32(self) -> u32 {
        match self {
            OnyxSampleCount::SampleCount1 => 1,
            OnyxSampleCount::SampleCount2 => 2,
            OnyxSampleCount::SampleCount4 => 4,
            OnyxSampleCount::SampleCount8 => 8,
            OnyxSampleCount::SampleCount16 => 16,
        }
    }
}

/// A programmable sample location within a pixel, in 1/16th-of-a-pixel units relative to the
/// pixel center.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct OnyxSamplePosition {
    pub x: i8,
    pub y: i8,
}

bitflags::bitflags! {
    /// Indicates how a resource will be used. In some cases, multiple flags are allowed.
    #[derive(Default)]
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct OnyxResourceType: u32 {
        const UNDEFINED = 0;
        const SAMPLER = 1<<0;
        /// A texture readable by shader stages through a shader resource view
        const TEXTURE = 1<<1;
        /// A texture writable by shader stages through an unordered access view
        const TEXTURE_READ_WRITE = 1<<2;
        /// A buffer readable by shader stages through a shader resource view
        const BUFFER = 1<<3;
        /// A buffer writable by shader stages through an unordered access view
        const BUFFER_READ_WRITE = 1<<4;
        /// A constant (uniform) buffer
        const CONSTANT_BUFFER = 1<<5;
        const VERTEX_BUFFER = 1<<6;
        const INDEX_BUFFER = 1<<7;
        const INDIRECT_BUFFER = 1<<8;
        const RENDER_TARGET_COLOR = 1<<9;
        const RENDER_TARGET_DEPTH_STENCIL = 1<<10;
        const TEXTURE_CUBE = 1<<11 | OnyxResourceType::TEXTURE.bits();
    }
}

bitflags::bitflags! {
    /// The current state of a resource. When an operation is performed that references a resource,
    /// it must be in the correct state. Resources are moved between states using barriers, which
    /// on this backend are validated but map to no native work.
    pub struct OnyxResourceState: u32 {
        const UNDEFINED = 0;
        const VERTEX_AND_CONSTANT_BUFFER = 0x1;
        const INDEX_BUFFER = 0x2;
        const RENDER_TARGET = 0x4;
        const UNORDERED_ACCESS = 0x8;
        const DEPTH_WRITE = 0x10;
        const DEPTH_READ = 0x20;
        const SHADER_RESOURCE = 0x40;
        const INDIRECT_ARGUMENT = 0x80;
        const COPY_DST = 0x100;
        const COPY_SRC = 0x200;
        const PRESENT = 0x400;
        const COMMON = 0x800;
        const GENERIC_READ = 0x1 | 0x2 | 0x40 | 0x80 | 0x200;
    }
}

/// How a resource's backing memory is accessed by the CPU and GPU. Determines the native
/// usage/CPU-access/bind flag triple at creation time.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxMemoryUsage {
    Unknown,
    /// Device-local, never CPU mapped
    GpuOnly,
    /// CPU mapped staging memory, readable by copies only
    CpuOnly,
    /// CPU-written, GPU-read (dynamic buffers)
    CpuToGpu,
    /// GPU-written, CPU-read (readback)
    GpuToCpu,
}

impl Default for OnyxMemoryUsage {
    fn default() -> Self {
        OnyxMemoryUsage::Unknown
    }
}

bitflags::bitflags! {
    #[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
    pub struct OnyxShaderStageFlags: u32 {
        const NONE = 0;
        const VERTEX = 1;
        const TESSELLATION_CONTROL = 2;
        const TESSELLATION_EVALUATION = 4;
        const GEOMETRY = 8;
        const FRAGMENT = 16;
        const COMPUTE = 32;
        const ALL_GRAPHICS = 0x1F;
        const ALL = 0x3F;
    }
}

pub const ALL_SHADER_STAGE_FLAGS: [OnyxShaderStageFlags; 6] = [
    OnyxShaderStageFlags::VERTEX,
    OnyxShaderStageFlags::TESSELLATION_CONTROL,
    OnyxShaderStageFlags::TESSELLATION_EVALUATION,
    OnyxShaderStageFlags::GEOMETRY,
    OnyxShaderStageFlags::FRAGMENT,
    OnyxShaderStageFlags::COMPUTE,
];

/// The class of a descriptor binding. The binding engine chooses the native bind path (and the
/// hazard-tracking rules) from this, never from the native view type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxDescriptorClass {
    /// No read/write hazards
    Sampler,
    /// Constant buffer with an offset baked into the descriptor
    ConstantBuffer,
    /// Read-only shader resource (SRV)
    ShaderResource,
    /// Shader-writable resource (UAV)
    Storage,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxPrimitiveTopology {
    PointList,
    LineList,
    LineStrip,
    TriangleList,
    TriangleStrip,
    PatchList { control_point_count: u8 },
}

impl Default for OnyxPrimitiveTopology {
    fn default() -> Self {
        OnyxPrimitiveTopology::TriangleList
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxIndexType {
    Uint32,
    Uint16,
}

impl Default for OnyxIndexType {
    fn default() -> Self {
        OnyxIndexType::Uint32
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxFillMode {
    Solid,
    Wireframe,
}

impl Default for OnyxFillMode {
    fn default() -> Self {
        OnyxFillMode::Solid
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxCullMode {
    None,
    Back,
    Front,
}

impl Default for OnyxCullMode {
    fn default() -> Self {
        OnyxCullMode::None
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxFrontFace {
    CounterClockwise,
    Clockwise,
}

impl Default for OnyxFrontFace {
    fn default() -> Self {
        OnyxFrontFace::CounterClockwise
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxCompareOp {
    Never,
    Less,
    Equal,
    LessOrEqual,
    Greater,
    NotEqual,
    GreaterOrEqual,
    Always,
}

impl Default for OnyxCompareOp {
    fn default() -> Self {
        OnyxCompareOp::Always
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxStencilOp {
    Keep,
    Zero,
    Replace,
    IncrementAndClamp,
    DecrementAndClamp,
    Invert,
    IncrementAndWrap,
    DecrementAndWrap,
}

impl Default for OnyxStencilOp {
    fn default() -> Self {
        OnyxStencilOp::Keep
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxBlendFactor {
    Zero,
    One,
    SrcColor,
    OneMinusSrcColor,
    DstColor,
    OneMinusDstColor,
    SrcAlpha,
    OneMinusSrcAlpha,
    DstAlpha,
    OneMinusDstAlpha,
    SrcAlphaSaturate,
    ConstantColor,
    OneMinusConstantColor,
}

impl Default for OnyxBlendFactor {
    fn default() -> Self {
        OnyxBlendFactor::Zero
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxBlendOp {
    Add,
    Subtract,
    ReverseSubtract,
    Min,
    Max,
}

impl Default for OnyxBlendOp {
    fn default() -> Self {
        OnyxBlendOp::Add
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxFilterType {
    Nearest,
    Linear,
}

impl Default for OnyxFilterType {
    fn default() -> Self {
        OnyxFilterType::Nearest
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxMipMapMode {
    Nearest,
    Linear,
}

impl Default for OnyxMipMapMode {
    fn default() -> Self {
        OnyxMipMapMode::Nearest
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxAddressMode {
    Mirror,
    Repeat,
    ClampToEdge,
    ClampToBorder,
}

impl Default for OnyxAddressMode {
    fn default() -> Self {
        OnyxAddressMode::Repeat
    }
}

/// Whether a vertex attribute advances per vertex or per instance
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum OnyxVertexAttributeRate {
    Vertex,
    Instance,
}

impl Default for OnyxVertexAttributeRate {
    fn default() -> Self {
        OnyxVertexAttributeRate::Vertex
    }
}

/// A viewport with a depth range. Y points down, matching the native convention.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct OnyxViewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub min_depth: f32,
    pub max_depth: f32,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct OnyxScissor {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// The value a storage descriptor is cleared to. The integer-format flag of the descriptor
/// selects which representation the native clear call consumes.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum OnyxClearStorageValue {
    Float([f32; 4]),
    Uint([u32; 4]),
}

/// Arguments consumed by indirect draw calls, laid out as the GPU expects them
#[derive(Copy, Clone, Debug, Default)]
#[repr(C)]
pub struct OnyxDrawIndirectCommand {
    pub vertex_count: u32,
    pub instance_count: u32,
    pub first_vertex: u32,
    pub first_instance: u32,
}

/// Arguments consumed by indexed indirect draw calls, laid out as the GPU expects them
#[derive(Copy, Clone, Debug, Default)]
#[repr(C)]
pub struct OnyxDrawIndexedIndirectCommand {
    pub index_count: u32,
    pub instance_count: u32,
    pub first_index: u32,
    pub vertex_offset: i32,
    pub first_instance: u32,
}
