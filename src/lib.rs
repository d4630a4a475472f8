//! A graphics API abstraction layer with an explicit, Vulkan/D3D12-style object model
//! (devices, buffers, textures, descriptors, pipeline layouts, pipelines, command buffers,
//! fences) implemented per native backend and dispatched through closed enums.
//!
//! The Direct3D 11 backend maps this explicit model onto the immediate/deferred-context model:
//! descriptor sets compile into flat per-stage slot ranges, read/write hazards the native API
//! cannot express are tracked and broken at bind time, and on drivers without real deferred
//! command lists, command buffers record into a replayable software op-stream instead.

pub use api::*;
pub use buffer::*;
pub use command_buffer::*;
pub use command_pool::*;
pub use descriptor::*;
pub use descriptor_pool::*;
pub use descriptor_set::*;
pub use device_context::*;
pub use error::*;
pub use fence::*;
pub use pipeline::*;
pub use pipeline_layout::*;
pub use queue::*;
pub use sampler::*;
pub use shader::*;
pub use shader_module::*;
pub use texture::*;
pub use types::*;

#[cfg(feature = "onyx-dx11")]
pub use backends::dx11;
#[cfg(any(feature = "onyx-empty", not(feature = "onyx-dx11")))]
pub use backends::empty;

mod backends;
mod error;
mod types;

mod api;
mod buffer;
mod command_buffer;
mod command_pool;
mod descriptor;
mod descriptor_pool;
mod descriptor_set;
mod device_context;
mod fence;
mod pipeline;
mod pipeline_layout;
mod queue;
mod sampler;
mod shader;
mod shader_module;
mod texture;
