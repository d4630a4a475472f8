//! The Direct3D 11 backend. Maps the explicit descriptor-set/pipeline-layout/command-buffer
//! object model onto the D3D11 immediate/deferred-context model. Command buffers record into a
//! real deferred context when the driver supports command lists and fall back to a software
//! op-stream recorder when it does not.

pub mod d3d11;

mod internal;

#[cfg(windows)]
mod ffi;

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

pub use api::*;
pub use buffer::*;
pub use command_buffer::*;
pub use command_pool::*;
pub use descriptor::*;
pub use descriptor_pool::*;
pub use descriptor_set::*;
pub use device_context::*;
pub use fence::*;
pub use pipeline::*;
pub use pipeline_layout::*;
pub use queue::*;
pub use sampler::*;
pub use shader::*;
pub use shader_module::*;
pub use texture::*;

pub use internal::native::{
    Dx11ContextOps, Dx11DeviceOps, Dx11ShaderStage, NativeBlendState, NativeBuffer,
    NativeCommandList, NativeDepthStencilState, NativeDsv, NativeInputLayout, NativeQuery,
    NativeRasterizerState, NativeResource, NativeRtv, NativeSampler, NativeShader, NativeSrv,
    NativeTexture, NativeUav,
};
pub use internal::native::{
    Dx11BlendDesc, Dx11DepthStencilDesc, Dx11DepthStencilOpDesc, Dx11DsvDesc,
    Dx11InputElementDesc, Dx11RasterizerDesc, Dx11RenderTargetBlendDesc, Dx11RtvDesc,
    Dx11SamplerDesc, Dx11SrvDesc, Dx11TextureDesc, Dx11TextureDimension, Dx11UavDesc,
    ALL_SHADER_STAGES,
};
