use crate::dx11::{OnyxCommandBufferDx11, OnyxDeviceContextDx11, OnyxQueueDx11};
use crate::{OnyxCommandBufferDef, OnyxCommandPoolDef, OnyxResult};

/// Allocates command buffers for one queue. D3D11 has no native command allocator; the pool
/// exists for call-surface parity and decides nothing beyond which device the buffers record
/// against.
pub struct OnyxCommandPoolDx11 {
    device_context: OnyxDeviceContextDx11,
    _queue: OnyxQueueDx11,
}

impl OnyxCommandPoolDx11 {
    pub fn new(
        queue: &OnyxQueueDx11,
        _command_pool_def: &OnyxCommandPoolDef,
    ) -> OnyxResult<Self> {
        Ok(OnyxCommandPoolDx11 {
            device_context: queue.device_context().clone(),
            _queue: queue.clone(),
        })
    }

    pub fn device_context(&self) -> &OnyxDeviceContextDx11 {
        &self.device_context
    }

    pub fn create_command_buffer(
        &self,
        command_buffer_def: &OnyxCommandBufferDef,
    ) -> OnyxResult<OnyxCommandBufferDx11> {
        OnyxCommandBufferDx11::new(self, command_buffer_def)
    }

    /// Command buffers re-record in place on `begin`; there is no pool-level state to reclaim
    pub fn reset_command_pool(&self) -> OnyxResult<()> {
        Ok(())
    }
}
