use crate::dx11::{OnyxCommandBufferDx11, OnyxCommandPoolDx11, OnyxDeviceContextDx11,
    OnyxFenceDx11};
use crate::{OnyxCommandPoolDef, OnyxQueueType, OnyxResult};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

static NEXT_QUEUE_ID: AtomicU32 = AtomicU32::new(0);

#[derive(Debug)]
pub struct OnyxQueueDx11Inner {
    device_context: OnyxDeviceContextDx11,
    // Graphics/compute/transfer all drain into the immediate context; the type is kept for
    // call-surface parity with backends that have real hardware queues
    queue_type: OnyxQueueType,
    queue_id: u32,
    queue_fence: OnyxFenceDx11,
}

/// The single logical queue. D3D11 has one hardware submission path, the immediate context,
/// so every queue drains into it under the shared critical section.
#[derive(Clone, Debug)]
pub struct OnyxQueueDx11 {
    inner: Arc<OnyxQueueDx11Inner>,
}

impl OnyxQueueDx11 {
    pub fn new(
        device_context: &OnyxDeviceContextDx11,
        queue_type: OnyxQueueType,
    ) -> OnyxResult<Self> {
        let queue_fence = OnyxFenceDx11::new(device_context)?;
        let queue_id = NEXT_QUEUE_ID.fetch_add(1, Ordering::Relaxed);

        Ok(OnyxQueueDx11 {
            inner: Arc::new(OnyxQueueDx11Inner {
                device_context: device_context.clone(),
                queue_type,
                queue_id,
                queue_fence,
            }),
        })
    }

    pub fn queue_id(&self) -> u32 {
        self.inner.queue_id
    }

    pub fn queue_type(&self) -> OnyxQueueType {
        self.inner.queue_type
    }

    pub fn device_context(&self) -> &OnyxDeviceContextDx11 {
        &self.inner.device_context
    }

    pub fn create_command_pool(
        &self,
        command_pool_def: &OnyxCommandPoolDef,
    ) -> OnyxResult<OnyxCommandPoolDx11> {
        OnyxCommandPoolDx11::new(self, command_pool_def)
    }

    /// Drain a submission: wait fences, then command buffers, then signal fences, in that strict
    /// order, all under the immediate-context lock.
    #[profiling::function]
    pub fn submit(
        &self,
        command_buffers: &[&OnyxCommandBufferDx11],
        wait_fences: &[&OnyxFenceDx11],
        signal_fences: &[&OnyxFenceDx11],
    ) -> OnyxResult<()> {
        let device_context = &self.inner.device_context;
        let _guard = device_context.immediate_context_lock();
        let immediate_context = device_context.immediate_context();

        for wait_fence in wait_fences {
            wait_fence.wait_locked(immediate_context)?;
        }

        for command_buffer in command_buffers {
            command_buffer.submit_locked(immediate_context)?;
        }

        for signal_fence in signal_fences {
            signal_fence.queue_signal_locked(immediate_context);
        }

        Ok(())
    }

    pub fn wait_for_queue_idle(&self) -> OnyxResult<()> {
        {
            let device_context = &self.inner.device_context;
            let _guard = device_context.immediate_context_lock();
            let immediate_context = device_context.immediate_context();
            immediate_context.flush();
            self.inner.queue_fence.queue_signal_locked(immediate_context);
        }
        self.inner.queue_fence.wait()
    }
}

#[cfg(test)]
mod tests {
    use super::super::internal::testing::{MockDevice, NativeCall};
    use super::*;
    use crate::dx11::{OnyxApiDefDx11, OnyxApiDx11};
    use crate::{OnyxCommandBufferDef, OnyxFenceStatus};

    #[test]
    fn submission_drains_waits_then_work_then_signals() {
        let device = MockDevice::new();
        let api = OnyxApiDx11::from_device_ops(device.clone(), &OnyxApiDefDx11::default()).unwrap();
        let device_context = api.device_context();

        let queue = device_context.create_queue(crate::OnyxQueueType::Graphics).unwrap();
        let pool = queue.create_command_pool(&Default::default()).unwrap();
        let command_buffer = pool
            .create_command_buffer(&OnyxCommandBufferDef {
                force_emulated: true,
            })
            .unwrap();

        command_buffer.begin().unwrap();
        command_buffer.cmd_draw(3, 0).unwrap();
        command_buffer.end().unwrap();

        let wait_fence = device_context.create_fence().unwrap();
        let signal_fence = device_context.create_fence().unwrap();

        // Give the wait fence something to wait on
        queue.submit(&[], &[], &[&wait_fence]).unwrap();

        let immediate = device.mock_immediate();
        immediate.take_calls();

        queue
            .submit(&[&command_buffer], &[&wait_fence], &[&signal_fence])
            .unwrap();

        let calls = immediate.take_calls();
        assert_eq!(
            calls,
            vec![
                NativeCall::Draw {
                    vertex_count: 3,
                    start_vertex: 0,
                },
                NativeCall::EndEventQuery(signal_fence.dx11_query()),
            ]
        );
    }

    #[test]
    fn fence_status_tracks_submission() {
        let device = MockDevice::new();
        let api = OnyxApiDx11::from_device_ops(device, &OnyxApiDefDx11::default()).unwrap();
        let device_context = api.device_context();

        let queue = device_context.create_queue(crate::OnyxQueueType::Graphics).unwrap();
        let fence = device_context.create_fence().unwrap();

        assert_eq!(fence.get_fence_status().unwrap(), OnyxFenceStatus::Unsubmitted);

        queue.submit(&[], &[], &[&fence]).unwrap();
        // The mock GPU completes instantly
        assert_eq!(fence.get_fence_status().unwrap(), OnyxFenceStatus::Complete);
        assert_eq!(fence.get_fence_status().unwrap(), OnyxFenceStatus::Unsubmitted);
    }

    #[test]
    fn queue_idle_wait_signals_and_waits_its_own_fence() {
        let device = MockDevice::new();
        let api = OnyxApiDx11::from_device_ops(device.clone(), &OnyxApiDefDx11::default()).unwrap();

        let queue = api.device_context().create_queue(crate::OnyxQueueType::Graphics).unwrap();
        let immediate = device.mock_immediate();
        immediate.take_calls();

        queue.wait_for_queue_idle().unwrap();

        let calls = immediate.take_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0], NativeCall::Flush);
        assert!(matches!(calls[1], NativeCall::EndEventQuery(_)));
    }
}
