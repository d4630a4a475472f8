use crate::dx11::OnyxDeviceContextDx11;
use crate::{OnyxFenceStatus, OnyxResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::internal::native::{Dx11ContextOps, NativeQuery};

/// Completion signaling over a native event query. The queue ends the query when it signals the
/// fence; waiting polls the query result in a bounded busy-wait, the only wait primitive this
/// backend has.
#[derive(Debug)]
pub struct OnyxFenceDx11 {
    device_context: OnyxDeviceContextDx11,
    query: NativeQuery,
    // Set when an operation is scheduled to signal this fence, cleared once the wait completes
    submitted: AtomicBool,
}

impl Drop for OnyxFenceDx11 {
    fn drop(&mut self) {
        self.device_context.device_ops().destroy_object(self.query.0);
    }
}

impl OnyxFenceDx11 {
    pub fn new(device_context: &OnyxDeviceContextDx11) -> OnyxResult<Self> {
        let query = device_context.device_ops().create_event_query()?;

        Ok(OnyxFenceDx11 {
            device_context: device_context.clone(),
            query,
            submitted: AtomicBool::new(false),
        })
    }

    pub fn dx11_query(&self) -> NativeQuery {
        self.query
    }

    pub(crate) fn submitted(&self) -> bool {
        self.submitted.load(Ordering::Acquire)
    }

    /// Issued by the queue while it holds the immediate-context lock
    pub(crate) fn queue_signal_locked(
        &self,
        immediate_context: &Arc<dyn Dx11ContextOps>,
    ) {
        immediate_context.end_event_query(self.query);
        self.submitted.store(true, Ordering::Release);
    }

    /// Wait while the caller already holds the immediate-context lock
    pub(crate) fn wait_locked(
        &self,
        immediate_context: &Arc<dyn Dx11ContextOps>,
    ) -> OnyxResult<()> {
        if !self.submitted() {
            // Waiting on a fence that was never signaled would spin forever
            return Ok(());
        }

        while !immediate_context.get_event_query_data(self.query) {
            std::hint::spin_loop();
        }

        self.submitted.store(false, Ordering::Release);
        Ok(())
    }

    pub fn wait(&self) -> OnyxResult<()> {
        if !self.submitted() {
            return Ok(());
        }

        loop {
            let done = {
                let _guard = self.device_context.immediate_context_lock();
                self.device_context
                    .immediate_context()
                    .get_event_query_data(self.query)
            };
            if done {
                break;
            }
            std::thread::yield_now();
        }

        self.submitted.store(false, Ordering::Release);
        Ok(())
    }

    pub fn get_fence_status(&self) -> OnyxResult<OnyxFenceStatus> {
        if !self.submitted() {
            return Ok(OnyxFenceStatus::Unsubmitted);
        }

        let is_ready = {
            let _guard = self.device_context.immediate_context_lock();
            self.device_context
                .immediate_context()
                .get_event_query_data(self.query)
        };

        if is_ready {
            self.submitted.store(false, Ordering::Release);
            Ok(OnyxFenceStatus::Complete)
        } else {
            Ok(OnyxFenceStatus::Incomplete)
        }
    }

    pub fn wait_for_fences(
        _device_context: &OnyxDeviceContextDx11,
        fences: &[&OnyxFenceDx11],
    ) -> OnyxResult<()> {
        for fence in fences {
            if fence.submitted() {
                fence.wait()?;
            }
        }

        Ok(())
    }
}
