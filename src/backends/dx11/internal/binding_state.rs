//! Read/write hazard tracking for the D3D11 slot model.
//!
//! D3D11 has no explicit barriers, but it does enforce that a subresource cannot be bound as a
//! shader read (SRV) and a shader write (UAV) at the same time; the runtime silently nulls the
//! older binding and complains. The explicit-API model this backend emulates forbids that state
//! entirely, so every SRV/UAV bind consults this tracker and unbinds the conflicting slots first.
//!
//! Both lists are linear scans. Per-draw binding counts are tens at most, and the scan gives us
//! the remove-while-iterating pattern for free via swap-remove. Do not replace with a hash map
//! without measuring.

use super::super::d3d11::D3D11_PS_CS_UAV_REGISTER_COUNT;
use super::native::{Dx11ContextOps, NativeResource, NativeUav, ALL_SHADER_STAGES};
use crate::{OnyxError, OnyxResult};

/// The fixed graphics UAV slot range shared across all non-compute stages
pub(crate) const GRAPHICS_UAV_SLOT_COUNT: usize = D3D11_PS_CS_UAV_REGISTER_COUNT as usize;

/// Packed `{mip_first, mip_num, layer_first, layer_num}` window of a texture, or `WHOLE` for a
/// buffer. Layout: mips in the low byte pair, layers in the remaining 24 bits.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct SubresourceKey(u32);

impl SubresourceKey {
    /// Covers an entire buffer (buffers have no mip/layer structure)
    pub const WHOLE: SubresourceKey = SubresourceKey(u32::MAX);

    pub fn pack(
        mip_first: u8,
        mip_num: u8,
        layer_first: u16,
        layer_num: u16,
    ) -> OnyxResult<SubresourceKey> {
        // 4 bits per mip field, 12 bits per layer field
        if mip_first > 15 || mip_num > 15 {
            return Err(OnyxError::Unsupported(format!(
                "mip range [{}..+{}] exceeds packed subresource range capacity",
                mip_first, mip_num
            )));
        }
        if layer_first > 4095 || layer_num > 4095 {
            return Err(OnyxError::Unsupported(format!(
                "layer range [{}..+{}] exceeds packed subresource range capacity",
                layer_first, layer_num
            )));
        }

        Ok(SubresourceKey(
            (mip_first as u32)
                | (mip_num as u32) << 4
                | (layer_first as u32) << 8
                | (layer_num as u32) << 20,
        ))
    }
}

/// The hazard-tracking key. Two descriptors over the same resource and the same subresource
/// window are the same hazard unit even when their native view objects differ.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub(crate) struct SubresourceIdentity {
    pub resource: NativeResource,
    pub key: SubresourceKey,
}

#[derive(Debug)]
struct SrvEntry {
    identity: SubresourceIdentity,
    slot: u32,
}

#[derive(Debug)]
struct UavEntry {
    identity: SubresourceIdentity,
    slot: u32,
    graphics: bool,
}

/// Per-command-buffer tracker of which SRV and UAV slots currently hold which subresource
/// identities. Invariant: an identity appears in at most one of the two lists at a time.
#[derive(Debug)]
pub(crate) struct BindingState {
    srv_entries: Vec<SrvEntry>,
    uav_entries: Vec<UavEntry>,
    /// Mirror of the globally shared graphics UAV slot range, flushed as one combined call
    graphics_uavs: [Option<NativeUav>; GRAPHICS_UAV_SLOT_COUNT],
}

impl BindingState {
    pub fn new() -> Self {
        BindingState {
            srv_entries: Vec::new(),
            uav_entries: Vec::new(),
            graphics_uavs: [None; GRAPHICS_UAV_SLOT_COUNT],
        }
    }

    /// Record a new SRV binding at `slot`. Any tracked UAV binding of the same identity is
    /// unbound first: compute UAVs directly, graphics UAVs by clearing the mirror slot and
    /// reissuing the combined graphics UAV bind.
    pub fn track_srv_and_unbind_storage(
        &mut self,
        context: &dyn Dx11ContextOps,
        identity: SubresourceIdentity,
        slot: u32,
    ) {
        let mut flush_graphics = false;

        let mut i = 0;
        while i < self.uav_entries.len() {
            if self.uav_entries[i].identity == identity {
                let entry = self.uav_entries.swap_remove(i);
                if entry.graphics {
                    self.graphics_uavs[entry.slot as usize] = None;
                    flush_graphics = true;
                } else {
                    context.cs_set_unordered_access_views(entry.slot, &[None]);
                }
            } else {
                i += 1;
            }
        }

        if flush_graphics {
            self.flush_graphics_uavs(context);
        }

        self.srv_entries.push(SrvEntry { identity, slot });
    }

    /// Record a new UAV binding at `slot`. Any tracked SRV binding of the same identity is
    /// unbound from every shader stage first. Graphics UAVs only land in the mirror array here;
    /// the caller issues `flush_graphics_uavs` once at the end of the set-bind pass.
    pub fn track_uav_and_unbind_resources(
        &mut self,
        context: &dyn Dx11ContextOps,
        identity: SubresourceIdentity,
        slot: u32,
        graphics: bool,
        view: NativeUav,
    ) {
        let mut i = 0;
        while i < self.srv_entries.len() {
            if self.srv_entries[i].identity == identity {
                let entry = self.srv_entries.swap_remove(i);
                for &stage in &ALL_SHADER_STAGES {
                    context.set_shader_resources(stage, entry.slot, &[None]);
                }
            } else {
                i += 1;
            }
        }

        if graphics {
            self.graphics_uavs[slot as usize] = Some(view);
        }

        self.uav_entries.push(UavEntry {
            identity,
            slot,
            graphics,
        });
    }

    /// Issue the combined graphics UAV bind, sized to the highest non-null slot + 1 rather than
    /// the declared capacity. Slots beyond the passed count are implicitly null.
    pub fn flush_graphics_uavs(
        &self,
        context: &dyn Dx11ContextOps,
    ) {
        let count = self
            .graphics_uavs
            .iter()
            .rposition(|v| v.is_some())
            .map_or(0, |i| i + 1);

        context.om_set_unordered_access_views(0, &self.graphics_uavs[..count]);
    }

    /// Unbind every tracked slot across all stages and return to the hazard-free initial state.
    /// Must run at command buffer `begin`; skipping it leaks stale native bindings across
    /// recordings.
    pub fn unbind_and_reset(
        &mut self,
        context: &dyn Dx11ContextOps,
    ) {
        for entry in &self.srv_entries {
            for &stage in &ALL_SHADER_STAGES {
                context.set_shader_resources(stage, entry.slot, &[None]);
            }
        }

        let mut had_graphics_uavs = false;
        for entry in &self.uav_entries {
            if entry.graphics {
                self.graphics_uavs[entry.slot as usize] = None;
                had_graphics_uavs = true;
            } else {
                context.cs_set_unordered_access_views(entry.slot, &[None]);
            }
        }

        if had_graphics_uavs {
            self.flush_graphics_uavs(context);
        }

        self.srv_entries.clear();
        self.uav_entries.clear();
    }

    #[cfg(test)]
    fn tracked_srv_count(
        &self,
        identity: SubresourceIdentity,
    ) -> usize {
        self.srv_entries
            .iter()
            .filter(|e| e.identity == identity)
            .count()
    }

    #[cfg(test)]
    fn tracked_uav_count(
        &self,
        identity: SubresourceIdentity,
    ) -> usize {
        self.uav_entries
            .iter()
            .filter(|e| e.identity == identity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{MockContext, NativeCall};
    use super::*;
    use crate::dx11::Dx11ShaderStage;
    use std::sync::Arc;

    fn identity(resource_id: u64) -> SubresourceIdentity {
        SubresourceIdentity {
            resource: NativeResource(resource_id),
            key: SubresourceKey::WHOLE,
        }
    }

    #[test]
    fn pack_rejects_out_of_capacity_ranges() {
        assert!(SubresourceKey::pack(0, 15, 0, 4095).is_ok());
        assert!(SubresourceKey::pack(16, 1, 0, 1).is_err());
        assert!(SubresourceKey::pack(0, 1, 4096, 1).is_err());
    }

    #[test]
    fn identity_matches_on_range_not_view() {
        let a = SubresourceIdentity {
            resource: NativeResource(7),
            key: SubresourceKey::pack(0, 1, 0, 1).unwrap(),
        };
        let b = SubresourceIdentity {
            resource: NativeResource(7),
            key: SubresourceKey::pack(0, 1, 0, 1).unwrap(),
        };
        let c = SubresourceIdentity {
            resource: NativeResource(7),
            key: SubresourceKey::pack(1, 1, 0, 1).unwrap(),
        };
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn srv_bind_unbinds_conflicting_compute_uav() {
        let context = Arc::new(MockContext::new());
        let mut state = BindingState::new();
        let id = identity(1);

        state.track_uav_and_unbind_resources(&*context, id, 2, false, NativeUav(100));
        context.take_calls();

        state.track_srv_and_unbind_storage(&*context, id, 5);

        let calls = context.take_calls();
        assert_eq!(
            calls,
            vec![NativeCall::CsSetUnorderedAccessViews {
                start_slot: 2,
                views: vec![None],
            }]
        );
        assert_eq!(state.tracked_uav_count(id), 0);
        assert_eq!(state.tracked_srv_count(id), 1);
    }

    #[test]
    fn uav_bind_unbinds_conflicting_srv_from_every_stage() {
        let context = Arc::new(MockContext::new());
        let mut state = BindingState::new();
        let id = identity(3);

        state.track_srv_and_unbind_storage(&*context, id, 4);
        context.take_calls();

        state.track_uav_and_unbind_resources(&*context, id, 0, false, NativeUav(200));

        let calls = context.take_calls();
        assert_eq!(calls.len(), ALL_SHADER_STAGES.len());
        for (call, &stage) in calls.iter().zip(ALL_SHADER_STAGES.iter()) {
            assert_eq!(
                *call,
                NativeCall::SetShaderResources {
                    stage,
                    start_slot: 4,
                    views: vec![None],
                }
            );
        }
        assert_eq!(state.tracked_srv_count(id), 0);
        assert_eq!(state.tracked_uav_count(id), 1);
    }

    #[test]
    fn graphics_uav_conflict_reissues_combined_bind_sized_to_highest_remaining() {
        let context = Arc::new(MockContext::new());
        let mut state = BindingState::new();

        // Graphics UAVs in slots 1 and 3
        state.track_uav_and_unbind_resources(&*context, identity(1), 1, true, NativeUav(11));
        state.track_uav_and_unbind_resources(&*context, identity(2), 3, true, NativeUav(13));
        state.flush_graphics_uavs(&*context);
        context.take_calls();

        // Rebinding identity 2 as an SRV clears mirror slot 3; the combined bind shrinks to
        // highest remaining + 1 = 2, not the full capacity of 8
        state.track_srv_and_unbind_storage(&*context, identity(2), 0);

        let calls = context.take_calls();
        assert_eq!(
            calls,
            vec![
                NativeCall::OmSetUnorderedAccessViews {
                    start_slot: 0,
                    views: vec![None, Some(NativeUav(11))],
                },
                // SRV bind itself is issued by the pipeline layout afterwards; only the
                // unbind flush happens here
            ]
        );
    }

    #[test]
    fn reset_unbinds_everything_and_clears_lists() {
        let context = Arc::new(MockContext::new());
        let mut state = BindingState::new();

        state.track_srv_and_unbind_storage(&*context, identity(1), 0);
        state.track_uav_and_unbind_resources(&*context, identity(2), 1, false, NativeUav(21));
        state.track_uav_and_unbind_resources(&*context, identity(3), 2, true, NativeUav(22));
        context.take_calls();

        state.unbind_and_reset(&*context);

        let calls = context.take_calls();
        // 6 per-stage SRV unbinds, 1 compute UAV unbind, 1 combined graphics flush
        assert_eq!(calls.len(), ALL_SHADER_STAGES.len() + 2);
        assert!(calls.contains(&NativeCall::CsSetUnorderedAccessViews {
            start_slot: 1,
            views: vec![None],
        }));
        assert_eq!(
            *calls.last().unwrap(),
            NativeCall::OmSetUnorderedAccessViews {
                start_slot: 0,
                views: vec![],
            }
        );
        assert!(calls.contains(&NativeCall::SetShaderResources {
            stage: Dx11ShaderStage::Pixel,
            start_slot: 0,
            views: vec![None],
        }));

        assert_eq!(state.tracked_srv_count(identity(1)), 0);
        assert_eq!(state.tracked_uav_count(identity(2)), 0);
        assert_eq!(state.tracked_uav_count(identity(3)), 0);
    }
}
