//! The audio driver facade
//!
//! Same shape as the graphics facade: own the backend and its probed
//! capability set, validate every handle before dispatch, gate the EFX-style
//! surface on its flags, and keep `delete` idempotent. The listener is a
//! permanent backend-owned object; it is always valid and has no delete.

use crate::backend::AudioBackend;
use crate::caps::AudioCapability;
use crate::{
    AuxEffectSlotHandle, BufferHandle, DeviceHandle, EffectHandle, FilterHandle, ListenerHandle,
    SourceHandle,
};
use prism_core::{Capability, CapabilitySet, DriverError};

/// A bound audio driver: one backend plus the contracts around it.
pub struct AudioDriver<B: AudioBackend> {
    backend: B,
    caps: CapabilitySet<AudioCapability>,
}

impl<B: AudioBackend> AudioDriver<B> {
    pub fn new(backend: B, caps: CapabilitySet<AudioCapability>) -> Self {
        Self { backend, caps }
    }

    pub fn capabilities(&self) -> &CapabilitySet<AudioCapability> {
        &self.caps
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn require(&self, cap: AudioCapability) -> Result<(), DriverError> {
        let checked = self.caps.require(cap);
        if checked.is_err() {
            tracing::warn!(capability = cap.label(), "rejected gated audio operation");
        }
        checked
    }

    // Devices.

    /// Open the default output device; valid on return.
    pub fn device_create(&mut self) -> DeviceHandle {
        DeviceHandle::valid(self.backend.device_create())
    }

    /// Close the device. Idempotent.
    pub fn device_delete(&mut self, device: &mut DeviceHandle) {
        if device.ensure_live().is_err() {
            return;
        }
        self.backend.device_delete(device.id());
        device.invalidate();
    }

    // Buffers.

    /// Create a sample buffer container. Unallocated until data is set.
    pub fn buffer_create(&mut self) -> BufferHandle {
        BufferHandle::unallocated(self.backend.buffer_create())
    }

    /// Upload PCM data; the handle is valid afterwards.
    pub fn buffer_set_data(
        &mut self,
        buffer: &mut BufferHandle,
        format: u32,
        data: &[u8],
        frequency: i32,
    ) -> Result<(), DriverError> {
        buffer.ensure_live()?;
        self.backend
            .buffer_set_data(buffer.id(), format, data, frequency);
        buffer.mark_valid();
        Ok(())
    }

    /// Delete the buffer. Idempotent.
    pub fn buffer_delete(&mut self, buffer: &mut BufferHandle) {
        if buffer.ensure_live().is_err() {
            return;
        }
        self.backend.buffer_delete(buffer.id());
        buffer.invalidate();
    }

    // Sources.

    /// Create a playable source; valid on return.
    pub fn source_create(&mut self) -> SourceHandle {
        SourceHandle::valid(self.backend.source_create())
    }

    pub fn source_set_pitch(&mut self, source: &SourceHandle, pitch: f32) -> Result<(), DriverError> {
        source.ensure_live()?;
        self.backend.source_set_pitch(source.id(), pitch);
        Ok(())
    }

    pub fn source_set_gain(&mut self, source: &SourceHandle, gain: f32) -> Result<(), DriverError> {
        source.ensure_live()?;
        self.backend.source_set_gain(source.id(), gain);
        Ok(())
    }

    pub fn source_set_position(
        &mut self,
        source: &SourceHandle,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), DriverError> {
        source.ensure_live()?;
        self.backend.source_set_position(source.id(), x, y, z);
        Ok(())
    }

    pub fn source_set_velocity(
        &mut self,
        source: &SourceHandle,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), DriverError> {
        source.ensure_live()?;
        self.backend.source_set_velocity(source.id(), x, y, z);
        Ok(())
    }

    pub fn source_set_direction(
        &mut self,
        source: &SourceHandle,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), DriverError> {
        source.ensure_live()?;
        self.backend.source_set_direction(source.id(), x, y, z);
        Ok(())
    }

    pub fn source_set_distance(
        &mut self,
        source: &SourceHandle,
        relative: f32,
        rolloff: f32,
        max: f32,
    ) -> Result<(), DriverError> {
        source.ensure_live()?;
        self.backend
            .source_set_distance(source.id(), relative, rolloff, max);
        Ok(())
    }

    pub fn source_set_cone(
        &mut self,
        source: &SourceHandle,
        inner_angle: f32,
        outer_angle: f32,
        outer_gain: f32,
    ) -> Result<(), DriverError> {
        source.ensure_live()?;
        self.backend
            .source_set_cone(source.id(), inner_angle, outer_angle, outer_gain);
        Ok(())
    }

    pub fn source_set_looping(
        &mut self,
        source: &SourceHandle,
        should_loop: bool,
    ) -> Result<(), DriverError> {
        source.ensure_live()?;
        self.backend.source_set_looping(source.id(), should_loop);
        Ok(())
    }

    /// Bind a single static buffer, replacing any queue.
    pub fn source_set_buffer(
        &mut self,
        source: &SourceHandle,
        buffer: &BufferHandle,
    ) -> Result<(), DriverError> {
        source.ensure_live()?;
        buffer.ensure_live()?;
        self.backend.source_set_buffer(source.id(), buffer.id());
        Ok(())
    }

    /// Append a buffer to the source's streaming queue.
    pub fn source_enqueue_buffer(
        &mut self,
        source: &SourceHandle,
        buffer: &BufferHandle,
    ) -> Result<(), DriverError> {
        source.ensure_live()?;
        buffer.ensure_live()?;
        self.backend.source_enqueue_buffer(source.id(), buffer.id());
        Ok(())
    }

    /// Remove and return the oldest processed buffer from the queue.
    ///
    /// `Ok(None)` when nothing has been queued or everything was already
    /// dequeued; an empty queue is a normal streaming condition, not an
    /// error.
    pub fn source_dequeue_buffer(
        &mut self,
        source: &SourceHandle,
    ) -> Result<Option<BufferHandle>, DriverError> {
        source.ensure_live()?;
        Ok(self
            .backend
            .source_dequeue_buffer(source.id())
            .map(BufferHandle::valid))
    }

    pub fn source_buffers_processed(&self, source: &SourceHandle) -> Result<i32, DriverError> {
        source.ensure_live()?;
        Ok(self.backend.source_buffers_processed(source.id()))
    }

    pub fn source_buffers_queued(&self, source: &SourceHandle) -> Result<i32, DriverError> {
        source.ensure_live()?;
        Ok(self.backend.source_buffers_queued(source.id()))
    }

    pub fn source_play(&mut self, source: &SourceHandle) -> Result<(), DriverError> {
        source.ensure_live()?;
        self.backend.source_play(source.id());
        Ok(())
    }

    pub fn source_stop(&mut self, source: &SourceHandle) -> Result<(), DriverError> {
        source.ensure_live()?;
        self.backend.source_stop(source.id());
        Ok(())
    }

    /// Delete the source. Queued buffers are not deleted with it.
    /// Idempotent.
    pub fn source_delete(&mut self, source: &mut SourceHandle) {
        if source.ensure_live().is_err() {
            return;
        }
        self.backend.source_delete(source.id());
        source.invalidate();
    }

    // The listener.

    /// The backend-owned listener. Always valid; there is no delete.
    pub fn listener(&self) -> ListenerHandle {
        ListenerHandle::valid(self.backend.listener_instance())
    }

    pub fn listener_set_position(
        &mut self,
        listener: &ListenerHandle,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), DriverError> {
        listener.ensure_live()?;
        self.backend.listener_set_position(listener.id(), x, y, z);
        Ok(())
    }

    pub fn listener_set_velocity(
        &mut self,
        listener: &ListenerHandle,
        x: f32,
        y: f32,
        z: f32,
    ) -> Result<(), DriverError> {
        listener.ensure_live()?;
        self.backend.listener_set_velocity(listener.id(), x, y, z);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn listener_set_orientation(
        &mut self,
        listener: &ListenerHandle,
        at_x: f32,
        at_y: f32,
        at_z: f32,
        up_x: f32,
        up_y: f32,
        up_z: f32,
    ) -> Result<(), DriverError> {
        listener.ensure_live()?;
        self.backend
            .listener_set_orientation(listener.id(), at_x, at_y, at_z, up_x, up_y, up_z);
        Ok(())
    }

    pub fn listener_set_gain(
        &mut self,
        listener: &ListenerHandle,
        gain: f32,
    ) -> Result<(), DriverError> {
        listener.ensure_live()?;
        self.backend.listener_set_gain(listener.id(), gain);
        Ok(())
    }

    // Global state.

    pub fn distance_model_apply(&mut self, model: u32) {
        self.backend.distance_model_apply(model);
    }

    // Effects.

    /// Create an effect of the given type; valid on return.
    pub fn effect_create(&mut self, effect_type: u32) -> Result<EffectHandle, DriverError> {
        self.require(AudioCapability::Effects)?;
        Ok(EffectHandle::valid(self.backend.effect_create(effect_type)))
    }

    pub fn effect_set_property_i(
        &mut self,
        effect: &EffectHandle,
        name: u32,
        value: i32,
    ) -> Result<(), DriverError> {
        self.require(AudioCapability::Effects)?;
        effect.ensure_live()?;
        self.backend.effect_set_property_i(effect.id(), name, value);
        Ok(())
    }

    pub fn effect_set_property_f(
        &mut self,
        effect: &EffectHandle,
        name: u32,
        value: f32,
    ) -> Result<(), DriverError> {
        self.require(AudioCapability::Effects)?;
        effect.ensure_live()?;
        self.backend.effect_set_property_f(effect.id(), name, value);
        Ok(())
    }

    /// Delete the effect. Slots it is attached to keep playing their copy.
    /// Idempotent.
    pub fn effect_delete(&mut self, effect: &mut EffectHandle) {
        if effect.ensure_live().is_err() {
            return;
        }
        self.backend.effect_delete(effect.id());
        effect.invalidate();
    }

    // Filters.

    /// Create a filter of the given type; valid on return.
    pub fn filter_create(&mut self, filter_type: u32) -> Result<FilterHandle, DriverError> {
        self.require(AudioCapability::Filters)?;
        Ok(FilterHandle::valid(self.backend.filter_create(filter_type)))
    }

    pub fn filter_set_property_i(
        &mut self,
        filter: &FilterHandle,
        name: u32,
        value: i32,
    ) -> Result<(), DriverError> {
        self.require(AudioCapability::Filters)?;
        filter.ensure_live()?;
        self.backend.filter_set_property_i(filter.id(), name, value);
        Ok(())
    }

    pub fn filter_set_property_f(
        &mut self,
        filter: &FilterHandle,
        name: u32,
        value: f32,
    ) -> Result<(), DriverError> {
        self.require(AudioCapability::Filters)?;
        filter.ensure_live()?;
        self.backend.filter_set_property_f(filter.id(), name, value);
        Ok(())
    }

    /// Delete the filter. Idempotent.
    pub fn filter_delete(&mut self, filter: &mut FilterHandle) {
        if filter.ensure_live().is_err() {
            return;
        }
        self.backend.filter_delete(filter.id());
        filter.invalidate();
    }

    /// Apply a filter directly to the source's dry path.
    pub fn source_attach_direct_filter(
        &mut self,
        source: &SourceHandle,
        filter: &FilterHandle,
    ) -> Result<(), DriverError> {
        self.require(AudioCapability::Filters)?;
        source.ensure_live()?;
        filter.ensure_live()?;
        self.backend
            .source_attach_direct_filter(source.id(), filter.id());
        Ok(())
    }

    pub fn source_remove_direct_filter(&mut self, source: &SourceHandle) -> Result<(), DriverError> {
        self.require(AudioCapability::Filters)?;
        source.ensure_live()?;
        self.backend.source_remove_direct_filter(source.id());
        Ok(())
    }

    // Auxiliary effect slots.

    /// Create an auxiliary effect slot; valid on return.
    pub fn aux_effect_slot_create(&mut self) -> Result<AuxEffectSlotHandle, DriverError> {
        self.require(AudioCapability::AuxiliaryEffectSlots)?;
        Ok(AuxEffectSlotHandle::valid(
            self.backend.aux_effect_slot_create(),
        ))
    }

    pub fn aux_effect_slot_attach_effect(
        &mut self,
        slot: &AuxEffectSlotHandle,
        effect: &EffectHandle,
    ) -> Result<(), DriverError> {
        self.require(AudioCapability::AuxiliaryEffectSlots)?;
        slot.ensure_live()?;
        effect.ensure_live()?;
        self.backend
            .aux_effect_slot_attach_effect(slot.id(), effect.id());
        Ok(())
    }

    /// Route a source send through a slot, optionally through a filter.
    pub fn source_send_aux_effect_slot(
        &mut self,
        source: &SourceHandle,
        slot: &AuxEffectSlotHandle,
        send: u32,
        filter: Option<&FilterHandle>,
    ) -> Result<(), DriverError> {
        self.require(AudioCapability::AuxiliaryEffectSlots)?;
        source.ensure_live()?;
        slot.ensure_live()?;
        if let Some(filter) = filter {
            filter.ensure_live()?;
        }
        self.backend.source_send_aux_effect_slot(
            source.id(),
            slot.id(),
            send,
            filter.map(|f| f.id()),
        );
        Ok(())
    }

    pub fn source_send_disable(
        &mut self,
        source: &SourceHandle,
        send: u32,
    ) -> Result<(), DriverError> {
        self.require(AudioCapability::AuxiliaryEffectSlots)?;
        source.ensure_live()?;
        self.backend.source_send_disable(source.id(), send);
        Ok(())
    }

    /// Delete the slot. Sources routed through it fall back to their dry
    /// path. Idempotent.
    pub fn aux_effect_slot_delete(&mut self, slot: &mut AuxEffectSlotHandle) {
        if slot.ensure_live().is_err() {
            return;
        }
        self.backend.aux_effect_slot_delete(slot.id());
        slot.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null::NullAudioBackend;
    use prism_core::{DriverError, HandleKind, HandleState};

    fn full_driver() -> AudioDriver<NullAudioBackend> {
        AudioDriver::new(NullAudioBackend::new(), CapabilitySet::all())
    }

    fn core_only_driver() -> AudioDriver<NullAudioBackend> {
        AudioDriver::new(NullAudioBackend::new(), CapabilitySet::empty())
    }

    #[test]
    fn buffer_starts_unallocated_and_becomes_valid_on_upload() {
        let mut driver = full_driver();
        let mut buffer = driver.buffer_create();
        assert_eq!(buffer.state(), HandleState::Unallocated);

        driver.buffer_set_data(&mut buffer, 0, &[0; 64], 44_100).unwrap();
        assert!(buffer.is_valid());
    }

    #[test]
    fn streaming_queue_round_trip() {
        let mut driver = full_driver();
        let source = driver.source_create();
        let mut a = driver.buffer_create();
        let mut b = driver.buffer_create();
        driver.buffer_set_data(&mut a, 0, &[1; 4], 44_100).unwrap();
        driver.buffer_set_data(&mut b, 0, &[2; 4], 44_100).unwrap();

        driver.source_enqueue_buffer(&source, &a).unwrap();
        driver.source_enqueue_buffer(&source, &b).unwrap();
        assert_eq!(driver.source_buffers_queued(&source).unwrap(), 2);

        driver.source_play(&source).unwrap();
        assert_eq!(driver.source_buffers_processed(&source).unwrap(), 2);

        let first = driver
            .source_dequeue_buffer(&source)
            .unwrap()
            .expect("a processed buffer");
        assert_eq!(first.id(), a.id());
        assert!(first.is_valid());
        assert_eq!(driver.source_buffers_queued(&source).unwrap(), 1);
    }

    #[test]
    fn dequeue_on_an_empty_queue_yields_nothing() {
        let mut driver = full_driver();
        let source = driver.source_create();

        assert_eq!(driver.source_dequeue_buffer(&source).unwrap(), None);

        // Draining the queue brings it back to the same state.
        let mut buffer = driver.buffer_create();
        driver.buffer_set_data(&mut buffer, 0, &[1; 4], 44_100).unwrap();
        driver.source_enqueue_buffer(&source, &buffer).unwrap();
        assert!(driver.source_dequeue_buffer(&source).unwrap().is_some());
        assert_eq!(driver.source_dequeue_buffer(&source).unwrap(), None);
    }

    #[test]
    fn deleting_a_source_leaves_its_buffers_alone() {
        let mut driver = full_driver();
        let mut source = driver.source_create();
        let mut buffer = driver.buffer_create();
        driver.buffer_set_data(&mut buffer, 0, &[3; 4], 22_050).unwrap();
        driver.source_enqueue_buffer(&source, &buffer).unwrap();

        driver.source_delete(&mut source);
        driver.source_delete(&mut source);
        assert_eq!(source.state(), HandleState::Invalid);
        assert!(buffer.is_valid());
    }

    #[test]
    fn use_after_delete_is_an_invalid_handle_error() {
        let mut driver = full_driver();
        let mut source = driver.source_create();
        let id = source.id();
        driver.source_delete(&mut source);

        assert_eq!(
            driver.source_play(&source),
            Err(DriverError::InvalidHandle {
                kind: HandleKind::AudioSource,
                id,
            })
        );
    }

    #[test]
    fn listener_is_always_valid() {
        let mut driver = full_driver();
        let listener = driver.listener();
        assert!(listener.is_valid());
        driver.listener_set_gain(&listener, 0.5).unwrap();
        driver
            .listener_set_orientation(&listener, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0)
            .unwrap();
    }

    #[test]
    fn effects_surface_is_gated() {
        let mut driver = core_only_driver();
        assert_eq!(
            driver.effect_create(1),
            Err(DriverError::UnsupportedCapability {
                capability: "effects",
            })
        );
        assert!(matches!(
            driver.filter_create(1),
            Err(DriverError::UnsupportedCapability {
                capability: "filters",
            })
        ));
        assert!(matches!(
            driver.aux_effect_slot_create(),
            Err(DriverError::UnsupportedCapability {
                capability: "auxiliary effect slots",
            })
        ));

        // The core surface still works without any flag.
        let source = driver.source_create();
        driver.source_set_gain(&source, 1.0).unwrap();
    }

    #[test]
    fn send_routing_works_with_the_full_flag_set() {
        let mut driver = full_driver();
        let source = driver.source_create();
        let effect = driver.effect_create(1).unwrap();
        let filter = driver.filter_create(1).unwrap();
        let slot = driver.aux_effect_slot_create().unwrap();

        driver.aux_effect_slot_attach_effect(&slot, &effect).unwrap();
        driver
            .source_send_aux_effect_slot(&source, &slot, 0, Some(&filter))
            .unwrap();
        driver.source_send_disable(&source, 0).unwrap();
    }

    #[test]
    fn send_routing_rejects_a_deleted_filter() {
        let mut driver = full_driver();
        let source = driver.source_create();
        let slot = driver.aux_effect_slot_create().unwrap();
        let mut filter = driver.filter_create(1).unwrap();
        let id = filter.id();
        driver.filter_delete(&mut filter);

        assert_eq!(
            driver.source_send_aux_effect_slot(&source, &slot, 0, Some(&filter)),
            Err(DriverError::InvalidHandle {
                kind: HandleKind::Filter,
                id,
            })
        );
    }

    #[test]
    fn device_delete_is_idempotent() {
        let mut driver = full_driver();
        let mut device = driver.device_create();
        driver.device_delete(&mut device);
        driver.device_delete(&mut device);
        assert_eq!(device.state(), HandleState::Invalid);
    }
}
