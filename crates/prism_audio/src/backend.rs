//! The raw audio command surface
//!
//! [`AudioBackend`] is what a concrete native binding implements: plain
//! commands over backend-assigned `u64` object ids, with no lifecycle or
//! capability checks of its own. Enforcement lives in
//! [`AudioDriver`](crate::AudioDriver). Sample formats and effect/filter
//! type codes use the native API's numeric enums.

/// The command surface a concrete audio binding implements.
pub trait AudioBackend {
    // Devices.

    /// Open the default output device; usable on return.
    fn device_create(&mut self) -> u64;
    fn device_delete(&mut self, device: u64);

    // Buffers.

    /// Allocate a sample buffer container; no sample data yet.
    fn buffer_create(&mut self) -> u64;
    /// Upload PCM data. `format` is a sample-layout code, `frequency` the
    /// sample rate in Hz.
    fn buffer_set_data(&mut self, buffer: u64, format: u32, data: &[u8], frequency: i32);
    fn buffer_delete(&mut self, buffer: u64);

    // Sources.

    /// Create a playable source; usable on return.
    fn source_create(&mut self) -> u64;
    fn source_set_pitch(&mut self, source: u64, pitch: f32);
    fn source_set_gain(&mut self, source: u64, gain: f32);
    fn source_set_position(&mut self, source: u64, x: f32, y: f32, z: f32);
    fn source_set_velocity(&mut self, source: u64, x: f32, y: f32, z: f32);
    fn source_set_direction(&mut self, source: u64, x: f32, y: f32, z: f32);
    fn source_set_distance(&mut self, source: u64, relative: f32, rolloff: f32, max: f32);
    fn source_set_cone(&mut self, source: u64, inner_angle: f32, outer_angle: f32, outer_gain: f32);
    fn source_set_looping(&mut self, source: u64, should_loop: bool);
    /// Bind a single static buffer, replacing any queue.
    fn source_set_buffer(&mut self, source: u64, buffer: u64);
    /// Append a buffer to the source's streaming queue.
    fn source_enqueue_buffer(&mut self, source: u64, buffer: u64);
    /// Remove and return the oldest processed buffer from the queue, or
    /// `None` when the queue is empty.
    fn source_dequeue_buffer(&mut self, source: u64) -> Option<u64>;
    fn source_buffers_processed(&self, source: u64) -> i32;
    fn source_buffers_queued(&self, source: u64) -> i32;
    fn source_play(&mut self, source: u64);
    fn source_stop(&mut self, source: u64);
    fn source_delete(&mut self, source: u64);

    // The listener. One per device, owned by the backend.

    fn listener_instance(&self) -> u64;
    fn listener_set_position(&mut self, listener: u64, x: f32, y: f32, z: f32);
    fn listener_set_velocity(&mut self, listener: u64, x: f32, y: f32, z: f32);
    #[allow(clippy::too_many_arguments)]
    fn listener_set_orientation(
        &mut self,
        listener: u64,
        at_x: f32,
        at_y: f32,
        at_z: f32,
        up_x: f32,
        up_y: f32,
        up_z: f32,
    );
    fn listener_set_gain(&mut self, listener: u64, gain: f32);

    // Global state.

    fn distance_model_apply(&mut self, model: u32);

    // Effects, filters and auxiliary sends. Only reached when the matching
    // capability flag is set.

    fn effect_create(&mut self, effect_type: u32) -> u64;
    fn effect_set_property_i(&mut self, effect: u64, name: u32, value: i32);
    fn effect_set_property_f(&mut self, effect: u64, name: u32, value: f32);
    fn effect_delete(&mut self, effect: u64);

    fn filter_create(&mut self, filter_type: u32) -> u64;
    fn filter_set_property_i(&mut self, filter: u64, name: u32, value: i32);
    fn filter_set_property_f(&mut self, filter: u64, name: u32, value: f32);
    fn filter_delete(&mut self, filter: u64);

    fn source_attach_direct_filter(&mut self, source: u64, filter: u64);
    fn source_remove_direct_filter(&mut self, source: u64);

    fn aux_effect_slot_create(&mut self) -> u64;
    fn aux_effect_slot_attach_effect(&mut self, slot: u64, effect: u64);
    /// Route a source send through a slot, optionally through a filter.
    fn source_send_aux_effect_slot(&mut self, source: u64, slot: u64, send: u32, filter: Option<u64>);
    fn source_send_disable(&mut self, source: u64, send: u32);
    fn aux_effect_slot_delete(&mut self, slot: u64);
}
