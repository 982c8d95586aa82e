//! In-memory null audio backend
//!
//! No device is opened and nothing is audible: buffers hold their PCM bytes
//! in heap memory and playback instantly "processes" the whole queue. Useful
//! as a last-resort candidate on machines with no audio hardware and as the
//! deterministic backend for facade tests.

use crate::backend::AudioBackend;
use crate::caps::AudioCapability;
use crate::driver::AudioDriver;
use prism_core::{CapabilitySet, DriverProvider};
use std::collections::{HashMap, VecDeque};

const LISTENER_ID: u64 = 1;

#[derive(Debug, Clone)]
struct SampleData {
    format: u32,
    frequency: i32,
    bytes: Vec<u8>,
}

/// Backend that stores everything in process memory.
#[derive(Debug, Default)]
pub struct NullAudioBackend {
    next_id: u64,
    buffers: HashMap<u64, SampleData>,
    queues: HashMap<u64, VecDeque<u64>>,
    processed: HashMap<u64, i32>,
    play_calls: u64,
}

impl NullAudioBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> u64 {
        // Ids start past the reserved listener id.
        self.next_id += 1;
        self.next_id + LISTENER_ID
    }

    pub fn play_calls(&self) -> u64 {
        self.play_calls
    }

    /// Sample rate of an uploaded buffer, for inspection in tests.
    pub fn buffer_frequency(&self, buffer: u64) -> Option<i32> {
        self.buffers.get(&buffer).map(|data| data.frequency)
    }

    pub fn buffer_format(&self, buffer: u64) -> Option<u32> {
        self.buffers.get(&buffer).map(|data| data.format)
    }
}

impl AudioBackend for NullAudioBackend {
    fn device_create(&mut self) -> u64 {
        self.fresh_id()
    }

    fn device_delete(&mut self, _device: u64) {}

    fn buffer_create(&mut self) -> u64 {
        self.fresh_id()
    }

    fn buffer_set_data(&mut self, buffer: u64, format: u32, data: &[u8], frequency: i32) {
        self.buffers.insert(
            buffer,
            SampleData {
                format,
                frequency,
                bytes: data.to_vec(),
            },
        );
    }

    fn buffer_delete(&mut self, buffer: u64) {
        self.buffers.remove(&buffer);
    }

    fn source_create(&mut self) -> u64 {
        let id = self.fresh_id();
        self.queues.insert(id, VecDeque::new());
        self.processed.insert(id, 0);
        id
    }

    fn source_set_pitch(&mut self, _source: u64, _pitch: f32) {}

    fn source_set_gain(&mut self, _source: u64, _gain: f32) {}

    fn source_set_position(&mut self, _source: u64, _x: f32, _y: f32, _z: f32) {}

    fn source_set_velocity(&mut self, _source: u64, _x: f32, _y: f32, _z: f32) {}

    fn source_set_direction(&mut self, _source: u64, _x: f32, _y: f32, _z: f32) {}

    fn source_set_distance(&mut self, _source: u64, _relative: f32, _rolloff: f32, _max: f32) {}

    fn source_set_cone(
        &mut self,
        _source: u64,
        _inner_angle: f32,
        _outer_angle: f32,
        _outer_gain: f32,
    ) {
    }

    fn source_set_looping(&mut self, _source: u64, _should_loop: bool) {}

    fn source_set_buffer(&mut self, source: u64, buffer: u64) {
        let queue = self.queues.entry(source).or_default();
        queue.clear();
        queue.push_back(buffer);
    }

    fn source_enqueue_buffer(&mut self, source: u64, buffer: u64) {
        self.queues.entry(source).or_default().push_back(buffer);
    }

    fn source_dequeue_buffer(&mut self, source: u64) -> Option<u64> {
        let id = self
            .queues
            .get_mut(&source)
            .and_then(|queue| queue.pop_front())?;
        if let Some(count) = self.processed.get_mut(&source) {
            *count = (*count - 1).max(0);
        }
        Some(id)
    }

    fn source_buffers_processed(&self, source: u64) -> i32 {
        self.processed.get(&source).copied().unwrap_or(0)
    }

    fn source_buffers_queued(&self, source: u64) -> i32 {
        self.queues.get(&source).map_or(0, |queue| queue.len() as i32)
    }

    fn source_play(&mut self, source: u64) {
        // Playback is instantaneous: the whole queue counts as processed.
        self.play_calls += 1;
        let queued = self.queues.get(&source).map_or(0, |queue| queue.len() as i32);
        self.processed.insert(source, queued);
    }

    fn source_stop(&mut self, source: u64) {
        self.processed.insert(source, 0);
    }

    fn source_delete(&mut self, source: u64) {
        self.queues.remove(&source);
        self.processed.remove(&source);
    }

    fn listener_instance(&self) -> u64 {
        LISTENER_ID
    }

    fn listener_set_position(&mut self, _listener: u64, _x: f32, _y: f32, _z: f32) {}

    fn listener_set_velocity(&mut self, _listener: u64, _x: f32, _y: f32, _z: f32) {}

    fn listener_set_orientation(
        &mut self,
        _listener: u64,
        _at_x: f32,
        _at_y: f32,
        _at_z: f32,
        _up_x: f32,
        _up_y: f32,
        _up_z: f32,
    ) {
    }

    fn listener_set_gain(&mut self, _listener: u64, _gain: f32) {}

    fn distance_model_apply(&mut self, _model: u32) {}

    fn effect_create(&mut self, _effect_type: u32) -> u64 {
        self.fresh_id()
    }

    fn effect_set_property_i(&mut self, _effect: u64, _name: u32, _value: i32) {}

    fn effect_set_property_f(&mut self, _effect: u64, _name: u32, _value: f32) {}

    fn effect_delete(&mut self, _effect: u64) {}

    fn filter_create(&mut self, _filter_type: u32) -> u64 {
        self.fresh_id()
    }

    fn filter_set_property_i(&mut self, _filter: u64, _name: u32, _value: i32) {}

    fn filter_set_property_f(&mut self, _filter: u64, _name: u32, _value: f32) {}

    fn filter_delete(&mut self, _filter: u64) {}

    fn source_attach_direct_filter(&mut self, _source: u64, _filter: u64) {}

    fn source_remove_direct_filter(&mut self, _source: u64) {}

    fn aux_effect_slot_create(&mut self) -> u64 {
        self.fresh_id()
    }

    fn aux_effect_slot_attach_effect(&mut self, _slot: u64, _effect: u64) {}

    fn source_send_aux_effect_slot(
        &mut self,
        _source: u64,
        _slot: u64,
        _send: u32,
        _filter: Option<u64>,
    ) {
    }

    fn source_send_disable(&mut self, _source: u64, _send: u32) {}

    fn aux_effect_slot_delete(&mut self, _slot: u64) {}
}

/// Provider for the null audio backend. Always supported unless overridden.
#[derive(Debug, Clone)]
pub struct NullAudioProvider {
    name: String,
    tags: Vec<String>,
    supported: bool,
    caps: CapabilitySet<AudioCapability>,
}

impl NullAudioProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: vec!["null".to_owned(), "silent".to_owned()],
            supported: true,
            caps: CapabilitySet::all(),
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|tag| (*tag).to_owned()).collect();
        self
    }

    pub fn with_support(mut self, supported: bool) -> Self {
        self.supported = supported;
        self
    }

    pub fn with_capabilities(mut self, caps: CapabilitySet<AudioCapability>) -> Self {
        self.caps = caps;
        self
    }
}

impl Default for NullAudioProvider {
    fn default() -> Self {
        Self::new("null")
    }
}

impl DriverProvider for NullAudioProvider {
    type Driver = AudioDriver<NullAudioBackend>;

    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn support_rating(&self) -> f64 {
        self.caps.rating()
    }

    fn driver_instance(&self) -> Self::Driver {
        self.caps.log(&self.name);
        AudioDriver::new(NullAudioBackend::new(), self.caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::DriverRegistry;

    #[test]
    fn upload_metadata_is_retained() {
        let mut driver = AudioDriver::new(NullAudioBackend::new(), CapabilitySet::all());
        let mut buffer = driver.buffer_create();
        driver
            .buffer_set_data(&mut buffer, 0x1103, &[0; 128], 48_000)
            .unwrap();

        assert_eq!(driver.backend().buffer_frequency(buffer.id()), Some(48_000));
        assert_eq!(driver.backend().buffer_format(buffer.id()), Some(0x1103));
    }

    #[test]
    fn selection_prefers_the_richer_candidate() {
        let mut registry = DriverRegistry::new();
        registry.register(
            NullAudioProvider::new("core")
                .with_capabilities(CapabilitySet::empty()),
        );
        registry.register(NullAudioProvider::new("efx"));

        let driver = registry.select_best().expect("a supported candidate");
        assert_eq!(driver.capabilities().rating(), 1.0);
    }

    #[test]
    fn forcing_an_unsupported_candidate_by_name_still_works() {
        let mut registry = DriverRegistry::new();
        registry.register(NullAudioProvider::new("broken").with_support(false));

        assert!(registry.select_best().is_none());
        assert!(registry.select_by_name("BROKEN").is_some());
    }
}
