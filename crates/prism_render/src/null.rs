//! In-memory null backend
//!
//! A backend with no native API behind it: buffers and textures live in heap
//! memory, draws and dispatches only bump counters. It serves two purposes:
//! an always-supported last-resort candidate for headless hosts, and a
//! deterministic backend for exercising the facade in tests.

use crate::backend::{GraphicsBackend, PolygonParameters, Region, VertexAttrib};
use crate::caps::GraphicsCapability;
use crate::driver::GraphicsDriver;
use crate::tweaks::Tweaks;
use prism_core::{CapabilitySet, DriverProvider};
use std::cell::Cell;
use std::collections::HashMap;

/// GL_BUFFER_SIZE, the one integer buffer parameter this backend answers.
pub const BUFFER_SIZE: u32 = 0x8764;

const PAGE_WIDTH: u32 = 64;
const PAGE_HEIGHT: u32 = 64;
const MAX_TEXTURE_SIZE: u32 = 16384;

/// Backend that stores everything in process memory.
#[derive(Debug, Default)]
pub struct NullBackend {
    next_id: u64,
    buffers: HashMap<u64, Vec<u8>>,
    textures: HashMap<u64, Vec<u8>>,
    shader_logs: HashMap<u64, String>,
    tweaks: Option<Tweaks>,
    draw_calls: u64,
    program_use_calls: u64,
    framebuffer_bind_calls: u64,
    completeness_checks: Cell<u64>,
    compute_dispatches: u64,
}

impl NullBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&mut self) -> u64 {
        // 0 is the default framebuffer.
        self.next_id += 1;
        self.next_id
    }

    /// The tweaks accepted so far, if any.
    pub fn accepted_tweaks(&self) -> Option<&Tweaks> {
        self.tweaks.as_ref()
    }

    pub fn draw_calls(&self) -> u64 {
        self.draw_calls
    }

    pub fn program_use_calls(&self) -> u64 {
        self.program_use_calls
    }

    pub fn framebuffer_bind_calls(&self) -> u64 {
        self.framebuffer_bind_calls
    }

    pub fn completeness_checks(&self) -> u64 {
        self.completeness_checks.get()
    }

    pub fn compute_dispatches(&self) -> u64 {
        self.compute_dispatches
    }
}

impl GraphicsBackend for NullBackend {
    fn apply_tweaks(&mut self, tweaks: &Tweaks) -> bool {
        self.tweaks = Some(tweaks.clone());
        true
    }

    fn buffer_create(&mut self) -> u64 {
        self.fresh_id()
    }

    fn buffer_allocate(&mut self, buffer: u64, size: u64, _usage: u32) {
        self.buffers.insert(buffer, vec![0; size as usize]);
    }

    fn buffer_allocate_immutable(&mut self, buffer: u64, size: u64, _bitflags: u32) {
        self.buffers.insert(buffer, vec![0; size as usize]);
    }

    fn buffer_set_data(&mut self, buffer: u64, data: &[u8], _usage: u32) {
        self.buffers.insert(buffer, data.to_vec());
    }

    fn buffer_get_data(&self, buffer: u64, offset: u64, out: &mut [u8]) {
        // Bytes past the allocation were never written; leave them as-is.
        if let Some(data) = self.buffers.get(&buffer) {
            let start = (offset as usize).min(data.len());
            let end = (start + out.len()).min(data.len());
            out[..end - start].copy_from_slice(&data[start..end]);
        }
    }

    fn buffer_get_parameter_i(&self, buffer: u64, param: u32) -> i32 {
        match param {
            BUFFER_SIZE => self.buffers.get(&buffer).map_or(0, |data| data.len() as i32),
            _ => 0,
        }
    }

    fn buffer_copy_data(&mut self, src: u64, src_offset: u64, dst: u64, dst_offset: u64, size: u64) {
        let chunk: Vec<u8> = match self.buffers.get(&src) {
            Some(data) => {
                let start = (src_offset as usize).min(data.len());
                let end = (start + size as usize).min(data.len());
                data[start..end].to_vec()
            }
            None => return,
        };
        if let Some(data) = self.buffers.get_mut(&dst) {
            let start = (dst_offset as usize).min(data.len());
            let end = (start + chunk.len()).min(data.len());
            data[start..end].copy_from_slice(&chunk[..end - start]);
        }
    }

    fn buffer_invalidate_data(&mut self, _buffer: u64) {}

    fn buffer_invalidate_range(&mut self, _buffer: u64, _offset: u64, _length: u64) {}

    fn buffer_delete(&mut self, buffer: u64) {
        self.buffers.remove(&buffer);
    }

    fn texture_allocate(
        &mut self,
        _mipmaps: u32,
        _internal_format: u32,
        _width: u32,
        _height: u32,
        _depth: u32,
    ) -> u64 {
        let id = self.fresh_id();
        self.textures.insert(id, Vec::new());
        id
    }

    fn texture_bind(&mut self, _texture: u64, _unit: u32) {}

    fn texture_set_data(
        &mut self,
        texture: u64,
        _level: u32,
        _region: Region,
        _format: u32,
        _ty: u32,
        data: &[u8],
    ) {
        self.textures.insert(texture, data.to_vec());
    }

    fn texture_get_data(&self, texture: u64, _level: u32, _format: u32, _ty: u32, out: &mut [u8]) {
        if let Some(data) = self.textures.get(&texture) {
            let n = out.len().min(data.len());
            out[..n].copy_from_slice(&data[..n]);
        }
    }

    fn texture_generate_mipmap(&mut self, _texture: u64) {}

    fn texture_set_parameter_i(&mut self, _texture: u64, _param: u32, _value: i32) {}

    fn texture_set_parameter_f(&mut self, _texture: u64, _param: u32, _value: f32) {}

    fn texture_invalidate_data(&mut self, _texture: u64, _level: u32) {}

    fn texture_invalidate_range(&mut self, _texture: u64, _level: u32, _region: Region) {}

    fn texture_allocate_page(&mut self, _texture: u64, _level: u32, _region: Region) {}

    fn texture_deallocate_page(&mut self, _texture: u64, _level: u32, _region: Region) {}

    fn texture_page_width(&self, _texture: u64) -> u32 {
        PAGE_WIDTH
    }

    fn texture_page_height(&self, _texture: u64) -> u32 {
        PAGE_HEIGHT
    }

    fn texture_page_depth(&self, _texture: u64) -> u32 {
        1
    }

    fn texture_max_size(&self) -> u32 {
        MAX_TEXTURE_SIZE
    }

    fn texture_delete(&mut self, texture: u64) {
        self.textures.remove(&texture);
    }

    fn renderbuffer_create(&mut self, _internal_format: u32, _width: u32, _height: u32) -> u64 {
        self.fresh_id()
    }

    fn renderbuffer_delete(&mut self, _renderbuffer: u64) {}

    fn framebuffer_create(&mut self) -> u64 {
        self.fresh_id()
    }

    fn framebuffer_add_attachment(
        &mut self,
        _framebuffer: u64,
        _attachment: u32,
        _texture: u64,
        _mipmap_level: u32,
    ) {
    }

    fn framebuffer_add_renderbuffer(
        &mut self,
        _framebuffer: u64,
        _attachment: u32,
        _renderbuffer: u64,
    ) {
    }

    fn framebuffer_bind(&mut self, _framebuffer: u64, _attachments: &[u32]) {
        self.framebuffer_bind_calls += 1;
    }

    fn framebuffer_blit(
        &mut self,
        _src: u64,
        _src_rect: [i32; 4],
        _dst: u64,
        _dst_rect: [i32; 4],
        _bitfield: u32,
        _filter: u32,
    ) {
    }

    fn framebuffer_is_complete(&self, _framebuffer: u64) -> bool {
        self.completeness_checks.set(self.completeness_checks.get() + 1);
        true
    }

    fn framebuffer_get_pixels(
        &self,
        _framebuffer: u64,
        _x: i32,
        _y: i32,
        _width: u32,
        _height: u32,
        _format: u32,
        _ty: u32,
        _out: &mut [u8],
    ) {
    }

    fn framebuffer_delete(&mut self, _framebuffer: u64) {}

    fn shader_compile(&mut self, _ty: u32, _source: &str) -> u64 {
        let id = self.fresh_id();
        self.shader_logs.insert(id, String::new());
        id
    }

    fn shader_info_log(&self, shader: u64) -> String {
        self.shader_logs.get(&shader).cloned().unwrap_or_default()
    }

    fn shader_parameter(&self, _shader: u64, _param: u32) -> i32 {
        0
    }

    fn shader_delete(&mut self, shader: u64) {
        self.shader_logs.remove(&shader);
    }

    fn program_create(&mut self) -> u64 {
        self.fresh_id()
    }

    fn program_link_shaders(&mut self, _program: u64, _shaders: &[u64]) {}

    fn program_use(&mut self, _program: u64) {
        self.program_use_calls += 1;
    }

    fn program_uniform_location(&self, _program: u64, _name: &str) -> i32 {
        0
    }

    fn program_set_attrib_location(&mut self, _program: u64, _index: u32, _name: &str) {}

    fn program_set_uniform_f(&mut self, _program: u64, _location: i32, _value: &[f32]) {}

    fn program_set_uniform_i(&mut self, _program: u64, _location: i32, _value: &[i32]) {}

    fn program_set_uniform_d(&mut self, _program: u64, _location: i32, _value: &[f64]) {}

    fn program_set_uniform_mat_f(&mut self, _program: u64, _location: i32, _mat: &[f32]) {}

    fn program_set_uniform_mat_d(&mut self, _program: u64, _location: i32, _mat: &[f64]) {}

    fn program_set_uniform_block(&mut self, _program: u64, _name: &str, _buffer: u64, _binding: u32) {}

    fn program_set_storage(&mut self, _program: u64, _name: &str, _buffer: u64, _binding: u32) {}

    fn program_dispatch_compute(&mut self, _program: u64, _num_x: u32, _num_y: u32, _num_z: u32) {
        self.compute_dispatches += 1;
    }

    fn program_delete(&mut self, _program: u64) {}

    fn sampler_create(&mut self) -> u64 {
        self.fresh_id()
    }

    fn sampler_set_parameter_i(&mut self, _sampler: u64, _param: u32, _value: i32) {}

    fn sampler_set_parameter_f(&mut self, _sampler: u64, _param: u32, _value: f32) {}

    fn sampler_bind(&mut self, _unit: u32, _sampler: u64) {}

    fn sampler_delete(&mut self, _sampler: u64) {}

    fn vertex_array_create(&mut self) -> u64 {
        self.fresh_id()
    }

    fn vertex_array_attach_buffer(
        &mut self,
        _vao: u64,
        _index: u32,
        _buffer: u64,
        _attrib: VertexAttrib,
    ) {
    }

    fn vertex_array_attach_index_buffer(&mut self, _vao: u64, _buffer: u64) {}

    fn vertex_array_draw_arrays(&mut self, _vao: u64, _mode: u32, _first: i32, _count: i32) {
        self.draw_calls += 1;
    }

    fn vertex_array_multi_draw_arrays(
        &mut self,
        _vao: u64,
        _mode: u32,
        _first: &[i32],
        _count: &[i32],
    ) {
        self.draw_calls += 1;
    }

    fn vertex_array_draw_elements(
        &mut self,
        _vao: u64,
        _mode: u32,
        _count: i32,
        _ty: u32,
        _offset: u64,
    ) {
        self.draw_calls += 1;
    }

    fn vertex_array_draw_arrays_instanced(
        &mut self,
        _vao: u64,
        _mode: u32,
        _first: i32,
        _count: i32,
        _instances: i32,
    ) {
        self.draw_calls += 1;
    }

    fn vertex_array_draw_elements_instanced(
        &mut self,
        _vao: u64,
        _mode: u32,
        _count: i32,
        _ty: u32,
        _offset: u64,
        _instances: i32,
    ) {
        self.draw_calls += 1;
    }

    fn vertex_array_draw_arrays_indirect(
        &mut self,
        _vao: u64,
        _cmd_buffer: u64,
        _mode: u32,
        _offset: u64,
    ) {
        self.draw_calls += 1;
    }

    fn vertex_array_draw_elements_indirect(
        &mut self,
        _vao: u64,
        _cmd_buffer: u64,
        _mode: u32,
        _index_type: u32,
        _offset: u64,
    ) {
        self.draw_calls += 1;
    }

    fn vertex_array_delete(&mut self, _vao: u64) {}

    fn draw_query_create(&mut self) -> u64 {
        self.fresh_id()
    }

    fn draw_query_enable(&mut self, _condition: u32, _query: u64) {}

    fn draw_query_disable(&mut self, _condition: u32) {}

    fn draw_query_begin_conditional_render(&mut self, _query: u64, _mode: u32) {}

    fn draw_query_end_conditional_render(&mut self) {}

    fn draw_query_delete(&mut self, _query: u64) {}

    fn clear(&mut self, _bitfield: u32, _color: [f32; 4], _depth: f64) {}

    fn viewport(&mut self, _x: i32, _y: i32, _width: u32, _height: u32) {}

    fn mask_apply(
        &mut self,
        _red: bool,
        _green: bool,
        _blue: bool,
        _alpha: bool,
        _depth: bool,
        _stencil: u32,
    ) {
    }

    fn blending_enable(
        &mut self,
        _rgb_eq: u32,
        _a_eq: u32,
        _rgb_src: u32,
        _rgb_dst: u32,
        _a_src: u32,
        _a_dst: u32,
    ) {
    }

    fn blending_disable(&mut self) {}

    fn depth_test_enable(&mut self, _depth_func: u32) {}

    fn depth_test_disable(&mut self) {}

    fn scissor_test_enable(&mut self, _left: i32, _bottom: i32, _width: u32, _height: u32) {}

    fn scissor_test_disable(&mut self) {}

    fn polygon_set_parameters(&mut self, _params: &PolygonParameters) {}
}

/// Provider for the null backend. Always supported unless overridden, with
/// a configurable capability set so tests can model partial candidates.
#[derive(Debug, Clone)]
pub struct NullProvider {
    name: String,
    tags: Vec<String>,
    supported: bool,
    caps: CapabilitySet<GraphicsCapability>,
}

impl NullProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: vec!["null".to_owned(), "headless".to_owned()],
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

    pub fn with_capabilities(mut self, caps: CapabilitySet<GraphicsCapability>) -> Self {
        self.caps = caps;
        self
    }
}

impl Default for NullProvider {
    fn default() -> Self {
        Self::new("null")
    }
}

impl DriverProvider for NullProvider {
    type Driver = GraphicsDriver<NullBackend>;

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
        GraphicsDriver::new(NullBackend::new(), self.caps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::DriverRegistry;

    #[test]
    fn provider_rating_tracks_its_capability_set() {
        let full = NullProvider::new("full");
        assert_eq!(full.support_rating(), 1.0);

        let mut caps = CapabilitySet::all();
        caps.remove(GraphicsCapability::SparseTexture);
        caps.remove(GraphicsCapability::ComputeShader);
        let partial = NullProvider::new("partial").with_capabilities(caps);
        assert!(partial.support_rating() < full.support_rating());
    }

    #[test]
    fn selection_produces_a_working_driver() {
        let mut registry = DriverRegistry::new();
        registry.register(NullProvider::new("null"));

        let mut driver = registry.select_best().expect("a supported candidate");

        let mut buffer = driver.buffer_create().unwrap();
        driver.buffer_set_data(&mut buffer, &[5, 6, 7], 0).unwrap();
        let mut out = [0u8; 3];
        driver.buffer_get_data(&buffer, 0, &mut out).unwrap();
        assert_eq!(out, [5, 6, 7]);
    }

    #[test]
    fn tag_selection_finds_the_headless_candidate() {
        let mut caps = CapabilitySet::all();
        caps.remove(GraphicsCapability::SparseTexture);

        let mut registry = DriverRegistry::new();
        registry.register(
            NullProvider::new("gl")
                .with_tags(&["opengl", "4.5"])
                .with_capabilities(caps),
        );
        registry.register(NullProvider::new("null"));

        // Only the null candidate carries the requested tag.
        let driver = registry.select_by_tags(&["headless"]).unwrap();
        assert_eq!(driver.capabilities().rating(), 1.0);

        assert!(registry.select_by_tags(&["vulkan"]).is_none());
    }
}
