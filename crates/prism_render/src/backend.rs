//! The raw graphics command surface
//!
//! [`GraphicsBackend`] is what a concrete native binding implements: plain
//! commands over backend-assigned `u64` object ids, with no lifecycle or
//! capability checks of its own. All enforcement lives in
//! [`GraphicsDriver`](crate::GraphicsDriver); by the time a backend method
//! runs, the facade has already validated the handles and gated the
//! capability. Parameters use the GL-style numeric codes the SPI traffics
//! in; implementations are not required to honor usage/access hints.

use crate::tweaks::Tweaks;

/// A 3D sub-region of a texture, in texels.
///
/// 1D textures use `y_offset`/`z_offset` of 0 and height/depth of 1; 2D
/// textures use `z_offset` 0 and depth 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x_offset: u32,
    pub y_offset: u32,
    pub z_offset: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

/// Layout of one vertex attribute within an attached buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VertexAttrib {
    /// Component count, 1-4.
    pub size: u32,
    /// Component type code.
    pub ty: u32,
    /// Byte stride between consecutive elements.
    pub stride: u32,
    /// Byte offset of the first element.
    pub offset: u64,
    /// Instancing divisor; 0 advances per vertex.
    pub divisor: u32,
}

/// Polygon rasterization state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonParameters {
    pub point_size: f32,
    pub line_width: f32,
    pub front_face: u32,
    /// Face to cull; 0 culls nothing.
    pub cull_face: u32,
    pub polygon_mode: u32,
    pub offset_factor: f32,
    pub offset_units: f32,
}

/// The command surface a concrete graphics binding implements.
pub trait GraphicsBackend {
    /// Accept or ignore the supplied tweaks. Returns whether the backend
    /// understood them; the default ignores tweaks entirely.
    fn apply_tweaks(&mut self, tweaks: &Tweaks) -> bool {
        let _ = tweaks;
        tracing::warn!("this driver does not support tweaks");
        false
    }

    /// Supported shader language version. Defaults to 1.00.
    fn shader_version(&self) -> u32 {
        100
    }

    // Buffers.

    /// Allocate a buffer handle container; no backing storage yet.
    fn buffer_create(&mut self) -> u64;
    fn buffer_allocate(&mut self, buffer: u64, size: u64, usage: u32);
    fn buffer_allocate_immutable(&mut self, buffer: u64, size: u64, bitflags: u32);
    fn buffer_set_data(&mut self, buffer: u64, data: &[u8], usage: u32);
    /// Read `out.len()` bytes starting at `offset`. Bytes never written are
    /// implementation-defined.
    fn buffer_get_data(&self, buffer: u64, offset: u64, out: &mut [u8]);
    /// Query an integer buffer parameter (e.g. allocated size in bytes).
    fn buffer_get_parameter_i(&self, buffer: u64, param: u32) -> i32;
    fn buffer_copy_data(&mut self, src: u64, src_offset: u64, dst: u64, dst_offset: u64, size: u64);
    fn buffer_invalidate_data(&mut self, buffer: u64);
    fn buffer_invalidate_range(&mut self, buffer: u64, offset: u64, length: u64);
    fn buffer_delete(&mut self, buffer: u64);

    // Textures.

    /// Allocate an immutable texture with backing memory; usable on return.
    fn texture_allocate(
        &mut self,
        mipmaps: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        depth: u32,
    ) -> u64;
    fn texture_bind(&mut self, texture: u64, unit: u32);
    fn texture_set_data(
        &mut self,
        texture: u64,
        level: u32,
        region: Region,
        format: u32,
        ty: u32,
        data: &[u8],
    );
    fn texture_get_data(&self, texture: u64, level: u32, format: u32, ty: u32, out: &mut [u8]);
    fn texture_generate_mipmap(&mut self, texture: u64);
    fn texture_set_parameter_i(&mut self, texture: u64, param: u32, value: i32);
    fn texture_set_parameter_f(&mut self, texture: u64, param: u32, value: f32);
    fn texture_invalidate_data(&mut self, texture: u64, level: u32);
    fn texture_invalidate_range(&mut self, texture: u64, level: u32, region: Region);
    fn texture_allocate_page(&mut self, texture: u64, level: u32, region: Region);
    fn texture_deallocate_page(&mut self, texture: u64, level: u32, region: Region);
    fn texture_page_width(&self, texture: u64) -> u32;
    fn texture_page_height(&self, texture: u64) -> u32;
    fn texture_page_depth(&self, texture: u64) -> u32;
    /// The format the device prefers for uploads of `internal_format`
    /// (e.g. BGRA over RGBA on older hardware).
    fn texture_preferred_format(&self, internal_format: u32) -> u32 {
        internal_format
    }
    fn texture_max_size(&self) -> u32;
    fn texture_max_bound_units(&self) -> u32 {
        16
    }
    fn texture_max_anisotropy(&self) -> f32 {
        1.0
    }
    fn texture_delete(&mut self, texture: u64);

    // Renderbuffers.

    fn renderbuffer_create(&mut self, internal_format: u32, width: u32, height: u32) -> u64;
    fn renderbuffer_delete(&mut self, renderbuffer: u64);

    // Framebuffers.

    fn framebuffer_create(&mut self) -> u64;
    /// Id of the default framebuffer.
    fn framebuffer_default(&self) -> u64 {
        0
    }
    fn framebuffer_add_attachment(
        &mut self,
        framebuffer: u64,
        attachment: u32,
        texture: u64,
        mipmap_level: u32,
    );
    fn framebuffer_add_renderbuffer(&mut self, framebuffer: u64, attachment: u32, renderbuffer: u64);
    fn framebuffer_bind(&mut self, framebuffer: u64, attachments: &[u32]);
    #[allow(clippy::too_many_arguments)]
    fn framebuffer_blit(
        &mut self,
        src: u64,
        src_rect: [i32; 4],
        dst: u64,
        dst_rect: [i32; 4],
        bitfield: u32,
        filter: u32,
    );
    fn framebuffer_is_complete(&self, framebuffer: u64) -> bool;
    #[allow(clippy::too_many_arguments)]
    fn framebuffer_get_pixels(
        &self,
        framebuffer: u64,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
        out: &mut [u8],
    );
    fn framebuffer_delete(&mut self, framebuffer: u64);

    // Shaders.

    /// Compile a shader; the object is usable on return.
    fn shader_compile(&mut self, ty: u32, source: &str) -> u64;
    fn shader_info_log(&self, shader: u64) -> String;
    fn shader_parameter(&self, shader: u64, param: u32) -> i32;
    fn shader_delete(&mut self, shader: u64);

    // Programs.

    fn program_create(&mut self) -> u64;
    fn program_link_shaders(&mut self, program: u64, shaders: &[u64]);
    fn program_use(&mut self, program: u64);
    fn program_uniform_location(&self, program: u64, name: &str) -> i32;
    fn program_set_attrib_location(&mut self, program: u64, index: u32, name: &str);
    fn program_set_uniform_f(&mut self, program: u64, location: i32, value: &[f32]);
    fn program_set_uniform_i(&mut self, program: u64, location: i32, value: &[i32]);
    fn program_set_uniform_d(&mut self, program: u64, location: i32, value: &[f64]);
    fn program_set_uniform_mat_f(&mut self, program: u64, location: i32, mat: &[f32]);
    fn program_set_uniform_mat_d(&mut self, program: u64, location: i32, mat: &[f64]);
    fn program_set_uniform_block(&mut self, program: u64, name: &str, buffer: u64, binding: u32);
    fn program_set_storage(&mut self, program: u64, name: &str, buffer: u64, binding: u32);
    fn program_dispatch_compute(&mut self, program: u64, num_x: u32, num_y: u32, num_z: u32);
    fn program_delete(&mut self, program: u64);

    // Samplers.

    fn sampler_create(&mut self) -> u64;
    fn sampler_set_parameter_i(&mut self, sampler: u64, param: u32, value: i32);
    fn sampler_set_parameter_f(&mut self, sampler: u64, param: u32, value: f32);
    /// Bind to a texture unit, overriding the bound texture's parameters.
    fn sampler_bind(&mut self, unit: u32, sampler: u64);
    fn sampler_delete(&mut self, sampler: u64);

    // Vertex arrays.

    fn vertex_array_create(&mut self) -> u64;
    fn vertex_array_attach_buffer(
        &mut self,
        vao: u64,
        index: u32,
        buffer: u64,
        attrib: VertexAttrib,
    );
    fn vertex_array_attach_index_buffer(&mut self, vao: u64, buffer: u64);
    fn vertex_array_draw_arrays(&mut self, vao: u64, mode: u32, first: i32, count: i32);
    /// Issue one batch of draws; `first` and `count` pair up per draw.
    fn vertex_array_multi_draw_arrays(&mut self, vao: u64, mode: u32, first: &[i32], count: &[i32]);
    fn vertex_array_draw_elements(&mut self, vao: u64, mode: u32, count: i32, ty: u32, offset: u64);
    fn vertex_array_draw_arrays_instanced(
        &mut self,
        vao: u64,
        mode: u32,
        first: i32,
        count: i32,
        instances: i32,
    );
    #[allow(clippy::too_many_arguments)]
    fn vertex_array_draw_elements_instanced(
        &mut self,
        vao: u64,
        mode: u32,
        count: i32,
        ty: u32,
        offset: u64,
        instances: i32,
    );
    fn vertex_array_draw_arrays_indirect(&mut self, vao: u64, cmd_buffer: u64, mode: u32, offset: u64);
    fn vertex_array_draw_elements_indirect(
        &mut self,
        vao: u64,
        cmd_buffer: u64,
        mode: u32,
        index_type: u32,
        offset: u64,
    );
    fn vertex_array_delete(&mut self, vao: u64);

    // Draw queries.

    fn draw_query_create(&mut self) -> u64;
    fn draw_query_enable(&mut self, condition: u32, query: u64);
    fn draw_query_disable(&mut self, condition: u32);
    fn draw_query_begin_conditional_render(&mut self, query: u64, mode: u32);
    fn draw_query_end_conditional_render(&mut self);
    fn draw_query_delete(&mut self, query: u64);

    // Global pipeline state.

    fn clear(&mut self, bitfield: u32, color: [f32; 4], depth: f64);
    fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32);
    fn mask_apply(&mut self, red: bool, green: bool, blue: bool, alpha: bool, depth: bool, stencil: u32);
    fn blending_enable(
        &mut self,
        rgb_eq: u32,
        a_eq: u32,
        rgb_src: u32,
        rgb_dst: u32,
        a_src: u32,
        a_dst: u32,
    );
    fn blending_disable(&mut self);
    fn depth_test_enable(&mut self, depth_func: u32);
    fn depth_test_disable(&mut self);
    fn scissor_test_enable(&mut self, left: i32, bottom: i32, width: u32, height: u32);
    fn scissor_test_disable(&mut self);
    fn polygon_set_parameters(&mut self, params: &PolygonParameters);
}
