//! The graphics driver facade
//!
//! [`GraphicsDriver`] is the command surface applications drive after
//! selection. It owns the winning backend, the capability set the candidate
//! was probed with, and the tweaks supplied at bind time, and it enforces
//! the contracts every backend must honor in one place:
//!
//! - every non-delete operation checks handle validity first; a deleted
//!   handle is reported as [`DriverError::InvalidHandle`],
//! - capability-gated operations check the flag before dispatch and fail
//!   with [`DriverError::UnsupportedCapability`]; selection never fails for
//!   a missing optional capability, only use does,
//! - `delete` is idempotent from any state and never errors,
//! - tweak-driven elision (memoized program/framebuffer binds, skipped
//!   completeness re-checks) changes how often the backend is called, never
//!   what a command observably does.
//!
//! Reading a resource that was created but never written is legal and
//! returns implementation-defined data; callers that need defined content
//! must write it first.

use crate::backend::{GraphicsBackend, PolygonParameters, Region, VertexAttrib};
use crate::caps::GraphicsCapability;
use crate::tweaks::Tweaks;
use crate::{
    BufferHandle, DrawQueryHandle, FramebufferHandle, ProgramHandle, RenderbufferHandle,
    SamplerHandle, ShaderHandle, TextureHandle, VertexArrayHandle,
};
use prism_core::{Capability, CapabilitySet, DriverError};
use std::collections::HashSet;

/// A bound graphics driver: one backend plus the contracts around it.
///
/// All operations assume the single logical thread that owns the native
/// context; the facade adds no locking of its own.
pub struct GraphicsDriver<B: GraphicsBackend> {
    backend: B,
    caps: CapabilitySet<GraphicsCapability>,
    tweaks: Tweaks,
    last_program: Option<u64>,
    last_framebuffer: Option<(u64, Vec<u32>)>,
    known_complete: HashSet<u64>,
}

impl<B: GraphicsBackend> GraphicsDriver<B> {
    /// Bind a backend with the capability set its provider probed.
    pub fn new(backend: B, caps: CapabilitySet<GraphicsCapability>) -> Self {
        Self {
            backend,
            caps,
            tweaks: Tweaks::default(),
            last_program: None,
            last_framebuffer: None,
            known_complete: HashSet::new(),
        }
    }

    /// The capability set this driver was bound with. Read-only for the
    /// lifetime of the session.
    pub fn capabilities(&self) -> &CapabilitySet<GraphicsCapability> {
        &self.caps
    }

    pub fn tweaks(&self) -> &Tweaks {
        &self.tweaks
    }

    /// Direct access to the backend, mainly for inspection in tests.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Apply performance tweaks, expected once at startup.
    ///
    /// Toggles the facade implements itself (program/framebuffer
    /// memoization, completeness-check skipping) take effect here; the rest
    /// are forwarded to the backend, which may ignore them.
    pub fn apply_tweaks(&mut self, tweaks: Tweaks) {
        if !self.backend.apply_tweaks(&tweaks) {
            tracing::debug!("backend ignored the supplied tweaks");
        }
        self.tweaks = tweaks;
    }

    /// Supported shader language version.
    pub fn shader_version(&self) -> u32 {
        self.backend.shader_version()
    }

    fn require(&self, cap: GraphicsCapability) -> Result<(), DriverError> {
        let checked = self.caps.require(cap);
        if checked.is_err() {
            tracing::warn!(capability = cap.label(), "rejected gated graphics operation");
        }
        checked
    }

    // Buffers.

    /// Create a buffer container. Unallocated until storage is assigned.
    pub fn buffer_create(&mut self) -> Result<BufferHandle, DriverError> {
        self.require(GraphicsCapability::BufferObject)?;
        Ok(BufferHandle::unallocated(self.backend.buffer_create()))
    }

    /// (Re)allocate buffer storage. The handle is valid afterwards; prior
    /// content is not preserved.
    pub fn buffer_allocate(
        &mut self,
        buffer: &mut BufferHandle,
        size: u64,
        usage: u32,
    ) -> Result<(), DriverError> {
        buffer.ensure_live()?;
        self.backend.buffer_allocate(buffer.id(), size, usage);
        buffer.mark_valid();
        Ok(())
    }

    /// Allocate immutable storage; properties can only change through
    /// reallocation.
    pub fn buffer_allocate_immutable(
        &mut self,
        buffer: &mut BufferHandle,
        size: u64,
        bitflags: u32,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::ImmutableBufferStorage)?;
        buffer.ensure_live()?;
        self.backend
            .buffer_allocate_immutable(buffer.id(), size, bitflags);
        buffer.mark_valid();
        Ok(())
    }

    /// Upload data, (re)allocating as needed. The handle is valid afterwards.
    pub fn buffer_set_data(
        &mut self,
        buffer: &mut BufferHandle,
        data: &[u8],
        usage: u32,
    ) -> Result<(), DriverError> {
        buffer.ensure_live()?;
        self.backend.buffer_set_data(buffer.id(), data, usage);
        buffer.mark_valid();
        Ok(())
    }

    /// Read back `out.len()` bytes starting at `offset`.
    ///
    /// Reading before any data was set returns implementation-defined bytes;
    /// that is documented behavior, not an error.
    pub fn buffer_get_data(
        &self,
        buffer: &BufferHandle,
        offset: u64,
        out: &mut [u8],
    ) -> Result<(), DriverError> {
        buffer.ensure_live()?;
        self.backend.buffer_get_data(buffer.id(), offset, out);
        Ok(())
    }

    /// Query an integer buffer parameter (e.g. allocated size in bytes).
    pub fn buffer_get_parameter_i(
        &self,
        buffer: &BufferHandle,
        param: u32,
    ) -> Result<i32, DriverError> {
        buffer.ensure_live()?;
        Ok(self.backend.buffer_get_parameter_i(buffer.id(), param))
    }

    pub fn buffer_copy_data(
        &mut self,
        src: &BufferHandle,
        src_offset: u64,
        dst: &mut BufferHandle,
        dst_offset: u64,
        size: u64,
    ) -> Result<(), DriverError> {
        src.ensure_live()?;
        dst.ensure_live()?;
        self.backend
            .buffer_copy_data(src.id(), src_offset, dst.id(), dst_offset, size);
        Ok(())
    }

    /// Mark the whole buffer eligible for reclamation. Advisory: the backend
    /// is not required to zero or evict anything synchronously.
    pub fn buffer_invalidate_data(&mut self, buffer: &BufferHandle) -> Result<(), DriverError> {
        self.require(GraphicsCapability::InvalidateSubdata)?;
        buffer.ensure_live()?;
        self.backend.buffer_invalidate_data(buffer.id());
        Ok(())
    }

    /// Mark a byte range eligible for reclamation. Advisory, as above.
    pub fn buffer_invalidate_range(
        &mut self,
        buffer: &BufferHandle,
        offset: u64,
        length: u64,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::InvalidateSubdata)?;
        buffer.ensure_live()?;
        self.backend
            .buffer_invalidate_range(buffer.id(), offset, length);
        Ok(())
    }

    /// Delete the buffer. Idempotent: deleting an already-deleted handle is
    /// a silent no-op.
    pub fn buffer_delete(&mut self, buffer: &mut BufferHandle) {
        if buffer.ensure_live().is_err() {
            return;
        }
        self.backend.buffer_delete(buffer.id());
        buffer.invalidate();
    }

    // Textures.

    /// Allocate an immutable texture with backing memory; valid on return.
    /// Dimensions have a minimum of 1: height 1 and depth 1 make a 1D
    /// texture, depth 1 a 2D texture, anything else 3D.
    pub fn texture_allocate(
        &mut self,
        mipmaps: u32,
        internal_format: u32,
        width: u32,
        height: u32,
        depth: u32,
    ) -> Result<TextureHandle, DriverError> {
        debug_assert!(width >= 1 && height >= 1 && depth >= 1);
        let id = self
            .backend
            .texture_allocate(mipmaps, internal_format, width, height, depth);
        Ok(TextureHandle::valid(id))
    }

    pub fn texture_bind(&mut self, texture: &TextureHandle, unit: u32) -> Result<(), DriverError> {
        texture.ensure_live()?;
        self.backend.texture_bind(texture.id(), unit);
        Ok(())
    }

    pub fn texture_set_data(
        &mut self,
        texture: &mut TextureHandle,
        level: u32,
        region: Region,
        format: u32,
        ty: u32,
        data: &[u8],
    ) -> Result<(), DriverError> {
        texture.ensure_live()?;
        self.backend
            .texture_set_data(texture.id(), level, region, format, ty, data);
        texture.mark_valid();
        Ok(())
    }

    /// Read back a mipmap level. Reading texels that were never written
    /// returns implementation-defined data.
    pub fn texture_get_data(
        &self,
        texture: &TextureHandle,
        level: u32,
        format: u32,
        ty: u32,
        out: &mut [u8],
    ) -> Result<(), DriverError> {
        texture.ensure_live()?;
        self.backend
            .texture_get_data(texture.id(), level, format, ty, out);
        Ok(())
    }

    /// Generate all mipmap levels from the base level. Calling this before
    /// the base level has content produces undefined results.
    pub fn texture_generate_mipmap(&mut self, texture: &TextureHandle) -> Result<(), DriverError> {
        texture.ensure_live()?;
        self.backend.texture_generate_mipmap(texture.id());
        Ok(())
    }

    pub fn texture_set_parameter_i(
        &mut self,
        texture: &TextureHandle,
        param: u32,
        value: i32,
    ) -> Result<(), DriverError> {
        texture.ensure_live()?;
        self.backend
            .texture_set_parameter_i(texture.id(), param, value);
        Ok(())
    }

    pub fn texture_set_parameter_f(
        &mut self,
        texture: &TextureHandle,
        param: u32,
        value: f32,
    ) -> Result<(), DriverError> {
        texture.ensure_live()?;
        self.backend
            .texture_set_parameter_f(texture.id(), param, value);
        Ok(())
    }

    /// Mark a mipmap level eligible for reclamation. Advisory.
    pub fn texture_invalidate_data(
        &mut self,
        texture: &TextureHandle,
        level: u32,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::InvalidateSubdata)?;
        texture.ensure_live()?;
        self.backend.texture_invalidate_data(texture.id(), level);
        Ok(())
    }

    /// Mark a sub-region of a mipmap level eligible for reclamation.
    /// Advisory.
    pub fn texture_invalidate_range(
        &mut self,
        texture: &TextureHandle,
        level: u32,
        region: Region,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::InvalidateSubdata)?;
        texture.ensure_live()?;
        self.backend
            .texture_invalidate_range(texture.id(), level, region);
        Ok(())
    }

    /// Commit pages of a sparse texture. Already-committed pages are
    /// silently ignored.
    pub fn texture_allocate_page(
        &mut self,
        texture: &TextureHandle,
        level: u32,
        region: Region,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::SparseTexture)?;
        texture.ensure_live()?;
        self.backend
            .texture_allocate_page(texture.id(), level, region);
        Ok(())
    }

    /// Release pages of a sparse texture. Already-released pages are
    /// silently ignored.
    pub fn texture_deallocate_page(
        &mut self,
        texture: &TextureHandle,
        level: u32,
        region: Region,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::SparseTexture)?;
        texture.ensure_live()?;
        self.backend
            .texture_deallocate_page(texture.id(), level, region);
        Ok(())
    }

    pub fn texture_page_width(&self, texture: &TextureHandle) -> Result<u32, DriverError> {
        self.require(GraphicsCapability::SparseTexture)?;
        texture.ensure_live()?;
        Ok(self.backend.texture_page_width(texture.id()))
    }

    pub fn texture_page_height(&self, texture: &TextureHandle) -> Result<u32, DriverError> {
        self.require(GraphicsCapability::SparseTexture)?;
        texture.ensure_live()?;
        Ok(self.backend.texture_page_height(texture.id()))
    }

    pub fn texture_page_depth(&self, texture: &TextureHandle) -> Result<u32, DriverError> {
        self.require(GraphicsCapability::SparseTexture)?;
        texture.ensure_live()?;
        Ok(self.backend.texture_page_depth(texture.id()))
    }

    pub fn texture_preferred_format(&self, internal_format: u32) -> u32 {
        self.backend.texture_preferred_format(internal_format)
    }

    pub fn texture_max_size(&self) -> u32 {
        self.backend.texture_max_size()
    }

    pub fn texture_max_bound_units(&self) -> u32 {
        self.backend.texture_max_bound_units()
    }

    pub fn texture_max_anisotropy(&self) -> f32 {
        self.backend.texture_max_anisotropy()
    }

    /// Delete the texture. Idempotent.
    pub fn texture_delete(&mut self, texture: &mut TextureHandle) {
        if texture.ensure_live().is_err() {
            return;
        }
        self.backend.texture_delete(texture.id());
        texture.invalidate();
    }

    // Renderbuffers.

    /// Create a renderbuffer with storage; valid on return.
    pub fn renderbuffer_create(
        &mut self,
        internal_format: u32,
        width: u32,
        height: u32,
    ) -> Result<RenderbufferHandle, DriverError> {
        let id = self
            .backend
            .renderbuffer_create(internal_format, width, height);
        Ok(RenderbufferHandle::valid(id))
    }

    /// Delete the renderbuffer. Idempotent.
    pub fn renderbuffer_delete(&mut self, renderbuffer: &mut RenderbufferHandle) {
        if renderbuffer.ensure_live().is_err() {
            return;
        }
        self.backend.renderbuffer_delete(renderbuffer.id());
        renderbuffer.invalidate();
    }

    // Framebuffers.

    /// Create a framebuffer container. Unallocated until first bound.
    pub fn framebuffer_create(&mut self) -> Result<FramebufferHandle, DriverError> {
        self.require(GraphicsCapability::FramebufferObject)?;
        Ok(FramebufferHandle::unallocated(
            self.backend.framebuffer_create(),
        ))
    }

    /// The default framebuffer. Always valid; deleting it is ignored.
    pub fn framebuffer_default(&self) -> FramebufferHandle {
        FramebufferHandle::valid(self.backend.framebuffer_default())
    }

    pub fn framebuffer_add_attachment(
        &mut self,
        framebuffer: &mut FramebufferHandle,
        attachment: u32,
        texture: &TextureHandle,
        mipmap_level: u32,
    ) -> Result<(), DriverError> {
        framebuffer.ensure_live()?;
        texture.ensure_live()?;
        self.backend.framebuffer_add_attachment(
            framebuffer.id(),
            attachment,
            texture.id(),
            mipmap_level,
        );
        self.known_complete.remove(&framebuffer.id());
        Ok(())
    }

    pub fn framebuffer_add_renderbuffer(
        &mut self,
        framebuffer: &mut FramebufferHandle,
        attachment: u32,
        renderbuffer: &RenderbufferHandle,
    ) -> Result<(), DriverError> {
        framebuffer.ensure_live()?;
        renderbuffer.ensure_live()?;
        self.backend
            .framebuffer_add_renderbuffer(framebuffer.id(), attachment, renderbuffer.id());
        self.known_complete.remove(&framebuffer.id());
        Ok(())
    }

    /// Bind the framebuffer as the draw target; valid afterwards.
    ///
    /// With `memorize_framebuffer` on, rebinding the same framebuffer with
    /// the same draw-buffer list skips the backend call.
    pub fn framebuffer_bind(
        &mut self,
        framebuffer: &mut FramebufferHandle,
        attachments: &[u32],
    ) -> Result<(), DriverError> {
        framebuffer.ensure_live()?;
        let memo = (framebuffer.id(), attachments.to_vec());
        if self.tweaks.memorize_framebuffer && self.last_framebuffer.as_ref() == Some(&memo) {
            framebuffer.mark_valid();
            return Ok(());
        }
        self.backend.framebuffer_bind(framebuffer.id(), attachments);
        self.last_framebuffer = Some(memo);
        framebuffer.mark_valid();
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn framebuffer_blit(
        &mut self,
        src: &FramebufferHandle,
        src_rect: [i32; 4],
        dst: &FramebufferHandle,
        dst_rect: [i32; 4],
        bitfield: u32,
        filter: u32,
    ) -> Result<(), DriverError> {
        src.ensure_live()?;
        dst.ensure_live()?;
        self.backend
            .framebuffer_blit(src.id(), src_rect, dst.id(), dst_rect, bitfield, filter);
        Ok(())
    }

    /// Whether the framebuffer is complete.
    ///
    /// With `skip_framebuffer_completeness_check` on, a framebuffer that
    /// once reported complete is trusted until its attachments change.
    pub fn framebuffer_is_complete(
        &mut self,
        framebuffer: &FramebufferHandle,
    ) -> Result<bool, DriverError> {
        framebuffer.ensure_live()?;
        if self.tweaks.skip_framebuffer_completeness_check
            && self.known_complete.contains(&framebuffer.id())
        {
            return Ok(true);
        }
        let complete = self.backend.framebuffer_is_complete(framebuffer.id());
        if complete {
            self.known_complete.insert(framebuffer.id());
        }
        Ok(complete)
    }

    #[allow(clippy::too_many_arguments)]
    pub fn framebuffer_get_pixels(
        &self,
        framebuffer: &FramebufferHandle,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        format: u32,
        ty: u32,
        out: &mut [u8],
    ) -> Result<(), DriverError> {
        framebuffer.ensure_live()?;
        self.backend
            .framebuffer_get_pixels(framebuffer.id(), x, y, width, height, format, ty, out);
        Ok(())
    }

    /// Delete the framebuffer. Idempotent; the default framebuffer is
    /// silently ignored.
    pub fn framebuffer_delete(&mut self, framebuffer: &mut FramebufferHandle) {
        if framebuffer.ensure_live().is_err() {
            return;
        }
        if framebuffer.id() == self.backend.framebuffer_default() {
            return;
        }
        self.backend.framebuffer_delete(framebuffer.id());
        self.known_complete.remove(&framebuffer.id());
        if let Some((bound, _)) = &self.last_framebuffer {
            if *bound == framebuffer.id() {
                self.last_framebuffer = None;
            }
        }
        framebuffer.invalidate();
    }

    // Shaders.

    /// Compile a shader; valid on return. Compilation problems surface
    /// through [`Self::shader_info_log`], as with the native APIs.
    pub fn shader_compile(&mut self, ty: u32, source: &str) -> Result<ShaderHandle, DriverError> {
        self.require(GraphicsCapability::ShaderProgram)?;
        Ok(ShaderHandle::valid(self.backend.shader_compile(ty, source)))
    }

    pub fn shader_info_log(&self, shader: &ShaderHandle) -> Result<String, DriverError> {
        shader.ensure_live()?;
        Ok(self.backend.shader_info_log(shader.id()))
    }

    pub fn shader_parameter(&self, shader: &ShaderHandle, param: u32) -> Result<i32, DriverError> {
        shader.ensure_live()?;
        Ok(self.backend.shader_parameter(shader.id(), param))
    }

    /// Delete the shader. Programs linked against it are unaffected.
    /// Idempotent.
    pub fn shader_delete(&mut self, shader: &mut ShaderHandle) {
        if shader.ensure_live().is_err() {
            return;
        }
        self.backend.shader_delete(shader.id());
        shader.invalidate();
    }

    // Programs.

    /// Create a program container. Unallocated until linked.
    pub fn program_create(&mut self) -> Result<ProgramHandle, DriverError> {
        self.require(GraphicsCapability::ShaderProgram)?;
        Ok(ProgramHandle::unallocated(self.backend.program_create()))
    }

    /// Link shaders into the program; valid afterwards.
    pub fn program_link_shaders(
        &mut self,
        program: &mut ProgramHandle,
        shaders: &[&ShaderHandle],
    ) -> Result<(), DriverError> {
        program.ensure_live()?;
        for shader in shaders {
            shader.ensure_live()?;
        }
        let ids: Vec<u64> = shaders.iter().map(|shader| shader.id()).collect();
        self.backend.program_link_shaders(program.id(), &ids);
        program.mark_valid();
        Ok(())
    }

    /// Make the program current.
    ///
    /// With `memorize_program` on, re-using the current program skips the
    /// backend call.
    pub fn program_use(&mut self, program: &ProgramHandle) -> Result<(), DriverError> {
        program.ensure_live()?;
        if self.tweaks.memorize_program && self.last_program == Some(program.id()) {
            return Ok(());
        }
        self.backend.program_use(program.id());
        self.last_program = Some(program.id());
        Ok(())
    }

    pub fn program_uniform_location(
        &self,
        program: &ProgramHandle,
        name: &str,
    ) -> Result<i32, DriverError> {
        program.ensure_live()?;
        Ok(self.backend.program_uniform_location(program.id(), name))
    }

    pub fn program_set_attrib_location(
        &mut self,
        program: &ProgramHandle,
        index: u32,
        name: &str,
    ) -> Result<(), DriverError> {
        program.ensure_live()?;
        self.backend
            .program_set_attrib_location(program.id(), index, name);
        Ok(())
    }

    /// Set a float uniform vector, lengths 1-4.
    pub fn program_set_uniform_f(
        &mut self,
        program: &ProgramHandle,
        location: i32,
        value: &[f32],
    ) -> Result<(), DriverError> {
        program.ensure_live()?;
        self.backend
            .program_set_uniform_f(program.id(), location, value);
        Ok(())
    }

    /// Set an integer uniform vector, lengths 1-4.
    pub fn program_set_uniform_i(
        &mut self,
        program: &ProgramHandle,
        location: i32,
        value: &[i32],
    ) -> Result<(), DriverError> {
        program.ensure_live()?;
        self.backend
            .program_set_uniform_i(program.id(), location, value);
        Ok(())
    }

    /// Set a double uniform vector, lengths 1-4.
    pub fn program_set_uniform_d(
        &mut self,
        program: &ProgramHandle,
        location: i32,
        value: &[f64],
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::Uniforms64)?;
        program.ensure_live()?;
        self.backend
            .program_set_uniform_d(program.id(), location, value);
        Ok(())
    }

    /// Set a float matrix uniform (2x2, 3x3 or 4x4, column-major).
    pub fn program_set_uniform_mat_f(
        &mut self,
        program: &ProgramHandle,
        location: i32,
        mat: &[f32],
    ) -> Result<(), DriverError> {
        program.ensure_live()?;
        self.backend
            .program_set_uniform_mat_f(program.id(), location, mat);
        Ok(())
    }

    /// Set a double matrix uniform (2x2, 3x3 or 4x4, column-major).
    pub fn program_set_uniform_mat_d(
        &mut self,
        program: &ProgramHandle,
        location: i32,
        mat: &[f64],
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::Uniforms64)?;
        program.ensure_live()?;
        self.backend
            .program_set_uniform_mat_d(program.id(), location, mat);
        Ok(())
    }

    pub fn program_set_uniform_block(
        &mut self,
        program: &ProgramHandle,
        name: &str,
        buffer: &BufferHandle,
        binding: u32,
    ) -> Result<(), DriverError> {
        program.ensure_live()?;
        buffer.ensure_live()?;
        self.backend
            .program_set_uniform_block(program.id(), name, buffer.id(), binding);
        Ok(())
    }

    pub fn program_set_storage(
        &mut self,
        program: &ProgramHandle,
        name: &str,
        buffer: &BufferHandle,
        binding: u32,
    ) -> Result<(), DriverError> {
        program.ensure_live()?;
        buffer.ensure_live()?;
        self.backend
            .program_set_storage(program.id(), name, buffer.id(), binding);
        Ok(())
    }

    /// Execute the program as a compute shader.
    pub fn program_dispatch_compute(
        &mut self,
        program: &ProgramHandle,
        num_x: u32,
        num_y: u32,
        num_z: u32,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::ComputeShader)?;
        program.ensure_live()?;
        self.backend
            .program_dispatch_compute(program.id(), num_x, num_y, num_z);
        Ok(())
    }

    /// Delete the program. Idempotent.
    pub fn program_delete(&mut self, program: &mut ProgramHandle) {
        if program.ensure_live().is_err() {
            return;
        }
        self.backend.program_delete(program.id());
        if self.last_program == Some(program.id()) {
            self.last_program = None;
        }
        program.invalidate();
    }

    // Samplers.

    /// Create a sampler; valid on return.
    pub fn sampler_create(&mut self) -> Result<SamplerHandle, DriverError> {
        self.require(GraphicsCapability::Sampler)?;
        Ok(SamplerHandle::valid(self.backend.sampler_create()))
    }

    pub fn sampler_set_parameter_i(
        &mut self,
        sampler: &SamplerHandle,
        param: u32,
        value: i32,
    ) -> Result<(), DriverError> {
        sampler.ensure_live()?;
        self.backend
            .sampler_set_parameter_i(sampler.id(), param, value);
        Ok(())
    }

    pub fn sampler_set_parameter_f(
        &mut self,
        sampler: &SamplerHandle,
        param: u32,
        value: f32,
    ) -> Result<(), DriverError> {
        sampler.ensure_live()?;
        self.backend
            .sampler_set_parameter_f(sampler.id(), param, value);
        Ok(())
    }

    pub fn sampler_bind(&mut self, unit: u32, sampler: &SamplerHandle) -> Result<(), DriverError> {
        sampler.ensure_live()?;
        self.backend.sampler_bind(unit, sampler.id());
        Ok(())
    }

    /// Delete the sampler. Idempotent.
    pub fn sampler_delete(&mut self, sampler: &mut SamplerHandle) {
        if sampler.ensure_live().is_err() {
            return;
        }
        self.backend.sampler_delete(sampler.id());
        sampler.invalidate();
    }

    // Vertex arrays.

    /// Create a vertex array container. Unallocated until a buffer is
    /// attached; drawing an unconfigured vertex array produces
    /// implementation-defined results rather than an error.
    pub fn vertex_array_create(&mut self) -> Result<VertexArrayHandle, DriverError> {
        self.require(GraphicsCapability::VertexArrayObject)?;
        Ok(VertexArrayHandle::unallocated(
            self.backend.vertex_array_create(),
        ))
    }

    pub fn vertex_array_attach_buffer(
        &mut self,
        vao: &mut VertexArrayHandle,
        index: u32,
        buffer: &BufferHandle,
        attrib: VertexAttrib,
    ) -> Result<(), DriverError> {
        vao.ensure_live()?;
        buffer.ensure_live()?;
        self.backend
            .vertex_array_attach_buffer(vao.id(), index, buffer.id(), attrib);
        vao.mark_valid();
        Ok(())
    }

    pub fn vertex_array_attach_index_buffer(
        &mut self,
        vao: &mut VertexArrayHandle,
        buffer: &BufferHandle,
    ) -> Result<(), DriverError> {
        vao.ensure_live()?;
        buffer.ensure_live()?;
        self.backend
            .vertex_array_attach_index_buffer(vao.id(), buffer.id());
        vao.mark_valid();
        Ok(())
    }

    pub fn vertex_array_draw_arrays(
        &mut self,
        vao: &VertexArrayHandle,
        mode: u32,
        first: i32,
        count: i32,
    ) -> Result<(), DriverError> {
        vao.ensure_live()?;
        self.backend
            .vertex_array_draw_arrays(vao.id(), mode, first, count);
        Ok(())
    }

    /// Issue one batch of draws; `first` and `count` pair up per draw.
    pub fn vertex_array_multi_draw_arrays(
        &mut self,
        vao: &VertexArrayHandle,
        mode: u32,
        first: &[i32],
        count: &[i32],
    ) -> Result<(), DriverError> {
        vao.ensure_live()?;
        debug_assert_eq!(first.len(), count.len());
        self.backend
            .vertex_array_multi_draw_arrays(vao.id(), mode, first, count);
        Ok(())
    }

    pub fn vertex_array_draw_elements(
        &mut self,
        vao: &VertexArrayHandle,
        mode: u32,
        count: i32,
        ty: u32,
        offset: u64,
    ) -> Result<(), DriverError> {
        vao.ensure_live()?;
        self.backend
            .vertex_array_draw_elements(vao.id(), mode, count, ty, offset);
        Ok(())
    }

    pub fn vertex_array_draw_arrays_instanced(
        &mut self,
        vao: &VertexArrayHandle,
        mode: u32,
        first: i32,
        count: i32,
        instances: i32,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::DrawInstanced)?;
        vao.ensure_live()?;
        self.backend
            .vertex_array_draw_arrays_instanced(vao.id(), mode, first, count, instances);
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub fn vertex_array_draw_elements_instanced(
        &mut self,
        vao: &VertexArrayHandle,
        mode: u32,
        count: i32,
        ty: u32,
        offset: u64,
        instances: i32,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::DrawInstanced)?;
        vao.ensure_live()?;
        self.backend
            .vertex_array_draw_elements_instanced(vao.id(), mode, count, ty, offset, instances);
        Ok(())
    }

    /// Draw with parameters sourced from a command buffer.
    pub fn vertex_array_draw_arrays_indirect(
        &mut self,
        vao: &VertexArrayHandle,
        cmd_buffer: &BufferHandle,
        mode: u32,
        offset: u64,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::DrawIndirect)?;
        vao.ensure_live()?;
        cmd_buffer.ensure_live()?;
        self.backend
            .vertex_array_draw_arrays_indirect(vao.id(), cmd_buffer.id(), mode, offset);
        Ok(())
    }

    pub fn vertex_array_draw_elements_indirect(
        &mut self,
        vao: &VertexArrayHandle,
        cmd_buffer: &BufferHandle,
        mode: u32,
        index_type: u32,
        offset: u64,
    ) -> Result<(), DriverError> {
        self.require(GraphicsCapability::DrawIndirect)?;
        vao.ensure_live()?;
        cmd_buffer.ensure_live()?;
        self.backend.vertex_array_draw_elements_indirect(
            vao.id(),
            cmd_buffer.id(),
            mode,
            index_type,
            offset,
        );
        Ok(())
    }

    /// Delete the vertex array. Idempotent.
    pub fn vertex_array_delete(&mut self, vao: &mut VertexArrayHandle) {
        if vao.ensure_live().is_err() {
            return;
        }
        self.backend.vertex_array_delete(vao.id());
        vao.invalidate();
    }

    // Draw queries.

    /// Create a draw query container. Unallocated until first enabled.
    pub fn draw_query_create(&mut self) -> Result<DrawQueryHandle, DriverError> {
        self.require(GraphicsCapability::DrawQuery)?;
        Ok(DrawQueryHandle::unallocated(self.backend.draw_query_create()))
    }

    /// Begin collecting the condition into the query; valid afterwards.
    pub fn draw_query_enable(
        &mut self,
        condition: u32,
        query: &mut DrawQueryHandle,
    ) -> Result<(), DriverError> {
        query.ensure_live()?;
        self.backend.draw_query_enable(condition, query.id());
        query.mark_valid();
        Ok(())
    }

    pub fn draw_query_disable(&mut self, condition: u32) {
        self.backend.draw_query_disable(condition);
    }

    /// Begin query-gated rendering.
    pub fn draw_query_begin_conditional_render(
        &mut self,
        query: &DrawQueryHandle,
        mode: u32,
    ) -> Result<(), DriverError> {
        query.ensure_live()?;
        self.backend
            .draw_query_begin_conditional_render(query.id(), mode);
        Ok(())
    }

    pub fn draw_query_end_conditional_render(&mut self) {
        self.backend.draw_query_end_conditional_render();
    }

    /// Delete the draw query. Idempotent.
    pub fn draw_query_delete(&mut self, query: &mut DrawQueryHandle) {
        if query.ensure_live().is_err() {
            return;
        }
        self.backend.draw_query_delete(query.id());
        query.invalidate();
    }

    // Global pipeline state. These target no handles and no optional
    // capability, so they cannot fail at this layer.

    pub fn clear(&mut self, bitfield: u32, color: [f32; 4], depth: f64) {
        self.backend.clear(bitfield, color, depth);
    }

    pub fn viewport(&mut self, x: i32, y: i32, width: u32, height: u32) {
        self.backend.viewport(x, y, width, height);
    }

    pub fn mask_apply(
        &mut self,
        red: bool,
        green: bool,
        blue: bool,
        alpha: bool,
        depth: bool,
        stencil: u32,
    ) {
        self.backend
            .mask_apply(red, green, blue, alpha, depth, stencil);
    }

    pub fn blending_enable(
        &mut self,
        rgb_eq: u32,
        a_eq: u32,
        rgb_src: u32,
        rgb_dst: u32,
        a_src: u32,
        a_dst: u32,
    ) {
        self.backend
            .blending_enable(rgb_eq, a_eq, rgb_src, rgb_dst, a_src, a_dst);
    }

    pub fn blending_disable(&mut self) {
        self.backend.blending_disable();
    }

    pub fn depth_test_enable(&mut self, depth_func: u32) {
        self.backend.depth_test_enable(depth_func);
    }

    pub fn depth_test_disable(&mut self) {
        self.backend.depth_test_disable();
    }

    pub fn scissor_test_enable(&mut self, left: i32, bottom: i32, width: u32, height: u32) {
        self.backend.scissor_test_enable(left, bottom, width, height);
    }

    pub fn scissor_test_disable(&mut self) {
        self.backend.scissor_test_disable();
    }

    pub fn polygon_set_parameters(&mut self, params: &PolygonParameters) {
        self.backend.polygon_set_parameters(params);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null::NullBackend;
    use prism_core::{DriverError, HandleKind, HandleState};

    fn full_driver() -> GraphicsDriver<NullBackend> {
        GraphicsDriver::new(NullBackend::new(), CapabilitySet::all())
    }

    fn driver_without(cap: GraphicsCapability) -> GraphicsDriver<NullBackend> {
        let mut caps = CapabilitySet::all();
        caps.remove(cap);
        GraphicsDriver::new(NullBackend::new(), caps)
    }

    #[test]
    fn buffer_lifecycle_round_trip() {
        let mut driver = full_driver();
        let mut buffer = driver.buffer_create().unwrap();
        assert_eq!(buffer.state(), HandleState::Unallocated);

        driver.buffer_set_data(&mut buffer, &[1, 2, 3, 4], 0).unwrap();
        assert!(buffer.is_valid());

        let mut out = [0u8; 4];
        driver.buffer_get_data(&buffer, 0, &mut out).unwrap();
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn reallocation_replaces_content() {
        let mut driver = full_driver();
        let mut buffer = driver.buffer_create().unwrap();
        driver.buffer_set_data(&mut buffer, &[9; 8], 0).unwrap();
        driver.buffer_allocate(&mut buffer, 4, 0).unwrap();
        assert!(buffer.is_valid());

        let mut out = [9u8; 4];
        driver.buffer_get_data(&buffer, 0, &mut out).unwrap();
        assert_eq!(out, [0, 0, 0, 0]);
    }

    #[test]
    fn buffer_parameter_query_reports_allocated_size() {
        let mut driver = full_driver();
        let mut buffer = driver.buffer_create().unwrap();
        driver.buffer_allocate(&mut buffer, 24, 0).unwrap();

        let size = driver
            .buffer_get_parameter_i(&buffer, crate::null::BUFFER_SIZE)
            .unwrap();
        assert_eq!(size, 24);

        let id = buffer.id();
        driver.buffer_delete(&mut buffer);
        assert_eq!(
            driver.buffer_get_parameter_i(&buffer, crate::null::BUFFER_SIZE),
            Err(DriverError::InvalidHandle {
                kind: HandleKind::Buffer,
                id,
            })
        );
    }

    #[test]
    fn multi_draw_is_one_backend_batch() {
        let mut driver = full_driver();
        let mut vao = driver.vertex_array_create().unwrap();
        let mut buffer = driver.buffer_create().unwrap();
        driver.buffer_set_data(&mut buffer, &[0; 36], 0).unwrap();
        driver
            .vertex_array_attach_buffer(
                &mut vao,
                0,
                &buffer,
                VertexAttrib {
                    size: 3,
                    ty: 0,
                    stride: 12,
                    offset: 0,
                    divisor: 0,
                },
            )
            .unwrap();

        driver
            .vertex_array_multi_draw_arrays(&vao, 0, &[0, 3], &[3, 3])
            .unwrap();
        assert_eq!(driver.backend().draw_calls(), 1);

        let id = vao.id();
        driver.vertex_array_delete(&mut vao);
        assert_eq!(
            driver.vertex_array_multi_draw_arrays(&vao, 0, &[0], &[3]),
            Err(DriverError::InvalidHandle {
                kind: HandleKind::VertexArray,
                id,
            })
        );
    }

    #[test]
    fn delete_is_idempotent() {
        let mut driver = full_driver();
        let mut buffer = driver.buffer_create().unwrap();
        driver.buffer_delete(&mut buffer);
        driver.buffer_delete(&mut buffer);
        assert_eq!(buffer.state(), HandleState::Invalid);
    }

    #[test]
    fn use_after_delete_is_an_invalid_handle_error() {
        let mut driver = full_driver();
        let mut buffer = driver.buffer_create().unwrap();
        let id = buffer.id();
        driver.buffer_delete(&mut buffer);

        assert_eq!(
            driver.buffer_set_data(&mut buffer, &[1], 0),
            Err(DriverError::InvalidHandle {
                kind: HandleKind::Buffer,
                id,
            })
        );
    }

    #[test]
    fn gated_commands_fail_without_the_flag() {
        let mut driver = driver_without(GraphicsCapability::DrawIndirect);
        let mut vao = driver.vertex_array_create().unwrap();
        let mut cmd = driver.buffer_create().unwrap();
        driver.buffer_set_data(&mut cmd, &[0; 16], 0).unwrap();
        driver
            .vertex_array_attach_buffer(
                &mut vao,
                0,
                &cmd,
                VertexAttrib {
                    size: 4,
                    ty: 0,
                    stride: 16,
                    offset: 0,
                    divisor: 0,
                },
            )
            .unwrap();

        assert_eq!(
            driver.vertex_array_draw_arrays_indirect(&vao, &cmd, 0, 0),
            Err(DriverError::UnsupportedCapability {
                capability: "draw indirect",
            })
        );
        // The ungated draw path still reaches the backend.
        driver.vertex_array_draw_arrays(&vao, 0, 0, 3).unwrap();
        assert_eq!(driver.backend().draw_calls(), 1);
    }

    #[test]
    fn gated_commands_reach_the_backend_with_the_flag() {
        let mut driver = full_driver();
        let mut vao = driver.vertex_array_create().unwrap();
        let mut cmd = driver.buffer_create().unwrap();
        driver.buffer_set_data(&mut cmd, &[0; 16], 0).unwrap();
        driver
            .vertex_array_attach_index_buffer(&mut vao, &cmd)
            .unwrap();

        driver
            .vertex_array_draw_arrays_indirect(&vao, &cmd, 0, 0)
            .unwrap();
        assert_eq!(driver.backend().draw_calls(), 1);
    }

    #[test]
    fn creation_is_gated_per_kind() {
        let mut driver = driver_without(GraphicsCapability::Sampler);
        assert_eq!(
            driver.sampler_create(),
            Err(DriverError::UnsupportedCapability {
                capability: "sampler object",
            })
        );

        let mut driver = driver_without(GraphicsCapability::ComputeShader);
        let mut program = driver.program_create().unwrap();
        let shader = driver.shader_compile(0, "void main() {}").unwrap();
        driver
            .program_link_shaders(&mut program, &[&shader])
            .unwrap();
        assert!(matches!(
            driver.program_dispatch_compute(&program, 1, 1, 1),
            Err(DriverError::UnsupportedCapability { .. })
        ));
    }

    #[test]
    fn double_uniforms_are_gated() {
        let mut driver = driver_without(GraphicsCapability::Uniforms64);
        let mut program = driver.program_create().unwrap();
        let shader = driver.shader_compile(0, "void main() {}").unwrap();
        driver
            .program_link_shaders(&mut program, &[&shader])
            .unwrap();

        driver.program_set_uniform_f(&program, 0, &[1.0]).unwrap();
        assert!(matches!(
            driver.program_set_uniform_d(&program, 0, &[1.0]),
            Err(DriverError::UnsupportedCapability { .. })
        ));
    }

    #[test]
    fn memorize_program_elides_redundant_use_calls() {
        let mut driver = full_driver();
        driver.apply_tweaks(Tweaks::new().with_memorize_program(true));

        let mut program = driver.program_create().unwrap();
        let shader = driver.shader_compile(0, "void main() {}").unwrap();
        driver
            .program_link_shaders(&mut program, &[&shader])
            .unwrap();

        driver.program_use(&program).unwrap();
        driver.program_use(&program).unwrap();
        driver.program_use(&program).unwrap();
        assert_eq!(driver.backend().program_use_calls(), 1);
    }

    #[test]
    fn strict_mode_never_elides() {
        let mut driver = full_driver();
        let mut program = driver.program_create().unwrap();
        let shader = driver.shader_compile(0, "void main() {}").unwrap();
        driver
            .program_link_shaders(&mut program, &[&shader])
            .unwrap();

        driver.program_use(&program).unwrap();
        driver.program_use(&program).unwrap();
        assert_eq!(driver.backend().program_use_calls(), 2);
    }

    #[test]
    fn memorized_framebuffer_bind_skips_identical_rebinds() {
        let mut driver = full_driver();
        driver.apply_tweaks(Tweaks::new().with_memorize_framebuffer(true));

        let mut fb = driver.framebuffer_create().unwrap();
        driver.framebuffer_bind(&mut fb, &[0]).unwrap();
        driver.framebuffer_bind(&mut fb, &[0]).unwrap();
        assert_eq!(driver.backend().framebuffer_bind_calls(), 1);

        // A different draw-buffer list is not redundant.
        driver.framebuffer_bind(&mut fb, &[0, 1]).unwrap();
        assert_eq!(driver.backend().framebuffer_bind_calls(), 2);
    }

    #[test]
    fn framebuffer_completeness_recheck_can_be_skipped() {
        let mut driver = full_driver();
        driver.apply_tweaks(Tweaks::new().with_skip_framebuffer_completeness_check(true));

        let mut fb = driver.framebuffer_create().unwrap();
        driver.framebuffer_bind(&mut fb, &[]).unwrap();
        assert!(driver.framebuffer_is_complete(&fb).unwrap());
        assert!(driver.framebuffer_is_complete(&fb).unwrap());
        assert_eq!(driver.backend().completeness_checks(), 1);

        // Changing attachments drops the cached answer.
        let texture = driver.texture_allocate(1, crate::format::RGBA8, 4, 4, 1).unwrap();
        driver
            .framebuffer_add_attachment(&mut fb, 0, &texture, 0)
            .unwrap();
        assert!(driver.framebuffer_is_complete(&fb).unwrap());
        assert_eq!(driver.backend().completeness_checks(), 2);
    }

    #[test]
    fn default_framebuffer_ignores_delete() {
        let mut driver = full_driver();
        let mut fb = driver.framebuffer_default();
        driver.framebuffer_delete(&mut fb);
        assert!(fb.is_valid());
    }

    #[test]
    fn sparse_texture_paging_is_gated() {
        let mut driver = driver_without(GraphicsCapability::SparseTexture);
        let texture = driver.texture_allocate(1, crate::format::RGBA8, 64, 64, 1).unwrap();
        let region = Region {
            x_offset: 0,
            y_offset: 0,
            z_offset: 0,
            width: 64,
            height: 64,
            depth: 1,
        };
        assert!(matches!(
            driver.texture_allocate_page(&texture, 0, region),
            Err(DriverError::UnsupportedCapability { .. })
        ));
        assert!(matches!(
            driver.texture_page_width(&texture),
            Err(DriverError::UnsupportedCapability { .. })
        ));
    }

    #[test]
    fn invalidate_is_gated_and_advisory() {
        let mut driver = full_driver();
        let mut buffer = driver.buffer_create().unwrap();
        driver.buffer_set_data(&mut buffer, &[7; 4], 0).unwrap();
        driver.buffer_invalidate_data(&buffer).unwrap();

        // Advisory: content is still readable after invalidation.
        let mut out = [0u8; 4];
        driver.buffer_get_data(&buffer, 0, &mut out).unwrap();
        assert_eq!(out, [7; 4]);

        let mut driver = driver_without(GraphicsCapability::InvalidateSubdata);
        let mut buffer = driver.buffer_create().unwrap();
        driver.buffer_set_data(&mut buffer, &[7; 4], 0).unwrap();
        assert!(matches!(
            driver.buffer_invalidate_data(&buffer),
            Err(DriverError::UnsupportedCapability { .. })
        ));
    }

    #[test]
    fn unallocated_reads_are_legal() {
        let mut driver = full_driver();
        let mut buffer = driver.buffer_create().unwrap();
        driver.buffer_allocate(&mut buffer, 8, 0).unwrap();

        // Content is implementation-defined but the call must succeed.
        let mut out = [0u8; 8];
        assert!(driver.buffer_get_data(&buffer, 0, &mut out).is_ok());
    }
}
