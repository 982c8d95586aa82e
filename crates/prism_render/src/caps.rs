//! The graphics capability family

use prism_core::Capability;

/// The closed set of optional graphics driver features.
///
/// Exactly these fourteen flags exist for the graphics family; a backend
/// candidate reports a value for every one of them when probed, and the
/// flags are fixed for the lifetime of the session once a driver is bound.
/// The support rating is computed over all fourteen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum GraphicsCapability {
    BufferObject,
    ImmutableBufferStorage,
    DrawQuery,
    FramebufferObject,
    ShaderProgram,
    Sampler,
    ComputeShader,
    SparseTexture,
    DrawIndirect,
    DrawInstanced,
    InvalidateSubdata,
    SeparateShaderObjects,
    Uniforms64,
    VertexArrayObject,
}

impl Capability for GraphicsCapability {
    const ALL: &'static [Self] = &[
        Self::BufferObject,
        Self::ImmutableBufferStorage,
        Self::DrawQuery,
        Self::FramebufferObject,
        Self::ShaderProgram,
        Self::Sampler,
        Self::ComputeShader,
        Self::SparseTexture,
        Self::DrawIndirect,
        Self::DrawInstanced,
        Self::InvalidateSubdata,
        Self::SeparateShaderObjects,
        Self::Uniforms64,
        Self::VertexArrayObject,
    ];

    fn index(&self) -> u32 {
        *self as u32
    }

    fn label(&self) -> &'static str {
        match self {
            Self::BufferObject => "buffer object",
            Self::ImmutableBufferStorage => "immutable buffer storage",
            Self::DrawQuery => "draw query",
            Self::FramebufferObject => "framebuffer object",
            Self::ShaderProgram => "shader program",
            Self::Sampler => "sampler object",
            Self::ComputeShader => "compute shader",
            Self::SparseTexture => "sparse texture",
            Self::DrawIndirect => "draw indirect",
            Self::DrawInstanced => "draw instanced",
            Self::InvalidateSubdata => "invalidate subdata",
            Self::SeparateShaderObjects => "separate shader objects",
            Self::Uniforms64 => "64bit uniforms",
            Self::VertexArrayObject => "vertex array object",
        }
    }
}
