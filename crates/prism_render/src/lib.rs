//! Prism Render SPI
//!
//! The graphics driver family: a rough abstraction of a modern GL-class API
//! by functionality. Concrete native bindings implement [`GraphicsBackend`];
//! applications drive [`GraphicsDriver`], which enforces the shared handle
//! lifecycle and capability contracts in one place regardless of which
//! backend won selection.

pub mod backend;
pub mod caps;
pub mod driver;
pub mod format;
pub mod null;
pub mod tweaks;

pub use backend::{GraphicsBackend, PolygonParameters, Region, VertexAttrib};
pub use caps::GraphicsCapability;
pub use driver::GraphicsDriver;
pub use format::{base_format, BaseFormat};
pub use null::{NullBackend, NullProvider};
pub use tweaks::Tweaks;

use prism_core::{Handle, HandleKind, ResourceTag};

macro_rules! resource_tags {
    ($($tag:ident => $kind:ident, $alias:ident);+ $(;)?) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq)]
            pub struct $tag;

            impl ResourceTag for $tag {
                const KIND: HandleKind = HandleKind::$kind;
            }

            pub type $alias = Handle<$tag>;
        )+
    };
}

resource_tags! {
    Buffer => Buffer, BufferHandle;
    Texture => Texture, TextureHandle;
    Framebuffer => Framebuffer, FramebufferHandle;
    Renderbuffer => Renderbuffer, RenderbufferHandle;
    Shader => Shader, ShaderHandle;
    Program => Program, ProgramHandle;
    Sampler => Sampler, SamplerHandle;
    VertexArray => VertexArray, VertexArrayHandle;
    DrawQuery => DrawQuery, DrawQueryHandle;
}
