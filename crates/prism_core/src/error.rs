use std::fmt;
use thiserror::Error;

/// Errors surfaced by a driver facade.
///
/// Both variants are caller programming errors reported synchronously at the
/// offending call. A selection miss is not an error; the registry returns
/// `None` for that instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DriverError {
    /// An optional feature was used while the bound driver does not report
    /// its capability flag. Never raised at selection time.
    #[error("{capability} is not supported by the bound driver")]
    UnsupportedCapability { capability: &'static str },

    /// A non-delete operation targeted a deleted handle.
    #[error("{kind} handle {id} has been deleted")]
    InvalidHandle { kind: HandleKind, id: u64 },
}

/// Every resource kind a driver family hands out handles for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleKind {
    Buffer,
    Texture,
    Framebuffer,
    Renderbuffer,
    Shader,
    Program,
    Sampler,
    VertexArray,
    DrawQuery,
    AudioDevice,
    AudioSource,
    AudioBuffer,
    Listener,
    Effect,
    Filter,
    AuxEffectSlot,
}

impl HandleKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Buffer => "buffer",
            Self::Texture => "texture",
            Self::Framebuffer => "framebuffer",
            Self::Renderbuffer => "renderbuffer",
            Self::Shader => "shader",
            Self::Program => "program",
            Self::Sampler => "sampler",
            Self::VertexArray => "vertex array",
            Self::DrawQuery => "draw query",
            Self::AudioDevice => "audio device",
            Self::AudioSource => "audio source",
            Self::AudioBuffer => "audio buffer",
            Self::Listener => "listener",
            Self::Effect => "effect",
            Self::Filter => "filter",
            Self::AuxEffectSlot => "auxiliary effect slot",
        }
    }
}

impl fmt::Display for HandleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_name_the_offender() {
        let err = DriverError::UnsupportedCapability {
            capability: "compute shader",
        };
        assert_eq!(
            err.to_string(),
            "compute shader is not supported by the bound driver"
        );

        let err = DriverError::InvalidHandle {
            kind: HandleKind::VertexArray,
            id: 7,
        };
        assert_eq!(err.to_string(), "vertex array handle 7 has been deleted");
    }
}
