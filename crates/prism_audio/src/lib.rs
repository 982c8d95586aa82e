//! Prism Audio SPI
//!
//! The audio driver family: positional sources, queued sample buffers and a
//! single listener, with an optional EFX-style effects surface behind
//! capability flags. Concrete native bindings implement [`AudioBackend`];
//! applications drive [`AudioDriver`], which enforces the shared handle
//! lifecycle and capability contracts.

pub mod backend;
pub mod caps;
pub mod driver;
pub mod null;

pub use backend::AudioBackend;
pub use caps::AudioCapability;
pub use driver::AudioDriver;
pub use null::{NullAudioBackend, NullAudioProvider};

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
    Device => AudioDevice, DeviceHandle;
    Source => AudioSource, SourceHandle;
    Buffer => AudioBuffer, BufferHandle;
    Listener => Listener, ListenerHandle;
    Effect => Effect, EffectHandle;
    Filter => Filter, FilterHandle;
    AuxEffectSlot => AuxEffectSlot, AuxEffectSlotHandle;
}
