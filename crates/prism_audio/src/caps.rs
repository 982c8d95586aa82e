//! Audio capability flags
//!
//! The audio family's optional features are the EFX-style extensions; the
//! core source/buffer/listener surface is unconditional. Three flags make a
//! coarser rating scale than the graphics family, which is fine: ratings
//! only compare candidates within one family.

use prism_core::Capability;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AudioCapability {
    /// Effect objects (reverb, echo, ...) attachable to effect slots.
    Effects,
    /// Filter objects, applied directly to a source or on a send.
    Filters,
    /// Auxiliary effect slots and per-source sends routed through them.
    AuxiliaryEffectSlots,
}

impl Capability for AudioCapability {
    const ALL: &'static [Self] = &[Self::Effects, Self::Filters, Self::AuxiliaryEffectSlots];

    fn index(&self) -> u32 {
        *self as u32
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Effects => "effects",
            Self::Filters => "filters",
            Self::AuxiliaryEffectSlots => "auxiliary effect slots",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_core::CapabilitySet;

    #[test]
    fn family_has_three_flags_with_dense_indices() {
        assert_eq!(AudioCapability::ALL.len(), 3);
        for (i, cap) in AudioCapability::ALL.iter().enumerate() {
            assert_eq!(cap.index(), i as u32);
        }
    }

    #[test]
    fn rating_is_over_the_family_size() {
        let set = CapabilitySet::empty().with(AudioCapability::Effects);
        assert_eq!(set.rating(), 1.0 / 3.0);
        assert_eq!(CapabilitySet::<AudioCapability>::all().rating(), 1.0);
    }
}
