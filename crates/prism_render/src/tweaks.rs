//! Performance tweaks
//!
//! An immutable configuration object a host supplies once when a driver is
//! obtained. Every toggle defaults to off, which means strict no-shortcut
//! behavior; turning one on lets the driver elide redundant state resets.
//! Tweaks may change how often the backend is called, never what a command
//! observably does. A backend that does not understand a requested tweak
//! ignores it (and logs the fact) rather than failing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Immutable tweak set. Derive a modified copy with the `with_*` methods;
/// the original value is never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tweaks {
    /// Skip the full vertex-array state reset on rebind.
    pub ignore_vao_state_reset: bool,
    /// Remember the last-used program and skip redundant use calls.
    pub memorize_program: bool,
    /// Remember the last-bound vertex array and skip redundant rebinds.
    pub memorize_vertex_array: bool,
    /// Remember the last-bound framebuffer and skip redundant rebinds.
    pub memorize_framebuffer: bool,
    /// Remember the last-bound buffer per target.
    pub memorize_buffer: bool,
    /// Skip redundant texture parameter resets.
    pub skip_texture_state_reset: bool,
    /// Skip redundant buffer state resets.
    pub skip_buffer_state_reset: bool,
    /// Skip redundant framebuffer state resets.
    pub skip_framebuffer_state_reset: bool,
    /// Trust a framebuffer once it reported complete and skip the re-check.
    pub skip_framebuffer_completeness_check: bool,
    /// Backend-specific toggles outside the closed set above. Backends look
    /// up the names they know and ignore the rest.
    pub extensions: BTreeMap<String, bool>,
}

impl Tweaks {
    /// The all-off, strict-behavior tweak set.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ignore_vao_state_reset(&self, value: bool) -> Self {
        Self {
            ignore_vao_state_reset: value,
            ..self.clone()
        }
    }

    pub fn with_memorize_program(&self, value: bool) -> Self {
        Self {
            memorize_program: value,
            ..self.clone()
        }
    }

    pub fn with_memorize_vertex_array(&self, value: bool) -> Self {
        Self {
            memorize_vertex_array: value,
            ..self.clone()
        }
    }

    pub fn with_memorize_framebuffer(&self, value: bool) -> Self {
        Self {
            memorize_framebuffer: value,
            ..self.clone()
        }
    }

    pub fn with_memorize_buffer(&self, value: bool) -> Self {
        Self {
            memorize_buffer: value,
            ..self.clone()
        }
    }

    pub fn with_skip_texture_state_reset(&self, value: bool) -> Self {
        Self {
            skip_texture_state_reset: value,
            ..self.clone()
        }
    }

    pub fn with_skip_buffer_state_reset(&self, value: bool) -> Self {
        Self {
            skip_buffer_state_reset: value,
            ..self.clone()
        }
    }

    pub fn with_skip_framebuffer_state_reset(&self, value: bool) -> Self {
        Self {
            skip_framebuffer_state_reset: value,
            ..self.clone()
        }
    }

    pub fn with_skip_framebuffer_completeness_check(&self, value: bool) -> Self {
        Self {
            skip_framebuffer_completeness_check: value,
            ..self.clone()
        }
    }

    /// Derive a copy with a backend-specific extension toggle set.
    pub fn with_extension(&self, name: impl Into<String>, value: bool) -> Self {
        let mut next = self.clone();
        next.extensions.insert(name.into(), value);
        next
    }

    /// Look up a backend-specific extension toggle.
    pub fn extension(&self, name: &str) -> Option<bool> {
        self.extensions.get(name).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_strict() {
        let tweaks = Tweaks::new();
        assert!(!tweaks.memorize_program);
        assert!(!tweaks.ignore_vao_state_reset);
        assert!(!tweaks.skip_framebuffer_completeness_check);
        assert!(tweaks.extensions.is_empty());
    }

    #[test]
    fn derivation_leaves_the_original_untouched() {
        let original = Tweaks::new();
        let derived = original.with_memorize_program(true);

        assert!(derived.memorize_program);
        assert!(!original.memorize_program);

        // Every other field of the derived copy equals the original's.
        let reverted = derived.with_memorize_program(false);
        assert_eq!(reverted, original);
    }

    #[test]
    fn derivations_chain() {
        let tweaks = Tweaks::new()
            .with_ignore_vao_state_reset(true)
            .with_memorize_framebuffer(true)
            .with_skip_buffer_state_reset(true);

        assert!(tweaks.ignore_vao_state_reset);
        assert!(tweaks.memorize_framebuffer);
        assert!(tweaks.skip_buffer_state_reset);
        assert!(!tweaks.memorize_program);
    }

    #[test]
    fn extensions_are_open_ended() {
        let tweaks = Tweaks::new().with_extension("gl.bindless_textures", true);
        assert_eq!(tweaks.extension("gl.bindless_textures"), Some(true));
        assert_eq!(tweaks.extension("unknown"), None);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let tweaks: Tweaks = serde_json::from_str(r#"{"memorize_program": true}"#).unwrap();
        assert!(tweaks.memorize_program);
        assert!(!tweaks.memorize_framebuffer);
    }
}
