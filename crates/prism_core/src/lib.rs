//! Prism SPI Core
//!
//! Shared plumbing for the driver service-provider interfaces:
//! - Error taxonomy for capability and handle-lifecycle violations
//! - The resource handle state machine every driver family honors
//! - Capability sets with normalized support ratings
//! - The `DriverProvider` contract and the selection registry

pub mod caps;
pub mod error;
pub mod handle;
pub mod provider;
pub mod registry;

pub use caps::{Capability, CapabilitySet};
pub use error::{DriverError, HandleKind};
pub use handle::{Handle, HandleState, ResourceTag};
pub use provider::DriverProvider;
pub use registry::DriverRegistry;

/// SPI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
