//! Typed resource handles with an explicit lifecycle
//!
//! Every object a driver hands out (buffer, texture, program, audio source,
//! ...) moves through the same three states:
//!
//! `Unallocated` -> `Valid` -> `Invalid`
//!
//! A handle is `Unallocated` when only its container exists (created but no
//! backing storage), `Valid` once storage or content was assigned, and
//! `Invalid` once deleted. Deletion is idempotent; every other operation on
//! an `Invalid` handle is a programming error the facade reports as
//! [`DriverError::InvalidHandle`].

use crate::error::{DriverError, HandleKind};
use std::marker::PhantomData;

/// Lifecycle state of a resource handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandleState {
    /// The container exists but no storage/content was assigned yet.
    /// Reading such a resource is legal and returns implementation-defined
    /// data, not an error.
    Unallocated,
    /// Usable for every operation whose preconditions hold.
    Valid,
    /// Deleted. Only `delete` (a no-op) may target this handle.
    Invalid,
}

/// Marker trait tying a handle type parameter to its resource kind.
pub trait ResourceTag {
    const KIND: HandleKind;
}

/// An opaque, backend-assigned resource handle.
///
/// The caller that created a handle owns it exclusively until deletion; the
/// driver never retains ownership beyond the call that mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Handle<T: ResourceTag> {
    id: u64,
    state: HandleState,
    _marker: PhantomData<T>,
}

impl<T: ResourceTag> Handle<T> {
    /// Wrap a freshly created container that has no backing storage yet.
    pub fn unallocated(id: u64) -> Self {
        Self {
            id,
            state: HandleState::Unallocated,
            _marker: PhantomData,
        }
    }

    /// Wrap an object that is usable on return (e.g. a compiled shader).
    pub fn valid(id: u64) -> Self {
        Self {
            id,
            state: HandleState::Valid,
            _marker: PhantomData,
        }
    }

    /// The backend-assigned identifier.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn state(&self) -> HandleState {
        self.state
    }

    pub fn is_valid(&self) -> bool {
        self.state == HandleState::Valid
    }

    /// Transition to `Valid` after (re)allocation or a content upload.
    ///
    /// Reallocating an already-valid handle is legal; prior capacity and
    /// content are replaced.
    pub fn mark_valid(&mut self) {
        debug_assert_ne!(self.state, HandleState::Invalid);
        self.state = HandleState::Valid;
    }

    /// Transition to `Invalid`. Idempotent: invalidating an already-invalid
    /// handle does nothing.
    pub fn invalidate(&mut self) {
        self.state = HandleState::Invalid;
    }

    /// The single lifecycle check every non-delete operation performs.
    ///
    /// `Unallocated` passes: reads before the first write return
    /// implementation-defined data by contract rather than failing.
    pub fn ensure_live(&self) -> Result<(), DriverError> {
        if self.state == HandleState::Invalid {
            Err(DriverError::InvalidHandle {
                kind: T::KIND,
                id: self.id,
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestBuffer;
    impl ResourceTag for TestBuffer {
        const KIND: HandleKind = HandleKind::Buffer;
    }

    #[test]
    fn created_handles_start_unallocated() {
        let handle = Handle::<TestBuffer>::unallocated(1);
        assert_eq!(handle.state(), HandleState::Unallocated);
        assert!(!handle.is_valid());
        assert!(handle.ensure_live().is_ok());
    }

    #[test]
    fn allocation_makes_handles_valid_and_is_repeatable() {
        let mut handle = Handle::<TestBuffer>::unallocated(1);
        handle.mark_valid();
        assert!(handle.is_valid());

        // Reallocation is legal and keeps the handle valid.
        handle.mark_valid();
        assert!(handle.is_valid());
    }

    #[test]
    fn invalidate_is_idempotent() {
        let mut handle = Handle::<TestBuffer>::valid(3);
        handle.invalidate();
        handle.invalidate();
        assert_eq!(handle.state(), HandleState::Invalid);
    }

    #[test]
    fn use_after_delete_is_reported() {
        let mut handle = Handle::<TestBuffer>::valid(9);
        handle.invalidate();
        assert_eq!(
            handle.ensure_live(),
            Err(DriverError::InvalidHandle {
                kind: HandleKind::Buffer,
                id: 9,
            })
        );
    }
}
