//! Capability flags and support ratings
//!
//! Each driver family declares a closed set of optional feature flags. A
//! candidate backend reports the subset it supports as a [`CapabilitySet`];
//! the normalized rating over that set drives best-candidate selection, and
//! [`CapabilitySet::require`] is the one code path that turns a missing flag
//! into [`DriverError::UnsupportedCapability`] at point of use.

use crate::error::DriverError;
use std::fmt;
use std::marker::PhantomData;

/// A closed family of capability flags.
///
/// Implementors are fieldless enums; `ALL` fixes the family's member count
/// (the rating denominator) and its canonical order.
pub trait Capability: Copy + Eq + 'static {
    /// Every flag in the family, in canonical order.
    const ALL: &'static [Self];

    /// Position of this flag within the family, `0..ALL.len()`.
    fn index(&self) -> u32;

    /// Human-readable flag name, used in logs and error payloads.
    fn label(&self) -> &'static str;
}

/// The set of capability flags one backend candidate reports.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct CapabilitySet<C: Capability> {
    bits: u32,
    _marker: PhantomData<C>,
}

impl<C: Capability> CapabilitySet<C> {
    /// A set with every flag cleared.
    pub fn empty() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }

    /// A set with every flag of the family reported as supported.
    pub fn all() -> Self {
        C::ALL.iter().copied().collect()
    }

    /// Builder-style insertion.
    pub fn with(mut self, cap: C) -> Self {
        self.insert(cap);
        self
    }

    pub fn insert(&mut self, cap: C) {
        self.bits |= 1 << cap.index();
    }

    pub fn remove(&mut self, cap: C) {
        self.bits &= !(1 << cap.index());
    }

    pub fn contains(&self, cap: C) -> bool {
        self.bits & (1 << cap.index()) != 0
    }

    /// Gate an operation on a flag.
    ///
    /// Selection never fails for a missing optional capability; only the
    /// first use of that capability does, through this check.
    pub fn require(&self, cap: C) -> Result<(), DriverError> {
        if self.contains(cap) {
            Ok(())
        } else {
            Err(DriverError::UnsupportedCapability {
                capability: cap.label(),
            })
        }
    }

    /// Supported flags, in canonical family order.
    pub fn iter(&self) -> impl Iterator<Item = C> + '_ {
        C::ALL.iter().copied().filter(|cap| self.contains(*cap))
    }

    /// Normalized support rating in `[0.0, 1.0]`.
    ///
    /// `supported flags / family flag count`, recomputed from the flags on
    /// every call. Monotonic: setting a flag never lowers the rating.
    pub fn rating(&self) -> f64 {
        self.bits.count_ones() as f64 / C::ALL.len() as f64
    }

    /// Log the full capability report for one candidate: name and rating at
    /// `info`, one line per flag at `debug`.
    pub fn log(&self, driver: &str) {
        tracing::info!(driver, rating = self.rating(), "driver capabilities");
        for cap in C::ALL {
            tracing::debug!(
                driver,
                capability = cap.label(),
                supported = self.contains(*cap)
            );
        }
    }
}

impl<C: Capability> Default for CapabilitySet<C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<C: Capability> FromIterator<C> for CapabilitySet<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        let mut set = Self::empty();
        for cap in iter {
            set.insert(cap);
        }
        set
    }
}

impl<C: Capability> fmt::Debug for CapabilitySet<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.iter().map(|cap| cap.label()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum TestCap {
        A,
        B,
        C,
        D,
    }

    impl Capability for TestCap {
        const ALL: &'static [Self] = &[Self::A, Self::B, Self::C, Self::D];

        fn index(&self) -> u32 {
            *self as u32
        }

        fn label(&self) -> &'static str {
            match self {
                Self::A => "a",
                Self::B => "b",
                Self::C => "c",
                Self::D => "d",
            }
        }
    }

    #[test]
    fn rating_counts_set_flags_over_family_size() {
        assert_eq!(CapabilitySet::<TestCap>::empty().rating(), 0.0);
        assert_eq!(CapabilitySet::<TestCap>::all().rating(), 1.0);

        let set = CapabilitySet::empty().with(TestCap::A).with(TestCap::C);
        assert_eq!(set.rating(), 0.5);
    }

    #[test]
    fn rating_is_monotonic_in_flag_flips() {
        let mut set = CapabilitySet::<TestCap>::empty();
        let mut last = set.rating();
        for cap in TestCap::ALL {
            set.insert(*cap);
            let next = set.rating();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn rating_is_stable_across_calls() {
        let set = CapabilitySet::empty().with(TestCap::B);
        assert_eq!(set.rating(), set.rating());
    }

    #[test]
    fn require_is_the_unsupported_path() {
        let set = CapabilitySet::empty().with(TestCap::A);
        assert!(set.require(TestCap::A).is_ok());
        assert_eq!(
            set.require(TestCap::D),
            Err(DriverError::UnsupportedCapability { capability: "d" })
        );
    }

    #[test]
    fn insert_remove_round_trip() {
        let mut set = CapabilitySet::<TestCap>::all();
        set.remove(TestCap::B);
        assert!(!set.contains(TestCap::B));
        assert!(set.contains(TestCap::A));
        assert_eq!(set.iter().count(), 3);
    }
}
