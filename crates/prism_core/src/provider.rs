//! The candidate contract consumed by the selection registry

/// One installable backend candidate.
///
/// A provider describes a backend without binding it: name, description tags,
/// a whole-candidate support gate and a normalized support rating. The
/// registry probes these freely; [`DriverProvider::driver_instance`] is only
/// called for the winning candidate.
pub trait DriverProvider {
    /// The driver facade this candidate produces when selected.
    type Driver;

    /// Human-readable driver name, matched case-insensitively by
    /// [`DriverRegistry::select_by_name`](crate::DriverRegistry::select_by_name).
    fn name(&self) -> &str;

    /// Free-form description tags for tag-based selection (backend family,
    /// version tier, ...).
    fn tags(&self) -> &[String];

    /// Whether this candidate may be used at all in the current environment.
    ///
    /// Distinct from individual capability flags: a candidate can be
    /// supported with a low rating.
    fn is_supported(&self) -> bool;

    /// Normalized support rating in `[0.0, 1.0]`.
    ///
    /// Graphics-family providers compute this from their capability set via
    /// [`CapabilitySet::rating`](crate::CapabilitySet::rating); other
    /// families may weight it however fits.
    fn support_rating(&self) -> f64;

    /// Produce the bound driver facade.
    ///
    /// May lazily construct the backend and lock the process to its native
    /// context, so the registry calls it at most once per selection outcome,
    /// never as a probe.
    fn driver_instance(&self) -> Self::Driver;
}
