//! Driver discovery registry and selection protocol
//!
//! Candidates are registered explicitly (dependency-injected by the hosting
//! environment); the registry never scans for them. Three selection entry
//! points pick a winner and hand back its bound driver facade, or `None`
//! when nothing matches — a normal outcome, not an error.

use crate::provider::DriverProvider;

/// Registry over an explicitly registered list of backend candidates.
///
/// Enumeration order is registration order. On exact rating ties the
/// first-registered candidate wins, so the registrar controls tie-break
/// stability across runs.
pub struct DriverRegistry<P: DriverProvider> {
    providers: Vec<P>,
}

impl<P: DriverProvider> DriverRegistry<P> {
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    pub fn register(&mut self, provider: P) {
        self.providers.push(provider);
    }

    /// All registered candidates, in registration order.
    pub fn providers(&self) -> &[P] {
        &self.providers
    }

    /// The candidates whose whole-candidate gate passes.
    pub fn supported(&self) -> impl Iterator<Item = &P> {
        self.providers.iter().filter(|p| p.is_supported())
    }

    /// Select the supported candidate with the greatest support rating.
    ///
    /// Returns `None` when no candidate is supported. Missing optional
    /// capabilities never disqualify a candidate here; using one later is
    /// what fails.
    pub fn select_best(&self) -> Option<P::Driver> {
        let mut best: Option<&P> = None;

        for candidate in self.supported() {
            match best {
                Some(current) if candidate.support_rating() <= current.support_rating() => {}
                Some(current) => {
                    tracing::debug!(
                        selected = candidate.name(),
                        over = current.name(),
                        "selecting higher-rated driver"
                    );
                    best = Some(candidate);
                }
                None => best = Some(candidate),
            }
        }

        best.map(|provider| {
            tracing::info!(driver = provider.name(), "selected driver");
            provider.driver_instance()
        })
    }

    /// Select a candidate by name, matched ASCII case-insensitively.
    ///
    /// A matching candidate is returned even when it reports itself
    /// unsupported; this is a deliberate escape hatch for forcing a specific
    /// backend (e.g. under test) and is logged rather than rejected.
    pub fn select_by_name(&self, name: &str) -> Option<P::Driver> {
        for candidate in &self.providers {
            if candidate.name().eq_ignore_ascii_case(name) {
                if !candidate.is_supported() {
                    tracing::warn!(driver = candidate.name(), "selected driver is not supported");
                }
                return Some(candidate.driver_instance());
            }
        }

        tracing::warn!(name, "no driver found with requested name");
        None
    }

    /// Select the best-rated supported candidate whose tag set contains
    /// every requested tag.
    ///
    /// A candidate missing even one tag is excluded regardless of rating.
    pub fn select_by_tags(&self, tags: &[&str]) -> Option<P::Driver> {
        let mut best: Option<&P> = None;

        for candidate in self.supported() {
            let matches = tags
                .iter()
                .all(|tag| candidate.tags().iter().any(|have| have == tag));
            if !matches {
                continue;
            }
            if best.map_or(true, |current| {
                candidate.support_rating() > current.support_rating()
            }) {
                best = Some(candidate);
            }
        }

        best.map(|provider| {
            tracing::info!(driver = provider.name(), ?tags, "selected driver by tags");
            provider.driver_instance()
        })
    }
}

impl<P: DriverProvider> Default for DriverRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: DriverProvider> FromIterator<P> for DriverRegistry<P> {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            providers: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StubProvider {
        name: &'static str,
        tags: Vec<String>,
        supported: bool,
        rating: f64,
    }

    impl StubProvider {
        fn new(name: &'static str, supported: bool, rating: f64) -> Self {
            Self {
                name,
                tags: Vec::new(),
                supported,
                rating,
            }
        }

        fn with_tags(mut self, tags: &[&str]) -> Self {
            self.tags = tags.iter().map(|tag| tag.to_string()).collect();
            self
        }
    }

    impl DriverProvider for StubProvider {
        type Driver = &'static str;

        fn name(&self) -> &str {
            self.name
        }

        fn tags(&self) -> &[String] {
            &self.tags
        }

        fn is_supported(&self) -> bool {
            self.supported
        }

        fn support_rating(&self) -> f64 {
            self.rating
        }

        fn driver_instance(&self) -> Self::Driver {
            self.name
        }
    }

    #[test]
    fn select_best_picks_highest_rated_supported() {
        let registry: DriverRegistry<_> = [
            StubProvider::new("Legacy", true, 0.40),
            StubProvider::new("Modern", true, 0.85),
            StubProvider::new("Middle", true, 0.60),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.select_best(), Some("Modern"));
    }

    #[test]
    fn select_best_skips_unsupported_candidates() {
        let registry: DriverRegistry<_> = [
            StubProvider::new("Legacy", true, 0.40),
            StubProvider::new("Modern", false, 0.85),
            StubProvider::new("Middle", true, 0.60),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.select_best(), Some("Middle"));
    }

    #[test]
    fn select_best_is_empty_when_nothing_is_supported() {
        let registry: DriverRegistry<_> = [
            StubProvider::new("Legacy", false, 0.40),
            StubProvider::new("Modern", false, 0.85),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.select_best(), None);
    }

    #[test]
    fn select_best_breaks_ties_by_registration_order() {
        let registry: DriverRegistry<_> = [
            StubProvider::new("First", true, 0.5),
            StubProvider::new("Second", true, 0.5),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.select_best(), Some("First"));
    }

    #[test]
    fn select_by_name_is_case_insensitive() {
        let registry: DriverRegistry<_> =
            [StubProvider::new("FooDriver", true, 0.5)].into_iter().collect();

        assert_eq!(registry.select_by_name("foodriver"), Some("FooDriver"));
        assert_eq!(registry.select_by_name("FOODRIVER"), Some("FooDriver"));
        assert_eq!(registry.select_by_name("BarDriver"), None);
    }

    #[test]
    fn select_by_name_bypasses_the_support_gate() {
        // Forcing a named driver is a documented override: the candidate is
        // returned even though it reports itself unsupported.
        let registry: DriverRegistry<_> =
            [StubProvider::new("FooDriver", false, 0.0)].into_iter().collect();

        assert_eq!(registry.select_by_name("FooDriver"), Some("FooDriver"));
    }

    #[test]
    fn select_by_tags_requires_a_superset() {
        let registry: DriverRegistry<_> = [
            StubProvider::new("Partial", true, 0.9).with_tags(&["gl"]),
            StubProvider::new("Full", true, 0.4).with_tags(&["gl", "desktop"]),
        ]
        .into_iter()
        .collect();

        // The better-rated candidate is missing "desktop" and is excluded.
        assert_eq!(registry.select_by_tags(&["gl", "desktop"]), Some("Full"));
        assert_eq!(registry.select_by_tags(&["gl"]), Some("Partial"));
        assert_eq!(registry.select_by_tags(&["vk"]), None);
    }

    #[test]
    fn select_by_tags_requires_support() {
        let registry: DriverRegistry<_> = [
            StubProvider::new("Broken", false, 1.0).with_tags(&["gl"]),
        ]
        .into_iter()
        .collect();

        assert_eq!(registry.select_by_tags(&["gl"]), None);
    }

    #[test]
    fn supported_filters_the_candidate_list() {
        let registry: DriverRegistry<_> = [
            StubProvider::new("A", true, 0.1),
            StubProvider::new("B", false, 0.2),
            StubProvider::new("C", true, 0.3),
        ]
        .into_iter()
        .collect();

        let names: Vec<_> = registry.supported().map(|p| p.name().to_string()).collect();
        assert_eq!(names, ["A", "C"]);
        assert_eq!(registry.providers().len(), 3);
    }
}
