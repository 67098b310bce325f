use crate::registry::registry::ReferenceRegistry;
use crate::shared::embedding::Embedding;

/// Label assigned to a classified probe.
#[derive(Clone, Debug, PartialEq)]
pub enum MatchLabel {
    Known(String),
    Unknown,
}

/// Result of classifying one probe: the winning label plus the best distance
/// observed (infinity when the registry is empty). The distance is reported
/// even for unknowns, for diagnostics.
#[derive(Clone, Debug)]
pub struct MatchDecision {
    pub label: MatchLabel,
    pub distance: f32,
}

/// Nearest-neighbor classifier over the reference registry.
#[derive(Clone, Copy, Debug)]
pub struct NearestNeighborClassifier {
    threshold: f32,
}

impl NearestNeighborClassifier {
    pub fn new(threshold: f32) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Classify a probe embedding against the registry.
    ///
    /// Each person's score is the minimum distance between the probe and
    /// that person's reference embeddings; the global winner is accepted
    /// only when strictly closer than the threshold (a probe at exactly the
    /// threshold is unknown).
    ///
    /// Registry iteration is lexicographic and the current best is only
    /// displaced by a strictly smaller distance, so ties go to the person
    /// whose name sorts first. Pure and deterministic; no I/O.
    pub fn classify(&self, registry: &ReferenceRegistry, probe: &Embedding) -> MatchDecision {
        let mut best_name: Option<&str> = None;
        let mut best_distance = f32::INFINITY;

        for person in registry.persons() {
            let distance = person.min_distance(probe);
            if distance < best_distance {
                best_distance = distance;
                best_name = Some(person.name());
            }
        }

        match best_name {
            Some(name) if best_distance < self.threshold => MatchDecision {
                label: MatchLabel::Known(name.to_string()),
                distance: best_distance,
            },
            _ => MatchDecision {
                label: MatchLabel::Unknown,
                distance: best_distance,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::registry::ReferencePerson;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn registry(persons: Vec<(&str, Vec<Vec<f32>>)>) -> ReferenceRegistry {
        ReferenceRegistry::from_persons(
            persons
                .into_iter()
                .map(|(name, embs)| {
                    ReferencePerson::new(name, embs.into_iter().map(Embedding::new).collect())
                })
                .collect(),
        )
    }

    #[test]
    fn test_nearest_person_wins() {
        // alice at distance 0.30, bob at 0.60, threshold 0.5
        let registry = registry(vec![
            ("alice", vec![vec![0.30]]),
            ("bob", vec![vec![0.60]]),
        ]);
        let probe = Embedding::new(vec![0.0]);

        let decision = NearestNeighborClassifier::new(0.5).classify(&registry, &probe);
        assert_eq!(decision.label, MatchLabel::Known("alice".into()));
        assert_relative_eq!(decision.distance, 0.30);
    }

    #[test]
    fn test_beyond_threshold_is_unknown_with_distance() {
        let registry = registry(vec![("alice", vec![vec![0.55]])]);
        let probe = Embedding::new(vec![0.0]);

        let decision = NearestNeighborClassifier::new(0.5).classify(&registry, &probe);
        assert_eq!(decision.label, MatchLabel::Unknown);
        assert_relative_eq!(decision.distance, 0.55);
    }

    #[rstest]
    #[case(0.499, MatchLabel::Known("alice".into()))]
    #[case(0.5, MatchLabel::Unknown)] // strict <, not <=
    #[case(0.501, MatchLabel::Unknown)]
    fn test_threshold_boundary_is_strict(#[case] distance: f32, #[case] expected: MatchLabel) {
        let registry = registry(vec![("alice", vec![vec![distance]])]);
        let probe = Embedding::new(vec![0.0]);

        let decision = NearestNeighborClassifier::new(0.5).classify(&registry, &probe);
        assert_eq!(decision.label, expected);
    }

    #[test]
    fn test_tie_goes_to_lexicographically_first_name() {
        let registry = registry(vec![
            ("zoe", vec![vec![0.3]]),
            ("amy", vec![vec![0.3]]),
            ("mia", vec![vec![0.3]]),
        ]);
        let probe = Embedding::new(vec![0.0]);

        let decision = NearestNeighborClassifier::new(0.5).classify(&registry, &probe);
        assert_eq!(decision.label, MatchLabel::Known("amy".into()));
    }

    #[test]
    fn test_per_person_minimum_is_used() {
        // bob's closest embedding beats alice's only embedding
        let registry = registry(vec![
            ("alice", vec![vec![0.4]]),
            ("bob", vec![vec![0.9], vec![0.1]]),
        ]);
        let probe = Embedding::new(vec![0.0]);

        let decision = NearestNeighborClassifier::new(0.5).classify(&registry, &probe);
        assert_eq!(decision.label, MatchLabel::Known("bob".into()));
        assert_relative_eq!(decision.distance, 0.1);
    }

    #[test]
    fn test_empty_registry_is_unknown_infinite() {
        let registry = ReferenceRegistry::default();
        let probe = Embedding::new(vec![0.0]);

        let decision = NearestNeighborClassifier::new(0.5).classify(&registry, &probe);
        assert_eq!(decision.label, MatchLabel::Unknown);
        assert!(decision.distance.is_infinite());
    }

    #[test]
    fn test_repeated_calls_are_deterministic() {
        let registry = registry(vec![
            ("alice", vec![vec![0.2, 0.1]]),
            ("bob", vec![vec![0.3, 0.4]]),
        ]);
        let probe = Embedding::new(vec![0.0, 0.0]);
        let classifier = NearestNeighborClassifier::new(0.5);

        let first = classifier.classify(&registry, &probe);
        for _ in 0..10 {
            let again = classifier.classify(&registry, &probe);
            assert_eq!(again.label, first.label);
            assert_eq!(again.distance, first.distance);
        }
    }
}
