use std::collections::BTreeMap;

use crate::shared::embedding::Embedding;

/// A known person: a name plus at least one reference embedding.
///
/// The builder never registers a person without embeddings; a person whose
/// reference images all fail extraction is excluded from the registry
/// entirely.
#[derive(Clone, Debug)]
pub struct ReferencePerson {
    name: String,
    embeddings: Vec<Embedding>,
}

impl ReferencePerson {
    pub fn new(name: impl Into<String>, embeddings: Vec<Embedding>) -> Self {
        debug_assert!(!embeddings.is_empty(), "a person needs at least one embedding");
        Self {
            name: name.into(),
            embeddings,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn embeddings(&self) -> &[Embedding] {
        &self.embeddings
    }

    /// Smallest Euclidean distance between `probe` and any of this person's
    /// reference embeddings.
    pub fn min_distance(&self, probe: &Embedding) -> f32 {
        self.embeddings
            .iter()
            .map(|e| e.euclidean_distance(probe))
            .fold(f32::INFINITY, f32::min)
    }
}

/// Immutable name → person mapping, built once per run before any probe is
/// classified.
///
/// Backed by a `BTreeMap` so iteration is lexicographic by name, which makes
/// the classifier's tie-break deterministic.
#[derive(Clone, Debug, Default)]
pub struct ReferenceRegistry {
    persons: BTreeMap<String, ReferencePerson>,
}

impl ReferenceRegistry {
    pub fn from_persons(persons: Vec<ReferencePerson>) -> Self {
        Self {
            persons: persons
                .into_iter()
                .map(|p| (p.name.clone(), p))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.persons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.persons.len()
    }

    pub fn get(&self, name: &str) -> Option<&ReferencePerson> {
        self.persons.get(name)
    }

    /// Iterate persons in lexicographic name order.
    pub fn persons(&self) -> impl Iterator<Item = &ReferencePerson> {
        self.persons.values()
    }
}
