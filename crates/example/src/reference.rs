//! Identifier registration and deferred IDREF resolution.
//!
//! An IDREF can be written before the identifier it points at exists, so
//! assemblers queue a [`DeferredReferenceJob`] holding the output location
//! and fill it in once the whole tree has been built.

use otm_model::{EntityId, Model};
use tracing::debug;

/// Identifiers generated during one run, in registration order.
#[derive(Clone, Debug, Default)]
pub struct IdRegistry {
    entries: Vec<IdEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct IdEntry {
    owner: EntityId,
    facet: Option<EntityId>,
    identifier: String,
}

impl IdRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an identifier generated for an instance of `owner`, rendered
    /// through `facet`.
    pub fn register(&mut self, owner: EntityId, facet: Option<EntityId>, identifier: impl Into<String>) {
        self.entries.push(IdEntry {
            owner,
            facet,
            identifier: identifier.into(),
        });
    }

    /// Identifiers usable for a reference to `target`; every identifier when
    /// the reference is untyped.
    pub fn identifiers_for(&self, target: Option<EntityId>) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(move |entry| target.map(|owner| entry.owner == owner).unwrap_or(true))
            .map(|entry| entry.identifier.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// A reference value to be written once all identifiers are known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeferredReferenceJob<L> {
    /// Entity the reference points at; `None` accepts any identifier.
    pub referenced: Option<EntityId>,
    /// Number of identifier tokens wanted.
    pub required: usize,
    pub location: L,
}

/// Registry plus the queue of pending reference writes for one document.
#[derive(Clone, Debug)]
pub struct ReferenceResolver<L> {
    registry: IdRegistry,
    jobs: Vec<DeferredReferenceJob<L>>,
}

impl<L> Default for ReferenceResolver<L> {
    fn default() -> Self {
        Self {
            registry: IdRegistry::new(),
            jobs: Vec::new(),
        }
    }
}

impl<L> ReferenceResolver<L> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, owner: EntityId, facet: Option<EntityId>, identifier: impl Into<String>) {
        self.registry.register(owner, facet, identifier);
    }

    pub fn defer(&mut self, referenced: Option<EntityId>, required: usize, location: L) {
        self.jobs.push(DeferredReferenceJob {
            referenced,
            required,
            location,
        });
    }

    pub fn registry(&self) -> &IdRegistry {
        &self.registry
    }

    pub fn pending(&self) -> usize {
        self.jobs.len()
    }

    /// Run every queued job in order, handing each location and its
    /// space-separated identifiers to `write`. Facet targets are matched by
    /// their owning object. Jobs short of identifiers get whatever exists.
    ///
    /// Queue and registry are empty afterwards, so a second call is a no-op.
    /// Returns the number of jobs run.
    pub fn resolve<F>(&mut self, model: &Model, mut write: F) -> usize
    where
        F: FnMut(&L, &str),
    {
        let jobs = std::mem::take(&mut self.jobs);
        let count = jobs.len();

        for job in &jobs {
            let target = job.referenced.map(|referenced| model.owning_object(referenced));
            let tokens: Vec<&str> = self
                .registry
                .identifiers_for(target)
                .take(job.required)
                .collect();
            if tokens.len() < job.required {
                debug!(
                    "reference to {} wants {} identifiers, {} available",
                    target
                        .map(|owner| model.name(owner).to_string())
                        .unwrap_or_else(|| "any entity".to_string()),
                    job.required,
                    tokens.len()
                );
            }
            write(&job.location, &tokens.join(" "));
        }

        self.registry.clear();
        count
    }

    pub fn clear(&mut self) {
        self.registry.clear();
        self.jobs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otm_model::ModelBuilder;
    use pretty_assertions::assert_eq;

    fn trip_model() -> (Model, otm_model::BusinessObjectIds, otm_model::BusinessObjectIds) {
        let mut builder = ModelBuilder::new();
        let lib = builder
            .library("Travel", "http://example.com/travel", "t", "1.0.0")
            .unwrap();
        let trip = builder.business_object(lib, "Trip").unwrap();
        let person = builder.business_object(lib, "Person").unwrap();
        (builder.build(), trip, person)
    }

    #[test]
    fn test_resolves_in_queue_order() {
        let (model, trip, person) = trip_model();
        let mut resolver = ReferenceResolver::new();
        resolver.defer(Some(trip.object), 1, "first");
        resolver.defer(Some(person.detail), 2, "second");
        resolver.register(trip.object, Some(trip.detail), "trip_1");
        resolver.register(person.object, Some(person.summary), "person_1");
        resolver.register(person.object, Some(person.detail), "person_2");

        let mut written = Vec::new();
        let count = resolver.resolve(&model, |location, value| {
            written.push((*location, value.to_string()))
        });

        assert_eq!(count, 2);
        assert_eq!(
            written,
            vec![
                ("first", "trip_1".to_string()),
                ("second", "person_1 person_2".to_string()),
            ]
        );
    }

    #[test]
    fn test_short_supply_writes_what_exists() {
        let (model, trip, person) = trip_model();
        let mut resolver = ReferenceResolver::new();
        resolver.defer(Some(trip.object), 3, 0usize);
        resolver.defer(Some(person.object), 1, 1usize);
        resolver.register(trip.object, None, "trip_1");

        let mut written = Vec::new();
        resolver.resolve(&model, |location, value| written.push((*location, value.to_string())));
        assert_eq!(written, vec![(0, "trip_1".to_string()), (1, String::new())]);
    }

    #[test]
    fn test_untyped_reference_takes_any_identifier() {
        let (model, trip, person) = trip_model();
        let mut resolver = ReferenceResolver::new();
        resolver.register(person.object, None, "person_1");
        resolver.register(trip.object, None, "trip_1");
        resolver.defer(None, 1, ());

        let mut written = Vec::new();
        resolver.resolve(&model, |_, value| written.push(value.to_string()));
        assert_eq!(written, vec!["person_1"]);
    }

    #[test]
    fn test_resolution_drains_once() {
        let (model, trip, _) = trip_model();
        let mut resolver = ReferenceResolver::new();
        resolver.register(trip.object, None, "trip_1");
        resolver.defer(Some(trip.object), 1, ());

        assert_eq!(resolver.resolve(&model, |_, _| {}), 1);
        assert!(resolver.registry().is_empty());
        assert_eq!(resolver.pending(), 0);
        assert_eq!(resolver.resolve(&model, |_, _| panic!("resolved twice")), 0);
    }

    #[test]
    fn test_registry_keeps_facet_pairs() {
        let (_, trip, _) = trip_model();
        let mut registry = IdRegistry::new();
        registry.register(trip.object, Some(trip.summary), "trip_1");
        registry.register(trip.object, Some(trip.detail), "trip_2");

        assert_eq!(
            registry.entries[1],
            IdEntry {
                owner: trip.object,
                facet: Some(trip.detail),
                identifier: "trip_2".to_string(),
            }
        );
        assert_eq!(registry.identifiers_for(Some(trip.object)).count(), 2);
        assert_eq!(registry.len(), 2);
    }
}
