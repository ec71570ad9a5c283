use otm_model::{EntityId, EntityKind, Model};
use std::collections::{HashMap, HashSet};

/// Extension point facets of a model, indexed by the facet they extend.
#[derive(Debug, Default)]
pub struct ExtensionPointRegistry {
    by_facet: HashMap<EntityId, Vec<EntityId>>,
}

impl ExtensionPointRegistry {
    pub fn new(model: &Model) -> Self {
        let mut by_facet: HashMap<EntityId, Vec<EntityId>> = HashMap::new();
        for facet in model.extension_point_facets() {
            if let EntityKind::ExtensionPointFacet(extension) = model.kind(facet) {
                by_facet.entry(extension.extends).or_default().push(facet);
            }
        }
        Self { by_facet }
    }

    /// Extension points contributing to `facet`.
    ///
    /// Follows the facet back through earlier versions of its owning object
    /// while they stay on the same `major.minor` line. A new minor version
    /// rolls up the patches of the previous one, so older extension points are
    /// assumed to be part of the facet already.
    pub fn extension_points(&self, model: &Model, facet: EntityId) -> Vec<EntityId> {
        let mut found = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(facet);

        while let Some(id) = current {
            if !seen.insert(id) {
                break;
            }
            if let Some(extensions) = self.by_facet.get(&id) {
                found.extend(extensions.iter().copied());
            }
            current = model.version_predecessor(id).filter(|previous| {
                model
                    .library_of(id)
                    .version
                    .same_minor(&model.library_of(*previous).version)
            });
        }

        found
    }
}
