//! Output names for model entities.

use otm_model::{EntityId, EntityKind, Library, Model};
use std::fmt;

/// Namespace-qualified element name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QName {
    pub namespace: String,
    pub prefix: String,
    pub local: String,
}

impl QName {
    pub fn new(library: &Library, local: impl Into<String>) -> Self {
        Self {
            namespace: library.namespace.clone(),
            prefix: library.prefix.clone(),
            local: local.into(),
        }
    }

    /// `prefix:local`, or just the local name without a prefix.
    pub fn qualified(&self) -> String {
        if self.prefix.is_empty() {
            self.local.clone()
        } else {
            format!("{}:{}", self.prefix, self.local)
        }
    }

    /// Name with the same namespace and a different local part.
    pub fn sibling(&self, local: impl Into<String>) -> Self {
        Self {
            namespace: self.namespace.clone(),
            prefix: self.prefix.clone(),
            local: local.into(),
        }
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified())
    }
}

/// Element name of a facet: owner name, facet label, facet type suffix.
pub fn facet_element_name(model: &Model, facet: EntityId) -> String {
    match model.entity(facet).as_facet() {
        Some(details) => format!(
            "{}{}{}",
            model.name(details.owner),
            details.label.as_deref().unwrap_or_default(),
            details.facet_type.element_suffix()
        ),
        None => model.name(facet).to_string(),
    }
}

/// Element name of a list facet: its item's element name plus `List`.
pub fn list_element_name(model: &Model, list: EntityId) -> String {
    match model.kind(list) {
        EntityKind::ListFacet(details) => format!("{}List", facet_element_name(model, details.item)),
        _ => model.name(list).to_string(),
    }
}

/// Element name of `facet` when it is reached through `alias`.
///
/// Aliases of objects carry over the facet's label and suffix; aliases of a
/// single facet are used verbatim.
pub fn alias_element_name(model: &Model, alias: EntityId, facet: EntityId) -> String {
    let alias_owner = model.owner(alias);
    let owner_is_facet = alias_owner
        .map(|owner| matches!(model.kind(owner), EntityKind::Facet(_)))
        .unwrap_or(false);

    match model.entity(facet).as_facet() {
        Some(details) if !owner_is_facet => format!(
            "{}{}{}",
            model.name(alias),
            details.label.as_deref().unwrap_or_default(),
            details.facet_type.element_suffix()
        ),
        _ => model.name(alias).to_string(),
    }
}

/// Name an entity is rendered with when nothing else determines it.
pub fn default_element_name(model: &Model, entity: EntityId) -> String {
    match model.kind(entity) {
        EntityKind::Facet(_) => facet_element_name(model, entity),
        EntityKind::ListFacet(_) => list_element_name(model, entity),
        _ => model.name(entity).to_string(),
    }
}
