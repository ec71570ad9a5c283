//! Example value synthesis for leaf (simple) types.
//!
//! Values are searched for in a fixed order, stopping at the first hit:
//!
//! 1. an example declared on the referencing member for the preferred context
//! 2. an example declared on the member for any context
//! 3. the same two lookups on each type of the leaf's value chain (simple type
//!    parents, value-with-attributes parents, simple facets), where
//!    enumerations and role enumerations answer with their next rotated value
//! 4. the legacy provider registered for a legacy type's namespace
//! 5. [`UNKNOWN_VALUE`]

pub mod identity;
pub mod legacy;
pub mod rotation;

use otm_model::{EntityId, EntityKind, Example, Model};
use std::collections::HashSet;
use tracing::{trace, warn};

pub use identity::IdentifierFactory;
pub use legacy::{ConfiguredExampleProvider, LegacyExampleProvider, LegacyProviders, ProviderConfig};
pub use rotation::RotationTable;

/// Value used when no example can be found for a type.
pub const UNKNOWN_VALUE: &str = "???";

/// Value written next to an open enumeration's literal.
pub const EXTENSION_VALUE: &str = "Other_Value";

/// How a leaf type takes part in identifier references.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdentityKind {
    Id,
    IdRef,
    IdRefs,
}

impl IdentityKind {
    /// Identity role of `leaf`, following its value chain to the XSD built-ins.
    pub fn of(model: &Model, leaf: EntityId) -> Option<Self> {
        value_chain(model, leaf).into_iter().find_map(|ty| {
            if model.is_xsd_builtin(ty, "ID") {
                Some(IdentityKind::Id)
            } else if model.is_xsd_builtin(ty, "IDREF") {
                Some(IdentityKind::IdRef)
            } else if model.is_xsd_builtin(ty, "IDREFS") {
                Some(IdentityKind::IdRefs)
            } else {
                None
            }
        })
    }
}

/// The leaf and every type it derives its value from, nearest first.
pub fn value_chain(model: &Model, leaf: EntityId) -> Vec<EntityId> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(leaf);
    while let Some(ty) = current {
        if !seen.insert(ty) {
            break;
        }
        chain.push(ty);
        current = model.parent_type(ty);
    }
    chain
}

fn declared_example<'m>(examples: &'m [Example], preferred: Option<&str>) -> Option<&'m str> {
    preferred
        .and_then(|context| examples.iter().find(|example| example.context == context))
        .or_else(|| examples.first())
        .map(|example| example.value.as_str())
}

/// Synthesizes example values.
///
/// Enumeration and role rotation state lives here and deliberately persists
/// across generation runs, so a generator shared by several runs keeps
/// cycling through literals. All mutable state is behind mutexes; the
/// generator can be shared between threads.
#[derive(Debug)]
pub struct ExampleValueGenerator {
    rotation: RotationTable,
    providers: LegacyProviders,
}

impl ExampleValueGenerator {
    pub fn new(providers: LegacyProviders) -> Self {
        Self {
            rotation: RotationTable::new(),
            providers,
        }
    }

    /// Generator with no legacy providers at all.
    pub fn without_providers() -> Self {
        Self::new(LegacyProviders::new())
    }

    pub fn register_provider(&mut self, provider: impl LegacyExampleProvider + 'static) {
        self.providers.register(provider);
    }

    /// Example value for a leaf type, optionally as used by `member`.
    pub fn example_value(
        &self,
        model: &Model,
        preferred_context: Option<&str>,
        member: Option<EntityId>,
        leaf: EntityId,
    ) -> String {
        if let Some(value) =
            member.and_then(|member| declared_example(model.examples(member), preferred_context))
        {
            return value.to_string();
        }

        let chain = value_chain(model, leaf);
        for &ty in &chain {
            if let Some(value) = declared_example(model.examples(ty), preferred_context) {
                return value.to_string();
            }
            let rotated = match model.kind(ty) {
                EntityKind::Enumeration(_) => self.enumeration_value(model, ty),
                EntityKind::RoleEnumeration(roles) => self.role_value(model, roles.owner),
                _ => None,
            };
            if let Some(value) = rotated {
                return value;
            }
        }

        for &ty in &chain {
            if let EntityKind::LegacySimple(_) = model.kind(ty) {
                if let Some(value) = self.providers.next_value(model.namespace(ty), model.name(ty)) {
                    return value;
                }
            }
        }

        trace!(
            "no example value for {} ({})",
            model.name(leaf),
            model.namespace(leaf)
        );
        UNKNOWN_VALUE.to_string()
    }

    /// Next literal of an enumeration (inherited literals included).
    pub fn enumeration_value(&self, model: &Model, enumeration: EntityId) -> Option<String> {
        self.rotation.next(
            model.namespace(enumeration),
            model.name(enumeration),
            || model.enumeration_values(enumeration),
        )
    }

    /// Next role of a core object, or [`UNKNOWN_VALUE`] if it declares none.
    pub fn example_role_value(&self, model: &Model, core: EntityId) -> String {
        self.role_value(model, core)
            .unwrap_or_else(|| UNKNOWN_VALUE.to_string())
    }

    fn role_value(&self, model: &Model, core: EntityId) -> Option<String> {
        let roles = model.entity(core).as_core_object()?.role_enumeration;
        self.rotation
            .next(model.namespace(roles), model.name(roles), || {
                model.roles(core).to_vec()
            })
    }
}

impl Default for ExampleValueGenerator {
    /// Generator with the bundled XSD built-in provider installed.
    fn default() -> Self {
        let mut generator = Self::without_providers();
        match ConfiguredExampleProvider::xsd_builtins() {
            Ok(provider) => generator.register_provider(provider),
            Err(e) => warn!("bundled XSD example provider failed to load: {}", e),
        }
        generator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otm_model::ModelBuilder;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_member_example_beats_type_example() {
        let mut builder = ModelBuilder::new();
        let lib = builder
            .library("Common", "http://example.com/common", "c", "1.0.0")
            .unwrap();
        let string = builder.xsd_builtin("string").unwrap();
        let code = builder.simple_type(lib, "Code", Some(string)).unwrap();
        builder.example(code, "default", "TYPE").unwrap();
        let core = builder.core_object(lib, "Vehicle").unwrap();
        let prop = builder.property(core.summary, "Code", code, 1).unwrap();
        builder.example(prop, "default", "MEMBER").unwrap();
        let model = builder.build();

        let generator = ExampleValueGenerator::without_providers();
        assert_eq!(generator.example_value(&model, None, Some(prop), code), "MEMBER");
        assert_eq!(generator.example_value(&model, None, None, code), "TYPE");
    }

    #[test]
    fn test_preferred_context_wins() {
        let mut builder = ModelBuilder::new();
        let lib = builder
            .library("Common", "http://example.com/common", "c", "1.0.0")
            .unwrap();
        let code = builder.simple_type(lib, "Code", None).unwrap();
        builder.example(code, "air", "A320").unwrap();
        builder.example(code, "rail", "ICE").unwrap();
        let model = builder.build();

        let generator = ExampleValueGenerator::without_providers();
        assert_eq!(generator.example_value(&model, Some("rail"), None, code), "ICE");
        assert_eq!(generator.example_value(&model, Some("sea"), None, code), "A320");
        assert_eq!(generator.example_value(&model, None, None, code), "A320");
    }

    #[test]
    fn test_legacy_provider_after_examples() {
        let mut builder = ModelBuilder::new();
        let lib = builder
            .library("Common", "http://example.com/common", "c", "1.0.0")
            .unwrap();
        let string = builder.xsd_builtin("string").unwrap();
        let name = builder.simple_type(lib, "Name", Some(string)).unwrap();
        let model = builder.build();

        let generator = ExampleValueGenerator::default();
        let value = generator.example_value(&model, None, None, name);
        assert_ne!(value, UNKNOWN_VALUE);

        let bare = ExampleValueGenerator::without_providers();
        assert_eq!(bare.example_value(&model, None, None, name), UNKNOWN_VALUE);
    }

    #[test]
    fn test_identity_kind_follows_chain() {
        let mut builder = ModelBuilder::new();
        let lib = builder
            .library("Common", "http://example.com/common", "c", "1.0.0")
            .unwrap();
        let id = builder.xsd_builtin("ID").unwrap();
        let idrefs = builder.xsd_builtin("IDREFS").unwrap();
        let local_id = builder.simple_type(lib, "LocalID", Some(id)).unwrap();
        let string = builder.xsd_builtin("string").unwrap();
        let model = builder.build();

        assert_eq!(IdentityKind::of(&model, local_id), Some(IdentityKind::Id));
        assert_eq!(IdentityKind::of(&model, idrefs), Some(IdentityKind::IdRefs));
        assert_eq!(IdentityKind::of(&model, string), None);
    }
}
