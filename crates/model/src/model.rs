use crate::entity::*;
use crate::library::{Library, XSD_NAMESPACE};
use crate::{EntityId, LibraryId};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// Immutable, already-validated OTM model.
///
/// Entities live in an arena and reference each other through [`EntityId`]s,
/// so cyclic structures (facets extending themselves, objects referring back
/// to their own facets) need no special ownership handling. Every read
/// accessor that follows links is cycle safe.
#[derive(Clone, Debug)]
pub struct Model {
    pub(crate) libraries: Vec<Library>,
    pub(crate) entities: Vec<Entity>,
    pub(crate) builtins: HashMap<String, EntityId>,
}

impl Model {
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id.index())
    }

    /// Entity for an id handed out by this model's builder.
    pub fn entity(&self, id: EntityId) -> &Entity {
        &self.entities[id.index()]
    }

    pub fn kind(&self, id: EntityId) -> &EntityKind {
        &self.entity(id).kind
    }

    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Entity)> + '_ {
        self.entities
            .iter()
            .enumerate()
            .map(|(index, entity)| (EntityId::new(index), entity))
    }

    pub fn library(&self, id: LibraryId) -> &Library {
        &self.libraries[id.index()]
    }

    pub fn libraries(&self) -> &[Library] {
        &self.libraries
    }

    pub fn library_of(&self, id: EntityId) -> &Library {
        self.library(self.entity(id).library)
    }

    pub fn name(&self, id: EntityId) -> &str {
        &self.entity(id).name
    }

    pub fn namespace(&self, id: EntityId) -> &str {
        &self.library_of(id).namespace
    }

    /// Look up an entity by namespace and local name.
    pub fn find(&self, namespace: &str, name: &str) -> Option<EntityId> {
        self.entities()
            .find(|(id, entity)| entity.name == name && self.namespace(*id) == namespace)
            .map(|(id, _)| id)
    }

    /// XSD built-in simple type by local name (`string`, `ID`, `IDREFS`, ...).
    pub fn xsd_builtin(&self, local_name: &str) -> Option<EntityId> {
        self.builtins.get(local_name).copied()
    }

    /// True if `id` is the XSD built-in with the given local name.
    pub fn is_xsd_builtin(&self, id: EntityId, local_name: &str) -> bool {
        self.name(id) == local_name && self.namespace(id) == XSD_NAMESPACE
    }

    /// The entity that owns `id`, for facets, members, aliases and the like.
    pub fn owner(&self, id: EntityId) -> Option<EntityId> {
        match self.kind(id) {
            EntityKind::Facet(facet) => Some(facet.owner),
            EntityKind::ListFacet(list) => Some(list.owner),
            EntityKind::RoleEnumeration(roles) => Some(roles.owner),
            EntityKind::ActionFacet(action) => Some(action.owner),
            EntityKind::Attribute(attribute) => Some(attribute.owner),
            EntityKind::Property(property) => Some(property.owner),
            EntityKind::Indicator(indicator) => Some(indicator.owner),
            EntityKind::Alias(alias) => Some(alias.owner),
            _ => None,
        }
    }

    /// The owning object of a facet, or the entity itself for anything else.
    pub fn owning_object(&self, id: EntityId) -> EntityId {
        match self.kind(id) {
            EntityKind::Facet(facet) => facet.owner,
            EntityKind::ListFacet(list) => list.owner,
            _ => id,
        }
    }

    /// Example literals declared directly on an entity.
    pub fn examples(&self, id: EntityId) -> &[Example] {
        match self.kind(id) {
            EntityKind::Simple(simple) => &simple.examples,
            EntityKind::LegacySimple(simple) => &simple.examples,
            EntityKind::ValueWithAttributes(vwa) => &vwa.examples,
            EntityKind::Attribute(attribute) => &attribute.examples,
            EntityKind::Property(property) => &property.examples,
            _ => &[],
        }
    }

    /// Next type in the value chain of a scalar-like type.
    pub fn parent_type(&self, id: EntityId) -> Option<EntityId> {
        match self.kind(id) {
            EntityKind::Simple(simple) => simple.parent,
            EntityKind::LegacySimple(simple) => simple.base,
            EntityKind::ValueWithAttributes(vwa) => vwa.parent,
            EntityKind::Enumeration(enumeration) => enumeration.parent,
            EntityKind::Facet(facet) if facet.facet_type == FacetType::Simple => facet.simple_type,
            EntityKind::CoreObject(core) => Some(core.simple_facet),
            EntityKind::LegacyComplexType(complex) => complex.simple_content,
            _ => None,
        }
    }

    /// Declared type of an attribute, property or legacy element.
    pub fn member_type(&self, id: EntityId) -> Option<EntityId> {
        match self.kind(id) {
            EntityKind::Attribute(attribute) => attribute.type_ref,
            EntityKind::Property(property) => property.type_ref,
            EntityKind::LegacyElement(element) => element.type_ref,
            _ => None,
        }
    }

    /// Declared repeat count of a member; attributes default to a single value.
    pub fn member_repeat(&self, id: EntityId) -> i32 {
        match self.kind(id) {
            EntityKind::Attribute(attribute) => attribute.repeat,
            EntityKind::Property(property) => property.repeat,
            _ => 0,
        }
    }

    pub fn is_reference(&self, id: EntityId) -> bool {
        match self.kind(id) {
            EntityKind::Attribute(attribute) => attribute.reference,
            EntityKind::Property(property) => property.reference,
            _ => false,
        }
    }

    /// Inheritance chain of a facet, root first, ending with the facet itself.
    ///
    /// A facet that (transitively) extends itself yields each facet once.
    pub fn facet_chain(&self, facet: EntityId) -> Vec<EntityId> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(facet);

        while let Some(id) = current {
            if !seen.insert(id) {
                break;
            }
            chain.push(id);
            current = match self.kind(id) {
                EntityKind::Facet(facet) => facet.parent,
                _ => None,
            };
        }

        chain.reverse();
        chain
    }

    fn chain_members<F>(&self, facet: EntityId, select: F) -> Vec<EntityId>
    where
        F: Fn(&Members) -> &Vec<EntityId>,
    {
        self.facet_chain(facet)
            .into_iter()
            .filter_map(|id| self.kind(id).members())
            .flat_map(|members| select(members).iter().copied())
            .unique()
            .collect()
    }

    pub fn inherited_attributes(&self, facet: EntityId) -> Vec<EntityId> {
        self.chain_members(facet, |members| &members.attributes)
    }

    pub fn inherited_properties(&self, facet: EntityId) -> Vec<EntityId> {
        self.chain_members(facet, |members| &members.properties)
    }

    pub fn inherited_indicators(&self, facet: EntityId) -> Vec<EntityId> {
        self.chain_members(facet, |members| &members.indicators)
    }

    pub fn is_indicator_element(&self, indicator: EntityId) -> bool {
        matches!(
            self.kind(indicator),
            EntityKind::Indicator(Indicator {
                published_as_element: true,
                ..
            })
        )
    }

    /// True if the entity, or anything it inherits, produces non-empty output.
    pub fn declares_content(&self, id: EntityId) -> bool {
        let mut seen = HashSet::new();
        self.declares_content_guarded(id, &mut seen)
    }

    fn declares_content_guarded(&self, id: EntityId, seen: &mut HashSet<EntityId>) -> bool {
        if !seen.insert(id) {
            return false;
        }
        match self.kind(id) {
            EntityKind::Facet(facet) if facet.facet_type == FacetType::Simple => {
                facet.simple_type.is_some()
            }
            EntityKind::Facet(_) => self
                .facet_chain(id)
                .into_iter()
                .filter_map(|facet| self.kind(facet).members())
                .any(|members| !members.is_empty()),
            EntityKind::ListFacet(list) => self.declares_content_guarded(list.item, seen),
            EntityKind::ExtensionPointFacet(facet) => !facet.members.is_empty(),
            EntityKind::LegacyComplexType(complex) => {
                complex.simple_content.is_some() || !complex.members.is_empty()
            }
            EntityKind::LegacyElement(element) => element
                .type_ref
                .map(|type_ref| self.declares_content_guarded(type_ref, seen))
                .unwrap_or(false),
            EntityKind::Alias(alias) => self.declares_content_guarded(alias.owner, seen),
            EntityKind::CoreObject(_) | EntityKind::BusinessObject(_) | EntityKind::ChoiceObject(_) => self
                .detail_chain(id)
                .into_iter()
                .any(|facet| self.declares_content_guarded(facet, seen)),
            EntityKind::Simple(_)
            | EntityKind::LegacySimple(_)
            | EntityKind::Enumeration(_)
            | EntityKind::RoleEnumeration(_)
            | EntityKind::ValueWithAttributes(_)
            | EntityKind::ActionFacet(_)
            | EntityKind::Attribute(_)
            | EntityKind::Property(_)
            | EntityKind::Indicator(_) => true,
        }
    }

    /// Literal values of an enumeration, inherited values first.
    pub fn enumeration_values(&self, id: EntityId) -> Vec<String> {
        let mut lineage = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(id);

        while let Some(enumeration) = current {
            if !seen.insert(enumeration) {
                break;
            }
            current = match self.kind(enumeration) {
                EntityKind::Enumeration(e) => {
                    lineage.push(&e.values);
                    e.parent
                }
                EntityKind::RoleEnumeration(roles) => {
                    lineage.push(self.roles_of(roles.owner));
                    None
                }
                _ => None,
            };
        }

        lineage
            .into_iter()
            .rev()
            .flatten()
            .unique()
            .cloned()
            .collect()
    }

    pub fn is_open_enumeration(&self, id: EntityId) -> bool {
        matches!(self.kind(id), EntityKind::Enumeration(Enumeration { open: true, .. }))
    }

    fn roles_of(&self, core: EntityId) -> &Vec<String> {
        static NO_ROLES: Vec<String> = Vec::new();
        match self.kind(core) {
            EntityKind::CoreObject(core) => &core.roles,
            _ => &NO_ROLES,
        }
    }

    /// Roles declared by a core object; empty for anything else.
    pub fn roles(&self, core: EntityId) -> &[String] {
        self.roles_of(core)
    }

    /// The non-contextual facets of an object, most detailed first.
    ///
    /// Accepts either an object or one of its facets.
    pub fn detail_chain(&self, object_or_facet: EntityId) -> Vec<EntityId> {
        let object = self.owning_object(object_or_facet);
        match self.kind(object) {
            EntityKind::CoreObject(core) => vec![core.detail, core.summary, core.simple_facet],
            EntityKind::BusinessObject(bo) => vec![bo.detail, bo.summary, bo.id_facet],
            EntityKind::ChoiceObject(choice) => vec![choice.shared],
            _ => Vec::new(),
        }
    }

    /// Facet an object is represented by when it is used as a property type.
    pub fn natural_facet(&self, object: EntityId) -> Option<EntityId> {
        match self.kind(object) {
            EntityKind::CoreObject(core) => Some(core.summary),
            EntityKind::BusinessObject(bo) => Some(bo.summary),
            EntityKind::ChoiceObject(choice) => Some(choice.shared),
            _ => None,
        }
    }

    pub fn facet_type(&self, facet: EntityId) -> Option<FacetType> {
        self.entity(facet).as_facet().map(|facet| facet.facet_type)
    }

    pub fn extension_point_facets(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities()
            .filter(|(_, entity)| matches!(entity.kind, EntityKind::ExtensionPointFacet(_)))
            .map(|(id, _)| id)
    }

    /// Object an object's minor or patch version extends.
    pub fn version_of(&self, object: EntityId) -> Option<EntityId> {
        match self.kind(object) {
            EntityKind::CoreObject(core) => core.version_of,
            EntityKind::BusinessObject(bo) => bo.version_of,
            EntityKind::ChoiceObject(choice) => choice.version_of,
            _ => None,
        }
    }

    /// The facet matching `facet` (same type and label) on the previous
    /// version of its owning object.
    pub fn version_predecessor(&self, facet: EntityId) -> Option<EntityId> {
        let current = self.entity(facet).as_facet()?;
        let previous = self.version_of(current.owner)?;
        self.object_facets(previous).into_iter().find(|candidate| {
            self.entity(*candidate)
                .as_facet()
                .map(|f| f.facet_type == current.facet_type && f.label == current.label)
                .unwrap_or(false)
        })
    }

    /// Every facet an object owns, contextual ones included.
    pub fn object_facets(&self, object: EntityId) -> Vec<EntityId> {
        match self.kind(object) {
            EntityKind::CoreObject(core) => vec![core.simple_facet, core.summary, core.detail],
            EntityKind::BusinessObject(bo) => [bo.id_facet, bo.summary, bo.detail]
                .into_iter()
                .chain(bo.contextual.iter().copied())
                .collect(),
            EntityKind::ChoiceObject(choice) => std::iter::once(choice.shared)
                .chain(choice.contextual.iter().copied())
                .collect(),
            _ => Vec::new(),
        }
    }
}
