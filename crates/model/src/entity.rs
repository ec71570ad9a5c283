use crate::{EntityId, LibraryId};
use serde::{Deserialize, Serialize};

/// An example literal declared for a named context.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Example {
    pub context: String,
    pub value: String,
}

/// Attributes, properties and indicators declared directly by an entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Members {
    pub attributes: Vec<EntityId>,
    pub properties: Vec<EntityId>,
    pub indicators: Vec<EntityId>,
}

impl Members {
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.properties.is_empty() && self.indicators.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetType {
    Id,
    Simple,
    Summary,
    Detail,
    Custom,
    Query,
    Update,
    Shared,
    Choice,
}

impl FacetType {
    /// Contextual facets are chosen explicitly by the modeler and are never
    /// replaced by a more or less detailed facet during example generation.
    pub fn is_contextual(self) -> bool {
        matches!(
            self,
            FacetType::Custom | FacetType::Query | FacetType::Update | FacetType::Choice
        )
    }

    /// Suffix appended to the owner name to build the facet's element name.
    pub fn element_suffix(self) -> &'static str {
        match self {
            FacetType::Id => "ID",
            FacetType::Simple => "Simple",
            FacetType::Summary | FacetType::Shared => "",
            FacetType::Detail => "Detail",
            FacetType::Custom => "Custom",
            FacetType::Query => "Query",
            FacetType::Update => "Update",
            FacetType::Choice => "Choice",
        }
    }

    /// Name of the extension point element inserted after this facet's content.
    pub fn extension_point_element(self) -> &'static str {
        match self {
            FacetType::Id => "ExtensionPoint_ID",
            FacetType::Simple => "ExtensionPoint_Simple",
            FacetType::Summary => "ExtensionPoint",
            FacetType::Detail => "ExtensionPoint_Detail",
            FacetType::Custom => "ExtensionPoint_Custom",
            FacetType::Query => "ExtensionPoint_Query",
            FacetType::Update => "ExtensionPoint_Update",
            FacetType::Shared => "ExtensionPoint_Shared",
            FacetType::Choice => "ExtensionPoint_Choice",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleType {
    pub parent: Option<EntityId>,
    pub examples: Vec<Example>,
}

/// Simple type declared by a legacy (XML schema) library, including the XSD
/// built-ins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacySimpleType {
    pub base: Option<EntityId>,
    pub examples: Vec<Example>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    pub open: bool,
    pub values: Vec<String>,
    pub parent: Option<EntityId>,
}

/// Enumeration of the roles declared by a core object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleEnumeration {
    pub owner: EntityId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueWithAttributes {
    pub parent: Option<EntityId>,
    pub members: Members,
    pub examples: Vec<Example>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreObject {
    pub simple_facet: EntityId,
    pub summary: EntityId,
    pub detail: EntityId,
    pub simple_list: EntityId,
    pub summary_list: EntityId,
    pub detail_list: EntityId,
    pub role_enumeration: EntityId,
    pub roles: Vec<String>,
    pub version_of: Option<EntityId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessObject {
    pub id_facet: EntityId,
    pub summary: EntityId,
    pub detail: EntityId,
    pub contextual: Vec<EntityId>,
    pub version_of: Option<EntityId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceObject {
    pub shared: EntityId,
    pub contextual: Vec<EntityId>,
    pub version_of: Option<EntityId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facet {
    pub facet_type: FacetType,
    pub owner: EntityId,
    pub label: Option<String>,
    /// Facet whose members this facet inherits.
    pub parent: Option<EntityId>,
    /// Value type of a core object's simple facet.
    pub simple_type: Option<EntityId>,
    pub members: Members,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListFacet {
    pub owner: EntityId,
    pub item: EntityId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionPointFacet {
    /// The facet this extension point contributes content to.
    pub extends: EntityId,
    pub members: Members,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFacet {
    pub owner: EntityId,
    pub base_payload: Option<EntityId>,
    pub reference_facet: Option<EntityId>,
    pub reference_repeat: i32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub owner: EntityId,
    pub type_ref: Option<EntityId>,
    pub reference: bool,
    pub repeat: i32,
    pub examples: Vec<Example>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub owner: EntityId,
    pub type_ref: Option<EntityId>,
    pub reference: bool,
    /// Declared repeat count; negative means unbounded.
    pub repeat: i32,
    pub examples: Vec<Example>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    pub owner: EntityId,
    pub published_as_element: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    /// Object or facet the alias substitutes for.
    pub owner: EntityId,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyComplexType {
    pub simple_content: Option<EntityId>,
    pub members: Members,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyElement {
    pub type_ref: Option<EntityId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Simple(SimpleType),
    LegacySimple(LegacySimpleType),
    Enumeration(Enumeration),
    RoleEnumeration(RoleEnumeration),
    ValueWithAttributes(ValueWithAttributes),
    CoreObject(CoreObject),
    BusinessObject(BusinessObject),
    ChoiceObject(ChoiceObject),
    Facet(Facet),
    ListFacet(ListFacet),
    ExtensionPointFacet(ExtensionPointFacet),
    ActionFacet(ActionFacet),
    Attribute(Attribute),
    Property(Property),
    Indicator(Indicator),
    Alias(Alias),
    LegacyComplexType(LegacyComplexType),
    LegacyElement(LegacyElement),
}

impl EntityKind {
    pub fn kind_name(&self) -> &'static str {
        match self {
            EntityKind::Simple(_) => "simple type",
            EntityKind::LegacySimple(_) => "legacy simple type",
            EntityKind::Enumeration(_) => "enumeration",
            EntityKind::RoleEnumeration(_) => "role enumeration",
            EntityKind::ValueWithAttributes(_) => "value with attributes",
            EntityKind::CoreObject(_) => "core object",
            EntityKind::BusinessObject(_) => "business object",
            EntityKind::ChoiceObject(_) => "choice object",
            EntityKind::Facet(_) => "facet",
            EntityKind::ListFacet(_) => "list facet",
            EntityKind::ExtensionPointFacet(_) => "extension point facet",
            EntityKind::ActionFacet(_) => "action facet",
            EntityKind::Attribute(_) => "attribute",
            EntityKind::Property(_) => "property",
            EntityKind::Indicator(_) => "indicator",
            EntityKind::Alias(_) => "alias",
            EntityKind::LegacyComplexType(_) => "legacy complex type",
            EntityKind::LegacyElement(_) => "legacy element",
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(
            self,
            EntityKind::CoreObject(_) | EntityKind::BusinessObject(_) | EntityKind::ChoiceObject(_)
        )
    }

    /// Members declared directly by this entity, if it can own any.
    pub fn members(&self) -> Option<&Members> {
        match self {
            EntityKind::Facet(facet) => Some(&facet.members),
            EntityKind::ExtensionPointFacet(facet) => Some(&facet.members),
            EntityKind::ValueWithAttributes(vwa) => Some(&vwa.members),
            EntityKind::LegacyComplexType(complex) => Some(&complex.members),
            _ => None,
        }
    }

    pub(crate) fn members_mut(&mut self) -> Option<&mut Members> {
        match self {
            EntityKind::Facet(facet) => Some(&mut facet.members),
            EntityKind::ExtensionPointFacet(facet) => Some(&mut facet.members),
            EntityKind::ValueWithAttributes(vwa) => Some(&mut vwa.members),
            EntityKind::LegacyComplexType(complex) => Some(&mut complex.members),
            _ => None,
        }
    }

    pub(crate) fn examples_mut(&mut self) -> Option<&mut Vec<Example>> {
        match self {
            EntityKind::Simple(simple) => Some(&mut simple.examples),
            EntityKind::LegacySimple(simple) => Some(&mut simple.examples),
            EntityKind::ValueWithAttributes(vwa) => Some(&mut vwa.examples),
            EntityKind::Attribute(attribute) => Some(&mut attribute.examples),
            EntityKind::Property(property) => Some(&mut property.examples),
            _ => None,
        }
    }
}

/// A named, typed node of the model graph.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub library: LibraryId,
    pub kind: EntityKind,
}

impl Entity {
    pub fn as_facet(&self) -> Option<&Facet> {
        match &self.kind {
            EntityKind::Facet(facet) => Some(facet),
            _ => None,
        }
    }

    pub fn as_property(&self) -> Option<&Property> {
        match &self.kind {
            EntityKind::Property(property) => Some(property),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match &self.kind {
            EntityKind::Attribute(attribute) => Some(attribute),
            _ => None,
        }
    }

    pub fn as_core_object(&self) -> Option<&CoreObject> {
        match &self.kind {
            EntityKind::CoreObject(core) => Some(core),
            _ => None,
        }
    }
}
