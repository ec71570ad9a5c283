//! Programmatic construction of [`Model`]s.
//!
//! The builder creates the structural entities OTM derives automatically
//! (object facets, list facets, role enumerations, the XSD built-in library)
//! so callers only declare what a modeler would write by hand.

use crate::entity::*;
use crate::library::{Library, LibraryKind, Version, XSD_NAMESPACE};
use crate::{EntityId, LibraryId, Model, ModelError, Result};
use std::collections::HashMap;

/// XSD built-in simple types available in every model.
pub const XSD_BUILTINS: &[&str] = &[
    "string",
    "normalizedString",
    "token",
    "boolean",
    "int",
    "integer",
    "long",
    "positiveInteger",
    "nonNegativeInteger",
    "decimal",
    "double",
    "float",
    "date",
    "dateTime",
    "time",
    "duration",
    "anyURI",
    "language",
    "NCName",
    "ID",
    "IDREF",
    "IDREFS",
];

/// Facets and derived entities created for a core object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CoreObjectIds {
    pub object: EntityId,
    pub simple: EntityId,
    pub summary: EntityId,
    pub detail: EntityId,
    pub simple_list: EntityId,
    pub summary_list: EntityId,
    pub detail_list: EntityId,
    pub roles: EntityId,
}

/// Facets created for a business object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusinessObjectIds {
    pub object: EntityId,
    pub id: EntityId,
    pub summary: EntityId,
    pub detail: EntityId,
}

/// Facets created for a choice object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChoiceObjectIds {
    pub object: EntityId,
    pub shared: EntityId,
}

#[derive(Debug)]
pub struct ModelBuilder {
    libraries: Vec<Library>,
    entities: Vec<Entity>,
    builtins: HashMap<String, EntityId>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        let mut builder = Self {
            libraries: Vec::new(),
            entities: Vec::new(),
            builtins: HashMap::new(),
        };

        let xsd = builder.legacy_library("XMLSchema", XSD_NAMESPACE, "xsd");
        for name in XSD_BUILTINS {
            let id = builder.push(
                xsd,
                name,
                EntityKind::LegacySimple(LegacySimpleType {
                    base: None,
                    examples: Vec::new(),
                }),
            );
            builder.builtins.insert(name.to_string(), id);
        }

        builder
    }

    pub fn build(self) -> Model {
        Model {
            libraries: self.libraries,
            entities: self.entities,
            builtins: self.builtins,
        }
    }

    fn push(&mut self, library: LibraryId, name: &str, kind: EntityKind) -> EntityId {
        let id = EntityId::new(self.entities.len());
        self.entities.push(Entity {
            name: name.to_string(),
            library,
            kind,
        });
        id
    }

    fn entity(&self, id: EntityId) -> Result<&Entity> {
        self.entities
            .get(id.index())
            .ok_or(ModelError::UnknownEntity(id))
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        self.entities
            .get_mut(id.index())
            .ok_or(ModelError::UnknownEntity(id))
    }

    fn check_library(&self, library: LibraryId) -> Result<()> {
        if library.index() < self.libraries.len() {
            Ok(())
        } else {
            Err(ModelError::UnknownLibrary(library))
        }
    }

    fn check_entity(&self, id: EntityId) -> Result<()> {
        self.entity(id).map(|_| ())
    }

    fn unexpected(&self, id: EntityId, expected: &'static str) -> ModelError {
        match self.entity(id) {
            Ok(entity) => ModelError::UnexpectedKind {
                name: entity.name.clone(),
                expected,
                actual: entity.kind.kind_name(),
            },
            Err(e) => e,
        }
    }

    fn library_of(&self, id: EntityId) -> Result<LibraryId> {
        self.entity(id).map(|entity| entity.library)
    }

    fn name_of(&self, id: EntityId) -> Result<String> {
        self.entity(id).map(|entity| entity.name.clone())
    }

    pub fn library(
        &mut self,
        name: &str,
        namespace: &str,
        prefix: &str,
        version: &str,
    ) -> Result<LibraryId> {
        let version: Version = version.parse()?;
        let id = LibraryId::new(self.libraries.len());
        self.libraries.push(Library {
            name: name.to_string(),
            namespace: namespace.to_string(),
            prefix: prefix.to_string(),
            version,
            kind: LibraryKind::Otm,
        });
        Ok(id)
    }

    pub fn legacy_library(&mut self, name: &str, namespace: &str, prefix: &str) -> LibraryId {
        let id = LibraryId::new(self.libraries.len());
        self.libraries.push(Library {
            name: name.to_string(),
            namespace: namespace.to_string(),
            prefix: prefix.to_string(),
            version: Version::default(),
            kind: LibraryKind::Legacy,
        });
        id
    }

    pub fn xsd_builtin(&self, local_name: &str) -> Result<EntityId> {
        self.builtins
            .get(local_name)
            .copied()
            .ok_or_else(|| ModelError::UnknownBuiltin(local_name.to_string()))
    }

    pub fn simple_type(
        &mut self,
        library: LibraryId,
        name: &str,
        parent: Option<EntityId>,
    ) -> Result<EntityId> {
        self.check_library(library)?;
        if let Some(parent) = parent {
            self.check_entity(parent)?;
        }
        Ok(self.push(
            library,
            name,
            EntityKind::Simple(SimpleType {
                parent,
                examples: Vec::new(),
            }),
        ))
    }

    pub fn legacy_simple_type(
        &mut self,
        library: LibraryId,
        name: &str,
        base: Option<EntityId>,
    ) -> Result<EntityId> {
        self.check_library(library)?;
        if let Some(base) = base {
            self.check_entity(base)?;
        }
        Ok(self.push(
            library,
            name,
            EntityKind::LegacySimple(LegacySimpleType {
                base,
                examples: Vec::new(),
            }),
        ))
    }

    pub fn enumeration(
        &mut self,
        library: LibraryId,
        name: &str,
        open: bool,
        values: &[&str],
    ) -> Result<EntityId> {
        self.check_library(library)?;
        Ok(self.push(
            library,
            name,
            EntityKind::Enumeration(Enumeration {
                open,
                values: values.iter().map(|v| v.to_string()).collect(),
                parent: None,
            }),
        ))
    }

    pub fn set_enumeration_parent(&mut self, enumeration: EntityId, parent: EntityId) -> Result<()> {
        self.check_entity(parent)?;
        let error = self.unexpected(enumeration, "enumeration");
        match &mut self.entity_mut(enumeration)?.kind {
            EntityKind::Enumeration(e) => {
                e.parent = Some(parent);
                Ok(())
            }
            _ => Err(error),
        }
    }

    pub fn value_with_attributes(
        &mut self,
        library: LibraryId,
        name: &str,
        parent: Option<EntityId>,
    ) -> Result<EntityId> {
        self.check_library(library)?;
        if let Some(parent) = parent {
            self.check_entity(parent)?;
        }
        Ok(self.push(
            library,
            name,
            EntityKind::ValueWithAttributes(ValueWithAttributes {
                parent,
                members: Members::default(),
                examples: Vec::new(),
            }),
        ))
    }

    fn facet(
        &mut self,
        library: LibraryId,
        owner: EntityId,
        facet_type: FacetType,
        label: Option<&str>,
        parent: Option<EntityId>,
    ) -> Result<EntityId> {
        let owner_name = self.name_of(owner)?;
        let name = format!(
            "{}_{}{}",
            owner_name,
            label.unwrap_or_default(),
            facet_type_name(facet_type)
        );
        Ok(self.push(
            library,
            &name,
            EntityKind::Facet(Facet {
                facet_type,
                owner,
                label: label.map(str::to_string),
                parent,
                simple_type: None,
                members: Members::default(),
            }),
        ))
    }

    fn list_facet(&mut self, library: LibraryId, owner: EntityId, item: EntityId) -> Result<EntityId> {
        let name = format!("{}_List", self.name_of(item)?);
        Ok(self.push(library, &name, EntityKind::ListFacet(ListFacet { owner, item })))
    }

    /// Declare a core object with its simple, summary and detail facets, the
    /// matching list facets and its role enumeration.
    pub fn core_object(&mut self, library: LibraryId, name: &str) -> Result<CoreObjectIds> {
        self.check_library(library)?;
        // Placeholder ids are patched once the facets exist.
        let object = self.push(
            library,
            name,
            EntityKind::CoreObject(CoreObject {
                simple_facet: EntityId::new(0),
                summary: EntityId::new(0),
                detail: EntityId::new(0),
                simple_list: EntityId::new(0),
                summary_list: EntityId::new(0),
                detail_list: EntityId::new(0),
                role_enumeration: EntityId::new(0),
                roles: Vec::new(),
                version_of: None,
            }),
        );

        let simple = self.facet(library, object, FacetType::Simple, None, None)?;
        let summary = self.facet(library, object, FacetType::Summary, None, None)?;
        let detail = self.facet(library, object, FacetType::Detail, None, Some(summary))?;
        let simple_list = self.list_facet(library, object, simple)?;
        let summary_list = self.list_facet(library, object, summary)?;
        let detail_list = self.list_facet(library, object, detail)?;
        let roles = self.push(
            library,
            &format!("{}_Role", name),
            EntityKind::RoleEnumeration(RoleEnumeration { owner: object }),
        );

        if let EntityKind::CoreObject(core) = &mut self.entity_mut(object)?.kind {
            core.simple_facet = simple;
            core.summary = summary;
            core.detail = detail;
            core.simple_list = simple_list;
            core.summary_list = summary_list;
            core.detail_list = detail_list;
            core.role_enumeration = roles;
        }

        Ok(CoreObjectIds {
            object,
            simple,
            summary,
            detail,
            simple_list,
            summary_list,
            detail_list,
            roles,
        })
    }

    /// Assign the value type of a core object's simple facet.
    pub fn set_core_simple_type(&mut self, core: EntityId, simple_type: EntityId) -> Result<()> {
        self.check_entity(simple_type)?;
        let error = self.unexpected(core, "core object");
        let simple_facet = match &self.entity(core)?.kind {
            EntityKind::CoreObject(core) => core.simple_facet,
            _ => return Err(error),
        };
        if let EntityKind::Facet(facet) = &mut self.entity_mut(simple_facet)?.kind {
            facet.simple_type = Some(simple_type);
        }
        Ok(())
    }

    pub fn add_role(&mut self, core: EntityId, role: &str) -> Result<()> {
        let error = self.unexpected(core, "core object");
        match &mut self.entity_mut(core)?.kind {
            EntityKind::CoreObject(core) => {
                core.roles.push(role.to_string());
                Ok(())
            }
            _ => Err(error),
        }
    }

    /// Declare a business object with its ID, summary and detail facets.
    pub fn business_object(&mut self, library: LibraryId, name: &str) -> Result<BusinessObjectIds> {
        self.check_library(library)?;
        let object = self.push(
            library,
            name,
            EntityKind::BusinessObject(BusinessObject {
                id_facet: EntityId::new(0),
                summary: EntityId::new(0),
                detail: EntityId::new(0),
                contextual: Vec::new(),
                version_of: None,
            }),
        );

        let id = self.facet(library, object, FacetType::Id, None, None)?;
        let summary = self.facet(library, object, FacetType::Summary, None, Some(id))?;
        let detail = self.facet(library, object, FacetType::Detail, None, Some(summary))?;

        if let EntityKind::BusinessObject(bo) = &mut self.entity_mut(object)?.kind {
            bo.id_facet = id;
            bo.summary = summary;
            bo.detail = detail;
        }

        Ok(BusinessObjectIds {
            object,
            id,
            summary,
            detail,
        })
    }

    /// Declare a choice object with its shared facet.
    pub fn choice_object(&mut self, library: LibraryId, name: &str) -> Result<ChoiceObjectIds> {
        self.check_library(library)?;
        let object = self.push(
            library,
            name,
            EntityKind::ChoiceObject(ChoiceObject {
                shared: EntityId::new(0),
                contextual: Vec::new(),
                version_of: None,
            }),
        );
        let shared = self.facet(library, object, FacetType::Shared, None, None)?;
        if let EntityKind::ChoiceObject(choice) = &mut self.entity_mut(object)?.kind {
            choice.shared = shared;
        }
        Ok(ChoiceObjectIds { object, shared })
    }

    /// Declare a custom, query, update or choice facet on an object.
    pub fn contextual_facet(
        &mut self,
        owner: EntityId,
        facet_type: FacetType,
        label: &str,
        parent: Option<EntityId>,
    ) -> Result<EntityId> {
        if !facet_type.is_contextual() {
            return Err(ModelError::NotContextual(facet_type));
        }
        if let Some(parent) = parent {
            self.check_entity(parent)?;
        }
        let library = self.library_of(owner)?;
        let error = self.unexpected(owner, "business or choice object");
        if !matches!(
            self.entity(owner)?.kind,
            EntityKind::BusinessObject(_) | EntityKind::ChoiceObject(_)
        ) {
            return Err(error);
        }

        // Choice facets inherit the shared facet unless told otherwise.
        let parent = match (&self.entity(owner)?.kind, parent) {
            (EntityKind::ChoiceObject(choice), None) => Some(choice.shared),
            (_, parent) => parent,
        };

        let facet = self.facet(library, owner, facet_type, Some(label), parent)?;
        match &mut self.entity_mut(owner)?.kind {
            EntityKind::BusinessObject(bo) => bo.contextual.push(facet),
            EntityKind::ChoiceObject(choice) => choice.contextual.push(facet),
            _ => {}
        }
        Ok(facet)
    }

    pub fn extension_point_facet(
        &mut self,
        library: LibraryId,
        name: &str,
        extends: EntityId,
    ) -> Result<EntityId> {
        self.check_library(library)?;
        if self.entity(extends)?.as_facet().is_none() {
            return Err(self.unexpected(extends, "facet"));
        }
        Ok(self.push(
            library,
            name,
            EntityKind::ExtensionPointFacet(ExtensionPointFacet {
                extends,
                members: Members::default(),
            }),
        ))
    }

    pub fn action_facet(
        &mut self,
        library: LibraryId,
        name: &str,
        owner: EntityId,
        reference_facet: Option<EntityId>,
        reference_repeat: i32,
    ) -> Result<EntityId> {
        self.check_library(library)?;
        self.check_entity(owner)?;
        if let Some(facet) = reference_facet {
            self.check_entity(facet)?;
        }
        Ok(self.push(
            library,
            name,
            EntityKind::ActionFacet(ActionFacet {
                owner,
                base_payload: None,
                reference_facet,
                reference_repeat,
            }),
        ))
    }

    pub fn set_action_base_payload(&mut self, action: EntityId, payload: EntityId) -> Result<()> {
        self.check_entity(payload)?;
        let error = self.unexpected(action, "action facet");
        match &mut self.entity_mut(action)?.kind {
            EntityKind::ActionFacet(action) => {
                action.base_payload = Some(payload);
                Ok(())
            }
            _ => Err(error),
        }
    }

    fn add_member(
        &mut self,
        owner: EntityId,
        name: &str,
        kind: EntityKind,
        select: fn(&mut Members) -> &mut Vec<EntityId>,
    ) -> Result<EntityId> {
        let library = self.library_of(owner)?;
        if self.entity(owner)?.kind.members().is_none() {
            return Err(self.unexpected(owner, "facet, value with attributes or complex type"));
        }
        let member = self.push(library, name, kind);
        if let Some(members) = self.entity_mut(owner)?.kind.members_mut() {
            select(members).push(member);
        }
        Ok(member)
    }

    pub fn attribute(&mut self, owner: EntityId, name: &str, type_ref: EntityId) -> Result<EntityId> {
        self.check_entity(type_ref)?;
        self.add_member(
            owner,
            name,
            EntityKind::Attribute(Attribute {
                owner,
                type_ref: Some(type_ref),
                reference: false,
                repeat: 0,
                examples: Vec::new(),
            }),
            |members| &mut members.attributes,
        )
    }

    /// Attribute holding references to instances of `target`.
    pub fn reference_attribute(
        &mut self,
        owner: EntityId,
        name: &str,
        target: EntityId,
        repeat: i32,
    ) -> Result<EntityId> {
        self.check_entity(target)?;
        self.add_member(
            owner,
            name,
            EntityKind::Attribute(Attribute {
                owner,
                type_ref: Some(target),
                reference: true,
                repeat,
                examples: Vec::new(),
            }),
            |members| &mut members.attributes,
        )
    }

    pub fn property(
        &mut self,
        owner: EntityId,
        name: &str,
        type_ref: EntityId,
        repeat: i32,
    ) -> Result<EntityId> {
        self.check_entity(type_ref)?;
        self.add_member(
            owner,
            name,
            EntityKind::Property(Property {
                owner,
                type_ref: Some(type_ref),
                reference: false,
                repeat,
                examples: Vec::new(),
            }),
            |members| &mut members.properties,
        )
    }

    /// Element holding references to instances of `target`.
    pub fn reference_property(
        &mut self,
        owner: EntityId,
        name: &str,
        target: EntityId,
        repeat: i32,
    ) -> Result<EntityId> {
        self.check_entity(target)?;
        self.add_member(
            owner,
            name,
            EntityKind::Property(Property {
                owner,
                type_ref: Some(target),
                reference: true,
                repeat,
                examples: Vec::new(),
            }),
            |members| &mut members.properties,
        )
    }

    pub fn indicator(
        &mut self,
        owner: EntityId,
        name: &str,
        published_as_element: bool,
    ) -> Result<EntityId> {
        self.add_member(
            owner,
            name,
            EntityKind::Indicator(Indicator {
                owner,
                published_as_element,
            }),
            |members| &mut members.indicators,
        )
    }

    pub fn alias(&mut self, owner: EntityId, name: &str) -> Result<EntityId> {
        let library = self.library_of(owner)?;
        Ok(self.push(library, name, EntityKind::Alias(Alias { owner })))
    }

    pub fn example(&mut self, entity: EntityId, context: &str, value: &str) -> Result<()> {
        let error = self.unexpected(entity, "simple type, value with attributes or member");
        match self.entity_mut(entity)?.kind.examples_mut() {
            Some(examples) => {
                examples.push(Example {
                    context: context.to_string(),
                    value: value.to_string(),
                });
                Ok(())
            }
            None => Err(error),
        }
    }

    /// Make `facet` inherit the members of `parent`.
    pub fn set_facet_parent(&mut self, facet: EntityId, parent: EntityId) -> Result<()> {
        self.check_entity(parent)?;
        let error = self.unexpected(facet, "facet");
        match &mut self.entity_mut(facet)?.kind {
            EntityKind::Facet(facet) => {
                facet.parent = Some(parent);
                Ok(())
            }
            _ => Err(error),
        }
    }

    /// Record that `object` is a later version of `earlier`.
    pub fn set_version_of(&mut self, object: EntityId, earlier: EntityId) -> Result<()> {
        self.check_entity(earlier)?;
        let error = self.unexpected(object, "object");
        match &mut self.entity_mut(object)?.kind {
            EntityKind::CoreObject(core) => core.version_of = Some(earlier),
            EntityKind::BusinessObject(bo) => bo.version_of = Some(earlier),
            EntityKind::ChoiceObject(choice) => choice.version_of = Some(earlier),
            _ => return Err(error),
        }
        Ok(())
    }

    pub fn legacy_complex_type(&mut self, library: LibraryId, name: &str) -> Result<EntityId> {
        self.check_library(library)?;
        Ok(self.push(
            library,
            name,
            EntityKind::LegacyComplexType(LegacyComplexType {
                simple_content: None,
                members: Members::default(),
            }),
        ))
    }

    pub fn set_simple_content(&mut self, complex: EntityId, simple_type: EntityId) -> Result<()> {
        self.check_entity(simple_type)?;
        let error = self.unexpected(complex, "legacy complex type");
        match &mut self.entity_mut(complex)?.kind {
            EntityKind::LegacyComplexType(complex) => {
                complex.simple_content = Some(simple_type);
                Ok(())
            }
            _ => Err(error),
        }
    }

    pub fn legacy_element(
        &mut self,
        library: LibraryId,
        name: &str,
        type_ref: EntityId,
    ) -> Result<EntityId> {
        self.check_library(library)?;
        self.check_entity(type_ref)?;
        Ok(self.push(
            library,
            name,
            EntityKind::LegacyElement(LegacyElement {
                type_ref: Some(type_ref),
            }),
        ))
    }
}

impl Default for ModelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn facet_type_name(facet_type: FacetType) -> &'static str {
    match facet_type {
        FacetType::Id => "ID",
        FacetType::Simple => "Simple",
        FacetType::Summary => "Summary",
        FacetType::Detail => "Detail",
        FacetType::Custom => "Custom",
        FacetType::Query => "Query",
        FacetType::Update => "Update",
        FacetType::Shared => "Shared",
        FacetType::Choice => "Choice",
    }
}
