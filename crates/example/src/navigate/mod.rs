//! Depth-first traversal of a model, reported as [`ExampleVisitor`] events.
//!
//! The navigator decides *what* an example contains: which facet represents
//! an object, how often a property repeats, where extension points go and
//! when a cycle has been followed far enough. Assemblers decide how the
//! events become output.

mod extension;
mod facet_select;

pub use extension::ExtensionPointRegistry;
pub use facet_select::select_example_facet;

use crate::options::GenerationOptions;
use crate::value::value_chain;
use crate::visitor::ExampleVisitor;
use crate::{ExampleError, Result};
use itertools::Itertools;
use otm_model::{EntityId, EntityKind, FacetType, Members, Model};
use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, trace, warn};

/// Walk the model from `root`, reporting every event to `visitor`.
pub fn navigate<V>(
    model: &Model,
    root: Option<EntityId>,
    visitor: &mut V,
    options: &GenerationOptions,
) -> Result<()>
where
    V: ExampleVisitor + ?Sized,
{
    let root = root.ok_or(ExampleError::MissingRoot)?;
    if model.get(root).is_none() {
        return Err(ExampleError::UnknownEntity(root));
    }

    debug!("navigating example for {}", model.name(root));
    ExampleNavigator::new(model, visitor, options).navigate(root)
}

type TraversalStack = Rc<RefCell<Vec<EntityId>>>;

/// Keeps an entity on the traversal stack for as long as it is alive.
struct RecursionGuard {
    stack: TraversalStack,
    entity: EntityId,
}

impl Drop for RecursionGuard {
    fn drop(&mut self) {
        let mut stack = self.stack.borrow_mut();
        if stack.last() == Some(&self.entity) {
            stack.pop();
            return;
        }

        // Never panic here: an error may already be unwinding the walk.
        warn!("traversal stack out of order leaving {}", self.entity);
        if let Some(position) = stack.iter().rposition(|id| *id == self.entity) {
            stack.remove(position);
        }
    }
}

pub struct ExampleNavigator<'a, V: ExampleVisitor + ?Sized> {
    model: &'a Model,
    visitor: &'a mut V,
    options: &'a GenerationOptions,
    extensions: ExtensionPointRegistry,
    stack: TraversalStack,
}

impl<'a, V: ExampleVisitor + ?Sized> ExampleNavigator<'a, V> {
    pub fn new(model: &'a Model, visitor: &'a mut V, options: &'a GenerationOptions) -> Self {
        Self {
            model,
            visitor,
            options,
            extensions: ExtensionPointRegistry::new(model),
            stack: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Push `entity` on the traversal stack, or return `None` if it already
    /// appears there as often as the recursion limit allows.
    fn enter(&self, entity: EntityId) -> Option<RecursionGuard> {
        let count = {
            let mut stack = self.stack.borrow_mut();
            stack.push(entity);
            stack.iter().filter(|id| **id == entity).count()
        };
        let guard = RecursionGuard {
            stack: Rc::clone(&self.stack),
            entity,
        };

        if count > self.options.recursion_limit() {
            trace!(
                "recursion limit reached for {} ({} levels)",
                self.model.name(entity),
                count
            );
            return None;
        }
        Some(guard)
    }

    pub fn navigate(&mut self, entity: EntityId) -> Result<()> {
        let model = self.model;
        match model.kind(entity) {
            EntityKind::Simple(_)
            | EntityKind::LegacySimple(_)
            | EntityKind::Enumeration(_)
            | EntityKind::RoleEnumeration(_) => self.navigate_scalar(entity),
            EntityKind::ValueWithAttributes(_) => self.navigate_value_with_attributes(entity),
            EntityKind::CoreObject(_) | EntityKind::BusinessObject(_) | EntityKind::ChoiceObject(_) => {
                self.navigate_object(entity)
            }
            EntityKind::Facet(_) => self.navigate_facet(entity),
            EntityKind::ListFacet(_) => self.navigate_list_facet(entity),
            EntityKind::ExtensionPointFacet(_) => self.navigate_extension_point_facet(entity),
            EntityKind::ActionFacet(_) => self.navigate_action_facet(entity),
            EntityKind::Attribute(_) => self.navigate_attribute(entity),
            EntityKind::Property(_) => self.navigate_property(entity),
            EntityKind::Indicator(_) => self.navigate_indicator(entity),
            EntityKind::Alias(_) => self.navigate_alias(entity),
            EntityKind::LegacyComplexType(_) => self.navigate_legacy_complex_type(entity),
            EntityKind::LegacyElement(_) => self.navigate_legacy_element(entity),
        }
    }

    fn navigate_scalar(&mut self, scalar: EntityId) -> Result<()> {
        let Some(_guard) = self.enter(scalar) else {
            return Ok(());
        };
        let model = self.model;

        match model.kind(scalar) {
            EntityKind::Simple(_) => {
                self.visitor.start_simple_type(scalar)?;
                self.visitor.end_simple_type(scalar)
            }
            EntityKind::LegacySimple(_) => {
                self.visitor.start_legacy_simple_type(scalar)?;
                self.visitor.end_legacy_simple_type(scalar)
            }
            EntityKind::Enumeration(_) => {
                self.visitor.start_enumeration(scalar)?;
                self.visitor.end_enumeration(scalar)
            }
            _ => {
                self.visitor.start_role_enumeration(scalar)?;
                self.visitor.end_role_enumeration(scalar)
            }
        }
    }

    fn navigate_value_with_attributes(&mut self, vwa: EntityId) -> Result<()> {
        let Some(_guard) = self.enter(vwa) else {
            return Ok(());
        };
        let model = self.model;

        // Attributes are inherited along the chain of VWA parents.
        let mut lineage = Vec::new();
        let mut seen = HashSet::new();
        let mut current = Some(vwa);
        while let Some(id) = current {
            match model.kind(id) {
                EntityKind::ValueWithAttributes(value) if seen.insert(id) => {
                    lineage.push(&value.members);
                    current = value.parent;
                }
                _ => break,
            }
        }
        lineage.reverse();

        self.visitor.start_value_with_attributes(vwa)?;
        for attribute in lineage
            .iter()
            .flat_map(|members| members.attributes.iter())
            .unique()
        {
            self.navigate_attribute(*attribute)?;
        }
        for indicator in lineage
            .iter()
            .flat_map(|members| members.indicators.iter())
            .unique()
        {
            self.visitor.visit_indicator_attribute(*indicator)?;
        }
        self.visitor.end_value_with_attributes(vwa)
    }

    fn navigate_object(&mut self, object: EntityId) -> Result<()> {
        let Some(_guard) = self.enter(object) else {
            return Ok(());
        };
        let model = self.model;

        match model.kind(object) {
            EntityKind::CoreObject(_) => self.visitor.start_core_object(object)?,
            EntityKind::BusinessObject(_) => self.visitor.start_business_object(object)?,
            _ => self.visitor.start_choice_object(object)?,
        }

        if let Some(natural) = model.natural_facet(object) {
            let facet = select_example_facet(model, self.options, natural);
            self.navigate(facet)?;
        }

        match model.kind(object) {
            EntityKind::CoreObject(_) => self.visitor.end_core_object(object),
            EntityKind::BusinessObject(_) => self.visitor.end_business_object(object),
            _ => self.visitor.end_choice_object(object),
        }
    }

    fn navigate_facet(&mut self, facet: EntityId) -> Result<()> {
        let Some(_guard) = self.enter(facet) else {
            return Ok(());
        };
        let model = self.model;
        let Some(details) = model.entity(facet).as_facet() else {
            return Ok(());
        };

        self.visitor.start_facet(facet)?;
        if details.facet_type == FacetType::Simple {
            if let Some(simple_type) = details.simple_type {
                self.navigate(simple_type)?;
            }
        } else {
            self.navigate_facet_members(facet)?;
        }
        self.visitor.end_facet(facet)
    }

    /// Content of a facet, inherited members included, in schema order.
    fn navigate_facet_members(&mut self, facet: EntityId) -> Result<()> {
        let model = self.model;

        for attribute in model.inherited_attributes(facet) {
            self.navigate_attribute(attribute)?;
        }
        let indicators = model.inherited_indicators(facet);
        for indicator in &indicators {
            if !model.is_indicator_element(*indicator) {
                self.visitor.visit_indicator_attribute(*indicator)?;
            }
        }

        let mut covered = HashSet::new();
        let mut declaring = None;
        for property in model.inherited_properties(facet) {
            let owner = model.owner(property);
            if owner != declaring {
                if let Some(previous) = declaring {
                    self.navigate_extension_point(previous)?;
                    covered.insert(previous);
                }
                declaring = owner;
            }
            self.navigate_property(property)?;
        }

        for indicator in &indicators {
            if model.is_indicator_element(*indicator) {
                self.visitor.visit_indicator_element(*indicator)?;
            }
        }

        for chain_facet in model.facet_chain(facet) {
            if !covered.contains(&chain_facet) {
                self.navigate_extension_point(chain_facet)?;
            }
        }
        Ok(())
    }

    fn navigate_extension_point(&mut self, facet: EntityId) -> Result<()> {
        let points = self.extensions.extension_points(self.model, facet);
        if points.is_empty() {
            return Ok(());
        }

        self.visitor.start_extension_point(facet)?;
        for point in points {
            self.navigate(point)?;
        }
        self.visitor.end_extension_point(facet)
    }

    fn navigate_extension_point_facet(&mut self, facet: EntityId) -> Result<()> {
        let Some(_guard) = self.enter(facet) else {
            return Ok(());
        };
        let model = self.model;

        self.visitor.start_extension_point_facet(facet)?;
        if let Some(members) = model.kind(facet).members() {
            self.navigate_declared_members(members)?;
        }
        self.visitor.end_extension_point_facet(facet)
    }

    /// Members declared directly by an entity that has no inheritance chain.
    fn navigate_declared_members(&mut self, members: &Members) -> Result<()> {
        let model = self.model;
        for attribute in &members.attributes {
            self.navigate_attribute(*attribute)?;
        }
        for indicator in &members.indicators {
            if !model.is_indicator_element(*indicator) {
                self.visitor.visit_indicator_attribute(*indicator)?;
            }
        }
        for property in &members.properties {
            self.navigate_property(*property)?;
        }
        for indicator in &members.indicators {
            if model.is_indicator_element(*indicator) {
                self.visitor.visit_indicator_element(*indicator)?;
            }
        }
        Ok(())
    }

    fn navigate_list_facet(&mut self, list: EntityId) -> Result<()> {
        let Some(_guard) = self.enter(list) else {
            return Ok(());
        };
        let model = self.model;
        let EntityKind::ListFacet(details) = model.kind(list) else {
            return Ok(());
        };

        let roles = model.roles(details.owner);
        let entries: Vec<Option<&str>> =
            if model.facet_type(details.item) == Some(FacetType::Simple) || roles.is_empty() {
                vec![None]
            } else {
                roles.iter().map(|role| Some(role.as_str())).collect()
            };

        trace!("{} expands to {} entries", model.name(list), entries.len());
        for role in entries {
            self.visitor.start_list_facet(list, role)?;
            self.navigate(details.item)?;
            self.visitor.end_list_facet(list, role)?;
        }
        Ok(())
    }

    fn navigate_alias(&mut self, alias: EntityId) -> Result<()> {
        let Some(_guard) = self.enter(alias) else {
            return Ok(());
        };
        let model = self.model;
        let EntityKind::Alias(details) = model.kind(alias) else {
            return Ok(());
        };

        self.visitor.start_alias(alias)?;
        let target = self.resolve_type(details.owner);
        self.navigate(target)?;
        self.visitor.end_alias(alias)
    }

    fn navigate_action_facet(&mut self, action: EntityId) -> Result<()> {
        let Some(_guard) = self.enter(action) else {
            return Ok(());
        };
        let model = self.model;
        let EntityKind::ActionFacet(details) = model.kind(action) else {
            return Ok(());
        };

        self.visitor.start_action_facet(action)?;

        if let Some(payload) = details.base_payload {
            let facet = self.resolve_type(payload);
            if model.entity(facet).as_facet().is_some() {
                if let Some(_payload_guard) = self.enter(facet) {
                    self.navigate_facet_members(facet)?;
                }
            }
        }

        if let Some(reference) = details.reference_facet {
            let target = self.resolve_type(reference);
            for _ in 0..self.options.repeat_count(details.reference_repeat) {
                self.visitor.start_action_payload(action)?;
                self.navigate(target)?;
                self.visitor.end_action_payload(action)?;
            }
        }

        self.visitor.end_action_facet(action)
    }

    fn navigate_legacy_complex_type(&mut self, complex: EntityId) -> Result<()> {
        let Some(_guard) = self.enter(complex) else {
            return Ok(());
        };
        let model = self.model;
        let EntityKind::LegacyComplexType(details) = model.kind(complex) else {
            return Ok(());
        };

        self.visitor.start_legacy_complex_type(complex)?;
        if let Some(simple_content) = details.simple_content {
            self.navigate(simple_content)?;
        }
        self.navigate_declared_members(&details.members)?;
        self.visitor.end_legacy_complex_type(complex)
    }

    fn navigate_legacy_element(&mut self, element: EntityId) -> Result<()> {
        let Some(_guard) = self.enter(element) else {
            return Ok(());
        };

        self.visitor.start_legacy_element(element)?;
        if let Some(type_ref) = self.model.member_type(element) {
            self.navigate(type_ref)?;
        }
        self.visitor.end_legacy_element(element)
    }

    fn navigate_attribute(&mut self, attribute: EntityId) -> Result<()> {
        let model = self.model;
        let Some(type_ref) = model.member_type(attribute) else {
            return Ok(());
        };
        let leaf = if model.is_reference(attribute) {
            match self.reference_leaf(model.member_repeat(attribute)) {
                Some(leaf) => leaf,
                None => return Ok(()),
            }
        } else {
            self.scalar_leaf(type_ref)
        };

        self.visitor.start_attribute(attribute)?;
        self.navigate(leaf)?;
        self.visitor.end_attribute(attribute)
    }

    fn navigate_property(&mut self, property: EntityId) -> Result<()> {
        let model = self.model;
        let Some(type_ref) = model.member_type(property) else {
            return Ok(());
        };
        let repeat = model.member_repeat(property);

        if model.is_reference(property) {
            let Some(leaf) = self.reference_leaf(repeat) else {
                return Ok(());
            };
            self.visitor.start_element(property)?;
            self.navigate(leaf)?;
            return self.visitor.end_element(property);
        }

        let target = self.resolve_type(type_ref);
        for _ in 0..self.options.repeat_count(repeat) {
            self.visitor.start_element(property)?;
            self.navigate(target)?;
            self.visitor.end_element(property)?;
        }
        Ok(())
    }

    fn navigate_indicator(&mut self, indicator: EntityId) -> Result<()> {
        if self.model.is_indicator_element(indicator) {
            self.visitor.visit_indicator_element(indicator)
        } else {
            self.visitor.visit_indicator_attribute(indicator)
        }
    }

    /// Objects are represented by their selected example facet.
    fn resolve_type(&self, type_ref: EntityId) -> EntityId {
        if !self.model.kind(type_ref).is_object() {
            return type_ref;
        }
        self.model
            .natural_facet(type_ref)
            .map(|natural| select_example_facet(self.model, self.options, natural))
            .unwrap_or(type_ref)
    }

    /// XSD reference type for a reference member with the given repeat count.
    fn reference_leaf(&self, repeat: i32) -> Option<EntityId> {
        let name = if repeat > 1 || repeat < 0 { "IDREFS" } else { "IDREF" };
        let leaf = self.model.xsd_builtin(name);
        if leaf.is_none() {
            warn!("model has no xsd:{} type, skipping reference", name);
        }
        leaf
    }

    /// First scalar type in the value chain of an attribute's type.
    fn scalar_leaf(&self, type_ref: EntityId) -> EntityId {
        value_chain(self.model, type_ref)
            .into_iter()
            .find(|ty| {
                matches!(
                    self.model.kind(*ty),
                    EntityKind::Simple(_)
                        | EntityKind::LegacySimple(_)
                        | EntityKind::Enumeration(_)
                        | EntityKind::RoleEnumeration(_)
                )
            })
            .unwrap_or(type_ref)
    }
}
