//! Event interface between the navigator and output assemblers.

use crate::Result;
use otm_model::EntityId;

/// Receives the start/end events of a depth-first walk over a model.
///
/// Every callback defaults to a no-op so implementations only handle the
/// events they care about. Returning an error aborts the walk.
///
/// Events always nest: each `start_*` is followed by the matching `end_*`
/// for the same entity before the enclosing `end_*` arrives. Attributes
/// and elements bracket the type events of their declared (or resolved)
/// type; the type events are what create output nodes.
#[allow(unused_variables)]
pub trait ExampleVisitor {
    fn start_simple_type(&mut self, simple: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_simple_type(&mut self, simple: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_legacy_simple_type(&mut self, simple: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_legacy_simple_type(&mut self, simple: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_enumeration(&mut self, enumeration: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_enumeration(&mut self, enumeration: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_role_enumeration(&mut self, roles: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_role_enumeration(&mut self, roles: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_value_with_attributes(&mut self, vwa: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_value_with_attributes(&mut self, vwa: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_core_object(&mut self, core: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_core_object(&mut self, core: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_business_object(&mut self, business: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_business_object(&mut self, business: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_choice_object(&mut self, choice: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_choice_object(&mut self, choice: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_facet(&mut self, facet: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_facet(&mut self, facet: EntityId) -> Result<()> {
        Ok(())
    }

    /// One list entry. `role` is `None` for lists of simple facets.
    fn start_list_facet(&mut self, list: EntityId, role: Option<&str>) -> Result<()> {
        Ok(())
    }

    fn end_list_facet(&mut self, list: EntityId, role: Option<&str>) -> Result<()> {
        Ok(())
    }

    fn start_alias(&mut self, alias: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_alias(&mut self, alias: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_attribute(&mut self, attribute: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_attribute(&mut self, attribute: EntityId) -> Result<()> {
        Ok(())
    }

    /// An element for a property; called once per repetition.
    fn start_element(&mut self, property: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_element(&mut self, property: EntityId) -> Result<()> {
        Ok(())
    }

    fn visit_indicator_attribute(&mut self, indicator: EntityId) -> Result<()> {
        Ok(())
    }

    fn visit_indicator_element(&mut self, indicator: EntityId) -> Result<()> {
        Ok(())
    }

    /// Extension point bracket placed after the content declared by `facet`.
    fn start_extension_point(&mut self, facet: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_extension_point(&mut self, facet: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_extension_point_facet(&mut self, facet: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_extension_point_facet(&mut self, facet: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_action_facet(&mut self, action: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_action_facet(&mut self, action: EntityId) -> Result<()> {
        Ok(())
    }

    /// One repetition of an action facet's reference payload.
    fn start_action_payload(&mut self, action: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_action_payload(&mut self, action: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_legacy_complex_type(&mut self, complex: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_legacy_complex_type(&mut self, complex: EntityId) -> Result<()> {
        Ok(())
    }

    fn start_legacy_element(&mut self, element: EntityId) -> Result<()> {
        Ok(())
    }

    fn end_legacy_element(&mut self, element: EntityId) -> Result<()> {
        Ok(())
    }
}
