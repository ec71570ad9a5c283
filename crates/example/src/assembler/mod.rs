//! Output assembly from navigation events.
//!
//! [`TreeAssembler`] turns the event stream into an output tree. Which tree
//! is built depends on the [`ExampleTree`] backend: [`dom::XmlDocument`] for
//! XML or [`json::JsonTree`] for JSON. Both share the same context handling,
//! naming, value synthesis and reference resolution.

pub mod dom;
pub mod json;
pub mod naming;

use crate::options::GenerationOptions;
use crate::reference::ReferenceResolver;
use crate::value::{value_chain, ExampleValueGenerator, IdentifierFactory, IdentityKind, EXTENSION_VALUE};
use crate::visitor::ExampleVisitor;
use crate::{ExampleError, Result};
use naming::{alias_element_name, default_element_name, facet_element_name, QName};
use otm_model::{EntityId, EntityKind, Library, Model};
use std::sync::Arc;
use tracing::debug;

/// Handle of a node in an output tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

/// Place a value is written to: an element's text or one of its attributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeLocation {
    pub node: NodeId,
    pub attribute: Option<String>,
}

/// Mutable output tree an assembler builds into.
///
/// Node handles stay valid until [`ExampleTree::clear`]; deferred reference
/// writes rely on that.
pub trait ExampleTree: Default {
    /// Append a new element under `parent`, or make it the root.
    fn add_element(&mut self, parent: Option<NodeId>, name: QName) -> NodeId;

    fn set_text(&mut self, node: NodeId, text: &str);

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str);

    fn parent(&self, node: NodeId) -> Option<NodeId>;

    fn element_name(&self, node: NodeId) -> Option<&QName>;

    fn root(&self) -> Option<NodeId>;

    fn clear(&mut self);

    fn write(&mut self, location: &NodeLocation, value: &str) {
        match &location.attribute {
            Some(attribute) => self.set_attribute(location.node, attribute, value),
            None => self.set_text(location.node, value),
        }
    }
}

/// Assembly state for one element-level step of the walk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExampleContext {
    /// Output node, created by the first type event in this context.
    pub node: Option<NodeId>,
    pub model_element: Option<EntityId>,
    pub model_attribute: Option<EntityId>,
    pub model_alias: Option<EntityId>,
    pub action_facet: Option<EntityId>,
    /// Role of the list entry this context renders.
    pub role: Option<String>,
}

/// Stack of [`ExampleContext`]s above a permanent document-level context.
#[derive(Debug, Default)]
pub struct ContextStack {
    document: ExampleContext,
    frames: Vec<ExampleContext>,
}

impl ContextStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, context: ExampleContext) {
        self.frames.push(context);
    }

    pub fn pop(&mut self) -> Result<ExampleContext> {
        self.frames
            .pop()
            .ok_or_else(|| ExampleError::illegal_state("end event without a matching start"))
    }

    pub fn top(&self) -> &ExampleContext {
        self.frames.last().unwrap_or(&self.document)
    }

    pub fn top_mut(&mut self) -> &mut ExampleContext {
        match self.frames.last_mut() {
            Some(frame) => frame,
            None => &mut self.document,
        }
    }

    /// Closest output node at or below the top of the stack.
    pub fn nearest_node(&self) -> Option<NodeId> {
        self.frames
            .iter()
            .rev()
            .chain(std::iter::once(&self.document))
            .find_map(|context| context.node)
    }

    /// Number of contexts pushed above the document context.
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn clear(&mut self) {
        self.document = ExampleContext::default();
        self.frames.clear();
    }
}

/// Builds an [`ExampleTree`] from navigation events.
///
/// One assembler renders one document at a time; call
/// [`TreeAssembler::reset`] before reusing it for another root.
#[derive(Debug)]
pub struct TreeAssembler<'m, T: ExampleTree> {
    model: &'m Model,
    options: GenerationOptions,
    values: Arc<ExampleValueGenerator>,
    tree: T,
    contexts: ContextStack,
    /// Facets currently being rendered, innermost last.
    facets: Vec<EntityId>,
    alias_bindings: Vec<Option<EntityId>>,
    ids: IdentifierFactory,
    references: ReferenceResolver<NodeLocation>,
}

impl<'m, T: ExampleTree> TreeAssembler<'m, T> {
    pub fn new(model: &'m Model, options: GenerationOptions) -> Self {
        Self::with_value_generator(model, options, Arc::new(ExampleValueGenerator::default()))
    }

    pub fn with_value_generator(
        model: &'m Model,
        options: GenerationOptions,
        values: Arc<ExampleValueGenerator>,
    ) -> Self {
        Self {
            model,
            options,
            values,
            tree: T::default(),
            contexts: ContextStack::new(),
            facets: Vec::new(),
            alias_bindings: Vec::new(),
            ids: IdentifierFactory::new(),
            references: ReferenceResolver::new(),
        }
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// The tree as built so far, with references still unresolved.
    pub fn tree(&self) -> &T {
        &self.tree
    }

    /// The finished tree. Pending references are resolved on the first call.
    pub fn document(&mut self) -> &T {
        self.resolve_references();
        &self.tree
    }

    pub fn into_document(mut self) -> T {
        self.resolve_references();
        self.tree
    }

    pub fn pending_references(&self) -> usize {
        self.references.pending()
    }

    /// Discard the current document and all per-document state.
    pub fn reset(&mut self) {
        self.tree.clear();
        self.contexts.clear();
        self.facets.clear();
        self.alias_bindings.clear();
        self.ids.reset();
        self.references.clear();
    }

    fn resolve_references(&mut self) {
        let tree = &mut self.tree;
        let resolved = self
            .references
            .resolve(self.model, |location, value| tree.write(location, value));
        if resolved > 0 {
            debug!("resolved {} deferred references", resolved);
        }
    }

    /// Append a node under the nearest open node, or as the document root.
    fn attach(&mut self, name: QName) -> Result<NodeId> {
        let parent = self.contexts.nearest_node();
        if parent.is_none() && self.tree.root().is_some() {
            return Err(ExampleError::illegal_state(format!(
                "'{}' would be a second document root",
                name
            )));
        }
        Ok(self.tree.add_element(parent, name))
    }

    fn push_child(&mut self, name: QName) -> Result<()> {
        let node = self.attach(name)?;
        self.contexts.push(ExampleContext {
            node: Some(node),
            ..ExampleContext::default()
        });
        Ok(())
    }

    /// Node of the current context, created on first use.
    fn open_node(&mut self, entity: EntityId) -> Result<NodeId> {
        if let Some(node) = self.contexts.top().node {
            return Ok(node);
        }

        let name = self.node_name(entity);
        let node = self.attach(name)?;
        let context = self.contexts.top_mut();
        context.node = Some(node);
        if let Some(role) = &context.role {
            self.tree.set_attribute(node, "role", role);
        }
        Ok(node)
    }

    fn node_name(&self, entity: EntityId) -> QName {
        let model = self.model;
        let context = self.contexts.top();

        match model.kind(entity) {
            EntityKind::Facet(_) => match context.model_alias {
                Some(alias) => QName::new(
                    model.library_of(alias),
                    alias_element_name(model, alias, entity),
                ),
                None => QName::new(model.library_of(entity), facet_element_name(model, entity)),
            },
            EntityKind::ListFacet(_)
            | EntityKind::ExtensionPointFacet(_)
            | EntityKind::ActionFacet(_)
            | EntityKind::LegacyElement(_) => {
                QName::new(model.library_of(entity), default_element_name(model, entity))
            }
            _ => {
                let local = match context.model_element.or(context.model_alias) {
                    Some(named) => model.name(named).to_string(),
                    None => default_element_name(model, entity),
                };
                QName::new(self.local_library(entity), local)
            }
        }
    }

    /// Namespace of a locally declared element: the library of the facet
    /// that declared the property. Without a property in scope the facet
    /// stack decides; when its top is the node's own type the declaring
    /// facet is the one below it.
    fn local_library(&self, entity: EntityId) -> &'m Library {
        let model = self.model;
        if let Some(owner) = self
            .contexts
            .top()
            .model_element
            .and_then(|property| model.owner(property))
        {
            return model.library_of(owner);
        }

        let declaring = match self.facets.as_slice() {
            [.., outer, top] if *top == entity => Some(*outer),
            [.., top] if *top != entity => Some(*top),
            _ => None,
        };
        model.library_of(declaring.unwrap_or(entity))
    }

    fn is_open_enumeration(&self, leaf: EntityId) -> bool {
        value_chain(self.model, leaf)
            .into_iter()
            .any(|ty| self.model.is_open_enumeration(ty))
    }

    /// Value of a scalar-like type in the current context.
    fn scalar(&mut self, leaf: EntityId) -> Result<()> {
        let model = self.model;
        let context = self.contexts.top().clone();

        if let Some(attribute) = context.model_attribute {
            let node = context.node.ok_or_else(|| {
                ExampleError::illegal_state(format!(
                    "attribute '{}' outside of an element",
                    model.name(attribute)
                ))
            })?;
            let name = model.name(attribute);
            let location = NodeLocation {
                node,
                attribute: Some(name.to_string()),
            };
            let plain = self.write_value(Some(attribute), leaf, location);
            if plain && self.is_open_enumeration(leaf) {
                self.tree
                    .set_attribute(node, &format!("{}Extension", name), EXTENSION_VALUE);
            }
            return Ok(());
        }

        let node = self.open_node(leaf)?;
        let location = NodeLocation {
            node,
            attribute: None,
        };
        let plain = self.write_value(context.model_element, leaf, location);
        if plain && self.is_open_enumeration(leaf) {
            if let (Some(parent), Some(name)) = (self.tree.parent(node), self.tree.element_name(node)) {
                let extension = name.sibling(format!("{}Extension", name.local));
                let sibling = self.tree.add_element(Some(parent), extension);
                self.tree.set_text(sibling, EXTENSION_VALUE);
            }
        }
        Ok(())
    }

    /// Write the value for `leaf` as used by `member`. Identifiers are
    /// generated and registered; references are written empty and queued.
    /// Returns true for ordinary example values.
    fn write_value(&mut self, member: Option<EntityId>, leaf: EntityId, location: NodeLocation) -> bool {
        let model = self.model;

        match IdentityKind::of(model, leaf) {
            Some(IdentityKind::Id) => {
                let facet = self.facets.last().copied();
                let owner = facet
                    .or_else(|| member.and_then(|member| model.owner(member)))
                    .map(|entity| model.owning_object(entity))
                    .unwrap_or(leaf);
                let identifier = self.ids.next_id(model.name(owner));
                self.tree.write(&location, &identifier);
                self.references.register(owner, facet, identifier);
                false
            }
            Some(kind) => {
                let referenced = member
                    .filter(|member| model.is_reference(*member))
                    .and_then(|member| model.member_type(member));
                let required = match kind {
                    IdentityKind::IdRefs => self
                        .options
                        .repeat_count(member.map(|member| model.member_repeat(member)).unwrap_or(-1)),
                    _ => 1,
                };
                self.tree.write(&location, "");
                self.references.defer(referenced, required, location);
                false
            }
            None => {
                let source = member
                    .filter(|member| !model.is_reference(*member))
                    .and_then(|member| model.member_type(member))
                    .unwrap_or(leaf);
                let value = self.values.example_value(
                    model,
                    self.options.preferred_context.as_deref(),
                    member,
                    source,
                );
                self.tree.write(&location, &value);
                true
            }
        }
    }

    fn require_node(&self, what: &str) -> Result<NodeId> {
        self.contexts
            .top()
            .node
            .ok_or_else(|| ExampleError::illegal_state(format!("{} outside of an element", what)))
    }

    fn pop_context(&mut self, what: &str) -> Result<ExampleContext> {
        self.contexts.pop().map_err(|_| {
            ExampleError::illegal_state(format!("end of {} without a matching start", what))
        })
    }
}

impl<'m, T: ExampleTree> ExampleVisitor for TreeAssembler<'m, T> {
    fn start_simple_type(&mut self, simple: EntityId) -> Result<()> {
        self.scalar(simple)
    }

    fn start_legacy_simple_type(&mut self, simple: EntityId) -> Result<()> {
        self.scalar(simple)
    }

    fn start_enumeration(&mut self, enumeration: EntityId) -> Result<()> {
        self.scalar(enumeration)
    }

    fn start_role_enumeration(&mut self, roles: EntityId) -> Result<()> {
        self.scalar(roles)
    }

    fn start_value_with_attributes(&mut self, vwa: EntityId) -> Result<()> {
        self.scalar(vwa)
    }

    fn start_facet(&mut self, facet: EntityId) -> Result<()> {
        self.facets.push(facet);
        self.open_node(facet)?;
        Ok(())
    }

    fn end_facet(&mut self, facet: EntityId) -> Result<()> {
        match self.facets.pop() {
            Some(top) if top == facet => Ok(()),
            _ => Err(ExampleError::illegal_state(format!(
                "end of facet '{}' without a matching start",
                self.model.name(facet)
            ))),
        }
    }

    fn start_list_facet(&mut self, list: EntityId, role: Option<&str>) -> Result<()> {
        self.open_node(list)?;
        self.contexts.push(ExampleContext {
            role: role.map(str::to_string),
            ..ExampleContext::default()
        });
        Ok(())
    }

    fn end_list_facet(&mut self, list: EntityId, _role: Option<&str>) -> Result<()> {
        let model = self.model;
        self.pop_context(model.name(list))?;
        Ok(())
    }

    fn start_alias(&mut self, alias: EntityId) -> Result<()> {
        let context = self.contexts.top_mut();
        self.alias_bindings.push(context.model_alias.replace(alias));
        Ok(())
    }

    fn end_alias(&mut self, alias: EntityId) -> Result<()> {
        let previous = self.alias_bindings.pop().ok_or_else(|| {
            ExampleError::illegal_state(format!(
                "end of alias '{}' without a matching start",
                self.model.name(alias)
            ))
        })?;
        self.contexts.top_mut().model_alias = previous;
        Ok(())
    }

    fn start_attribute(&mut self, attribute: EntityId) -> Result<()> {
        self.require_node(&format!("attribute '{}'", self.model.name(attribute)))?;
        self.contexts.top_mut().model_attribute = Some(attribute);
        Ok(())
    }

    fn end_attribute(&mut self, attribute: EntityId) -> Result<()> {
        let context = self.contexts.top_mut();
        if context.model_attribute != Some(attribute) {
            return Err(ExampleError::illegal_state(format!(
                "end of attribute '{}' without a matching start",
                self.model.name(attribute)
            )));
        }
        context.model_attribute = None;
        Ok(())
    }

    fn start_element(&mut self, property: EntityId) -> Result<()> {
        self.contexts.push(ExampleContext {
            model_element: Some(property),
            ..ExampleContext::default()
        });
        Ok(())
    }

    fn end_element(&mut self, property: EntityId) -> Result<()> {
        let model = self.model;
        let name = model.name(property);
        let context = self.pop_context(name)?;
        if context.model_element != Some(property) {
            return Err(ExampleError::illegal_state(format!(
                "end of element '{}' closes another context",
                name
            )));
        }
        Ok(())
    }

    fn visit_indicator_attribute(&mut self, indicator: EntityId) -> Result<()> {
        let model = self.model;
        let name = model.name(indicator);
        let node = self.require_node(&format!("indicator '{}'", name))?;
        self.tree.set_attribute(node, name, "true");
        Ok(())
    }

    fn visit_indicator_element(&mut self, indicator: EntityId) -> Result<()> {
        let model = self.model;
        let parent = self.require_node(&format!("indicator '{}'", model.name(indicator)))?;
        let name = QName::new(model.library_of(indicator), model.name(indicator));
        let node = self.tree.add_element(Some(parent), name);
        self.tree.set_text(node, "true");
        Ok(())
    }

    fn start_extension_point(&mut self, facet: EntityId) -> Result<()> {
        let model = self.model;
        self.require_node("extension point")?;
        let local = model
            .facet_type(facet)
            .map(|facet_type| facet_type.extension_point_element())
            .unwrap_or("ExtensionPoint");
        self.push_child(QName::new(model.library_of(facet), local))
    }

    fn end_extension_point(&mut self, _facet: EntityId) -> Result<()> {
        self.pop_context("extension point")?;
        Ok(())
    }

    fn start_extension_point_facet(&mut self, facet: EntityId) -> Result<()> {
        let name = self.node_name(facet);
        self.push_child(name)?;
        self.facets.push(facet);
        Ok(())
    }

    fn end_extension_point_facet(&mut self, facet: EntityId) -> Result<()> {
        let model = self.model;
        if self.facets.pop() != Some(facet) {
            return Err(ExampleError::illegal_state(format!(
                "end of extension point facet '{}' without a matching start",
                model.name(facet)
            )));
        }
        self.pop_context(model.name(facet))?;
        Ok(())
    }

    fn start_action_facet(&mut self, action: EntityId) -> Result<()> {
        self.open_node(action)?;
        self.contexts.top_mut().action_facet = Some(action);
        Ok(())
    }

    fn end_action_facet(&mut self, _action: EntityId) -> Result<()> {
        self.contexts.top_mut().action_facet = None;
        Ok(())
    }

    fn start_action_payload(&mut self, action: EntityId) -> Result<()> {
        self.require_node(&format!("payload of '{}'", self.model.name(action)))?;
        self.contexts.push(ExampleContext {
            action_facet: Some(action),
            ..ExampleContext::default()
        });
        Ok(())
    }

    fn end_action_payload(&mut self, action: EntityId) -> Result<()> {
        let model = self.model;
        self.pop_context(model.name(action))?;
        Ok(())
    }

    fn start_legacy_complex_type(&mut self, complex: EntityId) -> Result<()> {
        self.open_node(complex)?;
        Ok(())
    }

    fn start_legacy_element(&mut self, element: EntityId) -> Result<()> {
        self.open_node(element)?;
        Ok(())
    }
}
